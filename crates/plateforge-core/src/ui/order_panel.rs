use egui::{Color32, RichText};
use egui_lens::{LogColors, ReactiveEventLogger, ReactiveEventLoggerState};
use egui_mobius_reactive::*;

use crate::share;
use crate::PlateForgeApp;

/// Order summary plus the WhatsApp deep link for the current design.
pub fn show_order_panel<'a>(
    ui: &mut egui::Ui,
    app: &'a mut PlateForgeApp,
    logger_state: &'a Dynamic<ReactiveEventLoggerState>,
    log_colors: &'a Dynamic<LogColors>,
) {
    let logger = ReactiveEventLogger::with_colors(logger_state, log_colors);

    ui.label(RichText::new("PËRMBLEDHJE").small().weak());
    ui.add_space(4.0);
    ui.heading(app.config.style.display_name());
    ui.label(
        RichText::new(app.config.shape.display_name()).color(Color32::from_rgb(0xff, 0xd7, 0x00)),
    );
    ui.add_space(2.0);
    ui.monospace(app.config.display_text());

    ui.separator();

    let link = share::whatsapp_link(&app.config);
    ui.hyperlink_to(
        RichText::new("📱 Porosit në WhatsApp").strong(),
        link.clone(),
    );
    if ui.button("Kopjo linkun e porosisë").clicked() {
        ui.ctx().copy_text(link);
        logger.log_info("Order link copied to clipboard");
    }

    ui.add_space(8.0);
    ui.label(
        RichText::new("Ose na shkruani në Instagram @targa_ime")
            .small()
            .weak(),
    );

    ui.separator();
    ui.label(
        RichText::new(
            "Shkarkimi PNG gjendet te Pamja Live; artefakti përmban \
             vulën dhe kodin QR të studios.",
        )
        .small()
        .weak(),
    );
}
