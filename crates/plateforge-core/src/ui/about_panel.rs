use egui::RichText;

use crate::platform::parameters::gui;

pub struct AboutPanel;

impl AboutPanel {
    pub fn render(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.heading(gui::APPLICATION_NAME);
            ui.label(format!("Version {}", gui::VERSION));
            ui.add_space(8.0);
            ui.label("Studio interaktive për targa të personalizuara 3D & 4D.");
            ui.label(
                RichText::new(
                    "Dizenjoni tekstin, stilin, formën dhe ngjyrën; shkarkoni \
                     dizajnin si PNG ose porositeni direkt në WhatsApp.",
                )
                .small(),
            );
            ui.add_space(8.0);
            ui.hyperlink("https://targa-ime.al");
        });
    }
}
