use egui::RichText;
use egui_lens::{LogColors, ReactiveEventLogger, ReactiveEventLoggerState};
use egui_mobius_reactive::*;

use crate::suggest::API_KEY_ENV;
use crate::PlateForgeApp;

/// AI plate-idea assistant: prompt in, up to five clickable suggestions
/// out. Selecting one becomes the new registration text.
pub fn show_suggest_panel<'a>(
    ui: &mut egui::Ui,
    app: &'a mut PlateForgeApp,
    logger_state: &'a Dynamic<ReactiveEventLoggerState>,
    log_colors: &'a Dynamic<LogColors>,
) {
    let logger = ReactiveEventLogger::with_colors(logger_state, log_colors);

    if !app.suggest_client.is_enabled() {
        ui.label(
            RichText::new(format!(
                "AI Plate Ideas është i çaktivizuar. Vendosni {API_KEY_ENV} për ta aktivizuar."
            ))
            .weak(),
        );
        return;
    }

    ui.label("Na tregoni për emrin, makinën ose hobin tuaj:");
    ui.horizontal(|ui| {
        let edit = ui.add(
            egui::TextEdit::singleline(&mut app.suggestion_input)
                .hint_text("p.sh. 'David loves BMW', 'Dark Knight'"),
        );
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

        let generate = ui.add_enabled(
            !app.suggestion_busy && !app.suggestion_input.trim().is_empty(),
            egui::Button::new(if app.suggestion_busy {
                "⏳ Duke gjeneruar..."
            } else {
                "✨ Generate"
            }),
        );
        if generate.clicked() || (submitted && !app.suggestion_busy) {
            app.start_suggestions();
        }
    });

    if app.suggestions.is_empty() && !app.suggestion_busy {
        ui.add_space(4.0);
        ui.label(RichText::new("Asnjë sugjerim akoma.").small().weak());
        return;
    }

    ui.add_space(6.0);
    let mut picked = None;
    for suggestion in &app.suggestions {
        let response = ui.add(
            egui::Button::new(
                RichText::new(format!("{} · {}", suggestion.text, suggestion.reasoning)),
            )
            .wrap_mode(egui::TextWrapMode::Wrap),
        );
        if response.clicked() {
            picked = Some(suggestion.text.clone());
        }
    }

    if let Some(text) = picked {
        app.config.set_text(&text);
        logger.log_info(&format!("Applied AI suggestion: {text}"));
    }
}
