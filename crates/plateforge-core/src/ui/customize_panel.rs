use egui::{vec2, Color32, RichText, Sense, Stroke, StrokeKind};
use egui_lens::{LogColors, ReactiveEventLogger, ReactiveEventLoggerState};
use egui_mobius_reactive::*;

use crate::compositor::scene::parse_hex_color;
use crate::plate::{PlateColor, PlateFlag, PlateShape, PlateStyle, MAX_TEXT_LEN};
use crate::PlateForgeApp;

/// The accordion of design controls: registration text, style, shape,
/// color, and the extra options (border, badge, shine).
pub fn show_customize_panel<'a>(
    ui: &mut egui::Ui,
    app: &'a mut PlateForgeApp,
    logger_state: &'a Dynamic<ReactiveEventLoggerState>,
    log_colors: &'a Dynamic<LogColors>,
) {
    let logger = ReactiveEventLogger::with_colors(logger_state, log_colors);

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::CollapsingHeader::new(RichText::new("Numri i Regjistrimit").strong())
            .default_open(true)
            .show(ui, |ui| {
                let mut text = app.config.text.clone();
                let edit = ui.add(
                    egui::TextEdit::singleline(&mut text)
                        .hint_text("SHKRUAJ KETU")
                        .char_limit(MAX_TEXT_LEN)
                        .font(egui::TextStyle::Heading),
                );
                if edit.changed() {
                    app.config.set_text(&text);
                }
                ui.label(
                    RichText::new("Hapësira llogaritet si karakter")
                        .small()
                        .weak(),
                );
            });

        egui::CollapsingHeader::new(RichText::new("Stili i Targës").strong())
            .default_open(false)
            .show(ui, |ui| {
                for style in PlateStyle::all() {
                    let selected = app.config.style == style;
                    if ui
                        .selectable_label(selected, style.display_name())
                        .clicked()
                        && !selected
                    {
                        app.config.set_style(style);
                        logger.log_info(&format!(
                            "Style set to {} (shine reset to {:.0}%)",
                            style.display_name(),
                            app.config.shine_intensity * 100.0
                        ));
                    }
                }
            });

        egui::CollapsingHeader::new(RichText::new("Forma e Targës").strong())
            .default_open(false)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for shape in PlateShape::all() {
                        let selected = app.config.shape == shape;
                        if ui
                            .selectable_label(selected, shape.display_name())
                            .clicked()
                            && !selected
                        {
                            app.config.set_shape(shape);
                            logger.log_info(&format!("Shape set to {}", shape.display_name()));
                        }
                    }
                });
            });

        egui::CollapsingHeader::new(RichText::new("Sfondi / Ngjyra").strong())
            .default_open(false)
            .show(ui, |ui| {
                for color in PlateColor::all() {
                    let selected = app.config.color == color;
                    ui.horizontal(|ui| {
                        draw_color_swatch(ui, color, &app.config.custom_color);
                        if ui
                            .selectable_label(selected, color.display_name())
                            .clicked()
                            && !selected
                        {
                            app.config.set_color(color);
                            logger.log_info(&format!("Color set to {}", color.display_name()));
                        }
                    });
                }

                if app.config.color == PlateColor::Custom {
                    ui.add_space(4.0);
                    ui.label("Zgjidhni ngjyrën e personalizuar:");
                    ui.horizontal(|ui| {
                        let mut picked = parse_hex_color(&app.config.custom_color);
                        if ui.color_edit_button_srgba(&mut picked).changed() {
                            app.config.set_custom_color(&format!(
                                "#{:02x}{:02x}{:02x}",
                                picked.r(),
                                picked.g(),
                                picked.b()
                            ));
                        }
                        ui.monospace(&app.config.custom_color);
                    });
                }
            });

        egui::CollapsingHeader::new(RichText::new("Opsione Shtesë").strong())
            .default_open(false)
            .show(ui, |ui| {
                let mut border = app.config.border;
                if ui.checkbox(&mut border, "Kornizë e Zezë").clicked() {
                    app.config.set_border(border);
                    logger.log_info(if border {
                        "Border enabled"
                    } else {
                        "Border disabled"
                    });
                }

                ui.add_space(4.0);
                ui.label("Flamuri / Logo");
                ui.horizontal(|ui| {
                    for (flag, label) in [
                        (Some(PlateFlag::Uk), "UK"),
                        (Some(PlateFlag::Eu), "EU"),
                        (None, "Asnjë"),
                    ] {
                        let selected = app.config.flag == flag;
                        if ui.selectable_label(selected, label).clicked() && !selected {
                            app.config.set_flag(flag);
                            logger.log_info(&format!("Badge set to {label}"));
                        }
                    }
                });

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.label("Intensiteti i Shkëlqimit");
                    ui.monospace(format!("{:.0}%", app.config.shine_intensity * 100.0));
                });
                let mut intensity = app.config.shine_intensity;
                if ui
                    .add(egui::Slider::new(&mut intensity, 0.0..=1.0).step_by(0.05))
                    .changed()
                {
                    app.config.set_shine_intensity(intensity);
                }
                ui.label(
                    RichText::new("Rregulloni efektin e shkëlqimit sipas dëshirës.")
                        .small()
                        .weak(),
                );
            });
    });
}

/// Small round preview of a color option; gradient plates collapse to
/// their midtone.
fn draw_color_swatch(ui: &mut egui::Ui, color: PlateColor, custom_hex: &str) {
    let (rect, _response) = ui.allocate_exact_size(vec2(22.0, 22.0), Sense::hover());
    let painter = ui.painter();
    match color {
        PlateColor::Yellow => painter.circle_filled(rect.center(), 10.0, Color32::from_rgb(0xff, 0xd7, 0x00)),
        PlateColor::White => painter.circle_filled(rect.center(), 10.0, Color32::from_rgb(0xf3, 0xf4, 0xf6)),
        PlateColor::Black => {
            painter.circle_filled(rect.center(), 10.0, Color32::from_rgb(0x15, 0x15, 0x15));
        }
        PlateColor::Silver => {
            painter.circle_filled(rect.center(), 10.0, Color32::from_rgb(0xc0, 0xc0, 0xc0));
        }
        PlateColor::Custom => {
            painter.circle_filled(rect.center(), 10.0, parse_hex_color(custom_hex));
        }
    }
    painter.rect_stroke(
        rect.shrink(1.0),
        10.0,
        Stroke::new(1.0, Color32::from_gray(110)),
        StrokeKind::Inside,
    );
}
