use crate::PlateForgeApp;
use crate::ui;

use egui::{pos2, vec2, Color32, Rect, Stroke, StrokeKind, Vec2};
use egui_dock::{NodeIndex, SurfaceIndex};
use serde::{Deserialize, Serialize};

use egui_lens::ReactiveEventLogger;

use crate::compositor::{build_scene, paint_scene, RenderMode};

/// Define the tabs for the DockArea
#[derive(Clone, Serialize, Deserialize)]
pub enum TabKind {
    PlateView,
    Customize,
    Order,
    AiIdeas,
    EventLog,
}

pub struct TabParams<'a> {
    pub app: &'a mut PlateForgeApp,
}

/// Tab container struct for DockArea
#[derive(Clone, Serialize, Deserialize)]
pub struct Tab {
    pub kind: TabKind,
    #[serde(skip)]
    #[allow(dead_code)]
    pub surface: Option<SurfaceIndex>,
    #[serde(skip)]
    #[allow(dead_code)]
    pub node: Option<NodeIndex>,
}

impl Tab {
    pub fn new(kind: TabKind, surface: SurfaceIndex, node: NodeIndex) -> Self {
        Self {
            kind,
            surface: Some(surface),
            node: Some(node),
        }
    }

    pub fn title(&self) -> String {
        match self.kind {
            TabKind::PlateView => "Pamja Live".to_string(),
            TabKind::Customize => "Personalizo".to_string(),
            TabKind::Order => "Porosia".to_string(),
            TabKind::AiIdeas => "AI Plate Ideas".to_string(),
            TabKind::EventLog => "Event Log".to_string(),
        }
    }

    pub fn content(&self, ui: &mut egui::Ui, params: &mut TabParams<'_>) {
        match self.kind {
            TabKind::PlateView => {
                render_plate_view(ui, params.app);
            }
            TabKind::Customize => {
                let logger_state_clone = params.app.logger_state.clone();
                let log_colors_clone = params.app.log_colors.clone();
                ui::show_customize_panel(ui, params.app, &logger_state_clone, &log_colors_clone);
            }
            TabKind::Order => {
                let logger_state_clone = params.app.logger_state.clone();
                let log_colors_clone = params.app.log_colors.clone();
                ui::show_order_panel(ui, params.app, &logger_state_clone, &log_colors_clone);
            }
            TabKind::AiIdeas => {
                let logger_state_clone = params.app.logger_state.clone();
                let log_colors_clone = params.app.log_colors.clone();
                ui::show_suggest_panel(ui, params.app, &logger_state_clone, &log_colors_clone);
            }
            TabKind::EventLog => {
                let logger =
                    ReactiveEventLogger::with_colors(&params.app.logger_state, &params.app.log_colors);
                logger.show(ui);
            }
        }
    }
}

/// Tab viewer for the DockArea
pub struct TabViewer<'a> {
    pub app: &'a mut PlateForgeApp,
}

impl egui_dock::TabViewer for TabViewer<'_> {
    type Tab = Tab;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        tab.title().into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        let mut params = TabParams { app: &mut *self.app };
        tab.content(ui, &mut params);
    }
}

fn render_plate_view(ui: &mut egui::Ui, app: &mut PlateForgeApp) {
    render_preview_controls(ui, app);
    ui.separator();

    let available = ui.available_size();
    let canvas_size = Vec2::new(available.x.max(400.0), available.y.max(450.0));
    let (response, painter) = ui.allocate_painter(canvas_size, egui::Sense::click_and_drag());
    let rect = response.rect;

    // Dark stage behind the plate
    painter.rect_filled(rect, 16.0, Color32::from_rgb(13, 15, 20));
    painter.rect_stroke(
        rect,
        16.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 13)),
        StrokeKind::Inside,
    );

    // Fold pointer state into the interaction model before drawing
    if let Some(pointer) = response.hover_pos() {
        app.interaction.pointer_move(
            pointer.x - rect.left(),
            pointer.y - rect.top(),
            rect.width(),
            rect.height(),
        );
        app.interaction
            .set_pressed(response.is_pointer_button_down_on());
    } else {
        app.interaction.pointer_leave();
    }

    let scene = build_scene(
        &app.config,
        &app.interaction,
        RenderMode::Interactive,
        rect.size(),
    );
    paint_scene(&painter, rect.min, &scene);

    render_zoom_overlay(ui, app, rect);
}

fn render_preview_controls(ui: &mut egui::Ui, app: &mut PlateForgeApp) {
    ui.horizontal(|ui| {
        let export_label = if app.exporter.is_busy() {
            "⏳ Duke procesuar..."
        } else {
            "📷 Shkarko Dizajnin (E)"
        };
        let export_button = ui.add_enabled(!app.exporter.is_busy(), egui::Button::new(export_label));
        if export_button.clicked() {
            app.start_export();
        }

        ui.separator();
        ui.label(format!("Zoom: {:.0}%", app.interaction.zoom * 100.0));

        if let Some(notice) = &app.export_notice {
            ui.separator();
            ui.colored_label(Color32::from_rgb(255, 120, 120), notice);
        }
    });
}

/// Zoom buttons floating over the lower-right corner of the preview.
/// These are UI chrome, not scene content: they never reach the export.
fn render_zoom_overlay(ui: &mut egui::Ui, app: &mut PlateForgeApp, canvas: Rect) {
    let button_size = vec2(30.0, 30.0);
    let anchor = pos2(canvas.right() - 44.0, canvas.bottom() - 118.0);

    let zoom_in = ui.put(Rect::from_min_size(anchor, button_size), egui::Button::new("+"));
    let reset = ui.put(
        Rect::from_min_size(pos2(anchor.x, anchor.y + 36.0), button_size),
        egui::Button::new("⛶"),
    );
    let zoom_out = ui.put(
        Rect::from_min_size(pos2(anchor.x, anchor.y + 72.0), button_size),
        egui::Button::new("−"),
    );

    if zoom_in.clicked() {
        app.interaction.zoom_in();
    }
    if reset.clicked() {
        app.interaction.reset_zoom();
    }
    if zoom_out.clicked() {
        app.interaction.zoom_out();
    }

    // Button hover would otherwise read as plate hover through the
    // overlapping canvas response
    if zoom_in.hovered() || reset.hovered() || zoom_out.hovered() {
        app.interaction.pointer_leave();
    }
}
