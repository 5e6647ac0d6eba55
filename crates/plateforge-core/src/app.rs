use std::{fs, path::PathBuf, thread};

use egui_dock::{DockArea, DockState, NodeIndex, Style, SurfaceIndex};

/// egui_lens imports
use egui_lens::{LogColors, ReactiveEventLogger, ReactiveEventLoggerState};
use egui_mobius_reactive::*;

use crate::export::SnapshotExporter;
use crate::interaction::InteractionState;
use crate::plate::PlateConfig;
use crate::platform::parameters::gui::VERSION;
use crate::suggest::{PlateSuggestion, SuggestionClient};
use crate::ui;
use crate::ui::{initialize_and_show_banner, Tab, TabKind, TabViewer};

/// The main application struct
pub struct PlateForgeApp {
    /// The single in-memory plate design; never persisted
    pub config: PlateConfig,

    /// Ephemeral preview state driven by the pointer
    pub interaction: InteractionState,

    /// PNG snapshot worker with its busy guard
    pub exporter: SnapshotExporter,

    /// Last export failure, shown next to the trigger until the next run
    pub export_notice: Option<String>,

    // AI suggestion assistant
    pub suggest_client: SuggestionClient,
    pub suggestion_input: String,
    pub suggestions: Vec<PlateSuggestion>,
    pub suggestion_busy: bool,
    pub pending_suggestions: egui_mobius::types::Value<Option<Vec<PlateSuggestion>>>,

    // Logger state and colors
    pub logger_state: Dynamic<ReactiveEventLoggerState>,
    pub log_colors: Dynamic<LogColors>,

    // Dock state
    dock_state: DockState<Tab>,
    pub config_path: PathBuf,

    // Modal states
    pub show_about_modal: bool,
}

impl Drop for PlateForgeApp {
    fn drop(&mut self) {
        // Save dock state when application closes
        self.save_dock_state();
    }
}

impl PlateForgeApp {
    pub fn new() -> Self {
        let mut initial_logger_state = ReactiveEventLoggerState::new();
        initial_logger_state.show_timestamps = false;
        let logger_state = Dynamic::new(initial_logger_state);
        let log_colors = Dynamic::new(LogColors::default());
        let dock_state = Self::create_default_dock_state();

        let app = Self {
            config: PlateConfig::new(),
            interaction: InteractionState::new(),
            exporter: SnapshotExporter::new(),
            export_notice: None,
            suggest_client: SuggestionClient::from_env(),
            suggestion_input: String::new(),
            suggestions: Vec::new(),
            suggestion_busy: false,
            pending_suggestions: egui_mobius::types::Value::new(None),
            logger_state,
            log_colors,
            dock_state,
            config_path: dirs::config_dir()
                .map(|d| d.join("plateforge"))
                .unwrap_or_default(),
            show_about_modal: false,
        };

        let logger = ReactiveEventLogger::with_colors(&app.logger_state, &app.log_colors);
        initialize_and_show_banner(&logger);
        if !app.suggest_client.is_enabled() {
            logger.log_info("AI Plate Ideas disabled (no API credential)");
        }

        app
    }

    /// Kick off a PNG export of the current design. A second trigger
    /// while one is in flight is rejected by the exporter's busy guard.
    pub fn start_export(&mut self) {
        let logger = ReactiveEventLogger::with_colors(&self.logger_state, &self.log_colors);
        if self.exporter.trigger(&self.config, &self.interaction) {
            self.export_notice = None;
            logger.log_info(&format!("Export started for \"{}\"", self.config.display_text()));
        } else {
            logger.log_warning("Export already in progress");
        }
    }

    /// Run the suggestion collaborator on a worker thread; the UI keeps
    /// polling `pending_suggestions`.
    pub fn start_suggestions(&mut self) {
        if self.suggestion_busy || self.suggestion_input.trim().is_empty() {
            return;
        }
        self.suggestion_busy = true;

        let client = self.suggest_client.clone();
        let input = self.suggestion_input.clone();
        let cell = self.pending_suggestions.clone();
        thread::spawn(move || {
            let suggestions = client.generate(&input);
            *cell.lock().unwrap() = Some(suggestions);
        });
    }

    fn poll_workers(&mut self) {
        let logger = ReactiveEventLogger::with_colors(&self.logger_state, &self.log_colors);

        if let Some(outcome) = self.exporter.poll() {
            match outcome {
                Ok(path) => {
                    self.export_notice = None;
                    logger.log_info(&format!("Export saved to {}", path.display()));
                }
                Err(err) => {
                    // Configuration stays untouched; the user may retry
                    self.export_notice =
                        Some("Nuk u arrit të gjenerohej imazhi. Provoni përsëri.".to_string());
                    logger.log_error(&format!("Export failed: {err}"));
                }
            }
        }

        let finished = { self.pending_suggestions.lock().unwrap().take() };
        if let Some(suggestions) = finished {
            self.suggestion_busy = false;
            logger.log_info(&format!("AI assistant returned {} idea(s)", suggestions.len()));
            self.suggestions = suggestions;
        }
    }

    fn save_dock_state(&self) {
        if let Some(config_dir) = dirs::config_dir() {
            let plateforge_dir = config_dir.join("plateforge");
            if let Err(e) = fs::create_dir_all(&plateforge_dir) {
                eprintln!("Failed to create config directory: {}", e);
                return;
            }
            let config_path = plateforge_dir.join("dock_state.json");
            match serde_json::to_string_pretty(&self.dock_state) {
                Ok(json) => {
                    if let Err(e) = fs::write(&config_path, json) {
                        eprintln!("Failed to write dock state: {}", e);
                    }
                }
                Err(e) => {
                    eprintln!("Failed to serialize dock state: {}", e);
                }
            }
        }
    }

    fn load_dock_state() -> Option<DockState<Tab>> {
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("plateforge").join("dock_state.json");
            if let Ok(json) = fs::read_to_string(&config_path) {
                match serde_json::from_str::<DockState<Tab>>(&json) {
                    Ok(dock_state) => {
                        return Some(dock_state);
                    }
                    Err(e) => {
                        eprintln!("Failed to deserialize dock state: {}", e);
                        // Delete corrupted file
                        fs::remove_file(config_path).ok();
                    }
                }
            }
        }
        None
    }

    fn create_default_dock_state() -> DockState<Tab> {
        if let Some(saved_dock_state) = Self::load_dock_state() {
            return saved_dock_state;
        }

        let plate_view_tab = Tab::new(TabKind::PlateView, SurfaceIndex::main(), NodeIndex(0));
        let customize_tab = Tab::new(TabKind::Customize, SurfaceIndex::main(), NodeIndex(1));
        let order_tab = Tab::new(TabKind::Order, SurfaceIndex::main(), NodeIndex(2));
        let ideas_tab = Tab::new(TabKind::AiIdeas, SurfaceIndex::main(), NodeIndex(3));
        let log_tab = Tab::new(TabKind::EventLog, SurfaceIndex::main(), NodeIndex(4));

        let mut dock_state = DockState::new(vec![plate_view_tab]);
        let surface = dock_state.main_surface_mut();

        let [left, _right] = surface.split_left(
            NodeIndex::root(),
            0.32,
            vec![customize_tab, order_tab, ideas_tab],
        );
        surface.split_below(left, 0.7, vec![log_tab]);
        dock_state
    }

    /// Show clock display in the upper right corner
    fn show_clock_display(&mut self, ui: &mut egui::Ui) {
        // Show version as clickable button
        if ui
            .button(
                egui::RichText::new(format!("PlateForge v{}", VERSION))
                    .color(egui::Color32::from_rgb(180, 200, 255)),
            )
            .clicked()
        {
            self.show_about_modal = true;
        }

        ui.separator();

        let now = chrono::Local::now();
        ui.label(
            egui::RichText::new(format!("{}", now.format("%Y-%m-%d %H:%M:%S")))
                .color(egui::Color32::from_rgb(220, 220, 220)),
        );
    }
}

impl Default for PlateForgeApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Implement the eframe::App trait for PlateForgeApp
///
/// The `update` method is called every frame: it drains worker results,
/// handles hotkeys, draws the top ribbon and the dock area, and shows
/// the about modal. Pointer handling for the preview itself lives in the
/// Plate View tab.
impl eframe::App for PlateForgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_workers();

        // Handle hotkeys first (but only if no text field has focus)
        let text_input_active = ctx.memory(|mem| mem.focused().is_some());

        if !text_input_active {
            ctx.input(|i| {
                // E key - export snapshot
                if i.key_pressed(egui::Key::E) && !self.exporter.is_busy() {
                    if self.exporter.trigger(&self.config, &self.interaction) {
                        self.export_notice = None;
                        let logger =
                            ReactiveEventLogger::with_colors(&self.logger_state, &self.log_colors);
                        logger.log_info("Export started (E key)");
                    }
                }

                // Plus / Minus - zoom the preview
                if i.key_pressed(egui::Key::Plus) {
                    self.interaction.zoom_in();
                }
                if i.key_pressed(egui::Key::Minus) {
                    self.interaction.zoom_out();
                }

                // 0 key - reset zoom
                if i.key_pressed(egui::Key::Num0) {
                    self.interaction.reset_zoom();
                }
            });
        }

        // Ribbon at the top
        egui::TopBottomPanel::top("plate_ribbon").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 10.0;

                ui.label(egui::RichText::new("🔧 PlateForge").strong());
                ui.separator();
                ui.label(format!(
                    "{} · {}",
                    self.config.style.display_name(),
                    self.config.shape.display_name()
                ));

                // Hotkeys menu
                ui.menu_button("📋 Hotkeys", |ui| {
                    ui.heading("Keyboard Shortcuts");
                    ui.separator();

                    for (key, action) in [
                        ("E", "Export snapshot"),
                        ("+", "Zoom in"),
                        ("−", "Zoom out"),
                        ("0", "Reset zoom"),
                    ] {
                        ui.horizontal(|ui| {
                            ui.label(key);
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    ui.label(action);
                                },
                            );
                        });
                    }

                    ui.separator();
                    ui.heading("Mouse Controls");
                    ui.horizontal(|ui| {
                        ui.label("Move over plate");
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label("Tilt & shine");
                        });
                    });
                    ui.horizontal(|ui| {
                        ui.label("Press");
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label("Push the plate down");
                        });
                    });
                });

                // Clock in the upper right
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.show_clock_display(ui);
                });
            });
        });

        // Main dock area below the ribbon
        let mut dock_state = self.dock_state.clone();
        let mut tab_viewer = TabViewer { app: &mut *self };
        let mut style = Style::from_egui(ctx.style().as_ref());
        style.dock_area_padding = None;
        style.tab_bar.fill_tab_bar = true;

        DockArea::new(&mut dock_state)
            .style(style)
            .show_add_buttons(false)
            .show_close_buttons(true)
            .show(ctx, &mut tab_viewer);

        self.dock_state = dock_state;

        // Show About modal if requested
        if self.show_about_modal {
            egui::Window::new("About PlateForge")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui::AboutPanel::render(ui);

                    ui.add_space(20.0);
                    ui.horizontal(|ui| {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Close").clicked() {
                                self.show_about_modal = false;
                            }
                        });
                    });
                });
        }

        // Keep polling while a worker is in flight
        if self.exporter.is_busy() || self.suggestion_busy {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // Save dock state to disk periodically
        if ctx.input(|i| i.time) % 30.0 < 0.1 {
            self.save_dock_state();
        }
    }
}
