/// UI panels and dock tabs
pub mod about_panel;
pub mod customize_panel;
pub mod order_panel;
pub mod suggest_panel;
pub mod tabs;

pub use about_panel::AboutPanel;
pub use customize_panel::show_customize_panel;
pub use order_panel::show_order_panel;
pub use suggest_panel::show_suggest_panel;
pub use tabs::{Tab, TabKind, TabParams, TabViewer};

use egui_lens::ReactiveEventLogger;

use crate::platform::banner::Banner;

/// Log the startup banner into the event log, one line per row.
pub fn initialize_and_show_banner(logger: &ReactiveEventLogger) {
    let mut banner = Banner::new();
    banner.format();
    for line in banner.message.lines().filter(|line| !line.is_empty()) {
        logger.log_info(line);
    }
}
