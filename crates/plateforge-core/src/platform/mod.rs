// Platform module
pub mod banner;

pub mod parameters {
    pub mod gui {
        pub const APPLICATION_NAME: &str = "PlateForge - Custom Plate Studio";
        pub const VERSION: &str = env!("CARGO_PKG_VERSION"); // Single source of truth from Cargo.toml
        #[allow(dead_code)]
        pub const VIEWPORT_X: f32 = 1280.0;
        #[allow(dead_code)]
        pub const VIEWPORT_Y: f32 = 768.0;
    }
}
