//! Snapshot export: rasterize the current design to a PNG download.
//!
//! The exporter is the only asynchronous operation in the application.
//! `trigger` builds an export-mode scene from the live configuration and
//! hands it to a worker thread; the UI keeps running and polls for the
//! outcome. A busy flag guards re-entry: a second trigger while one
//! export is in flight is a no-op.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;

use egui_mobius::types::Value;
use thiserror::Error;

use crate::compositor::{build_scene, rasterize, PlateScene, RenderMode, EXPORT_CANVAS, EXPORT_PIXEL_RATIO};
use crate::interaction::InteractionState;
use crate::plate::PlateConfig;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("export worker panicked")]
    WorkerPanicked,
}

/// Download filename for a snapshot: the plate text plus a millisecond
/// timestamp, path-hostile characters replaced.
pub fn export_filename(text: &str, timestamp_millis: i64) -> String {
    let safe: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("targa-ime-{safe}-{timestamp_millis}.png")
}

pub struct SnapshotExporter {
    target_dir: PathBuf,
    busy: bool,
    exports_started: u64,
    outcome: Value<Option<Result<PathBuf, String>>>,
}

impl SnapshotExporter {
    /// Exports land in the user's download directory, falling back to the
    /// temp dir on headless systems.
    pub fn new() -> Self {
        Self::with_target_dir(dirs::download_dir().unwrap_or_else(std::env::temp_dir))
    }

    pub fn with_target_dir(target_dir: PathBuf) -> Self {
        Self {
            target_dir,
            busy: false,
            exports_started: 0,
            outcome: Value::new(None),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// How many rasterizations have been dispatched. Triggers rejected by
    /// the busy guard do not count.
    pub fn exports_started(&self) -> u64 {
        self.exports_started
    }

    /// Start an export of the current design. Returns `false` (and does
    /// nothing) while a previous export is still in flight.
    pub fn trigger(&mut self, config: &PlateConfig, interaction: &InteractionState) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        self.exports_started += 1;

        let scene = build_scene(config, interaction, RenderMode::Export, EXPORT_CANVAS);
        let path = self
            .target_dir
            .join(export_filename(&config.text, chrono::Utc::now().timestamp_millis()));

        let cell = self.outcome.clone();
        thread::spawn(move || {
            let result = catch_unwind(AssertUnwindSafe(|| write_snapshot(&scene, &path)))
                .unwrap_or(Err(ExportError::WorkerPanicked))
                .map_err(|err| err.to_string());
            *cell.lock().unwrap() = Some(result);
        });
        true
    }

    /// Fetch the finished outcome, if any. Clears the busy flag whenever
    /// an outcome arrives, success or failure.
    pub fn poll(&mut self) -> Option<Result<PathBuf, String>> {
        let outcome = self.outcome.lock().unwrap().take();
        if outcome.is_some() {
            self.busy = false;
        }
        outcome
    }
}

impl Default for SnapshotExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_snapshot(scene: &PlateScene, path: &Path) -> Result<PathBuf, ExportError> {
    let img = rasterize(scene, EXPORT_PIXEL_RATIO);
    img.save(path)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_pattern() {
        let name = export_filename("AB12CDE", 1_700_000_000_123);
        assert_eq!(name, "targa-ime-AB12CDE-1700000000123.png");
        assert!(name.contains("AB12CDE"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_filename_sanitizes_separators() {
        let name = export_filename("TARGA IME", 7);
        assert_eq!(name, "targa-ime-TARGA-IME-7.png");
        let name = export_filename("A/B\\C", 7);
        assert!(!name.contains('/') && !name.contains('\\'));
    }

    #[test]
    fn test_exporter_starts_idle() {
        let exporter = SnapshotExporter::with_target_dir(std::env::temp_dir());
        assert!(!exporter.is_busy());
        assert_eq!(exporter.exports_started(), 0);
    }
}
