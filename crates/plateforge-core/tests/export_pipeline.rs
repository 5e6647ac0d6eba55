use std::thread;
use std::time::{Duration, Instant};

use plateforge_core::compositor::{
    build_scene, rasterize, LayerKind, RenderMode, EXPORT_CANVAS, EXPORT_PIXEL_RATIO,
};
use plateforge_core::export::SnapshotExporter;
use plateforge_core::interaction::InteractionState;
use plateforge_core::plate::PlateConfig;

fn wait_for_outcome(exporter: &mut SnapshotExporter) -> Result<std::path::PathBuf, String> {
    let deadline = Instant::now() + Duration::from_secs(15);
    loop {
        if let Some(outcome) = exporter.poll() {
            return outcome;
        }
        assert!(Instant::now() < deadline, "export did not finish in time");
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn export_produces_named_png_with_overlays() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let mut exporter = SnapshotExporter::with_target_dir(tmp.path().to_path_buf());

    let mut config = PlateConfig::new();
    config.set_text("AB12CDE");
    let interaction = InteractionState::new();

    // The interactive view must not carry the export overlays
    let interactive = build_scene(&config, &interaction, RenderMode::Interactive, EXPORT_CANVAS);
    assert!(!interactive.has_layer(LayerKind::Watermark));
    assert!(!interactive.has_layer(LayerKind::QrOverlay));

    assert!(exporter.trigger(&config, &interaction));
    let path = wait_for_outcome(&mut exporter).expect("export should succeed");

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .expect("export file name");
    assert!(name.contains("AB12CDE"), "filename was {name}");
    assert!(name.starts_with("targa-ime-"));
    assert!(name.ends_with(".png"));

    // Exactly one file landed in the target directory
    let entries: Vec<_> = std::fs::read_dir(tmp.path())
        .expect("read temp dir")
        .collect();
    assert_eq!(entries.len(), 1);

    // 2x pixel density of the logical export canvas
    let img = image::open(&path).expect("exported PNG decodes").to_rgba8();
    assert_eq!(
        (img.width(), img.height()),
        (
            (EXPORT_CANVAS.x * EXPORT_PIXEL_RATIO) as u32,
            (EXPORT_CANVAS.y * EXPORT_PIXEL_RATIO) as u32
        )
    );
}

#[test]
fn second_trigger_while_busy_is_a_no_op() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let mut exporter = SnapshotExporter::with_target_dir(tmp.path().to_path_buf());

    let mut config = PlateConfig::new();
    config.set_text("AB12CDE");
    let interaction = InteractionState::new();

    assert!(exporter.trigger(&config, &interaction));
    assert!(exporter.is_busy());
    // Second trigger before the first completes: rejected, no second
    // rasterization is dispatched
    assert!(!exporter.trigger(&config, &interaction));
    assert_eq!(exporter.exports_started(), 1);

    wait_for_outcome(&mut exporter).expect("export should succeed");
    assert!(!exporter.is_busy());

    // Once the first export settles the trigger works again
    assert!(exporter.trigger(&config, &interaction));
    assert_eq!(exporter.exports_started(), 2);
    wait_for_outcome(&mut exporter).expect("second export should succeed");
}

#[test]
fn export_overlays_change_the_captured_pixels() {
    let config = PlateConfig::new();
    let interaction = InteractionState::new();

    let interactive = rasterize(
        &build_scene(&config, &interaction, RenderMode::Interactive, EXPORT_CANVAS),
        EXPORT_PIXEL_RATIO,
    );
    let export = rasterize(
        &build_scene(&config, &interaction, RenderMode::Export, EXPORT_CANVAS),
        EXPORT_PIXEL_RATIO,
    );

    // The watermark panel crosses the canvas middle, darkening the plate;
    // sample above the watermark glyph row to stay inside the panel fill
    let cx = (EXPORT_CANVAS.x * EXPORT_PIXEL_RATIO / 2.0) as u32;
    let cy = (190.0 * EXPORT_PIXEL_RATIO) as u32;
    assert_ne!(interactive.get_pixel(cx, cy), export.get_pixel(cx, cy));

    // The QR panel only exists in the export artifact
    let qx = 40;
    let qy = (EXPORT_CANVAS.y * EXPORT_PIXEL_RATIO) as u32 - 150;
    assert_eq!(interactive.get_pixel(qx, qy)[3], 0);
    assert_eq!(export.get_pixel(qx, qy)[3], 255);
}
