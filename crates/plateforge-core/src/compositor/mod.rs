/// Render compositor: configuration + interaction state in, layered
/// scene out.
///
/// `scene` builds the backend-independent layer list, `glyphs` supplies
/// the shared plate letterforms, `paint` draws a scene on the live egui
/// surface, and `raster` draws the same scene into an image buffer for
/// export.

pub mod glyphs;
pub mod paint;
pub mod raster;
pub mod scene;

pub use paint::paint_scene;
pub use raster::rasterize;
pub use scene::{
    build_scene, Fill, LayerKind, PlateScene, Primitive, RenderMode, SceneShape, EXPORT_CANVAS,
    EXPORT_PIXEL_RATIO,
};
