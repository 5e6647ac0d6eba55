//! Backend-independent scene construction.
//!
//! `build_scene` turns a `PlateConfig` + `InteractionState` into an
//! ordered list of draw primitives. The same scene feeds the on-screen
//! egui painter and the export rasterizer; the only difference between
//! the two render modes is the export-only overlay layers.

use egui::{pos2, vec2, Color32, Pos2, Rect, Vec2};
use nalgebra::{Rotation3, Vector3};

use crate::compositor::glyphs;
use crate::interaction::InteractionState;
use crate::plate::{
    shine_params_for_style, text_treatment_for_style, BlendMode, PlateColor, PlateConfig,
    PlateFlag, PlateShape, TextShadowKind,
};

/// Logical export canvas, before the 2x pixel-density multiplier.
pub const EXPORT_CANVAS: Vec2 = vec2(900.0, 450.0);

/// Exported bitmaps are rasterized at twice the logical density.
pub const EXPORT_PIXEL_RATIO: f32 = 2.0;

/// Perspective distance of the tilt illusion, in logical pixels.
const PERSPECTIVE: f32 = 1200.0;

const BADGE_WIDTH: f32 = 56.0;
const BORDER_WIDTH: f32 = 4.0;

pub const WATERMARK_TEXT: &str = "@TARGA_IME";
pub const QR_URL: &str = "https://targa-ime.al";
pub const QR_CAPTION: &str = "TARGA-IME.AL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Interactive,
    Export,
}

/// Which logical layer a primitive belongs to. Used for draw ordering
/// sanity and by tests asserting what a mode does or does not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    FloorShadow,
    Base,
    Bevel,
    Border,
    Badge,
    BadgeContent,
    TextShadow,
    Text,
    StaticSheen,
    DynamicShine,
    Watermark,
    QrOverlay,
}

#[derive(Debug, Clone)]
pub enum SceneShape {
    /// Filled simple polygon (convex or star-shaped), in canvas space.
    Polygon(Vec<Pos2>),
    /// Stroked closed polyline.
    Outline { points: Vec<Pos2>, width: f32 },
    /// Ellipse whose alpha falls off smoothly toward the rim.
    SoftEllipse { center: Pos2, radius: Vec2 },
    /// QR module grid for `data`, drawn dark-on-light inside `rect`.
    QrCode { rect: Rect, data: String },
}

#[derive(Debug, Clone)]
pub enum Fill {
    Solid(Color32),
    /// Multi-stop gradient along `from -> to`; positions beyond the
    /// segment clamp to the end stops.
    Linear {
        from: Pos2,
        to: Pos2,
        stops: Vec<(f32, Color32)>,
    },
    /// Radial falloff from `inner` at `center` to `outer` at `radius`.
    Radial {
        center: Pos2,
        radius: f32,
        inner: Color32,
        outer: Color32,
    },
}

#[derive(Debug, Clone)]
pub struct Primitive {
    pub layer: LayerKind,
    pub shape: SceneShape,
    pub fill: Fill,
    pub blend: BlendMode,
}

#[derive(Debug, Clone)]
pub struct PlateScene {
    pub canvas: Vec2,
    pub mode: RenderMode,
    pub primitives: Vec<Primitive>,
}

impl PlateScene {
    pub fn has_layer(&self, kind: LayerKind) -> bool {
        self.primitives.iter().any(|p| p.layer == kind)
    }

    pub fn base_fill(&self) -> Option<&Fill> {
        self.primitives
            .iter()
            .find(|p| p.layer == LayerKind::Base)
            .map(|p| &p.fill)
    }
}

/// Tilt-and-zoom projection of plate-space points onto the canvas.
///
/// A small-angle perspective model around the canvas center: points are
/// rotated about the X then Y axes and projected with a fixed eye
/// distance of 1200 logical pixels.
struct TiltProjection {
    rotation: Rotation3<f32>,
    scale: f32,
    pivot: Pos2,
}

impl TiltProjection {
    fn new(interaction: &InteractionState, pivot: Pos2) -> Self {
        let rx = interaction.rotation.x.to_radians();
        let ry = interaction.rotation.y.to_radians();
        Self {
            rotation: Rotation3::from_axis_angle(&Vector3::y_axis(), ry)
                * Rotation3::from_axis_angle(&Vector3::x_axis(), rx),
            scale: interaction.scale(),
            pivot,
        }
    }

    fn apply(&self, p: Pos2) -> Pos2 {
        let local = Vector3::new(p.x - self.pivot.x, p.y - self.pivot.y, 0.0);
        let rotated = self.rotation * local;
        let f = PERSPECTIVE / (PERSPECTIVE - rotated.z).max(1.0);
        pos2(
            self.pivot.x + rotated.x * f * self.scale,
            self.pivot.y + rotated.y * f * self.scale,
        )
    }

    fn apply_all(&self, points: impl IntoIterator<Item = Pos2>) -> Vec<Pos2> {
        points.into_iter().map(|p| self.apply(p)).collect()
    }
}

/// Parse a `#rrggbb` hex string; malformed input falls back to plate
/// yellow rather than failing.
pub fn parse_hex_color(hex: &str) -> Color32 {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() == 6 {
        if let Ok(value) = u32::from_str_radix(digits, 16) {
            return Color32::from_rgb(
                ((value >> 16) & 0xff) as u8,
                ((value >> 8) & 0xff) as u8,
                (value & 0xff) as u8,
            );
        }
    }
    Color32::from_rgb(0xff, 0xd7, 0x00)
}

/// Build the full layered scene for one frame or one export.
pub fn build_scene(
    config: &PlateConfig,
    interaction: &InteractionState,
    mode: RenderMode,
    canvas: Vec2,
) -> PlateScene {
    let mut primitives = Vec::new();
    let center = pos2(canvas.x / 2.0, canvas.y / 2.0);
    let projection = TiltProjection::new(interaction, center);

    let plate_size = plate_size_for_shape(config.shape, canvas);
    let rect = Rect::from_center_size(center, plate_size);
    let outline = projection.apply_all(plate_outline(config.shape, rect));

    push_floor_shadow(&mut primitives, interaction, rect, canvas);

    primitives.push(Primitive {
        layer: LayerKind::Base,
        shape: SceneShape::Polygon(outline.clone()),
        fill: base_fill(config, rect, &projection),
        blend: BlendMode::Normal,
    });

    push_bevels(&mut primitives, rect, &projection);

    if config.border {
        primitives.push(Primitive {
            layer: LayerKind::Border,
            shape: SceneShape::Outline {
                points: outline.clone(),
                width: BORDER_WIDTH * interaction.scale(),
            },
            fill: Fill::Solid(Color32::BLACK),
            blend: BlendMode::Normal,
        });
    }

    push_badge(&mut primitives, config, rect, &projection);
    push_text(&mut primitives, config, rect, &projection);
    push_static_sheen(&mut primitives, config, rect, &outline, &projection);
    push_dynamic_shine(&mut primitives, config, interaction, rect, &outline, &projection);

    if mode == RenderMode::Export {
        push_watermark(&mut primitives, canvas);
        push_qr_overlay(&mut primitives, canvas);
    }

    PlateScene {
        canvas,
        mode,
        primitives,
    }
}

fn plate_size_for_shape(shape: PlateShape, canvas: Vec2) -> Vec2 {
    let responsive_width = (canvas.x * 0.9).min(520.0);
    match shape {
        PlateShape::Standard => vec2(responsive_width, 110.0),
        PlateShape::Hexagonal => vec2(responsive_width, 122.0),
        PlateShape::Oversized => vec2(responsive_width, 140.0),
        PlateShape::Short => vec2(320.0_f32.min(responsive_width), 110.0),
    }
}

/// Plate silhouette in canvas space, before projection.
fn plate_outline(shape: PlateShape, rect: Rect) -> Vec<Pos2> {
    match shape {
        // Six-point polygon, side points cut in at 5% / 95% of the width
        PlateShape::Hexagonal => vec![
            pos2(rect.left() + rect.width() * 0.05, rect.top()),
            pos2(rect.left() + rect.width() * 0.95, rect.top()),
            pos2(rect.right(), rect.center().y),
            pos2(rect.left() + rect.width() * 0.95, rect.bottom()),
            pos2(rect.left() + rect.width() * 0.05, rect.bottom()),
            pos2(rect.left(), rect.center().y),
        ],
        _ => rounded_rect_points(rect, 12.0),
    }
}

/// Axis-aligned rectangle with arc-approximated corners.
fn rounded_rect_points(rect: Rect, radius: f32) -> Vec<Pos2> {
    const SEGMENTS: usize = 6;
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    let corners = [
        (pos2(rect.right() - r, rect.top() + r), -90.0),
        (pos2(rect.right() - r, rect.bottom() - r), 0.0),
        (pos2(rect.left() + r, rect.bottom() - r), 90.0),
        (pos2(rect.left() + r, rect.top() + r), 180.0),
    ];

    let mut points = Vec::with_capacity(4 * (SEGMENTS + 1));
    for (corner_center, start_degrees) in corners {
        for i in 0..=SEGMENTS {
            let angle =
                (start_degrees + 90.0 * i as f32 / SEGMENTS as f32).to_radians();
            points.push(pos2(
                corner_center.x + r * angle.cos(),
                corner_center.y + r * angle.sin(),
            ));
        }
    }
    points
}

fn base_fill(config: &PlateConfig, rect: Rect, projection: &TiltProjection) -> Fill {
    match config.color {
        PlateColor::Yellow => Fill::Solid(Color32::from_rgb(0xff, 0xd7, 0x00)),
        PlateColor::White => Fill::Solid(Color32::from_rgb(0xf3, 0xf4, 0xf6)),
        PlateColor::Black => Fill::Linear {
            from: projection.apply(rect.center_top()),
            to: projection.apply(rect.center_bottom()),
            stops: vec![
                (0.0, Color32::from_rgb(0x2a, 0x2a, 0x2a)),
                (1.0, Color32::from_rgb(0x00, 0x00, 0x00)),
            ],
        },
        PlateColor::Silver => Fill::Linear {
            from: projection.apply(rect.left_top()),
            to: projection.apply(rect.right_bottom()),
            stops: vec![
                (0.0, Color32::from_rgb(0xe0, 0xe0, 0xe0)),
                (0.5, Color32::from_rgb(0xa0, 0xa0, 0xa0)),
                (1.0, Color32::from_rgb(0xd0, 0xd0, 0xd0)),
            ],
        },
        PlateColor::Custom => Fill::Solid(parse_hex_color(&config.custom_color)),
    }
}

/// Soft blurred ellipse under the plate. Its horizontal offset and squash
/// track the current tilt, selling the lift-off illusion.
fn push_floor_shadow(
    primitives: &mut Vec<Primitive>,
    interaction: &InteractionState,
    rect: Rect,
    canvas: Vec2,
) {
    let squash = 1.0 - interaction.rotation.x.abs() / 90.0;
    let center = pos2(
        canvas.x / 2.0 - interaction.rotation.y,
        (rect.bottom() + 60.0).min(canvas.y - 10.0),
    );
    primitives.push(Primitive {
        layer: LayerKind::FloorShadow,
        shape: SceneShape::SoftEllipse {
            center,
            radius: vec2(
                rect.width() * 0.44 * interaction.scale(),
                20.0 * squash * interaction.scale(),
            ),
        },
        fill: Fill::Solid(Color32::from_black_alpha(128)),
        blend: BlendMode::Normal,
    });
}

/// Thin inner strips along the top and bottom edges, standing in for the
/// embossed bevel of a stamped plate.
fn push_bevels(primitives: &mut Vec<Primitive>, rect: Rect, projection: &TiltProjection) {
    let inset = 14.0;
    let top = Rect::from_min_max(
        pos2(rect.left() + inset, rect.top() + 2.0),
        pos2(rect.right() - inset, rect.top() + 5.0),
    );
    let bottom = Rect::from_min_max(
        pos2(rect.left() + inset, rect.bottom() - 5.0),
        pos2(rect.right() - inset, rect.bottom() - 2.0),
    );

    for (strip, color) in [
        (top, Color32::from_rgba_unmultiplied(255, 255, 255, 110)),
        (bottom, Color32::from_rgba_unmultiplied(0, 0, 0, 50)),
    ] {
        primitives.push(Primitive {
            layer: LayerKind::Bevel,
            shape: SceneShape::Polygon(projection.apply_all([
                strip.left_top(),
                strip.right_top(),
                strip.right_bottom(),
                strip.left_bottom(),
            ])),
            fill: Fill::Solid(color),
            blend: BlendMode::Normal,
        });
    }
}

fn push_badge(
    primitives: &mut Vec<Primitive>,
    config: &PlateConfig,
    rect: Rect,
    projection: &TiltProjection,
) {
    let badge = badge_outline(config.shape, rect);
    primitives.push(Primitive {
        layer: LayerKind::Badge,
        shape: SceneShape::Polygon(projection.apply_all(badge)),
        fill: Fill::Solid(Color32::from_rgb(0x1d, 0x4e, 0xd8)),
        blend: BlendMode::Normal,
    });

    let badge_center = badge_center(config.shape, rect);
    match config.flag {
        Some(PlateFlag::Uk) => {
            let size = 22.0;
            let width = glyphs::text_width("UK", size, 2.0);
            let origin = pos2(badge_center.x - width / 2.0, badge_center.y - size / 2.0);
            push_glyph_quads(
                primitives,
                LayerKind::BadgeContent,
                glyphs::layout_text("UK", origin, size, 2.0),
                Fill::Solid(Color32::WHITE),
                projection,
            );
        }
        Some(PlateFlag::Eu) => {
            primitives.push(Primitive {
                layer: LayerKind::BadgeContent,
                shape: SceneShape::Polygon(
                    projection.apply_all(star_points(badge_center, 12.0, 5.0)),
                ),
                fill: Fill::Solid(Color32::from_rgb(0xfa, 0xcc, 0x15)),
                blend: BlendMode::Normal,
            });
        }
        None => {
            // Dimmed pennant placeholder: a pole and a small triangle
            let pole_top = pos2(badge_center.x - 7.0, badge_center.y - 12.0);
            let pole_bottom = pos2(badge_center.x - 7.0, badge_center.y + 12.0);
            let dim = Color32::from_rgba_unmultiplied(255, 255, 255, 102);
            primitives.push(Primitive {
                layer: LayerKind::BadgeContent,
                shape: SceneShape::Outline {
                    points: projection.apply_all([pole_top, pole_bottom]),
                    width: 2.5,
                },
                fill: Fill::Solid(dim),
                blend: BlendMode::Normal,
            });
            primitives.push(Primitive {
                layer: LayerKind::BadgeContent,
                shape: SceneShape::Polygon(projection.apply_all([
                    pole_top,
                    pos2(badge_center.x + 9.0, badge_center.y - 7.0),
                    pos2(badge_center.x - 7.0, badge_center.y - 2.0),
                ])),
                fill: Fill::Solid(dim),
                blend: BlendMode::Normal,
            });
        }
    }
}

fn badge_outline(shape: PlateShape, rect: Rect) -> Vec<Pos2> {
    match shape {
        // Follow the pointed left edge of the hexagon
        PlateShape::Hexagonal => {
            let cut = rect.left() + rect.width() * 0.05;
            vec![
                pos2(cut, rect.top()),
                pos2(cut + BADGE_WIDTH, rect.top()),
                pos2(cut + BADGE_WIDTH, rect.bottom()),
                pos2(cut, rect.bottom()),
                pos2(rect.left(), rect.center().y),
            ]
        }
        _ => {
            let mut points = vec![
                pos2(rect.left() + BADGE_WIDTH, rect.top()),
                pos2(rect.left() + BADGE_WIDTH, rect.bottom()),
            ];
            // Rounded left corners shared with the plate silhouette
            let r = 12.0;
            const SEGMENTS: usize = 6;
            for i in 0..=SEGMENTS {
                let angle = (90.0 + 90.0 * i as f32 / SEGMENTS as f32).to_radians();
                points.push(pos2(
                    rect.left() + r + r * angle.cos(),
                    rect.bottom() - r + r * angle.sin(),
                ));
            }
            for i in 0..=SEGMENTS {
                let angle = (180.0 + 90.0 * i as f32 / SEGMENTS as f32).to_radians();
                points.push(pos2(
                    rect.left() + r + r * angle.cos(),
                    rect.top() + r + r * angle.sin(),
                ));
            }
            points
        }
    }
}

fn badge_center(shape: PlateShape, rect: Rect) -> Pos2 {
    let left = match shape {
        PlateShape::Hexagonal => rect.left() + rect.width() * 0.05,
        _ => rect.left(),
    };
    pos2(left + BADGE_WIDTH / 2.0, rect.center().y)
}

fn star_points(center: Pos2, outer: f32, inner: f32) -> Vec<Pos2> {
    let mut points = Vec::with_capacity(10);
    for i in 0..10 {
        let radius = if i % 2 == 0 { outer } else { inner };
        let angle = (-90.0 + 36.0 * i as f32).to_radians();
        points.push(pos2(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
    points
}

fn push_glyph_quads(
    primitives: &mut Vec<Primitive>,
    layer: LayerKind,
    quads: Vec<[Pos2; 4]>,
    fill: Fill,
    projection: &TiltProjection,
) {
    for quad in quads {
        primitives.push(Primitive {
            layer,
            shape: SceneShape::Polygon(projection.apply_all(quad)),
            fill: fill.clone(),
            blend: BlendMode::Normal,
        });
    }
}

fn push_text(
    primitives: &mut Vec<Primitive>,
    config: &PlateConfig,
    rect: Rect,
    projection: &TiltProjection,
) {
    let text = config.display_text();
    let treatment = text_treatment_for_style(config.style, config.color.is_dark());

    let region_left = badge_center(config.shape, rect).x + BADGE_WIDTH / 2.0 + 20.0;
    let region_right = rect.right() - 20.0;
    let region_width = (region_right - region_left).max(40.0);

    // Shrink-to-fit from the nominal plate point size
    let mut size = 64.0_f32.min(rect.height() * 0.62);
    let tracking = |s: f32| s * 0.18;
    while size > 18.0 && glyphs::text_width(text, size, tracking(size)) > region_width {
        size -= 2.0;
    }

    let width = glyphs::text_width(text, size, tracking(size));
    let origin = pos2(
        region_left + (region_width - width) / 2.0,
        rect.center().y - size / 2.0,
    );
    let quads = glyphs::layout_text(text, origin, size, tracking(size));

    // Shadow passes first, then the face
    let dark_background = config.color.is_dark();
    match treatment.shadow {
        TextShadowKind::None => {}
        TextShadowKind::Soft => push_offset_pass(
            primitives,
            &quads,
            vec2(2.0, 4.0),
            Color32::from_black_alpha(90),
            projection,
        ),
        TextShadowKind::Medium => push_offset_pass(
            primitives,
            &quads,
            vec2(0.0, 3.0),
            Color32::from_black_alpha(100),
            projection,
        ),
        TextShadowKind::Extruded => {
            let extrusion = if dark_background {
                Color32::from_gray(110)
            } else {
                Color32::from_gray(45)
            };
            for step in (1..=5).rev() {
                push_offset_pass(
                    primitives,
                    &quads,
                    vec2(step as f32 * 1.2, step as f32 * 1.4),
                    extrusion,
                    projection,
                );
            }
        }
    }

    let fill = if treatment.glossy {
        Fill::Linear {
            from: projection.apply(origin),
            to: projection.apply(pos2(origin.x, origin.y + size)),
            stops: vec![
                (0.0, lighten(treatment.color, 0.55)),
                (0.45, treatment.color),
                (1.0, darken(treatment.color, 0.25)),
            ],
        }
    } else {
        Fill::Solid(treatment.color)
    };
    push_glyph_quads(primitives, LayerKind::Text, quads, fill, projection);
}

fn push_offset_pass(
    primitives: &mut Vec<Primitive>,
    quads: &[[Pos2; 4]],
    offset: Vec2,
    color: Color32,
    projection: &TiltProjection,
) {
    for quad in quads {
        primitives.push(Primitive {
            layer: LayerKind::TextShadow,
            shape: SceneShape::Polygon(
                projection.apply_all(quad.iter().map(|p| *p + offset)),
            ),
            fill: Fill::Solid(color),
            blend: BlendMode::Normal,
        });
    }
}

fn lighten(color: Color32, amount: f32) -> Color32 {
    let mix = |c: u8| (c as f32 + (255.0 - c as f32) * amount) as u8;
    Color32::from_rgb(mix(color.r()), mix(color.g()), mix(color.b()))
}

fn darken(color: Color32, amount: f32) -> Color32 {
    let mix = |c: u8| (c as f32 * (1.0 - amount)) as u8;
    Color32::from_rgb(mix(color.r()), mix(color.g()), mix(color.b()))
}

/// Fixed diagonal gradient simulating ambient sheen; peak alpha is
/// `max(0, intensity - 0.3)` so every material keeps a faint gleam.
fn push_static_sheen(
    primitives: &mut Vec<Primitive>,
    config: &PlateConfig,
    rect: Rect,
    outline: &[Pos2],
    projection: &TiltProjection,
) {
    let peak = (config.shine_intensity - 0.3).max(0.0);
    primitives.push(Primitive {
        layer: LayerKind::StaticSheen,
        shape: SceneShape::Polygon(outline.to_vec()),
        fill: Fill::Linear {
            from: projection.apply(rect.left_top()),
            to: projection.apply(rect.center()),
            stops: vec![
                (0.0, Color32::from_white_alpha((peak * 255.0) as u8)),
                (1.0, Color32::from_white_alpha(0)),
            ],
        },
        blend: BlendMode::SoftLight,
    });
}

/// Pointer-tracking specular highlight. Only present while the pointer
/// hovers the surface; pressing boosts the peak alpha by 0.2.
fn push_dynamic_shine(
    primitives: &mut Vec<Primitive>,
    config: &PlateConfig,
    interaction: &InteractionState,
    rect: Rect,
    outline: &[Pos2],
    projection: &TiltProjection,
) {
    if interaction.shine.opacity <= 0.0 {
        return;
    }

    let params = shine_params_for_style(config.style);
    let mut peak = config.shine_intensity;
    if interaction.is_pressed {
        peak += 0.2;
    }
    let alpha = (peak * interaction.shine.opacity).clamp(0.0, 1.0);

    let center = pos2(
        rect.left() + rect.width() * interaction.shine.x / 100.0,
        rect.top() + rect.height() * interaction.shine.y / 100.0,
    );

    primitives.push(Primitive {
        layer: LayerKind::DynamicShine,
        shape: SceneShape::Polygon(outline.to_vec()),
        fill: Fill::Radial {
            center: projection.apply(center),
            radius: params.size * rect.width() * interaction.scale(),
            inner: Color32::from_white_alpha((alpha * 255.0) as u8),
            outer: Color32::from_white_alpha(0),
        },
        blend: params.blend,
    });
}

/// Export-only watermark: a tilted, translucent panel across the canvas
/// center carrying the studio handle.
fn push_watermark(primitives: &mut Vec<Primitive>, canvas: Vec2) {
    let center = pos2(canvas.x / 2.0, canvas.y / 2.0);
    let angle = (-12.0_f32).to_radians();

    let size = 44.0;
    let tracking = size * 0.22;
    let text_width = glyphs::text_width(WATERMARK_TEXT, size, tracking);
    let half = vec2(text_width / 2.0 + 30.0, size / 2.0 + 26.0);

    let rotate = |p: Pos2| -> Pos2 {
        let d = p - center;
        pos2(
            center.x + d.x * angle.cos() - d.y * angle.sin(),
            center.y + d.x * angle.sin() + d.y * angle.cos(),
        )
    };

    let corners: Vec<Pos2> = [
        pos2(center.x - half.x, center.y - half.y),
        pos2(center.x + half.x, center.y - half.y),
        pos2(center.x + half.x, center.y + half.y),
        pos2(center.x - half.x, center.y + half.y),
    ]
    .into_iter()
    .map(rotate)
    .collect();

    primitives.push(Primitive {
        layer: LayerKind::Watermark,
        shape: SceneShape::Polygon(corners.clone()),
        fill: Fill::Solid(Color32::from_rgba_unmultiplied(0, 0, 0, 77)),
        blend: BlendMode::Normal,
    });
    primitives.push(Primitive {
        layer: LayerKind::Watermark,
        shape: SceneShape::Outline {
            points: corners,
            width: 4.0,
        },
        fill: Fill::Solid(Color32::from_rgba_unmultiplied(255, 255, 255, 51)),
        blend: BlendMode::Normal,
    });

    let origin = pos2(center.x - text_width / 2.0, center.y - size / 2.0);
    for quad in glyphs::layout_text(WATERMARK_TEXT, origin, size, tracking) {
        primitives.push(Primitive {
            layer: LayerKind::Watermark,
            shape: SceneShape::Polygon(quad.iter().map(|p| rotate(*p)).collect()),
            fill: Fill::Solid(Color32::from_rgba_unmultiplied(255, 255, 255, 102)),
            blend: BlendMode::Normal,
        });
    }
}

/// Export-only QR panel in the lower-left corner, pointing back at the
/// studio site.
fn push_qr_overlay(primitives: &mut Vec<Primitive>, canvas: Vec2) {
    let qr_side = 80.0;
    let padding = 6.0;
    let caption_size = 9.0;
    let panel = Rect::from_min_size(
        pos2(16.0, canvas.y - 16.0 - qr_side - caption_size - 3.0 * padding),
        vec2(
            qr_side + 2.0 * padding,
            qr_side + caption_size + 3.0 * padding,
        ),
    );

    primitives.push(Primitive {
        layer: LayerKind::QrOverlay,
        shape: SceneShape::Polygon(rounded_rect_points(panel, 6.0)),
        fill: Fill::Solid(Color32::WHITE),
        blend: BlendMode::Normal,
    });
    primitives.push(Primitive {
        layer: LayerKind::QrOverlay,
        shape: SceneShape::QrCode {
            rect: Rect::from_min_size(
                panel.min + vec2(padding, padding),
                vec2(qr_side, qr_side),
            ),
            data: QR_URL.to_string(),
        },
        fill: Fill::Solid(Color32::BLACK),
        blend: BlendMode::Normal,
    });

    let caption_width = glyphs::text_width(QR_CAPTION, caption_size, 1.0);
    let origin = pos2(
        panel.center().x - caption_width / 2.0,
        panel.bottom() - padding - caption_size,
    );
    for quad in glyphs::layout_text(QR_CAPTION, origin, caption_size, 1.0) {
        primitives.push(Primitive {
            layer: LayerKind::QrOverlay,
            shape: SceneShape::Polygon(quad.to_vec()),
            fill: Fill::Solid(Color32::BLACK),
            blend: BlendMode::Normal,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plate::PlateStyle;

    fn scene(mode: RenderMode) -> PlateScene {
        build_scene(
            &PlateConfig::new(),
            &InteractionState::new(),
            mode,
            EXPORT_CANVAS,
        )
    }

    #[test]
    fn test_interactive_scene_has_no_export_overlays() {
        let scene = scene(RenderMode::Interactive);
        assert!(!scene.has_layer(LayerKind::Watermark));
        assert!(!scene.has_layer(LayerKind::QrOverlay));
        assert!(scene.has_layer(LayerKind::Base));
        assert!(scene.has_layer(LayerKind::FloorShadow));
        assert!(scene.has_layer(LayerKind::StaticSheen));
    }

    #[test]
    fn test_export_scene_carries_watermark_and_qr() {
        let scene = scene(RenderMode::Export);
        assert!(scene.has_layer(LayerKind::Watermark));
        assert!(scene.has_layer(LayerKind::QrOverlay));
        let qr_data = scene.primitives.iter().find_map(|p| match &p.shape {
            SceneShape::QrCode { data, .. } => Some(data.clone()),
            _ => None,
        });
        assert_eq!(qr_data.as_deref(), Some(QR_URL));
    }

    #[test]
    fn test_custom_color_round_trips_into_base_fill() {
        let mut config = PlateConfig::new();
        config.set_color(PlateColor::Custom);
        config.set_custom_color("#00ff7f");
        let scene = build_scene(
            &config,
            &InteractionState::new(),
            RenderMode::Interactive,
            EXPORT_CANVAS,
        );
        match scene.base_fill() {
            Some(Fill::Solid(color)) => {
                assert_eq!(*color, Color32::from_rgb(0x00, 0xff, 0x7f));
            }
            other => panic!("expected solid custom fill, got {other:?}"),
        }
    }

    #[test]
    fn test_dynamic_shine_requires_hover() {
        let config = PlateConfig::new();
        let mut interaction = InteractionState::new();
        let idle = build_scene(&config, &interaction, RenderMode::Interactive, EXPORT_CANVAS);
        assert!(!idle.has_layer(LayerKind::DynamicShine));

        interaction.pointer_move(100.0, 80.0, 900.0, 450.0);
        let hovering =
            build_scene(&config, &interaction, RenderMode::Interactive, EXPORT_CANVAS);
        assert!(hovering.has_layer(LayerKind::DynamicShine));

        interaction.pointer_leave();
        let left = build_scene(&config, &interaction, RenderMode::Interactive, EXPORT_CANVAS);
        assert!(!left.has_layer(LayerKind::DynamicShine));
    }

    #[test]
    fn test_shine_blend_follows_style_policy() {
        let mut config = PlateConfig::new();
        config.set_style(PlateStyle::Simple);
        let mut interaction = InteractionState::new();
        interaction.pointer_move(450.0, 225.0, 900.0, 450.0);
        let scene =
            build_scene(&config, &interaction, RenderMode::Interactive, EXPORT_CANVAS);
        let shine = scene
            .primitives
            .iter()
            .find(|p| p.layer == LayerKind::DynamicShine)
            .expect("hovering scene must carry the dynamic shine");
        assert_eq!(shine.blend, BlendMode::Screen);
    }

    #[test]
    fn test_border_layer_tracks_config() {
        let mut config = PlateConfig::new();
        config.set_border(false);
        let scene = build_scene(
            &config,
            &InteractionState::new(),
            RenderMode::Interactive,
            EXPORT_CANVAS,
        );
        assert!(!scene.has_layer(LayerKind::Border));

        config.set_border(true);
        let scene = build_scene(
            &config,
            &InteractionState::new(),
            RenderMode::Interactive,
            EXPORT_CANVAS,
        );
        assert!(scene.has_layer(LayerKind::Border));
    }

    #[test]
    fn test_hexagonal_outline_has_six_points() {
        let mut config = PlateConfig::new();
        config.set_shape(PlateShape::Hexagonal);
        let scene = build_scene(
            &config,
            &InteractionState::new(),
            RenderMode::Interactive,
            EXPORT_CANVAS,
        );
        let base = scene
            .primitives
            .iter()
            .find(|p| p.layer == LayerKind::Base)
            .expect("scene always has a base surface");
        match &base.shape {
            SceneShape::Polygon(points) => assert_eq!(points.len(), 6),
            other => panic!("expected polygon base, got {other:?}"),
        }
    }

    #[test]
    fn test_badge_placeholder_when_no_flag() {
        let mut config = PlateConfig::new();
        config.set_flag(None);
        let scene = build_scene(
            &config,
            &InteractionState::new(),
            RenderMode::Interactive,
            EXPORT_CANVAS,
        );
        assert!(scene.has_layer(LayerKind::Badge));
        assert!(scene.has_layer(LayerKind::BadgeContent));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#112233"), Color32::from_rgb(0x11, 0x22, 0x33));
        assert_eq!(parse_hex_color("a0b1c2"), Color32::from_rgb(0xa0, 0xb1, 0xc2));
        // Malformed input falls back to plate yellow
        assert_eq!(parse_hex_color("#12"), Color32::from_rgb(0xff, 0xd7, 0x00));
    }

    #[test]
    fn test_neutral_projection_keeps_plate_centered() {
        let scene = scene(RenderMode::Interactive);
        let base = scene
            .primitives
            .iter()
            .find(|p| p.layer == LayerKind::Base)
            .expect("scene always has a base surface");
        if let SceneShape::Polygon(points) = &base.shape {
            let cx = points.iter().map(|p| p.x).sum::<f32>() / points.len() as f32;
            assert!((cx - EXPORT_CANVAS.x / 2.0).abs() < 1.0);
        }
    }
}
