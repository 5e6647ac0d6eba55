//! Software rasterizer for scene export.
//!
//! Draws a `PlateScene` into an `image::RgbaImage` with exact per-pixel
//! gradient evaluation and real Screen / Overlay / Soft-Light blend
//! arithmetic. This is the export path; the interactive view uses the
//! egui painter backend instead.

use egui::{Color32, Pos2, Rect};
use image::{ImageBuffer, Rgba, RgbaImage};
use qrcode::{EcLevel, QrCode};

use crate::compositor::scene::{Fill, PlateScene, Primitive, SceneShape};
use crate::plate::BlendMode;

/// Rasterize the scene at `pixel_ratio` times its logical size onto a
/// transparent background.
pub fn rasterize(scene: &PlateScene, pixel_ratio: f32) -> RgbaImage {
    let width = (scene.canvas.x * pixel_ratio).round().max(1.0) as u32;
    let height = (scene.canvas.y * pixel_ratio).round().max(1.0) as u32;
    let mut img: RgbaImage = ImageBuffer::new(width, height);

    for primitive in &scene.primitives {
        draw_primitive(&mut img, primitive, pixel_ratio);
    }

    img
}

fn draw_primitive(img: &mut RgbaImage, primitive: &Primitive, ratio: f32) {
    let scale = |p: &Pos2| Pos2::new(p.x * ratio, p.y * ratio);
    match &primitive.shape {
        SceneShape::Polygon(points) => {
            let scaled: Vec<Pos2> = points.iter().map(scale).collect();
            fill_polygon(img, &scaled, &primitive.fill, primitive.blend, ratio);
        }
        SceneShape::Outline { points, width } => {
            let scaled: Vec<Pos2> = points.iter().map(scale).collect();
            stroke_polyline(img, &scaled, width * ratio, &primitive.fill, primitive.blend);
        }
        SceneShape::SoftEllipse { center, radius } => {
            soft_ellipse(
                img,
                scale(center),
                radius.x * ratio,
                radius.y * ratio,
                &primitive.fill,
                primitive.blend,
            );
        }
        SceneShape::QrCode { rect, data } => {
            draw_qr(img, *rect, data, ratio);
        }
    }
}

fn bounding_box(points: &[Pos2]) -> Option<Rect> {
    let first = points.first()?;
    let mut rect = Rect::from_min_max(*first, *first);
    for p in points {
        rect.extend_with(*p);
    }
    Some(rect)
}

fn fill_polygon(img: &mut RgbaImage, points: &[Pos2], fill: &Fill, blend: BlendMode, ratio: f32) {
    let Some(bbox) = bounding_box(points) else {
        return;
    };

    let x0 = bbox.left().floor().max(0.0) as u32;
    let y0 = bbox.top().floor().max(0.0) as u32;
    let x1 = (bbox.right().ceil() as u32).min(img.width().saturating_sub(1));
    let y1 = (bbox.bottom().ceil() as u32).min(img.height().saturating_sub(1));

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            if point_in_polygon(p, points) {
                let src = eval_fill(fill, Pos2::new(p.x / ratio, p.y / ratio));
                if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
                    composite(pixel, src, blend);
                }
            }
        }
    }
}

/// Even-odd ray cast; robust enough for the convex and star-shaped
/// polygons the compositor emits.
fn point_in_polygon(p: Pos2, points: &[Pos2]) -> bool {
    let mut inside = false;
    let n = points.len();
    let mut j = n - 1;
    for i in 0..n {
        let a = points[i];
        let b = points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn stroke_polyline(img: &mut RgbaImage, points: &[Pos2], width: f32, fill: &Fill, blend: BlendMode) {
    if points.len() < 2 {
        return;
    }
    let Some(bbox) = bounding_box(points) else {
        return;
    };
    let half = width / 2.0;

    let x0 = (bbox.left() - half).floor().max(0.0) as u32;
    let y0 = (bbox.top() - half).floor().max(0.0) as u32;
    let x1 = ((bbox.right() + half).ceil() as u32).min(img.width().saturating_sub(1));
    let y1 = ((bbox.bottom() + half).ceil() as u32).min(img.height().saturating_sub(1));

    // Closed ring when more than two points, open segment otherwise
    let segment_count = if points.len() == 2 {
        1
    } else {
        points.len()
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            let mut hit = false;
            for i in 0..segment_count {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                if distance_to_segment(p, a, b) <= half {
                    hit = true;
                    break;
                }
            }
            if hit {
                let src = eval_fill(fill, p);
                if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
                    composite(pixel, src, blend);
                }
            }
        }
    }
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Ellipse with a smooth quadratic alpha falloff toward the rim, standing
/// in for the blurred floor shadow.
fn soft_ellipse(img: &mut RgbaImage, center: Pos2, rx: f32, ry: f32, fill: &Fill, blend: BlendMode) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let x0 = (center.x - rx).floor().max(0.0) as u32;
    let y0 = (center.y - ry).floor().max(0.0) as u32;
    let x1 = ((center.x + rx).ceil() as u32).min(img.width().saturating_sub(1));
    let y1 = ((center.y + ry).ceil() as u32).min(img.height().saturating_sub(1));

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = (x as f32 + 0.5 - center.x) / rx;
            let dy = (y as f32 + 0.5 - center.y) / ry;
            let d = (dx * dx + dy * dy).sqrt();
            if d < 1.0 {
                let falloff = (1.0 - d) * (1.0 - d);
                let mut src = eval_fill(fill, Pos2::new(x as f32, y as f32));
                src[3] *= falloff;
                if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
                    composite(pixel, src, blend);
                }
            }
        }
    }
}

fn draw_qr(img: &mut RgbaImage, rect: Rect, data: &str, ratio: f32) {
    let code = match QrCode::with_error_correction_level(data, EcLevel::M) {
        Ok(code) => code,
        Err(err) => {
            log::warn!("QR generation failed: {err}");
            return;
        }
    };

    let modules = code.width();
    let scaled = Rect::from_min_max(
        Pos2::new(rect.min.x * ratio, rect.min.y * ratio),
        Pos2::new(rect.max.x * ratio, rect.max.y * ratio),
    );
    let module_size = scaled.width() / modules as f32;

    for my in 0..modules {
        for mx in 0..modules {
            let dark = code[(mx, my)] == qrcode::Color::Dark;
            let color: [f32; 4] = if dark {
                [0.0, 0.0, 0.0, 1.0]
            } else {
                [1.0, 1.0, 1.0, 1.0]
            };
            let px0 = (scaled.left() + mx as f32 * module_size).floor().max(0.0) as u32;
            let py0 = (scaled.top() + my as f32 * module_size).floor().max(0.0) as u32;
            let px1 = ((scaled.left() + (mx + 1) as f32 * module_size).ceil() as u32)
                .min(img.width().saturating_sub(1));
            let py1 = ((scaled.top() + (my + 1) as f32 * module_size).ceil() as u32)
                .min(img.height().saturating_sub(1));
            for y in py0..py1 {
                for x in px0..px1 {
                    if let Some(pixel) = img.get_pixel_mut_checked(x, y) {
                        composite(pixel, color, BlendMode::Normal);
                    }
                }
            }
        }
    }
}

/// Evaluate a fill at a point in logical canvas coordinates, returning
/// straight (non-premultiplied) rgba in [0, 1].
fn eval_fill(fill: &Fill, p: Pos2) -> [f32; 4] {
    match fill {
        Fill::Solid(color) => unmultiplied(*color),
        Fill::Linear { from, to, stops } => {
            let axis = *to - *from;
            let len_sq = axis.length_sq().max(f32::EPSILON);
            let t = ((p - *from).dot(axis) / len_sq).clamp(0.0, 1.0);
            eval_stops(stops, t)
        }
        Fill::Radial {
            center,
            radius,
            inner,
            outer,
        } => {
            let t = ((p - *center).length() / radius.max(f32::EPSILON)).clamp(0.0, 1.0);
            mix(unmultiplied(*inner), unmultiplied(*outer), t)
        }
    }
}

fn eval_stops(stops: &[(f32, Color32)], t: f32) -> [f32; 4] {
    if stops.is_empty() {
        return [0.0; 4];
    }
    if t <= stops[0].0 {
        return unmultiplied(stops[0].1);
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let span = (t1 - t0).max(f32::EPSILON);
            return mix(unmultiplied(c0), unmultiplied(c1), (t - t0) / span);
        }
    }
    unmultiplied(stops[stops.len() - 1].1)
}

fn mix(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
        a[3] + (b[3] - a[3]) * t,
    ]
}

/// Color32 stores premultiplied components; recover straight rgba.
fn unmultiplied(color: Color32) -> [f32; 4] {
    let a = color.a() as f32 / 255.0;
    if a <= 0.0 {
        return [0.0, 0.0, 0.0, 0.0];
    }
    [
        (color.r() as f32 / 255.0) / a,
        (color.g() as f32 / 255.0) / a,
        (color.b() as f32 / 255.0) / a,
        a,
    ]
}

/// Separable blend of one straight-alpha source pixel over the
/// destination, using the standard W3C compositing definitions.
fn composite(dst: &mut Rgba<u8>, src: [f32; 4], blend: BlendMode) {
    let sa = src[3].clamp(0.0, 1.0);
    if sa <= 0.0 {
        return;
    }

    let da = dst[3] as f32 / 255.0;
    let d = [
        dst[0] as f32 / 255.0,
        dst[1] as f32 / 255.0,
        dst[2] as f32 / 255.0,
    ];

    let mut blended = [0.0_f32; 3];
    for i in 0..3 {
        let s = src[i].clamp(0.0, 1.0);
        let b = match blend {
            BlendMode::Normal => s,
            BlendMode::Screen => 1.0 - (1.0 - s) * (1.0 - d[i]),
            BlendMode::Overlay => {
                if d[i] <= 0.5 {
                    2.0 * s * d[i]
                } else {
                    1.0 - 2.0 * (1.0 - s) * (1.0 - d[i])
                }
            }
            BlendMode::SoftLight => {
                if s <= 0.5 {
                    d[i] - (1.0 - 2.0 * s) * d[i] * (1.0 - d[i])
                } else {
                    let dd = if d[i] <= 0.25 {
                        ((16.0 * d[i] - 12.0) * d[i] + 4.0) * d[i]
                    } else {
                        d[i].sqrt()
                    };
                    d[i] + (2.0 * s - 1.0) * (dd - d[i])
                }
            }
        };
        // Blend modes only apply where the destination is opaque;
        // over transparent areas the source passes through unchanged
        let mixed = b * da + src[i].clamp(0.0, 1.0) * (1.0 - da);
        blended[i] = mixed;
    }

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for i in 0..3 {
        let out = (blended[i] * sa + d[i] * da * (1.0 - sa)) / out_a;
        dst[i] = (out.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    dst[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::scene::{
        build_scene, Fill, LayerKind, RenderMode, EXPORT_CANVAS, EXPORT_PIXEL_RATIO,
    };
    use crate::interaction::InteractionState;
    use crate::plate::{PlateColor, PlateConfig};
    use egui::pos2;

    #[test]
    fn test_screen_blend_extremes() {
        // White screened over anything is white
        let mut px = Rgba([40, 80, 120, 255]);
        composite(&mut px, [1.0, 1.0, 1.0, 1.0], BlendMode::Screen);
        assert_eq!(px, Rgba([255, 255, 255, 255]));

        // Black screened over a color leaves it unchanged
        let mut px = Rgba([40, 80, 120, 255]);
        composite(&mut px, [0.0, 0.0, 0.0, 1.0], BlendMode::Screen);
        assert_eq!(px, Rgba([40, 80, 120, 255]));
    }

    #[test]
    fn test_overlay_blend_extremes() {
        // Overlay over black stays black, over white stays white
        let mut black = Rgba([0, 0, 0, 255]);
        composite(&mut black, [0.7, 0.7, 0.7, 1.0], BlendMode::Overlay);
        assert_eq!(black, Rgba([0, 0, 0, 255]));

        let mut white = Rgba([255, 255, 255, 255]);
        composite(&mut white, [0.3, 0.3, 0.3, 1.0], BlendMode::Overlay);
        assert_eq!(white, Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_soft_light_is_identity_at_half_gray_source() {
        let mut px = Rgba([90, 160, 210, 255]);
        composite(&mut px, [0.5, 0.5, 0.5, 1.0], BlendMode::SoftLight);
        assert_eq!(px, Rgba([90, 160, 210, 255]));
    }

    #[test]
    fn test_normal_composite_respects_source_alpha() {
        let mut px = Rgba([0, 0, 0, 255]);
        composite(&mut px, [1.0, 1.0, 1.0, 0.5], BlendMode::Normal);
        assert_eq!(px[3], 255);
        assert!(px[0] > 120 && px[0] < 135);
    }

    #[test]
    fn test_point_in_polygon() {
        let square = vec![
            pos2(0.0, 0.0),
            pos2(10.0, 0.0),
            pos2(10.0, 10.0),
            pos2(0.0, 10.0),
        ];
        assert!(point_in_polygon(pos2(5.0, 5.0), &square));
        assert!(!point_in_polygon(pos2(15.0, 5.0), &square));
        assert!(!point_in_polygon(pos2(5.0, -1.0), &square));
    }

    #[test]
    fn test_custom_fill_reaches_exported_pixels() {
        let mut config = PlateConfig::new();
        config.set_color(PlateColor::Custom);
        config.set_custom_color("#00ff7f");
        config.set_border(false);
        config.set_shine_intensity(0.0);

        let scene = build_scene(
            &config,
            &InteractionState::new(),
            RenderMode::Interactive,
            EXPORT_CANVAS,
        );
        let img = rasterize(&scene, EXPORT_PIXEL_RATIO);

        // Sample the gap between the badge strip and the first glyph,
        // vertically centered on the plate
        let px = img.get_pixel(
            (255.0 * EXPORT_PIXEL_RATIO) as u32,
            (EXPORT_CANVAS.y * EXPORT_PIXEL_RATIO / 2.0) as u32,
        );
        assert_eq!((px[0], px[1], px[2]), (0x00, 0xff, 0x7f));
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_background_stays_transparent() {
        let scene = build_scene(
            &PlateConfig::new(),
            &InteractionState::new(),
            RenderMode::Interactive,
            EXPORT_CANVAS,
        );
        let img = rasterize(&scene, 1.0);
        // The extreme corner is outside every layer
        assert_eq!(img.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_export_render_includes_qr_modules() {
        let scene = build_scene(
            &PlateConfig::new(),
            &InteractionState::new(),
            RenderMode::Export,
            EXPORT_CANVAS,
        );
        assert!(scene.has_layer(LayerKind::QrOverlay));
        let img = rasterize(&scene, 1.0);

        // The QR panel sits in the lower-left corner; finder patterns
        // guarantee both dark and light modules
        let mut dark = 0;
        let mut light = 0;
        for y in (EXPORT_CANVAS.y as u32 - 110)..(EXPORT_CANVAS.y as u32 - 30) {
            for x in 22..102 {
                let px = img.get_pixel(x, y);
                if px[3] == 255 {
                    if px[0] < 40 {
                        dark += 1;
                    } else if px[0] > 220 {
                        light += 1;
                    }
                }
            }
        }
        assert!(dark > 100, "expected dark QR modules, found {dark}");
        assert!(light > 100, "expected light QR modules, found {light}");
    }

    #[test]
    fn test_gradient_stops_interpolate() {
        let fill = Fill::Linear {
            from: pos2(0.0, 0.0),
            to: pos2(0.0, 100.0),
            stops: vec![
                (0.0, Color32::from_rgb(0, 0, 0)),
                (1.0, Color32::from_rgb(200, 100, 50)),
            ],
        };
        let mid = eval_fill(&fill, pos2(0.0, 50.0));
        assert!((mid[0] - 100.0 / 255.0).abs() < 0.02);
        assert!((mid[1] - 50.0 / 255.0).abs() < 0.02);
        let top = eval_fill(&fill, pos2(0.0, -10.0));
        assert_eq!(top[0], 0.0);
    }
}
