//! egui painter backend for the live preview.
//!
//! Realizes a `PlateScene` on an `egui::Painter`. Gradients become
//! vertex-colored meshes, the radial highlight a triangle-fan disc, and
//! the blend modes collapse to alpha compositing (the export rasterizer
//! carries the exact arithmetic).

use egui::{pos2, Color32, Mesh, Painter, Pos2, Rect, Rgba, Shape, Stroke, Vec2};

use crate::compositor::scene::{Fill, PlateScene, SceneShape};

/// Paint `scene` with its canvas origin at `origin` (screen space).
pub fn paint_scene(painter: &Painter, origin: Pos2, scene: &PlateScene) {
    let offset = origin.to_vec2();
    for primitive in &scene.primitives {
        match &primitive.shape {
            SceneShape::Polygon(points) => {
                let shifted: Vec<Pos2> = points.iter().map(|p| *p + offset).collect();
                match &primitive.fill {
                    Fill::Radial { .. } => {
                        paint_radial(painter, &shifted, &primitive.fill, offset);
                    }
                    fill => fill_polygon(painter, &shifted, fill, offset),
                }
            }
            SceneShape::Outline { points, width } => {
                let shifted: Vec<Pos2> = points.iter().map(|p| *p + offset).collect();
                let color = solid_color(&primitive.fill);
                let stroke = Stroke::new(*width, color);
                if shifted.len() == 2 {
                    painter.add(Shape::line(shifted, stroke));
                } else {
                    painter.add(Shape::closed_line(shifted, stroke));
                }
            }
            SceneShape::SoftEllipse { center, radius } => {
                paint_soft_ellipse(painter, *center + offset, *radius, solid_color(&primitive.fill));
            }
            // QR overlays only exist in export scenes; if one ever reaches
            // the live painter, show the panel outline instead of modules
            SceneShape::QrCode { rect, .. } => {
                painter.rect_filled(rect.translate(offset), 2.0, Color32::from_gray(220));
            }
        }
    }
}

fn solid_color(fill: &Fill) -> Color32 {
    match fill {
        Fill::Solid(color) => *color,
        Fill::Linear { stops, .. } => stops.first().map(|s| s.1).unwrap_or(Color32::TRANSPARENT),
        Fill::Radial { inner, .. } => *inner,
    }
}

/// Fan-triangulate a convex or star-shaped polygon around its centroid,
/// evaluating the fill at every vertex.
fn fill_polygon(painter: &Painter, points: &[Pos2], fill: &Fill, offset: Vec2) {
    if points.len() < 3 {
        return;
    }

    let centroid = centroid(points);
    let mut mesh = Mesh::default();
    mesh.colored_vertex(centroid, color_at(fill, centroid - offset));
    for p in points {
        mesh.colored_vertex(*p, color_at(fill, *p - offset));
    }
    let n = points.len() as u32;
    for i in 0..n {
        mesh.add_triangle(0, 1 + i, 1 + (i + 1) % n);
    }
    painter.add(Shape::mesh(mesh));
}

/// Radial highlight: a triangle-fan disc fading to transparent at the
/// rim, clipped to the plate's bounding box.
fn paint_radial(painter: &Painter, clip_to: &[Pos2], fill: &Fill, offset: Vec2) {
    let Fill::Radial {
        center,
        radius,
        inner,
        outer,
    } = fill
    else {
        return;
    };

    let Some(clip) = bounding_box(clip_to) else {
        return;
    };
    let painter = painter.with_clip_rect(clip.intersect(painter.clip_rect()));

    const SEGMENTS: usize = 32;
    let center = *center + offset;
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, *inner);
    for i in 0..=SEGMENTS {
        let angle = std::f32::consts::TAU * i as f32 / SEGMENTS as f32;
        mesh.colored_vertex(
            pos2(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ),
            *outer,
        );
    }
    for i in 0..SEGMENTS as u32 {
        mesh.add_triangle(0, 1 + i, 2 + i);
    }
    painter.add(Shape::mesh(mesh));
}

fn paint_soft_ellipse(painter: &Painter, center: Pos2, radius: Vec2, color: Color32) {
    const SEGMENTS: usize = 32;
    let mut mesh = Mesh::default();
    mesh.colored_vertex(center, color);
    let rim = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 0);
    for i in 0..=SEGMENTS {
        let angle = std::f32::consts::TAU * i as f32 / SEGMENTS as f32;
        mesh.colored_vertex(
            pos2(
                center.x + radius.x * angle.cos(),
                center.y + radius.y * angle.sin(),
            ),
            rim,
        );
    }
    for i in 0..SEGMENTS as u32 {
        mesh.add_triangle(0, 1 + i, 2 + i);
    }
    painter.add(Shape::mesh(mesh));
}

fn centroid(points: &[Pos2]) -> Pos2 {
    let mut x = 0.0;
    let mut y = 0.0;
    for p in points {
        x += p.x;
        y += p.y;
    }
    pos2(x / points.len() as f32, y / points.len() as f32)
}

fn bounding_box(points: &[Pos2]) -> Option<Rect> {
    let first = points.first()?;
    let mut rect = Rect::from_min_max(*first, *first);
    for p in points {
        rect.extend_with(*p);
    }
    Some(rect)
}

/// Evaluate a fill at a canvas-space point.
fn color_at(fill: &Fill, p: Pos2) -> Color32 {
    match fill {
        Fill::Solid(color) => *color,
        Fill::Linear { from, to, stops } => {
            let axis = *to - *from;
            let len_sq = axis.length_sq().max(f32::EPSILON);
            let t = ((p - *from).dot(axis) / len_sq).clamp(0.0, 1.0);
            stops_at(stops, t)
        }
        Fill::Radial {
            center,
            radius,
            inner,
            outer,
        } => {
            let t = ((p - *center).length() / radius.max(f32::EPSILON)).clamp(0.0, 1.0);
            lerp_color(*inner, *outer, t)
        }
    }
}

fn stops_at(stops: &[(f32, Color32)], t: f32) -> Color32 {
    let Some(first) = stops.first() else {
        return Color32::TRANSPARENT;
    };
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let span = (t1 - t0).max(f32::EPSILON);
            return lerp_color(c0, c1, (t - t0) / span);
        }
    }
    stops[stops.len() - 1].1
}

fn lerp_color(a: Color32, b: Color32, t: f32) -> Color32 {
    let a = Rgba::from(a);
    let b = Rgba::from(b);
    let mixed = a + (b + a * -1.0) * t;
    mixed.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_of_square() {
        let square = vec![
            pos2(0.0, 0.0),
            pos2(4.0, 0.0),
            pos2(4.0, 4.0),
            pos2(0.0, 4.0),
        ];
        assert_eq!(centroid(&square), pos2(2.0, 2.0));
    }

    #[test]
    fn test_stops_clamp_to_ends() {
        let stops = vec![
            (0.0, Color32::from_rgb(10, 20, 30)),
            (1.0, Color32::from_rgb(200, 100, 0)),
        ];
        assert_eq!(stops_at(&stops, -0.5), Color32::from_rgb(10, 20, 30));
        assert_eq!(stops_at(&stops, 1.5), Color32::from_rgb(200, 100, 0));
    }

    #[test]
    fn test_solid_color_for_each_fill() {
        assert_eq!(solid_color(&Fill::Solid(Color32::RED)), Color32::RED);
        let linear = Fill::Linear {
            from: pos2(0.0, 0.0),
            to: pos2(1.0, 0.0),
            stops: vec![(0.0, Color32::GREEN), (1.0, Color32::BLUE)],
        };
        assert_eq!(solid_color(&linear), Color32::GREEN);
    }
}
