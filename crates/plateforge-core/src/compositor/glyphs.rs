//! Stroke-based plate letterforms.
//!
//! Registration text is not set in a vector font: both render backends
//! draw the same blocky, DIN-like skeleton glyphs, so the live preview
//! and the exported bitmap carry identical letterforms. Each glyph is a
//! set of polyline strokes in a unit cell (x in [0, 0.7], y in [0, 1],
//! y down); strokes are expanded into quads at layout time.

use egui::{pos2, vec2, Pos2};

/// Glyph cell width in em units (the cell height is 1 em).
pub const GLYPH_WIDTH: f32 = 0.7;

/// Stroke thickness in em units.
pub const STROKE_WEIGHT: f32 = 0.14;

type Strokes = &'static [&'static [(f32, f32)]];

fn strokes(ch: char) -> Strokes {
    match ch {
        'A' => &[&[(0.0, 1.0), (0.35, 0.0), (0.7, 1.0)], &[(0.15, 0.62), (0.55, 0.62)]],
        'B' => &[
            &[(0.0, 0.0), (0.0, 1.0)],
            &[(0.0, 0.0), (0.55, 0.0), (0.65, 0.12), (0.55, 0.48), (0.0, 0.48)],
            &[(0.55, 0.48), (0.7, 0.62), (0.7, 0.86), (0.55, 1.0), (0.0, 1.0)],
        ],
        'C' => &[&[(0.7, 0.08), (0.12, 0.08), (0.0, 0.25), (0.0, 0.75), (0.12, 0.92), (0.7, 0.92)]],
        'D' => &[&[(0.0, 0.0), (0.45, 0.0), (0.7, 0.25), (0.7, 0.75), (0.45, 1.0), (0.0, 1.0), (0.0, 0.0)]],
        'E' => &[&[(0.7, 0.0), (0.0, 0.0), (0.0, 1.0), (0.7, 1.0)], &[(0.0, 0.5), (0.5, 0.5)]],
        'F' => &[&[(0.7, 0.0), (0.0, 0.0), (0.0, 1.0)], &[(0.0, 0.5), (0.5, 0.5)]],
        'G' => &[&[
            (0.7, 0.08),
            (0.12, 0.08),
            (0.0, 0.25),
            (0.0, 0.75),
            (0.12, 0.92),
            (0.7, 0.92),
            (0.7, 0.55),
            (0.42, 0.55),
        ]],
        'H' => &[&[(0.0, 0.0), (0.0, 1.0)], &[(0.7, 0.0), (0.7, 1.0)], &[(0.0, 0.5), (0.7, 0.5)]],
        'I' => &[&[(0.35, 0.0), (0.35, 1.0)], &[(0.12, 0.0), (0.58, 0.0)], &[(0.12, 1.0), (0.58, 1.0)]],
        'J' => &[&[(0.7, 0.0), (0.7, 0.82), (0.52, 1.0), (0.18, 1.0), (0.0, 0.82)]],
        'K' => &[&[(0.0, 0.0), (0.0, 1.0)], &[(0.7, 0.0), (0.0, 0.52), (0.7, 1.0)]],
        'L' => &[&[(0.0, 0.0), (0.0, 1.0), (0.7, 1.0)]],
        'M' => &[&[(0.0, 1.0), (0.0, 0.0), (0.35, 0.5), (0.7, 0.0), (0.7, 1.0)]],
        'N' => &[&[(0.0, 1.0), (0.0, 0.0), (0.7, 1.0), (0.7, 0.0)]],
        'O' => &[&[
            (0.12, 0.0),
            (0.58, 0.0),
            (0.7, 0.18),
            (0.7, 0.82),
            (0.58, 1.0),
            (0.12, 1.0),
            (0.0, 0.82),
            (0.0, 0.18),
            (0.12, 0.0),
        ]],
        'P' => &[&[(0.0, 1.0), (0.0, 0.0), (0.58, 0.0), (0.7, 0.14), (0.7, 0.34), (0.58, 0.48), (0.0, 0.48)]],
        'Q' => &[
            &[
                (0.12, 0.0),
                (0.58, 0.0),
                (0.7, 0.18),
                (0.7, 0.82),
                (0.58, 1.0),
                (0.12, 1.0),
                (0.0, 0.82),
                (0.0, 0.18),
                (0.12, 0.0),
            ],
            &[(0.45, 0.7), (0.7, 1.0)],
        ],
        'R' => &[
            &[(0.0, 1.0), (0.0, 0.0), (0.58, 0.0), (0.7, 0.14), (0.7, 0.34), (0.58, 0.48), (0.0, 0.48)],
            &[(0.25, 0.48), (0.7, 1.0)],
        ],
        'S' => &[&[
            (0.7, 0.08),
            (0.12, 0.08),
            (0.0, 0.2),
            (0.0, 0.4),
            (0.12, 0.5),
            (0.58, 0.5),
            (0.7, 0.62),
            (0.7, 0.84),
            (0.58, 0.92),
            (0.0, 0.92),
        ]],
        'T' => &[&[(0.0, 0.0), (0.7, 0.0)], &[(0.35, 0.0), (0.35, 1.0)]],
        'U' => &[&[(0.0, 0.0), (0.0, 0.82), (0.15, 1.0), (0.55, 1.0), (0.7, 0.82), (0.7, 0.0)]],
        'V' => &[&[(0.0, 0.0), (0.35, 1.0), (0.7, 0.0)]],
        'W' => &[&[(0.0, 0.0), (0.16, 1.0), (0.35, 0.42), (0.54, 1.0), (0.7, 0.0)]],
        'X' => &[&[(0.0, 0.0), (0.7, 1.0)], &[(0.7, 0.0), (0.0, 1.0)]],
        'Y' => &[&[(0.0, 0.0), (0.35, 0.45), (0.7, 0.0)], &[(0.35, 0.45), (0.35, 1.0)]],
        'Z' => &[&[(0.0, 0.0), (0.7, 0.0), (0.0, 1.0), (0.7, 1.0)]],
        '0' => &[
            &[
                (0.12, 0.0),
                (0.58, 0.0),
                (0.7, 0.18),
                (0.7, 0.82),
                (0.58, 1.0),
                (0.12, 1.0),
                (0.0, 0.82),
                (0.0, 0.18),
                (0.12, 0.0),
            ],
            &[(0.52, 0.22), (0.18, 0.78)],
        ],
        '1' => &[&[(0.12, 0.22), (0.4, 0.0), (0.4, 1.0)], &[(0.12, 1.0), (0.62, 1.0)]],
        '2' => &[&[(0.0, 0.16), (0.12, 0.0), (0.58, 0.0), (0.7, 0.16), (0.7, 0.36), (0.0, 1.0), (0.7, 1.0)]],
        '3' => &[
            &[(0.0, 0.0), (0.62, 0.0), (0.62, 0.48), (0.22, 0.48)],
            &[(0.62, 0.48), (0.62, 1.0), (0.0, 1.0)],
        ],
        '4' => &[&[(0.52, 1.0), (0.52, 0.0), (0.0, 0.68), (0.7, 0.68)]],
        '5' => &[&[
            (0.7, 0.0),
            (0.0, 0.0),
            (0.0, 0.48),
            (0.55, 0.48),
            (0.7, 0.62),
            (0.7, 0.84),
            (0.55, 1.0),
            (0.0, 1.0),
        ]],
        '6' => &[&[(0.62, 0.0), (0.12, 0.0), (0.0, 0.18), (0.0, 1.0), (0.7, 1.0), (0.7, 0.5), (0.0, 0.5)]],
        '7' => &[&[(0.0, 0.0), (0.7, 0.0), (0.25, 1.0)]],
        '8' => &[
            &[
                (0.12, 0.0),
                (0.58, 0.0),
                (0.7, 0.18),
                (0.7, 0.82),
                (0.58, 1.0),
                (0.12, 1.0),
                (0.0, 0.82),
                (0.0, 0.18),
                (0.12, 0.0),
            ],
            &[(0.0, 0.5), (0.7, 0.5)],
        ],
        '9' => &[&[(0.08, 1.0), (0.58, 1.0), (0.7, 0.82), (0.7, 0.0), (0.0, 0.0), (0.0, 0.5), (0.7, 0.5)]],
        '-' => &[&[(0.1, 0.5), (0.6, 0.5)]],
        '_' => &[&[(0.0, 1.0), (0.7, 1.0)]],
        '.' => &[&[(0.26, 0.95), (0.44, 0.95)]],
        '@' => &[&[
            (0.5, 0.66),
            (0.26, 0.66),
            (0.26, 0.3),
            (0.5, 0.3),
            (0.5, 0.74),
            (0.7, 0.74),
            (0.7, 0.16),
            (0.54, 0.0),
            (0.18, 0.0),
            (0.0, 0.2),
            (0.0, 0.8),
            (0.18, 1.0),
            (0.6, 1.0),
        ]],
        ' ' => &[],
        // Anything outside the plate alphabet renders as a hollow box
        _ => &[&[(0.05, 0.1), (0.65, 0.1), (0.65, 0.9), (0.05, 0.9), (0.05, 0.1)]],
    }
}

/// Width of a laid-out line, in the same units as `size`.
pub fn text_width(text: &str, size: f32, tracking: f32) -> f32 {
    let count = text.chars().count();
    if count == 0 {
        return 0.0;
    }
    count as f32 * GLYPH_WIDTH * size + (count as f32 - 1.0) * tracking
}

/// Lay `text` out left-to-right from `origin` (top-left of the first
/// glyph cell) and return the filled stroke quads.
pub fn layout_text(text: &str, origin: Pos2, size: f32, tracking: f32) -> Vec<[Pos2; 4]> {
    let mut quads = Vec::new();
    let weight = STROKE_WEIGHT * size;
    let mut pen_x = origin.x;

    for ch in text.chars() {
        for stroke in strokes(ch) {
            for pair in stroke.windows(2) {
                let a = pos2(pen_x + pair[0].0 * size, origin.y + pair[0].1 * size);
                let b = pos2(pen_x + pair[1].0 * size, origin.y + pair[1].1 * size);
                quads.push(segment_quad(a, b, weight));
            }
        }
        pen_x += GLYPH_WIDTH * size + tracking;
    }

    quads
}

/// Expand a line segment into a filled quad with square caps, so that
/// consecutive strokes of a glyph join without gaps.
fn segment_quad(a: Pos2, b: Pos2, weight: f32) -> [Pos2; 4] {
    let d = b - a;
    let len = d.length().max(f32::EPSILON);
    let dir = d / len;
    let half = weight / 2.0;
    let ext = dir * half;
    let perp = vec2(-dir.y, dir.x) * half;

    [
        a - ext + perp,
        b + ext + perp,
        b + ext - perp,
        a - ext - perp,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_scales_with_tracking() {
        let narrow = text_width("AB12CDE", 64.0, 0.0);
        let wide = text_width("AB12CDE", 64.0, 10.0);
        assert_eq!(wide - narrow, 6.0 * 10.0);
        assert_eq!(text_width("", 64.0, 10.0), 0.0);
    }

    #[test]
    fn test_every_plate_char_has_strokes() {
        for ch in "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789".chars() {
            assert!(
                !strokes(ch).is_empty(),
                "glyph {ch:?} is missing from the table"
            );
        }
        // Space advances without marking
        assert!(strokes(' ').is_empty());
    }

    #[test]
    fn test_layout_covers_all_glyph_cells() {
        let quads = layout_text("HH", pos2(10.0, 20.0), 50.0, 8.0);
        // H is three strokes of one segment each
        assert_eq!(quads.len(), 6);

        // Second glyph starts one advance to the right of the first
        let advance = GLYPH_WIDTH * 50.0 + 8.0;
        let min_x_second = quads[3..]
            .iter()
            .flat_map(|q| q.iter())
            .map(|p| p.x)
            .fold(f32::INFINITY, f32::min);
        assert!((min_x_second - (10.0 + advance - STROKE_WEIGHT * 25.0)).abs() < 1.0);
    }

    #[test]
    fn test_segment_quad_has_stroke_thickness() {
        let quad = segment_quad(pos2(0.0, 0.0), pos2(10.0, 0.0), 2.0);
        let min_y = quad.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = quad.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        assert!((max_y - min_y - 2.0).abs() < 1e-4);
    }
}
