use egui::Color32;

use crate::plate::config::PlateStyle;

/// Compositing mode for the dynamic highlight layer.
///
/// `Normal` is plain source-over; the other three follow the usual
/// separable blend definitions. The raster export backend implements the
/// exact arithmetic; the on-screen painter approximates them with alpha
/// compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Screen,
    Overlay,
    SoftLight,
}

/// Per-style parameters of the pointer-tracking highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShineParams {
    /// Highlight radius as a fraction of the plate width.
    pub size: f32,
    pub blend: BlendMode,
}

/// How the registration text is rendered for a style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextTreatment {
    pub color: Color32,
    pub shadow: TextShadowKind,
    /// Glossy styles fill the glyphs with a vertical sheen gradient.
    pub glossy: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextShadowKind {
    None,
    /// Single soft offset pass (gel).
    Soft,
    /// Single medium offset pass (framed products).
    Medium,
    /// Stacked offset passes simulating acrylic extrusion.
    Extruded,
}

/// Default shine intensity applied on every transition to `style`.
pub fn intensity_for_style(style: PlateStyle) -> f32 {
    match style {
        PlateStyle::Acrylic4d => 0.9,
        PlateStyle::Gel3d => 0.7,
        PlateStyle::FrameLux | PlateStyle::FrameUv | PlateStyle::FrameFactory => 0.5,
        PlateStyle::Simple | PlateStyle::Moto | PlateStyle::FrameMoto => 0.3,
    }
}

pub fn shine_params_for_style(style: PlateStyle) -> ShineParams {
    match style {
        PlateStyle::Acrylic4d => ShineParams {
            size: 0.40,
            blend: BlendMode::Overlay,
        },
        PlateStyle::Gel3d => ShineParams {
            size: 0.50,
            blend: BlendMode::Overlay,
        },
        PlateStyle::FrameLux | PlateStyle::FrameUv | PlateStyle::FrameFactory => ShineParams {
            size: 0.60,
            blend: BlendMode::SoftLight,
        },
        PlateStyle::Simple | PlateStyle::Moto | PlateStyle::FrameMoto => ShineParams {
            size: 0.70,
            blend: BlendMode::Screen,
        },
    }
}

/// Text color and finish for a style. The dark black background is the
/// one cross-field coupling: it forces a light base color (and brightens
/// the gel gloss) regardless of style.
pub fn text_treatment_for_style(style: PlateStyle, is_dark_background: bool) -> TextTreatment {
    let base_color = if is_dark_background {
        Color32::from_rgb(229, 231, 235)
    } else {
        Color32::from_rgb(10, 10, 10)
    };

    match style {
        PlateStyle::Acrylic4d => TextTreatment {
            color: base_color,
            shadow: TextShadowKind::Extruded,
            glossy: false,
        },
        PlateStyle::Gel3d => TextTreatment {
            color: if is_dark_background {
                Color32::from_rgb(250, 250, 250)
            } else {
                Color32::from_rgb(25, 25, 25)
            },
            shadow: TextShadowKind::Soft,
            glossy: true,
        },
        PlateStyle::FrameLux | PlateStyle::FrameUv | PlateStyle::FrameFactory => TextTreatment {
            color: base_color,
            shadow: TextShadowKind::Medium,
            glossy: false,
        },
        PlateStyle::Simple | PlateStyle::Moto | PlateStyle::FrameMoto => TextTreatment {
            color: base_color,
            shadow: TextShadowKind::None,
            glossy: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_table() {
        assert_eq!(intensity_for_style(PlateStyle::Acrylic4d), 0.9);
        assert_eq!(intensity_for_style(PlateStyle::Gel3d), 0.7);
        assert_eq!(intensity_for_style(PlateStyle::FrameLux), 0.5);
        assert_eq!(intensity_for_style(PlateStyle::FrameUv), 0.5);
        assert_eq!(intensity_for_style(PlateStyle::FrameFactory), 0.5);
        assert_eq!(intensity_for_style(PlateStyle::Simple), 0.3);
        assert_eq!(intensity_for_style(PlateStyle::Moto), 0.3);
        assert_eq!(intensity_for_style(PlateStyle::FrameMoto), 0.3);
    }

    #[test]
    fn test_intensity_is_total_and_bounded() {
        for style in PlateStyle::all() {
            let intensity = intensity_for_style(style);
            assert!(
                [0.9, 0.7, 0.5, 0.3].contains(&intensity),
                "unexpected intensity {intensity} for {style:?}"
            );
            // Pure lookup: repeated application yields the same value
            assert_eq!(intensity, intensity_for_style(style));
        }
    }

    #[test]
    fn test_frame_variants_share_shine_params() {
        let lux = shine_params_for_style(PlateStyle::FrameLux);
        let uv = shine_params_for_style(PlateStyle::FrameUv);
        let factory = shine_params_for_style(PlateStyle::FrameFactory);
        assert_eq!(lux, uv);
        assert_eq!(uv, factory);
        assert_eq!(lux.blend, BlendMode::SoftLight);
    }

    #[test]
    fn test_bespoke_params_for_gel_and_acrylic() {
        let acrylic = shine_params_for_style(PlateStyle::Acrylic4d);
        let gel = shine_params_for_style(PlateStyle::Gel3d);
        assert_eq!(acrylic.size, 0.40);
        assert_eq!(gel.size, 0.50);
        assert_eq!(acrylic.blend, BlendMode::Overlay);
        assert_eq!(gel.blend, BlendMode::Overlay);
        assert_ne!(acrylic, gel);
    }

    #[test]
    fn test_dark_background_forces_light_text() {
        for style in PlateStyle::all() {
            let light = text_treatment_for_style(style, false);
            let dark = text_treatment_for_style(style, true);
            // Same finish either way, brighter fill on the dark plate
            assert_eq!(light.shadow, dark.shadow);
            let luma = |c: Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
            assert!(luma(dark.color) > luma(light.color));
        }
    }
}
