use serde::{Deserialize, Serialize};

use crate::plate::style;

/// Registration text is capped at this many characters (spaces count).
pub const MAX_TEXT_LEN: usize = 8;

/// Shown on the plate whenever the registration text is empty.
pub const PLACEHOLDER_TEXT: &str = "TARGA IME";

/// The eight plate styles on offer. The four `Frame*` variants are the
/// "portotarga" products (plate holder frames).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateStyle {
    Simple,
    Gel3d,
    Acrylic4d,
    Moto,
    FrameLux,
    FrameUv,
    FrameFactory,
    FrameMoto,
}

impl PlateStyle {
    pub fn all() -> [PlateStyle; 8] {
        [
            PlateStyle::Simple,
            PlateStyle::Gel3d,
            PlateStyle::Acrylic4d,
            PlateStyle::Moto,
            PlateStyle::FrameLux,
            PlateStyle::FrameUv,
            PlateStyle::FrameFactory,
            PlateStyle::FrameMoto,
        ]
    }

    /// Product label as shown in the shop
    pub fn display_name(&self) -> &'static str {
        match self {
            PlateStyle::Simple => "Targa te thjeshta",
            PlateStyle::Gel3d => "Targa 3D",
            PlateStyle::Acrylic4d => "Targa 4D",
            PlateStyle::Moto => "Targa motori",
            PlateStyle::FrameLux => "Portotarga lluksi 3D",
            PlateStyle::FrameUv => "Portotarga me logo uv",
            PlateStyle::FrameFactory => "Portotarga me logo 3D fabrikisht",
            PlateStyle::FrameMoto => "Portotarga motorri",
        }
    }

    /// The three framed products share shine parameters
    pub fn is_frame(&self) -> bool {
        matches!(
            self,
            PlateStyle::FrameLux | PlateStyle::FrameUv | PlateStyle::FrameFactory
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateShape {
    Standard,
    Hexagonal,
    Oversized,
    Short,
}

impl PlateShape {
    pub fn all() -> [PlateShape; 4] {
        [
            PlateShape::Standard,
            PlateShape::Hexagonal,
            PlateShape::Oversized,
            PlateShape::Short,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlateShape::Standard => "Standarde",
            PlateShape::Hexagonal => "Heksagonale",
            PlateShape::Oversized => "E Madhe",
            PlateShape::Short => "E Shkurtër",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateColor {
    Yellow,
    White,
    Black,
    Silver,
    Custom,
}

impl PlateColor {
    pub fn all() -> [PlateColor; 5] {
        [
            PlateColor::Yellow,
            PlateColor::White,
            PlateColor::Black,
            PlateColor::Silver,
            PlateColor::Custom,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlateColor::Yellow => "Prapme (E Verdhë)",
            PlateColor::White => "Përpara (E Bardhë)",
            PlateColor::Black => "E Zezë (Show)",
            PlateColor::Silver => "Argjend (Show)",
            PlateColor::Custom => "E Personalizuar",
        }
    }

    /// The black show plate is the only dark background; it forces a
    /// lighter text treatment to preserve contrast.
    pub fn is_dark(&self) -> bool {
        matches!(self, PlateColor::Black)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlateFlag {
    Uk,
    Eu,
}

impl PlateFlag {
    pub fn label(&self) -> &'static str {
        match self {
            PlateFlag::Uk => "UK",
            PlateFlag::Eu => "EU",
        }
    }
}

/// The full set of user-chosen attributes describing one plate design.
///
/// Owned by the application controller and mutated only through the
/// named update operations below, one field at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlateConfig {
    pub text: String,
    pub style: PlateStyle,
    pub shape: PlateShape,
    pub color: PlateColor,
    pub custom_color: String,
    pub border: bool,
    pub flag: Option<PlateFlag>,
    pub shine_intensity: f32,
}

impl PlateConfig {
    pub fn new() -> Self {
        Self {
            text: PLACEHOLDER_TEXT.to_string(),
            style: PlateStyle::Acrylic4d,
            shape: PlateShape::Standard,
            color: PlateColor::Yellow,
            custom_color: "#ff0000".to_string(),
            border: true,
            flag: Some(PlateFlag::Uk),
            shine_intensity: style::intensity_for_style(PlateStyle::Acrylic4d),
        }
    }

    /// Normalize at the input boundary: uppercase, at most `MAX_TEXT_LEN`
    /// characters. Never rejects.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_uppercase().chars().take(MAX_TEXT_LEN).collect();
    }

    /// Style transitions always reset the shine intensity to the policy
    /// default; a later slider override persists until the next transition.
    pub fn set_style(&mut self, plate_style: PlateStyle) {
        self.style = plate_style;
        self.shine_intensity = style::intensity_for_style(plate_style);
    }

    pub fn set_shape(&mut self, shape: PlateShape) {
        self.shape = shape;
    }

    pub fn set_color(&mut self, color: PlateColor) {
        self.color = color;
    }

    pub fn set_custom_color(&mut self, hex: &str) {
        self.custom_color = if hex.starts_with('#') {
            hex.to_string()
        } else {
            format!("#{hex}")
        };
    }

    pub fn set_border(&mut self, border: bool) {
        self.border = border;
    }

    pub fn set_flag(&mut self, flag: Option<PlateFlag>) {
        self.flag = flag;
    }

    pub fn set_shine_intensity(&mut self, intensity: f32) {
        self.shine_intensity = intensity.clamp(0.0, 1.0);
    }

    /// The text actually rendered on the plate.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            PLACEHOLDER_TEXT
        } else {
            &self.text
        }
    }
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlateConfig::new();
        assert_eq!(config.text, "TARGA IME");
        assert_eq!(config.style, PlateStyle::Acrylic4d);
        assert_eq!(config.shape, PlateShape::Standard);
        assert_eq!(config.color, PlateColor::Yellow);
        assert_eq!(config.custom_color, "#ff0000");
        assert!(config.border);
        assert_eq!(config.flag, Some(PlateFlag::Uk));
        assert_eq!(config.shine_intensity, 0.9);
    }

    #[test]
    fn test_text_is_uppercased_and_truncated() {
        let mut config = PlateConfig::new();

        config.set_text("ab12cde");
        assert_eq!(config.text, "AB12CDE");

        config.set_text("abcdefghijkl");
        assert_eq!(config.text, "ABCDEFGH");
        assert_eq!(config.text.chars().count(), MAX_TEXT_LEN);
    }

    #[test]
    fn test_empty_text_renders_placeholder() {
        let mut config = PlateConfig::new();
        config.set_text("");
        assert_eq!(config.text, "");
        assert_eq!(config.display_text(), PLACEHOLDER_TEXT);
    }

    #[test]
    fn test_style_change_resets_shine_intensity() {
        let mut config = PlateConfig::new();
        config.set_shine_intensity(0.15);
        assert_eq!(config.shine_intensity, 0.15);

        config.set_style(PlateStyle::Gel3d);
        assert_eq!(config.shine_intensity, 0.7);

        // A user override survives until the next transition
        config.set_shine_intensity(1.0);
        assert_eq!(config.shine_intensity, 1.0);
        config.set_style(PlateStyle::Simple);
        assert_eq!(config.shine_intensity, 0.3);
    }

    #[test]
    fn test_reselecting_style_is_idempotent() {
        let mut config = PlateConfig::new();
        config.set_style(PlateStyle::FrameLux);
        let first = config.shine_intensity;
        config.set_style(PlateStyle::FrameLux);
        assert_eq!(config.shine_intensity, first);
    }

    #[test]
    fn test_shine_intensity_is_clamped() {
        let mut config = PlateConfig::new();
        config.set_shine_intensity(1.7);
        assert_eq!(config.shine_intensity, 1.0);
        config.set_shine_intensity(-0.2);
        assert_eq!(config.shine_intensity, 0.0);
    }

    #[test]
    fn test_custom_color_gains_hash_prefix() {
        let mut config = PlateConfig::new();
        config.set_custom_color("00ff7f");
        assert_eq!(config.custom_color, "#00ff7f");
        config.set_custom_color("#123abc");
        assert_eq!(config.custom_color, "#123abc");
    }
}
