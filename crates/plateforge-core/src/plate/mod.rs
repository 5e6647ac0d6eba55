/// Plate configuration model and style policy
///
/// `config` holds the single user-owned value object describing a plate
/// design; `style` is the pure lookup layer mapping a style to its
/// rendering parameters.

pub mod config;
pub mod style;

pub use config::{PlateColor, PlateConfig, PlateFlag, PlateShape, PlateStyle, MAX_TEXT_LEN, PLACEHOLDER_TEXT};
pub use style::{
    intensity_for_style, shine_params_for_style, text_treatment_for_style, BlendMode, ShineParams,
    TextShadowKind, TextTreatment,
};
