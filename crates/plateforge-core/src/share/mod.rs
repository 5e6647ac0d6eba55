//! WhatsApp order link construction.
//!
//! Pure string building: the current design is summarized in the shop's
//! message template and URL-encoded into a `wa.me` deep link. No network
//! traffic originates here.

use crate::plate::{PlateColor, PlateConfig};

/// The shop's WhatsApp number, international format without `+`.
pub const ORDER_PHONE: &str = "355695850530";

/// Human-readable order message for the current design.
pub fn order_message(config: &PlateConfig) -> String {
    let color = if config.color == PlateColor::Custom {
        format!("Custom ({})", config.custom_color)
    } else {
        config.color.display_name().to_string()
    };
    let flag = config
        .flag
        .map(|f| f.label().to_string())
        .unwrap_or_else(|| "Pa flamur".to_string());
    let border = if config.border { "Po" } else { "Jo" };

    format!(
        "Përshëndetje Targa Ime, kam dizenjuar një targë në website:\n\
         - Teksti: {}\n\
         - Stili: {}\n\
         - Forma: {}\n\
         - Ngjyra: {}\n\
         - Flamuri: {}\n\
         - Korniza: {}\n\
         Jam i interesuar ta porosis.",
        config.text,
        config.style.display_name(),
        config.shape.display_name(),
        color,
        flag,
        border,
    )
}

/// Prefilled `wa.me` deep link for the current design.
pub fn whatsapp_link(config: &PlateConfig) -> String {
    format!(
        "https://wa.me/{}?text={}",
        ORDER_PHONE,
        percent_encode(&order_message(config))
    )
}

/// RFC 3986 percent-encoding, keeping only unreserved characters.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{byte:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plate::{PlateFlag, PlateShape, PlateStyle};

    #[test]
    fn test_link_prefix_and_text() {
        let mut config = PlateConfig::new();
        config.set_text("AB12CDE");
        let link = whatsapp_link(&config);
        assert!(link.starts_with("https://wa.me/355695850530?text="));
        assert!(link.contains("AB12CDE"));
        // Raw whitespace and newlines never survive encoding
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
    }

    #[test]
    fn test_custom_color_embeds_hex() {
        let mut config = PlateConfig::new();
        config.set_color(PlateColor::Custom);
        config.set_custom_color("#00ff7f");
        let message = order_message(&config);
        assert!(message.contains("Custom (#00ff7f)"));
        assert!(whatsapp_link(&config).contains("00ff7f"));
    }

    #[test]
    fn test_message_covers_every_field() {
        let mut config = PlateConfig::new();
        config.set_text("GR8");
        config.set_style(PlateStyle::Gel3d);
        config.set_shape(PlateShape::Short);
        config.set_flag(Some(PlateFlag::Eu));
        config.set_border(false);

        let message = order_message(&config);
        assert!(message.contains("GR8"));
        assert!(message.contains("Targa 3D"));
        assert!(message.contains("E Shkurtër"));
        assert!(message.contains("EU"));
        assert!(message.contains("Korniza: Jo"));
    }

    #[test]
    fn test_no_flag_reads_pa_flamur() {
        let mut config = PlateConfig::new();
        config.set_flag(None);
        assert!(order_message(&config).contains("Pa flamur"));
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("AB 12"), "AB%2012");
        assert_eq!(percent_encode("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(percent_encode("ë"), "%C3%AB");
    }
}
