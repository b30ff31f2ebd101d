use egui::Color32;

/// Parses `#rrggbb` or the short `#rgb` form. The `#` is optional.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some(Color32::from_rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&digits[i..=i]).map(|v| v * 17);
            Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_form() {
        assert_eq!(parse_hex("#a159e1"), Some(Color32::from_rgb(161, 89, 225)));
        assert_eq!(parse_hex("336699"), Some(Color32::from_rgb(0x33, 0x66, 0x99)));
    }

    #[test]
    fn short_form_expands() {
        assert_eq!(parse_hex("#f0a"), Some(Color32::from_rgb(255, 0, 170)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#gg0000"), None);
        assert_eq!(parse_hex("#ééé"), None);
    }
}
