//! Named fonts accepted by the text calls

use embedded_graphics::mono_font::{ascii, MonoFont};

/// Font names scripts may pass, first entry is the fallback.
static FONTS: &[(&str, &MonoFont<'static>)] = &[
    ("Roboto-Black22", &ascii::FONT_9X18_BOLD),
    ("Roboto-BlackItalic24", &ascii::FONT_10X20),
    ("Roboto-Regular12", &ascii::FONT_6X12),
    ("Roboto-Regular18", &ascii::FONT_9X18),
    ("Roboto-Regular22", &ascii::FONT_10X20),
    ("PermanentMarker22", &ascii::FONT_9X15_BOLD),
    ("PermanentMarker36", &ascii::FONT_10X20),
    ("DejaVuSans12", &ascii::FONT_6X12),
];

fn same_name(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.bytes().zip(b.bytes()).all(|(x, y)| {
            x == y || matches!((x, y), (b'-', b'_') | (b'_', b'-'))
        })
}

/// Look a font up by name; `-` and `_` are interchangeable. Unknown names
/// get the first font in the table.
pub fn open(name: &str) -> &'static MonoFont<'static> {
    match FONTS.iter().find(|(known, _)| same_name(known, name)) {
        Some((_, font)) => *font,
        None => {
            log::debug!("unknown font {:?}, using {}", name, FONTS[0].0);
            FONTS[0].1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::Size;

    #[test]
    fn dash_and_underscore_match() {
        let a = open("Roboto_Regular18");
        let b = open("Roboto-Regular18");
        assert!(core::ptr::eq(a, b));
        assert_eq!(a.character_size, Size::new(9, 18));
    }

    #[test]
    fn unknown_name_falls_back_to_first_font() {
        let first = open("Roboto-Black22");
        assert!(core::ptr::eq(open("Comic Sans"), first));
        assert!(core::ptr::eq(open(""), first));
    }

    #[test]
    fn table_lists_script_font_names() {
        assert!(FONTS.iter().any(|(n, _)| *n == "PermanentMarker36"));
    }
}
