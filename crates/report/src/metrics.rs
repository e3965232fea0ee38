//! Character-width metrics for the standard Helvetica faces.
//!
//! Widths are in thousandths of the font size, taken from the Adobe AFM files
//! for printable ASCII. Other characters fall back to their unaccented base
//! letter, or to the width of a digit.

/// Font faces used in exported documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Regular,
    Bold,
}

/// Widths for U+0020..=U+007E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // :;<=>?@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [\]^_`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // {|}~
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // :;<=>?@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [\]^_`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // {|}~
];

const FALLBACK_WIDTH: u16 = 556;

fn base_letter(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        'Á' | 'À' | 'Â' | 'Ä' | 'Ã' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        '\t' => ' ',
        other => other,
    }
}

/// Advance width of one character, in thousandths of the font size.
pub fn char_width(c: char, face: Face) -> u16 {
    let table = match face {
        Face::Regular => &HELVETICA,
        Face::Bold => &HELVETICA_BOLD,
    };
    let c = base_letter(c);
    match c as u32 {
        code @ 0x20..=0x7e => table[(code - 0x20) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in points at `size`.
pub fn text_width(text: &str, size: f32, face: Face) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c, face))).sum();
    units as f32 * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_widths() {
        assert_eq!(char_width(' ', Face::Regular), 278);
        assert_eq!(char_width('W', Face::Regular), 944);
        assert_eq!(char_width('i', Face::Regular), 222);
        assert_eq!(char_width('i', Face::Bold), 278);
        assert_eq!(char_width('~', Face::Bold), 584);
    }

    #[test]
    fn test_accents_use_base_letter() {
        assert_eq!(char_width('í', Face::Regular), char_width('i', Face::Regular));
        assert_eq!(char_width('Ñ', Face::Bold), char_width('N', Face::Bold));
        assert_eq!(char_width('€', Face::Regular), FALLBACK_WIDTH);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w10 = text_width("Observations", 10.0, Face::Regular);
        let w20 = text_width("Observations", 20.0, Face::Regular);
        assert!((w20 - 2.0 * w10).abs() < 0.001);
        assert!(text_width("Observations", 10.0, Face::Bold) > w10);
        assert_eq!(text_width("", 12.0, Face::Regular), 0.0);
    }
}
