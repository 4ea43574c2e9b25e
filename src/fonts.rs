use pdf_writer::{Name, Pdf, Ref};

/// The base-14 faces the annexure is set in. They are never embedded, so
/// every PDF reader supplies its own Helvetica and the output stays small.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

/// Helvetica advance widths at 1000 units/em for ASCII 32..=126 (from the AFM).
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold advance widths at 1000 units/em for ASCII 32..=126.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Width used for WinAnsi characters outside printable ASCII.
const FALLBACK_WIDTH: f32 = 556.0;

impl Face {
    pub const ALL: [Face; 3] = [Face::Helvetica, Face::HelveticaBold, Face::HelveticaOblique];

    pub(crate) fn base_font(self) -> &'static [u8] {
        match self {
            Face::Helvetica => b"Helvetica",
            Face::HelveticaBold => b"Helvetica-Bold",
            Face::HelveticaOblique => b"Helvetica-Oblique",
        }
    }

    /// Resource name used for the face in page content streams.
    pub(crate) fn resource_name(self) -> &'static str {
        match self {
            Face::Helvetica => "F1",
            Face::HelveticaBold => "F2",
            Face::HelveticaOblique => "F3",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Face::Helvetica | Face::HelveticaOblique => &HELVETICA_WIDTHS,
            Face::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Font bounding box height in 1000-units; the line gap is whatever the box
    /// leaves over after ascender and descender.
    fn bbox_height(self) -> f32 {
        match self {
            Face::Helvetica | Face::HelveticaOblique => 931.0 + 225.0,
            Face::HelveticaBold => 962.0 + 228.0,
        }
    }

    pub fn char_width_1000(self, ch: char) -> f32 {
        match ch as u32 {
            0x20..=0x7E => self.widths()[(ch as u32 - 0x20) as usize] as f32,
            _ => FALLBACK_WIDTH,
        }
    }

    pub fn text_width(self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|ch| self.char_width_1000(encodable(ch)) * size / 1000.0)
            .sum()
    }

    pub fn ascent(self, size: f32) -> f32 {
        718.0 * size / 1000.0
    }

    /// Vertical advance between two consecutive lines set in this face.
    pub fn line_height(self, size: f32) -> f32 {
        self.bbox_height() * size / 1000.0
    }
}

/// Map a single Unicode char to its WinAnsi byte, or 0 if unmappable.
fn char_to_winansi(c: char) -> u8 {
    match c as u32 {
        0x0020..=0x007E => c as u8,
        0x00A0..=0x00FF => c as u8,
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => 0,
    }
}

/// Characters WinAnsi cannot carry are shown as '?', both when measuring and
/// when encoding, so wrapped widths always match what is drawn.
fn encodable(ch: char) -> char {
    if ch == '\t' {
        ' '
    } else if char_to_winansi(ch) == 0 {
        '?'
    } else {
        ch
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().map(|c| char_to_winansi(encodable(c))).collect()
}

/// Write the three Type1 font dictionaries and return their refs in
/// [`Face::ALL`] order.
pub(crate) fn register_fonts(pdf: &mut Pdf, alloc: &mut impl FnMut() -> Ref) -> Vec<(Face, Ref)> {
    Face::ALL
        .iter()
        .map(|&face| {
            let font_ref = alloc();
            pdf.type1_font(font_ref)
                .base_font(Name(face.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            (face, font_ref)
        })
        .collect()
}
