use super::canvas::{PageCanvas, TextRun};
use crate::error::Error;
use crate::fonts::Face;

pub(crate) const BLACK: [u8; 3] = [0, 0, 0];

/// Narrowest box text is wrapped into; anything smaller sets one character
/// per line.
const MIN_BOX_WIDTH: f32 = 1.0;

/// Measuring a cell failed; callers fall back to a length-based estimate.
#[derive(Debug, thiserror::Error, PartialEq)]
pub(crate) enum MeasureError {
    #[error("cannot wrap text to width {0}")]
    Width(f32),
    #[error("font size {0}")]
    Size(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TextLine {
    pub(crate) text: String,
    pub(crate) width: f32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct TextStyle {
    pub(crate) face: Face,
    pub(crate) size: f32,
    pub(crate) color: [u8; 3],
}

impl TextStyle {
    pub(crate) fn new(face: Face, size: f32, color: [u8; 3]) -> Self {
        Self { face, size, color }
    }

    pub(crate) fn line_height(&self) -> f32 {
        self.face.line_height(self.size)
    }
}

fn char_width(face: Face, ch: char, size: f32) -> f32 {
    let mut buf = [0u8; 4];
    face.text_width(ch.encode_utf8(&mut buf), size)
}

fn finish_line(current: &mut String, width: &mut f32) -> TextLine {
    let line = TextLine {
        text: std::mem::take(current),
        width: *width,
    };
    *width = 0.0;
    line
}

/// Greedy word wrap. Hard line breaks are kept, runs of whitespace collapse to
/// one space, and a word wider than `max_width` is split between characters.
pub(crate) fn build_text_lines(text: &str, face: Face, size: f32, max_width: f32) -> Vec<TextLine> {
    let mut lines = Vec::new();
    if text.is_empty() {
        return lines;
    }
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let space = face.text_width(" ", size);

    for para in text.split('\n') {
        let mut current = String::new();
        let mut current_w = 0.0f32;

        for word in para.split_whitespace() {
            let ww = face.text_width(word, size);
            let needed = if current.is_empty() {
                ww
            } else {
                current_w + space + ww
            };
            if needed <= max_width {
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(word);
                current_w = needed;
                continue;
            }

            if !current.is_empty() {
                lines.push(finish_line(&mut current, &mut current_w));
            }
            if ww <= max_width {
                current.push_str(word);
                current_w = ww;
                continue;
            }

            for ch in word.chars() {
                let cw = char_width(face, ch, size);
                if !current.is_empty() && current_w + cw > max_width {
                    lines.push(finish_line(&mut current, &mut current_w));
                }
                current.push(ch);
                current_w += cw;
            }
        }

        lines.push(finish_line(&mut current, &mut current_w));
    }

    lines
}

/// Height of `text` wrapped to `width`.
pub(crate) fn measure_text_height(
    text: &str,
    face: Face,
    size: f32,
    width: f32,
) -> Result<f32, MeasureError> {
    if !(width.is_finite() && width > 0.0) {
        return Err(MeasureError::Width(width));
    }
    if !(size.is_finite() && size > 0.0) {
        return Err(MeasureError::Size(size));
    }
    let lines = build_text_lines(text, face, size, width);
    Ok(lines.len() as f32 * face.line_height(size))
}

/// Shorten `line` until it fits `max_width` with a trailing ellipsis.
fn ellipsize(line: &mut TextLine, face: Face, size: f32, max_width: f32) {
    let ellipsis = '\u{2026}';
    let ew = char_width(face, ellipsis, size);
    while !line.text.is_empty() && line.width + ew > max_width {
        if let Some(ch) = line.text.pop() {
            line.width -= char_width(face, ch, size);
        }
    }
    line.text.push(ellipsis);
    line.width += ew;
}

/// Draw `text` wrapped into the box at (`x`, `y`) `width` wide. With
/// `max_height`, lines that would run past it are dropped and the last visible
/// line ends in an ellipsis; at least one line is always drawn.
pub(crate) fn draw_text_block(
    canvas: &mut PageCanvas,
    text: &str,
    style: TextStyle,
    x: f32,
    y: f32,
    width: f32,
    max_height: Option<f32>,
) -> Result<(), Error> {
    let width = if width.is_finite() && width >= MIN_BOX_WIDTH {
        width
    } else {
        log::warn!("text {text:?} gets a {width}pt wide box; setting one character per line");
        MIN_BOX_WIDTH
    };
    let lh = style.line_height();
    let mut lines = build_text_lines(text, style.face, style.size, width);
    if let Some(h) = max_height {
        let fit = ((h + 0.01) / lh).floor().max(1.0) as usize;
        if lines.len() > fit {
            log::debug!("clipping {} of {} lines of {text:?}", lines.len() - fit, lines.len());
            lines.truncate(fit);
            if let Some(last) = lines.last_mut() {
                ellipsize(last, style.face, style.size, width);
            }
        }
    }
    for (i, line) in lines.into_iter().enumerate() {
        canvas.text(TextRun {
            text: line.text,
            face: style.face,
            size: style.size,
            color: style.color,
            x,
            y: y + i as f32 * lh,
        })?;
    }
    Ok(())
}

/// Draw one line centered between `left` and `right`; returns its height.
pub(crate) fn draw_centered_line(
    canvas: &mut PageCanvas,
    text: &str,
    style: TextStyle,
    left: f32,
    right: f32,
    y: f32,
) -> Result<f32, Error> {
    let w = style.face.text_width(text, style.size);
    let x = left + ((right - left) - w).max(0.0) / 2.0;
    canvas.text(TextRun {
        text: text.to_string(),
        face: style.face,
        size: style.size,
        color: style.color,
        x,
        y,
    })?;
    Ok(style.line_height())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LayoutConfig;

    fn texts(lines: &[TextLine]) -> Vec<&str> {
        lines.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn wraps_at_word_boundaries() {
        // "aaaa" is 4 * 5.56 = 22.24pt at 10pt
        let lines = build_text_lines("aaaa aaaa aaaa", Face::Helvetica, 10.0, 50.0);
        assert_eq!(texts(&lines), vec!["aaaa aaaa", "aaaa"]);
        assert!(lines.iter().all(|l| l.width <= 50.0));
    }

    #[test]
    fn splits_words_wider_than_the_box() {
        let lines = build_text_lines("aaaaaaaaaa", Face::Helvetica, 10.0, 25.0);
        assert_eq!(texts(&lines), vec!["aaaa", "aaaa", "aa"]);
    }

    #[test]
    fn keeps_hard_breaks() {
        let lines = build_text_lines("one\r\ntwo\nthree", Face::Helvetica, 7.0, 500.0);
        assert_eq!(texts(&lines), vec!["one", "two", "three"]);
        assert!(build_text_lines("", Face::Helvetica, 7.0, 500.0).is_empty());
    }

    #[test]
    fn measures_lines_times_line_height() {
        let lh = Face::Helvetica.line_height(10.0);
        let h = measure_text_height("aaaa aaaa aaaa", Face::Helvetica, 10.0, 50.0).unwrap();
        assert!((h - 2.0 * lh).abs() < 1e-4);
        assert_eq!(
            measure_text_height("x", Face::Helvetica, 10.0, -2.0),
            Err(MeasureError::Width(-2.0))
        );
        assert!(measure_text_height("x", Face::Helvetica, 10.0, f32::NAN).is_err());
    }

    #[test]
    fn clipped_blocks_end_with_an_ellipsis() {
        let mut canvas = PageCanvas::new(&LayoutConfig::default());
        let style = TextStyle::new(Face::Helvetica, 10.0, [0, 0, 0]);
        draw_text_block(&mut canvas, "aaaa aaaa aaaa aaaa", style, 40.0, 40.0, 50.0, Some(12.0))
            .unwrap();
        let drawn: Vec<&str> = canvas.pages()[0].texts().collect();
        assert_eq!(drawn.len(), 1);
        assert!(drawn[0].ends_with('\u{2026}'));
    }

    #[test]
    fn narrow_boxes_still_draw_their_text() {
        let mut canvas = PageCanvas::new(&LayoutConfig::default());
        let style = TextStyle::new(Face::Helvetica, 7.0, BLACK);
        draw_text_block(&mut canvas, "A", style, 40.0, 40.0, -6.0, Some(12.0)).unwrap();
        draw_text_block(&mut canvas, "yyyy", style, 40.0, 60.0, f32::NAN, None).unwrap();
        let drawn: Vec<&str> = canvas.pages()[0].texts().collect();
        assert_eq!(drawn, vec!["A", "y", "y", "y", "y"]);
    }
}
