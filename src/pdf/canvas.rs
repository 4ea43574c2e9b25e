use pdf_writer::{Content, Filter, Name, Pdf, Ref, Str, TextStr};

use crate::error::Error;
use crate::fonts::{Face, register_fonts, to_winansi_bytes};
use crate::model::{LayoutConfig, Margins, Stroke};

/// Axis-aligned box in canvas space: `y` is the top edge, measured downward
/// from the top of the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub face: Face,
    pub size: f32,
    pub color: [u8; 3],
    /// Left edge of the text.
    pub x: f32,
    /// Top of the line box; the baseline sits one ascent below.
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    FillRect { rect: Rect, color: [u8; 3] },
    StrokeRect { rect: Rect, stroke: Stroke },
    Line { from: (f32, f32), to: (f32, f32), stroke: Stroke },
    Text(TextRun),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// The text of every run on the page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run.text.as_str()),
            _ => None,
        })
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
    }
}

/// A point the canvas can be rewound to.
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint {
    pages: usize,
    ops: usize,
    cursor: f32,
}

/// Mutable drawing surface for one document. Holds the pages drawn so far,
/// the current page (always the last one) and the vertical cursor.
pub struct PageCanvas {
    width: f32,
    height: f32,
    margins: Margins,
    pages: Vec<Page>,
    cursor: f32,
}

fn check(value: f32, what: &str) -> Result<f32, Error> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::Geometry(format!("{what} is {value}")))
    }
}

impl PageCanvas {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            width: config.page_width,
            height: config.page_height,
            margins: config.margins,
            pages: vec![Page::default()],
            cursor: config.margins.top,
        }
    }

    pub fn page_index(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn set_cursor(&mut self, y: f32) -> Result<(), Error> {
        self.cursor = check(y, "cursor")?;
        Ok(())
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn top(&self) -> f32 {
        self.margins.top
    }

    pub fn bottom(&self) -> f32 {
        self.height - self.margins.bottom
    }

    pub fn left(&self) -> f32 {
        self.margins.left
    }

    pub fn right(&self) -> f32 {
        self.width - self.margins.right
    }

    /// Start a new page and move the cursor to its top margin.
    pub fn add_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.margins.top;
        log::debug!("page break -> page {}", self.page_index() + 1);
    }

    fn push(&mut self, op: DrawOp) {
        // pages is never empty
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    fn check_rect(rect: &Rect) -> Result<(), Error> {
        check(rect.x, "x")?;
        check(rect.y, "y")?;
        if !(rect.width.is_finite() && rect.height.is_finite())
            || rect.width < 0.0
            || rect.height < 0.0
        {
            return Err(Error::Geometry(format!(
                "rect size {}x{}",
                rect.width, rect.height
            )));
        }
        Ok(())
    }

    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 3]) -> Result<(), Error> {
        Self::check_rect(&rect)?;
        self.push(DrawOp::FillRect { rect, color });
        Ok(())
    }

    pub fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) -> Result<(), Error> {
        Self::check_rect(&rect)?;
        self.push(DrawOp::StrokeRect { rect, stroke });
        Ok(())
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) -> Result<(), Error> {
        check(from.0, "x")?;
        check(from.1, "y")?;
        check(to.0, "x")?;
        check(to.1, "y")?;
        self.push(DrawOp::Line { from, to, stroke });
        Ok(())
    }

    pub fn text(&mut self, run: TextRun) -> Result<(), Error> {
        check(run.x, "text x")?;
        check(run.y, "text y")?;
        if !(run.size.is_finite() && run.size > 0.0) {
            return Err(Error::Geometry(format!("font size {}", run.size)));
        }
        if !run.text.is_empty() {
            self.push(DrawOp::Text(run));
        }
        Ok(())
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pages: self.pages.len(),
            ops: self.pages.last().map_or(0, |p| p.ops.len()),
            cursor: self.cursor,
        }
    }

    /// Drop everything drawn after `cp`, including pages it added.
    pub fn rollback(&mut self, cp: Checkpoint) {
        self.pages.truncate(cp.pages);
        if let Some(page) = self.pages.last_mut() {
            page.ops.truncate(cp.ops);
        }
        self.cursor = cp.cursor;
    }

    /// Close the canvas. Nothing can be drawn on the returned document.
    pub fn finish(self, title: Option<String>) -> LaidOutDocument {
        LaidOutDocument {
            width: self.width,
            height: self.height,
            pages: self.pages,
            title,
        }
    }
}

/// A fully laid-out document, ready to be written as PDF.
pub struct LaidOutDocument {
    width: f32,
    height: f32,
    pages: Vec<Page>,
    title: Option<String>,
}

fn set_fill(content: &mut Content, [r, g, b]: [u8; 3]) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

fn set_stroke(content: &mut Content, stroke: Stroke) {
    let [r, g, b] = stroke.color;
    content.set_stroke_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    content.set_line_width(stroke.width);
}

impl LaidOutDocument {
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Translate one page's ops into a PDF content stream, flipping Y into
    /// PDF's bottom-up space.
    fn page_content(&self, page: &Page) -> Vec<u8> {
        let h = self.height;
        let mut content = Content::new();
        for op in &page.ops {
            match op {
                DrawOp::FillRect { rect, color } => {
                    content.save_state();
                    set_fill(&mut content, *color);
                    content.rect(rect.x, h - rect.bottom(), rect.width, rect.height);
                    content.fill_nonzero();
                    content.restore_state();
                }
                DrawOp::StrokeRect { rect, stroke } => {
                    content.save_state();
                    set_stroke(&mut content, *stroke);
                    content.rect(rect.x, h - rect.bottom(), rect.width, rect.height);
                    content.stroke();
                    content.restore_state();
                }
                DrawOp::Line { from, to, stroke } => {
                    content.save_state();
                    set_stroke(&mut content, *stroke);
                    content.move_to(from.0, h - from.1);
                    content.line_to(to.0, h - to.1);
                    content.stroke();
                    content.restore_state();
                }
                DrawOp::Text(run) => {
                    let baseline = h - run.y - run.face.ascent(run.size);
                    content.save_state();
                    set_fill(&mut content, run.color);
                    content.begin_text();
                    content.set_font(Name(run.face.resource_name().as_bytes()), run.size);
                    content.next_line(run.x, baseline);
                    content.show(Str(&to_winansi_bytes(&run.text)));
                    content.end_text();
                    content.restore_state();
                }
            }
        }
        content.finish().to_vec()
    }

    /// Serialize to PDF bytes. Object numbering, stream compression and the
    /// info dictionary depend only on the drawn content, so equal layouts give
    /// byte-identical files.
    pub fn finish(self) -> Result<Vec<u8>, Error> {
        let t0 = std::time::Instant::now();
        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let fonts = register_fonts(&mut pdf, &mut alloc);

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, page) in self.pages.iter().enumerate() {
            let raw = self.page_content(page);
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(pdf_writer::Rect::new(0.0, 0.0, self.width, self.height))
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            let mut font_dict = resources.fonts();
            for (face, font_ref) in &fonts {
                font_dict.pair(Name(face.resource_name().as_bytes()), *font_ref);
            }
        }

        if let Some(title) = &self.title {
            let info_id = alloc();
            pdf.document_info(info_id)
                .title(TextStr(title.as_str()))
                .creator(TextStr(concat!(
                    env!("CARGO_PKG_NAME"),
                    " v",
                    env!("CARGO_PKG_VERSION")
                )));
        }

        let bytes = pdf.finish();
        log::debug!(
            "pdf assembly: {n} pages, {} bytes, {:.1}ms",
            bytes.len(),
            t0.elapsed().as_secs_f64() * 1000.0
        );
        Ok(bytes)
    }
}
