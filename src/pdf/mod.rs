mod auto;
mod canvas;
mod layout;
mod table;

use std::time::Instant;

use crate::error::Error;
use crate::fonts::Face;
use crate::model::{DocumentFrame, HeadingStyle, LayoutConfig, Section, SectionBody, TableStrategy};

pub use auto::{AutoFitTable, AutoLayout, AutoLayoutError, AutoLayoutStyle};
pub use canvas::{Checkpoint, DrawOp, LaidOutDocument, Page, PageCanvas, Rect, TextRun};

use auto::render_auto_table;
use layout::{BLACK, TextStyle, draw_centered_line};
use table::{dynamic_row_height, render_dynamic_table, render_fixed_table};

const TITLE_SIZE: f32 = 20.0;
const SUBTITLE_SIZE: f32 = 14.0;
const FOOTER_SIZE: f32 = 9.0;
/// Space below the title, in title line heights.
const TITLE_GAP: f32 = 0.3;

/// Lays out a document frame and its sections on A4-style pages and writes
/// the PDF. One renderer may be shared between threads; every call lays out
/// on its own canvas.
pub struct Renderer {
    config: LayoutConfig,
    auto_layout: Option<Box<dyn AutoLayout>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Renderer {
    /// A renderer without auto layout; `AutoLayout` sections draw with
    /// dynamic rows.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            auto_layout: None,
        }
    }

    pub fn with_auto_layout(mut self, auto_layout: impl AutoLayout + 'static) -> Self {
        self.auto_layout = Some(Box::new(auto_layout));
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn render(&self, frame: &DocumentFrame, sections: &[Section]) -> Result<Vec<u8>, Error> {
        let t0 = Instant::now();
        let doc = self.layout(frame, sections)?;
        let t_layout = t0.elapsed();
        let pages = doc.page_count();
        let bytes = doc.finish()?;
        log::debug!(
            "render: {} sections, {} pages, layout={:.1}ms, total={:.1}ms",
            sections.len(),
            pages,
            t_layout.as_secs_f64() * 1000.0,
            t0.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(bytes)
    }

    /// Lay out every page without serializing, for callers that inspect the
    /// drawn operations.
    pub fn layout(
        &self,
        frame: &DocumentFrame,
        sections: &[Section],
    ) -> Result<LaidOutDocument, Error> {
        let mut canvas = PageCanvas::new(&self.config);
        self.draw_title(&mut canvas, frame)?;
        for section in sections {
            self.draw_section(&mut canvas, section)?;
        }
        if let Some(footer) = &frame.footer {
            self.draw_footer(&mut canvas, footer)?;
        }
        Ok(canvas.finish(Some(frame.title.clone())))
    }

    fn draw_title(&self, canvas: &mut PageCanvas, frame: &DocumentFrame) -> Result<(), Error> {
        let (left, right) = (canvas.left(), canvas.right());
        let title = TextStyle::new(Face::HelveticaBold, TITLE_SIZE, BLACK);
        let mut y = canvas.cursor();
        let lh = draw_centered_line(canvas, &frame.title, title, left, right, y)?;
        y += lh + TITLE_GAP * lh;
        if let Some(subtitle) = &frame.subtitle {
            let style = TextStyle::new(Face::HelveticaBold, SUBTITLE_SIZE, BLACK);
            let lh = draw_centered_line(canvas, subtitle, style, left, right, y)?;
            y += 2.0 * lh;
        }
        canvas.set_cursor(y)
    }

    fn heading_style(&self, heading: HeadingStyle) -> (TextStyle, f32) {
        let c = &self.config;
        match heading {
            HeadingStyle::Section => (
                TextStyle::new(Face::HelveticaBold, c.heading_font_size, c.heading_color),
                c.heading_advance,
            ),
            HeadingStyle::Subsection => (
                TextStyle::new(Face::HelveticaBold, c.subheading_font_size, BLACK),
                c.subheading_advance,
            ),
        }
    }

    /// Height from the heading down to the end of the first body row.
    fn section_lead(&self, section: &Section, heading_advance: f32) -> Result<f32, Error> {
        let c = &self.config;
        let body = match (&section.body, section.strategy) {
            (SectionBody::Placeholder(_), _) => c.placeholder_advance,
            (SectionBody::Table(table), TableStrategy::FixedRow) => {
                c.row_height * if table.rows.is_empty() { 1.0 } else { 2.0 }
            }
            (
                SectionBody::Table(table),
                TableStrategy::DynamicRow(opts) | TableStrategy::AutoLayout(opts),
            ) => {
                let widths = table.resolve_widths(c.table_width)?;
                let first = table.rows.first().map_or(0.0, |row| {
                    dynamic_row_height(c, row, &widths, opts.min_row_height)
                });
                opts.min_row_height + first
            }
        };
        Ok(heading_advance + body)
    }

    fn draw_section(&self, canvas: &mut PageCanvas, section: &Section) -> Result<(), Error> {
        let c = &self.config;
        if let Some(threshold) = section.break_threshold {
            if canvas.cursor() > threshold {
                log::debug!(
                    "cursor {:.2} below {threshold} before {:?}; new page",
                    canvas.cursor(),
                    section.title
                );
                canvas.add_page();
            }
        }

        let (style, advance) = self.heading_style(section.heading);
        if canvas.cursor() > canvas.top() {
            let needed = if c.keep_heading_with_table {
                self.section_lead(section, advance)?
            } else if matches!(section.body, SectionBody::Placeholder(_)) {
                advance + c.placeholder_advance
            } else {
                advance
            };
            if canvas.cursor() + needed > canvas.bottom() {
                log::debug!(
                    "{:?} needs {needed:.2}pt at y={:.2}; new page",
                    section.title,
                    canvas.cursor()
                );
                canvas.add_page();
            }
        }

        let y = canvas.cursor();
        canvas.text(TextRun {
            text: section.title.clone(),
            face: style.face,
            size: style.size,
            color: style.color,
            x: c.table_x,
            y,
        })?;
        let origin = (c.table_x, y + advance);
        canvas.set_cursor(origin.1)?;

        let next = match (&section.body, section.strategy) {
            (SectionBody::Placeholder(line), _) => {
                canvas.text(TextRun {
                    text: line.clone(),
                    face: Face::HelveticaBold,
                    size: c.placeholder_font_size,
                    color: BLACK,
                    x: c.table_x,
                    y: origin.1,
                })?;
                origin.1 + c.placeholder_advance
            }
            (SectionBody::Table(table), TableStrategy::FixedRow) => {
                render_fixed_table(canvas, c, origin, c.table_width, table)?
            }
            (SectionBody::Table(table), TableStrategy::DynamicRow(opts)) => {
                render_dynamic_table(canvas, c, origin, c.table_width, table, opts)?
            }
            (SectionBody::Table(table), TableStrategy::AutoLayout(opts)) => render_auto_table(
                canvas,
                c,
                self.auto_layout.as_deref(),
                origin,
                c.table_width,
                table,
                opts,
            )?,
        };
        log::debug!(
            "section {:?} done: page={} y={:.2}",
            section.title,
            canvas.page_index(),
            next
        );
        canvas.set_cursor(next)
    }

    fn draw_footer(&self, canvas: &mut PageCanvas, footer: &str) -> Result<(), Error> {
        let style = TextStyle::new(Face::HelveticaOblique, FOOTER_SIZE, self.config.footer_color);
        let lh = style.line_height();
        let mut y = canvas.cursor() + lh;
        if y + lh > canvas.bottom() {
            canvas.add_page();
            y = canvas.top();
        }
        let (left, right) = (canvas.left(), canvas.right());
        let h = draw_centered_line(canvas, footer, style, left, right, y)?;
        canvas.set_cursor(y + h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DynamicOptions, Table};

    fn frame() -> DocumentFrame {
        DocumentFrame {
            title: "Annexure \u{2013} I".into(),
            subtitle: Some("Details".into()),
            footer: Some("Generated".into()),
        }
    }

    fn pair_table(rows: usize) -> Table {
        let mut table = Table::new(["Field", "Details"]);
        for i in 0..rows {
            table.push_pair(&format!("Row {i}"), None);
        }
        table
    }

    #[test]
    fn title_then_sections_then_footer() {
        let sections = vec![
            Section::table("A. First", pair_table(2), TableStrategy::FixedRow),
            Section::placeholder("C. Empty", "Nothing here"),
        ];
        let doc = Renderer::default().layout(&frame(), &sections).unwrap();
        let texts: Vec<&str> = doc.pages()[0].texts().collect();
        assert_eq!(texts[0], "Annexure \u{2013} I");
        assert_eq!(texts[1], "Details");
        assert_eq!(texts[2], "A. First");
        assert_eq!(texts[texts.len() - 2], "Nothing here");
        assert_eq!(texts[texts.len() - 1], "Generated");
    }

    #[test]
    fn threshold_forces_a_page_break() {
        let sections = vec![
            Section::table("A", pair_table(3), TableStrategy::FixedRow),
            Section::table("B", pair_table(1), TableStrategy::FixedRow).break_below(100.0),
        ];
        let doc = Renderer::default().layout(&frame(), &sections).unwrap();
        assert_eq!(doc.page_count(), 2);
        let first = doc.pages()[1].text_runs().next().unwrap();
        assert_eq!(first.text, "B");
        assert_eq!(first.y, 40.0);
    }

    #[test]
    fn heading_moves_with_its_table() {
        // the first table leaves room for a heading but not for a header bar
        let sections = vec![
            Section::table("A", pair_table(35), TableStrategy::FixedRow),
            Section::table(
                "B",
                pair_table(1),
                TableStrategy::DynamicRow(DynamicOptions::default()),
            ),
        ];
        let doc = Renderer::default().layout(&frame(), &sections).unwrap();
        let last = doc.pages().len() - 1;
        assert!(doc.pages()[..last].iter().all(|p| p.texts().all(|t| t != "B")));
        assert_eq!(doc.pages()[last].texts().next(), Some("B"));

        let config = LayoutConfig {
            keep_heading_with_table: false,
            ..LayoutConfig::default()
        };
        let doc = Renderer::new(config).layout(&frame(), &sections).unwrap();
        assert!(doc.pages()[0].texts().any(|t| t == "B"));
    }

    #[test]
    fn headings_never_start_below_the_margin() {
        // 36 rows leave less than a heading's advance above the margin
        let config = LayoutConfig {
            keep_heading_with_table: false,
            ..LayoutConfig::default()
        };
        let bottom = config.page_bottom();
        let sections = vec![
            Section::table("A", pair_table(36), TableStrategy::FixedRow),
            Section::placeholder("C. Empty", "Nothing here"),
        ];
        let doc = Renderer::new(config).layout(&frame(), &sections).unwrap();
        assert_eq!(doc.page_count(), 2);
        let runs: Vec<&TextRun> = doc.pages()[1].text_runs().collect();
        assert_eq!(runs[0].text, "C. Empty");
        assert_eq!(runs[1].text, "Nothing here");
        assert_eq!(runs[1].face, Face::HelveticaBold);
        for page in doc.pages() {
            assert!(page.text_runs().all(|run| run.y <= bottom));
        }
    }

    #[test]
    fn auto_layout_sections_fall_back_without_a_layout() {
        let table = || pair_table(2).with_widths(vec![300.0, 215.0]);
        let opts = DynamicOptions::default();
        let auto = vec![Section::table("L", table(), TableStrategy::AutoLayout(opts))];
        let dynamic = vec![Section::table("L", table(), TableStrategy::DynamicRow(opts))];
        let renderer = Renderer::default();
        assert_eq!(
            renderer.render(&frame(), &auto).unwrap(),
            renderer.render(&frame(), &dynamic).unwrap()
        );
    }

    #[test]
    fn footer_moves_to_a_new_page_when_full() {
        // 36 rows end a few points above the bottom margin
        let sections = vec![Section::table("A", pair_table(36), TableStrategy::FixedRow)];
        let doc = Renderer::default().layout(&frame(), &sections).unwrap();
        assert_eq!(doc.page_count(), 2);
        let texts: Vec<&str> = doc.pages()[1].texts().collect();
        assert_eq!(texts, vec!["Generated"]);
    }
}
