use super::canvas::{PageCanvas, Rect};
use super::layout::{BLACK, TextStyle, draw_text_block, measure_text_height};
use crate::error::Error;
use crate::fonts::Face;
use crate::model::{DynamicOptions, LayoutConfig, Row, Stroke, Table, cell_text};

/// The rows of one table that landed on a single page, bounded by the top of
/// its header bar and the bottom of its last row. Borders are stroked once per
/// segment, when the page is left or the table ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Segment {
    pub(crate) start_y: f32,
    pub(crate) end_y: f32,
}

/// X of every column boundary, left edge first.
fn column_edges(x: f32, widths: &[f32]) -> Vec<f32> {
    let mut edges = Vec::with_capacity(widths.len() + 1);
    let mut cx = x;
    edges.push(cx);
    for w in widths {
        cx += w;
        edges.push(cx);
    }
    edges
}

impl Segment {
    pub(crate) fn new(start_y: f32) -> Self {
        Self {
            start_y,
            end_y: start_y,
        }
    }

    pub(crate) fn height(&self) -> f32 {
        self.end_y - self.start_y
    }

    /// Full grid for uniform rows: a vertical line at every column boundary and
    /// a horizontal line at every row boundary.
    pub(crate) fn stroke_grid(
        &self,
        canvas: &mut PageCanvas,
        x: f32,
        widths: &[f32],
        row_height: f32,
        stroke: Stroke,
    ) -> Result<(), Error> {
        let edges = column_edges(x, widths);
        let right = edges[edges.len() - 1];
        for &ex in &edges {
            canvas.line((ex, self.start_y), (ex, self.end_y), stroke)?;
        }
        let rows = (self.height() / row_height).round() as usize;
        for i in 0..=rows {
            let ry = self.start_y + i as f32 * row_height;
            canvas.line((x, ry), (right, ry), stroke)?;
        }
        Ok(())
    }

    /// Outline around the whole segment plus the internal column separators.
    pub(crate) fn stroke_outline(
        &self,
        canvas: &mut PageCanvas,
        x: f32,
        widths: &[f32],
        stroke: Stroke,
    ) -> Result<(), Error> {
        let edges = column_edges(x, widths);
        let total = edges[edges.len() - 1] - x;
        canvas.stroke_rect(Rect::new(x, self.start_y, total, self.height()), stroke)?;
        for &ex in &edges[1..edges.len() - 1] {
            canvas.line((ex, self.start_y), (ex, self.end_y), stroke)?;
        }
        Ok(())
    }
}

pub(crate) fn draw_header(
    canvas: &mut PageCanvas,
    config: &LayoutConfig,
    x: f32,
    y: f32,
    widths: &[f32],
    headers: &[String],
    height: f32,
) -> Result<(), Error> {
    let total: f32 = widths.iter().sum();
    canvas.fill_rect(Rect::new(x, y, total, height), config.header_fill)?;
    let style = TextStyle::new(Face::HelveticaBold, config.header_font_size, BLACK);
    let pad = config.cell_padding;
    let mut cx = x;
    for (header, w) in headers.iter().zip(widths) {
        draw_text_block(
            canvas,
            header,
            style,
            cx + pad,
            y + pad,
            w - 2.0 * pad,
            Some(height - 2.0 * pad),
        )?;
        cx += w;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_row(
    canvas: &mut PageCanvas,
    config: &LayoutConfig,
    x: f32,
    y: f32,
    widths: &[f32],
    row: &Row,
    height: f32,
    shaded: bool,
) -> Result<(), Error> {
    if shaded {
        let total: f32 = widths.iter().sum();
        canvas.fill_rect(Rect::new(x, y, total, height), config.shaded_row_fill)?;
    }
    let style = TextStyle::new(Face::Helvetica, config.cell_font_size, BLACK);
    let pad = config.cell_padding;
    let mut cx = x;
    // rows shorter than the header leave their trailing cells blank
    for (cell, w) in row.iter().zip(widths) {
        draw_text_block(
            canvas,
            cell_text(cell),
            style,
            cx + pad,
            y + pad,
            w - 2.0 * pad,
            Some(height - 2.0 * pad),
        )?;
        cx += w;
    }
    Ok(())
}

/// Start a new page when the header bar and the first row cannot both fit
/// below `y`. Returns the Y the table should start at.
fn place_table_start(canvas: &mut PageCanvas, y: f32, needed: f32) -> f32 {
    if y + needed > canvas.bottom() && y > canvas.top() {
        log::debug!("table head does not fit at y={y:.2}; moving to next page");
        canvas.add_page();
        return canvas.top();
    }
    y
}

/// Uniform-height table: header bar, then one `config.row_height` row per
/// input row, grid borders per page segment. Returns the cursor for the next
/// section.
pub(crate) fn render_fixed_table(
    canvas: &mut PageCanvas,
    config: &LayoutConfig,
    origin: (f32, f32),
    width: f32,
    table: &Table,
) -> Result<f32, Error> {
    let widths = table.resolve_widths(width)?;
    let rh = config.row_height;
    let x = origin.0;
    let first = if table.rows.is_empty() { 0.0 } else { rh };
    let mut y = place_table_start(canvas, origin.1, rh + first);

    let mut segment = Segment::new(y);
    draw_header(canvas, config, x, y, &widths, &table.headers, rh)?;
    y += rh;

    for (ri, row) in table.rows.iter().enumerate() {
        if y + rh > canvas.bottom() {
            segment.end_y = y;
            segment.stroke_grid(canvas, x, &widths, rh, config.border)?;
            canvas.add_page();
            y = canvas.top();
            segment = Segment::new(y);
            draw_header(canvas, config, x, y, &widths, &table.headers, rh)?;
            y += rh;
        }
        log::debug!(
            "FIXED row={} page={} y={:.2}",
            ri,
            canvas.page_index(),
            y
        );
        draw_row(canvas, config, x, y, &widths, row, rh, ri % 2 == 0)?;
        y += rh;
    }

    segment.end_y = y;
    segment.stroke_grid(canvas, x, &widths, rh, config.border)?;
    canvas.set_cursor(y)?;
    Ok(y + config.table_gap)
}

/// Row height estimate used when a cell cannot be measured: grows by one step
/// per `fallback_chars_per_step` chars once the text passes the threshold.
pub(crate) fn fallback_row_height(config: &LayoutConfig, text: &str, min_row_height: f32) -> f32 {
    let len = text.chars().count();
    if len > config.fallback_text_threshold {
        let steps = (len / config.fallback_chars_per_step) as f32;
        (min_row_height + steps * config.fallback_step_height).min(config.fallback_max_height)
    } else {
        min_row_height
    }
}

/// Tallest wrapped cell of `row` plus padding, never below `min_row_height`
/// and never above `config.max_row_height`.
pub(crate) fn dynamic_row_height(
    config: &LayoutConfig,
    row: &Row,
    widths: &[f32],
    min_row_height: f32,
) -> f32 {
    let pad = config.cell_padding;
    let mut height = min_row_height;
    for (ci, cell) in row.iter().enumerate() {
        let text = cell_text(cell);
        let col_w = widths.get(ci).or(widths.first()).copied().unwrap_or(0.0);
        match measure_text_height(text, Face::Helvetica, config.cell_font_size, col_w - 2.0 * pad) {
            Ok(h) => height = height.max(h + 2.0 * pad),
            Err(e) => {
                log::warn!("measuring cell {ci} failed ({e}); estimating from text length");
                height = height.max(fallback_row_height(config, text, min_row_height));
            }
        }
    }
    height.min(config.max_row_height)
}

/// Table whose rows grow to fit their wrapped text. Borders are one outline
/// per page segment plus internal column separators.
pub(crate) fn render_dynamic_table(
    canvas: &mut PageCanvas,
    config: &LayoutConfig,
    origin: (f32, f32),
    width: f32,
    table: &Table,
    options: DynamicOptions,
) -> Result<f32, Error> {
    let widths = table.resolve_widths(width)?;
    let min = options.min_row_height;
    if !(min.is_finite() && min > 0.0 && min <= config.max_row_height) {
        return Err(Error::Geometry(format!(
            "minimum row height {min} outside 0..={}",
            config.max_row_height
        )));
    }
    let heights: Vec<f32> = table
        .rows
        .iter()
        .map(|row| dynamic_row_height(config, row, &widths, min))
        .collect();

    let x = origin.0;
    let header_h = min;
    let first = heights.first().copied().unwrap_or(0.0);
    let mut y = place_table_start(canvas, origin.1, header_h + first);

    let mut segment = Segment::new(y);
    draw_header(canvas, config, x, y, &widths, &table.headers, header_h)?;
    y += header_h;

    for (ri, (row, &rh)) in table.rows.iter().zip(heights.iter()).enumerate() {
        if y + rh > canvas.bottom() {
            segment.end_y = y;
            segment.stroke_outline(canvas, x, &widths, config.border)?;
            canvas.add_page();
            y = canvas.top();
            segment = Segment::new(y);
            draw_header(canvas, config, x, y, &widths, &table.headers, header_h)?;
            y += header_h;
        }
        log::debug!(
            "DYNAMIC row={} row_h={:.2} page={} y={:.2}",
            ri,
            rh,
            canvas.page_index(),
            y
        );
        draw_row(canvas, config, x, y, &widths, row, rh, ri % 2 == 0)?;
        y += rh;
    }

    segment.end_y = y;
    segment.stroke_outline(canvas, x, &widths, config.border)?;
    canvas.set_cursor(y)?;
    Ok(y + config.table_gap)
}
