use thiserror::Error;

use super::canvas::PageCanvas;
use super::layout::{BLACK, TextStyle, build_text_lines, draw_text_block};
use super::table::render_dynamic_table;
use crate::error::Error as RenderError;
use crate::fonts::Face;
use crate::model::{DynamicOptions, LayoutConfig, Stroke, Table, cell_text};

/// Fonts and spacing handed to an [`AutoLayout`] implementation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoLayoutStyle {
    pub header_face: Face,
    pub header_size: f32,
    pub body_face: Face,
    pub body_size: f32,
    /// Horizontal gap between the text of neighbouring columns.
    pub column_spacing: f32,
    /// Space above and below the text of every row.
    pub padding: f32,
    pub rule: Stroke,
}

impl AutoLayoutStyle {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            header_face: Face::HelveticaBold,
            header_size: config.header_font_size,
            body_face: Face::Helvetica,
            body_size: config.cell_font_size,
            column_spacing: 5.0,
            padding: config.cell_padding,
            rule: config.border,
        }
    }
}

#[derive(Debug, Error)]
pub enum AutoLayoutError {
    #[error("column {column} needs {needed:.1}pt but only {available:.1}pt is left")]
    ColumnsTooNarrow {
        column: usize,
        needed: f32,
        available: f32,
    },

    #[error("row {row} is {height:.1}pt tall, more than a page holds ({available:.1}pt)")]
    RowTooTall {
        row: usize,
        height: f32,
        available: f32,
    },

    #[error(transparent)]
    Drawing(#[from] RenderError),
}

/// Pluggable whole-table layout. An implementation may size columns and rows
/// however it likes and may add pages; on error the caller rewinds the canvas
/// and draws the table with dynamic rows instead.
pub trait AutoLayout: Send + Sync {
    /// Draw `table` with its top-left corner at `origin`. Returns the Y just
    /// below the last row.
    fn render(
        &self,
        canvas: &mut PageCanvas,
        origin: (f32, f32),
        width: f32,
        table: &Table,
        style: &AutoLayoutStyle,
    ) -> Result<f32, AutoLayoutError>;
}

/// Built-in auto layout: columns widen to their longest word, rows size to
/// their wrapped text, and rules separate the header and every row.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoFitTable;

fn widest_word(text: &str, face: Face, size: f32) -> f32 {
    text.split_whitespace()
        .map(|word| face.text_width(word, size))
        .fold(0.0, f32::max)
}

/// Start from `widths` and grow every column that cannot hold its longest
/// word, taking the space back proportionally from columns with slack.
fn fit_columns(
    table: &Table,
    widths: &[f32],
    style: &AutoLayoutStyle,
) -> Result<Vec<f32>, AutoLayoutError> {
    let ncols = widths.len();
    let mut min_widths = vec![0.0f32; ncols];
    for (ci, header) in table.headers.iter().enumerate() {
        min_widths[ci] = widest_word(header, style.header_face, style.header_size);
    }
    for row in &table.rows {
        for (ci, cell) in row.iter().enumerate().take(ncols) {
            let ww = widest_word(cell_text(cell), style.body_face, style.body_size);
            min_widths[ci] = min_widths[ci].max(ww);
        }
    }
    for w in &mut min_widths {
        *w += style.column_spacing;
    }

    let total: f32 = widths.iter().sum();
    let needed: f32 = min_widths.iter().sum();
    if needed > total {
        let (column, col_needed) = min_widths
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0.0f32), |best, (i, w)| if w > best.1 { (i, w) } else { best });
        return Err(AutoLayoutError::ColumnsTooNarrow {
            column,
            needed: col_needed,
            available: total - (needed - col_needed),
        });
    }

    let mut fitted = widths.to_vec();
    let mut extra_needed = 0.0f32;
    let mut shrinkable = 0.0f32;
    for i in 0..ncols {
        if min_widths[i] > fitted[i] {
            extra_needed += min_widths[i] - fitted[i];
            fitted[i] = min_widths[i];
        } else {
            shrinkable += fitted[i] - min_widths[i];
        }
    }
    if extra_needed > 0.0 && shrinkable > 0.0 {
        let factor = extra_needed.min(shrinkable) / shrinkable;
        for i in 0..ncols {
            if fitted[i] > min_widths[i] {
                fitted[i] -= (fitted[i] - min_widths[i]) * factor;
            }
        }
        let new_total: f32 = fitted.iter().sum();
        if (new_total - total).abs() > 0.01 {
            let scale = total / new_total;
            for w in &mut fitted {
                *w *= scale;
            }
        }
    }
    Ok(fitted)
}

fn text_height(text: &str, face: Face, size: f32, width: f32) -> f32 {
    build_text_lines(text, face, size, width).len().max(1) as f32 * face.line_height(size)
}

impl AutoFitTable {
    fn header_height(&self, table: &Table, widths: &[f32], style: &AutoLayoutStyle) -> f32 {
        let tallest = table
            .headers
            .iter()
            .zip(widths)
            .map(|(h, w)| {
                text_height(h, style.header_face, style.header_size, w - style.column_spacing)
            })
            .fold(0.0, f32::max);
        tallest + 2.0 * style.padding
    }

    fn row_heights(
        &self,
        table: &Table,
        widths: &[f32],
        style: &AutoLayoutStyle,
        available: f32,
    ) -> Result<Vec<f32>, AutoLayoutError> {
        table
            .rows
            .iter()
            .enumerate()
            .map(|(ri, row)| {
                let tallest = row
                    .iter()
                    .zip(widths)
                    .map(|(cell, w)| {
                        text_height(
                            cell_text(cell),
                            style.body_face,
                            style.body_size,
                            w - style.column_spacing,
                        )
                    })
                    .fold(0.0, f32::max);
                let height = tallest + 2.0 * style.padding;
                if height > available {
                    return Err(AutoLayoutError::RowTooTall {
                        row: ri,
                        height,
                        available,
                    });
                }
                Ok(height)
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_cells<'a>(
        &self,
        canvas: &mut PageCanvas,
        texts: impl Iterator<Item = &'a str>,
        text_style: TextStyle,
        x: f32,
        y: f32,
        widths: &[f32],
        height: f32,
        style: &AutoLayoutStyle,
    ) -> Result<f32, RenderError> {
        let mut cx = x;
        for (text, w) in texts.zip(widths) {
            draw_text_block(
                canvas,
                text,
                text_style,
                cx,
                y + style.padding,
                w - style.column_spacing,
                Some(height - 2.0 * style.padding),
            )?;
            cx += w;
        }
        let right = x + widths.iter().sum::<f32>();
        canvas.line((x, y + height), (right, y + height), style.rule)?;
        Ok(y + height)
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_header(
        &self,
        canvas: &mut PageCanvas,
        table: &Table,
        x: f32,
        y: f32,
        widths: &[f32],
        height: f32,
        style: &AutoLayoutStyle,
    ) -> Result<f32, RenderError> {
        let text_style = TextStyle::new(style.header_face, style.header_size, BLACK);
        let texts = table.headers.iter().map(String::as_str);
        self.draw_cells(canvas, texts, text_style, x, y, widths, height, style)
    }
}

impl AutoLayout for AutoFitTable {
    fn render(
        &self,
        canvas: &mut PageCanvas,
        origin: (f32, f32),
        width: f32,
        table: &Table,
        style: &AutoLayoutStyle,
    ) -> Result<f32, AutoLayoutError> {
        let widths = fit_columns(table, &table.resolve_widths(width)?, style)?;
        let header_h = self.header_height(table, &widths, style);
        let available = canvas.bottom() - canvas.top() - header_h;
        let heights = self.row_heights(table, &widths, style, available)?;

        let x = origin.0;
        let mut y = origin.1;
        let first = heights.first().copied().unwrap_or(0.0);
        if y + header_h + first > canvas.bottom() && y > canvas.top() {
            canvas.add_page();
            y = canvas.top();
        }
        y = self.draw_header(canvas, table, x, y, &widths, header_h, style)?;

        let body = TextStyle::new(style.body_face, style.body_size, BLACK);
        for (ri, (row, &rh)) in table.rows.iter().zip(heights.iter()).enumerate() {
            if y + rh > canvas.bottom() {
                canvas.add_page();
                y = self.draw_header(canvas, table, x, canvas.top(), &widths, header_h, style)?;
            }
            log::debug!(
                "AUTO row={} row_h={:.2} page={} y={:.2}",
                ri,
                rh,
                canvas.page_index(),
                y
            );
            let texts = row.iter().map(cell_text);
            y = self.draw_cells(canvas, texts, body, x, y, &widths, rh, style)?;
        }
        Ok(y)
    }
}

/// Draw `table` with `auto_layout` when one is configured. Anything the
/// auto layout drew before failing is rolled back and the table is drawn
/// again with dynamic rows.
#[allow(clippy::too_many_arguments)]
pub(crate) fn render_auto_table(
    canvas: &mut PageCanvas,
    config: &LayoutConfig,
    auto_layout: Option<&dyn AutoLayout>,
    origin: (f32, f32),
    width: f32,
    table: &Table,
    options: DynamicOptions,
) -> Result<f32, RenderError> {
    let Some(auto_layout) = auto_layout else {
        return render_dynamic_table(canvas, config, origin, width, table, options);
    };
    let checkpoint = canvas.checkpoint();
    let style = AutoLayoutStyle::from_config(config);
    match auto_layout.render(canvas, origin, width, table, &style) {
        Ok(y) => {
            canvas.set_cursor(y)?;
            Ok(y + config.table_gap)
        }
        Err(e) => {
            log::warn!("auto layout failed: {e}; using dynamic rows");
            canvas.rollback(checkpoint);
            render_dynamic_table(canvas, config, origin, width, table, options)
        }
    }
}
