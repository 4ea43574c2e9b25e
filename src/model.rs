use crate::error::Error;

/// Text drawn for cells with no value.
pub const PLACEHOLDER: &str = "N/A";

/// A4 in points.
pub const A4: (f32, f32) = (595.28, 841.89);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Stroke colour and width for table borders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: [u8; 3],
    pub width: f32,
}

/// Every dimension and colour the layout engine uses. `Default` gives the
/// Annexure-I house style.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margins: Margins,
    /// Left edge of every table and heading.
    pub table_x: f32,
    pub table_width: f32,
    /// Uniform row height of fixed-row tables, also their header bar height.
    pub row_height: f32,
    /// Inset of cell text from the cell edges.
    pub cell_padding: f32,
    /// Space left below a table before the next section.
    pub table_gap: f32,
    pub heading_advance: f32,
    pub subheading_advance: f32,
    pub placeholder_advance: f32,
    pub header_font_size: f32,
    pub cell_font_size: f32,
    pub heading_font_size: f32,
    pub subheading_font_size: f32,
    pub placeholder_font_size: f32,
    /// Upper bound on a measured dynamic row.
    pub max_row_height: f32,
    /// Texts longer than this many chars grow the row when measurement fails.
    pub fallback_text_threshold: usize,
    pub fallback_chars_per_step: usize,
    pub fallback_step_height: f32,
    pub fallback_max_height: f32,
    pub heading_color: [u8; 3],
    pub header_fill: [u8; 3],
    pub shaded_row_fill: [u8; 3],
    pub border: Stroke,
    pub footer_color: [u8; 3],
    /// Move a heading to the next page when its table could not start below it.
    pub keep_heading_with_table: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: A4.0,
            page_height: A4.1,
            margins: Margins::all(40.0),
            table_x: 40.0,
            table_width: 515.0,
            row_height: 18.0,
            cell_padding: 3.0,
            table_gap: 5.0,
            heading_advance: 18.0,
            subheading_advance: 15.0,
            placeholder_advance: 15.0,
            header_font_size: 8.0,
            cell_font_size: 7.0,
            heading_font_size: 12.0,
            subheading_font_size: 10.0,
            placeholder_font_size: 8.0,
            max_row_height: 160.0,
            fallback_text_threshold: 50,
            fallback_chars_per_step: 60,
            fallback_step_height: 8.0,
            fallback_max_height: 120.0,
            heading_color: [0x2c, 0x3e, 0x50],
            header_fill: [0xe0, 0xe0, 0xe0],
            shaded_row_fill: [0xf8, 0xf8, 0xf8],
            border: Stroke {
                color: [0xcc, 0xcc, 0xcc],
                width: 0.5,
            },
            footer_color: [0x66, 0x66, 0x66],
            keep_heading_with_table: true,
        }
    }
}

impl LayoutConfig {
    /// Same house style with a different margin on every side. The table keeps
    /// spanning the full usable width.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margins = Margins::all(margin);
        self.table_x = margin;
        self.table_width = self.page_width - 2.0 * margin;
        self
    }

    pub fn page_top(&self) -> f32 {
        self.margins.top
    }

    pub fn page_bottom(&self) -> f32 {
        self.page_height - self.margins.bottom
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margins.left - self.margins.right
    }
}

pub type Cell = Option<String>;
pub type Row = Vec<Cell>;

pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    /// Column widths in points, scaled to the drawn table width when they sum
    /// to something else. The table width is split evenly when absent.
    pub column_widths: Option<Vec<f32>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            column_widths: None,
        }
    }

    pub fn with_widths(mut self, widths: Vec<f32>) -> Self {
        self.column_widths = Some(widths);
        self
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Label/value row: the label is always present, the value may be missing.
    pub fn push_pair(&mut self, label: &str, value: Cell) {
        self.rows.push(vec![Some(label.to_string()), value]);
    }

    /// Resolved column widths for a table drawn `width` points wide. Checks
    /// that widths and rows agree with the header count.
    ///
    /// ```
    /// use annexure_pdf::Table;
    ///
    /// let table = Table::new(["Bank Details", "Information"]).with_widths(vec![300.0, 200.0]);
    /// assert_eq!(table.resolve_widths(250.0).unwrap(), vec![150.0, 100.0]);
    /// ```
    pub fn resolve_widths(&self, width: f32) -> Result<Vec<f32>, Error> {
        let ncols = self.headers.len();
        if ncols == 0 {
            return Err(Error::Table("table has no columns".into()));
        }
        let widths = match &self.column_widths {
            Some(w) if w.len() != ncols => {
                return Err(Error::Table(format!(
                    "{} column widths for {} headers",
                    w.len(),
                    ncols
                )));
            }
            Some(w) => w.clone(),
            None => vec![width / ncols as f32; ncols],
        };
        if let Some(bad) = widths.iter().find(|w| !w.is_finite() || **w <= 0.0) {
            return Err(Error::Geometry(format!("column width {bad}")));
        }
        // explicit widths are proportions of the table width
        let total: f32 = widths.iter().sum();
        let widths: Vec<f32> = if (total - width).abs() > 0.01 && width.is_finite() && width > 0.0 {
            widths.iter().map(|w| w * width / total).collect()
        } else {
            widths
        };
        if let Some((ri, row)) = self.rows.iter().enumerate().find(|(_, r)| r.len() > ncols) {
            return Err(Error::Table(format!(
                "row {ri} has {} cells for {ncols} columns",
                row.len()
            )));
        }
        Ok(widths)
    }
}

/// Text of a cell as drawn: missing and empty values become [`PLACEHOLDER`].
pub fn cell_text(cell: &Cell) -> &str {
    match cell.as_deref() {
        Some(s) if !s.is_empty() => s,
        _ => PLACEHOLDER,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicOptions {
    pub min_row_height: f32,
}

impl Default for DynamicOptions {
    fn default() -> Self {
        Self {
            min_row_height: 18.0,
        }
    }
}

/// How a section's table is laid out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TableStrategy {
    /// Uniform row height; for short label/value cells.
    FixedRow,
    /// Rows grow to fit their wrapped text.
    DynamicRow(DynamicOptions),
    /// Prefer the renderer's auto-layout capability, falling back to `DynamicRow`.
    AutoLayout(DynamicOptions),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadingStyle {
    Section,
    Subsection,
}

pub enum SectionBody {
    Table(Table),
    /// A single line drawn instead of a table, e.g. when the section has no data.
    Placeholder(String),
}

pub struct Section {
    pub title: String,
    pub heading: HeadingStyle,
    pub body: SectionBody,
    pub strategy: TableStrategy,
    /// Start a new page before the heading when the cursor is already below this Y.
    pub break_threshold: Option<f32>,
}

impl Section {
    pub fn table(title: impl Into<String>, table: Table, strategy: TableStrategy) -> Self {
        Self {
            title: title.into(),
            heading: HeadingStyle::Section,
            body: SectionBody::Table(table),
            strategy,
            break_threshold: None,
        }
    }

    pub fn placeholder(title: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            heading: HeadingStyle::Section,
            body: SectionBody::Placeholder(line.into()),
            strategy: TableStrategy::FixedRow,
            break_threshold: None,
        }
    }

    pub fn subsection(mut self) -> Self {
        self.heading = HeadingStyle::Subsection;
        self
    }

    pub fn break_below(mut self, y: f32) -> Self {
        self.break_threshold = Some(y);
        self
    }
}

/// Title block drawn once at the top of the first page and the closing footer line.
#[derive(Clone, Debug)]
pub struct DocumentFrame {
    pub title: String,
    pub subtitle: Option<String>,
    pub footer: Option<String>,
}
