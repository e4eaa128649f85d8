//! Renderer options.

/// Options for the plain-text preview.
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Maximum number of rows shown
    pub max_rows: usize,

    /// Maximum number of columns shown
    pub max_columns: usize,

    /// Cells wider than this (in terminal columns) are cut with `…`
    pub max_cell_width: usize,

    /// Text shown for null cells
    pub null_marker: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            max_rows: 100,
            max_columns: 50,
            max_cell_width: 40,
            null_marker: String::new(),
        }
    }
}

impl TextOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row limit.
    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows;
        self
    }

    /// Set the column limit.
    pub fn with_max_columns(mut self, columns: usize) -> Self {
        self.max_columns = columns;
        self
    }

    /// Set the cell width limit.
    pub fn with_max_cell_width(mut self, width: usize) -> Self {
        self.max_cell_width = width.max(1);
        self
    }

    /// Set the text used for null cells.
    pub fn with_null_marker(mut self, marker: impl Into<String>) -> Self {
        self.null_marker = marker.into();
        self
    }
}

/// Options for spreadsheet output.
#[derive(Debug, Clone)]
pub struct XlsxOptions {
    /// Name of the first worksheet
    pub sheet_name: String,

    /// Render the header row in bold
    pub bold_header: bool,

    /// Keep the header row visible while scrolling
    pub freeze_header: bool,
}

impl Default for XlsxOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            bold_header: true,
            freeze_header: true,
        }
    }
}

impl XlsxOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first worksheet's name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Enable or disable the bold header style.
    pub fn with_bold_header(mut self, bold: bool) -> Self {
        self.bold_header = bold;
        self
    }

    /// Enable or disable freezing the header row.
    pub fn with_freeze_header(mut self, freeze: bool) -> Self {
        self.freeze_header = freeze;
        self
    }
}
