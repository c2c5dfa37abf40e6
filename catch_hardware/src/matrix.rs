use catch_traits::{BoxError, DotMatrix, TextMode};

use crate::error::HwError;

/// In-memory LED matrix. Cells are row-major; `render_ascii` draws the
/// last refreshed frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    rows: u8,
    cols: u8,
    cells: Vec<bool>,
    shown: Vec<bool>,
    text: Option<String>,
    mode: TextMode,
    frames: u64,
}

impl FrameBuffer {
    pub fn new(rows: u8, cols: u8) -> Self {
        let n = usize::from(rows) * usize::from(cols);
        Self {
            rows,
            cols,
            cells: vec![false; n],
            shown: vec![false; n],
            text: None,
            mode: TextMode::Scroll,
            frames: 0,
        }
    }

    fn index(&self, row: u8, col: u8) -> Option<usize> {
        (row < self.rows && col < self.cols)
            .then(|| usize::from(row) * usize::from(self.cols) + usize::from(col))
    }

    /// State of a cell as of the last refresh.
    pub fn lit(&self, row: u8, col: u8) -> bool {
        self.index(row, col).is_some_and(|i| self.shown[i])
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    /// Number of refreshes so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One line per row, `#` for lit and `.` for dark.
    pub fn render_ascii(&self) -> String {
        let mut s = String::with_capacity(self.shown.len() + usize::from(self.rows));
        for row in self.shown.chunks(usize::from(self.cols.max(1))) {
            s.extend(row.iter().map(|&on| if on { '#' } else { '.' }));
            s.push('\n');
        }
        s
    }
}

impl DotMatrix for FrameBuffer {
    fn set_cell(&mut self, row: u8, col: u8, on: bool) -> Result<(), BoxError> {
        let i = self.index(row, col).ok_or(HwError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        })?;
        self.cells[i] = on;
        Ok(())
    }

    fn refresh(&mut self) -> Result<(), BoxError> {
        self.shown.copy_from_slice(&self.cells);
        self.frames += 1;
        Ok(())
    }

    fn show_text(&mut self, text: &str) -> Result<(), BoxError> {
        tracing::trace!(text, mode = ?self.mode, "matrix text");
        self.text = Some(text.to_string());
        Ok(())
    }

    fn set_text_mode(&mut self, mode: TextMode) -> Result<(), BoxError> {
        self.mode = mode;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), BoxError> {
        self.cells.fill(false);
        self.text = None;
        Ok(())
    }
}
