//! Test doubles shared by the unit tests.

#![allow(dead_code)]

use crate::backend::{DisplayError, Rect, RenderBackend, Rgb565};

/// One recorded draw primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DrawOp {
    Clear,
    Cursor(u16, u16),
    Text(String),
    Fill(Rect, Rgb565),
    Color(Rgb565),
}

/// Backend that records every primitive and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub(crate) ops: Vec<DrawOp>,
    pub(crate) fail: bool,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, op: DrawOp) -> Result<(), DisplayError> {
        if self.fail {
            return Err(DisplayError::Communication);
        }
        self.ops.push(op);
        Ok(())
    }

    /// Text printed since the last full-screen clear, with the cursor
    /// position it was printed at.
    pub(crate) fn printed(&self) -> Vec<(u16, u16, String)> {
        let start = self
            .ops
            .iter()
            .rposition(|op| *op == DrawOp::Clear)
            .map_or(0, |i| i + 1);
        let mut cursor = (0, 0);
        let mut out = Vec::new();
        for op in &self.ops[start..] {
            match op {
                DrawOp::Cursor(x, y) => cursor = (*x, *y),
                DrawOp::Text(text) => out.push((cursor.0, cursor.1, text.clone())),
                _ => {}
            }
        }
        out
    }

    /// Text printed at pixel row `y` since the last clear, latest last.
    pub(crate) fn printed_at_row(&self, y: u16) -> Vec<String> {
        self.printed()
            .into_iter()
            .filter(|(_, row, _)| *row == y)
            .map(|(_, _, text)| text)
            .collect()
    }

    pub(crate) fn clears(&self) -> usize {
        self.ops.iter().filter(|op| **op == DrawOp::Clear).count()
    }

    pub(crate) fn reset(&mut self) {
        self.ops.clear();
    }
}

impl RenderBackend for RecordingBackend {
    fn clear_screen(&mut self) -> Result<(), DisplayError> {
        self.record(DrawOp::Clear)
    }

    fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), DisplayError> {
        self.record(DrawOp::Cursor(x, y))
    }

    fn print_text(&mut self, text: &str) -> Result<(), DisplayError> {
        self.record(DrawOp::Text(text.to_string()))
    }

    fn fill_rect(&mut self, region: Rect, color: Rgb565) -> Result<(), DisplayError> {
        self.record(DrawOp::Fill(region, color))
    }

    fn set_text_color(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        self.record(DrawOp::Color(color))
    }
}
