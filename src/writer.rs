//! Indented line buffering for emitted source text.
//!
//! Backends write whole lines through a [`CodeWriter`]; every opened block
//! increases the indent by one unit and must be matched by a close before
//! the buffer is finished.

/// Number of spaces per indentation level.
const INDENT_WIDTH: usize = 4;

/// An in-memory sink accumulating one file's worth of source text.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    indent: usize,
    opened: usize,
    closed: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line at the current indentation.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent * INDENT_WIDTH {
            self.buf.push(' ');
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Append an empty line.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Append a block-opening line and indent subsequent lines one level.
    pub fn open(&mut self, text: &str) {
        self.line(text);
        self.indent += 1;
        self.opened += 1;
    }

    /// Dedent and append a block-closing line.
    pub fn close(&mut self, text: &str) {
        assert!(self.indent > 0, "close without matching open");
        self.indent -= 1;
        self.closed += 1;
        self.line(text);
    }

    /// Dedent for one line, then restore -- for block hinges like
    /// `} else {` that close one branch and open the next in place.
    pub fn hinge(&mut self, text: &str) {
        assert!(self.indent > 0, "hinge outside any block");
        self.indent -= 1;
        self.line(text);
        self.indent += 1;
    }

    /// Take the finished text, asserting every opened block was closed.
    pub fn finish(self) -> String {
        assert_eq!(
            self.opened, self.closed,
            "unbalanced blocks: {} opened, {} closed",
            self.opened, self.closed
        );
        self.buf
    }
}
