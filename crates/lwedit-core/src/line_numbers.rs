//! Line number gutter labels.
//!
//! The gutter is derived state: it is rebuilt from the full buffer text after every edit and
//! never diffed against the previous labels.

/// Render the gutter labels `"1".."N"` for `text`.
///
/// The text is split on `'\n'`; every segment gets one label except the trailing empty segment
/// produced by a final newline. An empty text still has one (empty) line.
pub fn render_line_numbers(text: &str) -> Vec<String> {
    (1..=line_label_count(text)).map(|n| n.to_string()).collect()
}

/// Number of labels [`render_line_numbers`] produces for `text`.
pub fn line_label_count(text: &str) -> usize {
    let segments = text.split('\n').count();
    if text.ends_with('\n') {
        segments - 1
    } else {
        segments
    }
}

/// Cached gutter labels for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineNumbers {
    labels: Vec<String>,
}

impl Default for LineNumbers {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl LineNumbers {
    /// Build labels for `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            labels: render_line_numbers(text),
        }
    }

    /// Replace all labels with those for `text`.
    pub fn rebuild(&mut self, text: &str) {
        self.labels = render_line_numbers(text);
    }

    /// All labels, in order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label for a zero-based line, if that line is numbered.
    pub fn label(&self, line: usize) -> Option<&str> {
        self.labels.get(line).map(String::as_str)
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always `false`: there is at least one label.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width in cells of the widest label.
    pub fn gutter_width(&self) -> usize {
        self.labels.last().map(String::len).unwrap_or(1)
    }
}
