//! Tab strip geometry and hit-testing.
//!
//! Labels are laid out from their actual rendered width (terminal cells, via `unicode-width`),
//! so the close glyph's position is known exactly instead of being guessed from a fixed
//! threshold.

use crate::tabs::{TabId, TabLabel};
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Glyph drawn at the right end of a closable tab.
pub const CLOSE_GLYPH: &str = "✖";

/// Marker appended to the name of a modified session.
pub const MODIFIED_MARKER: &str = "*";

const ELLIPSIS: &str = "…";

/// Cells between two tabs.
pub const TAB_GAP: usize = 1;

/// A laid-out tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabSegment {
    /// The tab this segment renders.
    pub id: TabId,
    /// Rendered text, close glyph included.
    pub text: String,
    /// Cells covered by the whole tab, relative to the strip's left edge.
    pub cells: Range<usize>,
    /// Cells covered by the close glyph, if the tab is closable.
    pub close_cells: Option<Range<usize>>,
    /// Whether this is the active tab.
    pub active: bool,
}

/// Result of a click on the tab strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabHit {
    /// The click landed on the tab's label.
    Select(TabId),
    /// The click landed on the tab's close glyph.
    Close(TabId),
}

/// Laid-out tab strip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabStrip {
    segments: Vec<TabSegment>,
}

fn segment_parts(label: &TabLabel) -> (String, Option<String>) {
    let marker = if label.modified { MODIFIED_MARKER } else { "" };
    let head = format!(" {}{} ", label.name, marker);
    let close = label.closable.then(|| format!("{CLOSE_GLYPH} "));
    (head, close)
}

/// `text` cut to at most `budget` cells, ending in `…` when shortened.
fn truncate_to_width(text: &str, budget: usize) -> String {
    if text.width() <= budget {
        return text.to_string();
    }
    if budget == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget - ELLIPSIS.width() {
            break;
        }
        out.push(ch);
        used += width;
    }
    out.push_str(ELLIPSIS);
    out
}

impl TabStrip {
    /// Lay out `labels` left to right within `max_width` cells.
    ///
    /// When the tabs do not fit, tabs are dropped from the left until the active tab is visible.
    /// An active tab wider than the whole strip is shown alone with its name shortened.
    pub fn layout(labels: &[TabLabel], max_width: usize) -> Self {
        let widths: Vec<usize> = labels
            .iter()
            .map(|label| {
                let (head, close) = segment_parts(label);
                head.width() + close.as_deref().map_or(0, UnicodeWidthStr::width)
            })
            .collect();

        let active_index = labels.iter().position(|l| l.active).unwrap_or(0);
        let mut first = 0;
        while first < active_index && Self::span(&widths[first..=active_index]) > max_width {
            first += 1;
        }

        let mut segments = Vec::new();
        let mut x = 0;
        for (label, width) in labels.iter().zip(&widths).skip(first) {
            if x + width > max_width {
                if label.active && segments.is_empty() {
                    segments.push(Self::clipped_segment(label, max_width));
                }
                break;
            }

            let (head, close) = segment_parts(label);
            let close_cells = close.as_ref().map(|_| {
                let start = x + head.width();
                start..start + CLOSE_GLYPH.width()
            });
            let mut text = head;
            if let Some(close) = close {
                text.push_str(&close);
            }

            segments.push(TabSegment {
                id: label.id,
                text,
                cells: x..x + width,
                close_cells,
                active: label.active,
            });
            x += width + TAB_GAP;
        }

        Self { segments }
    }

    /// The active tab alone in a strip too narrow for it: the name is cut short so the close
    /// glyph stays on screen.
    fn clipped_segment(label: &TabLabel, max_width: usize) -> TabSegment {
        let (head, close) = segment_parts(label);
        let close = close.filter(|close| close.width() < max_width);
        let close_width = close.as_deref().map_or(0, UnicodeWidthStr::width);
        let mut text = truncate_to_width(&head, max_width - close_width);

        let close_cells = close.as_ref().map(|_| {
            let start = text.width();
            start..start + CLOSE_GLYPH.width()
        });
        if let Some(close) = close {
            text.push_str(&close);
        }

        TabSegment {
            id: label.id,
            cells: 0..text.width(),
            text,
            close_cells,
            active: true,
        }
    }

    fn span(widths: &[usize]) -> usize {
        let gaps = widths.len().saturating_sub(1) * TAB_GAP;
        widths.iter().sum::<usize>() + gaps
    }

    /// Laid-out tabs, left to right.
    pub fn segments(&self) -> &[TabSegment] {
        &self.segments
    }

    /// Classify a click at `column` (cells from the strip's left edge).
    pub fn hit_test(&self, column: usize) -> Option<TabHit> {
        let segment = self
            .segments
            .iter()
            .find(|segment| segment.cells.contains(&column))?;

        match &segment.close_cells {
            Some(close) if close.contains(&column) => Some(TabHit::Close(segment.id)),
            _ => Some(TabHit::Select(segment.id)),
        }
    }
}
