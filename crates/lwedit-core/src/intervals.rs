//! Style intervals (highlight tags) grouped into replaceable layers.

use std::collections::BTreeMap;

/// Style ID type
///
/// These are only identifiers. The UI/theme layer maps them to actual colors.
pub type StyleId = u32;

/// Built-in style id for the current search match.
pub const SEARCH_MATCH_STYLE_ID: StyleId = 0x0100_0001;

/// Style layer ID
///
/// Distinguishes style sources so one layer can be replaced or cleared without touching the
/// others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StyleLayerId(pub u32);

impl StyleLayerId {
    /// Create a style layer id from a raw numeric identifier.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Syntax highlighting layer (keyword / string / comment / function name tags).
    pub const SYNTAX: Self = Self(1);

    /// Current search match.
    pub const SEARCH: Self = Self(2);
}

/// Interval structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Start character offset
    pub start: usize,
    /// End character offset (exclusive)
    pub end: usize,
    /// Style ID
    pub style_id: StyleId,
}

impl Interval {
    /// Create a new interval with `[start, end)` offsets and a style id.
    pub fn new(start: usize, end: usize, style_id: StyleId) -> Self {
        Self {
            start,
            end,
            style_id,
        }
    }

    /// Check if interval contains a specific position
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Check if two intervals overlap
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Per-layer style intervals.
///
/// Each layer holds a sorted list of intervals. Layers are only ever replaced or cleared as a
/// whole; nothing is patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct StyleLayers {
    layers: BTreeMap<StyleLayerId, Vec<Interval>>,
}

impl StyleLayers {
    /// Create an empty set of layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every interval of `layer`. Empty intervals are dropped.
    pub fn replace_layer(&mut self, layer: StyleLayerId, mut intervals: Vec<Interval>) {
        intervals.retain(|interval| interval.start < interval.end);
        intervals.sort_by_key(|interval| (interval.start, interval.end));
        self.layers.insert(layer, intervals);
    }

    /// Drop all intervals of `layer`.
    pub fn clear_layer(&mut self, layer: StyleLayerId) {
        self.layers.remove(&layer);
    }

    /// Intervals of a single layer, sorted by start.
    pub fn layer(&self, layer: StyleLayerId) -> &[Interval] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty layers.
    pub fn layer_count(&self) -> usize {
        self.layers.values().filter(|v| !v.is_empty()).count()
    }

    /// Total interval count across layers.
    pub fn interval_count(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    /// Style ids covering `pos`, in layer order.
    pub fn styles_at(&self, pos: usize) -> Vec<StyleId> {
        let mut styles = Vec::new();
        for intervals in self.layers.values() {
            // Intervals are sorted by start; only those starting at or before `pos` can match.
            let upper = intervals.partition_point(|interval| interval.start <= pos);
            styles.extend(
                intervals[..upper]
                    .iter()
                    .filter(|interval| interval.contains(pos))
                    .map(|interval| interval.style_id),
            );
        }
        styles
    }

    /// Intervals of `layer` overlapping the half-open range `[start, end)`.
    pub fn query_range(&self, layer: StyleLayerId, start: usize, end: usize) -> Vec<&Interval> {
        let probe = Interval::new(start, end, 0);
        let intervals = self.layer(layer);
        let upper = intervals.partition_point(|interval| interval.start < end);
        intervals[..upper]
            .iter()
            .filter(|interval| interval.overlaps(&probe))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_layer_sorts_and_drops_empty() {
        let mut layers = StyleLayers::new();
        layers.replace_layer(
            StyleLayerId::SYNTAX,
            vec![
                Interval::new(5, 8, 2),
                Interval::new(3, 3, 9),
                Interval::new(0, 3, 1),
            ],
        );

        let layer = layers.layer(StyleLayerId::SYNTAX);
        assert_eq!(layer, &[Interval::new(0, 3, 1), Interval::new(5, 8, 2)]);
        assert_eq!(layers.styles_at(1), vec![1]);
        assert!(layers.styles_at(4).is_empty());
        assert_eq!(layers.query_range(StyleLayerId::SYNTAX, 2, 6).len(), 2);
    }

    #[test]
    fn test_layers_are_independent() {
        let mut layers = StyleLayers::new();
        layers.replace_layer(StyleLayerId::SYNTAX, vec![Interval::new(0, 4, 1)]);
        layers.replace_layer(StyleLayerId::SEARCH, vec![Interval::new(2, 6, 7)]);
        assert_eq!(layers.styles_at(3), vec![1, 7]);

        layers.clear_layer(StyleLayerId::SEARCH);
        assert_eq!(layers.styles_at(3), vec![1]);
        assert_eq!(layers.layer_count(), 1);
    }
}
