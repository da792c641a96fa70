//! Derived-state hook.
//!
//! After every text change the editor hands the session to its [`DocumentProcessor`] (the
//! syntax highlighter) and applies the returned [`ProcessingEdit`]s. Processors see the whole
//! session and always recompute from scratch.

use crate::DocumentSession;
use crate::intervals::{Interval, StyleLayerId};
use std::convert::Infallible;

/// One change to a session's style layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingEdit {
    /// Replace an entire style layer with the given intervals (char offsets).
    ReplaceStyleLayer {
        /// Target layer.
        layer: StyleLayerId,
        /// New contents of the layer, sorted and non-overlapping.
        intervals: Vec<Interval>,
    },
    /// Clear a style layer.
    ClearStyleLayer {
        /// Target layer.
        layer: StyleLayerId,
    },
}

/// Computes derived state for a session.
pub trait DocumentProcessor {
    /// The error type returned by [`DocumentProcessor::process`].
    type Error;

    /// Edits to apply to `session`, computed from its full text.
    fn process(&mut self, session: &DocumentSession) -> Result<Vec<ProcessingEdit>, Self::Error>;
}

/// Plain text: no highlighting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProcessor;

impl DocumentProcessor for NoopProcessor {
    type Error = Infallible;

    fn process(&mut self, _session: &DocumentSession) -> Result<Vec<ProcessingEdit>, Self::Error> {
        Ok(Vec::new())
    }
}
