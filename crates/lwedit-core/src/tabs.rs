//! Tab manager: owns every open [`DocumentSession`] and tracks the active one.
//!
//! Invariants maintained by every public operation:
//! - at least one tab is open (closing the last tab opens a fresh untitled one)
//! - exactly one tab is active
//! - tab order is creation order

use crate::session::DocumentSession;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Opaque identifier for an open tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(u64);

impl TabId {
    /// Get the underlying numeric id.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Structured tab label for rendering a tab strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabLabel {
    /// The tab this label belongs to.
    pub id: TabId,
    /// Base name of the backing file, or `Untitled`.
    pub name: String,
    /// Whether the tab shows a close glyph.
    pub closable: bool,
    /// Whether the session has unsaved changes.
    pub modified: bool,
    /// Whether this is the active tab.
    pub active: bool,
}

/// Tab manager errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabError {
    /// A tab id was not found.
    #[error("no such tab: {}", .0.get())]
    TabNotFound(TabId),
    /// Another tab is already bound to this path.
    #[error("{} is already open in another tab", .0.display())]
    PathAlreadyOpen(PathBuf),
}

/// The set of open document sessions.
#[derive(Debug)]
pub struct TabManager {
    next_id: u64,
    sessions: BTreeMap<TabId, DocumentSession>,
    active: TabId,
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManager {
    /// A manager holding a single untitled tab.
    pub fn new() -> Self {
        let first = TabId(0);
        let mut sessions = BTreeMap::new();
        sessions.insert(first, DocumentSession::new_untitled());
        Self {
            next_id: 1,
            sessions,
            active: first,
        }
    }

    /// Number of open tabs (never zero).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Always `false`: a manager is never empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Open tab ids in tab order.
    pub fn ids(&self) -> Vec<TabId> {
        self.sessions.keys().copied().collect()
    }

    /// Whether `id` is open.
    pub fn contains(&self, id: TabId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// The active tab id.
    pub fn active_id(&self) -> TabId {
        self.active
    }

    /// The active session.
    pub fn active(&self) -> &DocumentSession {
        // Invariant: `active` always names an open tab.
        &self.sessions[&self.active]
    }

    /// The active session, mutably.
    pub fn active_mut(&mut self) -> &mut DocumentSession {
        self.sessions
            .get_mut(&self.active)
            .expect("active tab is always open")
    }

    /// Look up a session.
    pub fn get(&self, id: TabId) -> Option<&DocumentSession> {
        self.sessions.get(&id)
    }

    /// Look up a session mutably.
    pub fn get_mut(&mut self, id: TabId) -> Option<&mut DocumentSession> {
        self.sessions.get_mut(&id)
    }

    /// Tab showing `path`, if one is open.
    pub fn find_by_path(&self, path: &Path) -> Option<TabId> {
        self.sessions
            .iter()
            .find(|(_, session)| session.path() == Some(path))
            .map(|(id, _)| *id)
    }

    /// Check that `id` may be bound to `path`: no other tab may own it.
    pub fn check_path_free(&self, id: TabId, path: &Path) -> Result<(), TabError> {
        match self.find_by_path(path) {
            Some(owner) if owner != id => Err(TabError::PathAlreadyOpen(path.to_path_buf())),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, session: DocumentSession) -> TabId {
        let id = TabId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.sessions.insert(id, session);
        self.active = id;
        id
    }

    /// Create an empty untitled tab and make it active.
    pub fn new_untitled(&mut self) -> TabId {
        let id = self.insert(DocumentSession::new_untitled());
        debug!(tab = id.get(), "new untitled tab");
        id
    }

    /// Open `content` from `path` in a new active tab.
    ///
    /// If `path` is already open, that tab is selected instead and `content` is ignored.
    pub fn open(&mut self, path: PathBuf, content: &str) -> TabId {
        if let Some(existing) = self.find_by_path(&path) {
            debug!(tab = existing.get(), path = %path.display(), "already open, selecting");
            self.active = existing;
            return existing;
        }

        let label = path.display().to_string();
        let id = self.insert(DocumentSession::with_content(Some(path), content));
        debug!(tab = id.get(), path = %label, "opened tab");
        id
    }

    /// Make `id` the active tab.
    pub fn select(&mut self, id: TabId) -> Result<(), TabError> {
        if !self.sessions.contains_key(&id) {
            return Err(TabError::TabNotFound(id));
        }
        self.active = id;
        debug!(tab = id.get(), "selected tab");
        Ok(())
    }

    /// Select the tab after the active one, wrapping around.
    pub fn select_next(&mut self) {
        let ids = self.ids();
        if let Some(pos) = ids.iter().position(|id| *id == self.active) {
            self.active = ids[(pos + 1) % ids.len()];
        }
    }

    /// Select the tab before the active one, wrapping around.
    pub fn select_prev(&mut self) {
        let ids = self.ids();
        if let Some(pos) = ids.iter().position(|id| *id == self.active) {
            self.active = ids[(pos + ids.len() - 1) % ids.len()];
        }
    }

    /// Close a tab.
    ///
    /// If it was the active tab, the tab that takes its place in the strip (or the previous
    /// one, at the end) becomes active. Closing the last tab opens a fresh untitled one.
    pub fn close(&mut self, id: TabId) -> Result<DocumentSession, TabError> {
        let ids = self.ids();
        let Some(index) = ids.iter().position(|open| *open == id) else {
            return Err(TabError::TabNotFound(id));
        };
        let Some(session) = self.sessions.remove(&id) else {
            return Err(TabError::TabNotFound(id));
        };
        debug!(tab = id.get(), "closed tab");

        if self.sessions.is_empty() {
            self.new_untitled();
        } else if self.active == id {
            let remaining = self.ids();
            self.active = remaining[index.min(remaining.len() - 1)];
        }

        Ok(session)
    }

    /// Structured labels for every tab, in order.
    pub fn labels(&self) -> Vec<TabLabel> {
        self.sessions
            .iter()
            .map(|(id, session)| TabLabel {
                id: *id,
                name: session.display_name(),
                closable: true,
                modified: session.is_modified(),
                active: *id == self.active,
            })
            .collect()
    }

    /// Sessions with unsaved changes.
    pub fn modified_count(&self) -> usize {
        self.sessions.values().filter(|s| s.is_modified()).count()
    }

    /// Iterate over every open session in tab order.
    pub fn iter(&self) -> impl Iterator<Item = (TabId, &DocumentSession)> {
        self.sessions.iter().map(|(id, session)| (*id, session))
    }

    /// Iterate mutably over every open session in tab order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TabId, &mut DocumentSession)> {
        self.sessions.iter_mut().map(|(id, session)| (*id, session))
    }
}
