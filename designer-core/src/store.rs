//! Shared editor sessions for multi-component access.
//!
//! Provides a thread-safe [`DesignStore`] that hosts can share between the
//! visual editor and the markup editor so both see one consistent state.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::markup::MarkupError;
use crate::{Command, DesignerConfig, DesignerError, EditorState, ElementId, ProjectDocument};

/// Default session identifier.
pub const DEFAULT_SESSION: &str = "default";

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested session does not exist.
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    /// Markup was rejected by strict decoding.
    #[error("Markup rejected: {0}")]
    Markup(#[from] MarkupError),
    /// A replacement state violates document invariants.
    #[error("Integrity error: {0}")]
    Integrity(String),
}

impl From<DesignerError> for StoreError {
    fn from(err: DesignerError) -> Self {
        match err {
            DesignerError::Markup(e) => Self::Markup(e),
            other => Self::Integrity(other.to_string()),
        }
    }
}

/// Thread-safe editor sessions keyed by session ID.
///
/// Every write takes a single lock, so "apply a command, then re-encode"
/// is atomic with respect to other writers.
///
/// # Example
///
/// ```
/// use designer_core::store::{DesignStore, DEFAULT_SESSION};
/// use designer_core::{Command, ElementKind};
///
/// let store = DesignStore::new();
/// let (_, markup) = store
///     .apply(DEFAULT_SESSION, Command::Spawn { kind: ElementKind::Button, x: 40, y: 40 })
///     .unwrap();
/// assert!(markup.contains("<Button Name=\"Button_1\""));
/// ```
#[derive(Debug, Clone)]
pub struct DesignStore {
    sessions: Arc<RwLock<HashMap<String, EditorState>>>,
    config: DesignerConfig,
}

impl Default for DesignStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DesignStore {
    /// Create a store holding an empty default session.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DesignerConfig::default())
    }

    /// Create a store whose sessions use `config` for grid and markup options.
    #[must_use]
    pub fn with_config(config: DesignerConfig) -> Self {
        let mut sessions = HashMap::new();
        sessions.insert(DEFAULT_SESSION.to_string(), EditorState::with_config(&config));
        Self {
            sessions: Arc::new(RwLock::new(sessions)),
            config,
        }
    }

    /// The configuration new sessions and markup conversions use.
    #[must_use]
    pub const fn config(&self) -> &DesignerConfig {
        &self.config
    }

    /// Get a copy of a session's state if it exists.
    #[must_use]
    pub fn get(&self, session_id: &str) -> Option<EditorState> {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        sessions.get(session_id).cloned()
    }

    /// Get a copy of a session's state, creating an empty one if needed.
    #[must_use]
    pub fn get_or_create(&self, session_id: &str) -> EditorState {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| EditorState::with_config(&self.config))
            .clone()
    }

    /// Apply a command to a session and return the refreshed markup.
    ///
    /// The session is created if it does not exist. The returned ID is the
    /// element created by an add or spawn command.
    ///
    /// # Errors
    ///
    /// Currently infallible but returns `Result` for API consistency.
    pub fn apply(
        &self,
        session_id: &str,
        command: Command,
    ) -> Result<(Option<ElementId>, String), StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let state = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| EditorState::with_config(&self.config));
        let created = state.apply(command);
        Ok((created, state.markup(&self.config.markup)))
    }

    /// Encode a session's document as markup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] if the session does not exist.
    pub fn markup(&self, session_id: &str) -> Result<String, StoreError> {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_id)
            .map(|state| state.markup(&self.config.markup))
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))
    }

    /// Replace a session's document with decoded markup.
    ///
    /// Returns the number of decoded elements.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] if the session does not
    /// exist, or [`StoreError::Markup`] if strict decoding rejects the text.
    /// A rejected sync leaves the session unchanged.
    pub fn sync_from_markup(&self, session_id: &str, text: &str) -> Result<usize, StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let state = sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
        match state.sync_from_markup(text, &self.config.markup) {
            Ok(()) => {
                let count = state.document.len();
                tracing::info!("Session {session_id} synced from markup ({count} elements)");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Rejected markup for session {session_id}: {e}");
                Err(e.into())
            }
        }
    }

    /// Replace an entire session state, creating the session if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Integrity`] if the document fails verification.
    pub fn replace(&self, session_id: &str, state: EditorState) -> Result<(), StoreError> {
        state.document.verify()?;
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sessions.insert(session_id.to_string(), state);
        Ok(())
    }

    /// Snapshot a session as a project document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] if the session does not exist.
    pub fn project(&self, session_id: &str) -> Result<ProjectDocument, StoreError> {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_id)
            .map(ProjectDocument::now)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))
    }

    /// Drop every element of a session. Viewport, tool and grid are kept.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SessionNotFound`] if the session does not exist.
    pub fn clear(&self, session_id: &str) -> Result<(), StoreError> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let state = sessions
            .get_mut(session_id)
            .ok_or_else(|| StoreError::SessionNotFound(session_id.to_string()))?;
        state.apply(Command::Clear);
        Ok(())
    }

    /// Get all session IDs, sorted.
    #[must_use]
    pub fn session_ids(&self) -> Vec<String> {
        let sessions = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut ids: Vec<_> = sessions.keys().cloned().collect();
        ids.sort();
        ids
    }
}
