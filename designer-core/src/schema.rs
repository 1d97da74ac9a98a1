//! Canonical JSON snapshot of an editor state, used for project files.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::{
    DesignerError, DesignerResult, Document, EditorState, Element, ElementId, GridSnap, Tool,
    Viewport,
};

/// Snapshot format version written by this crate.
pub const PROJECT_VERSION: u32 = 1;

/// Serialized project: everything needed to restore an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    /// Format version.
    #[serde(default = "ProjectDocument::default_version")]
    pub version: u32,
    /// Zoom and pan.
    #[serde(default)]
    pub viewport: Viewport,
    /// Grid snapping.
    #[serde(default)]
    pub grid: GridSnap,
    /// Active tool.
    #[serde(default)]
    pub tool: Tool,
    /// Root element IDs in markup order.
    pub roots: Vec<ElementId>,
    /// All elements in ascending z-index order.
    pub elements: Vec<Element>,
    /// Timestamp in milliseconds.
    #[serde(default)]
    pub timestamp: u64,
}

impl ProjectDocument {
    const fn default_version() -> u32 {
        PROJECT_VERSION
    }

    /// Snapshot an editor state. Selection is not saved.
    #[must_use]
    pub fn from_state(state: &EditorState, timestamp: u64) -> Self {
        let mut elements: Vec<Element> = state.document.elements().cloned().collect();
        elements.sort_by(|a, b| {
            a.transform
                .z_index
                .cmp(&b.transform.z_index)
                .then_with(|| a.id.cmp(&b.id))
        });
        Self {
            version: PROJECT_VERSION,
            viewport: state.viewport,
            grid: state.grid,
            tool: state.tool,
            roots: state.document.roots().to_vec(),
            elements,
            timestamp,
        }
    }

    /// Snapshot an editor state stamped with the current time.
    #[must_use]
    pub fn now(state: &EditorState) -> Self {
        Self::from_state(state, current_timestamp_ms())
    }

    /// Restore the editor state this snapshot describes.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::UnsupportedVersion`] for snapshots from a
    /// newer format, or [`DesignerError::Integrity`] if element IDs repeat
    /// or the element graph is inconsistent.
    pub fn into_state(self) -> DesignerResult<EditorState> {
        if self.version > PROJECT_VERSION {
            return Err(DesignerError::UnsupportedVersion(self.version));
        }
        let mut elements = HashMap::with_capacity(self.elements.len());
        for element in self.elements {
            let id = element.id;
            if elements.insert(id, element).is_some() {
                return Err(DesignerError::Integrity(format!("element {id} listed twice")));
            }
        }
        let document = Document::from_parts(elements, self.roots);
        document.verify()?;
        Ok(EditorState {
            document,
            viewport: self.viewport,
            tool: self.tool,
            grid: self.grid,
        })
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> DesignerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::Serialization`] if the JSON is malformed.
    pub fn from_json(json: &str) -> DesignerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Get the current Unix timestamp in milliseconds.
fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
