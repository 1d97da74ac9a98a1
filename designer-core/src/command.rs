//! Editor commands.
//!
//! Every change a host makes to an [`EditorState`](crate::EditorState) is
//! expressed as a [`Command`], so commands can be logged, replayed or sent
//! over the wire as JSON.

use serde::{Deserialize, Serialize};

use crate::{Document, Element, ElementId, ElementKind, ElementPatch, GridSnap, Tool};

/// A single editor operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Insert a fully formed element and select it.
    Add {
        /// The element to add.
        element: Element,
    },
    /// Create an element with per-kind defaults and select it.
    Spawn {
        /// Kind of element to create.
        kind: ElementKind,
        /// Left edge in design units.
        x: i32,
        /// Top edge in design units.
        y: i32,
    },
    /// Merge a partial update into an element.
    Update {
        /// Target element.
        id: ElementId,
        /// Fields to change.
        patch: ElementPatch,
    },
    /// Delete elements and their descendants.
    Delete {
        /// Elements to delete.
        ids: Vec<ElementId>,
    },
    /// Replace the selection.
    Select {
        /// New selection.
        ids: Vec<ElementId>,
    },
    /// Move an element, snapping to the grid.
    Move {
        /// Target element.
        id: ElementId,
        /// New left edge.
        x: i32,
        /// New top edge.
        y: i32,
    },
    /// Resize an element.
    Resize {
        /// Target element.
        id: ElementId,
        /// New width.
        width: i32,
        /// New height.
        height: i32,
    },
    /// Move an element under another one, or back to the root list.
    Reparent {
        /// Element to move.
        id: ElementId,
        /// New parent, `None` for the root list.
        #[serde(default)]
        parent: Option<ElementId>,
    },
    /// Exchange the stacking order of two elements.
    SwapZIndex {
        /// First element.
        a: ElementId,
        /// Second element.
        b: ElementId,
    },
    /// Switch the active tool.
    SetTool {
        /// Tool to activate.
        tool: Tool,
    },
    /// Set the zoom factor (clamped).
    SetZoom {
        /// Requested zoom.
        zoom: f32,
    },
    /// Set the pan offset.
    SetPan {
        /// Horizontal offset.
        x: f32,
        /// Vertical offset.
        y: f32,
    },
    /// Change grid snapping.
    SetGrid {
        /// New grid settings.
        grid: GridSnap,
    },
    /// Replace the whole document.
    Load {
        /// Replacement document.
        document: Document,
    },
    /// Drop every element.
    Clear,
}
