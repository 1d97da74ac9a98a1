//! Editor state management.

use serde::{Deserialize, Serialize};

use crate::markup::{self, MarkupOptions};
use crate::{Command, DesignerConfig, DesignerResult, Document, ElementId, GridSnap};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 5.0;

/// Active editing tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Select and manipulate elements.
    #[default]
    Select,
    /// Drag elements around.
    Move,
    /// Edit text content in place.
    Text,
    /// Draw shapes.
    Shape,
}

/// Zoom and pan of the design surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Zoom factor, always within [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    zoom: f32,
    /// Horizontal pan offset.
    pub pan_x: f32,
    /// Vertical pan offset.
    pub pan_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    /// Current zoom factor.
    #[must_use]
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`]. NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_nan() {
            return;
        }
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Set the pan offset.
    pub fn set_pan(&mut self, x: f32, y: f32) {
        self.pan_x = x;
        self.pan_y = y;
    }
}

/// The complete editor state: document, viewport, tool and grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorState {
    /// The design document.
    pub document: Document,
    /// Current zoom and pan.
    pub viewport: Viewport,
    /// Active tool.
    pub tool: Tool,
    /// Grid snapping used by moves.
    pub grid: GridSnap,
}

impl EditorState {
    /// Create an empty editor state with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty editor state using the grid from `config`.
    #[must_use]
    pub fn with_config(config: &DesignerConfig) -> Self {
        Self {
            grid: config.grid,
            ..Self::default()
        }
    }

    /// Apply a command.
    ///
    /// Returns the ID of the element created by [`Command::Add`] or
    /// [`Command::Spawn`], if any.
    pub fn apply(&mut self, command: Command) -> Option<ElementId> {
        match command {
            Command::Add { element } => {
                let id = element.id;
                self.document.add(element).then_some(id)
            }
            Command::Spawn { kind, x, y } => Some(self.document.spawn(kind, x, y)),
            Command::Update { id, patch } => {
                self.document.update(id, &patch);
                None
            }
            Command::Delete { ids } => {
                self.document.delete(&ids);
                None
            }
            Command::Select { ids } => {
                self.document.select(ids);
                None
            }
            Command::Move { id, x, y } => {
                self.document.move_element(id, x, y, self.grid);
                None
            }
            Command::Resize { id, width, height } => {
                self.document.resize(id, width, height);
                None
            }
            Command::Reparent { id, parent } => {
                self.document.reparent(id, parent);
                None
            }
            Command::SwapZIndex { a, b } => {
                self.document.swap_z_index(a, b);
                None
            }
            Command::SetTool { tool } => {
                self.tool = tool;
                None
            }
            Command::SetZoom { zoom } => {
                self.viewport.set_zoom(zoom);
                None
            }
            Command::SetPan { x, y } => {
                self.viewport.set_pan(x, y);
                None
            }
            Command::SetGrid { grid } => {
                self.grid = grid;
                None
            }
            Command::Load { document } => {
                self.document = document;
                None
            }
            Command::Clear => {
                self.document.clear();
                None
            }
        }
    }

    /// Encode the document as markup.
    #[must_use]
    pub fn markup(&self, options: &MarkupOptions) -> String {
        markup::encode_with(&self.document, options)
    }

    /// Replace the document with the result of decoding `text`.
    ///
    /// The selection ends up empty. Viewport, tool and grid are kept.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::Markup`](crate::DesignerError::Markup) when
    /// strict decoding rejects the text; the state is left untouched then.
    pub fn sync_from_markup(
        &mut self,
        text: &str,
        options: &MarkupOptions,
    ) -> DesignerResult<()> {
        let document = markup::decode_with(text, options)?;
        tracing::debug!("Synced {} elements from markup", document.len());
        self.document = document;
        Ok(())
    }
}
