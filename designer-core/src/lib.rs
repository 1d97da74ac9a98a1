//! # Designer Core
//!
//! Core of a drag-and-drop UI designer: the element graph the visual editor
//! manipulates and the codec that keeps it in sync with XAML-like markup.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                designer-core                │
//! ├─────────────────────────────────────────────┤
//! │  Document        │  Markup Codec            │
//! │  - Elements      │  - encode (tree walk)    │
//! │  - Roots / tree  │  - decode (tag stack)    │
//! │  - Selection     │  - escaping              │
//! ├─────────────────────────────────────────────┤
//! │  Editor State    │  Store / Snapshot        │
//! │  - Commands      │  - Shared sessions       │
//! │  - Viewport/grid │  - JSON project files    │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod command;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod markup;
pub mod schema;
pub mod state;
pub mod store;

pub use command::Command;
pub use config::{DesignerConfig, GridSnap, DEFAULT_GRID_SIZE};
pub use document::Document;
pub use element::{
    props, Element, ElementId, ElementKind, ElementPatch, Properties, PropertyValue, Transform,
    DEFAULT_VALUE, MIN_SIZE,
};
pub use error::{DesignerError, DesignerResult};
pub use markup::{decode, decode_with, encode, encode_with, MarkupError, MarkupOptions, Nesting};
pub use schema::{ProjectDocument, PROJECT_VERSION};
pub use state::{EditorState, Tool, Viewport, MAX_ZOOM, MIN_ZOOM};
pub use store::{DesignStore, StoreError, DEFAULT_SESSION};

/// Designer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
