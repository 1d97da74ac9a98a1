//! # Markup Codec
//!
//! Converts between a [`Document`](crate::Document) and XAML-style markup.
//!
//! ```text
//! <Canvas xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation">
//!   <Panel Name="Panel_1" Width="300" Height="200" Canvas.Left="0" Canvas.Top="0">
//!     <Button Name="Ok" Width="120" Height="40" Canvas.Left="20" Canvas.Top="20" Content="OK" />
//!   </Panel>
//! </Canvas>
//! ```
//!
//! Encoding is deterministic. Decoding is tolerant by default: unknown tags,
//! junk text and unparseable numbers fall back to defaults instead of
//! failing. [`MarkupOptions::strict`] turns structural damage into errors.

mod decode;
mod encode;
mod escape;

pub use decode::{decode, decode_with};
pub use encode::{encode, encode_parts, encode_with};
pub use escape::{escape_attr, unescape};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag of the document-level wrapper element.
pub const ROOT_TAG: &str = "Canvas";

/// Default namespace declared on the wrapper element.
pub const ROOT_NAMESPACE: &str = "http://schemas.microsoft.com/winfx/2006/xaml/presentation";

/// `Visibility` value written for hidden elements.
pub const HIDDEN: &str = "Collapsed";

/// Attribute names.
pub mod attr {
    /// Element name.
    pub const NAME: &str = "Name";
    /// Prefixed element name, accepted on decode.
    pub const X_NAME: &str = "x:Name";
    /// Width.
    pub const WIDTH: &str = "Width";
    /// Height.
    pub const HEIGHT: &str = "Height";
    /// X position.
    pub const LEFT: &str = "Canvas.Left";
    /// Y position.
    pub const TOP: &str = "Canvas.Top";
    /// Stacking order.
    pub const Z_INDEX: &str = "Canvas.ZIndex";
    /// Content text.
    pub const CONTENT: &str = "Content";
    /// Numeric value.
    pub const VALUE: &str = "Value";
    /// Background color.
    pub const BACKGROUND: &str = "Background";
    /// Foreground color.
    pub const FOREGROUND: &str = "Foreground";
    /// Font size.
    pub const FONT_SIZE: &str = "FontSize";
    /// Visibility marker.
    pub const VISIBILITY: &str = "Visibility";
}

/// How nested tags map onto the element tree when decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nesting {
    /// Nested tags become children of the enclosing element.
    #[default]
    Tree,
    /// Every tag becomes a parentless root, in document order.
    Flatten,
}

/// Options shared by encoding and decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupOptions {
    /// Nesting behaviour on decode.
    pub nesting: Nesting,
    /// Write `Canvas.ZIndex` so stacking order survives a round trip.
    pub emit_z_index: bool,
    /// Reject structurally broken markup instead of recovering.
    pub strict: bool,
}

/// Structural markup failures. Only reported in strict mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    /// A `<` was never closed by `>`.
    #[error("unterminated tag at byte {offset}")]
    UnterminatedTag {
        /// Byte offset of the opening `<`.
        offset: usize,
    },
    /// A closing tag with no matching open tag.
    #[error("unexpected </{tag}> at byte {offset}")]
    UnexpectedClose {
        /// Tag name.
        tag: String,
        /// Byte offset of the closing tag.
        offset: usize,
    },
    /// An element still open when its parent closed or input ended.
    #[error("<{tag}> is never closed")]
    UnclosedTag {
        /// Tag name.
        tag: String,
    },
}
