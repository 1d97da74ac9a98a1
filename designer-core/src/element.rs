//! Design elements - the widget instances a design is built from.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{DesignerError, DesignerResult};

/// Smallest width or height an element may have, in design units.
pub const MIN_SIZE: i32 = 20;

/// Value given to the `value` property when none is specified.
pub const DEFAULT_VALUE: i64 = 50;

/// Well-known property keys.
pub mod props {
    /// Text content (button label, text block text, ...).
    pub const CONTENT: &str = "content";
    /// Numeric value of value-bearing widgets.
    pub const VALUE: &str = "value";
    /// Background color.
    pub const BACKGROUND: &str = "background";
    /// Foreground (text) color.
    pub const FOREGROUND: &str = "foreground";
    /// Font size.
    pub const FONT_SIZE: &str = "fontSize";
}

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if `s` is not a valid UUID.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of widget kinds a design can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// Top-level window.
    Window,
    /// Plain panel container.
    Panel,
    /// Stacking container.
    StackPanel,
    /// Grid container.
    Grid,
    /// Push button.
    Button,
    /// Read-only text.
    TextBlock,
    /// Editable text field.
    TextBox,
    /// Image.
    Image,
    /// Check box.
    CheckBox,
    /// Radio button.
    RadioButton,
    /// Slider (value-bearing).
    Slider,
    /// Progress bar (value-bearing).
    ProgressBar,
    /// List box.
    ListBox,
    /// Combo box.
    ComboBox,
    /// Tab control.
    TabControl,
}

impl ElementKind {
    /// Every supported kind, in palette order.
    pub const ALL: [Self; 15] = [
        Self::Window,
        Self::Panel,
        Self::StackPanel,
        Self::Grid,
        Self::Button,
        Self::TextBlock,
        Self::TextBox,
        Self::Image,
        Self::CheckBox,
        Self::RadioButton,
        Self::Slider,
        Self::ProgressBar,
        Self::ListBox,
        Self::ComboBox,
        Self::TabControl,
    ];

    /// The markup tag name for this kind.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Window => "Window",
            Self::Panel => "Panel",
            Self::StackPanel => "StackPanel",
            Self::Grid => "Grid",
            Self::Button => "Button",
            Self::TextBlock => "TextBlock",
            Self::TextBox => "TextBox",
            Self::Image => "Image",
            Self::CheckBox => "CheckBox",
            Self::RadioButton => "RadioButton",
            Self::Slider => "Slider",
            Self::ProgressBar => "ProgressBar",
            Self::ListBox => "ListBox",
            Self::ComboBox => "ComboBox",
            Self::TabControl => "TabControl",
        }
    }

    /// Look up a kind by its exact tag name.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// Default `(width, height)` for a freshly created element.
    #[must_use]
    pub const fn default_size(self) -> (i32, i32) {
        match self {
            Self::Window => (400, 300),
            Self::Panel => (300, 200),
            Self::StackPanel => (200, 300),
            Self::Grid => (300, 300),
            Self::Button => (120, 40),
            Self::TextBlock => (160, 30),
            Self::TextBox | Self::ComboBox => (200, 36),
            Self::Image => (200, 150),
            Self::CheckBox | Self::RadioButton => (140, 30),
            Self::Slider => (200, 30),
            Self::ProgressBar => (200, 20),
            Self::ListBox => (180, 200),
            Self::TabControl => (300, 250),
        }
    }

    /// Content given to a freshly created element.
    #[must_use]
    pub const fn default_content(self) -> &'static str {
        match self {
            Self::Button => "Button",
            Self::TextBlock => "Text",
            _ => "",
        }
    }

    /// Whether the `value` property is meaningful (and serialized) for this kind.
    #[must_use]
    pub const fn is_value_bearing(self) -> bool {
        matches!(self, Self::Slider | Self::ProgressBar)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for ElementKind {
    type Err = DesignerError;

    fn from_str(s: &str) -> DesignerResult<Self> {
        Self::from_tag(s).ok_or_else(|| DesignerError::UnknownKind(s.to_string()))
    }
}

/// A single property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Integral value.
    Number(i64),
    /// Free text (colors, content, ...).
    Text(String),
}

impl PropertyValue {
    /// Text form, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Numeric form, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// An empty text value counts as unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

/// Kind-dependent element properties, keyed by the names in [`props`].
pub type Properties = BTreeMap<String, PropertyValue>;

/// Position, size and stacking order of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transform {
    /// X position (design units from the left).
    pub x: i32,
    /// Y position (design units from the top).
    pub y: i32,
    /// Width in design units.
    pub width: i32,
    /// Height in design units.
    pub height: i32,
    /// Stacking order; higher paints on top.
    pub z_index: i32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: 120,
            height: 40,
            z_index: 0,
        }
    }
}

impl Transform {
    /// Check if a point lies within the bounds.
    #[must_use]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        let (x, y) = (i64::from(x), i64::from(y));
        let (left, top) = (i64::from(self.x), i64::from(self.y));
        x >= left
            && x <= left + i64::from(self.width)
            && y >= top
            && y <= top + i64::from(self.height)
    }
}

/// A widget instance in the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Widget kind.
    pub kind: ElementKind,
    /// Display label, also written as the markup `Name`.
    pub name: String,
    /// Position, size and stacking order.
    pub transform: Transform,
    /// Kind-dependent properties.
    #[serde(default)]
    pub properties: Properties,
    /// Child element IDs, in markup order.
    #[serde(default)]
    pub children: Vec<ElementId>,
    /// Owning parent, `None` for root elements.
    #[serde(default)]
    pub parent: Option<ElementId>,
    /// Locked elements reject move and resize.
    #[serde(default)]
    pub locked: bool,
    /// Hidden elements are not rendered.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

const fn default_visible() -> bool {
    true
}

impl Element {
    /// Create a new element of the given kind with that kind's defaults.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        let (width, height) = kind.default_size();
        let mut properties = Properties::new();
        properties.insert(props::CONTENT.to_string(), kind.default_content().into());
        properties.insert(props::VALUE.to_string(), DEFAULT_VALUE.into());
        Self {
            id: ElementId::new(),
            kind,
            name: kind.tag().to_string(),
            transform: Transform {
                width,
                height,
                ..Transform::default()
            },
            properties,
            children: Vec::new(),
            parent: None,
            locked: false,
            visible: true,
        }
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the position.
    #[must_use]
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.transform.x = x;
        self.transform.y = y;
        self
    }

    /// Set a property.
    #[must_use]
    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Set the owning parent.
    #[must_use]
    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Look up a property.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Look up a property, treating empty text as unset.
    #[must_use]
    pub fn property_set(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key).filter(|v| !v.is_empty())
    }

    /// Check if a point (in design coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: i32, y: i32) -> bool {
        self.transform.contains_point(x, y)
    }
}

/// A partial update merged into an existing element.
///
/// `None` fields are left alone; `properties` are merged key by key so
/// untouched keys survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// New name.
    pub name: Option<String>,
    /// New X position.
    pub x: Option<i32>,
    /// New Y position.
    pub y: Option<i32>,
    /// New width (floored at [`MIN_SIZE`]).
    pub width: Option<i32>,
    /// New height (floored at [`MIN_SIZE`]).
    pub height: Option<i32>,
    /// New stacking order.
    pub z_index: Option<i32>,
    /// New lock state.
    pub locked: Option<bool>,
    /// New visibility.
    pub visible: Option<bool>,
    /// Properties to insert or overwrite.
    pub properties: Properties,
}

impl ElementPatch {
    /// An empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the position.
    #[must_use]
    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Set the size.
    #[must_use]
    pub fn size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the stacking order.
    #[must_use]
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    /// Set the lock state.
    #[must_use]
    pub fn locked(mut self, locked: bool) -> Self {
        self.locked = Some(locked);
        self
    }

    /// Set the visibility.
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Set one property.
    #[must_use]
    pub fn property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Merge this patch into `element`.
    pub fn apply_to(&self, element: &mut Element) {
        if let Some(name) = &self.name {
            element.name.clone_from(name);
        }
        let t = &mut element.transform;
        if let Some(x) = self.x {
            t.x = x;
        }
        if let Some(y) = self.y {
            t.y = y;
        }
        if let Some(width) = self.width {
            t.width = width.max(MIN_SIZE);
        }
        if let Some(height) = self.height {
            t.height = height.max(MIN_SIZE);
        }
        if let Some(z_index) = self.z_index {
            t.z_index = z_index;
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        for (key, value) in &self.properties {
            element.properties.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag_roundtrip() {
        for kind in ElementKind::ALL {
            assert_eq!(ElementKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ElementKind::from_tag("Canvas"), None);
        assert_eq!(ElementKind::from_tag("button"), None);
        assert!("Slider".parse::<ElementKind>().is_ok());
        assert!(matches!(
            "Label".parse::<ElementKind>(),
            Err(DesignerError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_new_element_defaults() {
        let button = Element::new(ElementKind::Button);
        assert_eq!(button.transform.width, 120);
        assert_eq!(button.transform.height, 40);
        assert_eq!(button.property(props::CONTENT), Some(&"Button".into()));
        assert_eq!(
            button.property(props::VALUE),
            Some(&PropertyValue::Number(DEFAULT_VALUE))
        );
        assert!(button.visible);
        assert!(!button.locked);

        let window = Element::new(ElementKind::Window);
        assert_eq!(window.transform.width, 400);
        assert!(window.property_set(props::CONTENT).is_none());
    }

    #[test]
    fn test_value_bearing_kinds() {
        let bearing: Vec<_> = ElementKind::ALL
            .into_iter()
            .filter(|k| k.is_value_bearing())
            .collect();
        assert_eq!(bearing, vec![ElementKind::Slider, ElementKind::ProgressBar]);
    }

    #[test]
    fn test_patch_merges_properties() {
        let mut element = Element::new(ElementKind::TextBlock)
            .with_property(props::FOREGROUND, "#ffffff")
            .with_property(props::CONTENT, "Hello");

        ElementPatch::new()
            .property(props::BACKGROUND, "#333333")
            .apply_to(&mut element);

        assert_eq!(element.property(props::CONTENT), Some(&"Hello".into()));
        assert_eq!(element.property(props::FOREGROUND), Some(&"#ffffff".into()));
        assert_eq!(element.property(props::BACKGROUND), Some(&"#333333".into()));
    }

    #[test]
    fn test_patch_floors_size() {
        let mut element = Element::new(ElementKind::Panel);
        ElementPatch::new().size(3, -7).apply_to(&mut element);
        assert_eq!(element.transform.width, MIN_SIZE);
        assert_eq!(element.transform.height, MIN_SIZE);
    }

    #[test]
    fn test_property_value_serde_untagged() {
        let json = serde_json::to_string(&PropertyValue::Number(7)).expect("serialize");
        assert_eq!(json, "7");
        let text: PropertyValue = serde_json::from_str("\"red\"").expect("deserialize");
        assert_eq!(text, PropertyValue::Text("red".to_string()));
    }

    #[test]
    fn test_contains_point() {
        let element = Element::new(ElementKind::Button).with_position(10, 10);
        assert!(element.contains_point(10, 10));
        assert!(element.contains_point(130, 50));
        assert!(!element.contains_point(131, 20));
    }

    #[test]
    fn test_contains_point_near_i32_edges() {
        let element = Element::new(ElementKind::Button).with_position(2_147_483_600, 100);
        assert!(element.contains_point(i32::MAX, 100));
        assert!(!element.contains_point(2_147_483_599, 100));

        let mut far = Element::new(ElementKind::Panel).with_position(i32::MIN, i32::MIN);
        far.transform.width = i32::MAX;
        far.transform.height = i32::MAX;
        assert!(far.contains_point(i32::MIN, -1));
        assert!(!far.contains_point(0, 0));
    }
}
