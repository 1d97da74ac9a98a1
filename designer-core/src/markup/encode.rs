//! Document to markup.

use std::collections::{HashMap, HashSet};

use super::{attr, escape_attr, MarkupOptions, HIDDEN, ROOT_NAMESPACE, ROOT_TAG};
use crate::{props, Document, Element, ElementId};

const INDENT: &str = "  ";

/// Encode a document with default options.
#[must_use]
pub fn encode(document: &Document) -> String {
    encode_with(document, &MarkupOptions::default())
}

/// Encode a document.
#[must_use]
pub fn encode_with(document: &Document, options: &MarkupOptions) -> String {
    encode_parts(document.element_map(), document.roots(), options)
}

/// Encode an element map, walking depth-first from `roots` in the given order.
///
/// IDs missing from `elements` are skipped, and each element is written at
/// most once, so cyclic child lists still terminate.
#[must_use]
pub fn encode_parts(
    elements: &HashMap<ElementId, Element>,
    roots: &[ElementId],
    options: &MarkupOptions,
) -> String {
    let mut encoder = Encoder {
        elements,
        options,
        visited: HashSet::new(),
    };
    let mut lines = vec![format!("<{ROOT_TAG} xmlns=\"{ROOT_NAMESPACE}\">")];
    lines.extend(roots.iter().filter_map(|id| encoder.render(*id, 1)));
    lines.push(format!("</{ROOT_TAG}>"));
    lines.join("\n")
}

struct Encoder<'a> {
    elements: &'a HashMap<ElementId, Element>,
    options: &'a MarkupOptions,
    visited: HashSet<ElementId>,
}

impl Encoder<'_> {
    fn render(&mut self, id: ElementId, depth: usize) -> Option<String> {
        let elements = self.elements;
        let element = elements.get(&id)?;
        if !self.visited.insert(id) {
            tracing::debug!("Element {id} referenced more than once, encoding first occurrence only");
            return None;
        }

        let indent = INDENT.repeat(depth);
        let tag = element.kind.tag();
        let attributes = self.attributes(element);
        let children: Vec<String> = element
            .children
            .iter()
            .filter_map(|child| self.render(*child, depth + 1))
            .collect();

        if children.is_empty() {
            Some(format!("{indent}<{tag} {attributes} />"))
        } else {
            Some(format!(
                "{indent}<{tag} {attributes}>\n{}\n{indent}</{tag}>",
                children.join("\n")
            ))
        }
    }

    /// Attributes in fixed order: identity and geometry first, then the
    /// conditional ones.
    fn attributes(&self, element: &Element) -> String {
        let t = &element.transform;
        let mut out = vec![
            pair(attr::NAME, &element.name),
            pair(attr::WIDTH, &t.width.to_string()),
            pair(attr::HEIGHT, &t.height.to_string()),
            pair(attr::LEFT, &t.x.to_string()),
            pair(attr::TOP, &t.y.to_string()),
        ];
        if let Some(content) = element.property_set(props::CONTENT) {
            out.push(pair(attr::CONTENT, &content.to_string()));
        }
        if element.kind.is_value_bearing() {
            if let Some(value) = element.property_set(props::VALUE) {
                out.push(pair(attr::VALUE, &value.to_string()));
            }
        }
        for (key, name) in [
            (props::BACKGROUND, attr::BACKGROUND),
            (props::FOREGROUND, attr::FOREGROUND),
            (props::FONT_SIZE, attr::FONT_SIZE),
        ] {
            if let Some(value) = element.property_set(key) {
                out.push(pair(name, &value.to_string()));
            }
        }
        if !element.visible {
            out.push(pair(attr::VISIBILITY, HIDDEN));
        }
        if self.options.emit_z_index {
            out.push(pair(attr::Z_INDEX, &t.z_index.to_string()));
        }
        out.join(" ")
    }
}

fn pair(name: &str, value: &str) -> String {
    format!("{name}=\"{}\"", escape_attr(value))
}
