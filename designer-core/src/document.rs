//! The design document: every live element plus the ordered root list.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    DesignerError, DesignerResult, Element, ElementId, ElementKind, ElementPatch, GridSnap,
    MIN_SIZE,
};

/// All elements of one design, indexed by ID, with root ordering and selection.
///
/// Every mutation is total: an unknown ID leaves the document untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// All elements in the design, indexed by ID.
    elements: HashMap<ElementId, Element>,
    /// Root-level element IDs in markup order.
    roots: Vec<ElementId>,
    /// Currently selected element IDs. May hold stale IDs.
    selection: Vec<ElementId>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from an element map and root list, with no selection.
    #[must_use]
    pub fn from_parts(elements: HashMap<ElementId, Element>, roots: Vec<ElementId>) -> Self {
        Self {
            elements,
            roots,
            selection: Vec::new(),
        }
    }

    /// Insert a fully formed element and make it the sole selection.
    ///
    /// A parentless element is appended to the root list; otherwise it is
    /// appended to its parent's children. Returns `false` (and changes
    /// nothing) if the ID is already taken.
    pub fn add(&mut self, element: Element) -> bool {
        let id = element.id;
        if self.elements.contains_key(&id) {
            tracing::debug!("Ignoring add of duplicate element {id}");
            return false;
        }
        match element.parent {
            None => self.roots.push(id),
            Some(parent_id) => match self.elements.get_mut(&parent_id) {
                Some(parent) => {
                    if !parent.children.contains(&id) {
                        parent.children.push(id);
                    }
                }
                None => tracing::debug!("Element {id} added under missing parent {parent_id}"),
            },
        }
        self.elements.insert(id, element);
        self.selection = vec![id];
        true
    }

    /// Create an element of `kind` at `(x, y)` with per-kind defaults and add it.
    ///
    /// The element is named `Kind_N` where `N` is the new element count, and
    /// stacked above everything added before it.
    pub fn spawn(&mut self, kind: ElementKind, x: i32, y: i32) -> ElementId {
        let count = self.elements.len();
        let mut element = Element::new(kind)
            .with_name(format!("{kind}_{}", count + 1))
            .with_position(x, y);
        element.transform.z_index = i32::try_from(count).unwrap_or(i32::MAX);
        let id = element.id;
        self.add(element);
        id
    }

    /// Merge a partial update into an element.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) {
        if let Some(element) = self.elements.get_mut(&id) {
            patch.apply_to(element);
        }
    }

    /// Delete elements together with all their descendants.
    ///
    /// Deleted IDs are also removed from the root list, the selection and
    /// any surviving parent's children.
    pub fn delete(&mut self, ids: &[ElementId]) {
        let mut doomed = HashSet::new();
        let mut pending: Vec<ElementId> = ids
            .iter()
            .copied()
            .filter(|id| self.elements.contains_key(id))
            .collect();
        while let Some(id) = pending.pop() {
            if !doomed.insert(id) {
                continue;
            }
            if let Some(element) = self.elements.get(&id) {
                pending.extend(element.children.iter().copied());
            }
        }

        self.selection
            .retain(|id| !ids.contains(id) && !doomed.contains(id));
        if doomed.is_empty() {
            return;
        }
        for id in &doomed {
            self.elements.remove(id);
        }
        self.roots.retain(|id| !doomed.contains(id));
        for element in self.elements.values_mut() {
            element.children.retain(|id| !doomed.contains(id));
        }
    }

    /// Move an element, snapping to the grid when enabled. Locked elements stay put.
    pub fn move_element(&mut self, id: ElementId, x: i32, y: i32, grid: GridSnap) {
        let Some(element) = self.elements.get_mut(&id) else {
            return;
        };
        if element.locked {
            tracing::debug!("Ignoring move of locked element {id}");
            return;
        }
        element.transform.x = grid.snap(x);
        element.transform.y = grid.snap(y);
    }

    /// Resize an element, clamping both dimensions to [`MIN_SIZE`]. Locked elements keep their size.
    pub fn resize(&mut self, id: ElementId, width: i32, height: i32) {
        let Some(element) = self.elements.get_mut(&id) else {
            return;
        };
        if element.locked {
            tracing::debug!("Ignoring resize of locked element {id}");
            return;
        }
        element.transform.width = width.max(MIN_SIZE);
        element.transform.height = height.max(MIN_SIZE);
    }

    /// Replace the selection verbatim.
    pub fn select(&mut self, ids: Vec<ElementId>) {
        self.selection = ids;
    }

    /// Drop every element, root and selection.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Move an element under a new parent, or to the end of the root list for `None`.
    ///
    /// Rejected if the element or new parent is missing, or if the move
    /// would make the element its own ancestor.
    pub fn reparent(&mut self, id: ElementId, new_parent: Option<ElementId>) -> bool {
        let Some(old_parent) = self.elements.get(&id).map(|e| e.parent) else {
            return false;
        };
        if let Some(parent_id) = new_parent {
            if parent_id == id
                || !self.elements.contains_key(&parent_id)
                || self.is_ancestor(id, parent_id)
            {
                tracing::debug!("Rejecting reparent of {id} under {parent_id}");
                return false;
            }
        }
        if old_parent == new_parent {
            return true;
        }

        match old_parent {
            Some(parent_id) => {
                if let Some(parent) = self.elements.get_mut(&parent_id) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
        match new_parent {
            Some(parent_id) => {
                if let Some(parent) = self.elements.get_mut(&parent_id) {
                    parent.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        if let Some(element) = self.elements.get_mut(&id) {
            element.parent = new_parent;
        }
        true
    }

    /// Exchange the stacking order of two elements.
    pub fn swap_z_index(&mut self, a: ElementId, b: ElementId) {
        let (Some(za), Some(zb)) = (
            self.elements.get(&a).map(|e| e.transform.z_index),
            self.elements.get(&b).map(|e| e.transform.z_index),
        ) else {
            return;
        };
        if let Some(element) = self.elements.get_mut(&a) {
            element.transform.z_index = zb;
        }
        if let Some(element) = self.elements.get_mut(&b) {
            element.transform.z_index = za;
        }
    }

    /// Whether `ancestor` appears on the parent chain of `node`.
    fn is_ancestor(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut seen = HashSet::new();
        let mut current = self.elements.get(&node).and_then(|e| e.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            if !seen.insert(id) {
                return false;
            }
            current = self.elements.get(&id).and_then(|e| e.parent);
        }
        false
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Whether an element with this ID exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Get all elements, in no particular order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    /// The underlying ID-to-element map.
    #[must_use]
    pub fn element_map(&self) -> &HashMap<ElementId, Element> {
        &self.elements
    }

    /// Root element IDs in markup order.
    #[must_use]
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// Root elements in markup order, skipping dangling IDs.
    pub fn root_elements(&self) -> impl Iterator<Item = &Element> {
        self.roots.iter().filter_map(|id| self.elements.get(id))
    }

    /// The current selection, possibly including stale IDs.
    #[must_use]
    pub fn selection(&self) -> &[ElementId] {
        &self.selection
    }

    /// Selected elements that still exist.
    pub fn selected_elements(&self) -> impl Iterator<Item = &Element> {
        self.selection.iter().filter_map(|id| self.elements.get(id))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Root elements in paint order: ascending z-index, ties in root order.
    #[must_use]
    pub fn stacking_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<_> = self.root_elements().collect();
        ordered.sort_by_key(|e| e.transform.z_index);
        ordered
    }

    /// Root elements top-most first, as a layer list shows them.
    #[must_use]
    pub fn layers(&self) -> Vec<&Element> {
        let mut ordered = self.stacking_order();
        ordered.reverse();
        ordered
    }

    /// Find the top-most visible root element at the given design coordinates.
    #[must_use]
    pub fn element_at(&self, x: i32, y: i32) -> Option<ElementId> {
        self.layers()
            .into_iter()
            .find(|e| e.visible && e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Check the structural invariants of the document.
    ///
    /// # Errors
    ///
    /// Returns [`DesignerError::Integrity`] naming the first violation found:
    /// a dangling or parented root, a duplicated root, a child whose
    /// `parent` does not point back, or a parent cycle.
    pub fn verify(&self) -> DesignerResult<()> {
        let mut seen_roots = HashSet::new();
        for id in &self.roots {
            let element = self
                .elements
                .get(id)
                .ok_or_else(|| DesignerError::Integrity(format!("root {id} does not exist")))?;
            if element.parent.is_some() {
                return Err(DesignerError::Integrity(format!("root {id} has a parent")));
            }
            if !seen_roots.insert(*id) {
                return Err(DesignerError::Integrity(format!("root {id} listed twice")));
            }
        }

        for element in self.elements.values() {
            for child_id in &element.children {
                let child = self.elements.get(child_id).ok_or_else(|| {
                    DesignerError::Integrity(format!(
                        "child {child_id} of {} does not exist",
                        element.id
                    ))
                })?;
                if child.parent != Some(element.id) {
                    return Err(DesignerError::Integrity(format!(
                        "child {child_id} does not point back to {}",
                        element.id
                    )));
                }
            }
            if let Some(parent_id) = element.parent {
                if self.is_ancestor(element.id, element.id) {
                    return Err(DesignerError::Integrity(format!(
                        "element {} is its own ancestor",
                        element.id
                    )));
                }
                let listed = self
                    .elements
                    .get(&parent_id)
                    .is_some_and(|p| p.children.contains(&element.id));
                if !listed {
                    return Err(DesignerError::Integrity(format!(
                        "element {} is not listed by parent {parent_id}",
                        element.id
                    )));
                }
            }
        }
        Ok(())
    }
}
