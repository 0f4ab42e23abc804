//! Node tree with geometry queries and point resolution
//!
//! The gesture layer never talks to a concrete tree. It consumes the
//! [`Geometry`] and [`NodeTree`] traits, so a host toolkit can plug in its own
//! element model. [`Document`] is the in-process implementation used by the
//! application layer and by tests.
//!
//! # Hit testing
//!
//! ```text
//! body (0,0 400x300)
//!  ├── list (0,0 200x300)
//!  │    └── row (0,0 200x40)
//!  └── overlay (100,0 300x300)   <- frontmost (last child)
//! ```
//!
//! A point at (150, 20) resolves to `overlay`: children are tested from the
//! last one to the first, and the deepest containing node wins.

use slotmap::{new_key_type, SlotMap};

use crate::error::{CoreError, Result};
use crate::geometry::{Point, Rect};

new_key_type! {
    /// Handle to an element in a node tree
    pub struct NodeId;
}

/// Bounding-box queries
pub trait Geometry {
    /// Bounding box of `node`, or `None` when the node has no layout box
    fn bounding_box(&self, node: NodeId) -> Option<Rect>;
}

/// A tree of elements that can be hit tested
pub trait NodeTree: Geometry {
    /// The root element (the document body)
    fn root(&self) -> Option<NodeId>;

    /// Children of `node` in document order; the last child is frontmost
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Native point resolution: the topmost element at `point`
    ///
    /// `excluded` and its descendants are skipped. Trees without a native
    /// resolver return `None`.
    fn element_from_point(&self, point: Point, excluded: Option<NodeId>) -> Option<NodeId>;
}

#[derive(Clone, Debug)]
struct Element {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    bounds: Option<Rect>,
}

/// An in-process element tree with absolute bounding boxes
#[derive(Clone, Debug, Default)]
pub struct Document {
    elements: SlotMap<NodeId, Element>,
    root: Option<NodeId>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the root element, replacing any previous tree
    pub fn create_root(&mut self, name: impl Into<String>, bounds: Rect) -> NodeId {
        self.elements.clear();
        let id = self.elements.insert(Element {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            bounds: Some(bounds),
        });
        self.root = Some(id);
        id
    }

    /// Append a child with the given bounds; it becomes the frontmost child
    pub fn append_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        bounds: Rect,
    ) -> Result<NodeId> {
        self.insert_child(parent, name.into(), Some(bounds))
    }

    /// Append a child that has no layout box (e.g. a detached or hidden node)
    pub fn append_unlaid_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId> {
        self.insert_child(parent, name.into(), None)
    }

    fn insert_child(
        &mut self,
        parent: NodeId,
        name: String,
        bounds: Option<Rect>,
    ) -> Result<NodeId> {
        if !self.elements.contains_key(parent) {
            return Err(CoreError::UnknownNode(parent));
        }
        let id = self.elements.insert(Element {
            name,
            parent: Some(parent),
            children: Vec::new(),
            bounds,
        });
        self.elements[parent].children.push(id);
        Ok(id)
    }

    /// Update a node's bounding box (after layout)
    pub fn set_bounds(&mut self, node: NodeId, bounds: Option<Rect>) -> Result<()> {
        let element = self
            .elements
            .get_mut(node)
            .ok_or(CoreError::UnknownNode(node))?;
        element.bounds = bounds;
        Ok(())
    }

    pub fn name(&self, node: NodeId) -> Option<&str> {
        self.elements.get(node).map(|e| e.name.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.elements.get(node).and_then(|e| e.parent)
    }

    /// Find the first node with the given name (depth-first, document order)
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let root = self.root?;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let element = &self.elements[node];
            if element.name == name {
                return Some(node);
            }
            stack.extend(element.children.iter().rev().copied());
        }
        None
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn hit_test_node(&self, node: NodeId, point: Point, excluded: Option<NodeId>) -> Option<NodeId> {
        if Some(node) == excluded {
            return None;
        }
        let element = self.elements.get(node)?;
        let bounds = element.bounds?;
        if !bounds.contains(point) {
            return None;
        }

        // Check children in reverse order (last child is on top)
        for child in element.children.iter().rev() {
            if let Some(hit) = self.hit_test_node(*child, point, excluded) {
                return Some(hit);
            }
        }

        Some(node)
    }
}

impl Geometry for Document {
    fn bounding_box(&self, node: NodeId) -> Option<Rect> {
        self.elements.get(node).and_then(|e| e.bounds)
    }
}

impl NodeTree for Document {
    fn root(&self) -> Option<NodeId> {
        self.root
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.elements
            .get(node)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    fn element_from_point(&self, point: Point, excluded: Option<NodeId>) -> Option<NodeId> {
        self.hit_test_node(self.root?, point, excluded)
    }
}
