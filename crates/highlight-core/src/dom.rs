//! Headless document tree.
//!
//! The engine does not run inside a browser, so this module provides the
//! minimal document model it operates on: an arena of element and text nodes
//! with parent/child links, document-order traversal, and the handful of
//! mutations highlighting needs (fragment splicing, class/attribute edits,
//! text-node normalization).
//!
//! Hosts mirror the page into a [`Document`] (or tests build one directly).
//! Visibility is modelled as an explicit `hidden` flag on elements: a host
//! marks `display:none` / `visibility:hidden` subtrees hidden, and rendered
//! text-node traversal skips them.

use std::collections::BTreeMap;

/// Identifier of a node inside one [`Document`] arena.
///
/// Ids are never reused; a detached node keeps its id and simply loses its
/// parent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct ElementData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    hidden: bool,
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Vertical alignment for a scroll request, mirroring the `block` option of
/// `scrollIntoView`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the target with the top of the viewport.
    Start,
    /// Center the target in the viewport.
    Center,
    /// Align the target with the bottom of the viewport.
    End,
}

/// A pending request for the host to bring a node into view.
///
/// The engine never scrolls anything itself; it files the request on the
/// document and the host consumes it via [`Document::take_scroll_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollRequest {
    /// Node to bring into view.
    pub target: NodeId,
    /// Requested vertical alignment.
    pub align: ScrollAlign,
}

/// An element/text node tree standing in for the page body.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    scroll_request: Option<ScrollRequest>,
}

impl Document {
    /// Create a document holding a single empty root element (`body`).
    pub fn new() -> Self {
        let root_node = Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData {
                tag: "body".to_string(),
                classes: Vec::new(),
                attributes: BTreeMap::new(),
                hidden: false,
            }),
        };
        Self {
            nodes: vec![root_node],
            root: NodeId(0),
            scroll_request: None,
        }
    }

    /// Root element of the document.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeData::Element(ElementData {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            hidden: false,
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeData::Text(text.to_string()))
    }

    fn push_node(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// `child` is detached from any previous parent first. Appending to a
    /// text node is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if matches!(self.node(parent).data, NodeData::Text(_)) {
            return;
        }
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Remove `node` from its parent's child list. The node keeps its
    /// subtree and can be re-appended later.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.node(node).parent {
            self.node_mut(parent).children.retain(|&c| c != node);
            self.node_mut(node).parent = None;
        }
    }

    /// Parent of `node`, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    /// Children of `node` in order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    /// `true` if `node` is still reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.root {
                return true;
            }
            match self.node(current).parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Tag name, for element nodes.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element(el) => Some(&el.tag),
            NodeData::Text(_) => None,
        }
    }

    /// Text of a text node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    /// `true` for text nodes.
    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.node(node).data, NodeData::Text(_))
    }

    /// Mark an element subtree as rendering-suppressed (or visible again).
    ///
    /// Ignored for text nodes; hide the parent element instead.
    pub fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let NodeData::Element(el) = &mut self.node_mut(node).data {
            el.hidden = hidden;
        }
    }

    /// `true` if `node` is attached and no element on its ancestor chain
    /// (including itself) is hidden.
    pub fn is_rendered(&self, node: NodeId) -> bool {
        if !self.is_attached(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(id) = current {
            if let NodeData::Element(el) = &self.node(id).data
                && el.hidden
            {
                return false;
            }
            current = self.node(id).parent;
        }
        true
    }

    /// All text nodes under the root in document (pre-)order.
    pub fn text_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.node(id).data {
                NodeData::Text(_) => out.push(id),
                NodeData::Element(_) => {
                    stack.extend(self.node(id).children.iter().rev().copied());
                }
            }
        }
        out
    }

    /// Text nodes in document order, skipping hidden subtrees.
    pub fn rendered_text_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            match &self.node(id).data {
                NodeData::Text(_) => out.push(id),
                NodeData::Element(el) => {
                    if !el.hidden {
                        stack.extend(self.node(id).children.iter().rev().copied());
                    }
                }
            }
        }
        out
    }

    /// Concatenated text of the whole document (the `textContent` analogue:
    /// hidden subtrees are included).
    pub fn text_content(&self) -> String {
        self.text_content_of(self.root)
    }

    /// Concatenated text of the subtree rooted at `node`.
    pub fn text_content_of(&self, node: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            match &self.node(id).data {
                NodeData::Text(text) => out.push_str(text),
                NodeData::Element(_) => {
                    stack.extend(self.node(id).children.iter().rev().copied());
                }
            }
        }
        out
    }

    /// Add a class to an element (no duplicates).
    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let NodeData::Element(el) = &mut self.node_mut(node).data
            && !el.classes.iter().any(|c| c == class)
        {
            el.classes.push(class.to_string());
        }
    }

    /// Remove a class from an element.
    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let NodeData::Element(el) = &mut self.node_mut(node).data {
            el.classes.retain(|c| c != class);
        }
    }

    /// `true` if the element carries `class`.
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        match &self.node(node).data {
            NodeData::Element(el) => el.classes.iter().any(|c| c == class),
            NodeData::Text(_) => false,
        }
    }

    /// Set a string attribute on an element.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeData::Element(el) = &mut self.node_mut(node).data {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Read a string attribute from an element.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node).data {
            NodeData::Element(el) => el.attributes.get(name).map(String::as_str),
            NodeData::Text(_) => None,
        }
    }

    /// Attached elements carrying `class`, in document order
    /// (the `querySelectorAll(".class")` analogue).
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let NodeData::Element(el) = &self.node(id).data {
                if el.classes.iter().any(|c| c == class) {
                    out.push(id);
                }
                stack.extend(self.node(id).children.iter().rev().copied());
            }
        }
        out
    }

    /// Replace an attached node with a sequence of nodes in a single splice.
    ///
    /// The replacements take `old`'s position in its parent's child list and
    /// `old` is detached. Returns `false` (leaving the tree untouched) if
    /// `old` has no parent.
    pub fn replace_with_nodes(&mut self, old: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.node(old).parent else {
            return false;
        };
        let Some(pos) = self.node(parent).children.iter().position(|&c| c == old) else {
            return false;
        };
        for &id in replacements {
            self.detach(id);
        }
        self.node_mut(old).parent = None;
        let children = &mut self.node_mut(parent).children;
        let _ = children.splice(pos..=pos, replacements.iter().copied());
        for &id in replacements {
            self.node_mut(id).parent = Some(parent);
        }
        true
    }

    /// Merge adjacent text-node children of `parent` and drop empty ones,
    /// as `Node.normalize()` does.
    pub fn normalize(&mut self, parent: NodeId) {
        let children: Vec<NodeId> = self.node(parent).children.clone();
        let mut merged: Vec<NodeId> = Vec::with_capacity(children.len());
        let mut to_detach: Vec<NodeId> = Vec::new();

        for child in children {
            let is_text = self.is_text(child);
            if is_text && self.text(child).is_some_and(str::is_empty) {
                to_detach.push(child);
                continue;
            }
            if is_text
                && let Some(&prev) = merged.last()
                && self.is_text(prev)
            {
                let addition = self.text(child).unwrap_or_default().to_string();
                if let NodeData::Text(text) = &mut self.node_mut(prev).data {
                    text.push_str(&addition);
                }
                to_detach.push(child);
                continue;
            }
            merged.push(child);
        }

        for id in to_detach {
            self.detach(id);
        }
    }

    /// File a scroll request for the host to act on.
    pub fn request_scroll(&mut self, target: NodeId, align: ScrollAlign) {
        self.scroll_request = Some(ScrollRequest { target, align });
    }

    /// Take the pending scroll request, if any.
    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll_request.take()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
