//! DOM Node - Tagged representation
//!
//! Every node lives in the `DomTree` arena and refers to its relatives
//! by `NodeId`. Ownership is expressed only by the parent's `children`
//! list; `parent`, `owner`, `assigned_slot` and a shadow root's `host`
//! are non-owning back references.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Logical parent (None for roots and shadow roots)
    pub(crate) parent: Option<NodeId>,
    /// Logical children, in tree order
    pub(crate) children: Vec<NodeId>,
    /// Owning document
    pub(crate) owner: NodeId,
    /// Parent in the render tree
    pub(crate) render_parent: Option<NodeId>,
    /// Children in the render tree
    pub(crate) render_children: Vec<NodeId>,
    /// Slot this node is projected into
    pub(crate) assigned_slot: Option<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(data: NodeData, owner: NodeId) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            owner,
            render_parent: None,
            render_children: Vec::new(),
            assigned_slot: None,
            data,
        }
    }

    /// Logical parent
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Logical children
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Owning document
    #[inline]
    pub fn owner_document(&self) -> NodeId {
        self.owner
    }

    /// Slot this node is currently assigned to
    #[inline]
    pub fn assigned_slot(&self) -> Option<NodeId> {
        self.assigned_slot
    }

    /// Node type, as reported to traversal filters
    pub fn node_type(&self) -> NodeType {
        match &self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::DocumentFragment | NodeData::ShadowRoot(_) => NodeType::DocumentFragment,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Plain document fragment (shadow roots excluded)
    #[inline]
    pub fn is_fragment(&self) -> bool {
        matches!(self.data, NodeData::DocumentFragment)
    }

    /// Elements and text nodes can be projected into slots
    #[inline]
    pub fn is_slotable(&self) -> bool {
        self.is_element() || self.is_text()
    }

    /// Check if this is a `<slot>` element
    #[inline]
    pub fn is_slot(&self) -> bool {
        self.as_slot().is_some()
    }

    /// Check if this is a shadow root
    #[inline]
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.data, NodeData::ShadowRoot(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get slot data if this is a slot element
    #[inline]
    pub fn as_slot(&self) -> Option<&SlotData> {
        self.as_element().and_then(|e| e.slot.as_ref())
    }

    #[inline]
    pub(crate) fn as_slot_mut(&mut self) -> Option<&mut SlotData> {
        self.as_element_mut().and_then(|e| e.slot.as_mut())
    }

    /// Get shadow root data if this is a shadow root
    #[inline]
    pub fn as_shadow_root(&self) -> Option<&ShadowRootData> {
        match &self.data {
            NodeData::ShadowRoot(s) => Some(s),
            _ => None,
        }
    }

    /// Shadow root owned by this element, if any
    #[inline]
    pub fn shadow_root(&self) -> Option<NodeId> {
        self.as_element().and_then(|e| e.shadow_root)
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Name this node is slotted under.
    ///
    /// Elements use their `slot` attribute, text nodes always use the
    /// empty name and so only ever match an unnamed slot.
    pub fn slot_name(&self) -> &str {
        self.as_element()
            .and_then(|e| e.get_attr("slot"))
            .unwrap_or("")
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// Document fragment; inserting it inserts its children
    DocumentFragment,
    /// Shadow root attached to a host element
    ShadowRoot(ShadowRootData),
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    Comment,
    Document,
    DocumentFragment,
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub local_name: String,
    /// Attributes in insertion order
    pub attrs: Vec<(String, String)>,
    /// Attached shadow root
    pub(crate) shadow_root: Option<NodeId>,
    /// Present only on `<slot>` elements
    pub(crate) slot: Option<SlotData>,
}

impl ElementData {
    pub fn new(local_name: &str) -> Self {
        let local_name = local_name.to_ascii_lowercase();
        let slot = (local_name == "slot").then(SlotData::default);
        Self {
            local_name,
            attrs: Vec::new(),
            shadow_root: None,
            slot,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(slot) = self.slot.as_mut() {
            if name == "name" {
                slot.name = value.to_string();
            }
        }
        // Check if attribute already exists
        for attr in self.attrs.iter_mut() {
            if attr.0 == name {
                attr.1 = value.to_string();
                return;
            }
        }
        self.attrs.push((name.to_string(), value.to_string()));
    }
}

/// Slot element state
#[derive(Debug, Clone, Default)]
pub struct SlotData {
    /// Slot name (empty string for the default slot)
    pub(crate) name: String,
    /// Slotables currently projected into this slot
    pub(crate) assigned_nodes: Vec<NodeId>,
    /// Set by the first assignment pass; from then on the slot's
    /// logical children are its fallback content
    pub(crate) fallback_captured: bool,
}

impl SlotData {
    /// Slot name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assigned slotables in tree order
    #[inline]
    pub fn assigned_nodes(&self) -> &[NodeId] {
        &self.assigned_nodes
    }

    /// Check if fallback content has been captured
    #[inline]
    pub fn fallback_captured(&self) -> bool {
        self.fallback_captured
    }
}

/// Shadow root mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShadowRootMode {
    #[default]
    Open,
    Closed,
}

/// Shadow root state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowRootData {
    /// Host element
    pub host: NodeId,
    /// Mode (open/closed)
    pub mode: ShadowRootMode,
}
