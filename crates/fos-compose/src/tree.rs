//! DOM Tree (arena-based allocation)
//!
//! The arena owns every node. Index 0 is the root document; further
//! documents can be allocated with [`DomTree::create_document`] so that
//! adoption between documents stays inside one arena.

use crate::node::{ElementData, Node, NodeData, ShadowRootData, ShadowRootMode};
use crate::observer::{MutationRecord, SignalSlots};
use crate::render::RenderContainer;
use crate::{DomError, DomResult, NodeId, TreeConfig};

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    pub(crate) nodes: Vec<Node>,
    config: TreeConfig,
    signal_slots: SignalSlots,
    records: Vec<MutationRecord>,
}

impl DomTree {
    /// Largest number of nodes a tree can address with `u32` ids
    pub const MAX_NODES: usize = u32::MAX as usize;

    /// Create a tree holding only the root document
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create a tree with explicit configuration
    pub fn with_config(config: TreeConfig) -> Self {
        let mut nodes = Vec::with_capacity(config.initial_capacity.max(1));
        nodes.push(Node::new(NodeData::Document, NodeId::ROOT));
        Self {
            nodes,
            config,
            signal_slots: SignalSlots::new(),
            records: Vec::new(),
        }
    }

    /// Root document
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Active configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true: the root document always exists)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node id in allocation order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|i| NodeId(i as u32))
    }

    /// Resolve an id, rejecting stale references
    pub(crate) fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(id.index()).ok_or(DomError::InvalidNode(id))
    }

    #[inline]
    pub(crate) fn node_at(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Id of the next node to be allocated.
    ///
    /// Ids are `u32`, so a tree holds at most [`DomTree::MAX_NODES`] nodes.
    fn next_id(&self) -> NodeId {
        debug_assert!(self.nodes.len() < Self::MAX_NODES, "node arena exhausted");
        NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX))
    }

    fn alloc(&mut self, data: NodeData, owner: NodeId) -> NodeId {
        let id = self.next_id();
        self.nodes.push(Node::new(data, owner));
        id
    }

    pub(crate) fn alloc_in(&mut self, data: NodeData, document: NodeId) -> NodeId {
        if matches!(data, NodeData::Document) {
            let id = self.next_id();
            self.nodes.push(Node::new(data, id));
            return id;
        }
        self.alloc(data, document)
    }

    // --- Node factory ---

    /// Create a new, detached document
    pub fn create_document(&mut self) -> NodeId {
        self.alloc_in(NodeData::Document, NodeId::ROOT)
    }

    /// Create a detached element owned by the root document
    pub fn create_element(&mut self, local_name: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(local_name)), NodeId::ROOT)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(NodeData::Text(content.to_string()), NodeId::ROOT)
    }

    /// Create a detached comment
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(NodeData::Comment(content.to_string()), NodeId::ROOT)
    }

    /// Create an empty document fragment
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeData::DocumentFragment, NodeId::ROOT)
    }

    /// Set an attribute on an element.
    ///
    /// Changing a slot's `name` reassigns every slot in the slot's tree;
    /// changing an element's `slot` reassigns its old and new slot.
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> DomResult<()> {
        let data = self.node(element)?.as_element().ok_or(DomError::NotSupported)?;
        if data.get_attr(name) == Some(value) {
            return Ok(());
        }
        let is_slot = data.slot.is_some();

        if let Some(data) = self.node_at_mut(element).as_element_mut() {
            data.set_attr(name, value);
        }

        match name {
            "name" if is_slot => {
                let root = self.root_node(element);
                self.assign_slotables_for_a_tree(root, &[]);
            }
            "slot" => {
                if let Some(old) = self.node_at(element).assigned_slot {
                    self.assign_slotables(old, false);
                }
                self.assign_a_slot(element);
            }
            _ => {}
        }
        Ok(())
    }

    /// Attach a shadow root to `host`.
    ///
    /// The host's light children leave the render tree; from now on they
    /// are only rendered when projected through a slot. A `<slot>` cannot
    /// host a shadow root.
    pub fn attach_shadow(&mut self, host: NodeId, mode: ShadowRootMode) -> DomResult<NodeId> {
        let element = self.node(host)?.as_element().ok_or(DomError::NotSupported)?;
        if element.slot.is_some() {
            return Err(DomError::NotSupported);
        }
        if element.shadow_root.is_some() {
            return Err(DomError::AlreadyAttached);
        }

        let owner = self.node_at(host).owner;
        let shadow = self.alloc(NodeData::ShadowRoot(ShadowRootData { host, mode }), owner);
        if let Some(e) = self.node_at_mut(host).as_element_mut() {
            e.shadow_root = Some(shadow);
        }

        let light: Vec<NodeId> = self.node_at(host).render_children.clone();
        for child in light {
            self.remove_raw(child);
        }

        tracing::debug!("Attached {:?} shadow root {} to {}", mode, shadow, host);
        Ok(shadow)
    }

    // --- Accessors ---

    /// Logical parent
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Logical children (empty for unknown ids)
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// First logical child
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Next logical sibling
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        siblings.get(index + 1).copied()
    }

    /// Previous logical sibling
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|&c| c == id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Document that owns `id`; a document owns itself
    pub fn owner_document(&self, id: NodeId) -> NodeId {
        self.get(id).map(|n| n.owner).unwrap_or(NodeId::ROOT)
    }

    /// Shadow root attached to `id`
    pub fn shadow_root(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::shadow_root)
    }

    /// Host of a shadow root
    pub fn host(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::as_shadow_root).map(|s| s.host)
    }

    /// Text of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::as_text)
    }

    // --- Pending notifications ---

    /// Slots signalled since the last drain
    pub fn pending_signal_slots(&self) -> &SignalSlots {
        &self.signal_slots
    }

    /// Drain the signal slot list, in first-signalled order
    pub fn take_signal_slots(&mut self) -> Vec<NodeId> {
        self.signal_slots.take()
    }

    /// Drain queued mutation records
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    pub(crate) fn signal_a_slot_change(&mut self, slot: NodeId) {
        if !self.config.signal_slot_changes {
            return;
        }
        if self.signal_slots.push(slot) {
            tracing::trace!("Slot change signalled for {}", slot);
        }
    }

    pub(crate) fn queue_record(&mut self, record: MutationRecord) {
        if self.config.record_mutations {
            self.records.push(record);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
