//! DOM Node Operations
//!
//! Core node manipulation: pre-insert, insert, replace, replace-all,
//! remove, clone and adopt. Validity checks run before anything is
//! touched; the slot projection engine is re-run at the points where a
//! mutation can change what a slot receives.

use crate::node::{ElementData, NodeData, SlotData};
use crate::observer::MutationRecord;
use crate::render::RenderContainer;
use crate::{DomError, DomResult, DomTree, NodeId};

/// Node operations trait
pub trait NodeOperations {
    /// Append a child node
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Insert before a reference node
    fn insert_before(&mut self, parent: NodeId, new_child: NodeId, ref_child: Option<NodeId>) -> DomResult<NodeId>;

    /// Remove a child node
    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId>;

    /// Replace a child with another node, returning the old child
    fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> DomResult<NodeId>;

    /// Replace all children with `node` (or with nothing)
    fn replace_children(&mut self, parent: NodeId, node: Option<NodeId>) -> DomResult<()>;

    /// Clone a node into its own document
    fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId>;

    /// Append nodes and strings after the last child
    fn append_nodes(&mut self, parent: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()>;

    /// Insert nodes and strings before the first child
    fn prepend_nodes(&mut self, parent: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()>;
}

/// Item of a node list: an existing node, or text to create a node for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrText {
    Node(NodeId),
    Text(String),
}

impl From<NodeId> for NodeOrText {
    fn from(id: NodeId) -> Self {
        NodeOrText::Node(id)
    }
}

impl From<&str> for NodeOrText {
    fn from(text: &str) -> Self {
        NodeOrText::Text(text.to_string())
    }
}

impl From<String> for NodeOrText {
    fn from(text: String) -> Self {
        NodeOrText::Text(text)
    }
}

impl NodeOperations for DomTree {
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.append(child, parent)
    }

    fn insert_before(&mut self, parent: NodeId, new_child: NodeId, ref_child: Option<NodeId>) -> DomResult<NodeId> {
        self.pre_insert(new_child, parent, ref_child)
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.pre_remove(child, parent)
    }

    fn replace_child(&mut self, parent: NodeId, new_child: NodeId, old_child: NodeId) -> DomResult<NodeId> {
        self.replace(old_child, new_child, parent)
    }

    fn replace_children(&mut self, parent: NodeId, node: Option<NodeId>) -> DomResult<()> {
        self.replace_all(node, parent)
    }

    fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        self.clone(node, None, deep)
    }

    fn append_nodes(&mut self, parent: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()> {
        self.ensure_list_insertable(&nodes, parent)?;
        let document = self.owner_document(parent);
        let node = self.convert_nodes_into_a_node(nodes, document)?;
        self.append(node, parent)?;
        Ok(())
    }

    fn prepend_nodes(&mut self, parent: NodeId, nodes: Vec<NodeOrText>) -> DomResult<()> {
        self.ensure_list_insertable(&nodes, parent)?;
        let document = self.owner_document(parent);
        let node = self.convert_nodes_into_a_node(nodes, document)?;
        // The first child may have moved into the converted node
        let first = self.first_child(parent);
        self.pre_insert(node, parent, first)?;
        Ok(())
    }
}

impl DomTree {
    /// Only documents, elements and fragments (shadow roots included)
    /// can have children
    fn ensure_parent(&self, parent: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        if !matches!(
            parent_node.data,
            NodeData::Document | NodeData::Element(_) | NodeData::DocumentFragment | NodeData::ShadowRoot(_)
        ) {
            return Err(DomError::HierarchyRequest);
        }
        Ok(())
    }

    /// Checks shared by every insertion path
    fn ensure_insertable(&self, node: NodeId, parent: NodeId) -> DomResult<()> {
        self.ensure_parent(parent)?;

        if matches!(self.node(node)?.data, NodeData::Document | NodeData::ShadowRoot(_)) {
            return Err(DomError::HierarchyRequest);
        }

        if self.is_host_including_inclusive_ancestor(node, parent) {
            return Err(DomError::HierarchyRequest);
        }
        Ok(())
    }

    fn ensure_pre_insertion_validity(&self, node: NodeId, parent: NodeId, child: Option<NodeId>) -> DomResult<()> {
        self.ensure_insertable(node, parent)?;
        if let Some(child) = child {
            if self.node(child)?.parent != Some(parent) {
                return Err(DomError::NotFound);
            }
        }
        Ok(())
    }

    /// Every node of the list must be insertable into `parent`, checked
    /// before any text node or fragment is created
    fn ensure_list_insertable(&self, nodes: &[NodeOrText], parent: NodeId) -> DomResult<()> {
        self.ensure_parent(parent)?;
        for item in nodes {
            if let NodeOrText::Node(node) = *item {
                self.ensure_insertable(node, parent)?;
            }
        }
        Ok(())
    }

    /// Turn a list of nodes and strings into a single node.
    ///
    /// Strings become text nodes owned by `document`. A single item is
    /// returned as is; anything else is gathered, in order, into a new
    /// fragment (empty for an empty list).
    pub fn convert_nodes_into_a_node(&mut self, nodes: Vec<NodeOrText>, document: NodeId) -> DomResult<NodeId> {
        if !matches!(self.node(document)?.data, NodeData::Document) {
            return Err(DomError::NotSupported);
        }
        for item in &nodes {
            if let NodeOrText::Node(node) = *item {
                if matches!(self.node(node)?.data, NodeData::Document | NodeData::ShadowRoot(_)) {
                    return Err(DomError::HierarchyRequest);
                }
            }
        }

        let mut ids = Vec::with_capacity(nodes.len());
        for item in nodes {
            ids.push(match item {
                NodeOrText::Node(node) => node,
                NodeOrText::Text(text) => self.alloc_in(NodeData::Text(text), document),
            });
        }

        if let [single] = ids.as_slice() {
            return Ok(*single);
        }
        let fragment = self.alloc_in(NodeData::DocumentFragment, document);
        for id in ids {
            self.append(id, fragment)?;
        }
        Ok(fragment)
    }

    /// Insert `node` into `parent` before `child` (append when None).
    ///
    /// `node` is adopted into `parent`'s document first, which detaches
    /// it from its current parent.
    pub fn pre_insert(&mut self, node: NodeId, parent: NodeId, child: Option<NodeId>) -> DomResult<NodeId> {
        self.ensure_pre_insertion_validity(node, parent, child)?;

        let mut reference = child;
        if reference == Some(node) {
            reference = self.next_sibling(node);
        }

        let document = self.owner_document(parent);
        self.adopt_into(node, document);
        self.insert_node(node, parent, reference, false);
        Ok(node)
    }

    /// Append `node` to `parent`
    pub fn append(&mut self, node: NodeId, parent: NodeId) -> DomResult<NodeId> {
        self.pre_insert(node, parent, None)
    }

    /// Insert without changing `node`'s document.
    ///
    /// A node that still has a parent is detached from it first. With
    /// `suppress_observers` set no mutation record is queued.
    pub fn insert(&mut self, node: NodeId, parent: NodeId, child: Option<NodeId>, suppress_observers: bool) -> DomResult<()> {
        self.ensure_pre_insertion_validity(node, parent, child)?;

        let mut reference = child;
        if reference == Some(node) {
            reference = self.next_sibling(node);
        }
        if let Some(old_parent) = self.node_at(node).parent {
            self.remove_node(node, old_parent, suppress_observers);
        }
        self.insert_node(node, parent, reference, suppress_observers);
        Ok(())
    }

    pub(crate) fn insert_node(&mut self, node: NodeId, parent: NodeId, child: Option<NodeId>, suppress_observers: bool) {
        let nodes = if self.node_at(node).is_fragment() {
            let children = self.node_at(node).children.clone();
            for &c in &children {
                self.remove_node(c, node, true);
            }
            if !children.is_empty() {
                self.queue_record(MutationRecord::child_list(node, Vec::new(), children.clone(), None, None));
            }
            children
        } else {
            vec![node]
        };
        if nodes.is_empty() {
            return;
        }

        let previous_sibling = match child {
            Some(c) => self.previous_sibling(c),
            None => self.node_at(parent).children.last().copied(),
        };

        tracing::trace!("Inserting {} node(s) into {}", nodes.len(), parent);

        for &n in &nodes {
            let siblings = &self.node_at(parent).children;
            let index = child
                .and_then(|c| siblings.iter().position(|&s| s == c))
                .unwrap_or(siblings.len());
            self.node_at_mut(parent).children.insert(index, n);
            self.node_at_mut(n).parent = Some(parent);
            self.place_inserted(parent, n, child);

            if self.node_at(parent).shadow_root().is_some() && self.node_at(n).is_slotable() {
                self.assign_a_slot(n);
            }

            let unassigned_slot = self
                .node_at(parent)
                .as_slot()
                .filter(|s| s.assigned_nodes.is_empty())
                .map(|s| s.fallback_captured);
            if let Some(captured) = unassigned_slot {
                // Fallback is on screen, show the new child with it
                if captured {
                    let before = child.filter(|&c| self.render_parent(c) == Some(parent));
                    self.insert_raw(parent, n, before);
                }
                self.signal_a_slot_change(parent);
            }

            let slots = self.inclusive_slot_descendants(n);
            if !slots.is_empty() {
                let root = self.root_node(n);
                self.assign_slotables_for_a_tree(root, &slots);
            }
        }

        if !suppress_observers {
            self.queue_record(MutationRecord::child_list(parent, nodes, Vec::new(), previous_sibling, child));
        }
    }

    /// Replace `child` of `parent` with `node`; returns `child`.
    ///
    /// Observably a single mutation: one record is queued.
    pub fn replace(&mut self, child: NodeId, node: NodeId, parent: NodeId) -> DomResult<NodeId> {
        self.ensure_insertable(node, parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotFound);
        }

        let mut reference = self.next_sibling(child);
        if reference == Some(node) {
            reference = self.next_sibling(node);
        }

        let document = self.owner_document(parent);
        self.adopt_into(node, document);
        let previous_sibling = self.previous_sibling(child);

        let mut removed = Vec::new();
        if self.node_at(child).parent.is_some() {
            removed.push(child);
            self.remove_node(child, parent, true);
        }

        let added = self.inserted_nodes(node);
        tracing::debug!("Replacing {} with {} in {}", child, node, parent);
        self.insert_node(node, parent, reference, true);

        self.queue_record(MutationRecord::child_list(parent, added, removed, previous_sibling, reference));
        Ok(child)
    }

    /// Replace every child of `parent` with `node`, or with nothing
    pub fn replace_all(&mut self, node: Option<NodeId>, parent: NodeId) -> DomResult<()> {
        match node {
            Some(node) => self.ensure_insertable(node, parent)?,
            None => {
                self.node(parent)?;
            }
        }

        if let Some(node) = node {
            let document = self.owner_document(parent);
            self.adopt_into(node, document);
        }

        let removed = self.node_at(parent).children.clone();
        let added = node.map(|n| self.inserted_nodes(n)).unwrap_or_default();
        tracing::debug!("Replacing {} children of {} with {} node(s)", removed.len(), parent, added.len());

        for &child in &removed {
            self.remove_node(child, parent, true);
        }
        if let Some(node) = node {
            self.insert_node(node, parent, None, true);
        }

        if !added.is_empty() || !removed.is_empty() {
            self.queue_record(MutationRecord::child_list(parent, added, removed, None, None));
        }
        Ok(())
    }

    /// Remove `child` from `parent`, returning it
    pub fn pre_remove(&mut self, child: NodeId, parent: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        if self.node(child)?.parent != Some(parent) {
            return Err(DomError::NotFound);
        }
        self.remove_node(child, parent, false);
        Ok(child)
    }

    /// Remove `node` from `parent`.
    ///
    /// With `suppress_observers` set no mutation record is queued.
    pub fn remove(&mut self, node: NodeId, parent: NodeId, suppress_observers: bool) -> DomResult<()> {
        self.node(parent)?;
        if self.node(node)?.parent != Some(parent) {
            return Err(DomError::NotFound);
        }
        self.remove_node(node, parent, suppress_observers);
        Ok(())
    }

    pub(crate) fn remove_node(&mut self, node: NodeId, parent: NodeId, suppress_observers: bool) {
        let previous_sibling = self.previous_sibling(node);
        let next_sibling = self.next_sibling(node);

        self.node_at_mut(parent).children.retain(|&c| c != node);
        self.node_at_mut(node).parent = None;
        self.remove_raw(node);

        if let Some(slot) = self.node_at_mut(node).assigned_slot.take() {
            self.assign_slotables(slot, false);
        }

        let unassigned_slot = self
            .node_at(parent)
            .as_slot()
            .is_some_and(|s| s.assigned_nodes.is_empty());
        if unassigned_slot {
            self.signal_a_slot_change(parent);
        }

        let slots = self.inclusive_slot_descendants(node);
        if !slots.is_empty() {
            let root = self.root_node(parent);
            self.assign_slotables_for_a_tree(root, &[]);
            self.assign_slotables_for_a_tree(node, &slots);
        }

        tracing::trace!("Removed {} from {}", node, parent);

        if !suppress_observers {
            self.queue_record(MutationRecord::child_list(parent, Vec::new(), vec![node], previous_sibling, next_sibling));
        }
    }

    /// Nodes that inserting `node` adds: a fragment's children, or `node`
    fn inserted_nodes(&self, node: NodeId) -> Vec<NodeId> {
        let n = self.node_at(node);
        if n.is_fragment() { n.children.clone() } else { vec![node] }
    }

    /// Copy `node` into `document` (its own document when None).
    ///
    /// The copy keeps kind, name, attributes and text, never tree or
    /// slot state. A deep clone appends cloned children one by one, so
    /// slots in the copy are assigned as for freshly inserted content.
    pub fn clone(&mut self, node: NodeId, document: Option<NodeId>, deep: bool) -> DomResult<NodeId> {
        let source = self.node(node)?;
        if source.is_shadow_root() {
            return Err(DomError::NotSupported);
        }
        let document = document.unwrap_or(source.owner);
        if !matches!(self.node(document)?.data, NodeData::Document) {
            return Err(DomError::NotSupported);
        }
        tracing::debug!("Cloning {} into document {} (deep: {})", node, document, deep);
        self.clone_into(node, document, deep)
    }

    fn clone_into(&mut self, node: NodeId, document: NodeId, deep: bool) -> DomResult<NodeId> {
        let data = match &self.node_at(node).data {
            NodeData::Element(e) => NodeData::Element(ElementData {
                local_name: e.local_name.clone(),
                attrs: e.attrs.clone(),
                shadow_root: None,
                slot: e.slot.as_ref().map(|s| SlotData {
                    name: s.name.clone(),
                    ..Default::default()
                }),
            }),
            NodeData::Text(t) => NodeData::Text(t.clone()),
            NodeData::Comment(c) => NodeData::Comment(c.clone()),
            NodeData::Document => NodeData::Document,
            NodeData::DocumentFragment => NodeData::DocumentFragment,
            NodeData::ShadowRoot(_) => return Err(DomError::NotSupported),
        };
        let copy = self.alloc_in(data, document);

        if deep {
            // Children of a cloned document belong to the copy
            let document = if self.node_at(copy).owner == copy { copy } else { document };
            let children = self.node_at(node).children.clone();
            for child in children {
                let child_copy = self.clone_into(child, document, true)?;
                self.append(child_copy, copy)?;
            }
        }
        Ok(copy)
    }

    /// Move `node` into `document`, detaching it from its parent.
    ///
    /// Only `node`'s own owner reference changes; descendants keep theirs.
    pub fn adopt(&mut self, node: NodeId, document: NodeId) -> DomResult<()> {
        match self.node(node)?.data {
            NodeData::Document => return Err(DomError::NotSupported),
            NodeData::ShadowRoot(_) => return Err(DomError::HierarchyRequest),
            _ => {}
        }
        if !matches!(self.node(document)?.data, NodeData::Document) {
            return Err(DomError::NotSupported);
        }
        self.adopt_into(node, document);
        Ok(())
    }

    fn adopt_into(&mut self, node: NodeId, document: NodeId) {
        if let Some(parent) = self.node_at(node).parent {
            self.remove_node(node, parent, false);
        }
        if self.node_at(node).owner != document {
            tracing::debug!("Adopting {} into document {}", node, document);
            self.node_at_mut(node).owner = document;
        }
    }
}
