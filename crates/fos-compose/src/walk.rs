//! Tree walking
//!
//! Ancestor walks and pre-order traversal over the logical tree, plus
//! node-type filters for picking out slotables.

use crate::node::{Node, NodeType};
use crate::{DomTree, NodeId};

/// What types of nodes to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhatToShow(u32);

impl WhatToShow {
    pub const ALL: WhatToShow = WhatToShow(0xFFFFFFFF);
    pub const ELEMENT: WhatToShow = WhatToShow(0x1);
    pub const TEXT: WhatToShow = WhatToShow(0x4);
    pub const COMMENT: WhatToShow = WhatToShow(0x80);
    pub const DOCUMENT: WhatToShow = WhatToShow(0x100);
    pub const DOCUMENT_FRAGMENT: WhatToShow = WhatToShow(0x400);

    /// Nodes that can be assigned to a slot
    pub const SLOTABLE: WhatToShow = WhatToShow(0x1 | 0x4);

    /// Check if a node type is shown
    pub fn includes(self, node_type: NodeType) -> bool {
        let flag = match node_type {
            NodeType::Element => Self::ELEMENT.0,
            NodeType::Text => Self::TEXT.0,
            NodeType::Comment => Self::COMMENT.0,
            NodeType::Document => Self::DOCUMENT.0,
            NodeType::DocumentFragment => Self::DOCUMENT_FRAGMENT.0,
        };
        (self.0 & flag) != 0
    }

    /// Union of two filters
    pub fn or(self, other: WhatToShow) -> WhatToShow {
        WhatToShow(self.0 | other.0)
    }
}

impl Default for WhatToShow {
    fn default() -> Self {
        Self::ALL
    }
}

/// Ancestor iterator.
///
/// With `host_including` set, a shadow root is followed by its host,
/// so the walk crosses shadow boundaries.
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
    host_including: bool,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        let node = self.tree.get(current)?;
        self.next = match node.parent {
            Some(parent) => Some(parent),
            None if self.host_including => node.as_shadow_root().map(|s| s.host),
            None => None,
        };
        Some(current)
    }
}

/// Pre-order (tree order) iterator over a logical subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack.extend(self.tree.children(current).iter().rev());
        Some(current)
    }
}

impl DomTree {
    /// `id` followed by its logical ancestors
    pub fn inclusive_ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: Some(id), host_including: false }
    }

    /// Logical ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: self.parent(id), host_including: false }
    }

    /// `id` and its ancestors, stepping from each shadow root to its host
    pub fn host_including_inclusive_ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { tree: self, next: Some(id), host_including: true }
    }

    /// Check if `ancestor` is `id` or one of its host-including ancestors
    pub fn is_host_including_inclusive_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.host_including_inclusive_ancestors(id).any(|a| a == ancestor)
    }

    /// `root` and every logical descendant, in tree order
    pub fn inclusive_descendants(&self, root: NodeId) -> Descendants<'_> {
        let stack = if self.get(root).is_some() { vec![root] } else { Vec::new() };
        Descendants { tree: self, stack }
    }

    /// Logical descendants of `root`, in tree order
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut walk = self.inclusive_descendants(root);
        walk.next();
        walk
    }

    /// Topmost logical ancestor; a shadow root for nodes in a shadow tree
    pub fn root_node(&self, id: NodeId) -> NodeId {
        self.inclusive_ancestors(id).last().unwrap_or(id)
    }

    /// `root` and its slot descendants, in tree order
    pub fn inclusive_slot_descendants(&self, root: NodeId) -> Vec<NodeId> {
        self.inclusive_descendants(root)
            .filter(|&id| self.get(id).is_some_and(Node::is_slot))
            .collect()
    }

    /// Logical children of `id` accepted by `what`
    pub fn children_filtered(&self, id: NodeId, what: WhatToShow) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(|n| what.includes(n.node_type())))
            .collect()
    }
}
