//! DOM Observers
//!
//! Mutation records and the signal slot list. Neither is delivered
//! synchronously: both queues are owned by the tree and drained by the
//! embedder once per turn.

use crate::NodeId;

/// Mutation record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub mutation_type: MutationType,
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
    pub previous_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationType {
    ChildList,
}

impl MutationRecord {
    /// childList record for `target`
    pub fn child_list(
        target: NodeId,
        added_nodes: Vec<NodeId>,
        removed_nodes: Vec<NodeId>,
        previous_sibling: Option<NodeId>,
        next_sibling: Option<NodeId>,
    ) -> Self {
        Self {
            mutation_type: MutationType::ChildList,
            target,
            added_nodes,
            removed_nodes,
            previous_sibling,
            next_sibling,
        }
    }
}

/// Pending slot change signals.
///
/// A slot is listed at most once, in the order it was first signalled.
#[derive(Debug, Default)]
pub struct SignalSlots {
    slots: Vec<NodeId>,
}

impl SignalSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot; returns false if it was already pending
    pub fn push(&mut self, slot: NodeId) -> bool {
        if self.slots.contains(&slot) {
            return false;
        }
        self.slots.push(slot);
        true
    }

    pub fn contains(&self, slot: NodeId) -> bool {
        self.slots.contains(&slot)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Take all pending slots (clears the list)
    pub fn take(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.slots)
    }
}
