//! Slot projection
//!
//! Finding slots and slotables, and assigning slotables to slots.
//! `assign_slotables` is the only writer of both halves of the slot
//! association (`SlotData::assigned_nodes` and `Node::assigned_slot`)
//! and of a slot's rendered children.

use crate::node::{Node, ShadowRootMode};
use crate::render::RenderContainer;
use crate::walk::WhatToShow;
use crate::{DomTree, NodeId};

impl DomTree {
    /// Find the slot that receives `slotable`.
    ///
    /// Searches the shadow tree of the slotable's parent in tree order;
    /// the first slot with a matching name wins. With `open` set, slots
    /// inside closed shadow roots are not reported.
    pub fn find_a_slot(&self, slotable: NodeId, open: bool) -> Option<NodeId> {
        let node = self.get(slotable)?;
        let shadow = self.get(node.parent?)?.shadow_root()?;
        let root = self.get(shadow)?.as_shadow_root()?;
        if open && root.mode != ShadowRootMode::Open {
            return None;
        }

        let name = node.slot_name();
        self.descendants(shadow).find(|&id| {
            self.get(id)
                .and_then(Node::as_slot)
                .is_some_and(|slot| slot.name == name)
        })
    }

    /// Host children that `slot` would receive, in tree order
    pub fn find_slotables(&self, slot: NodeId) -> Vec<NodeId> {
        let root = self.root_node(slot);
        let Some(host) = self.host(root) else {
            return Vec::new();
        };

        self.children_filtered(host, WhatToShow::SLOTABLE)
            .into_iter()
            .filter(|&child| self.find_a_slot(child, false) == Some(slot))
            .collect()
    }

    /// What `slot` actually shows, with nested slots expanded.
    ///
    /// Falls back to the slot's own element and text children when
    /// nothing is assigned.
    pub fn find_flattened_slotables(&self, slot: NodeId) -> Vec<NodeId> {
        let mut slotables = self.find_slotables(slot);
        if slotables.is_empty() {
            slotables = self.children_filtered(slot, WhatToShow::SLOTABLE);
        }

        let mut result = Vec::with_capacity(slotables.len());
        for node in slotables {
            if self.get(node).is_some_and(Node::is_slot) {
                result.extend(self.find_flattened_slotables(node));
            } else {
                result.push(node);
            }
        }
        result
    }

    /// Recompute the slotables assigned to `slot` and re-render it.
    ///
    /// Unless `suppress_signal` is set, a change in the assigned list is
    /// signalled. The first pass captures the slot's children as fallback.
    pub fn assign_slotables(&mut self, slot: NodeId, suppress_signal: bool) {
        let slotables = self.find_slotables(slot);
        let Some(data) = self.get(slot).and_then(Node::as_slot) else {
            return;
        };
        let changed = data.assigned_nodes != slotables;

        let previous = match self.node_at_mut(slot).as_slot_mut() {
            Some(data) => {
                data.fallback_captured = true;
                std::mem::replace(&mut data.assigned_nodes, slotables.clone())
            }
            None => return,
        };
        if changed && !suppress_signal {
            self.signal_a_slot_change(slot);
        }

        for old in previous {
            if !slotables.contains(&old) && self.node_at(old).assigned_slot == Some(slot) {
                self.node_at_mut(old).assigned_slot = None;
            }
        }

        let rendered = self.render_children(slot).to_vec();
        for node in rendered {
            self.remove_raw(node);
        }

        if slotables.is_empty() {
            let fallback = self.children(slot).to_vec();
            for node in fallback {
                self.append_raw(slot, node);
            }
        } else {
            for &node in &slotables {
                self.node_at_mut(node).assigned_slot = Some(slot);
                self.append_raw(slot, node);
            }
        }

        tracing::trace!("Assigned {} slotables to slot {}", slotables.len(), slot);
    }

    /// Run `assign_slotables` for every slot in `root`'s inclusive
    /// subtree, in tree order. Slots in `no_signal_slots` are assigned
    /// without signalling.
    pub fn assign_slotables_for_a_tree(&mut self, root: NodeId, no_signal_slots: &[NodeId]) {
        for slot in self.inclusive_slot_descendants(root) {
            self.assign_slotables(slot, no_signal_slots.contains(&slot));
        }
    }

    /// Reassign the slot that `slotable` belongs to, if any
    pub fn assign_a_slot(&mut self, slotable: NodeId) {
        if let Some(slot) = self.find_a_slot(slotable, false) {
            self.assign_slotables(slot, false);
        }
    }

    // --- Queries for code outside the shadow tree ---

    /// Slot `slotable` is projected into, hidden for closed shadow roots
    pub fn assigned_slot_for(&self, slotable: NodeId) -> Option<NodeId> {
        self.find_a_slot(slotable, true)
    }

    /// Nodes assigned to `slot`; with `flatten`, what the slot shows
    /// with fallback content and nested slots resolved
    pub fn assigned_nodes(&self, slot: NodeId, flatten: bool) -> Vec<NodeId> {
        if flatten {
            return self.find_flattened_slotables(slot);
        }
        self.get(slot)
            .and_then(Node::as_slot)
            .map(|s| s.assigned_nodes.clone())
            .unwrap_or_default()
    }

    /// Elements among `assigned_nodes`
    pub fn assigned_elements(&self, slot: NodeId, flatten: bool) -> Vec<NodeId> {
        self.assigned_nodes(slot, flatten)
            .into_iter()
            .filter(|&id| self.get(id).is_some_and(Node::is_element))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{DomTree, NodeId, NodeOperations, ShadowRootMode};

    fn host_with_shadow(tree: &mut DomTree, mode: ShadowRootMode) -> (NodeId, NodeId) {
        let host = tree.create_element("div");
        tree.append_child(tree.root(), host).unwrap();
        let shadow = tree.attach_shadow(host, mode).unwrap();
        (host, shadow)
    }

    fn slot(tree: &mut DomTree, name: Option<&str>) -> NodeId {
        let slot = tree.create_element("slot");
        if let Some(name) = name {
            tree.set_attribute(slot, "name", name).unwrap();
        }
        slot
    }

    #[test]
    fn test_first_unnamed_slot_wins() {
        let mut tree = DomTree::new();
        let (host, shadow) = host_with_shadow(&mut tree, ShadowRootMode::Open);
        let wrapper = tree.create_element("div");
        let first = slot(&mut tree, None);
        let second = slot(&mut tree, None);
        tree.append_child(wrapper, first).unwrap();
        tree.append_child(shadow, wrapper).unwrap();
        tree.append_child(shadow, second).unwrap();

        let text = tree.create_text("hi");
        tree.append_child(host, text).unwrap();

        assert_eq!(tree.find_a_slot(text, false), Some(first));
        assert_eq!(tree.assigned_nodes(first, false), vec![text]);
        assert!(tree.assigned_nodes(second, false).is_empty());
    }

    #[test]
    fn test_named_slot_matching() {
        let mut tree = DomTree::new();
        let (host, shadow) = host_with_shadow(&mut tree, ShadowRootMode::Open);
        let named = slot(&mut tree, Some("x"));
        let unnamed = slot(&mut tree, None);
        let empty_named = slot(&mut tree, Some(""));
        tree.append_child(shadow, named).unwrap();
        tree.append_child(shadow, unnamed).unwrap();
        tree.append_child(shadow, empty_named).unwrap();

        let span = tree.create_element("span");
        tree.set_attribute(span, "slot", "x").unwrap();
        let plain = tree.create_element("b");
        let other = tree.create_element("i");
        tree.set_attribute(other, "slot", "missing").unwrap();
        for child in [span, plain, other] {
            tree.append_child(host, child).unwrap();
        }

        assert_eq!(tree.find_a_slot(span, false), Some(named));
        assert_eq!(tree.find_a_slot(plain, false), Some(unnamed));
        assert_eq!(tree.find_a_slot(other, false), None);
        assert_eq!(tree.get(other).unwrap().assigned_slot(), None);
        assert_eq!(tree.render_parent(other), None);
    }

    #[test]
    fn test_closed_shadow_hidden_from_open_lookup() {
        let mut tree = DomTree::new();
        let (host, shadow) = host_with_shadow(&mut tree, ShadowRootMode::Closed);
        let default_slot = slot(&mut tree, None);
        tree.append_child(shadow, default_slot).unwrap();
        let text = tree.create_text("secret");
        tree.append_child(host, text).unwrap();

        assert_eq!(tree.find_a_slot(text, true), None);
        assert_eq!(tree.assigned_slot_for(text), None);
        assert_eq!(tree.find_a_slot(text, false), Some(default_slot));
        assert_eq!(tree.get(text).unwrap().assigned_slot(), Some(default_slot));
    }

    #[test]
    fn test_disconnected_slot_has_no_slotables() {
        let mut tree = DomTree::new();
        let lone = slot(&mut tree, None);
        let fallback = tree.create_text("fallback");
        tree.append_child(lone, fallback).unwrap();

        assert!(tree.find_slotables(lone).is_empty());
        assert_eq!(tree.find_flattened_slotables(lone), vec![fallback]);
    }

    #[test]
    fn test_assign_is_idempotent() {
        let mut tree = DomTree::new();
        let (host, shadow) = host_with_shadow(&mut tree, ShadowRootMode::Open);
        let default_slot = slot(&mut tree, None);
        tree.append_child(shadow, default_slot).unwrap();
        let text = tree.create_text("a");
        tree.append_child(host, text).unwrap();
        tree.take_signal_slots();

        tree.assign_slotables(default_slot, false);
        let first = tree.assigned_nodes(default_slot, false);
        tree.assign_slotables(default_slot, false);

        assert_eq!(tree.assigned_nodes(default_slot, false), first);
        assert!(tree.take_signal_slots().is_empty());
        assert_eq!(tree.render_children(default_slot), &[text]);
    }

    #[test]
    fn test_suppressed_assignment_does_not_signal() {
        let mut tree = DomTree::new();
        let (host, shadow) = host_with_shadow(&mut tree, ShadowRootMode::Open);
        let default_slot = slot(&mut tree, None);
        tree.append_child(shadow, default_slot).unwrap();
        let text = tree.create_text("a");
        tree.append_child(host, text).unwrap();
        tree.take_signal_slots();

        // Detach the assignee behind the engine's back to force a change
        tree.node_at_mut(host).children.clear();
        tree.node_at_mut(text).parent = None;

        tree.assign_slotables_for_a_tree(shadow, &[default_slot]);
        assert!(tree.assigned_nodes(default_slot, false).is_empty());
        assert!(tree.take_signal_slots().is_empty());
        assert_eq!(tree.get(text).unwrap().assigned_slot(), None);
    }

    #[test]
    fn test_flattened_expands_nested_slots() {
        let mut tree = DomTree::new();
        let (outer_host, outer_shadow) = host_with_shadow(&mut tree, ShadowRootMode::Open);

        // Inner host lives in the outer shadow tree and forwards the
        // outer slot into its own shadow tree.
        let inner_host = tree.create_element("section");
        tree.append_child(outer_shadow, inner_host).unwrap();
        let inner_shadow = tree.attach_shadow(inner_host, ShadowRootMode::Open).unwrap();
        let inner_slot = slot(&mut tree, None);
        tree.append_child(inner_shadow, inner_slot).unwrap();

        let outer_slot = slot(&mut tree, None);
        tree.append_child(inner_host, outer_slot).unwrap();

        let a = tree.create_text("a");
        let b = tree.create_element("b");
        tree.append_child(outer_host, a).unwrap();
        tree.append_child(outer_host, b).unwrap();

        assert_eq!(tree.assigned_nodes(inner_slot, false), vec![outer_slot]);
        assert_eq!(tree.assigned_nodes(inner_slot, true), vec![a, b]);
        assert_eq!(tree.assigned_elements(inner_slot, true), vec![b]);
        assert_eq!(tree.render_text(outer_host), "a");
    }
}
