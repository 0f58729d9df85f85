//! Render tree
//!
//! Physical placement of nodes. Outside shadow trees the render tree
//! mirrors the logical tree; a shadow root renders into its host, a
//! host renders only its shadow tree, and a slot renders either its
//! assigned slotables or its fallback content.

use crate::node::NodeData;
use crate::{DomTree, NodeId};

/// Raw container operations backing a node's rendered children.
///
/// These never touch logical parentage or slot assignment; the
/// mutation and projection engines decide where a node goes.
pub trait RenderContainer {
    /// Place `node` under `parent` before `before` (append when `before`
    /// is None or not rendered under `parent`), detaching it from its
    /// previous render parent first
    fn insert_raw(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>);

    /// Detach `node` from its render parent (no-op when unrendered)
    fn remove_raw(&mut self, node: NodeId);

    /// Append `node` to `parent`'s rendered children
    fn append_raw(&mut self, parent: NodeId, node: NodeId) {
        self.insert_raw(parent, node, None);
    }
}

impl RenderContainer for DomTree {
    fn insert_raw(&mut self, parent: NodeId, node: NodeId, before: Option<NodeId>) {
        if self.get(parent).is_none() || self.get(node).is_none() {
            return;
        }
        self.remove_raw(node);

        let rendered = &self.node_at(parent).render_children;
        let index = before
            .and_then(|b| rendered.iter().position(|&c| c == b))
            .unwrap_or(rendered.len());
        self.node_at_mut(parent).render_children.insert(index, node);
        self.node_at_mut(node).render_parent = Some(parent);
    }

    fn remove_raw(&mut self, node: NodeId) {
        let Some(parent) = self.get(node).and_then(|n| n.render_parent) else {
            return;
        };
        self.node_at_mut(parent).render_children.retain(|&c| c != node);
        self.node_at_mut(node).render_parent = None;
    }
}

impl DomTree {
    /// Parent in the render tree
    pub fn render_parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.render_parent)
    }

    /// Children in the render tree
    pub fn render_children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.render_children.as_slice()).unwrap_or(&[])
    }

    /// Concatenated text of the rendered subtree under `id`
    pub fn render_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_render_text(id, &mut out);
        out
    }

    fn collect_render_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.text(id) {
            out.push_str(text);
        }
        for &child in self.render_children(id) {
            self.collect_render_text(child, out);
        }
    }

    /// Raw insertion performed for one logical insertion of `node`
    /// into `parent` before `child`.
    pub(crate) fn place_inserted(&mut self, parent: NodeId, node: NodeId, child: Option<NodeId>) {
        let target = match &self.node_at(parent).data {
            NodeData::ShadowRoot(shadow) => Some(shadow.host),
            // Light children of a host are placed by slot assignment
            NodeData::Element(e) if e.shadow_root.is_some() => None,
            // So is captured fallback content
            NodeData::Element(e) if e.slot.as_ref().is_some_and(|s| s.fallback_captured) => None,
            _ => Some(parent),
        };
        if let Some(target) = target {
            self.insert_raw(target, node, child);
        }
    }
}
