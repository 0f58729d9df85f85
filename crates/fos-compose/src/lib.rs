//! fOS Compose - Shadow tree composition
//!
//! Arena-based DOM tree that keeps two views of the same content:
//! the logical tree (parent/children as authored) and the render tree,
//! where slotables are projected into the slots of their host's shadow
//! root. Every mutation keeps both views consistent.

mod config;
mod error;
mod node;
mod observer;
mod operations;
mod render;
mod slots;
mod tree;
pub mod walk;

pub use config::TreeConfig;
pub use error::{DomError, DomResult};
pub use node::{ElementData, Node, NodeData, NodeType, ShadowRootData, ShadowRootMode, SlotData};
pub use observer::{MutationRecord, MutationType, SignalSlots};
pub use operations::{NodeOperations, NodeOrText};
pub use render::RenderContainer;
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root document node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
