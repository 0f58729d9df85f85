//! Tree Configuration

/// DOM tree configuration options
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Queue a `MutationRecord` for every unsuppressed childList change
    pub record_mutations: bool,

    /// Queue slot change signals
    pub signal_slot_changes: bool,

    /// Number of nodes to reserve in the arena up front
    pub initial_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            record_mutations: true,
            signal_slot_changes: true,
            initial_capacity: 64,
        }
    }
}
