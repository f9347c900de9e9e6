use crate::scheme::PartitionScheme;

/// Read-only context threaded through the recursive walk.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WalkContext<'a> {
    pub(crate) scheme: &'a PartitionScheme,
    /// Whether bare constants may be resolved eagerly. Only insert routing
    /// runs with this set; in a plain planning walk a bare constant selects
    /// nothing.
    pub(crate) for_insert: bool,
}
