use slotmap::new_key_type;

new_key_type! {
    /// Handle of a node stored in the placement tree arena.
    pub struct NodeId;
}
