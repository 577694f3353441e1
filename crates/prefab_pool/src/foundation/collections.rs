//! Collection types shared across the crate

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational key of a node in a [`SimpleScene`](crate::scene::SimpleScene)
    ///
    /// A key whose node was destroyed never matches a newer node, which is what
    /// lets stale references be detected instead of aliasing a recycled slot.
    pub struct NodeKey;
}
