//! Scene management module
//!
//! The pool never owns scene objects directly; it drives them through the
//! [`Scene`] trait, which stands in for the host engine's scene graph.
//! [`SimpleScene`] is a self-contained implementation for tools, demos and tests.

pub mod scene_graph;
pub mod simple_scene;

pub use scene_graph::{Scene, NodeId, WorldId};
pub use simple_scene::{SimpleScene, NodeFlags};
