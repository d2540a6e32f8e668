//! Relation edges between instances.

mod edges;

pub use edges::RelationGraph;
