pub mod graph;
pub mod group;
pub mod partition;
