//! UI components.

pub mod kernel_graph;
