//! Wire types for the fetched kernel instruction graph.

use serde::Deserialize;

/// Instruction metadata attached to each graph node.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Instruction {
	/// Operation name (e.g., "load", "fma", "store").
	pub op: String,
	/// Element data type the instruction operates on (e.g., "f32").
	pub dtype: String,
}

/// One node of the kernel's dataflow graph.
///
/// Nodes carry no identifier of their own: a node is identified by its
/// position in [`GraphSource::nodes`], and that identity is only meaningful
/// within the snapshot it came from.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct NodeSpec {
	/// The instruction this node represents.
	pub instruction: Instruction,
}

/// An edge between two nodes, given as a pair of node indices.
///
/// Edges are rendered without arrowheads, so source/target order only
/// matters for layout ranking.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct EdgeSpec(pub usize, pub usize);

/// Complete fetched graph: nodes and edges. Immutable once decoded.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GraphSource {
	/// Nodes in source order; index is the node id for this snapshot.
	pub nodes: Vec<NodeSpec>,
	/// Edges as `[source, target]` index pairs.
	pub edges: Vec<EdgeSpec>,
}
