//! Graph Builder: turns a fetched [`GraphSource`] into the render-ready
//! [`LayoutGraph`] consumed by the layout engine.
//!
//! The LayoutGraph is rebuilt from scratch on every draw cycle. Node ids are
//! positional and only stable within one source snapshot; nothing here tries
//! to preserve identity across refetches.

use super::error::DrawError;
use super::types::GraphSource;

/// Corner rounding applied to every node shape.
pub const NODE_RX: f64 = 5.0;
/// Vertical corner rounding, kept equal to [`NODE_RX`].
pub const NODE_RY: f64 = 5.0;
/// Internal padding between a node's label and its border.
pub const NODE_PADDING: f64 = 10.0;
/// Visual width reserved for each edge.
pub const EDGE_WIDTH: f64 = 40.0;

/// A point in layout space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// Arrowhead style for an edge. Dataflow edges are rendered undirected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArrowStyle {
	/// No arrowhead; the edge reads as an undirected connection.
	#[default]
	None,
}

/// Curve interpolation style for an edge path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurveStyle {
	/// Smoothed basis-spline interpolation through the edge's points.
	#[default]
	Basis,
}

/// Render-ready node: label text plus shape styling, with position and
/// extent filled in by the layout engine.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
	/// Positional id, the node's index in the source snapshot.
	pub id: usize,
	/// First label line: the instruction's operation name.
	pub op: String,
	/// Second label line: the instruction's data type.
	pub dtype: String,
	/// Horizontal corner radius.
	pub rx: f64,
	/// Vertical corner radius.
	pub ry: f64,
	/// Padding between label and border.
	pub padding: f64,
	/// Center position, assigned by layout.
	pub center: Point,
	/// Box width, assigned by layout from the label extent.
	pub width: f64,
	/// Box height, assigned by layout.
	pub height: f64,
}

/// Render-ready edge connecting two node records by id.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
	/// Id of the first endpoint.
	pub source: usize,
	/// Id of the second endpoint.
	pub target: usize,
	/// Reserved visual width.
	pub width: f64,
	/// Arrowhead style (always suppressed).
	pub arrowhead: ArrowStyle,
	/// Curve interpolation style.
	pub curve: CurveStyle,
	/// Path through layout space, assigned by layout.
	pub points: Vec<Point>,
}

/// The full render-ready graph for one draw cycle.
///
/// Owned exclusively by its draw cycle: built here, positioned by the layout
/// engine, consumed by the renderer, then dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutGraph {
	/// Node records, indexed by their positional id.
	pub nodes: Vec<NodeRecord>,
	/// Edge records in source order. Parallel edges and self-loops are kept.
	pub edges: Vec<EdgeRecord>,
}

/// Decode the inner JSON document into a [`GraphSource`].
///
/// This is the second decode pass; the outer string layer is stripped by the
/// fetch step. Shape mismatches and edge indices outside `[0, nodes.len())`
/// fail with [`DrawError::MalformedGraphSource`], producing no partial graph.
pub fn decode_source(payload: &str) -> Result<GraphSource, DrawError> {
	let source: GraphSource = serde_json::from_str(payload)
		.map_err(|e| DrawError::MalformedGraphSource(e.to_string()))?;

	let n = source.nodes.len();
	for edge in &source.edges {
		if edge.0 >= n || edge.1 >= n {
			return Err(DrawError::MalformedGraphSource(format!(
				"edge [{}, {}] references a node outside 0..{}",
				edge.0, edge.1, n
			)));
		}
	}
	Ok(source)
}

/// Build the render-ready graph from a decoded source snapshot.
///
/// Emits exactly one node record per [`NodeSpec`](super::types::NodeSpec) and
/// one edge record per [`EdgeSpec`](super::types::EdgeSpec), in source order.
pub fn build(source: &GraphSource) -> LayoutGraph {
	let nodes = source
		.nodes
		.iter()
		.enumerate()
		.map(|(id, spec)| NodeRecord {
			id,
			op: spec.instruction.op.clone(),
			dtype: spec.instruction.dtype.clone(),
			rx: NODE_RX,
			ry: NODE_RY,
			padding: NODE_PADDING,
			center: Point::default(),
			width: 0.0,
			height: 0.0,
		})
		.collect();

	let edges = source
		.edges
		.iter()
		.map(|&edge| EdgeRecord {
			source: edge.0,
			target: edge.1,
			width: EDGE_WIDTH,
			arrowhead: ArrowStyle::None,
			curve: CurveStyle::Basis,
			points: Vec::new(),
		})
		.collect();

	LayoutGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::super::types::EdgeSpec;
	use super::*;

	fn source_json(nodes: &[(&str, &str)], edges: &[[usize; 2]]) -> String {
		let nodes: Vec<String> = nodes
			.iter()
			.map(|(op, dtype)| {
				format!(r#"{{"instruction":{{"op":"{op}","dtype":"{dtype}"}}}}"#)
			})
			.collect();
		let edges: Vec<String> = edges.iter().map(|e| format!("[{},{}]", e[0], e[1])).collect();
		format!(
			r#"{{"nodes":[{}],"edges":[{}]}}"#,
			nodes.join(","),
			edges.join(",")
		)
	}

	#[test]
	fn decode_accepts_well_formed_source() {
		let json = source_json(&[("load", "f32"), ("add", "f32")], &[[0, 1]]);
		let source = decode_source(&json).unwrap();
		assert_eq!(source.nodes.len(), 2);
		assert_eq!(source.nodes[0].instruction.op, "load");
		assert_eq!(source.edges, vec![EdgeSpec(0, 1)]);
	}

	#[test]
	fn decode_rejects_missing_edges_field() {
		let err = decode_source(r#"{"nodes":[]}"#).unwrap_err();
		assert!(matches!(err, DrawError::MalformedGraphSource(_)));
	}

	#[test]
	fn decode_rejects_non_sequence_nodes() {
		let err = decode_source(r#"{"nodes":{},"edges":[]}"#).unwrap_err();
		assert!(matches!(err, DrawError::MalformedGraphSource(_)));
	}

	#[test]
	fn decode_rejects_out_of_range_edge_index() {
		let json = source_json(&[("load", "f32")], &[[0, 3]]);
		let err = decode_source(&json).unwrap_err();
		assert!(matches!(err, DrawError::MalformedGraphSource(_)));
	}

	#[test]
	fn build_emits_one_record_per_source_entry() {
		let source = decode_source(&source_json(
			&[("load", "f32"), ("fma", "f16"), ("store", "f32")],
			&[[0, 1], [1, 2], [0, 2]],
		))
		.unwrap();
		let graph = build(&source);

		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(graph.edges.len(), 3);
		for (i, node) in graph.nodes.iter().enumerate() {
			assert_eq!(node.id, i);
		}
		for edge in &graph.edges {
			assert!(edge.source < graph.nodes.len());
			assert!(edge.target < graph.nodes.len());
		}
	}

	#[test]
	fn build_applies_fixed_styling() {
		let source = decode_source(&source_json(&[("mul", "i8")], &[[0, 0]])).unwrap();
		let graph = build(&source);

		let node = &graph.nodes[0];
		assert_eq!(node.op, "mul");
		assert_eq!(node.dtype, "i8");
		assert_eq!((node.rx, node.ry), (5.0, 5.0));
		assert_eq!(node.padding, 10.0);

		let edge = &graph.edges[0];
		assert_eq!(edge.width, 40.0);
		assert_eq!(edge.arrowhead, ArrowStyle::None);
		assert_eq!(edge.curve, CurveStyle::Basis);
	}

	#[test]
	fn build_is_idempotent_over_one_snapshot() {
		let source = decode_source(&source_json(
			&[("load", "f32"), ("exp", "f32")],
			&[[0, 1]],
		))
		.unwrap();
		assert_eq!(build(&source), build(&source));
	}

	#[test]
	fn self_loops_and_parallel_edges_pass_through() {
		let source = decode_source(&source_json(
			&[("a", "f32"), ("b", "f32")],
			&[[0, 0], [0, 1], [0, 1]],
		))
		.unwrap();
		let graph = build(&source);

		assert_eq!(graph.edges.len(), 3);
		assert_eq!((graph.edges[0].source, graph.edges[0].target), (0, 0));
		assert_eq!(graph.edges[1], graph.edges[2]);
	}
}
