//! Left-to-right layered layout for the instruction graph.
//!
//! The core pipeline only depends on the narrow [`LayoutEngine`] capability;
//! [`RankedLayout`] is the concrete engine used by the component. It assigns
//! each node a rank by longest path from the graph's sources, stacks ranks as
//! columns from left to right, and routes edges between box borders.

use super::builder::{LayoutGraph, Point};

/// Minimal rectangle enclosing the laid-out graph, including the layout's
/// own margins. This is what the viewport fitter consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
	pub width: f64,
	pub height: f64,
}

/// Capability the draw cycle depends on for positioning: fills in node
/// centers, node extents, and edge paths, and reports the resulting bounds.
pub trait LayoutEngine {
	/// Position every record in `graph` and return the enclosing box.
	fn layout(&self, graph: &mut LayoutGraph) -> BoundingBox;
}

/// Approximate advance width of one label character, in layout units.
pub const LABEL_CHAR_WIDTH: f64 = 7.2;
/// Height of one label line.
pub const LABEL_LINE_HEIGHT: f64 = 14.0;

/// Deterministic ranked left-to-right layout.
///
/// Separation and margin defaults match the diagram's established geometry:
/// 40 between nodes in a column, 20 between columns, 20 of margin all round.
#[derive(Clone, Debug)]
pub struct RankedLayout {
	/// Vertical gap between nodes sharing a rank.
	pub nodesep: f64,
	/// Horizontal gap between adjacent ranks.
	pub ranksep: f64,
	/// Horizontal margin on each side of the content.
	pub marginx: f64,
	/// Vertical margin above and below the content.
	pub marginy: f64,
}

impl Default for RankedLayout {
	fn default() -> Self {
		Self {
			nodesep: 40.0,
			ranksep: 20.0,
			marginx: 20.0,
			marginy: 20.0,
		}
	}
}

impl RankedLayout {
	/// Longest-path ranks, relaxed at most `n` passes so cyclic inputs
	/// terminate with a stable (if arbitrary) layering.
	fn ranks(&self, graph: &LayoutGraph) -> Vec<usize> {
		let n = graph.nodes.len();
		let mut ranks = vec![0usize; n];
		for _ in 0..n {
			let mut changed = false;
			for edge in &graph.edges {
				if edge.source == edge.target {
					continue;
				}
				if ranks[edge.target] < ranks[edge.source] + 1 {
					ranks[edge.target] = ranks[edge.source] + 1;
					changed = true;
				}
			}
			if !changed {
				break;
			}
		}
		ranks
	}

	fn size_nodes(&self, graph: &mut LayoutGraph) {
		for node in &mut graph.nodes {
			let label_chars = node.op.chars().count().max(node.dtype.chars().count());
			node.width = node.padding * 2.0 + LABEL_CHAR_WIDTH * label_chars.max(1) as f64;
			node.height = node.padding * 2.0 + LABEL_LINE_HEIGHT * 2.0;
		}
	}

	fn route_edges(&self, graph: &mut LayoutGraph) {
		let nodes = graph.nodes.clone();
		for edge in &mut graph.edges {
			let src = &nodes[edge.source];
			let tgt = &nodes[edge.target];

			if edge.source == edge.target {
				// Small loop hung off the node's right border.
				let (x, y) = (src.center.x + src.width / 2.0, src.center.y);
				edge.points = vec![
					Point { x, y: y - 8.0 },
					Point { x: x + 24.0, y: y - 12.0 },
					Point { x: x + 24.0, y: y + 12.0 },
					Point { x, y: y + 8.0 },
				];
				continue;
			}

			// Leave from the border facing the target; back edges flip.
			let leftward = tgt.center.x < src.center.x;
			let sign = if leftward { -1.0 } else { 1.0 };
			let start = Point {
				x: src.center.x + sign * src.width / 2.0,
				y: src.center.y,
			};
			let end = Point {
				x: tgt.center.x - sign * tgt.width / 2.0,
				y: tgt.center.y,
			};
			let mid = Point {
				x: (start.x + end.x) / 2.0,
				y: (start.y + end.y) / 2.0,
			};
			edge.points = vec![start, mid, end];
		}
	}
}

impl LayoutEngine for RankedLayout {
	fn layout(&self, graph: &mut LayoutGraph) -> BoundingBox {
		self.size_nodes(graph);

		if graph.nodes.is_empty() {
			return BoundingBox {
				width: self.marginx * 2.0,
				height: self.marginy * 2.0,
			};
		}

		let ranks = self.ranks(graph);
		let max_rank = ranks.iter().copied().max().unwrap_or(0);

		// Column extents: widest node per rank, stacked height per rank.
		let mut col_width = vec![0.0f64; max_rank + 1];
		let mut col_stack = vec![0.0f64; max_rank + 1];
		let mut col_count = vec![0usize; max_rank + 1];
		for node in &graph.nodes {
			let r = ranks[node.id];
			col_width[r] = col_width[r].max(node.width);
			col_stack[r] += node.height;
			col_count[r] += 1;
		}
		for r in 0..=max_rank {
			if col_count[r] > 1 {
				col_stack[r] += self.nodesep * (col_count[r] - 1) as f64;
			}
		}
		let max_stack = col_stack.iter().copied().fold(0.0f64, f64::max);

		// Column x centers, then per-column vertical cursors (columns are
		// centered against the tallest one).
		let mut col_x = vec![0.0f64; max_rank + 1];
		let mut cursor = self.marginx;
		for r in 0..=max_rank {
			col_x[r] = cursor + col_width[r] / 2.0;
			cursor += col_width[r] + self.ranksep;
		}
		let content_width = cursor - self.ranksep - self.marginx;

		let mut col_cursor: Vec<f64> = (0..=max_rank)
			.map(|r| self.marginy + (max_stack - col_stack[r]) / 2.0)
			.collect();
		for node in &mut graph.nodes {
			let r = ranks[node.id];
			node.center = Point {
				x: col_x[r],
				y: col_cursor[r] + node.height / 2.0,
			};
			col_cursor[r] += node.height + self.nodesep;
		}

		self.route_edges(graph);

		BoundingBox {
			width: content_width + self.marginx * 2.0,
			height: max_stack + self.marginy * 2.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::builder::{build, decode_source};
	use super::*;

	fn laid_out(json: &str) -> (LayoutGraph, BoundingBox) {
		let mut graph = build(&decode_source(json).unwrap());
		let bounds = RankedLayout::default().layout(&mut graph);
		(graph, bounds)
	}

	const CHAIN: &str = r#"{"nodes":[
		{"instruction":{"op":"load","dtype":"f32"}},
		{"instruction":{"op":"fma","dtype":"f32"}},
		{"instruction":{"op":"store","dtype":"f32"}}],
		"edges":[[0,1],[1,2]]}"#;

	#[test]
	fn chain_ranks_advance_left_to_right() {
		let (graph, _) = laid_out(CHAIN);
		assert!(graph.nodes[0].center.x < graph.nodes[1].center.x);
		assert!(graph.nodes[1].center.x < graph.nodes[2].center.x);
	}

	#[test]
	fn bounds_enclose_every_node() {
		let (graph, bounds) = laid_out(CHAIN);
		for node in &graph.nodes {
			assert!(node.center.x - node.width / 2.0 >= 0.0);
			assert!(node.center.x + node.width / 2.0 <= bounds.width);
			assert!(node.center.y - node.height / 2.0 >= 0.0);
			assert!(node.center.y + node.height / 2.0 <= bounds.height);
		}
	}

	#[test]
	fn siblings_stack_with_node_separation() {
		let json = r#"{"nodes":[
			{"instruction":{"op":"a","dtype":"f32"}},
			{"instruction":{"op":"b","dtype":"f32"}},
			{"instruction":{"op":"c","dtype":"f32"}}],
			"edges":[[0,1],[0,2]]}"#;
		let (graph, _) = laid_out(json);

		// b and c share a rank; same column, 40 apart edge-to-edge.
		assert_eq!(graph.nodes[1].center.x, graph.nodes[2].center.x);
		let gap = (graph.nodes[2].center.y - graph.nodes[1].center.y).abs()
			- graph.nodes[1].height / 2.0
			- graph.nodes[2].height / 2.0;
		assert!((gap - 40.0).abs() < 1e-9);
	}

	#[test]
	fn layout_is_deterministic() {
		let (a, bounds_a) = laid_out(CHAIN);
		let (b, bounds_b) = laid_out(CHAIN);
		assert_eq!(a, b);
		assert_eq!(bounds_a, bounds_b);
	}

	#[test]
	fn cyclic_input_terminates_with_finite_bounds() {
		let json = r#"{"nodes":[
			{"instruction":{"op":"a","dtype":"f32"}},
			{"instruction":{"op":"b","dtype":"f32"}}],
			"edges":[[0,1],[1,0]]}"#;
		let (_, bounds) = laid_out(json);
		assert!(bounds.width.is_finite() && bounds.width > 0.0);
		assert!(bounds.height.is_finite() && bounds.height > 0.0);
	}

	#[test]
	fn self_loop_gets_a_routed_path() {
		let json = r#"{"nodes":[{"instruction":{"op":"a","dtype":"f32"}}],
			"edges":[[0,0]]}"#;
		let (graph, _) = laid_out(json);
		assert_eq!(graph.edges.len(), 1);
		assert!(graph.edges[0].points.len() >= 2);
	}

	#[test]
	fn empty_graph_reports_margin_only_bounds() {
		let (graph, bounds) = laid_out(r#"{"nodes":[],"edges":[]}"#);
		assert!(graph.nodes.is_empty());
		assert_eq!(bounds, BoundingBox { width: 40.0, height: 40.0 });
	}
}
