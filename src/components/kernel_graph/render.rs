//! Canvas rendering for the laid-out graph.
//!
//! The fit/pan/zoom transform is applied once to the drawing context
//! (translate then scale, inside a save/restore pair); node and edge
//! coordinates stay in layout space. Edges are drawn first so nodes sit on
//! top of their endpoints.

use web_sys::CanvasRenderingContext2d;

use super::builder::{ArrowStyle, EdgeRecord, LayoutGraph, NodeRecord};
use super::fit::{FitTransform, Viewport};
use super::layout::LABEL_LINE_HEIGHT;
use super::theme::Theme;

/// Capability the draw cycle depends on for putting a laid-out graph on
/// screen under a given surface transform.
pub trait Renderer {
	/// Paint `graph` onto the surface with `transform` layered on top.
	fn render(&self, graph: &LayoutGraph, transform: FitTransform, viewport: Viewport);
}

/// Renders the graph to a 2D canvas context.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	theme: Theme,
}

impl CanvasRenderer {
	pub fn new(ctx: CanvasRenderingContext2d, theme: Theme) -> Self {
		Self { ctx, theme }
	}

	fn draw_edge(&self, edge: &EdgeRecord) {
		let points = &edge.points;
		if points.len() < 2 {
			return;
		}

		let ctx = &self.ctx;
		ctx.begin_path();
		ctx.move_to(points[0].x, points[0].y);
		match points.len() {
			// Rank-to-rank edge: cubic with controls at the horizontal
			// midpoint, reads as a smoothed basis curve.
			3 => {
				let (start, mid, end) = (points[0], points[1], points[2]);
				ctx.bezier_curve_to(mid.x, start.y, mid.x, end.y, end.x, end.y);
			}
			// Self-loop: one cubic through the loop's outer points.
			4 => {
				ctx.bezier_curve_to(
					points[1].x,
					points[1].y,
					points[2].x,
					points[2].y,
					points[3].x,
					points[3].y,
				);
			}
			_ => {
				for p in &points[1..] {
					ctx.line_to(p.x, p.y);
				}
			}
		}
		ctx.set_stroke_style_str(&self.theme.edge.stroke.to_css());
		ctx.set_line_width(self.theme.edge.line_width);
		ctx.stroke();

		// Undirected rendering: no arrowhead pass.
		match edge.arrowhead {
			ArrowStyle::None => {}
		}
	}

	fn draw_node(&self, node: &NodeRecord) {
		let ctx = &self.ctx;
		let (x, y) = (
			node.center.x - node.width / 2.0,
			node.center.y - node.height / 2.0,
		);
		let (w, h) = (node.width, node.height);
		let rx = node.rx.min(w / 2.0);
		let ry = node.ry.min(h / 2.0);

		ctx.begin_path();
		ctx.move_to(x + rx, y);
		ctx.line_to(x + w - rx, y);
		ctx.quadratic_curve_to(x + w, y, x + w, y + ry);
		ctx.line_to(x + w, y + h - ry);
		ctx.quadratic_curve_to(x + w, y + h, x + w - rx, y + h);
		ctx.line_to(x + rx, y + h);
		ctx.quadratic_curve_to(x, y + h, x, y + h - ry);
		ctx.line_to(x, y + ry);
		ctx.quadratic_curve_to(x, y, x + rx, y);
		ctx.close_path();

		ctx.set_fill_style_str(&self.theme.node.fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&self.theme.node.stroke.to_css());
		ctx.set_line_width(self.theme.node.stroke_width);
		ctx.stroke();

		// Stacked op / dtype label lines.
		ctx.set_font(&self.theme.node.label_font);
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		ctx.set_fill_style_str(&self.theme.node.label_color.to_css());
		let _ = ctx.fill_text(
			&node.op,
			node.center.x,
			node.center.y - LABEL_LINE_HEIGHT / 2.0,
		);
		let _ = ctx.fill_text(
			&node.dtype,
			node.center.x,
			node.center.y + LABEL_LINE_HEIGHT / 2.0,
		);
	}
}

impl Renderer for CanvasRenderer {
	fn render(&self, graph: &LayoutGraph, transform: FitTransform, viewport: Viewport) {
		let ctx = &self.ctx;

		ctx.set_fill_style_str(&self.theme.background.to_css());
		ctx.fill_rect(0.0, 0.0, viewport.width, viewport.height);

		ctx.save();
		let _ = ctx.translate(transform.translate_x, transform.translate_y);
		let _ = ctx.scale(transform.scale, transform.scale);

		for edge in &graph.edges {
			self.draw_edge(edge);
		}
		for node in &graph.nodes {
			self.draw_node(node);
		}

		ctx.restore();
	}
}
