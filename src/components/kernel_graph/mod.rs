//! Kernel instruction graph visualization component.
//!
//! Renders a kernel's instruction-level dataflow graph on an HTML canvas:
//! - Fetches the node/edge description from the backend (`GET /kernel`)
//! - Builds render-ready node and edge records (Graph Builder)
//! - Positions them left-to-right with a ranked layered layout
//! - Fits the viewport to the rendered extent, animating on live updates
//! - Pan and zoom interactions layered on the fitted transform
//!
//! The draw cycle constructs all of its state locally and passes it
//! explicitly from builder to layout to fitter; nothing survives across
//! draws except the surface's current transform.

mod builder;
mod component;
mod error;
mod fetch;
pub mod fit;
pub mod layout;
mod render;
pub mod theme;
mod types;

pub use builder::{
	ArrowStyle, CurveStyle, EdgeRecord, LayoutGraph, NodeRecord, Point, build, decode_source,
};
pub use component::KernelGraphCanvas;
pub use error::DrawError;
pub use fetch::{KERNEL_ENDPOINT, fetch_kernel_payload};
pub use fit::{DrawMode, FitTransform, Viewport, fit};
pub use layout::{BoundingBox, LayoutEngine, RankedLayout};
pub use render::{CanvasRenderer, Renderer};
pub use theme::Theme;
pub use types::{EdgeSpec, GraphSource, Instruction, NodeSpec};
