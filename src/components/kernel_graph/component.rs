//! Leptos component wrapping the kernel graph canvas.
//!
//! The component owns one rendering surface and its current transform. On
//! mount it runs the first draw cycle (fetch, decode, build, layout, render,
//! fit) instantly; a `kernel-updated` event on `window` re-runs the whole
//! cycle with the re-fit animated. An animation loop runs via
//! `requestAnimationFrame`, advancing the fit transition and repainting each
//! frame. Mouse handlers add pan (drag background) and cursor-anchored zoom
//! on top of the fitted transform.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::builder::{LayoutGraph, build, decode_source};
use super::error::DrawError;
use super::fetch::{KERNEL_ENDPOINT, fetch_kernel_payload};
use super::fit::{
	DrawMode, FIT_TRANSITION_MS, FitTransform, Viewport, ease_cubic_in_out, fit,
};
use super::layout::{BoundingBox, LayoutEngine, RankedLayout};
use super::render::{CanvasRenderer, Renderer};
use super::theme::Theme;

/// Fixed per-frame timestep, matching the animation loop cadence.
const FRAME_MS: f64 = 16.0;

/// One draw cycle's laid-out graph and its measured extent.
struct Scene {
	graph: LayoutGraph,
	bounds: BoundingBox,
}

/// In-flight animated re-fit from one transform to another.
struct FitTransition {
	from: FitTransform,
	to: FitTransform,
	elapsed_ms: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
struct PanState {
	active: bool,
	start_x: f64,
	start_y: f64,
	transform_start_x: f64,
	transform_start_y: f64,
}

/// Surface state owned by the component: the current scene, the transform
/// layered on it, and interaction bookkeeping. Rebuilt content arrives only
/// through [`GraphContext::install`], so a failed cycle never disturbs what
/// is already on screen.
struct GraphContext {
	scene: Option<Scene>,
	/// A built scene whose fit was deferred because the container had no
	/// usable dimensions yet; retried every frame.
	pending: Option<Scene>,
	transform: FitTransform,
	transition: Option<FitTransition>,
	pan: PanState,
	mode: DrawMode,
	viewport: Viewport,
}

impl GraphContext {
	fn new() -> Self {
		Self {
			scene: None,
			pending: None,
			transform: FitTransform::IDENTITY,
			transition: None,
			pan: PanState::default(),
			mode: DrawMode::Initial,
			viewport: Viewport {
				width: 0.0,
				height: 0.0,
			},
		}
	}

	/// Put a fully fitted scene on the surface. Instant on the first draw,
	/// a timed transition on every later one.
	fn install(&mut self, scene: Scene, viewport: Viewport, target: FitTransform) {
		self.scene = Some(scene);
		self.pending = None;
		self.viewport = viewport;
		if self.mode.animates() {
			self.transition = Some(FitTransition {
				from: self.transform,
				to: target,
				elapsed_ms: 0.0,
			});
		} else {
			self.transform = target;
			self.transition = None;
		}
		self.mode = DrawMode::Update;
	}

	/// Advance the fit transition by one frame.
	fn tick(&mut self) {
		if let Some(ref mut transition) = self.transition {
			transition.elapsed_ms += FRAME_MS;
			let t = transition.elapsed_ms / FIT_TRANSITION_MS;
			if t >= 1.0 {
				self.transform = transition.to;
				self.transition = None;
			} else {
				self.transform = transition.from.lerp(transition.to, ease_cubic_in_out(t));
			}
		}
	}
}

/// Read the container's CSS pixel dimensions, fresh for this draw.
fn measure_viewport(canvas: &HtmlCanvasElement) -> Result<Viewport, DrawError> {
	let window = web_sys::window()
		.ok_or_else(|| DrawError::UnresolvableViewport("no window".to_string()))?;
	let style = window
		.get_computed_style(canvas)
		.ok()
		.flatten()
		.ok_or_else(|| DrawError::UnresolvableViewport("computed style unavailable".to_string()))?;
	let width = style
		.get_property_value("width")
		.map_err(|_| DrawError::UnresolvableViewport("no width property".to_string()))?;
	let height = style
		.get_property_value("height")
		.map_err(|_| DrawError::UnresolvableViewport("no height property".to_string()))?;
	Viewport::from_css_px(&width, &height)
}

/// Match the canvas backing store to the measured CSS size.
fn sync_backing_store(canvas: &HtmlCanvasElement, viewport: Viewport) {
	canvas.set_width(viewport.width as u32);
	canvas.set_height(viewport.height as u32);
}

/// Fetch and build one scene. Pure pipeline up to the fit: the surface is
/// untouched until the result is committed.
async fn build_scene(endpoint: &str) -> Result<Scene, DrawError> {
	let payload = fetch_kernel_payload(endpoint).await?;
	let source = decode_source(&payload)?;
	let mut graph = build(&source);
	let bounds = RankedLayout::default().layout(&mut graph);
	info!(
		"kernel-graph: laid out {} nodes, {} edges ({} x {})",
		graph.nodes.len(),
		graph.edges.len(),
		bounds.width,
		bounds.height
	);
	Ok(Scene { graph, bounds })
}

/// Commit a built scene: measure, fit, install. An unresolvable viewport
/// parks the scene for retry on later frames instead of failing the draw.
fn commit_scene(canvas: &HtmlCanvasElement, context: &Rc<RefCell<GraphContext>>, scene: Scene) {
	let mut c = context.borrow_mut();
	let fitted = measure_viewport(canvas).and_then(|viewport| {
		fit(scene.bounds, viewport).map(|target| (viewport, target))
	});
	match fitted {
		Ok((viewport, target)) => {
			sync_backing_store(canvas, viewport);
			c.install(scene, viewport, target);
		}
		Err(e @ DrawError::UnresolvableViewport(_)) => {
			warn!("kernel-graph: deferring fit: {e}");
			c.pending = Some(scene);
		}
		Err(e) => warn!("kernel-graph: fit failed: {e}"),
	}
}

/// One full draw cycle against the shared surface. On failure the previous
/// diagram stays visible; nothing is cleared.
async fn draw(endpoint: String, canvas: HtmlCanvasElement, context: Rc<RefCell<GraphContext>>) {
	match build_scene(&endpoint).await {
		Ok(scene) => commit_scene(&canvas, &context, scene),
		Err(e) => warn!("kernel-graph: draw aborted: {e}"),
	}
}

/// Renders the kernel's instruction dataflow graph on a canvas element.
///
/// Fetches the graph from `endpoint` when mounted, lays it out left-to-right
/// and fits it to the container. Dispatch a `kernel-updated` event on
/// `window` to refetch and redraw with an animated re-fit. Drag the
/// background to pan, scroll to zoom.
#[component]
pub fn KernelGraphCanvas(
	/// Backend endpoint serving the graph JSON.
	#[prop(into, default = KERNEL_ENDPOINT.to_string())]
	endpoint: String,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<GraphContext>> = Rc::new(RefCell::new(GraphContext::new()));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let update_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, update_cb_init, resize_cb_init) = (
		context.clone(),
		animate.clone(),
		update_cb.clone(),
		resize_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();
		let renderer = CanvasRenderer::new(ctx, Theme::default());

		// Initial draw, applied without animation.
		wasm_bindgen_futures::spawn_local(draw(
			endpoint.clone(),
			canvas.clone(),
			context_init.clone(),
		));

		// Live updates re-run the whole cycle with an animated re-fit.
		let (endpoint_update, canvas_update, context_update) =
			(endpoint.clone(), canvas.clone(), context_init.clone());
		*update_cb_init.borrow_mut() = Some(Closure::new(move || {
			wasm_bindgen_futures::spawn_local(draw(
				endpoint_update.clone(),
				canvas_update.clone(),
				context_update.clone(),
			));
		}));
		if let Some(ref cb) = *update_cb_init.borrow() {
			let _ = window
				.add_event_listener_with_callback("kernel-updated", cb.as_ref().unchecked_ref());
		}

		// Container resizes re-measure and re-fit the current scene in place.
		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Ok(viewport) = measure_viewport(&canvas_resize) else {
				return;
			};
			sync_backing_store(&canvas_resize, viewport);
			let mut c = context_resize.borrow_mut();
			c.viewport = viewport;
			if let Some(ref scene) = c.scene {
				if let Ok(target) = fit(scene.bounds, viewport) {
					c.transform = target;
					c.transition = None;
				}
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, canvas_anim, animate_inner) = (
			context_init.clone(),
			canvas.clone(),
			animate_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			{
				let mut c = context_anim.borrow_mut();

				// A deferred fit keeps retrying until the container is sized.
				if c.pending.is_some() {
					if let Ok(viewport) = measure_viewport(&canvas_anim) {
						if let Some(scene) = c.pending.take() {
							match fit(scene.bounds, viewport) {
								Ok(target) => {
									sync_backing_store(&canvas_anim, viewport);
									c.install(scene, viewport, target);
								}
								Err(_) => c.pending = Some(scene),
							}
						}
					}
				}

				c.tick();
				if let Some(ref scene) = c.scene {
					renderer.render(&scene.graph, c.transform, c.viewport);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		let mut c = context_md.borrow_mut();
		c.transition = None;
		c.pan.active = true;
		c.pan.start_x = x;
		c.pan.start_y = y;
		c.pan.transform_start_x = c.transform.translate_x;
		c.pan.transform_start_y = c.transform.translate_y;
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		let mut c = context_mm.borrow_mut();
		if c.pan.active {
			c.transform.translate_x = c.pan.transform_start_x + (x - c.pan.start_x);
			c.transform.translate_y = c.pan.transform_start_y + (y - c.pan.start_y);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		context_mu.borrow_mut().pan.active = false;
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		context_ml.borrow_mut().pan.active = false;
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		let mut c = context_wh.borrow_mut();
		c.transition = None;
		let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
		let new_scale = (c.transform.scale * factor).clamp(0.1, 10.0);
		let ratio = new_scale / c.transform.scale;
		c.transform.translate_x = x - (x - c.transform.translate_x) * ratio;
		c.transform.translate_y = y - (y - c.transform.translate_y) * ratio;
		c.transform.scale = new_scale;
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="kernel-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; width: 100%; height: 100%; cursor: grab;"
		/>
	}
}
