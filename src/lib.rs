//! kernel-graph: interactive visualization of a kernel's instruction-level
//! dataflow graph.
//!
//! This crate provides a WASM-based viewer that fetches the graph description
//! from a backend endpoint, lays it out left-to-right, renders it to a
//! canvas, and fits the viewport to the rendered extent, with pan/zoom and
//! animated re-fit on live updates.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

pub mod components;

pub use components::kernel_graph::{
	DrawError, EdgeSpec, GraphSource, Instruction, KernelGraphCanvas, NodeSpec,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("kernel-graph: logging initialized");
}

/// Main application component: a fullscreen kernel graph view.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Kernel Instruction Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph" style="position: fixed; inset: 0;">
			<KernelGraphCanvas />
			<div class="graph-overlay">
				<h1>"Kernel Instruction Graph"</h1>
				<p class="subtitle">"Drag background to pan. Scroll to zoom."</p>
			</div>
		</div>
	}
}
