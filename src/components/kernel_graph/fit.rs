//! Viewport fitting: the uniform scale and translation that centers the
//! laid-out graph inside the visible container.
//!
//! The transform is applied to the rendering surface's pan/zoom state as a
//! single affine layer on top of the static layout; node coordinates are
//! never touched. It is recomputed from scratch on every draw.

use super::error::DrawError;
use super::layout::BoundingBox;

/// Horizontal slack added to the graph bounds before fitting. Absorbs the
/// layout's own margins plus rendering overhang.
pub const FIT_MARGIN_X: f64 = 80.0;
/// Vertical slack added to the graph bounds before fitting.
pub const FIT_MARGIN_Y: f64 = 40.0;
/// Duration of the animated re-fit on redraw, in milliseconds.
pub const FIT_TRANSITION_MS: f64 = 500.0;

/// Visible container dimensions, measured fresh each draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	/// Parse container dimensions from CSS pixel strings (`"960px"` or bare
	/// `"960"`), as reported by the surface's computed style.
	///
	/// Unparseable input means the surrounding page has not sized the
	/// container yet, so this fails with [`DrawError::UnresolvableViewport`]
	/// and the caller retries on a later pass.
	pub fn from_css_px(width: &str, height: &str) -> Result<Self, DrawError> {
		let parse = |value: &str| -> Result<f64, DrawError> {
			let value = value.trim();
			value
				.strip_suffix("px")
				.unwrap_or(value)
				.parse::<f64>()
				.ok()
				.filter(|v| v.is_finite() && *v >= 0.0)
				.map(f64::trunc)
				.ok_or_else(|| {
					DrawError::UnresolvableViewport(format!("cannot parse dimension {value:?}"))
				})
		};
		Ok(Self {
			width: parse(width)?,
			height: parse(height)?,
		})
	}
}

/// Scale-then-translate transform applied to the rendering surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitTransform {
	/// Uniform zoom factor; aspect ratio is always preserved.
	pub scale: f64,
	pub translate_x: f64,
	pub translate_y: f64,
}

impl FitTransform {
	/// Identity transform: untranslated, unzoomed.
	pub const IDENTITY: Self = Self {
		scale: 1.0,
		translate_x: 0.0,
		translate_y: 0.0,
	};

	/// Linear interpolation towards `other`, used by the animated re-fit.
	pub fn lerp(self, other: Self, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			scale: self.scale + (other.scale - self.scale) * t,
			translate_x: self.translate_x + (other.translate_x - self.translate_x) * t,
			translate_y: self.translate_y + (other.translate_y - self.translate_y) * t,
		}
	}
}

/// Whether a draw is the first against this surface or a live update.
///
/// `Initial -> Update` after the first successful draw; every later draw is
/// re-entrant in `Update` mode and animates its re-fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
	/// No prior transform exists; apply the fit instantly.
	#[default]
	Initial,
	/// A prior transform is on screen; transition to the new fit.
	Update,
}

impl DrawMode {
	/// Whether the fit should be applied as a timed transition.
	pub fn animates(self) -> bool {
		matches!(self, DrawMode::Update)
	}
}

/// Compute the transform that fits `bounds` (plus fixed margins) inside
/// `viewport`, centered on both axes.
///
/// The scale is the tighter of the width and height fit ratios, so both
/// dimensions stay inside the viewport; it may exceed 1.0 when the graph is
/// smaller than the viewport. A zero or non-finite viewport dimension fails
/// with [`DrawError::UnresolvableViewport`] before any degenerate transform
/// can be produced.
pub fn fit(bounds: BoundingBox, viewport: Viewport) -> Result<FitTransform, DrawError> {
	if !(viewport.width.is_finite() && viewport.width > 0.0)
		|| !(viewport.height.is_finite() && viewport.height > 0.0)
	{
		return Err(DrawError::UnresolvableViewport(format!(
			"container reports {} x {}",
			viewport.width, viewport.height
		)));
	}

	let fitted_width = bounds.width + FIT_MARGIN_X;
	let fitted_height = bounds.height + FIT_MARGIN_Y;
	let scale = (viewport.width / fitted_width).min(viewport.height / fitted_height);

	Ok(FitTransform {
		scale,
		translate_x: viewport.width / 2.0 - scale * bounds.width / 2.0,
		translate_y: viewport.height / 2.0 - scale * bounds.height / 2.0,
	})
}

/// Cubic ease-in-out over `t` in `[0, 1]`, the pacing of the animated
/// re-fit transition.
pub fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		let u = 2.0 * t - 2.0;
		1.0 + u * u * u / 2.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPS: f64 = 1e-9;

	#[test]
	fn fit_matches_worked_example() {
		let transform = fit(
			BoundingBox { width: 400.0, height: 200.0 },
			Viewport { width: 960.0, height: 540.0 },
		)
		.unwrap();

		assert!((transform.scale - 2.0).abs() < EPS);
		assert!((transform.translate_x - 80.0).abs() < EPS);
		assert!((transform.translate_y - 70.0).abs() < EPS);
	}

	#[test]
	fn scale_is_the_tighter_ratio_and_keeps_both_axes_inside() {
		let cases = [
			(400.0, 200.0, 960.0, 540.0),
			(1200.0, 300.0, 640.0, 480.0),
			(50.0, 900.0, 1920.0, 1080.0),
			(10.0, 10.0, 300.0, 300.0),
		];
		for (gw, gh, vw, vh) in cases {
			let bounds = BoundingBox { width: gw, height: gh };
			let viewport = Viewport { width: vw, height: vh };
			let t = fit(bounds, viewport).unwrap();

			assert!(t.scale * (gw + 80.0) <= vw + EPS);
			assert!(t.scale * (gh + 40.0) <= vh + EPS);
			let expected = (vw / (gw + 80.0)).min(vh / (gh + 40.0));
			assert!((t.scale - expected).abs() < EPS);
		}
	}

	#[test]
	fn translation_centers_the_scaled_graph() {
		let bounds = BoundingBox { width: 333.0, height: 127.0 };
		let viewport = Viewport { width: 801.0, height: 445.0 };
		let t = fit(bounds, viewport).unwrap();

		let mid_x = t.translate_x + t.scale * bounds.width / 2.0;
		let mid_y = t.translate_y + t.scale * bounds.height / 2.0;
		assert!((mid_x - viewport.width / 2.0).abs() < EPS);
		assert!((mid_y - viewport.height / 2.0).abs() < EPS);
	}

	#[test]
	fn small_graphs_may_scale_beyond_one() {
		let t = fit(
			BoundingBox { width: 20.0, height: 10.0 },
			Viewport { width: 1000.0, height: 1000.0 },
		)
		.unwrap();
		assert!(t.scale > 1.0);
	}

	#[test]
	fn zero_viewport_is_unresolvable() {
		let bounds = BoundingBox { width: 400.0, height: 200.0 };
		let err = fit(bounds, Viewport { width: 0.0, height: 540.0 }).unwrap_err();
		assert!(matches!(err, DrawError::UnresolvableViewport(_)));

		let err = fit(bounds, Viewport { width: 960.0, height: 0.0 }).unwrap_err();
		assert!(matches!(err, DrawError::UnresolvableViewport(_)));
	}

	#[test]
	fn css_pixel_strings_parse_with_and_without_suffix() {
		let viewport = Viewport::from_css_px("960px", "540").unwrap();
		assert_eq!(viewport, Viewport { width: 960.0, height: 540.0 });

		// Fractional computed styles truncate, parseInt-style.
		let viewport = Viewport::from_css_px("960.25px", "540.7px").unwrap();
		assert_eq!(viewport, Viewport { width: 960.0, height: 540.0 });
	}

	#[test]
	fn unparseable_css_dimension_is_unresolvable() {
		for bad in ["", "auto", "calc(100%)", "100pxpx"] {
			let err = Viewport::from_css_px(bad, "540px").unwrap_err();
			assert!(matches!(err, DrawError::UnresolvableViewport(_)));
		}
	}

	#[test]
	fn draw_mode_gates_animation() {
		assert!(!DrawMode::Initial.animates());
		assert!(DrawMode::Update.animates());
	}

	#[test]
	fn easing_hits_its_endpoints_and_midpoint() {
		assert!((ease_cubic_in_out(0.0) - 0.0).abs() < EPS);
		assert!((ease_cubic_in_out(0.5) - 0.5).abs() < EPS);
		assert!((ease_cubic_in_out(1.0) - 1.0).abs() < EPS);
		// Monotone within the range.
		assert!(ease_cubic_in_out(0.25) < ease_cubic_in_out(0.75));
	}

	#[test]
	fn lerp_interpolates_between_transforms() {
		let a = FitTransform { scale: 1.0, translate_x: 0.0, translate_y: 0.0 };
		let b = FitTransform { scale: 3.0, translate_x: 100.0, translate_y: -40.0 };
		let mid = a.lerp(b, 0.5);
		assert!((mid.scale - 2.0).abs() < EPS);
		assert!((mid.translate_x - 50.0).abs() < EPS);
		assert!((mid.translate_y + 20.0).abs() < EPS);
		assert_eq!(a.lerp(b, 0.0), a);
		assert_eq!(a.lerp(b, 1.0), b);
	}
}
