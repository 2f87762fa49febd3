//! Visual styling for the kernel graph canvas.

/// RGBA color representation.
#[derive(Clone, Copy, Debug)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// CSS `rgba(...)` string for canvas style properties.
	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Node box and label styling.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	pub stroke: Color,
	pub stroke_width: f64,
	pub label_color: Color,
	/// Canvas font shorthand for label text.
	pub label_font: String,
}

/// Edge path styling.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub stroke: Color,
	pub line_width: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(0x12, 0x14, 0x1a),
			node: NodeStyle {
				fill: Color::rgb(0x26, 0x2b, 0x38),
				stroke: Color::rgb(0x56, 0x60, 0x78),
				stroke_width: 1.5,
				label_color: Color::rgb(0xdd, 0xe2, 0xec),
				label_font: "12px sans-serif".to_string(),
			},
			edge: EdgeStyle {
				stroke: Color::rgba(0x8a, 0x93, 0xa6, 0.8),
				line_width: 1.5,
			},
		}
	}
}
