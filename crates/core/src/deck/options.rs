//! reveal.js initializer options.

use serde::{Deserialize, Serialize};

use super::Diagnostics;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
	None,
	Fade,
	#[default]
	Slide,
	Convex,
	Concave,
	Zoom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionSpeed {
	#[default]
	Default,
	Fast,
	Slow,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlsLayout {
	#[default]
	BottomRight,
	Edges,
}

/// `slideNumber`: either on/off or a format such as `"c/t"` or `"h.v"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlideNumber {
	Enabled(bool),
	Format(String),
}

impl SlideNumber {
	pub const FORMATS: [&'static str; 4] = ["h.v", "h/v", "c", "c/t"];
}

impl Default for SlideNumber {
	fn default() -> Self {
		Self::Format("c/t".to_string())
	}
}

/// The option record passed to `Reveal.initialize`.
///
/// Defaults are tuned for fixed 1920x1080 slides. Unknown keys are rejected
/// when deserializing, so a typo never silently falls back to a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct DeckOptions {
	// navigation
	pub hash: bool,
	pub history: bool,
	pub controls: bool,
	pub controls_layout: ControlsLayout,
	pub progress: bool,
	pub slide_number: SlideNumber,
	pub keyboard: bool,
	pub overview: bool,
	pub touch: bool,
	#[serde(rename = "loop")]
	pub loop_slides: bool,
	pub fragments: bool,
	#[serde(rename = "fragmentInURL")]
	pub fragment_in_url: bool,
	pub embedded: bool,
	pub help: bool,

	// layout
	pub center: bool,
	pub width: u32,
	pub height: u32,
	pub margin: f64,
	pub min_scale: f64,
	pub max_scale: f64,

	// transitions
	pub transition: Transition,
	pub transition_speed: TransitionSpeed,
	pub background_transition: Transition,

	// media and timing
	pub auto_play_media: Option<bool>,
	pub preload_iframes: Option<bool>,
	/// Milliseconds between automatic slide advances; `0` disables.
	pub auto_slide: u64,
	pub auto_slide_stoppable: bool,
	/// Seconds per slide assumed by the speaker view.
	pub default_timing: u32,

	// display
	pub display: String,
	pub hide_inactive_cursor: bool,
	pub hide_cursor_time: u64,
	pub view_distance: u32,
}

impl Default for DeckOptions {
	fn default() -> Self {
		Self {
			hash: true,
			history: true,
			controls: true,
			controls_layout: ControlsLayout::BottomRight,
			progress: true,
			slide_number: SlideNumber::default(),
			keyboard: true,
			overview: true,
			touch: true,
			loop_slides: false,
			fragments: true,
			fragment_in_url: true,
			embedded: false,
			help: true,

			center: false,
			width: 1920,
			height: 1080,
			margin: 0.04,
			min_scale: 0.2,
			max_scale: 1.0,

			transition: Transition::Slide,
			transition_speed: TransitionSpeed::Default,
			background_transition: Transition::Fade,

			auto_play_media: None,
			preload_iframes: None,
			auto_slide: 0,
			auto_slide_stoppable: true,
			default_timing: 120,

			display: "block".to_string(),
			hide_inactive_cursor: true,
			hide_cursor_time: 3000,
			view_distance: 3,
		}
	}
}

impl DeckOptions {
	pub(super) fn check(&self, diag: &mut Diagnostics) {
		if self.width == 0 {
			diag.error("width", "must be greater than 0");
		}
		if self.height == 0 {
			diag.error("height", "must be greater than 0");
		}
		if !(0.0..1.0).contains(&self.margin) {
			diag.error("margin", format!("must be in [0, 1), got {}", self.margin));
		}
		if self.min_scale.is_nan() || self.min_scale <= 0.0 {
			diag.error("minScale", format!("must be greater than 0, got {}", self.min_scale));
		}
		if self.max_scale.is_nan() || self.max_scale < self.min_scale {
			diag.error(
				"maxScale",
				format!("must not be below minScale ({} < {})", self.max_scale, self.min_scale),
			);
		}
		if self.view_distance < 1 {
			diag.error("viewDistance", "must be at least 1");
		}
		if let SlideNumber::Format(format) = &self.slide_number {
			if !SlideNumber::FORMATS.contains(&format.as_str()) {
				diag.error(
					"slideNumber",
					format!("unknown format {format:?}, expected one of {}", SlideNumber::FORMATS.join(", ")),
				);
			}
		}
		if self.display.trim().is_empty() {
			diag.error("display", "must be a CSS display value");
		}
	}
}
