//! Cosmetic deck observers.
//!
//! Each observer is plain data that renders to one self-contained block of
//! JavaScript. Observers know nothing about each other or about the option
//! record, so any subset can be enabled.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::Diagnostics;

/// A deck hook that renders to one registration block.
pub trait Observer {
	/// Config key used in diagnostics.
	const NAME: &'static str;

	fn render(&self) -> String;

	fn check(&self, _diag: &mut Diagnostics) {}
}

/// Marks the document once reveal.js is ready and logs a line to the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ReadyObserver {
	/// Class added to `<body>`; none when `None`.
	pub body_class: Option<String>,
	/// Console message; none when `None`.
	pub message: Option<String>,
}

impl Default for ReadyObserver {
	fn default() -> Self {
		Self {
			body_class: Some("deck-ready".to_string()),
			message: Some("Presentation ready".to_string()),
		}
	}
}

impl Observer for ReadyObserver {
	const NAME: &'static str = "ready";

	fn render(&self) -> String {
		let mut js = String::from("Reveal.on('ready', () => {\n");
		if let Some(class) = &self.body_class {
			let _ = writeln!(js, "\tdocument.body.classList.add({});", js_string(class));
		}
		if let Some(message) = &self.message {
			let _ = writeln!(js, "\tconsole.log({});", js_string(message));
		}
		js.push_str("});\n");
		js
	}

	fn check(&self, diag: &mut Diagnostics) {
		if let Some(class) = &self.body_class {
			check_class_name(diag, "ready.bodyClass", class);
		}
	}
}

/// Restarts CSS animations inside the item groups of the slide being entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SlideChangeObserver {
	pub group_selector: String,
	pub animated_selector: String,
}

impl Default for SlideChangeObserver {
	fn default() -> Self {
		Self {
			group_selector: ".item-group".to_string(),
			animated_selector: ".animate".to_string(),
		}
	}
}

impl Observer for SlideChangeObserver {
	const NAME: &'static str = "slideChange";

	fn render(&self) -> String {
		format!(
			"Reveal.on('slidechanged', (event) => {{\n\
			 \tevent.currentSlide.querySelectorAll({group}).forEach((group) => {{\n\
			 \t\tgroup.querySelectorAll({animated}).forEach((el) => {{\n\
			 \t\t\tel.style.animation = 'none';\n\
			 \t\t\tvoid el.offsetHeight;\n\
			 \t\t\tel.style.animation = '';\n\
			 \t\t}});\n\
			 \t}});\n\
			 }});\n",
			group = js_string(&self.group_selector),
			animated = js_string(&self.animated_selector),
		)
	}

	fn check(&self, diag: &mut Diagnostics) {
		if self.group_selector.trim().is_empty() {
			diag.error("slideChange.groupSelector", "must not be empty");
		}
		if self.animated_selector.trim().is_empty() {
			diag.error("slideChange.animatedSelector", "must not be empty");
		}
	}
}

/// Global key binding that toggles a theme class on `<body>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ThemeToggle {
	/// Single ASCII letter or digit.
	pub key: String,
	pub theme_class: String,
	pub description: String,
}

impl Default for ThemeToggle {
	fn default() -> Self {
		Self {
			key: "T".to_string(),
			theme_class: "theme-dark".to_string(),
			description: "Toggle theme".to_string(),
		}
	}
}

impl ThemeToggle {
	/// DOM `keyCode` for the bound key (`None` if the key is not a single letter or digit).
	pub fn key_code(&self) -> Option<u32> {
		let mut chars = self.key.chars();
		match (chars.next(), chars.next()) {
			(Some(c), None) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase() as u32),
			_ => None,
		}
	}
}

impl Observer for ThemeToggle {
	const NAME: &'static str = "themeToggle";

	fn render(&self) -> String {
		let key_code = self.key_code().unwrap_or_default();
		format!(
			"Reveal.addKeyBinding({{ keyCode: {key_code}, key: {key}, description: {description} }}, () => {{\n\
			 \tdocument.body.classList.toggle({class});\n\
			 }});\n",
			key = js_string(&self.key.to_ascii_uppercase()),
			description = js_string(&self.description),
			class = js_string(&self.theme_class),
		)
	}

	fn check(&self, diag: &mut Diagnostics) {
		if self.key_code().is_none() {
			diag.error("themeToggle.key", format!("must be a single letter or digit, got {:?}", self.key));
		}
		check_class_name(diag, "themeToggle.themeClass", &self.theme_class);
	}
}

/// The observers to register; a `None` entry is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Hooks {
	pub ready: Option<ReadyObserver>,
	pub slide_change: Option<SlideChangeObserver>,
	pub theme_toggle: Option<ThemeToggle>,
}

impl Default for Hooks {
	fn default() -> Self {
		Self {
			ready: Some(ReadyObserver::default()),
			slide_change: Some(SlideChangeObserver::default()),
			theme_toggle: Some(ThemeToggle::default()),
		}
	}
}

impl Hooks {
	pub fn none() -> Self {
		Self {
			ready: None,
			slide_change: None,
			theme_toggle: None,
		}
	}

	pub(super) fn check(&self, diag: &mut Diagnostics) {
		if let Some(ready) = &self.ready {
			ready.check(diag);
		}
		if let Some(slide_change) = &self.slide_change {
			slide_change.check(diag);
		}
		if let Some(toggle) = &self.theme_toggle {
			toggle.check(diag);
		}
	}

	/// Registration blocks in a fixed order: ready, slide change, key binding.
	pub(super) fn render_into(&self, out: &mut String) {
		let blocks = [
			self.ready.as_ref().map(|o| (ReadyObserver::NAME, o.render())),
			self.slide_change.as_ref().map(|o| (SlideChangeObserver::NAME, o.render())),
			self.theme_toggle.as_ref().map(|o| (ThemeToggle::NAME, o.render())),
		];
		for (name, block) in blocks.into_iter().flatten() {
			let _ = write!(out, "\n// {name}\n{block}");
		}
	}
}

fn check_class_name(diag: &mut Diagnostics, field: &'static str, class: &str) {
	let valid = !class.is_empty()
		&& !class.starts_with(|c: char| c.is_ascii_digit())
		&& class.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
	if !valid {
		diag.error(field, format!("{class:?} is not a valid CSS class name"));
	}
}

/// JSON string literal, which is also a valid JavaScript string literal.
fn js_string(value: &str) -> String {
	serde_json::Value::String(value.to_string()).to_string()
}
