//! Payload types for the commands the driver issues.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page load state for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitUntil {
	/// Consider navigation finished after the `load` event fires
	#[default]
	Load,
	/// Consider navigation finished when the DOMContentLoaded event fires
	#[serde(rename = "domcontentloaded")]
	DomContentLoaded,
	/// Consider navigation finished as soon as the browser accepts it
	Commit,
}

impl WaitUntil {
	/// Page domain event that marks this load state, if any.
	pub fn event_name(self) -> Option<&'static str> {
		match self {
			WaitUntil::Load => Some("Page.loadEventFired"),
			WaitUntil::DomContentLoaded => Some("Page.domContentEventFired"),
			WaitUntil::Commit => None,
		}
	}
}

/// Rendering surface emulated through `Emulation.setDeviceMetricsOverride`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
	pub width: u32,
	pub height: u32,
	pub device_scale_factor: f64,
	pub mobile: bool,
}

impl Viewport {
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			device_scale_factor: 1.0,
			mobile: false,
		}
	}
}

impl Default for Viewport {
	fn default() -> Self {
		Self::new(1920, 1080)
	}
}

/// Result of `Target.createTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetResult {
	pub target_id: String,
}

/// Result of `Target.attachToTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetResult {
	pub session_id: String,
}

/// Result of `Page.navigate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
	pub frame_id: String,
	#[serde(default)]
	pub loader_id: Option<String>,
	/// Set when the browser could not start the navigation (DNS failure, refused connection, ...)
	#[serde(default)]
	pub error_text: Option<String>,
}

/// Mirror object for a JavaScript value returned by `Runtime.evaluate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
	#[serde(rename = "type")]
	pub kind: String,
	#[serde(default)]
	pub subtype: Option<String>,
	/// Present when the evaluation asked for `returnByValue`
	#[serde(default)]
	pub value: Option<Value>,
	#[serde(default)]
	pub description: Option<String>,
}

impl RemoteObject {
	/// Returns the by-value payload, mapping `undefined` to `null`.
	pub fn into_value(self) -> Value {
		self.value.unwrap_or(Value::Null)
	}
}

/// Details of an exception thrown during evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
	pub text: String,
	#[serde(default)]
	pub line_number: Option<i64>,
	#[serde(default)]
	pub column_number: Option<i64>,
	#[serde(default)]
	pub exception: Option<RemoteObject>,
}

impl ExceptionDetails {
	/// Best human-readable message: the thrown value's description, else the summary text.
	pub fn message(&self) -> String {
		self.exception
			.as_ref()
			.and_then(|e| e.description.clone())
			.unwrap_or_else(|| self.text.clone())
	}
}

/// Result of `Runtime.evaluate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
	pub result: RemoteObject,
	#[serde(default)]
	pub exception_details: Option<ExceptionDetails>,
}
