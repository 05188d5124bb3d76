//! JavaScript evaluation methods for [`Page`].

use dx_protocol::EvaluateResult;
use serde_json::{Value, json};

use super::Page;
use crate::{Error, Result};

impl Page {
	/// Evaluates JavaScript in the page context, discarding the result.
	pub async fn evaluate(&self, expression: &str) -> Result<()> {
		self.evaluate_json(expression).await.map(drop)
	}

	/// Evaluates JavaScript and returns [`serde_json::Value`].
	///
	/// Promises are awaited; `undefined` comes back as `null`.
	///
	/// # Errors
	///
	/// Returns [`Error::JsEval`] if the expression throws or the returned
	/// promise rejects.
	pub async fn evaluate_json(&self, expression: &str) -> Result<Value> {
		let raw = self
			.send(
				"Runtime.evaluate",
				json!({
					"expression": expression,
					"returnByValue": true,
					"awaitPromise": true,
				}),
			)
			.await?;

		let evaluated: EvaluateResult = serde_json::from_value(raw)?;
		if let Some(details) = evaluated.exception_details {
			return Err(Error::JsEval(details.message()));
		}

		Ok(evaluated.result.into_value())
	}

	/// Evaluates JavaScript and deserializes the result to type `T`.
	///
	/// # Errors
	///
	/// Returns error if the expression throws or the result cannot be
	/// deserialized to `T`.
	pub async fn evaluate_typed<T: serde::de::DeserializeOwned>(&self, expression: &str) -> Result<T> {
		let value = self.evaluate_json(expression).await?;
		Ok(serde_json::from_value(value)?)
	}

	/// Evaluates JavaScript that must produce a string.
	pub async fn evaluate_string(&self, expression: &str) -> Result<String> {
		match self.evaluate_json(expression).await? {
			Value::String(text) => Ok(text),
			Value::Null => Err(Error::JsEval(format!("`{expression}` returned nothing"))),
			other => Err(Error::JsEval(format!(
				"`{expression}` returned {} instead of a string",
				kind_of(&other)
			))),
		}
	}
}

fn kind_of(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
