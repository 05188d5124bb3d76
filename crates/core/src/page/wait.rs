//! Predicate waits for [`Page`].

use std::time::Duration;

use super::Page;
use crate::Result;
use crate::wait::{WaitOptions, poll_until};

impl Page {
	/// Polls a JavaScript predicate until it is truthy.
	///
	/// A predicate that throws (for example because the application's globals
	/// are not defined yet) counts as "not yet" rather than as a failure.
	pub async fn wait_for_function(&self, expression: &str, options: &WaitOptions) -> Result<Duration> {
		let guarded = guarded_predicate(expression);
		poll_until(|| self.evaluate_typed::<bool>(&guarded), options, expression).await
	}
}

/// Wraps `expression` so that it always evaluates to a boolean.
pub(crate) fn guarded_predicate(expression: &str) -> String {
	format!("(() => {{ try {{ return !!({expression}); }} catch (_) {{ return false; }} }})()")
}
