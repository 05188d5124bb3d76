//! The in-page scripting surface of a Structurizr diagram view.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Page, Result};

/// Predicate that holds once the diagram engine is up and the current view is drawn.
pub const RENDERED_PREDICATE: &str = "structurizr.scripting && structurizr.scripting.isDiagramRendered() === true";

/// One diagram view as reported by `structurizr.scripting.getViews()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
	pub key: String,
	/// View type (`SystemContext`, `Container`, `Image`, ...), when reported.
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
}

impl View {
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			kind: None,
		}
	}
}

/// Operations the export driver needs from the diagram page.
///
/// [`PageScripting`] implements this over a live browser page; tests supply
/// a scripted fake.
#[async_trait(?Send)]
pub trait Scripting {
	/// Evaluates the rendering-readiness predicate once.
	async fn is_rendered(&self) -> Result<bool>;

	/// Ordered snapshot of the workspace's views.
	async fn views(&self) -> Result<Vec<View>>;

	/// Makes `key` the active view.
	async fn change_view(&self, key: &str) -> Result<()>;

	/// Exports the active view as SVG markup.
	async fn export_svg(&self, include_metadata: bool) -> Result<String>;
}

/// [`Scripting`] over a browser page showing a Structurizr diagram viewer.
pub struct PageScripting<'p> {
	page: &'p Page,
}

impl<'p> PageScripting<'p> {
	pub fn new(page: &'p Page) -> Self {
		Self { page }
	}
}

#[async_trait(?Send)]
impl Scripting for PageScripting<'_> {
	async fn is_rendered(&self) -> Result<bool> {
		self.page
			.evaluate_typed(&crate::page::guarded_predicate(RENDERED_PREDICATE))
			.await
	}

	async fn views(&self) -> Result<Vec<View>> {
		self.page.evaluate_typed("structurizr.scripting.getViews()").await
	}

	async fn change_view(&self, key: &str) -> Result<()> {
		let key = serde_json::to_string(key)?;
		self.page
			.evaluate(&format!("structurizr.scripting.changeView({key})"))
			.await
	}

	async fn export_svg(&self, include_metadata: bool) -> Result<String> {
		self.page
			.evaluate_string(&format!(
				"structurizr.scripting.exportCurrentDiagramToSVG({{ includeMetadata: {include_metadata} }})"
			))
			.await
	}
}
