//! dx: export Structurizr diagrams through a headless browser, and render
//! reveal.js deck configuration.
//!
//! The browser side is a thin Chrome DevTools Protocol client: [`Browser`]
//! launches a Chromium-family executable, [`Page`] navigates and evaluates
//! scripts, and [`wait`] polls in-page predicates. [`export`] builds the
//! diagram export run on top of these; [`deck`] is independent of the browser.
//!
//! ```ignore
//! use dx::export::{ExportConfig, export_diagrams};
//! use dx::SessionConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = export_diagrams(
//!         &SessionConfig::default(),
//!         "http://localhost:8080/workspace/diagrams",
//!         ExportConfig::new("docs/diagrams"),
//!         |event| println!("{event}"),
//!     )
//!     .await?;
//!     println!("{} files", summary.exported);
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod deck;
pub mod export;
pub mod page;
pub mod session;
pub mod wait;

#[cfg(test)]
mod testing;

pub use browser::Browser;
pub use dx_protocol::{GotoOptions, Viewport, WaitUntil};
pub use dx_runtime::{Error, LaunchOptions, Result, find_browser_executable};
pub use page::Page;
pub use session::{Session, SessionConfig, with_session};
pub use wait::WaitOptions;
