//! Runtime for talking to a headless browser over the DevTools protocol.
//!
//! - **Driver discovery**: locating a Chromium-family executable
//! - **Process management**: launching it with remote debugging and a throwaway profile
//! - **Transport**: JSON frames over a WebSocket
//! - **Connection**: request/response correlation and event fan-out
//!
//! ```text
//! ┌─────────────┐
//! │    dx-rs    │  Browser / Page API, export driver
//! └──────┬──────┘
//! ┌──────▼──────┐
//! │ dx-runtime  │  This crate
//! │  ┌────────┐ │
//! │  │ Conn   │ │  id correlation, events
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │ Trans  │ │  WebSocket transport
//! │  └────────┘ │
//! │  ┌────────┐ │
//! │  │Process │ │  Browser launch / shutdown
//! │  └────────┘ │
//! └─────────────┘
//! ```

pub mod browser_process;
pub mod connection;
pub mod driver;
pub mod error;
pub mod transport;

pub use browser_process::{BrowserProcess, LaunchOptions};
pub use connection::Connection;
pub use driver::find_browser_executable;
pub use error::{Error, Result};
pub use transport::{
	TransportFuture, TransportParts, TransportReceiver, TransportSender, WebSocketTransportReceiver,
	WebSocketTransportSender, connect_websocket, split_websocket,
};
