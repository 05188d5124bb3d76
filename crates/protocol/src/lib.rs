//! Chrome DevTools Protocol wire types.
//!
//! Only the slice of the protocol needed to drive a single page is modelled:
//! message framing, target attachment, navigation, script evaluation and
//! viewport emulation. Everything is plain `serde` data with no I/O.

pub mod message;
pub mod options;
pub mod types;

pub use message::{Event, Message, ProtocolError, Request, Response};
pub use options::{DEFAULT_TIMEOUT_MS, GotoOptions};
pub use types::{
	AttachToTargetResult, CreateTargetResult, EvaluateResult, ExceptionDetails, NavigateResult,
	RemoteObject, Viewport, WaitUntil,
};
