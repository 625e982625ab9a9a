//! Connection-limited reverse proxy passthrough.
//!
//! # Data Flow
//! ```text
//! * /api/bad-apple[/...]
//!     → passthrough.rs (handler)
//!     → gate.rs (admission control)
//!     → rewrite.rs (path rewrite)
//!     → headers.rs (request/response header handling)
//!     → upstream SSE endpoint
//! ```
//!
//! # Connection States
//! ```text
//! Admitted → Forwarding → Closed (permit dropped, slot released)
//! ```

pub mod gate;
pub mod headers;
pub mod passthrough;
pub mod rewrite;

pub use gate::{AdmissionPermit, ConnectionGate, ConnectionId};
pub use passthrough::{passthrough_handler, Passthrough, PassthroughError, TOO_MANY_CONNECTIONS};
pub use rewrite::PathRewrite;
