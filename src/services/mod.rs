//! Service Layer
//!
//! Backend access and background timers.
//!
//! ```text
//! ┌────────────────┐      ┌──────────────┐      ┌─────────────────┐
//! │  Controllers   │ ───► │  ApiClient   │ ───► │  HttpTransport  │
//! └────────────────┘      └──────────────┘      └─────────────────┘
//!         ▲
//!         │ PollKind
//! ┌────────────────┐
//! │ PollScheduler  │
//! └────────────────┘
//! ```

pub mod api;
pub mod scheduler;
pub mod transport;
