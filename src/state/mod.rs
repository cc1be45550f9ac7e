//! State - View-State Objects Owned by Controllers
//!
//! Nothing here performs I/O; controllers mutate these and renderers read them.

pub mod form_state;
pub mod list_state;
pub mod notice_state;
pub mod view_state;

pub use form_state::*;
pub use list_state::*;
pub use notice_state::*;
pub use view_state::*;
