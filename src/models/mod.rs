//! Event data carried by the creation form and sent to the backend.

pub mod draft_event;
pub mod event_status;

pub use self::draft_event::*;
pub use self::event_status::*;
