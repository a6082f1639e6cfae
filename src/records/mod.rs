//! Entities owned by the local store. The analyzers never touch these; the
//! caller builds a record from a result and persists it however it likes.

mod checkup;
mod profile;

pub use checkup::CheckupRecord;
pub use profile::{Gender, Pin, UserProfile};
