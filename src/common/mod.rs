pub mod capture;

pub use capture::{CaptureHandle, MediaKind};
