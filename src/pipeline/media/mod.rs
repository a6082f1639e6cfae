mod audio;
mod image_loader;

pub use audio::{probe_clip, AudioClip};
pub use image_loader::{load_image, load_resized};
