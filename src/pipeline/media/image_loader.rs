use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use tracing::debug;

use crate::common::CaptureHandle;
use crate::error::AnalysisError;

/// Decodes a still capture on the blocking pool.
pub async fn load_image(capture: &CaptureHandle) -> Result<DynamicImage, AnalysisError> {
    let path = capture.local_path()?;

    if let Err(source) = tokio::fs::metadata(&path).await {
        return Err(AnalysisError::ResourceUnavailable { path, source });
    }

    let image = tokio::task::spawn_blocking(move || image::open(&path)).await??;

    debug!(
        "Decoded capture {} ({}x{})",
        capture.capture_id(),
        image.width(),
        image.height()
    );

    Ok(image)
}

/// Decodes and squashes a capture onto a `size` x `size` RGB grid.
pub async fn load_resized(capture: &CaptureHandle, size: u32) -> Result<RgbImage, AnalysisError> {
    let image = load_image(capture).await?;
    if image.width() == 0 || image.height() == 0 {
        return Err(AnalysisError::Decode("image has no pixels".to_string()));
    }

    let resized = tokio::task::spawn_blocking(move || {
        image.resize_exact(size, size, FilterType::Triangle).to_rgb8()
    })
    .await?;

    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[tokio::test]
    async fn resizes_to_requested_grid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(320, 40, Rgb([200, 40, 40]))
            .save(&path)
            .unwrap();

        let capture = CaptureHandle::image(path.to_string_lossy());
        let grid = load_resized(&capture, 100).await.unwrap();
        assert_eq!(grid.dimensions(), (100, 100));
        let [r, g, b] = grid.get_pixel(50, 50).0;
        assert!(r.abs_diff(200) <= 1 && g.abs_diff(40) <= 1 && b.abs_diff(40) <= 1);
    }

    #[tokio::test]
    async fn missing_file_is_resource_unavailable() {
        let capture = CaptureHandle::image("/definitely/not/here.jpg");
        let err = load_image(&capture).await.unwrap_err();
        assert!(matches!(err, AnalysisError::ResourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn garbage_bytes_are_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not really a png").unwrap();

        let capture = CaptureHandle::image(path.to_string_lossy());
        let err = load_image(&capture).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }
}
