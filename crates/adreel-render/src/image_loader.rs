//! Image loading and fitting.
//! Decodes PNG, JPEG, WebP, and other formats into FrameBuffers and resamples
//! them into layer boxes.

use std::path::Path;

use adreel_core::{AdreelError, AdreelResult, FrameBuffer};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Serialize;

/// How an image fills its layer box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Fit {
    /// Fill the box, cropping the overflow.
    Cover,
    /// Fit entirely inside the box, letterboxed with transparency.
    Contain,
}

/// Load an image file and convert it to a FrameBuffer.
pub fn load_image(path: &Path) -> AdreelResult<FrameBuffer> {
    let img = image::open(path).map_err(|e| {
        AdreelError::asset(
            format!("failed to load image: {e}"),
            path.display().to_string(),
        )
    })?;
    Ok(from_rgba_image(img.to_rgba8()))
}

/// Load an image from raw bytes (e.g. a fetched asset body).
pub fn load_image_from_bytes(data: &[u8], source: &str) -> AdreelResult<FrameBuffer> {
    let img = image::load_from_memory(data)
        .map_err(|e| AdreelError::asset(format!("failed to decode image: {e}"), source))?;
    Ok(from_rgba_image(img.to_rgba8()))
}

fn from_rgba_image(rgba: RgbaImage) -> FrameBuffer {
    let (width, height) = rgba.dimensions();
    let mut fb = FrameBuffer::new(width, height);
    fb.data = rgba.into_raw();
    fb
}

fn to_rgba_image(fb: &FrameBuffer) -> Option<RgbaImage> {
    RgbaImage::from_raw(fb.width, fb.height, fb.data.clone())
}

/// Resample to exactly `width` × `height`.
pub fn resize_exact(fb: &FrameBuffer, width: u32, height: u32) -> FrameBuffer {
    let (width, height) = (width.max(1), height.max(1));
    if fb.width == width && fb.height == height {
        return fb.clone();
    }
    match to_rgba_image(fb) {
        Some(img) => from_rgba_image(imageops::resize(&img, width, height, FilterType::Triangle)),
        None => FrameBuffer::new(width, height),
    }
}

/// Fit `fb` into a `width` × `height` box. The result is always exactly the box size.
pub fn fit_into(fb: &FrameBuffer, width: u32, height: u32, fit: Fit) -> FrameBuffer {
    let (width, height) = (width.max(1), height.max(1));
    if fb.width == 0 || fb.height == 0 {
        return FrameBuffer::new(width, height);
    }
    let sx = width as f64 / fb.width as f64;
    let sy = height as f64 / fb.height as f64;
    let scale = match fit {
        Fit::Cover => sx.max(sy),
        Fit::Contain => sx.min(sy),
    };
    let sw = ((fb.width as f64 * scale).round() as u32).max(1);
    let sh = ((fb.height as f64 * scale).round() as u32).max(1);
    let scaled = resize_exact(fb, sw, sh);

    let mut out = FrameBuffer::new(width, height);
    let dx = (width as i32 - sw as i32) / 2;
    let dy = (height as i32 - sh as i32) / 2;
    out.composite_over(&scaled, dx, dy);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreel_core::Color;

    #[test]
    fn test_load_image_missing_file() {
        let result = load_image(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(AdreelError::Asset { .. })));
    }

    #[test]
    fn test_load_garbage_bytes() {
        assert!(load_image_from_bytes(b"not an image", "https://x/a.png").is_err());
    }

    #[test]
    fn test_decode_png_bytes() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let fb = load_image_from_bytes(&bytes, "mem").unwrap();
        assert_eq!((fb.width, fb.height), (3, 2));
        assert_eq!(fb.get_pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_cover_fills_box() {
        let fb = FrameBuffer::solid(200, 100, &Color::RED);
        let out = fit_into(&fb, 50, 50, Fit::Cover);
        assert_eq!((out.width, out.height), (50, 50));
        assert_eq!(out.get_pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(49, 49), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_contain_letterboxes() {
        let fb = FrameBuffer::solid(200, 100, &Color::RED);
        let out = fit_into(&fb, 50, 50, Fit::Contain);
        assert_eq!((out.width, out.height), (50, 50));
        assert_eq!(out.get_pixel(25, 0).unwrap()[3], 0);
        assert_eq!(out.get_pixel(25, 25), Some([255, 0, 0, 255]));
    }
}
