//! Separable box blur on premultiplied RGBA8.

use adreel_core::{FrameBuffer};

/// Blur `fb` with a `(2r + 1)` box in both directions. Edges clamp.
pub fn box_blur(fb: &FrameBuffer, radius: u32) -> FrameBuffer {
    if radius == 0 || fb.width == 0 || fb.height == 0 {
        return fb.clone();
    }
    let (w, h) = (fb.width as usize, fb.height as usize);
    let mut premul = premultiply(&fb.data);
    let mut tmp = vec![0u8; premul.len()];

    for y in 0..h {
        blur_line(&premul, &mut tmp, y * w * 4, 4, w, radius as usize);
    }
    for x in 0..w {
        blur_line(&tmp, &mut premul, x * 4, w * 4, h, radius as usize);
    }

    let mut out = FrameBuffer::new(fb.width, fb.height);
    out.data = unpremultiply(&premul);
    out
}

/// One row or column: `len` pixels starting at `start`, `stride` bytes apart.
fn blur_line(src: &[u8], dst: &mut [u8], start: usize, stride: usize, len: usize, r: usize) {
    let at = |i: isize| -> usize {
        let clamped = i.clamp(0, len as isize - 1) as usize;
        start + clamped * stride
    };
    let window = (2 * r + 1) as u32;
    let half = window / 2;
    let mut acc = [0u32; 4];
    for i in -(r as isize)..=(r as isize) {
        let idx = at(i);
        for c in 0..4 {
            acc[c] += u32::from(src[idx + c]);
        }
    }
    for i in 0..len {
        let out = start + i * stride;
        for c in 0..4 {
            dst[out + c] = ((acc[c] + half) / window).min(255) as u8;
        }
        let add = at(i as isize + r as isize + 1);
        let sub = at(i as isize - r as isize);
        for c in 0..4 {
            acc[c] = acc[c] + u32::from(src[add + c]) - u32::from(src[sub + c]);
        }
    }
}

fn premultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        for c in px.iter_mut().take(3) {
            *c = ((u32::from(*c) * a + 127) / 255) as u8;
        }
    }
    out
}

fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use adreel_core::Color;

    #[test]
    fn test_radius_zero_is_identity() {
        let fb = FrameBuffer::solid(3, 3, &Color::RED);
        assert_eq!(box_blur(&fb, 0), fb);
    }

    #[test]
    fn test_constant_image_unchanged() {
        let fb = FrameBuffer::solid(8, 5, &Color::from_rgb8(10, 200, 30));
        assert_eq!(box_blur(&fb, 3), fb);
    }

    #[test]
    fn test_spreads_a_single_pixel() {
        let mut fb = FrameBuffer::new(9, 9);
        fb.set_pixel(4, 4, [255, 255, 255, 255]);
        let out = box_blur(&fb, 1);
        let center = out.get_pixel(4, 4).unwrap();
        let neighbour = out.get_pixel(5, 5).unwrap();
        assert!(center[3] > 0 && center[3] < 255);
        assert_eq!(center[3], neighbour[3]);
        assert_eq!(out.get_pixel(7, 7).unwrap()[3], 0);
        // colour survives the transparent surroundings
        assert_eq!(&center[..3], &[255, 255, 255]);
    }
}
