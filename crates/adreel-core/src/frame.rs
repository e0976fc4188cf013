use crate::Color;

const BYTES_PER_PIXEL: usize = 4;

/// One composited frame: 8-bit RGBA, straight alpha, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    /// Raw pixel data.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Create a new frame buffer filled with zeros (transparent black).
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize) * (height as usize) * BYTES_PER_PIXEL;
        Self {
            data: vec![0u8; size],
            width,
            height,
        }
    }

    /// Create an RGBA frame buffer from raw pixel data.
    /// Returns `None` when the data length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * BYTES_PER_PIXEL {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// Create a frame buffer filled with a solid color.
    pub fn solid(width: u32, height: u32, color: &Color) -> Self {
        let pixel = color.to_rgba8();
        let pixel_count = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&pixel);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Total byte size of the pixel data.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * BYTES_PER_PIXEL
    }

    /// Get the RGBA value at a pixel coordinate. Returns None if out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = self.offset(x, y);
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
            self.data[offset + 3],
        ])
    }

    /// Set the RGBA value at a pixel coordinate. No-op if out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = self.offset(x, y);
        self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Source-over blend a single pixel with an extra opacity multiplier.
    pub fn blend_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4], opacity: f32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let sa = ((rgba[3] as f32) * opacity.clamp(0.0, 1.0)).round() as u32;
        if sa == 0 {
            return;
        }
        let offset = self.offset(x, y);
        let d = &mut self.data[offset..offset + 4];
        blend_over(d, [rgba[0], rgba[1], rgba[2]], sa);
    }

    /// Blend a solid color over the rectangle `[x0, x1) × [y0, y1)`, clipped to the buffer.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: &Color) {
        let x0 = x0.clamp(0, self.width as i32) as u32;
        let x1 = x1.clamp(0, self.width as i32) as u32;
        let y0 = y0.clamp(0, self.height as i32) as u32;
        let y1 = y1.clamp(0, self.height as i32) as u32;
        let rgba = color.to_rgba8();
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, rgba, 1.0);
            }
        }
    }

    /// Alpha-composite `src` on top of `self` at position (dx, dy).
    pub fn composite_over(&mut self, src: &FrameBuffer, dx: i32, dy: i32) {
        self.composite_over_with_opacity(src, dx, dy, 1.0);
    }

    /// Alpha-composite `src` on top of `self` at (dx, dy), scaling source alpha by `opacity`.
    /// Uses integer math that auto-vectorizes well.
    pub fn composite_over_with_opacity(
        &mut self,
        src: &FrameBuffer,
        dx: i32,
        dy: i32,
        opacity: f32,
    ) {
        let op = (opacity.clamp(0.0, 1.0) * 255.0).round() as u32;
        if op == 0 {
            return;
        }

        let dst_width = self.width as i32;
        let dst_height = self.height as i32;

        let mut start_y = 0;
        let mut end_y = src.height as i32;
        let mut start_x = 0;
        let mut end_x = src.width as i32;

        if dy < 0 {
            start_y = -dy;
        }
        if dy + end_y > dst_height {
            end_y = dst_height - dy;
        }
        if dx < 0 {
            start_x = -dx;
        }
        if dx + end_x > dst_width {
            end_x = dst_width - dx;
        }

        if start_x >= end_x || start_y >= end_y {
            return;
        }

        let src_stride = (src.width * 4) as usize;
        let dst_stride = (self.width * 4) as usize;

        for sy in start_y..end_y {
            let dst_y = dy + sy;
            let src_row_start = (sy as usize * src_stride) + (start_x as usize * 4);
            let dst_row_start = (dst_y as usize * dst_stride) + ((dx + start_x) as usize * 4);
            let len = (end_x - start_x) as usize * 4;

            let src_slice = &src.data[src_row_start..src_row_start + len];
            let dst_slice = &mut self.data[dst_row_start..dst_row_start + len];

            for (s, d) in src_slice.chunks_exact(4).zip(dst_slice.chunks_exact_mut(4)) {
                let sa = (s[3] as u32 * op + 127) / 255;
                if sa == 0 {
                    continue;
                }
                blend_over(d, [s[0], s[1], s[2]], sa);
            }
        }
    }
}

/// Straight-alpha source-over of one pixel. `sa` is the effective source alpha in 0..=255.
fn blend_over(d: &mut [u8], s: [u8; 3], sa: u32) {
    if sa >= 255 {
        d[0] = s[0];
        d[1] = s[1];
        d[2] = s[2];
        d[3] = 255;
        return;
    }
    let da = d[3] as u32;
    let inv_sa = 255 - sa;
    let out_a = sa + (da * inv_sa) / 255;
    if out_a == 0 {
        return;
    }
    for c in 0..3 {
        let v = (s[c] as u32 * sa * 255 + d[c] as u32 * da * inv_sa) / (out_a * 255);
        d[c] = v.min(255) as u8;
    }
    d[3] = out_a.min(255) as u8;
}
