//! Color and depth targets for the software rasterizer.

/// A straight-alpha RGBA color target with a matching depth buffer
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    color: Vec<[f32; 4]>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    /// Creates a target cleared to `clear` with depth at the far plane
    pub fn new(width: u32, height: u32, clear: [f32; 4]) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![clear; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.color
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.color[self.index(x, y)]
    }

    pub fn depth_at(&self, x: u32, y: u32) -> f32 {
        self.depth[self.index(x, y)]
    }

    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub(crate) fn depth(&self, index: usize) -> f32 {
        self.depth[index]
    }

    pub(crate) fn set_depth(&mut self, index: usize, depth: f32) {
        self.depth[index] = depth;
    }

    /// Composites `src` over the stored color (source-over, straight alpha)
    pub fn blend(&mut self, index: usize, src: [f32; 4]) {
        let dst = self.color[index];
        let sa = src[3];
        let da = dst[3] * (1.0 - sa);
        let out_a = sa + da;

        self.color[index] = if out_a <= 0.0 {
            [0.0; 4]
        } else {
            [
                (src[0] * sa + dst[0] * da) / out_a,
                (src[1] * sa + dst[1] * da) / out_a,
                (src[2] * sa + dst[2] * da) / out_a,
                out_a,
            ]
        };
    }

    /// Box-filters `factor` x `factor` blocks into single pixels.
    ///
    /// Colors are averaged premultiplied so transparent samples do not
    /// darken edges. Depth keeps the nearest sample.
    pub fn downsample(&self, factor: u32) -> FrameBuffer {
        if factor <= 1 {
            return self.clone();
        }

        let width = self.width / factor;
        let height = self.height / factor;
        let samples = (factor * factor) as f32;
        let mut out = FrameBuffer::new(width, height, [0.0; 4]);

        for y in 0..height {
            for x in 0..width {
                let mut sum = [0.0f32; 4];
                let mut nearest = f32::INFINITY;
                for sy in 0..factor {
                    for sx in 0..factor {
                        let i = self.index(x * factor + sx, y * factor + sy);
                        let [r, g, b, a] = self.color[i];
                        sum[0] += r * a;
                        sum[1] += g * a;
                        sum[2] += b * a;
                        sum[3] += a;
                        nearest = nearest.min(self.depth[i]);
                    }
                }

                let o = out.index(x, y);
                out.color[o] = if sum[3] > 0.0 {
                    [sum[0] / sum[3], sum[1] / sum[3], sum[2] / sum[3], sum[3] / samples]
                } else {
                    [0.0; 4]
                };
                out.depth[o] = nearest;
            }
        }

        out
    }

    /// Row-major 8-bit RGBA, straight alpha
    pub fn to_rgba8(&self) -> Vec<u8> {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.color
            .iter()
            .flat_map(|&[r, g, b, a]| [q(r), q(g), q(b), q(a)])
            .collect()
    }

    /// Number of pixels with any coverage
    pub fn covered_pixels(&self) -> usize {
        self.color.iter().filter(|c| c[3] > 0.0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_source_over() {
        let mut fb = FrameBuffer::new(1, 1, [1.0, 1.0, 1.0, 1.0]);
        fb.blend(0, [0.0, 0.0, 0.0, 0.5]);
        assert_eq!(fb.pixel(0, 0), [0.5, 0.5, 0.5, 1.0]);

        let mut clear = FrameBuffer::new(1, 1, [0.0; 4]);
        clear.blend(0, [1.0, 0.0, 0.0, 0.5]);
        assert_eq!(clear.pixel(0, 0), [1.0, 0.0, 0.0, 0.5]);

        clear.blend(0, [0.0; 4]);
        assert_eq!(clear.pixel(0, 0), [1.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_downsample_ignores_transparent_color() {
        let mut fb = FrameBuffer::new(2, 2, [0.0; 4]);
        let i = fb.index(0, 0);
        fb.blend(i, [1.0, 0.0, 0.0, 1.0]);
        fb.set_depth(i, 0.25);

        let small = fb.downsample(2);
        assert_eq!((small.width(), small.height()), (1, 1));
        assert_eq!(small.pixel(0, 0), [1.0, 0.0, 0.0, 0.25]);
        assert_eq!(small.depth_at(0, 0), 0.25);
    }

    #[test]
    fn test_to_rgba8() {
        let fb = FrameBuffer::new(2, 1, [1.0, 0.5, 0.0, 1.0]);
        assert_eq!(fb.to_rgba8(), vec![255, 128, 0, 255, 255, 128, 0, 255]);
        assert_eq!(fb.covered_pixels(), 2);
    }
}
