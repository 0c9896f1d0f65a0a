//! Binary edge mask. Non-zero pixels are edge pixels; the detector writes 255.
use super::ImageView;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl EdgeMap {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x] != 0
    }

    #[inline]
    pub fn mark(&mut self, x: usize, y: usize) {
        self.data[y * self.w + x] = 255;
    }

    /// Number of edge pixels.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

impl ImageView for EdgeMap {
    type Pixel = u8;

    fn width(&self) -> usize {
        self.w
    }
    fn height(&self) -> usize {
        self.h
    }
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }
}
