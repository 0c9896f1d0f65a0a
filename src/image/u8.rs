/// Borrowed 8-bit grayscale frame with an explicit row stride.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed view (`stride == w`).
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    /// Whether `data` is large enough for the declared geometry.
    pub fn is_consistent(&self) -> bool {
        if self.w == 0 || self.h == 0 {
            return true;
        }
        self.stride >= self.w && self.data.len() >= (self.h - 1) * self.stride + self.w
    }
}

impl<'a> crate::image::ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
