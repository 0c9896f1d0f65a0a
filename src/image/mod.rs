//! Raster containers used by the detector.
//!
//! - [`ImageU8`]: borrowed, strided 8-bit view of the caller's frame.
//! - [`ImageF32`]: owned float buffer for blurred intensities and gradients.
//! - [`EdgeMap`]: owned binary mask (0 / 255) produced by the edge stages.
//!
//! All three expose rows through [`ImageView`] so filters can be written once.
pub mod edge_map;
pub mod f32;
pub mod io;
pub mod u8;

pub use self::edge_map::EdgeMap;
pub use self::f32::ImageF32;
pub use self::u8::ImageU8;

/// Row access shared by every raster type.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn row(&self, y: usize) -> &[Self::Pixel];

    /// True when the raster has no pixels at all.
    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Length of the image diagonal in pixels.
    fn diagonal(&self) -> f32 {
        let w = self.width() as f32;
        let h = self.height() as f32;
        (w * w + h * h).sqrt()
    }
}
