use image::{Rgba, RgbaImage};

/// A decoded clipboard image. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Builds a bitmap filled with a single color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba(color)))
    }

    /// Builds a bitmap from tightly packed RGBA8 rows. Returns `None` when
    /// the buffer length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, bytes).map(Self::new)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn pixels(&self) -> impl Iterator<Item = &Rgba<u8>> {
        self.image.pixels()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }
}
