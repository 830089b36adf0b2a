use image::{ImageBuffer, Rgb, RgbImage};

use crate::error::ConcealError;
use crate::result::Result;

/// number of color channels a pixel carries, alpha is never used
pub const CHANNELS: usize = 3;

/// One pixel as red, green and blue channel
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Pixel(pub [u8; CHANNELS]);

impl Pixel {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self([red, green, blue])
    }

    pub fn channel(&self, idx: usize) -> u8 {
        self.0[idx]
    }

    pub fn channel_mut(&mut self, idx: usize) -> &mut u8 {
        &mut self.0[idx]
    }
}

impl From<&Rgb<u8>> for Pixel {
    fn from(value: &Rgb<u8>) -> Self {
        Self(value.0)
    }
}

impl From<Pixel> for Rgb<u8> {
    fn from(value: Pixel) -> Self {
        Rgb(value.0)
    }
}

/// The pixels of an image flattened in raster order, row by row from the top left.
///
/// Embedding and extraction both walk this order, a different order on either
/// side silently yields garbage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PixelSequence {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelSequence {
    /// flattens an image, fails for images without pixels
    pub fn from_image(image: &RgbImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ConcealError::EmptyImage);
        }

        Ok(Self {
            width,
            height,
            pixels: image.pixels().map(Pixel::from).collect(),
        })
    }

    pub fn from_pixels(pixels: Vec<Pixel>, width: u32, height: u32) -> Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(ConcealError::DimensionMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// builds a fresh image buffer out of the sequence
    pub fn into_image(self) -> Result<RgbImage> {
        let (width, height, len) = (self.width, self.height, self.pixels.len());
        let raw: Vec<u8> = self.pixels.into_iter().flat_map(|p| p.0).collect();

        ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, raw)
            .ok_or(ConcealError::DimensionMismatch { width, height, len })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }
}

/// Flattens an image into its raster ordered pixels
pub fn to_pixel_sequence(image: &RgbImage) -> Result<PixelSequence> {
    PixelSequence::from_image(image)
}

/// Writes pixels back into a new image of the given dimensions
pub fn from_pixel_sequence(pixels: Vec<Pixel>, width: u32, height: u32) -> Result<RgbImage> {
    PixelSequence::from_pixels(pixels, width, height)?.into_image()
}
