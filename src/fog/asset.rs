// asset.rs - Decoded fog image
//
// Hosts decode the image however they like (getImageData in the browser,
// the `image` crate natively) and hand over straight RGBA8 pixels.

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageAsset {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ImageAsset {
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyAsset);
        }
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(Error::AssetSize { width, height, len: rgba.len() });
        }
        Ok(Self { width, height, rgba })
    }

    /// Single-colour image, used when no real asset is available.
    pub fn flat(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, Error> {
        let len = width as usize * height as usize;
        let data = rgba.iter().copied().cycle().take(len * 4).collect();
        Self::from_rgba(width, height, data)
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn rgba(&self) -> &[u8] { &self.rgba }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_accepts_exact_length() {
        let a = ImageAsset::from_rgba(2, 2, vec![0; 16]).unwrap();
        assert_eq!((a.width(), a.height()), (2, 2));
        assert_eq!(a.rgba().len(), 16);
    }

    #[test]
    fn test_from_rgba_rejects_length_mismatch() {
        let err = ImageAsset::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(err, Error::AssetSize { width: 2, height: 2, len: 15 });
    }

    #[test]
    fn test_from_rgba_rejects_empty() {
        assert_eq!(ImageAsset::from_rgba(0, 4, vec![]).unwrap_err(), Error::EmptyAsset);
    }

    #[test]
    fn test_flat_fills_every_pixel() {
        let a = ImageAsset::flat(3, 1, [1, 2, 3, 4]).unwrap();
        assert_eq!(a.rgba(), &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }
}
