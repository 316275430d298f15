//! Image file I/O via the `image` crate.
//!
//! Any format `image` can decode is accepted on input; the encoder is chosen
//! from the output extension. Rasters are written as 24-bit RGB, masks and
//! grayscale planes are replicated into three channels first.

use std::path::Path;

use histothresh_core::{Plane, Raster};
use image::{ImageReader, RgbImage};
use log::info;

use crate::IoError;

pub fn raster_from_rgb_image(img: &RgbImage) -> Result<Raster, IoError> {
    let (w, h) = img.dimensions();
    Ok(Raster::from_interleaved_rgb(
        w as usize,
        h as usize,
        img.as_raw(),
    )?)
}

pub fn raster_to_rgb_image(raster: &Raster) -> Result<RgbImage, IoError> {
    let (width, height) = (raster.width(), raster.height());
    let too_large = || IoError::Dimensions { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;
    RgbImage::from_raw(w, h, raster.to_interleaved_rgb()).ok_or_else(too_large)
}

/// Decode an image file into an RGB raster.
pub fn load_raster(path: impl AsRef<Path>) -> Result<Raster, IoError> {
    let path = path.as_ref();
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?
        .to_rgb8();
    let raster = raster_from_rgb_image(&img)?;
    raster.ensure_non_empty()?;
    info!(
        "loaded {} ({}x{})",
        path.display(),
        raster.width(),
        raster.height()
    );
    Ok(raster)
}

pub fn save_raster(raster: &Raster, path: impl AsRef<Path>) -> Result<(), IoError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    raster_to_rgb_image(raster)?.save(path)?;
    info!("wrote {}", path.display());
    Ok(())
}

pub fn save_plane(plane: &Plane, path: impl AsRef<Path>) -> Result<(), IoError> {
    save_raster(&Raster::from_gray(plane), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bmp_file_preserves_samples() {
        let px: Vec<u8> = (0..5 * 3 * 3u32).map(|i| (i * 17 % 256) as u8).collect();
        let raster = Raster::from_interleaved_rgb(5, 3, &px).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bmp");
        save_raster(&raster, &path).unwrap();
        let back = load_raster(&path).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn plane_is_written_as_gray_rgb() {
        let plane = Plane::from_raw(2, 1, vec![0, 255]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.bmp");
        save_plane(&plane, &path).unwrap();
        let back = load_raster(&path).unwrap();
        for channel in back.channels() {
            assert_eq!(channel.as_raw(), &[0, 255]);
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_raster("/definitely/not/here.bmp").unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }
}
