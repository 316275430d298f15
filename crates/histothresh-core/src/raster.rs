//! Three-plane RGB raster.
//!
//! The channel planes are private so the shared-dimension invariant holds for
//! the lifetime of a [`Raster`]; point transforms mutate samples through
//! [`Raster::channels_mut`], which cannot change a plane's shape.

use serde::{Deserialize, Serialize};

use crate::{ImageError, Plane};

/// Channel selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    r: Plane,
    g: Plane,
    b: Plane,
}

impl Raster {
    /// Assemble a raster from three planes of identical dimensions.
    pub fn from_planes(r: Plane, g: Plane, b: Plane) -> Result<Self, ImageError> {
        for other in [&g, &b] {
            if !r.same_shape(other) {
                return Err(ImageError::DimensionMismatch {
                    expected_w: r.width(),
                    expected_h: r.height(),
                    got_w: other.width(),
                    got_h: other.height(),
                });
            }
        }
        Ok(Self { r, g, b })
    }

    /// Split an interleaved `RGBRGB...` buffer into planes.
    pub fn from_interleaved_rgb(
        width: usize,
        height: usize,
        pixels: &[u8],
    ) -> Result<Self, ImageError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(ImageError::DimensionsOverflow { width, height })?;
        if pixels.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                got: pixels.len(),
            });
        }
        let n = width * height;
        let mut r = Vec::with_capacity(n);
        let mut g = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        for px in pixels.chunks_exact(3) {
            r.push(px[0]);
            g.push(px[1]);
            b.push(px[2]);
        }
        Ok(Self {
            r: Plane::from_raw(width, height, r)?,
            g: Plane::from_raw(width, height, g)?,
            b: Plane::from_raw(width, height, b)?,
        })
    }

    /// Replicate a single plane (grayscale map or mask) into all three channels.
    pub fn from_gray(gray: &Plane) -> Self {
        Self {
            r: gray.clone(),
            g: gray.clone(),
            b: gray.clone(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.r.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.r.height()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    pub fn ensure_non_empty(&self) -> Result<(), ImageError> {
        self.r.ensure_non_empty()
    }

    pub fn red(&self) -> &Plane {
        &self.r
    }

    pub fn green(&self) -> &Plane {
        &self.g
    }

    pub fn blue(&self) -> &Plane {
        &self.b
    }

    pub fn channel(&self, channel: Channel) -> &Plane {
        match channel {
            Channel::Red => &self.r,
            Channel::Green => &self.g,
            Channel::Blue => &self.b,
        }
    }

    /// `[R, G, B]`.
    pub fn channels(&self) -> [&Plane; 3] {
        [&self.r, &self.g, &self.b]
    }

    /// Mutable access to the samples of every channel.
    ///
    /// Slices keep the planes' lengths fixed, so dimensions stay consistent.
    pub fn channels_mut(&mut self) -> [&mut [u8]; 3] {
        [
            self.r.as_raw_mut(),
            self.g.as_raw_mut(),
            self.b.as_raw_mut(),
        ]
    }

    pub fn into_planes(self) -> (Plane, Plane, Plane) {
        (self.r, self.g, self.b)
    }

    /// Interleave back into `RGBRGB...` order.
    pub fn to_interleaved_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.r.len() * 3);
        for ((&r, &g), &b) in self
            .r
            .as_raw()
            .iter()
            .zip(self.g.as_raw())
            .zip(self.b.as_raw())
        {
            out.extend_from_slice(&[r, g, b]);
        }
        out
    }
}
