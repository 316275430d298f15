//! 256-bin channel histograms.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Channel, ImageError, Plane, Raster};

#[cfg(feature = "tracing")]
use tracing::instrument;

pub const NUM_BINS: usize = 256;

/// Pixel count per sample value; index = value.
#[derive(Clone, PartialEq, Eq)]
pub struct ChannelHistogram {
    bins: [u32; NUM_BINS],
}

impl ChannelHistogram {
    pub fn empty() -> Self {
        Self {
            bins: [0; NUM_BINS],
        }
    }

    pub fn bins(&self) -> &[u32; NUM_BINS] {
        &self.bins
    }

    #[inline]
    pub fn count(&self, value: u8) -> u32 {
        self.bins[value as usize]
    }

    /// Sum of all bins; equals `width * height` of the source plane.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&c| c as u64).sum()
    }

    /// Sum of `value * count`, the intensity mass used by Otsu.
    pub fn weighted_sum(&self) -> u64 {
        self.bins
            .iter()
            .enumerate()
            .map(|(v, &c)| v as u64 * c as u64)
            .sum()
    }

    /// Lowest and highest value with a non-zero count.
    pub fn occupied_range(&self) -> Option<(u8, u8)> {
        let lo = self.bins.iter().position(|&c| c > 0)?;
        let hi = self.bins.iter().rposition(|&c| c > 0)?;
        Some((lo as u8, hi as u8))
    }

    fn accumulate(&mut self, samples: &[u8]) {
        for &v in samples {
            self.bins[v as usize] += 1;
        }
    }
}

impl Default for ChannelHistogram {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ChannelHistogram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let occupied: Vec<(usize, u32)> = self
            .bins
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(v, &c)| (v, c))
            .collect();
        f.debug_struct("ChannelHistogram")
            .field("occupied", &occupied)
            .finish()
    }
}

// serde derives stop at 32-element arrays.
impl Serialize for ChannelHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.bins.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChannelHistogram {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<u32>::deserialize(deserializer)?;
        let got = raw.len();
        let bins: [u32; NUM_BINS] = raw.try_into().map_err(|_| {
            <D::Error as serde::de::Error>::invalid_length(got, &"exactly 256 histogram bins")
        })?;
        Ok(Self { bins })
    }
}

/// Count every sample of `plane` into 256 bins.
///
/// An empty plane is rejected with [`ImageError::EmptyImage`]; callers that
/// want to continue anyway can fall back to [`ChannelHistogram::empty`].
pub fn build_histogram(plane: &Plane) -> Result<ChannelHistogram, ImageError> {
    plane.ensure_non_empty()?;
    let mut hist = ChannelHistogram::empty();
    hist.accumulate(plane.as_raw());
    Ok(hist)
}

/// Histograms of the three raster channels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub red: ChannelHistogram,
    pub green: ChannelHistogram,
    pub blue: ChannelHistogram,
}

impl Histogram {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(raster), fields(width = raster.width(), height = raster.height()))
    )]
    pub fn from_raster(raster: &Raster) -> Result<Self, ImageError> {
        Ok(Self {
            red: build_histogram(raster.red())?,
            green: build_histogram(raster.green())?,
            blue: build_histogram(raster.blue())?,
        })
    }

    pub fn channel(&self, channel: Channel) -> &ChannelHistogram {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }
}
