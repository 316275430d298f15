use crate::ImageError;

/// Single-channel 8-bit plane, row-major, `data.len() == width * height`.
///
/// Used for raster channels, grayscale maps and threshold masks alike.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Plane {
    /// Zero-filled plane.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    /// Plane with every sample set to `value`.
    ///
    /// # Panics
    ///
    /// When `width * height` overflows; use [`Plane::try_filled`] for
    /// untrusted dimensions.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        // An overflowed count saturates, so the allocation fails instead of wrapping.
        let len = width.checked_mul(height).unwrap_or(usize::MAX);
        Self {
            width,
            height,
            data: vec![value; len],
        }
    }

    pub fn try_filled(width: usize, height: usize, value: u8) -> Result<Self, ImageError> {
        let len = width
            .checked_mul(height)
            .ok_or(ImageError::DimensionsOverflow { width, height })?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    /// Wrap a row-major buffer, checking its length against the dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width
            .checked_mul(height)
            .ok_or(ImageError::DimensionsOverflow { width, height })?;
        if data.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a plane from nested rows of wide integer samples.
    ///
    /// Rows must all have the same length and every value must be in `0..=255`.
    pub fn from_rows<T>(rows: &[Vec<T>]) -> Result<Self, ImageError>
    where
        T: Copy + Into<i64>,
    {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ImageError::RaggedRows {
                    row: y,
                    expected: width,
                    got: row.len(),
                });
            }
            for (x, &v) in row.iter().enumerate() {
                let value: i64 = v.into();
                let sample =
                    u8::try_from(value).map_err(|_| ImageError::SampleOutOfRange { x, y, value })?;
                data.push(sample);
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fail with [`ImageError::EmptyImage`] for a plane without pixels.
    pub fn ensure_non_empty(&self) -> Result<(), ImageError> {
        if self.is_empty() {
            return Err(ImageError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Sample at signed coordinates, `None` outside the plane (no wraparound).
    #[inline]
    pub fn get_clipped(&self, x: isize, y: isize) -> Option<u8> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width + x as usize])
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        self.data[y * self.width + x] = value;
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Iterate rows as slices of `width` samples.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks(0) panics; an empty plane has no rows to yield anyway.
        self.data.chunks(self.width.max(1)).take(self.height)
    }

    /// Copy into nested rows, the layout external sinks usually expect.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }

    /// New plane of the same shape with `f` applied to every sample.
    pub fn map(&self, f: impl Fn(u8) -> u8) -> Plane {
        Plane {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Apply `f` to every sample in place.
    pub fn map_in_place(&mut self, f: impl Fn(u8) -> u8) {
        for v in &mut self.data {
            *v = f(*v);
        }
    }

    /// Observed `(min, max)` sample, `None` for an empty plane.
    pub fn min_max(&self) -> Option<(u8, u8)> {
        let mut iter = self.data.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    pub fn same_shape(&self, other: &Plane) -> bool {
        self.width == other.width && self.height == other.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowing_dimensions_are_reported() {
        let overflow = ImageError::DimensionsOverflow {
            width: usize::MAX,
            height: 2,
        };
        assert_eq!(Plane::from_raw(usize::MAX, 2, Vec::new()), Err(overflow.clone()));
        assert_eq!(Plane::try_filled(usize::MAX, 2, 7), Err(overflow));
        let p = Plane::try_filled(3, 2, 7).unwrap();
        assert_eq!(p.as_raw(), &[7; 6]);
    }

    #[test]
    fn from_raw_checks_length() {
        let err = Plane::from_raw(3, 2, vec![0; 5]).unwrap_err();
        assert_eq!(
            err,
            ImageError::BufferLength {
                expected: 6,
                got: 5
            }
        );
        assert!(Plane::from_raw(3, 2, vec![0; 6]).is_ok());
    }

    #[test]
    fn from_rows_rejects_out_of_range_samples() {
        let rows: Vec<Vec<i32>> = vec![vec![0, 12], vec![300, 1]];
        let err = Plane::from_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            ImageError::SampleOutOfRange {
                x: 0,
                y: 1,
                value: 300
            }
        );

        let rows: Vec<Vec<i32>> = vec![vec![-1]];
        assert!(matches!(
            Plane::from_rows(&rows),
            Err(ImageError::SampleOutOfRange { value: -1, .. })
        ));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![4, 5]];
        assert!(matches!(
            Plane::from_rows(&rows),
            Err(ImageError::RaggedRows { row: 1, .. })
        ));
    }

    #[test]
    fn rows_round_trip_layout() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let p = Plane::from_rows(&rows).unwrap();
        assert_eq!(p.width(), 3);
        assert_eq!(p.height(), 2);
        assert_eq!(p.get(2, 1), 6);
        assert_eq!(p.to_rows(), rows);
    }

    #[test]
    fn clipped_access_never_wraps() {
        let p = Plane::from_raw(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(p.get_clipped(-1, 0), None);
        assert_eq!(p.get_clipped(2, 0), None);
        assert_eq!(p.get_clipped(0, 2), None);
        assert_eq!(p.get_clipped(1, 1), Some(4));
    }

    #[test]
    fn empty_plane_is_reported() {
        let p = Plane::new(0, 4);
        assert!(p.is_empty());
        assert_eq!(p.rows().count(), 0);
        assert_eq!(p.min_max(), None);
        assert!(p.ensure_non_empty().is_err());
    }
}
