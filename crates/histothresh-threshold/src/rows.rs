//! Row-wise output filling, sequential or (feature `rayon`) row-parallel.
//!
//! Closures only read shared inputs and write their own output row.

use histothresh_core::Plane;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

pub(crate) fn fill_rows<F>(out: &mut Plane, f: F)
where
    F: Fn(usize, &mut [u8]) + Sync + Send,
{
    let _ = try_fill_rows(out, |y, row| {
        f(y, row);
        Ok::<(), std::convert::Infallible>(())
    });
}

#[cfg(feature = "rayon")]
pub(crate) fn try_fill_rows<F, E>(out: &mut Plane, f: F) -> Result<(), E>
where
    F: Fn(usize, &mut [u8]) -> Result<(), E> + Sync + Send,
    E: Send,
{
    let width = out.width();
    if width == 0 {
        return Ok(());
    }
    out.as_raw_mut()
        .par_chunks_mut(width)
        .enumerate()
        .try_for_each(|(y, row)| f(y, row))
}

#[cfg(not(feature = "rayon"))]
pub(crate) fn try_fill_rows<F, E>(out: &mut Plane, f: F) -> Result<(), E>
where
    F: Fn(usize, &mut [u8]) -> Result<(), E> + Sync + Send,
    E: Send,
{
    let width = out.width();
    if width == 0 {
        return Ok(());
    }
    out.as_raw_mut()
        .chunks_mut(width)
        .enumerate()
        .try_for_each(|(y, row)| f(y, row))
}
