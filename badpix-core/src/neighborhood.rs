//! Square pixel neighborhoods clipped to the sensor grid.

use crate::{Error, Result, SensorGeometry};

/// Window size used for interpolating a bad pixel (8-connectivity).
pub const DEFAULT_WINDOW_SIZE: usize = 3;

/// Returns the pixels of the `window_size` x `window_size` window centered
/// on `pixel`, excluding the center itself.
///
/// Window cells falling outside the grid are dropped, so edge and corner
/// pixels get fewer neighbors. The result is sorted ascending.
///
/// # Errors
/// - [`Error::PixelOutOfBounds`] if `pixel` is not on the grid.
/// - [`Error::InvalidWindowSize`] if `window_size` is zero or even.
/// - [`Error::GeometryInvariant`] if the center is missing from its own window.
pub fn neighbors(
    geometry: &SensorGeometry,
    pixel: usize,
    window_size: usize,
) -> Result<Vec<usize>> {
    if !geometry.contains(pixel) {
        return Err(Error::PixelOutOfBounds {
            pixel,
            len: geometry.len(),
        });
    }
    if window_size == 0 || window_size % 2 == 0 {
        return Err(Error::InvalidWindowSize(window_size));
    }

    let center = geometry.coord(pixel);
    let reach = window_size / 2;

    let row_start = center.row.saturating_sub(reach);
    let row_end = (center.row + reach).min(geometry.rows - 1);
    let col_start = center.column.saturating_sub(reach);
    let col_end = (center.column + reach).min(geometry.columns - 1);

    let mut window = Vec::with_capacity((row_end - row_start + 1) * (col_end - col_start + 1));
    for row in row_start..=row_end {
        for column in col_start..=col_end {
            window.push(geometry.index(row, column));
        }
    }

    // Row-major enumeration is already ascending.
    match window.binary_search(&pixel) {
        Ok(position) => {
            window.remove(position);
        }
        Err(_) => return Err(Error::GeometryInvariant { pixel }),
    }

    Ok(window)
}
