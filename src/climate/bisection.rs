/*
Copyright 2022 Jakub Lewandowski

This file is part of Snowpack Spin-up Initialiser (SPIN).

Snowpack Spin-up Initialiser (SPIN) is a free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation; either version 3 of the License, or
(at your option) any later version.

Snowpack Spin-up Initialiser (SPIN) is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with Snowpack Spin-up Initialiser (SPIN). If not, see https://www.gnu.org/licenses/.
*/

//! Module containg methods for conducting
//! binary search (bisection) of grid coordinates
//! closest to searched values.

use crate::errors::SearchError;
use crate::Float;

/// Checks that coordinate axis is non-empty and strictly monotonic
/// (either ascending or descending).
pub fn check_axis(array: &[Float]) -> Result<(), SearchError> {
    if array.is_empty() {
        return Err(SearchError::EmptyArray);
    }

    if array.iter().any(|v| !v.is_finite()) {
        return Err(SearchError::NotMonotonic);
    }

    let ascending = array.windows(2).all(|w| w[0] < w[1]);
    let descending = array.windows(2).all(|w| w[0] > w[1]);

    if !ascending && !descending {
        return Err(SearchError::NotMonotonic);
    }

    Ok(())
}

/// Finds the index of the first item that is not before `x`
/// in the direction of the axis.
///
/// Returns `array.len()` when `x` lies past the last item.
fn binary_search(array: &[Float], x: Float) -> usize {
    let mut lo = 0;
    let mut hi = array.len();

    // if the array is sorted descendingly we use reversed comparison
    let ascending = array[0] <= array[array.len() - 1];

    while lo < hi {
        let mid = (lo + hi) / 2;

        let before = if ascending {
            array[mid] < x
        } else {
            array[mid] > x
        };

        if before {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    lo
}

/// Finds the index of the item closest to `x`.
///
/// Values outside the axis are clamped to the nearest edge item.
/// When `x` lies exactly halfway between two items the one
/// with the larger coordinate is returned, whatever the axis direction.
pub fn find_nearest(array: &[Float], x: Float) -> Result<usize, SearchError> {
    check_axis(array)?;

    let right = binary_search(array, x);

    if right == 0 {
        return Ok(0);
    }

    if right == array.len() {
        return Ok(array.len() - 1);
    }

    let left = right - 1;

    let left_distance = (x - array[left]).abs();
    let right_distance = (array[right] - x).abs();

    if left_distance < right_distance {
        Ok(left)
    } else if right_distance < left_distance {
        Ok(right)
    } else if array[left] > array[right] {
        Ok(left)
    } else {
        Ok(right)
    }
}
