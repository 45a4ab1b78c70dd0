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

//! Module responsible for deriving the climatological
//! boundary condition of a site.
//!
//! The boundary condition is the long-term mean surface temperature
//! of the grid cell nearest to the site. No interpolation is done:
//! on each axis the single closest grid index is picked, and positions
//! beyond the grid are clamped to its edge (and rejected only when
//! the edge cell is further than the configured offset).

mod bisection;
mod grid;

use self::grid::ClimateGrid;

use crate::configuration::Climate;
use crate::errors::ResolveError;
use crate::site::Position;
use crate::Float;
use log::{debug, info};

/// Opens the climate dataset and returns the surface temperature
/// of the grid cell nearest to the position.
///
/// The dataset is opened read-only and closed before returning.
pub fn resolve(climate: &Climate, position: Position) -> Result<Float, ResolveError> {
    debug!("Resolving boundary temperature for N{} E{}", position.lat, position.lon);

    let grid = ClimateGrid::from_netcdf(climate)?;
    let temperature = grid.nearest_value(position, climate.max_offset)?;

    info!(
        "Boundary surface temperature at N{} E{} is {}",
        position.lat, position.lon, temperature
    );

    Ok(temperature)
}
