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

//! Sub-module responsible for reading the climate field
//! from NetCDF and selecting grid cells from it.

use super::bisection;
use crate::configuration::Climate;
use crate::errors::ResolveError;
use crate::site::Position;
use crate::Float;
use float_cmp::approx_eq;
use log::debug;
use netcdf::AttributeValue;
use ndarray::{Array2, ArrayD, Axis, Ix2, IxDyn};

/// Struct for storing a 2D climate field on a regular
/// lat-lon grid.
///
/// The whole field is buffered in memory, as long-term mean
/// datasets are small and only a single lookup is done per run.
#[derive(Debug)]
pub struct ClimateGrid {
    lats: Vec<Float>,
    lons: Vec<Float>,

    /// Field values indexed by `[lat, lon]`.
    values: Array2<Float>,

    /// Value marking cells without data, if the dataset declares one.
    fill_value: Option<Float>,
}

impl ClimateGrid {
    /// Grid constructor checking that axes are monotonic
    /// and agree with the field shape.
    pub fn new(
        lats: Vec<Float>,
        lons: Vec<Float>,
        values: Array2<Float>,
        fill_value: Option<Float>,
    ) -> Result<Self, ResolveError> {
        bisection::check_axis(&lats)?;
        bisection::check_axis(&lons)?;

        if values.dim() != (lats.len(), lons.len()) {
            return Err(ResolveError::MalformedGrid(
                "field shape does not match coordinate axes",
            ));
        }

        Ok(ClimateGrid {
            lats,
            lons,
            values,
            fill_value,
        })
    }

    /// Reads the configured variable and its coordinates
    /// from the NetCDF file.
    ///
    /// Every dimension other than latitude and longitude
    /// (eg. a single-step `time`) is read at its first index.
    pub fn from_netcdf(climate: &Climate) -> Result<Self, ResolveError> {
        if !climate.data_file.is_file() {
            return Err(ResolveError::DataNotFound(climate.data_file.clone()));
        }

        debug!("Opening climate dataset {}", climate.data_file.display());
        let file = netcdf::open(&climate.data_file)?;

        let variable = file
            .variable(&climate.variable)
            .ok_or_else(|| ResolveError::MissingVariable(climate.variable.clone()))?;

        let dim_names: Vec<String> = variable.dimensions().iter().map(|d| d.name()).collect();
        let shape: Vec<usize> = variable.dimensions().iter().map(|d| d.len()).collect();

        let find_axis = |name: &str| {
            dim_names
                .iter()
                .position(|dim| dim == name)
                .ok_or_else(|| ResolveError::MissingDimension {
                    variable: climate.variable.clone(),
                    dimension: name.to_string(),
                })
        };

        let lat_axis = find_axis(&climate.lat_name)?;
        let lon_axis = find_axis(&climate.lon_name)?;

        if lat_axis == lon_axis {
            return Err(ResolveError::MalformedGrid(
                "latitude and longitude share a dimension",
            ));
        }

        if shape.iter().any(|&len| len == 0) {
            return Err(ResolveError::MalformedGrid("variable has an empty dimension"));
        }

        let lats = read_coordinate(&file, &climate.lat_name)?;
        let lons = read_coordinate(&file, &climate.lon_name)?;

        let fill_value = read_fill_value(&variable)?;

        let raw = variable.get_values::<f64, _>(..)?;
        let field = ArrayD::from_shape_vec(IxDyn(&shape), raw)
            .map_err(|_| ResolveError::MalformedGrid("variable data does not match its shape"))?;

        // removing from the last axis keeps lower axis numbers valid
        let mut field = field.view();
        for axis in (0..shape.len()).rev() {
            if axis != lat_axis && axis != lon_axis {
                field = field.index_axis_move(Axis(axis), 0);
            }
        }

        let field = field
            .into_dimensionality::<Ix2>()
            .map_err(|_| ResolveError::MalformedGrid("variable is not two-dimensional"))?;

        let values = if lat_axis < lon_axis {
            field.to_owned()
        } else {
            field.reversed_axes().to_owned()
        };

        debug!(
            "Buffered {} field of {} lats x {} lons",
            climate.variable,
            lats.len(),
            lons.len()
        );

        ClimateGrid::new(lats, lons, values, fill_value)
    }

    /// Returns the value of the grid cell nearest to the position.
    ///
    /// Nearest index is chosen on each axis separately. Positions
    /// beyond the grid edge are clamped to the edge cell, which
    /// is only accepted when it is no further than `max_offset`
    /// degrees from the position on either axis.
    pub fn nearest_value(
        &self,
        position: Position,
        max_offset: Float,
    ) -> Result<Float, ResolveError> {
        let lat = position.lat;
        let lon = self.convert_longitude(position.lon);

        let lat_index = bisection::find_nearest(&self.lats, lat)?;
        let lon_index = bisection::find_nearest(&self.lons, lon)?;

        let offset = (self.lats[lat_index] - lat)
            .abs()
            .max((self.lons[lon_index] - lon).abs());

        debug!(
            "Nearest grid cell to N{:.3} E{:.3} is N{:.3} E{:.3}",
            lat, lon, self.lats[lat_index], self.lons[lon_index]
        );

        if offset > max_offset {
            return Err(ResolveError::OutOfDomain {
                lat: position.lat,
                lon: position.lon,
                offset,
            });
        }

        let value = self.values[[lat_index, lon_index]];

        let is_fill = self
            .fill_value
            .map_or(false, |fill| approx_eq!(Float, value, fill, ulps = 2));

        if !value.is_finite() || is_fill {
            return Err(ResolveError::MaskedCell {
                lat: position.lat,
                lon: position.lon,
            });
        }

        Ok(value)
    }

    /// Converts requested longitude to the convention
    /// used by the grid (-180..180 or 0..360).
    fn convert_longitude(&self, lon: Float) -> Float {
        let grid_max = self.lons.iter().copied().fold(Float::MIN, Float::max);

        if grid_max > 180.0 && lon < 0.0 {
            return lon + 360.0;
        }

        if grid_max <= 180.0 && lon > 180.0 {
            return lon - 360.0;
        }

        lon
    }
}

/// Reads 1D coordinate variable.
fn read_coordinate(file: &netcdf::File, name: &str) -> Result<Vec<Float>, ResolveError> {
    let variable = file
        .variable(name)
        .ok_or_else(|| ResolveError::MissingVariable(name.to_string()))?;

    Ok(variable.get_values::<f64, _>(..)?)
}

/// Reads the value marking missing data, checking
/// both attribute names used by CF conventions.
fn read_fill_value(variable: &netcdf::Variable) -> Result<Option<Float>, ResolveError> {
    for name in ["_FillValue", "missing_value"] {
        if let Some(attr) = variable.attribute(name) {
            match attr.value()? {
                AttributeValue::Double(v) => return Ok(Some(v)),
                AttributeValue::Float(v) => return Ok(Some(Float::from(v))),
                _ => {}
            }
        }
    }

    Ok(None)
}
