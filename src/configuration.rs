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

//! Module responsible for parsing and checking the configuration file.
//!
//! The configuration file uses [YAML](https://en.wikipedia.org/wiki/YAML)
//! and `serde` to enforce strong typing and automatic type checking.
//! Every field is optional, so the tool works without any
//! configuration file and with the defaults used for MERRA-2 sites.
//!
//! The structures and their fields in this module directly correspond to
//! the fields inside the configuration file.

use crate::constants::{DEFAULT_DATA_FILE, DEFAULT_MAX_OFFSET, DEFAULT_VARIABLE};
use crate::errors::ConfigError;
use crate::output::run_config::SchemaVariant;
use crate::Float;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Fields with information about the climate dataset
/// from which the boundary condition is read.
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(default)]
pub struct Climate {
    /// Path to the NetCDF file with long-term mean
    /// surface temperature.
    pub data_file: PathBuf,

    /// Name of the surface temperature variable.
    ///
    /// Defaults to `TS`.
    pub variable: String,

    /// Name of the latitude dimension and coordinate variable.
    pub lat_name: String,

    /// Name of the longitude dimension and coordinate variable.
    pub lon_name: String,

    /// Largest distance (in degrees) on each axis between the
    /// requested position and the nearest grid cell.
    ///
    /// Positions outside the grid are clamped to the edge cell,
    /// so this limit is what rejects them. Must be positive.
    pub max_offset: Float,
}

impl Climate {
    /// Checks if the dataset description is usable.
    pub fn check_bounds(&self) -> Result<(), ConfigError> {
        if !self.max_offset.is_finite() || self.max_offset <= 0.0 {
            return Err(ConfigError::OutOfBounds(
                "Maximum grid offset must be a positive number",
            ));
        }

        if self.variable.is_empty() || self.lat_name.is_empty() || self.lon_name.is_empty() {
            return Err(ConfigError::OutOfBounds(
                "Variable and dimension names cannot be empty",
            ));
        }

        Ok(())
    }
}

impl Default for Climate {
    fn default() -> Self {
        Climate {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            variable: DEFAULT_VARIABLE.to_string(),
            lat_name: "lat".to_string(),
            lon_name: "lon".to_string(),
            max_offset: DEFAULT_MAX_OFFSET,
        }
    }
}

/// Main config structure representing the fields in
/// configuration file.
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub climate: Climate,

    /// Run configuration schema expected by the simulator.
    pub schema: SchemaVariant,
}

impl Config {
    /// Config structure constructor, responsible for
    /// deserializing configuration and checking it.
    pub fn new_from_file(file_path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read(file_path)?;
        let config: Config = serde_yaml::from_slice(data.as_slice())?;

        config.climate.check_bounds()?;

        Ok(config)
    }
}
