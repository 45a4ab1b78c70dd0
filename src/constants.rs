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

//! Module containing constants written into generated files
//! and defaults used when no configuration is provided.

use crate::Float;

/// Name of the generated run configuration file.
pub const RUN_CONFIG_FILE: &str = "run.ini";

/// Extension of meteorological forcing files read by the simulator.
pub const METEO_EXTENSION: &str = "smet";

/// Extension of snow profile files.
pub const PROFILE_EXTENSION: &str = "sno";

/// Shared base configuration imported by every run.
pub const BASE_CONFIG: &str = "./base.ini";

pub const BUFF_CHUNK_SIZE: i64 = 370;

pub const BUFF_BEFORE: Float = 1.5;

/// Directory (relative to the run) with forcing and profile files.
pub const INPUT_DIR: &str = "./";

/// Directory (relative to the run) where the simulator writes results.
pub const OUTPUT_DIR: &str = "../output/";

/// First line of every SMET file.
pub const SMET_SIGNATURE: &str = "SMET 1.1 ASCII";

/// Prefix of the short station label, followed by the station index.
pub const STATION_ID_PREFIX: &str = "VIR";

/// Prefix of the station display name, followed by the station index.
pub const STATION_NAME_PREFIX: &str = "Virtual_Station_";

pub const NODATA: i64 = -999;

/// Timezone offset (hours) of virtual stations.
pub const TIMEZONE: i64 = 1;

/// Label of the reanalysis the virtual stations are built from.
pub const DATA_SOURCE: &str = "MERRA-2";

/// Climate dataset used when no other is configured.
pub const DEFAULT_DATA_FILE: &str = "/pl/active/nasa_smb/MERRA2/yearly_files/TS_mean_1980_2017.nc";

/// Long-term mean surface temperature variable in the default dataset.
pub const DEFAULT_VARIABLE: &str = "TS";

/// Largest allowed distance (in degrees, per axis) between
/// requested position and the selected grid cell.
///
/// MERRA-2 grid spacing is 0.5 x 0.625 deg, so any position
/// inside the grid is always well within this limit.
pub const DEFAULT_MAX_OFFSET: Float = 1.0;
