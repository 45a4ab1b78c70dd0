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

//! Sub-module assembling the initial snow profile (`<site>.sno`).
//!
//! The simulation starts from bare ground, so the profile
//! has no soil and no snow layers: the header declares zero
//! layers and the `[DATA]` section is left empty.

use super::{write_file, Document, Section, Value};
use crate::constants::{
    DATA_SOURCE, NODATA, PROFILE_EXTENSION, SMET_SIGNATURE, STATION_ID_PREFIX,
    STATION_NAME_PREFIX, TIMEZONE,
};
use crate::errors::WriteError;
use crate::site::Site;
use log::debug;
use std::borrow::Cow::Borrowed;
use std::path::{Path, PathBuf};

/// Initial state of the virtual station, the same for every site.
static BARE_GROUND: [(&str, Value); 13] = [
    ("HS_Last", Value::Text(Borrowed("0.0000"))),
    ("SlopeAngle", Value::Text(Borrowed("0.0"))),
    ("SlopeAzi", Value::Text(Borrowed("0.0"))),
    ("nSoilLayerData", Value::Int(0)),
    ("nSnowLayerData", Value::Int(0)),
    ("SoilAlbedo", Value::Text(Borrowed("0.09"))),
    ("ErosionLevel", Value::Int(0)),
    ("TimeCountDeltaHS", Value::Text(Borrowed("0.000000"))),
    ("BareSoil_z0", Value::Text(Borrowed("0.200"))),
    ("CanopyHeight", Value::Text(Borrowed("0.00"))),
    ("CanopyLeafAreaIndex", Value::Text(Borrowed("0.00"))),
    ("CanopyDirectThroughfall", Value::Text(Borrowed("1.00"))),
    ("WindScalingFactor", Value::Text(Borrowed("1.00"))),
];

/// Columns of layer records.
const LAYER_FIELDS: [&str; 19] = [
    "timestamp",
    "Layer_Thick",
    "T",
    "Vol_Frac_I",
    "Vol_Frac_W",
    "Vol_Frac_V",
    "Vol_Frac_S",
    "Rho_S",
    "Conduc_S",
    "HeatCapac_S",
    "rg",
    "rb",
    "dd",
    "sp",
    "mk",
    "mass_hoar",
    "ne",
    "CDot",
    "metamo",
];

/// Name of the profile file of the site.
pub fn file_name(site: &Site) -> String {
    format!("{}.{}", site.id, PROFILE_EXTENSION)
}

/// Assembles the empty initial profile of the site.
pub fn build(site: &Site) -> Document {
    let header = Section::new("HEADER")
        .entry("station_id", format!("{}{}", STATION_ID_PREFIX, site.id.index))
        .entry("station_name", format!("{}{}", STATION_NAME_PREFIX, site.id.index))
        .entry("longitude", site.position.lon)
        .entry("latitude", site.position.lat)
        .entry("altitude", Value::compact(site.altitude))
        .entry("nodata", NODATA)
        .entry("tz", TIMEZONE)
        .entry("source", DATA_SOURCE)
        .entry("ProfileDate", site.start_time.clone())
        .entries(&BARE_GROUND)
        .entry("fields", LAYER_FIELDS.join(" "));

    Document::smet(SMET_SIGNATURE)
        .section(header)
        .section(Section::new("DATA"))
}

/// Writes `<site>.sno` into the output directory.
pub fn write(site: &Site, output_dir: &Path) -> Result<PathBuf, WriteError> {
    debug!("Writing initial profile for {}", site.id);

    let contents = build(site).render();

    write_file(output_dir, &file_name(site), &contents)
}
