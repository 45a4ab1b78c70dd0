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

//! Module with the single-site initialisation steps.
//!
//! Resolving the boundary condition and writing the run configuration
//! depend on each other, while the initial profile can be written
//! on its own. Every step either fully succeeds or leaves no new
//! file behind.

use crate::climate;
use crate::configuration::Config;
use crate::constants::RUN_CONFIG_FILE;
use crate::errors::SpinupError;
use crate::output::{self, profile, run_config, run_config::SchemaVariant};
use crate::site::{Position, Site, SiteId};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Resolves the boundary temperature at the site and writes `run.ini`.
pub fn write_run_config(
    config: &Config,
    site_id: &SiteId,
    position: Position,
    schema: SchemaVariant,
    output_dir: &Path,
) -> Result<PathBuf, SpinupError> {
    info!("Preparing run configuration for site {}", site_id);

    let temperature = climate::resolve(&config.climate, position)?;
    let path = run_config::write(site_id, temperature, schema, output_dir)?;

    Ok(path)
}

/// Writes the empty initial profile of the site.
pub fn write_initial_profile(site: &Site, output_dir: &Path) -> Result<PathBuf, SpinupError> {
    info!("Preparing initial profile for site {}", site.id);

    let path = profile::write(site, output_dir)?;

    Ok(path)
}

/// Writes both the run configuration and the initial profile.
///
/// Both files are assembled before anything is written,
/// and are then written together so that a failure leaves
/// neither of them.
pub fn initialise(
    config: &Config,
    site: &Site,
    schema: SchemaVariant,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, SpinupError> {
    info!("Initialising site {}", site.id);

    let temperature = climate::resolve(&config.climate, site.position)?;

    debug!("Assembling {:?} run configuration and initial profile", schema);
    let run_ini = run_config::build(&site.id, temperature, schema).render();
    let sno = profile::build(site).render();
    let sno_name = profile::file_name(site);

    let paths = output::write_files(
        output_dir,
        &[(RUN_CONFIG_FILE, run_ini.as_str()), (sno_name.as_str(), sno.as_str())],
    )?;

    Ok(paths)
}
