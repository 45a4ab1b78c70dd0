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

//! Snowpack Spin-up Initialiser (SPIN) prepares inputs of a single
//! point snowpack simulation at a virtual station.
//!
//! For a given site it writes two files read by the simulator:
//!
//! - `run.ini` - run configuration with the climatological surface
//!   temperature (nearest cell of a long-term mean reanalysis field)
//!   used as a constant boundary condition,
//! - `<site>.sno` - initial profile of the station without any
//!   soil or snow layers.
//!
//! Each invocation handles exactly one site. Batches of sites are
//! expected to be handled by an external job scheduler.

mod climate;
mod configuration;
mod constants;
mod errors;
mod output;
mod pipeline;
mod site;

#[cfg(test)]
mod super_tests;

use crate::configuration::Config;
use crate::errors::SpinupError;
use crate::output::run_config::SchemaVariant;
use crate::site::{Position, Site, SiteId};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process;

type Float = f64;

/// Prepares run configuration and initial profile of a snowpack simulation site.
#[derive(Parser, Debug)]
#[command(name = "spinup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML configuration file. Defaults are used when not provided.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Climate dataset to read the boundary condition from.
    /// Overrides the configuration file.
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve the boundary temperature and write run.ini.
    Ini {
        site_id: String,

        #[arg(allow_negative_numbers = true)]
        latitude: Float,

        #[arg(allow_negative_numbers = true)]
        longitude: Float,

        output_dir: PathBuf,

        /// Run configuration schema. Overrides the configuration file.
        #[arg(short, long, value_enum)]
        schema: Option<SchemaVariant>,
    },

    /// Write the empty initial profile <SITE_ID>.sno.
    Sno {
        site_id: String,

        #[arg(allow_negative_numbers = true)]
        longitude: Float,

        #[arg(allow_negative_numbers = true)]
        latitude: Float,

        #[arg(allow_negative_numbers = true)]
        altitude: Float,

        /// Profile date, written to the profile as given.
        start_time: String,

        output_dir: PathBuf,
    },

    /// Write both run.ini and <SITE_ID>.sno, or none of them on failure.
    Init {
        site_id: String,

        #[arg(allow_negative_numbers = true)]
        latitude: Float,

        #[arg(allow_negative_numbers = true)]
        longitude: Float,

        #[arg(allow_negative_numbers = true)]
        altitude: Float,

        /// Profile date, written to the profile as given.
        start_time: String,

        output_dir: PathBuf,

        /// Run configuration schema. Overrides the configuration file.
        #[arg(short, long, value_enum)]
        schema: Option<SchemaVariant>,
    },
}

/// The main program function.
/// Prepares the logger, parses arguments and runs the requested command.
///
/// Any error is logged with its full description and
/// ends the process with a non-zero exit code.
fn main() {
    #[cfg(not(feature = "debug"))]
    let logger_env = Env::new().filter_or("SPINUP_LOG_LEVEL", "info");

    #[cfg(feature = "debug")]
    let logger_env = Env::new().filter_or("SPINUP_LOG_LEVEL", "debug");

    env_logger::Builder::from_env(logger_env)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(paths) => {
            for path in paths {
                info!("Successfully wrote {}", path.display());
            }
        }
        Err(err) => {
            error!("Site initialisation failed with error: {}", err);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<Vec<PathBuf>, SpinupError> {
    let mut config = match &cli.config {
        Some(path) => Config::new_from_file(path)?,
        None => Config::default(),
    };

    if let Some(data_file) = cli.data_file {
        config.climate.data_file = data_file;
    }

    match cli.command {
        Commands::Ini {
            site_id,
            latitude,
            longitude,
            output_dir,
            schema,
        } => {
            let site_id: SiteId = site_id.parse()?;
            let position = Position::new(latitude, longitude)?;
            let schema = schema.unwrap_or(config.schema);

            let path =
                pipeline::write_run_config(&config, &site_id, position, schema, &output_dir)?;

            Ok(vec![path])
        }
        Commands::Sno {
            site_id,
            longitude,
            latitude,
            altitude,
            start_time,
            output_dir,
        } => {
            let site = Site::new(
                site_id.parse()?,
                Position::new(latitude, longitude)?,
                altitude,
                &start_time,
            )?;

            let path = pipeline::write_initial_profile(&site, &output_dir)?;

            Ok(vec![path])
        }
        Commands::Init {
            site_id,
            latitude,
            longitude,
            altitude,
            start_time,
            output_dir,
            schema,
        } => {
            let site = Site::new(
                site_id.parse()?,
                Position::new(latitude, longitude)?,
                altitude,
                &start_time,
            )?;
            let schema = schema.unwrap_or(config.schema);

            pipeline::initialise(&config, &site, schema, &output_dir)
        }
    }
}
