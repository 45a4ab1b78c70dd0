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

use std::path::PathBuf;
use thiserror::Error;

use crate::Float;

#[derive(Error, Debug)]
pub enum SpinupError {
    #[error("Error while reading configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Incorrect site description: {0}")]
    Site(#[from] SiteError),

    #[error("Boundary condition lookup failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Cannot write output: {0}")]
    Write(#[from] WriteError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot open configuration file: {0}")]
    CantOpenFile(#[from] std::io::Error),

    #[error("Cannot deserialize configuration file: {0}")]
    CantDeserialize(#[from] serde_yaml::Error),

    #[error("Configuration component is out of bounds {0}")]
    OutOfBounds(&'static str),
}

#[derive(Error, Debug, PartialEq)]
pub enum SiteError {
    #[error("Site identifier cannot be empty")]
    EmptyIdentifier,

    #[error("Site identifier {0} does not end with a station index digit")]
    MissingStationIndex(String),

    #[error("Site component is out of bounds: {0}")]
    OutOfBounds(&'static str),
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Climate dataset {0} does not exist")]
    DataNotFound(PathBuf),

    #[error("Variable {0} not found in the climate dataset")]
    MissingVariable(String),

    #[error("Variable {variable} has no {dimension} dimension")]
    MissingDimension { variable: String, dimension: String },

    #[error("Climate grid is malformed: {0}")]
    MalformedGrid(&'static str),

    #[error("Grid cell nearest to lat {lat} lon {lon} holds no data")]
    MaskedCell { lat: Float, lon: Float },

    #[error("Position lat {lat} lon {lon} is {offset:.3} deg away from the nearest grid cell")]
    OutOfDomain { lat: Float, lon: Float, offset: Float },

    #[error("Cannot read the climate dataset: {0}")]
    CantRead(#[from] netcdf::Error),

    #[error("Error while searching the grid axis: {0}")]
    Search(#[from] SearchError),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("Searched array is empty")]
    EmptyArray,

    #[error("Searched array is not strictly monotonic")]
    NotMonotonic,
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Output directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("Cannot create temporary file in {path}: {source}")]
    CantCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    CantWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot move finished file to {path}: {source}")]
    CantPersist {
        path: PathBuf,
        source: std::io::Error,
    },
}
