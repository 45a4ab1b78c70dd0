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

//! Module with the description of a simulated site.
//!
//! Sites are identified by a string which always ends with
//! a single digit station index (eg. `VIR7`, `A1`). That index
//! is used to name the virtual station in the initial profile,
//! so the identifier is parsed and checked before anything is written.

use crate::errors::SiteError;
use crate::Float;
use std::fmt;
use std::str::FromStr;

/// Site identifier split into a free-form prefix and
/// the trailing station index.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SiteId {
    pub prefix: String,
    pub index: char,
}

impl FromStr for SiteId {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();

        let index = chars.next_back().ok_or(SiteError::EmptyIdentifier)?;

        if !index.is_ascii_digit() {
            return Err(SiteError::MissingStationIndex(s.to_string()));
        }

        Ok(SiteId {
            prefix: chars.as_str().to_string(),
            index,
        })
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.index)
    }
}

/// Geographic position in degrees.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Position {
    pub lat: Float,
    pub lon: Float,
}

impl Position {
    /// Checks if position follows the conventions. Longitudes
    /// in both -180..180 and 0..360 conventions are accepted.
    pub fn new(lat: Float, lon: Float) -> Result<Self, SiteError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(SiteError::OutOfBounds("Latitude is too low or too high"));
        }

        if !(-180.0..=360.0).contains(&lon) {
            return Err(SiteError::OutOfBounds("Longitude is too low or too high"));
        }

        Ok(Position { lat, lon })
    }
}

/// Everything known about a site needed to write its initial profile.
///
/// The start time is an opaque string and is passed to the
/// simulator exactly as received.
#[derive(Clone, PartialEq, Debug)]
pub struct Site {
    pub id: SiteId,
    pub position: Position,
    pub altitude: Float,
    pub start_time: String,
}

impl Site {
    pub fn new(
        id: SiteId,
        position: Position,
        altitude: Float,
        start_time: &str,
    ) -> Result<Self, SiteError> {
        if !altitude.is_finite() {
            return Err(SiteError::OutOfBounds("Altitude is not finite"));
        }

        Ok(Site {
            id,
            position,
            altitude,
            start_time: start_time.to_string(),
        })
    }
}
