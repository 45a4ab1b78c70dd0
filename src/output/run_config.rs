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

//! Sub-module assembling the simulator run configuration (`run.ini`).
//!
//! The simulator accepts two configuration schemas which express
//! the same run differently. Section and key names are a compatibility
//! contract with the simulator, so each schema is described as a set of
//! fixed tables and the document is assembled from them.

use super::{write_file, Document, Section, Value};
use crate::constants::{
    BASE_CONFIG, BUFF_BEFORE, BUFF_CHUNK_SIZE, INPUT_DIR, METEO_EXTENSION, OUTPUT_DIR,
    PROFILE_EXTENSION, RUN_CONFIG_FILE,
};
use crate::errors::WriteError;
use crate::site::SiteId;
use crate::Float;
use clap::ValueEnum;
use log::debug;
use serde::Deserialize;
use std::borrow::Cow::Borrowed;
use std::path::{Path, PathBuf};

/// Run configuration schema understood by the simulator.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Direct `COPY` directive in `[INPUT]`, `TSG::cst` generator.
    Legacy,

    /// `[INPUTEDITING]` pipeline, generic generators with humidity.
    #[default]
    Current,
}

type Table = [(&'static str, Value)];

static NO_ENTRIES: [(&str, Value); 0] = [];

static LEGACY_INPUT: [(&str, Value); 1] = [("VW_DRIFT::COPY", Value::Text(Borrowed("VW")))];

static CURRENT_INPUT_EDITING: [(&str, Value); 3] = [
    ("*::edit1", Value::Text(Borrowed("COPY"))),
    ("*::arg1::dest", Value::Text(Borrowed("VW_DRIFT"))),
    ("*::arg1::src", Value::Text(Borrowed("VW"))),
];

static LEGACY_ADVANCED: [(&str, Value); 5] = [
    ("VARIANT", Value::Text(Borrowed("POLAR"))),
    ("SNOW_EROSION", Value::Text(Borrowed("REDEPOSIT"))),
    ("MAX_SIMULATED_HS", Value::Int(10)),
    ("REDUCE_N_ELEMENTS", Value::Int(2)),
    ("SNOW_EROSION_FETCH_LENGTH", Value::Int(10)),
];

static CURRENT_ADVANCED: [(&str, Value); 5] = [
    ("VARIANT", Value::Text(Borrowed("POLAR"))),
    ("SNOW_EROSION", Value::Text(Borrowed("REDEPOSIT"))),
    ("MAX_SIMULATED_HS", Value::Int(110)),
    ("REDUCE_N_ELEMENTS", Value::Int(3)),
    ("SNOW_EROSION_FETCH_LENGTH", Value::Int(10)),
];

impl SchemaVariant {
    /// Directives appended to `[INPUT]` after file references.
    fn input_directives(self) -> &'static Table {
        match self {
            SchemaVariant::Legacy => &LEGACY_INPUT,
            SchemaVariant::Current => &NO_ENTRIES,
        }
    }

    fn input_editing(self) -> Option<&'static Table> {
        match self {
            SchemaVariant::Legacy => None,
            SchemaVariant::Current => Some(&CURRENT_INPUT_EDITING),
        }
    }

    fn snowpack_advanced(self) -> &'static Table {
        match self {
            SchemaVariant::Legacy => &LEGACY_ADVANCED,
            SchemaVariant::Current => &CURRENT_ADVANCED,
        }
    }

    fn generators(self, temperature: Float) -> Section {
        let section = Section::new("GENERATORS");

        match self {
            SchemaVariant::Legacy => section.entry("TSG::cst::value", temperature),
            SchemaVariant::Current => section
                .entry("TSG::generator1", "CST")
                .entry("TSG::arg1::value", temperature)
                .entry("RH::generator1", "HUMIDITY")
                .entry("RH::arg1::type", "RH"),
        }
    }
}

/// Assembles the run configuration of the site with
/// the surface temperature boundary condition.
pub fn build(site_id: &SiteId, temperature: Float, schema: SchemaVariant) -> Document {
    let general = Section::new("GENERAL")
        .entry("IMPORT_BEFORE", BASE_CONFIG)
        .entry("BUFF_CHUNK_SIZE", BUFF_CHUNK_SIZE)
        .entry("BUFF_BEFORE", BUFF_BEFORE);

    let input = Section::new("INPUT")
        .entry("METEOPATH", INPUT_DIR)
        .entry("STATION1", format!("{}.{}", site_id, METEO_EXTENSION))
        .entry("SNOWPATH", INPUT_DIR)
        .entry("SNOWFILE1", format!("{}.{}", site_id, PROFILE_EXTENSION))
        .entries(schema.input_directives());

    let mut doc = Document::ini().section(general).section(input);

    if let Some(editing) = schema.input_editing() {
        doc = doc.section(Section::new("INPUTEDITING").entries(editing));
    }

    doc.section(Section::new("OUTPUT").entry("METEOPATH", OUTPUT_DIR))
        .section(Section::new("SNOWPACKADVANCED").entries(schema.snowpack_advanced()))
        .section(schema.generators(temperature))
}

/// Writes `run.ini` of the site into the output directory.
pub fn write(
    site_id: &SiteId,
    temperature: Float,
    schema: SchemaVariant,
    output_dir: &Path,
) -> Result<PathBuf, WriteError> {
    debug!("Writing {:?} run configuration for {}", schema, site_id);

    let contents = build(site_id, temperature, schema).render();

    write_file(output_dir, RUN_CONFIG_FILE, &contents)
}

#[cfg(test)]
mod tests {
    use super::{build, write, SchemaVariant};
    use crate::output::Value;
    use crate::site::SiteId;
    use std::fs;
    use tempfile::tempdir;

    fn section_names(text: &str) -> Vec<&str> {
        text.lines()
            .filter(|line| line.starts_with('['))
            .collect()
    }

    #[test]
    fn legacy_sections() {
        let site: SiteId = "A1".parse().unwrap();
        let text = build(&site, 250.5, SchemaVariant::Legacy).render();

        assert_eq!(
            section_names(&text),
            vec!["[GENERAL]", "[INPUT]", "[OUTPUT]", "[SNOWPACKADVANCED]", "[GENERATORS]"]
        );
    }

    #[test]
    fn current_sections() {
        let site: SiteId = "A1".parse().unwrap();
        let text = build(&site, 250.5, SchemaVariant::Current).render();

        assert_eq!(
            section_names(&text),
            vec![
                "[GENERAL]",
                "[INPUT]",
                "[INPUTEDITING]",
                "[OUTPUT]",
                "[SNOWPACKADVANCED]",
                "[GENERATORS]"
            ]
        );
    }

    #[test]
    fn legacy_contents() {
        let site: SiteId = "A1".parse().unwrap();
        let text = build(&site, 250.5, SchemaVariant::Legacy).render();

        let expected = "\
[GENERAL]
IMPORT_BEFORE = ./base.ini
BUFF_CHUNK_SIZE = 370
BUFF_BEFORE = 1.5

[INPUT]
METEOPATH = ./
STATION1 = A1.smet
SNOWPATH = ./
SNOWFILE1 = A1.sno
VW_DRIFT::COPY = VW

[OUTPUT]
METEOPATH = ../output/

[SNOWPACKADVANCED]
VARIANT = POLAR
SNOW_EROSION = REDEPOSIT
MAX_SIMULATED_HS = 10
REDUCE_N_ELEMENTS = 2
SNOW_EROSION_FETCH_LENGTH = 10

[GENERATORS]
TSG::cst::value = 250.5
";

        assert_eq!(text, expected);
        assert_eq!(text.lines().filter(|l| *l == "TSG::cst::value = 250.5").count(), 1);
        assert!(!text.contains("RH::"));
    }

    #[test]
    fn current_contents() {
        let site: SiteId = "A1".parse().unwrap();
        let text = build(&site, 250.5, SchemaVariant::Current).render();

        let expected = "\
[GENERAL]
IMPORT_BEFORE = ./base.ini
BUFF_CHUNK_SIZE = 370
BUFF_BEFORE = 1.5

[INPUT]
METEOPATH = ./
STATION1 = A1.smet
SNOWPATH = ./
SNOWFILE1 = A1.sno

[INPUTEDITING]
*::edit1 = COPY
*::arg1::dest = VW_DRIFT
*::arg1::src = VW

[OUTPUT]
METEOPATH = ../output/

[SNOWPACKADVANCED]
VARIANT = POLAR
SNOW_EROSION = REDEPOSIT
MAX_SIMULATED_HS = 110
REDUCE_N_ELEMENTS = 3
SNOW_EROSION_FETCH_LENGTH = 10

[GENERATORS]
TSG::generator1 = CST
TSG::arg1::value = 250.5
RH::generator1 = HUMIDITY
RH::arg1::type = RH
";

        assert_eq!(text, expected);
        assert!(!text.contains("VW_DRIFT::COPY"));
        assert!(!text.contains("TSG::cst"));
    }

    #[test]
    fn variant_parameters() {
        let site: SiteId = "A1".parse().unwrap();

        let legacy = build(&site, 250.5, SchemaVariant::Legacy);
        let current = build(&site, 250.5, SchemaVariant::Current);

        let advanced = |doc: &crate::output::Document| {
            let section = doc
                .sections()
                .iter()
                .find(|s| s.name() == "SNOWPACKADVANCED")
                .cloned()
                .unwrap();

            (
                section.get("MAX_SIMULATED_HS").cloned(),
                section.get("REDUCE_N_ELEMENTS").cloned(),
            )
        };

        assert_eq!(advanced(&legacy), (Some(Value::Int(10)), Some(Value::Int(2))));
        assert_eq!(advanced(&current), (Some(Value::Int(110)), Some(Value::Int(3))));
    }

    #[test]
    fn write_is_idempotent() {
        let dir = tempdir().unwrap();
        let site: SiteId = "VIR7".parse().unwrap();

        let path = write(&site, 251.25, SchemaVariant::Current, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("run.ini"));
        let first = fs::read(&path).unwrap();

        write(&site, 251.25, SchemaVariant::Current, dir.path()).unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn write_to_missing_dir() {
        let dir = tempdir().unwrap();
        let site: SiteId = "VIR7".parse().unwrap();

        let result = write(&site, 251.25, SchemaVariant::Legacy, &dir.path().join("nope"));

        assert!(result.is_err());
    }

    #[test]
    fn deserialize_variant() {
        let schema: SchemaVariant = serde_yaml::from_str("legacy").unwrap();
        assert_eq!(schema, SchemaVariant::Legacy);

        let schema: SchemaVariant = serde_yaml::from_str("current").unwrap();
        assert_eq!(schema, SchemaVariant::Current);
    }
}
