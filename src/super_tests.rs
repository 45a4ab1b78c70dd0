//! This is a module for integration tests of the whole
//! site initialisation, with access to private modules.
//!
//! Every test creates a small NetCDF climate dataset covering
//! part of Greenland, so no input data needs to be shipped
//! with the repository.

use crate::configuration::{Climate, Config};
use crate::errors::{ResolveError, SpinupError};
use crate::output::run_config::SchemaVariant;
use crate::pipeline;
use crate::site::{Position, Site, SiteId};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const LATS: [f64; 5] = [60.0, 62.5, 65.0, 67.5, 70.0];
const LONS: [f64; 4] = [-45.0, -42.5, -40.0, -37.5];
const FILL: f32 = 1.0e15;

/// Value stored in the cell, or fill value in the south-west corner.
fn cell_value(lat_i: usize, lon_i: usize) -> f32 {
    if lat_i == 0 && lon_i == 0 {
        return FILL;
    }

    200.0 + 10.0 * lat_i as f32 + lon_i as f32
}

/// Writes the dataset with `TS(time, lat, lon)` and
/// the same field transposed as `TS_T(lon, lat)`.
fn create_dataset(path: &Path) {
    let mut file = netcdf::create(path).unwrap();

    file.add_dimension("time", 1).unwrap();
    file.add_dimension("lat", LATS.len()).unwrap();
    file.add_dimension("lon", LONS.len()).unwrap();

    {
        let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
        lat.put_values(&LATS, ..).unwrap();
    }

    {
        let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
        lon.put_values(&LONS, ..).unwrap();
    }

    {
        let mut ts = file
            .add_variable::<f32>("TS", &["time", "lat", "lon"])
            .unwrap();
        ts.put_attribute("_FillValue", FILL).unwrap();
        ts.put_attribute("units", "K").unwrap();

        let mut data = Vec::with_capacity(LATS.len() * LONS.len());
        for i in 0..LATS.len() {
            for j in 0..LONS.len() {
                data.push(cell_value(i, j));
            }
        }
        ts.put_values(&data, ..).unwrap();
    }

    {
        let mut ts = file.add_variable::<f32>("TS_T", &["lon", "lat"]).unwrap();
        ts.put_attribute("_FillValue", FILL).unwrap();

        let mut data = Vec::with_capacity(LATS.len() * LONS.len());
        for j in 0..LONS.len() {
            for i in 0..LATS.len() {
                data.push(cell_value(i, j));
            }
        }
        ts.put_values(&data, ..).unwrap();
    }
}

fn config_for(data_file: PathBuf, variable: &str) -> Config {
    Config {
        climate: Climate {
            data_file,
            variable: variable.to_string(),
            ..Climate::default()
        },
        schema: SchemaVariant::Current,
    }
}

fn greenland_site() -> Site {
    Site::new(
        "VIR7".parse().unwrap(),
        Position::new(68.0, -40.0).unwrap(),
        3200.0,
        "1980-01-01T00:00",
    )
    .unwrap()
}

#[test]
fn resolve_from_netcdf() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("ts_mean.nc");
    create_dataset(&data_file);

    for variable in ["TS", "TS_T"] {
        let config = config_for(data_file.clone(), variable);

        let value = crate::climate::resolve(&config.climate, Position::new(68.0, -40.0).unwrap())
            .unwrap();
        assert!((value - 232.0).abs() < 1e-9, "{} gave {}", variable, value);

        let value = crate::climate::resolve(&config.climate, Position::new(63.0, -38.0).unwrap())
            .unwrap();
        assert!((value - 213.0).abs() < 1e-9, "{} gave {}", variable, value);
    }
}

#[test]
fn run_config_from_dataset() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("ts_mean.nc");
    create_dataset(&data_file);

    let out_dir = dir.path().join("run");
    fs::create_dir(&out_dir).unwrap();

    let config = config_for(data_file, "TS");
    let site_id: SiteId = "VIR7".parse().unwrap();
    let position = Position::new(68.0, -40.0).unwrap();

    let path =
        pipeline::write_run_config(&config, &site_id, position, SchemaVariant::Legacy, &out_dir)
            .unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(text.contains("TSG::cst::value = 232.0\n"));
    assert!(text.contains("STATION1 = VIR7.smet\n"));
    assert!(text.contains("SNOWFILE1 = VIR7.sno\n"));

    pipeline::write_run_config(&config, &site_id, position, SchemaVariant::Current, &out_dir)
        .unwrap();
    let text = fs::read_to_string(&path).unwrap();

    assert!(text.contains("TSG::arg1::value = 232.0\n"));
    assert!(text.contains("RH::generator1 = HUMIDITY\n"));
}

#[test]
fn initialise_writes_both_files() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("ts_mean.nc");
    create_dataset(&data_file);

    let out_dir = dir.path().join("run");
    fs::create_dir(&out_dir).unwrap();

    let config = config_for(data_file, "TS");
    let site = greenland_site();

    let paths = pipeline::initialise(&config, &site, SchemaVariant::Current, &out_dir).unwrap();

    assert_eq!(paths, vec![out_dir.join("run.ini"), out_dir.join("VIR7.sno")]);

    let sno = fs::read_to_string(out_dir.join("VIR7.sno")).unwrap();
    assert!(sno.contains("station_id = VIR7\n"));
    assert!(sno.contains("altitude = 3200\n"));

    let first = fs::read(out_dir.join("run.ini")).unwrap();
    pipeline::initialise(&config, &site, SchemaVariant::Current, &out_dir).unwrap();
    let second = fs::read(out_dir.join("run.ini")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn failed_lookup_writes_nothing() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("ts_mean.nc");
    create_dataset(&data_file);

    let out_dir = dir.path().join("run");
    fs::create_dir(&out_dir).unwrap();

    let config = config_for(data_file, "TS");
    let site = Site::new(
        "VIR1".parse().unwrap(),
        Position::new(60.0, -45.0).unwrap(),
        1000.0,
        "1980-01-01T00:00",
    )
    .unwrap();

    let result = pipeline::initialise(&config, &site, SchemaVariant::Legacy, &out_dir);

    assert!(matches!(
        result,
        Err(SpinupError::Resolve(ResolveError::MaskedCell { .. }))
    ));
    assert_eq!(fs::read_dir(&out_dir).unwrap().count(), 0);
}

#[test]
fn missing_dataset() {
    let dir = tempdir().unwrap();
    let config = config_for(dir.path().join("absent.nc"), "TS");

    let result = crate::climate::resolve(&config.climate, Position::new(68.0, -40.0).unwrap());

    assert!(matches!(result, Err(ResolveError::DataNotFound(_))));
}

#[test]
fn missing_variable_and_dimension() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("ts_mean.nc");
    create_dataset(&data_file);

    let config = config_for(data_file.clone(), "T2M");
    let result = crate::climate::resolve(&config.climate, Position::new(68.0, -40.0).unwrap());
    assert!(matches!(result, Err(ResolveError::MissingVariable(_))));

    let mut config = config_for(data_file, "TS");
    config.climate.lat_name = "latitude".to_string();
    let result = crate::climate::resolve(&config.climate, Position::new(68.0, -40.0).unwrap());
    assert!(matches!(result, Err(ResolveError::MissingDimension { .. })));
}

#[test]
fn position_outside_domain() {
    let dir = tempdir().unwrap();
    let data_file = dir.path().join("ts_mean.nc");
    create_dataset(&data_file);

    let config = config_for(data_file, "TS");

    let result = crate::climate::resolve(&config.climate, Position::new(-75.0, 123.0).unwrap());
    assert!(matches!(result, Err(ResolveError::OutOfDomain { .. })));
}
