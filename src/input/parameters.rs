//! Defines the `DatasetParameters` struct, which represents the contents of `fireplain.toml`.
use crate::geometry::Grid;
use crate::input::{input_err_msg, read_toml};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const DATASET_PARAMETERS_FILE_NAME: &str = "fireplain.toml";

/// Default tolerance used when comparing distances from the ignition point
const fn default_tie_tolerance() -> f64 {
    0.0
}

/// Represents the contents of the entire dataset parameters file.
#[derive(Debug, Deserialize, PartialEq)]
pub struct DatasetParameters {
    /// Circumradius of the hexagons (centre to vertex), in map units
    pub hex_radius: f64,
    /// Distances from the ignition point which differ by no more than this are treated as equal.
    ///
    /// Arcs whose ends are equally far from the ignition point are left out of the spread graphs.
    #[serde(default = "default_tie_tolerance")]
    pub tie_tolerance: f64,
    /// The grid on which the fire simulation was run
    pub grid: Grid,
}

/// Check that a length parameter is a finite number greater than zero
fn check_positive_length(name: &str, value: f64) -> Result<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        "{name} must be a finite number greater than zero"
    );

    Ok(())
}

impl DatasetParameters {
    /// Read a dataset parameters file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `dataset_dir` - Folder containing the dataset files
    ///
    /// # Returns
    ///
    /// The file contents as a [`DatasetParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(dataset_dir: P) -> Result<DatasetParameters> {
        let file_path = dataset_dir.as_ref().join(DATASET_PARAMETERS_FILE_NAME);
        let parameters: DatasetParameters = read_toml(&file_path)?;

        parameters
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(parameters)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_positive_length("hex_radius", self.hex_radius)?;
        check_positive_length("grid.cellsize", self.grid.cellsize)?;
        ensure!(
            self.tie_tolerance.is_finite() && self.tie_tolerance >= 0.0,
            "tie_tolerance must be a finite number which is not negative"
        );
        ensure!(
            self.grid.ncols > 0 && self.grid.nrows > 0,
            "The grid must have at least one row and one column"
        );
        ensure!(
            self.grid.xllcorner.is_finite() && self.grid.yllcorner.is_finite(),
            "The grid corner coordinates must be finite"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use rstest::{fixture, rstest};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[fixture]
    fn parameters() -> DatasetParameters {
        DatasetParameters {
            hex_radius: 1074.6,
            tie_tolerance: 0.0,
            grid: Grid {
                ncols: 1015,
                nrows: 822,
                xllcorner: 294_086.602_54,
                yllcorner: 5_977_635.577_56,
                cellsize: 100.0,
            },
        }
    }

    #[rstest]
    fn test_dataset_parameters_from_path(parameters: DatasetParameters) {
        let dir = tempdir().unwrap();
        {
            let mut file = File::create(dir.path().join(DATASET_PARAMETERS_FILE_NAME)).unwrap();
            writeln!(
                file,
                "hex_radius = 1074.6

[grid]
ncols = 1015
nrows = 822
xllcorner = 294086.60254
yllcorner = 5977635.57756
cellsize = 100.0"
            )
            .unwrap();
        }

        assert_eq!(
            DatasetParameters::from_path(dir.path()).unwrap(),
            parameters
        );
    }

    #[test]
    fn test_dataset_parameters_from_path_missing() {
        let dir = tempdir().unwrap();
        assert!(DatasetParameters::from_path(dir.path()).is_err());
    }

    #[rstest]
    fn test_validate_ok(parameters: DatasetParameters) {
        assert!(parameters.validate().is_ok());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_validate_bad_hex_radius(mut parameters: DatasetParameters, #[case] hex_radius: f64) {
        parameters.hex_radius = hex_radius;
        assert_error!(
            parameters.validate(),
            "hex_radius must be a finite number greater than zero"
        );
    }

    #[rstest]
    fn test_validate_bad_tie_tolerance(mut parameters: DatasetParameters) {
        parameters.tie_tolerance = -0.1;
        assert_error!(
            parameters.validate(),
            "tie_tolerance must be a finite number which is not negative"
        );
    }

    #[rstest]
    fn test_validate_bad_grid(mut parameters: DatasetParameters) {
        parameters.grid.nrows = 0;
        assert_error!(
            parameters.validate(),
            "The grid must have at least one row and one column"
        );
    }
}
