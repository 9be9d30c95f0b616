//! Code for reading the wide per-round burn tables written by the fire simulation.
//!
//! Each table has a header line followed by one line per grid cell: `column,row,v2,v3,...`. The
//! value in field `k` (counting from 0) belongs to round `k` and blank fields mean the cell didn't
//! burn in that round. In the burn intensity table the value is the ID of the iteration in which
//! the cell burned; the rate of spread and fire intensity tables give the corresponding values.
use super::{input_err_msg, parse_integral};
use crate::burn::BurnRecord;
use crate::id::IterationID;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;

const BURN_INTENSITY_FILE_NAME: &str = "_BI.csv";
const RATE_OF_SPREAD_FILE_NAME: &str = "_ROSRaw.csv";
const FIRE_INTENSITY_FILE_NAME: &str = "_FIRaw.csv";

/// Identifies a value in a wide table: (column, row, round)
type CellRound = (u32, u32, u32);

/// Read the burn intensity, rate of spread and fire intensity tables and merge them.
///
/// # Arguments
///
/// * `dataset_dir` - Folder containing the dataset files
///
/// # Returns
///
/// One [`BurnRecord`] for each value in the burn intensity table.
pub fn read_burn_records(dataset_dir: &Path) -> Result<Vec<BurnRecord>> {
    let file_path = dataset_dir.join(BURN_INTENSITY_FILE_NAME);
    let burn_intensity = read_wide_csv(&file_path)?;
    let ros = read_value_table(&dataset_dir.join(RATE_OF_SPREAD_FILE_NAME))?;
    let fi = read_value_table(&dataset_dir.join(FIRE_INTENSITY_FILE_NAME))?;

    burn_intensity
        .into_iter()
        .map(|(key @ (column, row, round), value)| -> Result<_> {
            let iteration_id = parse_integral(&value)
                .with_context(|| format!("Invalid iteration ID for cell ({column}, {row})"))
                .with_context(|| input_err_msg(&file_path))?;

            Ok(BurnRecord {
                column,
                row,
                round,
                iteration_id: IterationID(iteration_id),
                ros: ros.get(&key).copied(),
                fi: fi.get(&key).copied(),
            })
        })
        .collect()
}

/// Read a wide table of numeric values, keyed by cell and round
fn read_value_table(file_path: &Path) -> Result<HashMap<CellRound, f64>> {
    read_wide_csv(file_path)?
        .into_iter()
        .map(|(key, value)| -> Result<_> {
            let value = value
                .parse::<f64>()
                .with_context(|| format!("'{value}' is not a number"))
                .with_context(|| input_err_msg(file_path))?;
            Ok((key, value))
        })
        .collect()
}

/// Read a wide per-round table in long form.
///
/// Blank values are skipped; all other values are returned unparsed.
fn read_wide_csv(file_path: &Path) -> Result<Vec<(CellRound, String)>> {
    read_wide_csv_inner(file_path).with_context(|| input_err_msg(file_path))
}

fn read_wide_csv_inner(file_path: &Path) -> Result<Vec<(CellRound, String)>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(file_path)?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter();
        let column = parse_integral(fields.next().unwrap_or_default())
            .context("Invalid grid column")?;
        let row = parse_integral(fields.next().unwrap_or_default()).context("Invalid grid row")?;

        for (round, value) in (2..).zip(fields) {
            if !value.is_empty() {
                values.push(((column, row, round), value.to_string()));
            }
        }
    }

    Ok(values)
}
