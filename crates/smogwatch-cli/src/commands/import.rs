//! Import command - load a CSV file into the database.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::{OutputArgs, OutputFormat};
use crate::format::format_import_text;
use crate::util::{open_store, write_output};

use super::GlobalArgs;

pub fn cmd_import(
    file: &Path,
    sensor: &str,
    location: Option<&str>,
    output: &OutputArgs,
    global: GlobalArgs<'_>,
) -> Result<()> {
    let sensor = sensor.trim();
    if sensor.is_empty() {
        bail!("Sensor ID cannot be empty");
    }

    let store = open_store(global.database)?;
    if location.is_some() {
        store.upsert_sensor(sensor, location)?;
    }

    let result = store
        .import_csv_file(file, sensor)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    let opts = global.format_options(output.compact);
    let content = match output.format {
        OutputFormat::Json => opts.as_json(&result)?,
        OutputFormat::Text => format_import_text(&result, sensor),
    };
    write_output(global.output, &content)?;

    if result.imported == 0 && result.skipped > 0 {
        bail!("No rows imported from {}", file.display());
    }
    Ok(())
}
