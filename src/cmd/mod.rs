pub mod batch;
pub mod calculate;
pub mod schema;

use crate::core::{self, VehicleInput, VehicleRecord};
use anyhow::Context;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a single vehicle from a JSON file (or stdin with "-")
pub fn read_vehicle(path: &Path) -> anyhow::Result<VehicleInput> {
    if is_stdin(path) {
        core::read_vehicle_json(read_stdin()?.as_slice())
    } else {
        let file = open(path)?;
        core::read_vehicle_json(BufReader::new(file))
            .with_context(|| format!("Invalid vehicle JSON in {}", path.display()))
    }
}

/// Read vehicle records from a CSV or JSON file based on extension (or a JSON array on stdin with "-")
pub fn read_vehicles(path: &Path) -> anyhow::Result<Vec<VehicleRecord>> {
    if is_stdin(path) {
        return core::read_vehicles_json(read_stdin()?.as_slice());
    }

    let reader = BufReader::new(open(path)?);
    let vehicles = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => core::read_vehicles_json(reader),
        // Default to CSV for .csv files and any other extension
        _ => core::read_vehicles_csv(reader),
    };
    vehicles.with_context(|| format!("Invalid vehicle data in {}", path.display()))
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn open(path: &Path) -> anyhow::Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }
    Ok(buffer)
}
