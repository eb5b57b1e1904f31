use automaks_derive::FieldSchema;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;

/// Factor converting an NEDC CO2 figure to its WLTP equivalent
pub const NEDC_TO_WLTP_FACTOR: Decimal = dec!(1.24);

/// Description of an input field, generated by `#[derive(FieldSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Vehicle category as used on the registration certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum VehicleCategory {
    /// Passenger cars with up to eight seats, not including the driver's seat
    M1,
    /// Off-road passenger cars with up to eight seats, not including the driver's seat
    M1G,
    /// Vehicles for the carriage of goods with a maximum mass not exceeding 3.5 tonnes
    N1,
    /// Off-road vehicles for the carriage of goods with a maximum mass not exceeding 3.5 tonnes
    N1G,
    /// Two-wheel motorcycles with or without a sidecar
    L3e,
    /// Two-wheel motorcycles with a sidecar
    L4e,
    /// Motor tricycles
    L5e,
    /// Light quadricycles with an unladen mass not exceeding 350 kg
    L6e,
    /// Quadricycles other than light quadricycles
    L7e,
    /// Special purpose M category vehicles other than M1
    MS2,
    /// Trailers for the carriage of goods with a maximum mass not exceeding 0.75 tonnes
    T1b,
    /// Tractors with a maximum design speed not exceeding 40 km/h
    T3,
    /// Commercial trailers with a maximum mass exceeding 3.5 tonnes
    T5,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 13] = [
        VehicleCategory::M1,
        VehicleCategory::M1G,
        VehicleCategory::N1,
        VehicleCategory::N1G,
        VehicleCategory::L3e,
        VehicleCategory::L4e,
        VehicleCategory::L5e,
        VehicleCategory::L6e,
        VehicleCategory::L7e,
        VehicleCategory::MS2,
        VehicleCategory::T1b,
        VehicleCategory::T3,
        VehicleCategory::T5,
    ];

    /// Goods-carrying categories, for which the full mass may be omitted
    pub const GOODS: [VehicleCategory; 2] = [VehicleCategory::N1, VehicleCategory::N1G];

    pub fn is_goods_carrying(self) -> bool {
        Self::GOODS.contains(&self)
    }

    pub fn code(self) -> &'static str {
        match self {
            VehicleCategory::M1 => "M1",
            VehicleCategory::M1G => "M1G",
            VehicleCategory::N1 => "N1",
            VehicleCategory::N1G => "N1G",
            VehicleCategory::L3e => "L3e",
            VehicleCategory::L4e => "L4e",
            VehicleCategory::L5e => "L5e",
            VehicleCategory::L6e => "L6e",
            VehicleCategory::L7e => "L7e",
            VehicleCategory::MS2 => "MS2",
            VehicleCategory::T1b => "T1b",
            VehicleCategory::T3 => "T3",
            VehicleCategory::T5 => "T5",
        }
    }

    pub fn from_code(s: &str) -> Option<VehicleCategory> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Test procedure the CO2 figure was measured under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum EmissionStandard {
    /// Worldwide Harmonized Light Vehicles Test Procedure
    WLTP,
    /// New European Driving Cycle
    NEDC,
}

impl EmissionStandard {
    /// Convert a figure measured under this standard to WLTP
    pub fn to_wltp(self, grams_per_km: Decimal) -> Decimal {
        match self {
            EmissionStandard::WLTP => grams_per_km,
            EmissionStandard::NEDC => grams_per_km * NEDC_TO_WLTP_FACTOR,
        }
    }
}

/// Description of a single vehicle to be taxed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, FieldSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    /// CO2 emissions in g/km; omit to derive the CO2 component from engine specs
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub co2_emissions: Option<Decimal>,
    /// Full (maximum permitted) mass in kg; may be omitted for N1/N1G
    #[serde(default)]
    pub full_mass: Option<u32>,
    /// Year of manufacture
    pub year: i32,
    /// Engine capacity in cubic centimetres
    #[serde(default)]
    pub engine_capacity: Option<u32>,
    /// Engine power in horsepower
    #[serde(default)]
    pub engine_power: Option<u32>,
    /// Vehicle category (M1, M1G, N1, N1G, L3e..L7e, MS2, T1b, T3, T5)
    #[serde(alias = "carType")]
    pub category: VehicleCategory,
    /// Whether the vehicle is fully electric; blank or null means false
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub electric: bool,
    /// CO2 measurement standard (WLTP or NEDC); required with co2Emissions
    #[serde(default, alias = "co2Type")]
    pub emission_standard: Option<EmissionStandard>,
}

impl VehicleInput {
    /// Minimal vehicle of the given category and year
    pub fn new(category: VehicleCategory, year: i32) -> Self {
        VehicleInput {
            co2_emissions: None,
            full_mass: None,
            year,
            engine_capacity: None,
            engine_power: None,
            category,
            electric: false,
            emission_standard: None,
        }
    }

    /// CO2 emissions on a WLTP basis, or `None` when no CO2 figure applies.
    ///
    /// Electric vehicles never have CO2 emissions for tax purposes, whatever
    /// was supplied. A figure without a standard is taken as WLTP; the
    /// validator rejects that combination before any calculation.
    pub fn wltp_emissions(&self) -> Option<Decimal> {
        if self.electric {
            return None;
        }
        let co2 = self.co2_emissions?;
        Some(match self.emission_standard {
            Some(standard) => standard.to_wltp(co2),
            None => co2,
        })
    }

    /// Full mass in kg; zero when absent
    pub fn mass_kg(&self) -> Decimal {
        Decimal::from(self.full_mass.unwrap_or_default())
    }
}

/// A record from a batch source that could not be read as a vehicle
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MalformedRecord(String);

/// One batch record: the vehicle, or why it could not be read
pub type VehicleRecord = Result<VehicleInput, MalformedRecord>;

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let flag: Option<bool> = Deserialize::deserialize(deserializer)?;
    Ok(flag.unwrap_or_default())
}

/// Read a single vehicle from JSON
pub fn read_vehicle_json<R: Read>(reader: R) -> anyhow::Result<VehicleInput> {
    let vehicle = serde_json::from_reader(reader)?;
    Ok(vehicle)
}

/// Read a JSON array of vehicles.
///
/// The array itself must be valid JSON; each element is decoded on its own
/// so one bad element does not hide the others.
pub fn read_vehicles_json<R: Read>(reader: R) -> anyhow::Result<Vec<VehicleRecord>> {
    let values: Vec<serde_json::Value> = serde_json::from_reader(reader)?;
    let records = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value(value)
                .map_err(|err| MalformedRecord(format!("record {}: {}", i + 1, err)))
        })
        .collect();
    Ok(records)
}

/// Read vehicles from CSV with a camelCase header row.
///
/// Rows that fail to deserialize are kept as [`MalformedRecord`]s. A bad
/// header or an I/O failure aborts the read.
pub fn read_vehicles_csv<R: Read>(reader: R) -> anyhow::Result<Vec<VehicleRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.headers()?;
    let mut records = Vec::new();
    for result in rdr.deserialize::<VehicleInput>() {
        match result {
            Ok(vehicle) => records.push(Ok(vehicle)),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => records.push(Err(MalformedRecord(err.to_string()))),
        }
    }
    let malformed = records.iter().filter(|r| r.is_err()).count();
    log::info!(
        "Read {} csv records ({} malformed)",
        records.len(),
        malformed
    );
    Ok(records)
}
