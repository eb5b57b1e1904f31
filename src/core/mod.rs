pub mod result;
pub mod validation;
pub mod vehicle;

// Flat public surface for domain types and functions.
pub use result::TaxResult;
pub use validation::{validate, ValidationErrors};
pub use vehicle::{
    read_vehicle_json, read_vehicles_csv, read_vehicles_json, EmissionStandard, MalformedRecord,
    VehicleCategory, VehicleInput, VehicleRecord,
};
