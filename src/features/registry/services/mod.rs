mod registry_lookup;

pub use registry_lookup::{AircraftRecord, RegistryLookup, StubRegistry, INVALID_N_NUMBER};
