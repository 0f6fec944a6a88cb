use std::collections::HashMap;

use crate::core::error::{AppError, Result};
use crate::features::airports::models::Airport;

/// Dataset compiled into the binary, used when no `AIRPORTS_FILE` is configured
const EMBEDDED_AIRPORTS: &str = include_str!("../../../../data/airports.json");

/// In-memory airport table keyed by upper-case code
pub struct AirportService {
    by_code: HashMap<String, Airport>,
    /// Same airports ordered by code, for listings
    sorted: Vec<Airport>,
}

impl AirportService {
    /// Load from `path` when given, otherwise from the embedded dataset
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Internal(format!("Failed to read airports file '{}': {}", path, e))
                })?;
                tracing::info!("Loading airports from {}", path);
                Self::from_json(&raw)
            }
            None => Self::embedded(),
        }
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_AIRPORTS)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let airports: Vec<Airport> = serde_json::from_str(raw)
            .map_err(|e| AppError::Internal(format!("Invalid airports dataset: {}", e)))?;
        Ok(Self::from_airports(airports))
    }

    pub fn from_airports(airports: Vec<Airport>) -> Self {
        let mut by_code = HashMap::with_capacity(airports.len());
        for mut airport in airports {
            airport.code = airport.code.trim().to_uppercase();
            if airport.code.is_empty() {
                continue;
            }
            if by_code.contains_key(&airport.code) {
                tracing::warn!("Duplicate airport code {} in dataset, keeping the last", airport.code);
            }
            by_code.insert(airport.code.clone(), airport);
        }

        let mut sorted: Vec<Airport> = by_code.values().cloned().collect();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));

        Self { by_code, sorted }
    }

    /// Exact, case-insensitive lookup
    pub fn resolve(&self, code: &str) -> Option<&Airport> {
        self.by_code.get(&code.trim().to_uppercase())
    }

    /// Airports whose code or name contains `term` (case-insensitive), by code
    pub fn search(&self, term: Option<&str>) -> Vec<&Airport> {
        let term = term.map(|t| t.trim().to_lowercase()).unwrap_or_default();
        self.sorted
            .iter()
            .filter(|airport| {
                term.is_empty()
                    || airport.code.to_lowercase().contains(&term)
                    || airport.name.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }
}
