//! Repository configuration file support.
//!
//! Reads the repository backend and the seeded flight catalog from TOML:
//!
//! ```toml
//! [repository]
//! type = "local"
//!
//! [[flights]]
//! id = "0b9f6f0e-8f5c-4f43-9d0b-6d2f1d7c2a11"
//! flight_number = "BA117"
//! minimum_turnaround_time = 45
//! seat_capacities = { economy = { total = 250 }, business = { total = 40 } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::models::Flight;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    /// Flights loaded into the catalog at startup.
    #[serde(default)]
    pub flights: Vec<Flight>,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

impl FromStr for RepositoryConfig {
    type Err = RepositoryError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        content.parse()
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, RepositoryError> {
        RepositoryType::from_str(&self.repository.repo_type).map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })
    }

    /// Seeded flights after catalog validation (turnaround floor, unique ids).
    pub fn validated_flights(&self) -> Result<Vec<Flight>, RepositoryError> {
        let mut seen = HashSet::new();
        for flight in &self.flights {
            flight.validate().map_err(RepositoryError::configuration)?;
            if !seen.insert(flight.id) {
                return Err(RepositoryError::configuration(format!(
                    "Flight id {} is listed more than once",
                    flight.id
                )));
            }
        }
        Ok(self.flights.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[repository]
type = "local"

[[flights]]
id = "0b9f6f0e-8f5c-4f43-9d0b-6d2f1d7c2a11"
flight_number = "BA117"
airline = "British Airways"
aircraft_model = "A350-1000"
minimum_turnaround_time = 45

[flights.seat_capacities]
economy = { total = 250 }
business = { total = 40 }
"#;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: RepositoryConfig = toml.parse().unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert!(config.flights.is_empty());
    }

    #[test]
    fn test_parse_seeded_flights() {
        let config: RepositoryConfig = SAMPLE.parse().unwrap();
        let flights = config.validated_flights().unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].minimum_turnaround_time, 45);
        assert_eq!(
            flights[0].seat_capacities.business.map(|c| c.total),
            Some(40)
        );
        assert!(flights[0].seat_capacities.first.is_none());
    }

    #[test]
    fn test_short_turnaround_rejected() {
        let config: RepositoryConfig = SAMPLE
            .replace("minimum_turnaround_time = 45", "minimum_turnaround_time = 20")
            .parse()
            .unwrap();
        let err = config.validated_flights().unwrap_err();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }

    #[test]
    fn test_unknown_repository_type() {
        let config: RepositoryConfig = "[repository]\ntype = \"mongo\"\n".parse().unwrap();
        assert!(config.repository_type().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = RepositoryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.flights[0].flight_number, "BA117");

        assert!(RepositoryConfig::from_file("/definitely/not/here.toml").is_err());
    }
}
