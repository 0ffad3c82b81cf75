//! JSON sidecar describing a run, written next to the CSV output.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Run description stored as `<output>.json`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Subcommand that produced the output
    pub command: String,
    /// Line profile
    pub profile: String,
    /// DAS quantity or WMS method
    pub method: String,
    /// Harmonic order (WMS only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmonic: Option<u32>,
    /// Modulation depth in cm^-1 (WMS only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modulation_depth: Option<f64>,
    /// Gas labels, one per output column
    pub gases: Vec<String>,
    /// Number of wavenumber samples written
    pub points: usize,
    /// qclas version
    pub version: String,
    /// RFC 3339 creation time
    pub created: String,
}

impl RunReport {
    /// Start a report stamped with the current time.
    pub fn new(command: &str, profile: impl ToString, method: impl ToString) -> Self {
        Self {
            command: command.to_string(),
            profile: profile.to_string(),
            method: method.to_string(),
            harmonic: None,
            modulation_depth: None,
            gases: Vec::new(),
            points: 0,
            version: qclas::VERSION.to_string(),
            created: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Write the report to `<output>.json`.
    pub fn write_sidecar(&self, output: &Path) -> Result<PathBuf> {
        let path = sidecar_path(output);
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// `nh3.csv` -> `nh3.csv.json`
pub fn sidecar_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".json");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_path() {
        assert_eq!(sidecar_path(Path::new("out/nh3.csv")), PathBuf::from("out/nh3.csv.json"));
    }

    #[test]
    fn test_write_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("run.csv");

        let mut report = RunReport::new("wms", "Voigt", "Theoretical");
        report.harmonic = Some(2);
        report.gases.push("2cm 3e-7 NH3 @ 990hPa & 293.15K".to_string());
        report.points = 10;
        let path = report.write_sidecar(&output).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(value["command"], "wms");
        assert_eq!(value["harmonic"], 2);
        assert_eq!(value["points"], 10);
        assert!(value.get("modulation_depth").is_none());
        let created = value["created"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(created).is_ok());
    }
}
