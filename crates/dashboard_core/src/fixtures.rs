use std::{fs, path::Path};

use shared::{domain::Incident, error::DashboardError};

const BUNDLED_INCIDENTS: &str = include_str!("../fixtures/incidents.json");

pub fn load_incidents_from_str(raw: &str, origin: &str) -> Result<Vec<Incident>, DashboardError> {
    serde_json::from_str(raw).map_err(|source| DashboardError::Fixture {
        origin: origin.to_string(),
        source,
    })
}

pub fn load_incidents_from_path(path: &Path) -> Result<Vec<Incident>, DashboardError> {
    let raw = fs::read_to_string(path).map_err(|source| DashboardError::FixtureIo {
        path: path.to_path_buf(),
        source,
    })?;
    load_incidents_from_str(&raw, &path.display().to_string())
}

/// Incidents shipped with the dashboard.
pub fn bundled_incidents() -> Result<Vec<Incident>, DashboardError> {
    load_incidents_from_str(BUNDLED_INCIDENTS, "bundled incidents.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{domain::IncidentStatus, error::ErrorCode};

    #[test]
    fn bundled_fixtures_parse() {
        let incidents = bundled_incidents().expect("bundled fixtures");
        assert!(!incidents.is_empty());
        assert!(incidents
            .iter()
            .any(|incident| incident.status == IncidentStatus::Resolved));
    }

    #[test]
    fn malformed_fixture_reports_origin() {
        let err = load_incidents_from_str("[{\"id\": 1}]", "broken.json").expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Fixture);
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_file_is_fixture_error() {
        let err = load_incidents_from_path(Path::new("/nonexistent/incidents.json"))
            .expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::Fixture);
    }
}
