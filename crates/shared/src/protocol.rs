use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Incident, IncidentId, IncidentStatus};

/// Status commit proposed by the board to the owner of the incident collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub incident_id: IncidentId,
    pub new_status: IncidentStatus,
}

impl StatusChange {
    pub fn new(incident_id: IncidentId, new_status: IncidentStatus) -> Self {
        Self {
            incident_id,
            new_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DashboardEvent {
    IncidentStatusChanged {
        incident_id: IncidentId,
        previous: IncidentStatus,
        current: IncidentStatus,
        updated_at: DateTime<Utc>,
        version: u64,
    },
    IncidentCreated {
        incident: Incident,
        version: u64,
    },
}
