//! Owner of the committed incident collection.

use std::{cmp::Reverse, sync::Arc};

use chrono::{DateTime, Utc};
use shared::{
    domain::{store_name, Incident, IncidentId, IncidentStatus, NewIncident},
    error::DashboardError,
    protocol::{DashboardEvent, StatusChange},
};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::StatusChangeSink;

/// Immutable view of the committed incidents at one version.
#[derive(Debug, Clone)]
pub struct IncidentSnapshot {
    pub version: u64,
    pub incidents: Arc<[Incident]>,
}

impl IncidentSnapshot {
    pub fn new(version: u64, incidents: impl Into<Arc<[Incident]>>) -> Self {
        Self {
            version,
            incidents: incidents.into(),
        }
    }

    pub fn get(&self, incident_id: &IncidentId) -> Option<&Incident> {
        self.incidents.iter().find(|incident| &incident.id == incident_id)
    }

    pub fn is_same(&self, other: &IncidentSnapshot) -> bool {
        self.version == other.version && Arc::ptr_eq(&self.incidents, &other.incidents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Ownership {
    #[default]
    All,
    Mine(String),
}

/// Listing filter of the incidents page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncidentQuery {
    pub ownership: Ownership,
    pub search: String,
}

impl IncidentQuery {
    fn matches(&self, incident: &Incident) -> bool {
        if let Ownership::Mine(user) = &self.ownership {
            if &incident.assigned_to != user {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || incident.title.to_lowercase().contains(&needle)
            || incident.store_name.to_lowercase().contains(&needle)
    }
}

pub struct IncidentStore {
    incidents: Arc<[Incident]>,
    version: u64,
    events: broadcast::Sender<DashboardEvent>,
}

impl IncidentStore {
    pub fn new(incidents: Vec<Incident>) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            incidents: incidents.into(),
            version: 1,
            events,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> IncidentSnapshot {
        IncidentSnapshot {
            version: self.version,
            incidents: Arc::clone(&self.incidents),
        }
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn get(&self, incident_id: &IncidentId) -> Result<&Incident, DashboardError> {
        self.incidents
            .iter()
            .find(|incident| &incident.id == incident_id)
            .ok_or_else(|| DashboardError::IncidentNotFound(incident_id.clone()))
    }

    /// Incidents that still need attention.
    pub fn active_count(&self) -> usize {
        self.incidents
            .iter()
            .filter(|incident| incident.status.is_active())
            .count()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Applies a committed status change. Returns `false` when the incident is
    /// unknown or already carries the requested status.
    pub fn apply_status_change(&mut self, change: &StatusChange, now: DateTime<Utc>) -> bool {
        let Some(position) = self
            .incidents
            .iter()
            .position(|incident| incident.id == change.incident_id)
        else {
            debug!(incident_id = %change.incident_id, "status change for unknown incident ignored");
            return false;
        };

        let previous = self.incidents[position].status;
        if previous == change.new_status {
            debug!(incident_id = %change.incident_id, status = %previous, "status unchanged");
            return false;
        }

        let mut incidents = self.incidents.to_vec();
        let incident = &mut incidents[position];
        incident.status = change.new_status;
        incident.updated_at = now;
        self.incidents = incidents.into();
        self.version += 1;

        info!(
            incident_id = %change.incident_id,
            from = %previous,
            to = %change.new_status,
            version = self.version,
            "incident status committed"
        );
        let _ = self.events.send(DashboardEvent::IncidentStatusChanged {
            incident_id: change.incident_id.clone(),
            previous,
            current: change.new_status,
            updated_at: now,
            version: self.version,
        });
        true
    }

    /// Registers a new open incident at the head of the collection.
    pub fn add_incident(
        &mut self,
        new: NewIncident,
        now: DateTime<Utc>,
    ) -> Result<IncidentId, DashboardError> {
        if new.title.trim().is_empty() {
            return Err(DashboardError::validation("title", "must not be empty"));
        }
        if new.assigned_to.trim().is_empty() {
            return Err(DashboardError::validation("assigned_to", "must not be empty"));
        }

        let incident = Incident {
            id: IncidentId::generate(),
            title: new.title,
            description: new.description,
            severity: new.severity,
            status: IncidentStatus::Open,
            incident_type: new.incident_type,
            store_name: store_name(&new.store_id).to_string(),
            store_id: new.store_id,
            assigned_to: new.assigned_to,
            created_at: now,
            updated_at: now,
            video_clip_url: None,
            camera_location: None,
        };
        let incident_id = incident.id.clone();

        let mut incidents = Vec::with_capacity(self.incidents.len() + 1);
        incidents.push(incident.clone());
        incidents.extend(self.incidents.iter().cloned());
        self.incidents = incidents.into();
        self.version += 1;

        info!(incident_id = %incident_id, store_id = %incident.store_id, "incident registered");
        let _ = self.events.send(DashboardEvent::IncidentCreated {
            incident,
            version: self.version,
        });
        Ok(incident_id)
    }

    /// Incidents matching `query`, most severe first, newest first within a
    /// severity.
    pub fn filtered(&self, query: &IncidentQuery) -> Vec<Incident> {
        let mut incidents: Vec<Incident> = self
            .incidents
            .iter()
            .filter(|incident| query.matches(incident))
            .cloned()
            .collect();
        incidents.sort_by_key(|incident| (incident.severity.rank(), Reverse(incident.created_at)));
        incidents
    }

    /// [`filtered`](Self::filtered) at the current version, for the board.
    pub fn filtered_snapshot(&self, query: &IncidentQuery) -> IncidentSnapshot {
        IncidentSnapshot::new(self.version, self.filtered(query))
    }
}

impl StatusChangeSink for IncidentStore {
    fn on_status_change(&mut self, change: StatusChange) {
        self.apply_status_change(&change, Utc::now());
    }
}

#[cfg(test)]
#[path = "tests/incidents_tests.rs"]
mod tests;
