//! Kanban board over the committed incidents, with optimistic drag previews.
//!
//! The board never writes the committed collection. A drop that changes an
//! incident's status is proposed through a [`StatusChangeSink`]; the owner
//! applies it and hands a new [`IncidentSnapshot`] back through
//! [`IncidentBoard::resync`], which discards every optimistic preview.

use std::collections::HashMap;

use shared::{
    domain::{Incident, IncidentId, IncidentStatus},
    protocol::StatusChange,
};
use tracing::{debug, info};

use crate::{incidents::IncidentSnapshot, StatusChangeSink};

/// One board column: the lane status and the incidents currently shown in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub status: IncidentStatus,
    pub incidents: Vec<Incident>,
}

impl Lane {
    pub fn label(&self) -> &'static str {
        self.status.label()
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }
}

pub struct IncidentBoard {
    committed: IncidentSnapshot,
    // Previewed lane per incident while a drag hovers over it.
    overlay: HashMap<IncidentId, IncidentStatus>,
    dragging_id: Option<IncidentId>,
    selected_id: Option<IncidentId>,
}

impl IncidentBoard {
    pub fn new(committed: IncidentSnapshot) -> Self {
        Self {
            committed,
            overlay: HashMap::new(),
            dragging_id: None,
            selected_id: None,
        }
    }

    pub fn committed(&self) -> &IncidentSnapshot {
        &self.committed
    }

    /// Replaces the working copy with a newly committed collection. Pending
    /// previews are dropped; a snapshot identical to the current one is ignored.
    pub fn resync(&mut self, snapshot: IncidentSnapshot) {
        if self.committed.is_same(&snapshot) {
            return;
        }

        debug!(
            from_version = self.committed.version,
            to_version = snapshot.version,
            dropped_previews = self.overlay.len(),
            "board resynced"
        );
        self.committed = snapshot;
        self.overlay.clear();

        if let Some(id) = &self.dragging_id {
            if self.committed.get(id).is_none() {
                self.dragging_id = None;
            }
        }
        if let Some(id) = &self.selected_id {
            if self.committed.get(id).is_none() {
                self.selected_id = None;
            }
        }
    }

    /// Status of `incident_id` as currently displayed, previews included.
    pub fn local_status(&self, incident_id: &IncidentId) -> Option<IncidentStatus> {
        let committed = self.committed.get(incident_id)?;
        Some(
            self.overlay
                .get(incident_id)
                .copied()
                .unwrap_or(committed.status),
        )
    }

    pub fn local_incidents(&self) -> Vec<Incident> {
        self.committed
            .incidents
            .iter()
            .map(|incident| self.with_preview(incident))
            .collect()
    }

    pub fn lane(&self, status: IncidentStatus) -> Lane {
        let incidents = self
            .committed
            .incidents
            .iter()
            .map(|incident| self.with_preview(incident))
            .filter(|incident| incident.status == status)
            .collect();
        Lane { status, incidents }
    }

    pub fn lanes(&self) -> Vec<Lane> {
        IncidentStatus::LANES
            .into_iter()
            .map(|status| self.lane(status))
            .collect()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging_id.is_some()
    }

    pub fn dragging_id(&self) -> Option<&IncidentId> {
        self.dragging_id.as_ref()
    }

    /// The incident under the pointer, for rendering the drag overlay card.
    pub fn dragging(&self) -> Option<Incident> {
        let id = self.dragging_id.as_ref()?;
        self.committed
            .get(id)
            .map(|incident| self.with_preview(incident))
    }

    pub fn selected_id(&self) -> Option<&IncidentId> {
        self.selected_id.as_ref()
    }

    pub fn select(&mut self, incident_id: &IncidentId) {
        if self.committed.get(incident_id).is_none() {
            debug!(incident_id = %incident_id, "select ignored: unknown incident");
            return;
        }
        self.selected_id = Some(incident_id.clone());
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    pub fn begin_drag(&mut self, incident_id: &IncidentId) {
        if self.committed.get(incident_id).is_none() {
            debug!(incident_id = %incident_id, "drag ignored: unknown incident");
            return;
        }
        self.dragging_id = Some(incident_id.clone());
    }

    /// Previews `incident_id` in the hovered lane. Hovering anything that is
    /// not a lane, or the lane the card already shows in, changes nothing.
    pub fn drag_over(&mut self, incident_id: &IncidentId, target_lane: &str) {
        let Some(current) = self.local_status(incident_id) else {
            return;
        };
        let Some(target) = IncidentStatus::from_lane_id(target_lane) else {
            return;
        };
        if target == current {
            return;
        }

        let committed = self
            .committed
            .get(incident_id)
            .map(|incident| incident.status);
        if committed == Some(target) {
            self.overlay.remove(incident_id);
        } else {
            self.overlay.insert(incident_id.clone(), target);
        }
    }

    /// Finishes a drag. Returns `true` when a status change was proposed to
    /// `sink`; otherwise the preview for `incident_id` is rolled back.
    pub fn end_drag<S>(&mut self, incident_id: &IncidentId, target_lane: &str, sink: &mut S) -> bool
    where
        S: StatusChangeSink + ?Sized,
    {
        self.dragging_id = None;

        let committed = self
            .committed
            .get(incident_id)
            .map(|incident| incident.status);
        let target = IncidentStatus::from_lane_id(target_lane);

        match (committed, target) {
            (Some(from), Some(to)) if from != to => {
                info!(incident_id = %incident_id, from = %from, to = %to, "incident dropped on new lane");
                sink.on_status_change(StatusChange::new(incident_id.clone(), to));
                true
            }
            _ => {
                debug!(incident_id = %incident_id, target_lane, "drop without status change");
                self.overlay.remove(incident_id);
                false
            }
        }
    }

    /// Abandoned drag; treated like a drop outside every lane.
    pub fn cancel_drag(&mut self) {
        if let Some(id) = self.dragging_id.take() {
            debug!(incident_id = %id, "drag cancelled");
            self.overlay.remove(&id);
        }
    }

    fn with_preview(&self, incident: &Incident) -> Incident {
        let mut incident = incident.clone();
        if let Some(status) = self.overlay.get(&incident.id) {
            incident.status = *status;
        }
        incident
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
