use chrono::{DateTime, Utc};
use shared::{
    domain::{Incident, IncidentId, NewIncident},
    error::DashboardError,
    protocol::StatusChange,
};

pub mod alerts;
pub mod board;
pub mod carousel;
pub mod fixtures;
pub mod incidents;
pub mod ui_state;

pub use alerts::{generate_alerts, generate_alerts_with, Alert, AlertAction};
pub use board::{IncidentBoard, Lane};
pub use carousel::{
    AlertCarousel, CarouselConfig, CarouselEvent, CarouselView, DismissReason, Slide,
};
pub use incidents::{IncidentQuery, IncidentSnapshot, IncidentStore, Ownership};
pub use ui_state::UiState;

/// Receiver of status changes proposed by the board.
pub trait StatusChangeSink {
    fn on_status_change(&mut self, change: StatusChange);
}

/// Records proposals without applying them.
impl StatusChangeSink for Vec<StatusChange> {
    fn on_status_change(&mut self, change: StatusChange) {
        self.push(change);
    }
}

/// The dashboard view-models wired to a single incident owner.
pub struct Dashboard {
    store: IncidentStore,
    board: IncidentBoard,
    carousel: AlertCarousel,
    ui: UiState,
    board_query: IncidentQuery,
}

impl Dashboard {
    /// Alerts are generated once from the initial incidents, like the
    /// dashboard page does on load.
    pub fn new(incidents: Vec<Incident>, config: CarouselConfig) -> Result<Self, DashboardError> {
        let alerts = generate_alerts(&incidents);
        let store = IncidentStore::new(incidents);
        let board_query = IncidentQuery::default();
        let board = IncidentBoard::new(store.filtered_snapshot(&board_query));
        let carousel = AlertCarousel::new(alerts, config)?;
        Ok(Self {
            store,
            board,
            carousel,
            ui: UiState::default(),
            board_query,
        })
    }

    pub fn store(&self) -> &IncidentStore {
        &self.store
    }

    pub fn board(&self) -> &IncidentBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut IncidentBoard {
        &mut self.board
    }

    pub fn board_query(&self) -> &IncidentQuery {
        &self.board_query
    }

    /// Narrows the board to the incidents listed for `query`. Pending
    /// previews are dropped.
    pub fn set_board_query(&mut self, query: IncidentQuery) {
        self.board_query = query;
        self.board
            .resync(self.store.filtered_snapshot(&self.board_query));
    }

    pub fn carousel(&self) -> &AlertCarousel {
        &self.carousel
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut UiState {
        &mut self.ui
    }

    /// Ends a drag on the board, commits the resulting status change to the
    /// store and feeds the new snapshot back to the board.
    pub fn drop_incident(&mut self, incident_id: &IncidentId, target_lane: &str) -> bool {
        let committed = self
            .board
            .end_drag(incident_id, target_lane, &mut self.store);
        self.refresh_board();
        committed
    }

    pub fn register_incident(
        &mut self,
        new: NewIncident,
        now: DateTime<Utc>,
    ) -> Result<IncidentId, DashboardError> {
        let incident_id = self.store.add_incident(new, now)?;
        self.refresh_board();
        Ok(incident_id)
    }

    /// Selects an incident on the board and mirrors it into the shell state.
    pub fn select_incident(&mut self, incident_id: &IncidentId) {
        self.board.select(incident_id);
        self.ui
            .set_selected_incident(self.board.selected_id().cloned());
    }

    // Hands the board a new listing once the store has moved past it.
    fn refresh_board(&mut self) {
        if self.board.committed().version != self.store.version() {
            self.board
                .resync(self.store.filtered_snapshot(&self.board_query));
        }
    }
}
