//! Shell state shared by the dashboard views: sidebar, search palette,
//! notifications panel and current selections. Owned by the application and
//! handed to whoever needs it.

use shared::domain::IncidentId;

pub const DEFAULT_SETTINGS_TAB: &str = "general";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    sidebar_collapsed: bool,
    sidebar_open: bool,
    selected_sku: Option<String>,
    selected_incident: Option<IncidentId>,
    active_settings_tab: String,
    search_open: bool,
    notifications_open: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_collapsed: false,
            sidebar_open: true,
            selected_sku: None,
            selected_incident: None,
            active_settings_tab: DEFAULT_SETTINGS_TAB.to_string(),
            search_open: false,
            notifications_open: false,
        }
    }
}

impl UiState {
    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.sidebar_collapsed = collapsed;
    }

    /// Mobile drawer visibility, independent of the collapsed desktop rail.
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar_open(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn set_sidebar_open(&mut self, open: bool) {
        self.sidebar_open = open;
    }

    pub fn selected_sku(&self) -> Option<&str> {
        self.selected_sku.as_deref()
    }

    pub fn set_selected_sku(&mut self, sku_id: Option<String>) {
        self.selected_sku = sku_id;
    }

    pub fn selected_incident(&self) -> Option<&IncidentId> {
        self.selected_incident.as_ref()
    }

    pub fn set_selected_incident(&mut self, incident_id: Option<IncidentId>) {
        self.selected_incident = incident_id;
    }

    pub fn active_settings_tab(&self) -> &str {
        &self.active_settings_tab
    }

    pub fn set_active_settings_tab(&mut self, tab: impl Into<String>) {
        self.active_settings_tab = tab.into();
    }

    pub fn search_open(&self) -> bool {
        self.search_open
    }

    pub fn set_search_open(&mut self, open: bool) {
        self.search_open = open;
    }

    pub fn notifications_open(&self) -> bool {
        self.notifications_open
    }

    pub fn set_notifications_open(&mut self, open: bool) {
        self.notifications_open = open;
    }
}
