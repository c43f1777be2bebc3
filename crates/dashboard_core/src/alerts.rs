//! Alerts shown in the dashboard carousel: one per unresolved incident plus a
//! fixed set of system alerts.

use std::{fmt, sync::Arc};

use shared::domain::{AlertId, Incident, Severity};
use tracing::info;

/// Side effect fired when the user confirms an alert's action.
pub type AlertAction = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
pub struct Alert {
    pub id: AlertId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub action_label: String,
    pub link: Option<String>,
    pub on_action: Option<AlertAction>,
}

impl Alert {
    pub fn new(id: impl Into<AlertId>, severity: Severity, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            severity,
            action_label: "Revisar".to_string(),
            link: None,
            on_action: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_action_label(mut self, label: impl Into<String>) -> Self {
        self.action_label = label.into();
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_action(mut self, action: AlertAction) -> Self {
        self.on_action = Some(action);
        self
    }

    pub fn has_action(&self) -> bool {
        self.on_action.is_some()
    }
}

impl fmt::Debug for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alert")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("severity", &self.severity)
            .field("action_label", &self.action_label)
            .field("link", &self.link)
            .field("has_action", &self.on_action.is_some())
            .finish()
    }
}

struct SystemAlert {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    severity: Severity,
    action_label: &'static str,
    link: &'static str,
}

const SYSTEM_ALERTS: [SystemAlert; 3] = [
    SystemAlert {
        id: "sys-001",
        title: "Transferencia de inventario pendiente",
        description: "50 unidades de Leche Entera 1L de Tienda Polanco a Tienda Santa Fe requieren aprobación.",
        severity: Severity::High,
        action_label: "Aprobar Transferencia",
        link: "/inventory",
    },
    SystemAlert {
        id: "sys-002",
        title: "Reabastecimiento automático sugerido",
        description: "15 SKUs con stock bajo detectados. El sistema recomienda generar órdenes de compra.",
        severity: Severity::Medium,
        action_label: "Ver Sugerencias",
        link: "/inventory?filter=low_stock",
    },
    SystemAlert {
        id: "sys-003",
        title: "Actualización de precios pendiente",
        description: "Hay 8 productos con precios desactualizados según el catálogo del proveedor.",
        severity: Severity::Low,
        action_label: "Actualizar Precios",
        link: "/settings",
    },
];

/// Alerts for `incidents` whose actions only log the confirmation.
pub fn generate_alerts(incidents: &[Incident]) -> Vec<Alert> {
    generate_alerts_with(incidents, |id| {
        let id = id.clone();
        let action: AlertAction = Arc::new(move || info!(alert_id = %id, "alert action taken"));
        action
    })
}

/// Incident-derived alerts in input order, followed by the system alerts.
/// `make_action` provides the side effect for each alert.
pub fn generate_alerts_with<F>(incidents: &[Incident], mut make_action: F) -> Vec<Alert>
where
    F: FnMut(&AlertId) -> AlertAction,
{
    let mut alerts: Vec<Alert> = incidents
        .iter()
        .filter(|incident| incident.status.is_active())
        .map(|incident| {
            let id = AlertId::from(&incident.id);
            let action = make_action(&id);
            Alert::new(id, incident.severity, incident.title.clone())
                .with_description(format!("{}: {}", incident.store_name, incident.description))
                .with_action_label(incident.incident_type.action_label())
                .with_link(format!("/incidents/{}", incident.id))
                .with_action(action)
        })
        .collect();

    for system in &SYSTEM_ALERTS {
        let id = AlertId::new(system.id);
        let action = make_action(&id);
        alerts.push(
            Alert::new(id, system.severity, system.title)
                .with_description(system.description)
                .with_action_label(system.action_label)
                .with_link(system.link)
                .with_action(action),
        );
    }

    alerts
}

#[cfg(test)]
#[path = "tests/alerts_tests.rs"]
mod tests;
