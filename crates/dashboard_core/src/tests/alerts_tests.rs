use super::*;
use chrono::{TimeZone, Utc};
use shared::domain::{IncidentId, IncidentStatus, IncidentType, StoreId};
use std::sync::Mutex;

fn incident(id: &str, status: IncidentStatus, incident_type: IncidentType) -> Incident {
    let at = Utc.with_ymd_and_hms(2024, 11, 19, 8, 0, 0).unwrap();
    Incident {
        id: IncidentId::from(id),
        title: format!("Incidente {id}"),
        description: "Sin conteo".to_string(),
        severity: Severity::High,
        status,
        incident_type,
        store_id: StoreId::from("store-003"),
        store_name: "Tienda Condesa".to_string(),
        assigned_to: "María López".to_string(),
        created_at: at,
        updated_at: at,
        video_clip_url: None,
        camera_location: None,
    }
}

#[test]
fn resolved_incidents_produce_no_alerts() {
    let alerts = generate_alerts(&[
        incident("open", IncidentStatus::Open, IncidentType::Theft),
        incident("done", IncidentStatus::Resolved, IncidentType::Theft),
        incident("up", IncidentStatus::Escalated, IncidentType::Stockout),
    ]);

    let ids: Vec<&str> = alerts.iter().map(|alert| alert.id.as_str()).collect();
    assert_eq!(ids, vec!["open", "up", "sys-001", "sys-002", "sys-003"]);
}

#[test]
fn incident_alert_carries_store_context_and_type_label() {
    let alerts = generate_alerts(&[incident("i-1", IncidentStatus::InProgress, IncidentType::Shrinkage)]);
    let alert = &alerts[0];

    assert_eq!(alert.title, "Incidente i-1");
    assert_eq!(alert.description, "Tienda Condesa: Sin conteo");
    assert_eq!(alert.action_label, "Investigar Merma");
    assert_eq!(alert.link.as_deref(), Some("/incidents/i-1"));
    assert_eq!(alert.severity, Severity::High);
    assert!(alert.has_action());
}

#[test]
fn system_alerts_have_fixed_severity_and_links() {
    let alerts = generate_alerts(&[]);
    let summary: Vec<(&str, Severity, Option<&str>)> = alerts
        .iter()
        .map(|alert| (alert.id.as_str(), alert.severity, alert.link.as_deref()))
        .collect();

    assert_eq!(
        summary,
        vec![
            ("sys-001", Severity::High, Some("/inventory")),
            ("sys-002", Severity::Medium, Some("/inventory?filter=low_stock")),
            ("sys-003", Severity::Low, Some("/settings")),
        ]
    );
}

#[test]
fn custom_actions_are_bound_per_alert() {
    let fired = Arc::new(Mutex::new(Vec::new()));
    let alerts = generate_alerts_with(
        &[incident("i-9", IncidentStatus::Open, IncidentType::Anomaly)],
        |id| {
            let fired = Arc::clone(&fired);
            let id = id.clone();
            let action: AlertAction = Arc::new(move || fired.lock().expect("lock").push(id.clone()));
            action
        },
    );

    if let Some(action) = &alerts[3].on_action {
        action();
    }
    if let Some(action) = &alerts[0].on_action {
        action();
    }

    assert_eq!(
        *fired.lock().expect("lock"),
        vec![AlertId::from("sys-003"), AlertId::from("i-9")]
    );
}
