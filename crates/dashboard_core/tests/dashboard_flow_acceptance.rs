use std::time::Duration;

use chrono::Utc;
use dashboard_core::{
    fixtures::bundled_incidents, CarouselConfig, CarouselView, Dashboard, IncidentQuery,
    Ownership,
};
use shared::{
    domain::{AlertId, IncidentId, IncidentStatus, IncidentType, NewIncident, Severity, StoreId},
    protocol::DashboardEvent,
};

fn lane_ids(dashboard: &Dashboard, status: IncidentStatus) -> Vec<String> {
    dashboard
        .board()
        .lane(status)
        .incidents
        .into_iter()
        .map(|incident| incident.id.0)
        .collect()
}

#[tokio::test]
async fn kanban_drag_commits_through_store_and_resyncs_board() {
    let mut dashboard =
        Dashboard::new(bundled_incidents().expect("fixtures"), CarouselConfig::default())
            .expect("dashboard");
    let mut events = dashboard.store().subscribe_events();
    let inc_003 = IncidentId::from("inc-003");

    assert_eq!(lane_ids(&dashboard, IncidentStatus::Open), vec!["inc-001", "inc-003"]);

    let before = dashboard.store().get(&inc_003).expect("inc-003").updated_at;
    dashboard.board_mut().begin_drag(&inc_003);
    dashboard.board_mut().drag_over(&inc_003, "in_progress");
    dashboard.board_mut().drag_over(&inc_003, "escalated");
    assert!(dashboard.drop_incident(&inc_003, "escalated"));

    assert_eq!(lane_ids(&dashboard, IncidentStatus::Open), vec!["inc-001"]);
    assert_eq!(
        lane_ids(&dashboard, IncidentStatus::Escalated),
        vec!["inc-005", "inc-003", "inc-004"]
    );
    let committed = dashboard.store().get(&inc_003).expect("inc-003");
    assert_eq!(committed.status, IncidentStatus::Escalated);
    assert!(committed.updated_at > before);

    match events.try_recv().expect("status event") {
        DashboardEvent::IncidentStatusChanged {
            incident_id,
            previous,
            current,
            ..
        } => {
            assert_eq!(incident_id, inc_003);
            assert_eq!(previous, IncidentStatus::Open);
            assert_eq!(current, IncidentStatus::Escalated);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn invalid_drop_leaves_no_drift_after_resync() {
    let mut dashboard =
        Dashboard::new(bundled_incidents().expect("fixtures"), CarouselConfig::default())
            .expect("dashboard");
    let version = dashboard.store().version();
    let inc_002 = IncidentId::from("inc-002");
    let before = dashboard.board().local_incidents();

    dashboard.board_mut().begin_drag(&inc_002);
    dashboard.board_mut().drag_over(&inc_002, "resolved");
    assert!(!dashboard.drop_incident(&inc_002, "outside"));

    assert_eq!(dashboard.store().version(), version);
    assert_eq!(dashboard.board().local_incidents(), before);
}

#[tokio::test]
async fn registered_incident_lands_in_open_lane_first() {
    let mut dashboard =
        Dashboard::new(bundled_incidents().expect("fixtures"), CarouselConfig::default())
            .expect("dashboard");

    let id = dashboard
        .register_incident(
            NewIncident {
                title: "Puerta de emergencia abierta".to_string(),
                description: "Sensor reporta apertura fuera de horario.".to_string(),
                severity: Severity::High,
                incident_type: IncidentType::Anomaly,
                store_id: StoreId::from("store-010"),
                assigned_to: "Carlos Méndez".to_string(),
            },
            Utc::now(),
        )
        .expect("register");

    let open = lane_ids(&dashboard, IncidentStatus::Open);
    assert_eq!(open, vec!["inc-001".to_string(), id.0.clone(), "inc-003".to_string()]);

    let mine = dashboard.store().filtered(&IncidentQuery {
        ownership: Ownership::Mine("Carlos Méndez".to_string()),
        search: "reforma".to_string(),
    });
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, id);

    dashboard.select_incident(&id);
    assert_eq!(dashboard.ui().selected_incident(), Some(&id));
}

#[tokio::test]
async fn board_lanes_list_most_severe_first() {
    let dashboard =
        Dashboard::new(bundled_incidents().expect("fixtures"), CarouselConfig::default())
            .expect("dashboard");

    assert_eq!(
        lane_ids(&dashboard, IncidentStatus::Escalated),
        vec!["inc-005", "inc-004"]
    );
    assert_eq!(
        lane_ids(&dashboard, IncidentStatus::Resolved),
        vec!["inc-006", "inc-008"]
    );
}

#[tokio::test]
async fn board_query_narrows_lanes_and_survives_commits() {
    let mut dashboard =
        Dashboard::new(bundled_incidents().expect("fixtures"), CarouselConfig::default())
            .expect("dashboard");
    dashboard.set_board_query(IncidentQuery {
        ownership: Ownership::Mine("Carlos Méndez".to_string()),
        search: String::new(),
    });

    assert_eq!(lane_ids(&dashboard, IncidentStatus::Open), vec!["inc-001", "inc-003"]);
    assert!(lane_ids(&dashboard, IncidentStatus::InProgress).is_empty());
    assert_eq!(lane_ids(&dashboard, IncidentStatus::Escalated), vec!["inc-005"]);

    let inc_003 = IncidentId::from("inc-003");
    dashboard.board_mut().begin_drag(&inc_003);
    assert!(dashboard.drop_incident(&inc_003, "escalated"));
    assert_eq!(
        lane_ids(&dashboard, IncidentStatus::Escalated),
        vec!["inc-005", "inc-003"]
    );
    assert_eq!(dashboard.board().committed().version, dashboard.store().version());

    dashboard.set_board_query(IncidentQuery {
        ownership: Ownership::All,
        search: "coyoacán".to_string(),
    });
    assert_eq!(dashboard.board().local_incidents().len(), 1);
    assert_eq!(lane_ids(&dashboard, IncidentStatus::Escalated), vec!["inc-005"]);
}

#[tokio::test(start_paused = true)]
async fn alert_queue_from_fixtures_is_prioritised_and_auto_dismisses() {
    let dashboard =
        Dashboard::new(bundled_incidents().expect("fixtures"), CarouselConfig::default())
            .expect("dashboard");
    let carousel = dashboard.carousel();

    let ids: Vec<String> = carousel
        .active_alerts()
        .into_iter()
        .map(|alert| alert.id.0)
        .collect();
    assert_eq!(
        ids,
        vec![
            "inc-001", "inc-005", "inc-002", "sys-001", "inc-003", "inc-007", "sys-002",
            "inc-004", "sys-003",
        ]
    );

    let first = AlertId::from("inc-001");
    carousel.request_action(&first);
    assert!(matches!(carousel.view(), CarouselView::Confirming(_)));
    carousel.confirm_action(&first);
    match carousel.view() {
        CarouselView::Confirmed(slide) => {
            assert_eq!(slide.alert.id, first);
            assert_eq!((slide.position, slide.total), (1, 9));
        }
        other => panic!("unexpected view: {other:?}"),
    }

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(carousel.remaining(), 8);
    match carousel.view() {
        CarouselView::Viewing(slide) => assert_eq!(slide.alert.id, AlertId::from("inc-005")),
        other => panic!("unexpected view: {other:?}"),
    }
}
