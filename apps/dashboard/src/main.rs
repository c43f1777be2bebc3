use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dashboard_core::{
    fixtures::{bundled_incidents, load_incidents_from_path},
    CarouselConfig, CarouselView, Dashboard, IncidentQuery, Lane, Ownership,
};
use shared::{
    domain::{AlertId, Incident, IncidentId},
    error::{DashboardError, ErrorCode, ErrorReport},
};
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(about = "Retail operations dashboard over fixture data")]
struct Cli {
    /// Incident fixture file; overrides the configured one.
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the kanban lanes, most severe first.
    Board {
        #[arg(long)]
        mine: bool,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List incidents, most severe first.
    Incidents {
        #[arg(long)]
        mine: bool,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show the prioritised alert queue.
    Alerts,
    /// Drag an incident onto a lane and commit the drop.
    Move { incident_id: String, lane: String },
    /// Confirm an alert's action and wait for it to auto-dismiss.
    Confirm { alert_id: String },
    /// Print the effective settings.
    Settings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let (settings, settings_problem) = load_settings();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    if let Some(problem) = settings_problem {
        tracing::warn!(%problem, "using default settings");
    }

    let cli = Cli::parse();
    let json = cli.json;
    if let Err(err) = run(cli, &settings).await {
        if json {
            let report = match err.downcast_ref::<DashboardError>() {
                Some(dashboard_err) => ErrorReport::from(dashboard_err),
                None => ErrorReport::new(ErrorCode::Internal, format!("{err:#}")),
            };
            println!("{}", serde_json::to_string(&report)?);
            std::process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

async fn run(cli: Cli, settings: &Settings) -> Result<()> {
    if let Command::Settings = cli.command {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    let incidents = load_incidents(cli.fixtures.as_ref().or(settings.fixtures_path.as_ref()))?;
    let config = CarouselConfig {
        auto_dismiss_after: settings.auto_dismiss_after(),
    };
    let mut dashboard = Dashboard::new(incidents, config).context("failed to build dashboard")?;

    match cli.command {
        Command::Board { mine, search } => {
            dashboard.set_board_query(incident_query(settings, mine, search));
            print_lanes(&dashboard.board().lanes(), cli.json)?;
        }
        Command::Incidents { mine, search } => {
            let listing = dashboard
                .store()
                .filtered(&incident_query(settings, mine, search));
            print_incidents(&listing, cli.json)?;
        }
        Command::Alerts => print_alerts(&dashboard, cli.json)?,
        Command::Move { incident_id, lane } => {
            let incident_id = IncidentId::new(incident_id);
            dashboard.store().get(&incident_id)?;

            dashboard.board_mut().begin_drag(&incident_id);
            dashboard.board_mut().drag_over(&incident_id, &lane);
            if dashboard.drop_incident(&incident_id, &lane) {
                tracing::info!(incident_id = %incident_id, lane = %lane, "move committed");
            } else {
                println!("{incident_id} not moved: '{lane}' is not a new lane for it");
            }
            print_lanes(&dashboard.board().lanes(), cli.json)?;
        }
        Command::Confirm { alert_id } => {
            let alert_id = AlertId::new(alert_id);
            let carousel = dashboard.carousel();
            let Some(position) = carousel
                .active_alerts()
                .iter()
                .position(|alert| alert.id == alert_id)
            else {
                anyhow::bail!("alert {alert_id} is not active");
            };

            carousel.select_index(position);
            carousel.request_action(&alert_id);
            carousel.confirm_action(&alert_id);
            print_alerts(&dashboard, cli.json)?;

            tokio::time::sleep(settings.auto_dismiss_after() + Duration::from_millis(50)).await;
            print_alerts(&dashboard, cli.json)?;
        }
        Command::Settings => {}
    }

    Ok(())
}

fn incident_query(settings: &Settings, mine: bool, search: String) -> IncidentQuery {
    let ownership = if mine {
        Ownership::Mine(settings.current_user.clone())
    } else {
        Ownership::All
    };
    IncidentQuery { ownership, search }
}

fn load_incidents(path: Option<&PathBuf>) -> Result<Vec<Incident>> {
    let incidents = match path {
        Some(path) => load_incidents_from_path(path)
            .with_context(|| format!("failed to load incidents from {}", path.display()))?,
        None => bundled_incidents().context("failed to load bundled incidents")?,
    };
    tracing::debug!(count = incidents.len(), "incidents loaded");
    Ok(incidents)
}

fn print_lanes(lanes: &[Lane], json: bool) -> Result<()> {
    if json {
        let value: Vec<_> = lanes
            .iter()
            .map(|lane| {
                serde_json::json!({
                    "lane": lane.status,
                    "label": lane.label(),
                    "style": lane.status.lane_style(),
                    "incidents": lane.incidents,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for lane in lanes {
        println!("== {} ({})", lane.label(), lane.len());
        if lane.is_empty() {
            println!("   Sin incidentes");
        }
        for incident in &lane.incidents {
            println!(
                "   [{}] {} - {} ({}, {})",
                incident.severity.label(),
                incident.id,
                incident.title,
                incident.store_name,
                incident.assigned_to
            );
        }
    }
    Ok(())
}

fn print_incidents(incidents: &[Incident], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(incidents)?);
        return Ok(());
    }

    for incident in incidents {
        println!(
            "[{}] [{}] {} - {} | {} | {}",
            incident.severity.label(),
            incident.status.label(),
            incident.id,
            incident.title,
            incident.store_name,
            incident.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn print_alerts(dashboard: &Dashboard, json: bool) -> Result<()> {
    let carousel = dashboard.carousel();
    if json {
        let queue: Vec<_> = carousel
            .active_alerts()
            .iter()
            .map(|alert| {
                serde_json::json!({
                    "id": alert.id,
                    "severity": alert.severity,
                    "severity_label": alert.severity.label(),
                    "style": alert.severity.style(),
                    "title": alert.title,
                    "action_label": alert.action_label,
                    "link": alert.link,
                    "confirmed": carousel.is_confirmed(&alert.id),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "remaining": carousel.remaining(),
                "current_index": carousel.current_index(),
                "alerts": queue,
            }))?
        );
        return Ok(());
    }

    match carousel.view() {
        CarouselView::Empty => println!("No hay alertas pendientes"),
        CarouselView::Viewing(slide) => println!(
            "Acciones Requeridas {}/{}: [{}] {} -> {}",
            slide.position,
            slide.total,
            slide.alert.severity.label(),
            slide.alert.title,
            slide.alert.action_label
        ),
        CarouselView::Confirming(slide) => println!(
            "Acciones Requeridas {}/{}: ¿Confirmar acción? {}",
            slide.position, slide.total, slide.alert.title
        ),
        CarouselView::Confirmed(slide) => println!(
            "Acciones Requeridas {}/{}: Acción completada exitosamente ({})",
            slide.position, slide.total, slide.alert.title
        ),
    }
    for (index, alert) in carousel.active_alerts().iter().enumerate() {
        let marker = if carousel.current_index() == Some(index) {
            ">"
        } else {
            " "
        };
        println!(
            "{marker} {:>2}. [{}] {} ({})",
            index + 1,
            alert.severity.label(),
            alert.title,
            alert.id
        );
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
