use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(IncidentId);
id_newtype!(StoreId);
id_newtype!(AlertId);

impl IncidentId {
    pub fn generate() -> Self {
        Self(format!("incident-{}", Uuid::new_v4()))
    }
}

impl From<&IncidentId> for AlertId {
    fn from(value: &IncidentId) -> Self {
        Self(value.0.clone())
    }
}

/// Display badge style for a severity or status, as CSS utility classes.
pub type StyleClass = &'static str;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    /// Sort priority; lower ranks come first.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Critical => "Crítico",
            Severity::High => "Alto",
            Severity::Medium => "Medio",
            Severity::Low => "Bajo",
        }
    }

    pub fn style(self) -> StyleClass {
        match self {
            Severity::Critical => "bg-red-100 text-red-800 border-red-200",
            Severity::High => "bg-orange-100 text-orange-800 border-orange-200",
            Severity::Medium => "bg-yellow-100 text-yellow-800 border-yellow-200",
            Severity::Low => "bg-blue-100 text-blue-800 border-blue-200",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Open,
    InProgress,
    Escalated,
    Resolved,
}

impl IncidentStatus {
    /// Board lanes, left to right.
    pub const LANES: [IncidentStatus; 4] = [
        IncidentStatus::Open,
        IncidentStatus::InProgress,
        IncidentStatus::Escalated,
        IncidentStatus::Resolved,
    ];

    /// Identifier of the lane holding incidents with this status.
    pub fn lane_id(self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::InProgress => "in_progress",
            IncidentStatus::Escalated => "escalated",
            IncidentStatus::Resolved => "resolved",
        }
    }

    /// Resolves a drop target id. Anything that is not a lane yields `None`.
    pub fn from_lane_id(lane_id: &str) -> Option<Self> {
        Self::LANES
            .into_iter()
            .find(|status| status.lane_id() == lane_id)
    }

    pub fn label(self) -> &'static str {
        match self {
            IncidentStatus::Open => "Abierto",
            IncidentStatus::InProgress => "En Progreso",
            IncidentStatus::Escalated => "Escalado",
            IncidentStatus::Resolved => "Resuelto",
        }
    }

    pub fn lane_style(self) -> StyleClass {
        match self {
            IncidentStatus::Open => "border-red-200 bg-red-50",
            IncidentStatus::InProgress => "border-blue-200 bg-blue-50",
            IncidentStatus::Escalated => "border-purple-200 bg-purple-50",
            IncidentStatus::Resolved => "border-green-200 bg-green-50",
        }
    }

    pub fn is_active(self) -> bool {
        !matches!(self, IncidentStatus::Resolved)
    }
}

impl fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.lane_id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentType {
    Shrinkage,
    Theft,
    Anomaly,
    Stockout,
}

impl IncidentType {
    /// Call to action shown on alerts derived from an incident of this type.
    pub fn action_label(self) -> &'static str {
        match self {
            IncidentType::Theft => "Verificar Video",
            IncidentType::Shrinkage => "Investigar Merma",
            IncidentType::Stockout => "Ordenar Stock",
            IncidentType::Anomaly => "Analizar Datos",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: IncidentId,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub store_id: StoreId,
    pub store_name: String,
    pub assigned_to: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_clip_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_location: Option<String>,
}

/// Form payload for registering an incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncident {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub incident_type: IncidentType,
    pub store_id: StoreId,
    pub assigned_to: String,
}

/// Stores known to the dashboard, by id.
pub const STORE_DIRECTORY: [(&str, &str); 10] = [
    ("store-001", "Tienda Polanco"),
    ("store-002", "Tienda Santa Fe"),
    ("store-003", "Tienda Condesa"),
    ("store-004", "Tienda Roma Norte"),
    ("store-005", "Tienda Coyoacán"),
    ("store-006", "Tienda Del Valle"),
    ("store-007", "Tienda Satélite"),
    ("store-008", "Tienda Pedregal"),
    ("store-009", "Tienda Interlomas"),
    ("store-010", "Tienda Reforma"),
];

pub const UNKNOWN_STORE_NAME: &str = "Tienda Desconocida";

pub fn store_name(store_id: &StoreId) -> &'static str {
    STORE_DIRECTORY
        .iter()
        .find(|(id, _)| *id == store_id.as_str())
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_STORE_NAME)
}
