use serde::{Deserialize, Serialize};

/// Lifecycle state the host picks for a new event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Active,
    Cancelled,
    Completed,
}

impl EventStatus {
    /// Exact wire names only; `"Active"` is not a status.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "active" => Some(EventStatus::Active),
            "cancelled" => Some(EventStatus::Cancelled),
            "completed" => Some(EventStatus::Completed),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Cancelled => "cancelled",
            EventStatus::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for EventStatus {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_name(value).ok_or_else(|| {
            format!(
                "Invalid event status {:?}: expected active, cancelled or completed",
                value
            )
        })
    }
}
