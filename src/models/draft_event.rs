use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::EventStatus;

/// Editable inputs of the creation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Description,
    Location,
    Date,
    Time,
    Status,
}

impl Field {
    pub const REQUIRED: [Field; 4] = [Field::Title, Field::Location, Field::Date, Field::Time];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "title" => Some(Field::Title),
            "description" => Some(Field::Description),
            "location" => Some(Field::Location),
            "date" => Some(Field::Date),
            "time" => Some(Field::Time),
            "status" => Some(Field::Status),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Location => "location",
            Field::Date => "date",
            Field::Time => "time",
            Field::Status => "status",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

/// The unsaved event being authored.
///
/// Values are kept exactly as typed; `date` and `time` hold the string forms
/// produced by date (`YYYY-MM-DD`) and time (`HH:MM`) inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub time: String,
    pub status: EventStatus,
}

/// Body of `POST /api/events`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub location: String,
    /// Local timestamp `YYYY-MM-DDTHH:MM:00`, no offset.
    pub date: String,
    pub status: EventStatus,
}

impl DraftEvent {
    /// Returns a copy of the draft with one field replaced.
    pub fn with_field(&self, field: Field, value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let mut next = self.clone();
        match field {
            Field::Title => next.title = value,
            Field::Description => next.description = value,
            Field::Location => next.location = value,
            Field::Date => next.date = value,
            Field::Time => next.time = value,
            Field::Status => {
                next.status = EventStatus::try_from(value.as_str()).map_err(AppError::Validation)?
            }
        }
        Ok(next)
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Location => &self.location,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Status => self.status.name(),
        }
    }

    /// Required fields that are currently empty, in form order.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::REQUIRED
            .into_iter()
            .filter(|field| self.value(*field).is_empty())
            .collect()
    }

    pub fn date_time(&self) -> String {
        format!("{}T{}:00", self.date, self.time)
    }

    pub fn to_request(&self) -> CreateEventRequest {
        CreateEventRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            date: self.date_time(),
            status: self.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> DraftEvent {
        DraftEvent {
            title: "Open Day".to_string(),
            description: String::new(),
            location: "Building G".to_string(),
            date: "2024-05-01".to_string(),
            time: "14:30".to_string(),
            status: EventStatus::Active,
        }
    }

    #[test]
    fn date_time_joins_date_and_time() {
        assert_eq!(filled().date_time(), "2024-05-01T14:30:00");
    }

    #[test]
    fn with_field_replaces_only_that_field() {
        let draft = filled();
        let next = draft.with_field(Field::Location, "Great Hall").unwrap();

        assert_eq!(next.location, "Great Hall");
        assert_eq!(next.title, draft.title);
        assert_eq!(next.date, draft.date);
        assert_eq!(draft.location, "Building G");
    }

    #[test]
    fn with_field_rejects_unknown_status() {
        let draft = filled();
        assert!(draft.with_field(Field::Status, "archived").is_err());
        assert!(draft.with_field(Field::Status, "ACTIVE").is_err());
        assert!(draft.with_field(Field::Status, "Completed").is_err());

        let next = draft.with_field(Field::Status, "cancelled").unwrap();
        assert_eq!(next.status, EventStatus::Cancelled);
    }

    #[test]
    fn missing_required_ignores_description() {
        assert!(filled().missing_required().is_empty());
        assert_eq!(
            DraftEvent::default().missing_required(),
            vec![Field::Title, Field::Location, Field::Date, Field::Time]
        );

        let mut draft = filled();
        draft.time.clear();
        assert_eq!(draft.missing_required(), vec![Field::Time]);
    }

    #[test]
    fn request_uses_combined_timestamp() {
        let request = filled().to_request();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "title": "Open Day",
                "description": "",
                "location": "Building G",
                "date": "2024-05-01T14:30:00",
                "status": "active"
            })
        );
    }

    #[test]
    fn field_names_round_trip() {
        for field in [Field::Title, Field::Description, Field::Status] {
            assert_eq!(Field::from_name(field.name()), Some(field));
        }
        assert_eq!(Field::from_name("venue"), None);
        assert!(Field::Date.is_required());
        assert!(!Field::Description.is_required());
    }
}
