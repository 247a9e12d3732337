use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use crate::error::AppError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum EventType {
        Training => "training",
        Game => "game",
        Tournament => "tournament",
        Helper => "helper",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum VenueType {
        Indoor => "indoor",
        Beach => "beach",
        Club => "club",
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[sqlx(rename = "type")]
    pub event_type: EventType,
    pub time: Option<String>,
    pub location: Option<String>,
    pub venue_type: Option<VenueType>,
    pub opponent: Option<String>,
    pub description: Option<String>,
    pub max_participants: Option<i32>,
    pub participants: Option<Vec<Uuid>>,
    pub created_by: Uuid,
    pub requires_approval: Option<bool>,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub time: Option<String>,
    pub location: Option<String>,
    pub venue_type: Option<VenueType>,
    pub opponent: Option<String>,
    pub description: Option<String>,
    pub max_participants: Option<i32>,
    pub participants: Vec<Uuid>,
    pub created_by: Uuid,
    pub requires_approval: bool,
    pub team_id: Option<Uuid>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            date: row.date,
            event_type: row.event_type,
            time: row.time,
            location: row.location,
            venue_type: row.venue_type,
            opponent: row.opponent,
            description: row.description,
            max_participants: row.max_participants,
            participants: row.participants.unwrap_or_default(),
            created_by: row.created_by,
            requires_approval: row.requires_approval.unwrap_or(false),
            team_id: row.team_id,
        }
    }
}

impl Event {
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.participants.contains(&user_id)
    }

    /// No capacity limit, or at least one seat left.
    pub fn has_capacity(&self) -> bool {
        match self.max_participants {
            Some(max) => (self.participants.len() as i64) < i64::from(max),
            None => true,
        }
    }
}

/// Fields submitted by the event form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub time: Option<String>,
    pub location: Option<String>,
    pub venue_type: Option<VenueType>,
    pub opponent: Option<String>,
    pub description: Option<String>,
    pub max_participants: Option<i32>,
    #[serde(default)]
    pub requires_approval: bool,
    pub team_id: Option<Uuid>,
}

impl EventInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::bad_request("Event title is required"));
        }
        if self.max_participants.is_some_and(|max| max < 0) {
            return Err(AppError::bad_request(
                "Maximum participants must not be negative",
            ));
        }
        Ok(())
    }

    pub fn into_event(self, id: Uuid, created_by: Uuid) -> Event {
        Event {
            id,
            title: self.title.trim().to_string(),
            date: self.date,
            event_type: self.event_type,
            time: blank_to_none(self.time),
            location: blank_to_none(self.location),
            venue_type: self.venue_type,
            opponent: blank_to_none(self.opponent),
            description: blank_to_none(self.description),
            max_participants: self.max_participants,
            participants: Vec::new(),
            created_by,
            requires_approval: self.requires_approval,
            team_id: self.team_id,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub venue_type: Option<VenueType>,
    pub opponent: Option<String>,
    pub description: Option<String>,
    pub max_participants: Option<i32>,
    pub requires_approval: Option<bool>,
    pub team_id: Option<Uuid>,
}

impl EventUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::bad_request("Event title must not be empty"));
        }
        if self.max_participants.is_some_and(|max| max < 0) {
            return Err(AppError::bad_request(
                "Maximum participants must not be negative",
            ));
        }
        Ok(())
    }

    /// Trims the title so online and offline updates store the same value.
    pub fn normalized(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_string());
        self
    }

    pub fn apply(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(event_type) = self.event_type {
            event.event_type = event_type;
        }
        if let Some(time) = &self.time {
            event.time = Some(time.clone());
        }
        if let Some(location) = &self.location {
            event.location = Some(location.clone());
        }
        if let Some(venue_type) = self.venue_type {
            event.venue_type = Some(venue_type);
        }
        if let Some(opponent) = &self.opponent {
            event.opponent = Some(opponent.clone());
        }
        if let Some(description) = &self.description {
            event.description = Some(description.clone());
        }
        if let Some(max) = self.max_participants {
            event.max_participants = Some(max);
        }
        if let Some(requires_approval) = self.requires_approval {
            event.requires_approval = requires_approval;
        }
        if let Some(team_id) = self.team_id {
            event.team_id = Some(team_id);
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input() -> EventInput {
        serde_json::from_value(serde_json::json!({
            "title": "Training",
            "date": "2025-07-15",
            "type": "training",
            "time": "19:00",
            "location": ""
        }))
        .unwrap()
    }

    #[test]
    fn new_event_starts_without_participants() {
        let event = input().into_event(Uuid::from_u128(9), Uuid::from_u128(1));

        assert!(event.participants.is_empty());
        assert_eq!(event.time.as_deref(), Some("19:00"));
        assert_eq!(event.location, None);
        assert_eq!(event.created_by, Uuid::from_u128(1));
    }

    #[test]
    fn capacity_counts_participants() {
        let mut event = input().into_event(Uuid::from_u128(9), Uuid::from_u128(1));
        event.max_participants = Some(1);
        assert!(event.has_capacity());

        event.participants.push(Uuid::from_u128(2));
        assert!(!event.has_capacity());
    }

    #[test]
    fn update_rejects_negative_capacity() {
        let update = EventUpdate {
            max_participants: Some(-5),
            ..Default::default()
        };
        assert!(matches!(update.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn normalized_update_trims_title() {
        let update = EventUpdate {
            title: Some("  Abschlusstraining ".to_string()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(update.title.as_deref(), Some("Abschlusstraining"));
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut input = input();
        input.title = "   ".to_string();
        assert!(matches!(input.validate(), Err(AppError::BadRequest(_))));
    }
}
