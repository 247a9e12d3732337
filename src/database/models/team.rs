use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use super::macros::string_enum;
use crate::error::AppError;

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TeamCategory {
        U14 => "U14",
        U16 => "U16",
        U20 => "U20",
        U23 => "U23",
        FourthLeague => "4. Liga",
        Seniors => "Seniors",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Gender {
        Male => "M",
        Female => "F",
        Mixed => "Mixed",
    }
}

string_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum TrainingDay {
        Monday => "monday",
        Tuesday => "tuesday",
        Wednesday => "wednesday",
        Thursday => "thursday",
        Friday => "friday",
        Saturday => "saturday",
        Sunday => "sunday",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingTime {
    pub day: TrainingDay,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TeamRow {
    pub id: Uuid,
    pub name: String,
    pub category: TeamCategory,
    pub gender: Gender,
    pub season: String,
    pub trainers: Option<Vec<Uuid>>,
    pub players: Option<Vec<Uuid>>,
    pub captain: Option<Uuid>,
    pub description: Option<String>,
    pub training_times: Option<Json<Vec<TrainingTime>>>,
    pub is_active: Option<bool>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub name: String,
    pub category: TeamCategory,
    pub gender: Gender,
    pub season: String,
    pub trainers: Vec<Uuid>,
    pub players: Vec<Uuid>,
    pub captain: Option<Uuid>,
    pub description: Option<String>,
    pub training_times: Vec<TrainingTime>,
    pub is_active: bool,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            gender: row.gender,
            season: row.season,
            trainers: row.trainers.unwrap_or_default(),
            players: row.players.unwrap_or_default(),
            captain: row.captain,
            description: row.description,
            training_times: row.training_times.map(|j| j.0).unwrap_or_default(),
            is_active: row.is_active.unwrap_or(true),
        }
    }
}

impl Team {
    pub fn has_player(&self, user_id: Uuid) -> bool {
        self.players.contains(&user_id)
    }

    pub fn has_trainer(&self, user_id: Uuid) -> bool {
        self.trainers.contains(&user_id)
    }

    pub fn members(&self, kind: MemberKind) -> &Vec<Uuid> {
        match kind {
            MemberKind::Player => &self.players,
            MemberKind::Trainer => &self.trainers,
        }
    }

    pub fn members_mut(&mut self, kind: MemberKind) -> &mut Vec<Uuid> {
        match kind {
            MemberKind::Player => &mut self.players,
            MemberKind::Trainer => &mut self.trainers,
        }
    }
}

/// Which roster list of a team a member belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    Player,
    Trainer,
}

impl MemberKind {
    pub fn column(&self) -> &'static str {
        match self {
            MemberKind::Player => "players",
            MemberKind::Trainer => "trainers",
        }
    }

    pub fn from_column(column: &str) -> Option<Self> {
        match column {
            "players" => Some(MemberKind::Player),
            "trainers" => Some(MemberKind::Trainer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    pub name: String,
    pub category: TeamCategory,
    pub gender: Gender,
    pub season: String,
    #[serde(default)]
    pub trainers: Vec<Uuid>,
    #[serde(default)]
    pub players: Vec<Uuid>,
    pub captain: Option<Uuid>,
    pub description: Option<String>,
    #[serde(default)]
    pub training_times: Vec<TrainingTime>,
}

impl TeamInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::bad_request("Team name is required"));
        }
        if self.season.trim().is_empty() {
            return Err(AppError::bad_request("Season is required"));
        }
        Ok(())
    }

    pub fn into_team(self, id: Uuid) -> Team {
        Team {
            id,
            name: self.name,
            category: self.category,
            gender: self.gender,
            season: self.season,
            trainers: self.trainers,
            players: self.players,
            captain: self.captain,
            description: self.description,
            training_times: self.training_times,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub category: Option<TeamCategory>,
    pub gender: Option<Gender>,
    pub season: Option<String>,
    pub captain: Option<Uuid>,
    pub description: Option<String>,
    pub training_times: Option<Vec<TrainingTime>>,
}

impl TeamUpdate {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(AppError::bad_request("Team name must not be empty"));
        }
        Ok(())
    }

    pub fn apply(&self, team: &mut Team) {
        if let Some(name) = &self.name {
            team.name = name.clone();
        }
        if let Some(category) = self.category {
            team.category = category;
        }
        if let Some(gender) = self.gender {
            team.gender = gender;
        }
        if let Some(season) = &self.season {
            team.season = season.clone();
        }
        if let Some(captain) = self.captain {
            team.captain = Some(captain);
        }
        if let Some(description) = &self.description {
            team.description = Some(description.clone());
        }
        if let Some(training_times) = &self.training_times {
            team.training_times = training_times.clone();
        }
    }
}
