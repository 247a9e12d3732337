//! Static dataset served when the remote store is unreachable.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::database::models::{
    Event, EventType, Gender, HelperTask, Role, TaskPriority, TaskStatus, Team, TeamCategory,
    TrainingDay, TrainingTime, User, VenueType,
};

pub const ADMIN_ID: Uuid = Uuid::from_u128(0x1);
pub const TRAINER_ID: Uuid = Uuid::from_u128(0x2);
pub const PLAYER_ID: Uuid = Uuid::from_u128(0x3);

pub const TEAM_U14_M: Uuid = Uuid::from_u128(0x101);
pub const TEAM_U16_F: Uuid = Uuid::from_u128(0x102);
pub const TEAM_LIGA_M: Uuid = Uuid::from_u128(0x103);

pub const SEASON: &str = "2024/25";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    date(year, month, day).and_time(NaiveTime::MIN).and_utc()
}

fn user(id: Uuid, name: &str, email: &str, role: Role) -> User {
    User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        roles: vec![role],
        teams: vec![],
        assigned_teams: vec![],
        parent_of: vec![],
        phone: None,
        date_of_birth: None,
        profile_image: None,
        is_active: true,
        registration_date: midnight(2024, 1, 1),
    }
}

pub fn users() -> Vec<User> {
    let admin = user(ADMIN_ID, "Admin User", "admin@example.com", Role::Admin);

    let mut trainer = user(TRAINER_ID, "Trainer Hans", "trainer@example.com", Role::Trainer);
    trainer.teams = vec![TEAM_U14_M, TEAM_U16_F];
    trainer.assigned_teams = vec![TEAM_U14_M, TEAM_U16_F];
    trainer.phone = Some("+49 170 1234567".to_string());

    let mut player = user(PLAYER_ID, "Player Max", "player@example.com", Role::Player);
    player.teams = vec![TEAM_U14_M];
    player.date_of_birth = Some(date(2011, 3, 14));

    vec![admin, trainer, player]
}

fn training(day: TrainingDay, start: &str, end: &str, location: &str) -> TrainingTime {
    TrainingTime {
        day,
        start_time: start.to_string(),
        end_time: end.to_string(),
        location: location.to_string(),
    }
}

fn team(id: Uuid, name: &str, category: TeamCategory, gender: Gender) -> Team {
    Team {
        id,
        name: name.to_string(),
        category,
        gender,
        season: SEASON.to_string(),
        trainers: vec![],
        players: vec![],
        captain: None,
        description: None,
        training_times: vec![],
        is_active: true,
    }
}

pub fn teams() -> Vec<Team> {
    let mut u14 = team(TEAM_U14_M, "U14 Boys", TeamCategory::U14, Gender::Male);
    u14.trainers = vec![TRAINER_ID];
    u14.players = vec![PLAYER_ID];
    u14.captain = Some(PLAYER_ID);
    u14.training_times = vec![
        training(TrainingDay::Tuesday, "17:00", "18:30", "Sporthalle Mitte"),
        training(TrainingDay::Thursday, "17:00", "18:30", "Sporthalle Mitte"),
    ];

    let mut u16 = team(TEAM_U16_F, "U16 Girls", TeamCategory::U16, Gender::Female);
    u16.trainers = vec![TRAINER_ID];
    u16.training_times = vec![training(
        TrainingDay::Wednesday,
        "18:00",
        "19:30",
        "Sporthalle Nord",
    )];

    let mut liga = team(TEAM_LIGA_M, "Herren 1", TeamCategory::FourthLeague, Gender::Male);
    liga.description = Some("First men's team".to_string());
    liga.training_times = vec![
        training(TrainingDay::Monday, "19:30", "21:30", "Sporthalle Mitte"),
        training(TrainingDay::Friday, "19:30", "21:30", "Beachanlage Süd"),
    ];

    vec![u14, u16, liga]
}

pub fn events() -> Vec<Event> {
    vec![
        Event {
            id: Uuid::from_u128(0x201),
            title: "Training".to_string(),
            date: date(2025, 7, 15),
            event_type: EventType::Training,
            time: Some("17:00".to_string()),
            location: Some("Sporthalle Mitte".to_string()),
            venue_type: Some(VenueType::Indoor),
            opponent: None,
            description: None,
            max_participants: Some(20),
            participants: vec![PLAYER_ID],
            created_by: TRAINER_ID,
            requires_approval: false,
            team_id: Some(TEAM_U14_M),
        },
        Event {
            id: Uuid::from_u128(0x202),
            title: "Spiel vs. Eagles".to_string(),
            date: date(2025, 7, 19),
            event_type: EventType::Game,
            time: Some("14:00".to_string()),
            location: Some("Sporthalle Mitte".to_string()),
            venue_type: Some(VenueType::Indoor),
            opponent: Some("Eagles".to_string()),
            description: None,
            max_participants: Some(12),
            participants: vec![],
            created_by: TRAINER_ID,
            requires_approval: false,
            team_id: Some(TEAM_U14_M),
        },
        Event {
            id: Uuid::from_u128(0x203),
            title: "Stadtmeisterschaft".to_string(),
            date: date(2025, 8, 2),
            event_type: EventType::Tournament,
            time: Some("09:00".to_string()),
            location: Some("Beachanlage Süd".to_string()),
            venue_type: Some(VenueType::Beach),
            opponent: None,
            description: Some("City championship, all teams welcome".to_string()),
            max_participants: None,
            participants: vec![],
            created_by: ADMIN_ID,
            requires_approval: true,
            team_id: None,
        },
    ]
}

pub fn helper_tasks() -> Vec<HelperTask> {
    vec![HelperTask {
        id: Uuid::from_u128(0x301),
        event_id: Some(Uuid::from_u128(0x202)),
        task: "Scoreboard".to_string(),
        status: TaskStatus::Open,
        assigned_to: Some(PLAYER_ID),
        assigned_date: midnight(2025, 7, 10),
        completed_date: None,
        created_by: TRAINER_ID,
        description: None,
        priority: TaskPriority::Medium,
    }]
}
