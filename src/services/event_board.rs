use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::database::{
    models::{Event, EventInput, EventUpdate, User},
    repositories::event,
};
use crate::error::AppError;
use crate::services::{backend::Backend, mirror::Mirror};

const EVENT_PAGE_SIZE: i64 = 500;

/// Mirror of the club calendar.
#[derive(Clone)]
pub struct EventBoard {
    backend: Backend,
    events: Arc<Mirror<Event>>,
}

impl EventBoard {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            events: Arc::new(Mirror::default()),
        }
    }

    pub async fn seed(&self, events: Vec<Event>) {
        self.events.replace_all(chronological(events)).await;
    }

    pub async fn refresh(&self) -> Result<(), AppError> {
        let Some(pool) = self.backend.pool() else {
            return Ok(());
        };

        match event::list_events(pool, EVENT_PAGE_SIZE).await {
            Ok(events) => {
                log::debug!("Loaded {} events", events.len());
                self.events.replace_all(chronological(events)).await;
                Ok(())
            }
            Err(e) => {
                log::warn!("Failed to load events: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn list(&self) -> Vec<Event> {
        self.events.all().await
    }

    pub async fn find(&self, id: Uuid) -> Result<Event, AppError> {
        self.events
            .get(id)
            .await
            .ok_or_else(|| AppError::not_found("Event not found"))
    }

    pub async fn create(&self, input: EventInput, created_by: Uuid) -> Result<Event, AppError> {
        input.validate()?;
        let draft = input.into_event(Uuid::new_v4(), created_by);

        let created = match self.backend.pool() {
            Some(pool) => event::create_event(pool, &draft).await.map_err(|e| {
                log::error!("Failed to create event '{}': {}", draft.title, e);
                AppError::from(e)
            })?,
            None => draft,
        };

        self.events.upsert(created.clone()).await;
        Ok(created)
    }

    pub async fn update(&self, id: Uuid, update: &EventUpdate) -> Result<Event, AppError> {
        update.validate()?;
        let update = &update.clone().normalized();

        let Some(pool) = self.backend.pool() else {
            return self
                .events
                .patch(id, |e| update.apply(e))
                .await
                .ok_or_else(|| AppError::not_found("Event not found"));
        };

        let updated = event::update_event(pool, id, update)
            .await
            .map_err(|e| {
                log::error!("Failed to update event {}: {}", id, e);
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found("Event not found"))?;

        self.events.upsert(updated.clone()).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if let Some(pool) = self.backend.pool() {
            event::delete_event(pool, id)
                .await
                .map_err(|e| {
                    log::error!("Failed to delete event {}: {}", id, e);
                    AppError::from(e)
                })?
                .ok_or_else(|| AppError::not_found("Event not found"))?;
            self.events.remove(id).await;
            return Ok(());
        }

        self.events
            .remove(id)
            .await
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Event not found"))
    }

    /// Signs `user_id` up. Joining twice is a no-op; a full event is rejected.
    pub async fn join(&self, id: Uuid, user_id: Uuid) -> Result<Event, AppError> {
        let current = self.find(id).await?;
        if current.is_participant(user_id) {
            return Ok(current);
        }
        if !current.has_capacity() {
            return Err(AppError::bad_request("Event is fully booked"));
        }

        let mut participants = current.participants;
        participants.push(user_id);
        self.write_participants(id, participants).await
    }

    pub async fn leave(&self, id: Uuid, user_id: Uuid) -> Result<Event, AppError> {
        let current = self.find(id).await?;
        if !current.is_participant(user_id) {
            return Ok(current);
        }

        let participants = current
            .participants
            .into_iter()
            .filter(|p| *p != user_id)
            .collect();
        self.write_participants(id, participants).await
    }

    async fn write_participants(
        &self,
        id: Uuid,
        participants: Vec<Uuid>,
    ) -> Result<Event, AppError> {
        let Some(pool) = self.backend.pool() else {
            return self
                .events
                .patch(id, |e| e.participants = participants)
                .await
                .ok_or_else(|| AppError::not_found("Event not found"));
        };

        let updated = event::set_participants(pool, id, &participants)
            .await
            .map_err(|e| {
                log::error!("Failed to update participants of event {}: {}", id, e);
                AppError::from(e)
            })?
            .ok_or_else(|| AppError::not_found("Event not found"))?;

        self.events.upsert(updated.clone()).await;
        Ok(updated)
    }

    pub async fn on_day(&self, day: NaiveDate) -> Vec<Event> {
        self.events.filter(|e| e.date == day).await
    }

    /// Events from `today` on, earliest first.
    pub async fn upcoming(&self, today: NaiveDate) -> Vec<Event> {
        chronological(self.events.filter(|e| e.date >= today).await)
    }

    /// Calendar of `user`: admins see everything, everyone else sees
    /// club-wide events plus those of their own teams.
    pub async fn personal(&self, user: &User) -> Vec<Event> {
        if user.is_admin() {
            return self.events.all().await;
        }

        self.events
            .filter(|e| match e.team_id {
                Some(team_id) => user.teams.contains(&team_id),
                None => true,
            })
            .await
    }
}

/// The remote page arrives newest first; the calendar reads oldest first.
fn chronological(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.time.cmp(&b.time)));
    events
}
