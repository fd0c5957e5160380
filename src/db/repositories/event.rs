use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

use crate::entities::{events, prelude::*};
use crate::models::event::format_event_time;
use crate::models::{DATE_FORMAT, Event, EventFilter, EventUpdate, NewEvent};

/// Repository for event records
pub struct EventRepository {
    conn: DatabaseConnection,
}

impl EventRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_models(rows: Vec<events::Model>) -> Result<Vec<Event>> {
        rows.into_iter().map(Event::try_from).collect()
    }

    pub async fn create(&self, event: &NewEvent, client_name: &str) -> Result<Event> {
        let active = events::ActiveModel {
            contract_id: Set(event.contract_id),
            client_name: Set(client_name.to_string()),
            start_at: Set(format_event_time(&event.start_at)),
            end_at: Set(format_event_time(&event.end_at)),
            support_id: Set(None),
            location: Set(event.location.clone()),
            attendees: Set(event.attendees),
            notes: Set(event.notes.clone()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert event")?;
        info!(
            "Added event {} for contract {}",
            model.id, model.contract_id
        );
        Event::try_from(model)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Event>> {
        let row = Events::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query event")?;
        row.map(Event::try_from).transpose()
    }

    /// Events matching `filter`, ordered by start time. `now` splits past from future.
    pub async fn list(&self, filter: EventFilter, now: NaiveDateTime) -> Result<Vec<Event>> {
        let mut query = Events::find().order_by_asc(events::Column::StartAt);
        let now = format_event_time(&now);

        query = match filter {
            EventFilter::All => query,
            EventFilter::Past => query.filter(events::Column::StartAt.lt(now)),
            EventFilter::Future => query.filter(events::Column::StartAt.gte(now)),
            EventFilter::OnDate(date) => query.filter(
                events::Column::StartAt.starts_with(date.format(DATE_FORMAT).to_string()),
            ),
            EventFilter::Unassigned => query.filter(events::Column::SupportId.is_null()),
        };

        let rows = query
            .all(&self.conn)
            .await
            .context("Failed to list events")?;
        Self::map_models(rows)
    }

    pub async fn list_by_support(&self, support_id: i32) -> Result<Vec<Event>> {
        let rows = Events::find()
            .filter(events::Column::SupportId.eq(support_id))
            .order_by_asc(events::Column::StartAt)
            .all(&self.conn)
            .await
            .context("Failed to list events for support")?;
        Self::map_models(rows)
    }

    pub async fn update(&self, id: i32, changes: &EventUpdate) -> Result<Option<Event>> {
        let Some(row) = Events::find_by_id(id).one(&self.conn).await? else {
            return Ok(None);
        };

        let mut active: events::ActiveModel = row.into();
        if let Some(v) = &changes.start_at {
            active.start_at = Set(format_event_time(v));
        }
        if let Some(v) = &changes.end_at {
            active.end_at = Set(format_event_time(v));
        }
        if let Some(v) = changes.support_id {
            active.support_id = Set(v);
        }
        if let Some(v) = &changes.location {
            active.location = Set(v.clone());
        }
        if let Some(v) = changes.attendees {
            active.attendees = Set(v);
        }
        if let Some(v) = &changes.notes {
            active.notes = Set(v.clone());
        }

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update event")?;
        Event::try_from(model).map(Some)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Events::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete event")?;
        Ok(result.rows_affected > 0)
    }
}
