use crate::entities::events;
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Format of event timestamps, both stored and typed at the prompt.
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[must_use]
pub fn format_event_time(time: &NaiveDateTime) -> String {
    time.format(EVENT_TIME_FORMAT).to_string()
}

pub fn parse_event_time(value: &str) -> anyhow::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), EVENT_TIME_FORMAT)
        .with_context(|| format!("Invalid date/time '{value}' (expected YYYY-MM-DD HH:MM)"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: i32,
    pub contract_id: i32,
    pub client_name: String,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub support_id: Option<i32>,
    pub location: String,
    pub attendees: i32,
    pub notes: String,
}

impl TryFrom<events::Model> for Event {
    type Error = anyhow::Error;

    fn try_from(model: events::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            contract_id: model.contract_id,
            client_name: model.client_name,
            start_at: parse_event_time(&model.start_at)?,
            end_at: parse_event_time(&model.end_at)?,
            support_id: model.support_id,
            location: model.location,
            attendees: model.attendees,
            notes: model.notes,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub contract_id: i32,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub location: String,
    pub attendees: i32,
    pub notes: String,
}

/// Field changes; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub start_at: Option<NaiveDateTime>,
    pub end_at: Option<NaiveDateTime>,
    /// `Some(None)` unassigns the support collaborator.
    pub support_id: Option<Option<i32>>,
    pub location: Option<String>,
    pub attendees: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    #[default]
    All,
    Past,
    Future,
    OnDate(NaiveDate),
    Unassigned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_time_round_trips_through_text() {
        let parsed = parse_event_time("2026-06-01 18:30").unwrap();
        assert_eq!(format_event_time(&parsed), "2026-06-01 18:30");
    }

    #[test]
    fn event_time_rejects_date_only() {
        assert!(parse_event_time("2026-06-01").is_err());
    }

    #[test]
    fn stored_text_sorts_chronologically() {
        let early = format_event_time(&parse_event_time("2026-01-09 09:00").unwrap());
        let late = format_event_time(&parse_event_time("2026-01-10 08:00").unwrap());
        assert!(early < late);
    }
}
