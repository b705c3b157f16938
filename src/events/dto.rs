use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::events::repo_types::SportsEvent;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Written as `HH:MM:SS`; read from `HH:MM`, `HH:MM:SS` or `HH:MM:SS.ffffff`.
mod clock_time {
    use serde::{de::Error as _, ser::Error as _, Deserialize, Deserializer, Serializer};
    use time::{format_description::FormatItem, macros::format_description, Time};

    const OUTPUT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
    const INPUTS: &[&[FormatItem<'static>]] = &[
        format_description!("[hour]:[minute]:[second].[subsecond]"),
        OUTPUT,
        format_description!("[hour]:[minute]"),
    ];

    pub fn serialize<S: Serializer>(value: &Time, serializer: S) -> Result<S::Ok, S::Error> {
        let text = value.format(OUTPUT).map_err(S::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Time, D::Error> {
        let raw = String::deserialize(deserializer)?;
        INPUTS
            .iter()
            .find_map(|fmt| Time::parse(&raw, *fmt).ok())
            .ok_or_else(|| {
                D::Error::custom(format!("invalid time {raw:?}, expected HH:MM[:SS[.ffffff]]"))
            })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub location: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "clock_time")]
    pub time: Time,
    pub tag: String,
}

/// Partial update; date and time are fixed once an event exists.
#[derive(Debug, Default, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub location: Option<String>,
    pub tag: Option<String>,
}

impl EventUpdate {
    /// Overwrite only the fields present in the request.
    pub fn apply(self, event: &mut SportsEvent) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(tag) = self.tag {
            event.tag = tag;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub location: String,
    #[serde(with = "iso_date")]
    pub date: Date,
    #[serde(with = "clock_time")]
    pub time: Time,
    pub tag: String,
    pub created_by: i64,
}

impl From<SportsEvent> for EventResponse {
    fn from(e: SportsEvent) -> Self {
        Self {
            id: e.id,
            title: e.title,
            location: e.location,
            date: e.date,
            time: e.time,
            tag: e.tag,
            created_by: e.created_by,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}
fn default_limit() -> i64 {
    10
}
