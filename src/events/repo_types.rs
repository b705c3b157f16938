use sqlx::FromRow;
use time::{Date, Time};

/// Sports event record in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SportsEvent {
    pub id: i64,
    pub title: String,
    pub location: String,
    #[sqlx(rename = "event_date")]
    pub date: Date,
    #[sqlx(rename = "event_time")]
    pub time: Time,
    pub tag: String,
    pub created_by: i64,
}

impl SportsEvent {
    pub fn is_created_by(&self, user_id: i64) -> bool {
        self.created_by == user_id
    }
}
