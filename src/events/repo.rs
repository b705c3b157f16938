use sqlx::PgPool;

use crate::events::{dto::CreateEventRequest, repo_types::SportsEvent};

const EVENT_COLUMNS: &str = "id, title, location, event_date, event_time, tag, created_by";

impl SportsEvent {
    pub async fn insert(
        db: &PgPool,
        new: &CreateEventRequest,
        created_by: i64,
    ) -> anyhow::Result<SportsEvent> {
        let event = sqlx::query_as::<_, SportsEvent>(&format!(
            r#"
            INSERT INTO sports_events (title, location, event_date, event_time, tag, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(&new.title)
        .bind(&new.location)
        .bind(new.date)
        .bind(new.time)
        .bind(&new.tag)
        .bind(created_by)
        .fetch_one(db)
        .await?;
        Ok(event)
    }

    pub async fn find(db: &PgPool, id: i64) -> anyhow::Result<Option<SportsEvent>> {
        let event = sqlx::query_as::<_, SportsEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM sports_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(event)
    }

    /// Most recent first: date, then time, both descending.
    pub async fn list(db: &PgPool, skip: i64, limit: i64) -> anyhow::Result<Vec<SportsEvent>> {
        let rows = sqlx::query_as::<_, SportsEvent>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM sports_events
            ORDER BY event_date DESC, event_time DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Persist the updatable columns. `None` if the row is gone.
    pub async fn save(&self, db: &PgPool) -> anyhow::Result<Option<SportsEvent>> {
        let event = sqlx::query_as::<_, SportsEvent>(&format!(
            r#"
            UPDATE sports_events
            SET title = $2, location = $3, tag = $4
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.location)
        .bind(&self.tag)
        .fetch_optional(db)
        .await?;
        Ok(event)
    }

    /// Returns whether a row was removed.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM sports_events WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
