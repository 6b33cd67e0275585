//! SQLite adapter for the MeetingStore port
//!
//! Counter writes are guarded by the `version` column: an update only
//! applies when the stored version still equals the one the caller read.

use application::{error::ApplicationError, ports::MeetingStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{Meeting, MeetingId, ReviewMethod};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use super::error::{corrupt, map_sqlx_error, to_i64};

const MEETING_COLUMNS: &str = "id, date, title, quick_review_count, quick_review_limit, \
                               meeting_review_count, meeting_review_limit, version";

/// SQLite implementation of the meeting store
#[derive(Debug, Clone)]
pub struct SqliteMeetingStore {
    pool: SqlitePool,
}

impl SqliteMeetingStore {
    /// Create a new store on an already migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert configured meetings that are not stored yet
    ///
    /// Meetings already present keep their stored counters and limits.
    /// Returns how many meetings were inserted.
    #[instrument(skip_all, fields(configured = meetings.len()))]
    pub async fn provision(&self, meetings: &[Meeting]) -> Result<u64, ApplicationError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let mut inserted = 0;

        for meeting in meetings {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO meetings
                 (id, date, title, quick_review_count, quick_review_limit,
                  meeting_review_count, meeting_review_limit, version)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            )
            .bind(to_i64(meeting.id().value())?)
            .bind(meeting.date().to_string())
            .bind(meeting.title())
            .bind(meeting.count(ReviewMethod::Quick))
            .bind(meeting.limit(ReviewMethod::Quick))
            .bind(meeting.count(ReviewMethod::Meeting))
            .bind(meeting.limit(ReviewMethod::Meeting))
            .bind(to_i64(meeting.version())?)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        info!(inserted, "Meetings provisioned");
        Ok(inserted)
    }
}

#[async_trait]
impl MeetingStore for SqliteMeetingStore {
    async fn get(&self, id: &MeetingId) -> Result<Option<Meeting>, ApplicationError> {
        let row: Option<MeetingRow> =
            sqlx::query_as(&format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = $1"))
                .bind(to_i64(id.value())?)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        row.map(MeetingRow::into_meeting).transpose()
    }

    async fn list(&self) -> Result<Vec<Meeting>, ApplicationError> {
        let rows: Vec<MeetingRow> =
            sqlx::query_as(&format!("SELECT {MEETING_COLUMNS} FROM meetings ORDER BY date, id"))
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        rows.into_iter().map(MeetingRow::into_meeting).collect()
    }

    #[instrument(skip(self, meeting), fields(meeting_id = %meeting.id()))]
    async fn compare_and_swap(
        &self,
        meeting: &Meeting,
        expected_version: u64,
    ) -> Result<bool, ApplicationError> {
        let id = to_i64(meeting.id().value())?;
        let result = sqlx::query(
            "UPDATE meetings
             SET quick_review_count = $1, meeting_review_count = $2, version = $3
             WHERE id = $4 AND version = $5",
        )
        .bind(meeting.count(ReviewMethod::Quick))
        .bind(meeting.count(ReviewMethod::Meeting))
        .bind(to_i64(meeting.version())?)
        .bind(id)
        .bind(to_i64(expected_version)?)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        let (exists,): (bool,) = sqlx::query_as("SELECT COUNT(*) > 0 FROM meetings WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        if !exists {
            return Err(ApplicationError::unknown("meeting", meeting.id()));
        }

        debug!("Stored meeting version moved on");
        Ok(false)
    }
}

/// Row type for meeting queries
#[derive(sqlx::FromRow)]
struct MeetingRow {
    id: i64,
    date: String,
    title: String,
    quick_review_count: i64,
    quick_review_limit: i64,
    meeting_review_count: i64,
    meeting_review_limit: i64,
    version: i64,
}

impl MeetingRow {
    fn into_meeting(self) -> Result<Meeting, ApplicationError> {
        let id = u64::try_from(self.id).map_err(|e| corrupt("meeting id", e))?;
        let version = u64::try_from(self.version).map_err(|e| corrupt("meeting version", e))?;
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| corrupt("meeting date", e))?;
        let counter = |column: &str, value: i64| {
            u32::try_from(value).map_err(|e| corrupt(column, e))
        };

        Meeting::new(
            MeetingId::new(id),
            date,
            self.title,
            counter("quick_review_limit", self.quick_review_limit)?,
            counter("meeting_review_limit", self.meeting_review_limit)?,
        )
        .with_counts(
            counter("quick_review_count", self.quick_review_count)?,
            counter("meeting_review_count", self.meeting_review_count)?,
        )
        .map(|meeting| meeting.with_version(version))
        .map_err(|e| corrupt("meeting counters", e))
    }
}
