use chrono::{SecondsFormat, Utc};
use gebra_algo::sanitize::is_mastery_value;
use gebra_algo::DEFAULT_PRIOR;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool};

use crate::services::MasteryError;

const PRETEST_UPSERT_SQL: &str = r#"
    INSERT INTO "mastery" ("userId", "topicId", "pL", "isRead", "updatedAt")
    VALUES (?, ?, ?, 0, ?)
    ON CONFLICT ("userId", "topicId") DO UPDATE SET
      "pL" = excluded."pL",
      "isRead" = 0,
      "updatedAt" = excluded."updatedAt"
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
    pub user_id: String,
    pub topic_id: String,
    pub p_l: f64,
    pub is_read: bool,
    pub updated_at: String,
}

/// Composite-keyed mastery state, one row per (learner, topic).
///
/// Every write is a single `INSERT .. ON CONFLICT DO UPDATE`, so concurrent
/// writers on the same key never duplicate rows or interleave a
/// read-modify-write.
#[derive(Debug, Clone)]
pub struct MasteryStore {
    pool: SqlitePool,
}

impl MasteryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Current mastery and read flag, `(0.5, false)` when nothing is stored.
    /// Never writes the default back.
    pub async fn get(&self, user_id: &str, topic_id: &str) -> Result<(f64, bool), MasteryError> {
        Ok(self
            .find(user_id, topic_id)
            .await?
            .map(|record| (record.p_l, record.is_read))
            .unwrap_or((DEFAULT_PRIOR, false)))
    }

    pub async fn find(
        &self,
        user_id: &str,
        topic_id: &str,
    ) -> Result<Option<MasteryRecord>, MasteryError> {
        let row = sqlx::query(
            r#"
            SELECT "userId", "topicId", "pL", "isRead", "updatedAt"
            FROM "mastery"
            WHERE "userId" = ? AND "topicId" = ?
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(topic_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_row(&row)).transpose()
    }

    pub async fn list_for_learner(&self, user_id: &str) -> Result<Vec<MasteryRecord>, MasteryError> {
        let rows = sqlx::query(
            r#"
            SELECT "userId", "topicId", "pL", "isRead", "updatedAt"
            FROM "mastery"
            WHERE "userId" = ?
            ORDER BY "topicId"
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row).collect()
    }

    /// Overwrite the probability, leaving `is_read` as it was.
    pub async fn set_mastery(
        &self,
        user_id: &str,
        topic_id: &str,
        p_l: f64,
    ) -> Result<(), MasteryError> {
        ensure_mastery_value(p_l)?;

        sqlx::query(
            r#"
            INSERT INTO "mastery" ("userId", "topicId", "pL", "isRead", "updatedAt")
            VALUES (?, ?, ?, 0, ?)
            ON CONFLICT ("userId", "topicId") DO UPDATE SET
              "pL" = excluded."pL",
              "updatedAt" = excluded."updatedAt"
            "#,
        )
        .bind(user_id)
        .bind(topic_id)
        .bind(p_l)
        .bind(now_iso())
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id, topic_id, p_l, "mastery updated");
        Ok(())
    }

    /// Flag reference material as consumed, leaving `pL` as it was.
    pub async fn mark_read(&self, user_id: &str, topic_id: &str) -> Result<(), MasteryError> {
        sqlx::query(
            r#"
            INSERT INTO "mastery" ("userId", "topicId", "pL", "isRead", "updatedAt")
            VALUES (?, ?, ?, 1, ?)
            ON CONFLICT ("userId", "topicId") DO UPDATE SET "isRead" = 1
            "#,
        )
        .bind(user_id)
        .bind(topic_id)
        .bind(DEFAULT_PRIOR)
        .bind(now_iso())
        .execute(&self.pool)
        .await?;

        tracing::debug!(user_id, topic_id, "material marked read");
        Ok(())
    }

    /// Seed mastery from the diagnostic. Always clears the read flag.
    pub async fn set_from_pretest(
        &self,
        user_id: &str,
        topic_id: &str,
        p_l: f64,
    ) -> Result<(), MasteryError> {
        upsert_pretest(&self.pool, user_id, topic_id, p_l).await
    }
}

pub(crate) async fn upsert_pretest<'e, E>(
    executor: E,
    user_id: &str,
    topic_id: &str,
    p_l: f64,
) -> Result<(), MasteryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    ensure_mastery_value(p_l)?;

    sqlx::query(PRETEST_UPSERT_SQL)
        .bind(user_id)
        .bind(topic_id)
        .bind(p_l)
        .bind(now_iso())
        .execute(executor)
        .await?;

    tracing::debug!(user_id, topic_id, p_l, "mastery seeded from pretest");
    Ok(())
}

fn ensure_mastery_value(p_l: f64) -> Result<(), MasteryError> {
    if is_mastery_value(p_l) {
        Ok(())
    } else {
        Err(MasteryError::InvalidState(format!(
            "mastery {p_l} outside [0, 0.99]"
        )))
    }
}

fn map_row(row: &SqliteRow) -> Result<MasteryRecord, MasteryError> {
    let user_id: String = row.try_get("userId")?;
    let topic_id: String = row.try_get("topicId")?;
    let p_l: f64 = row.try_get("pL")?;
    let is_read: i64 = row.try_get("isRead")?;
    let updated_at: String = row.try_get("updatedAt")?;

    if !is_mastery_value(p_l) {
        tracing::warn!(user_id, topic_id, p_l, "stored mastery out of range");
        return Err(MasteryError::InvalidState(format!(
            "stored mastery {p_l} for ({user_id}, {topic_id}) outside [0, 0.99]"
        )));
    }

    Ok(MasteryRecord {
        user_id,
        topic_id,
        p_l,
        is_read: is_read != 0,
        updated_at,
    })
}

pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
