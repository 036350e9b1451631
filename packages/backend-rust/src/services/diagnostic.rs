use serde::Serialize;
use sqlx::{Row, Sqlite, SqlitePool};

use crate::services::mastery_store::now_iso;
use crate::services::MasteryError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearnerDiagnosticState {
    pub user_id: String,
    pub completed: bool,
    pub score: f64,
    pub completed_at: String,
}

#[derive(Debug, Clone)]
pub struct DiagnosticStore {
    pool: SqlitePool,
}

impl DiagnosticStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<LearnerDiagnosticState>, MasteryError> {
        let row = sqlx::query(
            r#"SELECT "userId", "completed", "score", "completedAt" FROM "learner_diagnostics" WHERE "userId" = ?"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let completed: i64 = row.try_get("completed")?;
        Ok(Some(LearnerDiagnosticState {
            user_id: row.try_get("userId")?,
            completed: completed != 0,
            score: row.try_get("score")?,
            completed_at: row.try_get("completedAt")?,
        }))
    }

    pub async fn has_completed(&self, user_id: &str) -> Result<bool, MasteryError> {
        Ok(self.get(user_id).await?.is_some_and(|state| state.completed))
    }
}

/// Record a first-time submission. Returns `false` when the learner already
/// has a completed diagnostic, in which case nothing is written.
pub(crate) async fn insert_first<'e, E>(
    executor: E,
    user_id: &str,
    score: f64,
) -> Result<bool, MasteryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO "learner_diagnostics" ("userId", "completed", "score", "completedAt")
        VALUES (?, 1, ?, ?)
        ON CONFLICT ("userId") DO UPDATE SET
          "completed" = 1,
          "score" = excluded."score",
          "completedAt" = excluded."completedAt"
        WHERE "learner_diagnostics"."completed" = 0
        "#,
    )
    .bind(user_id)
    .bind(score)
    .bind(now_iso())
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub(crate) async fn upsert<'e, E>(executor: E, user_id: &str, score: f64) -> Result<(), MasteryError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO "learner_diagnostics" ("userId", "completed", "score", "completedAt")
        VALUES (?, 1, ?, ?)
        ON CONFLICT ("userId") DO UPDATE SET
          "completed" = 1,
          "score" = excluded."score",
          "completedAt" = excluded."completedAt"
        "#,
    )
    .bind(user_id)
    .bind(score)
    .bind(now_iso())
    .execute(executor)
    .await?;

    Ok(())
}
