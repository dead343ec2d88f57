use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{NewRun, RunRecord, RunTotals, StoreError};

pub async fn insert_run(pool: &PgPool, run: NewRun) -> Result<Uuid, StoreError> {
    let run_id = Uuid::new_v4();
    let environment = serde_json::to_value(&run.environment_overrides)
        .map_err(|e| StoreError::Other(e.to_string()))?;

    sqlx::query(
        r#"
INSERT INTO execution_runs
  (id, collection_id, collection_name, status, total_endpoints, trigger_kind,
   environment, notes, triggered_by)
VALUES ($1, $2, $3, 'pending', $4, $5, $6, $7, $8)
        "#,
    )
    .bind(run_id)
    .bind(run.collection_id)
    .bind(&run.collection_name)
    .bind(run.total_endpoints as i32)
    .bind(run.trigger.as_str())
    .bind(&environment)
    .bind(&run.notes)
    .bind(&run.triggered_by)
    .execute(pool)
    .await?;

    Ok(run_id)
}

pub async fn mark_run_started(pool: &PgPool, run_id: Uuid) -> Result<(), StoreError> {
    sqlx::query(
        r#"
UPDATE execution_runs SET status = 'running', started_at = now()
WHERE id = $1
        "#,
    )
    .bind(run_id)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn finish_run(pool: &PgPool, run_id: Uuid, totals: RunTotals) -> Result<(), StoreError> {
    sqlx::query(
        r#"
UPDATE execution_runs
SET status = $2, successful_count = $3, failed_count = $4, skipped_count = $5,
    finished_at = now()
WHERE id = $1
        "#,
    )
    .bind(run_id)
    .bind(totals.status().as_str())
    .bind(totals.succeeded as i32)
    .bind(totals.failed as i32)
    .bind(totals.skipped as i32)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_run(pool: &PgPool, run_id: Uuid) -> Result<Option<RunRecord>, StoreError> {
    let rec = sqlx::query_as::<_, RunRecord>(
        r#"
SELECT id, collection_id, collection_name, status, total_endpoints,
       successful_count, failed_count, skipped_count, trigger_kind,
       environment, notes, triggered_by, created_at, started_at, finished_at
FROM execution_runs WHERE id = $1
        "#,
    )
    .bind(run_id)
    .fetch_optional(pool)
    .await?;
    Ok(rec)
}
