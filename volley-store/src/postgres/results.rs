use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{CallOutcome, StoreError};

pub async fn insert_result(
    pool: &PgPool,
    run_id: Uuid,
    outcome: CallOutcome,
) -> Result<(), StoreError> {
    let json = |v: Result<serde_json::Value, serde_json::Error>| {
        v.map_err(|e| StoreError::Other(e.to_string()))
    };
    let request_headers = json(serde_json::to_value(&outcome.request_headers))?;
    let response_headers = json(serde_json::to_value(&outcome.response_headers))?;
    let assertions = json(serde_json::to_value(&outcome.assertions))?;
    let extracted = json(serde_json::to_value(&outcome.extracted_variables))?;

    sqlx::query(
        r#"
INSERT INTO execution_results
  (id, run_id, endpoint_id, endpoint_name, endpoint_method, status,
   request_url, request_headers, request_body, response_status,
   response_headers, response_body, response_size_bytes, duration_ms,
   error_kind, error_message, assertions_passed, assertions,
   extracted_variables, retry_attempt, finished_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
        $15, $16, $17, $18, $19, $20, $21)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(run_id)
    .bind(outcome.endpoint_id)
    .bind(&outcome.endpoint_name)
    .bind(outcome.endpoint_method.as_str())
    .bind(outcome.status.as_str())
    .bind(&outcome.request_url)
    .bind(&request_headers)
    .bind(&outcome.request_body)
    .bind(outcome.response_status.map(|s| s as i32))
    .bind(&response_headers)
    .bind(&outcome.response_body)
    .bind(outcome.response_size_bytes as i64)
    .bind(outcome.duration_ms as i64)
    .bind(&outcome.error_kind)
    .bind(&outcome.error_message)
    .bind(outcome.assertions_passed)
    .bind(&assertions)
    .bind(&extracted)
    .bind(outcome.retry_attempt as i32)
    .bind(outcome.finished_at)
    .execute(pool)
    .await?;

    Ok(())
}
