use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{CallOutcome, NewRun, ResultSink, RunRecord, RunTotals, StoreError};

use super::results;
use super::runs;

/// Postgres-backed [`ResultSink`].
///
/// Credential storage stays with the owning application; this store only
/// persists what the engine hands it.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn get_run(&self, run_id: Uuid) -> Result<Option<RunRecord>, StoreError> {
        runs::get_run(&self.pool, run_id).await
    }
}

#[async_trait]
impl ResultSink for PostgresStore {
    async fn create_run(&self, run: NewRun) -> Result<Uuid, StoreError> {
        runs::insert_run(&self.pool, run).await
    }

    async fn mark_run_started(&self, run_id: Uuid) -> Result<(), StoreError> {
        runs::mark_run_started(&self.pool, run_id).await
    }

    async fn append_result(&self, run_id: Uuid, outcome: CallOutcome) -> Result<(), StoreError> {
        results::insert_result(&self.pool, run_id, outcome).await
    }

    async fn finish_run(&self, run_id: Uuid, totals: RunTotals) -> Result<(), StoreError> {
        runs::finish_run(&self.pool, run_id, totals).await
    }
}
