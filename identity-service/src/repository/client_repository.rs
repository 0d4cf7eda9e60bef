//! # Client Repository
//!
//! Data access for the `clients` table. Clients are administratively provisioned;
//! this repository is read-only - there is no `insert`/`update` here because
//! there is no self-service client registration endpoint in this core.

use shared::errors::ApiError;
use sqlx::PgPool;

use crate::domain::Client;

#[derive(Debug, Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_client_id(&self, client_id: &str) -> Result<Option<Client>, ApiError> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE client_id = $1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::InternalError { message: format!("Database error: {}", e) })
    }
}
