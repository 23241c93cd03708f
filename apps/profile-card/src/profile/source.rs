//! Where the raw employee record comes from.
//!
//! `AppState` holds an `Arc<dyn ProfileSource>`; production uses the GraphQL
//! backend, tests plug in canned records.

use async_trait::async_trait;
use tracing::info;

use crate::errors::AppError;
use crate::graphql::GraphqlClient;
use crate::profile::query::{build_me_query, MeVariables, QuerySettings, ME_OPERATION};
use crate::profile::raw::{MeResponse, RawEmployee};

#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Fetches the caller's own employee record, all-or-nothing.
    async fn fetch_me(&self, variables: MeVariables) -> Result<RawEmployee, AppError>;
}

/// Signs in with the refresh credential, then issues the `me` query with the
/// resulting bearer token. Each call is its own session.
pub struct GraphqlProfileSource {
    client: GraphqlClient,
    refresh_token: String,
    query: &'static str,
}

impl GraphqlProfileSource {
    pub fn new(client: GraphqlClient, refresh_token: String, settings: &QuerySettings) -> Self {
        Self {
            client,
            refresh_token,
            // Rendered once at startup and kept for the life of the process.
            query: Box::leak(build_me_query(settings).into_boxed_str()),
        }
    }
}

#[async_trait]
impl ProfileSource for GraphqlProfileSource {
    async fn fetch_me(&self, variables: MeVariables) -> Result<RawEmployee, AppError> {
        let token = self.client.sign_in(&self.refresh_token).await?;
        info!("Signed in against {}", self.client.endpoint());

        let session = self.client.with_bearer(token);
        let response: MeResponse = session
            .execute(self.query, ME_OPERATION, variables)
            .await?;
        info!(
            "Fetched profile for endOfLastMonth={}",
            variables.end_of_last_month
        );

        response
            .me
            .ok_or_else(|| AppError::NotFound("No employee profile for this account".to_string()))
    }
}
