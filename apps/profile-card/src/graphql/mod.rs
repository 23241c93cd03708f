//! GraphQL client, the single point of entry for all backend calls.
//!
//! Requests are `graphql_client::QueryBody` POSTs; responses decode as
//! `graphql_client::Response` carrying `data` or `errors`. There is no retry: a
//! request either succeeds or surfaces one error.
use std::fmt;
use std::time::Duration;

use graphql_client::{QueryBody, Response};
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::profile::query::{SIGN_IN_MUTATION, SIGN_IN_OPERATION};
use crate::profile::raw::SignInResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GraphqlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("{0}")]
    Server(String),

    #[error("Response contained no data")]
    EmptyData,

    #[error("Sign-in did not return a token")]
    MissingToken,

    #[error("Response did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Short-lived bearer credential for one session. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let preview: String = self.0.chars().take(10).collect();
        write!(f, "AuthToken({preview}...)")
    }
}

#[derive(Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
    bearer: Option<AuthToken>,
}

impl GraphqlClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, GraphqlError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            endpoint: endpoint.into(),
            bearer: None,
        })
    }

    /// A client that sends `authorization: Bearer <token>` on every request.
    pub fn with_bearer(&self, token: AuthToken) -> Self {
        Self {
            client: self.client.clone(),
            endpoint: self.endpoint.clone(),
            bearer: Some(token),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one operation and decodes its `data` as `T`.
    pub async fn execute<V, T>(
        &self,
        query: &'static str,
        operation_name: &'static str,
        variables: V,
    ) -> Result<T, GraphqlError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let body = QueryBody {
            variables,
            query,
            operation_name,
        };

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        // GraphQL servers often report errors with a non-2xx status and an `errors`
        // body; prefer those messages over the bare status.
        let parsed = serde_json::from_str::<Response<serde_json::Value>>(&text);

        if !status.is_success() {
            let message = parsed
                .ok()
                .and_then(|r| r.errors)
                .and_then(|errors| join_messages(&errors))
                .unwrap_or(text);
            return Err(GraphqlError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parsed?;
        if let Some(message) = parsed.errors.as_deref().and_then(join_messages) {
            return Err(GraphqlError::Server(message));
        }

        let data = parsed.data.ok_or(GraphqlError::EmptyData)?;
        debug!("GraphQL operation {operation_name} succeeded");
        Ok(serde_json::from_value(data)?)
    }

    /// Exchanges a long-lived refresh credential for a session bearer token.
    pub async fn sign_in(&self, refresh_token: &str) -> Result<AuthToken, GraphqlError> {
        let refresh_client = self.with_bearer(AuthToken::new(refresh_token));
        let response: SignInResponse = refresh_client
            .execute(SIGN_IN_MUTATION, SIGN_IN_OPERATION, serde_json::json!({}))
            .await?;

        response
            .sign_in
            .and_then(|s| s.token)
            .and_then(|t| t.token)
            .filter(|t| !t.is_empty())
            .map(AuthToken)
            .ok_or(GraphqlError::MissingToken)
    }
}

fn join_messages(errors: &[graphql_client::Error]) -> Option<String> {
    if errors.is_empty() {
        None
    } else {
        Some(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
