//! CQL backend for a live cluster
//!
//! Wraps a driver session over TLS. When credentials are configured the
//! session authenticates with SigV4, otherwise it connects anonymously.

use super::client::{
    Consistency, CqlValue, QueryResult, Statement, StoreClient, StoreError, StoreResult,
};
use super::sigv4::{INITIAL_RESPONSE, SigV4Credentials, SigV4Signer};
use crate::config::StoreConfig;
use crate::core::models::Review;
use crate::utils::error::{BenchError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use openssl::ssl::{SslContext, SslContextBuilder, SslMethod, SslVerifyMode};
use scylla::authentication::{AuthError, AuthenticatorProvider, AuthenticatorSession};
use scylla::frame::response::result::{CqlValue as DriverValue, Row};
use scylla::query::Query;
use scylla::transport::errors::{DbError, QueryError};
use scylla::{Session, SessionBuilder};
use std::sync::Arc;
use tracing::{debug, info};

/// Review store reached through a CQL driver session
pub struct CqlStore {
    session: Session,
}

impl CqlStore {
    /// Open a session against `endpoint:port`
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let node = format!("{}:{}", config.endpoint, config.port);
        let mut builder = SessionBuilder::new().known_node(&node);

        if config.tls {
            builder = builder.ssl_context(Some(ssl_context(config.ca_cert_path.as_deref())?));
        }

        if let Some(credentials) = sigv4_credentials(config)? {
            info!(
                "Authenticating as {} in {}",
                credentials.access_key_id, credentials.region
            );
            builder = builder.authenticator_provider(Arc::new(SigV4AuthProvider {
                signer: SigV4Signer::new(credentials),
            }));
        }

        let session = builder
            .build()
            .await
            .map_err(|e| BenchError::setup(format!("Failed to connect to {}: {}", node, e)))?;
        info!("Connected to {}", node);

        Ok(Self { session })
    }

    async fn select_all(&self, query: Query) -> StoreResult<QueryResult> {
        let rows: Vec<Row> = self
            .session
            .query_iter(query, ())
            .await
            .map_err(map_query_error)?
            .try_collect()
            .await
            .map_err(map_query_error)?;

        rows.into_iter()
            .map(|row| review_from_columns(row.columns))
            .collect::<StoreResult<Vec<_>>>()
            .map(QueryResult::Rows)
    }
}

#[async_trait]
impl StoreClient for CqlStore {
    async fn execute(
        &self,
        statement: &Statement,
        consistency: Consistency,
    ) -> StoreResult<QueryResult> {
        if let Statement::UseKeyspace { name } = statement {
            self.session
                .use_keyspace(name.as_str(), false)
                .await
                .map_err(map_query_error)?;
            return Ok(QueryResult::Ack);
        }

        let mut query = Query::new(statement.cql());
        query.set_consistency(driver_consistency(consistency));

        match statement {
            Statement::SelectAllReviews => self.select_all(query).await,
            Statement::SelectReview { .. } => {
                let values = driver_values(statement.params());
                let result = self
                    .session
                    .query_unpaged(query, values)
                    .await
                    .map_err(map_query_error)?;
                result
                    .rows
                    .unwrap_or_default()
                    .into_iter()
                    .map(|row| review_from_columns(row.columns))
                    .collect::<StoreResult<Vec<_>>>()
                    .map(QueryResult::Rows)
            }
            _ => {
                let values = driver_values(statement.params());
                self.session
                    .query_unpaged(query, values)
                    .await
                    .map_err(map_query_error)?;
                Ok(QueryResult::Ack)
            }
        }
    }
}

struct SigV4AuthProvider {
    signer: SigV4Signer,
}

#[async_trait]
impl AuthenticatorProvider for SigV4AuthProvider {
    async fn start_authentication_session(
        &self,
        authenticator_name: &str,
    ) -> std::result::Result<(Option<Vec<u8>>, Box<dyn AuthenticatorSession>), AuthError> {
        debug!("Starting SigV4 exchange with {}", authenticator_name);
        Ok((
            Some(INITIAL_RESPONSE.to_vec()),
            Box::new(SigV4AuthSession {
                signer: self.signer.clone(),
            }),
        ))
    }
}

struct SigV4AuthSession {
    signer: SigV4Signer,
}

#[async_trait]
impl AuthenticatorSession for SigV4AuthSession {
    async fn evaluate_challenge(
        &mut self,
        token: Option<&[u8]>,
    ) -> std::result::Result<Option<Vec<u8>>, AuthError> {
        let challenge = token.ok_or_else(|| "Empty SigV4 challenge".to_string())?;
        let response = self
            .signer
            .respond(challenge, chrono::Utc::now())
            .map_err(|e| e.to_string())?;
        Ok(Some(response.into_bytes()))
    }

    async fn success(&mut self, _token: Option<&[u8]>) -> std::result::Result<(), AuthError> {
        Ok(())
    }
}

fn sigv4_credentials(config: &StoreConfig) -> Result<Option<SigV4Credentials>> {
    match (&config.access_key_id, &config.secret_access_key) {
        (Some(access_key_id), Some(secret_access_key)) => {
            let region = config.region.clone().ok_or_else(|| {
                BenchError::config("region is required when credentials are set")
            })?;
            Ok(Some(SigV4Credentials {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
                session_token: config.session_token.clone(),
                region,
            }))
        }
        _ => Ok(None),
    }
}

fn ssl_context(ca_cert_path: Option<&str>) -> Result<SslContext> {
    let tls_error = |e: openssl::error::ErrorStack| BenchError::config(format!("TLS setup failed: {}", e));

    let mut builder = SslContextBuilder::new(SslMethod::tls()).map_err(tls_error)?;
    builder.set_verify(SslVerifyMode::PEER);
    match ca_cert_path {
        Some(path) => builder.set_ca_file(path).map_err(tls_error)?,
        None => builder.set_default_verify_paths().map_err(tls_error)?,
    }
    Ok(builder.build())
}

fn driver_consistency(consistency: Consistency) -> scylla::statement::Consistency {
    match consistency {
        Consistency::One => scylla::statement::Consistency::One,
        Consistency::LocalOne => scylla::statement::Consistency::LocalOne,
        Consistency::Quorum => scylla::statement::Consistency::Quorum,
        Consistency::LocalQuorum => scylla::statement::Consistency::LocalQuorum,
        Consistency::All => scylla::statement::Consistency::All,
    }
}

fn driver_values(params: Vec<CqlValue>) -> Vec<DriverValue> {
    params
        .into_iter()
        .map(|value| match value {
            CqlValue::Text(s) => DriverValue::Text(s),
            CqlValue::Float(f) => DriverValue::Float(f),
            CqlValue::BigInt(i) => DriverValue::BigInt(i),
            CqlValue::Int(i) => DriverValue::Int(i),
            CqlValue::Boolean(b) => DriverValue::Boolean(b),
        })
        .collect()
}

fn map_query_error(error: QueryError) -> StoreError {
    let message = error.to_string();
    match error {
        QueryError::DbError(db, _) => match db {
            DbError::ReadTimeout { .. } | DbError::WriteTimeout { .. } => {
                StoreError::Timeout(message)
            }
            DbError::Overloaded => StoreError::Overloaded(message),
            DbError::Unavailable { .. } => StoreError::Unavailable(message),
            DbError::Invalid | DbError::SyntaxError => StoreError::InvalidRequest(message),
            _ => StoreError::Internal(message),
        },
        _ => StoreError::Internal(message),
    }
}

/// Decode one row selected with the review column list
fn review_from_columns(columns: Vec<Option<DriverValue>>) -> StoreResult<Review> {
    let [asin, review_id, user_id, title, text, rating, timestamp, helpful_vote, verified] =
        <[Option<DriverValue>; 9]>::try_from(columns).map_err(|columns| {
            StoreError::Internal(format!("Expected 9 review columns, got {}", columns.len()))
        })?;

    Ok(Review {
        asin: required_text(asin, "asin")?,
        review_id: required_text(review_id, "review_id")?,
        user_id: optional_text(user_id),
        title: optional_text(title),
        text: optional_text(text),
        rating: rating.and_then(|v| v.as_float()).unwrap_or_default(),
        timestamp: timestamp.and_then(|v| v.as_bigint()).unwrap_or_default(),
        helpful_vote: helpful_vote.and_then(|v| v.as_int()).unwrap_or_default(),
        verified_purchase: verified.and_then(|v| v.as_boolean()).unwrap_or_default(),
    })
}

fn required_text(value: Option<DriverValue>, column: &str) -> StoreResult<String> {
    value
        .and_then(DriverValue::into_string)
        .ok_or_else(|| StoreError::Internal(format!("Column '{}' is null or not text", column)))
}

fn optional_text(value: Option<DriverValue>) -> String {
    value.and_then(DriverValue::into_string).unwrap_or_default()
}
