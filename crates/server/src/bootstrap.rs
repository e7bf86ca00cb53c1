use std::sync::Arc;

use axum::Router;
use memebot_core::config::{AppConfig, ConfigError, LoadOptions};
use memebot_core::DomainError;
use memebot_db::{connect_from_config, migrations, DbPool, SqlQuoteRepository};
use memebot_groupme::{
    default_chain, BotDirectory, HttpMessagePoster, Outbox, PostError, ResponderChain,
};
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{health, webhook};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub chain: Arc<ResponderChain>,
    pub outbox: Outbox,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
    #[error("group table is invalid: {0}")]
    Directory(#[from] DomainError),
    #[error("responder pattern failed to compile: {0}")]
    Responders(#[from] regex::Error),
    #[error(transparent)]
    Poster(#[from] PostError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let db_pool =
        connect_from_config(&config.database).await.map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let directory = Arc::new(BotDirectory::from_config(&config.groups)?);
    let repository = Arc::new(SqlQuoteRepository::new(db_pool.clone()));
    let chain = Arc::new(default_chain(repository)?);
    let poster = Arc::new(HttpMessagePoster::from_config(&config.groupme)?);
    info!(
        event_name = "system.bootstrap.responders_ready",
        correlation_id = "bootstrap",
        groups = directory.len(),
        responders = ?chain.responder_names(),
        endpoint = poster.endpoint(),
        "responder chain assembled"
    );
    let outbox = Outbox::new(poster, directory, &config.delivery);

    Ok(Application { config, db_pool, chain, outbox })
}

impl Application {
    /// `POST /callback` and `GET /health`, with request tracing.
    pub fn router(&self) -> Router {
        webhook::router(webhook::WebhookState {
            chain: Arc::clone(&self.chain),
            outbox: self.outbox.clone(),
        })
        .merge(health::router(self.db_pool.clone(), self.outbox.directory().len()))
        .layer(TraceLayer::new_for_http())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use memebot_core::config::{ConfigOverrides, LoadOptions};
    use tower::ServiceExt;

    use crate::bootstrap::bootstrap;

    fn overrides(groups: Option<Vec<(String, String)>>) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some("sqlite::memory:".to_string()),
                groups,
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_without_a_group_table() {
        let result = bootstrap(overrides(Some(Vec::new()))).await;

        let message = result.err().expect("error").to_string();
        assert!(message.contains("groups"), "{message}");
    }

    #[tokio::test]
    async fn bootstrap_migrates_and_assembles_the_chain() {
        let app = bootstrap(overrides(Some(vec![("46818924".to_string(), "bot".to_string())])))
            .await
            .expect("bootstrap should succeed with valid overrides");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'quotes'",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("quotes table should exist after bootstrap");
        assert_eq!(table_count, 1);

        assert_eq!(app.chain.len(), 6);
        assert_eq!(app.outbox.directory().len(), 1);
    }

    #[tokio::test]
    async fn router_serves_health() {
        let app = bootstrap(overrides(Some(vec![("46818924".to_string(), "bot".to_string())])))
            .await
            .expect("bootstrap");

        let response = app
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::OK);
    }
}
