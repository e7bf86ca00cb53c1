use async_trait::async_trait;
use thiserror::Error;

use memebot_core::{GroupId, NewQuote, Quote, QuoteError, QuoteOrder};

pub mod memory;
pub mod quote;

pub use memory::InMemoryQuoteRepository;
pub use quote::SqlQuoteRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The query ran but matched no rows.
    #[error("no quotes found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<RepositoryError> for QuoteError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Persistence(other.to_string()),
        }
    }
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn record_quote(&self, quote: NewQuote) -> Result<Quote, RepositoryError>;

    /// Quotes whose name matches `name` with SQL `LIKE` semantics, scoped to
    /// `group_id`. An empty result is `RepositoryError::NotFound`.
    async fn find_quotes(
        &self,
        name: &str,
        group_id: GroupId,
        limit: u32,
        order: QuoteOrder,
    ) -> Result<Vec<Quote>, RepositoryError>;

    async fn delete_quote(&self, quote: &Quote) -> Result<(), RepositoryError>;

    /// One random quote for `name` in `group_id`.
    async fn get_user_quote(
        &self,
        name: &str,
        group_id: GroupId,
    ) -> Result<Quote, RepositoryError> {
        let mut quotes = self.find_quotes(name, group_id, 1, QuoteOrder::Random).await?;
        quotes.pop().ok_or(RepositoryError::NotFound)
    }
}
