use chrono::NaiveDate;
use sqlx::Row;

use memebot_core::{GroupId, NewQuote, Quote, QuoteId, QuoteOrder, SubmitterId};

use super::{QuoteRepository, RepositoryError};
use crate::DbPool;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct SqlQuoteRepository {
    pool: DbPool,
}

impl SqlQuoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn order_clause(order: QuoteOrder) -> &'static str {
    match order {
        QuoteOrder::ByRecencyDesc => "ORDER BY date DESC, id DESC",
        QuoteOrder::ByIdentifierDesc => "ORDER BY id DESC",
        QuoteOrder::Random => "ORDER BY random()",
    }
}

fn row_to_quote(row: &sqlx::sqlite::SqliteRow) -> Result<Quote, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let text: String = row.try_get("quote").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let group_id: i64 =
        row.try_get("group_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let date_str: String =
        row.try_get("date").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let submit_by: String =
        row.try_get("submit_by").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        RepositoryError::Decode(format!("quote {id} has unreadable date `{date_str}`: {e}"))
    })?;

    Ok(Quote {
        id: QuoteId(id),
        name,
        text,
        date,
        group_id: GroupId(group_id),
        submitter_id: SubmitterId(submit_by),
    })
}

#[async_trait::async_trait]
impl QuoteRepository for SqlQuoteRepository {
    async fn record_quote(&self, quote: NewQuote) -> Result<Quote, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO quotes (name, quote, group_id, date, submit_by)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&quote.name)
        .bind(&quote.text)
        .bind(quote.group_id.0)
        .bind(quote.date.format(DATE_FORMAT).to_string())
        .bind(&quote.submitter_id.0)
        .execute(&self.pool)
        .await?;

        Ok(quote.into_quote(QuoteId(result.last_insert_rowid())))
    }

    async fn find_quotes(
        &self,
        name: &str,
        group_id: GroupId,
        limit: u32,
        order: QuoteOrder,
    ) -> Result<Vec<Quote>, RepositoryError> {
        let sql = format!(
            "SELECT id, name, quote, group_id, date, submit_by
             FROM quotes
             WHERE name LIKE ? AND group_id = ?
             {}
             LIMIT ?",
            order_clause(order)
        );

        let rows = sqlx::query(&sql)
            .bind(name)
            .bind(group_id.0)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        if rows.is_empty() {
            return Err(RepositoryError::NotFound);
        }

        rows.iter().map(row_to_quote).collect::<Result<Vec<_>, _>>()
    }

    async fn delete_quote(&self, quote: &Quote) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = ?")
            .bind(quote.id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
