use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use memebot_core::{GroupId, NewQuote, Quote, QuoteId, QuoteOrder};

use super::{QuoteRepository, RepositoryError};

#[derive(Default)]
struct State {
    quotes: BTreeMap<i64, Quote>,
    last_id: i64,
}

/// Process-local store with the same matching and ordering rules as the SQL one.
#[derive(Default)]
pub struct InMemoryQuoteRepository {
    state: RwLock<State>,
}

#[async_trait::async_trait]
impl QuoteRepository for InMemoryQuoteRepository {
    async fn record_quote(&self, quote: NewQuote) -> Result<Quote, RepositoryError> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let stored = quote.into_quote(QuoteId(state.last_id));
        state.quotes.insert(stored.id.0, stored.clone());
        Ok(stored)
    }

    async fn find_quotes(
        &self,
        name: &str,
        group_id: GroupId,
        limit: u32,
        order: QuoteOrder,
    ) -> Result<Vec<Quote>, RepositoryError> {
        let state = self.state.read().await;
        let mut matches: Vec<Quote> = state
            .quotes
            .values()
            .filter(|quote| quote.group_id == group_id && like_matches(name, &quote.name))
            .cloned()
            .collect();
        drop(state);

        match order {
            QuoteOrder::ByRecencyDesc => {
                matches.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
            }
            QuoteOrder::ByIdentifierDesc => matches.sort_by(|a, b| b.id.cmp(&a.id)),
            QuoteOrder::Random => matches.shuffle(&mut rand::thread_rng()),
        }
        matches.truncate(limit as usize);

        if matches.is_empty() {
            return Err(RepositoryError::NotFound);
        }
        Ok(matches)
    }

    async fn delete_quote(&self, quote: &Quote) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state.quotes.remove(&quote.id.0).map(|_| ()).ok_or(RepositoryError::NotFound)
    }
}

/// ASCII case-insensitive `LIKE`: `%` matches any run, `_` matches one character.
fn like_matches(pattern: &str, value: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();
    let value: Vec<char> = value.chars().map(|c| c.to_ascii_lowercase()).collect();

    let (mut p, mut v) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match pattern.get(p).copied() {
            Some('%') => {
                backtrack = Some((p, v));
                p += 1;
            }
            Some(c) if c == '_' || c == value[v] => {
                p += 1;
                v += 1;
            }
            _ => match backtrack {
                Some((star, matched)) => {
                    p = star + 1;
                    v = matched + 1;
                    backtrack = Some((star, matched + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}
