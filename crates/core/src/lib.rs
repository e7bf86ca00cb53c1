pub mod config;
pub mod domain;
pub mod errors;

pub use domain::quote::{GroupId, NewQuote, Quote, QuoteId, QuoteOrder, SubmitterId};
pub use errors::{DomainError, QuoteError, Severity};
