use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuoteId(pub i64);

/// Numeric chat group identifier. Callbacks carry it as a string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub i64);

impl FromStr for GroupId {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidGroupId(value.to_owned()))
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmitterId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteOrder {
    /// Newest submission date first.
    ByRecencyDesc,
    /// Most recently recorded row first.
    ByIdentifierDesc,
    Random,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub name: String,
    pub text: String,
    pub date: NaiveDate,
    pub group_id: GroupId,
    pub submitter_id: SubmitterId,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewQuote {
    pub name: String,
    pub text: String,
    pub date: NaiveDate,
    pub group_id: GroupId,
    pub submitter_id: SubmitterId,
}

impl NewQuote {
    pub fn new(
        name: impl Into<String>,
        text: impl Into<String>,
        group_id: GroupId,
        submitter_id: SubmitterId,
        date: NaiveDate,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_owned();
        let text = text.into().trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::EmptyField("name"));
        }
        if text.is_empty() {
            return Err(DomainError::EmptyField("quote"));
        }

        Ok(Self { name, text, date, group_id, submitter_id })
    }

    pub fn into_quote(self, id: QuoteId) -> Quote {
        Quote {
            id,
            name: self.name,
            text: self.text,
            date: self.date,
            group_id: self.group_id,
            submitter_id: self.submitter_id,
        }
    }
}

impl Quote {
    pub fn is_submitted_by(&self, sender_id: &str) -> bool {
        self.submitter_id.0 == sender_id
    }

    /// `Alice [Tue, Mar 5]: hello world`, with the requested spelling of the name.
    pub fn attribution(&self, requested_name: &str) -> String {
        format!(
            "{} [{}]: {}",
            capitalize_first(requested_name),
            format_quote_date(self.date),
            self.text
        )
    }
}

pub fn format_quote_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

pub fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
