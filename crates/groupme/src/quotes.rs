use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tracing::{debug, error, info, warn};

use memebot_core::{GroupId, NewQuote, Quote, QuoteError, QuoteOrder, Severity, SubmitterId};
use memebot_db::QuoteRepository;

use crate::{
    callback::Callback,
    dispatch::{HandlerResult, MessageContext, Responder},
    grammar::{ParsedCommand, QuoteCommand, QuoteGrammar},
    message::{Reply, Response},
};

pub const MALFORMED_REPLY: &str =
    "Hmm. I don't understand this extra information. Did you want a subcommand? (/help)";
pub const RECORDED_REPLY: &str = "👍";

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Records, retrieves and deletes quotes for `/<name>ism` commands.
pub struct QuoteResponder<R> {
    grammar: QuoteGrammar,
    repository: Arc<R>,
    today: fn() -> NaiveDate,
}

impl<R> QuoteResponder<R>
where
    R: QuoteRepository,
{
    pub fn new(grammar: QuoteGrammar, repository: Arc<R>) -> Self {
        Self { grammar, repository, today: local_today }
    }

    /// Replaces the clock used to date new quotes.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// The reply text for one classified command. Every command yields exactly one reply.
    pub async fn execute(
        &self,
        command: QuoteCommand,
        callback: &Callback,
        ctx: &MessageContext,
    ) -> String {
        match command {
            QuoteCommand::Malformed => {
                log_failure(ctx, "malformed", &callback.text, &QuoteError::MalformedCommand);
                MALFORMED_REPLY.to_owned()
            }
            QuoteCommand::Record { name, text } => {
                match self.record(&name, text, callback).await {
                    Ok(quote) => {
                        info!(
                            event_name = "quotes.recorded",
                            correlation_id = %ctx.correlation_id,
                            quote_id = quote.id.0,
                            name = %quote.name,
                            group_id = %quote.group_id,
                            "recorded quote"
                        );
                        RECORDED_REPLY.to_owned()
                    }
                    Err(error) => {
                        log_failure(ctx, "record", &name, &error);
                        developer_error(&error)
                    }
                }
            }
            QuoteCommand::Delete { name } => self.delete(&name, callback, ctx).await,
            QuoteCommand::Retrieve { name } => match self.retrieve(&name, callback).await {
                Ok(quote) => quote.attribution(&name),
                Err(error) => {
                    log_failure(ctx, "retrieve", &name, &error);
                    format!("Cannot get quote: {error}")
                }
            },
        }
    }

    async fn record(
        &self,
        name: &str,
        text: String,
        callback: &Callback,
    ) -> Result<Quote, QuoteError> {
        let group_id = callback.group_id.parse::<GroupId>()?;
        let new_quote = NewQuote::new(
            name,
            text,
            group_id,
            SubmitterId(callback.sender_id.clone()),
            (self.today)(),
        )?;
        Ok(self.repository.record_quote(new_quote).await?)
    }

    async fn retrieve(&self, name: &str, callback: &Callback) -> Result<Quote, QuoteError> {
        let group_id = callback.group_id.parse::<GroupId>()?;
        Ok(self.repository.get_user_quote(name, group_id).await?)
    }

    async fn latest(&self, name: &str, callback: &Callback) -> Result<Quote, QuoteError> {
        let group_id = callback.group_id.parse::<GroupId>()?;
        let mut quotes = self
            .repository
            .find_quotes(name, group_id, 1, QuoteOrder::ByIdentifierDesc)
            .await?;
        quotes.pop().ok_or(QuoteError::NotFound)
    }

    async fn delete(&self, name: &str, callback: &Callback, ctx: &MessageContext) -> String {
        let target = match self.latest(name, callback).await {
            Ok(quote) => quote,
            Err(QuoteError::NotFound) => {
                log_failure(ctx, "delete", name, &QuoteError::NotFound);
                return format!("Can't delete quote: {}", QuoteError::NotFound);
            }
            Err(error) => {
                log_failure(ctx, "delete", name, &error);
                return developer_error(&error);
            }
        };

        if !target.is_submitted_by(&callback.sender_id) {
            log_failure(ctx, "delete", name, &QuoteError::Unauthorized);
            return format!("Sorry, {}.", QuoteError::Unauthorized);
        }

        match self.repository.delete_quote(&target).await {
            Ok(()) => {
                info!(
                    event_name = "quotes.deleted",
                    correlation_id = %ctx.correlation_id,
                    quote_id = target.id.0,
                    name = %target.name,
                    group_id = %target.group_id,
                    "deleted quote"
                );
                format!("Deleted '{}'", target.text)
            }
            Err(error) => {
                let error = QuoteError::from(error);
                log_failure(ctx, "delete", name, &error);
                format!("Couldn't delete that quote: {error}")
            }
        }
    }
}

#[async_trait]
impl<R> Responder for QuoteResponder<R>
where
    R: QuoteRepository + 'static,
{
    fn name(&self) -> &'static str {
        "quote"
    }

    async fn respond(&self, callback: &Callback, ctx: &MessageContext) -> HandlerResult {
        let Some(parsed) = self.grammar.parse(&callback.text) else {
            return HandlerResult::Declined;
        };

        debug!(
            event_name = "quotes.command_recognized",
            correlation_id = %ctx.correlation_id,
            name = %parsed.name,
            subcommand = ?parsed.subcommand,
            "recognized quote command"
        );

        let text = self.execute(ParsedCommand::classify(parsed), callback, ctx).await;
        HandlerResult::Responded(Response::single(Reply::text(text)))
    }
}

fn developer_error(error: &QuoteError) -> String {
    format!("[Error: Reported to developer] {error}")
}

fn log_failure(ctx: &MessageContext, action: &'static str, subject: &str, error: &QuoteError) {
    match error.severity() {
        Severity::Error => error!(
            event_name = "quotes.failed",
            correlation_id = %ctx.correlation_id,
            action,
            subject,
            error = %error,
            "quote command failed"
        ),
        Severity::Warn => warn!(
            event_name = "quotes.failed",
            correlation_id = %ctx.correlation_id,
            action,
            subject,
            error = %error,
            "quote command rejected"
        ),
        Severity::Debug => debug!(
            event_name = "quotes.failed",
            correlation_id = %ctx.correlation_id,
            action,
            subject,
            error = %error,
            "quote command declined"
        ),
    }
}
