use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use memebot_core::config::{AppConfig, LoadOptions};
use memebot_db::{
    connect_from_config, migrations, InMemoryQuoteRepository, QuoteRepository, SqlQuoteRepository,
};
use memebot_groupme::{default_chain, Callback, MessageContext, ResponderChain};

use crate::commands::CommandResult;

#[derive(Clone, Debug)]
pub struct ConsoleOptions {
    pub group: String,
    pub sender: String,
    pub ephemeral: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub messages: usize,
    pub claimed: usize,
    pub replies: usize,
}

pub fn run(options: ConsoleOptions) -> CommandResult {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "console",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    runtime.block_on(async {
        if options.ephemeral {
            let repository = Arc::new(InMemoryQuoteRepository::default());
            return run_with(repository, &options, stdin.lock(), stdout.lock()).await;
        }

        let config = match AppConfig::load(LoadOptions::default()) {
            Ok(config) => config,
            Err(error) => {
                return CommandResult::failure(
                    "console",
                    "config_validation",
                    format!("configuration issue: {error}"),
                    2,
                );
            }
        };
        let pool = match connect_from_config(&config.database).await {
            Ok(pool) => pool,
            Err(error) => {
                return CommandResult::failure("console", "db_connectivity", error.to_string(), 4);
            }
        };
        if let Err(error) = migrations::run_pending(&pool).await {
            return CommandResult::failure("console", "migration", error.to_string(), 5);
        }

        let repository = Arc::new(SqlQuoteRepository::new(pool.clone()));
        let result = run_with(repository, &options, stdin.lock(), stdout.lock()).await;
        pool.close().await;
        result
    })
}

/// Dispatches every input line and writes replies to `output`.
pub async fn run_with<R, I, O>(
    repository: Arc<R>,
    options: &ConsoleOptions,
    input: I,
    output: O,
) -> CommandResult
where
    R: QuoteRepository + 'static,
    I: BufRead,
    O: Write,
{
    let chain = match default_chain(repository) {
        Ok(chain) => chain,
        Err(error) => {
            return CommandResult::failure("console", "responders", error.to_string(), 6);
        }
    };

    match session(&chain, options, input, output).await {
        Ok(summary) => CommandResult::success(
            "console",
            format!(
                "processed {} message(s), {} claimed, {} reply(ies)",
                summary.messages, summary.claimed, summary.replies
            ),
        ),
        Err(error) => CommandResult::failure("console", "io", format!("{error:#}"), 7),
    }
}

async fn session<I: BufRead, O: Write>(
    chain: &ResponderChain,
    options: &ConsoleOptions,
    input: I,
    mut output: O,
) -> anyhow::Result<SessionSummary> {
    let mut summary = SessionSummary::default();

    for (index, line) in input.lines().enumerate() {
        let text = line.context("reading stdin")?;
        if text.trim().is_empty() {
            continue;
        }
        summary.messages += 1;

        let callback = Callback::user_message(&options.group, &options.sender, text);
        let ctx = MessageContext { correlation_id: format!("console-{}", index + 1) };
        let Some(dispatched) = chain.dispatch(&callback, &ctx).await else {
            continue;
        };
        summary.claimed += 1;

        for reply in &dispatched.response.replies {
            summary.replies += 1;
            if !reply.text.is_empty() {
                writeln!(output, "[{}] {}", dispatched.responder, reply.text)
                    .context("writing reply")?;
            }
            if let Some(url) = &reply.picture_url {
                writeln!(output, "[{}] picture: {url}", dispatched.responder)
                    .context("writing reply")?;
            }
        }
    }

    output.flush().context("flushing output")?;
    Ok(summary)
}
