use std::sync::Arc;

use chrono::NaiveDate;
use memebot_core::{GroupId, QuoteOrder};
use memebot_db::{
    connect_with_settings, migrations, QuoteRepository, RepositoryError, SqlQuoteRepository,
};
use memebot_groupme::grammar::QuoteGrammar;
use memebot_groupme::memes::{ConnectFourResponder, HelpResponder, ImageResponder};
use memebot_groupme::quotes::QuoteResponder;
use memebot_groupme::{Callback, Delivery, MessageContext, ResponderChain};

fn recording_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 25).expect("valid date")
}

async fn fixture() -> (ResponderChain, Arc<SqlQuoteRepository>) {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("migrate");
    let repository = Arc::new(SqlQuoteRepository::new(pool));

    let mut chain = ResponderChain::new();
    chain.register(
        QuoteResponder::new(QuoteGrammar::new().expect("grammar"), repository.clone())
            .with_clock(recording_day),
    );
    chain.register(ImageResponder::roasted().expect("roasted"));
    chain.register(ConnectFourResponder::new().expect("c4"));
    chain.register(HelpResponder::new().expect("help"));
    chain.register(ImageResponder::pika().expect("pika"));
    chain.register(ImageResponder::just_right().expect("just right"));
    (chain, repository)
}

async fn send(chain: &ResponderChain, group: &str, sender: &str, text: &str) -> Option<String> {
    let callback = Callback::user_message(group, sender, text);
    let dispatched = chain.dispatch(&callback, &MessageContext::default()).await?;
    assert_eq!(dispatched.response.delivery, Delivery::Async);
    assert_eq!(dispatched.response.replies.len(), 1);
    Some(dispatched.response.replies[0].text.clone())
}

#[tokio::test]
async fn record_then_retrieve_round_trips_text_and_date() {
    let (chain, _repository) = fixture().await;

    let recorded = send(&chain, "1", "u1", "/aliceism record hello world").await;
    assert_eq!(recorded.as_deref(), Some("👍"));

    let retrieved = send(&chain, "1", "u1", "/aliceism").await.expect("claimed");
    assert!(retrieved.starts_with("Alice"), "{retrieved}");
    assert!(retrieved.ends_with("hello world"), "{retrieved}");
    assert_eq!(retrieved, "Alice [Mon, Dec 25]: hello world");
}

#[tokio::test]
async fn delete_by_another_sender_keeps_the_row() {
    let (chain, repository) = fixture().await;
    send(&chain, "1", "u1", "/aliceism record hello world").await;

    let refused = send(&chain, "1", "u2", "/aliceism delete").await.expect("claimed");
    assert!(refused.contains("only the person who wrote the quote can delete it"), "{refused}");

    let still_there = repository.get_user_quote("alice", GroupId(1)).await.expect("kept");
    assert_eq!(still_there.text, "hello world");
    let retrieved = send(&chain, "1", "u2", "/aliceism").await.expect("claimed");
    assert!(retrieved.ends_with("hello world"));
}

#[tokio::test]
async fn delete_by_submitter_removes_only_the_newest() {
    let (chain, repository) = fixture().await;
    send(&chain, "1", "u1", "/aliceism record first").await;
    send(&chain, "1", "u1", "/aliceism record second").await;

    let deleted = send(&chain, "1", "u1", "/aliceism delete").await;
    assert_eq!(deleted.as_deref(), Some("Deleted 'second'"));

    let remaining = repository
        .find_quotes("alice", GroupId(1), 10, QuoteOrder::ByIdentifierDesc)
        .await
        .expect("older quote remains");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].text, "first");

    let deleted = send(&chain, "1", "u1", "/aliceism delete").await;
    assert_eq!(deleted.as_deref(), Some("Deleted 'first'"));
    let error = repository
        .find_quotes("alice", GroupId(1), 10, QuoteOrder::ByIdentifierDesc)
        .await
        .expect_err("table empty for alice");
    assert!(matches!(error, RepositoryError::NotFound));
}

#[tokio::test]
async fn empty_table_retrieval_is_not_found() {
    let (chain, repository) = fixture().await;

    let error = repository
        .find_quotes("alice", GroupId(1), 5, QuoteOrder::Random)
        .await
        .expect_err("nothing recorded");
    assert!(matches!(error, RepositoryError::NotFound));

    let reply = send(&chain, "1", "u1", "/aliceism").await;
    assert_eq!(reply.as_deref(), Some("Cannot get quote: no quotes found"));
}

#[tokio::test]
async fn malformed_commands_never_touch_the_store() {
    let (chain, repository) = fixture().await;

    for text in
        ["/aliceism record", "/aliceism extra garbage", "/aliceism recording is great"]
    {
        let reply = send(&chain, "1", "u1", text).await.expect("claimed");
        assert!(reply.starts_with("Hmm. I don't understand"), "{reply}");
    }

    assert!(repository.get_user_quote("alice", GroupId(1)).await.is_err());
}

#[tokio::test]
async fn non_commands_get_no_reply() {
    let (chain, _repository) = fixture().await;

    for text in ["good morning", "aliceism", "/aliceismextra", "/roasted please"] {
        assert_eq!(send(&chain, "1", "u1", text).await, None, "`{text}`");
    }
}

#[tokio::test]
async fn help_and_memes_follow_the_quote_responder() {
    let (chain, _repository) = fixture().await;

    let help = send(&chain, "1", "u1", "/help").await.expect("help");
    assert!(help.contains("/c4 [1-9]"));

    let callback = Callback::user_message("1", "u1", "/c4 4");
    let dispatched =
        chain.dispatch(&callback, &MessageContext::default()).await.expect("c4 claims");
    assert_eq!(dispatched.responder, "connect_four");
    assert_eq!(dispatched.response.delivery, Delivery::Ordered);
    assert_eq!(dispatched.response.replies.len(), 4);
}
