use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use memebot_db::QuoteRepository;

use crate::{
    callback::Callback,
    grammar::QuoteGrammar,
    memes::{ConnectFourResponder, HelpResponder, ImageResponder},
    message::Response,
    quotes::QuoteResponder,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageContext {
    pub correlation_id: String,
}

impl Default for MessageContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(Response),
    Declined,
}

/// One entry of the chain. Responders turn their own failures into reply text.
#[async_trait]
pub trait Responder: Send + Sync {
    fn name(&self) -> &'static str;
    async fn respond(&self, callback: &Callback, ctx: &MessageContext) -> HandlerResult;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dispatched {
    pub responder: &'static str,
    pub response: Response,
}

/// Responders in registration order; the first one that responds claims the message.
#[derive(Clone, Default)]
pub struct ResponderChain {
    responders: Vec<Arc<dyn Responder>>,
}

impl ResponderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<R>(&mut self, responder: R)
    where
        R: Responder + 'static,
    {
        self.responders.push(Arc::new(responder));
    }

    pub async fn dispatch(&self, callback: &Callback, ctx: &MessageContext) -> Option<Dispatched> {
        for responder in &self.responders {
            if let HandlerResult::Responded(response) = responder.respond(callback, ctx).await {
                debug!(
                    event_name = "dispatch.responder_claimed",
                    correlation_id = %ctx.correlation_id,
                    responder = responder.name(),
                    replies = response.replies.len(),
                    "responder claimed message"
                );
                return Some(Dispatched { responder: responder.name(), response });
            }
        }

        debug!(
            event_name = "dispatch.unclaimed",
            correlation_id = %ctx.correlation_id,
            "no responder claimed message"
        );
        None
    }

    pub fn responder_names(&self) -> Vec<&'static str> {
        self.responders.iter().map(|responder| responder.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.responders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responders.is_empty()
    }
}

/// quote, roasted, c4, help, pika, just right.
pub fn default_chain<R>(repository: Arc<R>) -> Result<ResponderChain, regex::Error>
where
    R: QuoteRepository + 'static,
{
    let mut chain = ResponderChain::new();
    chain.register(QuoteResponder::new(QuoteGrammar::new()?, repository));
    chain.register(ImageResponder::roasted()?);
    chain.register(ConnectFourResponder::new()?);
    chain.register(HelpResponder::new()?);
    chain.register(ImageResponder::pika()?);
    chain.register(ImageResponder::just_right()?);
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use memebot_db::InMemoryQuoteRepository;

    use super::{default_chain, HandlerResult, MessageContext, Responder, ResponderChain};
    use crate::callback::Callback;
    use crate::message::{Reply, Response};

    struct Fixed {
        name: &'static str,
        claims: bool,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Responder for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn respond(&self, _callback: &Callback, _ctx: &MessageContext) -> HandlerResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.claims {
                HandlerResult::Responded(Response::single(Reply::text(self.name)))
            } else {
                HandlerResult::Declined
            }
        }
    }

    #[tokio::test]
    async fn first_claiming_responder_wins_and_later_ones_never_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut chain = ResponderChain::new();
        chain.register(Fixed { name: "declines", claims: false, calls: calls.clone() });
        chain.register(Fixed { name: "claims", claims: true, calls: calls.clone() });
        chain.register(Fixed { name: "never", claims: true, calls: calls.clone() });

        let dispatched = chain
            .dispatch(&Callback::user_message("1", "u1", "hi"), &MessageContext::default())
            .await
            .expect("claimed");

        assert_eq!(dispatched.responder, "claims");
        assert_eq!(dispatched.response.replies, vec![Reply::text("claims")]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unclaimed_messages_dispatch_to_nothing() {
        let chain = default_chain(Arc::new(InMemoryQuoteRepository::default())).expect("chain");

        let callback = Callback::user_message("1", "u1", "just chatting");
        let dispatched = chain.dispatch(&callback, &MessageContext::default()).await;

        assert!(dispatched.is_none());
    }

    #[test]
    fn default_chain_registers_in_priority_order() {
        let chain = default_chain(Arc::new(InMemoryQuoteRepository::default())).expect("chain");

        assert_eq!(
            chain.responder_names(),
            vec!["quote", "roasted", "connect_four", "help", "pika", "just_right"]
        );
    }

    #[tokio::test]
    async fn quote_responder_claims_before_memes() {
        let chain = default_chain(Arc::new(InMemoryQuoteRepository::default())).expect("chain");

        // Also a valid `/pika` trigger.
        let callback = Callback::user_message("1", "u1", "/bobism /pika");
        let dispatched =
            chain.dispatch(&callback, &MessageContext::default()).await.expect("claimed");

        assert_eq!(dispatched.responder, "quote");
    }
}
