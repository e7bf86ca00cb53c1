//! GroupMe bot interface
//!
//! - **Callbacks** (`callback`) - inbound webhook payloads
//! - **Grammar** (`grammar`) - the `/<name>ism [record <text> | delete]` command parser
//! - **Quotes** (`quotes`) - quote record/retrieve/delete responder
//! - **Memes** (`memes`) - canned image and help responders
//! - **Dispatch** (`dispatch`) - first-match responder chain
//! - **Poster** (`poster`) - `/bots/post` delivery with retries
//!
//! ```text
//! Callback → ResponderChain → Responder → Response → Outbox → GroupMe API
//! ```

pub mod callback;
pub mod directory;
pub mod dispatch;
pub mod grammar;
pub mod memes;
pub mod message;
pub mod poster;
pub mod quotes;

pub use callback::Callback;
pub use directory::BotDirectory;
pub use dispatch::{
    default_chain, Dispatched, HandlerResult, MessageContext, Responder, ResponderChain,
};
pub use message::{Delivery, OutboundMessage, Reply, Response};
pub use poster::{HttpMessagePoster, MessagePoster, Outbox, PostError, RetryPolicy};
