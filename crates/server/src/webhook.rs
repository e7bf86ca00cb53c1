use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use memebot_groupme::{Callback, MessageContext, Outbox, ResponderChain};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct WebhookState {
    pub chain: Arc<ResponderChain>,
    pub outbox: Outbox,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CallbackAck {
    pub handled: bool,
    pub responder: Option<&'static str>,
    pub correlation_id: String,
}

pub fn router(state: WebhookState) -> Router {
    Router::new().route("/callback", post(receive_callback)).with_state(state)
}

/// Always answers 200; replies go out through the outbox, not the response body.
pub async fn receive_callback(
    State(state): State<WebhookState>,
    Json(callback): Json<Callback>,
) -> Json<CallbackAck> {
    let correlation_id = Uuid::new_v4().to_string();
    info!(
        event_name = "ingress.groupme.callback_received",
        correlation_id = %correlation_id,
        group_id = %callback.group_id,
        sender_id = %callback.sender_id,
        message_id = %callback.id,
        "received groupme callback"
    );

    let Some((group_id, bot)) = state.outbox.directory().resolve(&callback.group_id) else {
        debug!(
            event_name = "ingress.groupme.callback_ignored",
            correlation_id = %correlation_id,
            group_id = %callback.group_id,
            reason = "unconfigured_group",
            "ignoring callback"
        );
        return unhandled(correlation_id);
    };

    if callback.is_from_bot(bot.bot_user_id()) {
        debug!(
            event_name = "ingress.groupme.callback_ignored",
            correlation_id = %correlation_id,
            group_id = %group_id,
            reason = "bot_author",
            "ignoring callback"
        );
        return unhandled(correlation_id);
    }

    let ctx = MessageContext { correlation_id: correlation_id.clone() };
    let Some(dispatched) = state.chain.dispatch(&callback, &ctx).await else {
        return unhandled(correlation_id);
    };

    if let Err(error) = state.outbox.deliver(group_id, dispatched.response, &correlation_id) {
        warn!(
            event_name = "egress.groupme.delivery_failed",
            correlation_id = %correlation_id,
            group_id = %group_id,
            error = %error,
            "could not schedule reply delivery"
        );
    }

    Json(CallbackAck { handled: true, responder: Some(dispatched.responder), correlation_id })
}

fn unhandled(correlation_id: String) -> Json<CallbackAck> {
    Json(CallbackAck { handled: false, responder: None, correlation_id })
}
