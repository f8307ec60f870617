//! # Trust updates.
//!
//! A key found in an inline key header is offered to the trust provider as a
//! [`TrustUpdate`]. Updates go through a bounded queue and are delivered by a
//! [`TrustWorker`], so handling a message never waits for the provider.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use async_channel::{self as channel, Receiver, Sender, TrySendError};
use inbome_contact_tools::ContactAddress;
use tokio::task::{self, JoinHandle};

use crate::context::Context;
use crate::events::EventType;
use crate::headerdef::HeaderDef;
use crate::message::IncomingMessage;
use crate::tools::timestamp_to_str;

/// Request to the trust provider to consider a key for an address.
#[derive(Clone, PartialEq, Eq)]
pub struct TrustUpdate {
    /// Address the key is announced for, the sender as written in the From header.
    pub trust_id: ContactAddress,

    /// Key as decoded from the header, never empty.
    pub key_data: Vec<u8>,

    /// Unix timestamp used to order competing updates.
    pub effective_date: i64,
}

impl fmt::Debug for TrustUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrustUpdate")
            .field("trust_id", &self.trust_id)
            .field("key_data", &format_args!("[{} bytes]", self.key_data.len()))
            .field("effective_date", &timestamp_to_str(self.effective_date))
            .finish()
    }
}

/// The subsystem deciding about key trust and storing keys.
///
/// Called from a blocking thread, one update at a time. Errors are reported
/// as [`EventType::TrustUpdateFailed`] and the update is dropped.
pub trait TrustProvider: Send + Sync + 'static {
    fn update_trust(&self, update: &TrustUpdate) -> Result<()>;
}

/// Returns the timestamp a key update is effective from.
///
/// This is the earlier of the date the sender claims and the date the
/// message was received, so a delayed or replayed message can not make an
/// old key look newer than a key seen since.
pub fn effective_date(sent_date: i64, internal_date: i64) -> i64 {
    sent_date.min(internal_date)
}

#[derive(Debug)]
pub(crate) struct TrustQueue {
    sender: Sender<TrustUpdate>,
    receiver: Receiver<TrustUpdate>,
}

impl TrustQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, receiver) = channel::bounded(capacity);
        Self { sender, receiver }
    }

    /// Queues an update without waiting, gives it back if the queue is full.
    fn push(&self, update: TrustUpdate) -> Result<(), TrustUpdate> {
        match self.sender.try_send(update) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(update)) | Err(TrySendError::Closed(update)) => Err(update),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.sender.len()
    }

    #[cfg(test)]
    pub(crate) fn try_pop(&self) -> Option<TrustUpdate> {
        self.receiver.try_recv().ok()
    }
}

/// Background task handing queued updates to a [`TrustProvider`].
///
/// The task runs until the worker is stopped or dropped.
#[derive(Debug)]
#[must_use = "dropping the worker stops it"]
pub struct TrustWorker {
    handle: JoinHandle<()>,
}

impl TrustWorker {
    pub(crate) fn start(context: Context, provider: Arc<dyn TrustProvider>) -> Self {
        let receiver = context.trust_queue.receiver.clone();
        let handle = task::spawn(trust_loop(context, receiver, provider));
        Self { handle }
    }

    /// Stops the worker. Updates still queued stay queued.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for TrustWorker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn trust_loop(
    context: Context,
    receiver: Receiver<TrustUpdate>,
    provider: Arc<dyn TrustProvider>,
) {
    while let Ok(update) = receiver.recv().await {
        let addr = update.trust_id.to_string();
        let provider = Arc::clone(&provider);
        let res = task::spawn_blocking(move || provider.update_trust(&update))
            .await
            .context("trust provider panicked")
            .and_then(|res| res);
        match res {
            Ok(()) => info!(context, "Trust provider accepted key update for {addr}."),
            Err(err) => context.emit_event(EventType::TrustUpdateFailed {
                addr,
                error: format!("{err:#}"),
            }),
        }
    }
}

/// Reports why an inline key header was not used.
pub(crate) fn reject(context: &Context, header: HeaderDef, reason: String) {
    context.emit_event(EventType::InlineKeyRejected {
        header: header.get_headername().to_string(),
        reason,
    });
}

/// Queues a trust update for the sender of `msg` with the given key.
///
/// Only meant for unsigned messages; signed messages have their own trust path.
/// Returns whether an update was queued.
pub(crate) fn maybe_dispatch(
    context: &Context,
    msg: &IncomingMessage,
    header: HeaderDef,
    key_data: Vec<u8>,
) -> bool {
    let Some(from) = msg.get_from() else {
        reject(context, header, "message has no single sender".to_string());
        return false;
    };
    let trust_id = match ContactAddress::new(from) {
        Ok(addr) => addr,
        Err(err) => {
            reject(context, header, format!("invalid sender address: {err:#}"));
            return false;
        }
    };

    let internal_date = msg.get_internal_date();
    let effective_date = match msg.get_sent_date() {
        Some(sent_date) => effective_date(sent_date, internal_date),
        None => internal_date,
    };

    let update = TrustUpdate {
        trust_id,
        key_data,
        effective_date,
    };
    let addr = update.trust_id.to_string();
    match context.trust_queue.push(update) {
        Ok(()) => {
            context.emit_event(EventType::TrustUpdateQueued {
                addr,
                header: header.get_headername().to_string(),
            });
            true
        }
        Err(update) => {
            warn!(
                context,
                "Trust queue is full, dropping key update for {}.", update.trust_id
            );
            false
        }
    }
}
