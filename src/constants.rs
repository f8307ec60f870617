//! # Constants.

use once_cell::sync::Lazy;

pub static INBOME_VERSION_STR: Lazy<String> = Lazy::new(|| env!("CARGO_PKG_VERSION").to_string());

/// Value of the `type` parameter for OpenPGP keys, the only key type understood.
pub const INBOME_TYPE_OPENPGP: &str = "p";

/// Parameters whose name starts with this prefix may be skipped when unknown.
/// Every other unknown parameter is critical.
pub const NON_CRITICAL_PARAM_PREFIX: char = '_';

/// Capacity of the queue between the dispatcher and the trust provider.
/// Updates arriving while the queue is full are dropped.
pub const TRUST_QUEUE_CAPACITY: usize = 100;

/// Capacity of the event channel; the oldest event is dropped when it is full.
pub const EVENT_CHANNEL_CAPACITY: usize = 1_000;
