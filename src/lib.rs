//! # Inline key headers
//!
//! Reads public keys announced in the headers of received unsigned messages,
//! either in an `Inbome` header or in the older `OpenPGP` header, and offers
//! them to a trust provider.
//!
//! Header problems never fail message processing; they are reported as
//! [`EventType::InlineKeyRejected`] events.

#![recursion_limit = "256"]
#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::correctness,
    missing_debug_implementations,
    clippy::all,
    clippy::wildcard_imports,
    clippy::needless_borrow,
    clippy::cast_lossless,
    clippy::unused_async,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
    clippy::cloned_instead_of_copied
)]
#![cfg_attr(not(test), warn(clippy::indexing_slicing))]
#![allow(clippy::match_bool, clippy::bool_assert_comparison)]

#[macro_use]
mod log;

pub mod config;
pub mod constants;
pub mod context;
pub mod events;
pub mod headerdef;
pub mod inbome;
pub mod key_data;
pub mod message;
pub mod openpgp_header;
pub mod param;
pub mod receive;
pub mod tools;
pub mod trust;

pub use events::*;

#[cfg(test)]
mod test_utils;
