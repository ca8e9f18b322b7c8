// SPDX-License-Identifier: MPL-2.0
//! `media_element` keeps a media control's observable state in step with a
//! media engine that lives on its own thread.
//!
//! The presentation side owns a [`MediaElement`](element::MediaElement):
//! commands and property writes return immediately and are forwarded to the
//! engine thread, and the engine answers with notifications that the
//! presentation side applies in order. Confirmations that merely echo a
//! value back are suppressed, seeking is acknowledged in two phases through a
//! shared position cache, and engine failures reset the control to a clean
//! state.

#![doc(html_root_url = "https://docs.rs/media_element/0.3.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod element;
pub mod engine;
pub mod error;
pub mod infrastructure;
pub mod logging;

#[cfg(test)]
pub(crate) mod test_utils;
