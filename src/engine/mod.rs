// SPDX-License-Identifier: MPL-2.0
//! Engine thread and the state it owns.
//!
//! This module handles everything that runs on the dedicated engine thread:
//! - Spawning the thread and creating the native player on it
//! - Running posted tasks and player events in order
//! - Polling the native position and publishing changes
//! - The position cache shared with the presentation side
//!
//! The presentation side only talks to this module through
//! [`EngineDispatcher::post`] and the [`Notification`] stream.

pub mod cache;
pub mod dispatcher;
pub mod notification;
pub mod worker;

pub use cache::{PositionCache, SharedPositionCache};
pub use dispatcher::{EngineDispatcher, EngineOptions, EngineTask};
pub use notification::{Notification, OpenedSnapshot, SeekSnapshot};
pub use worker::{EngineWorker, LevelPush};
