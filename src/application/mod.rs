// SPDX-License-Identifier: MPL-2.0
//! Application layer - Engine ports.
//!
//! - [`port`]: Trait definitions the native engine adapters implement
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - The engine and element layers only talk to adapters through the ports

pub mod port;
