//! `net_core`: typed intent/event boundary + in-proc plumbing.
//!
//! Scope
//! - Inbound participant intents (attack/defend/move) with a minimal
//!   tag-byte codec
//! - Outbound authoritative notices (health/lifecycle/knockback/
//!   respawn/match-end)
//! - A small byte channel for local loops; no transport is mandated
#![deny(warnings, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod channel;
pub mod command;
pub mod event;
pub mod wire;
