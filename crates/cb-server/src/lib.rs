//! Chatbot server — library crate.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `cb-e2e-tests`) can reach `AppState`, `build_router`, the
//! `Generator` trait and the intent table.

pub mod config;
pub mod error;
pub mod generator;
pub mod intents;
pub mod responder;
pub mod routes;
pub mod state;
