//! Mealwise API — library crate for the meal analysis server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `mw-e2e-tests`) can access `AppState`, `build_router`, the cache
//! and the chat model seam.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod error;
pub mod inference;
pub mod interpret;
pub mod routes;
pub mod state;
