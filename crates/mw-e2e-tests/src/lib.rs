//! End-to-end tests for Mealwise live under `tests/`.
//!
//! They drive the real API router (in-process via `tower::oneshot`, or
//! served on a loopback port for the client) with a scripted chat model
//! or a mocked OpenAI-compatible provider.
