//! matchday-bot: Telegram surface for the matchday team picker.
//!
//! Long-polls the Bot API, routes commands and "in"/"out" messages to
//! [`matchday_core::Engine`], and exposes a `/health` liveness route.

pub mod commands;
pub mod health;
pub mod telegram;
