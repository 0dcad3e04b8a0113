//! matchday-core: the roster & session state engine behind the matchday bot.
//!
//! One signup session at a time, scoped to the chat that opened it. Players
//! opt in or out while the window is open; an admin finalizes the window and
//! the engine deals the roster into random fixed-size teams.
//!
//! Everything here is transport-agnostic: the Telegram surface (or any other
//! chat frontend) calls [`engine::Engine`] operations and renders the typed
//! outcomes with [`render`].

pub mod engine;
pub mod render;
pub mod state;
pub mod store;
pub mod teams;

pub use engine::{Engine, EngineError};
pub use state::{DomainState, Player, Session};
pub use teams::{Team, partition};

/// Default team size: six-a-side.
pub const DEFAULT_TEAM_SIZE: usize = 6;
