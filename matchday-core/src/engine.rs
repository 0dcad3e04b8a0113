//! The engine: every operation the chat surface can invoke.
//!
//! Each operation is one load → mutate → save pass over the store, run
//! inside a single mutex so two near-simultaneous commands can't overwrite
//! each other's update. Denials and no-ops are typed outcomes the surface
//! renders as replies; only gated actions return errors.
//!
//! Save failures are logged and the operation still reports success: the
//! document is advisory, and a one-off write failure should not make the
//! bot eat a player's "in".

use parking_lot::Mutex;

use crate::state::{DomainState, Player};
use crate::store::JsonStore;
use crate::teams::{self, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("not authorized")]
    NotAuthorized,
    #[error("no active session")]
    NoActiveSession,
    #[error("empty roster")]
    EmptyRoster,
}

/// Outcome of `/addme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// The admin set was empty; the caller is now the first admin.
    FirstAdmin,
    AlreadyAdmin,
    /// Admins exist and the caller is not one of them.
    AdminsExist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Granted { total: usize },
    AlreadyAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Revoke {
    Revoked { remaining: usize },
    NotAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Join {
    Joined { count: usize },
    AlreadyIn,
    /// No signup window is open.
    Inactive,
    /// A session is open, but in a different chat. Callers stay silent.
    WrongChat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leave {
    Left { count: usize },
    NotIn,
    Inactive,
    WrongChat,
}

/// Session snapshot for `/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub active: bool,
    pub participants: Vec<Player>,
}

pub struct Engine {
    store: JsonStore,
    team_size: usize,
    lock: Mutex<()>,
}

impl Engine {
    pub fn new(store: JsonStore, team_size: usize) -> Self {
        Self { store, team_size, lock: Mutex::new(()) }
    }

    /// Run one atomic load-mutate-save cycle. `f` returns its result plus
    /// whether the state changed and needs persisting.
    fn with_state<T>(&self, f: impl FnOnce(&mut DomainState) -> (T, bool)) -> T {
        let _guard = self.lock.lock();
        let mut state = self.store.load();
        let (result, dirty) = f(&mut state);
        if dirty {
            if let Err(e) = self.store.save(&state) {
                tracing::warn!(error = %e, "Failed to persist state, continuing in memory");
            }
        }
        result
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.with_state(|state| (state.is_admin(user_id), false))
    }

    /// First caller becomes the first admin; everyone after that is sent
    /// to `/addadmin`.
    pub fn bootstrap(&self, user_id: i64) -> Bootstrap {
        self.with_state(|state| {
            if state.admins.is_empty() {
                state.admins.push(user_id);
                (Bootstrap::FirstAdmin, true)
            } else if state.is_admin(user_id) {
                (Bootstrap::AlreadyAdmin, false)
            } else {
                (Bootstrap::AdminsExist, false)
            }
        })
    }

    pub fn grant(&self, granter_id: i64, target_id: i64) -> Result<Grant, EngineError> {
        self.with_state(|state| {
            if !state.is_admin(granter_id) {
                return (Err(EngineError::NotAuthorized), false);
            }
            if state.is_admin(target_id) {
                (Ok(Grant::AlreadyAdmin), false)
            } else {
                state.admins.push(target_id);
                (Ok(Grant::Granted { total: state.admins.len() }), true)
            }
        })
    }

    /// No self-removal guard: an admin may revoke themself.
    pub fn revoke(&self, granter_id: i64, target_id: i64) -> Result<Revoke, EngineError> {
        self.with_state(|state| {
            if !state.is_admin(granter_id) {
                return (Err(EngineError::NotAuthorized), false);
            }
            match state.admins.iter().position(|&id| id == target_id) {
                Some(idx) => {
                    state.admins.remove(idx);
                    (Ok(Revoke::Revoked { remaining: state.admins.len() }), true)
                }
                None => (Ok(Revoke::NotAdmin), false),
            }
        })
    }

    /// Admin ids with whatever profile the player table has for them.
    pub fn admins(&self) -> Vec<(i64, Option<Player>)> {
        self.with_state(|state| {
            let listing = state
                .admins
                .iter()
                .map(|&id| (id, state.players.get(&id).cloned()))
                .collect();
            (listing, false)
        })
    }

    /// Open the signup window in `chat_id`. A stale open session from an
    /// earlier `/begin` is discarded without warning.
    pub fn begin(&self, user_id: i64, chat_id: i64) -> Result<(), EngineError> {
        self.with_state(|state| {
            if !state.is_admin(user_id) {
                return (Err(EngineError::NotAuthorized), false);
            }
            state.session.active = true;
            state.session.participants.clear();
            state.session.chat_id = Some(chat_id);
            tracing::info!(chat_id, "Signup window opened");
            (Ok(()), true)
        })
    }

    /// "in": record the profile and append to the participant list.
    /// Repeated joins answer `AlreadyIn` without touching state.
    pub fn join(&self, user_id: i64, profile: Player, chat_id: i64) -> Join {
        self.with_state(|state| {
            if state.session.active && state.session.chat_id != Some(chat_id) {
                return (Join::WrongChat, false);
            }
            if !state.session.active {
                return (Join::Inactive, false);
            }
            let profile_changed = state.upsert_player(user_id, profile);
            if state.session.participants.contains(&user_id) {
                (Join::AlreadyIn, profile_changed)
            } else {
                state.session.participants.push(user_id);
                (Join::Joined { count: state.session.participants.len() }, true)
            }
        })
    }

    /// "out": drop from the participant list if present.
    pub fn leave(&self, user_id: i64, chat_id: i64) -> Leave {
        self.with_state(|state| {
            if state.session.active && state.session.chat_id != Some(chat_id) {
                return (Leave::WrongChat, false);
            }
            if !state.session.active {
                return (Leave::Inactive, false);
            }
            match state.session.participants.iter().position(|&id| id == user_id) {
                Some(idx) => {
                    state.session.participants.remove(idx);
                    (Leave::Left { count: state.session.participants.len() }, true)
                }
                None => (Leave::NotIn, false),
            }
        })
    }

    /// Close the window and deal the roster into random teams.
    pub fn finalize(&self, user_id: i64) -> Result<Vec<Team>, EngineError> {
        self.with_state(|state| {
            if !state.is_admin(user_id) {
                return (Err(EngineError::NotAuthorized), false);
            }
            if !state.session.active {
                return (Err(EngineError::NoActiveSession), false);
            }
            if state.session.participants.is_empty() {
                return (Err(EngineError::EmptyRoster), false);
            }
            let roster = state.roster();
            let teams = teams::partition(&roster, self.team_size, &mut rand::thread_rng());
            state.session.clear();
            tracing::info!(players = roster.len(), teams = teams.len(), "Teams drawn");
            (Ok(teams), true)
        })
    }

    /// Close and wipe the session regardless of its current state.
    pub fn reset(&self, user_id: i64) -> Result<(), EngineError> {
        self.with_state(|state| {
            if !state.is_admin(user_id) {
                return (Err(EngineError::NotAuthorized), false);
            }
            state.session.clear();
            (Ok(()), true)
        })
    }

    pub fn status(&self, user_id: i64) -> Result<Status, EngineError> {
        self.with_state(|state| {
            if !state.is_admin(user_id) {
                return (Err(EngineError::NotAuthorized), false);
            }
            let status = Status {
                active: state.session.active,
                participants: state.roster(),
            };
            (Ok(status), false)
        })
    }
}
