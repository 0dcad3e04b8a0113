//! Domain state: players, admins, and the single signup session.
//!
//! The serde layout matches the bot's on-disk document exactly, so an
//! existing `players.json` keeps working across restarts and upgrades.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A player profile, upserted whenever the player is observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub username: Option<String>,
}

impl Player {
    /// `@username` when the player has one, display name otherwise.
    pub fn mention(&self) -> String {
        match &self.username {
            Some(u) => format!("@{u}"),
            None => self.name.clone(),
        }
    }
}

/// The single signup window. `chat_id` pins mutations to the chat that
/// opened it and is only meaningful while `active`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub active: bool,
    pub participants: Vec<i64>,
    pub chat_id: Option<i64>,
}

impl Session {
    /// True when `chat_id` may mutate this session.
    pub fn accepts(&self, chat_id: i64) -> bool {
        self.active && self.chat_id == Some(chat_id)
    }

    /// Deactivate and forget participants and scope.
    pub fn clear(&mut self) {
        self.active = false;
        self.participants.clear();
        self.chat_id = None;
    }
}

/// Everything the bot persists: one admin set, one player table, one session.
///
/// Admins are stored as a list for document compatibility but treated as a
/// set — membership checks go through [`DomainState::is_admin`] and inserts
/// are deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainState {
    pub admins: Vec<i64>,
    pub players: BTreeMap<i64, Player>,
    pub session: Session,
}

impl DomainState {
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admins.contains(&user_id)
    }

    /// Record (or refresh) a player profile. Returns whether anything
    /// actually changed.
    pub fn upsert_player(&mut self, user_id: i64, player: Player) -> bool {
        if self.players.get(&user_id) == Some(&player) {
            return false;
        }
        self.players.insert(user_id, player);
        true
    }

    /// The full profiles behind the current participant list, in signup
    /// order. Ids with no stored profile get a placeholder rather than
    /// dropping out of the roster.
    pub fn roster(&self) -> Vec<Player> {
        self.session
            .participants
            .iter()
            .map(|id| {
                self.players.get(id).cloned().unwrap_or_else(|| Player {
                    name: "Unknown".to_string(),
                    username: None,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> Player {
        Player { name: name.to_string(), username: None }
    }

    #[test]
    fn document_round_trips_reference_schema() {
        let mut state = DomainState::default();
        state.admins.push(7);
        state.upsert_player(7, Player { name: "Ana".into(), username: Some("ana".into()) });
        state.session.active = true;
        state.session.chat_id = Some(-100);
        state.session.participants.push(7);

        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["admins"], serde_json::json!([7]));
        // serde_json stringifies integer map keys, so player ids are
        // object keys on disk
        assert_eq!(json["players"]["7"]["username"], "ana");
        assert_eq!(json["session"]["active"], true);
        assert_eq!(json["session"]["chat_id"], -100);

        let back: DomainState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn roster_preserves_signup_order_and_fills_unknowns() {
        let mut state = DomainState::default();
        state.upsert_player(2, player("B"));
        state.upsert_player(1, player("A"));
        state.session.participants = vec![2, 9, 1];

        let roster = state.roster();
        assert_eq!(roster[0].name, "B");
        assert_eq!(roster[1].name, "Unknown");
        assert_eq!(roster[2].name, "A");
    }

    #[test]
    fn mention_prefers_username() {
        assert_eq!(player("Ana").mention(), "Ana");
        let p = Player { name: "Ana".into(), username: Some("ana".into()) };
        assert_eq!(p.mention(), "@ana");
    }
}
