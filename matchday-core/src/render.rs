//! Chat text rendering.
//!
//! Pure string builders for every reply the bot sends, in Telegram HTML.
//! Team labels live here: a fixed eight-color palette cycled by team index,
//! presentation only — the partition itself knows nothing about colors.

use crate::engine::{Bootstrap, EngineError, Grant, Join, Leave, Revoke, Status};
use crate::state::Player;
use crate::teams::Team;

const TEAM_EMOJIS: [&str; 8] = ["🔴", "🔵", "🟢", "🟡", "🟣", "🟠", "⚫", "⚪"];
const TEAM_NAMES: [&str; 8] = [
    "Red", "Blue", "Green", "Yellow", "Purple", "Orange", "Black", "White",
];

pub fn welcome(is_admin: bool) -> String {
    let mut text = String::from(
        "⚽ <b>Welcome to Football Team Bot!</b> ⚽\n\n\
         <b>How it works:</b>\n\
         1️⃣ Admin starts weekly selection with /begin\n\
         2️⃣ Players reply 'in' or 'out'\n\
         3️⃣ Admin creates teams with /end\n\n\
         <b>Available Commands:</b>\n\
         • /help - Show all commands\n\
         • /addme - Become first admin\n\n",
    );
    if is_admin {
        text.push_str("✅ You are an admin!");
    } else {
        text.push_str("👤 You are a player");
    }
    text
}

pub fn help(is_admin: bool) -> String {
    let mut text = String::from(
        "⚽ <b>FOOTBALL BOT COMMANDS</b>\n\n\
         <b>Everyone:</b>\n\
         • in - Join this week\n\
         • out - Skip this week\n\
         • /help - Show this message\n\n",
    );
    if is_admin {
        text.push_str(
            "<b>Admin Only:</b>\n\
             • /begin - Start selection\n\
             • /end - Create random teams\n\
             • /status - View current status\n\
             • /reset - Reset session\n\
             • /addadmin - Reply to message to add admin\n\
             • /removeadmin - Reply to message to remove admin\n\
             • /listadmins - Show all admins",
        );
    }
    text
}

pub fn session_started() -> String {
    "🎮 <b>TEAM SELECTION STARTED!</b>\n\n\
     Reply with:\n\
     • <b>in</b> - Join this week\n\
     • <b>out</b> - Skip this week\n\n\
     Admin will announce teams later!"
        .to_string()
}

/// The full `/end` announcement: labeled teams plus totals.
pub fn teams_announcement(teams: &[Team]) -> String {
    let total: usize = teams.iter().map(|t| t.members.len()).sum();
    let mut text = format!("🎲 <b>RANDOM TEAM SELECTION</b>\n\n{}", format_teams(teams));
    text.push_str(&format!("<b>Total Players:</b> {total}\n"));
    text.push_str(&format!("<b>Teams Created:</b> {}", teams.len()));
    text
}

fn format_teams(teams: &[Team]) -> String {
    let mut text = String::from("⚽ <b>THIS WEEK'S TEAMS</b> ⚽\n");
    text.push_str(&"═".repeat(30));
    text.push_str("\n\n");
    for (i, team) in teams.iter().enumerate() {
        let emoji = TEAM_EMOJIS[i % TEAM_EMOJIS.len()];
        let name = TEAM_NAMES[i % TEAM_NAMES.len()];
        text.push_str(&format!(
            "{emoji} <b>{name} Team</b> ({} players)\n",
            team.members.len()
        ));
        for p in &team.members {
            text.push_str(&format!("  • {}\n", p.mention()));
        }
        text.push('\n');
    }
    text
}

pub fn status(status: &Status) -> String {
    let state = if status.active { "🟢 ACTIVE" } else { "🔴 INACTIVE" };
    let mut text = format!(
        "📊 <b>SESSION STATUS</b>\n\n<b>Status:</b> {state}\n<b>Players In:</b> {}\n\n",
        status.participants.len()
    );
    if !status.participants.is_empty() {
        text.push_str("<b>Participants:</b>\n");
        for p in &status.participants {
            text.push_str(&format!("  • {}\n", p.mention()));
        }
    }
    text
}

pub fn admin_list(admins: &[(i64, Option<Player>)]) -> String {
    if admins.is_empty() {
        return "No admins yet. Use /addme to become the first admin!".to_string();
    }
    let mut text = String::from("👑 <b>Current Admins:</b>\n\n");
    for (id, profile) in admins {
        match profile {
            Some(p) => {
                let username = p
                    .username
                    .as_ref()
                    .map(|u| format!(" @{u}"))
                    .unwrap_or_default();
                text.push_str(&format!("• {}{username}\n", p.name));
            }
            None => text.push_str(&format!("• User ID: {id}\n")),
        }
    }
    text
}

pub fn bootstrap(outcome: Bootstrap, caller_name: &str) -> String {
    match outcome {
        Bootstrap::FirstAdmin => format!("👑 {caller_name}, you are now the first admin!"),
        Bootstrap::AlreadyAdmin => "✅ You're already an admin!".to_string(),
        Bootstrap::AdminsExist => {
            "❌ Only existing admins can add new admins using /addadmin".to_string()
        }
    }
}

pub fn grant(outcome: Grant, target_name: &str) -> String {
    match outcome {
        Grant::Granted { total } => {
            format!("✅ {target_name} is now an admin!\nTotal admins: {total}")
        }
        Grant::AlreadyAdmin => format!("ℹ️ {target_name} is already an admin"),
    }
}

pub fn revoke(outcome: Revoke, target_name: &str) -> String {
    match outcome {
        Revoke::Revoked { remaining } => {
            format!("✅ {target_name} is no longer an admin\nRemaining admins: {remaining}")
        }
        Revoke::NotAdmin => format!("ℹ️ {target_name} is not an admin"),
    }
}

/// Reply for an "in" message. `None` means stay silent.
pub fn join(outcome: Join, mention: &str) -> Option<String> {
    match outcome {
        Join::Joined { count } => Some(format!(
            "✅ {mention} is IN!\nCurrent count: {count} players"
        )),
        Join::AlreadyIn => Some("ℹ️ You're already in!".to_string()),
        Join::Inactive => Some("❌ No active selection. Wait for admin to /begin".to_string()),
        Join::WrongChat => None,
    }
}

/// Reply for an "out" message. `None` means stay silent.
pub fn leave(outcome: Leave, mention: &str) -> Option<String> {
    match outcome {
        Leave::Left { count } => Some(format!(
            "❌ {mention} is OUT\nCurrent count: {count} players"
        )),
        Leave::NotIn => Some("ℹ️ You weren't in the list".to_string()),
        Leave::Inactive => Some("❌ No active selection".to_string()),
        Leave::WrongChat => None,
    }
}

pub fn reset_done() -> String {
    "🔄 Session reset. Use /begin to start new selection".to_string()
}

/// Denial messages for gated commands, per command name.
pub fn denial(command: &str, error: EngineError) -> String {
    match error {
        EngineError::NotAuthorized => match command {
            "begin" => "❌ Only admins can start selection".to_string(),
            "end" => "❌ Only admins can end selection".to_string(),
            "reset" => "❌ Only admins can reset".to_string(),
            "status" => "❌ Admin only command".to_string(),
            "addadmin" => "❌ Only admins can add other admins".to_string(),
            "removeadmin" => "❌ Only admins can remove other admins".to_string(),
            _ => "❌ Admin only command".to_string(),
        },
        EngineError::NoActiveSession => "❌ No active session. Use /begin first".to_string(),
        EngineError::EmptyRoster => "❌ No players have joined yet!".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, username: Option<&str>) -> Player {
        Player { name: name.to_string(), username: username.map(String::from) }
    }

    #[test]
    fn labels_cycle_past_the_palette() {
        let teams: Vec<Team> = (0..10)
            .map(|i| Team { members: vec![player(&format!("p{i}"), None)] })
            .collect();
        let text = teams_announcement(&teams);
        // Ninth and tenth teams wrap back to the start of the palette
        assert_eq!(text.matches("Red Team").count(), 2);
        assert_eq!(text.matches("Blue Team").count(), 2);
        assert_eq!(text.matches("Green Team").count(), 1);
        assert!(text.contains("<b>Teams Created:</b> 10"));
    }

    #[test]
    fn announcement_prefers_usernames() {
        let teams = vec![Team {
            members: vec![player("Ana", Some("ana")), player("Ben", None)],
        }];
        let text = teams_announcement(&teams);
        assert!(text.contains("• @ana"));
        assert!(text.contains("• Ben"));
        assert!(text.contains("<b>Total Players:</b> 2"));
    }

    #[test]
    fn wrong_chat_replies_stay_silent() {
        assert!(join(Join::WrongChat, "@ana").is_none());
        assert!(leave(Leave::WrongChat, "@ana").is_none());
        assert!(join(Join::Joined { count: 3 }, "@ana").unwrap().contains("3 players"));
    }

    #[test]
    fn help_gates_admin_section() {
        assert!(!help(false).contains("Admin Only"));
        assert!(help(true).contains("/addadmin"));
    }
}
