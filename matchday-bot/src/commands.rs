//! Command dispatch: inbound Telegram messages → engine operations → replies.

use anyhow::Result;
use matchday_core::{Engine, render, state::Player};

use crate::telegram::{Message, TelegramClient, Update, User};

/// Everything the bot reacts to. Commands may carry an `@botname` suffix in
/// group chats; anything else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    AddMe,
    AddAdmin,
    RemoveAdmin,
    ListAdmins,
    Begin,
    End,
    Status,
    Reset,
    In,
    Out,
    Ignore,
}

pub fn parse(text: &str, bot_username: Option<&str>) -> Command {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('/') {
        let token = rest.split_whitespace().next().unwrap_or("");
        let name = match token.split_once('@') {
            // `/end@otherbot` is someone else's command
            Some((name, suffix)) => {
                let ours = bot_username
                    .map(|u| suffix.eq_ignore_ascii_case(u))
                    .unwrap_or(false);
                if !ours {
                    return Command::Ignore;
                }
                name
            }
            None => token,
        };
        return match name.to_lowercase().as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "addme" => Command::AddMe,
            "addadmin" => Command::AddAdmin,
            "removeadmin" => Command::RemoveAdmin,
            "listadmins" => Command::ListAdmins,
            "begin" => Command::Begin,
            "end" => Command::End,
            "status" => Command::Status,
            "reset" => Command::Reset,
            _ => Command::Ignore,
        };
    }
    match text.to_lowercase().as_str() {
        "in" => Command::In,
        "out" => Command::Out,
        _ => Command::Ignore,
    }
}

fn profile_of(user: &User) -> Player {
    Player {
        name: user.first_name.clone(),
        username: user.username.clone(),
    }
}

/// The user a `/addadmin` or `/removeadmin` is aimed at: the author of the
/// replied-to message.
fn reply_target(msg: &Message) -> Option<&User> {
    msg.reply_to_message.as_deref().and_then(|m| m.from.as_ref())
}

pub async fn handle_update(
    client: &TelegramClient,
    engine: &Engine,
    bot_username: Option<&str>,
    update: &Update,
) -> Result<()> {
    let Some(msg) = &update.message else { return Ok(()) };
    let Some(from) = &msg.from else { return Ok(()) };
    let Some(text) = &msg.text else { return Ok(()) };

    let chat_id = msg.chat.id;
    let user_id = from.id;
    let profile = profile_of(from);

    let reply = match parse(text, bot_username) {
        Command::Start => Some(render::welcome(engine.is_admin(user_id))),
        Command::Help => Some(render::help(engine.is_admin(user_id))),

        Command::AddMe => Some(render::bootstrap(engine.bootstrap(user_id), &from.first_name)),

        Command::AddAdmin => match reply_target(msg) {
            Some(target) => match engine.grant(user_id, target.id) {
                Ok(outcome) => Some(render::grant(outcome, &target.first_name)),
                Err(e) => Some(render::denial("addadmin", e)),
            },
            None => Some(
                "💡 Reply to someone's message with /addadmin to make them an admin".to_string(),
            ),
        },

        Command::RemoveAdmin => match reply_target(msg) {
            Some(target) => match engine.revoke(user_id, target.id) {
                Ok(outcome) => Some(render::revoke(outcome, &target.first_name)),
                Err(e) => Some(render::denial("removeadmin", e)),
            },
            None => Some(
                "💡 Reply to someone's message with /removeadmin to remove their admin status"
                    .to_string(),
            ),
        },

        Command::ListAdmins => Some(render::admin_list(&engine.admins())),

        Command::Begin => match engine.begin(user_id, chat_id) {
            Ok(()) => Some(render::session_started()),
            Err(e) => Some(render::denial("begin", e)),
        },

        Command::End => match engine.finalize(user_id) {
            Ok(teams) => Some(render::teams_announcement(&teams)),
            Err(e) => Some(render::denial("end", e)),
        },

        Command::Status => match engine.status(user_id) {
            Ok(status) => Some(render::status(&status)),
            Err(e) => Some(render::denial("status", e)),
        },

        Command::Reset => match engine.reset(user_id) {
            Ok(()) => Some(render::reset_done()),
            Err(e) => Some(render::denial("reset", e)),
        },

        Command::In => {
            let mention = profile.mention();
            render::join(engine.join(user_id, profile, chat_id), &mention)
        }
        Command::Out => render::leave(engine.leave(user_id, chat_id), &profile.mention()),

        Command::Ignore => None,
    };

    if let Some(text) = reply {
        client.send_message(chat_id, &text).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_slash_commands() {
        assert_eq!(parse("/begin", None), Command::Begin);
        assert_eq!(parse("/END", None), Command::End);
        assert_eq!(parse("  /status  ", None), Command::Status);
        assert_eq!(parse("/addme", None), Command::AddMe);
        assert_eq!(parse("/kickoff", None), Command::Ignore);
    }

    #[test]
    fn bot_suffix_must_match_our_username() {
        assert_eq!(parse("/begin@matchdaybot", Some("matchdaybot")), Command::Begin);
        assert_eq!(parse("/begin@MatchdayBot", Some("matchdaybot")), Command::Begin);
        assert_eq!(parse("/begin@otherbot", Some("matchdaybot")), Command::Ignore);
        assert_eq!(parse("/begin@otherbot", None), Command::Ignore);
    }

    #[test]
    fn bare_tokens_are_case_insensitive() {
        assert_eq!(parse("in", None), Command::In);
        assert_eq!(parse(" IN ", None), Command::In);
        assert_eq!(parse("Out", None), Command::Out);
        assert_eq!(parse("inside joke", None), Command::Ignore);
        assert_eq!(parse("", None), Command::Ignore);
    }
}
