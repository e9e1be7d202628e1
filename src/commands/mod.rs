//! Command parsing and routing for prefixed chat messages.

pub mod parser;

mod connect;
mod disconnect;
mod list;
mod play;
mod skip;
mod stop;

use serenity::Result as SerenityResult;
use serenity::client::Context;
use serenity::model::channel::Message;
use tracing::{error, info, warn};

use crate::music::manager::MusicError;

use self::parser::ParsedCommand;

/// Route a parsed command to its handler. Handler errors are logged and
/// never propagate; the gateway loop outlives any single guild's failure.
pub async fn dispatch(ctx: &Context, msg: &Message, parsed: ParsedCommand) {
    info!("dispatching '{}' from {}", parsed.command, msg.author.name);

    let result = match parsed.command.as_str() {
        "play" => {
            let result = play::play(ctx, msg, &parsed.args).await;
            if let Err(why) = msg.delete(&ctx.http).await {
                warn!("could not delete trigger message: {why}");
            }
            result
        }
        "skip" => skip::skip(ctx, msg).await,
        "stop" => stop::stop(ctx, msg).await,
        "list" => list::list(ctx, msg).await,
        "connect" => {
            check_msg(msg.channel_id.say(&ctx.http, "Hello! Coming right over.").await);
            connect::connect(ctx, msg).await
        }
        "disconnect" => {
            check_msg(msg.channel_id.say(&ctx.http, "Goodbye!").await);
            disconnect::disconnect(ctx, msg).await
        }
        _ => {
            check_msg(
                msg.channel_id
                    .say(&ctx.http, "I don't understand that command.")
                    .await,
            );
            Ok(())
        }
    };

    if let Err(why) = result {
        error!("command '{}' failed: {why}", parsed.command);
    }
}

/// The reply users see in chat for a failed operation.
pub(crate) fn user_reply(err: &MusicError) -> String {
    match err {
        MusicError::UserNotInVoiceChannel => {
            "You need to be in a voice channel for that.".to_string()
        }
        MusicError::MissingConnect => {
            "I don't have permission to join your voice channel.".to_string()
        }
        MusicError::MissingSpeak => {
            "I don't have permission to speak in your voice channel.".to_string()
        }
        MusicError::NoQueue => {
            "I'm not connected here yet. Ask me to connect first!".to_string()
        }
        other => other.to_string(),
    }
}

/// Checks that a message successfully sent; if not, logs why.
pub(crate) fn check_msg(result: SerenityResult<Message>) {
    if let Err(why) = result {
        warn!("failed to send message: {why}");
    }
}
