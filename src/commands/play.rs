use serenity::client::Context;
use serenity::model::channel::Message;
use tracing::warn;

use crate::CommandResult;
use crate::music::manager::MusicError;
use crate::music::store::QUEUE_STORE;
use crate::music::{player, source};

use super::{check_msg, user_reply};

/// Resolve the given reference and append it to the guild's queue; an
/// append onto an empty queue starts playback immediately.
pub async fn play(ctx: &Context, msg: &Message, args: &[String]) -> CommandResult {
    let guild_id = msg.guild_id.ok_or(MusicError::NotInGuild)?;

    let Some(entry) = QUEUE_STORE.get(guild_id) else {
        check_msg(
            msg.channel_id
                .say(&ctx.http, user_reply(&MusicError::NoQueue))
                .await,
        );
        return Ok(());
    };

    let Some(reference) = args.first() else {
        check_msg(msg.channel_id.say(&ctx.http, "Give me a link to play.").await);
        return Ok(());
    };

    let song = match source::resolve(reference).await {
        Ok(song) => song,
        Err(err) => {
            warn!("resolution failed for '{reference}': {err}");
            check_msg(
                msg.channel_id
                    .say(&ctx.http, format!("I couldn't resolve that: {err}"))
                    .await,
            );
            return Ok(());
        }
    };

    let was_empty = entry.lock().await.enqueue(song.clone());

    if was_empty {
        // The driver announces the song itself once the stream is up.
        player::start(ctx.http.clone(), guild_id).await;
    } else {
        check_msg(
            msg.channel_id
                .say(&ctx.http, format!("Enqueued **{}**", song.title))
                .await,
        );
    }

    Ok(())
}
