use serenity::client::Context;
use serenity::model::channel::Message;
use tracing::warn;

use crate::CommandResult;
use crate::music::manager::{self, MusicError};
use crate::music::store::QUEUE_STORE;

use super::{check_msg, user_reply};

/// Clear the queue, then force-end the current stream. The queue is already
/// empty when the terminal event fires, so the driver goes idle instead of
/// starting another song.
pub async fn stop(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = msg.guild_id.ok_or(MusicError::NotInGuild)?;

    if let Err(err) = manager::get_user_voice_channel(ctx, guild_id, msg.author.id) {
        check_msg(msg.channel_id.say(&ctx.http, user_reply(&err)).await);
        return Ok(());
    }

    let Some(entry) = QUEUE_STORE.get(guild_id) else {
        check_msg(
            msg.channel_id
                .say(&ctx.http, "There is no song that I could stop!")
                .await,
        );
        return Ok(());
    };

    let current = {
        let mut queue = entry.lock().await;
        queue.clear();
        queue.current.clone()
    };

    match current {
        Some(handle) => {
            if let Err(e) = handle.stop() {
                warn!("failed to stop current track for guild {guild_id}: {e}");
            }
        }
        None => {
            check_msg(
                msg.channel_id
                    .say(&ctx.http, "Nothing is playing right now.")
                    .await,
            );
        }
    }

    Ok(())
}
