use serenity::client::Context;
use serenity::model::channel::Message;
use tracing::error;

use crate::CommandResult;
use crate::music::manager::{self, MusicError};
use crate::music::player;
use crate::music::store::{GuildQueue, QUEUE_STORE};

use super::{check_msg, user_reply};

/// Join the invoking user's voice channel and open a playback session.
pub async fn connect(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = msg.guild_id.ok_or(MusicError::NotInGuild)?;

    let voice_channel = match manager::get_user_voice_channel(ctx, guild_id, msg.author.id) {
        Ok(channel) => channel,
        Err(err) => {
            check_msg(msg.channel_id.say(&ctx.http, user_reply(&err)).await);
            return Ok(());
        }
    };

    if let Err(err) = manager::ensure_voice_permissions(ctx, guild_id, voice_channel).await {
        check_msg(msg.channel_id.say(&ctx.http, user_reply(&err)).await);
        return Ok(());
    }

    // A previous session in this guild is replaced, not merged.
    player::teardown(guild_id).await;

    let entry = QUEUE_STORE.insert(guild_id, GuildQueue::new(msg.channel_id, voice_channel));

    match manager::join_channel(ctx, guild_id, voice_channel).await {
        Ok(call) => {
            entry.lock().await.connection = Some(call);
        }
        Err(err) => {
            error!("voice join failed for guild {guild_id}: {err}");
            QUEUE_STORE.remove(guild_id);
            check_msg(
                msg.channel_id
                    .say(&ctx.http, format!("I couldn't join the voice channel: {err}"))
                    .await,
            );
        }
    }

    Ok(())
}
