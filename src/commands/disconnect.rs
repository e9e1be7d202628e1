use serenity::client::Context;
use serenity::model::channel::Message;
use tracing::warn;

use crate::CommandResult;
use crate::music::manager::{self, MusicError};
use crate::music::player;
use crate::music::store::QUEUE_STORE;

use super::{check_msg, user_reply};

/// Close the guild's playback session and leave the voice channel.
pub async fn disconnect(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = msg.guild_id.ok_or(MusicError::NotInGuild)?;

    if !QUEUE_STORE.contains(guild_id) {
        check_msg(
            msg.channel_id
                .say(&ctx.http, user_reply(&MusicError::NoQueue))
                .await,
        );
        return Ok(());
    }

    // Playback is stopped before the connection is released, so no stream
    // outlives its voice binding.
    player::teardown(guild_id).await;

    if let Err(err) = manager::leave_channel(ctx, guild_id).await {
        warn!("failed to leave voice channel for guild {guild_id}: {err}");
    }

    Ok(())
}
