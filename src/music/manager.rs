//! Voice-channel concerns: joining, leaving, and the checks that gate them.

use std::sync::Arc;

use serenity::client::Context;
use serenity::model::id::{ChannelId, GuildId, UserId};
use serenity::model::permissions::Permissions;
use songbird::{Call, Songbird};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that can occur during music operations
#[derive(Error, Debug)]
pub enum MusicError {
    #[error("Not in a guild")]
    NotInGuild,

    #[error("User is not in a voice channel")]
    UserNotInVoiceChannel,

    #[error("Missing permission to connect to the voice channel")]
    MissingConnect,

    #[error("Missing permission to speak in the voice channel")]
    MissingSpeak,

    #[error("Failed to join voice channel: {0}")]
    JoinError(String),

    #[error("Not connected to a voice channel")]
    NotConnected,

    #[error("Failed to get voice manager")]
    NoVoiceManager,

    #[error("No playback session for this guild")]
    NoQueue,

    #[error("Audio source error: {0}")]
    AudioSourceError(String),
}

/// Result type for music operations
pub type MusicResult<T> = Result<T, MusicError>;

/// Get the Songbird voice client from the context
pub async fn get_songbird(ctx: &Context) -> MusicResult<Arc<Songbird>> {
    songbird::get(ctx).await.ok_or(MusicError::NoVoiceManager)
}

/// Join a voice channel, returning the live call handle.
pub async fn join_channel(
    ctx: &Context,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> MusicResult<Arc<Mutex<Call>>> {
    let songbird = get_songbird(ctx).await?;

    songbird
        .join(guild_id, channel_id)
        .await
        .map_err(|e| MusicError::JoinError(e.to_string()))
}

/// Leave a voice channel
pub async fn leave_channel(ctx: &Context, guild_id: GuildId) -> MusicResult<()> {
    let songbird = get_songbird(ctx).await?;

    if songbird.get(guild_id).is_none() {
        return Err(MusicError::NotConnected);
    }

    songbird
        .remove(guild_id)
        .await
        .map_err(|e| MusicError::JoinError(e.to_string()))
}

/// Get the voice channel ID that the user is currently in
pub fn get_user_voice_channel(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
) -> MusicResult<ChannelId> {
    let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;

    guild
        .voice_states
        .get(&user_id)
        .and_then(|state| state.channel_id)
        .ok_or(MusicError::UserNotInVoiceChannel)
}

/// Check that the bot may connect to and speak in the given voice channel.
pub async fn ensure_voice_permissions(
    ctx: &Context,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> MusicResult<()> {
    let bot_id = ctx.cache.current_user().id;
    let member = guild_id
        .member(&ctx.http, bot_id)
        .await
        .map_err(|e| MusicError::JoinError(e.to_string()))?;

    let permissions = {
        let guild = ctx.cache.guild(guild_id).ok_or(MusicError::NotInGuild)?;
        let channel = guild.channels.get(&channel_id).ok_or_else(|| {
            MusicError::JoinError(format!("voice channel {channel_id} is not cached"))
        })?;

        guild.user_permissions_in(channel, &member)
    };

    check_permissions(permissions)
}

/// CONNECT is required before SPEAK even matters.
pub fn check_permissions(permissions: Permissions) -> MusicResult<()> {
    if !permissions.contains(Permissions::CONNECT) {
        return Err(MusicError::MissingConnect);
    }

    if !permissions.contains(Permissions::SPEAK) {
        return Err(MusicError::MissingSpeak);
    }

    Ok(())
}
