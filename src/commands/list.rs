use serenity::client::Context;
use serenity::model::channel::Message;

use crate::CommandResult;
use crate::music::manager::MusicError;
use crate::music::store::QUEUE_STORE;

use super::check_msg;

const MAX_LISTED: usize = 20;

/// Show the guild's queue, head first.
pub async fn list(ctx: &Context, msg: &Message) -> CommandResult {
    let guild_id = msg.guild_id.ok_or(MusicError::NotInGuild)?;

    let songs: Vec<String> = match QUEUE_STORE.get(guild_id) {
        Some(entry) => {
            let queue = entry.lock().await;
            queue
                .songs
                .iter()
                .take(MAX_LISTED)
                .map(|song| song.title.clone())
                .collect()
        }
        None => Vec::new(),
    };

    if songs.is_empty() {
        check_msg(msg.channel_id.say(&ctx.http, "The queue is empty!").await);
        return Ok(());
    }

    let mut lines = Vec::with_capacity(songs.len());
    for (index, title) in songs.iter().enumerate() {
        let marker = if index == 0 { "  ← now playing" } else { "" };
        lines.push(format!("{} - {title}{marker}", index + 1));
    }

    check_msg(
        msg.channel_id
            .say(&ctx.http, format!("**Queue**:\n```{}```", lines.join("\n")))
            .await,
    );

    Ok(())
}
