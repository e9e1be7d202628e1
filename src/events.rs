use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::event::ResumedEvent;
use serenity::model::gateway::Ready;
use serenity::model::voice::VoiceState;
use tracing::info;

use crate::commands::{self, parser};
use crate::config::Config;
use crate::music::player;

pub struct Handler {
    config: Config,
}

impl Handler {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        // The bot never answers itself.
        if msg.author.bot {
            return;
        }

        if msg.guild_id.is_none() {
            return;
        }

        let Some(parsed) = parser::parse(&msg.content, &self.config.prefix) else {
            return;
        };

        commands::dispatch(&ctx, &msg, parsed).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is connected and ready", ready.user.name);
    }

    async fn resume(&self, _ctx: Context, _event: ResumedEvent) {
        info!("gateway connection resumed");
    }

    async fn voice_state_update(&self, ctx: Context, _old: Option<VoiceState>, new: VoiceState) {
        // An out-of-band voice disconnect must not leave a dangling session.
        if new.channel_id.is_some() {
            return;
        }

        let bot_id = ctx.cache.current_user().id;
        if new.user_id != bot_id {
            return;
        }

        if let Some(guild_id) = new.guild_id {
            info!("voice connection for guild {guild_id} dropped, cleaning up");
            player::teardown(guild_id).await;
        }
    }
}
