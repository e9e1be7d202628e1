use dotenv::dotenv;
use serenity::all::ClientBuilder;
use serenity::prelude::GatewayIntents;
use songbird::SerenityInit;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use jukebox::config::Config;
use jukebox::events::Handler;

#[tokio::main]
async fn main() -> Result<(), jukebox::Error> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jukebox=debug,warn")),
        )
        .with_target(true)
        .init();

    dotenv().ok();

    let config = Config::from_env();

    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_VOICE_STATES;

    let mut client = ClientBuilder::new(&config.token, intents)
        .event_handler(Handler::new(config))
        .register_songbird()
        .await?;

    client.start().await.map_err(Into::into)
}
