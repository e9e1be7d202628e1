use std::env;

/// Runtime configuration pulled from the environment.
pub struct Config {
    /// Credential for the chat platform.
    pub token: String,
    /// Marker that a message is addressed to the bot.
    pub prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            token: env::var("DISCORD_TOKEN").expect("Missing DISCORD_TOKEN"),
            prefix: env::var("JUKEBOX_PREFIX").unwrap_or_else(|_| "!".to_string()),
        }
    }
}
