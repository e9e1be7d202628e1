use std::sync::LazyLock;

pub mod commands;
pub mod config;
pub mod events;
pub mod music;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type CommandResult = Result<(), Error>;

/// Shared HTTP client, handed to songbird's lazy youtube-dl inputs.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);
