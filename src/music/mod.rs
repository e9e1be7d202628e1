pub mod manager;
pub mod player;
pub mod source;
pub mod store;

/// A resolved track: display title plus the canonical page URL the audio
/// stream is opened from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Song {
    pub title: String,
    pub source_url: String,
}
