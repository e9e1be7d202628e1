//! Per-guild playback state and the process-wide mapping that owns it.

use std::collections::VecDeque;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use serenity::model::id::{ChannelId, GuildId};
use songbird::Call;
use songbird::tracks::TrackHandle;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::Song;

pub const DEFAULT_VOLUME: f32 = 5.0;

/// Everything one guild's playback session owns. The head of `songs` is the
/// current song; natural completion pops it.
pub struct GuildQueue {
    /// Channel the session was started from; playback announcements go here.
    pub text_channel: ChannelId,
    pub voice_channel: ChannelId,
    /// Live voice binding, attached once the join completes.
    pub connection: Option<Arc<Mutex<Call>>>,
    pub songs: VecDeque<Song>,
    pub volume: f32,
    pub playing: bool,
    /// Handle of the active stream, used to force-end it on skip/stop.
    pub current: Option<TrackHandle>,
    /// The guild's playback driver task, if one was ever started.
    pub driver: Option<JoinHandle<()>>,
    /// Set and cleared under the entry lock; at most one driver per guild.
    pub driver_running: bool,
}

impl GuildQueue {
    pub fn new(text_channel: ChannelId, voice_channel: ChannelId) -> Self {
        Self {
            text_channel,
            voice_channel,
            connection: None,
            songs: VecDeque::new(),
            volume: DEFAULT_VOLUME,
            playing: true,
            current: None,
            driver: None,
            driver_running: false,
        }
    }

    /// Append a song; true iff the queue was empty beforehand.
    pub fn enqueue(&mut self, song: Song) -> bool {
        let was_empty = self.songs.is_empty();
        self.songs.push_back(song);
        was_empty
    }

    /// The song currently at the front of the queue.
    pub fn head(&self) -> Option<&Song> {
        self.songs.front()
    }

    /// Drop the just-played head. No-op on an empty queue.
    pub fn advance(&mut self) {
        self.songs.pop_front();
    }

    pub fn clear(&mut self) {
        self.songs.clear();
    }
}

/// Concurrent guild-id → queue mapping; every entry carries its own lock, so
/// guilds never contend with each other.
pub struct QueueStore {
    entries: DashMap<GuildId, Arc<Mutex<GuildQueue>>>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<Mutex<GuildQueue>>> {
        self.entries
            .get(&guild_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn insert(&self, guild_id: GuildId, queue: GuildQueue) -> Arc<Mutex<GuildQueue>> {
        let entry = Arc::new(Mutex::new(queue));
        self.entries.insert(guild_id, Arc::clone(&entry));
        entry
    }

    pub fn remove(&self, guild_id: GuildId) -> Option<Arc<Mutex<GuildQueue>>> {
        self.entries.remove(&guild_id).map(|(_, entry)| entry)
    }

    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.entries.contains_key(&guild_id)
    }
}

impl Default for QueueStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide store. Invariant: a guild id is present iff the bot holds
/// (or is establishing) a voice connection in that guild.
pub static QUEUE_STORE: LazyLock<QueueStore> = LazyLock::new(QueueStore::new);

#[cfg(test)]
mod tests {
    use super::*;

    fn song(n: u32) -> Song {
        Song {
            title: format!("Track {n}"),
            source_url: format!("https://youtu.be/test{n}"),
        }
    }

    fn fresh_queue() -> GuildQueue {
        GuildQueue::new(ChannelId::new(10), ChannelId::new(20))
    }

    #[test]
    fn new_queue_starts_empty_at_default_volume() {
        let queue = fresh_queue();
        assert!(queue.songs.is_empty());
        assert!(queue.connection.is_none());
        assert!(queue.current.is_none());
        assert!((queue.volume - DEFAULT_VOLUME).abs() < f32::EPSILON);
        assert!(queue.playing);
        assert!(!queue.driver_running);
    }

    #[test]
    fn enqueue_reports_whether_queue_was_empty() {
        let mut queue = fresh_queue();
        assert!(queue.enqueue(song(1)));
        assert!(!queue.enqueue(song(2)));
        assert_eq!(queue.head(), Some(&song(1)));
    }

    #[test]
    fn advance_on_empty_queue_is_a_no_op() {
        let mut queue = fresh_queue();
        queue.advance();
        assert!(queue.head().is_none());
    }

    #[test]
    fn store_roundtrip() {
        let store = QueueStore::new();
        let guild = GuildId::new(1);

        assert!(!store.contains(guild));
        assert!(store.get(guild).is_none());

        store.insert(guild, fresh_queue());
        assert!(store.contains(guild));
        assert!(store.get(guild).is_some());

        assert!(store.remove(guild).is_some());
        assert!(!store.contains(guild));
        assert!(store.remove(guild).is_none());
    }
}
