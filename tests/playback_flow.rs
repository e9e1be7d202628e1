//! Queue semantics exercised the way the command handlers and the playback
//! driver drive them: enqueue on arrival, advance on each finished track.

use jukebox::music::Song;
use jukebox::music::store::{GuildQueue, QueueStore};
use serenity::model::id::{ChannelId, GuildId};

fn song(n: u32) -> Song {
    Song {
        title: format!("Track {n}"),
        source_url: format!("https://youtu.be/test{n}"),
    }
}

fn fresh_queue() -> GuildQueue {
    GuildQueue::new(ChannelId::new(100), ChannelId::new(200))
}

#[tokio::test]
async fn enqueue_onto_empty_queue_makes_the_song_current() {
    let store = QueueStore::new();
    let guild = GuildId::new(1);
    let entry = store.insert(guild, fresh_queue());

    let mut queue = entry.lock().await;
    assert!(queue.enqueue(song(1)), "empty queue should start playback");
    assert_eq!(queue.head(), Some(&song(1)));
}

#[tokio::test]
async fn enqueue_onto_busy_queue_appends_at_the_tail() {
    let store = QueueStore::new();
    let guild = GuildId::new(2);
    let entry = store.insert(guild, fresh_queue());

    let mut queue = entry.lock().await;
    queue.enqueue(song(1));
    assert!(!queue.enqueue(song(2)), "busy queue should not restart");
    assert!(!queue.enqueue(song(3)));

    // the current song is unaffected, new songs sit behind it in order
    assert_eq!(queue.head(), Some(&song(1)));
    let titles: Vec<_> = queue.songs.iter().map(|s| s.title.clone()).collect();
    assert_eq!(titles, vec!["Track 1", "Track 2", "Track 3"]);
}

#[tokio::test]
async fn consecutive_completions_drain_to_idle() {
    let mut queue = fresh_queue();
    for n in 1..=4 {
        queue.enqueue(song(n));
    }

    // each natural completion pops the head
    for _ in 1..=4 {
        assert!(queue.head().is_some());
        queue.advance();
    }

    assert!(queue.head().is_none());
    // the terminal lookup on an empty queue must stay a no-op
    queue.advance();
    assert!(queue.songs.is_empty());
}

#[tokio::test]
async fn stop_empties_the_queue_regardless_of_depth() {
    for depth in [1, 2, 5] {
        let mut queue = fresh_queue();
        for n in 0..depth {
            queue.enqueue(song(n));
        }

        // stop clears first; the forced track end then pops nothing
        queue.clear();
        queue.advance();

        assert!(queue.songs.is_empty(), "depth {depth} should clear fully");
    }
}

#[tokio::test]
async fn skip_with_a_single_song_reaches_idle() {
    let mut queue = fresh_queue();
    queue.enqueue(song(1));

    // a forced stop and a natural finish advance identically
    queue.advance();

    assert!(queue.head().is_none());
}

#[tokio::test]
async fn play_a_play_b_skip_leaves_b_current() {
    let store = QueueStore::new();
    let guild = GuildId::new(3);
    let entry = store.insert(guild, fresh_queue());

    let mut queue = entry.lock().await;
    assert!(queue.enqueue(song(1)));
    assert!(!queue.enqueue(song(2)));

    queue.advance();

    assert_eq!(queue.head(), Some(&song(2)));
    assert_eq!(queue.songs.len(), 1);
}

#[tokio::test]
async fn missing_session_means_no_store_entry() {
    let store = QueueStore::new();
    let guild = GuildId::new(4);

    // `play` against a guild without a session finds nothing and must not
    // create anything either
    assert!(store.get(guild).is_none());
    assert!(!store.contains(guild));
}

#[tokio::test]
async fn guilds_do_not_share_queues() {
    let store = QueueStore::new();
    let first = GuildId::new(5);
    let second = GuildId::new(6);

    let first_entry = store.insert(first, fresh_queue());
    let second_entry = store.insert(second, fresh_queue());

    first_entry.lock().await.enqueue(song(1));

    assert_eq!(first_entry.lock().await.songs.len(), 1);
    assert!(second_entry.lock().await.songs.is_empty());

    store.remove(first);
    assert!(!store.contains(first));
    assert!(store.contains(second));
}
