//! The sequential playback driver: one task per guild walks the queue head
//! by head, streaming each song over the guild's voice connection.

use std::sync::Arc;

use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::{ChannelId, GuildId};
use songbird::events::{Event, EventContext, EventHandler, TrackEvent};
use songbird::input::YoutubeDl;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{error, info, warn};

use crate::HTTP_CLIENT;

use super::store::{DEFAULT_VOLUME, GuildQueue, QUEUE_STORE};

/// Terminal outcome of one streamed track.
enum TrackOutcome {
    /// Natural end or forced stop; either way the head has been consumed.
    Finished,
    Errored(String),
}

struct TrackEndNotifier {
    outcome: UnboundedSender<TrackOutcome>,
}

#[async_trait]
impl EventHandler for TrackEndNotifier {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        let _ = self.outcome.send(TrackOutcome::Finished);
        None
    }
}

struct TrackErrorNotifier {
    outcome: UnboundedSender<TrackOutcome>,
}

#[async_trait]
impl EventHandler for TrackErrorNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let detail = match ctx {
            EventContext::Track(tracks) => tracks
                .first()
                .map(|(state, _)| format!("{:?}", state.playing))
                .unwrap_or_else(|| "unknown".to_string()),
            _ => "unknown".to_string(),
        };
        let _ = self.outcome.send(TrackOutcome::Errored(detail));
        None
    }
}

/// Start the guild's playback driver unless one is already running.
pub async fn start(http: Arc<Http>, guild_id: GuildId) {
    let Some(entry) = QUEUE_STORE.get(guild_id) else {
        return;
    };

    let mut queue = entry.lock().await;
    if queue.driver_running {
        return;
    }
    queue.driver_running = true;

    queue.driver = Some(tokio::spawn(run(http, guild_id)));
}

/// The driver loop: stream the queue head, await its terminal event, pop on
/// a finish, stall on an error.
async fn run(http: Arc<Http>, guild_id: GuildId) {
    loop {
        // The entry disappears when the guild disconnects.
        let Some(entry) = QUEUE_STORE.get(guild_id) else {
            return;
        };

        let (song, call, volume, text_channel) = {
            let mut queue = entry.lock().await;

            let Some(song) = queue.head().cloned() else {
                queue.playing = false;
                queue.current = None;
                queue.driver_running = false;
                info!("queue drained for guild {guild_id}, going idle");
                return;
            };

            let Some(call) = queue.connection.clone() else {
                queue.playing = false;
                queue.driver_running = false;
                warn!("no voice connection for guild {guild_id}, halting playback");
                return;
            };

            (song, call, queue.volume, queue.text_channel)
        };

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();

        let source = YoutubeDl::new(HTTP_CLIENT.clone(), song.source_url.clone());
        let handle = {
            let mut call = call.lock().await;
            let handle = call.play_input(source.into());

            let _ = handle.set_volume(volume / DEFAULT_VOLUME);

            if let Err(e) = handle.add_event(
                Event::Track(TrackEvent::End),
                TrackEndNotifier {
                    outcome: outcome_tx.clone(),
                },
            ) {
                error!("failed to register end notifier for guild {guild_id}: {e}");
            }
            if let Err(e) = handle.add_event(
                Event::Track(TrackEvent::Error),
                TrackErrorNotifier {
                    outcome: outcome_tx,
                },
            ) {
                error!("failed to register error notifier for guild {guild_id}: {e}");
            }

            handle
        };

        {
            let mut queue = entry.lock().await;
            queue.current = Some(handle);
            queue.playing = true;
        }

        say(&http, text_channel, &format!("Now playing: **{}**", song.title)).await;

        // A closed channel means the call itself was torn down.
        let outcome = outcome_rx.recv().await.unwrap_or(TrackOutcome::Finished);

        if let TrackOutcome::Errored(detail) = &outcome {
            error!(
                "stream failed for '{}' in guild {guild_id}: {detail}",
                song.title
            );
        }

        let advance = {
            let mut queue = entry.lock().await;
            settle(&mut queue, outcome)
        };

        if !advance {
            return;
        }
    }
}

/// Apply a track's terminal outcome. Returns whether the driver should go
/// on to the next head; an errored stream leaves the queue untouched, so
/// playback stalls rather than skipping.
fn settle(queue: &mut GuildQueue, outcome: TrackOutcome) -> bool {
    queue.current = None;

    match outcome {
        TrackOutcome::Finished => {
            queue.advance();
            true
        }
        TrackOutcome::Errored(_) => {
            queue.playing = false;
            queue.driver_running = false;
            false
        }
    }
}

/// Tear down a guild's playback session: drop the store entry, abort the
/// driver, and stop any active stream. Releasing the voice connection is
/// the caller's business.
pub async fn teardown(guild_id: GuildId) {
    let Some(entry) = QUEUE_STORE.remove(guild_id) else {
        return;
    };

    let mut queue = entry.lock().await;
    queue.clear();

    if let Some(driver) = queue.driver.take() {
        driver.abort();
    }

    if let Some(handle) = queue.current.take() {
        if let Err(e) = handle.stop() {
            warn!("failed to stop active track for guild {guild_id}: {e}");
        }
    }

    queue.playing = false;
    queue.driver_running = false;
}

/// Announce to a text channel, logging delivery failures.
async fn say(http: &Arc<Http>, channel: ChannelId, text: &str) {
    if let Err(why) = channel.say(http, text).await {
        warn!("failed to send message to channel {channel}: {why}");
    }
}
