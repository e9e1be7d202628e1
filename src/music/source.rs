//! Media resolution: a user-supplied reference becomes a titled, playable
//! [`Song`] via `yt-dlp`'s JSON output.

use serde::Deserialize;
use tokio::process::Command;
use url::Url;

use super::Song;
use super::manager::{MusicError, MusicResult};

#[derive(Deserialize)]
struct YtDlpMetadata {
    title: Option<String>,
    webpage_url: Option<String>,
    original_url: Option<String>,
}

/// Resolve a media reference (a link, or search words) to a [`Song`].
pub async fn resolve(reference: &str) -> MusicResult<Song> {
    let target = request_target(reference);

    let output = Command::new("yt-dlp")
        .args(["-j", "--no-playlist", "--no-warnings", &target])
        .output()
        .await
        .map_err(|e| MusicError::AudioSourceError(format!("failed to run yt-dlp: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MusicError::AudioSourceError(stderr.trim().to_string()));
    }

    let metadata: YtDlpMetadata = serde_json::from_slice(&output.stdout)
        .map_err(|e| MusicError::AudioSourceError(format!("unreadable yt-dlp metadata: {e}")))?;

    song_from_metadata(metadata, reference)
}

fn song_from_metadata(metadata: YtDlpMetadata, reference: &str) -> MusicResult<Song> {
    let source_url = metadata
        .webpage_url
        .or(metadata.original_url)
        .ok_or_else(|| MusicError::AudioSourceError(format!("no source URL for '{reference}'")))?;

    Ok(Song {
        title: metadata
            .title
            .unwrap_or_else(|| "Unknown track".to_string()),
        source_url,
    })
}

/// Links resolve as-is; anything else becomes a single-result search.
fn request_target(reference: &str) -> String {
    if is_url(reference) {
        reference.to_string()
    } else {
        format!("ytsearch1:{reference}")
    }
}

fn is_url(reference: &str) -> bool {
    Url::parse(reference).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    #[test]
    fn links_resolve_directly() {
        let reference = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert_eq!(request_target(reference), reference);
    }

    #[test]
    fn plain_words_become_a_search() {
        assert_eq!(request_target("lofi beats"), "ytsearch1:lofi beats");
        // a scheme yt-dlp cannot stream from is treated as search words too
        assert_eq!(request_target("ftp://host/file"), "ytsearch1:ftp://host/file");
    }

    #[test]
    fn metadata_maps_to_a_song() {
        let metadata: YtDlpMetadata = serde_json::from_str(
            r#"{"title": "A Song", "webpage_url": "https://youtu.be/abc", "duration": 210.0}"#,
        )
        .unwrap();

        let song = song_from_metadata(metadata, "https://youtu.be/abc").unwrap();
        assert_eq!(
            song,
            Song {
                title: "A Song".to_string(),
                source_url: "https://youtu.be/abc".to_string(),
            }
        );
    }

    #[test]
    fn missing_source_url_is_an_error() {
        let metadata: YtDlpMetadata = serde_json::from_str(r#"{"title": "A Song"}"#).unwrap();
        assert_matches!(
            song_from_metadata(metadata, "query"),
            Err(MusicError::AudioSourceError(_))
        );
    }

    #[test]
    fn original_url_is_the_fallback() {
        let metadata: YtDlpMetadata =
            serde_json::from_str(r#"{"original_url": "https://youtu.be/xyz"}"#).unwrap();
        let song = song_from_metadata(metadata, "query").unwrap();
        assert_eq!(song.source_url, "https://youtu.be/xyz");
        assert_eq!(song.title, "Unknown track");
    }
}
