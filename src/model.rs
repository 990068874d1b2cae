//! Episode records and the download summary built from them.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// One episode as the upstream API describes it.
///
/// Only the fields the summary needs; everything else in the upstream object
/// is ignored here and survives only on the pass-through endpoint.
#[derive(Debug, Deserialize)]
struct RawEpisode {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default, deserialize_with = "play_count")]
    total_plays: Option<u64>,
}

/// Accepts `12` and `12.0`; rejects negative or fractional counts.
fn play_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let Some(n) = Option::<serde_json::Number>::deserialize(d)? else {
        return Ok(None);
    };
    if let Some(v) = n.as_u64() {
        return Ok(Some(v));
    }
    match n.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(D::Error::custom(format!("invalid play count {n}"))),
    }
}

/// A normalised episode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRecord {
    pub id: u64,
    pub title: String,
    pub published_at: String,
    /// `total_plays` upstream; 0 when absent or null.
    pub downloads: u64,
}

impl EpisodeRecord {
    /// Projects one raw upstream episode object.
    pub fn from_upstream(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw: RawEpisode = serde_json::from_value(value)?;
        Ok(Self {
            id: raw.id,
            title: raw.title.unwrap_or_default(),
            published_at: raw.published_at.unwrap_or_default(),
            downloads: raw.total_plays.unwrap_or(0),
        })
    }
}

/// Download summary for a podcast.
///
/// Only constructible from the episode list it summarises, so the totals
/// always agree with `episode_stats`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastStats {
    total_episodes: usize,
    total_downloads: u64,
    episode_stats: Vec<EpisodeRecord>,
}

impl PodcastStats {
    pub fn from_episodes(episodes: Vec<EpisodeRecord>) -> Self {
        let total_downloads = episodes.iter().map(|e| e.downloads).sum();
        Self {
            total_episodes: episodes.len(),
            total_downloads,
            episode_stats: episodes,
        }
    }

    pub fn total_episodes(&self) -> usize { self.total_episodes }
    pub fn total_downloads(&self) -> u64 { self.total_downloads }
    pub fn episode_stats(&self) -> &[EpisodeRecord] { &self.episode_stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: u64, downloads: u64) -> EpisodeRecord {
        EpisodeRecord {
            id,
            title: format!("Ep{id}"),
            published_at: "2024-01-01".into(),
            downloads,
        }
    }

    #[test]
    fn missing_or_null_plays_count_as_zero() {
        let absent = EpisodeRecord::from_upstream(json!({
            "id": 2, "title": "Ep2", "published_at": "2024-01-02"
        }))
        .unwrap();
        assert_eq!(absent.downloads, 0);

        let null = EpisodeRecord::from_upstream(json!({
            "id": 3, "title": "Ep3", "published_at": "2024-01-03", "total_plays": null
        }))
        .unwrap();
        assert_eq!(null.downloads, 0);
    }

    #[test]
    fn integral_float_plays_are_accepted() {
        let ep = EpisodeRecord::from_upstream(json!({
            "id": 4, "title": "Ep4", "published_at": "2024-01-04", "total_plays": 12.0
        }))
        .unwrap();
        assert_eq!(ep.downloads, 12);

        assert!(EpisodeRecord::from_upstream(json!({ "id": 5, "total_plays": 1.5 })).is_err());
        assert!(EpisodeRecord::from_upstream(json!({ "id": 6, "total_plays": -3 })).is_err());
    }

    #[test]
    fn extra_upstream_fields_are_ignored() {
        let ep = EpisodeRecord::from_upstream(json!({
            "id": 7,
            "title": "Pilot",
            "published_at": "2024-03-01T10:00:00.000-05:00",
            "total_plays": 12,
            "audio_url": "https://example.com/7.mp3",
            "duration": 1800
        }))
        .unwrap();
        assert_eq!(ep, EpisodeRecord {
            id: 7,
            title: "Pilot".into(),
            published_at: "2024-03-01T10:00:00.000-05:00".into(),
            downloads: 12,
        });
    }

    #[test]
    fn missing_id_is_an_error() {
        assert!(EpisodeRecord::from_upstream(json!({ "title": "no id" })).is_err());
    }

    #[test]
    fn totals_match_episode_list() {
        let stats = PodcastStats::from_episodes(vec![record(1, 100), record(2, 0), record(3, 42)]);
        assert_eq!(stats.total_episodes(), 3);
        assert_eq!(stats.total_downloads(), 142);
        assert_eq!(stats.episode_stats().iter().map(|e| e.id).collect::<Vec<_>>(), [1, 2, 3]);
    }

    #[test]
    fn empty_podcast_has_zero_totals() {
        let stats = PodcastStats::from_episodes(Vec::new());
        assert_eq!(stats.total_episodes(), 0);
        assert_eq!(stats.total_downloads(), 0);
    }

    #[test]
    fn serialises_camel_case() {
        let stats = PodcastStats::from_episodes(vec![record(1, 5)]);
        assert_eq!(serde_json::to_value(&stats).unwrap(), json!({
            "totalEpisodes": 1,
            "totalDownloads": 5,
            "episodeStats": [
                { "id": 1, "title": "Ep1", "publishedAt": "2024-01-01", "downloads": 5 }
            ]
        }));
    }
}
