//! YouTube caption track provider.
//!
//! Reads the innertube API key from the watch page, asks the player endpoint
//! for the caption track list and downloads the timed-text XML of a track.

use super::{TrackList, TranscriptLine, TranscriptProvider, TranscriptTrack};
use crate::config::YoutubeSettings;
use crate::error::{Result, VidnoteError};
use crate::video::watch_url;
use async_trait::async_trait;
use html_escape::decode_html_entities;
use regex::Regex;
use reqwest::header::{ACCEPT_LANGUAGE, COOKIE};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const CONSENT_FORM: &str = "action=\"https://consent.youtube.com/s\"";

/// Innertube client identity used for player requests.
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

static API_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("API key pattern is valid")
});

static CONSENT_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"name="v" value="([^"]*)""#).expect("consent pattern is valid")
});

static TEXT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").expect("text element pattern is valid")
});

static START_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bstart="([^"]*)""#).expect("start pattern is valid"));

static DUR_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdur="([^"]*)""#).expect("dur pattern is valid"));

static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

/// Transcript provider backed by YouTube's public caption endpoints.
pub struct YoutubeTranscriptProvider {
    client: reqwest::Client,
    accept_language: String,
}

impl YoutubeTranscriptProvider {
    pub fn new(settings: &YoutubeSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .map_err(|e| VidnoteError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            accept_language: settings.accept_language.clone(),
        })
    }

    /// Fetch the watch page, accepting the cookie consent form if shown.
    async fn fetch_watch_html(&self, video_id: &str) -> Result<String> {
        let url = watch_url(video_id);
        let html = self.get_watch_page(&url, None).await?;

        if !html.contains(CONSENT_FORM) {
            return Ok(html);
        }

        debug!("Cookie consent page returned for {}, retrying with consent", video_id);
        let value = CONSENT_VALUE
            .captures(&html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| {
                VidnoteError::TranscriptList("failed to accept the YouTube cookie consent".to_string())
            })?;

        let html = self
            .get_watch_page(&url, Some(format!("CONSENT=YES+{}", value)))
            .await?;
        if html.contains(CONSENT_FORM) {
            return Err(VidnoteError::TranscriptList(
                "failed to accept the YouTube cookie consent".to_string(),
            ));
        }
        Ok(html)
    }

    async fn get_watch_page(&self, url: &str, cookie: Option<String>) -> Result<String> {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, &self.accept_language);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        check_status(response.status(), VidnoteError::TranscriptList)?;
        Ok(response.text().await?)
    }

    async fn fetch_player(&self, video_id: &str, api_key: &str) -> Result<PlayerResponse> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(PLAYER_URL)
            .query(&[("key", api_key)])
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .json(&body)
            .send()
            .await?;
        check_status(response.status(), VidnoteError::TranscriptList)?;

        Ok(response.json::<PlayerResponse>().await?)
    }
}

#[async_trait]
impl TranscriptProvider for YoutubeTranscriptProvider {
    #[instrument(skip(self))]
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList> {
        let html = self.fetch_watch_html(video_id).await?;
        let api_key = extract_api_key(&html)?;
        let player = self.fetch_player(video_id, &api_key).await?;
        let tracks = tracks_from_player(video_id, player)?;
        debug!("Found {} caption tracks for {}", tracks.len(), video_id);
        Ok(TrackList::new(video_id, tracks))
    }

    #[instrument(skip(self, track), fields(language = %track.language_code))]
    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptLine>> {
        if track.source_url.contains("&exp=xpe") {
            return Err(VidnoteError::TranscriptFetch(
                "YouTube requires a proof-of-origin token for this track".to_string(),
            ));
        }

        let response = self
            .client
            .get(&track.source_url)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?;
        check_status(response.status(), VidnoteError::TranscriptFetch)?;

        let xml = response.text().await?;
        let lines = parse_timed_text(&xml);
        if lines.is_empty() {
            warn!("Timed text for '{}' contained no lines", track.language_code);
        }
        Ok(lines)
    }
}

/// Turn a non-success status into an error built by `wrap`.
fn check_status(status: StatusCode, wrap: fn(String) -> VidnoteError) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(wrap(
            "YouTube is rate limiting requests from this IP (HTTP 429)".to_string(),
        ));
    }
    if !status.is_success() {
        return Err(wrap(format!("YouTube responded with HTTP {}", status)));
    }
    Ok(())
}

fn extract_api_key(html: &str) -> Result<String> {
    if let Some(key) = API_KEY.captures(html).and_then(|c| c.get(1)) {
        return Ok(key.as_str().to_string());
    }
    if html.contains("class=\"g-recaptcha\"") {
        return Err(VidnoteError::TranscriptList(
            "YouTube is asking for a captcha; too many requests from this IP".to_string(),
        ));
    }
    Err(VidnoteError::TranscriptList(
        "could not find the innertube API key on the watch page".to_string(),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    #[serde(default)]
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    name: Option<TrackName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn text(&self) -> Option<String> {
        self.simple_text.clone().or_else(|| {
            self.runs
                .as_ref()
                .map(|runs| runs.iter().map(|r| r.text.as_str()).collect::<String>())
        })
    }
}

fn tracks_from_player(video_id: &str, player: PlayerResponse) -> Result<Vec<TranscriptTrack>> {
    if let Some(status) = &player.playability_status {
        let state = status.status.as_deref().unwrap_or("OK");
        if state != "OK" {
            let reason = status.reason.clone().unwrap_or_else(|| state.to_string());
            return Err(VidnoteError::TranscriptList(format!(
                "video {} is unplayable: {}",
                video_id, reason
            )));
        }
    }

    let caption_tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .ok_or_else(|| VidnoteError::TranscriptsDisabled(video_id.to_string()))?;

    Ok(caption_tracks
        .into_iter()
        .map(|t| TranscriptTrack {
            language: t
                .name
                .as_ref()
                .and_then(TrackName::text)
                .unwrap_or_else(|| t.language_code.clone()),
            is_generated: t.kind.as_deref() == Some("asr"),
            source_url: t.base_url.replace("&fmt=srv3", ""),
            language_code: t.language_code,
        })
        .collect())
}

/// Decode the `<text>` elements of a timed-text document.
///
/// Element bodies are XML-escaped and frequently escaped a second time, so
/// entities are decoded twice before inline formatting tags are removed.
fn parse_timed_text(xml: &str) -> Vec<TranscriptLine> {
    TEXT_ELEMENT
        .captures_iter(xml)
        .filter_map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let raw = caps.get(2).map_or("", |m| m.as_str());
            if raw.is_empty() {
                return None;
            }

            let decoded = decode_entities(&decode_entities(raw));
            let text = INLINE_TAG.replace_all(&decoded, "").to_string();
            if text.trim().is_empty() {
                return None;
            }

            Some(TranscriptLine {
                text,
                start: attr_seconds(&START_ATTR, attrs),
                duration: attr_seconds(&DUR_ATTR, attrs),
            })
        })
        .collect()
}

fn attr_seconds(pattern: &Regex, attrs: &str) -> f64 {
    pattern
        .captures(attrs)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

fn decode_entities(text: &str) -> String {
    decode_html_entities(text).into_owned()
}
