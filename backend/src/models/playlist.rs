//! Playlist records as delivered by the scraping layer.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EstimationError, Result};

/// Date format used by the station playlist (`15.10.2025`).
pub const PLAYLIST_DATE_FORMAT: &str = "%d.%m.%Y";
/// Time-of-day format used by the station playlist (`17:20`).
pub const PLAYLIST_TIME_FORMAT: &str = "%H:%M";

/// One played track.
///
/// Only the fields needed to derive an estimation input are typed; anything
/// else the scraper attached (metadata enrichment, cover art, ...) is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station: Option<String>,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub title: String,
    /// Civil date, `dd.mm.yyyy`.
    pub date: String,
    /// Civil time of day, `HH:MM`.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listeners: Option<u32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PlaylistEntry {
    pub fn new(
        artist: impl Into<String>,
        title: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self {
            station: None,
            artist: artist.into(),
            title: title.into(),
            date: date.into(),
            time: time.into(),
            listeners: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Stable jitter seed for this record: `artist|title|date|time`.
    pub fn identity_key(&self) -> String {
        format!("{}|{}|{}|{}", self.artist, self.title, self.date, self.time)
    }

    /// Whether the record still needs a listener estimate.
    pub fn needs_listeners(&self) -> bool {
        matches!(self.listeners, None | Some(0))
    }

    /// Civil date/time of the play, in the station's reference zone.
    pub fn civil_time(&self) -> Result<NaiveDateTime> {
        let date = NaiveDate::parse_from_str(self.date.trim(), PLAYLIST_DATE_FORMAT)
            .map_err(|e| self.invalid(format!("date '{}': {}", self.date, e)))?;
        let time = NaiveTime::parse_from_str(self.time.trim(), PLAYLIST_TIME_FORMAT)
            .map_err(|e| self.invalid(format!("time '{}': {}", self.time, e)))?;
        Ok(date.and_time(time))
    }

    fn invalid(&self, message: String) -> EstimationError {
        EstimationError::InvalidRecord {
            key: self.identity_key(),
            message,
        }
    }
}
