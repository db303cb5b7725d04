//! Past/upcoming classification and the detail-page show partitions.
//!
//! Start times are stored as `YYYY-MM-DD HH:MM:SS` text, so comparing the
//! strings orders them chronologically. The same rule applies everywhere:
//! a show starting at or after `now` is upcoming, anything earlier is past.

use super::models::{Artist, Venue};
use crate::storage::codec::format_timestamp;
use crate::storage::Stored;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    Past,
    Upcoming,
}

pub fn classify(start_time: &str, now: &NaiveDateTime) -> Timing {
    if start_time >= format_timestamp(now).as_str() {
        Timing::Upcoming
    } else {
        Timing::Past
    }
}

/// Exact match of `requested` against one of the artist's listed dates.
/// Surrounding whitespace is ignored on both sides.
pub fn is_available(available_dates: &[String], requested: &str) -> bool {
    let requested = requested.trim();
    !requested.is_empty() && available_dates.iter().any(|d| d.trim() == requested)
}

/// One show as seen from a venue or artist page: the other party plus the
/// start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowSlot {
    pub id: i64,
    pub name: String,
    pub image_link: Option<String>,
    pub start_time: String,
}

/// Split `slots` into (past, upcoming), keeping their order.
pub fn partition(slots: Vec<ShowSlot>, now: &NaiveDateTime) -> (Vec<ShowSlot>, Vec<ShowSlot>) {
    slots
        .into_iter()
        .partition(|slot| classify(&slot.start_time, now) == Timing::Past)
}

#[derive(Debug, Clone, Serialize)]
pub struct VenueDetail {
    pub id: i64,
    pub venue: Venue,
    pub past_shows: Vec<ShowSlot>,
    pub upcoming_shows: Vec<ShowSlot>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl VenueDetail {
    pub fn build(venue: Stored<Venue>, artist_slots: Vec<ShowSlot>, now: &NaiveDateTime) -> Self {
        let (past_shows, upcoming_shows) = partition(artist_slots, now);
        Self {
            id: venue.id,
            venue: venue.record,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistDetail {
    pub id: i64,
    pub artist: Artist,
    pub past_shows: Vec<ShowSlot>,
    pub upcoming_shows: Vec<ShowSlot>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

impl ArtistDetail {
    pub fn build(artist: Stored<Artist>, venue_slots: Vec<ShowSlot>, now: &NaiveDateTime) -> Self {
        let (past_shows, upcoming_shows) = partition(venue_slots, now);
        Self {
            id: artist.id,
            artist: artist.record,
            past_shows_count: past_shows.len(),
            upcoming_shows_count: upcoming_shows.len(),
            past_shows,
            upcoming_shows,
        }
    }
}
