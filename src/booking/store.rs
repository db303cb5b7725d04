use super::forms::ShowRequest;
use super::models::{Artist, Show, Venue};
use super::schedule::{is_available, ShowSlot};
use super::search::SearchTerm;
use crate::error::Result;
use crate::storage::codec::{contains_ignore_case, format_timestamp, split_list};
use crate::storage::{Database, Record, Repository, SqliteRepository, Stored};
use chrono::NaiveDateTime;
use rusqlite::{params, OptionalExtension};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

const SCHEMA: &str = include_str!("../../migrations/001_booking.sql");

/// Which side of a show to group counts by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOwner {
    Venue,
    Artist,
}

impl ShowOwner {
    fn column(self) -> &'static str {
        match self {
            ShowOwner::Venue => "venue_id",
            ShowOwner::Artist => "artist_id",
        }
    }
}

/// A row of the `/shows` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    Created(Stored<Show>),
    /// The requested time is not one of the artist's available dates.
    Unavailable,
    UnknownArtist,
    UnknownVenue,
}

fn venue_name(venue: &Venue) -> &str {
    &venue.name
}

fn artist_name(artist: &Artist) -> &str {
    &artist.name
}

/// Venues, artists and shows behind the booking site.
#[derive(Clone)]
pub struct BookingStore {
    db: Database,
    pub venues: SqliteRepository<Venue>,
    pub artists: SqliteRepository<Artist>,
    pub shows: SqliteRepository<Show>,
}

impl BookingStore {
    pub async fn open(db: Database) -> Result<Self> {
        db.migrate(SCHEMA).await?;
        info!("Booking schema ready");
        Ok(Self {
            venues: SqliteRepository::new(db.clone()),
            artists: SqliteRepository::new(db.clone()),
            shows: SqliteRepository::new(db.clone()),
            db,
        })
    }

    /// Upcoming show counts keyed by venue or artist id, from one grouped
    /// query. Ids without upcoming shows are absent.
    pub async fn upcoming_counts(
        &self,
        owner: ShowOwner,
        now: &NaiveDateTime,
    ) -> Result<HashMap<i64, i64>> {
        let column = owner.column();
        let sql = format!(
            "SELECT {column}, COUNT(*) FROM shows WHERE start_time >= ?1 GROUP BY {column}"
        );
        let now = format_timestamp(now);
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let counts = stmt
                    .query_map([now], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?
                    .collect::<rusqlite::Result<HashMap<_, _>>>()?;
                Ok(counts)
            })
            .await
    }

    async fn search<T: Record>(
        &self,
        term: &SearchTerm,
        name_of: fn(&T) -> &str,
    ) -> Result<Vec<Stored<T>>> {
        debug!("Searching {} with {:?}", T::TABLE, term);
        match term {
            SearchTerm::CityState { city, state } => {
                let sql = format!(
                    "{} WHERE city = ?1 AND state = ?2 ORDER BY id",
                    SqliteRepository::<T>::select_sql()
                );
                let args = [city.clone(), state.clone()];
                self.db
                    .call(move |conn| {
                        let mut stmt = conn.prepare(&sql)?;
                        let rows = stmt
                            .query_map(args, Stored::<T>::from_row)?
                            .collect::<rusqlite::Result<Vec<_>>>()?;
                        Ok(rows)
                    })
                    .await
            }
            // Filtered here rather than with LIKE, which only folds ASCII case
            SearchTerm::Name(name) => {
                let rows = SqliteRepository::<T>::new(self.db.clone()).list().await?;
                Ok(rows
                    .into_iter()
                    .filter(|row| contains_ignore_case(name_of(&row.record), name))
                    .collect())
            }
        }
    }

    pub async fn search_venues(&self, term: &SearchTerm) -> Result<Vec<Stored<Venue>>> {
        self.search(term, venue_name).await
    }

    pub async fn search_artists(&self, term: &SearchTerm) -> Result<Vec<Stored<Artist>>> {
        self.search(term, artist_name).await
    }

    async fn recent<T: Record>(&self, limit: i64) -> Result<Vec<Stored<T>>> {
        let sql = format!(
            "{} ORDER BY id DESC LIMIT ?1",
            SqliteRepository::<T>::select_sql()
        );
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map([limit], Stored::<T>::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    /// Most recently listed venues, newest first.
    pub async fn recent_venues(&self, limit: i64) -> Result<Vec<Stored<Venue>>> {
        self.recent(limit).await
    }

    pub async fn recent_artists(&self, limit: i64) -> Result<Vec<Stored<Artist>>> {
        self.recent(limit).await
    }

    async fn slots(&self, sql: &'static str, id: i64) -> Result<Vec<ShowSlot>> {
        self.db
            .call(move |conn| {
                let mut stmt = conn.prepare(sql)?;
                let rows = stmt
                    .query_map([id], |row| {
                        Ok(ShowSlot {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            image_link: row.get(2)?,
                            start_time: row.get(3)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    /// Shows at a venue, each with the performing artist.
    pub async fn venue_shows(&self, venue_id: i64) -> Result<Vec<ShowSlot>> {
        self.slots(
            "SELECT a.id, a.name, a.image_link, s.start_time
             FROM shows s JOIN artists a ON a.id = s.artist_id
             WHERE s.venue_id = ?1
             ORDER BY s.start_time, s.id",
            venue_id,
        )
        .await
    }

    /// Shows an artist plays, each with the venue.
    pub async fn artist_shows(&self, artist_id: i64) -> Result<Vec<ShowSlot>> {
        self.slots(
            "SELECT v.id, v.name, v.image_link, s.start_time
             FROM shows s JOIN venues v ON v.id = s.venue_id
             WHERE s.artist_id = ?1
             ORDER BY s.start_time, s.id",
            artist_id,
        )
        .await
    }

    pub async fn all_shows(&self) -> Result<Vec<ShowListing>> {
        self.db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT v.id, v.name, a.id, a.name, a.image_link, s.start_time
                     FROM shows s
                     JOIN venues v ON v.id = s.venue_id
                     JOIN artists a ON a.id = s.artist_id
                     ORDER BY s.start_time, s.id",
                )?;
                let rows = stmt
                    .query_map([], |row| {
                        Ok(ShowListing {
                            venue_id: row.get(0)?,
                            venue_name: row.get(1)?,
                            artist_id: row.get(2)?,
                            artist_name: row.get(3)?,
                            artist_image_link: row.get(4)?,
                            start_time: row.get(5)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await
    }

    /// Insert the show only if the artist lists the requested time as
    /// available. The lookup and the insert share one transaction.
    pub async fn create_show_if_available(&self, request: ShowRequest) -> Result<ShowOutcome> {
        let outcome = self
            .db
            .transaction(move |tx| {
                let dates: Option<String> = tx
                    .query_row(
                        "SELECT available_dates FROM artists WHERE id = ?1",
                        [request.artist_id],
                        |row| row.get(0),
                    )
                    .optional()?;
                let Some(dates) = dates else {
                    return Ok(ShowOutcome::UnknownArtist);
                };
                let venue_exists = tx
                    .query_row(
                        "SELECT 1 FROM venues WHERE id = ?1",
                        [request.venue_id],
                        |_| Ok(()),
                    )
                    .optional()?
                    .is_some();
                if !venue_exists {
                    return Ok(ShowOutcome::UnknownVenue);
                }
                if !is_available(&split_list(&dates), &request.requested) {
                    return Ok(ShowOutcome::Unavailable);
                }

                tx.execute(
                    "INSERT INTO shows (artist_id, venue_id, start_time) VALUES (?1, ?2, ?3)",
                    params![request.artist_id, request.venue_id, request.start_time],
                )?;
                Ok(ShowOutcome::Created(Stored {
                    id: tx.last_insert_rowid(),
                    record: Show {
                        artist_id: request.artist_id,
                        venue_id: request.venue_id,
                        start_time: request.start_time,
                    },
                }))
            })
            .await?;
        debug!("Show request resolved to {:?}", outcome);
        Ok(outcome)
    }

    pub async fn clear(&self) -> Result<()> {
        self.db.clear(&["shows", "venues", "artists"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap()
    }

    async fn store() -> (BookingStore, i64, i64) {
        let store = BookingStore::open(Database::open_in_memory().unwrap())
            .await
            .unwrap();
        let venue = store
            .venues
            .insert(Venue {
                name: "The Musical Hop".into(),
                city: "San Francisco".into(),
                state: "CA".into(),
                address: "1015 Folsom Street".into(),
                ..Venue::default()
            })
            .await
            .unwrap();
        let artist = store
            .artists
            .insert(Artist {
                name: "Guns N Petals".into(),
                city: "San Francisco".into(),
                state: "CA".into(),
                available_dates: vec!["2035-04-01 20:00:00".into()],
                ..Artist::default()
            })
            .await
            .unwrap();
        (store, venue.id, artist.id)
    }

    fn request(artist_id: i64, venue_id: i64, time: &str) -> ShowRequest {
        ShowRequest {
            artist_id,
            venue_id,
            requested: time.to_string(),
            start_time: time.to_string(),
        }
    }

    #[tokio::test]
    async fn unavailable_time_writes_nothing() {
        let (store, venue, artist) = store().await;
        let outcome = store
            .create_show_if_available(request(artist, venue, "2035-04-02 20:00:00"))
            .await
            .unwrap();
        assert_eq!(outcome, ShowOutcome::Unavailable);
        assert_eq!(store.shows.count().await.unwrap(), 0);

        let outcome = store
            .create_show_if_available(request(artist, venue, "2035-04-01 20:00:00"))
            .await
            .unwrap();
        assert!(matches!(outcome, ShowOutcome::Created(_)));
        assert_eq!(store.shows.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_parties_are_reported() {
        let (store, venue, artist) = store().await;
        assert_eq!(
            store
                .create_show_if_available(request(999, venue, "2035-04-01 20:00:00"))
                .await
                .unwrap(),
            ShowOutcome::UnknownArtist
        );
        assert_eq!(
            store
                .create_show_if_available(request(artist, 999, "2035-04-01 20:00:00"))
                .await
                .unwrap(),
            ShowOutcome::UnknownVenue
        );
    }

    #[tokio::test]
    async fn counts_use_the_upcoming_boundary_and_cascade() {
        let (store, venue, artist) = store().await;
        for start in ["2019-05-21 21:30:00", "2035-04-01 20:00:00"] {
            store
                .shows
                .insert(Show {
                    artist_id: artist,
                    venue_id: venue,
                    start_time: start.into(),
                })
                .await
                .unwrap();
        }

        let counts = store
            .upcoming_counts(ShowOwner::Venue, &at(2026, 1, 1))
            .await
            .unwrap();
        assert_eq!(counts.get(&venue), Some(&1));
        let counts = store
            .upcoming_counts(ShowOwner::Artist, &at(2035, 4, 1))
            .await
            .unwrap();
        assert_eq!(counts.get(&artist), Some(&1));

        assert_eq!(store.venue_shows(venue).await.unwrap().len(), 2);
        assert_eq!(store.all_shows().await.unwrap()[0].artist_name, "Guns N Petals");

        store.venues.delete(venue).await.unwrap();
        assert_eq!(store.shows.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_by_name_or_area() {
        let (store, venue, _) = store().await;
        let hits = store
            .search_venues(&SearchTerm::parse("hop"))
            .await
            .unwrap();
        assert_eq!(hits[0].id, venue);
        let hits = store
            .search_venues(&SearchTerm::parse("San Francisco, CA"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert!(store
            .search_artists(&SearchTerm::parse("Seattle, WA"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn name_search_folds_non_ascii_case() {
        let (store, _, _) = store().await;
        let cafe = store
            .venues
            .insert(Venue {
                name: "Café Éclair".into(),
                city: "Seattle".into(),
                state: "WA".into(),
                address: "1 Pike St".into(),
                ..Venue::default()
            })
            .await
            .unwrap();
        store
            .artists
            .insert(Artist {
                name: "Ólafur Árnason".into(),
                city: "Seattle".into(),
                state: "WA".into(),
                ..Artist::default()
            })
            .await
            .unwrap();

        for term in ["café", "CAFÉ", "éclair", "ÉCLAIR"] {
            let hits = store.search_venues(&SearchTerm::parse(term)).await.unwrap();
            let ids: Vec<i64> = hits.iter().map(|v| v.id).collect();
            assert_eq!(ids, vec![cafe.id], "{term}");
        }
        let hits = store
            .search_artists(&SearchTerm::parse("ólafur"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }
}
