use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form,
};
use chrono::{Local, NaiveDateTime};
use tracing::{error, info, warn};

use super::forms::{ArtistForm, ShowForm, VenueForm};
use super::schedule::{ArtistDetail, VenueDetail};
use super::search::{group_by_area, SearchResult, SearchTerm};
use super::store::{BookingStore, ShowOutcome, ShowOwner};
use super::templates::*;
use crate::constants::RECENT_LISTINGS;
use crate::error::StoreError;
use crate::observability::metrics;
use crate::storage::Repository;

/// Failures that end a page request with an error page instead of the
/// page asked for.
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Internal(String),
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        PageError::Internal(err.to_string())
    }
}

impl From<askama::Error> for PageError {
    fn from(err: askama::Error) -> Self {
        PageError::Internal(format!("template rendering failed: {err}"))
    }
}

fn render_error_page<T: Template>(status: StatusCode, template: T) -> Response {
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            error!("Error page failed to render: {e}");
            status.into_response()
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => {
                render_error_page(StatusCode::NOT_FOUND, NotFoundTemplate { flash: None })
            }
            PageError::Internal(detail) => {
                error!("Page request failed: {detail}");
                render_error_page(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ServerErrorTemplate { flash: None },
                )
            }
        }
    }
}

type PageResult = Result<Html<String>, PageError>;

fn page<T: Template>(template: T) -> PageResult {
    Ok(Html(template.render()?))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn parse_id(raw: &str) -> Result<i64, PageError> {
    raw.parse().map_err(|_| PageError::NotFound)
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search_term: String,
}

pub async fn not_found() -> PageError {
    PageError::NotFound
}

async fn home_page(store: &BookingStore, flash: Option<Flash>) -> PageResult {
    page(HomeTemplate {
        flash,
        recent_venues: store.recent_venues(RECENT_LISTINGS).await?,
        recent_artists: store.recent_artists(RECENT_LISTINGS).await?,
    })
}

pub async fn index(State(store): State<BookingStore>) -> PageResult {
    home_page(&store, None).await
}

//  Venues
//  ----------------------------------------------------------------

pub async fn venues(State(store): State<BookingStore>) -> PageResult {
    let upcoming = store.upcoming_counts(ShowOwner::Venue, &now()).await?;
    let venues = store.venues.list().await?;
    page(VenuesTemplate {
        flash: None,
        areas: group_by_area(venues, &upcoming),
    })
}

pub async fn search_venues(
    State(store): State<BookingStore>,
    Form(form): Form<SearchForm>,
) -> PageResult {
    let term = SearchTerm::parse(&form.search_term);
    let hits = store.search_venues(&term).await?;
    let upcoming = store.upcoming_counts(ShowOwner::Venue, &now()).await?;
    let results = SearchResult::new(
        hits.into_iter().map(|v| (v.id, v.record.name)).collect(),
        &upcoming,
    );
    page(SearchTemplate {
        flash: None,
        kind: "venues",
        search_term: form.search_term,
        results,
    })
}

async fn venue_page(store: &BookingStore, id: i64, flash: Option<Flash>) -> PageResult {
    let venue = store.venues.get(id).await?.ok_or(PageError::NotFound)?;
    let slots = store.venue_shows(id).await?;
    page(VenueTemplate {
        flash,
        venue: VenueDetail::build(venue, slots, &now()),
    })
}

pub async fn show_venue(
    State(store): State<BookingStore>,
    Path(raw_id): Path<String>,
) -> PageResult {
    venue_page(&store, parse_id(&raw_id)?, None).await
}

pub async fn create_venue_form() -> PageResult {
    page(VenueFormTemplate {
        flash: None,
        heading: "List a new venue".to_string(),
        action: "/venues/create".to_string(),
        form: VenueForm::default(),
    })
}

pub async fn create_venue_submission(
    State(store): State<BookingStore>,
    Form(form): Form<VenueForm>,
) -> PageResult {
    let flash = match form.validate() {
        Ok(venue) => {
            let name = venue.name.clone();
            match store.venues.insert(venue).await {
                Ok(stored) => {
                    metrics::record_created("venue");
                    info!("Listed venue {} ({})", stored.id, name);
                    Flash::success(format!("Venue {name} was successfully listed!"))
                }
                Err(e) => {
                    error!("Venue insert failed: {e}");
                    Flash::error(format!("An error occurred. Venue {name} could not be listed."))
                }
            }
        }
        Err(e) => {
            warn!("Venue form rejected: {e}");
            metrics::request_rejected("booking", 400);
            Flash::error(listing_error("Venue", &form.name, &e.to_string()))
        }
    };
    home_page(&store, Some(flash)).await
}

fn listing_error(entity: &str, name: &str, reason: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        format!("An error occurred. {entity} could not be listed: {reason}.")
    } else {
        format!("An error occurred. {entity} {name} could not be listed: {reason}.")
    }
}

/// Flash for an edit submission. A row deleted between the load and the
/// update is a 404.
fn edit_outcome(
    entity: &'static str,
    label: &str,
    name: &str,
    id: i64,
    result: crate::error::Result<bool>,
) -> Result<Flash, PageError> {
    match result {
        Ok(true) => {
            metrics::record_updated(entity);
            info!("Edited {entity} {id}");
            Ok(Flash::success(format!("{label} {name} was successfully edited!")))
        }
        Ok(false) => {
            warn!("{label} {id} vanished before the edit was saved");
            Err(PageError::NotFound)
        }
        Err(e) => {
            error!("{label} update failed: {e}");
            Ok(Flash::error(format!("An error occurred. {label} could not be edited.")))
        }
    }
}

pub async fn edit_venue(
    State(store): State<BookingStore>,
    Path(raw_id): Path<String>,
) -> PageResult {
    let id = parse_id(&raw_id)?;
    let venue = store.venues.get(id).await?.ok_or(PageError::NotFound)?;
    page(VenueFormTemplate {
        flash: None,
        heading: format!("Edit venue {}", venue.name),
        action: format!("/venues/{id}/edit"),
        form: VenueForm::from(&venue.record),
    })
}

pub async fn edit_venue_submission(
    State(store): State<BookingStore>,
    Path(raw_id): Path<String>,
    Form(form): Form<VenueForm>,
) -> PageResult {
    let id = parse_id(&raw_id)?;
    let mut venue = store.venues.get(id).await?.ok_or(PageError::NotFound)?;
    let flash = match form.validate() {
        Ok(updated) => {
            venue.record = updated;
            let result = store.venues.update(&venue).await;
            edit_outcome("venue", "Venue", &venue.name, id, result)?
        }
        Err(e) => {
            warn!("Venue edit rejected: {e}");
            metrics::request_rejected("booking", 400);
            Flash::error(format!("An error occurred. Venue could not be edited: {e}."))
        }
    };
    venue_page(&store, id, Some(flash)).await
}

pub async fn delete_venue(
    State(store): State<BookingStore>,
    Path(raw_id): Path<String>,
) -> PageResult {
    let id = parse_id(&raw_id)?;
    let venue = store.venues.get(id).await?.ok_or(PageError::NotFound)?;
    if !store.venues.delete(id).await? {
        return Err(PageError::NotFound);
    }
    metrics::record_deleted("venue");
    info!("Deleted venue {id} and its shows");
    let flash = Flash::success(format!("Venue {} was successfully deleted!", venue.name));
    home_page(&store, Some(flash)).await
}

//  Artists
//  ----------------------------------------------------------------

pub async fn artists(State(store): State<BookingStore>) -> PageResult {
    page(ArtistsTemplate {
        flash: None,
        artists: store.artists.list().await?,
    })
}

pub async fn search_artists(
    State(store): State<BookingStore>,
    Form(form): Form<SearchForm>,
) -> PageResult {
    let term = SearchTerm::parse(&form.search_term);
    let hits = store.search_artists(&term).await?;
    let upcoming = store.upcoming_counts(ShowOwner::Artist, &now()).await?;
    let results = SearchResult::new(
        hits.into_iter().map(|a| (a.id, a.record.name)).collect(),
        &upcoming,
    );
    page(SearchTemplate {
        flash: None,
        kind: "artists",
        search_term: form.search_term,
        results,
    })
}

async fn artist_page(store: &BookingStore, id: i64, flash: Option<Flash>) -> PageResult {
    let artist = store.artists.get(id).await?.ok_or(PageError::NotFound)?;
    let slots = store.artist_shows(id).await?;
    page(ArtistTemplate {
        flash,
        artist: ArtistDetail::build(artist, slots, &now()),
    })
}

pub async fn show_artist(
    State(store): State<BookingStore>,
    Path(raw_id): Path<String>,
) -> PageResult {
    artist_page(&store, parse_id(&raw_id)?, None).await
}

pub async fn create_artist_form() -> PageResult {
    page(ArtistFormTemplate {
        flash: None,
        heading: "List a new artist".to_string(),
        action: "/artists/create".to_string(),
        form: ArtistForm::default(),
    })
}

pub async fn create_artist_submission(
    State(store): State<BookingStore>,
    Form(form): Form<ArtistForm>,
) -> PageResult {
    let flash = match form.validate() {
        Ok(artist) => {
            let name = artist.name.clone();
            match store.artists.insert(artist).await {
                Ok(stored) => {
                    metrics::record_created("artist");
                    info!("Listed artist {} ({})", stored.id, name);
                    Flash::success(format!("Artist {name} was successfully listed!"))
                }
                Err(e) => {
                    error!("Artist insert failed: {e}");
                    Flash::error(format!("An error occurred. Artist {name} could not be listed."))
                }
            }
        }
        Err(e) => {
            warn!("Artist form rejected: {e}");
            metrics::request_rejected("booking", 400);
            Flash::error(listing_error("Artist", &form.name, &e.to_string()))
        }
    };
    home_page(&store, Some(flash)).await
}

pub async fn edit_artist(
    State(store): State<BookingStore>,
    Path(raw_id): Path<String>,
) -> PageResult {
    let id = parse_id(&raw_id)?;
    let artist = store.artists.get(id).await?.ok_or(PageError::NotFound)?;
    page(ArtistFormTemplate {
        flash: None,
        heading: format!("Edit artist {}", artist.name),
        action: format!("/artists/{id}/edit"),
        form: ArtistForm::from(&artist.record),
    })
}

pub async fn edit_artist_submission(
    State(store): State<BookingStore>,
    Path(raw_id): Path<String>,
    Form(form): Form<ArtistForm>,
) -> PageResult {
    let id = parse_id(&raw_id)?;
    let mut artist = store.artists.get(id).await?.ok_or(PageError::NotFound)?;
    let flash = match form.validate() {
        Ok(updated) => {
            artist.record = updated;
            let result = store.artists.update(&artist).await;
            edit_outcome("artist", "Artist", &artist.name, id, result)?
        }
        Err(e) => {
            warn!("Artist edit rejected: {e}");
            metrics::request_rejected("booking", 400);
            Flash::error(format!("An error occurred. Artist could not be edited: {e}."))
        }
    };
    artist_page(&store, id, Some(flash)).await
}

pub async fn delete_artist(
    State(store): State<BookingStore>,
    Path(raw_id): Path<String>,
) -> PageResult {
    let id = parse_id(&raw_id)?;
    let artist = store.artists.get(id).await?.ok_or(PageError::NotFound)?;
    if !store.artists.delete(id).await? {
        return Err(PageError::NotFound);
    }
    metrics::record_deleted("artist");
    info!("Deleted artist {id} and its shows");
    let flash = Flash::success(format!("Artist {} was successfully deleted!", artist.name));
    home_page(&store, Some(flash)).await
}

//  Shows
//  ----------------------------------------------------------------

pub async fn shows(State(store): State<BookingStore>) -> PageResult {
    page(ShowsTemplate {
        flash: None,
        shows: store.all_shows().await?,
    })
}

pub async fn create_show_form() -> PageResult {
    page(ShowFormTemplate {
        flash: None,
        form: ShowForm::default(),
    })
}

pub async fn create_show_submission(
    State(store): State<BookingStore>,
    Form(form): Form<ShowForm>,
) -> PageResult {
    let request = match form.validate() {
        Ok(request) => request,
        Err(e) => {
            warn!("Show form rejected: {e}");
            metrics::request_rejected("booking", 400);
            let flash = Flash::error(format!("An error occurred. Show could not be listed: {e}."));
            return home_page(&store, Some(flash)).await;
        }
    };

    let flash = match store.create_show_if_available(request).await {
        Ok(ShowOutcome::Created(show)) => {
            metrics::record_created("show");
            info!(
                "Listed show {} (artist {} at venue {}, {})",
                show.id, show.artist_id, show.venue_id, show.start_time
            );
            Flash::success("Show was successfully listed!")
        }
        Ok(ShowOutcome::Unavailable) => {
            metrics::booking::show_rejected_unavailable();
            Flash::error("Date not available, please choose another one.")
        }
        Ok(ShowOutcome::UnknownArtist) => {
            Flash::error("An error occurred. Show could not be listed: no such artist.")
        }
        Ok(ShowOutcome::UnknownVenue) => {
            Flash::error("An error occurred. Show could not be listed: no such venue.")
        }
        Err(e) => {
            error!("Show insert failed: {e}");
            Flash::error("An error occurred. Show could not be listed.")
        }
    };
    home_page(&store, Some(flash)).await
}
