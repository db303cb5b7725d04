use askama::Template;

use super::forms::{ArtistForm, ShowForm, VenueForm};
use super::models::{Artist, Venue};
use super::schedule::{ArtistDetail, VenueDetail};
use super::search::{Area, SearchResult};
use super::store::ShowListing;
use crate::storage::Stored;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot notice shown at the top of the page rendered by the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    /// Bootstrap alert class.
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            FlashKind::Success => "alert-success",
            FlashKind::Error => "alert-danger",
        }
    }
}

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub flash: Option<Flash>,
    pub recent_venues: Vec<Stored<Venue>>,
    pub recent_artists: Vec<Stored<Artist>>,
}

#[derive(Template)]
#[template(path = "pages/venues.html")]
pub struct VenuesTemplate {
    pub flash: Option<Flash>,
    pub areas: Vec<Area>,
}

#[derive(Template)]
#[template(path = "pages/artists.html")]
pub struct ArtistsTemplate {
    pub flash: Option<Flash>,
    pub artists: Vec<Stored<Artist>>,
}

#[derive(Template)]
#[template(path = "pages/search.html")]
pub struct SearchTemplate {
    pub flash: Option<Flash>,
    /// `venues` or `artists`; also the detail-link prefix
    pub kind: &'static str,
    pub search_term: String,
    pub results: SearchResult,
}

#[derive(Template)]
#[template(path = "pages/show_venue.html")]
pub struct VenueTemplate {
    pub flash: Option<Flash>,
    pub venue: VenueDetail,
}

#[derive(Template)]
#[template(path = "pages/show_artist.html")]
pub struct ArtistTemplate {
    pub flash: Option<Flash>,
    pub artist: ArtistDetail,
}

#[derive(Template)]
#[template(path = "pages/shows.html")]
pub struct ShowsTemplate {
    pub flash: Option<Flash>,
    pub shows: Vec<ShowListing>,
}

/// New and edit venue forms; `action` is where the form posts.
#[derive(Template)]
#[template(path = "forms/venue.html")]
pub struct VenueFormTemplate {
    pub flash: Option<Flash>,
    pub heading: String,
    pub action: String,
    pub form: VenueForm,
}

#[derive(Template)]
#[template(path = "forms/artist.html")]
pub struct ArtistFormTemplate {
    pub flash: Option<Flash>,
    pub heading: String,
    pub action: String,
    pub form: ArtistForm,
}

#[derive(Template)]
#[template(path = "forms/new_show.html")]
pub struct ShowFormTemplate {
    pub flash: Option<Flash>,
    pub form: ShowForm,
}

#[derive(Template)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "errors/500.html")]
pub struct ServerErrorTemplate {
    pub flash: Option<Flash>,
}
