//! Venue, artist and show form submissions. Everything arrives as text;
//! `validate` turns a submission into a record or says which field is wrong.

use super::models::{Artist, Venue};
use crate::constants::is_us_state;
use crate::storage::codec::{format_timestamp, join_list, parse_timestamp, split_list};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("'{0}' is not a US state code")]
    InvalidState(String),

    #[error("{0} must be a whole number")]
    InvalidNumber(&'static str),

    #[error("'{0}' is not a start time (YYYY-MM-DD HH:MM[:SS])")]
    InvalidTime(String),
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(value.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn state_code(value: &str) -> Result<String, FormError> {
    let state = required(value, "state")?.to_ascii_uppercase();
    if is_us_state(&state) {
        Ok(state)
    } else {
        Err(FormError::InvalidState(state))
    }
}

fn checkbox(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "y" | "on" | "true"
    )
}

fn checkbox_value(checked: bool) -> String {
    if checked { "y" } else { "" }.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    /// Comma-separated
    pub genres: String,
    pub seeking_talent: String,
    pub seeking_description: String,
}

impl VenueForm {
    pub fn validate(&self) -> Result<Venue, FormError> {
        Ok(Venue {
            name: required(&self.name, "name")?,
            city: required(&self.city, "city")?,
            state: state_code(&self.state)?,
            address: required(&self.address, "address")?,
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website: optional(&self.website),
            genres: split_list(&self.genres),
            seeking_talent: checkbox(&self.seeking_talent),
            seeking_description: optional(&self.seeking_description),
        })
    }

    pub fn seeking(&self) -> bool {
        checkbox(&self.seeking_talent)
    }
}

impl From<&Venue> for VenueForm {
    fn from(venue: &Venue) -> Self {
        Self {
            name: venue.name.clone(),
            city: venue.city.clone(),
            state: venue.state.clone(),
            address: venue.address.clone(),
            phone: venue.phone.clone().unwrap_or_default(),
            image_link: venue.image_link.clone().unwrap_or_default(),
            facebook_link: venue.facebook_link.clone().unwrap_or_default(),
            website: venue.website.clone().unwrap_or_default(),
            genres: join_list(&venue.genres),
            seeking_talent: checkbox_value(venue.seeking_talent),
            seeking_description: venue.seeking_description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: String,
    pub image_link: String,
    pub facebook_link: String,
    pub website: String,
    pub genres: String,
    pub seeking_venue: String,
    pub seeking_description: String,
    /// Comma-separated start times the artist can be booked for
    pub available_dates: String,
}

impl ArtistForm {
    pub fn validate(&self) -> Result<Artist, FormError> {
        Ok(Artist {
            name: required(&self.name, "name")?,
            city: required(&self.city, "city")?,
            state: state_code(&self.state)?,
            phone: optional(&self.phone),
            image_link: optional(&self.image_link),
            facebook_link: optional(&self.facebook_link),
            website: optional(&self.website),
            genres: split_list(&self.genres),
            seeking_venue: checkbox(&self.seeking_venue),
            seeking_description: optional(&self.seeking_description),
            available_dates: split_list(&self.available_dates),
        })
    }

    pub fn seeking(&self) -> bool {
        checkbox(&self.seeking_venue)
    }
}

impl From<&Artist> for ArtistForm {
    fn from(artist: &Artist) -> Self {
        Self {
            name: artist.name.clone(),
            city: artist.city.clone(),
            state: artist.state.clone(),
            phone: artist.phone.clone().unwrap_or_default(),
            image_link: artist.image_link.clone().unwrap_or_default(),
            facebook_link: artist.facebook_link.clone().unwrap_or_default(),
            website: artist.website.clone().unwrap_or_default(),
            genres: join_list(&artist.genres),
            seeking_venue: checkbox_value(artist.seeking_venue),
            seeking_description: artist.seeking_description.clone().unwrap_or_default(),
            available_dates: join_list(&artist.available_dates),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

/// A show request that passed form validation but not yet the
/// availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowRequest {
    pub artist_id: i64,
    pub venue_id: i64,
    /// The start time exactly as submitted, trimmed; matched against the
    /// artist's available dates.
    pub requested: String,
    /// Normalized storage form.
    pub start_time: String,
}

impl ShowForm {
    pub fn validate(&self) -> Result<ShowRequest, FormError> {
        let id = |value: &str, field: &'static str| -> Result<i64, FormError> {
            required(value, field)?
                .parse::<i64>()
                .map_err(|_| FormError::InvalidNumber(field))
        };
        let requested = required(&self.start_time, "start_time")?;
        let start_time = parse_timestamp(&requested)
            .map(|ts| format_timestamp(&ts))
            .ok_or_else(|| FormError::InvalidTime(requested.clone()))?;
        Ok(ShowRequest {
            artist_id: id(&self.artist_id, "artist_id")?,
            venue_id: id(&self.venue_id, "venue_id")?,
            requested,
            start_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue_form() -> VenueForm {
        VenueForm {
            name: " The Musical Hop ".into(),
            city: "San Francisco".into(),
            state: "ca".into(),
            address: "1015 Folsom Street".into(),
            genres: "Jazz, Reggae, Swing,".into(),
            seeking_talent: "y".into(),
            ..VenueForm::default()
        }
    }

    #[test]
    fn venue_form_normalizes_fields() {
        let venue = venue_form().validate().unwrap();
        assert_eq!(venue.name, "The Musical Hop");
        assert_eq!(venue.state, "CA");
        assert_eq!(venue.genres, vec!["Jazz", "Reggae", "Swing"]);
        assert!(venue.seeking_talent);
        assert_eq!(venue.phone, None);

        let round_trip = VenueForm::from(&venue);
        assert_eq!(round_trip.genres, "Jazz,Reggae,Swing");
        assert!(round_trip.seeking());
    }

    #[test]
    fn venue_form_rejects_missing_and_bad_state() {
        let mut form = venue_form();
        form.address = "  ".into();
        assert_eq!(form.validate(), Err(FormError::Missing("address")));

        let mut form = venue_form();
        form.state = "ZZ".into();
        assert_eq!(form.validate(), Err(FormError::InvalidState("ZZ".into())));
    }

    #[test]
    fn artist_form_keeps_available_dates() {
        let form = ArtistForm {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            seeking_venue: "on".into(),
            available_dates: "2035-04-01 20:00:00, 2035-04-08 20:00:00".into(),
            ..ArtistForm::default()
        };
        let artist = form.validate().unwrap();
        assert!(artist.seeking_venue);
        assert_eq!(
            artist.available_dates,
            vec!["2035-04-01 20:00:00", "2035-04-08 20:00:00"]
        );
    }

    #[test]
    fn show_form_parses_ids_and_time() {
        let form = ShowForm {
            artist_id: "4".into(),
            venue_id: " 1 ".into(),
            start_time: "2035-04-01T20:00".into(),
        };
        let show = form.validate().unwrap();
        assert_eq!((show.artist_id, show.venue_id), (4, 1));
        assert_eq!(show.requested, "2035-04-01T20:00");
        assert_eq!(show.start_time, "2035-04-01 20:00:00");

        let bad = ShowForm {
            artist_id: "four".into(),
            ..form.clone()
        };
        assert_eq!(bad.validate(), Err(FormError::InvalidNumber("artist_id")));

        let bad = ShowForm {
            start_time: "soon".into(),
            ..form
        };
        assert_eq!(bad.validate(), Err(FormError::InvalidTime("soon".into())));
    }
}
