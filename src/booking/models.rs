use crate::storage::codec::{join_list, split_list};
use crate::storage::Record;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::Serialize;

fn opt_text(value: &Option<String>) -> Value {
    match value {
        Some(s) => Value::Text(s.clone()),
        None => Value::Null,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Venue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl Record for Venue {
    const TABLE: &'static str = "venues";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "city",
        "state",
        "address",
        "phone",
        "image_link",
        "facebook_link",
        "website",
        "genres",
        "seeking_talent",
        "seeking_description",
    ];

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.city.clone()),
            Value::Text(self.state.clone()),
            Value::Text(self.address.clone()),
            opt_text(&self.phone),
            opt_text(&self.image_link),
            opt_text(&self.facebook_link),
            opt_text(&self.website),
            Value::Text(join_list(&self.genres)),
            Value::Integer(self.seeking_talent as i64),
            opt_text(&self.seeking_description),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            city: row.get("city")?,
            state: row.get("state")?,
            address: row.get("address")?,
            phone: row.get("phone")?,
            image_link: row.get("image_link")?,
            facebook_link: row.get("facebook_link")?,
            website: row.get("website")?,
            genres: split_list(&row.get::<_, String>("genres")?),
            seeking_talent: row.get("seeking_talent")?,
            seeking_description: row.get("seeking_description")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Artist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub image_link: Option<String>,
    pub facebook_link: Option<String>,
    pub website: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    /// Start times the artist can play, in the exact form shows are booked with.
    pub available_dates: Vec<String>,
}

impl Record for Artist {
    const TABLE: &'static str = "artists";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "city",
        "state",
        "phone",
        "image_link",
        "facebook_link",
        "website",
        "genres",
        "seeking_venue",
        "seeking_description",
        "available_dates",
    ];

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.city.clone()),
            Value::Text(self.state.clone()),
            opt_text(&self.phone),
            opt_text(&self.image_link),
            opt_text(&self.facebook_link),
            opt_text(&self.website),
            Value::Text(join_list(&self.genres)),
            Value::Integer(self.seeking_venue as i64),
            opt_text(&self.seeking_description),
            Value::Text(join_list(&self.available_dates)),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get("name")?,
            city: row.get("city")?,
            state: row.get("state")?,
            phone: row.get("phone")?,
            image_link: row.get("image_link")?,
            facebook_link: row.get("facebook_link")?,
            website: row.get("website")?,
            genres: split_list(&row.get::<_, String>("genres")?),
            seeking_venue: row.get("seeking_venue")?,
            seeking_description: row.get("seeking_description")?,
            available_dates: split_list(&row.get::<_, String>("available_dates")?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Show {
    pub artist_id: i64,
    pub venue_id: i64,
    /// `YYYY-MM-DD HH:MM:SS`
    pub start_time: String,
}

impl Record for Show {
    const TABLE: &'static str = "shows";
    const COLUMNS: &'static [&'static str] = &["artist_id", "venue_id", "start_time"];
    const ORDER_BY: &'static str = "start_time, id";

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.artist_id),
            Value::Integer(self.venue_id),
            Value::Text(self.start_time.clone()),
        ]
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            artist_id: row.get("artist_id")?,
            venue_id: row.get("venue_id")?,
            start_time: row.get("start_time")?,
        })
    }
}
