use super::models::Venue;
use crate::constants::is_us_state;
use crate::storage::Stored;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

static CITY_STATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<city>.+), (?P<state>[A-Z]{2})$").unwrap());

/// How a `search_term` form value is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTerm {
    /// `"San Francisco, CA"`: exact city and state.
    CityState { city: String, state: String },
    /// Anything else: case-insensitive substring of the name.
    Name(String),
}

impl SearchTerm {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(caps) = CITY_STATE.captures(raw) {
            if is_us_state(&caps["state"]) {
                return SearchTerm::CityState {
                    city: caps["city"].to_string(),
                    state: caps["state"].to_string(),
                };
            }
        }
        SearchTerm::Name(raw.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

impl SearchResult {
    /// `hits` are `(id, name)` pairs; ids missing from `upcoming` count 0.
    pub fn new(hits: Vec<(i64, String)>, upcoming: &HashMap<i64, i64>) -> Self {
        let data: Vec<SearchHit> = hits
            .into_iter()
            .map(|(id, name)| SearchHit {
                id,
                name,
                num_upcoming_shows: upcoming.get(&id).copied().unwrap_or(0),
            })
            .collect();
        Self {
            count: data.len(),
            data,
        }
    }
}

/// Venues sharing a city and state on the `/venues` page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub city: String,
    pub state: String,
    pub venues: Vec<SearchHit>,
}

/// Group venues by (city, state) in order of first appearance.
pub fn group_by_area(venues: Vec<Stored<Venue>>, upcoming: &HashMap<i64, i64>) -> Vec<Area> {
    let mut areas: Vec<Area> = Vec::new();
    for venue in venues {
        let hit = SearchHit {
            id: venue.id,
            num_upcoming_shows: upcoming.get(&venue.id).copied().unwrap_or(0),
            name: venue.record.name,
        };
        let (city, state) = (venue.record.city, venue.record.state);
        match areas
            .iter_mut()
            .find(|a| a.city == city && a.state == state)
        {
            Some(area) => area.venues.push(hit),
            None => areas.push(Area {
                city,
                state,
                venues: vec![hit],
            }),
        }
    }
    areas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_state_terms_need_a_real_state() {
        assert_eq!(
            SearchTerm::parse("San Francisco, CA"),
            SearchTerm::CityState {
                city: "San Francisco".into(),
                state: "CA".into()
            }
        );
        assert_eq!(
            SearchTerm::parse("Hop, XX"),
            SearchTerm::Name("Hop, XX".into())
        );
        assert_eq!(
            SearchTerm::parse("new york, ny"),
            SearchTerm::Name("new york, ny".into())
        );
        assert_eq!(SearchTerm::parse(" Hop "), SearchTerm::Name("Hop".into()));
    }

    #[test]
    fn missing_counts_default_to_zero() {
        let upcoming = HashMap::from([(2, 3)]);
        let result = SearchResult::new(vec![(1, "a".into()), (2, "b".into())], &upcoming);
        assert_eq!(result.count, 2);
        assert_eq!(result.data[0].num_upcoming_shows, 0);
        assert_eq!(result.data[1].num_upcoming_shows, 3);
    }

    #[test]
    fn areas_group_by_city_and_state() {
        let venue = |id, name: &str, city: &str, state: &str| Stored {
            id,
            record: Venue {
                name: name.into(),
                city: city.into(),
                state: state.into(),
                ..Venue::default()
            },
        };
        let areas = group_by_area(
            vec![
                venue(1, "The Musical Hop", "San Francisco", "CA"),
                venue(2, "The Dueling Pianos Bar", "New York", "NY"),
                venue(3, "Park Square Live Music & Coffee", "San Francisco", "CA"),
                venue(4, "Portland Hall", "Portland", "OR"),
                venue(5, "Portland Pub", "Portland", "ME"),
            ],
            &HashMap::new(),
        );
        assert_eq!(areas.len(), 4);
        assert_eq!(areas[0].venues.len(), 2);
        assert_eq!(areas[0].venues[1].name, "Park Square Live Music & Coffee");
        assert_eq!(areas[3].state, "ME");
    }
}
