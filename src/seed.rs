//! Demo data for each app, used by `fyyur-suite seed` and the integration tests.

use crate::booking::models::{Artist, Show, Venue};
use crate::booking::BookingStore;
use crate::coffee::models::Drink;
use crate::coffee::recipe::Ingredient;
use crate::coffee::CoffeeStore;
use crate::error::Result;
use crate::storage::Repository;
use crate::trivia::TriviaStore;
use rusqlite::params;
use tracing::info;

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

/// Three venues, three artists and five shows: two in the past, three far
/// in the future. Returns nothing; ids are assigned 1..=3 on an empty store.
pub async fn seed_booking(store: &BookingStore) -> Result<()> {
    let venues = vec![
        Venue {
            name: "The Musical Hop".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "1015 Folsom Street".into(),
            phone: some("123-123-1234"),
            image_link: some("https://images.unsplash.com/photo-1543900694-133f37abaaa5?w=400"),
            facebook_link: some("https://www.facebook.com/TheMusicalHop"),
            website: some("https://www.themusicalhop.com"),
            genres: owned(&["Jazz", "Reggae", "Swing", "Classical", "Folk"]),
            seeking_talent: true,
            seeking_description: some(
                "We are on the lookout for a local artist to play every two weeks. Please call us.",
            ),
        },
        Venue {
            name: "The Dueling Pianos Bar".into(),
            city: "New York".into(),
            state: "NY".into(),
            address: "335 Delancey Street".into(),
            phone: some("914-003-1132"),
            image_link: some("https://images.unsplash.com/photo-1497032205916-ac775f0649ae?w=400"),
            facebook_link: some("https://www.facebook.com/theduelingpianos"),
            website: some("https://www.theduelingpianos.com"),
            genres: owned(&["Classical", "R&B", "Hip-Hop"]),
            seeking_talent: false,
            seeking_description: None,
        },
        Venue {
            name: "Park Square Live Music & Coffee".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            address: "34 Whiskey Moore Ave".into(),
            phone: some("415-000-1234"),
            image_link: some("https://images.unsplash.com/photo-1485686531765-ba63b07845a7?w=400"),
            facebook_link: some("https://www.facebook.com/ParkSquareLiveMusicAndCoffee"),
            website: some("https://www.parksquarelivemusicandcoffee.com"),
            genres: owned(&["Rock n Roll", "Jazz", "Classical", "Folk"]),
            seeking_talent: false,
            seeking_description: None,
        },
    ];

    let artists = vec![
        Artist {
            name: "Guns N Petals".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: some("326-123-5000"),
            image_link: some("https://images.unsplash.com/photo-1549213783-8284d0336c4f?w=300"),
            facebook_link: some("https://www.facebook.com/GunsNPetals"),
            website: some("https://www.gunsnpetalsband.com"),
            genres: owned(&["Rock n Roll"]),
            seeking_venue: true,
            seeking_description: some(
                "Looking for shows to perform at in the San Francisco Bay Area!",
            ),
            available_dates: owned(&["2035-05-01 20:00:00", "2035-05-08 20:00:00"]),
        },
        Artist {
            name: "Matt Quevedo".into(),
            city: "New York".into(),
            state: "NY".into(),
            phone: some("300-400-5000"),
            image_link: some("https://images.unsplash.com/photo-1495223153807-b916f75de8c5?w=334"),
            facebook_link: some("https://www.facebook.com/mattquevedo923251523"),
            website: None,
            genres: owned(&["Jazz"]),
            seeking_venue: false,
            seeking_description: None,
            available_dates: owned(&["2035-06-15 23:00:00"]),
        },
        Artist {
            name: "The Wild Sax Band".into(),
            city: "San Francisco".into(),
            state: "CA".into(),
            phone: some("432-325-5432"),
            image_link: some("https://images.unsplash.com/photo-1558369981-f9ca78462e61?w=794"),
            facebook_link: None,
            website: None,
            genres: owned(&["Jazz", "Classical"]),
            seeking_venue: false,
            seeking_description: None,
            available_dates: Vec::new(),
        },
    ];

    let mut venue_ids = Vec::with_capacity(venues.len());
    for venue in venues {
        venue_ids.push(store.venues.insert(venue).await?.id);
    }
    let mut artist_ids = Vec::with_capacity(artists.len());
    for artist in artists {
        artist_ids.push(store.artists.insert(artist).await?.id);
    }

    let shows = [
        (0, 0, "2019-05-21 21:30:00"),
        (2, 1, "2019-06-15 23:00:00"),
        (2, 2, "2035-04-01 20:00:00"),
        (2, 2, "2035-04-08 20:00:00"),
        (2, 2, "2035-04-15 20:00:00"),
    ];
    for (venue, artist, start_time) in shows {
        store
            .shows
            .insert(Show {
                artist_id: artist_ids[artist],
                venue_id: venue_ids[venue],
                start_time: start_time.to_string(),
            })
            .await?;
    }

    info!(
        "Seeded {} venues, {} artists, {} shows",
        venue_ids.len(),
        artist_ids.len(),
        shows.len()
    );
    Ok(())
}

const CATEGORIES: &[(i64, &str)] = &[
    (1, "Science"),
    (2, "Art"),
    (3, "Geography"),
    (4, "History"),
    (5, "Entertainment"),
    (6, "Sports"),
];

// (id, question, answer, difficulty, category)
const QUESTIONS: &[(i64, &str, &str, i64, i64)] = &[
    (2, "What movie earned Tom Hanks his third straight Oscar nomination, in 1996?", "Apollo 13", 4, 5),
    (4, "What actor did author Anne Rice first denounce, then praise in the role of her beloved Lestat?", "Tom Cruise", 4, 5),
    (5, "Whose autobiography is entitled 'I Know Why the Caged Bird Sings'?", "Maya Angelou", 2, 4),
    (6, "What was the title of the 1990 fantasy directed by Tim Burton about a young man with multi-bladed appendages?", "Edward Scissorhands", 3, 5),
    (9, "What boxer's original name is Cassius Clay?", "Muhammad Ali", 1, 4),
    (10, "Which is the only team to play in every soccer World Cup tournament?", "Brazil", 3, 6),
    (11, "Which country won the first ever soccer World Cup in 1930?", "Uruguay", 4, 6),
    (12, "Who invented Peanut Butter?", "George Washington Carver", 2, 4),
    (13, "What is the largest lake in Africa?", "Lake Victoria", 2, 3),
    (14, "In which royal palace would you find the Hall of Mirrors?", "The Palace of Versailles", 3, 3),
    (15, "The Taj Mahal is located in which Indian city?", "Agra", 2, 3),
    (16, "Which Dutch graphic artist, initials M C, was a creator of optical illusions?", "Escher", 1, 2),
    (17, "La Giaconda is better known as what?", "Mona Lisa", 3, 2),
    (18, "How many paintings did Van Gogh sell in his lifetime?", "One", 4, 2),
    (19, "Which American artist was a pioneer of Abstract Expressionism, and a leading exponent of action painting?", "Jackson Pollock", 2, 2),
    (20, "What is the heaviest organ in the human body?", "The Liver", 4, 1),
    (21, "Who discovered penicillin?", "Alexander Fleming", 3, 1),
    (22, "Hematology is a branch of medicine involving the study of what?", "Blood", 4, 1),
    (23, "Which dung beetle was worshipped by the ancient Egyptians?", "Scarab", 4, 4),
];

/// Six categories and nineteen questions with fixed ids, so tests can refer
/// to specific rows (question 10, the three Geography questions 13 to 15).
pub async fn seed_trivia(store: &TriviaStore) -> Result<()> {
    store
        .questions
        .database()
        .transaction(|tx| {
            for (id, kind) in CATEGORIES {
                tx.execute(
                    "INSERT INTO categories (id, type) VALUES (?1, ?2)",
                    params![id, kind],
                )?;
            }
            for (id, question, answer, difficulty, category) in QUESTIONS {
                tx.execute(
                    "INSERT INTO questions (id, question, answer, category, difficulty)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![id, question, answer, category, difficulty],
                )?;
            }
            Ok(())
        })
        .await?;
    info!(
        "Seeded {} categories, {} questions",
        CATEGORIES.len(),
        QUESTIONS.len()
    );
    Ok(())
}

fn ingredient(name: &str, color: &str, parts: u32) -> Ingredient {
    Ingredient {
        name: name.into(),
        color: color.into(),
        parts,
    }
}

pub async fn seed_coffee(store: &CoffeeStore) -> Result<()> {
    let drinks = vec![
        Drink {
            title: "water".into(),
            recipe: vec![ingredient("water", "blue", 1)],
        },
        Drink {
            title: "matcha shake".into(),
            recipe: vec![
                ingredient("milk", "grey", 1),
                ingredient("matcha", "green", 3),
            ],
        },
    ];
    let count = drinks.len();
    for drink in drinks {
        store.drinks.insert(drink).await?;
    }
    info!("Seeded {count} drinks");
    Ok(())
}
