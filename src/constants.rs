/// Default listener ports, one per app
pub const DEFAULT_BOOKING_PORT: u16 = 5000;
pub const DEFAULT_TRIVIA_PORT: u16 = 5001;
pub const DEFAULT_COFFEE_PORT: u16 = 5002;

/// Trivia questions returned per page
pub const QUESTIONS_PER_PAGE: i64 = 10;

/// How many recently listed venues/artists the home page shows
pub const RECENT_LISTINGS: i64 = 10;

/// Storage format for show start times. Lexicographic order matches
/// chronological order, which the SQL comparisons rely on.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Two-letter codes accepted in "City, ST" searches and in the venue/artist forms
pub const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

pub fn is_us_state(code: &str) -> bool {
    US_STATES.contains(&code)
}

/// Minimum gap between signing-key refetches triggered by an unknown `kid`
pub const JWKS_REFRESH_COOLDOWN: std::time::Duration = std::time::Duration::from_secs(30);

// Coffee-shop permissions carried in the bearer token's `permissions` claim
pub const PERM_GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const PERM_POST_DRINKS: &str = "post:drinks";
pub const PERM_PATCH_DRINKS: &str = "patch:drinks";
pub const PERM_DELETE_DRINKS: &str = "delete:drinks";
pub const PERM_GET_BARISTAS: &str = "get:baristas";
pub const PERM_POST_BARISTAS: &str = "post:baristas";
pub const PERM_GET_MANAGERS: &str = "get:managers";
pub const PERM_POST_MANAGERS: &str = "post:managers";
