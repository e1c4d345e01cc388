/// Column and path constants to ensure consistency across the codebase
/// These define the input schema we read and the output schema we emit

// Default locations (used when neither config file nor CLI overrides them)
pub const DEFAULT_INPUT_PATH: &str = "data/spotify_songs.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "data/spotify_clean.csv";
pub const DEFAULT_LOG_DIR: &str = "logs";

// Input columns
pub const COL_TRACK_ID: &str = "track_id";
pub const COL_TRACK_NAME: &str = "track_name";
pub const COL_TRACK_ARTIST: &str = "track_artist";
pub const COL_RELEASE_DATE: &str = "track_album_release_date";
pub const COL_POPULARITY: &str = "track_popularity";
pub const COL_DANCEABILITY: &str = "danceability";
pub const COL_ENERGY: &str = "energy";
pub const COL_LOUDNESS: &str = "loudness";
pub const COL_SPEECHINESS: &str = "speechiness";
pub const COL_ACOUSTICNESS: &str = "acousticness";
pub const COL_INSTRUMENTALNESS: &str = "instrumentalness";
pub const COL_LIVENESS: &str = "liveness";
pub const COL_VALENCE: &str = "valence";
pub const COL_TEMPO: &str = "tempo";
pub const COL_DURATION_MS: &str = "duration_ms";

/// Genre column aliases, highest priority first
pub const GENRE_COLUMN_CANDIDATES: [&str; 2] = ["playlist_genre", "genre"];

/// Fixed output column order
pub const OUTPUT_COLUMNS: [&str; 16] = [
    "id",
    "track_name",
    "track_artist",
    "genre",
    "year",
    "popularity",
    "danceability",
    "energy",
    "loudness",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
    "duration_ms",
];

// Accepted release year range (inclusive)
pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// How many genres survive the frequency reduction by default
pub const DEFAULT_TOP_GENRES: usize = 10;

/// Get the default genre aliases as owned strings
pub fn default_genre_columns() -> Vec<String> {
    GENRE_COLUMN_CANDIDATES.iter().map(|c| c.to_string()).collect()
}
