// Pipeline processing: column resolution, coercion, validation, and genre reduction

pub mod coerce;
pub mod columns;
pub mod genre_filter;
pub mod normalize;

pub use columns::resolve_genre_column;
pub use genre_filter::{rank_genres, retain_top_genres, GenreCount};
pub use normalize::{RejectReason, TrackNormalizer};
