use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::domain::CleanRecord;

/// A genre and how many accepted records carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Count genres and rank them by descending count.
///
/// Equal counts keep first-appearance order (the sort is stable), which is
/// what decides ties at the cut-off.
pub fn rank_genres(records: &[CleanRecord]) -> Vec<GenreCount> {
    let mut ranked: Vec<GenreCount> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match slots.get(record.genre.as_str()) {
            Some(&slot) => ranked[slot].count += 1,
            None => {
                slots.insert(record.genre.as_str(), ranked.len());
                ranked.push(GenreCount {
                    genre: record.genre.clone(),
                    count: 1,
                });
            }
        }
    }

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Keep only records whose genre is among the `limit` most frequent.
///
/// Two explicit phases: count over every record, then filter. Relative order
/// of the surviving records is unchanged. Returns the retained genres in rank
/// order alongside the records.
pub fn retain_top_genres(
    records: Vec<CleanRecord>,
    limit: usize,
) -> (Vec<CleanRecord>, Vec<GenreCount>) {
    let mut top = rank_genres(&records);
    top.truncate(limit);

    let keep: HashSet<&str> = top.iter().map(|g| g.genre.as_str()).collect();
    let retained = records
        .into_iter()
        .filter(|r| keep.contains(r.genre.as_str()))
        .collect();

    (retained, top)
}
