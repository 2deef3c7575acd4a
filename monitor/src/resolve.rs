//! Movie resolution against a freshly fetched catalog.
//!
//! The monitor loop only ever needs the exact substring match; fuzzy
//! suggestions exist for the initiation path, where a human is around to
//! pick one.

use std::collections::BTreeSet;

use provider::types::MovieCatalogEntry;

/// How close a name has to be before we bother suggesting it.
const SUGGESTION_THRESHOLD: f64 = 0.5;
const MAX_SUGGESTIONS: usize = 3;

/// First catalog entry whose name contains `query`, case-insensitive.
/// Ties are arbitrary; the catalog is a set, not a ranking.
pub fn resolve_movie<'a>(
    catalog: &'a BTreeSet<MovieCatalogEntry>,
    query: &str,
) -> Option<&'a MovieCatalogEntry> {
    let needle = query.to_lowercase();
    catalog
        .iter()
        .find(|entry| entry.name.to_lowercase().contains(&needle))
}

/// Up to three near-miss titles for the user to pick from, best first.
/// Empty when nothing clears the similarity threshold.
pub fn suggest_movies(catalog: &BTreeSet<MovieCatalogEntry>, query: &str) -> Vec<String> {
    let needle = query.to_lowercase();

    let mut scored: Vec<(&str, f64)> = catalog
        .iter()
        .map(|entry| {
            let score = strsim::jaro_winkler(&entry.name.to_lowercase(), &needle);
            (entry.name.as_str(), score)
        })
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut suggestions: Vec<String> = Vec::new();
    for (name, _) in scored {
        // The same title can appear under several content ids.
        if !suggestions.iter().any(|s| s == name) {
            suggestions.push(name.to_string());
        }
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }

    suggestions
}
