//! Catalog autocomplete and near-duplicate detection.
//!
//! Names are normalized (lowercase, punctuation stripped, whitespace
//! collapsed) before matching, so "  Milk!!" and "milk" are the same entry.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use regex::Regex;

use crate::services::catalog::CatalogItem;

/// A ranked autocomplete hit.
#[derive(Debug)]
pub struct Suggestion<'a> {
    pub item: &'a CatalogItem,
    pub score: i64,
}

// lifts an exact normalized match above any partial fuzzy hit
const EXACT_MATCH_BONUS: i64 = 1 << 20;

pub struct Suggester {
    matcher: SkimMatcherV2,
    strip: Regex,
}

impl Suggester {
    pub fn new() -> Self {
        Self {
            matcher: SkimMatcherV2::default(),
            strip: Regex::new(r"[^\p{L}\p{N} ]+").expect("static pattern"),
        }
    }

    fn normalize(&self, raw: &str) -> String {
        let lowered = raw.to_lowercase();
        let stripped = self.strip.replace_all(&lowered, " ");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Rank catalog items against a partial query, best match first.
    /// Ties break on the item name so the ordering is stable.
    pub fn suggest<'a>(
        &self,
        query: &str,
        catalog: &'a [CatalogItem],
        limit: usize,
    ) -> Vec<Suggestion<'a>> {
        let needle = self.normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<Suggestion<'a>> = catalog
            .iter()
            .filter_map(|item| {
                let hay = self.normalize(&item.name);
                self.matcher.fuzzy_match(&hay, &needle).map(|score| {
                    let bonus = if hay == needle { EXACT_MATCH_BONUS } else { 0 };
                    Suggestion {
                        item,
                        score: score + bonus,
                    }
                })
            })
            .collect();
        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.item.name.cmp(&b.item.name)));
        hits.truncate(limit);
        hits
    }

    /// An existing catalog entry the given name duplicates, if any: an exact
    /// match on the normalized name, or a fuzzy score at least as good as the
    /// query matched against itself.
    pub fn find_duplicate<'a>(
        &self,
        name: &str,
        catalog: &'a [CatalogItem],
    ) -> Option<&'a CatalogItem> {
        let needle = self.normalize(name);
        if needle.is_empty() {
            return None;
        }

        if let Some(exact) = catalog
            .iter()
            .find(|item| self.normalize(&item.name) == needle)
        {
            return Some(exact);
        }

        let threshold = self.matcher.fuzzy_match(&needle, &needle)?;
        catalog
            .iter()
            .filter_map(|item| {
                self.matcher
                    .fuzzy_match(&self.normalize(&item.name), &needle)
                    .map(|score| (item, score))
            })
            .filter(|(_, score)| *score >= threshold)
            .max_by_key(|(_, score)| *score)
            .map(|(item, _)| item)
    }
}

impl Default for Suggester {
    fn default() -> Self {
        Self::new()
    }
}
