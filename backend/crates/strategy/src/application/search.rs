//! Fuzzy search over the cached catalog

use crate::domain::entities::Strategy;

/// Relevance-ordered strategies whose text approximately contains `query`
///
/// `threshold` is in `[0, 1]`: 0 accepts exact matches only, 1 accepts
/// everything. A candidate matches when its similarity is at least
/// `1 - threshold`. Blank queries match nothing.
pub fn search(strategies: &[Strategy], query: &str, threshold: f64) -> Vec<Strategy> {
    let needle = normalize(query);
    if needle.is_empty() {
        return Vec::new();
    }
    let min_similarity = 1.0 - threshold.clamp(0.0, 1.0);

    let mut hits: Vec<(f64, &Strategy)> = strategies
        .iter()
        .filter_map(|strategy| {
            let score = similarity(&needle, &normalize(&strategy.text));
            (score >= min_similarity).then_some((score, strategy))
        })
        .collect();

    hits.sort_by(|(a_score, a), (b_score, b)| {
        b_score.total_cmp(a_score).then_with(|| a.id.cmp(&b.id))
    });

    hits.into_iter().map(|(_, strategy)| strategy.clone()).collect()
}

/// Lowercase, punctuation stripped, single-spaced
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best of: substring hit (1.0), or normalized Levenshtein against the whole
/// text and against word windows about as long as the needle
fn similarity(needle: &str, haystack: &str) -> f64 {
    if haystack.contains(needle) {
        return 1.0;
    }

    let words: Vec<&str> = haystack.split(' ').collect();
    let width = needle.split(' ').count();
    let mut best = strsim::normalized_levenshtein(needle, haystack);

    for size in [width.saturating_sub(1), width, width + 1] {
        if size == 0 || size > words.len() {
            continue;
        }
        for window in words.windows(size) {
            best = best.max(strsim::normalized_levenshtein(needle, &window.join(" ")));
        }
    }

    best
}

/// Result of a search, as shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; nothing to show
    Idle,
    /// Query matched nothing
    NoMatches,
    Matches(Vec<Strategy>),
}

impl SearchOutcome {
    pub fn strategies(&self) -> &[Strategy] {
        match self {
            SearchOutcome::Matches(strategies) => strategies,
            _ => &[],
        }
    }
}

/// Memoised search keyed by `(query, catalog generation)`
///
/// Recomputes whenever either part of the key changes, so results never
/// outlive the catalog they were computed from.
#[derive(Debug)]
pub struct SearchSession {
    threshold: f64,
    key: Option<(String, u64)>,
    outcome: SearchOutcome,
}

impl SearchSession {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            key: None,
            outcome: SearchOutcome::Idle,
        }
    }

    pub fn update(&mut self, query: &str, generation: u64, strategies: &[Strategy]) -> &SearchOutcome {
        let fresh = self
            .key
            .as_ref()
            .is_some_and(|(q, g)| q == query && *g == generation);
        if fresh {
            return &self.outcome;
        }

        self.outcome = if query.trim().is_empty() {
            SearchOutcome::Idle
        } else {
            let matches = search(strategies, query, self.threshold);
            if matches.is_empty() {
                SearchOutcome::NoMatches
            } else {
                SearchOutcome::Matches(matches)
            }
        };
        self.key = Some((query.to_string(), generation));
        &self.outcome
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }
}
