//! Filter/rank engine: turns a query, the catalogue and the recents list into
//! an ordered, sectioned result list.
//!
//! With an empty query the catalogue is browsed: recents first under a
//! synthetic "Recent" heading, then each declared group in order, then the
//! ungrouped tail. With a query the list is flat and ranked by [`MatchTier`],
//! ties keeping catalogue order. The engine is pure; identical inputs always
//! produce identical output.

use std::ops::Range;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::catalogue::{Catalogue, SearchKeys};
use crate::state::Command;

pub const RECENT_HEADING: &str = "Recent";

/// How a command matched the query. Earlier variants rank higher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    /// Label starts with the query.
    LabelPrefix,
    /// Query occurs elsewhere in the label.
    LabelSubstring,
    /// Query occurs in the description or a keyword.
    Secondary,
    /// Query is a scattered subsequence of the label.
    Fuzzy,
}

/// Section heading in a browsed (empty query) list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Recent,
    /// Position into [`Catalogue::groups`].
    Group(usize),
}

impl Heading {
    pub fn label<'a>(&self, catalogue: &'a Catalogue) -> &'a str {
        match self {
            Heading::Recent => RECENT_HEADING,
            Heading::Group(pos) => catalogue
                .groups()
                .get(*pos)
                .map(|g| g.label.as_str())
                .unwrap_or_default(),
        }
    }
}

/// A contiguous run of entries under one heading. `None` means no header is
/// rendered (the ungrouped tail, or any searched list).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub heading: Option<Heading>,
    pub range: Range<usize>,
}

/// Ordered result of one ranking pass. Entries are catalogue positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RankedList {
    entries: Vec<usize>,
    sections: Vec<Section>,
}

impl RankedList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalogue positions in navigation order.
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Catalogue position of the entry at list position `pos`.
    pub fn get(&self, pos: usize) -> Option<usize> {
        self.entries.get(pos).copied()
    }

    /// List position of the command at catalogue position `index`.
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.entries.iter().position(|&i| i == index)
    }

    pub fn commands<'a>(&'a self, catalogue: &'a Catalogue) -> impl Iterator<Item = &'a Command> + 'a {
        self.entries.iter().filter_map(move |&i| catalogue.command(i))
    }

    fn push_section(&mut self, heading: Option<Heading>, start: usize) {
        let end = self.entries.len();
        if end > start {
            self.sections.push(Section {
                heading,
                range: start..end,
            });
        }
    }
}

/// Rank the catalogue for `query`. Whitespace-only queries browse.
pub fn rank(query: &str, catalogue: &Catalogue, recent_ids: &[String]) -> RankedList {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        browse(catalogue, recent_ids)
    } else {
        search(&query, catalogue)
    }
}

fn browse(catalogue: &Catalogue, recent_ids: &[String]) -> RankedList {
    let mut list = RankedList {
        entries: Vec::with_capacity(catalogue.len()),
        sections: Vec::new(),
    };
    let mut promoted = vec![false; catalogue.len()];

    for id in recent_ids {
        if let Some(i) = catalogue.index_of(id) {
            if !promoted[i] {
                promoted[i] = true;
                list.entries.push(i);
            }
        }
    }
    list.push_section(Some(Heading::Recent), 0);

    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); catalogue.groups().len()];
    let mut ungrouped = Vec::new();
    for (i, _) in promoted.iter().enumerate().filter(|(_, p)| !**p) {
        match catalogue.group_position(i) {
            Some(g) => buckets[g].push(i),
            None => ungrouped.push(i),
        }
    }

    for (g, bucket) in buckets.into_iter().enumerate() {
        let start = list.entries.len();
        list.entries.extend(bucket);
        list.push_section(Some(Heading::Group(g)), start);
    }
    let start = list.entries.len();
    list.entries.extend(ungrouped);
    list.push_section(None, start);

    list
}

fn search(query: &str, catalogue: &Catalogue) -> RankedList {
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(MatchTier, i64, usize)> = (0..catalogue.len())
        .filter_map(|i| {
            classify(query, catalogue.search_keys(i), &matcher).map(|(tier, score)| (tier, score, i))
        })
        .collect();
    // Stable: equal (tier, score) pairs stay in catalogue order.
    scored.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

    let mut list = RankedList {
        entries: scored.into_iter().map(|(_, _, i)| i).collect(),
        sections: Vec::new(),
    };
    list.push_section(None, 0);
    list
}

/// Tier plus an intra-tier score (only the fuzzy tier uses the score).
/// `query` must already be lowercased.
fn classify(query: &str, keys: &SearchKeys, matcher: &SkimMatcherV2) -> Option<(MatchTier, i64)> {
    if keys.label.starts_with(query) {
        return Some((MatchTier::LabelPrefix, 0));
    }
    if keys.label.contains(query) {
        return Some((MatchTier::LabelSubstring, 0));
    }
    let in_description = keys.description.as_deref().is_some_and(|d| d.contains(query));
    if in_description || keys.keywords.iter().any(|k| k.contains(query)) {
        return Some((MatchTier::Secondary, 0));
    }
    matcher
        .fuzzy_match(&keys.label, query)
        .map(|score| (MatchTier::Fuzzy, score))
}
