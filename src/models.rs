use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One active advisory row that matched the watch-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    /// Matched watch-list entries, joined with `", "`.
    pub area: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub level: String,
    pub announce_time: String,
    pub effective_time: String,
    #[serde(default)]
    pub clear_notice: String,
}

impl AdvisoryRecord {
    pub fn key(&self) -> AdvisoryKey {
        AdvisoryKey {
            area: self.area.clone(),
            kind: self.kind.clone(),
        }
    }

    /// Value of a mutable field, used for field-level comparison.
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Level => &self.level,
            Field::Announce => &self.announce_time,
            Field::Effective => &self.effective_time,
            Field::Clear => &self.clear_notice,
        }
    }
}

/// Identity of an advisory across polling cycles: (matched area names, type).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdvisoryKey {
    pub area: String,
    pub kind: String,
}

/// Fields that may change between cycles for the same [`AdvisoryKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Level,
    Announce,
    Effective,
    Clear,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Level, Field::Announce, Field::Effective, Field::Clear];
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Level => write!(f, "level"),
            Field::Announce => write!(f, "announce"),
            Field::Effective => write!(f, "effective"),
            Field::Clear => write!(f, "clear"),
        }
    }
}

/// Currently active advisories matching the watch-list, keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdvisoryState {
    records: BTreeMap<AdvisoryKey, AdvisoryRecord>,
}

impl AdvisoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its own key, replacing any earlier record for that key.
    pub fn insert(&mut self, record: AdvisoryRecord) {
        self.records.insert(record.key(), record);
    }

    pub fn get(&self, key: &AdvisoryKey) -> Option<&AdvisoryRecord> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &AdvisoryKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> impl Iterator<Item = &AdvisoryRecord> {
        self.records.values()
    }
}

impl FromIterator<AdvisoryRecord> for AdvisoryState {
    fn from_iter<I: IntoIterator<Item = AdvisoryRecord>>(iter: I) -> Self {
        let mut state = AdvisoryState::new();
        for record in iter {
            state.insert(record);
        }
        state
    }
}

/// Ordered list of area-name substrings the tracker cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchList {
    entries: Vec<String>,
}

impl WatchList {
    pub fn new(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Match `area` against every entry, ignoring all whitespace on both sides.
    ///
    /// Returns the matched entry names joined with `", "` in watch-list order,
    /// or `None` when nothing matches.
    pub fn matches(&self, area: &str) -> Option<String> {
        let haystack = strip_whitespace(area);
        let matched: Vec<&str> = self
            .entries
            .iter()
            .filter(|entry| {
                let needle = strip_whitespace(entry);
                !needle.is_empty() && haystack.contains(&needle)
            })
            .map(String::as_str)
            .collect();

        if matched.is_empty() {
            None
        } else {
            Some(matched.join(", "))
        }
    }
}

impl std::fmt::Display for WatchList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.entries.join(", "))
    }
}

pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
