use serde::Serialize;

use crate::models::{AdvisoryRecord, AdvisoryState, Field};

/// How an active record relates to the previous cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "fields", rename_all = "snake_case")]
pub enum EntryStatus {
    New,
    /// Existing key whose listed fields differ from the previous cycle.
    Updated(Vec<Field>),
    Unchanged,
}

/// A current record annotated with its change status. Presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveEntry {
    pub record: AdvisoryRecord,
    pub status: EntryStatus,
}

impl ActiveEntry {
    pub fn is_changed(&self) -> bool {
        !matches!(self.status, EntryStatus::Unchanged)
    }

    pub fn field_changed(&self, field: Field) -> bool {
        match &self.status {
            EntryStatus::Updated(fields) => fields.contains(&field),
            _ => false,
        }
    }
}

/// Result of comparing the persisted state with the freshly scraped one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Both states empty.
    Quiet,
    /// Same keys, same field values.
    Unchanged,
    /// Every previous advisory was released.
    FullClear { released: Vec<AdvisoryRecord> },
    /// New or updated advisories, possibly with some released.
    ActiveChange {
        active: Vec<ActiveEntry>,
        released: Vec<AdvisoryRecord>,
    },
}

/// Coarse change category, as reported to users and in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    None,
    NewOrUpdated,
    PartiallyCleared,
    Cleared,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::None => write!(f, "no change"),
            ChangeKind::NewOrUpdated => write!(f, "new or updated"),
            ChangeKind::PartiallyCleared => write!(f, "partially cleared"),
            ChangeKind::Cleared => write!(f, "cleared"),
        }
    }
}

impl Classification {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Classification::Quiet | Classification::Unchanged => ChangeKind::None,
            Classification::FullClear { .. } => ChangeKind::Cleared,
            Classification::ActiveChange { released, .. } if !released.is_empty() => {
                ChangeKind::PartiallyCleared
            }
            Classification::ActiveChange { .. } => ChangeKind::NewOrUpdated,
        }
    }

    pub fn is_noop(&self) -> bool {
        self.kind() == ChangeKind::None
    }

    pub fn released(&self) -> &[AdvisoryRecord] {
        match self {
            Classification::FullClear { released } => released,
            Classification::ActiveChange { released, .. } => released,
            _ => &[],
        }
    }

    pub fn active(&self) -> &[ActiveEntry] {
        match self {
            Classification::ActiveChange { active, .. } => active,
            _ => &[],
        }
    }
}

/// Classify the transition from `prev` to `curr`.
///
/// Precedence: both empty → [`Classification::Quiet`]; nothing changed →
/// [`Classification::Unchanged`]; `curr` empty → [`Classification::FullClear`];
/// otherwise [`Classification::ActiveChange`].
pub fn classify(prev: &AdvisoryState, curr: &AdvisoryState) -> Classification {
    if prev.is_empty() && curr.is_empty() {
        return Classification::Quiet;
    }

    let released: Vec<AdvisoryRecord> = prev
        .records()
        .filter(|r| !curr.contains(&r.key()))
        .cloned()
        .collect();

    let active: Vec<ActiveEntry> = curr
        .records()
        .map(|record| {
            let status = match prev.get(&record.key()) {
                None => EntryStatus::New,
                Some(old) => {
                    let fields: Vec<Field> = Field::ALL
                        .into_iter()
                        .filter(|&f| old.field(f) != record.field(f))
                        .collect();
                    if fields.is_empty() {
                        EntryStatus::Unchanged
                    } else {
                        EntryStatus::Updated(fields)
                    }
                }
            };
            ActiveEntry {
                record: record.clone(),
                status,
            }
        })
        .collect();

    let is_changed = !released.is_empty() || active.iter().any(ActiveEntry::is_changed);

    if !is_changed {
        Classification::Unchanged
    } else if curr.is_empty() {
        Classification::FullClear { released }
    } else {
        Classification::ActiveChange { active, released }
    }
}
