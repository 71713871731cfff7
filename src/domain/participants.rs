use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The people an expense is split between.
/// Names are unique and keep the order they were added in.
///
/// Stored lists go through [`insert`](Self::insert) when read back, so they get
/// the same trimming and deduplication as names typed in by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ParticipantSet(IndexSet<String>);

impl ParticipantSet {
    pub fn new() -> Self {
        Self(IndexSet::new())
    }

    /// Add a participant. Surrounding whitespace is trimmed; blank names and
    /// names already present are ignored. Returns true if the set changed.
    pub fn insert(&mut self, name: impl AsRef<str>) -> bool {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return false;
        }
        self.0.insert(name.to_string())
    }

    /// Remove a participant by name. Returns true if it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.0.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ParticipantSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ParticipantSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

impl From<Vec<String>> for ParticipantSet {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<ParticipantSet> for Vec<String> {
    fn from(set: ParticipantSet) -> Self {
        set.0.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ParticipantSet {
    type Item = &'a String;
    type IntoIter = indexmap::set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
