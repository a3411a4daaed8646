use std::collections::HashMap;

/// Stable index of one rater within a frozen roster.
///
/// Rater indices are positional: the first rater ever observed gets index 0.
/// They are only meaningful relative to the roster that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RaterId(usize);

impl RaterId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Append-only collection of rater identities, in first-seen order.
///
/// The roster is populated while results are ingested and then frozen.
/// Agreement computations only accept a [`FrozenRoster`], so indices cannot
/// shift underneath a running calculation.
#[derive(Debug, Default)]
pub struct RaterRoster {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl RaterRoster {
    pub fn new() -> Self {
        RaterRoster::default()
    }

    /// Record a rater, returning their id. Re-observing a known rater
    /// returns the id assigned on first observation.
    pub fn observe(&mut self, name: &str) -> RaterId {
        if let Some(&idx) = self.index.get(name) {
            return RaterId(idx);
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), idx);
        RaterId(idx)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Consume the roster, fixing every rater index permanently.
    pub fn freeze(self) -> FrozenRoster {
        FrozenRoster {
            names: self.names,
            index: self.index,
        }
    }
}

/// An immutable rater roster with stable indices.
#[derive(Debug, Clone)]
pub struct FrozenRoster {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FrozenRoster {
    pub fn id_of(&self, name: &str) -> Option<RaterId> {
        self.index.get(name).copied().map(RaterId)
    }

    pub fn name(&self, id: RaterId) -> Option<&str> {
        self.names.get(id.0).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Raters in the order they were first observed.
    pub fn iter(&self) -> impl Iterator<Item = (RaterId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(idx, name)| (RaterId(idx), name.as_str()))
    }
}
