//! Choice lists for the entry form: distinct recorded values, optionally
//! narrowed by a parent selection, plus the synthetic bolt domain.

use std::collections::HashSet;
use std::fmt;

use crate::record::{Field, OrderPolicy};
use crate::sort::sort_natural;
use crate::store::RecordStore;

pub const DEFAULT_BOLT_COUNT: u32 = 200;

/// Largest count `BoltDomain::from_str` accepts for a fixed domain.
pub const MAX_BOLT_COUNT: u32 = 10_000;

/// Where bolt identifier choices come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoltDomain {
    /// Bolt options derive from recorded rows like any identifier field.
    Derived,
    /// The fixed domain "J1".."J<n>", independent of recorded data, so an
    /// operator can pick identifiers that have no rows yet.
    Fixed(u32),
}

impl Default for BoltDomain {
    fn default() -> Self {
        BoltDomain::Fixed(DEFAULT_BOLT_COUNT)
    }
}

impl BoltDomain {
    /// Accepts "derived", "fixed" and "fixed:<n>" for `n` in
    /// 1..=[`MAX_BOLT_COUNT`].
    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "derived" => Some(BoltDomain::Derived),
            "fixed" => Some(BoltDomain::Fixed(DEFAULT_BOLT_COUNT)),
            other => {
                let n = other.strip_prefix("fixed:")?.trim().parse::<u32>().ok()?;
                if (1..=MAX_BOLT_COUNT).contains(&n) {
                    Some(BoltDomain::Fixed(n))
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for BoltDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoltDomain::Derived => write!(f, "derived"),
            BoltDomain::Fixed(n) => write!(f, "fixed:{}", n),
        }
    }
}

/// Builds the choice list a caller offers for each field.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionResolver {
    bolt_domain: BoltDomain,
}

impl OptionResolver {
    pub fn new(bolt_domain: BoltDomain) -> Self {
        OptionResolver { bolt_domain }
    }

    /// Distinct, ordered choices for `field`, optionally narrowed to rows
    /// whose `parent` field carries the given value.
    ///
    /// An empty result is a valid answer, shown by callers as a "no options"
    /// state. Under a fixed bolt domain the bolt list ignores both the store
    /// and any parent selection.
    pub fn options_for(
        &self,
        store: &RecordStore,
        field: Field,
        parent: Option<(Field, &str)>,
    ) -> Vec<String> {
        if field == Field::BoltNo {
            if let BoltDomain::Fixed(count) = self.bolt_domain {
                return (1..=count).map(|i| format!("J{}", i)).collect();
            }
        }

        let filtered;
        let source = match parent {
            Some((parent_field, value)) => {
                filtered = store.filter_by(parent_field, value);
                &filtered
            }
            None => store,
        };

        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for row in 0..source.len() {
            let value = source.get(row, field);
            if value.is_empty() {
                continue;
            }
            if seen.insert(value.to_string()) {
                values.push(value.to_string());
            }
        }

        match field.order_policy() {
            OrderPolicy::Natural => sort_natural(&mut values),
            OrderPolicy::Lexicographic => values.sort(),
        }
        values
    }
}
