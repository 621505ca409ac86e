use std::collections::HashMap;

use once_cell::sync::Lazy;

static ALIAS_LOOKUP: Lazy<HashMap<&'static str, Field>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for field in Field::ALL {
        for alias in field.aliases() {
            map.insert(*alias, field);
        }
    }
    map
});

/// The logical fields of an inspection record.
///
/// `ALL` fixes the canonical column order. Each field accepts several header
/// spellings; `aliases` lists them in priority order, and the first entry is
/// the name used whenever a column has to be created from scratch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    LineNo,
    TestPackNo,
    BoltNo,
    BoltingType,
    Date,
    Supervisor,
    TorqueValue,
    Status,
    Remarks,
}

/// How a field's option list is ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderPolicy {
    /// Embedded digit runs compare numerically ("J2" before "J10").
    Natural,
    /// Plain byte-wise string order.
    Lexicographic,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::LineNo,
        Field::TestPackNo,
        Field::BoltNo,
        Field::BoltingType,
        Field::Date,
        Field::Supervisor,
        Field::TorqueValue,
        Field::Status,
        Field::Remarks,
    ];

    /// Accepted header spellings, highest priority first. Matching is
    /// case-insensitive on trimmed names; these are the uppercase forms.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::LineNo => &["LINE NO", "LINE NUMBER", "LINE"],
            Field::TestPackNo => &["TEST PACK NO", "TEST PACK NUMBER", "PACK NO"],
            Field::BoltNo => &["BOLT TORQUING NUMBER", "BOLT NUMBER", "BOLT NO"],
            Field::BoltingType => &["TYPE OF BOLTING", "BOLTING TYPE"],
            Field::Date => &["DATE"],
            Field::Supervisor => &["SUPERVISOR"],
            Field::TorqueValue => &["TORQUE VALUE", "TORQUE"],
            Field::Status => &["STATUS"],
            Field::Remarks => &["REMARKS"],
        }
    }

    /// Header name used when the field's column does not exist yet.
    pub fn canonical(self) -> &'static str {
        self.aliases()[0]
    }

    /// Ordering applied to this field's option list. Identifier-style fields
    /// sort naturally, free-text fields lexicographically.
    pub fn order_policy(self) -> OrderPolicy {
        match self {
            Field::LineNo | Field::TestPackNo | Field::BoltNo => OrderPolicy::Natural,
            _ => OrderPolicy::Lexicographic,
        }
    }

    /// Short name used on the command line.
    pub fn cli_name(self) -> &'static str {
        match self {
            Field::LineNo => "line",
            Field::TestPackNo => "pack",
            Field::BoltNo => "bolt",
            Field::BoltingType => "type",
            Field::Date => "date",
            Field::Supervisor => "supervisor",
            Field::TorqueValue => "torque",
            Field::Status => "status",
            Field::Remarks => "remarks",
        }
    }

    /// Field a header name belongs to, under the same trimmed uppercase
    /// tolerance header matching uses everywhere else.
    pub fn for_header(name: &str) -> Option<Self> {
        ALIAS_LOOKUP.get(name.trim().to_uppercase().as_str()).copied()
    }

    pub fn from_cli_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "line" => Some(Field::LineNo),
            "pack" => Some(Field::TestPackNo),
            "bolt" => Some(Field::BoltNo),
            "type" => Some(Field::BoltingType),
            "date" => Some(Field::Date),
            "supervisor" => Some(Field::Supervisor),
            "torque" => Some(Field::TorqueValue),
            "status" => Some(Field::Status),
            "remarks" => Some(Field::Remarks),
            _ => None,
        }
    }
}
