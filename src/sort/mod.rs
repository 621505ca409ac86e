use std::cmp::Ordering;

/// Sort key for natural label ordering ("J2" before "J10").
///
/// A label splits into alternating text and digit runs. Digit runs compare by
/// numeric value, text runs byte-wise. The order is total: a digit run sorts
/// before a text run in the same position, and a key that is a strict prefix
/// of another sorts first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Run>);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Run {
    /// `digits` has leading zeros stripped, so comparing (length, digits)
    /// is exactly numeric order at any magnitude. `raw` breaks ties between
    /// spellings of the same value ("07" vs "7").
    Num { digits: String, raw: String },
    Text(String),
}

impl Ord for Run {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Run::Num { digits: a, raw: ra }, Run::Num { digits: b, raw: rb }) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| ra.cmp(rb)),
            (Run::Num { .. }, Run::Text(_)) => Ordering::Less,
            (Run::Text(_), Run::Num { .. }) => Ordering::Greater,
            (Run::Text(a), Run::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Run {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split `label` into its natural sort key.
pub fn natural_key(label: &str) -> NaturalKey {
    let mut runs = Vec::new();
    let mut chars = label.chars().peekable();

    while let Some(&first) = chars.peek() {
        if first.is_ascii_digit() {
            let mut raw = String::new();
            while let Some(&c) = chars.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                raw.push(c);
                chars.next();
            }
            let digits = raw.trim_start_matches('0').to_string();
            runs.push(Run::Num { digits, raw });
        } else {
            let mut text = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            runs.push(Run::Text(text));
        }
    }

    NaturalKey(runs)
}

/// Compare two labels in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Sort labels in place in natural order.
pub fn sort_natural(values: &mut [String]) {
    values.sort_by_cached_key(|v| natural_key(v));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn j_labels_sort_numerically() {
        let mut labels: Vec<String> = (1..=200).rev().map(|i| format!("J{}", i)).collect();
        sort_natural(&mut labels);
        let expected: Vec<String> = (1..=200).map(|i| format!("J{}", i)).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn two_before_ten() {
        assert_eq!(natural_cmp("J2", "J10"), Ordering::Less);
        // plain string order gets this wrong
        assert_eq!("J2".cmp("J10"), Ordering::Greater);
    }

    #[test]
    fn prefix_sorts_first() {
        assert_eq!(natural_cmp("J", "J1"), Ordering::Less);
        assert_eq!(natural_cmp("L-2", "L-2A"), Ordering::Less);
    }

    #[test]
    fn digit_run_sorts_before_text_run() {
        assert_eq!(natural_cmp("1A", "AA"), Ordering::Less);
    }

    #[test]
    fn equal_values_with_different_spellings_stay_ordered() {
        assert_eq!(natural_cmp("J07", "J7"), Ordering::Less);
        assert_eq!(natural_cmp("J7", "J07"), Ordering::Greater);
        assert_eq!(natural_cmp("J7", "J7"), Ordering::Equal);
    }

    #[test]
    fn dashed_line_labels() {
        let mut labels = vec!["L-10".to_string(), "L-2".to_string(), "L-100".to_string()];
        sort_natural(&mut labels);
        assert_eq!(labels, vec!["L-2", "L-10", "L-100"]);
    }

    #[test]
    fn huge_digit_runs_do_not_overflow() {
        let a = format!("J{}", "9".repeat(50));
        let b = format!("J1{}", "0".repeat(50));
        assert_eq!(natural_cmp(&a, &b), Ordering::Less);
    }
}
