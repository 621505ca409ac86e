use crate::record::Field;

/// Canonical form of a header cell: surrounding whitespace stripped and the
/// rest uppercased.
pub fn normalize_header(cell: &str) -> String {
    cell.trim().to_uppercase()
}

/// Index of the first alias present among `headers`, or `None` when no alias
/// matches.
///
/// Aliases are tried in priority order; for each alias the leftmost matching
/// column wins. Matching is case-insensitive on trimmed names, the same
/// tolerance applied when headers are normalized on load.
pub fn resolve(headers: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        if let Some(idx) = headers
            .iter()
            .position(|header| normalize_header(header) == *alias)
        {
            return Some(idx);
        }
    }
    None
}

/// Header row for a store created from scratch: the canonical alias of every
/// logical field, in declaration order.
pub fn default_columns() -> Vec<String> {
    Field::ALL
        .iter()
        .map(|field| field.canonical().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_trims_and_uppercases() {
        assert_eq!(normalize_header(" bolt no "), "BOLT NO");
        assert_eq!(normalize_header("STATUS"), "STATUS");
        assert_eq!(normalize_header(""), "");
    }

    #[test]
    fn resolves_any_alias_spelling() {
        let headers = vec!["LINE NO".to_string(), "bolt no".to_string()];
        assert_eq!(resolve(&headers, Field::BoltNo.aliases()), Some(1));
        assert_eq!(resolve(&headers, Field::LineNo.aliases()), Some(0));
        assert_eq!(resolve(&headers, Field::Status.aliases()), None);
    }

    #[test]
    fn earlier_alias_wins_over_earlier_column() {
        // canonical name sits to the right of a lower-priority alias
        let headers = vec![
            "BOLT NO".to_string(),
            "STATUS".to_string(),
            "BOLT TORQUING NUMBER".to_string(),
        ];
        assert_eq!(resolve(&headers, Field::BoltNo.aliases()), Some(2));
    }

    #[test]
    fn default_header_covers_every_field() {
        let columns = default_columns();
        assert_eq!(columns.len(), Field::ALL.len());
        assert_eq!(columns[0], "LINE NO");
        for field in Field::ALL {
            assert!(resolve(&columns, field.aliases()).is_some());
        }
    }
}
