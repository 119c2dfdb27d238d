use std::collections::BTreeMap;

/// Names of the fields in `values` that are empty once trimmed, in key order.
pub fn empty_fields(values: &BTreeMap<String, String>) -> Vec<String> {
    values
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.clone())
        .collect()
}

/// Required fields that are absent from `values` or blank, in `required` order.
pub fn missing_required(required: &[&str], values: &BTreeMap<String, String>) -> Vec<String> {
    required
        .iter()
        .filter(|name| {
            values
                .get(**name)
                .map(|value| value.trim().is_empty())
                .unwrap_or(true)
        })
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn whitespace_only_counts_as_empty() {
        let snapshot = values(&[("child_name", "   \t"), ("city", "חיפה"), ("child_age", "")]);
        assert_eq!(empty_fields(&snapshot), vec!["child_age", "child_name"]);
    }

    #[test]
    fn absent_required_fields_are_missing() {
        let snapshot = values(&[("child_name", "נועה")]);
        assert_eq!(
            missing_required(&["child_name", "child_age", "city"], &snapshot),
            vec!["child_age", "city"]
        );
        assert!(missing_required(&[], &snapshot).is_empty());
    }
}
