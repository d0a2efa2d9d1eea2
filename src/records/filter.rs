use crate::records::models::RecordSummary;

/// Case-insensitive substring match on the record name. An empty query
/// matches everything.
pub fn name_matches(name: &str, query: &str) -> bool {
    query.is_empty() || name.to_lowercase().contains(&query.to_lowercase())
}

/// Indices of the records whose name matches `query`, in list order.
pub fn filter_by_name(records: &[RecordSummary], query: &str) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| name_matches(&r.name, query))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::models::{ListedPassword, RecordId};

    fn summary(id: &str, name: &str) -> RecordSummary {
        RecordSummary {
            id: RecordId::from(id),
            name: name.into(),
            url: "https://example.com".into(),
            username: "u".into(),
            password: ListedPassword::Withheld,
        }
    }

    #[test]
    fn matches_ignore_case() {
        assert!(name_matches("GitHub", "git"));
        assert!(name_matches("GitHub", "HUB"));
        assert!(!name_matches("GitHub", "lab"));
    }

    #[test]
    fn empty_query_keeps_everything() {
        let records = vec![summary("1", "alpha"), summary("2", "beta")];
        assert_eq!(filter_by_name(&records, ""), vec![0, 1]);
    }

    #[test]
    fn filter_looks_at_name_only() {
        let mut r = summary("1", "alpha");
        r.username = "beta-user".into();
        r.url = "https://beta.example".into();
        let records = vec![r, summary("2", "beta")];
        assert_eq!(filter_by_name(&records, "beta"), vec![1]);
    }

    #[test]
    fn filter_agrees_with_lowercase_contains() {
        let names = ["Mail", "MAILBOX", "Bank", "ébank", "x"];
        let records: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, n)| summary(&i.to_string(), n))
            .collect();
        for q in ["", "mail", "AIL", "bank", "ÉB", "zzz"] {
            let expected: Vec<usize> = names
                .iter()
                .enumerate()
                .filter(|(_, n)| n.to_lowercase().contains(&q.to_lowercase()))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(filter_by_name(&records, q), expected, "query {q:?}");
        }
    }
}
