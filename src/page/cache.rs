use tracing::debug;

use crate::api::ApiError;
use crate::records::RecordSummary;

/// Key under which the record list is cached.
const RECORDS_KEY: &str = "passwords";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Failed,
    /// A newer fetch was issued after this one; its result is dropped.
    Superseded,
}

/// Query cache for the record list. Data is only ever replaced wholesale by a
/// fetch result; mutations invalidate it instead of editing it in place.
#[derive(Debug, Default)]
pub struct ListCache {
    data: Option<Vec<RecordSummary>>,
    generation: u64,
    in_flight: bool,
    stale: bool,
}

impl ListCache {
    pub fn data(&self) -> Option<&[RecordSummary]> {
        self.data.as_deref()
    }

    pub fn records(&self) -> &[RecordSummary] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// True until the first successful fetch while a request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.data.is_none() && self.in_flight
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn has_fetched(&self) -> bool {
        self.generation > 0
    }

    /// Starts a fetch and returns the generation its result must carry.
    pub fn begin_fetch(&mut self) -> u64 {
        self.generation += 1;
        self.in_flight = true;
        self.generation
    }

    pub fn invalidate(&mut self) -> u64 {
        debug!(key = RECORDS_KEY, "invalidating cache");
        self.stale = true;
        self.begin_fetch()
    }

    pub fn resolve(
        &mut self,
        generation: u64,
        result: Result<Vec<RecordSummary>, ApiError>,
    ) -> Resolution {
        if generation != self.generation {
            return Resolution::Superseded;
        }
        self.in_flight = false;
        match result {
            Ok(records) => {
                self.data = Some(records);
                self.stale = false;
                Resolution::Applied
            }
            // Previous data, if any, stays visible.
            Err(_) => Resolution::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{ListedPassword, RecordId};

    fn rows(names: &[&str]) -> Vec<RecordSummary> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| RecordSummary {
                id: RecordId::from(i.to_string()),
                name: (*n).into(),
                url: "https://example.com".into(),
                username: "u".into(),
                password: ListedPassword::Withheld,
            })
            .collect()
    }

    #[test]
    fn loading_only_before_first_data() {
        let mut c = ListCache::default();
        assert!(!c.is_loading());
        let g = c.begin_fetch();
        assert!(c.is_loading());
        assert_eq!(c.resolve(g, Ok(rows(&["a"]))), Resolution::Applied);
        assert!(!c.is_loading());
        c.invalidate();
        assert!(!c.is_loading());
        assert!(c.is_fetching());
        assert!(c.is_stale());
    }

    #[test]
    fn superseded_results_are_dropped() {
        let mut c = ListCache::default();
        let first = c.begin_fetch();
        let second = c.invalidate();
        assert_eq!(c.resolve(second, Ok(rows(&["new"]))), Resolution::Applied);
        assert_eq!(c.resolve(first, Ok(rows(&["old"]))), Resolution::Superseded);
        assert_eq!(c.records()[0].name, "new");
    }

    #[test]
    fn failure_keeps_previous_data() {
        let mut c = ListCache::default();
        let g = c.begin_fetch();
        c.resolve(g, Ok(rows(&["keep"])));
        let g = c.invalidate();
        let res = c.resolve(g, Err(ApiError::Network("down".into())));
        assert_eq!(res, Resolution::Failed);
        assert_eq!(c.records().len(), 1);
        assert!(!c.is_fetching());
    }
}
