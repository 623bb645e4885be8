use serde::Serialize;
use crate::watched::WatchedEntry;

/// Aggregate numbers for the watched list header.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    /// Entries with an unknown (0) runtime are left out of this average
    pub avg_runtime: f64,
}

impl WatchedSummary {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().filter_map(|e| e.imdb_rating)),
            avg_user_rating: average(entries.iter().map(|e| e.user_rating)),
            avg_runtime: average(
                entries
                    .iter()
                    .filter(|e| e.runtime > 0)
                    .map(|e| f64::from(e.runtime)),
            ),
        }
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, runtime: u32, imdb: Option<f64>, user: f64) -> WatchedEntry {
        WatchedEntry {
            imdb_id: id.to_string(),
            title: format!("Movie {}", id),
            year: "2010".to_string(),
            poster: String::new(),
            runtime,
            imdb_rating: imdb,
            user_rating: user,
        }
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(WatchedSummary::from_entries(&[]), WatchedSummary::default());
    }

    #[test]
    fn test_averages() {
        let entries = vec![
            entry("tt1", 100, Some(8.0), 10.0),
            entry("tt2", 0, Some(6.0), 6.0),
            entry("tt3", 140, None, 8.0),
        ];
        let summary = WatchedSummary::from_entries(&entries);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.avg_imdb_rating, 7.0);
        assert_eq!(summary.avg_user_rating, 8.0);
        // runtime 0 is unknown and skipped
        assert_eq!(summary.avg_runtime, 120.0);
    }
}
