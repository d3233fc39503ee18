use tracing::debug;

use crate::model::{ReleaseRecord, Snapshot};

/// Merges per-repository release lists into one snapshot, newest first.
///
/// Call this only once every fetch has finished. Records sharing a publish
/// time keep the order in which their batches were passed in. Per-repository
/// caps are the fetcher's job and are not re-applied here.
pub fn aggregate<I>(batches: I) -> Snapshot
where
    I: IntoIterator<Item = Vec<ReleaseRecord>>,
{
    let mut records: Vec<ReleaseRecord> = batches.into_iter().flatten().collect();
    records.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    debug!(releases = records.len(), "aggregated releases");
    Snapshot::from_sorted(records)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::*;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn record(repo: &str, tag: &str, hours: i64) -> ReleaseRecord {
        ReleaseRecord {
            repo_name: repo.into(),
            tag_name: tag.into(),
            release_name: tag.into(),
            published_at: base() - Duration::hours(hours),
            url: format!("https://github.com/o/{repo}/releases/tag/{tag}"),
            avatar_url: String::new(),
            changelog: String::new(),
        }
    }

    #[test]
    fn test_two_repositories_interleave() {
        let a = vec![record("a", "a3", 1), record("a", "a2", 10), record("a", "a1", 30)];
        let b = vec![record("b", "b2", 5), record("b", "b1", 20)];

        let snapshot = aggregate([b, a]);
        let tags: Vec<_> = snapshot.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(tags, ["a3", "b2", "a2", "b1", "a1"]);
    }

    #[test]
    fn test_equal_timestamps_keep_arrival_order() {
        let first = vec![record("x", "x1", 4)];
        let second = vec![record("y", "y1", 4)];

        let snapshot = aggregate([first, second]);
        assert_eq!(snapshot.records()[0].repo_name, "x");
        assert_eq!(snapshot.records()[1].repo_name, "y");
    }

    #[test]
    fn test_empty_input() {
        let snapshot = aggregate(Vec::<Vec<ReleaseRecord>>::new());
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_does_not_recap() {
        let many: Vec<_> = (0..5).map(|i| record("a", &format!("t{i}"), i)).collect();
        assert_eq!(aggregate([many]).len(), 5);
    }

    #[test]
    fn test_result_is_non_increasing() {
        let batches = vec![
            vec![record("a", "1", 3), record("a", "2", 7)],
            vec![record("b", "1", 1), record("b", "2", 9), record("b", "3", 12)],
            vec![],
            vec![record("c", "1", 2)],
        ];
        let snapshot = aggregate(batches);
        assert!(snapshot
            .records()
            .windows(2)
            .all(|w| w[0].published_at >= w[1].published_at));
    }
}
