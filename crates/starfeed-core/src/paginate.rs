use crate::model::{Page, Snapshot};

/// Cuts page `page` (1-based) of `page_size` records out of `snapshot`.
///
/// Never fails. Page numbers below 1 select the first page, numbers past
/// the end select the last one, and an empty snapshot has exactly one empty
/// page. A `page_size` of 0 is treated as 1.
pub fn paginate(snapshot: &Snapshot, page: i64, page_size: usize) -> Page<'_> {
    let records = snapshot.records();
    let size = page_size.max(1);
    let total = records.len();
    let total_pages = total.div_ceil(size).max(1);

    let current_page = if page <= 0 {
        1
    } else {
        usize::try_from(page)
            .unwrap_or(usize::MAX)
            .min(total_pages)
    };

    let start = ((current_page - 1) * size).min(total);
    let end = (start + size).min(total);

    Page {
        releases: &records[start..end],
        current_page,
        total_pages,
        prev_page: if current_page > 1 { current_page - 1 } else { 0 },
        next_page: if current_page < total_pages {
            current_page + 1
        } else {
            0
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::model::ReleaseRecord;

    fn snapshot(n: usize) -> Snapshot {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let records = (0..n)
            .map(|i| {
                ReleaseRecord {
                    repo_name: format!("repo{i}"),
                    tag_name: format!("v{i}"),
                    release_name: String::new(),
                    published_at: base - Duration::minutes(i as i64),
                    url: String::new(),
                    avatar_url: String::new(),
                    changelog: String::new(),
                }
            })
            .collect();
        Snapshot::from_sorted(records)
    }

    fn tags(page: &Page) -> Vec<String> {
        page.releases.iter().map(|r| r.tag_name.clone()).collect()
    }

    #[test]
    fn test_first_and_last_page() {
        let s = snapshot(23);

        let first = paginate(&s, 1, 10);
        assert_eq!(first.releases.len(), 10);
        assert_eq!(tags(&first)[0], "v0");
        assert_eq!((first.prev_page, first.next_page), (0, 2));
        assert_eq!(first.total_pages, 3);

        let last = paginate(&s, 3, 10);
        assert_eq!(tags(&last), ["v20", "v21", "v22"]);
        assert_eq!((last.prev_page, last.next_page), (2, 0));
        assert_eq!(last.total_pages, 3);
    }

    #[test]
    fn test_page_past_end_clamps_to_last() {
        let s = snapshot(23);
        let page = paginate(&s, 99, 10);
        assert_eq!(page.current_page, 3);
        assert_eq!(page, paginate(&s, 3, 10));
    }

    #[test]
    fn test_non_positive_page_is_first() {
        let s = snapshot(23);
        assert_eq!(paginate(&s, 0, 10).current_page, 1);
        assert_eq!(paginate(&s, -4, 10), paginate(&s, 1, 10));
        assert_eq!(paginate(&s, i64::MIN, 10).current_page, 1);
        assert_eq!(paginate(&s, i64::MAX, 10).current_page, 3);
    }

    #[test]
    fn test_empty_snapshot_has_one_page() {
        let s = snapshot(0);
        let page = paginate(&s, 5, 10);
        assert!(page.releases.is_empty());
        assert_eq!(page.current_page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_prev());
        assert!(!page.has_next());
    }

    #[test]
    fn test_exact_multiple() {
        let s = snapshot(20);
        let page = paginate(&s, 2, 10);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.releases.len(), 10);
        assert_eq!(page.next_page, 0);
    }

    #[test]
    fn test_zero_page_size() {
        let s = snapshot(3);
        let page = paginate(&s, 2, 0);
        assert_eq!(page.total_pages, 3);
        assert_eq!(tags(&page), ["v1"]);
    }

    #[test]
    fn test_pages_reconstruct_snapshot() {
        for n in [0, 1, 9, 10, 11, 23, 57] {
            for size in [1, 3, 10, 100] {
                let s = snapshot(n);
                let total_pages = paginate(&s, 1, size).total_pages;

                let mut rebuilt = Vec::new();
                for p in 1..=total_pages {
                    let page = paginate(&s, p as i64, size);
                    assert!(page.releases.len() <= size);
                    assert!((1..=total_pages).contains(&page.current_page));
                    rebuilt.extend_from_slice(page.releases);
                }
                assert_eq!(rebuilt, s.records(), "n={n} size={size}");
            }
        }
    }

    #[test]
    fn test_labelled_page() {
        let s = snapshot(2);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let labels: Vec<String> = paginate(&s, 1, 10).labelled(now).map(|(_, l)| l).collect();
        assert_eq!(labels, ["0 seconds ago", "1 minutes ago"]);
    }
}
