mod common;

use std::{collections::HashMap, sync::Arc, time::Duration};

use common::{context, draft, release, releases, test_config, Failure, FakeUpstream};
use starfeed_core::{aggregate::aggregate, error::FeedError};
use starfeed_events::FeedEvent;
use starfeed_operations::{fetcher::fetch_all, lister::list_all, CancellationToken};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_repositories_capped_and_sorted() {
    let upstream = Arc::new(
        FakeUpstream::new()
            .repo("octo", "a", releases("a", 5, 1, 10))
            .repo("octo", "b", releases("b", 2, 5, 10)),
    );
    let (ctx, _) = context(upstream, test_config());
    let cancel = CancellationToken::new();

    let repos = list_all(&ctx, &cancel).await.unwrap();
    let snapshot = aggregate(fetch_all(&ctx, repos, &cancel).await.unwrap());

    let tags: Vec<_> = snapshot.iter().map(|r| r.tag_name.as_str()).collect();
    assert_eq!(tags, ["a5", "b2", "a4", "b1", "a3"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_listing_follows_pages_until_empty() {
    let mut fake = FakeUpstream::new();
    for i in 0..5 {
        fake = fake.repo("octo", &format!("r{i}"), vec![]);
    }
    let upstream = Arc::new(fake);
    let mut config = test_config();
    config.page_size = Some(2);
    let (ctx, sink) = context(upstream.clone(), config);

    let repos = list_all(&ctx, &CancellationToken::new()).await.unwrap();

    assert_eq!(repos.len(), 5);
    assert_eq!(repos[0].name, "r0");
    assert_eq!(repos[4].name, "r4");
    // pages 1..=3 carry data, page 4 is empty
    assert_eq!(upstream.starred_calls(), 4);
    assert!(sink
        .events()
        .contains(&FeedEvent::ListingComplete { total: 5 }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_listing_failure_on_any_page_aborts() {
    let mut fake = FakeUpstream::new().failing_page(2, Failure::Api(502, "Bad Gateway"));
    for i in 0..3 {
        fake = fake.repo("octo", &format!("r{i}"), releases("t", 1, 1, 1));
    }
    let upstream = Arc::new(fake);
    let mut config = test_config();
    config.page_size = Some(2);
    let (ctx, _) = context(upstream.clone(), config);

    let err = list_all(&ctx, &CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, FeedError::Upstream { status: 502, .. }));
    assert_eq!(upstream.release_calls(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_never_exceeds_ceiling() {
    let mut fake = FakeUpstream::new().delay(Duration::from_millis(25));
    for i in 0..24 {
        fake = fake.repo("octo", &format!("r{i}"), releases("t", 4, i, 1));
    }
    let upstream = Arc::new(fake);
    let (ctx, _) = context(upstream.clone(), test_config());
    let cancel = CancellationToken::new();

    let repos = list_all(&ctx, &cancel).await.unwrap();
    let batches = fetch_all(&ctx, repos, &cancel).await.unwrap();

    assert_eq!(upstream.release_calls(), 24);
    assert_eq!(batches.len(), 24);
    assert!(upstream.max_in_flight() <= 5, "saw {}", upstream.max_in_flight());
    assert!(upstream.max_in_flight() > 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_configured_concurrency_is_respected() {
    let mut fake = FakeUpstream::new().delay(Duration::from_millis(10));
    for i in 0..10 {
        fake = fake.repo("octo", &format!("r{i}"), vec![]);
    }
    let upstream = Arc::new(fake);
    let mut config = test_config();
    config.concurrency = Some(1);
    let (ctx, _) = context(upstream.clone(), config);
    let cancel = CancellationToken::new();

    let repos = list_all(&ctx, &cancel).await.unwrap();
    fetch_all(&ctx, repos, &cancel).await.unwrap();
    assert_eq!(upstream.max_in_flight(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_raised_limits_cannot_exceed_ceiling() {
    let mut fake = FakeUpstream::new().delay(Duration::from_millis(10));
    for i in 0..20 {
        fake = fake.repo("octo", &format!("r{i}"), releases(&format!("r{i}-"), 6, i, 1));
    }
    let upstream = Arc::new(fake);
    let mut config = test_config();
    config.concurrency = Some(12);
    config.per_repo_cap = Some(6);
    let (ctx, _) = context(upstream.clone(), config);
    let cancel = CancellationToken::new();

    let repos = list_all(&ctx, &cancel).await.unwrap();
    let snapshot = aggregate(fetch_all(&ctx, repos, &cancel).await.unwrap());

    assert!(upstream.max_in_flight() <= 5, "saw {}", upstream.max_in_flight());
    let mut per_repo: HashMap<&str, usize> = HashMap::new();
    for record in snapshot.iter() {
        *per_repo.entry(record.repo_name.as_str()).or_default() += 1;
    }
    assert_eq!(per_repo.len(), 20);
    assert!(per_repo.values().all(|&n| n == 3));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_repo_failure_is_contained() {
    let upstream = Arc::new(
        FakeUpstream::new()
            .repo("octo", "a", releases("a", 2, 1, 1))
            .failing_repo("octo", "broken", Failure::Malformed)
            .repo("octo", "c", releases("c", 1, 3, 1)),
    );
    let (ctx, sink) = context(upstream, test_config());
    let cancel = CancellationToken::new();

    let repos = list_all(&ctx, &cancel).await.unwrap();
    let snapshot = aggregate(fetch_all(&ctx, repos, &cancel).await.unwrap());

    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.iter().all(|r| r.repo_name != "broken"));

    assert_eq!(sink.failed_repos(), ["octo/broken"]);
    let events = sink.events();
    assert!(events.contains(&FeedEvent::FetchComplete {
        succeeded: 2,
        failed: 1,
    }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_repository_exceeds_cap() {
    let mut fake = FakeUpstream::new();
    for i in 0..8 {
        fake = fake.repo("octo", &format!("r{i}"), releases(&format!("r{i}-"), 7, i, 3));
    }
    let (ctx, _) = context(Arc::new(fake), test_config());
    let cancel = CancellationToken::new();

    let repos = list_all(&ctx, &cancel).await.unwrap();
    let snapshot = aggregate(fetch_all(&ctx, repos, &cancel).await.unwrap());

    let mut per_repo: HashMap<&str, usize> = HashMap::new();
    for record in &snapshot {
        *per_repo.entry(record.repo_name.as_str()).or_default() += 1;
    }
    assert_eq!(per_repo.len(), 8);
    assert!(per_repo.values().all(|&n| n == 3));
    assert!(snapshot
        .records()
        .windows(2)
        .all(|w| w[0].published_at >= w[1].published_at));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_drafts_are_dropped_before_capping() {
    let upstream = Arc::new(FakeUpstream::new().repo(
        "octo",
        "a",
        vec![
            draft("next"),
            release("v4", 1),
            release("v3", 2),
            release("v2", 3),
            release("v1", 4),
        ],
    ));
    let (ctx, _) = context(upstream, test_config());
    let cancel = CancellationToken::new();

    let repos = list_all(&ctx, &cancel).await.unwrap();
    let batches = fetch_all(&ctx, repos, &cancel).await.unwrap();

    let tags: Vec<_> = batches[0].iter().map(|r| r.tag_name.as_str()).collect();
    assert_eq!(tags, ["v4", "v3", "v2"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cancelled_run_stops_before_network() {
    let upstream = Arc::new(FakeUpstream::new().repo("octo", "a", releases("a", 1, 1, 1)));
    let (ctx, _) = context(upstream.clone(), test_config());
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(matches!(
        list_all(&ctx, &cancel).await,
        Err(FeedError::Cancelled)
    ));
    assert_eq!(upstream.starred_calls(), 0);

    let repos = vec![starfeed_core::model::RepositoryRef {
        owner_login: "octo".into(),
        name: "a".into(),
        owner_avatar_url: String::new(),
    }];
    assert!(matches!(
        fetch_all(&ctx, repos, &cancel).await,
        Err(FeedError::Cancelled)
    ));
    assert_eq!(upstream.release_calls(), 0);
}
