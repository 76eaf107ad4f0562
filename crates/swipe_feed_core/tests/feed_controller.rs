mod common;

use common::*;
use std::sync::Arc;
use swipe_feed_core::seed::placeholder_cards;
use swipe_feed_core::{
    FeedError, FeedPhase, FeedStore, FetchOutcome, Role, SkipReason, SwipeDirection, Viewer,
};

fn seeker_viewer() -> Viewer {
    Viewer::new("viewer-1", Some("job_seeker"))
}

fn employer_viewer() -> Viewer {
    Viewer::new("viewer-2", Some("employer"))
}

#[tokio::test]
async fn test_first_full_page_keeps_has_more() {
    let source = Arc::new(ScriptedSource::new(employers(13)));
    let controller = controller(source.clone());

    let outcome = controller.ensure_fed(Some(&seeker_viewer())).await;

    assert_eq!(
        outcome,
        FetchOutcome::Applied {
            received: 10,
            appended: 10,
            exhausted: false,
        }
    );
    let feed = controller.feed();
    let feed = feed.lock().await;
    assert_eq!(feed.cards().len(), 10);
    assert!(feed.has_more());
    assert!(!feed.is_loading());
    assert_eq!(feed.current_index(), 0);
    assert_eq!(feed.phase(), FeedPhase::Ready);
}

#[tokio::test]
async fn test_short_page_exhausts_feed() {
    let source = Arc::new(ScriptedSource::new(employers(13)));
    let controller = controller(source.clone());
    let viewer = seeker_viewer();

    controller.ensure_fed(Some(&viewer)).await;
    let outcome = controller.ensure_fed(Some(&viewer)).await;

    assert_eq!(
        outcome,
        FetchOutcome::Applied {
            received: 3,
            appended: 3,
            exhausted: true,
        }
    );
    {
        let feed = controller.feed();
        let feed = feed.lock().await;
        assert_eq!(feed.cards().len(), 13);
        assert!(!feed.has_more());
        assert_eq!(feed.phase(), FeedPhase::Exhausted);
    }

    let offsets: Vec<usize> = source.calls().iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 10]);

    assert_eq!(
        controller.ensure_fed(Some(&viewer)).await,
        FetchOutcome::Skipped(SkipReason::Exhausted)
    );
    assert_eq!(source.calls().len(), 2);
}

#[tokio::test]
async fn test_exact_page_then_empty_page() {
    let source = Arc::new(ScriptedSource::new(employers(10)));
    let controller = controller(source.clone());
    let viewer = seeker_viewer();

    controller.ensure_fed(Some(&viewer)).await;
    assert!(controller.feed().lock().await.has_more());

    let outcome = controller.ensure_fed(Some(&viewer)).await;
    assert_eq!(
        outcome,
        FetchOutcome::Applied {
            received: 0,
            appended: 0,
            exhausted: true,
        }
    );
    let feed = controller.feed();
    let feed = feed.lock().await;
    assert_eq!(feed.cards().len(), 10);
    assert!(!feed.has_more());
}

#[tokio::test]
async fn test_nameless_employer_dropped_but_counted() {
    let mut records = employers(9);
    records.insert(4, employer("emp-nameless", None));
    records.extend(employers(15).into_iter().skip(9));
    let source = Arc::new(ScriptedSource::new(records));
    let controller = controller(source.clone());
    let viewer = seeker_viewer();

    let outcome = controller.ensure_fed(Some(&viewer)).await;
    assert_eq!(
        outcome,
        FetchOutcome::Applied {
            received: 10,
            appended: 9,
            exhausted: false,
        }
    );
    {
        let feed = controller.feed();
        let feed = feed.lock().await;
        assert!(feed.card("emp-nameless").is_none());
        assert!(feed.has_more());
        assert_eq!(feed.source_offset(), 10);
    }

    controller.ensure_fed(Some(&viewer)).await;
    let calls = source.calls();
    assert_eq!(calls[1].offset, 10);
    let feed = controller.feed();
    let feed = feed.lock().await;
    assert_eq!(feed.cards().len(), 15);
}

#[tokio::test]
async fn test_cards_come_from_counterpart_role_only() {
    let viewer = employer_viewer();
    let mut records = job_seekers(3);
    records.push(employer("emp-x", Some("Initech")));
    records.push(job_seeker(&viewer.id));
    records.extend(job_seekers(6).into_iter().skip(3));
    let source = Arc::new(ScriptedSource::unfiltered(records));
    let controller = controller(source.clone());

    controller.ensure_fed(Some(&viewer)).await;

    let calls = source.calls();
    assert_eq!(calls[0].role, Role::JobSeeker);
    assert_eq!(calls[0].exclude_id, viewer.id);
    assert_eq!(calls[0].limit, 10);

    let feed = controller.feed();
    let feed = feed.lock().await;
    assert_eq!(feed.cards().len(), 6);
    assert!(feed.cards().iter().all(|c| c.id.starts_with("seek-")));
    assert!(feed.cards().iter().all(|c| c.id != viewer.id));
}

#[tokio::test]
async fn test_viewer_without_role_is_a_no_op() {
    let source = Arc::new(ScriptedSource::new(employers(5)));
    let controller = controller(source.clone());

    assert_eq!(
        controller.ensure_fed(None).await,
        FetchOutcome::Skipped(SkipReason::NoViewer)
    );
    assert_eq!(
        controller
            .ensure_fed(Some(&Viewer::new("viewer-1", None)))
            .await,
        FetchOutcome::Skipped(SkipReason::RoleUnresolved)
    );

    assert!(source.calls().is_empty());
    let feed = controller.feed();
    let feed = feed.lock().await;
    assert!(feed.has_more());
    assert!(feed.cards().is_empty());
}

#[tokio::test]
async fn test_unknown_role_ends_feed_without_query() {
    let source = Arc::new(ScriptedSource::new(employers(5)));
    let controller = controller(source.clone());

    let outcome = controller
        .ensure_fed(Some(&Viewer::new("viewer-1", Some("recruiter"))))
        .await;

    assert_eq!(
        outcome,
        FetchOutcome::Skipped(SkipReason::UnknownRole("recruiter".to_string()))
    );
    assert!(source.calls().is_empty());
    assert!(!controller.feed().lock().await.has_more());
}

#[tokio::test]
async fn test_query_failure_is_absorbed() {
    let source = Arc::new(ScriptedSource::new(employers(5)));
    source.set_failing(true);
    let controller = controller(source.clone());
    let viewer = seeker_viewer();
    controller.set_viewer(Some(viewer.clone())).await;

    {
        let feed = controller.feed();
        let feed = feed.lock().await;
        assert!(!feed.has_more());
        assert!(!feed.is_loading());
        assert!(feed.cards().is_empty());
        assert_eq!(feed.phase(), FeedPhase::Exhausted);
    }
    assert_eq!(
        controller.ensure_fed(Some(&viewer)).await,
        FetchOutcome::Skipped(SkipReason::Exhausted)
    );
    assert_eq!(source.calls().len(), 1);

    source.set_failing(false);
    let outcome = controller.refresh().await;
    assert_eq!(
        outcome,
        FetchOutcome::Applied {
            received: 5,
            appended: 5,
            exhausted: true,
        }
    );
}

#[tokio::test]
async fn test_concurrent_calls_issue_one_request() {
    let source = Arc::new(ScriptedSource::new(employers(10)));
    let gate = source.hold_next();
    let controller = controller(source.clone());
    let viewer = seeker_viewer();

    let first = tokio::spawn({
        let controller = controller.clone();
        let viewer = viewer.clone();
        async move { controller.ensure_fed(Some(&viewer)).await }
    });
    source.started.notified().await;

    assert!(controller.feed().lock().await.is_loading());
    assert_eq!(
        controller.ensure_fed(Some(&viewer)).await,
        FetchOutcome::Skipped(SkipReason::InFlight)
    );
    assert_eq!(source.calls().len(), 1);

    gate.notify_one();
    let outcome = first.await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Applied { received: 10, .. }));
    assert!(!controller.feed().lock().await.is_loading());
}

#[tokio::test]
async fn test_page_for_previous_role_is_discarded() {
    let mut records = employers(4);
    records.extend(job_seekers(4));
    let source = Arc::new(ScriptedSource::new(records));
    let gate = source.hold_next();
    let controller = controller(source.clone());

    let stale = tokio::spawn({
        let controller = controller.clone();
        async move {
            controller
                .set_viewer(Some(Viewer::new("viewer-1", Some("job_seeker"))))
                .await
        }
    });
    source.started.notified().await;

    let switched = controller
        .set_viewer(Some(Viewer::new("viewer-1", Some("employer"))))
        .await;
    assert!(matches!(switched, FetchOutcome::Applied { received: 4, .. }));

    gate.notify_one();
    assert_eq!(stale.await.unwrap(), FetchOutcome::Discarded);

    let feed = controller.feed();
    let feed = feed.lock().await;
    assert_eq!(feed.cards().len(), 4);
    assert!(feed.cards().iter().all(|c| c.id.starts_with("seek-")));
    assert!(!feed.is_loading());
}

#[tokio::test]
async fn test_swipes_top_up_at_low_water_mark() {
    let source = Arc::new(ScriptedSource::new(employers(13)));
    let controller = controller(source.clone());
    controller.set_viewer(Some(seeker_viewer())).await;

    for n in 0..7 {
        let id = format!("emp-{}", n);
        let outcome = controller.swipe(&id, SwipeDirection::Right).await.unwrap();
        assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::BufferFull));
    }

    let outcome = controller.swipe("emp-7", SwipeDirection::Left).await.unwrap();
    assert!(matches!(outcome, FetchOutcome::Applied { received: 3, .. }));

    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.current_index, 8);
    assert_eq!(snapshot.total, 13);
    assert!(!snapshot.has_more);
    let visible: Vec<&str> = snapshot.visible.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(visible, vec!["emp-8", "emp-9", "emp-10"]);

    let decisions = controller.feed().lock().await.decisions();
    assert_eq!(decisions.liked.len(), 7);
    assert_eq!(decisions.passed, vec!["emp-7"]);
}

#[tokio::test]
async fn test_swipe_with_stale_id_is_rejected() {
    let source = Arc::new(ScriptedSource::new(employers(3)));
    let controller = controller(source.clone());
    controller.set_viewer(Some(seeker_viewer())).await;

    let err = controller
        .swipe("emp-2", SwipeDirection::Right)
        .await
        .unwrap_err();

    assert!(matches!(err, FeedError::CardMismatch { .. }));
    assert_eq!(controller.feed().lock().await.current_index(), 0);
}

#[tokio::test]
async fn test_first_page_replaces_placeholder_seed() {
    let source = Arc::new(ScriptedSource::new(employers(4)));
    let controller =
        controller_with_store(source.clone(), FeedStore::with_seed(placeholder_cards()));

    assert_eq!(controller.snapshot().await.total, placeholder_cards().len());
    controller.set_viewer(Some(seeker_viewer())).await;

    let feed = controller.feed();
    let feed = feed.lock().await;
    assert!(!feed.is_seeded());
    assert_eq!(feed.cards().len(), 4);
    assert_eq!(feed.cards()[0].id, "emp-0");
    assert_eq!(source.calls()[0].offset, 0);
}

#[tokio::test]
async fn test_logout_resets_feed() {
    let source = Arc::new(ScriptedSource::new(employers(4)));
    let controller = controller(source.clone());
    controller.set_viewer(Some(seeker_viewer())).await;
    controller.swipe("emp-0", SwipeDirection::Right).await.unwrap();

    let outcome = controller.set_viewer(None).await;

    assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::NoViewer));
    let feed = controller.feed();
    let feed = feed.lock().await;
    assert!(feed.cards().is_empty());
    assert!(feed.liked_cards().is_empty());
    assert!(feed.has_more());
    assert!(feed.viewer().is_none());
}

#[tokio::test]
async fn test_swipes_top_up_after_ensure_fed() {
    let source = Arc::new(ScriptedSource::new(employers(13)));
    let controller = controller(source.clone());
    let viewer = seeker_viewer();

    controller.ensure_fed(Some(&viewer)).await;
    assert_eq!(controller.feed().lock().await.viewer(), Some(&viewer));

    for n in 0..7 {
        let outcome = controller
            .swipe(&format!("emp-{}", n), SwipeDirection::Left)
            .await
            .unwrap();
        assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::BufferFull));
    }
    let outcome = controller.swipe("emp-7", SwipeDirection::Left).await.unwrap();

    assert!(matches!(outcome, FetchOutcome::Applied { received: 3, .. }));
    let offsets: Vec<usize> = source.calls().iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 10]);
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.total, 13);
    assert!(!snapshot.has_more);
}

#[tokio::test]
async fn test_page_of_dropped_records_fetches_next_page() {
    let mut records: Vec<_> = (0..10)
        .map(|i| employer(&format!("nameless-{}", i), None))
        .collect();
    records.extend(employers(3));
    let source = Arc::new(ScriptedSource::new(records));
    let controller = controller(source.clone());

    let outcome = controller.set_viewer(Some(seeker_viewer())).await;

    assert_eq!(
        outcome,
        FetchOutcome::Applied {
            received: 13,
            appended: 3,
            exhausted: true,
        }
    );
    let offsets: Vec<usize> = source.calls().iter().map(|c| c.offset).collect();
    assert_eq!(offsets, vec![0, 10]);
    let snapshot = controller.snapshot().await;
    assert_eq!(snapshot.current.map(|c| c.id), Some("emp-0".to_string()));
    assert_eq!(snapshot.total, 3);
    assert!(!snapshot.loading);
    assert_eq!(snapshot.phase, FeedPhase::Exhausted);
}

#[tokio::test]
async fn test_failed_first_page_clears_placeholder_seed() {
    let source = Arc::new(ScriptedSource::new(employers(4)));
    source.set_failing(true);
    let controller =
        controller_with_store(source.clone(), FeedStore::with_seed(placeholder_cards()));

    let outcome = controller.set_viewer(Some(seeker_viewer())).await;

    assert_eq!(outcome, FetchOutcome::Failed);
    let feed = controller.feed();
    let feed = feed.lock().await;
    assert!(!feed.is_seeded());
    assert!(feed.current().is_none());
    assert!(feed.cards().is_empty());
    assert_eq!(feed.phase(), FeedPhase::Exhausted);
}
