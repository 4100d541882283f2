use adminkit_choices::Choice;
use adminkit_options::{
    CachedOptionSource, DependentOptions, FetchError, LoadStatus, OptionSource, Resolution,
};
use adminkit_test_utils::{GatedOptionSource, StaticOptionSource};
use pretty_assertions::assert_eq;
use futures::future::join_all;
use std::sync::Arc;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn late_response_for_old_key_is_discarded() {
    let source = GatedOptionSource::new();
    let loader = DependentOptions::new(Arc::clone(&source));

    let a = loader.set_dependency("A").unwrap();
    let b = loader.set_dependency("B").unwrap();

    source.release_ok("B", ["b1", "b2"]);
    assert_eq!(b.await.unwrap(), Resolution::Applied(LoadStatus::Ready));

    source.release_ok("A", ["a1"]);
    assert_eq!(a.await.unwrap(), Resolution::Discarded);

    let state = loader.current();
    assert_eq!(state.key.as_str(), Some("B"));
    assert_eq!(state.options, vec![Choice::same("b1"), Choice::same("b2")]);
}

#[tokio::test]
async fn in_order_responses_still_end_on_latest_key() {
    let source = GatedOptionSource::new();
    let loader = DependentOptions::new(Arc::clone(&source));

    let a = loader.set_dependency("A").unwrap();
    let b = loader.set_dependency("B").unwrap();

    source.release_ok("A", ["a1"]);
    assert!(a.await.unwrap().is_discarded());
    assert_eq!(loader.current().status, LoadStatus::Loading);

    source.release_ok("B", ["b1"]);
    b.await.unwrap();
    assert_eq!(loader.current().options, vec![Choice::same("b1")]);
}

#[tokio::test]
async fn stale_failure_does_not_mark_current_key_failed() {
    let source = GatedOptionSource::new();
    let loader = DependentOptions::new(Arc::clone(&source));

    let a = loader.set_dependency("A").unwrap();
    let b = loader.set_dependency("B").unwrap();

    source.release_ok("B", ["b1"]);
    b.await.unwrap();
    source.release("A", Err(FetchError::status(500, "http://x/?k=A")));
    assert!(a.await.unwrap().is_discarded());

    let state = loader.current();
    assert_eq!(state.status, LoadStatus::Ready);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn unmount_discards_in_flight_result() {
    let source = GatedOptionSource::new();
    let loader = DependentOptions::new(Arc::clone(&source));
    let mut rx = loader.subscribe();

    let handle = loader.set_dependency("A").unwrap();
    rx.borrow_and_update();
    drop(loader);

    source.release_ok("A", ["a1"]);
    assert_eq!(handle.await.unwrap(), Resolution::Discarded);
    assert!(!rx.has_changed().unwrap_or(false));
}

#[tokio::test]
async fn watchers_see_loading_then_ready() {
    let source = GatedOptionSource::new();
    let loader = DependentOptions::new(Arc::clone(&source));
    let mut rx = loader.subscribe();

    let handle = loader.set_dependency("2020").unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().status, LoadStatus::Loading);

    source.release_ok("2020", ["p1"]);
    handle.await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().status, LoadStatus::Ready);
}

#[tokio::test]
async fn cached_source_behind_loader() {
    let inner = StaticOptionSource::new().with("2020", [("https://x/1", "1 - Instellen")]);
    let source = Arc::new(CachedOptionSource::new(inner, 8));
    let loader = DependentOptions::new(Arc::clone(&source));

    loader.load("2020").await;
    loader.load("").await;
    let state = loader.load("2020").await;

    assert_eq!(state.status, LoadStatus::Ready);
    assert_eq!(source.inner().calls(), vec!["2020".to_string()]);
}

#[tokio::test]
async fn unknown_key_fails_once() {
    let source = Arc::new(StaticOptionSource::new());
    let loader = DependentOptions::new(Arc::clone(&source));

    let state = loader.load("1999").await;
    assert_eq!(state.status, LoadStatus::Failed);
    assert!(matches!(state.error, Some(FetchError::Status { status: 404, .. })));
    assert_eq!(source.calls().len(), 1);

    assert_err!(source.fetch("1999").await);
}

#[tokio::test]
async fn burst_of_changes_settles_on_the_last_key() {
    let source = GatedOptionSource::new();
    let loader = DependentOptions::new(Arc::clone(&source));

    let keys = ["2017", "2018", "2019", "2020"];
    let handles: Vec<_> = keys
        .iter()
        .map(|key| loader.set_dependency(*key).unwrap())
        .collect();
    for key in keys.iter().rev() {
        source.release_ok(key, [format!("{key}-1")]);
    }

    let resolutions: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| assert_ok!(joined))
        .collect();
    assert_eq!(
        resolutions.iter().filter(|r| r.is_discarded()).count(),
        keys.len() - 1
    );
    assert_eq!(resolutions[3], Resolution::Applied(LoadStatus::Ready));
    assert_eq!(loader.current().options, vec![Choice::same("2020-1")]);
    assert_eq!(source.started(), keys.len());
}
