use std::sync::Mutex;

use super::*;
use crate::page::StaticPage;

fn recording_sink() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |path| sink.lock().unwrap().push(path))
}

#[tokio::test(start_paused = true)]
async fn unchanged_path_emits_nothing() {
    let page = StaticPage::new("/home");
    let (seen, on_change) = recording_sink();
    let watcher = spawn_path_watcher(Arc::new(page), Duration::from_millis(500), on_change);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(seen.lock().unwrap().is_empty(), "stable path must not emit");
    watcher.stop();
}

#[tokio::test(start_paused = true)]
async fn emits_once_per_path_change() {
    let page = StaticPage::new("/home");
    let (seen, on_change) = recording_sink();
    let watcher = spawn_path_watcher(
        Arc::new(page.clone()),
        Duration::from_millis(500),
        on_change,
    );

    // The arm sample must land before the first navigation.
    tokio::task::yield_now().await;
    page.set_path("/pricing");
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(*seen.lock().unwrap(), ["/pricing"]);

    // Holding the same path across many further samples emits nothing new.
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(seen.lock().unwrap().len(), 1);
    watcher.stop();
}

#[tokio::test(start_paused = true)]
async fn revisited_path_counts_again() {
    let page = StaticPage::new("/home");
    let (seen, on_change) = recording_sink();
    let watcher = spawn_path_watcher(
        Arc::new(page.clone()),
        Duration::from_millis(500),
        on_change,
    );

    // The arm sample must land before the first navigation.
    tokio::task::yield_now().await;
    page.set_path("/a");
    tokio::time::sleep(Duration::from_secs(1)).await;
    page.set_path("/b");
    tokio::time::sleep(Duration::from_secs(1)).await;
    page.set_path("/a");
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(*seen.lock().unwrap(), ["/a", "/b", "/a"]);
    watcher.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_ends_sampling() {
    let page = StaticPage::new("/home");
    let (seen, on_change) = recording_sink();
    let watcher = spawn_path_watcher(
        Arc::new(page.clone()),
        Duration::from_millis(500),
        on_change,
    );

    watcher.stop();
    page.set_path("/after");
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(
        seen.lock().unwrap().is_empty(),
        "stopped watcher must not emit"
    );
}

#[test]
fn thread_fallback_samples_without_a_runtime() {
    let page = StaticPage::new("/home");
    let (seen, on_change) = recording_sink();
    let watcher = spawn_path_watcher(
        Arc::new(page.clone()),
        Duration::from_millis(10),
        on_change,
    );
    assert!(matches!(watcher, WatcherHandle::Thread(_)));

    // The arm sample must land before the first navigation.
    std::thread::sleep(Duration::from_millis(50));
    page.set_path("/pricing");
    let deadline = std::time::Instant::now() + Duration::from_secs(2);
    while seen.lock().unwrap().is_empty() {
        assert!(
            std::time::Instant::now() < deadline,
            "fallback watcher never observed the change"
        );
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(*seen.lock().unwrap(), ["/pricing"]);

    watcher.stop();
    std::thread::sleep(Duration::from_millis(50));
    page.set_path("/after");
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(seen.lock().unwrap().len(), 1, "stopped watcher kept emitting");
}
