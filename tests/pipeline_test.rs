mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{line_input, price, InMemoryOrderRepository, RecordingForwarder};
use order_management::domain::order::OrderStatus;
use order_management::domain::ports::OrderRepository;
use order_management::pipeline::StatusPipeline;

fn pipeline() -> (
    Arc<InMemoryOrderRepository>,
    Arc<RecordingForwarder>,
    StatusPipeline<InMemoryOrderRepository, RecordingForwarder>,
) {
    let repo = Arc::new(InMemoryOrderRepository::default());
    let forwarder = Arc::new(RecordingForwarder::default());
    let pipeline = StatusPipeline::new(Arc::clone(&repo), Arc::clone(&forwarder));
    (repo, forwarder, pipeline)
}

#[tokio::test]
async fn tick_promotes_unprocessed_orders_and_forwards_summaries() {
    let (repo, forwarder, pipeline) = pipeline();
    let id = repo
        .create(
            "Ada".to_string(),
            vec![line_input(3, "29.99"), line_input(2, "4.50")],
        )
        .unwrap();

    pipeline.run_tick().await;

    assert_eq!(repo.status_of(id), Some(OrderStatus::Processed));
    let sent = forwarder.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].order_id, id);
    assert_eq!(sent[0].customer_name, "Ada");
    assert_eq!(sent[0].items_count, 5);
    // 3 * 29.99 + 2 * 4.50
    assert_eq!(sent[0].amount, price("98.97"));
}

#[tokio::test]
async fn second_tick_with_nothing_new_is_a_noop() {
    let (repo, forwarder, pipeline) = pipeline();
    repo.create("Ada".to_string(), vec![line_input(1, "1.00")])
        .unwrap();

    pipeline.run_tick().await;
    let updates_after_first = repo.update_calls.load(Ordering::SeqCst);
    let sent_after_first = forwarder.sent.lock().unwrap().len();

    pipeline.run_tick().await;

    assert_eq!(repo.update_calls.load(Ordering::SeqCst), updates_after_first);
    assert_eq!(forwarder.sent.lock().unwrap().len(), sent_after_first);
}

#[tokio::test]
async fn empty_store_tick_has_no_side_effects() {
    let (repo, forwarder, pipeline) = pipeline();

    pipeline.run_tick().await;

    assert_eq!(repo.update_calls.load(Ordering::SeqCst), 0);
    assert!(forwarder.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn forwarding_failure_is_isolated_to_one_order() {
    let (repo, forwarder, pipeline) = pipeline();
    let first = repo
        .create("Ada".to_string(), vec![line_input(1, "1.00")])
        .unwrap();
    let second = repo
        .create("Grace".to_string(), vec![line_input(2, "2.00")])
        .unwrap();
    forwarder.fail_for.lock().unwrap().insert(first);

    pipeline.run_tick().await;

    // Both status changes stick even though one forward failed.
    assert_eq!(repo.status_of(first), Some(OrderStatus::Processed));
    assert_eq!(repo.status_of(second), Some(OrderStatus::Processed));
    let sent = forwarder.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].order_id, second);
}

#[tokio::test]
async fn persistence_failure_skips_only_that_order() {
    let (repo, forwarder, pipeline) = pipeline();
    let failing = repo
        .create("Ada".to_string(), vec![line_input(1, "1.00")])
        .unwrap();
    let healthy = repo
        .create("Grace".to_string(), vec![line_input(2, "2.00")])
        .unwrap();
    repo.fail_update_for.lock().unwrap().insert(failing);

    pipeline.run_tick().await;

    // The failing order keeps its old status and is never forwarded.
    assert_eq!(repo.status_of(failing), Some(OrderStatus::Unprocessed));
    assert_eq!(repo.status_of(healthy), Some(OrderStatus::Processed));
    let sent = forwarder.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].order_id, healthy);
}

#[tokio::test]
async fn fetch_failure_aborts_the_whole_tick() {
    let (repo, forwarder, pipeline) = pipeline();
    let id = repo
        .create("Ada".to_string(), vec![line_input(1, "1.00")])
        .unwrap();
    repo.fail_status_scan.store(true, Ordering::SeqCst);

    pipeline.run_tick().await;

    assert_eq!(repo.status_of(id), Some(OrderStatus::Unprocessed));
    assert_eq!(repo.update_calls.load(Ordering::SeqCst), 0);
    assert!(forwarder.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn concurrent_ticks_do_not_overlap() {
    let (repo, forwarder, pipeline) = pipeline();
    let id = repo
        .create("Ada".to_string(), vec![line_input(1, "1.00")])
        .unwrap();
    // Keep the first tick busy long enough for the second to fire.
    *forwarder.delay.lock().unwrap() = Some(Duration::from_millis(100));

    tokio::join!(pipeline.run_tick(), pipeline.run_tick());

    // The overlapping tick was skipped, so the order was saved exactly once
    // and forwarded exactly once.
    assert_eq!(repo.update_calls.load(Ordering::SeqCst), 1);
    let sent = forwarder.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].order_id, id);
}
