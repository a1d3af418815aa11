use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use jobq::config::QueueConfig;
use jobq::queue::{JobStatus, JobType, ManualClock, Queue, Sweeper};

#[tokio::test]
async fn test_sweeper_requeues_expired_lease() {
    let clock = Arc::new(ManualClock::new());
    let queue = Arc::new(Queue::with_clock(QueueConfig::default(), clock.clone()));

    let job = queue.enqueue(JobType::TimeCritical, 0).await;
    queue.dequeue().await.unwrap();

    let shutdown = CancellationToken::new();
    let sweeper = Sweeper::new(
        queue.clone(),
        Duration::from_millis(20),
        shutdown.child_token(),
    );
    let handle = tokio::spawn(sweeper.run());

    // Age the lease past the timeout and give the sweeper a few ticks.
    clock.advance(Duration::from_secs(301));
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(queue.get_job(job.id).await.unwrap().status, JobStatus::Queued);

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_sweeper_leaves_active_leases_alone() {
    let queue = Arc::new(Queue::new(QueueConfig::default()));

    let job = queue.enqueue(JobType::TimeCritical, 0).await;
    queue.dequeue().await.unwrap();

    let shutdown = CancellationToken::new();
    let sweeper = Sweeper::new(
        queue.clone(),
        Duration::from_millis(10),
        shutdown.child_token(),
    );
    let handle = tokio::spawn(sweeper.run());

    // Many sweeps happen, but the lease is nowhere near its timeout.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(queue.get_job(job.id).await.unwrap().status, JobStatus::InProgress);

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_sweeper_stops_on_cancel() {
    let queue = Arc::new(Queue::new(QueueConfig::default()));

    let shutdown = CancellationToken::new();
    let sweeper = Sweeper::new(queue, Duration::from_secs(3600), shutdown.clone());
    let handle = tokio::spawn(sweeper.run());

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("sweeper did not stop after cancellation")
        .unwrap();
}
