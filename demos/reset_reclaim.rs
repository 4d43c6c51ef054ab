//! Reset demo: reclaiming a key's backlog before it runs.
//!
//! The pool is saturated by blockers, a backlog is queued under one key,
//! then `reset` atomically swaps the queue and hands back every job that had
//! not been dispatched. Reclaimed jobs are plain futures and can be
//! re-submitted later.
//!
//! Run with: `cargo run --example reset_reclaim`

use std::time::Duration;

use fairlane::{FairScheduler, SchedulerConfig};
use tokio::sync::Semaphore;

#[tokio::main]
async fn main() {
    let scheduler: FairScheduler<&str> = FairScheduler::new(SchedulerConfig {
        concurrent: 1,
        workers: 1,
        ..SchedulerConfig::default()
    });

    // Saturate the single worker.
    let gate = std::sync::Arc::new(Semaphore::new(0));
    let blocker_gate = gate.clone();
    let blocker = scheduler
        .submit("blocker", async move {
            let _permit = blocker_gate.acquire().await;
            println!("blocker released");
        })
        .expect("pool accepts work");

    // Backlog under "batch": nothing can run while the worker is held.
    for i in 0..5 {
        scheduler
            .execute("batch", async move {
                println!("batch job {i} ran");
            })
            .expect("pool accepts work");
    }
    println!("pending under 'batch': {}", scheduler.size(&"batch"));

    // Reclaim the whole backlog before any of it dispatches.
    let reclaimed = scheduler.reset(&"batch");
    println!(
        "reclaimed {} jobs; pending now: {}",
        reclaimed.len(),
        scheduler.size(&"batch")
    );

    // Re-enqueue one reclaimed job: it runs once the blocker releases.
    for job in reclaimed.into_iter().take(1) {
        scheduler
            .execute("batch", job)
            .expect("pool accepts work");
    }

    gate.add_permits(1);
    blocker.await.expect("blocker completed");

    scheduler.shutdown();
    scheduler.await_termination(Duration::from_secs(5)).await;
}
