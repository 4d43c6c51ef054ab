//! Fairness demo: a flooded tenant cannot starve a light one.
//!
//! Tenant "bulk" enqueues a large backlog first; tenant "interactive" then
//! submits a handful of jobs. With one lane per key, both make progress side
//! by side instead of "interactive" waiting for the whole backlog.
//!
//! Run with: `cargo run --example fair_tenants --features logging`

use std::sync::Arc;
use std::time::{Duration, Instant};

use fairlane::{FairScheduler, LogWriter, SchedulerConfig, Subscribe};

#[tokio::main]
async fn main() {
    let scheduler: FairScheduler<&str> = FairScheduler::builder(SchedulerConfig {
        concurrent: 1,
        workers: 2,
        ..SchedulerConfig::default()
    })
    .with_subscribers(vec![Arc::new(LogWriter) as Arc<dyn Subscribe>])
    .build();

    let start = Instant::now();

    let mut handles = Vec::new();
    for i in 0..20 {
        handles.push(
            scheduler
                .submit("bulk", async move {
                    tokio::time::sleep(Duration::from_millis(25)).await;
                    i
                })
                .expect("pool accepts work"),
        );
    }
    for i in 0..3 {
        let started = start;
        handles.push(
            scheduler
                .submit("interactive", async move {
                    tokio::time::sleep(Duration::from_millis(25)).await;
                    println!(
                        "interactive job {i} done after {:?} (not behind 20 bulk jobs)",
                        started.elapsed()
                    );
                    i
                })
                .expect("pool accepts work"),
        );
    }

    for h in handles {
        h.await.expect("job completed");
    }

    scheduler.shutdown();
    scheduler.await_termination(Duration::from_secs(5)).await;
}
