//! Basic usage: keyed submission with completion handles.
//!
//! Run with: `cargo run --example basic`

use std::time::Duration;

use fairlane::{FairScheduler, SchedulerConfig};

#[tokio::main]
async fn main() {
    let scheduler: FairScheduler<&str> = FairScheduler::new(SchedulerConfig {
        concurrent: 1,
        workers: 4,
        ..SchedulerConfig::default()
    });

    // Jobs under the same key run in submission order.
    let first = scheduler
        .submit("tenant-a", async {
            println!("tenant-a: first");
            1
        })
        .expect("pool accepts work");
    let second = scheduler
        .submit("tenant-a", async {
            println!("tenant-a: second");
            2
        })
        .expect("pool accepts work");

    // Key-less work goes to the default queue.
    scheduler
        .execute(None, async {
            println!("default queue: hello");
        })
        .expect("pool accepts work");

    assert_eq!(first.await, Ok(1));
    assert_eq!(second.await, Ok(2));

    scheduler.shutdown();
    scheduler.await_termination(Duration::from_secs(5)).await;
    println!("done");
}
