use ringmpmc_rs::{BoundedMpmcQueue, Config};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Instant;

fn main() {
    println!("ringmpmc-rs basic demo");
    println!("=======================\n");

    let config = Config::new(4096).unwrap().with_metrics(true);
    let queue = Arc::new(BoundedMpmcQueue::<u64>::with_config(config));

    const N_PRODUCERS: usize = 4;
    const N_CONSUMERS: usize = 4;
    const ITEMS_PER_PRODUCER: usize = 1_000_000;

    println!("Configuration:");
    println!("  Capacity: {}", queue.capacity());
    println!("  Producers: {N_PRODUCERS}");
    println!("  Consumers: {N_CONSUMERS}");
    println!("  Items per producer: {ITEMS_PER_PRODUCER}");
    println!("  Total items: {}\n", N_PRODUCERS * ITEMS_PER_PRODUCER);

    // All producer and consumer threads wait on this before entering their
    // loop, so the timed region below starts at first push/pop rather than
    // including the skew of however long the OS took to schedule each
    // spawned thread.
    let barrier = Arc::new(Barrier::new(N_PRODUCERS + N_CONSUMERS));

    let producers: Vec<_> = (0..N_PRODUCERS)
        .map(|id| {
            let q = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..ITEMS_PER_PRODUCER {
                    q.push((id * ITEMS_PER_PRODUCER + i) as u64);
                }
                println!("producer {id} finished");
            })
        })
        .collect();

    let total_items = N_PRODUCERS * ITEMS_PER_PRODUCER;
    let per_consumer = total_items / N_CONSUMERS;
    let consumers: Vec<_> = (0..N_CONSUMERS)
        .map(|id| {
            let q = Arc::clone(&queue);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut sum = 0u64;
                for _ in 0..per_consumer {
                    sum += q.pop();
                }
                println!("consumer {id} finished");
                sum
            })
        })
        .collect();

    let start = Instant::now();
    for p in producers {
        p.join().unwrap();
    }
    let sum: u64 = consumers.into_iter().map(|c| c.join().unwrap()).sum();
    let duration = start.elapsed();

    println!("\nResults:");
    println!("  Items consumed: {total_items}");
    println!("  Sum: {sum}");
    println!("  Duration: {duration:.2?}");
    println!(
        "  Throughput: {:.2} million items/sec",
        total_items as f64 / duration.as_secs_f64() / 1_000_000.0
    );

    if let Some(snapshot) = queue.metrics() {
        println!("\nMetrics:");
        println!("{snapshot:#?}");
    }
}
