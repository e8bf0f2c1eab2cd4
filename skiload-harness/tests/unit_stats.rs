use skiload_common::SkiLoadError;
use skiload_harness::sample::{LatencySample, RequestClass};
use skiload_harness::stats::{aggregate, p99_index, StatisticsAggregator};
use std::sync::Arc;

fn with_latencies(class: RequestClass, latencies: &[u64]) -> Vec<LatencySample> {
    latencies
        .iter()
        .map(|&l| LatencySample::new(class, class.success_code(), 1_000, 1_000 + l).unwrap())
        .collect()
}

#[test]
fn test_single_sample() {
    let samples = vec![LatencySample::new(RequestClass::Read, 200, 1000, 1050).unwrap()];
    let s = aggregate(&samples).unwrap();
    assert_eq!(s.count, 1);
    assert_eq!(s.mean, 50.0);
    assert_eq!(s.median, 50.0);
    assert_eq!(s.max, 50);
    assert_eq!(s.p99, 50);
}

#[test]
fn test_one_to_hundred() {
    let latencies: Vec<u64> = (1..=100).collect();
    let s = aggregate(&with_latencies(RequestClass::Write, &latencies)).unwrap();
    // p99 index ceil(99) - 1 = 98 -> 99th smallest value.
    assert_eq!(s.p99, 99);
    assert_eq!(s.max, 100);
    assert_eq!(s.mean, 50.5);
    assert_eq!(s.median, 50.5);
}

#[test]
fn test_unsorted_input() {
    let s = aggregate(&with_latencies(RequestClass::Read, &[500, 100, 300, 200, 400])).unwrap();
    assert_eq!(s.max, 500);
    assert_eq!(s.median, 300.0);
    assert_eq!(s.mean, 300.0);
    // ceil(4.95) - 1 = 4
    assert_eq!(s.p99, 500);
}

#[test]
fn test_even_median_averages_central_pair() {
    let s = aggregate(&with_latencies(RequestClass::Read, &[40, 10, 30, 20])).unwrap();
    assert_eq!(s.median, 25.0);

    let s = aggregate(&with_latencies(RequestClass::Read, &[3, 8])).unwrap();
    assert_eq!(s.median, 5.5);
}

#[test]
fn test_ties() {
    let s = aggregate(&with_latencies(RequestClass::Write, &[7, 7, 7, 3, 7])).unwrap();
    assert_eq!(s.median, 7.0);
    assert_eq!(s.max, 7);
    assert_eq!(s.p99, 7);
    assert!((s.mean - 6.2).abs() < 1e-9);
}

#[test]
fn test_empty_is_error() {
    assert_eq!(aggregate(&[]), Err(SkiLoadError::EmptySampleSet));
}

#[test]
fn test_aggregate_is_idempotent() {
    let samples = with_latencies(RequestClass::Write, &[13, 2, 99, 41, 41, 8, 1000, 5]);
    assert_eq!(aggregate(&samples), aggregate(&samples));
}

#[test]
fn test_p99_index_always_valid() {
    assert_eq!(p99_index(1), 0);
    assert_eq!(p99_index(2), 1);
    assert_eq!(p99_index(99), 98);
    assert_eq!(p99_index(100), 98);
    assert_eq!(p99_index(101), 99);
    assert_eq!(p99_index(1000), 989);
    for n in 1..5_000 {
        assert!(p99_index(n) < n, "index out of bounds for n={n}");
    }
}

#[test]
fn test_max_and_mean_match_direct_computation() {
    let latencies: Vec<u64> = (0..997u64).map(|i| (i * 7919) % 1013).collect();
    let s = aggregate(&with_latencies(RequestClass::Read, &latencies)).unwrap();
    let expected_mean = latencies.iter().sum::<u64>() as f64 / latencies.len() as f64;
    assert_eq!(s.max, *latencies.iter().max().unwrap());
    assert!((s.mean - expected_mean).abs() < 1e-6);
}

#[test]
fn test_snapshot_separates_classes_and_keeps_insertion_order() {
    let agg = StatisticsAggregator::new();
    agg.record(LatencySample::new(RequestClass::Write, 201, 0, 30).unwrap());
    agg.record(LatencySample::new(RequestClass::Read, 200, 5, 6).unwrap());
    agg.record(LatencySample::new(RequestClass::Write, 500, 10, 12).unwrap());

    assert_eq!(agg.len(RequestClass::Write), 2);
    assert_eq!(agg.len(RequestClass::Read), 1);

    let snap = agg.snapshot();
    assert_eq!(snap.len(), 3);
    assert_eq!(snap.writes.iter().map(|s| s.latency_ms()).collect::<Vec<_>>(), vec![30, 2]);
    assert_eq!(snap.reads[0].status(), 200);
}

#[test]
fn test_snapshot_statistics_leaves_empty_class_out() {
    let agg = StatisticsAggregator::new();
    agg.record(LatencySample::new(RequestClass::Write, 201, 0, 10).unwrap());

    let stats = agg.snapshot().statistics();
    assert_eq!(stats.write.map(|s| s.max), Some(10));
    assert!(stats.read.is_none());
}

#[test]
fn test_snapshot_is_frozen() {
    let agg = StatisticsAggregator::new();
    agg.record(LatencySample::new(RequestClass::Read, 200, 0, 1).unwrap());
    let snap = agg.snapshot();
    agg.record(LatencySample::new(RequestClass::Read, 200, 0, 2).unwrap());
    assert_eq!(snap.reads.len(), 1);
    assert_eq!(agg.len(RequestClass::Read), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_appends_lose_nothing() {
    const WORKERS: u64 = 64;
    const PER_WORKER: u64 = 250;
    let agg = Arc::new(StatisticsAggregator::new());

    let handles: Vec<_> = (0..WORKERS)
        .map(|w| {
            let agg = agg.clone();
            tokio::spawn(async move {
                for k in 0..PER_WORKER {
                    let class = if k % 2 == 0 { RequestClass::Write } else { RequestClass::Read };
                    // Encode (worker, k) in the start timestamp so duplicates are detectable.
                    let start = w * PER_WORKER + k;
                    agg.record(LatencySample::new(class, 200, start, start + 1).unwrap());
                    if k % 16 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.await.unwrap();
    }

    let snap = agg.snapshot();
    assert_eq!(snap.len() as u64, WORKERS * PER_WORKER);

    let mut starts: Vec<u64> = snap.writes.iter().chain(&snap.reads).map(|s| s.start_ms()).collect();
    starts.sort_unstable();
    starts.dedup();
    assert_eq!(starts.len() as u64, WORKERS * PER_WORKER, "duplicated samples");
}
