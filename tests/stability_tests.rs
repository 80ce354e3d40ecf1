// Unit tests for the stability filter
//
// These tests verify the sliding-window debouncing of the raw per-frame
// prediction stream: stability requires the last K consecutive observations
// to agree within the time window.

use signstream::StabilityFilter;

#[test]
fn test_stable_exactly_from_fifth_identical_observation() {
    // K=5, W=1000ms: A at 0, 100, 200, 300, 400ms
    let mut filter = StabilityFilter::new(5, 1000);

    for (i, t) in [0u64, 100, 200, 300, 400].iter().enumerate() {
        let signal = filter.observe('A', *t);
        if i < 4 {
            assert!(!signal.is_stable, "observation {} should not be stable", i);
            assert_eq!(signal.character, None);
        } else {
            assert!(signal.is_stable, "fifth observation should be stable");
            assert_eq!(signal.character, Some('A'));
        }
    }
}

#[test]
fn test_stays_stable_while_sign_is_held() {
    let mut filter = StabilityFilter::new(5, 1000);

    for t in (0..=400).step_by(100) {
        filter.observe('B', t);
    }
    let signal = filter.observe('B', 500);
    assert!(signal.is_stable);
    assert_eq!(signal.character, Some('B'));
}

#[test]
fn test_oscillation_never_stabilizes() {
    // Two characters alternating: each reaches the count non-consecutively,
    // but the last K are never all equal
    let mut filter = StabilityFilter::new(5, 1000);

    for i in 0..20u64 {
        let ch = if i % 2 == 0 { 'A' } else { 'B' };
        let signal = filter.observe(ch, i * 50);
        assert!(!signal.is_stable, "alternating input stabilized at step {}", i);
    }
}

#[test]
fn test_jitter_breaks_consecutive_run() {
    let mut filter = StabilityFilter::new(5, 1000);

    filter.observe('A', 0);
    filter.observe('A', 100);
    filter.observe('A', 200);
    filter.observe('A', 300);
    // One misclassified frame resets the run
    assert!(!filter.observe('C', 350).is_stable);
    assert!(!filter.observe('A', 400).is_stable);

    // Four more A's needed before stability returns
    filter.observe('A', 450);
    filter.observe('A', 500);
    filter.observe('A', 550);
    let signal = filter.observe('A', 600);
    assert!(signal.is_stable);
    assert_eq!(signal.character, Some('A'));
}

#[test]
fn test_slow_arrivals_never_accumulate() {
    // Each observation is older than W by the time the next arrives, so the
    // window never holds more than one entry
    let mut filter = StabilityFilter::new(5, 1000);

    for i in 0..10u64 {
        let signal = filter.observe('A', i * 1500);
        assert!(!signal.is_stable);
        assert_eq!(filter.len(), 1);
    }
}

#[test]
fn test_old_entries_are_pruned() {
    let mut filter = StabilityFilter::new(3, 1000);

    filter.observe('A', 0);
    filter.observe('A', 100);
    assert_eq!(filter.len(), 2);

    // 1100ms later both earlier entries have aged out
    let signal = filter.observe('A', 1200);
    assert!(!signal.is_stable);
    assert_eq!(filter.len(), 1);
}

#[test]
fn test_entry_exactly_at_window_edge_is_pruned() {
    // now - observed_at >= W drops the entry
    let mut filter = StabilityFilter::new(2, 1000);

    filter.observe('A', 0);
    let signal = filter.observe('A', 1000);
    assert!(!signal.is_stable);
    assert_eq!(filter.len(), 1);
}

#[test]
fn test_reset_clears_window() {
    let mut filter = StabilityFilter::new(3, 1000);

    filter.observe('A', 0);
    filter.observe('A', 50);
    filter.observe('A', 100);
    filter.reset();
    assert!(filter.is_empty());

    // History before the reset must not count toward stability
    assert!(!filter.observe('A', 150).is_stable);
    assert!(!filter.observe('A', 200).is_stable);
    assert!(filter.observe('A', 250).is_stable);
}

#[test]
fn test_fast_burst_fills_window_sooner() {
    // Bursts faster than the frame rate just reach K earlier
    let mut filter = StabilityFilter::new(5, 1000);

    for i in 0..4u64 {
        assert!(!filter.observe('Z', i).is_stable);
    }
    assert!(filter.observe('Z', 4).is_stable);
}
