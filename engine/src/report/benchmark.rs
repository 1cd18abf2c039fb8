//! A few utilities to measure how long executing algorithms takes.

use std::sync::atomic::{compiler_fence, Ordering::SeqCst};
use std::time::*;

/// Measure how long it takes to execute the given lambda,
/// log the time, report it as `running_time_ms` and return the result of the lambda.
pub fn report_time<Out, F: FnOnce() -> Out>(name: &str, f: F) -> Out {
    report_time_with_key(name, "running_time_ms", f)
}

/// Like `report_time` but reports under the given key.
pub fn report_time_with_key<Out, F: FnOnce() -> Out>(name: &str, key: &'static str, f: F) -> Out {
    log::info!("starting {}", name);
    let (res, t_passed) = measure(f);
    let t_passed = t_passed.as_secs_f64() * 1000.0;
    log::info!("{} done - took: {}ms", name, t_passed);
    report!(key, t_passed);
    res
}

/// Measure how long it takes to execute the given lambda
/// and return a tuple of the result of the lambda and a duration object.
pub fn measure<Out, F: FnOnce() -> Out>(f: F) -> (Out, Duration) {
    compiler_fence(SeqCst);
    let start = Instant::now();
    let res = f();
    let t_passed = start.elapsed();
    compiler_fence(SeqCst);
    (res, t_passed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_passes_results_through() {
        let (value, time) = measure(|| 6 * 7);
        assert_eq!(value, 42);
        assert!(time < Duration::from_secs(60));
        assert_eq!(report_time("answer", || "forty two"), "forty two");
        assert_eq!(report_time_with_key("answer", "answer_ms", || 42), 42);
    }
}
