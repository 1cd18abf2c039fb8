//! Structured reporting of experimental results as JSON.
//!
//! Values are reported into a thread local tree of JSON objects and arrays.
//! RAII guards open nested objects and collections, dropping a guard closes it again.
//! When the `ReportingGuard` returned by `enable_reporting` is dropped, the whole tree is printed to stdout.
//! Without `enable_reporting` all reporting calls are no-ops, so library code can report unconditionally.

use serde_json::{Map, Value};
use std::cell::RefCell;

pub use serde_json::json;

#[derive(Debug)]
enum Frame {
    Object(Map<String, Value>),
    Collection(Vec<Value>),
}

impl Frame {
    fn into_value(self) -> Value {
        match self {
            Frame::Object(object) => Value::Object(object),
            Frame::Collection(collection) => Value::Array(collection),
        }
    }
}

/// Stack of open frames, the root object at the bottom.
/// Every frame except collection items knows the key it will be stored under in its parent.
#[derive(Debug)]
pub struct Reporter {
    stack: Vec<(Option<String>, Frame)>,
}

impl Default for Reporter {
    fn default() -> Self {
        Reporter {
            stack: vec![(None, Frame::Object(Map::new()))],
        }
    }
}

impl Reporter {
    fn open(&mut self, key: Option<String>, frame: Frame) {
        match (&key, self.stack.last()) {
            (Some(_), Some((_, Frame::Object(_)))) | (None, Some((_, Frame::Collection(_)))) => self.stack.push((key, frame)),
            _ => log::warn!("reporting context {:?} does not fit into the current context", key),
        }
    }

    fn close(&mut self) {
        if self.stack.len() < 2 {
            log::warn!("tried to close the root reporting context");
            return;
        }
        if let Some((key, frame)) = self.stack.pop() {
            let value = frame.into_value();
            match (key, self.stack.last_mut()) {
                (Some(key), Some((_, Frame::Object(parent)))) => {
                    parent.insert(key, value);
                }
                (None, Some((_, Frame::Collection(parent)))) => parent.push(value),
                _ => log::warn!("inconsistent reporting context stack"),
            }
        }
    }

    fn report(&mut self, key: String, val: Value) {
        match self.stack.last_mut() {
            Some((_, Frame::Object(object))) => {
                let prev = object.insert(key, val);
                if prev.is_some() && !cfg!(feature = "report-allow-override") {
                    log::warn!("reported value overrides a previous one");
                }
            }
            _ => log::warn!("cannot report {} directly into a collection", key),
        }
    }

    fn into_root(mut self) -> Value {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().map(|(_, frame)| frame.into_value()).unwrap_or(Value::Null)
    }
}

thread_local! {
    static REPORTER: RefCell<Option<Reporter>> = RefCell::new(None);
}

fn with_reporter(f: impl FnOnce(&mut Reporter)) {
    REPORTER.with(|reporter| {
        if let Some(r) = reporter.borrow_mut().as_mut() {
            f(r)
        }
    });
}

#[must_use]
pub struct ContextGuard(());

impl Drop for ContextGuard {
    fn drop(&mut self) {
        with_reporter(Reporter::close);
    }
}

/// Open a nested object under `key`.
pub fn push_context(key: String) -> ContextGuard {
    with_reporter(|r| r.open(Some(key), Frame::Object(Map::new())));
    ContextGuard(())
}

#[must_use]
pub struct CollectionContextGuard(());

impl Drop for CollectionContextGuard {
    fn drop(&mut self) {
        with_reporter(Reporter::close);
    }
}

/// Open an array under `key`, fill it through `push_collection_item`.
pub fn push_collection_context(key: String) -> CollectionContextGuard {
    with_reporter(|r| r.open(Some(key), Frame::Collection(Vec::new())));
    CollectionContextGuard(())
}

impl CollectionContextGuard {
    pub fn push_collection_item(&mut self) -> CollectionItemContextGuard {
        with_reporter(|r| r.open(None, Frame::Object(Map::new())));
        CollectionItemContextGuard(self)
    }
}

#[must_use]
pub struct CollectionItemContextGuard<'a>(&'a CollectionContextGuard);

impl<'a> Drop for CollectionItemContextGuard<'a> {
    fn drop(&mut self) {
        with_reporter(Reporter::close);
    }
}

pub fn report(key: String, val: Value) {
    if cfg!(feature = "report-to-stderr") {
        eprintln!("{}: {}", key, val);
    }
    report_silent(key, val)
}

pub fn report_silent(key: String, val: Value) {
    with_reporter(|r| r.report(key, val));
}

#[must_use]
pub struct ReportingGuard(());

impl Drop for ReportingGuard {
    fn drop(&mut self) {
        if let Some(reporter) = REPORTER.with(|reporter| reporter.borrow_mut().take()) {
            println!("{}", reporter.into_root());
        }
    }
}

#[macro_export]
macro_rules! report {
    ($k:expr, $($json:tt)+) => { $crate::report::report($k.to_string(), $crate::report::json!($($json)+)) };
}

#[macro_export]
macro_rules! report_silent {
    ($k:expr, $($json:tt)+) => { $crate::report::report_silent($k.to_string(), $crate::report::json!($($json)+)) };
}

/// Start collecting reports on this thread. Everything is printed once the returned guard is dropped.
pub fn enable_reporting(program: &str) -> ReportingGuard {
    REPORTER.with(|reporter| reporter.replace(Some(Reporter::default())));

    report!("program", program);
    report!("crate_version", env!("CARGO_PKG_VERSION"));
    report!("feature_flags", enabled_features());
    if let Ok(since_epoch) = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
        report!("start_time_unix_s", since_epoch.as_secs());
    }
    report!("args", std::env::args().collect::<Vec<String>>());
    if let Ok(workers) = std::env::var("ARC_FLAG_WORKERS") {
        report!("arc_flag_workers_env", workers);
    }

    ReportingGuard(())
}

fn enabled_features() -> Vec<&'static str> {
    let mut features = Vec::new();
    if cfg!(feature = "report-to-stderr") {
        features.push("report-to-stderr");
    }
    if cfg!(feature = "report-allow-override") {
        features.push("report-allow-override");
    }
    features
}

pub mod benchmark;
pub use benchmark::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn take_root() -> Value {
        REPORTER.with(|reporter| reporter.borrow_mut().take()).unwrap().into_root()
    }

    #[test]
    fn nested_contexts_build_a_json_tree() {
        REPORTER.with(|reporter| reporter.replace(Some(Reporter::default())));
        report!("graph", "ocean");
        {
            let _ctx = push_context("preprocessing".to_string());
            report!("num_regions", 64);
        }
        {
            let mut queries = push_collection_context("queries".to_string());
            for from in 0..2 {
                let _item = queries.push_collection_item();
                report!("from", from);
            }
        }

        assert_eq!(
            take_root(),
            json!({
                "graph": "ocean",
                "preprocessing": { "num_regions": 64 },
                "queries": [{ "from": 0 }, { "from": 1 }]
            })
        );
    }

    #[test]
    fn reporting_without_reporter_is_a_noop() {
        report!("ignored", 1);
        let _ctx = push_context("ignored".to_string());
        assert!(REPORTER.with(|reporter| reporter.borrow().is_none()));
    }
}
