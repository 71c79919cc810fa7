use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use decant::prelude::*;

/// An injected strategy with observable behavior: a plain mutex-guarded map
/// keyed by the rendered input.
#[derive(Default)]
struct RecordingCache {
    entries: Mutex<HashMap<String, Validated<i64>>>,
    hits: AtomicUsize,
}

impl ValidationCache<i64> for RecordingCache {
    fn get(&self, value: &Value) -> Option<Validated<i64>> {
        let found = self
            .entries
            .lock()
            .expect("cache lock")
            .get(&format!("{value:?}"))
            .cloned();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::SeqCst);
        }
        found
    }

    fn put(&self, value: &Value, result: &Validated<i64>) {
        self.entries
            .lock()
            .expect("cache lock")
            .insert(format!("{value:?}"), result.clone());
    }
}

#[test]
fn injected_strategies_observe_every_call() {
    let cache = Arc::new(RecordingCache::default());
    let validator = cached(IntValidator::new(), cache.clone());

    assert_eq!(validator.validate(&Value::Int(7)), Ok(7));
    assert_eq!(cache.hits.load(Ordering::SeqCst), 0);

    assert_eq!(validator.validate(&Value::Int(7)), Ok(7));
    assert_eq!(cache.hits.load(Ordering::SeqCst), 1);
}

#[test]
fn shared_graphs_validate_concurrently() {
    let validator: Arc<dyn Validator<Vec<i64>>> =
        Arc::new(ListValidator::new(IntValidator::new()));

    let handles: Vec<_> = (0i64..4)
        .map(|n| {
            let shared = validator.clone();
            std::thread::spawn(move || {
                let input = Value::List(vec![Value::Int(n)]);
                shared.validate(&input)
            })
        })
        .collect();

    for (n, handle) in (0i64..).zip(handles) {
        let result = handle.join().expect("thread completes");
        assert_eq!(result, Ok(vec![n]));
    }
}

#[tokio::test]
async fn cached_async_path_also_memoizes() {
    let cache = Arc::new(RecordingCache::default());
    let validator = cached(IntValidator::new(), cache.clone());

    assert_eq!(validator.validate_async(&Value::Int(1)).await, Ok(1));
    assert_eq!(validator.validate_async(&Value::Int(1)).await, Ok(1));
    assert_eq!(cache.hits.load(Ordering::SeqCst), 1);
}
