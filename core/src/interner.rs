use crate::SharedStr;
use std::collections::HashSet;
use std::sync::Arc;

/// Deduplicates text allocations while the markup parser runs. Repeated
/// cell/list text in generated question banks makes this worthwhile. The
/// shared pointer doubles as the set key, so each distinct string is
/// allocated exactly once.
#[derive(Debug, Default)]
pub struct StringInterner {
    set: HashSet<SharedStr>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self { set: HashSet::new() }
    }

    pub fn intern(&mut self, s: &str) -> SharedStr {
        if let Some(hit) = self.set.get(s) {
            return hit.clone();
        }
        let shared: SharedStr = Arc::from(s);
        self.set.insert(shared.clone());
        shared
    }
}
