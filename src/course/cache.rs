use std::sync::Mutex;

use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};

use crate::course::{scoring::score_courses, Course, ScoredCourse};

static SCORE_CACHE: Lazy<Mutex<Option<(String, Vec<ScoredCourse>)>>> =
    Lazy::new(|| Mutex::new(None));

/// Identity key for a course list: digest of its canonical JSON form. A new
/// list (even reordered) gets a new key and a fresh derivation.
pub fn fingerprint(courses: &[Course]) -> String {
    let canonical = serde_json::to_string(courses).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Memoized scoring over the most recent input list. A changed list evicts
/// the previous entry, so memory stays flat in long-running processes.
pub fn scored(courses: &[Course]) -> Vec<ScoredCourse> {
    let key = fingerprint(courses);
    {
        let guard = SCORE_CACHE.lock().expect("score cache mutex poisoned");
        if let Some((cached_key, cached)) = guard.as_ref() {
            if *cached_key == key {
                return cached.clone();
            }
        }
    }
    let derived = score_courses(courses);
    let mut guard = SCORE_CACHE.lock().expect("score cache mutex poisoned");
    *guard = Some((key, derived.clone()));
    derived
}
