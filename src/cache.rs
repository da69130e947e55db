// Time-bounded cache for the reshaped cost table.
//
// Every interaction re-reads the table through `cost_table`, which only
// touches the file again once the cached copy is older than the TTL.
use crate::error::Result;
use crate::loader::load_cost_table;
use crate::types::LongCostRecord;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CacheEntry<T> {
    value: Arc<T>,
    loaded_at: Instant,
    source: PathBuf,
}

/// A single cached value with the instant it was produced.
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<CacheEntry<T>>,
}

impl<T> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = ttl;
    }

    /// Return the cached value for `source` if it is still fresh at `now`,
    /// otherwise run `load` and cache its result. Failed loads are not cached.
    pub fn get_or_load_at<F>(&mut self, source: &Path, now: Instant, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        if let Some(entry) = &self.entry {
            let age = now.saturating_duration_since(entry.loaded_at);
            if entry.source == source && age < self.ttl {
                debug!(age_secs = age.as_secs(), "cost table cache hit");
                return Ok(Arc::clone(&entry.value));
            }
        }

        let value = Arc::new(load(source)?);
        self.entry = Some(CacheEntry {
            value: Arc::clone(&value),
            loaded_at: now,
            source: source.to_path_buf(),
        });
        Ok(value)
    }
}

static COST_CACHE: Lazy<Mutex<TtlCache<Vec<LongCostRecord>>>> =
    Lazy::new(|| Mutex::new(TtlCache::new(DEFAULT_TTL)));

/// The long-form cost table for `path`, loaded at most once per `ttl`.
pub fn cost_table(path: &Path, ttl: Duration) -> Result<Arc<Vec<LongCostRecord>>> {
    let mut cache = COST_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache.set_ttl(ttl);
    cache.get_or_load_at(path, Instant::now(), |p| {
        info!(path = %p.display(), "loading cost table");
        load_cost_table(p).map(|(table, _)| table)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;
    use std::cell::Cell;

    #[test]
    fn serves_cached_value_within_ttl() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        let calls = Cell::new(0);
        let t0 = Instant::now();
        let load = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok(vec![1, 2, 3])
        };
        let a = cache.get_or_load_at(Path::new("a.csv"), t0, load).unwrap();
        let b = cache
            .get_or_load_at(Path::new("a.csv"), t0 + Duration::from_secs(59), load)
            .unwrap();
        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn reloads_after_expiry() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        let calls = Cell::new(0);
        let t0 = Instant::now();
        let load = |_: &Path| {
            calls.set(calls.get() + 1);
            Ok(calls.get())
        };
        cache.get_or_load_at(Path::new("a.csv"), t0, load).unwrap();
        let v = cache
            .get_or_load_at(Path::new("a.csv"), t0 + Duration::from_secs(60), load)
            .unwrap();
        assert_eq!(*v, 2);
    }

    #[test]
    fn reloads_when_source_changes() {
        let mut cache = TtlCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.get_or_load_at(Path::new("a.csv"), t0, |_| Ok("a")).unwrap();
        let v = cache.get_or_load_at(Path::new("b.csv"), t0, |_| Ok("b")).unwrap();
        assert_eq!(*v, "b");
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut cache: TtlCache<u8> = TtlCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        let err = cache.get_or_load_at(Path::new("a.csv"), t0, |_| {
            Err(DashboardError::NoData("empty".into()))
        });
        assert!(err.is_err());
        let v = cache.get_or_load_at(Path::new("a.csv"), t0, |_| Ok(7)).unwrap();
        assert_eq!(*v, 7);
    }

    #[test]
    fn global_accessor_reads_the_file_once() {
        use std::io::Write;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("costs.csv");
        let mut header = String::from("User,name,email,department,staff,student");
        for p in crate::schema::periods() {
            header.push(',');
            header.push_str(&crate::schema::period_label(p));
        }
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{header}").unwrap();
        writeln!(f, "u1,Ada,ada@example.org,cs,1,0,1,2,3,4,5,6,7,8").unwrap();
        drop(f);

        let first = cost_table(&path, Duration::from_secs(600)).unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = cost_table(&path, Duration::from_secs(600)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 8);
    }
}
