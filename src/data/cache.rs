//! Memoizing dataset fetcher.
//!
//! Every resource name is fetched at most once per process. The first result,
//! success or failure, is what every later caller sees; entries never expire.
//! Concurrent callers asking for the same name wait on a per-name slot
//! instead of issuing their own request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::data::remote::{HttpTransport, Transport, resource_url};
use crate::error::FetchError;
use crate::io::RawTable;

type FetchResult = Result<Arc<RawTable>, FetchError>;

pub struct DatasetFetcher<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    slots: Mutex<HashMap<String, Arc<OnceLock<FetchResult>>>>,
}

impl<T: Transport> DatasetFetcher<T> {
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch and decode `resource`, or return the cached outcome.
    pub fn fetch(&self, resource: &str) -> FetchResult {
        let slot = {
            // The map only ever gains entries, so a poisoned lock is still usable.
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(resource.to_string()).or_default())
        };

        if let Some(cached) = slot.get() {
            tracing::debug!(resource, "dataset cache hit");
            return cached.clone();
        }

        slot.get_or_init(|| self.load(resource)).clone()
    }

    /// Number of resource names with a settled or in-flight entry.
    pub fn cached_len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn load(&self, resource: &str) -> FetchResult {
        let url = resource_url(&self.base_url, resource);
        tracing::info!(%url, "fetching dataset");

        let text = self.transport.get_text(&url, resource).inspect_err(|e| {
            tracing::warn!(resource, error = %e, "dataset fetch failed");
        })?;

        let table = RawTable::from_csv(&text).map_err(|message| {
            tracing::warn!(resource, %message, "dataset is not valid CSV");
            FetchError::Parse {
                resource: resource.to_string(),
                message,
            }
        })?;

        tracing::debug!(resource, rows = table.len(), columns = table.headers.len(), "dataset decoded");
        Ok(Arc::new(table))
    }
}

impl DatasetFetcher<HttpTransport> {
    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(HttpTransport::new(), base_url)
    }
}
