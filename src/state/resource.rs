//! Remote resource view
//!
//! A `ResourceView` fetches a batch of named resources from a `DataSource`,
//! exposes them with a loading flag through a `watch` channel, and can refresh
//! on an interval or when its dependency key (usually the active tab) changes.
//!
//! Every fetch cycle takes a new generation number. A response is applied only
//! if its generation is still current and the view is open, so a superseded or
//! closed view never receives a late write.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;
use crate::services::source::DataSource;
use crate::state::poller::Poller;
use crate::utils::errors::{ViewError, Result};
use crate::utils::logging::log_fetch_cycle;

/// How a resource sits inside its response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// The body is the resource
    Raw,
    /// The resource is under this key, e.g. `{ "alerts": [...] }`
    Key(String),
}

/// One logical resource and the GET that produces it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSpec {
    pub name: String,
    pub path: String,
    pub envelope: Envelope,
}

impl ResourceSpec {
    pub fn raw(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            envelope: Envelope::Raw,
        }
    }

    pub fn enveloped(name: &str, path: &str, key: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            envelope: Envelope::Key(key.to_string()),
        }
    }

    /// Pull the resource out of a response body
    pub fn extract(&self, body: Value) -> Result<Value> {
        match &self.envelope {
            Envelope::Raw => Ok(body),
            Envelope::Key(key) => match body {
                Value::Object(mut map) => map.remove(key).ok_or_else(|| ViewError::Decode {
                    resource: self.name.clone(),
                    reason: format!("missing `{}` in response", key),
                }),
                // Some endpoints skip the envelope and return the list itself
                Value::Array(items) => Ok(Value::Array(items)),
                other => Err(ViewError::Decode {
                    resource: self.name.clone(),
                    reason: format!("expected an object with `{}`, got {}", key, other),
                }),
            },
        }
    }
}

/// Everything a render tree needs from a view
#[derive(Debug, Clone, Default)]
pub struct ResourceState {
    pub data: HashMap<String, Value>,
    pub loading: bool,
    /// Message of the last failed cycle; cleared by the next success
    pub error: Option<String>,
    /// Current fetch cycle
    pub generation: u64,
    /// Bumped on every write to `data`
    pub revision: u64,
    pub dependency: Option<String>,
    pub closed: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ResourceState {
    pub fn has(&self, name: &str) -> bool {
        self.data.contains_key(name)
    }

    /// Decode a stored resource
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        match self.data.get(name) {
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ViewError::Decode {
                    resource: name.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    /// Decode a list resource, empty when it has not been fetched yet
    pub fn items<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        Ok(self.get::<Vec<T>>(name)?.unwrap_or_default())
    }
}

/// Whether a finished fetch cycle reached the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A newer cycle started or the view closed while this one was in flight
    Discarded,
}

struct Inner {
    name: String,
    source: DataSource,
    specs: RwLock<Vec<ResourceSpec>>,
    state: watch::Sender<ResourceState>,
    poller: Mutex<Option<Poller>>,
}

/// Cloneable handle to one remote resource view
#[derive(Clone)]
pub struct ResourceView {
    inner: Arc<Inner>,
}

impl ResourceView {
    pub fn new(name: impl Into<String>, source: DataSource, specs: Vec<ResourceSpec>) -> Self {
        let (state, _) = watch::channel(ResourceState::default());

        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                source,
                specs: RwLock::new(specs),
                state,
                poller: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn source(&self) -> &DataSource {
        &self.inner.source
    }

    pub fn specs(&self) -> Vec<ResourceSpec> {
        self.inner
            .specs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ResourceState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState> {
        self.inner.state.subscribe()
    }

    /// Stream of states, starting with the current one and ending after close
    pub fn changes(&self) -> impl Stream<Item = ResourceState> {
        let mut rx = self.subscribe();

        async_stream::stream! {
            loop {
                let state = rx.borrow_and_update().clone();
                let closed = state.closed;
                yield state;
                if closed || rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn is_closed(&self) -> bool {
        self.inner.state.borrow().closed
    }

    /// Run one fetch cycle over every configured resource
    ///
    /// All requests run concurrently; if any fails the whole batch fails, the
    /// previous data is kept and `error` is set.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        let mut generation = 0;
        let started = self.inner.state.send_if_modified(|s| {
            if s.closed {
                return false;
            }
            s.generation += 1;
            s.loading = true;
            generation = s.generation;
            true
        });
        if !started {
            return Err(ViewError::Closed(self.inner.name.clone()));
        }
        let mut cycle = CycleGuard {
            view: &self.inner.name,
            state: &self.inner.state,
            generation,
            armed: true,
        };

        let specs = self.specs();
        let timer = Instant::now();
        let fetches = specs.iter().map(|spec| async move {
            let body = self.inner.source.get(&spec.path).await?;
            Ok::<_, ViewError>((spec.name.clone(), spec.extract(body)?))
        });
        let outcome = try_join_all(fetches).await;
        let duration_ms = timer.elapsed().as_millis() as u64;

        log_fetch_cycle(&self.inner.name, generation, specs.len(), duration_ms, outcome.is_ok());
        cycle.disarm();

        match outcome {
            Ok(resources) => Ok(self.commit(generation, Ok(resources))),
            Err(e) => {
                self.commit(generation, Err(e.user_message()));
                Err(e)
            }
        }
    }

    fn commit(&self, generation: u64, result: std::result::Result<Vec<(String, Value)>, String>) -> FetchOutcome {
        let applied = self.inner.state.send_if_modified(move |s| {
            if s.closed || s.generation != generation {
                return false;
            }
            s.loading = false;
            match result {
                Ok(resources) => {
                    for (name, value) in resources {
                        s.data.insert(name, value);
                    }
                    s.error = None;
                    s.revision += 1;
                    s.last_updated = Some(Utc::now());
                }
                Err(message) => {
                    s.error = Some(message);
                }
            }
            true
        });

        if applied {
            FetchOutcome::Applied
        } else {
            debug!(view = %self.inner.name, generation = generation, "Discarding stale fetch result");
            FetchOutcome::Discarded
        }
    }

    /// Switch to a new dependency key and the resources it needs
    ///
    /// Returns `Ok(false)` without fetching when the key is unchanged. A change
    /// starts a new cycle, which discards anything still in flight for the old key.
    pub async fn set_dependency(&self, key: &str, specs: Vec<ResourceSpec>) -> Result<bool> {
        let mut closed = false;
        let changed = self.inner.state.send_if_modified(|s| {
            if s.closed {
                closed = true;
                return false;
            }
            if s.dependency.as_deref() == Some(key) {
                return false;
            }
            s.dependency = Some(key.to_string());
            true
        });

        if closed {
            return Err(ViewError::Closed(self.inner.name.clone()));
        }
        if !changed {
            return Ok(false);
        }

        *self.inner.specs.write().unwrap_or_else(PoisonError::into_inner) = specs;
        debug!(view = %self.inner.name, dependency = key, "Dependency changed");
        self.refresh().await?;
        Ok(true)
    }

    /// Refresh every `period` until stopped or closed
    pub fn start_polling(&self, period: Duration) {
        if self.is_closed() {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        let mut poller = Poller::new(self.inner.name.clone(), period);
        poller.start(move || {
            let inner = weak.upgrade()?;
            Some(async move {
                let view = ResourceView { inner };
                if let Err(e) = view.refresh().await {
                    debug!(view = %view.name(), error = %e, "Poll refresh failed");
                }
            })
        });

        let mut slot = self.inner.poller.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut previous) = slot.replace(poller) {
            previous.stop();
        }
    }

    pub fn stop_polling(&self) {
        if let Some(mut poller) = self.inner.poller.lock().unwrap_or_else(PoisonError::into_inner).take() {
            poller.stop();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(Poller::is_running)
            .unwrap_or(false)
    }

    /// Tear the view down; nothing writes to its state afterwards
    pub fn close(&self) {
        self.inner.state.send_if_modified(|s| {
            if s.closed {
                return false;
            }
            s.closed = true;
            s.loading = false;
            s.generation += 1;
            true
        });
        self.stop_polling();
        debug!(view = %self.inner.name, "View closed");
    }

    /// Current value of one resource with the revision it was read at
    pub fn resource_snapshot(&self, name: &str) -> Result<(Option<Value>, u64)> {
        let state = self.inner.state.borrow();
        if state.closed {
            return Err(ViewError::Closed(self.inner.name.clone()));
        }
        Ok((state.data.get(name).cloned(), state.revision))
    }

    /// Overwrite one resource locally, returning the new revision
    pub fn write_resource(&self, name: &str, value: Value) -> Result<u64> {
        let mut revision = None;
        self.inner.state.send_if_modified(|s| {
            if s.closed {
                return false;
            }
            s.data.insert(name.to_string(), value);
            s.revision += 1;
            revision = Some(s.revision);
            true
        });

        revision.ok_or_else(|| ViewError::Closed(self.inner.name.clone()))
    }

    /// Put back an earlier value if nothing else has written since `expected_revision`
    pub fn restore_resource(&self, name: &str, previous: Option<Value>, expected_revision: u64) -> bool {
        self.inner.state.send_if_modified(|s| {
            if s.closed || s.revision != expected_revision {
                return false;
            }
            match previous {
                Some(value) => {
                    s.data.insert(name.to_string(), value);
                }
                None => {
                    s.data.remove(name);
                }
            }
            s.revision += 1;
            true
        })
    }
}

/// Clears `loading` when a fetch cycle is dropped before it commits
///
/// Only the cycle that is still current may clear it; a superseded cycle
/// leaves the flag to its successor.
struct CycleGuard<'a> {
    view: &'a str,
    state: &'a watch::Sender<ResourceState>,
    generation: u64,
    armed: bool,
}

impl CycleGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let generation = self.generation;
        let cleared = self.state.send_if_modified(|s| {
            if s.closed || s.generation != generation || !s.loading {
                return false;
            }
            s.loading = false;
            true
        });
        if cleared {
            debug!(view = %self.view, generation = generation, "Fetch cycle cancelled before commit");
        }
    }
}

impl std::fmt::Debug for ResourceView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceView")
            .field("name", &self.inner.name)
            .field("mode", &self.inner.source.mode())
            .finish_non_exhaustive()
    }
}
