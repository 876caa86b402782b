//! Optimistic commands
//!
//! Snapshot a list resource, apply a local change, run the remote effect, and
//! either commit or put the snapshot back. The revert only happens if nothing
//! else (a poll, another command) has written the resource in the meantime.

use std::future::Future;
use std::marker::PhantomData;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use crate::state::resource::ResourceView;
use crate::utils::errors::{ViewError, Result};
use crate::utils::logging::log_mutation;

/// What a committed command changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    /// Number of items the local transform touched
    pub applied: usize,
}

/// Transform every item matching `predicate`, returning how many matched
pub fn update_where<T, P, F>(items: Vec<T>, predicate: P, mut update: F) -> (Vec<T>, usize)
where
    P: Fn(&T) -> bool,
    F: FnMut(&mut T),
{
    let mut applied = 0;
    let items = items
        .into_iter()
        .map(|mut item| {
            if predicate(&item) {
                update(&mut item);
                applied += 1;
            }
            item
        })
        .collect();
    (items, applied)
}

/// Drop every item matching `predicate`, returning how many were removed
pub fn remove_where<T, P>(items: Vec<T>, predicate: P) -> (Vec<T>, usize)
where
    P: Fn(&T) -> bool,
{
    let before = items.len();
    let kept: Vec<T> = items.into_iter().filter(|item| !predicate(item)).collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// One optimistic change to a list resource of `T`
pub struct OptimisticCommand<'a, T> {
    view: &'a ResourceView,
    resource: &'a str,
    action: &'a str,
    target: &'a str,
    _items: PhantomData<fn() -> T>,
}

impl<'a, T> OptimisticCommand<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(view: &'a ResourceView, resource: &'a str, action: &'a str, target: &'a str) -> Self {
        Self {
            view,
            resource,
            action,
            target,
            _items: PhantomData,
        }
    }

    /// Apply `transform` locally, then await `remote`
    ///
    /// A transform that touches nothing is rejected before any network call.
    /// When `remote` fails the pre-command snapshot is restored and its error
    /// is returned.
    pub async fn run<Tx, Rx, Fut>(self, transform: Tx, remote: Rx) -> Result<MutationOutcome>
    where
        Tx: FnOnce(Vec<T>) -> (Vec<T>, usize),
        Rx: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<Value>>>,
    {
        let (snapshot, _) = self.view.resource_snapshot(self.resource)?;
        let items: Vec<T> = match &snapshot {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| ViewError::Decode {
                resource: self.resource.to_string(),
                reason: e.to_string(),
            })?,
            None => Vec::new(),
        };

        let (updated, applied) = transform(items);
        if applied == 0 {
            return Err(ViewError::Rejected(format!("{} not found", self.target)));
        }

        let revision = self.view.write_resource(self.resource, serde_json::to_value(&updated)?)?;

        match remote().await {
            Ok(_) => {
                log_mutation(self.view.name(), self.action, self.target, true);
                Ok(MutationOutcome { applied })
            }
            Err(e) => {
                let restored = self.view.restore_resource(self.resource, snapshot, revision);
                if !restored {
                    tracing::debug!(
                        view = %self.view.name(),
                        resource = self.resource,
                        "Resource changed since the optimistic write; leaving the newer data"
                    );
                }
                log_mutation(self.view.name(), self.action, self.target, false);
                Err(e)
            }
        }
    }
}
