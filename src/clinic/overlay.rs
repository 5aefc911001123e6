//! # Overlay Store
//!
//! Layers local edits over a read-only seed collection and persists them in a
//! [`KeyValueStore`] under one key per [`Namespace`].
//!
//! The persisted state per namespace is a pair:
//!
//! ```text
//! {"items": [ <T>, ... ], "deletedIds": [ "<id>", ... ]}
//! ```
//!
//! `items` holds records created or modified locally, `deletedIds` the
//! tombstones. The two are disjoint: an id is either overridden or deleted.
//!
//! Every call reads the state fresh, and every mutation writes it back before
//! returning. Nothing is cached, so the effective view is always recomputed
//! from (seed, items, tombstones):
//!
//! 1. Seed records keep their order; a seed record whose id has an overlay
//!    item is replaced by it, a tombstoned one is dropped.
//! 2. Overlay items whose id is not in the seed are appended in the order
//!    they were created.
//!
//! Unreadable or malformed state is treated as empty (the caller sees the
//! seed only) and reported through `tracing` and the optional corruption hook.
//! Write failures are returned to the caller.

use crate::error::{ClinicError, Result};
use crate::model::{Namespace, Record};
use crate::store::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

/// Called with the namespace and a description whenever persisted state has
/// to be discarded.
pub type CorruptionHook = Box<dyn Fn(Namespace, &str)>;

/// The persisted overlay for one namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayState<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub deleted_ids: Vec<String>,
}

impl<T> Default for OverlayState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            deleted_ids: Vec::new(),
        }
    }
}

impl<T: Record> OverlayState<T> {
    pub fn is_deleted(&self, id: &str) -> bool {
        self.deleted_ids.iter().any(|d| d == id)
    }

    pub fn item(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    /// Bring hand-edited or legacy state back in line with the invariants:
    /// tombstones are unique, items have non-empty unique ids (last one wins),
    /// and no item is also tombstoned.
    fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.deleted_ids.retain(|id| seen.insert(id.clone()));

        let mut last: HashMap<String, usize> = HashMap::new();
        for (idx, record) in self.items.iter().enumerate() {
            last.insert(record.id().to_string(), idx);
        }
        let mut idx = 0;
        let deleted = &seen;
        self.items.retain(|record| {
            let id = record.id();
            let keep = !id.is_empty() && !deleted.contains(id) && last.get(id) == Some(&idx);
            idx += 1;
            keep
        });
    }

    fn upsert(&mut self, record: T) {
        self.deleted_ids.retain(|d| d != record.id());
        match self.items.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => *slot = record,
            None => self.items.push(record),
        }
    }

    fn fresh_id(&self, seed: &[T]) -> String {
        self.fresh_id_from(seed, || Uuid::new_v4().to_string())
    }

    /// Draw ids from `draw` until one is unused by the seed, the overlay and
    /// the tombstones.
    fn fresh_id_from(&self, seed: &[T], mut draw: impl FnMut() -> String) -> String {
        loop {
            let id = draw();
            if !id.is_empty()
                && self.item(&id).is_none()
                && !self.is_deleted(&id)
                && !seed.iter().any(|r| r.id() == id)
            {
                return id;
            }
        }
    }
}

/// Compute the effective collection from a seed and an overlay.
pub fn merge<T: Record>(seed: &[T], state: &OverlayState<T>) -> Vec<T> {
    let deleted: HashSet<&str> = state.deleted_ids.iter().map(String::as_str).collect();
    let overrides: HashMap<&str, &T> = state.items.iter().map(|r| (r.id(), r)).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(seed.len() + state.items.len());

    for record in seed {
        let id = record.id();
        if deleted.contains(id) || !seen.insert(id) {
            continue;
        }
        match overrides.get(id) {
            Some(local) => out.push((*local).clone()),
            None => out.push(record.clone()),
        }
    }

    for record in &state.items {
        let id = record.id();
        if deleted.contains(id) || !seen.insert(id) {
            continue;
        }
        out.push(record.clone());
    }

    out
}

fn lookup<'a, T: Record>(seed: &'a [T], state: &'a OverlayState<T>, id: &str) -> Option<&'a T> {
    if state.is_deleted(id) {
        return None;
    }
    state
        .item(id)
        .or_else(|| seed.iter().find(|r| r.id() == id))
}

/// Shallow-merge `patch` onto `current`. Top-level patch fields win; the
/// record keeps its id.
pub fn apply_patch<T: Record, P: Serialize + ?Sized>(current: &T, patch: &P) -> Result<T> {
    let Value::Object(fields) = serde_json::to_value(patch)? else {
        return Err(ClinicError::InvalidPatch(
            "patch must be a JSON object".to_string(),
        ));
    };
    let mut base = serde_json::to_value(current)?;
    let Value::Object(target) = &mut base else {
        return Err(ClinicError::InvalidPatch(
            "record does not serialize to a JSON object".to_string(),
        ));
    };
    for (key, value) in fields {
        if key == "id" {
            continue;
        }
        target.insert(key, value);
    }
    let mut merged: T =
        serde_json::from_value(base).map_err(|e| ClinicError::InvalidPatch(e.to_string()))?;
    merged.set_id(current.id().to_string());
    Ok(merged)
}

/// Seed-plus-overlay store over any [`KeyValueStore`].
pub struct OverlayStore<B: KeyValueStore> {
    backend: B,
    pretty_json: bool,
    on_corruption: Option<CorruptionHook>,
}

impl<B: KeyValueStore> OverlayStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            pretty_json: false,
            on_corruption: None,
        }
    }

    pub fn with_pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    pub fn with_corruption_hook(mut self, hook: impl Fn(Namespace, &str) + 'static) -> Self {
        self.on_corruption = Some(Box::new(hook));
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The effective collection for `ns`. Never fails: bad state reads as empty.
    pub fn list<T: Record>(&self, ns: Namespace, seed: &[T]) -> Vec<T> {
        merge(seed, &self.load(ns))
    }

    /// Insert or overwrite `record` in the overlay, generating an id when it
    /// has none. Generated ids never clash with `seed`. Creating a
    /// tombstoned id brings it back.
    pub fn create<T: Record>(&self, ns: Namespace, seed: &[T], mut record: T) -> Result<T> {
        let mut state = self.load::<T>(ns);
        if record.id().is_empty() {
            record.set_id(state.fresh_id(seed));
        }
        state.upsert(record.clone());
        self.save(ns, &state)?;
        debug!(namespace = %ns, id = record.id(), "created record");
        Ok(record)
    }

    /// Merge `patch` onto the current value of `id`. Returns `Ok(None)` when
    /// `id` is not in the effective collection; nothing is written then.
    pub fn update<T: Record, P: Serialize + ?Sized>(
        &self,
        ns: Namespace,
        seed: &[T],
        id: &str,
        patch: &P,
    ) -> Result<Option<T>> {
        let mut state = self.load::<T>(ns);
        let merged = match lookup(seed, &state, id) {
            Some(current) => apply_patch(current, patch)?,
            None => {
                debug!(namespace = %ns, id, "update on unknown id");
                return Ok(None);
            }
        };
        state.upsert(merged.clone());
        self.save(ns, &state)?;
        debug!(namespace = %ns, id, "updated record");
        Ok(Some(merged))
    }

    /// Tombstone `id`. Returns whether it was in the effective collection.
    pub fn delete<T: Record>(&self, ns: Namespace, seed: &[T], id: &str) -> Result<bool> {
        let mut state = self.load::<T>(ns);
        let existed = lookup(seed, &state, id).is_some();
        let had_item = state.item(id).is_some();
        if !had_item && state.is_deleted(id) {
            return Ok(existed);
        }
        state.items.retain(|r| r.id() != id);
        if !state.is_deleted(id) {
            state.deleted_ids.push(id.to_string());
        }
        self.save(ns, &state)?;
        debug!(namespace = %ns, id, existed, "deleted record");
        Ok(existed)
    }

    /// Drop all local edits for `ns`, falling back to the seed.
    pub fn clear(&self, ns: Namespace) -> Result<()> {
        self.backend.remove(ns.key())?;
        debug!(namespace = %ns, "cleared overlay");
        Ok(())
    }

    /// The normalized persisted state for `ns`.
    pub fn overlay<T: Record>(&self, ns: Namespace) -> OverlayState<T> {
        self.load(ns)
    }

    pub fn tombstones<T: Record>(&self, ns: Namespace) -> Vec<String> {
        self.load::<T>(ns).deleted_ids
    }

    fn load<T: Record>(&self, ns: Namespace) -> OverlayState<T> {
        let raw = match self.backend.get(ns.key()) {
            Ok(Some(raw)) => raw,
            Ok(None) => return OverlayState::default(),
            Err(e) => {
                self.report_corruption(ns, &format!("unreadable state: {}", e));
                return OverlayState::default();
            }
        };
        match serde_json::from_str::<OverlayState<T>>(&raw) {
            Ok(mut state) => {
                state.normalize();
                state
            }
            Err(e) => {
                self.report_corruption(ns, &format!("malformed state: {}", e));
                OverlayState::default()
            }
        }
    }

    fn save<T: Record>(&self, ns: Namespace, state: &OverlayState<T>) -> Result<()> {
        let content = if self.pretty_json {
            serde_json::to_string_pretty(state)?
        } else {
            serde_json::to_string(state)?
        };
        self.backend.set(ns.key(), &content)
    }

    fn report_corruption(&self, ns: Namespace, cause: &str) {
        warn!(namespace = %ns, cause, "discarding local overlay state");
        if let Some(hook) = &self.on_corruption {
            hook(ns, cause);
        }
    }
}
