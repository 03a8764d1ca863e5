use std::collections::{BTreeMap, HashMap};

use crate::foundation::core::{FlashKey, WindowId};

/// Where an animation entry applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationScope {
    /// Every window holding the key.
    Broadcast,
    /// Only this window.
    Local(WindowId),
}

/// Per-key values split into broadcast entries and window-local entries.
///
/// A local entry shadows the broadcast entry for the same key in its own window only.
#[derive(Clone, Debug)]
pub struct AnimationTable<T> {
    broadcast: HashMap<FlashKey, T>,
    local: BTreeMap<WindowId, HashMap<FlashKey, T>>,
}

impl<T> Default for AnimationTable<T> {
    fn default() -> Self {
        Self {
            broadcast: HashMap::new(),
            local: BTreeMap::new(),
        }
    }
}

impl<T> AnimationTable<T> {
    /// Insert a broadcast entry; returns the previous one.
    pub fn insert_broadcast(&mut self, key: FlashKey, value: T) -> Option<T> {
        self.broadcast.insert(key, value)
    }

    /// Insert a window-local entry; returns the previous one.
    pub fn insert_local(&mut self, window: WindowId, key: FlashKey, value: T) -> Option<T> {
        self.local.entry(window).or_default().insert(key, value)
    }

    /// Insert under `scope`.
    pub fn insert(&mut self, scope: AnimationScope, key: FlashKey, value: T) -> Option<T> {
        match scope {
            AnimationScope::Broadcast => self.insert_broadcast(key, value),
            AnimationScope::Local(window) => self.insert_local(window, key, value),
        }
    }

    /// Broadcast entry for `key`.
    pub fn get_broadcast(&self, key: &FlashKey) -> Option<&T> {
        self.broadcast.get(key)
    }

    /// Entry visible in `window`: the local one if present, else the broadcast one.
    pub fn get_for(&self, window: WindowId, key: &FlashKey) -> Option<&T> {
        self.local
            .get(&window)
            .and_then(|m| m.get(key))
            .or_else(|| self.broadcast.get(key))
    }

    /// Broadcast entry, or any local entry when there is none.
    pub fn get_any(&self, key: &FlashKey) -> Option<&T> {
        self.broadcast
            .get(key)
            .or_else(|| self.local.values().find_map(|m| m.get(key)))
    }

    /// `true` when `key` has an entry in any scope.
    pub fn contains_any(&self, key: &FlashKey) -> bool {
        self.get_any(key).is_some()
    }

    /// Remove the entry under `scope`.
    pub fn remove(&mut self, scope: AnimationScope, key: &FlashKey) -> Option<T> {
        match scope {
            AnimationScope::Broadcast => self.broadcast.remove(key),
            AnimationScope::Local(window) => {
                let map = self.local.get_mut(&window)?;
                let out = map.remove(key);
                if map.is_empty() {
                    self.local.remove(&window);
                }
                out
            }
        }
    }

    /// Remove every local entry for `key`.
    pub fn remove_local_entries(&mut self, key: &FlashKey) {
        for map in self.local.values_mut() {
            map.remove(key);
        }
        self.local.retain(|_, m| !m.is_empty());
    }

    /// Drop all local entries of `window`.
    pub fn remove_window(&mut self, window: WindowId) {
        self.local.remove(&window);
    }

    /// Total entries across scopes.
    pub fn len(&self) -> usize {
        self.broadcast.len() + self.local.values().map(HashMap::len).sum::<usize>()
    }

    /// `true` when no scope has entries.
    pub fn is_empty(&self) -> bool {
        self.broadcast.is_empty() && self.local.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.broadcast.clear();
        self.local.clear();
    }

    /// Every entry with its scope.
    pub fn iter(&self) -> impl Iterator<Item = (AnimationScope, &FlashKey, &T)> {
        let broadcast = self
            .broadcast
            .iter()
            .map(|(k, v)| (AnimationScope::Broadcast, k, v));
        let local = self.local.iter().flat_map(|(w, m)| {
            m.iter().map(move |(k, v)| (AnimationScope::Local(*w), k, v))
        });
        broadcast.chain(local)
    }

    /// Entries visible in `window`, local entries first, each key at most once.
    pub fn iter_for(&self, window: WindowId) -> impl Iterator<Item = (&FlashKey, &T)> {
        let local = self.local.get(&window);
        let shadowed = move |k: &FlashKey| local.is_some_and(|m| m.contains_key(k));
        local
            .into_iter()
            .flat_map(|m| m.iter())
            .chain(self.broadcast.iter().filter(move |(k, _)| !shadowed(*k)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/coordinator/table.rs"]
mod tests;
