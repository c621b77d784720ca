//! Keys that are never taken from upstream.
use std::collections::BTreeSet;
use std::fmt;

use toml_edit::{Item, Key, Table, TableLike};

use crate::error::ConfigError;

/// A dotted key path relative to the target table, one segment per key.
type KeyPath = Vec<String>;

/// Set of keys stripped from the incoming table before it is merged.
///
/// Each entry is a TOML key expression:
///
/// - a bare key (`per-file-ignores`) matches that key at any depth inside
///   the target table, so both `tool.ruff.per-file-ignores` and
///   `tool.ruff.lint.per-file-ignores` are covered;
/// - a dotted key (`lint.ignore`, `lint."per-file-ignores"`) matches exactly
///   that path relative to the target table.
///
/// Keys inside arrays of tables are never matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    entries: BTreeSet<KeyPath>,
}

/// A local value sitting at an excluded location, kept across the merge.
#[derive(Debug, Clone)]
pub(super) struct Preserved {
    parent: KeyPath,
    key: Key,
    item: Item,
}

impl ExclusionSet {
    /// Keys excluded when neither the command line nor `[tool.ruff-sync]`
    /// says otherwise.
    pub const DEFAULT_KEYS: &'static [&'static str] = &["per-file-ignores"];

    /// An exclusion set that lets every upstream key through.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: BTreeSet::new(),
        }
    }

    /// Parse exclusion entries written as TOML key expressions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidExclusion`] if an entry is not a valid
    /// (optionally dotted) TOML key.
    pub fn parse<I, S>(keys: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = BTreeSet::new();
        for raw in keys {
            let raw = raw.as_ref();
            let path = Key::parse(raw).map_err(|e| ConfigError::InvalidExclusion {
                key: raw.to_string(),
                message: e.message().trim().to_string(),
            })?;
            entries.insert(path.iter().map(|k| k.get().to_string()).collect());
        }
        Ok(Self { entries })
    }

    /// Number of entries in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set lets every upstream key through.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the key at `path` (relative to the target table) is excluded.
    #[must_use]
    pub fn matches(&self, path: &[String]) -> bool {
        self.entries.iter().any(|entry| match entry.as_slice() {
            [name] => path.last() == Some(name),
            exact => exact == path,
        })
    }

    /// Remove every excluded key from `table`, returning the removed paths.
    pub(super) fn strip(&self, table: &mut Table) -> Vec<String> {
        let mut removed = Vec::new();
        if !self.is_empty() {
            self.strip_in(table, &mut Vec::new(), &mut removed);
        }
        removed
    }

    fn strip_in(&self, table: &mut dyn TableLike, path: &mut KeyPath, removed: &mut Vec<String>) {
        let keys: Vec<String> = table.iter().map(|(key, _)| key.to_string()).collect();
        for key in keys {
            path.push(key.clone());
            if self.matches(path) {
                table.remove(&key);
                removed.push(display_path(path));
            } else if let Some(child) = table.get_mut(&key).and_then(Item::as_table_like_mut) {
                self.strip_in(child, path, removed);
            }
            path.pop();
        }
    }

    /// Copy every excluded value out of the local target table.
    pub(super) fn collect(&self, local: &Item) -> Vec<Preserved> {
        let mut found = Vec::new();
        if let Some(table) = local.as_table_like()
            && !self.is_empty()
        {
            self.collect_in(table, &mut Vec::new(), &mut found);
        }
        found
    }

    fn collect_in(&self, table: &dyn TableLike, path: &mut KeyPath, found: &mut Vec<Preserved>) {
        for (name, item) in table.iter() {
            let parent = path.clone();
            path.push(name.to_string());
            if self.matches(path) {
                if let Some((key, _)) = table.get_key_value(name) {
                    found.push(Preserved {
                        parent,
                        key: key.clone(),
                        item: item.clone(),
                    });
                }
            } else if let Some(child) = item.as_table_like() {
                self.collect_in(child, path, found);
            }
            path.pop();
        }
    }

    /// Put preserved local values back into the merged table, creating
    /// implicit parent tables as needed. Returns the restored paths.
    pub(super) fn restore(merged: &mut Item, preserved: Vec<Preserved>) -> Vec<String> {
        let mut restored = Vec::new();
        for Preserved { parent, key, item } in preserved {
            let Some(slot) = descend(merged, &parent) else {
                continue;
            };
            match slot {
                Item::Table(table) => {
                    table.insert_formatted(&key, item);
                }
                other => match other.as_table_like_mut() {
                    Some(table) => {
                        table.insert(key.get(), item);
                    }
                    None => continue,
                },
            }
            let mut path = parent;
            path.push(key.get().to_string());
            restored.push(display_path(&path));
        }
        restored
    }

    /// Entries rendered as dotted keys, in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(|entry| display_path(entry))
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self {
            entries: Self::DEFAULT_KEYS
                .iter()
                .map(|key| vec![(*key).to_string()])
                .collect(),
        }
    }
}

impl fmt::Display for ExclusionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.iter().collect();
        f.write_str(&joined.join(", "))
    }
}

/// Walk `path` below `item`, inserting implicit tables for missing segments.
fn descend<'a>(item: &'a mut Item, path: &[String]) -> Option<&'a mut Item> {
    let Some((first, rest)) = path.split_first() else {
        return Some(item);
    };
    let table = item.as_table_like_mut()?;
    if !table.contains_key(first) {
        let mut implicit = Table::new();
        implicit.set_implicit(true);
        table.insert(first, Item::Table(implicit));
    }
    descend(table.get_mut(first)?, rest)
}

/// Render a key path the way it would be written in TOML.
pub(super) fn display_path(path: &[String]) -> String {
    path.iter()
        .map(|segment| Key::new(segment.as_str()).display_repr().into_owned())
        .collect::<Vec<_>>()
        .join(".")
}
