//! Splicing the upstream `[tool.ruff]` table into a local pyproject.toml.
//!
//! Both documents are parsed with [`toml_edit`], so everything outside the
//! target table (ordering, comments, whitespace) is written back exactly as
//! it was read. Inside the target table upstream wins, except for keys in
//! the [`ExclusionSet`]: those are dropped from upstream and, when the local
//! document has them, the local values are kept.
mod exclusion;
mod layout;

use std::fmt;

use toml_edit::{Decor, DocumentMut, Item, RawString, Table};

use crate::error::{DocumentOrigin, MergeError};

pub use exclusion::ExclusionSet;

/// Fixed location of the synchronized table inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetTable {
    parent: &'static [&'static str],
    leaf: &'static str,
    segments: &'static [&'static str],
}

impl TargetTable {
    /// Ruff's settings table, `[tool.ruff]`.
    pub const RUFF: Self = Self {
        parent: &["tool"],
        leaf: "ruff",
        segments: &["tool", "ruff"],
    };

    /// Every key from the document root down to the table.
    #[must_use]
    pub const fn segments(&self) -> &'static [&'static str] {
        self.segments
    }

    /// Keys leading to the table that holds the target.
    #[must_use]
    pub const fn parent(&self) -> &'static [&'static str] {
        self.parent
    }

    /// Key of the target inside its parent.
    #[must_use]
    pub const fn leaf(&self) -> &'static str {
        self.leaf
    }
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// The updated local document.
    pub document: String,
    /// Upstream keys dropped by the exclusion set, relative to the target table.
    pub excluded: Vec<String>,
    /// Local keys kept because they are excluded, relative to the target table.
    pub preserved: Vec<String>,
    /// Whether `document` differs from the local input.
    pub changed: bool,
}

/// Merge the upstream `[tool.ruff]` table into the local document.
///
/// # Errors
///
/// Returns [`MergeError`] if either document is not valid TOML, if upstream
/// has no (or an empty) `[tool.ruff]`, or if a key on the way to the target
/// table holds a non-table value.
pub fn merge_documents(
    upstream: &str,
    local: &str,
    exclude: &ExclusionSet,
) -> Result<MergeOutcome, MergeError> {
    merge_table(TargetTable::RUFF, upstream, local, exclude)
}

/// Merge the `target` table of `upstream` into `local`.
///
/// # Errors
///
/// See [`merge_documents`].
pub fn merge_table(
    target: TargetTable,
    upstream: &str,
    local: &str,
    exclude: &ExclusionSet,
) -> Result<MergeOutcome, MergeError> {
    let upstream_doc = parse(upstream, DocumentOrigin::Upstream)?;
    let mut local_doc = parse(local, DocumentOrigin::Local)?;

    let mut incoming = extract(&upstream_doc, target)?;
    let excluded = exclude.strip(&mut incoming);

    let anchor = layout::anchor_position(&local_doc, target);
    let has_headers = layout::has_headers(&local_doc);
    let content_before = has_headers || !local_doc.as_table().get_values().is_empty();
    // Without headers the file's trailing comments would render after the
    // new table, so they move above it.
    let leading = if has_headers {
        String::new()
    } else {
        let trailing = raw_str(local_doc.trailing());
        local_doc.set_trailing("");
        trailing
    };
    let parent = local_parent_mut(&mut local_doc, target)?;

    let previous = match parent.get(target.leaf()) {
        None => None,
        Some(item) if item.is_table_like() => Some(item),
        Some(_) => {
            return Err(MergeError::NotATable {
                origin: DocumentOrigin::Local,
                path: target.to_string(),
            });
        }
    };

    let preserved_values = previous.map(|item| exclude.collect(item)).unwrap_or_default();
    let local_decor = previous
        .and_then(layout::first_header)
        .map(|header| header.decor().clone());

    let mut merged = Item::Table(incoming);
    let preserved = ExclusionSet::restore(&mut merged, preserved_values);
    let mut incoming = merged.into_table().unwrap_or_default();

    incoming.set_dotted(false);
    layout::restamp(&mut incoming, anchor);
    if let Some(header) = layout::first_header_mut(&mut incoming) {
        *header.decor_mut() = local_decor.unwrap_or_else(|| {
            let mut decor = Decor::default();
            decor.set_prefix(leading);
            if content_before {
                separate_from_previous(&mut decor);
            }
            decor
        });
    }

    parent.insert(target.leaf(), Item::Table(incoming));

    let document = local_doc.to_string();
    let changed = document != local;
    Ok(MergeOutcome {
        document,
        excluded,
        preserved,
        changed,
    })
}

fn parse(text: &str, origin: DocumentOrigin) -> Result<DocumentMut, MergeError> {
    text.parse::<DocumentMut>()
        .map_err(|source| MergeError::Parse { origin, source })
}

/// Clone the non-empty target table out of the upstream document.
fn extract(doc: &DocumentMut, target: TargetTable) -> Result<Table, MergeError> {
    let missing = || MergeError::MissingTable {
        path: target.to_string(),
    };
    let item = target
        .segments()
        .iter()
        .try_fold(doc.as_item(), |item, segment| item.get(*segment))
        .ok_or_else(missing)?;

    let table = item
        .clone()
        .into_table()
        .map_err(|_| MergeError::NotATable {
            origin: DocumentOrigin::Upstream,
            path: target.to_string(),
        })?;
    if table.is_empty() {
        return Err(missing());
    }
    Ok(table)
}

/// Walk to the table that holds the target, creating implicit tables for
/// missing keys. Inline tables are rejected since they cannot hold headers.
fn local_parent_mut(doc: &mut DocumentMut, target: TargetTable) -> Result<&mut Table, MergeError> {
    let mut table = doc.as_table_mut();
    let mut walked: Vec<&str> = Vec::new();
    for &segment in target.parent() {
        walked.push(segment);
        if !table.contains_key(segment) {
            let mut implicit = Table::new();
            implicit.set_implicit(true);
            table.insert(segment, Item::Table(implicit));
        }
        table = table
            .get_mut(segment)
            .and_then(Item::as_table_mut)
            .ok_or_else(|| MergeError::NotATable {
                origin: DocumentOrigin::Local,
                path: walked.join("."),
            })?;
    }
    Ok(table)
}

/// Ensure a freshly added header is preceded by a blank line.
fn separate_from_previous(decor: &mut Decor) {
    let prefix = decor.prefix().map(raw_str).unwrap_or_default();
    if !prefix.starts_with('\n') {
        decor.set_prefix(format!("\n{prefix}"));
    }
}

fn raw_str(raw: &RawString) -> String {
    raw.as_str().unwrap_or_default().to_string()
}
