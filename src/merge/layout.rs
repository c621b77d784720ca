//! Placement of the merged table among the local document's headers.
//!
//! `toml_edit` emits header tables sorted by their recorded document
//! position (stable, so ties keep tree order). Restamping every table of the
//! incoming subtree with one anchor position makes it render as a single
//! contiguous block at the anchor.
use toml_edit::{DocumentMut, Item, Table};

use super::TargetTable;

/// Document position the merged target table should be rendered at.
///
/// In order of preference:
/// 1. the first header of the existing local target table;
/// 2. the local parent's own header (`[tool]`);
/// 3. the last header below the local parent (`[tool.black]`, ...);
/// 4. past the last header of the document.
pub(super) fn anchor_position(doc: &DocumentMut, target: TargetTable) -> usize {
    let root = doc.as_item();

    if let Some(first) = lookup(root, target.segments()).and_then(|item| extent(item).min()) {
        return first;
    }

    if let Some(parent) = lookup(root, target.parent()) {
        if let Some(table) = parent.as_table()
            && !table.is_implicit()
            && let Some(position) = table.position()
        {
            return position;
        }
        if let Some(last) = extent(parent).max() {
            return last;
        }
    }

    extent(root).max().map_or(0, |last| last + 1)
}

/// Give `table` and every table below it the same document position.
pub(super) fn restamp(table: &mut Table, position: usize) {
    table.set_position(position);
    for (_, item) in table.iter_mut() {
        match item {
            Item::Table(child) => restamp(child, position),
            Item::ArrayOfTables(array) => {
                for child in array.iter_mut() {
                    restamp(child, position);
                }
            }
            _ => {}
        }
    }
}

/// The header table rendered first at or below `item`, if any.
///
/// Tables without a header line of their own are skipped; on equal
/// positions the first in tree order wins.
pub(super) fn first_header(item: &Item) -> Option<&Table> {
    let mut headers = Vec::new();
    collect_headers(item, &mut headers);
    headers.into_iter().min_by_key(|table| table.position())
}

/// Return the first header line of a subtree whose tables all share one
/// position, so tree order is render order.
pub(super) fn first_header_mut(table: &mut Table) -> Option<&mut Table> {
    if has_header_line(table) {
        return Some(table);
    }
    for (_, item) in table.iter_mut() {
        match item {
            Item::Table(child) => {
                if let Some(header) = first_header_mut(child) {
                    return Some(header);
                }
            }
            Item::ArrayOfTables(array) => {
                if let Some(first) = array.iter_mut().next() {
                    return Some(first);
                }
            }
            _ => {}
        }
    }
    None
}

/// Whether the document has any header line below its root.
pub(super) fn has_headers(doc: &DocumentMut) -> bool {
    let mut headers = Vec::new();
    for (_, item) in doc.iter() {
        collect_headers(item, &mut headers);
    }
    !headers.is_empty()
}

fn collect_headers<'a>(item: &'a Item, out: &mut Vec<&'a Table>) {
    match item {
        Item::Table(table) => collect_table_headers(table, out),
        Item::ArrayOfTables(array) => {
            for table in array.iter() {
                collect_table_headers(table, out);
            }
        }
        _ => {}
    }
}

fn collect_table_headers<'a>(table: &'a Table, out: &mut Vec<&'a Table>) {
    if has_header_line(table) && table.position().is_some() {
        out.push(table);
    }
    for (_, child) in table.iter() {
        collect_headers(child, out);
    }
}

/// Dotted tables never get a header; implicit ones only once they hold values.
fn has_header_line(table: &Table) -> bool {
    !table.is_dotted() && !(table.is_implicit() && table.get_values().is_empty())
}

fn lookup<'a>(root: &'a Item, path: &[&str]) -> Option<&'a Item> {
    path.iter().try_fold(root, |item, segment| item.get(*segment))
}

/// Positions of every header table at or below `item`.
fn extent(item: &Item) -> std::vec::IntoIter<usize> {
    let mut positions = Vec::new();
    collect_positions(item, &mut positions);
    positions.into_iter()
}

fn collect_positions(item: &Item, out: &mut Vec<usize>) {
    match item {
        Item::Table(table) => {
            out.extend(table.position());
            for (_, child) in table.iter() {
                collect_positions(child, out);
            }
        }
        Item::ArrayOfTables(array) => {
            for table in array.iter() {
                out.extend(table.position());
                for (_, child) in table.iter() {
                    collect_positions(child, out);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn doc(text: &str) -> DocumentMut {
        text.parse().unwrap()
    }

    fn position_of(doc: &DocumentMut, path: &[&str]) -> usize {
        lookup(doc.as_item(), path)
            .and_then(Item::as_table)
            .and_then(Table::position)
            .unwrap()
    }

    #[test]
    fn anchors_at_first_local_target_header() {
        let d = doc("[project]\n[tool.black]\n[tool.ruff.lint]\n[tool.ruff]\n");
        let expected = position_of(&d, &["tool", "ruff", "lint"]);
        assert_eq!(anchor_position(&d, TargetTable::RUFF), expected);
    }

    #[test]
    fn anchors_at_parent_header_when_target_missing() {
        let d = doc("[project]\n[tool]\nx = 1\n[tool.black]\n");
        let expected = position_of(&d, &["tool"]);
        assert_eq!(anchor_position(&d, TargetTable::RUFF), expected);
    }

    #[test]
    fn anchors_after_last_sibling_under_implicit_parent() {
        let d = doc("[tool.black]\n[tool.isort]\n[project]\n");
        let expected = position_of(&d, &["tool", "isort"]);
        assert_eq!(anchor_position(&d, TargetTable::RUFF), expected);
    }

    #[test]
    fn anchors_past_everything_without_parent() {
        let d = doc("[project]\nname = \"x\"\n[build-system]\n");
        let last = position_of(&d, &["build-system"]);
        assert_eq!(anchor_position(&d, TargetTable::RUFF), last + 1);
    }

    #[test]
    fn first_header_follows_document_order() {
        let d = doc("[tool.ruff.lint.isort]\n[tool.ruff.lint]\n[tool.ruff]\n");
        let header = first_header(&d["tool"]["ruff"]).unwrap();
        assert_eq!(header.position(), Some(position_of(&d, &["tool", "ruff", "lint", "isort"])));
    }

    #[test]
    fn first_header_skips_implicit_and_dotted_tables() {
        let d = doc("[tool]\nruff.line-length = 1\n");
        assert!(first_header(&d["tool"]["ruff"]).is_none());

        let d = doc("# keep\n[tool.ruff.lint]\nselect = []\n");
        let header = first_header(&d["tool"]["ruff"]).unwrap();
        assert!(header.contains_key("select"));
    }

    #[test]
    fn first_header_mut_descends_through_implicit_tables() {
        let mut d = doc("[tool.ruff.lint]\nselect = []\n");
        let ruff = d["tool"]["ruff"].as_table_mut().unwrap();
        let header = first_header_mut(ruff).unwrap();
        assert!(header.contains_key("select"));
    }

    #[test]
    fn has_headers_ignores_plain_keys() {
        assert!(!has_headers(&doc("# just a comment\nname = 1\n")));
        assert!(has_headers(&doc("[project]\n")));
    }

    #[test]
    fn restamp_reaches_every_nested_table() {
        let mut d = doc("[tool.ruff]\n[tool.ruff.lint]\n[tool.ruff.lint.isort]\n");
        let ruff = d["tool"]["ruff"].as_table_mut().unwrap();
        restamp(ruff, 42);
        assert_eq!(ruff.position(), Some(42));
        assert_eq!(ruff["lint"].as_table().unwrap().position(), Some(42));
        assert_eq!(
            ruff["lint"]["isort"].as_table().unwrap().position(),
            Some(42)
        );
    }
}
