//! INFO column expansion using chumsky.
//!
//! ClinVar INFO columns are `;`-separated `KEY=value` entries. Each value
//! is further divided by `|` into segments and each segment by `,` into
//! sub-items, where a sub-item shaped like `key:value` becomes a one-key
//! object. For example `A=1|2,x:y;B=z` expands to
//! `{A: [["1"], ["2", {"x": "y"}]], B: [["z"]]}`.
//!
//! A trailing `|` or `,` does not open an empty last segment or sub-item,
//! so `A=1|2,` expands to `[["1"], ["2"]]`.

use std::collections::BTreeMap;

use chumsky::prelude::*;

use crate::value::{InfoItem, InfoValue};

/// Map of INFO key to its expanded value, ordered by key.
pub type ExpandedInfo = BTreeMap<String, InfoValue>;

/// Drop an empty final element, as left behind by a trailing separator.
fn drop_trailing_empty<T>(mut parts: Vec<T>, is_empty: impl Fn(&T) -> bool) -> Vec<T> {
    if parts.last().is_some_and(is_empty) {
        parts.pop();
    }
    parts
}

/// Create the parser for a single INFO value.
///
/// The grammar accepts every input: any character that is not a
/// separator belongs to a sub-item.
pub fn value_parser() -> impl Parser<char, InfoValue, Error = Simple<char>> {
    let token = filter(|c: &char| *c != ',' && *c != '|')
        .repeated()
        .collect::<String>();

    let segment = token
        .separated_by(just(','))
        .map(|tokens| drop_trailing_empty(tokens, |token| token.is_empty()))
        .map(|tokens| {
            tokens
                .iter()
                .map(|token| InfoItem::from_token(token))
                .collect::<Vec<_>>()
        });

    segment
        .separated_by(just('|'))
        .map(|segments| drop_trailing_empty(segments, |segment| segment.is_empty()))
        .then_ignore(end())
}

/// Expand one INFO value into its segment/sub-item nesting.
pub fn expand_value(value: &str) -> InfoValue {
    // The grammar cannot fail; fall back to the raw value as one item.
    value_parser()
        .parse(value)
        .unwrap_or_else(|_| vec![vec![InfoItem::Bare(value.to_string())]])
}

/// Expand a raw INFO column.
///
/// Entries that are not exactly `KEY=value` with a non-empty value are
/// reported and skipped.
/// A later entry with the same key replaces an earlier one.
pub fn expand_info(info: &str) -> ExpandedInfo {
    let mut result = BTreeMap::new();

    if info == "." {
        return result;
    }

    for entry in info.split(';') {
        if entry.is_empty() {
            continue;
        }

        let mut parts = entry.split('=');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            tracing::warn!("Unexpected key=value data: {}", entry);
            continue;
        };
        if value.is_empty() {
            tracing::warn!("Unexpected key=value data: {}", entry);
            continue;
        }

        result.insert(key.to_string(), expand_value(value));
    }

    result
}
