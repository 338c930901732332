// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Folds repeated heading + definition list pairs into a single table.
//!
//! Weekly plans and side-by-side comparisons tend to come out of the
//! assistant as
//!
//! ```text
//! ### Semana 1
//! - **Formato:** Reel
//! - **Dia:** Terça
//!
//! ### Semana 2
//! - **Formato:** Reel
//! - **Dia:** Quinta
//! ```
//!
//! which reads much better as one table with a row per heading and a
//! column per label.

use crate::markdown::blocks::{Block, Definition, PivotRow, PivotedTable};
use counter::Counter;
use itertools::Itertools;
use log::debug;
use std::collections::BTreeMap;

/// Placeholder for a label that is missing from a row.
pub const MISSING: &str = "—";

/// Fewest heading + definition list pairs that make up a foldable run.
const MIN_RUN: usize = 2;

/// A column's most common value must appear in at least this share of
/// rows, expressed as a fraction `NUMERATOR / DENOMINATOR`.
const MAJORITY: (usize, usize) = (3, 4);

/// Header used for the row title column when the titles have nothing in
/// common.
const DEFAULT_ROW_LABEL: &str = "Item";

/// Replaces every foldable run of heading + definition list pairs in
/// `blocks` with a [`Block::PivotedTable`].
///
/// A run is foldable if it has at least two pairs and at least one label
/// whose most common value is shared by 75% of the rows. Runs that are
/// not foldable are left exactly as they were.
pub fn fold(blocks: Vec<Block>) -> Vec<Block> {
    let mut folded = Vec::with_capacity(blocks.len());
    let mut i = 0;

    while i < blocks.len() {
        let run = run_length(&blocks[i..]);
        if run < MIN_RUN {
            folded.push(blocks[i].clone());
            i += 1;
            continue;
        }

        let end = i + run * 2;
        match pivot(&blocks[i..end]) {
            Some(table) => {
                debug!("folded {run} sections into a pivoted table");
                folded.push(Block::PivotedTable(table));
            }
            None => folded.extend_from_slice(&blocks[i..end]),
        }
        i = end;
    }

    folded
}

/// Number of consecutive heading + definition list pairs at the start of
/// `blocks`.
fn run_length(blocks: &[Block]) -> usize {
    blocks
        .chunks_exact(2)
        .take_while(|pair| {
            matches!(
                pair,
                [Block::Heading { .. }, Block::DefinitionList { .. }]
            )
        })
        .count()
}

fn sections(run: &[Block]) -> Vec<(&str, &[Definition])> {
    run.chunks_exact(2)
        .filter_map(|pair| match pair {
            [Block::Heading { text, .. }, Block::DefinitionList { pairs }] => {
                Some((text.as_str(), pairs.as_slice()))
            }
            _ => None,
        })
        .collect()
}

fn pivot(run: &[Block]) -> Option<PivotedTable> {
    let sections = sections(run);

    let column_labels: Vec<String> = sections
        .iter()
        .flat_map(|(_, pairs)| pairs.iter().map(|pair| pair.label.clone()))
        .unique()
        .collect();
    if column_labels.is_empty() {
        return None;
    }

    let rows: Vec<PivotRow> = sections
        .iter()
        .map(|(title, pairs)| PivotRow {
            title: title.to_string(),
            values: column_labels
                .iter()
                .map(|label| value_for(pairs, label))
                .collect(),
        })
        .collect();

    let majority_value_by_column = majorities(&column_labels, &rows);
    if majority_value_by_column.is_empty() {
        debug!("not folding {} sections: no column has a majority value", rows.len());
        return None;
    }

    let row_label = row_label(&rows);
    Some(PivotedTable {
        row_label,
        column_labels,
        rows,
        majority_value_by_column,
    })
}

fn value_for(pairs: &[Definition], label: &str) -> String {
    pairs
        .iter()
        .find(|pair| pair.label == label && !pair.value.is_empty())
        .map(|pair| pair.value.clone())
        .unwrap_or_else(|| MISSING.to_string())
}

fn majorities(column_labels: &[String], rows: &[PivotRow]) -> BTreeMap<String, String> {
    let (numerator, denominator) = MAJORITY;
    let mut majorities = BTreeMap::new();

    for (column, label) in column_labels.iter().enumerate() {
        let counts: Counter<&str> = rows.iter().map(|row| row.values[column].as_str()).collect();
        let Some((value, count)) = counts.most_common_ordered().into_iter().next() else {
            continue;
        };
        if value != MISSING && count * denominator >= rows.len() * numerator {
            majorities.insert(label.clone(), value.to_string());
        }
    }

    majorities
}

/// The first word of every row title, if they all share one.
fn row_label(rows: &[PivotRow]) -> String {
    let first_words: Vec<&str> = rows
        .iter()
        .map(|row| {
            row.title
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .trim_end_matches(':')
        })
        .collect();

    match first_words.first() {
        Some(first) if !first.is_empty() && first_words.iter().all(|word| word == first) => {
            first.to_string()
        }
        _ => DEFAULT_ROW_LABEL.to_string(),
    }
}
