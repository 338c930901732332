// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Caption variants.
//!
//! The `[LEGENDA]` region holds up to three captions, one per variation:
//!
//! ```text
//! V1: Primeira legenda
//! V2: Segunda legenda,
//! que continua aqui
//! V3: Terceira legenda
//! ```
//!
//! A variation may also carry its own caption under a `Legenda:` label.

use crate::markdown::blocks::parse_label;
use crate::text;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:[-*]\s*)?(?:\*\*)?\s*V([1-3])\s*(?:\*\*)?\s*:\s*(?:\*\*)?\s*(.*)$").unwrap()
});

static INLINE_CAPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^legenda(?:\s+sugerida)?\s*:\s*(.*)$").unwrap());

static FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}][\p{L}\s]{0,40}:(?:\s|$)").unwrap());

/// A caption for one variation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Caption {
    /// `V1`, `V2`, or `V3`.
    pub label: String,
    pub text: String,
}

impl Caption {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Splits a `[LEGENDA]` region into captions, in source order.
///
/// Each caption runs from its `V<n>:` marker to the next marker or the end
/// of the region. A region with text but no markers at all is a single
/// `V1` caption.
///
/// # Examples
///
/// ```
/// use chatmark::script::{Caption, parse_legenda};
/// let captions = parse_legenda("V1: Primeira\nV2: Segunda");
/// assert_eq!(captions, vec![Caption::new("V1", "Primeira"), Caption::new("V2", "Segunda")]);
/// ```
pub fn parse_legenda(region: &str) -> Vec<Caption> {
    let mut captions = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;
    let mut saw_marker = false;

    for line in region.lines() {
        if let Some(caps) = MARKER.captures(line) {
            saw_marker = true;
            if let Some((label, lines)) = current.take() {
                push_caption(&mut captions, label, &lines);
            }
            let first = caps.get(2).map_or("", |m| m.as_str());
            current = Some((format!("V{}", &caps[1]), vec![first]));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some((label, lines)) = current.take() {
        push_caption(&mut captions, label, &lines);
    }

    if !saw_marker && !region.trim().is_empty() {
        captions.push(Caption::new("V1", region.trim()));
    }

    captions
}

fn push_caption(captions: &mut Vec<Caption>, label: String, lines: &[&str]) {
    let text = lines.join("\n");
    let text = text::tidy_markers(text.trim());
    if !text.is_empty() {
        captions.push(Caption { label, text });
    }
}

/// Finds a caption given inside a variation under a `Legenda:` label.
///
/// The caption is the value on the label line plus any following lines,
/// up to a blank line or the next label.
pub fn inline_caption(lines: &[&str]) -> Option<String> {
    let start = lines
        .iter()
        .position(|line| INLINE_CAPTION.is_match(&normalize(line)))?;

    let first = normalize(lines[start]);
    let first = INLINE_CAPTION
        .captures(&first)
        .and_then(|caps| caps.get(1))
        .map_or_else(String::new, |m| m.as_str().trim().to_string());

    let rest = lines[start + 1..]
        .iter()
        .map(|line| line.trim())
        .take_while(|line| !line.is_empty() && !is_field(line));

    let caption = std::iter::once(first.as_str())
        .chain(rest)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if caption.is_empty() { None } else { Some(caption) }
}

fn normalize(line: &str) -> String {
    text::strip_bold(text::strip_bullet(line))
}

/// True if `line` starts another labelled field or a new structure.
fn is_field(line: &str) -> bool {
    is_heading(line)
        || line.starts_with('|')
        || parse_label(text::strip_bullet(line)).is_some()
        || FIELD.is_match(&normalize(line))
}

/// A Markdown heading, as opposed to a hashtag.
fn is_heading(line: &str) -> bool {
    line.starts_with('#') && line.trim_start_matches('#').starts_with(char::is_whitespace)
}
