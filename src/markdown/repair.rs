// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Repairs known glitches in planning messages before they are parsed.
//!
//! Planning messages occasionally come back with the day of the week on a
//! line of its own instead of at the end of the bullet it belongs to, often
//! with the bullet's bold label left unclosed:
//!
//! ```text
//! - **Reel: Bastidores da produção
//! Dia: Terça
//! ```
//!
//! [`repair_planning_markdown()`] rewrites that into
//!
//! ```text
//! - **Reel:** Bastidores da produção — Dia: Terça
//! ```
//!
//! Fenced code blocks, blockquotes, and inline code spans are never
//! touched. Everything else passes through unchanged, byte for byte.

use crate::markdown::blocks::parse_label;
use crate::text;
use log::debug;
use regex::Regex;
use std::sync::LazyLock;

static BULLET_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:[-*•]|\d+\.)\s+").unwrap());

static DAY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:\*\*)?dia(?:\*\*)?\s*:(?:\*\*)?\s*(\S.*?)\s*$").unwrap());

const FENCE: &str = "```";

const BOLD: &str = "**";

/// Moves stray `Dia:` lines onto the bullet before them, closing that
/// bullet's dangling bold label if it has one. Bullets not followed by a
/// `Dia:` line are left as they are.
///
/// # Examples
///
/// ```
/// use chatmark::markdown::repair_planning_markdown;
/// let text = "- **Reel: Bastidores\nDia: Terça";
/// assert_eq!(repair_planning_markdown(text), "- **Reel:** Bastidores — Dia: Terça");
/// ```
///
/// Text inside fenced code blocks is left alone:
///
/// ```
/// use chatmark::markdown::repair_planning_markdown;
/// let text = "```\n- Reel\nDia: Terça\n```";
/// assert_eq!(repair_planning_markdown(text), text);
/// ```
pub fn repair_planning_markdown(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut repaired = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        if line.trim_start().starts_with(FENCE) {
            in_fence = !in_fence;
            repaired.push(line.to_string());
            continue;
        }

        if in_fence || is_quoted(line) || !BULLET_PREFIX.is_match(line) {
            repaired.push(line.to_string());
            continue;
        }

        let Some(day) = lines.get(i).and_then(|next| day_value(next)) else {
            repaired.push(line.to_string());
            continue;
        };

        let bullet = close_dangling_bold(line);
        if is_section_title(&bullet) {
            debug!("leaving day annotation alone after section title: {bullet:?}");
            repaired.push(line.to_string());
            continue;
        }

        repaired.push(format!("{} — Dia: {day}", bullet.trim_end().trim_end_matches(':')));
        i += 1;
    }

    repaired.join("\n")
}

fn is_quoted(line: &str) -> bool {
    line.trim_start().starts_with('>')
}

fn day_value(line: &str) -> Option<&str> {
    DAY_LINE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A bullet that is nothing but a bold label, like `- **Semana 1:**`.
fn is_section_title(bullet: &str) -> bool {
    parse_label(text::strip_bullet(bullet)).is_some_and(|definition| definition.value.is_empty())
}

/// Counts the `**` markers in `line` that are not inside an inline code
/// span.
fn bold_markers_outside_code(line: &str) -> usize {
    line.split('`')
        .step_by(2)
        .map(|segment| segment.matches(BOLD).count())
        .sum()
}

/// Closes or removes an unpaired `**` in a bullet line.
fn close_dangling_bold(line: &str) -> String {
    if bold_markers_outside_code(line) % 2 == 0 {
        return line.to_string();
    }

    let prefix_len = BULLET_PREFIX.find(line).map_or(0, |m| m.end());
    let (prefix, content) = line.split_at(prefix_len);
    // Only the text before any code span is ours to rewrite.
    let editable = content.split('`').next().unwrap_or_default();

    let fixed = if let Some(stripped) = content.trim_end().strip_suffix(BOLD) {
        stripped.trim_end().to_string()
    } else if !content.starts_with(BOLD) && editable.contains("**:") {
        format!("{BOLD}{content}")
    } else if let Some(colon) = content.strip_prefix(BOLD).and_then(|_| editable.find(':')) {
        let (label, rest) = content.split_at(colon + 1);
        format!("{label}{BOLD}{rest}")
    } else {
        format!("{}{BOLD}", content.trim_end())
    };

    debug!("closed dangling bold marker in {line:?}");
    format!("{prefix}{fixed}")
}
