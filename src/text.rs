// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Helpful utilities for working with text.

use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:[-*•●]|\d+[.)])\s+").unwrap());

/// Escapes `&`, `<`, and `>` so that `text` can be safely embedded in
/// an HTML fragment.
///
/// Everything the inline markup engine touches must pass through this
/// function first.
///
/// # Examples
///
/// ```
/// use chatmark::text::escape_html;
/// assert_eq!(escape_html("<b>Tom & Jerry</b>"), "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;");
/// ```
///
/// ```
/// use chatmark::text::escape_html;
/// assert_eq!(escape_html("javascript:alert(1)"), "javascript:alert(1)");
/// ```
pub fn escape_html(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Removes a leading list marker (`-`, `*`, `•`, `●`, or `1.`) from `line`.
///
/// # Examples
///
/// ```
/// use chatmark::text::strip_bullet;
/// assert_eq!(strip_bullet("  - Salvamentos"), "Salvamentos");
/// assert_eq!(strip_bullet("2. passo dois"), "passo dois");
/// assert_eq!(strip_bullet("sem marcador"), "sem marcador");
/// ```
pub fn strip_bullet(line: &str) -> &str {
    match BULLET.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

/// Tidies loose Markdown emphasis markers in a single item of text.
///
/// A dangling `**` (one without a partner) is removed so it does not leak
/// into rendered output, while properly paired markers are kept for the
/// inline markup engine.
///
/// # Examples
///
/// ```
/// use chatmark::text::tidy_markers;
/// assert_eq!(tidy_markers("ponto **um"), "ponto um");
/// assert_eq!(tidy_markers("ponto **um**"), "ponto **um**");
/// assert_eq!(tidy_markers("  **Formato**: Reel **  "), "**Formato**: Reel");
/// ```
pub fn tidy_markers(text: &str) -> String {
    let text = text.trim();
    if text.matches("**").count() % 2 == 0 {
        return text.to_string();
    }

    match text.rfind("**") {
        Some(idx) => {
            let mut tidied = String::with_capacity(text.len());
            tidied.push_str(text[..idx].trim_end());
            let rest = &text[idx + 2..];
            if !tidied.is_empty() && !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                tidied.push(' ');
            }
            tidied.push_str(rest.trim_start());
            let tidied = tidied.trim();
            // "ponto **um" loses the marker and the gap before it
            tidied.replace("  ", " ")
        }
        None => text.to_string(),
    }
}

/// Removes every `**` marker from `text`.
pub fn strip_bold(text: &str) -> String {
    text.replace("**", "").trim().to_string()
}

/// Unwraps text that is entirely wrapped in a single bold span.
///
/// # Examples
///
/// ```
/// use chatmark::text::unwrap_bold;
/// assert_eq!(unwrap_bold("**Resumo da semana**"), "Resumo da semana");
/// assert_eq!(unwrap_bold("**Resumo** da **semana**"), "**Resumo** da **semana**");
/// ```
pub fn unwrap_bold(text: &str) -> String {
    let text = text.trim();
    match text.strip_prefix("**").and_then(|t| t.strip_suffix("**")) {
        Some(inner) if !inner.is_empty() && !inner.contains("**") => inner.trim().to_string(),
        _ => text.to_string(),
    }
}

/// Returns the items in their original order with duplicates removed.
///
/// Comparison is exact; callers are expected to trim items first.
pub fn dedupe<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    items.into_iter().unique().collect()
}

/// Clamps `text` to at most `max` characters, marking truncation with an
/// ellipsis.
///
/// # Examples
///
/// ```
/// use chatmark::text::clamp;
/// assert_eq!(clamp("abcdef", 4), "abc…");
/// assert_eq!(clamp("abc", 4), "abc");
/// ```
pub fn clamp(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}
