// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Inline markup engine.
//!
//! Wraps already-escaped text in a tiny, fixed set of inline HTML spans.
//! The rules run in a fixed order, each over the output of the previous
//! one:
//!
//! 1. `==highlighted==` text becomes a `<mark>` span.
//! 2. `` `code` `` becomes a `<code>` span.
//! 3. `**bold**` becomes a `<strong>` span.
//! 4. Bare `http(s)://` URLs become anchors that open in a new context.
//!
//! Text inside a `<code>` span produced by rule 2 is never touched by the
//! later rules, though a bold run may wrap a whole code span.

use crate::link::is_safe_url;
use crate::text::escape_html;
use clap::ValueEnum;
use log::trace;
use regex::Regex;
use std::sync::LazyLock;

static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==([^<>=\n]{1,200})==").unwrap());

static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+)`").unwrap());

static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<code[^>]*>.*?</code>").unwrap());

const BOLD_MARKER: &str = "**";

static BARE_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>"]+"#).unwrap());

/// Trailing characters that end a sentence rather than a URL.
const URL_TRAILERS: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']'];

/// Color theme used when rendering inline spans.
///
/// The theme only selects CSS class names; the actual colors belong to
/// the renderer's stylesheet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    /// Dark text on a light background.
    #[default]
    Default,

    /// Light text on a dark background, e.g., the user's own chat bubble.
    Inverse,
}

impl Theme {
    fn suffix(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Inverse => "inverse",
        }
    }

    /// CSS class applied to highlight spans.
    pub fn highlight_class(&self) -> String {
        format!("cm-highlight cm-highlight--{}", self.suffix())
    }

    /// CSS class applied to inline code spans.
    pub fn code_class(&self) -> String {
        format!("cm-code cm-code--{}", self.suffix())
    }

    /// CSS class applied to links.
    pub fn link_class(&self) -> String {
        format!("cm-link cm-link--{}", self.suffix())
    }
}

/// Applies inline markup to text that has **already been HTML-escaped**.
///
/// This function never escapes anything itself; use [`render_inline()`]
/// for raw text.
///
/// # Examples
///
/// ```
/// use chatmark::inline::{apply_inline_markup, Theme};
/// let html = apply_inline_markup("**oi** `x`", Theme::Default);
/// assert_eq!(html, r#"<strong>oi</strong> <code class="cm-code cm-code--default">x</code>"#);
/// ```
pub fn apply_inline_markup(escaped: &str, theme: Theme) -> String {
    let html = highlight(escaped, theme);
    let html = code(&html, theme);
    let html = bold(&html);
    outside_code(&html, |text| autolink(text, theme))
}

/// Escapes raw text and then applies inline markup to it.
///
/// # Examples
///
/// ```
/// use chatmark::inline::{render_inline, Theme};
/// let html = render_inline("<script> **x**", Theme::Inverse);
/// assert_eq!(html, "&lt;script&gt; <strong>x</strong>");
/// ```
pub fn render_inline(raw: &str, theme: Theme) -> String {
    apply_inline_markup(&escape_html(raw), theme)
}

fn highlight(text: &str, theme: Theme) -> String {
    let class = theme.highlight_class();
    HIGHLIGHT
        .replace_all(text, |caps: &regex::Captures| {
            format!(r#"<mark class="{class}">{}</mark>"#, &caps[1])
        })
        .into_owned()
}

fn code(text: &str, theme: Theme) -> String {
    let class = theme.code_class();
    CODE.replace_all(text, |caps: &regex::Captures| {
        format!(r#"<code class="{class}">{}</code>"#, &caps[1])
    })
    .into_owned()
}

/// Pairs up the `**` markers outside `<code>` spans, in order, and turns
/// each pair enclosing a non-empty run on a single line into a `<strong>`
/// span.
fn bold(html: &str) -> String {
    let code_spans: Vec<_> = CODE_SPAN.find_iter(html).map(|span| span.range()).collect();
    let markers: Vec<usize> = html
        .match_indices(BOLD_MARKER)
        .map(|(i, _)| i)
        .filter(|i| !code_spans.iter().any(|span| span.contains(i)))
        .collect();

    let mut result = String::with_capacity(html.len());
    let mut last = 0;
    let mut k = 0;

    while k + 1 < markers.len() {
        let (open, close) = (markers[k], markers[k + 1]);
        let inner = &html[open + BOLD_MARKER.len()..close];
        if inner.is_empty() || inner.contains('\n') {
            k += 1;
            continue;
        }

        result.push_str(&html[last..open]);
        result.push_str("<strong>");
        result.push_str(inner);
        result.push_str("</strong>");
        last = close + BOLD_MARKER.len();
        k += 2;
    }

    result.push_str(&html[last..]);
    result
}

/// Links bare URLs, except those glued to the end of a tag or an
/// attribute value.
fn autolink(text: &str, theme: Theme) -> String {
    let mut linked = String::with_capacity(text.len());
    let mut last = 0;

    for m in BARE_URL.find_iter(text) {
        let preceding = text[..m.start()].chars().next_back();
        if matches!(preceding, Some('>' | '"' | '=' | '\'')) {
            trace!("not linking url adjacent to markup: {:?}", m.as_str());
            continue;
        }

        let url = m.as_str().trim_end_matches(URL_TRAILERS);
        if !is_safe_url(url) {
            continue;
        }

        linked.push_str(&text[last..m.start()]);
        linked.push_str(&format!(
            r#"<a href="{url}" target="_blank" rel="noopener noreferrer" class="{}">{url}</a>"#,
            theme.link_class()
        ));
        last = m.start() + url.len();
    }

    linked.push_str(&text[last..]);
    linked
}

/// Applies `transform` to every part of `html` that is not inside a
/// `<code>` span.
fn outside_code(html: &str, transform: impl Fn(&str) -> String) -> String {
    let mut result = String::with_capacity(html.len());
    let mut last = 0;

    for span in CODE_SPAN.find_iter(html) {
        result.push_str(&transform(&html[last..span.start()]));
        result.push_str(span.as_str());
        last = span.end();
    }

    result.push_str(&transform(&html[last..]));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ANCHOR_ATTRS: &str = r#"target="_blank" rel="noopener noreferrer" class="cm-link cm-link--default""#;

    #[test]
    fn it_does_not_touch_normal_text() {
        let text = "Lorem ipsum dolor sit amet";
        assert_eq!(apply_inline_markup(text, Theme::Default), text);
    }

    #[test]
    fn it_highlights_text() {
        let html = apply_inline_markup("um ==destaque== aqui", Theme::Default);
        assert_eq!(
            html,
            r#"um <mark class="cm-highlight cm-highlight--default">destaque</mark> aqui"#
        );
    }

    #[test]
    fn it_uses_the_inverse_theme_classes() {
        let html = apply_inline_markup("==x==", Theme::Inverse);
        assert_eq!(html, r#"<mark class="cm-highlight cm-highlight--inverse">x</mark>"#);
    }

    #[test]
    fn it_does_not_highlight_overlong_spans() {
        let text = format!("=={}==", "a".repeat(201));
        assert_eq!(apply_inline_markup(&text, Theme::Default), text);
    }

    #[test]
    fn it_does_not_highlight_across_lines() {
        let text = "==a\nb==";
        assert_eq!(apply_inline_markup(text, Theme::Default), text);
    }

    #[test]
    fn it_emboldens_text() {
        let html = apply_inline_markup("isso é **importante**", Theme::Default);
        assert_eq!(html, "isso é <strong>importante</strong>");
    }

    #[test]
    fn it_leaves_dangling_bold_markers_alone() {
        let text = "isso é **importante";
        assert_eq!(apply_inline_markup(text, Theme::Default), text);
    }

    #[test]
    fn it_does_not_embolden_inside_code() {
        let html = apply_inline_markup("`a **b** c`", Theme::Default);
        assert_eq!(html, r#"<code class="cm-code cm-code--default">a **b** c</code>"#);
    }

    #[test]
    fn it_emboldens_across_code_spans() {
        let html = apply_inline_markup("**use `npm` agora**", Theme::Default);
        assert_eq!(
            html,
            r#"<strong>use <code class="cm-code cm-code--default">npm</code> agora</strong>"#
        );

        let html = apply_inline_markup("**a** `**` **b**", Theme::Default);
        assert_eq!(
            html,
            r#"<strong>a</strong> <code class="cm-code cm-code--default">**</code> <strong>b</strong>"#
        );
    }

    #[test]
    fn it_does_not_embolden_across_lines() {
        let text = "**a\nb**";
        assert_eq!(apply_inline_markup(text, Theme::Default), text);
    }

    #[test]
    fn it_links_bare_urls() {
        let html = apply_inline_markup("veja https://example.com agora", Theme::Default);
        assert_eq!(
            html,
            format!(r#"veja <a href="https://example.com" {ANCHOR_ATTRS}>https://example.com</a> agora"#)
        );
    }

    #[test]
    fn it_does_not_link_trailing_punctuation() {
        let html = apply_inline_markup("veja https://example.com.", Theme::Default);
        assert_eq!(
            html,
            format!(r#"veja <a href="https://example.com" {ANCHOR_ATTRS}>https://example.com</a>."#)
        );
    }

    #[test]
    fn it_does_not_link_urls_inside_code() {
        let html = apply_inline_markup("`https://example.com`", Theme::Default);
        assert!(!html.contains("<a "));
    }

    #[test]
    fn it_does_not_link_urls_adjacent_to_a_closing_bracket() {
        let html = apply_inline_markup("**https://example.com**", Theme::Default);
        assert_eq!(html, "<strong>https://example.com</strong>");
    }

    #[test]
    fn it_produces_exactly_one_anchor_for_a_safe_url() {
        let html = render_inline("https://example.com", Theme::Default);
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(r#"href="https://example.com""#));
    }

    #[test]
    fn it_never_links_unsafe_schemes() {
        for candidate in [
            "javascript:alert(1)",
            "JaVaScRiPt:alert(1)",
            "java%73cript:alert(1)",
            "data:text/html,oi",
        ] {
            let html = render_inline(candidate, Theme::Default);
            assert!(html.contains(&escape_html(candidate)));
            assert!(!html.contains("<a "), "{candidate} was linked: {html}");
        }
    }

    #[test]
    fn it_escapes_before_marking_up() {
        let html = render_inline("<img src=x onerror=alert(1)>", Theme::Default);
        assert_eq!(html, "&lt;img src=x onerror=alert(1)&gt;");
    }

    #[test]
    fn it_keeps_escaped_ampersands_in_urls() {
        let html = render_inline("https://example.com/?a=1&b=2", Theme::Default);
        assert!(html.contains(r#"href="https://example.com/?a=1&amp;b=2""#));
    }
}
