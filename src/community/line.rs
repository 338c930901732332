// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Classifies single lines of a community inspiration message.
//!
//! Classification looks at one line in isolation. What a line *means*
//! depends on the parser's state as well; that part lives in
//! [`super::State`].

use crate::text;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static GLUED_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s#])(#{3,6})[ \t]*\n?").unwrap());

static TASK_MODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s>#*\-]*(?:modo\s+tarefa|task\s+mode|tarefa\s+em\s+andamento)").unwrap()
});

static STATUS_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[\s>*_]*(?:vou\s+buscar\s+inspira|um\s+momento|processando|buscando\s+inspira)")
        .unwrap()
});

static NOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^>\s*\[!\w+\]").unwrap());

static CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:>\s*)?(?:\*\*)?\s*contexto(?:\s+aplicado|[^:]{0,40}pesquisa)").unwrap()
});

static FOOTER_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:>\s*)?(?:#{1,6}\s*)?(?:\*\*)?\s*(?:pr[óo]ximos?\s+passos?|a[çc][ãa]o\s+recomend[áa]vel)",
    )
    .unwrap()
});

static CARD_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^(?P<hash>\#{1,6}\s*)?
        (?:[-*•]\s+)?
        (?P<list>\d+[.)]\s*)?
        (?P<bold>\*\*)?\s*
        (?:reel|v[íi]deo|post|carrossel|inspira[çc][ãa]o|inspiration|idea|ideia)
        (?:\s*(?P<num>\d+)|\b)
        \s*(?:\*\*)?\s*
        (?P<sep>[—–:|-])?
        ",
    )
    .unwrap()
});

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:[-*•]\s*)?(?:\*\*)?\s*(descri[çc][ãa]o|resumo|destaques|tags|performance|link)\s*(?:\*\*)?\s*:\s*(?:\*\*)?\s*(.*)$",
    )
    .unwrap()
});

static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(\s*([^)\s]+)\s*\)").unwrap());

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>()\[\]"]+"#).unwrap());

static LINK_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^(?:\[[^\]]*\]\(\s*[^)\s]+\s*\)|https?://[^\s<>"]+)$"#).unwrap()
});

const URL_TRAILERS: &[char] = &['.', ',', ';', ':', '!', '?'];

const HIGHLIGHT_SEPARATORS: &[char] = &[';', '•', '●', '\n'];

/// A link attached to a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardLink {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CardLink {
    pub fn new(url: impl Into<String>, label: Option<&str>) -> Self {
        Self {
            url: url.into(),
            label: label.map(str::trim).filter(|l| !l.is_empty()).map(String::from),
        }
    }
}

/// A labelled field inside a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// `Descrição:` or `Resumo:`.
    Description,

    /// `Destaques:`, `Tags:`, or `Performance:`.
    Highlights,

    /// `Link:`.
    Link,
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "descrição" | "descricao" | "descriçao" | "descricão" | "resumo" => Some(Field::Description),
            "destaques" | "tags" | "performance" => Some(Field::Highlights),
            "link" => Some(Field::Link),
            _ => None,
        }
    }
}

/// What a single line looks like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// A `> [!NOTE]` admonition marker.
    Note,

    /// A "contexto aplicado" line, with the text after its colon.
    Context(String),

    /// A "próximo passo" heading, with its cleaned heading text and any
    /// text after its colon.
    FooterHeading { heading: String, rest: String },

    /// The start of a new card.
    CardHeading(String),

    /// A labelled field and the value on the same line.
    Field(Field, String),

    /// A line holding nothing but a link.
    Link(CardLink),

    /// Anything else, with blockquote markers removed.
    Text(String),
}

/// Repairs a heading marker glued onto the end of the previous line, as in
/// `Um momento!###\nReel 1`.
pub fn unglue_headings(text: &str) -> String {
    GLUED_HEADING.replace_all(text, "$1\n$2 ").into_owned()
}

/// True if `line` is task-mode chatter or a progress message that should
/// never reach the output.
pub fn is_noise(line: &str) -> bool {
    TASK_MODE.is_match(line) || STATUS_NOISE.is_match(line)
}

/// Classifies a non-blank line.
pub fn classify(line: &str) -> LineKind {
    let line = line.trim();

    if NOTE.is_match(line) {
        return LineKind::Note;
    }

    if CONTEXT.is_match(line) {
        return LineKind::Context(after_colon(line));
    }

    if FOOTER_HEADING.is_match(line) {
        let (heading, rest) = match line.split_once(':') {
            Some((heading, rest)) => (heading, text::strip_bold(rest)),
            None => (line, String::new()),
        };
        return LineKind::FooterHeading {
            heading: clean_heading(heading),
            rest,
        };
    }

    if CARD_HEADING.is_match(line) && is_card_heading(line) {
        return LineKind::CardHeading(clean_heading(line));
    }

    if let Some(caps) = FIELD.captures(line) {
        if let Some(field) = Field::from_label(&caps[1]) {
            return LineKind::Field(field, text::tidy_markers(&caps[2]));
        }
    }

    let unquoted = unquote(line);
    if LINK_ONLY.is_match(&text::strip_bold(text::strip_bullet(&unquoted))) {
        if let Some(link) = find_link(&unquoted) {
            return LineKind::Link(link);
        }
    }

    LineKind::Text(unquoted)
}

/// A keyword alone is not enough: it must be numbered, sit in a numbered
/// list or a heading, be bold, or be followed by a separator. A plain
/// bullet does not count.
fn is_card_heading(line: &str) -> bool {
    has_heading_marker(line, &["hash", "list", "bold", "num", "sep"])
}

/// True if a card heading carries a number or a separator after its
/// keyword, as in `- Reel 2` or `- Post: Receita`.
pub fn is_numbered_heading(line: &str) -> bool {
    has_heading_marker(line.trim(), &["num", "sep"])
}

fn has_heading_marker(line: &str, markers: &[&str]) -> bool {
    CARD_HEADING
        .captures(line)
        .is_some_and(|caps| markers.iter().any(|name| caps.name(name).is_some()))
}

/// Finds the first Markdown link or bare URL in `text`.
///
/// # Examples
///
/// ```
/// use chatmark::community::{CardLink, find_link};
/// assert_eq!(
///     find_link("Link: [Veja aqui](https://example.com/r2)"),
///     Some(CardLink::new("https://example.com/r2", Some("Veja aqui")))
/// );
/// assert_eq!(
///     find_link("em https://example.com/r1."),
///     Some(CardLink::new("https://example.com/r1", None))
/// );
/// ```
pub fn find_link(text: &str) -> Option<CardLink> {
    if let Some(caps) = MARKDOWN_LINK.captures(text) {
        return Some(CardLink::new(&caps[2], Some(&caps[1])));
    }

    BARE_URL
        .find(text)
        .map(|m| m.as_str().trim_end_matches(URL_TRAILERS))
        .filter(|url| !url.is_empty())
        .map(|url| CardLink::new(url, None))
}

/// Splits a highlights value into separate, trimmed entries.
///
/// # Examples
///
/// ```
/// use chatmark::community::split_highlights;
/// assert_eq!(
///     split_highlights("Engajamento alto; Comentários positivos • Formato rápido"),
///     vec!["Engajamento alto", "Comentários positivos", "Formato rápido"]
/// );
/// ```
pub fn split_highlights(value: &str) -> Vec<String> {
    value
        .split(HIGHLIGHT_SEPARATORS)
        .map(text::strip_bullet)
        .map(text::tidy_markers)
        .filter(|highlight| !highlight.is_empty())
        .collect()
}

/// Removes a leading blockquote marker.
pub fn unquote(line: &str) -> String {
    line.trim()
        .strip_prefix('>')
        .map_or(line.trim(), str::trim)
        .to_string()
}

fn after_colon(line: &str) -> String {
    line.split_once(':')
        .map(|(_, rest)| text::strip_bold(rest))
        .unwrap_or_default()
}

/// Strips quote, heading, list, and bold markers, plus a trailing colon.
fn clean_heading(line: &str) -> String {
    let line = unquote(line);
    let line = line.trim_start_matches('#').trim();
    let line = text::strip_bullet(line);
    text::strip_bold(line).trim_end_matches(':').trim().to_string()
}
