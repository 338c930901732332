// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Parses generated short-video scripts.
//!
//! A script message wraps its parts in tags:
//!
//! ```text
//! [ROTEIRO]
//! ## V1
//! **Título Sugerido:** Bastidores da produção
//! **Formato Ideal:** Reel | **Duração Estimada:** 30s
//!
//! | Tempo | Visual | Áudio |
//! | --- | --- | --- |
//! | 0-3s | Close no rosto | "Você sabia?" |
//!
//! [INSPIRATION_JSON]{"title": "..."}[/INSPIRATION_JSON]
//! [/ROTEIRO]
//! [LEGENDA]
//! V1: Uma legenda
//! [/LEGENDA]
//! ```
//!
//! [`parse_script()`] turns that into a list of [`ScriptVariation`]s and an
//! optional [`InspirationSidecar`]. Missing or unterminated tags never
//! cause an error; at worst the result has no variations, and the caller
//! should fall back to rendering the raw message.

pub mod legenda;
pub mod scenes;
pub mod sidecar;

pub use legenda::{Caption, inline_caption, parse_legenda};
pub use scenes::{Scene, normalize_time, parse_scenes};
pub use sidecar::{
    InspirationRole, InspirationSidecar, SidecarError, SupportingInspiration, parse_sidecar,
};

use crate::text;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use std::ops::Range;
use std::sync::LazyLock;

/// Tag around the script body.
pub const ROTEIRO: &str = "ROTEIRO";

/// Tag around the caption variants.
pub const LEGENDA: &str = "LEGENDA";

/// Tag around the inspiration sidecar.
pub const INSPIRATION_JSON: &str = "INSPIRATION_JSON";

static VARIATION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*)?\s*(?:V|Varia[çc][ãa]o\s*)(\d+)\b").unwrap()
});

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^t[íi]tulo(?:\s+sugerido)?\s*:\s*(.+)$").unwrap());

static FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^formato(?:\s+ideal)?\s*:\s*(.+)$").unwrap());

static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^dura[çc][ãa]o(?:\s+estimada)?\s*:\s*(.+)$").unwrap());

static AUDIO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[áa]udio(?:\s+sugerido)?\s*:\s*(.+)$").unwrap());

static INSPIRATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^inspira[çc][ãa]o(?:\s+viral)?\s*:\s*(.+)$").unwrap());

static INSPIRATION_REASON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:por\s*qu[eê]\s+essa\s+inspira[çc][ãa]o\??|racional\s+da\s+inspira[çc][ãa]o)\s*:\s*(.+)$",
    )
    .unwrap()
});

/// A parsed script message.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedScript {
    pub variations: Vec<ScriptVariation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspiration_data: Option<InspirationSidecar>,
}

/// One alternative version of a script.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptVariation {
    /// `V1`, `V2`, and so on.
    pub label: String,
    pub metadata: VariationMetadata,
    pub scenes: Vec<Scene>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,

    /// The lines the variation was parsed from.
    pub raw_text: String,
}

/// Labelled fields describing a variation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspiration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspiration_reason: Option<String>,
}

impl VariationMetadata {
    /// True if no field was found.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.format.is_none()
            && self.duration.is_none()
            && self.audio.is_none()
            && self.inspiration.is_none()
            && self.inspiration_reason.is_none()
    }

    /// Reads labelled fields from a variation's lines. The first
    /// occurrence of each label wins.
    fn parse(lines: &[&str]) -> Self {
        let mut metadata = Self::default();

        for line in lines {
            let line = text::strip_bold(text::strip_bullet(line));

            if let Some(value) = field(&FORMAT, &line) {
                let mut parts = value.split('|').map(str::trim);
                if let Some(format) = parts.next().filter(|part| !part.is_empty()) {
                    metadata.format.get_or_insert_with(|| format.to_string());
                }
                if let Some(duration) = parts.find_map(|part| field(&DURATION, part)) {
                    metadata.duration.get_or_insert(duration);
                }
                continue;
            }

            let slot = if TITLE.is_match(&line) {
                field(&TITLE, &line).map(|v| (&mut metadata.title, v))
            } else if DURATION.is_match(&line) {
                field(&DURATION, &line).map(|v| (&mut metadata.duration, v))
            } else if AUDIO.is_match(&line) {
                field(&AUDIO, &line).map(|v| (&mut metadata.audio, v))
            } else if INSPIRATION_REASON.is_match(&line) {
                field(&INSPIRATION_REASON, &line).map(|v| (&mut metadata.inspiration_reason, v))
            } else if INSPIRATION.is_match(&line) {
                field(&INSPIRATION, &line).map(|v| (&mut metadata.inspiration, v))
            } else {
                None
            };

            if let Some((slot, value)) = slot {
                slot.get_or_insert(value);
            }
        }

        metadata
    }
}

fn field(re: &Regex, line: &str) -> Option<String> {
    re.captures(line.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Returns the text between `[tag]` and `[/tag]`, ignoring case.
///
/// An opening tag with no closing tag runs to the end of `text`.
///
/// # Examples
///
/// ```
/// use chatmark::script::extract_tagged;
/// assert_eq!(extract_tagged("a [legenda]oi[/LEGENDA] b", "LEGENDA"), Some("oi"));
/// assert_eq!(extract_tagged("[ROTEIRO]sem fim", "ROTEIRO"), Some("sem fim"));
/// assert_eq!(extract_tagged("nada aqui", "ROTEIRO"), None);
/// ```
pub fn extract_tagged<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    tagged_span(text, tag).map(|span| &text[span.inner])
}

/// Removes every `[tag]...[/tag]` region from `text`, tags included.
pub fn remove_tagged(text: &str, tag: &str) -> String {
    let mut remaining = text;
    let mut kept = String::with_capacity(text.len());

    while let Some(span) = tagged_span(remaining, tag) {
        kept.push_str(&remaining[..span.outer.start]);
        remaining = &remaining[span.outer.end..];
    }
    kept.push_str(remaining);
    kept
}

/// True if `text` has a `[ROTEIRO]` or `[LEGENDA]` tag.
pub fn has_script_tags(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    [ROTEIRO, LEGENDA]
        .iter()
        .any(|tag| lower.contains(&format!("[{}]", tag.to_ascii_lowercase())))
}

/// Where a tagged region sits in a piece of text.
struct TaggedSpan {
    /// From the opening tag through the closing tag.
    outer: Range<usize>,

    /// Between the tags.
    inner: Range<usize>,
}

/// Finds the first `[tag]` region in `text`. An unterminated region runs
/// to the end of `text`.
fn tagged_span(text: &str, tag: &str) -> Option<TaggedSpan> {
    // ASCII lowercasing keeps byte offsets intact.
    let lower = text.to_ascii_lowercase();
    let tag = tag.to_ascii_lowercase();
    let opening = format!("[{tag}]");
    let closing = format!("[/{tag}]");

    let start = lower.find(&opening)?;
    let body = start + opening.len();
    let span = match lower[body..].find(&closing) {
        Some(offset) => TaggedSpan {
            outer: start..body + offset + closing.len(),
            inner: body..body + offset,
        },
        None => TaggedSpan {
            outer: start..text.len(),
            inner: body..text.len(),
        },
    };
    Some(span)
}

/// Parses a script message into its variations and inspiration sidecar.
///
/// # Examples
///
/// ```
/// use chatmark::script::parse_script;
/// let script = parse_script("[ROTEIRO]\n- **Gancho:** Olha isso\n[/ROTEIRO]\n[LEGENDA]\nV1: Oi\n[/LEGENDA]");
/// assert_eq!(script.variations.len(), 1);
/// assert_eq!(script.variations[0].caption.as_deref(), Some("Oi"));
/// assert_eq!(script.variations[0].scenes[0].time, "00-03s");
/// ```
pub fn parse_script(content: &str) -> ParsedScript {
    let roteiro = match extract_tagged(content, ROTEIRO) {
        Some(roteiro) => roteiro.to_string(),
        None => remove_tagged(content, LEGENDA),
    };
    let legenda = extract_tagged(content, LEGENDA).unwrap_or_default();

    let inspiration_data = extract_tagged(&roteiro, INSPIRATION_JSON)
        .or_else(|| extract_tagged(content, INSPIRATION_JSON))
        .and_then(|raw| match parse_sidecar(raw) {
            Ok(sidecar) => Some(sidecar),
            Err(err) => {
                warn!("ignoring inspiration sidecar: {err}");
                None
            }
        });

    let body = remove_tagged(&roteiro, INSPIRATION_JSON);
    let captions = parse_legenda(legenda);

    let variations: Vec<ScriptVariation> = split_variations(&body)
        .into_iter()
        .filter_map(Chunk::parse)
        .collect();

    let variations = variations
        .into_iter()
        .enumerate()
        .map(|(i, mut variation)| {
            let own = variation.caption.take();
            variation.caption = captions
                .iter()
                .find(|caption| caption.label.eq_ignore_ascii_case(&variation.label))
                .or_else(|| captions.get(i))
                .map(|caption| caption.text.clone())
                .or(own)
                .or_else(|| captions.first().map(|caption| caption.text.clone()));
            variation
        })
        .collect();

    ParsedScript {
        variations,
        inspiration_data,
    }
}

/// The lines under one variation heading.
#[derive(Debug)]
struct Chunk<'a> {
    label: String,
    lines: Vec<&'a str>,
}

impl<'a> Chunk<'a> {
    fn new(label: String) -> Self {
        Self {
            label,
            lines: Vec::new(),
        }
    }

    /// Parses the chunk, or returns `None` if nothing in it is
    /// recognizable.
    fn parse(self) -> Option<ScriptVariation> {
        let metadata = VariationMetadata::parse(&self.lines);
        let scenes = parse_scenes(&self.lines);
        let caption = inline_caption(&self.lines);

        if scenes.is_empty() && metadata.is_empty() && caption.is_none() {
            debug!("dropping variation {} with no recognizable content", self.label);
            return None;
        }

        Some(ScriptVariation {
            label: self.label,
            metadata,
            scenes,
            caption,
            raw_text: self.lines.join("\n").trim().to_string(),
        })
    }
}

/// Splits a script body into chunks on variation headings. A body with no
/// headings is a single `V1` chunk; text before the first heading is
/// dropped.
fn split_variations(body: &str) -> Vec<Chunk<'_>> {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut preamble = Chunk::new(String::from("V1"));

    for line in body.lines() {
        if let Some(caps) = VARIATION_HEADING.captures(line) {
            let number = caps[1].trim_start_matches('0');
            let number = if number.is_empty() { "0" } else { number };
            chunks.push(Chunk::new(format!("V{number}")));
            continue;
        }

        match chunks.last_mut() {
            Some(chunk) => chunk.lines.push(line),
            None => preamble.lines.push(line),
        }
    }

    if chunks.is_empty() {
        vec![preamble]
    } else {
        chunks
    }
}
