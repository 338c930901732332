// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Scene timelines.
//!
//! A variation's scenes normally come as a Markdown table with a time
//! column, a visual column, and an audio column. When there is no such
//! table, scenes are rebuilt from tagged bullets like `- **Gancho:** ...`.

use crate::markdown::blocks::{is_table_separator, parse_label, split_cells};
use crate::text;
use log::trace;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Time given to scenes whose time is missing or unreadable.
pub const AUTO: &str = "Auto";

/// Stand-in for the half of a scene that a tagged bullet does not
/// describe.
pub const PLACEHOLDER: &str = "...";

static TIME_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)tempo|time").unwrap());

static VISUAL_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)visual|cena").unwrap());

static AUDIO_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[áa]udio|fala|narra").unwrap());

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,3})\s*s?\s*(?:-|–|—|a|até)\s*(\d{1,3})\s*s?$").unwrap()
});

static TIME_POINT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(\d{1,3})\s*s?$").unwrap());

/// One beat of a script's timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Scene {
    /// `NN-NNs`, `NNs`, or [`AUTO`].
    pub time: String,
    pub visual: String,
    pub audio: String,
}

impl Scene {
    pub fn new(time: impl Into<String>, visual: impl Into<String>, audio: impl Into<String>) -> Self {
        Self {
            time: time.into(),
            visual: visual.into(),
            audio: audio.into(),
        }
    }
}

/// What a bullet tag says about the scene it introduces.
enum Tag {
    /// A spoken beat at a fixed point in the timeline.
    Speech(&'static str),

    /// A visual beat with no fixed time.
    Visual,
}

impl Tag {
    fn from_label(label: &str) -> Option<Self> {
        let word = label.split_whitespace().next()?.to_lowercase();
        match word.as_str() {
            "gancho" | "hook" => Some(Tag::Speech("00-03s")),
            "desenvolvimento" | "corpo" | "conteúdo" | "conteudo" => Some(Tag::Speech("03-20s")),
            "cta" | "chamada" => Some(Tag::Speech("20-30s")),
            "visual" | "take" | "cena" => Some(Tag::Visual),
            _ => None,
        }
    }
}

/// Parses the scenes in a variation's lines, preferring a scene table
/// over tagged bullets.
pub fn parse_scenes(lines: &[&str]) -> Vec<Scene> {
    match parse_table(lines) {
        Some(scenes) if !scenes.is_empty() => scenes,
        _ => parse_tagged_bullets(lines),
    }
}

/// Normalizes a scene time to `NN-NNs` or `NNs`, or [`AUTO`] if it cannot
/// be read.
///
/// # Examples
///
/// ```
/// use chatmark::script::normalize_time;
/// assert_eq!(normalize_time("0-3s"), "00-03s");
/// assert_eq!(normalize_time("**3 a 20s**"), "03-20s");
/// assert_eq!(normalize_time("5s"), "05s");
/// assert_eq!(normalize_time("início"), "Auto");
/// ```
pub fn normalize_time(raw: &str) -> String {
    let raw = text::strip_bold(raw);
    let raw = raw.trim();

    if let Some(caps) = TIME_RANGE.captures(raw) {
        if let (Ok(start), Ok(end)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            return format!("{start:02}-{end:02}s");
        }
    }

    if let Some(caps) = TIME_POINT.captures(raw) {
        if let Ok(point) = caps[1].parse::<u32>() {
            return format!("{point:02}s");
        }
    }

    AUTO.to_string()
}

/// Column layout of a scene table.
struct Columns {
    has_time: bool,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Option<Self> {
        let has = |re: &Regex| headers.iter().any(|header| re.is_match(header));
        if !has(&VISUAL_HEADER) || !has(&AUDIO_HEADER) {
            return None;
        }
        Some(Self {
            has_time: headers.len() > 2 && has(&TIME_HEADER),
        })
    }

    fn scene(&self, cells: &[String]) -> Scene {
        let cell = |i: usize| {
            cells
                .get(i)
                .map(|cell| text::strip_bold(cell))
                .filter(|cell| !cell.is_empty())
        };

        if self.has_time {
            let audio = cells
                .get(2..)
                .map(|rest| rest.iter().map(|cell| text::strip_bold(cell)).collect::<Vec<_>>().join(" "))
                .filter(|audio| !audio.trim().is_empty());
            Scene::new(
                cells.first().map_or_else(|| AUTO.to_string(), |time| normalize_time(time)),
                cell(1).unwrap_or_else(|| PLACEHOLDER.to_string()),
                audio.unwrap_or_else(|| PLACEHOLDER.to_string()),
            )
        } else {
            Scene::new(
                AUTO,
                cell(0).unwrap_or_else(|| PLACEHOLDER.to_string()),
                cell(1).unwrap_or_else(|| PLACEHOLDER.to_string()),
            )
        }
    }
}

/// Reads the first table in `lines` whose headers name a visual and an
/// audio column. Other tables, such as metrics, are skipped.
fn parse_table(lines: &[&str]) -> Option<Vec<Scene>> {
    let (start, columns) = lines.windows(2).enumerate().find_map(|(i, pair)| {
        let [header, separator] = pair else {
            return None;
        };
        if !header.contains('|') || !is_table_separator(separator) {
            return None;
        }
        let columns = Columns::from_headers(&split_cells(header));
        if columns.is_none() {
            trace!("skipping table that is not a scene table: {header:?}");
        }
        columns.map(|columns| (i, columns))
    })?;

    let scenes: Vec<Scene> = lines[start + 2..]
        .iter()
        .map(|line| line.trim())
        .take_while(|line| line.contains('|'))
        .filter(|line| !is_table_separator(line))
        .map(split_cells)
        .filter(|cells| !cells.is_empty())
        .map(|cells| columns.scene(&cells))
        .collect();

    trace!("read {} scenes from a scene table", scenes.len());
    Some(scenes)
}

fn parse_tagged_bullets(lines: &[&str]) -> Vec<Scene> {
    lines
        .iter()
        .filter_map(|line| parse_label(text::strip_bullet(line)))
        .filter(|definition| !definition.value.is_empty())
        .filter_map(|definition| {
            let scene = match Tag::from_label(&definition.label)? {
                Tag::Speech(time) => Scene::new(time, PLACEHOLDER, definition.value),
                Tag::Visual => Scene::new(AUTO, definition.value, PLACEHOLDER),
            };
            Some(scene)
        })
        .collect()
}
