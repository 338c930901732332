// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! The `[INSPIRATION_JSON]` sidecar attached to generated scripts.

use crate::link::is_safe_url;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// An error reading an inspiration sidecar.
///
/// Callers generally treat every variant the same way, by dropping the
/// sidecar; the distinction only matters for logging.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// The tagged region held nothing but whitespace or code fences.
    #[error("inspiration sidecar is empty")]
    Empty,

    /// The tagged region did not hold a JSON object of the expected shape.
    #[error("invalid inspiration sidecar: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for sidecar parsing.
pub type Result<T> = std::result::Result<T, SidecarError>;

/// The viral post a script was modeled on, plus the posts that inspired
/// each part of it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspirationSidecar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporting_inspirations: Option<Vec<SupportingInspiration>>,
}

impl InspirationSidecar {
    /// The post link, if it is safe to render as a link.
    pub fn safe_post_link(&self) -> Option<&str> {
        self.post_link.as_deref().filter(|url| is_safe_url(url))
    }

    /// The cover image URL, if it is safe to render.
    pub fn safe_cover_url(&self) -> Option<&str> {
        self.cover_url.as_deref().filter(|url| is_safe_url(url))
    }
}

/// The part of a script a supporting inspiration contributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspirationRole {
    Gancho,
    Desenvolvimento,
    Cta,
}

impl InspirationRole {
    /// Looks up a role by name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "gancho" => Some(InspirationRole::Gancho),
            "desenvolvimento" => Some(InspirationRole::Desenvolvimento),
            "cta" => Some(InspirationRole::Cta),
            _ => None,
        }
    }
}

/// A post that inspired one part of a script.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportingInspiration {
    pub role: InspirationRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_link: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_score: Option<f64>,
}

impl SupportingInspiration {
    /// The post link, if it is safe to render as a link.
    pub fn safe_post_link(&self) -> Option<&str> {
        self.post_link.as_deref().filter(|url| is_safe_url(url))
    }
}

/// The sidecar as it arrives, before supporting inspirations are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSidecar {
    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    cover_url: Option<String>,

    #[serde(default)]
    post_link: Option<String>,

    #[serde(default)]
    supporting_inspirations: Option<Vec<Value>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSupportingInspiration {
    #[serde(default)]
    role: Option<String>,

    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    post_link: Option<String>,

    #[serde(default)]
    reason: Option<String>,

    #[serde(default)]
    narrative_score: Option<Value>,
}

impl RawSupportingInspiration {
    /// Decodes one entry of the list, which may be any JSON value.
    fn decode(entry: Value) -> Option<Self> {
        serde_json::from_value(entry)
            .inspect_err(|err| debug!("dropping malformed supporting inspiration: {err}"))
            .ok()
    }

    fn validate(self) -> Option<SupportingInspiration> {
        let Some(role) = self.role.as_deref().and_then(InspirationRole::from_name) else {
            debug!("dropping supporting inspiration with role {:?}", self.role);
            return None;
        };

        Some(SupportingInspiration {
            role,
            title: self.title,
            post_link: self.post_link,
            reason: self.reason,
            narrative_score: self.narrative_score.as_ref().and_then(Value::as_f64),
        })
    }
}

/// Parses the body of an `[INSPIRATION_JSON]` region.
///
/// The JSON may be wrapped in a Markdown code fence. Supporting
/// inspirations that are not objects of the expected shape, or whose role
/// is not one of `gancho`, `desenvolvimento`, or `cta`, are dropped
/// without failing the rest of the sidecar.
///
/// # Examples
///
/// ```
/// use chatmark::script::parse_sidecar;
/// let sidecar = parse_sidecar(r#"{"title": "Bastidores", "postLink": "https://example.com/p"}"#).unwrap();
/// assert_eq!(sidecar.title.as_deref(), Some("Bastidores"));
/// assert_eq!(sidecar.safe_post_link(), Some("https://example.com/p"));
/// ```
///
/// ```
/// use chatmark::script::parse_sidecar;
/// assert!(parse_sidecar("{not json").is_err());
/// ```
pub fn parse_sidecar(raw: &str) -> Result<InspirationSidecar> {
    let json = strip_code_fence(raw);
    if json.is_empty() {
        return Err(SidecarError::Empty);
    }

    let raw: RawSidecar = serde_json::from_str(json)?;

    let supporting_inspirations = raw.supporting_inspirations.map(|entries| {
        entries
            .into_iter()
            .filter_map(RawSupportingInspiration::decode)
            .filter_map(RawSupportingInspiration::validate)
            .collect()
    });

    Ok(InspirationSidecar {
        title: raw.title,
        cover_url: raw.cover_url,
        post_link: raw.post_link,
        supporting_inspirations,
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let raw = raw.trim();
    let Some(fenced) = raw.strip_prefix("```") else {
        return raw;
    };
    let fenced = fenced.strip_prefix("json").unwrap_or(fenced);
    fenced.strip_suffix("```").unwrap_or(fenced).trim()
}
