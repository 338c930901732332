// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Removes claims about community performance that nothing backs up.
//!
//! The assistant sometimes says its ideas are "based on community posts
//! that performed well" even when it was given no such posts. Unless the
//! caller has evidence to show alongside the message, that phrase is
//! replaced with a neutral one.

use log::debug;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Replaces English claims.
pub const NEUTRAL_EN: &str = "drawing on general best practices";

/// Replaces Portuguese claims.
pub const NEUTRAL_PT: &str = "a partir de boas práticas gerais";

static CLAIM_EN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        \bbased\s+on\b [^.!?\n]*?
        (?:
            \b(?:posts?|content)\b [^.!?\n]*? \bcommunity\b
          | \bcommunity\b [^.!?\n]*? \b(?:posts?|content)\b
        )
        (?:\s+(?:that|which)\s+(?:have\s+)?(?:performed|did|worked)\s+(?:well|best))?
        ",
    )
    .unwrap()
});

static CLAIM_PT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        \bcom\s+base\s+em\b [^.!?\n]*?
        (?:
            \b(?:posts?|conte[úu]dos?|publica[çc][õo]es)\b [^.!?\n]*? \bcomunidade\b
          | \bcomunidade\b [^.!?\n]*? \b(?:posts?|conte[úu]dos?|publica[çc][õo]es)\b
        )
        (?:\s+que\s+(?:performaram|funcionaram|foram|tiveram)(?:\s+(?:muito\s+)?(?:bem|bom\s+desempenho))?)?
        ",
    )
    .unwrap()
});

/// Replaces unproven "based on community posts" claims in `text` unless
/// `has_evidence` is true.
///
/// Applying this function twice gives the same result as applying it
/// once.
///
/// # Examples
///
/// ```
/// use chatmark::claims::strip_unproven_community_claims;
/// let text = "Ideas based on community posts that performed well.";
/// assert_eq!(
///     strip_unproven_community_claims(text, false),
///     "Ideas drawing on general best practices."
/// );
/// assert_eq!(strip_unproven_community_claims(text, true), text);
/// ```
pub fn strip_unproven_community_claims(text: &str, has_evidence: bool) -> String {
    if has_evidence || text.is_empty() {
        return text.to_string();
    }

    let stripped = CLAIM_EN.replace_all(text, |caps: &Captures| neutral(&caps[0], NEUTRAL_EN));
    let stripped = CLAIM_PT.replace_all(&stripped, |caps: &Captures| neutral(&caps[0], NEUTRAL_PT));

    if stripped != text {
        debug!("stripped unproven community claims");
    }
    stripped.into_owned()
}

/// The neutral phrase, capitalized if the claim it replaces was.
fn neutral(claim: &str, phrase: &str) -> String {
    if !claim.starts_with(char::is_uppercase) {
        return phrase.to_string();
    }
    let mut chars = phrase.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
