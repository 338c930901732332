// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Picks the right parser for a whole assistant message.

use crate::community::{LineKind, ParsedCommunityInspiration, classify, parse_community_inspiration};
use crate::markdown::blocks::is_table_separator;
use crate::markdown::{Block, parse_blocks, repair_planning_markdown};
use crate::script::{ParsedScript, has_script_tags, parse_script};
use log::debug;
use serde::Serialize;

/// The family of conversation a message belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageKind {
    /// An ordinary chat reply.
    #[default]
    General,

    /// A content plan, which gets [repaired](repair_planning_markdown)
    /// before it is parsed.
    Planning,
}

/// A message, parsed by whichever front end recognized it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum MessageContent {
    /// A tagged video script.
    Script(ParsedScript),

    /// Community inspiration cards.
    Community(ParsedCommunityInspiration),

    /// Generic Markdown.
    Blocks(Vec<Block>),
}

/// Parses a message with the script parser, the community card parser, or
/// the generic block parser, in that order of preference.
///
/// A message is a script only if it has script tags and at least one
/// variation could be read from it. A general message is community
/// inspiration only if at least one card could be read, at least one line
/// is a card field or a bare link, and there is no table, which cards
/// cannot hold. Planning messages are never read as cards, since their
/// bullets routinely start with `**Reel:**`. Everything else is parsed as
/// Markdown.
///
/// # Examples
///
/// ```
/// use chatmark::message::{MessageContent, MessageKind, parse_message};
/// let content = parse_message("Reel 1: Teste\nDescrição: abc", MessageKind::General);
/// assert!(matches!(content, MessageContent::Community(_)));
///
/// let content = parse_message("# Oi", MessageKind::General);
/// assert!(matches!(content, MessageContent::Blocks(_)));
/// ```
pub fn parse_message(text: &str, kind: MessageKind) -> MessageContent {
    if has_script_tags(text) {
        let script = parse_script(text);
        if !script.variations.is_empty() {
            debug!("parsed {} script variations", script.variations.len());
            return MessageContent::Script(script);
        }
        debug!("script tags found, but no variations");
    }

    if kind == MessageKind::Planning {
        return MessageContent::Blocks(parse_blocks(&repair_planning_markdown(text)));
    }

    if !looks_like_cards(text) {
        return MessageContent::Blocks(parse_blocks(text));
    }

    let community = parse_community_inspiration(text);
    if !community.cards.is_empty() {
        debug!("parsed {} community inspiration cards", community.cards.len());
        return MessageContent::Community(community);
    }

    MessageContent::Blocks(parse_blocks(text))
}

/// True if `text` has card fields and no tables.
fn looks_like_cards(text: &str) -> bool {
    let lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
    let mut has_field = false;

    for line in lines {
        if is_table_separator(line) {
            debug!("not reading a message with a table as cards");
            return false;
        }
        has_field = has_field || matches!(classify(line), LineKind::Field(..) | LineKind::Link(_));
    }

    has_field
}
