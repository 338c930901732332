// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! chatmark turns the loosely formatted replies of a content-planning chat
//! assistant into structured, safely renderable content. It understands
//! three kinds of message:
//!
//! - generic Markdown, parsed into [blocks](markdown::Block), with runs of
//!   per-week or per-post definition lists folded into
//!   [comparison tables](markdown::PivotedTable);
//! - tagged video scripts, parsed into [variations](script::ScriptVariation)
//!   with scene timelines and captions;
//! - community inspiration replies, parsed into
//!   [cards](community::InspirationCard).
//!
//! [`message::parse_message()`] picks the right parser for a message. Every
//! parser is total: malformed input degrades into paragraphs or empty
//! results, never an error.
//!
//! # Examples
//!
//! Parse and render a planning message from the command line, repairing
//! the usual glitches first:
//!
//! ```bash
//! chatmark html --planning plan.md
//! ```
//!
//! Print a tagged script as JSON:
//!
//! ```bash
//! chatmark script reply.md
//! ```
//!
//! Show any message in the terminal, 72 columns wide:
//!
//! ```bash
//! chatmark show --width 72 reply.md
//! ```
//!
//! Remove unproven "based on community posts" claims from stdin:
//!
//! ```bash
//! pbpaste | chatmark sanitize
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! chatmark --help
//! ```
//!
//! # Safety
//!
//! All text is HTML-escaped before any inline markup is applied, and only
//! `http` and `https` URLs ever become links (see [`link::is_safe_url()`]).
//!
//! # License
//!
//! chatmark is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0

pub mod claims;
pub mod cli;
pub mod community;
pub mod conf;
pub mod inline;
pub mod link;
pub mod markdown;
pub mod message;
pub mod script;
pub mod text;

#[cfg(test)]
mod test_utils;
