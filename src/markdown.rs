// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Markdown parsing for assistant chat messages.
//!
//! This is not a general Markdown parser. It understands the small,
//! somewhat sloppy dialect that the assistant actually produces and turns
//! it into a flat list of typed [`Block`]s that any renderer can consume.
//! Two reference renderers are included: [`html`] and [`terminal`].
//!
//! Planning messages should go through [`repair::repair_planning_markdown()`]
//! before they are parsed.

pub mod blocks;
pub mod html;
pub mod pivot;
pub mod repair;
pub mod terminal;

pub use blocks::{Block, Definition, PivotRow, PivotedTable, Table, parse_blocks};
pub use html::render_html;
pub use repair::repair_planning_markdown;
pub use terminal::render_terminal;

/// "Visit" a block and emit code.
///
/// For example, a `Visitor` can embody an algorithm used to visit each
/// block in a parsed message and emit HTML for it.
pub trait Visitor {
    /// The generated text.
    fn text(&self) -> String;

    /// "Visit" a particular block.
    fn visit(&mut self, block: &Block);
}

/// A data structure that can be visited.
pub trait Visitable {
    /// Accept a visitor for processing the visitable item.
    fn accept<V: Visitor>(&self, visitor: &mut V);
}

impl Visitable for Block {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        visitor.visit(self);
    }
}

impl Visitable for [Block] {
    fn accept<V: Visitor>(&self, visitor: &mut V) {
        for block in self {
            block.accept(visitor);
        }
    }
}

/// A data type that can append text.
trait TextAppendable {
    /// Appends `text` to the target data structure.
    fn push_text(&mut self, text: &str);
}

#[cfg(test)]
mod test_utils;
