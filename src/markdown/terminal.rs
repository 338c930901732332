// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Renders parsed blocks for display on a terminal.
//!
//! Styling is deliberately basic: bold and underlined text only, so the
//! output looks right on the most basic of terminals. Text is wrapped to
//! the width given to [`render_terminal()`].

use crate::markdown::blocks::{Definition, PivotedTable, Table};
use crate::markdown::{Block, TextAppendable, Visitable, Visitor};
use colored::Colorize;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;
use textwrap::Options;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").unwrap());

static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==([^<>=\n]{1,200})==").unwrap());

/// Converts parsed blocks into a string suitable for output on a terminal.
///
/// `textwidth` is the column at which text is wrapped; normally this is
/// [`textwrap::termwidth()`], but any value may be specified.
pub fn render_terminal(blocks: &[Block], textwidth: usize) -> String {
    let mut visitor = TerminalVisitor::new(textwidth);
    blocks.accept(&mut visitor);
    visitor.text()
}

/// Turns inline Markdown emphasis into terminal styling.
fn emphasize(text: &str) -> String {
    let text = BOLD.replace_all(text, |caps: &regex::Captures| caps[1].bold().to_string());
    HIGHLIGHT
        .replace_all(&text, |caps: &regex::Captures| caps[1].underline().to_string())
        .into_owned()
}

#[derive(Debug)]
struct TerminalVisitor {
    sections: Vec<String>,
    textwidth: usize,
}

impl TerminalVisitor {
    fn new(textwidth: usize) -> Self {
        Self {
            sections: Vec::new(),
            textwidth,
        }
    }

    fn fill(&self, text: &str, initial_indent: &str, subsequent_indent: &str) -> String {
        let options = Options::new(self.textwidth)
            .initial_indent(initial_indent)
            .subsequent_indent(subsequent_indent);
        textwrap::fill(&emphasize(text), options)
    }

    fn visit_heading(&mut self, text: &str) {
        let heading = crate::text::strip_bold(text).bold().to_string();
        self.push_text(&heading);
    }

    fn visit_paragraph(&mut self, text: &str) {
        let paragraph = text.lines().map(|line| self.fill(line, "", "")).join("\n");
        self.push_text(&paragraph);
    }

    fn visit_blockquote(&mut self, text: &str) {
        let quote = self.fill(text, "> ", "> ");
        self.push_text(&quote);
    }

    fn visit_list(&mut self, items: &[String], ordered: bool) {
        let list = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let marker = if ordered {
                    format!("{}. ", i + 1)
                } else {
                    String::from("• ")
                };
                let indent = " ".repeat(marker.chars().count());
                self.fill(item, &marker, &indent)
            })
            .join("\n");
        self.push_text(&list);
    }

    fn visit_label_list(&mut self, labels: &[String]) {
        let list = labels
            .iter()
            .map(|label| format!("• {}", label.bold()))
            .join("\n");
        self.push_text(&list);
    }

    fn visit_definition_list(&mut self, pairs: &[Definition]) {
        let list = pairs
            .iter()
            .map(|pair| {
                let line = format!("**{}:** {}", pair.label, pair.value);
                self.fill(line.trim_end(), "", "  ")
            })
            .join("\n");
        self.push_text(&list);
    }

    fn visit_table(&mut self, table: &Table) {
        let header = table.headers.iter().map(|h| h.bold()).join(" | ");
        let rows = table.rows.iter().map(|row| emphasize(&row.iter().join(" | ")));
        let table = std::iter::once(header).chain(rows).join("\n");
        self.push_text(&table);
    }

    fn visit_pivoted_table(&mut self, table: &PivotedTable) {
        let header = std::iter::once(&table.row_label)
            .chain(table.column_labels.iter())
            .map(|h| h.bold())
            .join(" | ");
        let rows = table.rows.iter().map(|row| {
            let values = row
                .values
                .iter()
                .zip(table.column_labels.iter())
                .map(|(value, label)| {
                    if table.majority_value_by_column.get(label) == Some(value) {
                        value.underline().to_string()
                    } else {
                        value.to_string()
                    }
                });
            std::iter::once(row.title.bold().to_string())
                .chain(values)
                .join(" | ")
        });
        let table = std::iter::once(header).chain(rows).join("\n");
        self.push_text(&table);
    }
}

impl TextAppendable for TerminalVisitor {
    fn push_text(&mut self, text: &str) {
        self.sections.push(text.to_string());
    }
}

impl Visitor for TerminalVisitor {
    fn text(&self) -> String {
        self.sections.join("\n\n")
    }

    fn visit(&mut self, block: &Block) {
        match block {
            Block::Heading { text, .. } => self.visit_heading(text),
            Block::HorizontalRule => {
                let rule = "-".repeat(self.textwidth);
                self.push_text(&rule);
            }
            Block::Blockquote { text } => self.visit_blockquote(text),
            Block::Paragraph { text } => self.visit_paragraph(text),
            Block::UnorderedList { items } => self.visit_list(items, false),
            Block::OrderedList { items } => self.visit_list(items, true),
            Block::LabelList { labels } => self.visit_label_list(labels),
            Block::DefinitionList { pairs } => self.visit_definition_list(pairs),
            Block::Table(table) => self.visit_table(table),
            Block::PivotedTable(table) => self.visit_pivoted_table(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_blocks;
    use crate::markdown::test_utils::load_markdown;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn render(text: &str, textwidth: usize) -> String {
        colored::control::set_override(false);
        render_terminal(&parse_blocks(text), textwidth)
    }

    #[test]
    fn it_separates_blocks_with_blank_lines() {
        let text = "# Título\ntexto\n---";
        assert_eq!(render(text, 10), "Título\n\ntexto\n\n----------");
    }

    #[test]
    fn it_wraps_paragraphs() {
        assert_eq!(render("aaaa bbbb cccc", 9), "aaaa bbbb\ncccc");
    }

    #[test]
    fn it_hangs_wrapped_list_items() {
        assert_eq!(render("- aaaa bbbb cccc", 11), "• aaaa bbbb\n  cccc");
    }

    #[test]
    fn it_numbers_ordered_lists() {
        let text = "1. um\n2. dois";
        assert_eq!(render(text, 80), "1. um\n2. dois");
    }

    #[test]
    fn it_strips_emphasis_markers_without_color() {
        let text = "**Formato:** Reel\n**Dia:** Terça";
        assert_eq!(render(text, 80), "Formato: Reel\nDia: Terça");
    }

    #[test]
    fn it_quotes_blockquotes() {
        assert_eq!(render("> uma citação", 80), "> uma citação");
    }

    #[test]
    fn it_renders_tables_as_rows() {
        let expected = indoc! {"
            Resumo

            Insights

            • ponto um
            • ponto dois

            1. passo um
            2. passo dois

            Coluna | Valor
            A | 1"};
        assert_eq!(render(&load_markdown("summary"), 80), expected);
    }

    #[test]
    fn it_renders_pivoted_tables() {
        let output = render(&load_markdown("weekly_plan"), 80);
        assert!(output.contains("Semana | Formato | Dia | Tema | Meta"));
        assert!(output.contains("Semana 3 | Reel | Terça | — | —"));
    }
}
