// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Renders parsed blocks as an HTML fragment.
//!
//! Every piece of text is escaped before the [inline markup
//! engine](crate::inline) touches it, so the output is safe to inject into
//! a page as long as the blocks came from [`parse_blocks()`].
//!
//! [`parse_blocks()`]: crate::markdown::parse_blocks

use crate::inline::{Theme, render_inline};
use crate::markdown::blocks::{Definition, PivotedTable, Table};
use crate::markdown::{Block, TextAppendable, Visitable, Visitor};
use itertools::Itertools;
use log::trace;

/// Converts parsed blocks into an HTML fragment styled with the given
/// `theme`.
///
/// # Examples
///
/// ```
/// use chatmark::inline::Theme;
/// use chatmark::markdown::{parse_blocks, render_html};
/// let blocks = parse_blocks("## Oi\n- **a**\n- b");
/// assert_eq!(
///     render_html(&blocks, Theme::Default),
///     "<h2>Oi</h2>\n<ul><li><strong>a</strong></li><li>b</li></ul>"
/// );
/// ```
pub fn render_html(blocks: &[Block], theme: Theme) -> String {
    let mut visitor = HtmlVisitor::new(theme);
    blocks.accept(&mut visitor);
    visitor.text()
}

#[derive(Debug)]
struct HtmlVisitor {
    html: Vec<String>,
    theme: Theme,
}

impl HtmlVisitor {
    fn new(theme: Theme) -> Self {
        Self {
            html: Vec::new(),
            theme,
        }
    }

    fn inline(&self, text: &str) -> String {
        render_inline(text, self.theme)
    }

    fn list_items(&self, items: &[String]) -> String {
        items
            .iter()
            .map(|item| format!("<li>{}</li>", self.inline(item)))
            .join("")
    }

    fn visit_heading(&mut self, level: u8, text: &str) {
        let heading = format!("<h{level}>{}</h{level}>", self.inline(text));
        self.push_text(&heading);
    }

    fn visit_paragraph(&mut self, text: &str) {
        let lines = text.lines().map(|line| self.inline(line)).join("<br>");
        self.push_text(&format!("<p>{lines}</p>"));
    }

    fn visit_blockquote(&mut self, text: &str) {
        let quote = format!("<blockquote>{}</blockquote>", self.inline(text));
        self.push_text(&quote);
    }

    fn visit_unordered_list(&mut self, items: &[String]) {
        let list = format!("<ul>{}</ul>", self.list_items(items));
        self.push_text(&list);
    }

    fn visit_ordered_list(&mut self, items: &[String]) {
        let list = format!("<ol>{}</ol>", self.list_items(items));
        self.push_text(&list);
    }

    fn visit_label_list(&mut self, labels: &[String]) {
        let labels = labels
            .iter()
            .map(|label| format!("<li><strong>{}</strong></li>", self.inline(label)))
            .join("");
        self.push_text(&format!(r#"<ul class="cm-label-list">{labels}</ul>"#));
    }

    fn visit_definition_list(&mut self, pairs: &[Definition]) {
        let pairs = pairs
            .iter()
            .map(|pair| {
                format!(
                    "<dt>{}</dt><dd>{}</dd>",
                    self.inline(&pair.label),
                    self.inline(&pair.value)
                )
            })
            .join("");
        self.push_text(&format!("<dl>{pairs}</dl>"));
    }

    fn visit_table(&mut self, table: &Table) {
        let headers = table
            .headers
            .iter()
            .map(|header| format!("<th>{}</th>", self.inline(header)))
            .join("");
        let rows = table
            .rows
            .iter()
            .map(|row| {
                let cells = row
                    .iter()
                    .map(|cell| format!("<td>{}</td>", self.inline(cell)))
                    .join("");
                format!("<tr>{cells}</tr>")
            })
            .join("");
        self.push_text(&format!(
            "<table><thead><tr>{headers}</tr></thead><tbody>{rows}</tbody></table>"
        ));
    }

    fn visit_pivoted_table(&mut self, table: &PivotedTable) {
        trace!("rendering pivoted table with {} rows", table.rows.len());

        let headers = std::iter::once(&table.row_label)
            .chain(table.column_labels.iter())
            .map(|header| format!("<th>{}</th>", self.inline(header)))
            .join("");

        let rows = table
            .rows
            .iter()
            .map(|row| {
                let cells = row
                    .values
                    .iter()
                    .zip(table.column_labels.iter())
                    .map(|(value, label)| {
                        let most_common = table.majority_value_by_column.get(label) == Some(value);
                        if most_common {
                            format!(r#"<td class="cm-most-common">{}</td>"#, self.inline(value))
                        } else {
                            format!("<td>{}</td>", self.inline(value))
                        }
                    })
                    .join("");
                format!(
                    r#"<tr><th scope="row">{}</th>{cells}</tr>"#,
                    self.inline(&row.title)
                )
            })
            .join("");

        self.push_text(&format!(
            r#"<table class="cm-pivot"><thead><tr>{headers}</tr></thead><tbody>{rows}</tbody></table>"#
        ));
    }
}

impl TextAppendable for HtmlVisitor {
    fn push_text(&mut self, text: &str) {
        self.html.push(text.to_string());
    }
}

impl Visitor for HtmlVisitor {
    fn text(&self) -> String {
        self.html.join("\n")
    }

    fn visit(&mut self, block: &Block) {
        match block {
            Block::Heading { level, text } => self.visit_heading(*level, text),
            Block::HorizontalRule => self.push_text("<hr>"),
            Block::Blockquote { text } => self.visit_blockquote(text),
            Block::Paragraph { text } => self.visit_paragraph(text),
            Block::UnorderedList { items } => self.visit_unordered_list(items),
            Block::OrderedList { items } => self.visit_ordered_list(items),
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

    fn render(text: &str) -> String {
        render_html(&parse_blocks(text), Theme::Default)
    }

    #[test]
    fn it_renders_nothing_for_nothing() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn it_renders_paragraph_newlines_as_breaks() {
        assert_eq!(render("um\ndois"), "<p>um<br>dois</p>");
    }

    #[test]
    fn it_escapes_text() {
        assert_eq!(render("<script>alert(1)</script>"), "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>");
    }

    #[test]
    fn it_renders_rules_and_quotes() {
        assert_eq!(render("---\n> oi"), "<hr>\n<blockquote>oi</blockquote>");
    }

    #[test]
    fn it_renders_the_summary_fixture() {
        let expected = indoc! {"
            <h1>Resumo</h1>
            <h2>Insights</h2>
            <ul><li>ponto um</li><li>ponto dois</li></ul>
            <ol><li>passo um</li><li>passo dois</li></ol>
            <table><thead><tr><th>Coluna</th><th>Valor</th></tr></thead><tbody><tr><td>A</td><td>1</td></tr></tbody></table>"};
        assert_eq!(render(&load_markdown("summary")), expected);
    }

    #[test]
    fn it_renders_definition_and_label_lists() {
        assert_eq!(
            render("- **Dia:** Terça\n\n- **Semana 1:**"),
            "<dl><dt>Dia</dt><dd>Terça</dd></dl>\n<ul class=\"cm-label-list\"><li><strong>Semana 1</strong></li></ul>"
        );
    }

    #[test]
    fn it_marks_most_common_pivot_values() {
        let html = render(&load_markdown("weekly_plan"));
        assert!(html.contains(r#"<table class="cm-pivot"><thead><tr><th>Semana</th><th>Formato</th>"#));
        assert_eq!(html.matches(r#"<td class="cm-most-common">Reel</td>"#).count(), 4);
        assert!(html.contains(r#"<th scope="row">Semana 3</th>"#));
    }

    #[test]
    fn it_links_only_safe_urls() {
        let text = "veja https://example.com\njavascript:alert(1)\ndata:text/html,oi";
        let html = render(text);
        assert_eq!(html.matches("<a ").count(), 1);
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains("javascript:alert(1)"));
        assert!(html.contains("data:text/html,oi"));
    }
}
