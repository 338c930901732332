// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! The block parser.
//!
//! Messages are read line by line. Each non-blank line is offered to an
//! ordered list of [constructs](CONSTRUCTS); the first construct that
//! recognizes the line consumes it along with any following lines that
//! belong to it. Lines nobody recognizes pile up into a paragraph.
//!
//! Parsing never fails. Anything unrecognized simply degrades into a
//! paragraph.

use crate::markdown::pivot;
use crate::text;
use log::trace;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static HORIZONTAL_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:-{3,}|_{3,}|\*{3,})$").unwrap());

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

static TABLE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\|?\s*:?-{3,}:?\s*(?:\|\s*:?-{3,}:?\s*)*\|?$").unwrap()
});

static BULLET_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*]\s+").unwrap());

static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+").unwrap());

static BOLD_LABEL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\*([^*]+?)\*\*(.*)$").unwrap());

static PLAIN_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\p{L}\p{N}][\p{L}\p{N} ()/&-]{0,29}?)\s*:\s+(\S.*)$").unwrap()
});

/// Longest plain label, in words, that still reads as a label rather than
/// the start of a sentence.
const MAX_PLAIN_LABEL_WORDS: usize = 4;

/// One structurally classified unit of a parsed message.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Block {
    /// A heading. `level` is always 1, 2, or 3.
    Heading { level: u8, text: String },

    /// A horizontal rule.
    #[serde(rename = "hr")]
    HorizontalRule,

    /// Quoted text, with consecutive quoted lines joined by spaces.
    Blockquote { text: String },

    /// A paragraph. Internal newlines are line breaks.
    Paragraph { text: String },

    /// A bulleted list.
    UnorderedList { items: Vec<String> },

    /// A numbered list.
    OrderedList { items: Vec<String> },

    /// A bulleted list of bold labels, none of which has a value.
    LabelList { labels: Vec<String> },

    /// Label/value pairs.
    DefinitionList { pairs: Vec<Definition> },

    /// A table.
    Table(Table),

    /// A table synthesized from repeated heading + definition list pairs.
    PivotedTable(PivotedTable),
}

/// A label and its value in a [`Block::DefinitionList`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub label: String,
    pub value: String,
}

impl Definition {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        let label = label.into();
        let value = value.into();
        Self { label, value }
    }
}

/// A plain Markdown table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A comparison table folded from a run of headings, each followed by a
/// definition list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PivotedTable {
    /// Header for the column holding each row's title.
    pub row_label: String,

    /// Every definition label in the run, in the order first seen.
    pub column_labels: Vec<String>,

    /// One row per heading.
    pub rows: Vec<PivotRow>,

    /// Columns in which one value appears in at least 75% of rows, mapped
    /// to that value.
    pub majority_value_by_column: BTreeMap<String, String>,
}

/// One row of a [`PivotedTable`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    pub title: String,
    pub values: Vec<String>,
}

/// Parses a message into a list of blocks, in source order.
///
/// # Examples
///
/// ```
/// use chatmark::markdown::{Block, parse_blocks};
/// let blocks = parse_blocks("# Resumo\n\nTudo certo.");
/// assert_eq!(
///     blocks,
///     vec![
///         Block::Heading { level: 1, text: "Resumo".to_string() },
///         Block::Paragraph { text: "Tudo certo.".to_string() },
///     ]
/// );
/// ```
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let blocks = BlockParser::new(text).parse();
    pivot::fold(blocks)
}

/// A cursor over the lines of a message.
#[derive(Debug)]
struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(text: &'a str) -> Self {
        let lines = text.lines().collect();
        Self { lines, pos: 0 }
    }

    /// The current line, trimmed.
    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied().map(str::trim)
    }

    /// The line after the current one, trimmed.
    fn peek_next(&self) -> Option<&'a str> {
        self.lines.get(self.pos + 1).copied().map(str::trim)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    /// Consumes lines for as long as `pred` accepts them.
    fn take_while(&mut self, pred: impl Fn(&str) -> bool) -> Vec<&'a str> {
        let mut taken = Vec::new();
        while let Some(line) = self.current().filter(|line| pred(line)) {
            taken.push(line);
            self.advance();
        }
        taken
    }
}

/// The result of consuming a construct.
#[derive(Debug)]
enum Consumed {
    /// A finished block.
    Block(Block),

    /// Lines that turned out not to form a block after all and belong in
    /// the paragraph being built.
    Text(Vec<String>),
}

/// A block-level construct: how to recognize it and how to consume it.
struct Construct {
    name: &'static str,
    matches: fn(&Lines) -> bool,
    consume: fn(&mut Lines) -> Consumed,
}

/// Every construct, in priority order. The first match wins.
const CONSTRUCTS: [Construct; 7] = [
    Construct {
        name: "horizontal rule",
        matches: |lines| lines.current().is_some_and(is_horizontal_rule),
        consume: consume_horizontal_rule,
    },
    Construct {
        name: "heading",
        matches: |lines| lines.current().is_some_and(is_heading),
        consume: consume_heading,
    },
    Construct {
        name: "blockquote",
        matches: |lines| lines.current().is_some_and(is_blockquote),
        consume: consume_blockquote,
    },
    Construct {
        name: "table",
        matches: is_table_start,
        consume: consume_table,
    },
    Construct {
        name: "unordered list",
        matches: |lines| lines.current().is_some_and(is_bullet_item),
        consume: consume_bullet_list,
    },
    Construct {
        name: "ordered list",
        matches: |lines| lines.current().is_some_and(is_ordered_item),
        consume: consume_ordered_list,
    },
    Construct {
        name: "bold labels",
        matches: |lines| lines.current().and_then(parse_label).is_some(),
        consume: consume_bold_labels,
    },
];

#[derive(Debug)]
struct BlockParser<'a> {
    lines: Lines<'a>,
    blocks: Vec<Block>,
    paragraph: Vec<String>,
}

impl<'a> BlockParser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: Lines::new(text),
            blocks: Vec::new(),
            paragraph: Vec::new(),
        }
    }

    fn parse(mut self) -> Vec<Block> {
        while let Some(line) = self.lines.current() {
            if line.is_empty() {
                self.flush_paragraph();
                self.lines.advance();
                continue;
            }

            match CONSTRUCTS.iter().find(|c| (c.matches)(&self.lines)) {
                Some(construct) => {
                    trace!("line {} starts a {}: {line:?}", self.lines.pos, construct.name);
                    match (construct.consume)(&mut self.lines) {
                        Consumed::Block(block) => {
                            self.flush_paragraph();
                            self.blocks.push(block);
                        }
                        Consumed::Text(text) => self.paragraph.extend(text),
                    }
                }
                None => {
                    self.paragraph.push(line.to_string());
                    self.lines.advance();
                }
            }
        }

        self.flush_paragraph();
        self.blocks
    }

    fn flush_paragraph(&mut self) {
        if !self.paragraph.is_empty() {
            let text = self.paragraph.join("\n");
            self.paragraph.clear();
            self.blocks.push(Block::Paragraph { text });
        }
    }
}

fn is_horizontal_rule(line: &str) -> bool {
    HORIZONTAL_RULE.is_match(line)
}

fn is_heading(line: &str) -> bool {
    HEADING.is_match(line)
}

fn is_blockquote(line: &str) -> bool {
    line.starts_with('>')
}

fn is_bullet_item(line: &str) -> bool {
    BULLET_ITEM.is_match(line)
}

fn is_ordered_item(line: &str) -> bool {
    ORDERED_ITEM.is_match(line)
}

/// True if `line` is the `| --- | --- |` row under a table header.
pub(crate) fn is_table_separator(line: &str) -> bool {
    line.contains('|') && TABLE_SEPARATOR.is_match(line.trim())
}

fn is_table_start(lines: &Lines) -> bool {
    match (lines.current(), lines.peek_next()) {
        (Some(line), Some(next)) => line.contains('|') && is_table_separator(next),
        _ => false,
    }
}

/// True if `line` would start some construct other than a bold label.
fn is_structural(line: &str) -> bool {
    is_horizontal_rule(line)
        || is_heading(line)
        || is_blockquote(line)
        || is_bullet_item(line)
        || is_ordered_item(line)
        || line.starts_with('|')
}

/// Parses a bold label with an optional value.
///
/// Accepts `**Label:** value`, `**Label**: value`, and a bare
/// `**Label**` or `**Label:**`. A bold lead followed by other text but no
/// colon is not a label.
pub(crate) fn parse_label(item: &str) -> Option<Definition> {
    parse_label_with_colon(item).map(|(definition, _)| definition)
}

/// Like [`parse_label()`], but also reports whether the label ended in a
/// colon, which is what allows its value to sit on the next line.
fn parse_label_with_colon(item: &str) -> Option<(Definition, bool)> {
    let caps = BOLD_LABEL.captures(item.trim())?;
    let label = caps[1].trim();
    let rest = caps[2].trim();

    let (label, value, colon) = if let Some(label) = label.strip_suffix(':') {
        (label.trim(), rest, true)
    } else if let Some(value) = rest.strip_prefix(':') {
        (label, value.trim(), true)
    } else if rest.is_empty() {
        (label, rest, false)
    } else {
        return None;
    };

    if label.is_empty() {
        None
    } else {
        Some((Definition::new(label, text::tidy_markers(value)), colon))
    }
}

/// Parses a plain `Label: value` list item.
///
/// The label must be short and free of emphasis, URLs, and sentence
/// punctuation, and the value must not be empty, so that ordinary
/// sentences containing a colon stay list items.
fn parse_plain_label(item: &str) -> Option<Definition> {
    let caps = PLAIN_LABEL.captures(item.trim())?;
    let label = caps[1].trim();
    if label.split_whitespace().count() > MAX_PLAIN_LABEL_WORDS {
        return None;
    }
    Some(Definition::new(label, text::tidy_markers(&caps[2])))
}

/// Splits a table row into trimmed cells, dropping empty cells at either
/// edge of the row.
pub(crate) fn split_cells(row: &str) -> Vec<String> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);

    let mut cells: Vec<String> = row.split('|').map(|cell| cell.trim().to_string()).collect();
    while cells.last().is_some_and(|cell| cell.is_empty()) {
        cells.pop();
    }
    while cells.first().is_some_and(|cell| cell.is_empty()) {
        cells.remove(0);
    }
    cells
}

fn consume_horizontal_rule(lines: &mut Lines) -> Consumed {
    lines.advance();
    Consumed::Block(Block::HorizontalRule)
}

fn consume_heading(lines: &mut Lines) -> Consumed {
    let line = lines.current().unwrap_or_default();
    lines.advance();

    let (level, text) = match HEADING.captures(line) {
        Some(caps) => (caps[1].len().min(3) as u8, caps[2].to_string()),
        None => (3, line.to_string()),
    };
    let text = text.trim_end_matches('#').trim();
    let text = text::unwrap_bold(&text::tidy_markers(text));
    Consumed::Block(Block::Heading { level, text })
}

fn consume_blockquote(lines: &mut Lines) -> Consumed {
    let text = lines
        .take_while(is_blockquote)
        .into_iter()
        .map(|line| line[1..].strip_prefix(' ').unwrap_or(&line[1..]).trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Consumed::Block(Block::Blockquote { text })
}

fn consume_table(lines: &mut Lines) -> Consumed {
    let headers = split_cells(lines.current().unwrap_or_default());
    lines.advance();
    lines.advance();

    let rows = lines
        .take_while(|line| !line.is_empty() && line.contains('|'))
        .into_iter()
        .filter(|line| !TABLE_SEPARATOR.is_match(line))
        .map(split_cells)
        .filter(|cells| !cells.is_empty())
        .collect();

    Consumed::Block(Block::Table(Table { headers, rows }))
}

fn consume_bullet_list(lines: &mut Lines) -> Consumed {
    let items = lines
        .take_while(is_bullet_item)
        .into_iter()
        .map(|line| BULLET_ITEM.replace(line, "").into_owned())
        .collect();
    Consumed::Block(classify_bullets(items))
}

fn consume_ordered_list(lines: &mut Lines) -> Consumed {
    let items = lines
        .take_while(is_ordered_item)
        .into_iter()
        .map(|line| text::tidy_markers(&ORDERED_ITEM.replace(line, "")))
        .collect();
    Consumed::Block(Block::OrderedList { items })
}

fn consume_bold_labels(lines: &mut Lines) -> Consumed {
    let mut pairs = Vec::new();
    let mut raw = Vec::new();

    while let Some(line) = lines.current() {
        let Some((mut pair, colon)) = parse_label_with_colon(line) else {
            break;
        };
        raw.push(line.to_string());
        lines.advance();

        if pair.value.is_empty() && colon {
            if let Some(next) = lines.current() {
                if !next.is_empty() && parse_label(next).is_none() && !is_structural(next) {
                    trace!("pulling value for {:?} from the next line: {next:?}", pair.label);
                    pair.value = text::tidy_markers(next);
                    raw.push(next.to_string());
                    lines.advance();
                }
            }
        }

        pairs.push(pair);
    }

    if pairs.iter().any(|pair| !pair.value.is_empty()) {
        Consumed::Block(Block::DefinitionList { pairs })
    } else {
        Consumed::Text(raw)
    }
}

/// Decides whether bulleted items form a definition list, a label list,
/// or a plain list.
fn classify_bullets(items: Vec<String>) -> Block {
    let pairs: Option<Vec<Definition>> = items
        .iter()
        .map(|item| parse_label(item).or_else(|| parse_plain_label(item)))
        .collect();

    match pairs {
        Some(pairs) if pairs.iter().any(|pair| !pair.value.is_empty()) => {
            Block::DefinitionList { pairs }
        }
        Some(pairs) => Block::LabelList {
            labels: pairs.into_iter().map(|pair| pair.label).collect(),
        },
        None => Block::UnorderedList {
            items: items.iter().map(|item| text::tidy_markers(item)).collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::test_utils::load_markdown;
    use crate::test_utils::do_logging;
    use crate::{heading_tests, parse_assert_eq};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            text: String::from(text),
        }
    }

    #[test]
    fn it_does_not_touch_normal_text() {
        let text = "Lorem ipsum dolor sit amet";
        parse_assert_eq!(text, vec![paragraph(text)]);
    }

    #[test]
    fn it_parses_nothing_from_blank_input() {
        parse_assert_eq!("", Vec::<Block>::new());
        parse_assert_eq!("\n   \n", Vec::<Block>::new());
    }

    #[test]
    fn it_parses_the_summary_fixture() {
        do_logging();
        let expected = vec![
            Block::Heading {
                level: 1,
                text: String::from("Resumo"),
            },
            Block::Heading {
                level: 2,
                text: String::from("Insights"),
            },
            Block::UnorderedList {
                items: strings(&["ponto um", "ponto dois"]),
            },
            Block::OrderedList {
                items: strings(&["passo um", "passo dois"]),
            },
            Block::Table(Table {
                headers: strings(&["Coluna", "Valor"]),
                rows: vec![strings(&["A", "1"])],
            }),
        ];
        parse_assert_eq!(load_markdown("summary"), expected);
    }

    heading_tests!();

    #[test]
    fn it_unwraps_bold_headings() {
        parse_assert_eq!(
            "## **Resumo da semana**",
            vec![Block::Heading {
                level: 2,
                text: String::from("Resumo da semana"),
            }]
        );
    }

    #[test]
    fn it_requires_a_space_after_heading_markers() {
        parse_assert_eq!("#hashtag", vec![paragraph("#hashtag")]);
    }

    #[test]
    fn it_parses_horizontal_rules() {
        for rule in ["---", "___", "***", "-----"] {
            parse_assert_eq!(rule, vec![Block::HorizontalRule]);
        }
    }

    #[test]
    fn it_joins_blockquote_lines_with_spaces() {
        let text = indoc! {"
            > primeira linha
            >segunda linha
            >
            > terceira
        "};
        parse_assert_eq!(
            text,
            vec![Block::Blockquote {
                text: String::from("primeira linha segunda linha terceira"),
            }]
        );
    }

    #[test]
    fn it_joins_paragraph_lines_with_newlines() {
        let text = "linha um\nlinha dois\n\noutro parágrafo";
        parse_assert_eq!(
            text,
            vec![paragraph("linha um\nlinha dois"), paragraph("outro parágrafo")]
        );
    }

    #[test]
    fn it_ends_a_paragraph_at_a_construct_boundary() {
        let text = "introdução\n- item";
        parse_assert_eq!(
            text,
            vec![
                paragraph("introdução"),
                Block::UnorderedList {
                    items: strings(&["item"]),
                },
            ]
        );
    }

    #[test]
    fn it_trims_empty_edge_cells_from_tables() {
        let text = indoc! {"
            |Tempo|Visual|
            |---|---|
            | 00-03s | Close |  |
            | 03-20s | Tela |
        "};
        parse_assert_eq!(
            text,
            vec![Block::Table(Table {
                headers: strings(&["Tempo", "Visual"]),
                rows: vec![strings(&["00-03s", "Close"]), strings(&["03-20s", "Tela"])],
            })]
        );
    }

    #[test]
    fn it_does_not_mistake_pipes_for_tables() {
        let text = "a | b\nc | d";
        parse_assert_eq!(text, vec![paragraph("a | b\nc | d")]);
    }

    #[test]
    fn it_turns_labelled_bullets_into_definition_lists() {
        let text = indoc! {"
            - **Formato:** Reel
            - **Dia**: Terça
            - **Gancho:**
        "};
        parse_assert_eq!(
            text,
            vec![Block::DefinitionList {
                pairs: vec![
                    Definition::new("Formato", "Reel"),
                    Definition::new("Dia", "Terça"),
                    Definition::new("Gancho", ""),
                ],
            }]
        );
    }

    #[test]
    fn it_turns_plain_labelled_bullets_into_definition_lists() {
        parse_assert_eq!(
            "- Formato: Reel\n- Dia: Terça",
            vec![Block::DefinitionList {
                pairs: vec![Definition::new("Formato", "Reel"), Definition::new("Dia", "Terça")],
            }]
        );
        parse_assert_eq!(
            "- **Formato:** Reel\n- Melhor horário: 18h",
            vec![Block::DefinitionList {
                pairs: vec![Definition::new("Formato", "Reel"), Definition::new("Melhor horário", "18h")],
            }]
        );
    }

    #[test]
    fn it_keeps_sentences_with_colons_as_list_items() {
        let text = indoc! {"
            - Lembre-se de uma coisa importante na hora de gravar: luz natural
            - Veja https://example.com
            - Dica.: use legendas
            - Prazo:
        "};
        parse_assert_eq!(
            text,
            vec![Block::UnorderedList {
                items: strings(&[
                    "Lembre-se de uma coisa importante na hora de gravar: luz natural",
                    "Veja https://example.com",
                    "Dica.: use legendas",
                    "Prazo:",
                ]),
            }]
        );
    }

    #[test]
    fn it_folds_plain_labelled_plans_into_a_pivoted_table() {
        let text = indoc! {"
            ### Semana 1
            - Formato: Reel
            - Dia: Terça

            ### Semana 2
            - Formato: Reel
            - Dia: Quinta
        "};
        let blocks = parse_blocks(text);
        assert_eq!(blocks.len(), 1);
        let Block::PivotedTable(table) = &blocks[0] else {
            panic!("expected a pivoted table, got {:?}", blocks[0]);
        };
        assert_eq!(table.column_labels, strings(&["Formato", "Dia"]));
        assert_eq!(table.rows[1].values, strings(&["Reel", "Quinta"]));
    }

    #[test]
    fn it_turns_value_less_labels_into_label_lists() {
        let text = "- **Semana 1:**\n- **Semana 2**";
        parse_assert_eq!(
            text,
            vec![Block::LabelList {
                labels: strings(&["Semana 1", "Semana 2"]),
            }]
        );
    }

    #[test]
    fn it_keeps_mixed_bullets_as_a_plain_list() {
        let text = "- **Formato:** Reel\n- lembrar de postar **cedo";
        parse_assert_eq!(
            text,
            vec![Block::UnorderedList {
                items: strings(&["**Formato:** Reel", "lembrar de postar cedo"]),
            }]
        );
    }

    #[test]
    fn it_does_not_treat_bold_leads_as_labels() {
        let text = "- **Importante** lembrar disso";
        parse_assert_eq!(
            text,
            vec![Block::UnorderedList {
                items: strings(&["**Importante** lembrar disso"]),
            }]
        );
    }

    #[test]
    fn it_tidies_ordered_list_items() {
        let text = "1. passo **um\n2. passo **dois**";
        parse_assert_eq!(
            text,
            vec![Block::OrderedList {
                items: strings(&["passo um", "passo **dois**"]),
            }]
        );
    }

    #[test]
    fn it_parses_standalone_bold_labels() {
        let text = "**Objetivo:** crescer\n**Prazo**: 30 dias";
        parse_assert_eq!(
            text,
            vec![Block::DefinitionList {
                pairs: vec![
                    Definition::new("Objetivo", "crescer"),
                    Definition::new("Prazo", "30 dias"),
                ],
            }]
        );
    }

    #[test]
    fn it_pulls_a_label_value_from_the_next_line() {
        let text = "**Objetivo:**\nCrescer 10% no mês\n\nfim";
        parse_assert_eq!(
            text,
            vec![
                Block::DefinitionList {
                    pairs: vec![Definition::new("Objetivo", "Crescer 10% no mês")],
                },
                paragraph("fim"),
            ]
        );
    }

    #[test]
    fn it_does_not_pull_structural_lines_as_values() {
        let text = "**Objetivo:**\n- crescer";
        parse_assert_eq!(
            text,
            vec![
                paragraph("**Objetivo:**"),
                Block::UnorderedList {
                    items: strings(&["crescer"]),
                },
            ]
        );
    }

    #[test]
    fn it_degrades_value_less_bold_labels_to_paragraphs() {
        let text = "antes\n**Resumo**\ndepois";
        parse_assert_eq!(text, vec![paragraph("antes\n**Resumo**\ndepois")]);
    }

    #[test]
    fn it_folds_weekly_plans_into_a_pivoted_table() {
        let blocks = parse_blocks(&load_markdown("weekly_plan"));
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 2,
                text: String::from("Plano da semana"),
            }
        );
        assert_eq!(blocks[2], paragraph("Bom trabalho!"));

        let Block::PivotedTable(table) = &blocks[1] else {
            panic!("expected a pivoted table, got {:?}", blocks[1]);
        };
        assert_eq!(table.row_label, "Semana");
        assert_eq!(table.column_labels, strings(&["Formato", "Dia", "Tema", "Meta"]));
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[2].values, strings(&["Reel", "Terça", "—", "—"]));
        assert_eq!(
            table.majority_value_by_column,
            BTreeMap::from([(String::from("Formato"), String::from("Reel"))])
        );
    }

    #[test]
    fn it_serializes_blocks_with_a_type_tag() {
        let blocks = parse_blocks("# Oi\n\n---\n\n- **Dia:** Terça");
        let json = serde_json::to_value(&blocks).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "type": "heading", "level": 1, "text": "Oi" },
                { "type": "hr" },
                { "type": "definitionList", "pairs": [{ "label": "Dia", "value": "Terça" }] },
            ])
        );
    }
}
