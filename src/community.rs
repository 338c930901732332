// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 chatmark contributors

//! Parses community inspiration messages into cards.
//!
//! These messages list posts from the community that a user could draw
//! on, in a loose, mostly line-oriented format:
//!
//! ```text
//! Reel 1 — Interações Engraçadas
//! Descrição: Faça humor com comentários ácidos.
//! Destaques: Engajamento alto; Comentários positivos
//! Link: https://example.com/r1
//! ```
//!
//! Each line is [classified](line::classify) on its own, then fed through
//! a small state machine that decides which card, and which field of that
//! card, the line belongs to.

pub mod line;

pub use line::{CardLink, Field, LineKind, classify, find_link, split_highlights};

use crate::link::is_safe_url;
use crate::text;
use log::{debug, trace};
use serde::Serialize;

/// Longest description kept on a card, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 320;

/// Most items kept in a footer.
pub const MAX_FOOTER_ITEMS: usize = 2;

/// A parsed community inspiration message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCommunityInspiration {
    /// Text before the first card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,

    pub cards: Vec<InspirationCard>,

    /// Which context was applied to the search, if the message says.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_note: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
}

/// One referenced piece of community content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct InspirationCard {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unique highlights, in the order they were given.
    pub highlights: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<CardLink>,
}

impl InspirationCard {
    fn new(title: String) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    /// The card's link, if it is safe to render as a link.
    pub fn safe_link(&self) -> Option<&CardLink> {
        self.link.as_ref().filter(|link| is_safe_url(&link.url))
    }

    fn push_description(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        match self.description.as_mut() {
            Some(description) if !description.is_empty() => {
                description.push(' ');
                description.push_str(text);
            }
            _ => self.description = Some(text.to_string()),
        }
    }

    fn has_description(&self) -> bool {
        self.description.as_ref().is_some_and(|d| !d.is_empty())
    }

    fn push_highlights(&mut self, value: &str) {
        self.highlights.extend(split_highlights(value));
    }

    /// Trims the description and removes duplicate highlights.
    fn finish(mut self) -> Self {
        self.description = self
            .description
            .map(|description| text::clamp(description.trim(), MAX_DESCRIPTION_CHARS))
            .filter(|description| !description.is_empty());
        self.highlights = text::dedupe(self.highlights);
        self
    }
}

/// A closing "next step" section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Footer {
    pub heading: String,
    pub items: Vec<String>,
}

/// What the parser is doing with the lines it is fed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Not inside any field.
    #[default]
    Idle,

    /// Appending lines to the current card's description.
    CollectingDescription,

    /// Adding lines to the current card's highlights.
    CollectingHighlights,

    /// Waiting for the link promised by an empty `Link:` field.
    CollectingLink,

    /// Everything from here on belongs to the footer.
    InFooter,
}

impl State {
    /// True while lines are being appended to a description or a list of
    /// highlights.
    pub fn is_collecting(self) -> bool {
        matches!(self, State::CollectingDescription | State::CollectingHighlights)
    }

    /// The state after a line of the given kind.
    ///
    /// The footer is final: once entered, no line leaves it.
    pub fn next(self, kind: &LineKind) -> State {
        match (self, kind) {
            (State::InFooter, _) => State::InFooter,
            (_, LineKind::FooterHeading { .. }) => State::InFooter,
            (_, LineKind::CardHeading(_)) => State::Idle,
            (_, LineKind::Field(Field::Description, _)) => State::CollectingDescription,
            (_, LineKind::Field(Field::Highlights, _)) => State::CollectingHighlights,
            (_, LineKind::Field(Field::Link, value)) if find_link(value).is_none() => {
                State::CollectingLink
            }
            (_, LineKind::Field(Field::Link, _)) => State::Idle,
            (_, LineKind::Link(_)) => State::Idle,
            (State::CollectingLink, LineKind::Text(_)) => State::Idle,
            (state, _) => state,
        }
    }
}

/// Parses a community inspiration message.
///
/// A message with no card headings yields no cards, which tells the caller
/// to render the message some other way.
///
/// # Examples
///
/// ```
/// use chatmark::community::parse_community_inspiration;
/// let parsed = parse_community_inspiration("Reel 1 — Teste\nDescrição: abc\nLink: https://example.com");
/// assert_eq!(parsed.cards.len(), 1);
/// assert_eq!(parsed.cards[0].description.as_deref(), Some("abc"));
/// assert_eq!(parsed.cards[0].link.as_ref().unwrap().url, "https://example.com");
/// ```
pub fn parse_community_inspiration(text: &str) -> ParsedCommunityInspiration {
    let text = line::unglue_headings(text);
    let mut parser = Parser::default();

    text.lines()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .filter(|raw| {
            let noise = line::is_noise(raw);
            if noise {
                trace!("dropping noise line {raw:?}");
            }
            !noise
        })
        .for_each(|raw| parser.feed(raw));

    parser.finish()
}

/// A bulleted card heading with no number or separator, such as
/// `- **Vídeo** curto`, which inside a field is more likely a list item.
fn is_weak_heading(raw: &str) -> bool {
    let unquoted = line::unquote(raw);
    text::strip_bullet(&unquoted) != unquoted && !line::is_numbered_heading(&unquoted)
}

#[derive(Debug, Default)]
struct Parser {
    state: State,
    intro: Vec<String>,
    cards: Vec<InspirationCard>,
    current: Option<InspirationCard>,
    context_note: Option<String>,
    footer: Option<Footer>,
}

impl Parser {
    fn feed(&mut self, raw: &str) {
        if self.state == State::InFooter {
            self.push_footer_item(raw);
            return;
        }

        let state = self.state;
        let kind = match classify(raw) {
            LineKind::CardHeading(_) if state.is_collecting() && is_weak_heading(raw) => {
                trace!("keeping bulleted line {raw:?} in the current field");
                LineKind::Text(line::unquote(raw))
            }
            kind => kind,
        };
        self.state = state.next(&kind);

        match kind {
            LineKind::Note => {}
            LineKind::Context(note) => {
                if self.context_note.is_none() && !note.is_empty() {
                    self.context_note = Some(note);
                }
            }
            LineKind::FooterHeading { heading, rest } => {
                debug!("footer {heading:?} starts");
                self.footer = Some(Footer {
                    heading,
                    items: Vec::new(),
                });
                if !rest.is_empty() {
                    self.push_footer_item(&rest);
                }
            }
            LineKind::CardHeading(title) => {
                self.commit();
                self.current = Some(InspirationCard::new(title));
            }
            LineKind::Field(field, value) => self.fill(field, &value, raw),
            LineKind::Link(link) => {
                if let Some(card) = self.current.as_mut().filter(|card| card.link.is_none()) {
                    card.link = Some(link);
                } else {
                    self.push_text(state, &line::unquote(raw));
                }
            }
            LineKind::Text(text) => self.push_text(state, &text),
        }
    }

    fn fill(&mut self, field: Field, value: &str, raw: &str) {
        let Some(card) = self.current.as_mut() else {
            self.intro.push(line::unquote(raw));
            self.state = State::Idle;
            return;
        };

        match field {
            Field::Description => card.push_description(value),
            Field::Highlights => card.push_highlights(value),
            Field::Link => {
                if let Some(link) = find_link(value) {
                    card.link = Some(link);
                }
            }
        }
    }

    /// Handles a line that is not a field, given the state before it.
    fn push_text(&mut self, state: State, text: &str) {
        let Some(card) = self.current.as_mut() else {
            self.intro.push(text.to_string());
            return;
        };

        match state {
            State::CollectingDescription => card.push_description(text),
            State::CollectingHighlights => card.push_highlights(text),
            State::CollectingLink if card.link.is_none() && find_link(text).is_some() => {
                card.link = find_link(text);
            }
            _ if !card.has_description() => card.push_description(text),
            _ => card.push_highlights(text),
        }
    }

    fn push_footer_item(&mut self, raw: &str) {
        let Some(footer) = self.footer.as_mut() else {
            return;
        };
        let item = text::strip_bullet(&line::unquote(raw)).to_string();
        if !item.is_empty() && footer.items.len() < MAX_FOOTER_ITEMS {
            footer.items.push(item);
        }
    }

    fn commit(&mut self) {
        if let Some(card) = self.current.take() {
            self.cards.push(card.finish());
        }
    }

    fn finish(mut self) -> ParsedCommunityInspiration {
        self.commit();
        let intro = self.intro.join("\n");
        ParsedCommunityInspiration {
            intro: if intro.is_empty() { None } else { Some(intro) },
            cards: self.cards,
            context_note: self.context_note,
            footer: self.footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn it_parses_both_card_dialects() {
        let text = indoc! {"
            Reel 1 — Interações Engraçadas
            Descrição: Faça humor com comentários ácidos.
            Destaques: Engajamento alto; Comentários positivos; Formato rápido
            Link: https://example.com/r1

            Reel 2: Dancinha
            Destaques:
            - Salvamentos
            - Compartilhamentos
            Link: [Veja aqui](https://example.com/r2)
        "};

        let parsed = parse_community_inspiration(text);
        assert_eq!(
            parsed.cards,
            vec![
                InspirationCard {
                    title: String::from("Reel 1 — Interações Engraçadas"),
                    description: Some(String::from("Faça humor com comentários ácidos.")),
                    highlights: vec![
                        String::from("Engajamento alto"),
                        String::from("Comentários positivos"),
                        String::from("Formato rápido"),
                    ],
                    link: Some(CardLink::new("https://example.com/r1", None)),
                },
                InspirationCard {
                    title: String::from("Reel 2: Dancinha"),
                    description: None,
                    highlights: vec![String::from("Salvamentos"), String::from("Compartilhamentos")],
                    link: Some(CardLink::new("https://example.com/r2", Some("Veja aqui"))),
                },
            ]
        );
        assert_eq!(parsed.intro, None);
    }

    #[test]
    fn it_keeps_keyword_bullets_in_the_highlights() {
        let text = indoc! {"
            Reel 1 — Receita
            Destaques:
            - Vídeo curto e direto
            - **Post** salvo 2k vezes
            Link: https://example.com/r1
        "};

        let parsed = parse_community_inspiration(text);
        assert_eq!(
            parsed.cards,
            vec![InspirationCard {
                title: String::from("Reel 1 — Receita"),
                description: None,
                highlights: vec![String::from("Vídeo curto e direto"), String::from("**Post** salvo 2k vezes")],
                link: Some(CardLink::new("https://example.com/r1", None)),
            }]
        );
    }

    #[test]
    fn it_starts_a_new_card_on_a_numbered_bullet_heading() {
        let text = "Reel 1 — Receita\nDestaques:\n- Salvamentos\n- Reel 2: Dancinha\nDescrição: abc";
        let parsed = parse_community_inspiration(text);
        assert_eq!(parsed.cards.len(), 2);
        assert_eq!(parsed.cards[0].highlights, vec!["Salvamentos"]);
        assert_eq!(parsed.cards[1].title, "Reel 2: Dancinha");
    }

    #[test]
    fn it_strips_status_noise() {
        let text = "Vou buscar inspirações... Um momento!###\nReel 1 - Teste\nDescrição: abc";
        let parsed = parse_community_inspiration(text);

        assert_eq!(parsed.cards.len(), 1);
        assert!(parsed.cards[0].title.contains("Teste"));
        assert_eq!(parsed.intro, None);
        let json = serde_json::to_string(&parsed).unwrap();
        assert!(!json.contains("Vou buscar"));
        assert!(!json.contains("momento"));
    }

    #[test]
    fn it_parses_numbered_post_cards() {
        let text = indoc! {"
            Encontrei estes posts:
            1. Post de Humor com comentários
               - **Resumo**: Reage a comentários engraçados.
               - **Performance**: 2M views; 80k curtidas
               - **Link**: https://example.com/p1
            2. Post de Receita rápida
               - **Resumo**: Receita em 30 segundos.
               - **Performance**: 500k views
               - **Link**: [Ver post](https://example.com/p2)
        "};

        let parsed = parse_community_inspiration(text);
        assert_eq!(parsed.intro.as_deref(), Some("Encontrei estes posts:"));
        assert_eq!(parsed.cards.len(), 2);

        let first = &parsed.cards[0];
        assert_eq!(first.title, "Post de Humor com comentários");
        assert_eq!(first.description.as_deref(), Some("Reage a comentários engraçados."));
        assert_eq!(first.highlights, vec!["2M views", "80k curtidas"]);
        assert_eq!(first.link, Some(CardLink::new("https://example.com/p1", None)));

        assert_eq!(
            parsed.cards[1].link,
            Some(CardLink::new("https://example.com/p2", Some("Ver post")))
        );
    }

    #[test]
    fn it_accepts_link_only_cards() {
        let text = "### Reel 3 — Tutorial\n[Assista](https://example.com/r3)";
        let parsed = parse_community_inspiration(text);
        assert_eq!(parsed.cards.len(), 1);
        assert_eq!(parsed.cards[0].highlights, Vec::<String>::new());
        assert_eq!(parsed.cards[0].description, None);
        assert_eq!(
            parsed.cards[0].safe_link(),
            Some(&CardLink::new("https://example.com/r3", Some("Assista")))
        );
    }

    #[test]
    fn it_finds_no_cards_in_plain_text() {
        let parsed = parse_community_inspiration("Oi! Como posso ajudar hoje?");
        assert!(parsed.cards.is_empty());
        assert_eq!(parsed.intro.as_deref(), Some("Oi! Como posso ajudar hoje?"));
    }

    #[test]
    fn it_drops_task_mode_markers() {
        let text = "MODO TAREFA: inspirações\nReel 1: Teste\nTAREFA EM ANDAMENTO";
        let parsed = parse_community_inspiration(text);
        assert_eq!(parsed.cards.len(), 1);
        assert!(parsed.cards[0].highlights.is_empty());
        assert_eq!(parsed.cards[0].description, None);
    }

    #[test]
    fn it_appends_description_continuations() {
        let text = "Reel 1: Teste\nDescrição: Primeira parte\nsegunda parte\nDestaques: A • B ● A";
        let card = &parse_community_inspiration(text).cards[0];
        assert_eq!(card.description.as_deref(), Some("Primeira parte segunda parte"));
        assert_eq!(card.highlights, vec!["A", "B"]);
    }

    #[test]
    fn it_files_loose_lines_as_description_then_highlights() {
        let text = "Reel 1: Teste\nUm vídeo curto\nMuito compartilhado\nhttps://example.com/r1\nhttps://example.com/outro";
        let card = &parse_community_inspiration(text).cards[0];
        assert_eq!(card.description.as_deref(), Some("Um vídeo curto"));
        assert_eq!(card.highlights, vec!["Muito compartilhado", "https://example.com/outro"]);
        assert_eq!(card.link, Some(CardLink::new("https://example.com/r1", None)));
    }

    #[test]
    fn it_reads_a_link_from_the_line_after_an_empty_link_field() {
        let text = "Reel 1: Teste\nLink:\nhttps://example.com/r1";
        let card = &parse_community_inspiration(text).cards[0];
        assert_eq!(card.link, Some(CardLink::new("https://example.com/r1", None)));
    }

    #[test]
    fn it_clamps_long_descriptions() {
        let text = format!("Reel 1: Teste\nDescrição: {}", "a".repeat(400));
        let card = &parse_community_inspiration(&text).cards[0];
        let description = card.description.as_deref().unwrap();
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_CHARS);
        assert!(description.ends_with('…'));
    }

    #[test]
    fn it_keeps_only_the_first_context_note_and_skips_notes() {
        let text = indoc! {"
            > [!NOTE]
            > Contexto aplicado: nicho fitness
            > Contexto aplicado: outro
            Reel 1: Treino
        "};
        let parsed = parse_community_inspiration(text);
        assert_eq!(parsed.context_note.as_deref(), Some("nicho fitness"));
        assert_eq!(parsed.intro, None);
        assert_eq!(parsed.cards.len(), 1);
    }

    #[test]
    fn it_collects_at_most_two_footer_items() {
        let text = indoc! {"
            Reel 1: Treino
            Descrição: Série rápida
            ### Próximo passo
            - Grave seu reel hoje
            - Use o áudio em alta
            - Poste às 18h
            Reel 2: Não é um card
        "};
        let parsed = parse_community_inspiration(text);
        assert_eq!(parsed.cards.len(), 1);
        assert_eq!(
            parsed.footer,
            Some(Footer {
                heading: String::from("Próximo passo"),
                items: vec![
                    String::from("Grave seu reel hoje"),
                    String::from("Use o áudio em alta"),
                ],
            })
        );
    }

    #[test]
    fn it_hides_unsafe_card_links() {
        let text = "Reel 1: Teste\nLink: [clique](javascript:alert(1))";
        let card = &parse_community_inspiration(text).cards[0];
        assert!(card.link.is_some());
        assert_eq!(card.safe_link(), None);
    }

    #[test]
    fn it_transitions_between_states() {
        let description = LineKind::Field(Field::Description, String::new());
        let highlights = LineKind::Field(Field::Highlights, String::new());
        let empty_link = LineKind::Field(Field::Link, String::new());
        let text = LineKind::Text(String::from("oi"));
        let footer = LineKind::FooterHeading {
            heading: String::from("Próximo passo"),
            rest: String::new(),
        };
        let heading = LineKind::CardHeading(String::from("Reel 1"));

        assert_eq!(State::Idle.next(&description), State::CollectingDescription);
        assert_eq!(State::CollectingDescription.next(&text), State::CollectingDescription);
        assert_eq!(State::CollectingDescription.next(&highlights), State::CollectingHighlights);
        assert_eq!(State::CollectingHighlights.next(&heading), State::Idle);
        assert_eq!(State::Idle.next(&empty_link), State::CollectingLink);
        assert_eq!(State::CollectingLink.next(&text), State::Idle);
        assert_eq!(State::CollectingHighlights.next(&footer), State::InFooter);
        assert_eq!(State::InFooter.next(&heading), State::InFooter);
        assert_eq!(State::Idle.next(&LineKind::Note), State::Idle);
    }
}
