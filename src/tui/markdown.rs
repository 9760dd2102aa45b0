//! Markdown → ratatui `Text` for assistant replies.
//!
//! Covers what chat replies actually use: paragraphs, headings, emphasis,
//! inline code, fenced code (highlighted with syntect), lists, quotes and
//! links. Anything else is dropped silently.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME: LazyLock<Option<Theme>> = LazyLock::new(|| {
    ThemeSet::load_defaults()
        .themes
        .remove("base16-ocean.dark")
});

const CODE_INDENT: &str = "  ";
const QUOTE_BAR: &str = "▌ ";

/// Render markdown with `base` as the foreground for unstyled text.
pub fn render(content: &str, base: Color) -> Text<'static> {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut renderer = Renderer::new(base);
    for event in Parser::new_ext(content, options) {
        renderer.event(event);
    }
    renderer.finish()
}

struct Renderer {
    base: Color,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    inline: Vec<Style>,
    quote_depth: usize,
    lists: Vec<Option<u64>>,
    code: Option<CodeBlock>,
    link: Option<String>,
    gap_pending: bool,
}

/// A fenced or indented block being collected.
struct CodeBlock {
    lang: String,
    source: String,
}

impl Renderer {
    fn new(base: Color) -> Self {
        Self {
            base,
            lines: Vec::new(),
            current: Vec::new(),
            inline: Vec::new(),
            quote_depth: 0,
            lists: Vec::new(),
            code: None,
            link: None,
            gap_pending: false,
        }
    }

    fn style(&self) -> Style {
        self.inline
            .iter()
            .fold(Style::default().fg(self.base), |acc, s| acc.patch(*s))
    }

    fn prefix(&self) -> Vec<Span<'static>> {
        (0..self.quote_depth)
            .map(|_| Span::styled(QUOTE_BAR, Style::default().fg(Color::DarkGray)))
            .collect()
    }

    /// Close the line being built, if it has anything in it.
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let mut spans = self.prefix();
        spans.append(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn start_block(&mut self) {
        self.flush();
        if self.gap_pending && !self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.gap_pending = false;
    }

    fn end_block(&mut self) {
        self.flush();
        self.gap_pending = true;
    }

    fn event(&mut self, event: Event<'_>) {
        if let Some(code) = self.code.as_mut() {
            match event {
                Event::Text(text) => code.source.push_str(&text),
                Event::End(TagEnd::CodeBlock) => self.close_code(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(text) => {
                let style = self.style();
                self.current
                    .push(Span::styled(text.replace('\t', "    "), style));
            }
            Event::Code(code) => self.current.push(Span::styled(
                code.to_string(),
                Style::default().fg(Color::Yellow).bg(Color::Black),
            )),
            Event::SoftBreak => self.current.push(Span::raw(" ")),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.start_block();
                self.lines.push(Line::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                ));
                self.gap_pending = true;
            }
            Event::TaskListMarker(done) => {
                self.current
                    .push(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // Paragraphs inside list items continue the bullet line
                if self.lists.is_empty() {
                    self.start_block();
                }
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                self.inline.push(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.quote_depth += 1;
                self.inline
                    .push(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) => lang.split_whitespace().next().unwrap_or("").to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                self.code = Some(CodeBlock {
                    lang,
                    source: String::new(),
                });
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                } else {
                    self.flush();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.current
                    .push(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self
                .inline
                .push(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self
                .inline
                .push(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self
                .inline
                .push(Style::default().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.inline.push(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.lists.is_empty() {
                    self.end_block();
                } else {
                    self.flush();
                }
            }
            TagEnd::Heading(_) => {
                self.inline.pop();
                self.end_block();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.inline.pop();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.gap_pending = true;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.gap_pending = true;
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.inline.pop();
            }
            TagEnd::Link => {
                self.inline.pop();
                if let Some(url) = self.link.take() {
                    self.current.push(Span::styled(
                        format!(" <{url}>"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }

    fn close_code(&mut self) {
        let Some(block) = self.code.take() else {
            return;
        };
        let label = if block.lang.is_empty() {
            "code".to_string()
        } else {
            block.lang.clone()
        };
        self.lines.push(Line::styled(
            format!("{CODE_INDENT}{label}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        for line in highlight(&block) {
            let mut spans = self.prefix();
            spans.push(Span::raw(CODE_INDENT));
            spans.extend(line.spans);
            self.lines.push(Line::from(spans));
        }
        self.gap_pending = true;
    }

    fn finish(mut self) -> Text<'static> {
        self.flush();
        Text::from(self.lines)
    }
}

/// Highlight a code block, falling back to plain text for unknown languages.
fn highlight(block: &CodeBlock) -> Vec<Line<'static>> {
    let source = block.source.replace('\t', "    ");
    let syntax = (!block.lang.is_empty())
        .then(|| SYNTAXES.find_syntax_by_token(&block.lang))
        .flatten();

    let (Some(syntax), Some(theme)) = (syntax, THEME.as_ref()) else {
        return source
            .lines()
            .map(|line| Line::styled(line.to_string(), Style::default().fg(Color::Gray)))
            .collect();
    };

    let mut highlighter = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(&source)
        .map(|line| match highlighter.highlight_line(line, &SYNTAXES) {
            Ok(ranges) => Line::from(
                ranges
                    .into_iter()
                    .map(|(style, fragment)| {
                        let fg = style.foreground;
                        Span::styled(
                            fragment.trim_end_matches('\n').to_string(),
                            Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b)),
                        )
                    })
                    .collect::<Vec<_>>(),
            ),
            Err(e) => {
                log::debug!("Highlighting failed for {}: {}", block.lang, e);
                Line::raw(line.trim_end_matches('\n').to_string())
            }
        })
        .collect()
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        HeadingLevel::H2 => style,
        _ => style.add_modifier(Modifier::ITALIC),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn plain_paragraph_uses_base_color() {
        let text = render("hello", Color::Blue);
        assert_eq!(plain(&text), vec!["hello"]);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Blue));
    }

    #[test]
    fn paragraphs_are_separated_by_a_blank_line() {
        let text = render("one\n\ntwo", Color::Blue);
        assert_eq!(plain(&text), vec!["one", "", "two"]);
    }

    #[test]
    fn strong_inside_heading_keeps_both_styles() {
        let text = render("## Big **bold**", Color::Blue);
        let span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "bold")
            .unwrap();
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(span.style.fg, Some(Color::Blue));
    }

    #[test]
    fn inline_code_is_highlighted() {
        let text = render("call `run()` now", Color::Blue);
        let span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "run()")
            .unwrap();
        assert_eq!(span.style.fg, Some(Color::Yellow));
    }

    #[test]
    fn lists_get_markers() {
        let text = render("- a\n- b\n\n1. x\n2. y", Color::Blue);
        let lines = plain(&text);
        assert!(lines.contains(&"• a".to_string()));
        assert!(lines.contains(&"• b".to_string()));
        assert!(lines.contains(&"1. x".to_string()));
        assert!(lines.contains(&"2. y".to_string()));
    }

    #[test]
    fn code_block_is_labelled_and_indented() {
        let text = render("```\nlet x = 1;\n\tdone\n```", Color::Blue);
        let lines = plain(&text);
        assert_eq!(lines[0], "  code");
        assert_eq!(lines[1], "  let x = 1;");
        assert_eq!(lines[2], "      done");
    }

    #[test]
    fn link_url_follows_text() {
        let text = render("[docs](https://example.com)", Color::Blue);
        assert_eq!(plain(&text), vec!["docs <https://example.com>"]);
    }

    #[test]
    fn quotes_are_prefixed() {
        let text = render("> careful", Color::Blue);
        assert_eq!(plain(&text), vec!["▌ careful"]);
    }
}
