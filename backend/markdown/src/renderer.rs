//! Renderers for model replies
//!
//! Turns Markdown text into sanitized HTML (web) or plain text (terminal).

use pulldown_cmark::{Event, Options, Parser, Tag, html};

pub struct Renderer;

impl Renderer {
    fn parser(markdown: &str) -> Parser<'_, '_> {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        Parser::new_ext(markdown, options)
    }

    /// Renders Markdown to HTML with raw HTML and scripts stripped.
    pub fn to_html(markdown: &str) -> String {
        let mut unsafe_html = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut unsafe_html, Self::parser(markdown));
        ammonia::clean(&unsafe_html)
    }

    /// Renders Markdown to plain text, stripping all formatting.
    pub fn to_plain_text(markdown: &str) -> String {
        let mut output = String::new();
        for event in Self::parser(markdown) {
            match event {
                Event::Text(text) | Event::Code(text) => output.push_str(&text),
                Event::SoftBreak | Event::HardBreak => output.push('\n'),
                Event::Start(Tag::Item) => output.push_str("- "),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => output.push('\n'),
                Event::Rule => output.push_str("\n---\n"),
                _ => {}
            }
        }
        output.trim_end().to_string()
    }
}
