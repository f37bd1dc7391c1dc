//! Markdown and HTML helpers shared by the document serializers

use comrak::nodes::{AstNode, NodeValue};
use comrak::{markdown_to_html, parse_document, Arena, ComrakOptions};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document as parse_html, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;

static RE_BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").expect("Invalid regex"));

/// Elements whose content is never visible text
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "template", "noscript"];

/// Elements that start and end a paragraph-level block
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "main", "nav", "aside", "ul", "ol",
    "table", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6",
];

fn comrak_options() -> ComrakOptions<'static> {
    let mut options = ComrakOptions::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options
}

/// Render Markdown to an HTML fragment (`comrak`, GFM tables enabled)
pub fn render_markdown(source: &str) -> String {
    markdown_to_html(source, &comrak_options())
}

/// Plain text of a Markdown document, one block per paragraph
pub fn markdown_plain_text(source: &str) -> String {
    let arena = Arena::new();
    let options = comrak_options();
    let root = parse_document(&arena, source, &options);

    let mut out = String::new();
    collect_text(root, &mut out);
    tidy_lines(&out)
}

fn collect_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    let value = node.data.borrow().value.clone();
    match value {
        NodeValue::Text(text) => out.push_str(&text),
        NodeValue::Code(code) => out.push_str(&code.literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => out.push('\n'),
        NodeValue::CodeBlock(block) => {
            out.push_str(&block.literal);
            out.push('\n');
        }
        NodeValue::HtmlBlock(_) | NodeValue::HtmlInline(_) => {}
        NodeValue::TableCell => {
            for child in node.children() {
                collect_text(child, out);
            }
            out.push('\t');
        }
        NodeValue::TableRow(_) => {
            for child in node.children() {
                collect_text(child, out);
            }
            while out.ends_with('\t') {
                out.pop();
            }
            out.push('\n');
        }
        NodeValue::Paragraph | NodeValue::Heading(_) => {
            for child in node.children() {
                collect_text(child, out);
            }
            out.push_str("\n\n");
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

/// Escape text for HTML element content
pub fn escape_html(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// Parse an HTML document or fragment into a DOM
fn html_dom(html: &str) -> RcDom {
    parse_html(RcDom::default(), ParseOpts::default()).one(html)
}

/// Local tag name of an element node
fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn attribute(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == key)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Visible text of an HTML document
pub fn html_plain_text(html: &str) -> String {
    let dom = html_dom(html);
    let mut out = String::new();
    plain_text_of(&dom.document, &mut out);
    tidy_lines(&out)
}

fn plain_text_of(handle: &Handle, out: &mut String) {
    let tag = match &handle.data {
        NodeData::Text { contents } => {
            out.push_str(&contents.borrow());
            return;
        }
        NodeData::Document => None,
        NodeData::Element { .. } => element_name(handle),
        _ => return,
    };

    let children = |out: &mut String| {
        for child in handle.children.borrow().iter() {
            plain_text_of(child, out);
        }
    };

    match tag.as_deref() {
        Some(name) if HIDDEN_ELEMENTS.contains(&name) => {}
        Some("br") => out.push('\n'),
        Some("td" | "th") => {
            children(out);
            out.push('\t');
        }
        Some("tr" | "li") => {
            children(out);
            out.push('\n');
        }
        Some(name) if BLOCK_ELEMENTS.contains(&name) => {
            out.push_str("\n\n");
            children(out);
            out.push_str("\n\n");
        }
        _ => children(out),
    }
}

/// Markdown approximation of an HTML document
///
/// Headings, emphasis, code, links and list items are translated; any other
/// element is dropped and its text kept.
pub fn html_to_markdown(html: &str) -> String {
    let dom = html_dom(html);
    let mut out = String::new();
    markdown_of(&dom.document, &mut out);
    tidy_lines(&out)
}

fn markdown_children(handle: &Handle) -> String {
    let mut inner = String::new();
    for child in handle.children.borrow().iter() {
        markdown_of(child, &mut inner);
    }
    inner
}

fn markdown_of(handle: &Handle, out: &mut String) {
    let tag = match &handle.data {
        NodeData::Text { contents } => {
            out.push_str(&contents.borrow());
            return;
        }
        NodeData::Document => None,
        NodeData::Element { .. } => element_name(handle),
        _ => return,
    };

    match tag.as_deref() {
        Some(name) if HIDDEN_ELEMENTS.contains(&name) => {}
        Some("br") => out.push_str("  \n"),
        Some(name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6")) => {
            let level: usize = name[1..].parse().unwrap_or(1);
            let inner = markdown_children(handle);
            out.push_str(&format!("\n\n{} {}\n\n", "#".repeat(level), inner.trim()));
        }
        Some("pre") => {
            let mut code = String::new();
            plain_text_of(handle, &mut code);
            out.push_str(&format!("\n\n```\n{}\n```\n\n", code.trim_matches('\n')));
        }
        Some("a") => {
            let inner = markdown_children(handle);
            match attribute(handle, "href") {
                Some(href) => out.push_str(&format!("[{}]({})", inner, href)),
                None => out.push_str(&inner),
            }
        }
        Some("strong" | "b") => out.push_str(&format!("**{}**", markdown_children(handle))),
        Some("em" | "i") => out.push_str(&format!("*{}*", markdown_children(handle))),
        Some("code") => out.push_str(&format!("`{}`", markdown_children(handle))),
        Some("li") => out.push_str(&format!("\n- {}\n", markdown_children(handle).trim())),
        Some("td" | "th") => {
            out.push_str(&markdown_children(handle));
            out.push('\t');
        }
        Some("tr") => {
            out.push_str(&markdown_children(handle));
            out.push('\n');
        }
        Some(name) if BLOCK_ELEMENTS.contains(&name) => {
            out.push_str("\n\n");
            out.push_str(&markdown_children(handle));
            out.push_str("\n\n");
        }
        _ => out.push_str(&markdown_children(handle)),
    }
}

/// Trim trailing spaces per line, collapse blank runs and trim the ends
fn tidy_lines(text: &str) -> String {
    let trimmed: Vec<&str> = text.lines().map(|line| line.trim_end_matches([' ', '\t'])).collect();
    let joined = trimmed.join("\n");
    RE_BLANK_RUN
        .replace_all(&joined, "\n\n")
        .trim_matches('\n')
        .to_string()
}

/// Escape a table cell for a GFM pipe table
pub fn markdown_cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}
