//! Markup to document.
//!
//! A `winnow` lexer splits the text into tags and text runs; the decoder
//! keeps a stack of open tags to rebuild parent/child relations. Anything
//! the lexer cannot make sense of is skipped.

use std::borrow::Cow;
use std::collections::HashMap;

use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_until, take_while};

use super::{attr, unescape, MarkupError, MarkupOptions, Nesting, ROOT_TAG};
use crate::{
    props, Document, Element, ElementId, ElementKind, PropertyValue, Transform, DEFAULT_VALUE,
    MIN_SIZE,
};

/// Decode markup with default options. Never fails; unusable input yields
/// fewer (or no) elements.
#[must_use]
pub fn decode(text: &str) -> Document {
    decode_with(text, &MarkupOptions::default()).unwrap_or_default()
}

/// Decode markup.
///
/// # Errors
///
/// Only when `options.strict` is set: returns [`MarkupError`] for an
/// unterminated tag, a closing tag without a matching open tag, or an
/// element left open.
pub fn decode_with(text: &str, options: &MarkupOptions) -> Result<Document, MarkupError> {
    let mut decoder = Decoder {
        options,
        elements: HashMap::new(),
        roots: Vec::new(),
        stack: Vec::new(),
        counter: 0,
    };
    for (offset, token) in Lexer::new(text) {
        match token {
            Token::Open(tag) => decoder.open(tag),
            Token::Close(name) => decoder.close(name, offset)?,
            Token::Text(run) => decoder.text(run),
            Token::Skipped => {}
            Token::Stray => tracing::trace!("Skipping stray '<' at byte {offset}"),
            Token::Unterminated => {
                if options.strict {
                    return Err(MarkupError::UnterminatedTag { offset });
                }
                tracing::debug!("Dropping unterminated tag at byte {offset}");
            }
        }
    }
    if options.strict {
        if let Some(frame) = decoder.stack.last() {
            return Err(MarkupError::UnclosedTag {
                tag: frame.tag.to_string(),
            });
        }
    }
    tracing::debug!("Decoded {} elements", decoder.elements.len());
    Ok(Document::from_parts(decoder.elements, decoder.roots))
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct OpenTag<'a> {
    name: &'a str,
    attributes: Vec<(&'a str, &'a str)>,
    self_closing: bool,
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Open(OpenTag<'a>),
    Close(&'a str),
    Text(&'a str),
    /// Comment, declaration or processing instruction.
    Skipped,
    /// `<` that does not start a tag.
    Stray,
    /// `<` with no closing `>` before end of input.
    Unterminated,
}

struct Lexer<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (usize, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let offset = self.source.len() - self.rest.len();
        let start = self.rest;

        if !start.starts_with('<') {
            return match text_run.parse_next(&mut self.rest) {
                Ok(run) => Some((offset, Token::Text(run))),
                Err(_) => {
                    self.rest = "";
                    None
                }
            };
        }

        let token = if start.starts_with("<!") || start.starts_with("<?") {
            if declaration.parse_next(&mut self.rest).is_ok() {
                Token::Skipped
            } else {
                self.rest = "";
                Token::Unterminated
            }
        } else if start.starts_with("</") {
            match close_tag.parse_next(&mut self.rest) {
                Ok(name) => Token::Close(name),
                Err(_) => match start.find('>') {
                    Some(end) => {
                        self.rest = &start[end + 1..];
                        Token::Stray
                    }
                    None => {
                        self.rest = "";
                        Token::Unterminated
                    }
                },
            }
        } else {
            match open_tag.parse_next(&mut self.rest) {
                Ok(tag) => Token::Open(tag),
                Err(ErrMode::Cut(_)) => {
                    self.rest = "";
                    Token::Unterminated
                }
                Err(_) => {
                    self.rest = &start[1..];
                    Token::Stray
                }
            }
        };
        Some((offset, token))
    }
}

fn ws<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    multispace0.parse_next(input)
}

fn name<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '.' | ':' | '-')
    })
    .parse_next(input)
}

fn quoted<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    alt((
        delimited('"', take_till(0.., '"'), '"'),
        delimited('\'', take_till(0.., '\''), '\''),
    ))
    .parse_next(input)
}

fn attribute<'a>(input: &mut &'a str) -> ModalResult<(&'a str, &'a str)> {
    (name, ws, '=', ws, quoted)
        .map(|(key, _, _, _, value)| (key, value))
        .parse_next(input)
}

fn text_run<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_till(1.., '<').parse_next(input)
}

fn close_tag<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited("</", name, (ws, '>')).parse_next(input)
}

fn declaration(input: &mut &str) -> ModalResult<()> {
    alt((
        delimited("<!--", take_until(0.., "-->"), "-->"),
        delimited("<?", take_until(0.., "?>"), "?>"),
        delimited("<!", take_till(0.., '>'), '>'),
    ))
    .void()
    .parse_next(input)
}

fn tag_start<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded('<', name).parse_next(input)
}

/// Opening or self-closing tag. Junk between attributes is skipped; running
/// out of input before `>` is a cut so the caller can tell it apart from
/// "not a tag".
fn open_tag<'a>(input: &mut &'a str) -> ModalResult<OpenTag<'a>> {
    let name = tag_start.parse_next(input)?;
    let mut attributes = Vec::new();
    loop {
        ws.parse_next(input)?;
        if let Some(rest) = input.strip_prefix("/>") {
            *input = rest;
            return Ok(OpenTag {
                name,
                attributes,
                self_closing: true,
            });
        }
        if let Some(rest) = input.strip_prefix('>') {
            *input = rest;
            return Ok(OpenTag {
                name,
                attributes,
                self_closing: false,
            });
        }
        if input.is_empty() {
            return Err(ErrMode::Cut(ContextError::new()));
        }

        let checkpoint = *input;
        if let Ok(pair) = attribute.parse_next(input) {
            attributes.push(pair);
            continue;
        }
        *input = checkpoint;
        let junk = input
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(input.len());
        let skip = if junk == 0 {
            input.chars().next().map_or(0, char::len_utf8)
        } else {
            junk
        };
        *input = &input[skip..];
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

struct Frame<'a> {
    tag: &'a str,
    element: Option<ElementId>,
    /// Inner text is ignored when a `Content` attribute was given.
    has_content: bool,
}

struct Decoder<'a, 'o> {
    options: &'o MarkupOptions,
    elements: HashMap<ElementId, Element>,
    roots: Vec<ElementId>,
    stack: Vec<Frame<'a>>,
    counter: i32,
}

impl<'a> Decoder<'a, '_> {
    fn open(&mut self, tag: OpenTag<'a>) {
        let kind = match tag.name.parse::<ElementKind>() {
            Ok(kind) => kind,
            Err(e) => {
                if tag.name != ROOT_TAG {
                    tracing::debug!("Skipping tag: {e}");
                }
                if !tag.self_closing {
                    self.stack.push(Frame {
                        tag: tag.name,
                        element: None,
                        has_content: true,
                    });
                }
                return;
            }
        };

        // Later duplicates win.
        let attributes: HashMap<&str, Cow<'a, str>> = tag
            .attributes
            .into_iter()
            .map(|(key, value)| (key, unescape(value)))
            .collect();

        self.counter += 1;
        let mut element = build_element(kind, &attributes, self.counter);
        tracing::trace!("Decoded <{}> as {} ({})", tag.name, element.name, element.id);

        let parent = match self.options.nesting {
            Nesting::Tree => self.stack.iter().rev().find_map(|frame| frame.element),
            Nesting::Flatten => None,
        };
        let id = element.id;
        match parent.and_then(|p| self.elements.get_mut(&p)) {
            Some(parent) => {
                parent.children.push(id);
                element.parent = Some(parent.id);
            }
            None => self.roots.push(id),
        }
        self.elements.insert(id, element);

        if !tag.self_closing {
            self.stack.push(Frame {
                tag: tag.name,
                element: Some(id),
                has_content: attributes.contains_key(attr::CONTENT),
            });
        }
    }

    fn close(&mut self, name: &str, offset: usize) -> Result<(), MarkupError> {
        match self.stack.iter().rposition(|frame| frame.tag == name) {
            Some(pos) => {
                if self.options.strict && pos + 1 != self.stack.len() {
                    let inner = self.stack.last().map_or(name, |frame| frame.tag);
                    return Err(MarkupError::UnclosedTag {
                        tag: inner.to_string(),
                    });
                }
                self.stack.truncate(pos);
                Ok(())
            }
            None if self.options.strict => Err(MarkupError::UnexpectedClose {
                tag: name.to_string(),
                offset,
            }),
            None => {
                tracing::debug!("Ignoring unmatched </{name}> at byte {offset}");
                Ok(())
            }
        }
    }

    fn text(&mut self, run: &str) {
        let trimmed = run.trim();
        if trimmed.is_empty() {
            return;
        }
        let Some(Frame {
            element: Some(id),
            has_content: false,
            ..
        }) = self.stack.last()
        else {
            return;
        };
        let Some(element) = self.elements.get_mut(id) else {
            return;
        };
        let text = unescape(trimmed);
        match element.properties.get_mut(props::CONTENT) {
            Some(PropertyValue::Text(content)) if !content.is_empty() => {
                content.push(' ');
                content.push_str(&text);
            }
            _ => {
                element
                    .properties
                    .insert(props::CONTENT.to_string(), text.into_owned().into());
            }
        }
    }
}

fn build_element(kind: ElementKind, attributes: &HashMap<&str, Cow<'_, str>>, ordinal: i32) -> Element {
    let text = |key: &str| attributes.get(key).map(std::ops::Deref::deref);
    let set = |key: &str| text(key).filter(|v| !v.is_empty());
    let int = |key: &str, fallback: i32| {
        text(key)
            .and_then(parse_leading_int)
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(fallback)
    };

    let defaults = Transform::default();
    let transform = Transform {
        x: int(attr::LEFT, defaults.x),
        y: int(attr::TOP, defaults.y),
        width: int(attr::WIDTH, defaults.width).max(MIN_SIZE),
        height: int(attr::HEIGHT, defaults.height).max(MIN_SIZE),
        z_index: int(attr::Z_INDEX, ordinal),
    };
    let name = set(attr::NAME)
        .or_else(|| set(attr::X_NAME))
        .map_or_else(|| format!("{kind}_{ordinal}"), str::to_string);

    let mut element = Element::new(kind)
        .with_name(name)
        .with_transform(transform)
        .with_property(props::CONTENT, text(attr::CONTENT).unwrap_or_default())
        .with_property(
            props::VALUE,
            text(attr::VALUE)
                .and_then(parse_leading_int)
                .unwrap_or(DEFAULT_VALUE),
        );
    for (key, name) in [
        (props::BACKGROUND, attr::BACKGROUND),
        (props::FOREGROUND, attr::FOREGROUND),
    ] {
        if let Some(value) = set(name) {
            element.properties.insert(key.to_string(), value.into());
        }
    }
    if let Some(size) = set(attr::FONT_SIZE) {
        let value = size
            .trim()
            .parse::<i64>()
            .map_or_else(|_| PropertyValue::from(size), PropertyValue::Number);
        element.properties.insert(props::FONT_SIZE.to_string(), value);
    }
    element.visible = !matches!(
        text(attr::VISIBILITY).map(str::trim),
        Some("Collapsed" | "Hidden")
    );
    element
}

/// Lenient integer parsing: optional whitespace and sign, then leading digits.
/// Trailing text is ignored; no digits at all is a failure.
fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let n = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -n } else { n })
}
