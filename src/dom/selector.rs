//! Selector Parsing and Matching
//!
//! A small compound-selector subset: `tag`, `#id`, `.class`, `[attr]`,
//! `[attr=value]`, freely combined, plus comma-separated lists.
//! Combinators (descendant, child) are intentionally unsupported: queries
//! are always scoped to a container, so a compound match per node suffices.

use crate::error::{Error, Result};

/// A parsed selector list (one or more comma-separated compounds).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    compounds: Vec<Compound>,
}

/// One compound selector: every part must match the same element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrTest>,
}

/// Attribute presence or equality test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttrTest {
    pub(crate) name: String,
    pub(crate) value: Option<String>,
}

impl Selector {
    /// Parse a selector string. Invalid syntax is a loud configuration error.
    pub fn parse(source: &str) -> Result<Self> {
        let mut compounds = Vec::new();
        for part in source.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return err(source, "empty compound in selector list");
            }
            compounds.push(parse_compound(source, part)?);
        }
        Ok(Self {
            source: source.to_string(),
            compounds,
        })
    }

    /// The original selector text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// Build a selector from already-validated parts. Used for the built-in
    /// default configuration, which must not require fallible parsing.
    pub(crate) fn from_parts(source: &str, compounds: Vec<Compound>) -> Self {
        Self {
            source: source.to_string(),
            compounds,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

fn err<T>(selector: &str, reason: &str) -> Result<T> {
    Err(Error::Selector {
        selector: selector.to_string(),
        reason: reason.to_string(),
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(source: &str, part: &str) -> Result<Compound> {
    let mut compound = Compound::default();
    let mut chars = part.chars().peekable();

    // Optional leading tag name or universal `*`.
    if let Some(&c) = chars.peek() {
        if c == '*' {
            chars.next();
        } else if is_ident_char(c) {
            compound.tag = Some(take_ident(&mut chars));
        }
    }

    while let Some(&c) = chars.peek() {
        match c {
            '#' => {
                chars.next();
                let id = take_ident(&mut chars);
                if id.is_empty() {
                    return err(source, "'#' must be followed by an identifier");
                }
                compound.id = Some(id);
            }
            '.' => {
                chars.next();
                let class = take_ident(&mut chars);
                if class.is_empty() {
                    return err(source, "'.' must be followed by a class name");
                }
                compound.classes.push(class);
            }
            '[' => {
                chars.next();
                compound.attrs.push(parse_attr_test(source, &mut chars)?);
            }
            c if c.is_whitespace() => {
                return err(source, "combinators are not supported");
            }
            _ => {
                return err(source, &format!("unexpected character '{c}'"));
            }
        }
    }

    Ok(compound)
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if is_ident_char(c) {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }
    ident
}

fn parse_attr_test(
    source: &str,
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<AttrTest> {
    let name = take_ident(chars);
    if name.is_empty() {
        return err(source, "attribute test needs a name");
    }

    match chars.next() {
        Some(']') => Ok(AttrTest { name, value: None }),
        Some('=') => {
            let mut value = String::new();
            let quoted = matches!(chars.peek(), Some(&'"') | Some(&'\''));
            let quote = if quoted { chars.next() } else { None };
            loop {
                match chars.next() {
                    Some(c) if Some(c) == quote => {
                        // Closing quote; the ']' must follow.
                        if chars.next() != Some(']') {
                            return err(source, "unterminated attribute test");
                        }
                        return Ok(AttrTest {
                            name,
                            value: Some(value),
                        });
                    }
                    Some(']') if quote.is_none() => {
                        return Ok(AttrTest {
                            name,
                            value: Some(value),
                        });
                    }
                    Some(c) => value.push(c),
                    None => return err(source, "unterminated attribute test"),
                }
            }
        }
        _ => err(source, "unterminated attribute test"),
    }
}
