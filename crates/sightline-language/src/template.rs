//! Sentence templates with named placeholders.
//!
//! A template is plain text with `{name}` slots.  Four slot names exist:
//!
//! | Placeholder    | Filled with                                      |
//! |----------------|--------------------------------------------------|
//! | `{obj}`        | a single label                                   |
//! | `{objs}`       | the joined list of labels                        |
//! | `{count}`      | cardinal word for the number of instances        |
//! | `{count_word}` | ordinal word for how many times it has been seen |
//!
//! `{{` and `}}` produce literal braces.  Templates are parsed once, when the
//! tables are loaded, so a malformed template is reported at startup rather
//! than in the middle of a conversation.

use std::fmt;

use serde::Deserialize;

use crate::TableError;

/// A named slot inside a [`Template`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Obj,
    Objs,
    Count,
    CountWord,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "obj" => Some(Placeholder::Obj),
            "objs" => Some(Placeholder::Objs),
            "count" => Some(Placeholder::Count),
            "count_word" => Some(Placeholder::CountWord),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::Obj => "obj",
            Placeholder::Objs => "objs",
            Placeholder::Count => "count",
            Placeholder::CountWord => "count_word",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Placeholder),
}

/// Values substituted into a [`Template`].  Unset slots render as their
/// original `{name}` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateArgs<'a> {
    pub obj: Option<&'a str>,
    pub objs: Option<&'a str>,
    pub count: Option<&'a str>,
    pub count_word: Option<&'a str>,
}

impl<'a> TemplateArgs<'a> {
    fn get(&self, slot: Placeholder) -> Option<&'a str> {
        match slot {
            Placeholder::Obj => self.obj,
            Placeholder::Objs => self.objs,
            Placeholder::Count => self.count,
            Placeholder::CountWord => self.count_word,
        }
    }
}

/// A parsed sentence template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, rejecting unknown or unterminated placeholders.
    pub fn parse(source: &str) -> Result<Self, TableError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for n in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(TableError::UnterminatedPlaceholder(source.to_string()));
                    }
                    let slot = Placeholder::parse(&name).ok_or_else(|| {
                        TableError::UnknownPlaceholder {
                            name,
                            template: source.to_string(),
                        }
                    })?;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                '}' => return Err(TableError::UnterminatedPlaceholder(source.to_string())),
                other => text.push(other),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The template text as written in the table.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholders used by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(p) => Some(*p),
            Segment::Text(_) => None,
        })
    }

    /// Substitute `args` into the template.
    pub fn render(&self, args: &TemplateArgs<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Slot(slot) => match args.get(*slot) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(slot.name());
                        out.push('}');
                    }
                },
            }
        }
        out
    }
}

impl TryFrom<String> for Template {
    type Error = TableError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_placeholders() {
        let t = Template::parse("{count} {obj}s, the {count_word} time; also {objs}").unwrap();
        let out = t.render(&TemplateArgs {
            obj: Some("cup"),
            objs: Some("cup and pen"),
            count: Some("two"),
            count_word: Some("third"),
        });
        assert_eq!(out, "two cups, the third time; also cup and pen");
    }

    #[test]
    fn placeholders_are_listed_in_order() {
        let t = Template::parse("{obj} is here {count_word}").unwrap();
        let slots: Vec<Placeholder> = t.placeholders().collect();
        assert_eq!(slots, vec![Placeholder::Obj, Placeholder::CountWord]);
    }

    #[test]
    fn plain_text_round_trips() {
        let t = Template::parse("I can't see anything.").unwrap();
        assert_eq!(t.render(&TemplateArgs::default()), "I can't see anything.");
        assert_eq!(t.placeholders().count(), 0);
    }

    #[test]
    fn escaped_braces_are_literal() {
        let t = Template::parse("{{not a slot}} {obj}").unwrap();
        let out = t.render(&TemplateArgs {
            obj: Some("cup"),
            ..Default::default()
        });
        assert_eq!(out, "{not a slot} cup");
    }

    #[test]
    fn unset_slot_renders_its_name() {
        let t = Template::parse("Hello {obj}").unwrap();
        assert_eq!(t.render(&TemplateArgs::default()), "Hello {obj}");
    }

    #[test]
    fn unknown_placeholder_is_rejected() {
        let err = Template::parse("I see {thing}").unwrap_err();
        assert!(matches!(err, TableError::UnknownPlaceholder { ref name, .. } if name == "thing"));
    }

    #[test]
    fn unterminated_placeholder_is_rejected() {
        assert!(matches!(
            Template::parse("I see {obj"),
            Err(TableError::UnterminatedPlaceholder(_))
        ));
        assert!(matches!(
            Template::parse("stray } brace"),
            Err(TableError::UnterminatedPlaceholder(_))
        ));
    }

    #[test]
    fn multibyte_text_is_preserved() {
        let t = Template::parse("Vidím {obj} — už {count_word}!").unwrap();
        let out = t.render(&TemplateArgs {
            obj: Some("židle"),
            count_word: Some("potřetí"),
            ..Default::default()
        });
        assert_eq!(out, "Vidím židle — už potřetí!");
    }
}
