//! Quiz definitions: `block[KEY]="display"` / `zone[ID]="EXPECTED|hint"` files.

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct BlockDef {
    pub key: String,
    pub display: String,
}

#[derive(Debug, Clone)]
pub struct ZoneDef {
    pub id: String,
    pub expected: String,
    pub hint: String,
}

/// Everything the presentation layer supplies for one session: a title plus
/// ordered block and zone descriptors. Validated on construction so the
/// engine can index by key without ambiguity.
#[derive(Debug, Clone)]
pub struct Quiz {
    pub title: String,
    pub blocks: Vec<BlockDef>,
    pub zones: Vec<ZoneDef>,
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: cannot parse `{text}`")]
    Syntax { line: usize, text: String },
    #[error("duplicate block key `{0}`")]
    DuplicateBlock(String),
    #[error("duplicate zone id `{0}`")]
    DuplicateZone(String),
    #[error("zone `{zone}` expects unknown block `{key}`")]
    UnknownExpected { zone: String, key: String },
    #[error("quiz needs at least one block and one zone")]
    Empty,
}

impl Quiz {
    pub fn new(
        title: impl Into<String>,
        blocks: Vec<BlockDef>,
        zones: Vec<ZoneDef>,
    ) -> Result<Self, QuizError> {
        let quiz = Self {
            title: title.into(),
            blocks,
            zones,
        };
        quiz.validate()?;
        Ok(quiz)
    }

    /// Compiled-in default: classic data-structure matching.
    pub fn builtin() -> Self {
        let text = r#"
            title = "Data structures"
            block[A]="Stack: last in, first out"
            block[B]="Queue: first in, first out"
            block[C]="Heap: highest priority out"
            block[D]="Hash map: lookup by key"
            zone[d1]="A|Browser back button history"
            zone[d2]="B|Print jobs waiting in order"
            zone[d3]="C|Hospital triage by urgency"
            zone[d4]="D|Phone book: name to number"
            "#;
        // The builtin text is covered by a test, so this cannot fail at runtime.
        Self::parse(text).expect("builtin quiz is valid")
    }

    pub fn load(path: &Path) -> Result<Self, QuizError> {
        let s = std::fs::read_to_string(path)?;
        Self::parse(&s)
    }

    /// Line-based format, one entry per line:
    ///
    /// ```text
    /// # comment
    /// title = "Data structures"
    /// block[A]="Stack: last in, first out"
    /// zone[d1]="A|Browser back button history"
    /// ```
    ///
    /// The `|hint` part is optional; without it the zone shows no prompt.
    pub fn parse(s: &str) -> Result<Self, QuizError> {
        let mut title = String::from("Untitled quiz");
        let mut blocks = Vec::new();
        let mut zones = Vec::new();

        for (idx, raw) in s.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("title") {
                let rest = rest.trim_start();
                if let Some(value) = rest.strip_prefix('=') {
                    title = unquote(value).to_string();
                    continue;
                }
            }
            if let Some((key, value)) = parse_entry(line, "block") {
                blocks.push(BlockDef {
                    key: key.to_string(),
                    display: value.to_string(),
                });
                continue;
            }
            if let Some((id, value)) = parse_entry(line, "zone") {
                let (expected, hint) = match value.split_once('|') {
                    Some((e, h)) => (e.trim(), h.trim()),
                    None => (value.trim(), ""),
                };
                zones.push(ZoneDef {
                    id: id.to_string(),
                    expected: expected.to_string(),
                    hint: hint.to_string(),
                });
                continue;
            }
            return Err(QuizError::Syntax {
                line: idx + 1,
                text: line.to_string(),
            });
        }

        Self::new(title, blocks, zones)
    }

    fn validate(&self) -> Result<(), QuizError> {
        if self.blocks.is_empty() || self.zones.is_empty() {
            return Err(QuizError::Empty);
        }
        for (i, b) in self.blocks.iter().enumerate() {
            if self.blocks[..i].iter().any(|o| o.key == b.key) {
                return Err(QuizError::DuplicateBlock(b.key.clone()));
            }
        }
        for (i, z) in self.zones.iter().enumerate() {
            if self.zones[..i].iter().any(|o| o.id == z.id) {
                return Err(QuizError::DuplicateZone(z.id.clone()));
            }
            if !self.blocks.iter().any(|b| b.key == z.expected) {
                return Err(QuizError::UnknownExpected {
                    zone: z.id.clone(),
                    key: z.expected.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Parse `prefix[name]="value"` (quotes optional). Returns (name, value).
fn parse_entry<'a>(line: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let rest = line.strip_prefix(prefix)?.trim_start();
    let rest = rest.strip_prefix('[')?;
    let end = rest.find(']')?;
    let name = rest[..end].trim();
    let after = rest[end + 1..].trim_start();
    let value = after.strip_prefix('=')?;
    let value = unquote(value);
    if name.is_empty() || value.is_empty() {
        return None;
    }
    Some((name, value))
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches('"').trim_matches('\'').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let q = Quiz::builtin();
        assert_eq!(q.title, "Data structures");
        assert_eq!(q.blocks.len(), 4);
        assert_eq!(q.zones.len(), 4);
        assert_eq!(q.zones[0].expected, "A");
        assert_eq!(q.zones[0].hint, "Browser back button history");
    }

    #[test]
    fn parse_minimal() {
        let q = Quiz::parse(
            r#"
            block[x]="one"
            zone[z]="x"
            "#,
        )
        .unwrap();
        assert_eq!(q.title, "Untitled quiz");
        assert_eq!(q.blocks[0].display, "one");
        assert_eq!(q.zones[0].hint, "");
    }

    #[test]
    fn parse_rejects_garbage_with_line_number() {
        let err = Quiz::parse("block[x]=\"one\"\nzone[z]=\"x\"\nwhatever").unwrap_err();
        match err {
            QuizError::Syntax { line, text } => {
                assert_eq!(line, 3);
                assert_eq!(text, "whatever");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_block_key_is_an_error() {
        let err = Quiz::parse(
            r#"
            block[x]="one"
            block[x]="two"
            zone[z]="x"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::DuplicateBlock(k) if k == "x"));
    }

    #[test]
    fn duplicate_zone_id_is_an_error() {
        let err = Quiz::parse(
            r#"
            block[x]="one"
            zone[z]="x"
            zone[z]="x"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, QuizError::DuplicateZone(id) if id == "z"));
    }

    #[test]
    fn zone_expecting_unknown_key_is_an_error() {
        let err = Quiz::parse(
            r#"
            block[x]="one"
            zone[z]="y"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            QuizError::UnknownExpected { zone, key } if zone == "z" && key == "y"
        ));
    }

    #[test]
    fn empty_quiz_is_an_error() {
        assert!(matches!(Quiz::parse("# nothing"), Err(QuizError::Empty)));
    }
}
