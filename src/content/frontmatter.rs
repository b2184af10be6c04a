//! Front-matter parsing and validation

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

/// Errors from front-matter parsing or validation.
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("no front-matter block found")]
    Missing,

    #[error("front-matter block is not terminated")]
    Unterminated,

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unrecognized date `{0}`")]
    UnparseableDate(String),
}

/// Raw front-matter as declared in a content file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,

    /// Additional custom fields, in declaration order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

/// Validated article metadata. Every field the page templates need is
/// guaranteed present once a file makes it past validation.
#[derive(Debug, Clone)]
pub struct ArticleMeta {
    pub title: String,
    pub description: String,
    /// Display date, as authored ("9 May, 2025")
    pub date: String,
    /// Parsed date, used for ordering the index
    pub published: NaiveDate,
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string.
    /// Returns (front_matter, remaining_content).
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start();

        // YAML front-matter (---)
        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        // JSON front-matter (;;; or a leading object)
        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Err(FrontMatterError::Missing)
    }

    /// Parse and validate in one step.
    pub fn load(content: &str) -> Result<(ArticleMeta, &str), FrontMatterError> {
        let (fm, body) = Self::parse(content)?;
        Ok((fm.validate()?, body))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let rest = &content[3..]; // Skip opening ---
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            return Err(FrontMatterError::Unterminated);
        };

        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 4..]; // Skip \n---
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
        Ok((fm, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // JSON front-matter fenced with ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let Some(end_pos) = rest.find(";;;") else {
                return Err(FrontMatterError::Unterminated);
            };
            let json_content = &rest[..end_pos];
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);

            let fm: FrontMatter = serde_json::from_str(json_content)?;
            return Ok((fm, remaining));
        }

        // A bare JSON object at the start of the file
        let mut depth = 0;
        let mut end_pos = 0;
        for (i, c) in content.char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end_pos = i + 1;
                        break;
                    }
                }
                _ => {}
            }
        }

        if end_pos == 0 {
            return Err(FrontMatterError::Unterminated);
        }

        let json_content = &content[..end_pos];
        let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);

        let fm: FrontMatter = serde_json::from_str(json_content)?;
        Ok((fm, remaining))
    }

    /// Check required fields and resolve the date, failing on malformed
    /// content instead of letting missing values reach page metadata.
    pub fn validate(self) -> Result<ArticleMeta, FrontMatterError> {
        let title = non_empty(self.title).ok_or(FrontMatterError::MissingField("title"))?;
        let description =
            non_empty(self.description).ok_or(FrontMatterError::MissingField("description"))?;
        let date = non_empty(self.date).ok_or(FrontMatterError::MissingField("date"))?;

        let published = parse_date_string(&date)
            .ok_or_else(|| FrontMatterError::UnparseableDate(date.clone()))?;

        Ok(ArticleMeta {
            title,
            description,
            date,
            published,
            extra: self.extra,
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse a display date string in the formats posts actually use
fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%d %B, %Y",
        "%d %b, %Y",
        "%d %B %Y",
        "%B %d, %Y",
        "%b %d, %Y",
    ];

    for fmt in formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // Try RFC 3339 / ISO 8601 timestamps
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 9 May, 2025
description: A first post
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Hello World".to_string()));
        assert_eq!(fm.date, Some("9 May, 2025".to_string()));
        assert!(remaining.contains("This is the content."));
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test Post", "description": "desc", "date": "2024-01-15"}

This is content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, Some("Test Post".to_string()));
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_missing_frontmatter() {
        let err = FrontMatter::parse("Just a plain markdown body.\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Missing));
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let err = FrontMatter::parse("---\ntitle: Oops\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_validate_requires_fields() {
        let content = "---\ntitle: Only a Title\n---\n\nBody.\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let err = fm.validate().unwrap_err();
        assert!(matches!(err, FrontMatterError::MissingField("description")));
    }

    #[test]
    fn test_validate_parses_display_dates() {
        let content = r#"---
title: Dates
description: checks the format table
date: 21 March, 2025
---
Body.
"#;
        let (meta, _) = FrontMatter::load(content).unwrap();
        assert_eq!(
            meta.published,
            NaiveDate::from_ymd_opt(2025, 3, 21).unwrap()
        );
        assert_eq!(meta.date, "21 March, 2025");
    }

    #[test]
    fn test_validate_rejects_bad_date() {
        let content = "---\ntitle: T\ndescription: D\ndate: sometime soon\n---\nBody.\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(matches!(
            fm.validate().unwrap_err(),
            FrontMatterError::UnparseableDate(_)
        ));
    }

    #[test]
    fn test_extra_fields_preserved_in_order() {
        let content = r#"---
title: T
description: D
date: 2024-01-15
layout: wide
draft_notes: keep
---
Body.
"#;
        let (meta, _) = FrontMatter::load(content).unwrap();
        let keys: Vec<_> = meta.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["layout", "draft_notes"]);
    }
}
