//! Front-matter parsing

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

use crate::helpers::parse_date_string;

/// Author-supplied metadata, in the order the keys were written
pub type Metadata = IndexMap<String, MetaValue>;

/// A single front-matter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Integer(i) => Some(*i as f64),
            MetaValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Truthiness as a template author would expect it: `false`, `0`, `""`
    /// and null are false, everything else (lists included) is true
    pub fn is_truthy(&self) -> bool {
        match self {
            MetaValue::Null => false,
            MetaValue::Bool(b) => *b,
            MetaValue::Integer(i) => *i != 0,
            MetaValue::Float(f) => *f != 0.0 && !f.is_nan(),
            MetaValue::String(s) => !s.is_empty(),
            MetaValue::List(_) => true,
        }
    }

    /// Scalar rendering, used for dates written as bare numbers
    pub fn to_text(&self) -> Option<String> {
        match self {
            MetaValue::String(s) => Some(s.clone()),
            MetaValue::Integer(i) => Some(i.to_string()),
            MetaValue::Float(f) => Some(f.to_string()),
            MetaValue::Bool(b) => Some(b.to_string()),
            MetaValue::Null | MetaValue::List(_) => None,
        }
    }

    /// Handles both a single string and a list of strings
    pub fn to_string_list(&self) -> Vec<String> {
        match self {
            MetaValue::List(items) => items.clone(),
            MetaValue::Null => Vec::new(),
            other => other.to_text().into_iter().collect(),
        }
    }
}

/// Front-matter data from a post or page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub metadata: Metadata,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// The block must open on the very first line with `---` and close with a
    /// `---` or `...` line. Anything else means the file has no front-matter.
    pub fn parse(content: &str) -> Result<(Self, &str), String> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);

        let mut lines = content.split_inclusive('\n');
        match lines.next() {
            Some(first) if first.trim_end() == "---" => {}
            _ => return Ok((FrontMatter::default(), content)),
        }

        let yaml_start = content.find('\n').map(|i| i + 1).unwrap_or(content.len());
        let mut offset = yaml_start;
        for line in lines {
            let trimmed = line.trim_end();
            if trimmed == "---" || trimmed == "..." {
                let yaml = &content[yaml_start..offset];
                let body = &content[offset + line.len()..];
                let metadata = parse_metadata(yaml)?;
                return Ok((FrontMatter { metadata }, body));
            }
            offset += line.len();
        }

        // No closing fence
        Ok((FrontMatter::default(), content))
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.metadata.get(key)
    }

    /// A string-valued key; numbers and booleans are rendered as text
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(MetaValue::to_text)
    }

    pub fn tags(&self) -> Vec<String> {
        self.get("tags")
            .map(MetaValue::to_string_list)
            .unwrap_or_default()
    }

    /// Parse the date string into a NaiveDateTime
    pub fn date(&self) -> Option<NaiveDateTime> {
        self.text("date").and_then(|s| parse_date_string(&s))
    }
}

fn parse_metadata(yaml: &str) -> Result<Metadata, String> {
    if yaml.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let value: Value = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
    let mapping = match value {
        Value::Null => return Ok(Metadata::new()),
        Value::Mapping(mapping) => mapping,
        _ => return Err("front-matter must be a key: value mapping".to_string()),
    };

    let mut metadata = Metadata::with_capacity(mapping.len());
    for (key, value) in mapping {
        let key = scalar_text(&key).ok_or_else(|| "front-matter keys must be scalars".to_string())?;
        let value = convert_value(&key, value)?;
        metadata.insert(key, value);
    }
    Ok(metadata)
}

fn convert_value(key: &str, value: Value) -> Result<MetaValue, String> {
    Ok(match value {
        Value::Null => MetaValue::Null,
        Value::Bool(b) => MetaValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => MetaValue::Integer(i),
            None => MetaValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => MetaValue::String(s),
        Value::Sequence(items) => MetaValue::List(
            items
                .iter()
                .map(|item| {
                    scalar_text(item)
                        .ok_or_else(|| format!("`{}` may only list plain values", key))
                })
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(_) => return Err(format!("`{}` must not be a nested mapping", key)),
        Value::Tagged(tagged) => convert_value(key, tagged.value)?,
    })
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}
