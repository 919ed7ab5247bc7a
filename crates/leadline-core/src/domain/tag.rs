use crate::domain::ids::TagId;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Free-text label attached to leads.
///
/// Display casing is preserved; matching goes through [`TagName::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagName(String);

impl TagName {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let normalized = normalize_tag_name(raw)?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl TryFrom<String> for TagName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TagName::new(&value)
    }
}

impl From<TagName> for String {
    fn from(value: TagName) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: TagName,
}

pub fn normalize_tag_name(raw: &str) -> Result<String, CoreError> {
    if raw.contains(',') {
        return Err(CoreError::InvalidTagName);
    }
    let out = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if out.is_empty() {
        return Err(CoreError::InvalidTagName);
    }
    Ok(out)
}

/// Parses labels in order, dropping case-insensitive duplicates.
pub fn dedupe_tags<'a, I>(raw: I) -> Result<Vec<TagName>, CoreError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<TagName> = Vec::new();
    for value in raw {
        let tag = TagName::new(value)?;
        if !out.iter().any(|existing| existing.key() == tag.key()) {
            out.push(tag);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{dedupe_tags, normalize_tag_name, TagName};

    #[test]
    fn normalize_tag_keeps_case() {
        assert_eq!(normalize_tag_name(" Web-Incoming ").unwrap(), "Web-Incoming");
    }

    #[test]
    fn normalize_tag_collapses_whitespace() {
        assert_eq!(normalize_tag_name("trade   show\t2026").unwrap(), "trade show 2026");
    }

    #[test]
    fn normalize_tag_rejects_empty_and_commas() {
        assert!(normalize_tag_name("   ").is_err());
        assert!(normalize_tag_name("a,b").is_err());
    }

    #[test]
    fn key_ignores_case() {
        let tag = TagName::new("Widget").unwrap();
        assert_eq!(tag.key(), TagName::new("wIDGET").unwrap().key());
        assert_eq!(tag.as_str(), "Widget");
    }

    #[test]
    fn dedupe_preserves_first_occurrence_order() {
        let tags = dedupe_tags(["VIP", "widget", "vip", "Expo"]).unwrap();
        let names: Vec<&str> = tags.iter().map(TagName::as_str).collect();
        assert_eq!(names, vec!["VIP", "widget", "Expo"]);
    }
}
