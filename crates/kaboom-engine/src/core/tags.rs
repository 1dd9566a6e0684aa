//! Tag matching for `is`, `get` and tag-scoped listeners.

/// What an `is` query accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagMatch {
    /// `"*"`: every object.
    Any,
    Single(String),
    /// Every listed tag must be present.
    All(Vec<String>),
}

impl TagMatch {
    pub fn matches(&self, tags: &[String]) -> bool {
        match self {
            TagMatch::Any => true,
            TagMatch::Single(t) => tags.iter().any(|have| have == t),
            TagMatch::All(list) => list.iter().all(|t| tags.iter().any(|have| have == t)),
        }
    }
}

impl From<&str> for TagMatch {
    fn from(tag: &str) -> Self {
        if tag == "*" {
            TagMatch::Any
        } else {
            TagMatch::Single(tag.to_string())
        }
    }
}

impl From<String> for TagMatch {
    fn from(tag: String) -> Self {
        TagMatch::from(tag.as_str())
    }
}

impl From<&String> for TagMatch {
    fn from(tag: &String) -> Self {
        TagMatch::from(tag.as_str())
    }
}

impl From<&[&str]> for TagMatch {
    fn from(tags: &[&str]) -> Self {
        TagMatch::All(tags.iter().map(|t| t.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TagMatch {
    fn from(tags: [&str; N]) -> Self {
        TagMatch::All(tags.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Vec<String>> for TagMatch {
    fn from(tags: Vec<String>) -> Self {
        TagMatch::All(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn wildcard_matches_everything() {
        assert!(TagMatch::from("*").matches(&[]));
    }

    #[test]
    fn all_requires_every_tag() {
        let have = tags(&["enemy", "flying"]);
        assert!(TagMatch::from(["enemy", "flying"]).matches(&have));
        assert!(!TagMatch::from(["enemy", "boss"]).matches(&have));
        assert!(TagMatch::from("flying").matches(&have));
    }
}
