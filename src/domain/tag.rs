use git2::Oid;

/// A tag reference as listed from `refs/tags/*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagReference {
    /// Ref name with the `refs/tags/` prefix stripped
    pub name: String,
    pub target: Oid,
}

impl TagReference {
    /// Create a tag reference from a full or short ref name
    pub fn new(name: &str, target: Oid) -> Self {
        TagReference {
            name: short_name(name).to_string(),
            target,
        }
    }
}

/// Strip a leading `refs/tags/` from a ref name
pub fn short_name(name: &str) -> &str {
    name.strip_prefix("refs/tags/").unwrap_or(name)
}

/// Whether a tag is a bare pointer to a commit or its own tag object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Lightweight,
    Annotated,
}

/// A tag reference resolved to the time it was tagged
///
/// Lightweight tags take the author time of their commit, annotated tags the
/// tagger time of the tag object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTag {
    pub name: String,
    /// Seconds since the Unix epoch
    pub timestamp: i64,
    pub kind: TagKind,
}

impl ResolvedTag {
    pub fn new(name: impl Into<String>, timestamp: i64, kind: TagKind) -> Self {
        ResolvedTag {
            name: name.into(),
            timestamp,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_name_strips_prefix() {
        assert_eq!(short_name("refs/tags/v1.2.3"), "v1.2.3");
        assert_eq!(short_name("1.2.3"), "1.2.3");
        assert_eq!(short_name("refs/tags/release/1.0.0"), "release/1.0.0");
    }

    #[test]
    fn test_tag_reference_new() {
        let oid = Oid::from_bytes(&[3; 20]).unwrap();
        let tag = TagReference::new("refs/tags/1.0.0", oid);
        assert_eq!(tag.name, "1.0.0");
        assert_eq!(tag.target, oid);
    }
}
