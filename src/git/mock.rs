use crate::domain::{ResolvedTag, TagKind, TagReference};
use crate::error::{Result, SemverLabelsError};
use crate::git::Repository;
use git2::Oid;
use std::cell::RefCell;
use std::collections::HashMap;

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    references: Vec<TagReference>,
    resolved: HashMap<Oid, (i64, TagKind)>,
    fetches: RefCell<Vec<(String, String)>>,
    fail_fetch: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            references: Vec::new(),
            resolved: HashMap::new(),
            fetches: RefCell::new(Vec::new()),
            fail_fetch: false,
        }
    }

    /// Add a tag pointing at a commit authored at `timestamp`
    pub fn add_lightweight(&mut self, name: &str, timestamp: i64) {
        let oid = self.push_reference(name);
        self.resolved.insert(oid, (timestamp, TagKind::Lightweight));
    }

    /// Add an annotated tag created at `timestamp`
    pub fn add_annotated(&mut self, name: &str, timestamp: i64) {
        let oid = self.push_reference(name);
        self.resolved.insert(oid, (timestamp, TagKind::Annotated));
    }

    /// Add a tag pointing at an object that is neither a commit nor a tag
    pub fn add_unresolvable(&mut self, name: &str) {
        self.push_reference(name);
    }

    /// Make every subsequent fetch fail
    pub fn fail_fetch(&mut self) {
        self.fail_fetch = true;
    }

    /// `(remote, token)` pairs of every fetch so far
    pub fn fetches(&self) -> Vec<(String, String)> {
        self.fetches.borrow().clone()
    }

    fn push_reference(&mut self, name: &str) -> Oid {
        let mut bytes = [0u8; 20];
        bytes[..8].copy_from_slice(&(self.references.len() as u64 + 1).to_be_bytes());
        let oid = Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero());
        self.references
            .push(TagReference::new(&format!("refs/tags/{}", name), oid));
        oid
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn fetch_tags(&self, remote: &str, token: &str) -> Result<()> {
        self.fetches
            .borrow_mut()
            .push((remote.to_string(), token.to_string()));
        if self.fail_fetch {
            return Err(SemverLabelsError::Fetch {
                remote: remote.to_string(),
                source: git2::Error::from_str("remote unreachable"),
            });
        }
        Ok(())
    }

    fn tag_references(&self) -> Result<Vec<TagReference>> {
        Ok(self.references.clone())
    }

    fn resolve_tag(&self, reference: &TagReference) -> Result<Option<ResolvedTag>> {
        Ok(self
            .resolved
            .get(&reference.target)
            .map(|&(timestamp, kind)| ResolvedTag::new(&reference.name, timestamp, kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_lists_short_names() {
        let mut repo = MockRepository::new();
        repo.add_lightweight("v1.0.0", 10);
        repo.add_annotated("v2.0.0", 20);

        let names: Vec<String> = repo
            .tag_references()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["v1.0.0", "v2.0.0"]);
    }

    #[test]
    fn test_mock_repository_resolves_kinds() {
        let mut repo = MockRepository::new();
        repo.add_lightweight("a", 10);
        repo.add_annotated("b", 20);
        repo.add_unresolvable("c");

        let refs = repo.tag_references().unwrap();
        assert_eq!(
            repo.resolve_tag(&refs[0]).unwrap(),
            Some(ResolvedTag::new("a", 10, TagKind::Lightweight))
        );
        assert_eq!(
            repo.resolve_tag(&refs[1]).unwrap(),
            Some(ResolvedTag::new("b", 20, TagKind::Annotated))
        );
        assert_eq!(repo.resolve_tag(&refs[2]).unwrap(), None);
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.tag_references().unwrap().is_empty());
    }
}
