//! Domain logic - pure version rules independent of git and GitLab

pub mod bump;
pub mod prerelease;
pub mod tag;
pub mod version;

pub use bump::{BumpKind, Classification, Mode};
pub use tag::{ResolvedTag, TagKind, TagReference};
pub use version::Version;
