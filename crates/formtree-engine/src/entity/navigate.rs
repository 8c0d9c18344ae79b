//! Structural navigation: paths, container lookups, and tread.

use formtree_core::{Path, Segment};

use super::node::State;
use super::EntityRef;
use crate::data::Data;

impl<'a> EntityRef<'a> {
    /// The group or list directly containing this entity.
    pub fn container(&self) -> Option<EntityRef<'a>> {
        self.node.container.and_then(|id| self.data.entity(id))
    }

    /// True when the entity has no container.
    pub fn is_root(&self) -> bool {
        self.node.container.is_none()
    }

    /// Content name within the containing group.
    pub fn name(&self) -> Option<&'a str> {
        let container = self.container()?;
        match &container.node.state {
            State::Group { contents, .. } => contents
                .iter()
                .find(|(_, id)| **id == self.id)
                .map(|(name, _)| name.as_str()),
            _ => None,
        }
    }

    /// Position within the containing list.
    pub fn index(&self) -> Option<usize> {
        let container = self.container()?;
        match &container.node.state {
            State::List { items, .. } => items.iter().position(|id| *id == self.id),
            _ => None,
        }
    }

    fn segment(&self) -> Option<Segment> {
        self.name()
            .map(Segment::from)
            .or_else(|| self.index().map(Segment::Index))
    }

    /// Path from the root to this entity. Recomputed on every call.
    pub fn path(&self) -> Path {
        let mut segments = Vec::new();
        let mut current = *self;
        while let Some(container) = current.container() {
            if let Some(segment) = current.segment() {
                segments.push(segment);
            }
            current = container;
        }
        segments.reverse();
        Path::from(segments)
    }

    /// Walk up `backtrack` containers (stopping at the root), then resolve
    /// `path` relative to where the walk ended.
    ///
    /// `tread(0, Path::root())` re-resolves this entity's own current path.
    pub fn tread(&self, backtrack: usize, path: impl Into<Path>) -> Option<EntityRef<'a>> {
        let mut origin = *self;
        for _ in 0..backtrack {
            match origin.container() {
                Some(container) => origin = container,
                None => break,
            }
        }
        let path = origin.path().join(&path.into());
        self.data.resolve(&path)
    }
}

impl Data {
    /// Resolve an absolute path from the root.
    pub fn resolve(&self, path: &Path) -> Option<EntityRef<'_>> {
        let mut current = self.root();
        for segment in path {
            let next = match (segment, &current.node.state) {
                (Segment::Name(name), State::Group { contents, .. }) => contents.get(name).copied(),
                (Segment::Index(index), State::List { items, .. }) => items.get(*index).copied(),
                _ => None,
            };
            match next.and_then(|id| self.entity(id)) {
                Some(entity) => current = entity,
                None => {
                    tracing::trace!(%path, %segment, "tread found no entity");
                    return None;
                }
            }
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use formtree_core::{path, Path};

    use crate::data::Data;
    use crate::schema::Schema;

    fn tree() -> Data {
        Data::new(Schema::group([
            ("a", Schema::number()),
            (
                "group",
                Schema::group([
                    ("a", Schema::text()),
                    ("b", Schema::group([("b", Schema::list(Schema::text()))])),
                ]),
            ),
            ("list", Schema::list(Schema::group([("x", Schema::number())]))),
        ]))
    }

    #[test]
    fn root_path_is_empty() {
        let data = tree();
        assert!(data.root().path().is_root());
        assert!(data.root().is_root());
        assert_eq!(data.root().name(), None);
        assert_eq!(data.root().index(), None);
    }

    #[test]
    fn paths_name_each_hop() {
        let data = tree();
        let b = data.tread("group.b.b").expect("nested list");
        assert_eq!(b.path(), path!["group", "b", "b"]);
        assert_eq!(b.name(), Some("b"));
        assert!(!b.is_root());
    }

    #[test]
    fn relative_tread_walks_up_then_down() {
        let data = tree();
        let b = data.tread("group.b").expect("group.b");
        assert_eq!(b.tread(0, Path::root()), Some(b));
        assert_eq!(b.tread(0, "b"), data.tread("group.b.b"));
        assert_eq!(b.tread(2, Path::root()), Some(data.root()));
        assert_eq!(b.tread(2, path!["group"]), b.tread(1, Path::root()));
        assert_eq!(b.tread(2, "group.a"), data.tread("group.a"));
        assert_eq!(b.tread(9, "a"), data.tread("a"));
    }

    #[test]
    fn misses_resolve_to_none() {
        let data = tree();
        assert!(data.tread("missing").is_none());
        assert!(data.tread("list.0").is_none());
        assert!(data.tread("a.0").is_none());
        assert!(data.tread(path!["group", 0usize]).is_none());
    }
}
