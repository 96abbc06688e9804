use std::fmt;
use std::str::FromStr;

use crate::error::{PathError, Result};
use crate::node::Node;
use crate::parser;
use crate::reader::StringReader;
use crate::tree::{is_too_deep, Tag};

/// A node together with the offset, relative to the start of the path text,
/// just past the text it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct PathNode {
    pub node: Node,
    pub end: usize,
}

/// A parsed path. It holds no reference to any tree and can be applied to
/// as many roots as needed.
///
/// Paths always contain at least one node, and only the first node may be
/// a [`Node::MatchRootObject`].
#[derive(Debug, Clone, PartialEq)]
pub struct TagPath {
    original: String,
    nodes: Vec<PathNode>,
}

impl TagPath {
    pub(crate) fn new(original: String, nodes: Vec<PathNode>) -> Self {
        TagPath { original, nodes }
    }

    pub fn parse(input: &str) -> Result<Self> {
        parser::parse(input)
    }

    /// Parse a path embedded in a longer command line. See [`parser::parse_from`].
    pub fn parse_from(reader: &mut StringReader<'_>) -> Result<Self> {
        parser::parse_from(reader)
    }

    /// The exact text this path was parsed from.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().map(|pn| &pn.node)
    }

    fn last(&self) -> &PathNode {
        &self.nodes[self.nodes.len() - 1]
    }

    fn estimate_depth(&self) -> usize {
        self.nodes.len()
    }

    fn not_found(&self, at: &PathNode) -> PathError {
        PathError::NothingFound {
            path: self.original[..at.end].to_string(),
        }
    }

    // ── Reading ──────────────────────────────────────────────────────

    /// Every tag the path selects. Fails at the first node that selects
    /// nothing.
    pub fn get<'a>(&self, root: &'a Tag) -> Result<Vec<&'a Tag>> {
        let mut current = vec![root];
        for pn in &self.nodes {
            let mut next = Vec::new();
            for tag in current {
                pn.node.match_all(tag, &mut next);
            }
            if next.is_empty() {
                return Err(self.not_found(pn));
            }
            current = next;
        }
        Ok(current)
    }

    /// Number of tags the path selects, zero where `get` would fail.
    pub fn count_matching(&self, root: &Tag) -> usize {
        let mut current = vec![root];
        for pn in &self.nodes {
            let mut next = Vec::new();
            for tag in current {
                pn.node.match_all(tag, &mut next);
            }
            if next.is_empty() {
                return 0;
            }
            current = next;
        }
        current.len()
    }

    // ── Auto-creation ────────────────────────────────────────────────

    /// Walk every node but the last, creating missing children. A child
    /// created at node `i` is the container node `i + 1` expects to step
    /// into.
    fn get_or_create_parents<'a>(&self, root: &'a mut Tag) -> Result<Vec<&'a mut Tag>> {
        let mut current = vec![root];
        for (i, pn) in self.nodes[..self.nodes.len() - 1].iter().enumerate() {
            let upcoming = &self.nodes[i + 1].node;
            let mut next = Vec::new();
            for tag in current {
                pn.node
                    .match_or_create(tag, &mut || upcoming.preferred_container(), &mut next);
            }
            if next.is_empty() {
                return Err(self.not_found(pn));
            }
            current = next;
        }
        Ok(current)
    }

    /// Select what the path points at, creating it (and any missing parents)
    /// when absent. New leaves come from `leaf`.
    pub fn get_or_create<'a>(
        &self,
        root: &'a mut Tag,
        mut leaf: impl FnMut() -> Tag,
    ) -> Result<Vec<&'a mut Tag>> {
        let parents = self.get_or_create_parents(root)?;
        let last = self.last();
        let mut out = Vec::new();
        for parent in parents {
            last.node.match_or_create(parent, &mut leaf, &mut out);
        }
        if out.is_empty() {
            return Err(self.not_found(last));
        }
        Ok(out)
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Write `value` to every location the path selects, creating missing
    /// parents. Returns how many locations changed value.
    pub fn set(&self, root: &mut Tag, value: Tag) -> Result<usize> {
        if is_too_deep(&value, self.estimate_depth()) {
            tracing::debug!(path = %self.original, "rejected set: value too deep");
            return Err(PathError::TooDeep);
        }
        let parents = self.get_or_create_parents(root)?;
        let last = self.last();
        let mut supply = CopyOnce::new(value);
        let mut changed = 0;
        for parent in parents {
            changed += last.node.write(parent, &mut || supply.take());
        }
        tracing::debug!(path = %self.original, changed, "set");
        Ok(changed)
    }

    /// Insert copies of `tags` into every list the path selects, creating
    /// the list when absent. A negative `index` counts back from one past
    /// the end, so `-1` appends. Returns how many lists were modified.
    pub fn insert(&self, index: i32, root: &mut Tag, tags: &[Tag]) -> Result<usize> {
        let depth = self.estimate_depth();
        let mut prepared = Vec::with_capacity(tags.len());
        for tag in tags {
            let copy = tag.clone();
            if is_too_deep(&copy, depth) {
                tracing::debug!(path = %self.original, "rejected insert: value too deep");
                return Err(PathError::TooDeep);
            }
            prepared.push(copy);
        }

        let targets = self.get_or_create(root, Tag::new_list)?;
        let mut supply = CopyOnce::new(prepared);
        let mut modified = 0;
        for target in targets {
            let list = match target {
                Tag::List(list) => list,
                other => {
                    return Err(PathError::ExpectedList {
                        found: other.clone(),
                    })
                }
            };
            let at = if index < 0 {
                list.len() as i64 + i64::from(index) + 1
            } else {
                i64::from(index)
            };
            let items = supply.take();
            if items.is_empty() {
                continue;
            }
            if at < 0 || at > list.len() as i64 {
                return Err(PathError::InvalidIndex { index: at });
            }
            let at = at as usize;
            for (offset, item) in items.into_iter().enumerate() {
                list.insert(at + offset, item);
            }
            modified += 1;
        }
        tracing::debug!(path = %self.original, modified, "insert");
        Ok(modified)
    }

    /// Remove everything the path selects. Returns how many tags were removed.
    pub fn remove(&self, root: &mut Tag) -> usize {
        let mut current = vec![root];
        for pn in &self.nodes[..self.nodes.len() - 1] {
            let mut next = Vec::new();
            for tag in current {
                pn.node.match_all_mut(tag, &mut next);
            }
            current = next;
        }
        let last = self.last();
        let removed: usize = current
            .into_iter()
            .map(|parent| last.node.erase(parent))
            .sum();
        tracing::debug!(path = %self.original, removed, "remove");
        removed
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for TagPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self> {
        TagPath::parse(s)
    }
}

/// Hands out a value to several write sites without sharing it: the first
/// request receives the original, later ones receive copies of a pristine
/// prototype kept aside at that point.
struct CopyOnce<T> {
    value: T,
    state: SupplyState,
}

enum SupplyState {
    Fresh,
    Spent,
}

impl<T: Clone> CopyOnce<T> {
    fn new(value: T) -> Self {
        CopyOnce {
            value,
            state: SupplyState::Fresh,
        }
    }

    fn take(&mut self) -> T {
        match self.state {
            SupplyState::Fresh => {
                self.state = SupplyState::Spent;
                let prototype = self.value.clone();
                std::mem::replace(&mut self.value, prototype)
            }
            SupplyState::Spent => self.value.clone(),
        }
    }
}
