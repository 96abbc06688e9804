use crate::tree::{matches_pattern, Compound, Tag};

/// Produces values on demand: fresh leaves for auto-creation, or the
/// replacement values handed out by a write.
pub type Supplier<'s> = dyn FnMut() -> Tag + 's;

/// One step of a path.
///
/// Every variant implements the same five behaviors: select children
/// (`match_all`/`match_all_mut`), select-or-create (`match_or_create`),
/// name the container it expects to be applied to (`preferred_container`),
/// overwrite what it selects (`write`) and delete what it selects (`erase`).
/// Selection appends to `out` so a whole working set can be collected
/// into one vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `name` or `"quoted name"`: exact key lookup in a compound.
    CompoundChild { name: String },
    /// `[n]`: list element by position; negative counts from the end.
    IndexedElement { index: i32 },
    /// `[{pattern}]`: every list element the pattern partially matches.
    MatchElement { pattern: Compound },
    /// `[]`: every list element.
    AllElements,
    /// `name{pattern}`: the value under `name`, if the pattern matches it.
    MatchObject { name: String, pattern: Compound },
    /// `{pattern}` at the start of a path: the root itself, if it matches.
    MatchRootObject { pattern: Compound },
}

impl Node {
    pub fn match_all<'a>(&self, parent: &'a Tag, out: &mut Vec<&'a Tag>) {
        match (self, parent) {
            (Node::CompoundChild { name }, Tag::Compound(c)) => out.extend(c.get(name)),
            (Node::IndexedElement { index }, Tag::List(l)) => {
                if let Some(i) = resolve_index(*index, l.len()) {
                    out.push(&l[i]);
                }
            }
            (Node::MatchElement { pattern }, Tag::List(l)) => {
                out.extend(l.iter().filter(|t| matches_pattern(pattern, t)))
            }
            (Node::AllElements, Tag::List(l)) => out.extend(l.iter()),
            (Node::MatchObject { name, pattern }, Tag::Compound(c)) => {
                out.extend(c.get(name).filter(|t| matches_pattern(pattern, t)))
            }
            (Node::MatchRootObject { pattern }, _) => {
                if matches_pattern(pattern, parent) {
                    out.push(parent);
                }
            }
            _ => {}
        }
    }

    pub fn match_all_mut<'a>(&self, parent: &'a mut Tag, out: &mut Vec<&'a mut Tag>) {
        match self {
            Node::CompoundChild { name } => {
                if let Tag::Compound(c) = parent {
                    out.extend(c.get_mut(name));
                }
            }
            Node::IndexedElement { index } => {
                if let Tag::List(l) = parent {
                    if let Some(i) = resolve_index(*index, l.len()) {
                        out.extend(l.get_mut(i));
                    }
                }
            }
            Node::MatchElement { pattern } => {
                if let Tag::List(l) = parent {
                    out.extend(l.iter_mut().filter(|t| matches_pattern(pattern, t)));
                }
            }
            Node::AllElements => {
                if let Tag::List(l) = parent {
                    out.extend(l.iter_mut());
                }
            }
            Node::MatchObject { name, pattern } => {
                if let Tag::Compound(c) = parent {
                    out.extend(c.get_mut(name).filter(|t| matches_pattern(pattern, t)));
                }
            }
            Node::MatchRootObject { pattern } => {
                if matches_pattern(pattern, parent) {
                    out.push(parent);
                }
            }
        }
    }

    /// Like `match_all_mut`, but when nothing matches a single child is
    /// created, inserted into `parent` and selected.
    pub fn match_or_create<'a>(
        &self,
        parent: &'a mut Tag,
        supplier: &mut Supplier<'_>,
        out: &mut Vec<&'a mut Tag>,
    ) {
        match self {
            Node::CompoundChild { name } => {
                if let Tag::Compound(c) = parent {
                    out.push(c.entry(name.clone()).or_insert_with(|| supplier()));
                }
            }
            Node::MatchElement { pattern } => {
                if let Tag::List(l) = parent {
                    if l.iter().any(|t| matches_pattern(pattern, t)) {
                        out.extend(l.iter_mut().filter(|t| matches_pattern(pattern, t)));
                    } else {
                        l.push(Tag::Compound(pattern.clone()));
                        out.extend(l.last_mut());
                    }
                }
            }
            Node::AllElements => {
                if let Tag::List(l) = parent {
                    if l.is_empty() {
                        l.push(supplier());
                    }
                    out.extend(l.iter_mut());
                }
            }
            Node::MatchObject { name, pattern } => {
                if let Tag::Compound(c) = parent {
                    let child = c
                        .entry(name.clone())
                        .or_insert_with(|| Tag::Compound(pattern.clone()));
                    if matches_pattern(pattern, child) {
                        out.push(child);
                    }
                }
            }
            Node::IndexedElement { .. } | Node::MatchRootObject { .. } => {
                self.match_all_mut(parent, out)
            }
        }
    }

    /// An empty container of the kind this node navigates into.
    pub fn preferred_container(&self) -> Tag {
        match self {
            Node::CompoundChild { .. } | Node::MatchObject { .. } | Node::MatchRootObject { .. } => {
                Tag::new_compound()
            }
            Node::IndexedElement { .. } | Node::MatchElement { .. } | Node::AllElements => {
                Tag::new_list()
            }
        }
    }

    /// Replace every selected child with a value from `supplier`, returning
    /// how many children changed value.
    pub fn write(&self, parent: &mut Tag, supplier: &mut Supplier<'_>) -> usize {
        match self {
            Node::CompoundChild { name } => {
                let Tag::Compound(c) = parent else { return 0 };
                let new = supplier();
                match c.get_mut(name) {
                    Some(slot) if *slot == new => 0,
                    Some(slot) => {
                        *slot = new;
                        1
                    }
                    None => {
                        c.insert(name.clone(), new);
                        1
                    }
                }
            }
            Node::IndexedElement { index } => {
                let Tag::List(l) = parent else { return 0 };
                let Some(i) = resolve_index(*index, l.len()) else {
                    return 0;
                };
                let new = supplier();
                if l[i] == new {
                    return 0;
                }
                l[i] = new;
                1
            }
            Node::MatchElement { pattern } => {
                let Tag::List(l) = parent else { return 0 };
                if l.is_empty() {
                    l.push(supplier());
                    return 1;
                }
                let mut changed = 0;
                for slot in l.iter_mut() {
                    if matches_pattern(pattern, slot) {
                        let new = supplier();
                        if *slot != new {
                            *slot = new;
                            changed += 1;
                        }
                    }
                }
                changed
            }
            Node::AllElements => {
                let Tag::List(l) = parent else { return 0 };
                if l.is_empty() {
                    l.push(supplier());
                    return 1;
                }
                let first = supplier();
                let differing = l.iter().filter(|t| **t != first).count();
                if differing == 0 {
                    return 0;
                }
                let len = l.len();
                l.clear();
                l.push(first);
                for _ in 1..len {
                    l.push(supplier());
                }
                differing
            }
            Node::MatchObject { name, pattern } => {
                let Tag::Compound(c) = parent else { return 0 };
                match c.get_mut(name) {
                    Some(slot) if matches_pattern(pattern, slot) => {
                        let new = supplier();
                        if *slot == new {
                            return 0;
                        }
                        *slot = new;
                        1
                    }
                    _ => 0,
                }
            }
            Node::MatchRootObject { .. } => 0,
        }
    }

    /// Remove every selected child, returning how many were removed.
    pub fn erase(&self, parent: &mut Tag) -> usize {
        match (self, parent) {
            (Node::CompoundChild { name }, Tag::Compound(c)) => {
                usize::from(c.remove(name).is_some())
            }
            (Node::IndexedElement { index }, Tag::List(l)) => {
                match resolve_index(*index, l.len()) {
                    Some(i) => {
                        l.remove(i);
                        1
                    }
                    None => 0,
                }
            }
            (Node::MatchElement { pattern }, Tag::List(l)) => {
                let mut removed = 0;
                for i in (0..l.len()).rev() {
                    if matches_pattern(pattern, &l[i]) {
                        l.remove(i);
                        removed += 1;
                    }
                }
                removed
            }
            (Node::AllElements, Tag::List(l)) => {
                let len = l.len();
                l.clear();
                len
            }
            (Node::MatchObject { name, pattern }, Tag::Compound(c)) => {
                if c.get(name).is_some_and(|t| matches_pattern(pattern, t)) {
                    c.remove(name);
                    1
                } else {
                    0
                }
            }
            _ => 0,
        }
    }
}

/// Resolve a possibly negative list index against `len`.
fn resolve_index(index: i32, len: usize) -> Option<usize> {
    let resolved = if index < 0 {
        len as i64 + i64::from(index)
    } else {
        i64::from(index)
    };
    if resolved >= 0 && (resolved as usize) < len {
        Some(resolved as usize)
    } else {
        None
    }
}
