use std::collections::BTreeMap;

/// Maximum structural depth a written value may reach, counted from the
/// number of nodes in the path it is written through.
pub const MAX_DEPTH: usize = 512;

/// A compound tag: unique string keys mapped to child tags.
pub type Compound = BTreeMap<String, Tag>;

/// A leaf value in the tag tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

/// A node in the tag tree: a compound, an ordered list, or a scalar leaf.
///
/// `Clone` is a deep copy; there is no sharing between tags.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Compound(Compound),
    List(Vec<Tag>),
    Scalar(Scalar),
}

impl Tag {
    pub fn new_compound() -> Self {
        Tag::Compound(Compound::new())
    }

    pub fn new_list() -> Self {
        Tag::List(Vec::new())
    }

    pub fn byte(v: i8) -> Self {
        Tag::Scalar(Scalar::Byte(v))
    }

    pub fn short(v: i16) -> Self {
        Tag::Scalar(Scalar::Short(v))
    }

    pub fn int(v: i32) -> Self {
        Tag::Scalar(Scalar::Int(v))
    }

    pub fn long(v: i64) -> Self {
        Tag::Scalar(Scalar::Long(v))
    }

    pub fn float(v: f32) -> Self {
        Tag::Scalar(Scalar::Float(v))
    }

    pub fn double(v: f64) -> Self {
        Tag::Scalar(Scalar::Double(v))
    }

    pub fn string(v: impl Into<String>) -> Self {
        Tag::Scalar(Scalar::String(v.into()))
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Tag>> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Tag>> {
        match self {
            Tag::List(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Compound> for Tag {
    fn from(c: Compound) -> Self {
        Tag::Compound(c)
    }
}

impl From<Vec<Tag>> for Tag {
    fn from(l: Vec<Tag>) -> Self {
        Tag::List(l)
    }
}

impl From<Scalar> for Tag {
    fn from(s: Scalar) -> Self {
        Tag::Scalar(s)
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::new_compound()
    }
}

/// Structural comparison of `candidate` against `pattern`.
///
/// Compounds always compare as a subset: the candidate may carry keys the
/// pattern does not mention. With `partial`, a non-empty pattern list
/// matches when each of its elements matches some element of the candidate
/// list, in any order, and an empty pattern list only matches an empty
/// list. Everything else compares by value.
pub fn compare_tags(pattern: &Tag, candidate: &Tag, partial: bool) -> bool {
    match (pattern, candidate) {
        (Tag::Compound(p), Tag::Compound(c)) => compound_contains(p, c, partial),
        (Tag::List(p), Tag::List(c)) if partial => {
            if p.is_empty() {
                return c.is_empty();
            }
            p.iter()
                .all(|pv| c.iter().any(|cv| compare_tags(pv, cv, partial)))
        }
        _ => pattern == candidate,
    }
}

/// Partial match of a compound pattern against any tag.
pub fn matches_pattern(pattern: &Compound, candidate: &Tag) -> bool {
    match candidate {
        Tag::Compound(c) => compound_contains(pattern, c, true),
        _ => false,
    }
}

fn compound_contains(pattern: &Compound, candidate: &Compound, partial: bool) -> bool {
    pattern.iter().all(|(key, pv)| match candidate.get(key) {
        Some(cv) => compare_tags(pv, cv, partial),
        None => false,
    })
}

/// True when `tag`, placed `depth` levels down, would reach `MAX_DEPTH`
/// anywhere in its subtree.
pub fn is_too_deep(tag: &Tag, depth: usize) -> bool {
    if depth >= MAX_DEPTH {
        return true;
    }
    match tag {
        Tag::Compound(c) => c.values().any(|child| is_too_deep(child, depth + 1)),
        Tag::List(l) => l.iter().any(|child| is_too_deep(child, depth + 1)),
        Tag::Scalar(_) => false,
    }
}
