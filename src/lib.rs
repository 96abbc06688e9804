pub mod error;
pub mod json;
pub mod node;
pub mod parser;
pub mod path;
pub mod reader;
pub mod snbt;
pub mod tree;

pub use error::{PathError, Result};
pub use node::Node;
pub use path::TagPath;
pub use tree::{Compound, Scalar, Tag, MAX_DEPTH};

// ── Core API ───────────────────────────────────────────────────────

/// Parse a path such as `foo.bar[0]`, `list[{id:"x"}].count` or
/// `{Tags:["a"]}.Inventory[]`.
pub fn parse_path(input: &str) -> Result<TagPath> {
    TagPath::parse(input)
}

/// Parse a stringified tag literal such as `{a:1b,b:[1,2,3]}`.
pub fn parse_tag(input: &str) -> Result<Tag> {
    snbt::parse_tag(input)
}
