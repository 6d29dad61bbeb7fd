//! # Parse Values
//!
//! The tree shape every successful parse produces.
//!
//! ## Overview
//!
//! A [`Value`] is a recursive sum of three cases:
//!
//! - [`Value::Text`] is the literal matched by a terminal.
//! - [`Value::Node`] is an ordered, tagged list of child values. Sequences
//!   produce nodes tagged [`Tag::Seq`]; reductions retag them with a
//!   user-supplied [`Action`].
//! - [`Value::Empty`] is produced by the epsilon combinator.
//!
//! Actions are opaque descriptors: the engine embeds them verbatim in the
//! output tree and never evaluates them. Callers walk the finished tree and
//! interpret tagged nodes however they like (typically as applications of
//! the named action to the children).
//!
//! Values implement structural `Eq` and `Hash`; the engine relies on that
//! to deduplicate results discovered through different derivations.

use std::fmt;

use compact_str::CompactString;

/// Child storage for [`Value::Node`].
pub type Children = Vec<Value>;

/// An opaque semantic-action descriptor.
///
/// Reductions replace a sequence node's default tag with one of these; the
/// engine itself attaches no meaning to the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action(CompactString);

impl Action {
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(CompactString::from(name.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tag carried by a [`Value::Node`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tag {
    /// The default tag on nodes built by the sequence combinator.
    Seq,
    /// A reduction replaced the default tag with a semantic action.
    Action(Action),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seq => f.write_str("seq"),
            Self::Action(action) => action.fmt(f),
        }
    }
}

/// A parse value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// The empty value, produced by epsilon.
    Empty,
    /// A terminal leaf: the matched literal.
    Text(CompactString),
    /// A tagged list of child values.
    Node { tag: Tag, children: Children },
}

impl Value {
    /// Leaf constructor.
    #[must_use]
    pub fn text(text: impl Into<CompactString>) -> Self {
        Self::Text(text.into())
    }

    /// A sequence node with the default tag.
    #[must_use]
    pub fn seq(children: impl IntoIterator<Item = Self>) -> Self {
        Self::Node {
            tag: Tag::Seq,
            children: children.into_iter().collect(),
        }
    }

    /// A reduced node.
    #[must_use]
    pub fn node(action: Action, children: impl IntoIterator<Item = Self>) -> Self {
        Self::Node {
            tag: Tag::Action(action),
            children: children.into_iter().collect(),
        }
    }

    /// Apply a reduction action to this value.
    ///
    /// The action descriptor absorbs a `seq`-tagged node (it replaces the
    /// tag, keeping the flattened children), wraps any other non-empty
    /// value as a single child, and yields a childless node for the empty
    /// value.
    #[must_use]
    pub(crate) fn reduce(self, action: &Action) -> Self {
        let tag = Tag::Action(action.clone());
        match self {
            Self::Empty => Self::Node {
                tag,
                children: Children::new(),
            },
            Self::Node {
                tag: Tag::Seq,
                children,
            } => Self::Node { tag, children },
            other => Self::Node {
                tag,
                children: std::iter::once(other).collect(),
            },
        }
    }

    /// The node tag, if this value is a node.
    #[must_use]
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Self::Node { tag, .. } => Some(tag),
            _ => None,
        }
    }

    /// Child values; empty for leaves and the empty value.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Node { children, .. } => children,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Concatenate every leaf in depth-first order.
    ///
    /// For a full match this reconstructs the consumed input exactly.
    #[must_use]
    pub fn flat_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Empty => {}
            Self::Text(text) => out.push_str(text),
            Self::Node { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl fmt::Display for Value {
    /// Renders the tree as an s-expression: `(tag child ...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("()"),
            Self::Text(text) => write!(f, "{:?}", text.as_str()),
            Self::Node { tag, children } => {
                write!(f, "({tag}")?;
                for child in children {
                    write!(f, " {child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
