//! Tree kind input.

use std::str::FromStr;

use crate::error::TreeError;

/// Controls where a tree gets its content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeKind {
    /// Use the supplied dataset, falling back to the data provider for roots
    /// and lazily loaded children.
    #[default]
    Auto,
    /// Only the supplied content is shown; the data provider is never used.
    ContentOnly,
}

impl TreeKind {
    /// Every accepted kind, in declaration order.
    pub const ALL: [TreeKind; 2] = [TreeKind::Auto, TreeKind::ContentOnly];

    /// The input spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeKind::Auto => "auto",
            TreeKind::ContentOnly => "content-only",
        }
    }

    /// Whether the data provider may be used for this kind.
    pub fn uses_provider(&self) -> bool {
        !matches!(self, TreeKind::ContentOnly)
    }

    /// Resolve an optional input value.
    ///
    /// An absent or empty value resolves to [`TreeKind::Auto`].
    pub fn parse(value: Option<&str>) -> Result<Self, TreeError> {
        match value {
            None => Ok(TreeKind::Auto),
            Some(v) if v.is_empty() => Ok(TreeKind::Auto),
            Some(v) => v.parse(),
        }
    }

    /// Comma separated list of the accepted spellings.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(TreeKind::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for TreeKind {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TreeError::InvalidConfiguration {
                value: s.to_string(),
                valid: Self::valid_values(),
            })
    }
}

impl std::fmt::Display for TreeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
