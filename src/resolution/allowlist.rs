use std::collections::HashSet;

/// Subagent types provided by the runtime itself.
pub const BUILTIN_SUBAGENT_TYPES: &[&str] = &[
    "general-purpose",
    "explore",
    "plan",
    "statusline-setup",
    "output-style-setup",
    "claude-code-guide",
];

/// Model identifiers accepted wherever an agent name is.
pub const BUILTIN_MODELS: &[&str] = &["sonnet", "opus", "haiku", "inherit"];

/// Names that are never reported as dangling, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    names: HashSet<String>,
}

impl AllowList {
    /// The runtime subagent types and model identifiers.
    pub fn builtin() -> Self {
        Self::from_names(BUILTIN_SUBAGENT_TYPES.iter().chain(BUILTIN_MODELS))
    }

    pub fn empty() -> Self {
        Self {
            names: HashSet::new(),
        }
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns a copy extended with additional names.
    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names
            .extend(names.into_iter().map(|n| n.as_ref().to_ascii_lowercase()));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::builtin()
    }
}
