// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Palaver Contributors

//! Hierarchical slash-command catalog lookup.

/// One node of the command tree
#[derive(Debug, PartialEq, Eq)]
pub struct CommandNode {
    pub name: &'static str,
    pub description: &'static str,
    pub children: &'static [CommandNode],
}

impl CommandNode {
    pub const fn leaf(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            children: &[],
        }
    }

    pub const fn branch(
        name: &'static str,
        description: &'static str,
        children: &'static [CommandNode],
    ) -> Self {
        Self {
            name,
            description,
            children,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&'static CommandNode> {
        find(self.children, name)
    }
}

/// A completion candidate for the slash menu
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlashSuggestion {
    pub value: &'static str,
    /// `/`-prefixed, space-separated path, e.g. `/stats model`
    pub full_path: String,
    pub description: &'static str,
    /// Selecting this suggestion should drill down rather than finish
    pub has_children: bool,
}

/// Lookup over a static command tree.
///
/// At each level, prefix matches come before substring matches. Ties keep
/// the declared order of the catalog.
#[derive(Clone, Copy, Debug)]
pub struct SlashTree {
    roots: &'static [CommandNode],
}

impl SlashTree {
    pub const fn new(roots: &'static [CommandNode]) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &'static [CommandNode] {
        self.roots
    }

    /// Node at an exact path, matched case-insensitively
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<&'static CommandNode> {
        let (first, rest) = path.split_first()?;
        let mut node = find(self.roots, first.as_ref())?;
        for part in rest {
            node = node.child(part.as_ref())?;
        }
        Some(node)
    }

    pub fn suggest<S: AsRef<str>>(&self, parts: &[S], limit: usize) -> Vec<SlashSuggestion> {
        let Some((last, walk)) = parts.split_last() else {
            return self
                .roots
                .iter()
                .take(limit)
                .map(|node| suggestion(&[], node))
                .collect();
        };

        let mut level = self.roots;
        let mut path = Vec::with_capacity(walk.len());
        for part in walk {
            let Some(node) = find(level, part.as_ref()) else {
                return Vec::new();
            };
            path.push(node.name);
            level = node.children;
        }

        let query = last.as_ref().to_lowercase();
        let matches: Vec<&CommandNode> = if query.is_empty() {
            level.iter().collect()
        } else {
            let prefixed = level.iter().filter(|n| n.name.starts_with(&query));
            let inner = level
                .iter()
                .filter(|n| !n.name.starts_with(&query) && n.name.contains(&query));
            prefixed.chain(inner).collect()
        };

        matches
            .into_iter()
            .take(limit)
            .map(|node| suggestion(&path, node))
            .collect()
    }
}

fn find(level: &'static [CommandNode], name: &str) -> Option<&'static CommandNode> {
    level.iter().find(|n| n.name.eq_ignore_ascii_case(name))
}

fn suggestion(path: &[&str], node: &'static CommandNode) -> SlashSuggestion {
    let mut full_path = String::from("/");
    for part in path {
        full_path.push_str(part);
        full_path.push(' ');
    }
    full_path.push_str(node.name);
    SlashSuggestion {
        value: node.name,
        full_path,
        description: node.description,
        has_children: node.has_children(),
    }
}

#[cfg(test)]
#[path = "slash_tests.rs"]
mod tests;
