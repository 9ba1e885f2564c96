//! Import compilation
//!
//! Generators report the imports each declaration needs as [`ImportPath`]s.
//! An [`ImportSet`] groups them by module, deduplicates symbols and renders one
//! sorted block: whole-module imports first, then `from` imports by module.

use std::collections::{BTreeMap, BTreeSet};

/// One import requirement: a whole module or one symbol from a module
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImportPath {
    pub module: String,
    pub symbol: Option<String>,
}

impl ImportPath {
    /// `import module`
    pub fn module(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbol: None,
        }
    }

    /// `from module import symbol`
    pub fn symbol(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbol: Some(symbol.into()),
        }
    }
}

/// Compiled, deduplicated import requirements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    modules: BTreeSet<String>,
    symbols: BTreeMap<String, BTreeSet<String>>,
}

impl ImportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: ImportPath) {
        match path.symbol {
            Some(symbol) => {
                self.symbols.entry(path.module).or_default().insert(symbol);
            }
            None => {
                self.modules.insert(path.module);
            }
        }
    }

    /// Add every requirement of `other`
    pub fn merge(&mut self, other: ImportSet) {
        self.modules.extend(other.modules);
        for (module, symbols) in other.symbols {
            self.symbols.entry(module).or_default().extend(symbols);
        }
    }

    pub fn contains(&self, path: &ImportPath) -> bool {
        match &path.symbol {
            Some(symbol) => self
                .symbols
                .get(&path.module)
                .is_some_and(|s| s.contains(symbol)),
            None => self.modules.contains(&path.module),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.symbols.is_empty()
    }

    /// Number of distinct requirements
    pub fn len(&self) -> usize {
        self.modules.len() + self.symbols.values().map(BTreeSet::len).sum::<usize>()
    }

    /// Requirements in render order
    pub fn paths(&self) -> Vec<ImportPath> {
        let mut paths: Vec<ImportPath> = self.modules.iter().map(ImportPath::module).collect();
        for (module, symbols) in &self.symbols {
            paths.extend(symbols.iter().map(|s| ImportPath::symbol(module, s)));
        }
        paths
    }

    /// Render the import block, one statement per line
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .modules
            .iter()
            .map(|module| format!("import {}", module))
            .collect();
        for (module, symbols) in &self.symbols {
            let names: Vec<&str> = symbols.iter().map(String::as_str).collect();
            lines.push(format!("from {} import {}", module, names.join(", ")));
        }
        lines.join("\n")
    }
}

impl Extend<ImportPath> for ImportSet {
    fn extend<I: IntoIterator<Item = ImportPath>>(&mut self, iter: I) {
        for path in iter {
            self.insert(path);
        }
    }
}

impl FromIterator<ImportPath> for ImportSet {
    fn from_iter<I: IntoIterator<Item = ImportPath>>(iter: I) -> Self {
        let mut set = ImportSet::new();
        set.extend(iter);
        set
    }
}

/// Compile import requirements gathered in any order
///
/// Compiling the paths of an already compiled set yields the same set.
pub fn compile_imports(paths: impl IntoIterator<Item = ImportPath>) -> ImportSet {
    paths.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_and_sort() {
        let set = compile_imports([
            ImportPath::symbol("typing", "Optional"),
            ImportPath::module("attr"),
            ImportPath::symbol("dynamic_typing", "FloatString"),
            ImportPath::symbol("typing", "List"),
            ImportPath::symbol("typing", "Optional"),
        ]);
        assert_eq!(
            set.render(),
            "import attr\nfrom dynamic_typing import FloatString\nfrom typing import List, Optional"
        );
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_idempotent() {
        let set = compile_imports([
            ImportPath::symbol("typing", "Union"),
            ImportPath::module("attr"),
            ImportPath::symbol("typing", "Any"),
        ]);
        let again = compile_imports(set.paths());
        assert_eq!(again, set);
        assert_eq!(again.render(), set.render());
    }

    #[test]
    fn test_merge_and_contains() {
        let mut a = compile_imports([ImportPath::symbol("typing", "List")]);
        let b = compile_imports([
            ImportPath::symbol("typing", "Optional"),
            ImportPath::module("attr"),
        ]);
        a.merge(b);
        assert!(a.contains(&ImportPath::symbol("typing", "List")));
        assert!(a.contains(&ImportPath::symbol("typing", "Optional")));
        assert!(a.contains(&ImportPath::module("attr")));
        assert!(!a.contains(&ImportPath::module("typing")));
    }

    #[test]
    fn test_empty() {
        let set = ImportSet::new();
        assert!(set.is_empty());
        assert_eq!(set.render(), "");
    }
}
