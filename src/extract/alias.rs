use compact_str::CompactString;
use indexmap::IndexMap;

/// Alias to canonical table name mapping of one statement scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    entries: IndexMap<CompactString, CompactString>
}

impl AliasMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` for `table`, replacing an earlier registration
    pub fn insert(&mut self, alias: impl Into<CompactString>, table: impl Into<CompactString>) {
        self.entries.insert(alias.into(), table.into());
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(CompactString::as_str)
    }

    /// Table behind `name`, or `name` itself when it is not an alias
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    /// Take over every entry of `other`; its entries win on conflict
    pub fn merge(&mut self, other: AliasMap) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
