//! Validated option declarations.
//!
//! Every program gets the reserved flags (`help`, `version`, `license`,
//! `quiet`, `verbose`) ahead of its own declarations. Long names must be
//! unique and short letters must not collide.
use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::types::{OptionDecl, OptionKind};

pub const HELP: &str = "help";
pub const VERSION: &str = "version";
pub const LICENSE: &str = "license";
pub const QUIET: &str = "quiet";
pub const VERBOSE: &str = "verbose";

pub fn reserved_options() -> Vec<OptionDecl> {
    vec![
        OptionDecl::boolean(HELP, 'h', "Show help information"),
        OptionDecl::boolean(VERSION, 'V', "Show version information"),
        OptionDecl::boolean(LICENSE, 'l', "Show license information"),
        OptionDecl::boolean(QUIET, 'q', "Suppress all output"),
        OptionDecl::boolean(VERBOSE, 'v', "Enable verbose output"),
    ]
}

pub fn is_reserved(long: &str) -> bool {
    matches!(long, HELP | VERSION | LICENSE | QUIET | VERBOSE)
}

#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    decls: Vec<OptionDecl>,
    by_short: BTreeMap<char, usize>,
    by_long: BTreeMap<String, usize>,
}

impl OptionSet {
    /// Build a set from exactly the given declarations.
    pub fn new(decls: Vec<OptionDecl>) -> Result<Self> {
        let mut by_short = BTreeMap::new();
        let mut by_long = BTreeMap::new();

        for (i, decl) in decls.iter().enumerate() {
            if decl.long.is_empty()
                || decl.long.starts_with('-')
                || decl.long.contains('=')
                || decl.long.chars().any(char::is_whitespace)
            {
                return Err(Error::InvalidOption(decl.long.clone()));
            }
            if by_long.insert(decl.long.clone(), i).is_some() {
                return Err(Error::DuplicateOption(format!("--{}", decl.long)));
            }
            if let Some(c) = decl.short {
                if c == '-' || c.is_whitespace() {
                    return Err(Error::InvalidOption(c.to_string()));
                }
                if by_short.insert(c, i).is_some() {
                    return Err(Error::DuplicateOption(format!("-{}", c)));
                }
            }
        }

        Ok(Self {
            decls,
            by_short,
            by_long,
        })
    }

    /// Build a set from the reserved flags followed by `decls`.
    pub fn with_reserved(decls: Vec<OptionDecl>) -> Result<Self> {
        let mut all = reserved_options();
        all.extend(decls);
        Self::new(all)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn get(&self, long: &str) -> Option<&OptionDecl> {
        self.by_long.get(long).map(|&i| &self.decls[i])
    }

    pub fn kind(&self, long: &str) -> Option<OptionKind> {
        self.get(long).map(|d| d.kind)
    }

    /// Long name for a short letter.
    pub fn long_for(&self, short: char) -> Option<&str> {
        self.by_short.get(&short).map(|&i| self.decls[i].long.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_flags_come_first() {
        let set = OptionSet::with_reserved(vec![OptionDecl::value("name", 'n', "A name")]).unwrap();
        let names: Vec<_> = set.iter().map(|d| d.long.as_str()).collect();
        assert_eq!(names, ["help", "version", "license", "quiet", "verbose", "name"]);
        assert_eq!(set.long_for('V'), Some("version"));
        assert_eq!(set.kind("name"), Some(OptionKind::Value));
    }

    #[test]
    fn duplicate_long_name_is_rejected() {
        let err = OptionSet::with_reserved(vec![OptionDecl::boolean("help", None, "again")])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateOption(ref n) if n == "--help"));
    }

    #[test]
    fn colliding_short_letter_is_rejected() {
        let err = OptionSet::with_reserved(vec![OptionDecl::value("query", 'q', "A query")])
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateOption(ref n) if n == "-q"));
    }

    #[test]
    fn malformed_long_name_is_rejected() {
        for bad in ["", "--x", "a=b", "two words"] {
            let err = OptionSet::new(vec![OptionDecl::boolean(bad, None, "")]).unwrap_err();
            assert!(matches!(err, Error::InvalidOption(_)), "{bad:?}");
        }
    }

    #[test]
    fn short_letter_is_optional() {
        let set = OptionSet::new(vec![OptionDecl::boolean("cli", None, "Force cli")]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("cli").unwrap().short.is_none());
    }
}
