//! Collects the named types a file declares.

use std::fmt;

use crate::ast::SourceFile;
use crate::parser::{ParseError, ParsedFile};

/// A named type together with the package that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclaredType {
    pub name: String,
    pub package: String,
}

impl DeclaredType {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        DeclaredType {
            name: name.into(),
            package: package.into(),
        }
    }

    /// `package.Name`
    pub fn fullname(&self) -> String {
        format!("{}.{}", self.package, self.name)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.package, self.name)
    }
}

/// Every type spec of `file`, including aliases and specs inside groups.
pub fn declared_types(file: &SourceFile) -> Vec<DeclaredType> {
    file.type_specs()
        .map(|(_, spec)| DeclaredType::new(&spec.name, &file.package))
        .collect()
}

pub fn scan_declared_types(src: &[u8]) -> Result<Vec<DeclaredType>, ParseError> {
    let parsed = ParsedFile::parse(src)?;
    Ok(declared_types(&parsed.file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_all_type_specs() {
        let src = b"package footest\n\ntype User struct{}\n\ntype (\n\tID = string\n\tKind int\n)\n\nfunc (u *User) ID() string { return \"\" }\n";
        let types = scan_declared_types(src).unwrap();
        assert_eq!(
            types,
            vec![
                DeclaredType::new("User", "footest"),
                DeclaredType::new("ID", "footest"),
                DeclaredType::new("Kind", "footest"),
            ]
        );
        assert_eq!(types[0].fullname(), "footest.User");
        assert_eq!(types[2].to_string(), "footest.Kind");
    }

    #[test]
    fn file_without_types() {
        assert_eq!(scan_declared_types(b"package empty\n").unwrap(), vec![]);
    }

    #[test]
    fn invalid_source_is_an_error() {
        assert!(scan_declared_types(b"package\n").is_err());
    }
}
