//! Named constants and functions a host binding exports.
//!
//! A host calls [`init`] once and walks the returned [`Registry`] to build
//! its namespace. Nothing is registered implicitly when the crate is
//! loaded.

use std::collections::HashSet;

use crate::error::{QuireError, Result};
use crate::global::{PageBox, Permission, Rotation};

/// A single exported enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Constant {
    pub name: &'static str,
    pub value: i64,
}

/// The members of one enum, in value order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EnumTable {
    pub name: &'static str,
    pub constants: Vec<Constant>,
}

impl EnumTable {
    fn of<T: Copy>(name: &'static str, all: &[T], describe: impl Fn(T) -> Constant) -> Self {
        Self {
            name,
            constants: all.iter().copied().map(describe).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }
}

/// A function a host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FunctionEntry {
    pub name: &'static str,
    pub signature: &'static str,
    pub summary: &'static str,
}

/// A deprecated extra name for an enum member.
///
/// Older bindings exported `rotate18_0` and `rotate27_0`; they stay
/// importable and resolve to the same member as `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Alias {
    pub name: &'static str,
    pub table: &'static str,
    pub target: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Registry {
    enums: Vec<EnumTable>,
    functions: Vec<FunctionEntry>,
    aliases: Vec<Alias>,
}

/// Build the registry. Equivalent to [`Registry::new`].
pub fn init() -> Registry {
    Registry::new()
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let enums = vec![
            EnumTable::of(Permission::KIND, Permission::ALL, |p| Constant {
                name: p.name(),
                value: p.value(),
            }),
            EnumTable::of(PageBox::KIND, PageBox::ALL, |b| Constant {
                name: b.name(),
                value: b.value(),
            }),
            EnumTable::of(Rotation::KIND, Rotation::ALL, |r| Constant {
                name: r.name(),
                value: r.value(),
            }),
        ];
        let functions = vec![
            FunctionEntry {
                name: "ustring",
                signature: "(text: str | bytes) -> _ustring",
                summary: "Convert UTF-8 text to the library's wide string",
            },
            FunctionEntry {
                name: "from_ustring",
                signature: "(value: _ustring) -> str",
                summary: "Convert a wide string back to UTF-8 text",
            },
            FunctionEntry {
                name: "permissions_from_p",
                signature: "(p: int) -> list[permission_enum]",
                summary: "Decode the /P entry of an encryption dictionary",
            },
            FunctionEntry {
                name: "rotation_from_degrees",
                signature: "(degrees: int) -> rotation_enum",
                summary: "Normalise a /Rotate value to a rotation",
            },
        ];
        let aliases = vec![
            Alias {
                name: "rotate18_0",
                table: Rotation::KIND,
                target: Rotation::Rotate180.name(),
            },
            Alias {
                name: "rotate27_0",
                table: Rotation::KIND,
                target: Rotation::Rotate270.name(),
            },
        ];
        tracing::trace!(
            enums = enums.len(),
            functions = functions.len(),
            aliases = aliases.len(),
            "registry built"
        );
        Self {
            enums,
            functions,
            aliases,
        }
    }

    pub fn enums(&self) -> &[EnumTable] {
        &self.enums
    }

    pub fn functions(&self) -> &[FunctionEntry] {
        &self.functions
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.aliases
    }

    /// The member an alias stands for.
    pub fn resolve_alias(&self, alias: &Alias) -> Result<&Constant> {
        self.table(alias.table)
            .and_then(|t| t.get(alias.target))
            .ok_or_else(|| QuireError::UnknownName {
                kind: "alias target",
                name: format!("{}.{}", alias.table, alias.target),
            })
    }

    pub fn table(&self, name: &str) -> Option<&EnumTable> {
        self.enums.iter().find(|t| t.name == name)
    }

    /// Find a member by its exported name in any table.
    ///
    /// Hosts that export enum members at module level see them under these
    /// names, so they must be unique across tables; [`Registry::validate`]
    /// checks that.
    pub fn lookup(&self, name: &str) -> Option<(&EnumTable, &Constant)> {
        self.enums
            .iter()
            .find_map(|t| t.get(name).map(|c| (t, c)))
    }

    /// Every name the host will place in its namespace.
    pub fn exported_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.enums
            .iter()
            .flat_map(|t| std::iter::once(t.name).chain(t.constants.iter().map(|c| c.name)))
            .chain(self.functions.iter().map(|f| f.name))
            .chain(self.aliases.iter().map(|a| a.name))
    }

    /// Check that exported names do not collide, that values are unique
    /// within each table and that every alias points at a member.
    ///
    /// Aliases share a value with their target and are not part of the
    /// value check.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in self.exported_names() {
            if !seen.insert(name) {
                return Err(QuireError::DuplicateName(name.to_string()));
            }
        }
        for table in &self.enums {
            let mut values = HashSet::new();
            for c in &table.constants {
                if !values.insert(c.value) {
                    return Err(QuireError::DuplicateValue {
                        table: table.name,
                        name: c.name,
                        value: c.value,
                    });
                }
            }
        }
        for alias in &self.aliases {
            self.resolve_alias(alias)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_in_order() {
        let reg = init();
        let names: Vec<_> = reg.enums().iter().map(|t| t.name).collect();
        assert_eq!(names, ["permission_enum", "page_box_enum", "rotation_enum"]);
        assert_eq!(reg.table("permission_enum").unwrap().constants.len(), 8);
        assert!(reg.table("missing").is_none());
    }

    #[test]
    fn test_lookup() {
        let reg = init();
        let (table, c) = reg.lookup("trim_box").unwrap();
        assert_eq!(table.name, "page_box_enum");
        assert_eq!(c.value, 3);
        let (_, c) = reg.lookup("print_high_resolution").unwrap();
        assert_eq!(c.value, 7);
        assert!(reg.lookup("rotate_45").is_none());
    }

    #[test]
    fn test_validate() {
        assert!(init().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_collision() {
        let mut reg = init();
        reg.functions.push(FunctionEntry {
            name: "copy",
            signature: "()",
            summary: "",
        });
        assert!(matches!(
            reg.validate(),
            Err(QuireError::DuplicateName(name)) if name == "copy"
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_value() {
        let mut reg = init();
        reg.enums[2].constants.push(Constant {
            name: "rotate_360",
            value: 0,
        });
        assert!(matches!(
            reg.validate(),
            Err(QuireError::DuplicateValue {
                table: "rotation_enum",
                name: "rotate_360",
                value: 0
            })
        ));
    }

    #[test]
    fn test_aliases_resolve_to_rotation_members() {
        let reg = init();
        let resolved: Vec<_> = reg
            .aliases()
            .iter()
            .map(|a| (a.name, reg.resolve_alias(a).unwrap().value))
            .collect();
        assert_eq!(resolved, [("rotate18_0", 2), ("rotate27_0", 3)]);
    }

    #[test]
    fn test_validate_rejects_dangling_alias() {
        let mut reg = init();
        reg.aliases.push(Alias {
            name: "rotate36_0",
            table: "rotation_enum",
            target: "rotate_360",
        });
        assert!(matches!(
            reg.validate(),
            Err(QuireError::UnknownName {
                kind: "alias target",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_alias_shadowing_member() {
        let mut reg = init();
        reg.aliases.push(Alias {
            name: "rotate_90",
            table: "rotation_enum",
            target: "rotate_90",
        });
        assert!(matches!(
            reg.validate(),
            Err(QuireError::DuplicateName(name)) if name == "rotate_90"
        ));
    }
}
