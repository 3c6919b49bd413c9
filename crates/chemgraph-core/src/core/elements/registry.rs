use super::element::{Element, ElementLike, FunctionalGroup, GroupComponent};
use super::table::ELEMENTS;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

struct BuiltinGroup {
    symbol: &'static str,
    components: &'static [(&'static str, u32)],
    flippable: bool,
}

// Order matters: a group may only reference elements and groups listed before it.
const BUILTIN_GROUPS: &[BuiltinGroup] = &[
    BuiltinGroup { symbol: "Me", components: &[("C", 1), ("H", 3)], flippable: false },
    BuiltinGroup { symbol: "Et", components: &[("C", 1), ("H", 2), ("Me", 1)], flippable: false },
    BuiltinGroup { symbol: "iPr", components: &[("C", 1), ("H", 1), ("Me", 2)], flippable: false },
    BuiltinGroup { symbol: "tBu", components: &[("C", 1), ("Me", 3)], flippable: false },
    BuiltinGroup { symbol: "Ph", components: &[("C", 6), ("H", 5)], flippable: false },
    BuiltinGroup { symbol: "Bn", components: &[("C", 1), ("H", 2), ("Ph", 1)], flippable: false },
    BuiltinGroup { symbol: "Ac", components: &[("C", 1), ("O", 1), ("Me", 1)], flippable: false },
    BuiltinGroup { symbol: "OMe", components: &[("O", 1), ("Me", 1)], flippable: true },
    BuiltinGroup { symbol: "OAc", components: &[("O", 1), ("Ac", 1)], flippable: true },
    BuiltinGroup { symbol: "CF3", components: &[("C", 1), ("F", 3)], flippable: true },
    BuiltinGroup { symbol: "CO2H", components: &[("C", 1), ("O", 2), ("H", 1)], flippable: true },
    BuiltinGroup { symbol: "CO2Me", components: &[("C", 1), ("O", 2), ("Me", 1)], flippable: true },
    BuiltinGroup { symbol: "NO2", components: &[("N", 1), ("O", 2)], flippable: true },
    BuiltinGroup { symbol: "CN", components: &[("C", 1), ("N", 1)], flippable: true },
    BuiltinGroup { symbol: "SO3H", components: &[("S", 1), ("O", 3), ("H", 1)], flippable: true },
];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupFile {
    #[serde(default, rename = "group")]
    groups: Vec<GroupDefinition>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct GroupDefinition {
    symbol: String,
    components: Vec<ComponentDefinition>,
    #[serde(default)]
    flippable: bool,
    #[serde(default = "default_show_as_symbol")]
    show_as_symbol: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComponentDefinition {
    symbol: String,
    #[serde(default = "default_count")]
    count: u32,
}

fn default_show_as_symbol() -> bool {
    true
}

fn default_count() -> u32 {
    1
}

/// Immutable lookup of every element and functional group an atom may carry.
///
/// Construction is a one-time cost: [`ElementRegistry::builtin`] interns the whole
/// element table plus the built-in groups. Additional groups are layered on with
/// [`ElementRegistry::with_groups_from_toml`] before the registry is shared (usually
/// behind an `Arc`) with the models that need it.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    entries: HashMap<String, ElementLike>,
    group_order: Vec<String>,
}

impl ElementRegistry {
    pub fn builtin() -> Self {
        let mut registry = Self::default();

        let mut symbols: Vec<(&'static str, u8)> = ELEMENTS
            .entries()
            .map(|(symbol, data)| (*symbol, data.atomic_number))
            .collect();
        symbols.sort_by_key(|&(_, number)| number);
        for (symbol, _) in symbols {
            if let Some(data) = ELEMENTS.get(symbol) {
                registry.entries.insert(
                    symbol.to_string(),
                    ElementLike::Element(Arc::new(Element::from_data(symbol, data))),
                );
            }
        }

        for builtin in BUILTIN_GROUPS {
            let components: Option<Vec<GroupComponent>> = builtin
                .components
                .iter()
                .map(|&(symbol, count)| {
                    registry.get(symbol).map(|member| GroupComponent { member, count })
                })
                .collect();
            let Some(components) = components else {
                debug_assert!(false, "built-in group {} references an unknown symbol", builtin.symbol);
                continue;
            };
            registry.insert_group(FunctionalGroup {
                symbol: builtin.symbol.to_string(),
                components,
                flippable: builtin.flippable,
                show_as_symbol: true,
            });
        }

        registry
    }

    /// Adds the `[[group]]` tables of a TOML document to the registry.
    ///
    /// Components are resolved in document order, so a group may use elements,
    /// built-in groups, and groups defined earlier in the same document.
    pub fn with_groups_from_toml(mut self, content: &str) -> Result<Self, RegistryError> {
        let file: GroupFile = toml::from_str(content)?;
        for definition in file.groups {
            if self.entries.contains_key(&definition.symbol) {
                return Err(RegistryError::DuplicateSymbol(definition.symbol));
            }
            let mut components = Vec::with_capacity(definition.components.len());
            for component in definition.components {
                let member = self.get(&component.symbol).ok_or_else(|| RegistryError::UnknownSymbol {
                    group: definition.symbol.clone(),
                    symbol: component.symbol.clone(),
                })?;
                components.push(GroupComponent {
                    member,
                    count: component.count,
                });
            }
            self.insert_group(FunctionalGroup {
                symbol: definition.symbol,
                components,
                flippable: definition.flippable,
                show_as_symbol: definition.show_as_symbol,
            });
        }
        Ok(self)
    }

    pub fn load_groups(self, path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|e| RegistryError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        self.with_groups_from_toml(&content)
    }

    pub fn get(&self, symbol: &str) -> Option<ElementLike> {
        self.entries.get(symbol).cloned()
    }

    pub fn element(&self, symbol: &str) -> Option<Arc<Element>> {
        match self.entries.get(symbol)? {
            ElementLike::Element(e) => Some(Arc::clone(e)),
            ElementLike::FunctionalGroup(_) => None,
        }
    }

    pub fn functional_group(&self, symbol: &str) -> Option<Arc<FunctionalGroup>> {
        match self.entries.get(symbol)? {
            ElementLike::Element(_) => None,
            ElementLike::FunctionalGroup(g) => Some(Arc::clone(g)),
        }
    }

    /// Functional groups in registration order.
    pub fn functional_groups(&self) -> impl Iterator<Item = Arc<FunctionalGroup>> + '_ {
        self.group_order
            .iter()
            .filter_map(|symbol| self.functional_group(symbol))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert_group(&mut self, group: FunctionalGroup) {
        self.group_order.push(group.symbol.clone());
        self.entries
            .insert(group.symbol.clone(), ElementLike::FunctionalGroup(Arc::new(group)));
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Functional group '{group}' references unknown symbol '{symbol}'")]
    UnknownSymbol { group: String, symbol: String },
    #[error("Symbol '{0}' is already registered")]
    DuplicateSymbol(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_contains_elements_and_groups() {
        let registry = ElementRegistry::builtin();
        assert_eq!(registry.element("C").unwrap().atomic_number, 6);
        assert_eq!(registry.element("Br").unwrap().atomic_number, 35);
        assert!(registry.functional_group("Ph").is_some());
        assert!(registry.element("Ph").is_none());
        assert!(registry.functional_group("C").is_none());
        assert!(registry.get("Xx").is_none());
    }

    #[test]
    fn builtin_group_weights_match_their_formulas() {
        let registry = ElementRegistry::builtin();
        let weight = |s: &str| registry.element(s).unwrap().atomic_weight;

        let me = registry.functional_group("Me").unwrap();
        assert!((me.atomic_weight() - (weight("C") + 3.0 * weight("H"))).abs() < 1e-9);

        let tbu = registry.functional_group("tBu").unwrap();
        assert!((tbu.atomic_weight() - (4.0 * weight("C") + 9.0 * weight("H"))).abs() < 1e-9);

        let bn = registry.functional_group("Bn").unwrap();
        assert!((bn.atomic_weight() - (7.0 * weight("C") + 7.0 * weight("H"))).abs() < 1e-9);
    }

    #[test]
    fn functional_groups_iterate_in_registration_order() {
        let registry = ElementRegistry::builtin();
        let symbols: Vec<String> = registry
            .functional_groups()
            .map(|g| g.symbol.clone())
            .collect();
        assert_eq!(symbols.first().map(String::as_str), Some("Me"));
        assert_eq!(symbols.len(), BUILTIN_GROUPS.len());
    }

    #[test]
    fn toml_groups_resolve_against_earlier_symbols() {
        let toml = r#"
            [[group]]
            symbol = "TMS"
            components = [{ symbol = "Si" }, { symbol = "Me", count = 3 }]

            [[group]]
            symbol = "OTMS"
            flippable = true
            components = [{ symbol = "O" }, { symbol = "TMS" }]
        "#;
        let registry = ElementRegistry::builtin().with_groups_from_toml(toml).unwrap();
        let otms = registry.functional_group("OTMS").unwrap();
        assert!(otms.flippable);
        assert!(otms.show_as_symbol);
        assert_eq!(otms.components.len(), 2);
        assert_eq!(otms.components[1].member.symbol(), "TMS");
    }

    #[test]
    fn toml_group_with_unknown_component_is_rejected() {
        let toml = r#"
            [[group]]
            symbol = "Bad"
            components = [{ symbol = "Qq" }]
        "#;
        let err = ElementRegistry::builtin().with_groups_from_toml(toml).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownSymbol { ref symbol, .. } if symbol == "Qq"));
    }

    #[test]
    fn toml_group_shadowing_existing_symbol_is_rejected() {
        let toml = r#"
            [[group]]
            symbol = "Ph"
            components = [{ symbol = "C", count = 6 }]
        "#;
        let err = ElementRegistry::builtin().with_groups_from_toml(toml).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateSymbol(ref s) if s == "Ph"));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = ElementRegistry::builtin()
            .with_groups_from_toml("[[group]]\nsymbol = 3")
            .unwrap_err();
        assert!(matches!(err, RegistryError::Toml(_)));
    }

    #[test]
    fn load_groups_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[group]]\nsymbol = \"Boc\"\ncomponents = [{{ symbol = \"C\" }}, {{ symbol = \"O\", count = 2 }}, {{ symbol = \"tBu\" }}]"
        )
        .unwrap();
        let registry = ElementRegistry::builtin().load_groups(file.path()).unwrap();
        assert!(registry.functional_group("Boc").is_some());
    }

    #[test]
    fn load_groups_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ElementRegistry::builtin()
            .load_groups(&dir.path().join("missing.toml"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }
}
