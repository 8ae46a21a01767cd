//! Java Class Relationships
//!
//! Regex pass over every `.java` file that collects inheritance, fields,
//! method signatures and associations (field or parameter types naming
//! another known class), rendered as a Mermaid `classDiagram`.
//!
//! Fields and methods found in a file belong to the last class declared in
//! that file; nested and secondary classes share their members.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::parser::{Language, read_source};
use super::scanner::RepositoryScanner;
use crate::types::Result;

static CLASS_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class\s+(\w+)").expect("class name regex"));
static CLASS_DECL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+(\w+)(?:\s+extends\s+(\w+))?(?:\s+implements\s+([\w, ]+))?")
        .expect("class declaration regex")
});
static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:public|private|protected)?\s*([\w<>\[\]]+)\s+(\w+)\s*;").expect("field regex")
});
static METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:public|private|protected)?\s*([\w<>\[\]]+)\s+(\w+)\s*\(([^)]*)\)")
        .expect("method regex")
});

/// Statement keywords the field and method patterns would otherwise read as types
const STATEMENT_KEYWORDS: &[&str] = &[
    "return", "throw", "new", "else", "case", "package", "import", "goto", "break", "continue",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassRelations {
    /// Superclass and implemented interfaces
    pub parents: Vec<String>,
    /// Other known classes used as field or parameter types
    pub associations: Vec<String>,
    /// `Type name`
    pub attributes: Vec<String>,
    /// `ReturnType name(params)`
    pub methods: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassRelationships {
    pub classes: BTreeMap<String, ClassRelations>,
}

impl ClassRelationships {
    /// Build from in-memory `(path, content)` pairs.
    pub fn from_sources<'a>(sources: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let sources: Vec<(&str, &str)> = sources.into_iter().collect();

        let known: BTreeSet<&str> = sources
            .iter()
            .flat_map(|(_, content)| CLASS_NAME_RE.captures_iter(content))
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect();

        let mut relationships = Self::default();
        for (path, content) in &sources {
            relationships.add_file(path, content, &known);
        }
        relationships.dedup();
        relationships
    }

    fn add_file(&mut self, path: &str, content: &str, known: &BTreeSet<&str>) {
        let mut current: Option<String> = None;

        for caps in CLASS_DECL_RE.captures_iter(content) {
            let name = caps[1].to_string();
            let entry = self.classes.entry(name.clone()).or_default();
            if let Some(parent) = caps.get(2) {
                entry.parents.push(parent.as_str().to_string());
            }
            if let Some(interfaces) = caps.get(3) {
                entry.parents.extend(
                    interfaces
                        .as_str()
                        .split(',')
                        .map(str::trim)
                        .filter(|i| !i.is_empty())
                        .map(String::from),
                );
            }
            current = Some(name);
        }

        let Some(owner) = current else {
            tracing::debug!("{}: no class declaration", path);
            return;
        };
        let Some(class) = self.classes.get_mut(&owner) else {
            return;
        };

        for caps in FIELD_RE.captures_iter(content) {
            let (ty, name) = (&caps[1], &caps[2]);
            if STATEMENT_KEYWORDS.contains(&ty) {
                continue;
            }
            class.attributes.push(format!("{} {}", ty, name));
            if ty != owner && known.contains(ty) {
                class.associations.push(ty.to_string());
            }
        }

        for caps in METHOD_RE.captures_iter(content) {
            let (ret, name, params) = (&caps[1], &caps[2], &caps[3]);
            if STATEMENT_KEYWORDS.contains(&ret) {
                continue;
            }

            let params: Vec<&str> = params
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
            class
                .methods
                .push(format!("{} {}({})", ret, name, params.join(", ")));

            for ty in params.iter().filter_map(|p| p.split_whitespace().next()) {
                if ty != owner && known.contains(ty) {
                    class.associations.push(ty.to_string());
                }
            }
        }
    }

    fn dedup(&mut self) {
        fn dedup_in_order(items: &mut Vec<String>) {
            let mut seen = BTreeSet::new();
            items.retain(|item| seen.insert(item.clone()));
        }

        for class in self.classes.values_mut() {
            dedup_in_order(&mut class.parents);
            dedup_in_order(&mut class.associations);
            dedup_in_order(&mut class.attributes);
            dedup_in_order(&mut class.methods);
        }
    }

    /// Render as a Mermaid class diagram (without code fences).
    ///
    /// Java generics are written with Mermaid's `~` syntax.
    pub fn to_mermaid(&self) -> String {
        let mut lines = vec!["classDiagram".to_string()];

        for (name, class) in &self.classes {
            for parent in &class.parents {
                lines.push(format!("{} <|-- {}", parent, name));
            }
            for target in &class.associations {
                lines.push(format!("{} --> {}", name, target));
            }
            lines.push(format!("class {} {{", name));
            for member in class.attributes.iter().chain(&class.methods) {
                lines.push(format!("  {}", mermaid_generics(member)));
            }
            lines.push("}".to_string());
        }

        lines.join("\n")
    }
}

fn mermaid_generics(member: &str) -> String {
    member.replace(['<', '>'], "~")
}

impl RepositoryScanner {
    /// Collect relationships across all Java files under `root`.
    ///
    /// Unreadable files are logged and skipped.
    pub fn extract_class_relationships(&self, root: &Path) -> Result<ClassRelationships> {
        let files = self.code_files_for_analysis(root, &[Language::Java])?;

        let sources: Vec<(PathBuf, String)> = files
            .into_iter()
            .filter_map(|file| match read_source(&file.full_path) {
                Ok(content) => Some((file.full_path, content)),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", file.path, e);
                    None
                }
            })
            .collect();

        let paths: Vec<String> = sources
            .iter()
            .map(|(p, _)| p.to_string_lossy().to_string())
            .collect();
        let relationships = ClassRelationships::from_sources(
            paths
                .iter()
                .zip(&sources)
                .map(|(path, (_, content))| (path.as_str(), content.as_str())),
        );

        tracing::debug!("{} classes in relationship graph", relationships.classes.len());
        Ok(relationships)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const USER: &str = r#"public class User extends Entity implements Serializable, Comparable {
    private String name;
    private Address address;

    public String getName() {
        return name;
    }
}"#;

    const ADDRESS: &str = r#"public class Address {
    private String city;
}"#;

    const SERVICE: &str = r#"public class UserService {
    private UserRepository repo;

    public User find(String id, Address hint) {
        User result = repo.load(id);
        return result;
    }
}"#;

    fn relationships() -> ClassRelationships {
        ClassRelationships::from_sources([
            ("User.java", USER),
            ("Address.java", ADDRESS),
            ("UserService.java", SERVICE),
        ])
    }

    #[test]
    fn test_parents_and_attributes() {
        let rel = relationships();
        let user = &rel.classes["User"];

        assert_eq!(user.parents, vec!["Entity", "Serializable", "Comparable"]);
        assert_eq!(user.attributes, vec!["String name", "Address address"]);
        assert_eq!(user.associations, vec!["Address"]);
        assert_eq!(user.methods, vec!["String getName()"]);
    }

    #[test]
    fn test_parameter_associations_and_keywords() {
        let rel = relationships();
        let service = &rel.classes["UserService"];

        // UserRepository is not a known class, so it is not an association
        assert_eq!(service.associations, vec!["Address"]);
        // Initialized locals are not fields
        assert_eq!(service.attributes, vec!["UserRepository repo"]);
        assert!(!service.attributes.iter().any(|a| a.starts_with("return")));
        assert!(service.methods.contains(&"User find(String id, Address hint)".to_string()));
    }

    #[test]
    fn test_mermaid_output() {
        let rel = ClassRelationships::from_sources([
            ("A.java", "class Base {}\n"),
            (
                "B.java",
                "class Child extends Base {\n  private List<Base> items;\n}\n",
            ),
        ]);

        assert_eq!(
            rel.to_mermaid(),
            "classDiagram\nclass Base {\n}\nBase <|-- Child\nclass Child {\n  List~Base~ items\n}"
        );
    }

    #[test]
    fn test_file_without_class_is_ignored() {
        let rel = ClassRelationships::from_sources([("Api.java", "interface Api { void f(); }")]);
        assert!(rel.classes.is_empty());
        assert_eq!(rel.to_mermaid(), "classDiagram");
    }

    #[test]
    fn test_extract_from_repository() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/User.java"), USER).unwrap();
        std::fs::write(dir.path().join("src/Address.java"), ADDRESS).unwrap();
        std::fs::write(dir.path().join("src/notes.py"), "class NotJava: pass\n").unwrap();

        let rel = RepositoryScanner::new()
            .extract_class_relationships(dir.path())
            .unwrap();
        let names: Vec<&str> = rel.classes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Address", "User"]);
    }
}
