//! Packaging ecosystem and framework inference from manifest files.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::types::{Result, SiftError};

static POM_DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<dependency>(.*?)</dependency>").expect("pom dependency regex")
});
static POM_ARTIFACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<artifactId>\s*([^<\s]+)\s*</artifactId>").expect("pom artifact regex")
});
static POM_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<version>\s*([^<\s]+)\s*</version>").expect("pom version regex")
});
static GRADLE_DEPENDENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^\s*(?:implementation|api|compileOnly|runtimeOnly|testImplementation|annotationProcessor)\s*\(?\s*['"]([^'"]+)['"]"#,
    )
    .expect("gradle dependency regex")
});
static SETUP_REQUIRES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)install_requires\s*=\s*\[(.*?)\]").expect("setup.py requires regex")
});
static QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']([^"']+)["']"#).expect("quoted string regex"));

// (dependency substring, framework label); the first matching row wins per dependency
const JS_FRAMEWORKS: &[(&str, &str)] = &[
    ("react", "React"),
    ("vue", "Vue.js"),
    ("angular", "Angular"),
    ("express", "Express.js"),
    ("next", "Next.js"),
    ("nuxt", "Nuxt.js"),
    ("svelte", "Svelte"),
];
const PYTHON_FRAMEWORKS: &[(&str, &str)] = &[
    ("django", "Django"),
    ("flask", "Flask"),
    ("fastapi", "FastAPI"),
    ("tornado", "Tornado"),
    ("pyramid", "Pyramid"),
    ("bottle", "Bottle"),
];
const JAVA_FRAMEWORKS: &[(&str, &str)] = &[
    ("spring-boot", "Spring Boot"),
    ("spring", "Spring"),
    ("hibernate", "Hibernate"),
    ("quarkus", "Quarkus"),
    ("micronaut", "Micronaut"),
    ("jakarta", "Jakarta EE"),
];
const RUST_FRAMEWORKS: &[(&str, &str)] = &[
    ("actix-web", "Actix Web"),
    ("axum", "Axum"),
    ("rocket", "Rocket"),
    ("warp", "Warp"),
    ("tonic", "Tonic"),
    ("tokio", "Tokio"),
];
const GO_FRAMEWORKS: &[(&str, &str)] = &[
    ("gin-gonic/gin", "Gin"),
    ("labstack/echo", "Echo"),
    ("gofiber/fiber", "Fiber"),
    ("gorilla/mux", "Gorilla Mux"),
    ("go-chi/chi", "Chi"),
];

/// Project kind, decided by the first manifest found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    MavenJava,
    GradleJava,
    NodeJs,
    Python,
    Rust,
    Go,
    #[default]
    Unknown,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MavenJava => "maven_java",
            Self::GradleJava => "gradle_java",
            Self::NodeJs => "node_js",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Unknown => "unknown",
        }
    }

    /// Last `_`-separated segment of the project type (`maven_java` -> `java`)
    pub fn main_language(&self) -> &'static str {
        let key = self.as_str();
        key.rsplit('_').next().unwrap_or(key)
    }
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Manifest {
    Pom,
    Gradle,
    PackageJson,
    Requirements,
    SetupPy,
    Cargo,
    GoMod,
}

/// Manifest files in priority order
const MANIFESTS: &[(&str, Manifest, ProjectType)] = &[
    ("pom.xml", Manifest::Pom, ProjectType::MavenJava),
    ("build.gradle", Manifest::Gradle, ProjectType::GradleJava),
    ("package.json", Manifest::PackageJson, ProjectType::NodeJs),
    ("requirements.txt", Manifest::Requirements, ProjectType::Python),
    ("setup.py", Manifest::SetupPy, ProjectType::Python),
    ("Cargo.toml", Manifest::Cargo, ProjectType::Rust),
    ("go.mod", Manifest::GoMod, ProjectType::Go),
];

/// Inferred packaging ecosystem of a repository
#[derive(Debug, Clone, Serialize)]
pub struct PackageStructure {
    pub project_type: ProjectType,
    pub main_language: String,
    /// Manifest the facts were read from, relative to the root
    pub manifest: Option<String>,
    pub frameworks: Vec<String>,
    /// Declared dependency name -> version requirement (may be empty)
    pub dependencies: BTreeMap<String, String>,
}

impl Default for PackageStructure {
    fn default() -> Self {
        Self {
            project_type: ProjectType::Unknown,
            main_language: ProjectType::Unknown.main_language().to_string(),
            manifest: None,
            frameworks: Vec::new(),
            dependencies: BTreeMap::new(),
        }
    }
}

impl PackageStructure {
    /// Inspect the manifests directly under `root`.
    ///
    /// Only the first manifest present is consulted. An unreadable or
    /// malformed manifest still sets the project type, with no dependencies.
    pub fn detect(root: &Path) -> Self {
        let Some((file, manifest, project_type)) = MANIFESTS
            .iter()
            .find(|(file, _, _)| root.join(file).is_file())
        else {
            return Self::default();
        };

        let mut structure = Self {
            project_type: *project_type,
            main_language: project_type.main_language().to_string(),
            manifest: Some(file.to_string()),
            ..Self::default()
        };

        let path = root.join(file);
        match std::fs::read_to_string(&path)
            .map_err(SiftError::from)
            .and_then(|content| parse_manifest(*manifest, &content))
        {
            Ok((dependencies, frameworks)) => {
                structure.dependencies = dependencies;
                structure.frameworks = frameworks;
            }
            Err(e) => tracing::warn!("Failed to read manifest {}: {}", path.display(), e),
        }

        tracing::debug!(
            "Ecosystem: {} via {} ({} dependencies)",
            structure.project_type,
            file,
            structure.dependencies.len()
        );
        structure
    }
}

type ManifestFacts = (BTreeMap<String, String>, Vec<String>);

fn parse_manifest(manifest: Manifest, content: &str) -> Result<ManifestFacts> {
    match manifest {
        Manifest::PackageJson => parse_package_json(content),
        Manifest::Requirements => Ok(parse_requirements(content)),
        Manifest::SetupPy => Ok(parse_setup_py(content)),
        Manifest::Pom => Ok(parse_pom(content)),
        Manifest::Gradle => Ok(parse_gradle(content)),
        Manifest::Cargo => parse_cargo(content),
        Manifest::GoMod => Ok(parse_go_mod(content)),
    }
}

fn parse_package_json(content: &str) -> Result<ManifestFacts> {
    let package: serde_json::Value = serde_json::from_str(content)?;
    let section = |key: &str| -> Vec<(String, String)> {
        package
            .get(key)
            .and_then(|v| v.as_object())
            .map(|deps| {
                deps.iter()
                    .map(|(name, version)| {
                        let version = version
                            .as_str()
                            .map(String::from)
                            .unwrap_or_else(|| version.to_string());
                        (name.clone(), version)
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    let runtime = section("dependencies");
    let dev = section("devDependencies");

    let frameworks = detect_frameworks(
        runtime.iter().chain(dev.iter()).map(|(name, _)| name.as_str()),
        JS_FRAMEWORKS,
    );
    Ok((runtime.into_iter().collect(), frameworks))
}

fn parse_requirements(content: &str) -> ManifestFacts {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('-'))
        .collect();

    let dependencies = lines.iter().map(|l| split_requirement(l)).collect();
    let frameworks = detect_frameworks(lines.iter().copied(), PYTHON_FRAMEWORKS);
    (dependencies, frameworks)
}

fn parse_setup_py(content: &str) -> ManifestFacts {
    let requirements: Vec<String> = SETUP_REQUIRES_RE
        .captures(content)
        .map(|caps| {
            QUOTED_RE
                .captures_iter(&caps[1])
                .map(|q| q[1].trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let dependencies = requirements.iter().map(|r| split_requirement(r)).collect();
    let frameworks = detect_frameworks(requirements.iter().map(String::as_str), PYTHON_FRAMEWORKS);
    (dependencies, frameworks)
}

/// `flask==2.0` -> (`flask`, `==2.0`)
fn split_requirement(requirement: &str) -> (String, String) {
    match requirement.find(|c: char| "=<>!~;[ ".contains(c)) {
        Some(idx) => (
            requirement[..idx].trim().to_string(),
            requirement[idx..].trim().to_string(),
        ),
        None => (requirement.to_string(), String::new()),
    }
}

fn parse_pom(content: &str) -> ManifestFacts {
    let dependencies: BTreeMap<String, String> = POM_DEPENDENCY_RE
        .captures_iter(content)
        .filter_map(|block| {
            let body = &block[1];
            let artifact = POM_ARTIFACT_RE.captures(body)?[1].to_string();
            let version = POM_VERSION_RE
                .captures(body)
                .map(|v| v[1].to_string())
                .unwrap_or_default();
            Some((artifact, version))
        })
        .collect();

    let frameworks = detect_frameworks(dependencies.keys().map(String::as_str), JAVA_FRAMEWORKS);
    (dependencies, frameworks)
}

fn parse_gradle(content: &str) -> ManifestFacts {
    let coordinates: Vec<&str> = GRADLE_DEPENDENCY_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect();

    let dependencies = coordinates
        .iter()
        .map(|coord| {
            // group:artifact:version
            let mut parts = coord.rsplitn(2, ':');
            let last = parts.next().unwrap_or_default();
            match parts.next() {
                Some(name) if name.contains(':') => (name.to_string(), last.to_string()),
                _ => (coord.to_string(), String::new()),
            }
        })
        .collect();

    let frameworks = detect_frameworks(coordinates.iter().copied(), JAVA_FRAMEWORKS);
    (dependencies, frameworks)
}

fn parse_cargo(content: &str) -> Result<ManifestFacts> {
    let manifest: toml::Table = toml::from_str(content).map_err(|e| SiftError::Parse {
        message: e.to_string(),
        path: "Cargo.toml".to_string(),
    })?;

    let dependencies: BTreeMap<String, String> = manifest
        .get("dependencies")
        .and_then(|d| d.as_table())
        .map(|deps| {
            deps.iter()
                .map(|(name, spec)| {
                    let version = match spec {
                        toml::Value::String(v) => v.clone(),
                        toml::Value::Table(t) => t
                            .get("version")
                            .and_then(|v| v.as_str())
                            .unwrap_or_default()
                            .to_string(),
                        _ => String::new(),
                    };
                    (name.clone(), version)
                })
                .collect()
        })
        .unwrap_or_default();

    let frameworks = detect_frameworks(dependencies.keys().map(String::as_str), RUST_FRAMEWORKS);
    Ok((dependencies, frameworks))
}

fn parse_go_mod(content: &str) -> ManifestFacts {
    let mut dependencies = BTreeMap::new();
    let mut in_block = false;

    for line in content.lines().map(str::trim) {
        let entry = if in_block {
            if line.starts_with(')') {
                in_block = false;
                continue;
            }
            line
        } else if line.starts_with("require (") || line == "require(" {
            in_block = true;
            continue;
        } else if let Some(rest) = line.strip_prefix("require ") {
            rest
        } else {
            continue;
        };

        let entry = entry.split("//").next().unwrap_or_default();
        let mut parts = entry.split_whitespace();
        if let Some(module) = parts.next() {
            let version = parts.next().unwrap_or_default();
            dependencies.insert(module.to_string(), version.to_string());
        }
    }

    let frameworks = detect_frameworks(dependencies.keys().map(String::as_str), GO_FRAMEWORKS);
    (dependencies, frameworks)
}

/// Map dependency names onto framework labels, deduplicated in first-seen order
fn detect_frameworks<'a>(
    dependencies: impl Iterator<Item = &'a str>,
    table: &[(&str, &str)],
) -> Vec<String> {
    let mut frameworks: Vec<String> = Vec::new();

    for dep in dependencies {
        let dep = dep.to_lowercase();
        if let Some((_, label)) = table.iter().find(|(needle, _)| dep.contains(needle))
            && !frameworks.iter().any(|f| f == label)
        {
            frameworks.push(label.to_string());
        }
    }

    frameworks
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn detect(files: &[(&str, &str)]) -> PackageStructure {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            std::fs::write(dir.path().join(name), content).unwrap();
        }
        PackageStructure::detect(dir.path())
    }

    #[test]
    fn test_no_manifest() {
        let structure = detect(&[]);
        assert_eq!(structure.project_type, ProjectType::Unknown);
        assert_eq!(structure.main_language, "unknown");
        assert!(structure.manifest.is_none());
        assert!(structure.frameworks.is_empty());
    }

    #[test]
    fn test_package_json() {
        let structure = detect(&[(
            "package.json",
            r#"{
                "dependencies": {"react": "^18.0.0", "react-dom": "^18.0.0", "express": "4"},
                "devDependencies": {"vite": "5", "@sveltejs/kit": "1"}
            }"#,
        )]);

        assert_eq!(structure.project_type, ProjectType::NodeJs);
        assert_eq!(structure.main_language, "js");
        // Dependency names are visited in sorted order, runtime before dev
        assert_eq!(structure.frameworks, vec!["Express.js", "React", "Svelte"]);
        // Only runtime dependencies are recorded
        assert_eq!(structure.dependencies.len(), 3);
        assert_eq!(structure.dependencies["react"], "^18.0.0");
    }

    #[test]
    fn test_manifest_priority() {
        let structure = detect(&[
            ("requirements.txt", "django==4.2\n"),
            ("pom.xml", "<project></project>"),
        ]);
        assert_eq!(structure.project_type, ProjectType::MavenJava);
        assert_eq!(structure.main_language, "java");
        assert!(structure.dependencies.is_empty());
    }

    #[test]
    fn test_requirements() {
        let structure = detect(&[(
            "requirements.txt",
            "# web\nFlask==2.3.0\nfastapi>=0.100\n\nrequests\n-r dev.txt\n",
        )]);

        assert_eq!(structure.project_type, ProjectType::Python);
        assert_eq!(structure.frameworks, vec!["Flask", "FastAPI"]);
        assert_eq!(structure.dependencies["Flask"], "==2.3.0");
        assert_eq!(structure.dependencies["requests"], "");
        assert_eq!(structure.dependencies.len(), 3);
    }

    #[test]
    fn test_malformed_manifest_keeps_type() {
        let structure = detect(&[("package.json", "{ not json")]);
        assert_eq!(structure.project_type, ProjectType::NodeJs);
        assert!(structure.dependencies.is_empty());
    }

    #[test]
    fn test_pom_dependencies() {
        let pom = r#"<project>
  <artifactId>demo</artifactId>
  <dependencies>
    <dependency>
      <groupId>org.springframework.boot</groupId>
      <artifactId>spring-boot-starter-web</artifactId>
    </dependency>
    <dependency>
      <groupId>org.hibernate</groupId>
      <artifactId>hibernate-core</artifactId>
      <version>6.2.0</version>
    </dependency>
  </dependencies>
</project>"#;
        let structure = detect(&[("pom.xml", pom)]);

        assert_eq!(structure.dependencies.len(), 2);
        assert_eq!(structure.dependencies["hibernate-core"], "6.2.0");
        assert_eq!(structure.frameworks, vec!["Hibernate", "Spring Boot"]);
    }

    #[test]
    fn test_gradle_dependencies() {
        let gradle = "dependencies {\n    implementation 'org.springframework:spring-core:6.0.0'\n    testImplementation(\"junit:junit:4.13\")\n}\n";
        let structure = detect(&[("build.gradle", gradle)]);

        assert_eq!(structure.project_type, ProjectType::GradleJava);
        assert_eq!(
            structure.dependencies["org.springframework:spring-core"],
            "6.0.0"
        );
        assert_eq!(structure.frameworks, vec!["Spring"]);
    }

    #[test]
    fn test_cargo_and_go() {
        let cargo = "[package]\nname = \"x\"\n\n[dependencies]\naxum = \"0.7\"\ntokio = { version = \"1\", features = [\"full\"] }\n";
        let structure = detect(&[("Cargo.toml", cargo)]);
        assert_eq!(structure.project_type, ProjectType::Rust);
        assert_eq!(structure.dependencies["tokio"], "1");
        assert_eq!(structure.frameworks, vec!["Axum", "Tokio"]);

        let go_mod = "module example.com/app\n\nrequire (\n\tgithub.com/gin-gonic/gin v1.9.1\n\tgolang.org/x/text v0.14.0 // indirect\n)\n";
        let structure = detect(&[("go.mod", go_mod)]);
        assert_eq!(structure.main_language, "go");
        assert_eq!(structure.dependencies["github.com/gin-gonic/gin"], "v1.9.1");
        assert_eq!(structure.frameworks, vec!["Gin"]);
    }

    #[test]
    fn test_setup_py() {
        let setup = "setup(\n    name='svc',\n    install_requires=[\n        'tornado>=6',\n        \"click\",\n    ],\n)\n";
        let structure = detect(&[("setup.py", setup)]);
        assert_eq!(structure.dependencies["tornado"], ">=6");
        assert_eq!(structure.frameworks, vec!["Tornado"]);
    }
}
