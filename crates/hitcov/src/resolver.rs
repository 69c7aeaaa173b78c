//! Script identifier resolution.
//!
//! Script identifiers come in two shapes: bare absolute paths (or `file://`
//! URIs) and scheme-qualified package references such as
//! `package:app/src/main.dart`. Package references are resolved through a
//! package table mapping package names to root directories.
//!
//! The table is loaded once per report run, either from a
//! `package_config.json` document:
//!
//! ```text
//! {
//!   "configVersion": 2,
//!   "packages": [
//!     { "name": "app", "rootUri": "../", "packageUri": "lib/" }
//!   ]
//! }
//! ```
//!
//! or from a legacy `.packages` file with one `name:uri` entry per line.
//!
//! Identifiers and package roots are URIs, so percent-escapes are decoded
//! when they are turned into paths (`file:///my%20app/a.dart` names
//! `/my app/a.dart`).

use crate::paths::{absolutize, normalize};
use crate::result::{HitcovError, HitcovResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Parsed form of a script identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptRef {
    /// Identifier already names a filesystem path
    Absolute(PathBuf),
    /// Identifier is relative to a package root
    Package {
        /// Lookup token in the package table
        name: String,
        /// Path below the package root
        tail: String,
    },
}

impl ScriptRef {
    /// Parse a script identifier, `None` if it has no resolvable shape
    #[must_use]
    pub fn parse(script_id: &str) -> Option<Self> {
        if script_id.starts_with("file:") {
            let path = Url::parse(script_id).ok()?.to_file_path().ok()?;
            return Some(Self::Absolute(path));
        }
        if Path::new(script_id).is_absolute() {
            return Some(Self::Absolute(PathBuf::from(script_id)));
        }
        if let Some(rest) = script_id.strip_prefix("package:") {
            let (name, tail) = rest.split_once('/')?;
            if name.is_empty() {
                return None;
            }
            return Some(Self::Package {
                name: name.to_string(),
                tail: tail.to_string(),
            });
        }
        let (scheme, tail) = script_id.split_once(':')?;
        if scheme.is_empty() || scheme.contains('/') {
            return None;
        }
        Some(Self::Package {
            name: scheme.to_string(),
            tail: tail.trim_start_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PackageConfigDocument {
    packages: Vec<PackageConfigEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageConfigEntry {
    name: String,
    root_uri: String,
    #[serde(default)]
    package_uri: Option<String>,
}

/// Maps script identifiers to absolute file paths
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    packages: BTreeMap<String, PathBuf>,
}

impl Resolver {
    /// Create a resolver with an empty package table
    ///
    /// Only absolute identifiers resolve.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver from `(name, root)` pairs
    ///
    /// Relative roots are taken against the current directory.
    #[must_use]
    pub fn from_packages<I, N, P>(packages: I) -> Self
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: Into<PathBuf>,
    {
        Self {
            packages: packages
                .into_iter()
                .map(|(name, root)| (name.into(), absolute_root(&root.into())))
                .collect(),
        }
    }

    /// Add a package root, relative roots are taken against the current directory
    #[must_use]
    pub fn with_package(mut self, name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        let _ = self.packages.insert(name.into(), absolute_root(&root.into()));
        self
    }

    /// Load the package table from a `package_config.json` or `.packages` file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: &Path) -> HitcovResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HitcovError::package_config(path, e.to_string()))?;

        let cwd = std::env::current_dir()?;
        let config_url = Url::from_file_path(absolutize(path, &cwd))
            .map_err(|()| HitcovError::package_config(path, "not a file path"))?;

        let resolver = if content.trim_start().starts_with('{') {
            Self::parse_package_config(&content, &config_url)
        } else {
            Self::parse_dot_packages(&content, &config_url)
        }
        .map_err(|message| HitcovError::package_config(path, message))?;
        debug!(
            packages = resolver.packages.len(),
            path = %path.display(),
            "loaded package table"
        );
        Ok(resolver)
    }

    fn parse_package_config(content: &str, config_url: &Url) -> Result<Self, String> {
        let document: PackageConfigDocument =
            serde_json::from_str(content).map_err(|e| e.to_string())?;

        let mut packages = BTreeMap::new();
        for entry in document.packages {
            let root = join_directory(config_url, &entry.root_uri)?;
            let root = match entry.package_uri.as_deref() {
                Some(package_uri) => join_directory(&root, package_uri)?,
                None => root,
            };
            let _ = packages.insert(entry.name, url_to_path(&root)?);
        }
        Ok(Self { packages })
    }

    fn parse_dot_packages(content: &str, config_url: &Url) -> Result<Self, String> {
        let mut packages = BTreeMap::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((name, uri)) = line.split_once(':') else {
                return Err(format!("line {}: expected `name:uri`", index + 1));
            };
            if name.is_empty() {
                return Err(format!("line {}: empty package name", index + 1));
            }
            let root = join_directory(config_url, uri)
                .map_err(|message| format!("line {}: {message}", index + 1))?;
            let _ = packages.insert(name.to_string(), url_to_path(&root)?);
        }
        Ok(Self { packages })
    }

    /// Root directory registered for a package
    #[must_use]
    pub fn package_root(&self, name: &str) -> Option<&Path> {
        self.packages.get(name).map(PathBuf::as_path)
    }

    /// Number of packages in the table
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Resolve a script identifier to a normalized absolute path
    ///
    /// # Errors
    ///
    /// Returns [`HitcovError::UnresolvableIdentifier`] when the identifier has
    /// no usable shape or names a package missing from the table.
    pub fn resolve(&self, script_id: &str) -> HitcovResult<PathBuf> {
        match ScriptRef::parse(script_id) {
            Some(ScriptRef::Absolute(path)) => Ok(normalize(&path)),
            Some(ScriptRef::Package { name, tail }) => {
                let path = self
                    .packages
                    .get(&name)
                    .and_then(|root| Url::from_directory_path(root).ok())
                    .and_then(|root| root.join(&tail).ok())
                    .and_then(|url| url.to_file_path().ok())
                    .ok_or_else(|| HitcovError::unresolvable(script_id))?;
                Ok(normalize(&path))
            }
            None => Err(HitcovError::unresolvable(script_id)),
        }
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    absolutize(root, &cwd)
}

/// Resolve `uri` against `base` as a directory URI
fn join_directory(base: &Url, uri: &str) -> Result<Url, String> {
    let mut url = base.join(uri).map_err(|e| format!("{uri}: {e}"))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn url_to_path(url: &Url) -> Result<PathBuf, String> {
    url.to_file_path()
        .map(|path| normalize(&path))
        .map_err(|()| format!("{url} is not a file URI"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_path() {
        assert_eq!(
            ScriptRef::parse("/repo/lib/a.dart"),
            Some(ScriptRef::Absolute(PathBuf::from("/repo/lib/a.dart")))
        );
    }

    #[test]
    fn test_parse_file_uri() {
        assert_eq!(
            ScriptRef::parse("file:///repo/lib/a.dart"),
            Some(ScriptRef::Absolute(PathBuf::from("/repo/lib/a.dart")))
        );
    }

    #[test]
    fn test_parse_file_uri_decodes_escapes() {
        assert_eq!(
            ScriptRef::parse("file:///tmp/My%20Project/a%2Bb.dart"),
            Some(ScriptRef::Absolute(PathBuf::from("/tmp/My Project/a+b.dart")))
        );
    }

    #[test]
    fn test_parse_package_uri() {
        assert_eq!(
            ScriptRef::parse("package:app/src/util.dart"),
            Some(ScriptRef::Package {
                name: "app".to_string(),
                tail: "src/util.dart".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_generic_scheme() {
        assert_eq!(
            ScriptRef::parse("dart:core/list.dart"),
            Some(ScriptRef::Package {
                name: "dart".to_string(),
                tail: "core/list.dart".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_unshaped() {
        assert_eq!(ScriptRef::parse("lib/a.dart"), None);
        assert_eq!(ScriptRef::parse(""), None);
        assert_eq!(ScriptRef::parse("package:noslash"), None);
        assert_eq!(ScriptRef::parse(":tail"), None);
    }

    #[test]
    fn test_resolve_absolute_is_normalized() {
        let resolver = Resolver::new();
        assert_eq!(
            resolver.resolve("/repo/lib/../lib/./a.dart").unwrap(),
            PathBuf::from("/repo/lib/a.dart")
        );
    }

    #[test]
    fn test_resolve_package() {
        let resolver = Resolver::new().with_package("app", "/repo/lib");
        assert_eq!(
            resolver.resolve("package:app/src/util.dart").unwrap(),
            PathBuf::from("/repo/lib/src/util.dart")
        );
    }

    #[test]
    fn test_resolve_file_uri_with_space() {
        let resolver = Resolver::new();
        assert_eq!(
            resolver.resolve("file:///tmp/X/My%20Project/a.dart").unwrap(),
            PathBuf::from("/tmp/X/My Project/a.dart")
        );
    }

    #[test]
    fn test_resolve_package_tail_decodes_escapes() {
        let resolver = Resolver::new().with_package("app", "/repo/my app/lib");
        assert_eq!(
            resolver.resolve("package:app/src/two%20words.dart").unwrap(),
            PathBuf::from("/repo/my app/lib/src/two words.dart")
        );
    }

    #[test]
    fn test_relative_package_root_resolves_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let resolver = Resolver::new().with_package("app", "lib");
        let path = resolver.resolve("package:app/a.dart").unwrap();
        assert!(path.is_absolute());
        assert_eq!(path, normalize(&cwd.join("lib/a.dart")));

        let resolver = Resolver::from_packages([("app", "./lib")]);
        assert!(resolver.package_root("app").unwrap().is_absolute());
    }

    #[test]
    fn test_resolve_unknown_package_fails() {
        let resolver = Resolver::from_packages([("app", "/repo/lib")]);
        let err = resolver.resolve("package:other/a.dart").unwrap_err();
        assert!(matches!(err, HitcovError::UnresolvableIdentifier { .. }));
        assert!(resolver.resolve("dart:async/zone.dart").is_err());
    }

    #[test]
    fn test_load_package_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let tool_dir = dir.path().join(".dart_tool");
        std::fs::create_dir_all(&tool_dir).unwrap();
        let config = tool_dir.join("package_config.json");
        std::fs::write(
            &config,
            r#"{
                "configVersion": 2,
                "packages": [
                    {"name": "app", "rootUri": "../", "packageUri": "lib/"},
                    {"name": "dep", "rootUri": "file:///cache/dep-1.0.0", "packageUri": "lib/"},
                    {"name": "bare", "rootUri": "../bare"}
                ]
            }"#,
        )
        .unwrap();

        let resolver = Resolver::load(&config).unwrap();
        assert_eq!(resolver.package_count(), 3);
        assert_eq!(
            resolver.resolve("package:app/main.dart").unwrap(),
            normalize(&dir.path().join("lib/main.dart"))
        );
        assert_eq!(
            resolver.resolve("package:dep/dep.dart").unwrap(),
            PathBuf::from("/cache/dep-1.0.0/lib/dep.dart")
        );
        assert_eq!(
            resolver.package_root("bare").unwrap(),
            normalize(&dir.path().join("bare")).as_path()
        );
    }

    #[test]
    fn test_load_package_config_decodes_root_uri() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("package_config.json");
        std::fs::write(
            &config,
            r#"{"packages": [
                {"name": "dep", "rootUri": "file:///tmp/Y/my%20pkg/", "packageUri": "lib/"},
                {"name": "app", "rootUri": "my%20app", "packageUri": "lib/"}
            ]}"#,
        )
        .unwrap();

        let resolver = Resolver::load(&config).unwrap();
        assert_eq!(
            resolver.resolve("package:dep/a.dart").unwrap(),
            PathBuf::from("/tmp/Y/my pkg/lib/a.dart")
        );
        assert_eq!(
            resolver.resolve("package:app/a.dart").unwrap(),
            normalize(&dir.path().join("my app/lib/a.dart"))
        );
    }

    #[test]
    fn test_load_dot_packages() {
        let dir = tempfile::tempdir().unwrap();
        let packages = dir.path().join(".packages");
        std::fs::write(&packages, "# generated\napp:lib/\ndep:file:///cache/dep/lib/\n").unwrap();

        let resolver = Resolver::load(&packages).unwrap();
        assert_eq!(
            resolver.resolve("package:app/a.dart").unwrap(),
            normalize(&dir.path().join("lib/a.dart"))
        );
        assert_eq!(
            resolver.resolve("package:dep/b.dart").unwrap(),
            PathBuf::from("/cache/dep/lib/b.dart")
        );
    }

    #[test]
    fn test_load_rejects_bad_dot_packages_line() {
        let dir = tempfile::tempdir().unwrap();
        let packages = dir.path().join(".packages");
        std::fs::write(&packages, "no-colon-here\n").unwrap();

        let err = Resolver::load(&packages).unwrap_err();
        assert!(matches!(err, HitcovError::PackageConfig { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Resolver::load(Path::new("/definitely/not/here/.packages")).unwrap_err();
        assert!(matches!(err, HitcovError::PackageConfig { .. }));
    }

    #[test]
    fn test_resolver_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Resolver>();
    }
}
