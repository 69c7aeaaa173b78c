//! Lexical path helpers shared by the resolver and the report filter.
//!
//! Nothing here touches the filesystem: normalization only folds `.` and
//! `..` components, so reports stay reproducible for files that no longer
//! exist on disk.

use std::path::{Component, Path, PathBuf};

/// Fold `.` and `..` components without consulting the filesystem
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Make a path absolute against `cwd`, then normalize it
#[must_use]
pub fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&cwd.join(path))
    }
}

/// Express `path` relative to `base`, walking up with `..` as needed
///
/// Both paths must be absolute and share the same root; otherwise there is
/// no relative form and `None` is returned.
#[must_use]
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if !path.is_absolute() || !base.is_absolute() {
        return None;
    }
    let path = normalize(path);
    let base = normalize(base);

    let path_parts: Vec<Component<'_>> = path.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();

    // Different drive prefixes have no relative form
    if let (Some(Component::Prefix(a)), Some(Component::Prefix(b))) =
        (path_parts.first(), base_parts.first())
    {
        if a != b {
            return None;
        }
    }

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

/// Render a path with `/` separators
#[must_use]
pub fn to_slash(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        rendered.into_owned()
    } else {
        rendered.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
