//! Path helpers for staged and final outputs.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment where possible. The filesystem is not consulted.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
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

/// Render a path as emitted in generated configuration.
pub fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// `<staging>/<step>/<dest>`: merged output of a non-final step.
pub fn staged_path(staging: &Path, step: &str, dest: &str) -> String {
    display(&normalize(&staging.join(step).join(strip_root(dest))))
}

/// `<staging>/<step>/<basename of source>`: per-source output of a
/// non-final step.
pub fn staged_source_path(staging: &Path, step: &str, source: &str) -> String {
    let name = Path::new(source)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string());
    display(&normalize(&staging.join(step).join(name)))
}

/// `<dest_dir>/<dest>`: output of the last step of a chain.
pub fn final_path(dest_dir: &Path, dest: &str) -> String {
    display(&normalize(&dest_dir.join(strip_root(dest))))
}

fn strip_root(dest: &str) -> &str {
    dest.trim_start_matches(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_segments() {
        assert_eq!(normalize(Path::new("app/./js/../foo.js")), PathBuf::from("app/foo.js"));
        assert_eq!(normalize(Path::new("../lib/x.js")), PathBuf::from("../lib/x.js"));
        assert_eq!(normalize(Path::new("/../etc")), PathBuf::from("/etc"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_staged_path() {
        assert_eq!(
            staged_path(Path::new(".tmp"), "concat", "scripts/site.js"),
            ".tmp/concat/scripts/site.js"
        );
    }

    #[test]
    fn test_staged_source_path_keeps_basename() {
        assert_eq!(
            staged_source_path(Path::new("staging"), "uglify", "app/js/foo.js"),
            "staging/uglify/foo.js"
        );
    }

    #[test]
    fn test_final_path_strips_leading_slash() {
        assert_eq!(final_path(Path::new("dist"), "/scripts/site.js"), "dist/scripts/site.js");
    }
}
