use std::path::{Path, PathBuf};

/// Expand `~`, `$VAR` and `${VAR}` in a path given on the command line.
///
/// Paths that fail to expand (unset variable, non UTF-8) are returned unchanged.
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => shellexpand::full(s)
            .map(|expanded| PathBuf::from(expanded.into_owned()))
            .unwrap_or_else(|_| path.to_path_buf()),
        None => path.to_path_buf(),
    }
}
