use std::path::{Path, PathBuf};

/// Expands a leading `~` against `home`; other paths pass through.
pub fn expand_home_path(path: impl AsRef<Path>, home: Option<&str>) -> PathBuf {
    let path = path.as_ref();
    let Some(home) = home.filter(|h| !h.trim().is_empty()) else {
        return path.to_path_buf();
    };
    if let Some(str_path) = path.to_str() {
        if let Some(rest) = str_path.strip_prefix("~/") {
            return PathBuf::from(home).join(rest);
        }
        if str_path == "~" {
            return PathBuf::from(home);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_tilde_prefix() {
        assert_eq!(
            expand_home_path("~/.oci/config", Some("/home/op")),
            PathBuf::from("/home/op/.oci/config")
        );
        assert_eq!(expand_home_path("~", Some("/home/op")), PathBuf::from("/home/op"));
    }

    #[test]
    fn leaves_other_paths_alone() {
        assert_eq!(
            expand_home_path("/etc/oci/config", Some("/home/op")),
            PathBuf::from("/etc/oci/config")
        );
        assert_eq!(expand_home_path("~/.oci/config", None), PathBuf::from("~/.oci/config"));
    }
}
