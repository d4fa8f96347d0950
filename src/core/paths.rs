//! Resolution of the properties file an update targets.

use crate::constants;
use crate::core::file_lock::lock_path_for;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct TargetPaths {
    pub properties: PathBuf,
    pub lock: PathBuf,
    pub source: PathSource,
}

/// Where the properties path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Argument,
    Environment,
    ConfigFile,
    ProjectSearch,
    Default,
}

impl std::fmt::Display for PathSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PathSource::Argument => "--file",
            PathSource::Environment => constants::ENV_PROPERTIES,
            PathSource::ConfigFile => "config file",
            PathSource::ProjectSearch => "project search",
            PathSource::Default => "default",
        };
        f.write_str(s)
    }
}

impl TargetPaths {
    /// Resolve from CLI arg, env var, config file, project search, then the built-in default.
    pub fn resolve(file_arg: Option<PathBuf>, configured: Option<PathBuf>) -> Self {
        if let Some(path) = file_arg {
            return Self::from_file(path, PathSource::Argument);
        }
        if let Ok(path) = env::var(constants::ENV_PROPERTIES) {
            if !path.is_empty() {
                return Self::from_file(PathBuf::from(path), PathSource::Environment);
            }
        }
        if let Some(path) = configured {
            return Self::from_file(path, PathSource::ConfigFile);
        }
        if let Some(found) = env::current_dir()
            .ok()
            .and_then(|cwd| find_project_properties(&cwd))
        {
            return Self::from_file(found, PathSource::ProjectSearch);
        }
        Self::from_file(
            PathBuf::from(constants::DEFAULT_PROPERTIES_PATH),
            PathSource::Default,
        )
    }

    pub fn from_file(properties: PathBuf, source: PathSource) -> Self {
        let lock = lock_path_for(&properties);
        Self {
            properties,
            lock,
            source,
        }
    }
}

/// Walk up from `start` looking for `src/main/resources/application.properties`.
pub fn find_project_properties(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(constants::PROJECT_PROPERTIES_SUFFIX))
        .find(|candidate| candidate.is_file())
}

impl std::fmt::Display for TargetPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (from {})", self.properties.display(), self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_file() {
        let paths = TargetPaths::from_file(
            PathBuf::from("/srv/app.properties"),
            PathSource::Argument,
        );
        assert_eq!(paths.properties, PathBuf::from("/srv/app.properties"));
        assert_eq!(paths.lock, lock_path_for(Path::new("/srv/app.properties")));
        assert!(paths.lock.starts_with(env::temp_dir()));
    }

    #[test]
    fn test_argument_takes_precedence() {
        let paths = TargetPaths::resolve(
            Some(PathBuf::from("a.properties")),
            Some(PathBuf::from("b.properties")),
        );
        assert_eq!(paths.properties, PathBuf::from("a.properties"));
        assert_eq!(paths.source, PathSource::Argument);
    }

    #[test]
    fn test_find_project_properties_from_subdir() {
        let dir = TempDir::new().unwrap();
        let resources = dir.path().join("src/main/resources");
        fs::create_dir_all(&resources).unwrap();
        fs::write(resources.join("application.properties"), "a=1\n").unwrap();
        let nested = dir.path().join("target/classes/com");
        fs::create_dir_all(&nested).unwrap();

        let found = find_project_properties(&nested).unwrap();
        assert_eq!(found, resources.join("application.properties"));
    }

    #[test]
    fn test_find_project_properties_none() {
        let dir = TempDir::new().unwrap();
        assert!(find_project_properties(dir.path()).is_none());
    }
}
