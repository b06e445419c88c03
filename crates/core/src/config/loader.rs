use crate::config::directives::ProjectConfig;
use crate::config::parser::ConfigParser;
use crate::error::{HeraldError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Locates and loads the project profile
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Profile given explicitly; must exist
    custom_path: Option<PathBuf>,
    /// Per-user profile; used only when present
    user_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader that only knows the built-in defaults
    pub fn new() -> Self {
        Self { custom_path: None, user_path: None }
    }

    /// Load the profile: the custom file if set, else the user file if it
    /// exists, else the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HeraldError::FileNotFound`] when the custom file is missing and
    /// [`HeraldError::ConfigError`] when a profile cannot be parsed.
    pub fn load(&self) -> Result<ProjectConfig> {
        let mut config = ProjectConfig::default();

        if let Some(path) = self.profile_path()? {
            debug!(path = %path.display(), "loading project profile");
            config.apply(ConfigParser::parse_file(path)?);
        }

        Ok(config)
    }

    /// The profile file that `load` reads, if any
    pub fn profile_path(&self) -> Result<Option<&Path>> {
        if let Some(custom) = &self.custom_path {
            if !custom.exists() {
                return Err(HeraldError::FileNotFound(custom.clone()));
            }
            return Ok(Some(custom.as_path()));
        }

        Ok(self.user_path.as_deref().filter(|path| path.exists()))
    }

    /// Get default user profile path (~/.config/herald/project.txt)
    fn default_user_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("herald").join("project.txt"))
    }
}

/// Builder for ConfigLoader
#[derive(Debug)]
pub struct ConfigLoaderBuilder {
    custom_path: Option<PathBuf>,
    user_path: Option<PathBuf>,
}

impl ConfigLoaderBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self { custom_path: None, user_path: None }
    }

    /// Set an explicit profile file
    pub fn custom_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the per-user profile file
    pub fn user_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.user_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Build the ConfigLoader
    pub fn build(self) -> ConfigLoader {
        ConfigLoader { custom_path: self.custom_path, user_path: self.user_path }
    }
}

impl Default for ConfigLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        let mut builder = ConfigLoaderBuilder::new();

        if let Some(user_path) = Self::default_user_path() {
            builder = builder.user_path(user_path);
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_paths_gives_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_custom_path_is_loaded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.txt");
        fs::write(&path, "project: Example\npackage: example\n").unwrap();

        let config = ConfigLoaderBuilder::new().custom_path(&path).build().load().unwrap();

        assert_eq!(config.project, "Example");
        assert_eq!(config.install_lines()[1], "pip install -U example");
    }

    #[test]
    fn test_missing_custom_path_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoaderBuilder::new().custom_path(temp_dir.path().join("absent.txt")).build();

        assert!(matches!(loader.load(), Err(HeraldError::FileNotFound(_))));
    }

    #[test]
    fn test_missing_user_path_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoaderBuilder::new().user_path(temp_dir.path().join("absent.txt")).build();

        assert_eq!(loader.load().unwrap(), ProjectConfig::default());
    }

    #[test]
    fn test_custom_path_wins_over_user_path() {
        let temp_dir = TempDir::new().unwrap();
        let custom = temp_dir.path().join("custom.txt");
        let user = temp_dir.path().join("user.txt");
        fs::write(&custom, "project: Custom\n").unwrap();
        fs::write(&user, "project: User\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_path(&custom).user_path(&user).build();

        assert_eq!(loader.load().unwrap().project, "Custom");
        assert_eq!(loader.profile_path().unwrap(), Some(custom.as_path()));
    }

    #[test]
    fn test_malformed_profile() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.txt");
        fs::write(&path, "colour: blue\n").unwrap();

        let loader = ConfigLoaderBuilder::new().custom_path(&path).build();
        assert!(matches!(loader.load(), Err(HeraldError::ConfigError(_))));
    }
}
