use crate::error::{HeraldError, Result};

const DEFAULT_PROJECT: &str = "scikit-learn";
const DEFAULT_DOCS_URL: &str = "https://scikit-learn.org/stable";
const DEFAULT_APPRECIATION: &str =
    "A big shoutout to the community of contributors who continue to push open-source machine learning forward ❤️";
const DEFAULT_INSTALL: [&str; 4] = [
    "You can upgrade with pip as usual:",
    "pip install -U {package}",
    "Using conda-forge builds:",
    "conda install -c conda-forge {package}",
];
const DEFAULT_HASHTAGS: [&str; 6] = ["#scikitlearn", "#MachineLearning", "#opensource", "#DataScience", "#Python", "#ML"];

/// A single profile directive
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Display name used in the post
    Project(String),
    /// Package name substituted into install commands
    Package(String),
    /// Documentation root the page URLs are built under
    DocsUrl(String),
    Appreciation(String),
    /// One line of the installation block
    Install(String),
    /// One or more hashtags, whitespace separated
    Hashtags(Vec<String>),
}

/// Everything project-specific in the announcement
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectConfig {
    pub project: String,
    pub package: String,
    pub docs_url: String,
    pub appreciation: String,
    /// Installation block lines; `{package}` is replaced with the package name
    pub install: Vec<String>,
    pub hashtags: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT.to_string(),
            package: DEFAULT_PROJECT.to_string(),
            docs_url: DEFAULT_DOCS_URL.to_string(),
            appreciation: DEFAULT_APPRECIATION.to_string(),
            install: DEFAULT_INSTALL.iter().map(|line| line.to_string()).collect(),
            hashtags: DEFAULT_HASHTAGS.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

impl ProjectConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> ProjectConfigBuilder {
        ProjectConfigBuilder::new()
    }

    /// Apply parsed directives on top of this profile.
    ///
    /// Scalar directives override. The first `install` or `hashtag` directive
    /// replaces the default list and later ones append to it.
    pub fn apply(&mut self, directives: Vec<Directive>) {
        let mut install_replaced = false;
        let mut hashtags_replaced = false;

        for directive in directives {
            match directive {
                Directive::Project(name) => self.project = name,
                Directive::Package(name) => self.package = name,
                Directive::DocsUrl(url) => self.docs_url = url,
                Directive::Appreciation(line) => self.appreciation = line,
                Directive::Install(line) => {
                    if !install_replaced {
                        self.install.clear();
                        install_replaced = true;
                    }
                    self.install.push(line);
                }
                Directive::Hashtags(tags) => {
                    if !hashtags_replaced {
                        self.hashtags.clear();
                        hashtags_replaced = true;
                    }
                    self.hashtags.extend(tags);
                }
            }
        }
    }

    /// Installation block with the package name filled in
    pub fn install_lines(&self) -> Vec<String> {
        self.install.iter().map(|line| line.replace("{package}", &self.package)).collect()
    }

    /// Hashtags on one line
    pub fn hashtag_line(&self) -> String {
        self.hashtags.join(" ")
    }
}

/// Builder for ProjectConfig.
///
/// # Example
///
/// ```rust
/// use herald_core::ProjectConfig;
///
/// let config = ProjectConfig::builder()
///     .project("Example")
///     .package("example")
///     .hashtags(["#example"])
///     .build();
///
/// assert_eq!(config.hashtag_line(), "#example");
/// ```
#[derive(Debug)]
pub struct ProjectConfigBuilder {
    config: ProjectConfig,
}

impl ProjectConfigBuilder {
    pub fn new() -> Self {
        Self { config: ProjectConfig::default() }
    }

    pub fn project(mut self, value: impl Into<String>) -> Self {
        self.config.project = value.into();
        self
    }

    pub fn package(mut self, value: impl Into<String>) -> Self {
        self.config.package = value.into();
        self
    }

    pub fn docs_url(mut self, value: impl Into<String>) -> Self {
        self.config.docs_url = value.into();
        self
    }

    pub fn appreciation(mut self, value: impl Into<String>) -> Self {
        self.config.appreciation = value.into();
        self
    }

    pub fn install<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.install = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn hashtags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.hashtags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> ProjectConfig {
        self.config
    }
}

impl Default for ProjectConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a `key: value` directive line
pub fn parse_directive(line: &str) -> Result<Directive> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Err(HeraldError::ConfigError("Empty or comment line".to_string()));
    }

    let Some((key, value)) = line.split_once(':') else {
        return Err(HeraldError::ConfigError(format!("Invalid directive format: {}", line)));
    };

    let key = key.trim();
    let value = value.trim();

    if value.is_empty() {
        return Err(HeraldError::ConfigError(format!("Missing value for {}", key)));
    }

    match key {
        "project" => Ok(Directive::Project(value.to_string())),
        "package" => Ok(Directive::Package(value.to_string())),
        "docs_url" => Ok(Directive::DocsUrl(value.trim_end_matches('/').to_string())),
        "appreciation" => Ok(Directive::Appreciation(value.to_string())),
        "install" => Ok(Directive::Install(value.to_string())),
        "hashtag" | "hashtags" => Ok(Directive::Hashtags(value.split_whitespace().map(hashtag).collect())),
        _ => Err(HeraldError::ConfigError(format!("Unknown directive: {}", key))),
    }
}

fn hashtag(word: &str) -> String {
    if word.starts_with('#') { word.to_string() } else { format!("#{}", word) }
}
