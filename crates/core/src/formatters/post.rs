//! Announcement post rendering.

use crate::config::ProjectConfig;
use crate::pipeline::ReleaseReport;

/// Line shown when no highlight could be extracted
pub const NO_HIGHLIGHTS_LINE: &str = "Many improvements across the library, see the full release highlights below.";

/// Configuration for post output
#[derive(Debug, Clone)]
pub struct PostConfig {
    /// Bullet prefix for highlight lines
    pub bullet: String,
    /// Text of the single bullet rendered when there are no highlights
    pub placeholder: String,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self { bullet: "▶️".to_string(), placeholder: NO_HIGHLIGHTS_LINE.to_string() }
    }
}

/// Post formatter bound to a project profile
pub struct PostFormatter {
    project: ProjectConfig,
    config: PostConfig,
}

impl PostFormatter {
    pub fn new(project: ProjectConfig) -> Self {
        Self { project, config: PostConfig::default() }
    }

    pub fn with_config(project: ProjectConfig, config: PostConfig) -> Self {
        Self { project, config }
    }

    pub fn convert(&self, report: &ReleaseReport) -> String {
        render_post(report, &self.project, &self.config)
    }
}

/// Compose the announcement with the default post settings.
pub fn compose_post(report: &ReleaseReport, project: &ProjectConfig) -> String {
    render_post(report, project, &PostConfig::default())
}

/// Render the announcement.
///
/// Output depends only on the arguments; identical input gives
/// byte-identical text.
pub fn render_post(report: &ReleaseReport, project: &ProjectConfig, config: &PostConfig) -> String {
    let name = &project.project;
    let version = &report.version;
    let summary = &report.summary;

    let mut lines: Vec<String> = vec![
        format!("🚀 {} {} is out 🚀", name, version),
        String::new(),
        project.appreciation.clone(),
        String::new(),
        "✨ Key Highlights:".to_string(),
        String::new(),
    ];

    if report.highlights.is_empty() {
        lines.push(format!("{} {}", config.bullet, config.placeholder));
    } else {
        lines.extend(report.highlights.iter().map(|highlight| format!("{} {}", config.bullet, highlight)));
    }

    lines.extend([
        String::new(),
        format!("🔗 Check the full release highlights: {}", report.urls.highlights),
        String::new(),
        format!("Discover {} {} and its:", name, version),
        String::new(),
        format!("🟢 {}", counted(summary.new_features, "new feature", "new features")),
        format!(
            "🔵 {}",
            counted(
                summary.efficiency_enhancements,
                "efficiency improvement or enhancement",
                "efficiency improvements & enhancements"
            )
        ),
        format!("🟡 {}", counted(summary.api_changes, "API change", "API changes")),
        format!("🔴 {}", counted(summary.fixes, "fix", "fixes")),
        format!("👥 {} (thank you all!)", counted(report.contributors, "contributor", "contributors")),
        String::new(),
        format!("📖 More details in the changelog: {}", report.urls.notes),
    ]);

    let install = project.install_lines();
    if !install.is_empty() {
        lines.push(String::new());
        lines.push(install.join("\n\n"));
    }

    if !project.hashtags.is_empty() {
        lines.push(String::new());
        lines.push(project.hashtag_line());
    }

    lines.join("\n")
}

fn counted(count: usize, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::TagCounts;
    use crate::release::{ReleaseUrls, Version};

    fn report(highlights: &[&str], counts: TagCounts, contributors: usize) -> ReleaseReport {
        let version = Version::parse("1.7").unwrap();
        let urls = ReleaseUrls::new("https://scikit-learn.org/stable", &version).unwrap();
        ReleaseReport::new(version, urls, counts, highlights.iter().map(|h| h.to_string()).collect(), contributors)
    }

    #[test]
    fn test_full_post() {
        let counts = TagCounts { major_feature: 1, feature: 9, efficiency: 4, enhancement: 20, api_change: 7, fix: 31 };
        let post = compose_post(
            &report(&["Array API support", "Faster trees"], counts, 120),
            &ProjectConfig::default(),
        );

        let expected = "\
🚀 scikit-learn 1.7 is out 🚀

A big shoutout to the community of contributors who continue to push open-source machine learning forward ❤️

✨ Key Highlights:

▶️ Array API support
▶️ Faster trees

🔗 Check the full release highlights: https://scikit-learn.org/stable/auto_examples/release_highlights/plot_release_highlights_1_7_0.html

Discover scikit-learn 1.7 and its:

🟢 10 new features
🔵 24 efficiency improvements & enhancements
🟡 7 API changes
🔴 31 fixes
👥 120 contributors (thank you all!)

📖 More details in the changelog: https://scikit-learn.org/stable/whats_new/v1.7.html#release-notes-1-7

You can upgrade with pip as usual:

pip install -U scikit-learn

Using conda-forge builds:

conda install -c conda-forge scikit-learn

#scikitlearn #MachineLearning #opensource #DataScience #Python #ML";

        assert_eq!(post, expected);
    }

    #[test]
    fn test_placeholder_and_singulars() {
        let counts = TagCounts { feature: 1, fix: 1, api_change: 1, enhancement: 1, ..Default::default() };
        let post = compose_post(&report(&[], counts, 1), &ProjectConfig::default());

        assert!(post.contains(&format!("▶️ {}", NO_HIGHLIGHTS_LINE)));
        assert!(post.contains("🟢 1 new feature\n"));
        assert!(post.contains("🔵 1 efficiency improvement or enhancement\n"));
        assert!(post.contains("🟡 1 API change\n"));
        assert!(post.contains("🔴 1 fix\n"));
        assert!(post.contains("👥 1 contributor (thank you all!)"));
    }

    #[test]
    fn test_zero_counts_still_render() {
        let post = compose_post(&report(&["Something"], TagCounts::default(), 0), &ProjectConfig::default());
        assert!(post.contains("🟢 0 new features"));
        assert!(post.contains("👥 0 contributors"));
    }

    #[test]
    fn test_post_is_deterministic() {
        let counts = TagCounts { fix: 2, ..Default::default() };
        let project = ProjectConfig::default();
        let first = compose_post(&report(&["One highlight"], counts, 3), &project);
        let second = compose_post(&report(&["One highlight"], counts, 3), &project);
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_project_profile() {
        let project = ProjectConfig::builder()
            .project("Example")
            .package("example")
            .appreciation("Thanks, everyone!")
            .install(["pip install {package}"])
            .hashtags(Vec::<String>::new())
            .build();

        let formatter = PostFormatter::new(project);
        let post = formatter.convert(&report(&["A highlight"], TagCounts::default(), 2));

        assert!(post.starts_with("🚀 Example 1.7 is out 🚀\n\nThanks, everyone!\n"));
        assert!(post.ends_with("\n\npip install example"));
    }
}
