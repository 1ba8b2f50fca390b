//! [`TestProfile`] builder for loader test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name written to `profiles.ini` for the fixture profile.
pub const PROFILE_NAME: &str = "Default (release)";

/// Profile directory, relative to the installation root.
pub const PROFILE_DIR: &str = "Profiles/abcd1234.Default (release)";

/// A temporary browser installation with one profile, plus a scratch
/// directory for mod sources to import from.
///
/// ```text
/// <root>/
///   zen/profiles.ini
///   zen/Profiles/abcd1234.Default (release)/chrome/
///   sources/
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use uc_test_utils::TestProfile;
///
/// let profile = TestProfile::new();
/// profile.write_stylesheet("#nav-bar { display: none; }\n");
/// let css = profile.write_source_file("compact.css", "tab { height: 24px; }");
/// profile.assert_chrome_file_exists("userChrome.css");
/// ```
pub struct TestProfile {
    temp_dir: TempDir,
}

impl Default for TestProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProfile {
    /// Create the installation, `profiles.ini`, and an empty chrome directory.
    pub fn new() -> Self {
        let profile = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(profile.chrome_dir()).unwrap();
        fs::create_dir_all(profile.sources_dir()).unwrap();
        fs::write(
            profile.installation_root().join("profiles.ini"),
            format!(
                "[General]\nStartWithLastProfile=1\nVersion=2\n\n\
                 [Profile0]\nName={PROFILE_NAME}\nIsRelative=1\nPath={PROFILE_DIR}\nDefault=1\n"
            ),
        )
        .unwrap();
        profile
    }

    /// The temp root; also usable as a fake home directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The directory holding `profiles.ini`.
    pub fn installation_root(&self) -> PathBuf {
        self.root().join("zen")
    }

    pub fn profile_dir(&self) -> PathBuf {
        PROFILE_DIR
            .split('/')
            .fold(self.installation_root(), |acc, p| acc.join(p))
    }

    pub fn chrome_dir(&self) -> PathBuf {
        self.profile_dir().join("chrome")
    }

    pub fn stylesheet_path(&self) -> PathBuf {
        self.chrome_dir().join("userChrome.css")
    }

    /// Scratch directory for files to import.
    pub fn sources_dir(&self) -> PathBuf {
        self.root().join("sources")
    }

    pub fn write_stylesheet(&self, content: &str) {
        fs::write(self.stylesheet_path(), content).unwrap();
    }

    /// Current stylesheet content; empty when the file does not exist.
    pub fn read_stylesheet(&self) -> String {
        fs::read_to_string(self.stylesheet_path()).unwrap_or_default()
    }

    /// Write a file under the sources directory and return its path.
    pub fn write_source_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.sources_dir().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a mod folder under the sources directory and return its path.
    pub fn write_source_folder(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        for (relative, content) in files {
            self.write_source_file(&format!("{name}/{relative}"), content);
        }
        self.sources_dir().join(name)
    }

    /// Simulate a running browser holding the profile.
    pub fn lock_profile(&self) {
        fs::write(self.profile_dir().join("lock"), "").unwrap();
    }

    /// Assert that `path` (relative to the chrome directory) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_chrome_file_exists(&self, path: &str) {
        let full_path = self.chrome_dir().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the chrome directory) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_chrome_file_not_exists(&self, path: &str) {
        let full_path = self.chrome_dir().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the stylesheet contains `content`.
    ///
    /// # Panics
    /// Panics if the stylesheet does not contain `content`.
    pub fn assert_stylesheet_contains(&self, content: &str) {
        let stylesheet = self.read_stylesheet();
        assert!(
            stylesheet.contains(content),
            "userChrome.css does not contain expected content.\nExpected: {}\nActual: {}",
            content,
            stylesheet
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_created() {
        let profile = TestProfile::new();
        assert!(profile.chrome_dir().is_dir());
        assert!(profile.installation_root().join("profiles.ini").is_file());
        assert!(profile.read_stylesheet().is_empty());
    }

    #[test]
    fn source_folder_files_are_written() {
        let profile = TestProfile::new();
        let folder = profile.write_source_folder("nord", &[("userChrome.css", "a {}"), ("img/x.png", "")]);
        assert!(folder.join("userChrome.css").is_file());
        assert!(folder.join("img").join("x.png").is_file());
    }
}
