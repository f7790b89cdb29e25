//! Formatting and writing the generated module
//!
//! The converter's own text is valid TypeScript; formatting is cosmetic and
//! any formatter failure falls back to the unformatted text.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use similar::{ChangeTag, TextDiff};
use tracing::{debug, warn};

use crate::error::{ConvertError, Result};

/// Location of the generated module, relative to the project root
pub const OUTPUT_RELATIVE_PATH: &str = "types/contentTypes.d.ts";

/// Rewrites generated text
pub trait Formatter {
    fn format(&self, text: &str) -> Result<String>;
}

/// Runs `prettier` with the project's own prettier config
#[derive(Debug, Clone)]
pub struct PrettierFormatter {
    config_file: PathBuf,
    program: String,
}

impl PrettierFormatter {
    /// Config files prettier would pick up in a project root
    pub const CONFIG_FILES: &'static [&'static str] = &[
        ".prettierrc",
        ".prettierrc.json",
        ".prettierrc.yaml",
        ".prettierrc.yml",
        ".prettierrc.json5",
        ".prettierrc.toml",
        ".prettierrc.js",
        ".prettierrc.cjs",
        ".prettierrc.mjs",
        "prettier.config.js",
        "prettier.config.cjs",
        "prettier.config.mjs",
    ];

    /// Find a prettier config in `root`; without one the module is left as is
    pub fn discover(root: &Path) -> Option<Self> {
        Self::CONFIG_FILES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file())
            .map(|config_file| Self {
                config_file,
                program: "npx".to_string(),
            })
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }
}

impl Formatter for PrettierFormatter {
    fn format(&self, text: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .arg("--no-install")
            .arg("prettier")
            .arg("--config")
            .arg(&self.config_file)
            .arg("--stdin-filepath")
            .arg("contentTypes.d.ts")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(ConvertError::Formatter(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ConvertError::Formatter(format!("non UTF-8 output: {}", e)))
    }
}

/// Format `text` when a formatter is available, keeping it unformatted on failure
pub fn format_or_passthrough(formatter: Option<&dyn Formatter>, text: String) -> String {
    let Some(formatter) = formatter else {
        return text;
    };
    match formatter.format(&text) {
        Ok(formatted) => formatted,
        Err(e) => {
            warn!("Formatter failed, writing unformatted output: {}", e);
            text
        }
    }
}

/// Path the module is written to under `root`
pub fn output_path(root: &Path) -> PathBuf {
    root.join(OUTPUT_RELATIVE_PATH)
}

/// Write the module under `root`, creating `types/` when needed
pub fn write_declarations(root: &Path, text: &str) -> Result<PathBuf> {
    let path = output_path(root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, text)?;
    debug!("Wrote {}", path.display());
    Ok(path)
}

/// Line diff between the file at `path` and `text`.
///
/// Returns `None` when they are identical. A missing file diffs as empty.
pub fn diff_against_existing(path: &Path, text: &str) -> Result<Option<String>> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };

    if existing == text {
        return Ok(None);
    }

    let diff = TextDiff::from_lines(existing.as_str(), text);
    let mut report = String::new();
    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => continue,
        };
        report.push_str(sign);
        report.push_str(change.value());
        if !change.value().ends_with('\n') {
            report.push('\n');
        }
    }
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Formatter for Upper {
        fn format(&self, text: &str) -> Result<String> {
            Ok(text.to_uppercase())
        }
    }

    struct Broken;

    impl Formatter for Broken {
        fn format(&self, _text: &str) -> Result<String> {
            Err(ConvertError::Formatter("no prettier".to_string()))
        }
    }

    #[test]
    fn test_format_or_passthrough() {
        assert_eq!(format_or_passthrough(Some(&Upper), "abc".to_string()), "ABC");
        assert_eq!(format_or_passthrough(Some(&Broken), "abc".to_string()), "abc");
        assert_eq!(format_or_passthrough(None, "abc".to_string()), "abc");
    }

    #[test]
    fn test_write_declarations_creates_types_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_declarations(dir.path(), "export {};\n").unwrap();

        assert_eq!(path, dir.path().join("types").join("contentTypes.d.ts"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "export {};\n");
    }

    #[test]
    fn test_diff_against_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_declarations(dir.path(), "a\nb\n").unwrap();

        assert!(diff_against_existing(&path, "a\nb\n").unwrap().is_none());
        assert_eq!(diff_against_existing(&path, "a\nc\n").unwrap().unwrap(), "-b\n+c\n");

        let missing = dir.path().join("nope.d.ts");
        assert_eq!(diff_against_existing(&missing, "x\n").unwrap().unwrap(), "+x\n");
    }

    #[test]
    fn test_discover_prettier_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PrettierFormatter::discover(dir.path()).is_none());

        fs::write(dir.path().join(".prettierrc"), "{}").unwrap();
        let formatter = PrettierFormatter::discover(dir.path()).unwrap();
        assert_eq!(formatter.config_file(), dir.path().join(".prettierrc"));
    }
}
