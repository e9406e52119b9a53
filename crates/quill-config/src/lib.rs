//! Configuration loading and parsing.
//!
//! Parses `quill.toml` (or an override path provided by the binary) into
//! editor options, the syntax keyword list, and theme colors. Every field
//! has a default so a missing or unparsable file degrades to the built-in
//! configuration instead of failing startup. Unknown fields are ignored
//! (TOML deserialization tolerance) to allow forward evolution.

use anyhow::{Context as _, Result, bail};
use quill_render::Color;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::warn;

#[derive(Debug, Deserialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_size")]
    pub tab_size: usize,
    #[serde(default = "EditorConfig::default_auto_indent")]
    pub auto_indent: bool,
    #[serde(default = "EditorConfig::default_text_size")]
    pub text_size: f32,
    /// Maximum number of characters one text box can hold.
    #[serde(default = "EditorConfig::default_capacity")]
    pub capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: Self::default_tab_size(),
            auto_indent: Self::default_auto_indent(),
            text_size: Self::default_text_size(),
            capacity: Self::default_capacity(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_size() -> usize {
        2
    }
    const fn default_auto_indent() -> bool {
        true
    }
    const fn default_text_size() -> f32 {
        12.0
    }
    const fn default_capacity() -> usize {
        4096
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SyntaxConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeConfig {
    #[serde(default = "ThemeConfig::default_normal")]
    pub normal: String,
    #[serde(default = "ThemeConfig::default_keyword")]
    pub keyword: String,
    #[serde(default = "ThemeConfig::default_digit")]
    pub digit: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            normal: Self::default_normal(),
            keyword: Self::default_keyword(),
            digit: Self::default_digit(),
        }
    }
}

impl ThemeConfig {
    fn default_normal() -> String {
        "#E8E8E8".to_string()
    }
    fn default_keyword() -> String {
        "#E898A8".to_string()
    }
    fn default_digit() -> String {
        "#B8D8A8".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub syntax: SyntaxConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Theme colors resolved from their hex form.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub normal: Color,
    pub keyword: Color,
    pub digit: Color,
}

impl Config {
    /// Resolve the theme's hex strings. A malformed color is a hard error
    /// because silently substituting a default would hide the typo.
    pub fn theme_colors(&self) -> Result<ThemeColors> {
        Ok(ThemeColors {
            normal: parse_color(&self.file.theme.normal)
                .context("invalid [theme] normal color")?,
            keyword: parse_color(&self.file.theme.keyword)
                .context("invalid [theme] keyword color")?,
            digit: parse_color(&self.file.theme.digit).context("invalid [theme] digit color")?,
        })
    }
}

/// Best-effort config path following platform conventions (XDG / AppData
/// Roaming). Prefers a local `quill.toml` before the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("quill.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("quill").join("quill.toml");
    }
    // Final fallback relative filename.
    PathBuf::from("quill.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    if let Ok(content) = fs::read_to_string(&path) {
        match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => Ok(Config {
                raw: Some(content),
                file,
            }),
            Err(err) => {
                // Fall back to defaults rather than refusing to start.
                warn!(path = %path.display(), %err, "config parse failed, using defaults");
                Ok(Config::default())
            }
        }
    } else {
        Ok(Config::default())
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA` into a color.
pub fn parse_color(hex: &str) -> Result<Color> {
    let digits = hex
        .strip_prefix('#')
        .with_context(|| format!("color {hex:?} is missing the leading '#'"))?;
    if digits.len() != 6 && digits.len() != 8 {
        bail!("color {hex:?} must be #RRGGBB or #RRGGBBAA");
    }
    let byte = |range: std::ops::Range<usize>| -> Result<u8> {
        u8::from_str_radix(&digits[range], 16)
            .with_context(|| format!("color {hex:?} has a non-hex component"))
    };
    let r = byte(0..2)?;
    let g = byte(2..4)?;
    let b = byte(4..6)?;
    let a = if digits.len() == 8 { byte(6..8)? } else { 255 };
    Ok(Color::rgba(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file.editor.tab_size, 2);
        assert!(cfg.file.editor.auto_indent);
        assert!(cfg.file.syntax.keywords.is_empty());
    }

    #[test]
    fn parses_editor_and_syntax_tables() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[editor]\ntab_size = 4\nauto_indent = false\n[syntax]\nkeywords = [\"fn\", \"let\"]\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.editor.tab_size, 4);
        assert!(!cfg.file.editor.auto_indent);
        assert_eq!(cfg.file.syntax.keywords, vec!["fn", "let"]);
        // Unspecified tables keep their defaults.
        assert_eq!(cfg.file.editor.text_size, 12.0);
        assert_eq!(cfg.file.theme.normal, "#E8E8E8");
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor\ntab_size = ").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.editor.tab_size, 2);
        assert!(cfg.raw.is_none());
    }

    #[test]
    fn parses_theme_colors() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[theme]\nkeyword = \"#11223344\"\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        let colors = cfg.theme_colors().unwrap();
        assert_eq!(colors.keyword, Color::rgba(0x11, 0x22, 0x33, 0x44));
        assert_eq!(colors.normal, Color::rgb(0xE8, 0xE8, 0xE8));
    }

    #[test]
    fn rejects_malformed_hex_colors() {
        assert!(parse_color("E8E8E8").is_err());
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#GGHHII").is_err());
        assert!(parse_color("#A1B2C3").is_ok());
    }
}
