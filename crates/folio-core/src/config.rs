//! Reader settings
//!
//! Three layers, later ones winning: built-in defaults, the TOML file at
//! `~/.config/folio/config.toml` (or `$FOLIO_CONFIG`), then `FOLIO_*`
//! environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::UserId;
use crate::paginate::{DEFAULT_END_SIGNS, DEFAULT_PAGE_SIZE};
use crate::source::SourceLayout;

const ENV_PREFIX: &str = "FOLIO";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of per-user source texts
    #[serde(default = "default_books_dir")]
    pub books_dir: PathBuf,

    /// File name of the source text inside a user's directory
    #[serde(default = "default_book_file")]
    pub book_file: String,

    /// Maximum characters per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Characters a page may end on
    #[serde(default = "default_end_signs")]
    pub end_signs: String,

    /// Expiry of `user_data_*` entries, in seconds (none when unset)
    #[serde(default)]
    pub session_ttl_secs: Option<u64>,

    /// Expiry of `book_*` entries, in seconds (none when unset)
    #[serde(default)]
    pub book_ttl_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            books_dir: default_books_dir(),
            book_file: default_book_file(),
            page_size: default_page_size(),
            end_signs: default_end_signs(),
            session_ttl_secs: None,
            book_ttl_secs: None,
        }
    }
}

impl Config {
    /// Load from the default file, with `FOLIO_*` overrides applied
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load from `path`; a missing file means all defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let base: Config = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("Invalid TOML in {:?}", path))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("Cannot read {:?}", path));
            }
        };
        base.layered()
    }

    /// Load from TOML text, with `FOLIO_*` overrides applied
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let base: Config = toml::from_str(toml_content).context("Invalid config TOML")?;
        base.layered()
    }

    fn layered(mut self) -> Result<Self> {
        self.apply_env_overrides()?;
        self.validate()?;
        Ok(self)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(val) = env_var("BOOKS_DIR") {
            self.books_dir = PathBuf::from(val);
        }

        if let Some(val) = env_var("BOOK_FILE") {
            self.book_file = val;
        }

        if let Some(val) = env_var("PAGE_SIZE") {
            self.page_size = val
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}_PAGE_SIZE: {:?}", ENV_PREFIX, val))?;
        }

        if let Some(val) = env_var("SESSION_TTL") {
            self.session_ttl_secs = parse_ttl(&val)
                .with_context(|| format!("Invalid {}_SESSION_TTL: {:?}", ENV_PREFIX, val))?;
        }

        if let Some(val) = env_var("BOOK_TTL") {
            self.book_ttl_secs = parse_ttl(&val)
                .with_context(|| format!("Invalid {}_BOOK_TTL: {:?}", ENV_PREFIX, val))?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page_size must be greater than 0");
        }
        if self.book_file.is_empty() {
            bail!("book_file must not be empty");
        }
        Ok(())
    }

    /// Set a single value by key, as `folio config set` does
    ///
    /// On error the config is left as it was.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        match key {
            "books_dir" => next.books_dir = PathBuf::from(value),
            "book_file" => next.book_file = value.to_string(),
            "page_size" => {
                next.page_size = value
                    .parse()
                    .context("Invalid value for page_size. Use a positive number.")?;
            }
            "end_signs" => next.end_signs = value.to_string(),
            "session_ttl_secs" => {
                next.session_ttl_secs =
                    parse_ttl(value).context("Invalid value for session_ttl_secs.")?;
            }
            "book_ttl_secs" => {
                next.book_ttl_secs = parse_ttl(value).context("Invalid value for book_ttl_secs.")?;
            }
            _ => {
                bail!(
                    "Unknown configuration key: '{}'\n\
                     Valid keys: books_dir, book_file, page_size, end_signs, session_ttl_secs, book_ttl_secs",
                    key
                );
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Write as TOML, creating parent directories as needed
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = dir {
            std::fs::create_dir_all(dir).with_context(|| format!("Cannot create {:?}", dir))?;
        }
        let content = toml::to_string_pretty(self).context("Cannot encode config as TOML")?;
        std::fs::write(path, content).with_context(|| format!("Cannot write {:?}", path))
    }

    /// `$FOLIO_CONFIG`, else `config.toml` under the platform config dir
    pub fn config_file_path() -> PathBuf {
        env_var("CONFIG").map(PathBuf::from).unwrap_or_else(|| {
            let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
            base.join("folio").join("config.toml")
        })
    }

    /// Path of a user's source text
    pub fn source_path(&self, user: UserId) -> PathBuf {
        SourceLayout::from_config(self).source_path(user)
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        self.session_ttl_secs.map(Duration::from_secs)
    }

    pub fn book_ttl(&self) -> Option<Duration> {
        self.book_ttl_secs.map(Duration::from_secs)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{}_{}", ENV_PREFIX, name)).ok()
}

/// Parse a TTL in seconds; empty, `0` and `none` mean no expiry
fn parse_ttl(value: &str) -> Result<Option<u64>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let secs: u64 = value.parse().context("TTL must be a number of seconds")?;
    Ok((secs > 0).then_some(secs))
}

fn default_books_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("folio").join("book")
}

fn default_book_file() -> String {
    "book.txt".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_end_signs() -> String {
    DEFAULT_END_SIGNS.to_string()
}
