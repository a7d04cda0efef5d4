//! Layered configuration: optional TOML file, then `GIGGLE_*` environment
//! variables. Command-line flags are applied on top by `main`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_STORE_PATH: &str = "~/.local/share/giggle/session.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Root of the Giggle REST API.
  #[serde(default = "default_base_url")]
  pub base_url:   String,
  /// SQLite file holding the persisted tokens. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_store_path() -> PathBuf { PathBuf::from(DEFAULT_STORE_PATH) }

impl Settings {
  /// Read `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("GIGGLE"))
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  /// `store_path` with `~` resolved against `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    under_home(&self.store_path, home.as_deref())
  }
}

/// Resolve a leading `~` component against `home`. Paths that do not start
/// with `~`, or any path when `home` is unknown, are returned unchanged.
fn under_home(path: &Path, home: Option<&Path>) -> PathBuf {
  match (path.strip_prefix("~"), home) {
    (Ok(rest), Some(home)) => home.join(rest),
    _ => path.to_path_buf(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir()
      .join(format!("giggle-settings-{}-{name}.toml", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
  }

  #[test]
  fn missing_file_uses_defaults() {
    let settings =
      Settings::load(Path::new("/nonexistent/giggle-test.toml")).unwrap();
    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.store_path, PathBuf::from(DEFAULT_STORE_PATH));
  }

  #[test]
  fn file_values_override_defaults() {
    let path = temp_file(
      "override",
      "base_url = \"https://giggle.example.com/api\"\nstore_path = \"/tmp/s.db\"\n",
    );

    let settings = Settings::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(settings.base_url, "https://giggle.example.com/api");
    assert_eq!(settings.store_path, PathBuf::from("/tmp/s.db"));
  }

  #[test]
  fn tilde_resolves_against_home() {
    let home = Some(Path::new("/home/alice"));
    assert_eq!(
      under_home(Path::new("~/x/session.db"), home),
      PathBuf::from("/home/alice/x/session.db")
    );
    assert_eq!(under_home(Path::new("~"), home), PathBuf::from("/home/alice"));
  }

  #[test]
  fn other_paths_are_left_alone() {
    let home = Some(Path::new("/home/alice"));
    assert_eq!(
      under_home(Path::new("/abs/s.db"), home),
      PathBuf::from("/abs/s.db")
    );
    assert_eq!(
      under_home(Path::new("~bob/s.db"), home),
      PathBuf::from("~bob/s.db")
    );
    assert_eq!(
      under_home(Path::new("~/s.db"), None),
      PathBuf::from("~/s.db")
    );
  }
}
