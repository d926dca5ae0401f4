use anyhow::{Context, Result, bail};
use log::info;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "vsh.toml";

#[derive(Debug, Default, Deserialize)]
pub struct VshConfig {
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShellConfig {
    pub user: Option<String>,
    pub hostname: Option<String>,
    pub home: Option<String>,
    pub path: Option<String>,
    pub command_ext: Option<String>,
    pub state_file: Option<PathBuf>,
    pub seed_file: Option<PathBuf>,
}

impl ShellConfig {
    pub fn user(&self) -> &str {
        self.user.as_deref().unwrap_or("guest")
    }

    pub fn hostname(&self) -> &str {
        self.hostname.as_deref().unwrap_or("vsh")
    }

    pub fn home(&self) -> String {
        self.home
            .clone()
            .unwrap_or_else(|| format!("/home/{}", self.user()))
    }

    /// The single virtual directory searched for command units.
    pub fn path(&self) -> String {
        self.path
            .clone()
            .unwrap_or_else(|| format!("{}/.local/bin", self.home()))
    }

    pub fn command_ext(&self) -> &str {
        self.command_ext.as_deref().unwrap_or("cmd")
    }

    pub fn state_file(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(|| Path::new(".vsh").join("fs.json"))
    }
}

impl VshConfig {
    /// Aliases with the built-in ones filled in where the file does not override them.
    pub fn aliases(&self) -> BTreeMap<String, String> {
        let mut aliases = self.aliases.clone();
        for (name, expansion) in [("aboutme", "whoami"), ("intro", "whoami"), ("cls", "clear")] {
            aliases
                .entry(name.to_string())
                .or_insert_with(|| expansion.to_string());
        }
        aliases
    }
}

/// Load the configuration.
///
/// An explicit `path` must exist; otherwise `vsh.toml` in `dir` is used when
/// present and defaults apply when it is not. A `.env` file in the config
/// directory (`.env.<VSH_ENV>` when that variable is set) overrides `[env]`.
pub fn load_config(dir: &Path, path: Option<&Path>) -> Result<VshConfig> {
    let (mut config, base) = match path {
        Some(path) => {
            if !path.exists() {
                bail!("Critical: config file {:?} not found.", path);
            }
            let base = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            (parse_file(path)?, base)
        }
        None => {
            let default_path = dir.join(CONFIG_FILE);
            let config = if default_path.exists() {
                parse_file(&default_path)?
            } else {
                VshConfig::default()
            };
            (config, dir.to_path_buf())
        }
    };

    // Host paths in the config are relative to the config file.
    for file in [&mut config.shell.state_file, &mut config.shell.seed_file]
        .into_iter()
        .flatten()
    {
        if file.is_relative() {
            *file = base.join(&*file);
        }
    }
    if config.shell.state_file.is_none() {
        config.shell.state_file = Some(base.join(".vsh").join("fs.json"));
    }

    let env_filename = env::var("VSH_ENV")
        .map(|v| format!(".env.{}", v))
        .unwrap_or_else(|_| ".env".to_string());
    let env_path = base.join(&env_filename);

    if env_path.exists() {
        info!("Loading environment from: {}", env_filename);
        for item in dotenvy::from_path_iter(&env_path)
            .with_context(|| format!("Failed to read {}", env_filename))?
        {
            let (key, val) = item.with_context(|| format!("Failed to parse {}", env_filename))?;
            config.env.insert(key, val);
        }
    }

    validate(&config)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<VshConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn validate(config: &VshConfig) -> Result<()> {
    let shell = &config.shell;
    if !shell.home().starts_with('/') {
        bail!("Configuration Error: [shell] home must be an absolute path, got '{}'.", shell.home());
    }
    if !shell.path().starts_with('/') {
        bail!("Configuration Error: [shell] path must be an absolute path, got '{}'.", shell.path());
    }
    if shell.user().is_empty() || shell.user().contains('/') {
        bail!("Configuration Error: [shell] user '{}' is not a valid name.", shell.user());
    }
    if shell.command_ext().is_empty() || shell.command_ext().contains('.') {
        bail!(
            "Configuration Error: [shell] command_ext '{}' must be a bare extension.",
            shell.command_ext()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.shell.user(), "guest");
        assert_eq!(config.shell.home(), "/home/guest");
        assert_eq!(config.shell.path(), "/home/guest/.local/bin");
        assert_eq!(config.shell.command_ext(), "cmd");
        assert_eq!(config.shell.state_file(), dir.path().join(".vsh").join("fs.json"));
        assert_eq!(config.aliases()["cls"], "clear");
    }

    #[test]
    fn test_file_values_and_relative_paths() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[shell]
user = "ada"
hostname = "engine"
state_file = "state/fs.json"

[env]
EDITOR = "ed"

[aliases]
ll = "ls -l"
cls = "echo cleared"
"#,
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.shell.home(), "/home/ada");
        assert_eq!(config.shell.hostname(), "engine");
        assert_eq!(config.shell.state_file(), dir.path().join("state/fs.json"));
        assert_eq!(config.env["EDITOR"], "ed");

        let aliases = config.aliases();
        assert_eq!(aliases["ll"], "ls -l");
        assert_eq!(aliases["cls"], "echo cleared");
        assert_eq!(aliases["intro"], "whoami");
    }

    #[test]
    fn test_dotenv_overrides_env_table() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[env]\nGREETING = \"hi\"\n").unwrap();
        fs::write(dir.path().join(".env"), "GREETING=hello\nEXTRA=1\n").unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.env["GREETING"], "hello");
        assert_eq!(config.env["EXTRA"], "1");
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_config(dir.path(), Some(&missing)).is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[shell]\nhome = \"relative\"\n").unwrap();
        assert!(load_config(dir.path(), None).is_err());

        fs::write(dir.path().join(CONFIG_FILE), "[shell\n").unwrap();
        assert!(load_config(dir.path(), None).is_err());
    }
}
