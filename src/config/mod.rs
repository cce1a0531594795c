use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use anyhow::bail;
use anyhow::Result;

pub mod general;
pub mod user;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<PathBuf>,
    #[serde(default)]
    pub general: general::GeneralConfig,
    #[serde(default)]
    pub user: user::UserConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        Config::from_file_in_chain(path, &mut Vec::new())
    }

    // `chain` holds the files currently being included, outermost first
    fn from_file_in_chain(path: &Path, chain: &mut Vec<PathBuf>) -> Result<Self> {
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if chain.contains(&canonical) {
            bail!("{}: include cycle", path.display());
        }

        let mut config: Config = match fs::read_to_string(path) {
            Ok(config_data) => match toml::from_str(&config_data) {
                Ok(config) => config,
                Err(err) => {
                    bail!("{}: failed to decode: {}", path.display(), err);
                }
            },
            Err(err) => {
                bail!("{}: failed to read: {}", path.display(), err);
            }
        };

        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));

        chain.push(canonical);
        let mut configs = mem::take(&mut config.include)
            .into_iter()
            .map(|include| Config::from_file_in_chain(&config_dir.join(include), chain))
            .collect::<Result<Vec<Config>>>()?;
        chain.pop();
        configs.push(config); // Put ourself last to ensure that it overwrites anything else.

        config = configs.remove(0);

        for other_config in configs {
            config.merge(other_config);
        }

        Ok(config)
    }

    pub fn merge(&mut self, other: Config) {
        let Config {
            include: _,
            general: other_general,
            user: other_user,
        } = other;

        self.general.merge(other_general);
        self.user.merge(other_user);
    }

    /// Pretty TOML of this config, without the password.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::Config;

    #[test]
    fn includes_are_overridden_by_including_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("base.toml"),
            r#"
[general]
executable = "/usr/sbin/pure-pw"

[user]
name = "alice"
password = "12345"
homedir = "/var/www"
unix_user = "www"
"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("alice.toml"),
            r#"
include = ["base.toml"]

[user]
homedir = "/srv/ftp/alice"
state = "absent"
"#,
        )
        .unwrap();

        let config = Config::from_file(&dir.path().join("alice.toml")).unwrap();
        assert!(config.include.is_empty());
        assert_eq!(config.general.executable.as_deref(), Some("/usr/sbin/pure-pw"));
        assert_eq!(config.user.name.as_deref(), Some("alice"));
        assert_eq!(config.user.unix_user.as_deref(), Some("www"));
        assert_eq!(config.user.homedir.as_deref(), Some("/srv/ftp/alice"));
        assert_eq!(config.user.state.as_deref(), Some("absent"));
    }

    #[test]
    fn include_cycles_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let own = dir.path().join("own.toml");
        fs::write(&own, "include = [\"own.toml\"]\n").unwrap();
        let err = Config::from_file(&own).unwrap_err();
        assert!(err.to_string().contains("include cycle"));

        fs::write(dir.path().join("a.toml"), "include = [\"b.toml\"]\n").unwrap();
        fs::write(dir.path().join("b.toml"), "include = [\"a.toml\"]\n").unwrap();
        let err = Config::from_file(&dir.path().join("a.toml")).unwrap_err();
        assert!(err.to_string().contains("include cycle"));
    }

    #[test]
    fn shared_include_is_not_a_cycle() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("base.toml"), "[user]\nname = \"alice\"\n").unwrap();
        fs::write(dir.path().join("left.toml"), "include = [\"base.toml\"]\n").unwrap();
        fs::write(
            dir.path().join("top.toml"),
            "include = [\"base.toml\", \"left.toml\"]\n[user]\nhomedir = \"/var/www\"\n",
        )
        .unwrap();

        let config = Config::from_file(&dir.path().join("top.toml")).unwrap();
        assert_eq!(config.user.name.as_deref(), Some("alice"));
        assert_eq!(config.user.homedir.as_deref(), Some("/var/www"));
    }

    #[test]
    fn user_alias_for_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.toml");
        fs::write(&path, "[user]\nuser = \"bob\"\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.user.name.as_deref(), Some("bob"));
    }

    #[test]
    fn unreadable_and_invalid_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let err = Config::from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("failed to read"));

        let invalid = dir.path().join("invalid.toml");
        fs::write(&invalid, "[user\n").unwrap();
        let err = Config::from_file(&invalid).unwrap_err();
        assert!(err.to_string().contains("failed to decode"));
    }

    #[test]
    fn dumped_config_omits_password() {
        let mut config = Config::default();
        config.user.name = Some("alice".to_string());
        config.user.password = Some("12345".to_string());
        config.general.check_mode = Some(true);

        let dumped = config.to_toml().unwrap();
        assert!(dumped.contains("alice"));
        assert!(!dumped.contains("12345"));

        let reparsed: Config = toml::from_str(&dumped).unwrap();
        assert_eq!(reparsed.general.check_mode, Some(true));
        assert_eq!(reparsed.user.password, None);
    }
}
