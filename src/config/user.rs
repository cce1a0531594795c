use crate::{DesiredState, Error, Presence, Result};

/// Parameters for one virtual user as they arrive from a config file or the
/// command line, before validation.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UserConfig {
    #[serde(alias = "user")]
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub unix_user: Option<String>,
    pub unix_group: Option<String>,
    pub homedir: Option<String>,
    pub state: Option<String>,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config(format!(
            "missing required arguments: {}",
            field
        ))),
    }
}

impl UserConfig {
    pub fn merge(&mut self, other: UserConfig) {
        let UserConfig {
            name,
            password,
            unix_user,
            unix_group,
            homedir,
            state,
        } = other;

        self.name = name.or(self.name.take());
        self.password = password.or(self.password.take());
        self.unix_user = unix_user.or(self.unix_user.take());
        self.unix_group = unix_group.or(self.unix_group.take());
        self.homedir = homedir.or(self.homedir.take());
        self.state = state.or(self.state.take());
    }

    pub fn validate(self) -> Result<DesiredState> {
        let name = required(self.name, "name")?;
        // Must be given even for state=absent, but may be empty
        let password = self
            .password
            .ok_or_else(|| Error::Config("missing required arguments: password".to_string()))?;
        let homedir = required(self.homedir, "homedir")?;
        let presence = match self.state.as_deref() {
            None | Some("") => Presence::default(),
            Some(state) => state.parse()?,
        };

        Ok(DesiredState {
            name,
            password,
            unix_user: self.unix_user.filter(|value| !value.is_empty()),
            unix_group: self.unix_group.filter(|value| !value.is_empty()),
            homedir,
            presence,
        })
    }
}

#[cfg(test)]
mod test {
    use super::UserConfig;
    use crate::Presence;

    fn alice() -> UserConfig {
        UserConfig {
            name: Some("alice".to_string()),
            password: Some("12345".to_string()),
            unix_user: Some("www".to_string()),
            unix_group: Some(String::new()),
            homedir: Some("/var/www".to_string()),
            state: None,
        }
    }

    #[test]
    fn validate_defaults_to_present() {
        let desired = alice().validate().unwrap();
        assert_eq!(desired.name, "alice");
        assert_eq!(desired.presence, Presence::Present);
        assert_eq!(desired.unix_user.as_deref(), Some("www"));
        assert_eq!(desired.unix_group, None);
    }

    #[test]
    fn validate_requires_name_homedir_and_password() {
        let mut config = alice();
        config.name = None;
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "missing required arguments: name"
        );

        let mut config = alice();
        config.homedir = Some(String::new());
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "missing required arguments: homedir"
        );

        let mut config = alice();
        config.password = None;
        config.state = Some("absent".to_string());
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "missing required arguments: password"
        );
    }

    #[test]
    fn validate_accepts_empty_password() {
        let mut config = alice();
        config.password = Some(String::new());
        assert!(config.validate().unwrap().password.is_empty());
    }

    #[test]
    fn validate_rejects_unknown_state() {
        let mut config = alice();
        config.state = Some("disabled".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn merge_overrides_only_set_fields() {
        let mut config = alice();
        config.merge(UserConfig {
            homedir: Some("/srv/ftp".to_string()),
            state: Some("absent".to_string()),
            ..Default::default()
        });
        assert_eq!(config.name.as_deref(), Some("alice"));
        assert_eq!(config.homedir.as_deref(), Some("/srv/ftp"));
        assert_eq!(config.state.as_deref(), Some("absent"));
    }
}
