use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[default]
    Present,
    Absent,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Present => "present",
            Presence::Absent => "absent",
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Presence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Presence::Present),
            "absent" => Ok(Presence::Absent),
            other => Err(Error::Config(format!(
                "value of state must be one of: present, absent, got: {}",
                other
            ))),
        }
    }
}

/// Validated parameters for one virtual user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DesiredState {
    pub name: String,
    pub password: String,
    pub unix_user: Option<String>,
    pub unix_group: Option<String>,
    pub homedir: String,
    pub presence: Presence,
}

impl DesiredState {
    /// `-u`/`-g`/`-d` pairs for every attribute that has a value.
    pub(crate) fn attribute_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (flag, value) in [
            ("-u", self.unix_user.as_deref()),
            ("-g", self.unix_group.as_deref()),
            ("-d", Some(self.homedir.as_str())),
        ] {
            if let Some(value) = value.filter(|value| !value.is_empty()) {
                args.push(flag.to_string());
                args.push(value.to_string());
            }
        }
        args
    }

    /// Attributes to compare against a `show` report, keyed by report field.
    fn probes(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("UID", self.unix_user.as_deref()),
            ("GID", self.unix_group.as_deref()),
            ("Directory", Some(self.homedir.as_str())),
        ]
    }
}

/// Fields of a `pure-pw show` report.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActualState {
    pub fields: BTreeMap<String, String>,
}

impl ActualState {
    pub fn parse(report: &str) -> Self {
        let mut fields = BTreeMap::new();
        for line in report.lines() {
            // Lines without a separator are banners or blank padding
            if let Some((key, value)) = line.split_once(':') {
                fields.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        ActualState { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// True if a specified attribute is not contained in its report field.
    ///
    /// Containment rather than equality: `/var/www` is satisfied by a
    /// report of `/var/www/./` as well as by `/var/www2`.
    pub fn differs_from(&self, desired: &DesiredState) -> bool {
        desired.probes().iter().any(|(key, wanted)| match wanted {
            Some(wanted) if !wanted.is_empty() => self
                .get(key)
                .map_or(false, |actual| !actual.contains(wanted)),
            _ => false,
        })
    }
}
