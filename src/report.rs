use crate::{DesiredState, Error, Presence};

/// Result record printed for the caller, one per run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    pub name: String,
    pub state: Presence,
    pub homedir: String,
    pub unix_user: Option<String>,
    pub unix_group: Option<String>,
    pub changed: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rc: Option<i32>,
}

impl Report {
    pub fn new(desired: &DesiredState, outcome: &Result<bool, Error>) -> Self {
        let mut report = Report {
            name: desired.name.clone(),
            state: desired.presence,
            homedir: desired.homedir.clone(),
            unix_user: desired.unix_user.clone(),
            unix_group: desired.unix_group.clone(),
            changed: false,
            failed: false,
            msg: None,
            rc: None,
        };
        match outcome {
            Ok(changed) => report.changed = *changed,
            Err(err) => {
                report.failed = true;
                report.msg = Some(err.msg());
                report.rc = err.rc();
            }
        }
        report
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
