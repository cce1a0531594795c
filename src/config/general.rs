/// Default name of the Pure-FTPd user database tool.
pub const DEFAULT_EXECUTABLE: &str = "pure-pw";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub check_mode: Option<bool>,
    // Bare names are looked up on PATH
    pub executable: Option<String>,
}

impl GeneralConfig {
    pub fn merge(&mut self, other: GeneralConfig) {
        self.check_mode = other.check_mode.or(self.check_mode);
        self.executable = other.executable.or(self.executable.take());
    }

    pub fn executable(&self) -> &str {
        self.executable.as_deref().unwrap_or(DEFAULT_EXECUTABLE)
    }
}
