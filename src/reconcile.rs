use std::path::PathBuf;

use crate::{
    ActualState, AuditSink, CommandOutput, CommandRunner, DesiredState, Error, Presence, Result,
};

/// Forces `pure-pw` to write its database edit to disk.
const COMMIT_FLAG: &str = "-m";

/// Converges one virtual user towards a [`DesiredState`].
pub struct Reconciler<R, A> {
    executable: PathBuf,
    desired: DesiredState,
    runner: R,
    audit: A,
    check_mode: bool,
}

impl<R: CommandRunner, A: AuditSink> Reconciler<R, A> {
    pub fn new(executable: impl Into<PathBuf>, desired: DesiredState, runner: R, audit: A) -> Self {
        Reconciler {
            executable: executable.into(),
            desired,
            runner,
            audit,
            check_mode: false,
        }
    }

    /// Report what would change without running mutating commands.
    pub fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    pub fn desired(&self) -> &DesiredState {
        &self.desired
    }

    fn command(&self, subcommand: &str, extra: Vec<String>) -> Vec<String> {
        let mut args = vec![
            self.executable.display().to_string(),
            subcommand.to_string(),
            self.desired.name.clone(),
        ];
        args.extend(extra);
        args.push(COMMIT_FLAG.to_string());
        args
    }

    fn execute(&self, args: Vec<String>, stdin: Option<&str>) -> Result<CommandOutput> {
        self.audit.record(&args);
        self.runner.run(&args, stdin)
    }

    /// Raw `show` output; any non-zero exit is read as "no such user".
    pub fn query(&self) -> Result<CommandOutput> {
        self.execute(self.command("show", Vec::new()), None)
    }

    pub fn exists(&self) -> Result<bool> {
        Ok(self.query()?.success())
    }

    /// Current attributes of the user, parsed from a fresh `show` report.
    pub fn actual(&self) -> Result<ActualState> {
        Ok(ActualState::parse(&self.query()?.stdout))
    }

    pub fn needs_update(&self) -> Result<bool> {
        Ok(self.actual()?.differs_from(&self.desired))
    }

    fn require_password(&self) -> Result<()> {
        if self.desired.password.is_empty() {
            return Err(Error::MissingPassword {
                name: self.desired.name.clone(),
            });
        }
        Ok(())
    }

    pub fn create(&self) -> Result<CommandOutput> {
        self.require_password()?;
        let password = format!("{}\n{}", self.desired.password, self.desired.password);
        self.execute(
            self.command("useradd", self.desired.attribute_args()),
            Some(password.as_str()),
        )
    }

    pub fn modify(&self) -> Result<CommandOutput> {
        self.execute(self.command("usermod", self.desired.attribute_args()), None)
    }

    pub fn delete(&self) -> Result<CommandOutput> {
        self.execute(self.command("userdel", Vec::new()), None)
    }

    fn finish(&self, output: CommandOutput) -> Result<bool> {
        if output.success() {
            Ok(true)
        } else {
            Err(Error::CommandFailed {
                name: self.desired.name.clone(),
                msg: output.stderr,
                rc: output.rc,
            })
        }
    }

    /// Bring the user to the desired state, returning whether anything
    /// changed (or would change in check mode).
    pub fn reconcile(&self) -> Result<bool> {
        let name = &self.desired.name;
        let exists = self.exists()?;
        tracing::debug!(%name, exists, presence = %self.desired.presence, "reconciling");

        match (self.desired.presence, exists) {
            (Presence::Absent, false) => Ok(false),
            (Presence::Absent, true) => {
                if self.check_mode {
                    return Ok(true);
                }
                tracing::debug!(%name, "deleting");
                self.finish(self.delete()?)
            }
            (Presence::Present, false) => {
                self.require_password()?;
                if self.check_mode {
                    return Ok(true);
                }
                tracing::debug!(%name, "creating");
                self.finish(self.create()?)
            }
            (Presence::Present, true) => {
                if !self.needs_update()? {
                    return Ok(false);
                }
                if self.check_mode {
                    return Ok(true);
                }
                tracing::debug!(%name, "modifying");
                self.finish(self.modify()?)
            }
        }
    }
}
