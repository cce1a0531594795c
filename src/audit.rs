/// Receives every command line before it is run.
pub trait AuditSink {
    fn record(&self, args: &[String]);
}

impl<T: AuditSink + ?Sized> AuditSink for &T {
    fn record(&self, args: &[String]) {
        (**self).record(args)
    }
}

/// Logs command lines as `info` events under the `pureftpd_user` target.
#[derive(Clone, Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, args: &[String]) {
        tracing::info!(target: "pureftpd_user", "Command {}", args.join("|"));
    }
}
