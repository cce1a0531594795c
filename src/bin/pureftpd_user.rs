extern crate pureftpd_user;

use std::path::Path;
use std::{env, fs, process};

use tracing_subscriber::EnvFilter;

use pureftpd_user::{
    cli_overrides, cli_parser, find_executable, Config, Reconciler, Report, SystemCommandRunner,
    TracingAuditSink,
};

// Only for errors raised before the user parameters are known
fn fail(msg: &str) -> ! {
    println!("{}", serde_json::json!({ "failed": true, "msg": msg }));
    process::exit(1);
}

fn print_report(report: &Report) {
    match report.to_json() {
        Ok(json) => println!("{}", json),
        Err(err) => fail(&format!("failed to encode result: {}", err)),
    }
    if report.failed {
        process::exit(1);
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut parser = cli_parser();
    parser.parse(env::args());

    let mut config = if let Some(path) = parser.get_opt("config") {
        match Config::from_file(Path::new(&path)) {
            Ok(config) => config,
            Err(err) => fail(&err.to_string()),
        }
    } else {
        Config::default()
    };

    // Command line takes priority over the config file
    config.merge(cli_overrides(&parser));

    // Just output merged config and exit
    if let Some(path) = parser.get_opt("output-config") {
        let written = config
            .to_toml()
            .and_then(|data| fs::write(&path, data).map_err(Into::into));
        if let Err(err) = written {
            fail(&format!("{}: failed to write config: {}", path, err));
        }
        return;
    }

    let check_mode = config.general.check_mode.unwrap_or(false);
    let desired = match config.user.validate() {
        Ok(desired) => desired,
        Err(err) => fail(&err.to_string()),
    };
    let executable = match find_executable(config.general.executable()) {
        Ok(executable) => executable,
        Err(err) => {
            tracing::error!("{}", err);
            return print_report(&Report::new(&desired, &Err(err)));
        }
    };

    let reconciler = Reconciler::new(executable, desired, SystemCommandRunner, TracingAuditSink)
        .with_check_mode(check_mode);
    let outcome = reconciler.reconcile();
    if let Err(err) = &outcome {
        tracing::error!("{}", err);
    }

    print_report(&Report::new(reconciler.desired(), &outcome));
}
