use arg_parser::ArgParser;

use crate::Config;

/// Options understood by the `pureftpd_user` binary.
pub fn cli_parser() -> ArgParser {
    ArgParser::new(11)
        .add_opt("c", "config")
        .add_opt("o", "output-config")
        .add_opt("n", "name")
        .add_opt("", "user")
        .add_opt("p", "password")
        .add_opt("u", "unix-user")
        .add_opt("g", "unix-group")
        .add_opt("d", "homedir")
        .add_opt("s", "state")
        .add_opt("", "executable")
        .add_flag(&["check"])
}

/// Settings given on the command line, as a layer to merge over the config file.
pub fn cli_overrides(parser: &ArgParser) -> Config {
    let mut overrides = Config::default();
    overrides.user.name = parser.get_opt("name").or_else(|| parser.get_opt("user"));
    overrides.user.password = parser.get_opt("password");
    overrides.user.unix_user = parser.get_opt("unix-user");
    overrides.user.unix_group = parser.get_opt("unix-group");
    overrides.user.homedir = parser.get_opt("homedir");
    overrides.user.state = parser.get_opt("state");
    overrides.general.executable = parser.get_opt("executable");
    if parser.found("check") {
        overrides.general.check_mode = Some(true);
    }
    overrides
}
