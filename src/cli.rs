use clap::{command, Arg, ArgAction, Command, ValueHint};

pub fn build_command() -> Command {
    command!().args([
        Arg::new("api_key")
            .short('k')
            .long("api-key")
            .alias("key")
            .required(false)
            .value_hint(ValueHint::FilePath)
            .value_name("PATH")
            .help("Path to a file containing a Steam API key. Defaults to $STEAM_API_KEY."),
        Arg::new("config")
            .short('c')
            .long("config-file")
            .alias("config")
            .required(false)
            .value_hint(ValueHint::FilePath)
            .value_name("PATH")
            .help("Path to the YAML config file."),
        Arg::new("listen")
            .short('l')
            .long("listen")
            .required(false)
            .value_name("ADDR")
            .help("Address the web server binds to, e.g. 127.0.0.1:8080."),
        Arg::new("cache")
            .long("cache")
            .required(false)
            .value_parser(["none", "file", "sqlite"])
            .help("Where resolved Steam IDs are cached."),
        Arg::new("cache_path")
            .long("cache-path")
            .required(false)
            .value_hint(ValueHint::FilePath)
            .value_name("PATH")
            .help("Cache file or SQLite database path."),
        Arg::new("user")
            .short('u')
            .long("user")
            .required(false)
            .value_name("VANITY-NAME")
            .help("Print one user's library instead of starting the web server."),
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Log outbound requests."),
    ])
}
