#[macro_use]
extern crate slog;

use clap::{crate_version, value_t, App, Arg};
use kvmap::store::{DEFAULT_HOST, DEFAULT_PORT};
use kvmap::{Lookup, Namespace, StoreClient, StoreConfig, DEFAULT_MISS_MARKER, DEFAULT_NAMESPACE};
use slog::Drain;
use std::io;

fn main() -> kvmap::Result<()> {
    if let Err(e) = run_lookup() {
        // Print the Display message for any error.
        // Simply returning the error will print the Debug version, which is not as nice.
        eprintln!("{}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn run_lookup() -> kvmap::Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    let decorator = slog_term::PlainSyncDecorator::new(io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();

    let log = slog::Logger::root(drain, o!("version" => version));

    let default_port = DEFAULT_PORT.to_string();
    let matches = App::new(&[env!("CARGO_PKG_NAME"), "-lookup"].concat())
        .version(crate_version!())
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Print the stored value for every key read from stdin")
        .arg(
            Arg::with_name("namespace")
                .help("Prefix added to every key before it is looked up")
                .long("namespace")
                .takes_value(true)
                .value_name("PREFIX")
                .default_value(DEFAULT_NAMESPACE),
        )
        .arg(
            Arg::with_name("host")
                .help("Store host")
                .long("host")
                .takes_value(true)
                .value_name("HOST")
                .default_value(DEFAULT_HOST),
        )
        .arg(
            Arg::with_name("port")
                .help("Store port")
                .long("port")
                .takes_value(true)
                .value_name("PORT")
                .default_value(&default_port),
        )
        .arg(
            Arg::with_name("db")
                .help("Store database index")
                .long("db")
                .takes_value(true)
                .value_name("INDEX")
                .default_value("0"),
        )
        .arg(
            Arg::with_name("miss-marker")
                .help("Printed for keys without a value")
                .long("miss-marker")
                .takes_value(true)
                .value_name("TEXT")
                .default_value(DEFAULT_MISS_MARKER),
        )
        .get_matches();

    let config = StoreConfig {
        host: matches.value_of("host").unwrap_or(DEFAULT_HOST).to_owned(),
        port: value_t!(matches, "port", u16)?,
        db: value_t!(matches, "db", u32)?,
    };
    let namespace = Namespace::new(matches.value_of("namespace").unwrap_or(DEFAULT_NAMESPACE));
    let miss_marker = matches
        .value_of("miss-marker")
        .unwrap_or(DEFAULT_MISS_MARKER);

    info!(log, "Connecting to store"; "addr" => config.addr(), "db" => config.db);
    let mut store = StoreClient::connect(&config, log.clone())?;

    let lookup = Lookup::new(log, namespace, miss_marker);
    let stdin = io::stdin();
    let stdout = io::stdout();
    lookup.run(&mut stdin.lock(), &mut stdout.lock(), &mut store)?;

    Ok(())
}
