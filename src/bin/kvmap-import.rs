#[macro_use]
extern crate slog;

use clap::{crate_version, value_t, App, Arg};
use kvmap::store::{DEFAULT_HOST, DEFAULT_PORT};
use kvmap::{Importer, MalformedPolicy, Namespace, StoreClient, StoreConfig, DEFAULT_NAMESPACE};
use slog::Drain;
use std::io;
use std::path::Path;

const DEFAULT_MAPPING_FILE: &str = "/usr/local/apache2/conf.d/foomap.txt";

fn main() -> kvmap::Result<()> {
    if let Err(e) = run_import() {
        // Print the Display message for any error.
        // Simply returning the error will print the Debug version, which is not as nice.
        eprintln!("{}", e);
        std::process::exit(1)
    }
    Ok(())
}

fn run_import() -> kvmap::Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    let decorator = slog_term::PlainSyncDecorator::new(io::stderr());
    let drain = slog_term::FullFormat::new(decorator).build().fuse();

    let log = slog::Logger::root(drain, o!("version" => version));

    let default_port = DEFAULT_PORT.to_string();
    let matches = App::new(&[env!("CARGO_PKG_NAME"), "-import"].concat())
        .version(crate_version!())
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Load a source/target mapping file into the store")
        .arg(
            Arg::with_name("file")
                .help("Mapping file, one `source target` pair per line")
                .long("file")
                .takes_value(true)
                .value_name("PATH")
                .default_value(DEFAULT_MAPPING_FILE),
        )
        .arg(
            Arg::with_name("namespace")
                .help("Prefix added to every source before it is stored")
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
            Arg::with_name("strict")
                .help("Stop at the first malformed line instead of skipping it")
                .long("strict"),
        )
        .get_matches();

    let config = StoreConfig {
        host: matches.value_of("host").unwrap_or(DEFAULT_HOST).to_owned(),
        port: value_t!(matches, "port", u16)?,
        db: value_t!(matches, "db", u32)?,
    };
    let file = Path::new(matches.value_of("file").unwrap_or(DEFAULT_MAPPING_FILE));
    let namespace = Namespace::new(matches.value_of("namespace").unwrap_or(DEFAULT_NAMESPACE));
    let policy = if matches.is_present("strict") {
        MalformedPolicy::Abort
    } else {
        MalformedPolicy::Skip
    };

    info!(log, "Connecting to store"; "addr" => config.addr(), "db" => config.db);
    let mut store = StoreClient::connect(&config, log.clone())?;

    let importer = Importer::new(log, namespace, policy);
    let stdout = io::stdout();
    importer.import_file(file, &mut store, &mut stdout.lock())?;

    Ok(())
}
