//! Command-line front end: resolves quoted song or album titles in a text.

use std::path::{Path, PathBuf};

use clap::Parser;
use log::{debug, info};

use mentune::backends::fixture::FixtureCatalog;
use mentune::backends::web_catalog::WebCatalog;
use mentune::config::{self, Config};
use mentune::credentials;
use mentune::input::{read_bounded, read_bounded_from};
use mentune::report::format_result_set;
use mentune::{find_in_text, Error, MediaCatalog, MediaKind};

#[derive(Debug, Parser)]
#[command(
    name = "mentune",
    version,
    about = "Find song and album mentions in free-form text"
)]
struct Cli {
    /// Text file to scan. Reads stdin when omitted.
    file: Option<PathBuf>,
    /// Resolve album titles instead of song titles.
    #[arg(long)]
    albums: bool,
    /// Config file path. Defaults to the user config directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Offline JSON catalog used instead of the Web API.
    #[arg(long, value_name = "PATH")]
    catalog_fixture: Option<PathBuf>,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
    /// Save the catalog client secret to the system keyring and exit.
    #[arg(long, value_name = "SECRET")]
    store_secret: Option<String>,
}

fn init_logging(verbose: bool) {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Trace);
    clog.init();
    log::set_max_level(if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));
}

fn load_config(explicit_path: Option<&Path>) -> Result<Config, Error> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => config::default_config_path()
            .ok_or_else(|| Error::config("could not determine the user config directory"))?,
    };
    debug!("Loading config from {}", path.display());
    config::load_or_create(&path)
}

fn build_catalog(cli: &Cli, config: &Config) -> Result<Box<dyn MediaCatalog>, Error> {
    if let Some(fixture_path) = cli.catalog_fixture.as_deref() {
        info!("Using offline catalog fixture {}", fixture_path.display());
        return Ok(Box::new(FixtureCatalog::from_json_file(fixture_path)?));
    }
    let credentials = credentials::resolve_credentials(&config.catalog.client_id)?;
    Ok(Box::new(WebCatalog::new(&config.catalog, credentials)))
}

fn read_input(cli: &Cli, max_chars: usize) -> Result<String, Error> {
    match cli.file.as_deref() {
        Some(path) => read_bounded(path, max_chars),
        None => read_bounded_from(std::io::stdin().lock(), Path::new("<stdin>"), max_chars),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    if !cli.verbose {
        log::set_max_level(config.logging.level.to_filter());
    }

    if let Some(secret) = cli.store_secret.as_deref() {
        if config.catalog.client_id.is_empty() {
            return Err(Error::credentials(
                "set [catalog].client_id in config.toml before storing a secret",
            )
            .into());
        }
        credentials::set_client_secret(&config.catalog.client_id, secret)?;
        info!(
            "Stored catalog client secret for '{}' in the system keyring",
            config.catalog.client_id
        );
        return Ok(());
    }

    let catalog = build_catalog(&cli, &config)?;
    let text = read_input(&cli, config.input.max_chars)?;
    let kind = if cli.albums {
        MediaKind::Album
    } else {
        MediaKind::Song
    };

    let results = find_in_text(&text, catalog.as_ref(), kind).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", format_result_set(&results));
    }
    Ok(())
}
