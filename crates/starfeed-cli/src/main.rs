use std::{fs, sync::Arc};

use clap::Parser;
use cli::{Args, Commands};
use logging::setup_logging;
use progress::{spawn_event_handler, ProgressGuard};
use starfeed_config::{
    config::{self, generate_default_config, get_config, Config, CONFIG_PATH},
    error::ConfigError,
};
use starfeed_core::{error::FeedError, FeedResult};
use starfeed_db::SqliteStore;
use starfeed_events::{ChannelSink, EventSinkHandle, NullSink};
use starfeed_github::http_client::ClientConfig;
use starfeed_operations::{CancellationToken, FeedContext, FeedService};
use starfeed_utils::path::resolve_path;
use tracing::{debug, info, warn};
use ureq::Proxy;
use utils::{progress_enabled, COLOR, PROGRESS};

mod cli;
mod feed;
mod logging;
mod progress;
mod utils;

fn create_event_sink() -> (EventSinkHandle, Option<ProgressGuard>) {
    if progress_enabled() {
        let (sink, receiver) = ChannelSink::new();
        (Arc::new(sink), Some(spawn_event_handler(receiver)))
    } else {
        (Arc::new(NullSink), None)
    }
}

fn client_config(args: &Args) -> FeedResult<ClientConfig> {
    // Unset fields are filled from the config file.
    let mut client = ClientConfig {
        user_agent: args.user_agent.clone(),
        headers: None,
        proxy: None,
        timeout: None,
    };

    if let Some(proxy) = args.proxy.as_deref() {
        let proxy = Proxy::new(proxy).map_err(|err| {
            ConfigError::InvalidValue {
                field: "proxy",
                reason: err.to_string(),
            }
        })?;
        client.proxy = Some(proxy);
    }

    Ok(client)
}

fn print_config(default: bool) -> FeedResult<()> {
    if default {
        let doc = Config::default_config().to_annotated_document()?;
        info!("{doc}");
        return Ok(());
    }

    let config_path = CONFIG_PATH.read()?.to_path_buf();
    let content = match fs::read_to_string(&config_path) {
        Ok(v) => v,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("Config file {} not found", config_path.display());
            toml::to_string_pretty(&Config::default_config()).map_err(ConfigError::from)?
        }
        Err(err) => return Err(ConfigError::IoError(err).into()),
    };
    info!("{content}");
    Ok(())
}

async fn handle_cli() -> FeedResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        *COLOR.write()? = false;
    }

    if args.no_progress || args.json || args.quiet {
        *PROGRESS.write()? = false;
    }

    if let Some(ref c) = args.config {
        let path = resolve_path(c).map_err(ConfigError::from)?;
        *CONFIG_PATH.write()? = path;
    }

    match args.command {
        Commands::DefConfig => generate_default_config()?,
        Commands::Config { default } => print_config(default)?,
        ref command => {
            config::init()?;
            let config = get_config();

            let db_path = config.get_db_path()?;
            debug!(path = %db_path.display(), "opening feed cache");
            let store = SqliteStore::open(&db_path)?;

            let (events, progress_guard) = create_event_sink();
            let ctx = FeedContext::connect(config, client_config(&args)?, events)?;
            let service = FeedService::new(ctx, store);
            let cancel = CancellationToken::new();

            let result = match *command {
                Commands::Feed { page, per_page } => {
                    feed::show_feed(&service, &cancel, page, per_page).await
                }
                Commands::Refresh { per_page } => {
                    feed::refresh_feed(&service, &cancel, per_page).await
                }
                _ => Err(FeedError::Custom("unsupported command".into())),
            };

            // The service holds the event sender; drop it so the progress
            // thread sees the channel close.
            drop(service);
            if let Some(guard) = progress_guard {
                guard.finish();
            }
            progress::stop();

            result?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli().await {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
