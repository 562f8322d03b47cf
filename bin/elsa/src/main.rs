use std::process;

use collector::HttpSubmitter;
use elsa::{Config, Poller, Result};
use log::{error, info, LevelFilter};
use mcu::CommandChannel;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    init_logger(config.verbose);

    if let Err(err) = run(config).await {
        error!("{err}");
        process::exit(1);
    }
}

async fn run(config: Config) -> Result<()> {
    let channel = CommandChannel::new(open_link(&config)?);

    let summary = match config.submitter()? {
        Some(submitter) => Poller::new(channel, submitter, &config).run().await?,
        None => {
            Poller::<_, HttpSubmitter>::polling_only(channel, &config)
                .run()
                .await?
        }
    };

    info!(
        "{} reading(s), {} submitted, {} failed",
        summary.readings.len(),
        summary.submitted.len(),
        summary.failed.len()
    );

    Ok(())
}

#[cfg(not(feature = "stub"))]
fn open_link(config: &Config) -> Result<mcu::Port> {
    config.check_port()?;

    let port = mcu::open(&config.port, config.baud_rate, mcu::READ_TIMEOUT)?;
    info!("opened {}", config.port.display());

    Ok(port)
}

#[cfg(feature = "stub")]
fn open_link(_config: &Config) -> Result<mcu::StubLink> {
    info!("using stub link");
    Ok(mcu::StubLink::healthy())
}

fn init_logger(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_timed_builder();

    builder.filter_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    builder.init();
}
