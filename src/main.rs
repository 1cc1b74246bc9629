//! Pokedex - A command-line PokeAPI explorer
//!
//! Interactive REPL over the PokeAPI with a time-expiring response cache.

use std::io::{self, Write};
use std::ops::ControlFlow;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pokedex::repl::clean_input;
use pokedex::{Cache, Command, Config, PokeClient, Session};

/// Main entry point for the Pokedex REPL.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Create the response cache, which starts its reaper
/// 4. Run the prompt loop until `exit` or end of input
/// 5. Stop the reaper before returning
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokedex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    info!(
        api_base_url = %config.api_base_url,
        cache_interval = config.cache_interval,
        http_timeout = config.http_timeout,
        "Configuration loaded"
    );

    let cache = Cache::new(config.cache_interval()).context("Failed to create response cache")?;
    let client = PokeClient::new(&config, cache.clone()).context("Failed to create HTTP client")?;
    let mut session = Session::new(client);

    let result = run(&mut session).await;

    cache.shutdown().await;
    info!("Pokedex closed");
    result
}

/// Reads commands from stdin until `exit` or end of input.
async fn run(session: &mut Session) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = io::stdout();

    loop {
        write!(stdout, "Pokedex > ")?;
        stdout.flush()?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            writeln!(stdout)?;
            break;
        };

        let words = clean_input(&line);
        if words.is_empty() {
            writeln!(stdout, "Please enter a command.")?;
            continue;
        }

        let outcome = match Command::parse(&words) {
            Ok(command) => session.execute(command, &mut stdout).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(ControlFlow::Break(())) => break,
            Ok(ControlFlow::Continue(())) => {}
            Err(err) => {
                debug!(error = %err, "Command failed");
                writeln!(stdout, "{}", err)?;
            }
        }
    }

    Ok(())
}
