use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use inky_amsat::config::{LocationSource, TimezoneSource};
use inky_amsat::prompt::Console;
use inky_amsat::{App, Client, Config, Error, Ink, PngPanel, ResponseCache};

#[derive(Parser)]
#[command(name = "inky-amsat")]
#[command(about = "Show the next amateur satellite pass on an Inky pHAT")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "INKY_AMSAT_CONFIG")]
    config: Option<PathBuf>,

    /// NORAD ID to look up, skipping the satellite menu
    #[arg(short, long)]
    norad: Option<String>,

    /// PNG file the panel frame is written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ink color of the panel (black or red)
    #[arg(long)]
    ink: Option<Ink>,

    /// Ask for latitude, longitude and altitude instead of using the configured station
    #[arg(long)]
    interactive_location: bool,

    /// Derive the timezone from the coordinates
    #[arg(long)]
    tz_lookup: bool,

    /// Do not read or write the response cache
    #[arg(long)]
    no_cache: bool,

    /// Give up after this many invalid answers to a prompt
    #[arg(long)]
    max_attempts: Option<u32>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = build_client(&config);
    let prompter = Console::stdio().with_max_attempts(config.prompt.max_attempts);
    let panel = PngPanel::new(
        config.display.output.clone(),
        config.display.width,
        config.display.height,
    );

    let mut app = App::new(&config, client, prompter, panel);
    match app.run(cli.norad) {
        Ok(layout) => {
            for line in &layout.lines {
                tracing::info!("{:>2} | {}", line.font_size, line.text);
            }
            ExitCode::SUCCESS
        }
        Err(e) => report(&e, &mut std::io::stdout()),
    }
}

/// Print the one-line diagnostic for a failed run and pick the exit code.
fn report<W: Write>(err: &Error, out: &mut W) -> ExitCode {
    let message = match err {
        Error::Unreachable(reason) => {
            tracing::debug!("{}", reason);
            "API Unreachable".to_string()
        }
        Error::InvalidAction(_) => "No valid action selected. Exiting.".to_string(),
        e => e.to_string(),
    };
    if let Err(e) = writeln!(out, "{}", message) {
        tracing::warn!("Failed to print diagnostic: {}", e);
    }
    ExitCode::FAILURE
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.display.output = output.clone();
    }
    if let Some(ink) = cli.ink {
        config.display.ink = ink;
    }
    if cli.interactive_location {
        config.location.source = LocationSource::Interactive;
    }
    if cli.tz_lookup {
        config.timezone.source = TimezoneSource::Lookup;
    }
    if cli.no_cache {
        config.cache.enabled = false;
    }
    if cli.max_attempts.is_some() {
        config.prompt.max_attempts = cli.max_attempts;
    }
    Ok(config)
}

fn build_client(config: &Config) -> Client {
    let client = Client::with_timeout(Duration::from_secs(config.api.timeout_secs))
        .with_base_url(config.api.base_url.clone());

    if config.cache.enabled {
        client.with_cache(ResponseCache::new(
            config.cache.path.clone(),
            config.cache.expire_after_secs,
        ))
    } else {
        client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reported(err: Error) -> (String, ExitCode) {
        let mut out = Vec::new();
        let code = report(&err, &mut out);
        (String::from_utf8(out).unwrap(), code)
    }

    #[test]
    fn test_unreachable_exits_with_failure() {
        let (out, code) = reported(Error::Unreachable("connection refused".into()));
        assert_eq!(out, "API Unreachable\n");
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_invalid_action_exits_with_failure() {
        let (out, code) = reported(Error::InvalidAction("4".into()));
        assert_eq!(out, "No valid action selected. Exiting.\n");
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_other_errors_print_their_message() {
        let err = Error::InputClosed("latitude".into());
        let expected = format!("{}\n", err);
        let (out, code) = reported(err);
        assert_eq!(out, expected);
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from(["inky-amsat", "--no-cache", "--ink", "red", "-o", "frame"]);
        let config = load_config(&cli).unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.display.ink, Ink::Red);
        assert_eq!(config.display.output, PathBuf::from("frame"));
    }
}
