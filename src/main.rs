use std::path::PathBuf;
use std::process::ExitCode;
use clap::{Parser, Subcommand};
use log::{debug, error, info};

use codeconv::{
  ConversionOutcome, ConversionState, ConverterBackend, ConverterConfig
, InputCollector, View
};

#[derive(Parser)]
#[command(
  name = "codeconv",
  about = "Turn a UI design into source code",
  long_about = "Sends a text description, a screenshot, or a Figma link \
    to the conversion service and prints the generated code.",
  arg_required_else_help = true
)]
struct Cli
{   #[command(subcommand)]
    input: Input
  , /// Service base URL (overrides config file and environment)
    #[arg(long)]
    api_base: Option<String>
  , /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>
  , /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>
  , /// Also copy the generated code into this file
    #[arg(short, long)]
    output: Option<PathBuf>
  , #[arg(
      long,
      default_value = "warn",
      value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    log_level: String
}

#[derive(Subcommand)]
enum Input
{   /// Describe the UI in plain words
    Text { description: String }
  , /// Upload an image of the UI
    Screenshot { path: PathBuf }
  , /// Point at a Figma design file
    Figma { url: String }
}

fn parse_level(log_level: &str) -> log::LevelFilter
{   match log_level
    {   "error" => log::LevelFilter::Error
      , "info" => log::LevelFilter::Info
      , "debug" => log::LevelFilter::Debug
      , "trace" => log::LevelFilter::Trace
      , _ => log::LevelFilter::Warn
    }
}

fn setup_logging(log_level_filter: log::LevelFilter)
{   env_logger::Builder::new()
      .filter_level(log_level_filter)
      .parse_default_env()
      .init();
}

/// File, then environment, then flags
fn load_config(cli: &Cli)
  -> Result<ConverterConfig, codeconv::error::Error>
{   let mut config = match &cli.config
    {   Some(path) => ConverterConfig::from_file(path)?
      , None => ConverterConfig::default()
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(base) = &cli.api_base
    {   config.api_base = base.clone();
    }
    if let Some(secs) = cli.timeout
    {   config.timeout_secs = Some(secs);
    }
    config.validate()?;
    Ok(config)
}

async fn run(
  cli: &Cli
, config: Result<ConverterConfig, codeconv::error::Error>
) -> Result<ConversionOutcome, codeconv::error::Error>
{   let config = config?;
    debug!("Using config {:?}", config);

    let request = match &cli.input
    {   Input::Text { description } => {
          InputCollector::text(description)?
        }
      , Input::Screenshot { path } => {
          InputCollector::screenshot_file(path).await?
        }
      , Input::Figma { url } => InputCollector::figma(url)?
    };

    let backend = ConverterBackend::new(config)?;
    let mut state_rx = backend.state();
    let mut reply_rx = backend.submit(request)?;

    let presenter = tokio::spawn(async move {
      while state_rx.changed().await.is_ok()
      {   let view = View::from_state(&state_rx.borrow_and_update());
          if view == View::Loading
          {   eprintln!("{}", view);
          }
      }
    });

    let outcome = reply_rx.recv().await.ok_or_else(|| {
      codeconv::error::Error::Other(
        "Backend dropped the reply".to_string()
      )
    })?;

    backend.shutdown().await?;
    let _ = presenter.await;
    Ok(outcome)
}

#[tokio::main]
async fn main() -> ExitCode
{   let cli = Cli::parse();
    let config = load_config(&cli);
    let requested = parse_level(&cli.log_level);
    setup_logging(match &config
    {   Ok(config) => config.log_level(requested)
      , Err(_) => requested
    });

    let outcome = run(&cli, config).await
      .unwrap_or_else(ConversionOutcome::from);

    let view = View::from_state(&ConversionState::Resolved(outcome));
    println!("{}", view);

    match (&view, &cli.output)
    {   (View::Code(_), Some(path)) => {
          let written = std::fs::File::create(path)
            .and_then(|mut file| view.copy_code(&mut file));
          match written
          {   Ok(_) => {
                info!("Code copied to {}", path.display());
                eprintln!("Code copied to {}", path.display());
                ExitCode::SUCCESS
              }
            , Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                ExitCode::FAILURE
              }
          }
        }
      , (View::Code(_), None) => ExitCode::SUCCESS
      , _ => ExitCode::FAILURE
    }
}
