use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use research_player::Config;
use research_player::player::classify::{classify, parse_source_url};
use research_player::player::{PlatformCapabilities, StaticCapabilities, StreamingClassification};
use research_player::utils::errors::PlaybackError;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Profile {
    /// Native HLS plus Apple containers
    Safari,
    /// Media Source Extensions, no native HLS
    Chromium,
    /// No native support at all
    Bare,
}

impl Profile {
    fn capabilities(self) -> StaticCapabilities {
        match self {
            Profile::Safari => StaticCapabilities::safari(),
            Profile::Chromium => StaticCapabilities::chromium(),
            Profile::Bare => StaticCapabilities::bare(),
        }
    }
}

/// Shows which playback pathway a video URL would take on a platform.
#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
    /// Video URL to classify
    url: String,

    /// Platform to simulate
    #[arg(short, long, value_enum, default_value = "chromium")]
    profile: Profile,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ProbeReport {
    url: String,
    profile: String,
    classification: Option<String>,
    pathway: Option<String>,
    error: Option<String>,
    session_options: Option<research_player::config::StreamingConfig>,
}

fn probe(args: &Args, config: &Config) -> ProbeReport {
    let capabilities = args.profile.capabilities();
    let mut report = ProbeReport {
        url: args.url.clone(),
        profile: format!("{:?}", args.profile).to_lowercase(),
        classification: None,
        pathway: None,
        error: None,
        session_options: None,
    };

    let url = match parse_source_url(&args.url) {
        Ok(url) => url,
        Err(e) => {
            report.error = Some(e.to_string());
            return report;
        }
    };

    let classification = classify(&url, &capabilities);
    report.classification = Some(format!("{:?}", classification));

    if let StreamingClassification::Progressive { mime } = classification
        && !capabilities.supports_container(mime).is_supported()
    {
        report.error = Some(PlaybackError::UnsupportedFormat(mime.to_string()).to_string());
        return report;
    }

    if classification == StreamingClassification::LibraryHls {
        report.session_options = Some(config.streaming.clone());
    }
    report.pathway = Some(classification.pathway().to_string());
    report
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("research_player=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // read-only: a missing config file is not created
    let config = match Config::load_existing() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            warn!("Failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };

    info!("Probing {} as {:?}", args.url, args.profile);
    let report = probe(&args, &config);

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
        return Ok(());
    }

    println!("url:            {}", report.url);
    println!("profile:        {}", report.profile);
    if let Some(classification) = &report.classification {
        println!("classification: {}", classification);
    }
    if let Some(pathway) = &report.pathway {
        println!("pathway:        {}", pathway);
    }
    if let Some(options) = &report.session_options {
        println!(
            "session:        worker={} low_latency={} back_buffer={}s credentials={}",
            options.enable_worker,
            options.low_latency_mode,
            options.back_buffer_length_secs,
            options.with_credentials
        );
    }
    if let Some(error) = &report.error {
        println!("error:          {}", error);
        std::process::exit(1);
    }

    Ok(())
}
