/*!
 * indexd-manifest CLI
 *
 * Builds an indexd manifest TSV from a file containing one S3 URI per
 * line. Every object is probed for its metadata size and streamed
 * through MD5; the manifest is written atomically only when every line
 * succeeds, and any failure exits non-zero with the full failure set.
 */

use clap::Parser;
use indexd_manifest::{
    generate_manifest, logging, ManifestConfig, ManifestError, Result, S3Store, S3StoreConfig,
    DEFAULT_WORKERS, EXIT_SUCCESS,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "indexd-manifest")]
#[command(
    version,
    about = "Build an indexd manifest TSV from a file of S3 URIs",
    long_about = None
)]
struct Cli {
    /// Path to a text file containing one S3 URI per line
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: PathBuf,

    /// Path where the manifest TSV will be written
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: PathBuf,

    /// Authz value for every row, e.g. /programs/MMRF/projects/DISCOVERY
    #[arg(long = "authz", value_name = "SCOPE")]
    authz: String,

    /// Parallel workers for the S3 metadata/MD5 fetch
    #[arg(long, default_value_t = DEFAULT_WORKERS, value_name = "N")]
    workers: usize,

    /// Optional AWS profile name
    #[arg(long, value_name = "NAME")]
    profile: Option<String>,

    /// Optional AWS region override
    #[arg(long, value_name = "REGION")]
    region: Option<String>,

    /// Skip the first non-empty input line if it is a header
    #[arg(long = "skip-header")]
    skip_header: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl From<Cli> for ManifestConfig {
    fn from(cli: Cli) -> Self {
        ManifestConfig {
            input: cli.input,
            output: cli.output,
            authz: cli.authz,
            workers: cli.workers,
            profile: cli.profile,
            region: cli.region,
            skip_header: cli.skip_header,
            verbose: cli.verbose,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

#[tokio::main]
async fn run() -> Result<()> {
    let config = ManifestConfig::from(Cli::parse());
    config.validate()?;
    logging::init_logging(config.verbose)?;

    let store = S3Store::new(S3StoreConfig {
        profile: config.profile.clone(),
        region: config.region.clone(),
        ..Default::default()
    })
    .await
    .map_err(|e| ManifestError::Config(format!("Failed to build S3 client: {}", e)))?;

    let outcome = generate_manifest(&config, Arc::new(store)).await?;

    if !outcome.is_success() {
        return Err(ManifestError::RunFailed {
            failed: outcome.failures.len(),
            total: outcome.total(),
        });
    }

    println!(
        "Wrote {} manifest rows to {}",
        outcome.rows.len(),
        config.output.display()
    );
    Ok(())
}
