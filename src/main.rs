use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use listing_harvester::criteria::CITIES;
use listing_harvester::merge::default_output;
use listing_harvester::{
    merge_files, site_for, FailurePolicy, HarvestConfig, HarvestReport, Harvester, HttpFetcher,
    LogProgress, MarketType, SearchCriteria,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "listing-harvester")]
#[command(about = "Harvest classified listings into CSV")]
struct Cli {
    /// JSON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip listings whose detail page cannot be fetched instead of stopping
    #[arg(long, global = true)]
    skip_failed_listings: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Passenger cars from otomoto.pl
    Vehicles {
        /// Brand slug, e.g. `audi`
        brand: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
        #[arg(long, short, default_value = "vehicles.csv")]
        output: PathBuf,
    },

    /// Apartments for sale from otodom.pl
    Housing {
        /// City slug, e.g. `krakow`; omit with --all-cities
        #[arg(required_unless_present = "all_cities")]
        city: Option<String>,
        /// primary|secondary (pierwotny|wtorny)
        #[arg(long)]
        market: Option<MarketType>,
        #[arg(long, default_value_t = 24)]
        limit: u32,
        #[arg(long, default_value_t = 1)]
        pages: u32,
        /// Harvest every known city into `d_<city>.csv`, then merge
        #[arg(long, conflicts_with = "city")]
        all_cities: bool,
        #[arg(long, short, default_value = "housing.csv")]
        output: PathBuf,
    },

    /// IT job postings from nofluffjobs.com
    Jobs {
        /// Category slug, e.g. `backend`
        category: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
        #[arg(long, short, default_value = "jobs.csv")]
        output: PathBuf,
    },

    /// Concatenate CSV files sharing one header
    Merge {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Defaults to `<first input>_merged.csv`
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn load_config(cli: &Cli) -> Result<HarvestConfig> {
    let mut config = match &cli.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    };
    if cli.skip_failed_listings {
        config.failure_policy = FailurePolicy::SkipListing;
    }
    Ok(config)
}

fn harvest(
    fetcher: &HttpFetcher,
    config: &HarvestConfig,
    criteria: &SearchCriteria,
    pages: u32,
    output: &Path,
) -> Result<HarvestReport> {
    let site = site_for(criteria);
    Harvester::new(fetcher, site.as_ref())
        .failure_policy(config.failure_policy)
        .harvest_to_file(criteria, pages, output, &mut LogProgress::default())
        .with_context(|| format!("harvest into {} failed", output.display()))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let fetcher = HttpFetcher::new(&config.fetch);

    let report = match cli.command {
        Commands::Vehicles { brand, pages, output } => {
            harvest(&fetcher, &config, &SearchCriteria::Vehicles { brand }, pages, &output)?
        }
        Commands::Jobs { category, pages, output } => {
            harvest(&fetcher, &config, &SearchCriteria::Jobs { category }, pages, &output)?
        }
        Commands::Housing {
            city,
            market,
            limit,
            pages,
            all_cities,
            output,
        } => {
            if !all_cities {
                let Some(city) = city else {
                    bail!("a city is required without --all-cities");
                };
                let criteria = SearchCriteria::Housing { market, city, limit };
                harvest(&fetcher, &config, &criteria, pages, &output)?
            } else {
                let dir = output.parent().unwrap_or_else(|| Path::new(""));
                if CITIES.iter().any(|city| dir.join(format!("d_{}.csv", city)) == output) {
                    bail!("{} is one of the per-city files; choose another output", output.display());
                }
                let mut total = HarvestReport::default();
                let mut files = Vec::with_capacity(CITIES.len());
                for city in CITIES {
                    let file = dir.join(format!("d_{}.csv", city));
                    let criteria = SearchCriteria::Housing {
                        market,
                        city: city.to_string(),
                        limit,
                    };
                    let report = harvest(&fetcher, &config, &criteria, pages, &file)?;
                    info!(city, rows = report.rows_written, "city done");
                    total.pages += report.pages;
                    total.listings += report.listings;
                    total.rows_written += report.rows_written;
                    total.skipped += report.skipped;
                    total.elapsed += report.elapsed;
                    files.push(file);
                }
                merge_files(&files, &output).context("merging city files failed")?;
                total
            }
        }
        Commands::Merge { inputs, output } => {
            let output = match output.or_else(|| default_output(&inputs)) {
                Some(path) => path,
                None => bail!("cannot derive an output name from the inputs"),
            };
            let rows = merge_files(&inputs, &output)?;
            println!("Merged {} rows into {}", rows, output.display());
            return Ok(());
        }
    };

    println!("{}", report);
    Ok(())
}
