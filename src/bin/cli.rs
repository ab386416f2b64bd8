use std::{collections::HashSet, path::PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use env_logger::Env;
use glassbox::{
    configuration::get_configuration,
    dal::company_db,
    services::{
        failure_report, post_process, read_tsv_file, scrape_companies, write_tsv_file, Fetcher,
    },
};
use sqlx::postgres::PgPoolOptions;

#[derive(Parser)]
#[command(name = "glassbox-cli")]
#[command(about = "Scrape company overviews into TSV files and load them into the store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every company listed (one per line) in the input file
    Scrape {
        #[arg(short, long, default_value = "companies_input.txt")]
        input: PathBuf,

        /// Replay pages from the content cache instead of the network
        #[arg(short = 'c', long)]
        use_cache: bool,

        /// Stop after this many input names
        #[arg(short = 'n', long)]
        n_companies: Option<usize>,

        #[arg(long, default_value = "companies_output_raw.tsv")]
        raw_output: PathBuf,

        #[arg(short, long, default_value = "companies_output_post.tsv")]
        output: PathBuf,
    },
    /// Upsert every row of a normalized TSV into the store
    Load {
        #[arg(short, long, default_value = "companies_output_post.tsv")]
        input: PathBuf,

        /// Leave companies that are already stored untouched
        #[arg(long)]
        skip_existing: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let configuration = get_configuration().context("Failed to read configuration.")?;

    match cli.command {
        Commands::Scrape {
            input,
            use_cache,
            n_companies,
            raw_output,
            output,
        } => {
            let content = std::fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let names: Vec<String> = content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();

            let mut settings = configuration.scraper;
            settings.use_cache = settings.use_cache || use_cache;
            let fetcher = Fetcher::new(&settings)?;

            let mut outcome = scrape_companies(&fetcher, &names, &HashSet::new(), n_companies).await;

            write_tsv_file(&outcome.companies, &raw_output)?;
            post_process(&mut outcome.companies);
            write_tsv_file(&outcome.companies, &output)?;

            if !outcome.failures.is_empty() {
                println!("{}", failure_report(&outcome.failures));
            }
        }
        Commands::Load {
            input,
            skip_existing,
        } => {
            let companies = read_tsv_file(&input)?;
            let pool = PgPoolOptions::new()
                .max_connections(2)
                .connect_with(configuration.database.with_db())
                .await
                .context("Failed to connect to the database.")?;

            for company in companies.iter() {
                match company_db::upsert_company(&pool, company, skip_existing).await? {
                    true => log::info!("[WRITE] {}", company.id()),
                    false => log::info!("[SKIP] {}", company.id()),
                }
            }

            pool.close().await;
        }
    }

    Ok(())
}
