use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

// Use library instead of local modules
use vendor_directory::{
    export_vendors_csv, search, AppConfig, FacultyRecord, PageFetcher, RecordStore,
    SearchFilters, VendorRecord,
};

#[derive(Parser)]
#[command(name = "vendor-directory", version, about = "Inspect and search the vendor/faculty stores")]
struct Cli {
    /// Data directory (overrides VENDOR_DIR_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored vendor records
    Vendors,
    /// List stored faculty records
    Faculty,
    /// Search vendors with the same filters as GET /search
    Search {
        #[arg(long)]
        keyword: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        integrates_with: Option<String>,
        #[arg(long)]
        price_tier: Option<String>,
    },
    /// Export all vendor records as CSV
    Export {
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Fetch a page and print the draft vendor form
    Import { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to read configuration")?;
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }
    let store = RecordStore::new(&config.store);

    match cli.command {
        Commands::Vendors => {
            let (records, skipped) = store.load_all::<VendorRecord>()?;
            for record in &records {
                println!("{}", serde_json::to_string(record)?);
            }
            report_scan("vendor", records.len(), skipped);
        }
        Commands::Faculty => {
            let (records, skipped) = store.load_all::<FacultyRecord>()?;
            for record in &records {
                println!("{}", serde_json::to_string(record)?);
            }
            report_scan("faculty", records.len(), skipped);
        }
        Commands::Search {
            keyword,
            category,
            integrates_with,
            price_tier,
        } => {
            let filters = SearchFilters {
                keyword,
                category,
                integrates_with,
                price_tier,
            };
            let page = search(&store, &filters, config.free_results)?;
            for record in &page.visible {
                println!(
                    "{} - {} [{}] {}",
                    record.company_name, record.product_name, record.category, record.pricing_model
                );
            }
            if let Some(notice) = page.notice() {
                println!("{}", notice);
            }
        }
        Commands::Export { out } => {
            let mut records = store.read_all::<VendorRecord>()?;
            let count = export_vendors_csv(&out, records.by_ref())?;
            info!(path = %out.display(), rows = count, "export complete");
            report_scan("vendor", count, records.skipped());
        }
        Commands::Import { url } => {
            let fetcher = PageFetcher::new(config.fetch_timeout)?;
            let draft = fetcher.import_preview(&url).await?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
        }
    }

    Ok(())
}

fn report_scan(kind: &str, count: usize, skipped: usize) {
    println!("{} {} record(s)", count, kind);
    if skipped > 0 {
        println!("{} unparseable line(s) skipped", skipped);
    }
}
