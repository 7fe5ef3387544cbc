use anyhow::Result;
use clap::Parser;
use housing_search::search::{self, Filters, RangeFilter, SearchResult, SortOrder};
use housing_search::{HttpListingSource, JsonFileSource, Listing, ListingSource};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Search a property listing catalog with free text and filter selections
#[derive(Debug, Parser)]
#[command(name = "housing-search", version, about)]
struct Cli {
    /// Free-text query, e.g. "2 bhk apartment in koramangala under 30k"
    query: Vec<String>,

    /// Catalog JSON file, or an http(s) URL serving one
    #[arg(long, env = "HOUSING_SEARCH_CATALOG")]
    catalog: String,

    /// Listing type filter (repeatable)
    #[arg(long = "listing-type")]
    listing_types: Vec<String>,

    /// Property type filter (repeatable)
    #[arg(long = "property-type")]
    property_types: Vec<String>,

    /// Furnishing filter (repeatable)
    #[arg(long = "furnishing")]
    furnishing_types: Vec<String>,

    /// Sharing filter for PG listings (repeatable)
    #[arg(long = "sharing")]
    sharing_types: Vec<String>,

    #[arg(long)]
    min_price: Option<f64>,

    #[arg(long)]
    max_price: Option<f64>,

    /// Minimum area in sqft
    #[arg(long)]
    min_area: Option<f64>,

    /// Maximum area in sqft
    #[arg(long)]
    max_area: Option<f64>,

    /// relevance, price-asc, price-desc or date
    #[arg(long, default_value_t = SortOrder::Relevance)]
    sort: SortOrder,

    /// Require exact equality on text fields
    #[arg(long)]
    strict: bool,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Also save the JSON result to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Show at most this many listings per result set
    #[arg(long, default_value_t = 20)]
    limit: usize,

    /// HTTP catalog timeout
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

impl Cli {
    fn filters(&self) -> Filters {
        Filters {
            listing_types: self.listing_types.clone(),
            property_types: self.property_types.clone(),
            furnishing_types: self.furnishing_types.clone(),
            sharing_types: self.sharing_types.clone(),
            price_range: RangeFilter::new(self.min_price, self.max_price),
            area_range: RangeFilter::new(self.min_area, self.max_area),
            strict: self.strict,
        }
    }

    fn source(&self) -> Result<Box<dyn ListingSource>> {
        if self.catalog.starts_with("http://") || self.catalog.starts_with("https://") {
            let timeout = Duration::from_secs(self.timeout_secs);
            Ok(Box::new(HttpListingSource::with_timeout(&self.catalog, timeout)?))
        } else {
            Ok(Box::new(JsonFileSource::new(&self.catalog)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let source = cli.source()?;
    info!("Loading catalog via {} source", source.source_name());
    let listings = source.fetch().await?;

    let query = cli.query.join(" ");
    let result = search::search(&listings, &query, &cli.filters(), cli.sort);

    info!(
        "{} exact and {} partial matches for {:?}",
        result.exact.len(),
        result.partial.len(),
        query
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result, cli.limit);
    }

    if let Some(path) = &cli.output {
        let json = serde_json::to_string_pretty(&result)?;
        tokio::fs::write(path, json).await?;
        info!("Saved result to {}", path.display());
    }

    Ok(())
}

fn print_result(result: &SearchResult<'_>, limit: usize) {
    println!("Exact matches: {}", result.exact.len());
    for (i, listing) in result.exact.iter().take(limit).enumerate() {
        print_listing(i + 1, listing);
    }

    if !result.partial.is_empty() {
        println!("Similar listings: {}", result.partial.len());
        for (i, listing) in result.partial.iter().take(limit).enumerate() {
            print_listing(i + 1, listing);
        }
    }

    if !result.nearby_locations.is_empty() {
        println!("Nearby: {}", result.nearby_locations.join(", "));
    }
}

fn print_listing(n: usize, listing: &Listing) {
    println!("{}. {} (Rs {})", n, listing.title, listing.price);
    let mut details = vec![listing.property_type.clone()];
    if let Some(bhk) = listing.bhk_label() {
        details.push(bhk);
    }
    if listing.area > 0.0 {
        details.push(format!("{} sqft", listing.area));
    }
    if !listing.furnishing.is_empty() {
        details.push(listing.furnishing.clone());
    }
    if let Some(sharing) = &listing.sharing {
        details.push(sharing.clone());
    }
    details.retain(|d| !d.is_empty());
    println!("   {}", details.join(", "));
    if !listing.location.is_empty() {
        println!("   Location: {}", listing.location);
    }
    if let Some(posted) = listing.posted_at {
        println!("   Posted: {}", posted.format("%Y-%m-%d"));
    }
    println!("   ID: {}", listing.id);
    println!();
}
