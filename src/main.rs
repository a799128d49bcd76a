//! Command-line front end.
//!
//! Runs one filtered search against the configured provider, optionally
//! loads further pages, and prints the rendered list:
//!
//! ```text
//! dishlist --config dishlist.toml --canteen XueYi --max-price 10 --pages 3
//! ```
//!
//! Failures the list recovers from are printed to stderr as notices; only
//! configuration problems end the process with an error.

use clap::Parser;
use dishlist::observability::init_tracing;
use dishlist::ui::render;
use dishlist::{
    Canteen, CategoryId, Config, DishlistError, Flavor, Outcome, PriceRange, Query,
};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dishlist", version, about = "Search the canteen dish list")]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Free-text dish name filter (fuzzy, space-separated terms).
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    canteen: Option<Canteen>,

    #[arg(long)]
    flavor: Option<Flavor>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    min_price: Option<u32>,

    #[arg(long)]
    max_price: Option<u32>,

    /// Upper calorie bound in kcal.
    #[arg(long)]
    max_calorie: Option<u32>,

    /// Upper wait time bound in minutes.
    #[arg(long)]
    max_wait: Option<u32>,

    /// Required ingredient; repeat for several.
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,

    /// Number of pages to load.
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Disable match highlighting.
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn query(&self) -> Query {
        let price = match (self.min_price, self.max_price) {
            (None, None) => None,
            (min, max) => Some(PriceRange::new(min.unwrap_or(0), max.unwrap_or(u32::MAX))),
        };

        Query {
            name: self.name.clone(),
            category: self.category.clone().map(CategoryId),
            canteen: self.canteen,
            flavor: self.flavor,
            price,
            max_calorie: self.max_calorie,
            max_wait_time: self.max_wait,
            ingredients: self.ingredients.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), DishlistError> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    init_tracing(&config);

    let session = dishlist::initialize(&config)?;

    let mut outcome = session.set_filter(cli.query()).await;
    for _ in 1..cli.pages {
        if !outcome.is_applied() {
            break;
        }
        outcome = session.load_more().await;
    }
    tracing::debug!(?outcome, "done loading");

    let color = !cli.no_color && std::io::stdout().is_terminal();
    print!("{}", render(&session.view(), color));

    for notice in session.take_notices() {
        eprintln!("[{}] {}", notice.at.format("%H:%M:%S"), notice.message());
    }

    match outcome {
        Outcome::Failed(error) if session.snapshot().items.is_empty() => {
            Err(DishlistError::Provider(error))
        }
        _ => Ok(()),
    }
}
