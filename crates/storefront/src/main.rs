use anyhow::Context;
use clap::{Parser, Subcommand};

use refurb_cart::CheckoutOutcome;
use refurb_catalog::{CategorySelector, HttpCatalogSource};
use refurb_storefront::{Storefront, StorefrontConfig, render};

#[derive(Parser)]
#[command(name = "refurbtech")]
#[command(version)]
#[command(about = "Browse and buy refurbished electronics", long_about = None)]
struct Cli {
    /// Catalog JSON URL (overrides REFURB_CATALOG_URL)
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Landing page: featured products and category cards
    Home,
    /// Shop page, optionally filtered to one category
    Shop {
        /// Category tag (Laptop, Tablet, Mobile, Accessory) or a query string
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add the first available products to a cart and check out
    DemoCart {
        /// How many distinct products to add
        #[arg(short, long, default_value_t = 2)]
        items: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    refurb_observability::init();

    let cli = Cli::parse();
    let mut config = StorefrontConfig::from_env();
    if let Some(url) = cli.catalog_url {
        config = config.with_catalog_url(url);
    }

    let deep_link = match &cli.command {
        Commands::Shop { category } => category.clone().unwrap_or_default(),
        _ => String::new(),
    };

    let mut storefront = Storefront::from_config(&config, &deep_link);
    let source = HttpCatalogSource::new(&config.catalog_url, config.http_timeout)
        .context("failed to set up catalog source")?;

    if let Err(err) = storefront.load_catalog(&source).await {
        tracing::error!(%err, "catalog unavailable");
        eprint!("{}", render::shop(&storefront.shop_view()));
        std::process::exit(1);
    }

    match cli.command {
        Commands::Home => print!("{}", render::landing(&storefront.landing_view())),
        Commands::Shop { .. } => print!("{}", render::shop(&storefront.shop_view())),
        Commands::DemoCart { items } => {
            storefront.select_category(CategorySelector::All);
            let picks: Vec<String> = storefront
                .shop_view()
                .products
                .iter()
                .filter(|card| card.can_add_to_cart())
                .take(items)
                .map(|card| card.product.id().to_string())
                .collect();

            for (i, product_id) in picks.iter().enumerate() {
                storefront.drafts_mut().set(product_id, (i + 1) as i64);
                storefront
                    .add_to_cart(product_id)
                    .await
                    .with_context(|| format!("failed to add {product_id}"))?;
            }

            print!("{}", render::cart(&storefront.cart_view().await));
            println!("Processing...");

            match storefront.checkout().await? {
                CheckoutOutcome::Completed(receipt) => print!("{}", render::receipt(&receipt)),
                CheckoutOutcome::Suppressed => println!("Checkout already in progress"),
            }
        }
    }

    Ok(())
}
