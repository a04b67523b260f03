//! Seed the catalog from a YAML file.
//!
//! Products whose slug already exists are skipped, so seeding twice is safe.
//!
//! # File format
//!
//! ```yaml
//! products:
//!   - name: Polo Sporting Stretch Shirt
//!     slug: polo-sporting-stretch-shirt
//!     category: "Men's Dress Shirts"
//!     brand: Polo
//!     description: Classic Polo style with modern comfort
//!     images: [/images/sample-products/p1-1.jpg]
//!     price: "59.99"
//!     stock: 5
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use prostore_storefront::db::{self, PgStore, ProductRepository, RepositoryError};
use prostore_storefront::models::NewProduct;

/// Catalog shipped with the repository.
pub const DEFAULT_PRODUCTS_FILE: &str = "crates/cli/seed/products.yaml";

/// Contents of a products file.
#[derive(Debug, Deserialize)]
pub struct ProductsFile {
    pub products: Vec<NewProduct>,
}

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub inserted: usize,
    pub skipped: usize,
}

/// Check every product, returning one message per problem.
#[must_use]
pub fn validate(file: &ProductsFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut slugs = std::collections::HashSet::new();

    for (index, product) in file.products.iter().enumerate() {
        let label = if product.slug.is_empty() {
            format!("product #{}", index + 1)
        } else {
            product.slug.clone()
        };
        if product.name.trim().is_empty() {
            errors.push(format!("{label}: name is empty"));
        }
        if product.slug.trim().is_empty() {
            errors.push(format!("{label}: slug is empty"));
        } else if !slugs.insert(product.slug.as_str()) {
            errors.push(format!("{label}: duplicate slug"));
        }
        if product.price.is_zero() {
            errors.push(format!("{label}: price must be positive"));
        }
        if product.stock < 0 {
            errors.push(format!("{label}: stock cannot be negative"));
        }
    }

    errors
}

/// Insert products, skipping slugs that already exist.
///
/// # Errors
///
/// Returns the first repository error other than a slug conflict.
pub async fn insert_products<S: ProductRepository + Sync>(
    store: &S,
    products: Vec<NewProduct>,
) -> Result<SeedResult, RepositoryError> {
    let mut result = SeedResult::default();

    for product in products {
        let slug = product.slug.clone();
        match store.create_product(product).await {
            Ok(created) => {
                info!(slug = %created.slug, id = %created.id, "Inserted product");
                result.inserted += 1;
            }
            Err(RepositoryError::Conflict(_)) => {
                info!(%slug, "Product already exists, skipping");
                result.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(result)
}

/// Seed products from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, fails validation,
/// or the database operations fail.
pub async fn products(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let database_url =
        super::database_url().ok_or("STOREFRONT_DATABASE_URL not set")?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");

    // Read and validate before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let file: ProductsFile = serde_yaml::from_str(&content)?;

    let errors = validate(&file);
    if !errors.is_empty() {
        error!("Product file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(format!("{} validation errors found", errors.len()).into());
    }

    let store = PgStore::new(db::create_pool(&database_url).await?);
    info!("Connected to database");

    let result = insert_products(&store, file.products).await?;

    info!("Seeding complete!");
    info!("  Products inserted: {}", result.inserted);
    info!("  Products skipped (already exist): {}", result.skipped);

    Ok(())
}
