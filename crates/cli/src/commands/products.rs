//! Product commands.

use std::path::Path;

use shelf_core::{Product, ProductId, ProductInput};
use shelf_server::db::{Collections, ProductRepository, RepositoryError};

use super::CommandError;

/// Load products from `file` and add them to the catalog.
///
/// Every entry must carry the fields `POST /api/products` requires; ids are
/// generated. With `replace`, the existing catalog is discarded. The file is
/// fully validated before anything is written.
///
/// # Errors
///
/// Returns `CommandError` if the file cannot be read or parsed, an entry is
/// incomplete, or the products collection cannot be saved.
pub async fn seed(collections: &Collections, file: &Path, replace: bool) -> Result<(), CommandError> {
    let content = tokio::fs::read(file)
        .await
        .map_err(|e| CommandError::read(file, e))?;
    let products = parse_seed(file, &content)?;
    let count = products.len();

    if replace {
        collections
            .products
            .replace(products)
            .await
            .map_err(RepositoryError::from)?;
    } else {
        ProductRepository::new(&collections.products)
            .import(products)
            .await?;
    }

    tracing::info!(count, replace, file = %file.display(), "Seeded products");
    Ok(())
}

fn parse_seed(file: &Path, content: &[u8]) -> Result<Vec<Product>, CommandError> {
    let inputs: Vec<ProductInput> =
        serde_json::from_slice(content).map_err(|source| CommandError::Parse {
            path: file.to_path_buf(),
            source,
        })?;

    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| {
            input
                .into_new_product()
                .map(|new| Product::create(ProductId::generate(), new))
                .map_err(|e| CommandError::InvalidEntry {
                    path: file.to_path_buf(),
                    index,
                    message: e.to_string(),
                })
        })
        .collect()
}

/// Print every product, one per line.
///
/// # Errors
///
/// Returns `CommandError::Repository` if the products collection cannot be loaded.
#[allow(clippy::print_stdout)]
pub async fn list(collections: &Collections) -> Result<(), CommandError> {
    let products = ProductRepository::new(&collections.products).list().await?;

    for p in &products {
        let availability = if p.status { "available" } else { "unavailable" };
        println!(
            "{}\t{}\t{}\t{}\t{}\tstock {}",
            p.id, p.code, p.title, p.price, availability, p.stock
        );
    }
    tracing::info!(count = products.len(), "Listed products");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const SEED: &str = r#"[
        {"title": "Mug", "description": "Blue mug", "code": "m1", "price": 8.5, "stock": 3, "category": "kitchen"},
        {"title": "Hat", "description": "Green hat", "code": "h1", "price": 15, "stock": 1, "category": "clothes", "thumbnails": ["hat.png"]}
    ]"#;

    fn setup() -> (TempDir, Collections) {
        let dir = TempDir::new().unwrap();
        let collections = Collections::open(dir.path(), "products.json", "carts.json");
        fs::write(dir.path().join("seed.json"), SEED).unwrap();
        (dir, collections)
    }

    #[tokio::test]
    async fn test_seed_appends_products() {
        let (dir, collections) = setup();
        let seed_file = dir.path().join("seed.json");

        seed(&collections, &seed_file, false).await.unwrap();
        seed(&collections, &seed_file, false).await.unwrap();

        let products = collections.products.load().await.unwrap();
        assert_eq!(products.len(), 4);
        assert!(products.iter().all(|p| p.status));
        assert_eq!(products[1].thumbnails, vec!["hat.png".to_string()]);
        assert_ne!(products[0].id, products[2].id);
    }

    #[tokio::test]
    async fn test_seed_replace_discards_catalog() {
        let (dir, collections) = setup();
        let seed_file = dir.path().join("seed.json");

        seed(&collections, &seed_file, false).await.unwrap();
        seed(&collections, &seed_file, true).await.unwrap();

        assert_eq!(collections.products.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seed_rejects_incomplete_entry_without_writing() {
        let (dir, collections) = setup();
        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"[{"title": "Only a title"}]"#).unwrap();

        let err = seed(&collections, &bad, false).await.unwrap_err();
        assert!(matches!(err, CommandError::InvalidEntry { index: 0, .. }));
        assert!(!collections.products.path().exists());
    }

    #[tokio::test]
    async fn test_seed_missing_file() {
        let (dir, collections) = setup();
        let err = seed(&collections, &dir.path().join("nope.json"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Read { .. }));
    }
}
