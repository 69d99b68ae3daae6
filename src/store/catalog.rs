use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{Product, ProductForm, ProductQuery, SortBy};

use super::images;

const MAX_PAGE_SIZE: usize = 100;

/// File-backed product repository.
///
/// The entire collection lives in one JSON array on disk and every mutation
/// is a full read-modify-write. Mutations are serialized through `write_lock`
/// for their whole duration, so two concurrent admin requests cannot lose
/// each other's changes; reads go straight to the file. The store also owns
/// the image files the collection references and keeps them consistent
/// across update and delete.
#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    products_file: PathBuf,
    uploads_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl CatalogStore {
    pub fn new(products_file: impl Into<PathBuf>, uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                products_file: products_file.into(),
                uploads_dir: uploads_dir.into(),
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// Creates the uploads directory and the collection file's parent.
    pub async fn init(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.inner.uploads_dir).await?;
        if let Some(parent) = self.inner.products_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::info!(
            "Catalog store ready: collection at {}, uploads at {}",
            self.inner.products_file.display(),
            self.inner.uploads_dir.display()
        );

        Ok(())
    }

    /// Storage probe for the readiness endpoint. An absent collection file
    /// is an empty catalog, not a failure.
    pub async fn check_health(&self) -> Result<()> {
        match tokio::fs::metadata(&self.inner.products_file).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the whole collection.
    ///
    /// A missing or unparsable file degrades to an empty catalog so the
    /// storefront keeps rendering; the condition is logged rather than
    /// swallowed so real corruption stays visible.
    pub async fn list(&self) -> Vec<Product> {
        match tokio::fs::read(&self.inner.products_file).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(products) => products,
                Err(e) => {
                    tracing::warn!(
                        "Could not parse {}: {}; serving an empty catalog",
                        self.inner.products_file.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    "Could not read {}: {}; serving an empty catalog",
                    self.inner.products_file.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// `list()` narrowed by the public catalog filters. Without `sort_by`
    /// the file order is preserved.
    pub async fn search(&self, params: &ProductQuery) -> Vec<Product> {
        let mut products = self.list().await;

        if let Some(q) = params.query.as_deref().filter(|q| !q.is_empty()) {
            let needle = q.to_lowercase();
            products.retain(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
            });
        }

        if let Some(category) = &params.category {
            products.retain(|p| &p.category == category);
        }

        if let Some(price_from) = params.price_from {
            products.retain(|p| p.price >= price_from);
        }

        if let Some(price_to) = params.price_to {
            products.retain(|p| p.price <= price_to);
        }

        if let Some(in_stock) = params.in_stock {
            products.retain(|p| p.in_stock == in_stock);
        }

        match params.sort_by {
            Some(SortBy::PriceAsc) => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            Some(SortBy::PriceDesc) => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            Some(SortBy::Newest) => products.sort_by_key(|p| std::cmp::Reverse(p.id)),
            None => {}
        }

        if let Some(offset) = params.offset {
            let offset = offset.min(products.len());
            products.drain(..offset);
        }

        if let Some(limit) = params.limit {
            products.truncate(limit.min(MAX_PAGE_SIZE));
        }

        products
    }

    /// Linear scan; the collection is catalog-scale.
    pub async fn get(&self, id: i64) -> Option<Product> {
        self.list().await.into_iter().find(|p| p.id == id)
    }

    pub async fn create(&self, form: ProductForm) -> Result<Product> {
        let _guard = self.inner.write_lock.lock().await;
        let mut products = self.list().await;

        let mut product = Product {
            id: next_id(&products),
            name: form.name.unwrap_or_default(),
            price: form.price.unwrap_or(0.0),
            old_price: form.old_price.flatten(),
            description: form.description.unwrap_or_default(),
            category: form.category.unwrap_or_default(),
            in_stock: form.in_stock.unwrap_or(false),
            images: Vec::new(),
            features: form.features.unwrap_or_default(),
            specifications: Default::default(),
        };
        form.specifications.apply(&mut product.specifications);

        for upload in &form.images {
            let url = images::save_upload(&self.inner.uploads_dir, upload).await?;
            product.images.push(url);
        }

        products.push(product.clone());
        self.persist(&products).await?;

        Ok(product)
    }

    /// Overlays the submitted fields onto the stored record; `None` means
    /// the product does not exist.
    ///
    /// Images are replaced wholesale if and only if at least one new file was
    /// submitted: the old files are removed (best-effort) and the list is
    /// rebuilt in submission order. A submitted `existingImages` list without
    /// new files is ignored; removing stored images requires submitting
    /// replacements.
    pub async fn update(&self, id: i64, form: ProductForm) -> Result<Option<Product>> {
        let _guard = self.inner.write_lock.lock().await;
        let mut products = self.list().await;

        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = form.name {
            product.name = name;
        }
        if let Some(price) = form.price {
            product.price = price;
        }
        if let Some(old_price) = form.old_price {
            product.old_price = old_price;
        }
        if let Some(description) = form.description {
            product.description = description;
        }
        if let Some(category) = form.category {
            product.category = category;
        }
        if let Some(in_stock) = form.in_stock {
            product.in_stock = in_stock;
        }
        if let Some(features) = form.features {
            product.features = features;
        }
        form.specifications.apply(&mut product.specifications);

        if form.images.is_empty() {
            if !form.existing_images.is_empty() {
                tracing::debug!(
                    "Ignoring existingImages for product {}: no new files submitted",
                    id
                );
            }
        } else {
            for old in std::mem::take(&mut product.images) {
                images::delete_upload(&self.inner.uploads_dir, &old).await;
            }
            for upload in &form.images {
                let url = images::save_upload(&self.inner.uploads_dir, upload).await?;
                product.images.push(url);
            }
        }

        let updated = product.clone();
        self.persist(&products).await?;

        Ok(Some(updated))
    }

    /// Removes the record and its image files; `false` means the product did
    /// not exist and nothing was touched.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let _guard = self.inner.write_lock.lock().await;
        let mut products = self.list().await;

        let Some(target) = products.iter().find(|p| p.id == id) else {
            return Ok(false);
        };

        for image in &target.images {
            images::delete_upload(&self.inner.uploads_dir, image).await;
        }

        products.retain(|p| p.id != id);
        self.persist(&products).await?;

        Ok(true)
    }

    /// Whole-file replace, pretty-printed. Write failures propagate; a crash
    /// before the write leaves the previous file intact.
    async fn persist(&self, products: &[Product]) -> Result<()> {
        let json = serde_json::to_string_pretty(products)?;
        tokio::fs::write(&self.inner.products_file, json).await?;
        Ok(())
    }
}

/// Epoch-millisecond id, bumped past any id already taken so that two
/// creations landing in the same millisecond still get distinct ids.
fn next_id(products: &[Product]) -> i64 {
    let mut id = chrono::Utc::now().timestamp_millis();
    while products.iter().any(|p| p.id == id) {
        id += 1;
    }
    id
}
