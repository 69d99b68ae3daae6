use axum::body::Bytes;

use crate::models::Specifications;

/// Parsed admin product form.
///
/// `None` on a scalar field means the field was not part of the submission,
/// so an update leaves the stored value unchanged. `old_price` keeps one more
/// level: `Some(None)` means the field arrived empty or zero, which clears
/// the stored discount.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<Option<f64>>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
    pub features: Option<Vec<String>>,
    pub specifications: SpecificationsForm,
    pub existing_images: Vec<String>,
    pub images: Vec<ImageUpload>,
}

/// One non-empty file received under the repeated `images` field.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Bytes,
}

/// Per-field patch for the specifications sub-record: only submitted keys
/// overwrite the stored values.
#[derive(Debug, Default)]
pub struct SpecificationsForm {
    pub brand: Option<String>,
    pub collection: Option<String>,
    pub style: Option<String>,
    pub room: Option<String>,
    pub warranty: Option<String>,
    pub country: Option<String>,
}

impl SpecificationsForm {
    pub fn apply(&self, specs: &mut Specifications) {
        if let Some(brand) = &self.brand {
            specs.brand = Some(brand.clone());
        }
        if let Some(collection) = &self.collection {
            specs.collection = Some(collection.clone());
        }
        if let Some(style) = &self.style {
            specs.style = Some(style.clone());
        }
        if let Some(room) = &self.room {
            specs.room = Some(room.clone());
        }
        if let Some(warranty) = &self.warranty {
            specs.warranty = Some(warranty.clone());
        }
        if let Some(country) = &self.country {
            specs.country = Some(country.clone());
        }
    }
}
