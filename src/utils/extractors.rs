use axum::extract::multipart::Field;
use axum::extract::Multipart;

use crate::error::{AppError, Result};
use crate::models::{ImageUpload, ProductForm};

const SPEC_PREFIX: &str = "specifications.";

/// Parses the admin product form out of a multipart body.
///
/// Scalar fields map one-to-one onto [`ProductForm`]; repeated `features`
/// and `existingImages` fields accumulate in submission order;
/// `specifications.<key>` fields patch the fixed sub-record (unknown keys
/// are dropped); only non-empty `images` files are kept.
pub async fn product_form(mut multipart: Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "images" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            if !data.is_empty() {
                form.images.push(ImageUpload { file_name, data });
            }
            continue;
        }

        let value = text_value(field).await?;

        if let Some(spec_key) = name.strip_prefix(SPEC_PREFIX) {
            let slot = match spec_key {
                "brand" => &mut form.specifications.brand,
                "collection" => &mut form.specifications.collection,
                "style" => &mut form.specifications.style,
                "room" => &mut form.specifications.room,
                "warranty" => &mut form.specifications.warranty,
                "country" => &mut form.specifications.country,
                _ => continue,
            };
            *slot = Some(value);
            continue;
        }

        match name.as_str() {
            "name" => form.name = Some(value),
            "description" => form.description = Some(value),
            "category" => form.category = Some(value),
            "price" => form.price = Some(parse_number("price", &value)?),
            "oldPrice" => form.old_price = Some(parse_old_price(&value)?),
            "inStock" => form.in_stock = Some(value == "true"),
            "features" => form.features.get_or_insert_with(Vec::new).push(value),
            "existingImages" => form.existing_images.push(value),
            _ => {}
        }
    }

    Ok(form)
}

async fn text_value(field: Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn parse_number(field: &str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a number", field)))
}

/// An empty or zero `oldPrice` means "no discount": the stored value is
/// cleared rather than kept at zero.
fn parse_old_price(value: &str) -> Result<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let parsed = parse_number("oldPrice", trimmed)?;
    Ok(if parsed == 0.0 { None } else { Some(parsed) })
}
