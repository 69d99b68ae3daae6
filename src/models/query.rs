use serde::Deserialize;

/// Query parameters accepted by the public catalog list endpoint.
///
/// All filters are optional; an empty query returns the whole collection in
/// file order.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub query: Option<String>,
    pub category: Option<String>,
    pub price_from: Option<f64>,
    pub price_to: Option<f64>,
    pub in_stock: Option<bool>,
    pub sort_by: Option<SortBy>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    PriceAsc,
    PriceDesc,
    Newest,
}
