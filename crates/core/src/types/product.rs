//! Catalog records returned by the product and stock endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A product listing from the catalog.
///
/// Immutable once fetched. `price` accepts either a JSON number or a decimal
/// string on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Decimal,
    /// Image URL.
    pub image: String,
}

/// Stock level for a product: the maximum purchasable quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockInfo {
    pub id: ProductId,
    pub amount: u32,
}

impl StockInfo {
    /// Whether `requested` units can be bought.
    #[must_use]
    pub const fn allows(&self, requested: u32) -> bool {
        requested <= self.amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserializes_numeric_price() {
        let json = r#"{"id":1,"title":"Tênis de Caminhada Leve Confortável","price":179.9,"image":"https://cdn.example.com/1.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(1799, 1));
    }

    #[test]
    fn test_product_deserializes_string_price() {
        let json = r#"{"id":2,"title":"Tênis VR Caminhada","price":"139.90","image":"x.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Decimal::new(13990, 2));
    }

    #[test]
    fn test_stock_allows() {
        let stock = StockInfo {
            id: ProductId::new(1),
            amount: 3,
        };
        assert!(stock.allows(3));
        assert!(!stock.allows(4));
    }

    #[test]
    fn test_negative_stock_is_rejected() {
        let result = serde_json::from_str::<StockInfo>(r#"{"id":1,"amount":-1}"#);
        assert!(result.is_err());
    }
}
