use std::collections::BTreeMap;

use rand::Rng;

use crate::error::GenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: u32,
    /// Price in whole currency units, tax excluded
    pub unit_price: u32,
}

/// Static product master. Immutable once built.
#[derive(Debug, Clone)]
pub struct PriceCatalog {
    prices: BTreeMap<u32, u32>,
    ids: Vec<u32>,
}

impl PriceCatalog {
    /// # Errors
    /// Errors when `products` is empty or lists the same id twice
    pub fn new(products: impl IntoIterator<Item = Product>) -> Result<Self, GenError> {
        let mut prices = BTreeMap::new();
        for product in products {
            if prices.insert(product.id, product.unit_price).is_some() {
                return Err(GenError::InvalidCatalog(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }
        if prices.is_empty() {
            return Err(GenError::InvalidCatalog("no products".to_string()));
        }
        let ids = prices.keys().copied().collect();
        Ok(PriceCatalog { prices, ids })
    }

    #[must_use]
    pub fn unit_price(&self, product_id: u32) -> Option<u32> {
        self.prices.get(&product_id).copied()
    }

    /// Product ids in ascending order
    #[must_use]
    pub fn product_ids(&self) -> &[u32] {
        &self.ids
    }

    /// Draws a product uniformly from the catalog.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Product {
        // never empty, see `new`
        let id = self.ids[rng.gen_range(0..self.ids.len())];
        Product {
            id,
            unit_price: self.prices[&id],
        }
    }
}

impl Default for PriceCatalog {
    /// Ten products, ids 2000-2009, priced 1000 to 5500 in steps of 500.
    fn default() -> Self {
        let prices: BTreeMap<u32, u32> = (0..10u32).map(|i| (2000 + i, 1000 + 500 * i)).collect();
        let ids = prices.keys().copied().collect();
        PriceCatalog { prices, ids }
    }
}
