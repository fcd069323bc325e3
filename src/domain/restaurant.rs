use serde::{Deserialize, Serialize};

use super::Product;

/// A catalog entry. In every order path only the first product is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "type", default)]
    pub kind: i32,
    pub products: Vec<Product>,
}

/// Payload for registering a restaurant; the catalog assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(rename = "type", default)]
    pub kind: i32,
    pub products: Vec<Product>,
}

impl NewRestaurant {
    /// A restaurant selling a single product, with every other attribute left
    /// at its default.
    pub fn with_product(name: impl Into<String>, product: Product) -> Self {
        Self {
            name: name.into(),
            image_url: String::new(),
            description: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            address: String::new(),
            rating: 0.0,
            kind: 0,
            products: vec![product],
        }
    }

    pub fn into_restaurant(self, id: String) -> Restaurant {
        Restaurant {
            id,
            name: self.name,
            image_url: self.image_url,
            description: self.description,
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address,
            rating: self.rating,
            kind: self.kind,
            products: self.products,
        }
    }
}

impl Restaurant {
    /// The product the order paths operate on.
    pub fn product(&self) -> Option<&Product> {
        self.products.first()
    }

    pub fn product_mut(&mut self) -> Option<&mut Product> {
        self.products.first_mut()
    }

    /// True when `query` names this restaurant, ignoring case and whitespace.
    pub fn matches_name(&self, query: &str) -> bool {
        normalize_name(&self.name) == normalize_name(query)
    }
}

/// Trims surrounding whitespace, lowercases, and removes every space.
/// Tabs and other inner whitespace are kept.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_name_matching_ignores_case_and_spaces() {
        let product = Product::new(1, "Margherita", 1, Decimal::new(80, 1), Decimal::new(95, 1));
        let restaurant = NewRestaurant::with_product("La Pizzeria ", product).into_restaurant("r1".into());

        assert!(restaurant.matches_name("La Pizzeria"));
        assert!(restaurant.matches_name("lapizzeria"));
        assert!(restaurant.matches_name("  LA  PIZZERIA"));
        assert!(!restaurant.matches_name("Pizzeria"));
        assert!(!restaurant.matches_name("La Pizzeria Roma"));
        assert!(!restaurant.matches_name("La\tPizzeria"));
        assert!(restaurant.matches_name("\tLa Pizzeria\n"));
    }

    #[test]
    fn test_catalog_json_uses_source_field_names() {
        let json = r#"{
            "name": "Sushi Go",
            "type": 2,
            "products": [{
                "productId": 7,
                "productName": "Nigiri box",
                "amount": 4,
                "available": true,
                "discountPrice": 12.5,
                "originalPrice": 18.0
            }]
        }"#;

        let restaurant: NewRestaurant = serde_json::from_str(json).unwrap();
        assert_eq!(restaurant.kind, 2);
        let product = &restaurant.products[0];
        assert_eq!(product.product_id, 7);
        assert_eq!(product.amount, 4);
        assert_eq!(product.discount_price, Decimal::new(125, 1));
        assert!(product.is_sellable());
    }
}
