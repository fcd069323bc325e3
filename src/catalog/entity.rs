use rust_decimal::Decimal;

use crate::actor_framework::Entity;
use crate::domain::{Product, Restaurant};

use super::RestaurantAction;

impl Entity for Restaurant {
    type Id = String;
    type Action = RestaurantAction;
    type ActionResult = Product;

    fn id(&self) -> &String {
        &self.id
    }

    /// Every stored restaurant sells a product, that product is never marked
    /// available with an empty stock counter, and neither price is negative.
    fn validate(&self) -> Result<(), String> {
        let Some(product) = self.product() else {
            return Err(format!("restaurant {} has no products", self.id));
        };
        if product.amount == 0 && product.available {
            return Err(format!(
                "product {} cannot be available with zero stock",
                product.product_id
            ));
        }
        if product.discount_price < Decimal::ZERO || product.original_price < Decimal::ZERO {
            return Err(format!("product {} has a negative price", product.product_id));
        }
        Ok(())
    }

    /// # Actions
    /// - `Restock(amount)`: sets the counter; zero also switches the product off.
    ///   Stock arriving never switches it back on.
    /// - `SetAvailability(flag)`: toggles the product.
    fn handle_action(&mut self, action: RestaurantAction) -> Result<Product, String> {
        let id = self.id.clone();
        let product = self
            .product_mut()
            .ok_or_else(|| format!("restaurant {id} has no products"))?;

        match action {
            RestaurantAction::Restock(amount) => {
                product.amount = amount;
                if amount == 0 {
                    product.available = false;
                }
            }
            RestaurantAction::SetAvailability(available) => {
                product.available = available;
            }
        }

        Ok(product.clone())
    }
}
