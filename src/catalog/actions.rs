/// Catalog-management operations applied inside the catalog actor.
///
/// Both return the product as stored after the change.
#[derive(Debug, Clone, PartialEq)]
pub enum RestaurantAction {
    /// Overwrites the stock counter.
    Restock(u32),
    /// Switches the product on or off.
    SetAvailability(bool),
}
