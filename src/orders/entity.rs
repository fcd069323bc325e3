use crate::actor_framework::Entity;
use crate::domain::UserOrders;

impl Entity for UserOrders {
    type Id = String;
    type Action = (); // Histories are only ever rewritten whole
    type ActionResult = ();

    fn id(&self) -> &String {
        &self.user_id
    }

    /// A stored history always holds at least the order that created it.
    fn validate(&self) -> Result<(), String> {
        if self.orders.is_empty() {
            return Err(format!("order history of {} is empty", self.user_id));
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
