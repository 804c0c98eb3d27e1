use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    validate_customer_name, validate_line, Order, OrderLineInput, OrderPatch,
};
use crate::domain::ports::OrderRepository;
use crate::domain::reconcile::reconcile;

/// API-facing operations over the order store. Validation happens here,
/// before any mutation; the reconciler itself assumes valid input.
pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_order(
        &self,
        customer_name: String,
        lines: Vec<OrderLineInput>,
    ) -> Result<Uuid, DomainError> {
        validate_customer_name(&customer_name)?;
        for line in &lines {
            validate_line(line.quantity, &line.price)?;
        }
        log::info!("Creating new order for customer: {}", customer_name);
        self.repo.create(customer_name, lines)
    }

    pub fn get_order(&self, id: Uuid) -> Result<Order, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    pub fn update_order(&self, id: Uuid, patch: OrderPatch) -> Result<Order, DomainError> {
        for line in &patch.lines {
            validate_line(line.quantity, &line.price)?;
        }
        let existing = self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)?;
        log::info!("Updating order with id: {}", id);
        let next = reconcile(existing, patch);
        self.repo.update(&next)
    }

    pub fn delete_order(&self, id: Uuid) -> Result<(), DomainError> {
        log::info!("Deleting order with id: {}", id);
        self.repo.delete(id)
    }
}
