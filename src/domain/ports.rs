use async_trait::async_trait;
use uuid::Uuid;

use super::errors::DomainError;
use super::order::{Order, OrderLineInput, OrderStatus, OrderSummary};

/// Durable keyed storage for order aggregates. Every save is atomic for one
/// aggregate (order row and its lines commit together).
pub trait OrderRepository: Send + Sync + 'static {
    /// Persist a new order with status `unprocessed`, assigning identities
    /// to the order and each line. Returns the order id.
    fn create(&self, customer_name: String, lines: Vec<OrderLineInput>)
        -> Result<Uuid, DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError>;

    fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError>;

    /// Persist a reconciled aggregate: removed lines are deleted, kept lines
    /// overwritten, lines without an id inserted with a fresh identity.
    /// Returns the persisted state with every line id assigned.
    fn update(&self, order: &Order) -> Result<Order, DomainError>;

    /// Delete the order and all its lines. `NotFound` when no such order.
    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}

// Lets one repository instance be shared between the API service and the
// batch pipeline.
impl<R: OrderRepository> OrderRepository for std::sync::Arc<R> {
    fn create(
        &self,
        customer_name: String,
        lines: Vec<OrderLineInput>,
    ) -> Result<Uuid, DomainError> {
        (**self).create(customer_name, lines)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(id)
    }

    fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
        (**self).find_by_status(status)
    }

    fn update(&self, order: &Order) -> Result<Order, DomainError> {
        (**self).update(order)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        (**self).delete(id)
    }
}

/// Delivers a processed-order summary to the remote log sink. Best effort:
/// callers log failures and move on.
#[async_trait]
pub trait LogForwarder: Send + Sync + 'static {
    async fn forward(&self, summary: &OrderSummary) -> Result<(), DomainError>;
}
