#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::Utc;
use uuid::Uuid;

use order_management::domain::errors::DomainError;
use order_management::domain::order::{
    Order, OrderLine, OrderLineInput, OrderStatus, OrderSummary,
};
use order_management::domain::ports::{LogForwarder, OrderRepository};

pub fn price(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).expect("valid decimal")
}

pub fn line_input(quantity: i32, unit_price: &str) -> OrderLineInput {
    OrderLineInput {
        product_id: Uuid::new_v4(),
        quantity,
        price: price(unit_price),
    }
}

/// In-memory stand-in for the Postgres repository, with switches to inject
/// the failure modes the pipeline has to contain.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<Uuid, Order>>,
    pub fail_status_scan: AtomicBool,
    pub fail_update_for: Mutex<HashSet<Uuid>>,
    pub update_calls: AtomicUsize,
}

impl InMemoryOrderRepository {
    pub fn order_count(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    pub fn status_of(&self, id: Uuid) -> Option<OrderStatus> {
        self.orders.lock().unwrap().get(&id).map(|o| o.status)
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(
        &self,
        customer_name: String,
        lines: Vec<OrderLineInput>,
    ) -> Result<Uuid, DomainError> {
        let id = Uuid::new_v4();
        let order = Order {
            id,
            customer_name,
            status: OrderStatus::Unprocessed,
            created_at: Utc::now(),
            lines: lines
                .into_iter()
                .map(|l| OrderLine {
                    id: Some(Uuid::new_v4()),
                    product_id: l.product_id,
                    quantity: l.quantity,
                    price: l.price,
                })
                .collect(),
        };
        self.orders.lock().unwrap().insert(id, order);
        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, DomainError> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    fn find_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, DomainError> {
        if self.fail_status_scan.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("store unavailable".to_string()));
        }
        let mut matching: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|o| o.created_at);
        Ok(matching)
    }

    fn update(&self, order: &Order) -> Result<Order, DomainError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update_for.lock().unwrap().contains(&order.id) {
            return Err(DomainError::Persistence("write failed".to_string()));
        }
        let mut orders = self.orders.lock().unwrap();
        if !orders.contains_key(&order.id) {
            return Err(DomainError::NotFound);
        }
        let mut persisted = order.clone();
        for line in &mut persisted.lines {
            if line.id.is_none() {
                line.id = Some(Uuid::new_v4());
            }
        }
        orders.insert(persisted.id, persisted.clone());
        Ok(persisted)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        match self.orders.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound),
        }
    }
}

/// Records every forwarded summary; can fail for chosen orders or hold each
/// call for a while to expose tick overlap.
#[derive(Default)]
pub struct RecordingForwarder {
    pub sent: Mutex<Vec<OrderSummary>>,
    pub fail_for: Mutex<HashSet<Uuid>>,
    pub delay: Mutex<Option<Duration>>,
}

#[async_trait]
impl LogForwarder for RecordingForwarder {
    async fn forward(&self, summary: &OrderSummary) -> Result<(), DomainError> {
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_for.lock().unwrap().contains(&summary.order_id) {
            return Err(DomainError::Forwarding("log sink rejected".to_string()));
        }
        self.sent.lock().unwrap().push(summary.clone());
        Ok(())
    }
}
