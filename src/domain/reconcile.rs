use std::collections::HashSet;

use uuid::Uuid;

use super::order::{Order, OrderLine, OrderPatch};

/// Compute the next persisted state of an order from its current state and a
/// partial update. Pure: performs no I/O, touches no identities.
///
/// Line semantics: the patch's identified lines are the full set the caller
/// wants to keep. Existing lines not mentioned are removed, identified lines
/// are overwritten in place, lines without an id are appended (the store
/// assigns their ids on save), and a patch line whose id matches nothing is
/// silently dropped.
///
/// Constraint validation (non-blank name, positive quantity/price) is a
/// caller precondition, and the status overwrite is applied as given without
/// checking the transition direction.
pub fn reconcile(mut existing: Order, patch: OrderPatch) -> Order {
    if let Some(name) = patch.customer_name {
        if !name.is_empty() {
            existing.customer_name = name;
        }
    }
    if let Some(status) = patch.status {
        existing.status = status;
    }

    // Collect the ids to keep before touching the collection.
    let kept: HashSet<Uuid> = patch.lines.iter().filter_map(|l| l.id).collect();
    existing
        .lines
        .retain(|line| line.id.map_or(true, |id| kept.contains(&id)));

    for patch_line in patch.lines {
        match patch_line.id {
            None => existing.lines.push(OrderLine {
                id: None,
                product_id: patch_line.product_id,
                quantity: patch_line.quantity,
                price: patch_line.price,
            }),
            Some(id) => {
                if let Some(line) = existing.lines.iter_mut().find(|l| l.id == Some(id)) {
                    line.product_id = patch_line.product_id;
                    line.quantity = patch_line.quantity;
                    line.price = patch_line.price;
                }
            }
        }
    }

    existing
}
