use crate::catalog::OrderStatus;
use crate::models::{Notification, NotificationKind, Order};

pub const MAX_NOTIFICATIONS: usize = 3;

/// Live-update lines for orders that are moving or have arrived.
///
/// Input is expected in display order, so the first orders win the three
/// slots. Relative times are illustrative labels, not elapsed time.
pub fn synthesize(orders: &[Order]) -> Vec<Notification> {
    orders
        .iter()
        .filter_map(|order| {
            let (message, kind) = match order.status {
                OrderStatus::InRoute => (
                    format!("{} is in route from warehouse", order.item),
                    NotificationKind::Delivery,
                ),
                OrderStatus::OutForDelivery => (
                    format!("{} is out for delivery", order.item),
                    NotificationKind::Delivery,
                ),
                OrderStatus::Delivered => (
                    format!("{} has been delivered", order.item),
                    NotificationKind::Success,
                ),
                _ => return None,
            };
            Some((order, message, kind))
        })
        .take(MAX_NOTIFICATIONS)
        .enumerate()
        .map(|(position, (order, message, kind))| Notification {
            id: format!("{}-{}", order.id, order.status.code()),
            order_id: order.id.clone(),
            message,
            relative_time: relative_time_label(position),
            kind,
        })
        .collect()
}

fn relative_time_label(position: usize) -> String {
    match position {
        0 => "Just now".to_string(),
        n => format!("{} min ago", n * 5),
    }
}
