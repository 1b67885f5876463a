use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::OrderStatus;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Order {
    pub id: String,
    pub item: String,
    pub description: String,
    pub booth_number: String,
    pub exhibitor_name: String,
    pub color: String,
    pub quantity: i32,
    pub status: OrderStatus,
    pub order_date: String,
    pub comments: String,
    pub section: String,
    pub processed: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct ChecklistItem {
    pub id: String,
    pub booth_number: String,
    pub section: String,
    pub exhibitor_name: String,
    pub quantity: i32,
    pub item_name: String,
    pub special_instructions: String,
    pub completed: bool,
    pub completion_date: String,
    pub completion_time: String,
    pub priority: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Delivery,
    Success,
}

/// Transient "live update" line shown above the order list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub order_id: String,
    pub message: String,
    pub relative_time: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// Orders for one booth, sorted by status priority.
#[derive(Debug, Serialize, Clone)]
pub struct OrderBundle {
    pub orders: Vec<Order>,
    pub exhibitor_name: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ChecklistBundle {
    pub items: Vec<ChecklistItem>,
    pub exhibitor_name: String,
    pub section: String,
    pub last_updated: DateTime<Utc>,
    // Aggregates from the legacy payload shape, 0 when absent.
    pub reported_total: u32,
    pub reported_completed: u32,
}

#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderSummary {
    pub total: usize,
    pub delivered: usize,
    pub pending: usize,
    pub cancelled: usize,
}

impl OrderSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut summary = OrderSummary {
            total: orders.len(),
            ..OrderSummary::default()
        };
        for order in orders {
            match order.status {
                OrderStatus::Delivered => summary.delivered += 1,
                OrderStatus::Cancelled => summary.cancelled += 1,
                _ => summary.pending += 1,
            }
        }
        summary
    }
}

/// Completion counts, always derived from the `completed` flags.
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChecklistSummary {
    pub total_items: usize,
    pub completed_items: usize,
    pub pending_items: usize,
    pub progress_percent: u8,
}

impl ChecklistSummary {
    pub fn from_items(items: &[ChecklistItem]) -> Self {
        let total_items = items.len();
        let completed_items = items.iter().filter(|item| item.completed).count();
        // Round half up, integer only.
        let progress_percent = if total_items == 0 {
            0
        } else {
            ((completed_items * 200 + total_items) / (2 * total_items)) as u8
        };

        ChecklistSummary {
            total_items,
            completed_items,
            pending_items: total_items - completed_items,
            progress_percent,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ServiceHealth {
    pub reachable: bool,
    pub status: String,
    pub checked_at: DateTime<Utc>,
}
