//! Response payloads as the booth service sends them, and their
//! normalization into the client models.
//!
//! Every field is optional on the wire. The checklist endpoint has two
//! shapes: `{checklist_items, exhibitor_name, last_updated}` and the older
//! `{items, total_items, completed_items, exhibitor_name, section}`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::catalog::{self, OrderStatus};
use crate::models::{ChecklistBundle, ChecklistItem, Order, OrderBundle};

#[derive(Debug, Default, Deserialize)]
pub struct OrdersPayload {
    pub orders: Option<Vec<RawOrder>>,
    pub exhibitor_name: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawOrder {
    pub id: Option<Value>,
    pub item: Option<String>,
    pub description: Option<String>,
    pub booth_number: Option<String>,
    pub exhibitor_name: Option<String>,
    pub color: Option<String>,
    pub quantity: Option<Value>,
    pub status: Option<String>,
    pub order_date: Option<String>,
    pub comments: Option<String>,
    pub section: Option<String>,
    pub processed: Option<Value>,
    pub processed_flag: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChecklistPayload {
    pub checklist_items: Option<Vec<RawChecklistItem>>,
    pub items: Option<Vec<RawChecklistItem>>,
    pub total_items: Option<Value>,
    pub completed_items: Option<Value>,
    pub exhibitor_name: Option<String>,
    pub section: Option<String>,
    pub last_updated: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawChecklistItem {
    pub id: Option<Value>,
    pub booth_number: Option<String>,
    pub section: Option<String>,
    pub exhibitor_name: Option<String>,
    pub quantity: Option<Value>,
    pub item_name: Option<String>,
    pub special_instructions: Option<String>,
    pub completed: Option<Value>,
    pub completion_date: Option<String>,
    pub completion_time: Option<String>,
    pub priority: Option<Value>,

    // Legacy sheet column names, read when the current one is absent.
    pub name: Option<String>,
    pub status: Option<Value>,
    pub date: Option<String>,
    pub hour: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HealthPayload {
    pub status: Option<String>,
}

impl OrdersPayload {
    pub fn normalize(self, booth_number: &str, now: DateTime<Utc>) -> OrderBundle {
        let raw_orders = self.orders.unwrap_or_default();
        let mut orders: Vec<Order> = raw_orders
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_order(booth_number, index))
            .collect();

        let exhibitor_name = non_empty(self.exhibitor_name)
            .or_else(|| orders.first().and_then(|o| non_empty(Some(o.exhibitor_name.clone()))))
            .unwrap_or_else(|| placeholder_exhibitor(booth_number));

        catalog::sort_by_priority(&mut orders);

        OrderBundle {
            orders,
            exhibitor_name,
            last_updated: parse_timestamp(self.last_updated.as_deref()).unwrap_or(now),
        }
    }
}

impl RawOrder {
    fn into_order(self, booth_number: &str, index: usize) -> Order {
        Order {
            id: wire_id(self.id).unwrap_or_else(|| format!("ORD-{}-{:03}", booth_number, index + 1)),
            item: self.item.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            booth_number: non_empty(self.booth_number).unwrap_or_else(|| booth_number.to_string()),
            exhibitor_name: self.exhibitor_name.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            quantity: lenient_int(self.quantity.as_ref(), 1),
            status: self
                .status
                .map(|code| OrderStatus::parse(&code))
                .unwrap_or_default(),
            order_date: self.order_date.unwrap_or_default(),
            comments: self.comments.unwrap_or_default(),
            section: self.section.unwrap_or_default(),
            processed: lenient_bool(self.processed.or(self.processed_flag).as_ref()),
        }
    }
}

impl ChecklistPayload {
    pub fn normalize(self, booth_number: &str, now: DateTime<Utc>) -> ChecklistBundle {
        let reported_total = lenient_count(self.total_items.as_ref());
        let reported_completed = lenient_count(self.completed_items.as_ref());

        let items: Vec<ChecklistItem> = self
            .checklist_items
            .or(self.items)
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_item(booth_number, index))
            .collect();

        if self.total_items.is_some() {
            let completed = items.iter().filter(|item| item.completed).count();
            if reported_total as usize != items.len() || reported_completed as usize != completed {
                warn!(
                    booth = booth_number,
                    reported_total,
                    reported_completed,
                    items = items.len(),
                    completed,
                    "checklist aggregates disagree with item flags"
                );
            }
        }

        let section = non_empty(self.section)
            .or_else(|| items.first().and_then(|i| non_empty(Some(i.section.clone()))))
            .unwrap_or_default();

        ChecklistBundle {
            exhibitor_name: non_empty(self.exhibitor_name)
                .unwrap_or_else(|| placeholder_exhibitor(booth_number)),
            section,
            items,
            last_updated: parse_timestamp(self.last_updated.as_deref()).unwrap_or(now),
            reported_total,
            reported_completed,
        }
    }
}

impl RawChecklistItem {
    fn into_item(self, booth_number: &str, index: usize) -> ChecklistItem {
        ChecklistItem {
            id: wire_id(self.id).unwrap_or_else(|| format!("CHK-{}-{:02}", booth_number, index + 1)),
            booth_number: non_empty(self.booth_number).unwrap_or_else(|| booth_number.to_string()),
            section: self.section.unwrap_or_default(),
            exhibitor_name: self.exhibitor_name.unwrap_or_default(),
            quantity: lenient_int(self.quantity.as_ref(), 1),
            item_name: self.item_name.or(self.name).unwrap_or_default(),
            special_instructions: self.special_instructions.unwrap_or_default(),
            completed: lenient_bool(self.completed.or(self.status).as_ref()),
            completion_date: self.completion_date.or(self.date).unwrap_or_default(),
            completion_time: self.completion_time.or(self.hour).unwrap_or_default(),
            priority: lenient_int(self.priority.as_ref(), 0),
        }
    }
}

pub fn placeholder_exhibitor(booth_number: &str) -> String {
    format!("Booth {} Exhibitor", booth_number)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// String or numeric ids; blank strings count as missing.
fn wire_id(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(id) => non_empty(Some(id)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers or numeric strings ("4", "2.0"); anything else is `default`.
fn lenient_int(value: Option<&Value>, default: i32) -> i32 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(default),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f as i32)
            .unwrap_or(default),
        _ => default,
    }
}

fn lenient_count(value: Option<&Value>) -> u32 {
    u32::try_from(lenient_int(value, 0)).unwrap_or(0)
}

/// Booleans, or the sheet's `TRUE`/`FALSE` strings.
fn lenient_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1"),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// RFC 3339, or a naive ISO timestamp read as UTC.
fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
