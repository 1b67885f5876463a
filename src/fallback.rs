//! Demo datasets served when the booth service cannot be reached.
//!
//! Content is fixed; only ids, booth number and dates depend on the input,
//! so the same booth always gets the same records.

use chrono::{DateTime, Utc};

use crate::catalog::{self, OrderStatus};
use crate::models::{ChecklistBundle, ChecklistItem, Order, OrderBundle};

const DEMO_SECTION: &str = "Section A";
const DEMO_COMMENT: &str = "Demo data - live tracking is temporarily unavailable";

/// (item, description, color, quantity, status)
const DEMO_ORDERS: [(&str, &str, &str, i32, OrderStatus); 3] = [
    (
        "Round Table 30\" high",
        "Professional exhibition furniture",
        "White",
        2,
        OrderStatus::Delivered,
    ),
    (
        "White Side Chair",
        "Professional seating solution",
        "White",
        4,
        OrderStatus::OutForDelivery,
    ),
    (
        "500 Watt Electrical Outlet",
        "Booth power connection",
        "Grey",
        1,
        OrderStatus::InProcess,
    ),
];

/// (item, quantity, completed, special instructions)
const DEMO_CHECKLIST: [(&str, i32, bool, &str); 12] = [
    ("BeMatrix Structure with White Double Fabric Walls", 1, true, ""),
    ("3m x 4m Corner Booth", 1, true, ""),
    ("Rectangular White Table", 1, true, ""),
    ("White Chair", 4, true, ""),
    ("One Time Vacuuming Prior to Opening", 100, true, ""),
    ("Wastebasket", 1, true, "Complimentary wastebasket"),
    ("Company Name Sign 24\"W x 16\"H", 1, true, ""),
    ("500 Watt Electrical Outlet", 1, true, ""),
    ("6' Track with Three Can Lights", 1, false, ""),
    ("White Shelving Unit", 1, false, ""),
    ("3m x 4m Wood Vinyl Flooring", 1, false, ""),
    ("3M Fabric Graphic - 117.17\"W x 95.20\"H", 1, false, ""),
];

pub fn demo_exhibitor_name(booth_number: &str) -> String {
    format!("Demo Exhibitor (Booth {})", booth_number)
}

pub fn orders(booth_number: &str, now: DateTime<Utc>) -> OrderBundle {
    let exhibitor_name = demo_exhibitor_name(booth_number);
    let order_date = now.format("%Y-%m-%d").to_string();

    let mut orders: Vec<Order> = DEMO_ORDERS
        .into_iter()
        .enumerate()
        .map(|(index, (item, description, color, quantity, status))| Order {
            id: format!("ORD-{}-{:03}", booth_number, index + 1),
            item: item.to_string(),
            description: description.to_string(),
            booth_number: booth_number.to_string(),
            exhibitor_name: exhibitor_name.clone(),
            color: color.to_string(),
            quantity,
            processed: status.is_terminal(),
            status,
            order_date: order_date.clone(),
            comments: DEMO_COMMENT.to_string(),
            section: DEMO_SECTION.to_string(),
        })
        .collect();
    catalog::sort_by_priority(&mut orders);

    OrderBundle {
        orders,
        exhibitor_name,
        last_updated: now,
    }
}

pub fn checklist(booth_number: &str, now: DateTime<Utc>) -> ChecklistBundle {
    let exhibitor_name = demo_exhibitor_name(booth_number);
    let completion_date = now.format("%Y-%m-%d").to_string();

    let items: Vec<ChecklistItem> = DEMO_CHECKLIST
        .iter()
        .enumerate()
        .map(|(index, &(name, quantity, completed, instructions))| ChecklistItem {
            id: format!("CHK-{}-{:02}", booth_number, index + 1),
            booth_number: booth_number.to_string(),
            section: DEMO_SECTION.to_string(),
            exhibitor_name: exhibitor_name.clone(),
            quantity,
            item_name: name.to_string(),
            special_instructions: instructions.to_string(),
            completed,
            completion_date: if completed { completion_date.clone() } else { String::new() },
            completion_time: String::new(),
            priority: index as i32 + 1,
        })
        .collect();

    let completed = items.iter().filter(|item| item.completed).count() as u32;
    ChecklistBundle {
        reported_total: items.len() as u32,
        reported_completed: completed,
        items,
        exhibitor_name,
        section: DEMO_SECTION.to_string(),
        last_updated: now,
    }
}
