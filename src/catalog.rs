use serde::{Deserialize, Serialize};

use crate::models::Order;

/// Delivery status of a furnishing order.
///
/// Codes the catalog does not know are kept verbatim in `Other` so they
/// round-trip to the frontend, and are described as in-process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    InProcess,
    InRoute,
    OutForDelivery,
    Delivered,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub const KNOWN: [OrderStatus; 5] = [
        OrderStatus::InProcess,
        OrderStatus::InRoute,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Parse a wire code. Spreadsheet-entered codes such as
    /// `"Out for Delivery"` or `"in_route"` are accepted too.
    pub fn parse(code: &str) -> Self {
        let normalized = code.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "in-process" => OrderStatus::InProcess,
            "in-route" => OrderStatus::InRoute,
            "out-for-delivery" => OrderStatus::OutForDelivery,
            "delivered" => OrderStatus::Delivered,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::Other(code.to_string()),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            OrderStatus::InProcess => "in-process",
            OrderStatus::InRoute => "in-route",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(code) => code,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl From<String> for OrderStatus {
    fn from(code: String) -> Self {
        OrderStatus::parse(&code)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.code().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayCategory {
    Processing,
    InTransit,
    Complete,
    Cancelled,
}

/// Display and ordering metadata for one status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatusDescriptor {
    pub code: &'static str,
    pub label: &'static str,
    pub progress_percent: u8,
    pub priority: u8,
    pub display_category: DisplayCategory,
}

static IN_PROCESS: OrderStatusDescriptor = OrderStatusDescriptor {
    code: "in-process",
    label: "In Process",
    progress_percent: 25,
    priority: 1,
    display_category: DisplayCategory::Processing,
};

static IN_ROUTE: OrderStatusDescriptor = OrderStatusDescriptor {
    code: "in-route",
    label: "In Route from Warehouse",
    progress_percent: 50,
    priority: 2,
    display_category: DisplayCategory::InTransit,
};

static OUT_FOR_DELIVERY: OrderStatusDescriptor = OrderStatusDescriptor {
    code: "out-for-delivery",
    label: "Out for Delivery",
    progress_percent: 75,
    priority: 3,
    display_category: DisplayCategory::InTransit,
};

static CANCELLED: OrderStatusDescriptor = OrderStatusDescriptor {
    code: "cancelled",
    label: "Cancelled",
    progress_percent: 0,
    priority: 4,
    display_category: DisplayCategory::Cancelled,
};

static DELIVERED: OrderStatusDescriptor = OrderStatusDescriptor {
    code: "delivered",
    label: "Delivered",
    progress_percent: 100,
    priority: 5,
    display_category: DisplayCategory::Complete,
};

pub struct StatusCatalog;

impl StatusCatalog {
    /// Look up a raw status code. Never fails: unknown codes get the
    /// in-process descriptor.
    pub fn describe(code: &str) -> &'static OrderStatusDescriptor {
        Self::descriptor(&OrderStatus::parse(code))
    }

    pub fn descriptor(status: &OrderStatus) -> &'static OrderStatusDescriptor {
        match status {
            OrderStatus::InProcess => &IN_PROCESS,
            OrderStatus::InRoute => &IN_ROUTE,
            OrderStatus::OutForDelivery => &OUT_FOR_DELIVERY,
            OrderStatus::Delivered => &DELIVERED,
            OrderStatus::Cancelled => &CANCELLED,
            OrderStatus::Other(_) => &IN_PROCESS,
        }
    }

    /// All descriptors in display priority order.
    pub fn all() -> Vec<&'static OrderStatusDescriptor> {
        let mut descriptors: Vec<_> = OrderStatus::KNOWN.iter().map(Self::descriptor).collect();
        descriptors.sort_by_key(|d| d.priority);
        descriptors
    }
}

/// Stable sort by status priority, lowest first.
pub fn sort_by_priority(orders: &mut [Order]) {
    orders.sort_by_key(|order| StatusCatalog::descriptor(&order.status).priority);
}
