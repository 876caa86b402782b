//! Canned backend payloads
//!
//! The shapes match what the backend returns, including numeric ids on
//! some resources and string ids on others.

use serde_json::{json, Value};

/// Four active alerts, one already acknowledged
pub fn sample_alerts() -> Value {
    json!([
        {
            "id": "a1",
            "type": "payment_failure",
            "title": "Payment gateway errors",
            "message": "Error rate above 5% for 10 minutes",
            "severity": "critical",
            "source": "payments",
            "created_at": "2024-03-01T10:00:00Z",
            "acknowledged": false
        },
        {
            "id": "a2",
            "type": "driver_shortage",
            "title": "Driver shortage in Riyadh",
            "message": "Fewer than 20 drivers online",
            "severity": "high",
            "source": "rides",
            "created_at": "2024-03-01T10:05:00Z",
            "acknowledged": false
        },
        {
            "id": "a3",
            "type": "stock_low",
            "title": "Low stock",
            "message": "SKU 1042 below threshold",
            "severity": "medium",
            "source": "inventory",
            "created_at": "2024-03-01T09:00:00Z",
            "acknowledged": true
        },
        {
            "id": 4,
            "type": "latency",
            "title": "Slow search",
            "message": "p95 above 800ms",
            "severity": "low",
            "source": "search",
            "created_at": "2024-03-01T08:00:00Z"
        }
    ])
}

pub fn sample_rules() -> Value {
    json!([
        { "id": "r1", "name": "Payment errors", "condition": "error_rate > 0.05", "severity": "critical", "enabled": true },
        { "id": "r2", "name": "Driver supply", "condition": "online_drivers < 20", "severity": "high", "enabled": false }
    ])
}

pub fn sample_dashboard() -> Value {
    json!({ "total_active": 4, "critical": 1, "acknowledged": 1, "open_incidents": 0 })
}

/// Arabic enabled and default, English configured but disabled
pub fn sample_languages() -> Value {
    json!([
        { "code": "ar", "name": "العربية", "enabled": true, "is_default": true, "rtl": true },
        { "code": "en", "name": "English", "enabled": false, "is_default": false, "rtl": false }
    ])
}

pub fn sample_notifications() -> Value {
    json!([
        { "id": 11, "title": "Order shipped", "message": "Order #1001 is on its way", "read": false, "created_at": "2024-03-01T10:00:00Z" },
        { "id": 12, "title": "Ride completed", "message": "Rate your driver", "read": false, "created_at": "2024-03-01T11:00:00Z" },
        { "id": 13, "title": "Welcome", "message": "Thanks for joining", "read": true, "created_at": "2024-02-01T09:00:00Z" }
    ])
}

pub fn sample_wishlist() -> Value {
    json!([
        { "id": "w1", "product_id": "p-100", "name": "Prayer mat", "price": 45.0, "added_at": "2024-02-20T12:00:00Z" },
        { "id": "w2", "product_id": "p-200", "name": "Dates gift box", "price": 120.5 }
    ])
}
