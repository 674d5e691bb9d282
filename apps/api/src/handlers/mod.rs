//! HTTP handlers, one module per route group. Handlers parse the request
//! shape, delegate to the services, and shape the response; no business
//! rules live here.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod items;
pub mod reports;
pub mod settings;
pub mod transactions;
pub mod users;

use serde::Serialize;

use warung_core::types::Tenant;

/// Receipt header info attached to transaction reads, from the tenant
/// profile.
#[derive(Debug, Clone, Serialize)]
pub struct ReceiptInfo {
    pub business_name: String,
    pub address: String,
    pub phone: String,
}

impl ReceiptInfo {
    pub fn from_tenant(tenant: Option<Tenant>) -> Self {
        match tenant {
            Some(t) => ReceiptInfo {
                business_name: t.name,
                address: t.address.unwrap_or_default(),
                phone: t.phone.unwrap_or_default(),
            },
            None => ReceiptInfo {
                business_name: "Warung".to_string(),
                address: String::new(),
                phone: String::new(),
            },
        }
    }
}
