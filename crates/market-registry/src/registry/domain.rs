use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff and applicant roles. Fixed closed set; a user's role never changes
/// after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Officer,
    Applicant,
    Vendor,
    Director,
    Manager,
    Supervisor,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Officer => "officer",
            Role::Applicant => "applicant",
            Role::Vendor => "vendor",
            Role::Director => "director",
            Role::Manager => "manager",
            Role::Supervisor => "supervisor",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "officer" => Some(Role::Officer),
            "applicant" => Some(Role::Applicant),
            "vendor" => Some(Role::Vendor),
            "director" => Some(Role::Director),
            "manager" => Some(Role::Manager),
            "supervisor" => Some(Role::Supervisor),
            _ => None,
        }
    }
}

/// Lifecycle of a market application: pending -> recommended -> approved
/// or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketStatus {
    Pending,
    Recommended,
    Approved,
    Rejected,
}

impl MarketStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            MarketStatus::Pending => "pending",
            MarketStatus::Recommended => "recommended",
            MarketStatus::Approved => "approved",
            MarketStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(MarketStatus::Pending),
            "recommended" => Some(MarketStatus::Recommended),
            "approved" => Some(MarketStatus::Approved),
            "rejected" => Some(MarketStatus::Rejected),
            _ => None,
        }
    }
}

/// Lifecycle of a stall application: pending -> verified -> approved or
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorStatus {
    Pending,
    Verified,
    Approved,
    Rejected,
}

impl VendorStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            VendorStatus::Pending => "pending",
            VendorStatus::Verified => "verified",
            VendorStatus::Approved => "approved",
            VendorStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(VendorStatus::Pending),
            "verified" => Some(VendorStatus::Verified),
            "approved" => Some(VendorStatus::Approved),
            "rejected" => Some(VendorStatus::Rejected),
            _ => None,
        }
    }
}

/// Ownership category of a trading site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketType {
    Private,
    Public,
    Community,
}

impl MarketType {
    pub const fn as_str(self) -> &'static str {
        match self {
            MarketType::Private => "Private",
            MarketType::Public => "Public",
            MarketType::Community => "Community",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Private" => Some(MarketType::Private),
            "Public" => Some(MarketType::Public),
            "Community" => Some(MarketType::Community),
            _ => None,
        }
    }
}

/// A registered account. The stored password never leaves the store; this is
/// the shape listings and login responses expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: String,
}

/// Payload for account registration. Role defaults to `applicant` when
/// omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// A market application as persisted, including its generated reference and
/// workflow status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRecord {
    pub id: i64,
    pub ref_no: String,
    pub name: String,
    pub owner_name: String,
    pub owner_id_no: String,
    pub owner_phone: String,
    pub owner_email: Option<String>,
    pub owner_address: String,
    pub address: String,
    #[serde(rename = "type")]
    pub market_type: MarketType,
    pub size: f64,
    pub stalls_count: i64,
    pub year_established: Option<i64>,
    pub operating_days: String,
    pub operating_hours: String,
    pub manager_name: String,
    pub manager_contact: String,
    pub status: MarketStatus,
    pub created_at: DateTime<Utc>,
}

/// Applicant-supplied fields for a new market application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSubmission {
    pub name: String,
    pub owner_name: String,
    pub owner_id_no: String,
    pub owner_phone: String,
    #[serde(default)]
    pub owner_email: Option<String>,
    pub owner_address: String,
    pub address: String,
    #[serde(rename = "type")]
    pub market_type: MarketType,
    pub size: f64,
    pub stalls_count: i64,
    #[serde(default)]
    pub year_established: Option<i64>,
    pub operating_days: String,
    pub operating_hours: String,
    pub manager_name: String,
    pub manager_contact: String,
}

/// A stall application as persisted. `market_name` is joined in from the
/// markets table for listings; `stall_no` is set when a manager approves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub id: i64,
    pub ref_no: String,
    pub user_id: i64,
    pub market_id: Option<i64>,
    pub market_name: Option<String>,
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub business_type: String,
    pub products: String,
    pub stall_type: Option<String>,
    pub stall_no: Option<String>,
    pub status: VendorStatus,
    pub created_at: DateTime<Utc>,
}

/// Applicant-supplied fields for a new stall application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorSubmission {
    pub user_id: i64,
    #[serde(default)]
    pub market_id: Option<i64>,
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub business_type: String,
    pub products: String,
    #[serde(default)]
    pub stall_type: Option<String>,
}

/// Append-only audit entry. `user_name` is joined in for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_name: Option<String>,
    pub action: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Dashboard counts computed over the full market and vendor listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub total_markets: i64,
    pub approved_markets: i64,
    pub active_vendors: i64,
    pub pending_applications: i64,
    pub public_markets: i64,
    pub private_markets: i64,
    pub community_markets: i64,
    pub total_stalls: i64,
    pub allocated_stalls: i64,
    pub available_stalls: i64,
}
