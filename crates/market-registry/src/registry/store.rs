//! SQLite-backed record store.
//!
//! The schema is created idempotently on open and five fixed staff accounts
//! are seeded when the users table is empty. A single connection behind a
//! mutex is enough for the single-request-at-a-time semantics the service
//! needs; no operation spans more than one statement plus a re-fetch.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::domain::{
    LogEntry, MarketRecord, MarketStatus, MarketSubmission, MarketType, NewUser, Role, User,
    VendorRecord, VendorStatus, VendorSubmission,
};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      email TEXT UNIQUE NOT NULL,
      password TEXT NOT NULL,
      role TEXT NOT NULL,
      status TEXT NOT NULL DEFAULT 'active'
    );

    CREATE TABLE IF NOT EXISTS markets (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      ref_no TEXT UNIQUE NOT NULL,
      name TEXT NOT NULL,
      owner_name TEXT NOT NULL,
      owner_id_no TEXT NOT NULL,
      owner_phone TEXT NOT NULL,
      owner_email TEXT,
      owner_address TEXT NOT NULL,
      address TEXT NOT NULL,
      type TEXT NOT NULL,
      size REAL NOT NULL,
      stalls_count INTEGER NOT NULL,
      year_established INTEGER,
      operating_days TEXT NOT NULL,
      operating_hours TEXT NOT NULL,
      manager_name TEXT NOT NULL,
      manager_contact TEXT NOT NULL,
      status TEXT NOT NULL DEFAULT 'pending',
      created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS vendors (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      ref_no TEXT UNIQUE NOT NULL,
      user_id INTEGER NOT NULL,
      market_id INTEGER,
      full_name TEXT NOT NULL,
      national_id TEXT NOT NULL,
      phone TEXT NOT NULL,
      business_type TEXT NOT NULL,
      products TEXT NOT NULL,
      stall_type TEXT,
      stall_no TEXT,
      status TEXT NOT NULL DEFAULT 'pending',
      created_at TEXT NOT NULL,
      FOREIGN KEY (user_id) REFERENCES users(id),
      FOREIGN KEY (market_id) REFERENCES markets(id)
    );

    CREATE TABLE IF NOT EXISTS logs (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id INTEGER,
      action TEXT NOT NULL,
      details TEXT,
      timestamp TEXT NOT NULL
    );
";

/// Staff accounts present in every fresh registry.
const SEED_ACCOUNTS: [(&str, &str, &str, Role); 5] = [
    ("Admin User", "admin@markets.gov", "admin123", Role::Admin),
    (
        "Markets Director",
        "director@markets.gov",
        "director123",
        Role::Director,
    ),
    (
        "Markets Manager",
        "manager@markets.gov",
        "manager123",
        Role::Manager,
    ),
    (
        "Market Supervisor",
        "supervisor@markets.gov",
        "supervisor123",
        Role::Supervisor,
    ),
    (
        "Registry Officer",
        "officer@markets.gov",
        "officer123",
        Role::Officer,
    ),
];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Backend(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict
            }
            rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
            other => StoreError::Backend(other),
        }
    }
}

/// Durable store for users, markets, vendors, and audit logs.
pub struct RegistryStore {
    conn: Mutex<Connection>,
}

impl RegistryStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::initialize(Connection::open(path)?)
    }

    /// Backing for tests and the CLI demo.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        seed_if_empty(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("store mutex poisoned")
    }

    pub fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>, StoreError> {
        let conn = self.conn();
        let user = conn
            .query_row(
                "SELECT id, name, email, role, status FROM users
                 WHERE email = ?1 AND password = ?2",
                params![email, password],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn insert_user(&self, new: &NewUser, role: Role) -> Result<User, StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO users (name, email, password, role) VALUES (?1, ?2, ?3, ?4)",
            params![new.name, new.email, new.password, role.as_str()],
        )?;
        let id = conn.last_insert_rowid();
        let user = conn.query_row(
            "SELECT id, name, email, role, status FROM users WHERE id = ?1",
            params![id],
            user_from_row,
        )?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, name, email, role, status FROM users")?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn insert_market(
        &self,
        ref_no: &str,
        submission: &MarketSubmission,
    ) -> Result<MarketRecord, StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO markets (
               ref_no, name, owner_name, owner_id_no, owner_phone, owner_email,
               owner_address, address, type, size, stalls_count, year_established,
               operating_days, operating_hours, manager_name, manager_contact,
               status, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                       ?15, ?16, 'pending', ?17)",
            params![
                ref_no,
                submission.name,
                submission.owner_name,
                submission.owner_id_no,
                submission.owner_phone,
                submission.owner_email,
                submission.owner_address,
                submission.address,
                submission.market_type.as_str(),
                submission.size,
                submission.stalls_count,
                submission.year_established,
                submission.operating_days,
                submission.operating_hours,
                submission.manager_name,
                submission.manager_contact,
                Utc::now(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        fetch_market(&conn, id)
    }

    pub fn list_markets(&self) -> Result<Vec<MarketRecord>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{MARKET_SELECT} ORDER BY created_at DESC, id DESC"
        ))?;
        let markets = stmt
            .query_map([], market_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(markets)
    }

    pub fn get_market(&self, id: i64) -> Result<MarketRecord, StoreError> {
        fetch_market(&self.conn(), id)
    }

    pub fn set_market_status(&self, id: i64, status: MarketStatus) -> Result<(), StoreError> {
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE markets SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub fn insert_vendor(
        &self,
        ref_no: &str,
        submission: &VendorSubmission,
    ) -> Result<VendorRecord, StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO vendors (
               ref_no, user_id, market_id, full_name, national_id, phone,
               business_type, products, stall_type, status, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', ?10)",
            params![
                ref_no,
                submission.user_id,
                submission.market_id,
                submission.full_name,
                submission.national_id,
                submission.phone,
                submission.business_type,
                submission.products,
                submission.stall_type,
                Utc::now(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        fetch_vendor(&conn, id)
    }

    pub fn list_vendors(&self) -> Result<Vec<VendorRecord>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "{VENDOR_SELECT} ORDER BY v.created_at DESC, v.id DESC"
        ))?;
        let vendors = stmt
            .query_map([], vendor_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(vendors)
    }

    pub fn get_vendor(&self, id: i64) -> Result<VendorRecord, StoreError> {
        fetch_vendor(&self.conn(), id)
    }

    pub fn set_vendor_status(
        &self,
        id: i64,
        status: VendorStatus,
        stall_no: Option<&str>,
    ) -> Result<(), StoreError> {
        let conn = self.conn();
        let changed = match stall_no {
            Some(stall) => conn.execute(
                "UPDATE vendors SET status = ?1, stall_no = ?2 WHERE id = ?3",
                params![status.as_str(), stall, id],
            )?,
            None => conn.execute(
                "UPDATE vendors SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id],
            )?,
        };
        if changed == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    pub fn append_log(
        &self,
        user_id: Option<i64>,
        action: &str,
        details: Option<&str>,
    ) -> Result<(), StoreError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO logs (user_id, action, details, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, action, details, Utc::now()],
        )?;
        Ok(())
    }

    pub fn list_logs(&self) -> Result<Vec<LogEntry>, StoreError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT l.id, l.user_id, u.name, l.action, l.details, l.timestamp
             FROM logs l
             LEFT JOIN users u ON l.user_id = u.id
             ORDER BY l.timestamp DESC, l.id DESC
             LIMIT 100",
        )?;
        let logs = stmt
            .query_map([], log_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}

fn seed_if_empty(conn: &Connection) -> Result<(), rusqlite::Error> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }
    let mut stmt =
        conn.prepare("INSERT INTO users (name, email, password, role) VALUES (?1, ?2, ?3, ?4)")?;
    for (name, email, password, role) in SEED_ACCOUNTS {
        stmt.execute(params![name, email, password, role.as_str()])?;
    }
    Ok(())
}

const MARKET_SELECT: &str = "SELECT id, ref_no, name, owner_name, owner_id_no, owner_phone,
       owner_email, owner_address, address, type, size, stalls_count,
       year_established, operating_days, operating_hours, manager_name,
       manager_contact, status, created_at
     FROM markets";

const VENDOR_SELECT: &str = "SELECT v.id, v.ref_no, v.user_id, v.market_id, m.name, v.full_name,
       v.national_id, v.phone, v.business_type, v.products, v.stall_type,
       v.stall_no, v.status, v.created_at
     FROM vendors v
     LEFT JOIN markets m ON v.market_id = m.id";

fn fetch_market(conn: &Connection, id: i64) -> Result<MarketRecord, StoreError> {
    let market = conn.query_row(
        &format!("{MARKET_SELECT} WHERE id = ?1"),
        params![id],
        market_from_row,
    )?;
    Ok(market)
}

fn fetch_vendor(conn: &Connection, id: i64) -> Result<VendorRecord, StoreError> {
    let vendor = conn.query_row(
        &format!("{VENDOR_SELECT} WHERE v.id = ?1"),
        params![id],
        vendor_from_row,
    )?;
    Ok(vendor)
}

fn invalid_text(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

fn user_from_row(row: &Row<'_>) -> Result<User, rusqlite::Error> {
    let role_raw: String = row.get(3)?;
    let role =
        Role::parse(&role_raw).ok_or_else(|| invalid_text(3, format!("unknown role '{role_raw}'")))?;
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role,
        status: row.get(4)?,
    })
}

fn market_from_row(row: &Row<'_>) -> Result<MarketRecord, rusqlite::Error> {
    let type_raw: String = row.get(9)?;
    let market_type = MarketType::parse(&type_raw)
        .ok_or_else(|| invalid_text(9, format!("unknown market type '{type_raw}'")))?;
    let status_raw: String = row.get(17)?;
    let status = MarketStatus::parse(&status_raw)
        .ok_or_else(|| invalid_text(17, format!("unknown market status '{status_raw}'")))?;
    Ok(MarketRecord {
        id: row.get(0)?,
        ref_no: row.get(1)?,
        name: row.get(2)?,
        owner_name: row.get(3)?,
        owner_id_no: row.get(4)?,
        owner_phone: row.get(5)?,
        owner_email: row.get(6)?,
        owner_address: row.get(7)?,
        address: row.get(8)?,
        market_type,
        size: row.get(10)?,
        stalls_count: row.get(11)?,
        year_established: row.get(12)?,
        operating_days: row.get(13)?,
        operating_hours: row.get(14)?,
        manager_name: row.get(15)?,
        manager_contact: row.get(16)?,
        status,
        created_at: row.get(18)?,
    })
}

fn vendor_from_row(row: &Row<'_>) -> Result<VendorRecord, rusqlite::Error> {
    let status_raw: String = row.get(12)?;
    let status = VendorStatus::parse(&status_raw)
        .ok_or_else(|| invalid_text(12, format!("unknown vendor status '{status_raw}'")))?;
    Ok(VendorRecord {
        id: row.get(0)?,
        ref_no: row.get(1)?,
        user_id: row.get(2)?,
        market_id: row.get(3)?,
        market_name: row.get(4)?,
        full_name: row.get(5)?,
        national_id: row.get(6)?,
        phone: row.get(7)?,
        business_type: row.get(8)?,
        products: row.get(9)?,
        stall_type: row.get(10)?,
        stall_no: row.get(11)?,
        status,
        created_at: row.get(13)?,
    })
}

fn log_from_row(row: &Row<'_>) -> Result<LogEntry, rusqlite::Error> {
    Ok(LogEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        user_name: row.get(2)?,
        action: row.get(3)?,
        details: row.get(4)?,
        timestamp: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_market(name: &str) -> MarketSubmission {
        MarketSubmission {
            name: name.to_string(),
            owner_name: "Grace Nankya".to_string(),
            owner_id_no: "CM900411003".to_string(),
            owner_phone: "+256700100200".to_string(),
            owner_email: Some("grace@example.com".to_string()),
            owner_address: "Plot 4, Market Lane".to_string(),
            address: "Central Division".to_string(),
            market_type: MarketType::Public,
            size: 1200.0,
            stalls_count: 80,
            year_established: Some(1998),
            operating_days: "Mon-Sat".to_string(),
            operating_hours: "06:00-18:00".to_string(),
            manager_name: "Joseph Okello".to_string(),
            manager_contact: "+256700300400".to_string(),
        }
    }

    fn sample_vendor(user_id: i64, market_id: Option<i64>) -> VendorSubmission {
        VendorSubmission {
            user_id,
            market_id,
            full_name: "Sarah Achieng".to_string(),
            national_id: "CF880101002".to_string(),
            phone: "+256700500600".to_string(),
            business_type: "Produce".to_string(),
            products: "Tomatoes, onions".to_string(),
            stall_type: Some("Open".to_string()),
        }
    }

    #[test]
    fn fresh_store_seeds_five_staff_accounts() {
        let store = RegistryStore::open_in_memory().expect("store opens");
        let users = store.list_users().expect("users list");
        assert_eq!(users.len(), 5);
        assert!(users.iter().any(|u| u.role == Role::Director));
        assert!(users.iter().all(|u| u.status == "active"));
    }

    #[test]
    fn authenticate_matches_on_email_and_password() {
        let store = RegistryStore::open_in_memory().expect("store opens");
        let user = store
            .authenticate("manager@markets.gov", "manager123")
            .expect("query runs")
            .expect("seeded manager found");
        assert_eq!(user.role, Role::Manager);

        let missing = store
            .authenticate("manager@markets.gov", "wrong")
            .expect("query runs");
        assert!(missing.is_none());
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let store = RegistryStore::open_in_memory().expect("store opens");
        let new = NewUser {
            name: "Admin Again".to_string(),
            email: "admin@markets.gov".to_string(),
            password: "pw".to_string(),
            role: None,
        };
        let err = store
            .insert_user(&new, Role::Applicant)
            .expect_err("email is unique");
        assert!(matches!(err, StoreError::Conflict));
    }

    #[test]
    fn markets_list_newest_first() {
        let store = RegistryStore::open_in_memory().expect("store opens");
        store
            .insert_market("MKT-AAAAAA", &sample_market("Wandegeya"))
            .expect("first insert");
        store
            .insert_market("MKT-BBBBBB", &sample_market("Nakasero"))
            .expect("second insert");

        let markets = store.list_markets().expect("markets list");
        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].name, "Nakasero");
        assert_eq!(markets[1].name, "Wandegeya");
        assert_eq!(markets[0].status, MarketStatus::Pending);
    }

    #[test]
    fn vendor_listing_joins_the_market_name() {
        let store = RegistryStore::open_in_memory().expect("store opens");
        let market = store
            .insert_market("MKT-CCCCCC", &sample_market("Owino"))
            .expect("market insert");
        store
            .insert_vendor("VND-AAAAAA", &sample_vendor(1, Some(market.id)))
            .expect("vendor insert");
        store
            .insert_vendor("VND-BBBBBB", &sample_vendor(1, None))
            .expect("unattached vendor insert");

        let vendors = store.list_vendors().expect("vendors list");
        assert_eq!(vendors.len(), 2);
        assert_eq!(vendors[1].market_name.as_deref(), Some("Owino"));
        assert!(vendors[0].market_name.is_none());
    }

    #[test]
    fn status_updates_on_missing_rows_are_not_found() {
        let store = RegistryStore::open_in_memory().expect("store opens");
        let err = store
            .set_market_status(99, MarketStatus::Recommended)
            .expect_err("no such market");
        assert!(matches!(err, StoreError::NotFound));
        let err = store
            .set_vendor_status(99, VendorStatus::Verified, None)
            .expect_err("no such vendor");
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn vendor_approval_stores_the_stall_number() {
        let store = RegistryStore::open_in_memory().expect("store opens");
        let vendor = store
            .insert_vendor("VND-CCCCCC", &sample_vendor(1, None))
            .expect("vendor insert");
        store
            .set_vendor_status(vendor.id, VendorStatus::Approved, Some("B-07"))
            .expect("status update");
        let updated = store.get_vendor(vendor.id).expect("vendor fetch");
        assert_eq!(updated.status, VendorStatus::Approved);
        assert_eq!(updated.stall_no.as_deref(), Some("B-07"));
    }

    #[test]
    fn logs_list_newest_first_with_user_names() {
        let store = RegistryStore::open_in_memory().expect("store opens");
        store
            .append_log(Some(1), "login", None)
            .expect("first log");
        store
            .append_log(None, "schema_check", Some("startup"))
            .expect("second log");

        let logs = store.list_logs().expect("logs list");
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, "schema_check");
        assert!(logs[0].user_name.is_none());
        assert_eq!(logs[1].user_name.as_deref(), Some("Admin User"));
    }

    #[test]
    fn reopening_a_database_is_idempotent_and_keeps_records() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("registry.db");

        {
            let store = RegistryStore::open(&path).expect("first open");
            store
                .insert_market("MKT-DDDDDD", &sample_market("Kasubi"))
                .expect("market insert");
        }

        let store = RegistryStore::open(&path).expect("second open");
        let users = store.list_users().expect("users list");
        assert_eq!(users.len(), 5, "seeding must not repeat");
        let markets = store.list_markets().expect("markets list");
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].ref_no, "MKT-DDDDDD");
    }
}
