use std::sync::Arc;

use tracing::info;

use super::domain::{
    LogEntry, MarketRecord, MarketStatus, MarketSubmission, MarketType, NewUser, RegistrySnapshot,
    Role, User, VendorRecord, VendorStatus, VendorSubmission,
};
use super::guard::{self, StallAssignment, TransitionDenied};
use super::reference;
use super::store::{RegistryStore, StoreError};

/// Service facade composing the store and the workflow guard. Every
/// operation takes the injected store handle; there is no global state.
pub struct RegistryService {
    store: Arc<RegistryStore>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("email already exists")]
    DuplicateEmail,
    #[error(transparent)]
    Denied(#[from] TransitionDenied),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RegistryService {
    pub fn new(store: Arc<RegistryStore>) -> Self {
        Self { store }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<User, RegistryError> {
        self.store
            .authenticate(email, password)?
            .ok_or(RegistryError::InvalidCredentials)
    }

    /// Self-service registration. Role defaults to `applicant` when omitted.
    pub fn register_user(&self, new: NewUser) -> Result<User, RegistryError> {
        let role = new.role.unwrap_or(Role::Applicant);
        match self.store.insert_user(&new, role) {
            Ok(user) => {
                info!(email = %user.email, role = role.as_str(), "account registered");
                Ok(user)
            }
            Err(StoreError::Conflict) => Err(RegistryError::DuplicateEmail),
            Err(other) => Err(other.into()),
        }
    }

    pub fn register_market(
        &self,
        submission: MarketSubmission,
    ) -> Result<MarketRecord, RegistryError> {
        let ref_no = reference::market_reference();
        let record = self.store.insert_market(&ref_no, &submission)?;
        info!(ref_no = %record.ref_no, market = %record.name, "market application registered");
        Ok(record)
    }

    /// Apply a guarded market transition and return the updated record.
    pub fn market_transition(
        &self,
        actor: Role,
        market_id: i64,
        requested: MarketStatus,
    ) -> Result<MarketRecord, RegistryError> {
        let market = self.store.get_market(market_id)?;
        guard::market_transition(actor, market.status, requested)?;
        self.store.set_market_status(market_id, requested)?;
        info!(
            ref_no = %market.ref_no,
            from = market.status.as_str(),
            to = requested.as_str(),
            actor = actor.as_str(),
            "market status moved"
        );
        Ok(self.store.get_market(market_id)?)
    }

    pub fn register_vendor(
        &self,
        submission: VendorSubmission,
    ) -> Result<VendorRecord, RegistryError> {
        let ref_no = reference::vendor_reference();
        let record = self.store.insert_vendor(&ref_no, &submission)?;
        info!(ref_no = %record.ref_no, vendor = %record.full_name, "stall application registered");
        Ok(record)
    }

    /// Apply a guarded vendor transition; approval carries the stall
    /// assignment into the store.
    pub fn vendor_transition(
        &self,
        actor: Role,
        vendor_id: i64,
        requested: VendorStatus,
        stall_no: Option<&str>,
    ) -> Result<VendorRecord, RegistryError> {
        let vendor = self.store.get_vendor(vendor_id)?;
        let effect = guard::vendor_transition(actor, vendor.status, requested, stall_no)?;
        let stall = match &effect {
            StallAssignment::Assign(stall) => Some(stall.as_str()),
            StallAssignment::None => None,
        };
        self.store.set_vendor_status(vendor_id, requested, stall)?;
        info!(
            ref_no = %vendor.ref_no,
            from = vendor.status.as_str(),
            to = requested.as_str(),
            actor = actor.as_str(),
            "vendor status moved"
        );
        Ok(self.store.get_vendor(vendor_id)?)
    }

    pub fn markets(&self) -> Result<Vec<MarketRecord>, RegistryError> {
        Ok(self.store.list_markets()?)
    }

    pub fn vendors(&self) -> Result<Vec<VendorRecord>, RegistryError> {
        Ok(self.store.list_vendors()?)
    }

    pub fn users(&self) -> Result<Vec<User>, RegistryError> {
        Ok(self.store.list_users()?)
    }

    pub fn logs(&self) -> Result<Vec<LogEntry>, RegistryError> {
        Ok(self.store.list_logs()?)
    }

    /// Dashboard counts, computed over the full listings on every call.
    pub fn dashboard(&self) -> Result<RegistrySnapshot, RegistryError> {
        let markets = self.store.list_markets()?;
        let vendors = self.store.list_vendors()?;

        let count_type =
            |t: MarketType| markets.iter().filter(|m| m.market_type == t).count() as i64;
        let approved_markets = markets
            .iter()
            .filter(|m| m.status == MarketStatus::Approved)
            .count() as i64;
        let active_vendors = vendors
            .iter()
            .filter(|v| v.status == VendorStatus::Approved)
            .count() as i64;
        let pending_applications = markets
            .iter()
            .filter(|m| m.status == MarketStatus::Pending)
            .count() as i64
            + vendors
                .iter()
                .filter(|v| v.status == VendorStatus::Pending)
                .count() as i64;
        let total_stalls: i64 = markets.iter().map(|m| m.stalls_count).sum();

        Ok(RegistrySnapshot {
            total_markets: markets.len() as i64,
            approved_markets,
            active_vendors,
            pending_applications,
            public_markets: count_type(MarketType::Public),
            private_markets: count_type(MarketType::Private),
            community_markets: count_type(MarketType::Community),
            total_stalls,
            allocated_stalls: active_vendors,
            available_stalls: total_stalls - active_vendors,
        })
    }
}
