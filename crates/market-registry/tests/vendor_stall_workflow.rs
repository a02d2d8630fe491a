//! End-to-end scenarios for the vendor verification and stall allocation
//! workflow.

mod common {
    use std::sync::Arc;

    use market_registry::registry::{
        MarketStatus, MarketSubmission, MarketType, RegistryService, RegistryStore, Role,
        VendorSubmission,
    };

    pub(super) fn service() -> RegistryService {
        let store = RegistryStore::open_in_memory().expect("in-memory store opens");
        RegistryService::new(Arc::new(store))
    }

    /// Register a market and walk it to approval so vendors can attach to it.
    pub(super) fn approved_market(service: &RegistryService, name: &str) -> i64 {
        let market = service
            .register_market(MarketSubmission {
                name: name.to_string(),
                owner_name: "Grace Nankya".to_string(),
                owner_id_no: "CM900411003".to_string(),
                owner_phone: "+256700100200".to_string(),
                owner_email: None,
                owner_address: "Plot 4, Market Lane".to_string(),
                address: "Central Division".to_string(),
                market_type: MarketType::Public,
                size: 1200.0,
                stalls_count: 80,
                year_established: None,
                operating_days: "Mon-Sat".to_string(),
                operating_hours: "06:00-18:00".to_string(),
                manager_name: "Joseph Okello".to_string(),
                manager_contact: "+256700300400".to_string(),
            })
            .expect("market registers");
        service
            .market_transition(Role::Manager, market.id, MarketStatus::Recommended)
            .expect("recommend");
        service
            .market_transition(Role::Director, market.id, MarketStatus::Approved)
            .expect("approve");
        market.id
    }

    pub(super) fn submission(market_id: Option<i64>) -> VendorSubmission {
        VendorSubmission {
            user_id: 1,
            market_id,
            full_name: "Sarah Achieng".to_string(),
            national_id: "CF880101002".to_string(),
            phone: "+256700500600".to_string(),
            business_type: "Produce".to_string(),
            products: "Tomatoes, onions".to_string(),
            stall_type: Some("Open".to_string()),
        }
    }
}

use market_registry::registry::{RegistryError, Role, TransitionDenied, VendorStatus};

#[test]
fn registration_yields_a_pending_vendor_with_vnd_reference() {
    let service = common::service();
    let vendor = service
        .register_vendor(common::submission(None))
        .expect("registration succeeds");

    assert!(vendor.ref_no.starts_with("VND-"));
    assert_eq!(vendor.status, VendorStatus::Pending);
    assert!(vendor.stall_no.is_none());
}

#[test]
fn supervisor_verifies_then_manager_approves_with_a_stall() {
    let service = common::service();
    let market_id = common::approved_market(&service, "Owino");
    let vendor = service
        .register_vendor(common::submission(Some(market_id)))
        .expect("registration succeeds");

    let verified = service
        .vendor_transition(Role::Supervisor, vendor.id, VendorStatus::Verified, None)
        .expect("supervisor verifies pending vendor");
    assert_eq!(verified.status, VendorStatus::Verified);

    let approved = service
        .vendor_transition(
            Role::Manager,
            vendor.id,
            VendorStatus::Approved,
            Some("A-12"),
        )
        .expect("manager approves verified vendor");
    assert_eq!(approved.status, VendorStatus::Approved);
    assert_eq!(approved.stall_no.as_deref(), Some("A-12"));
    assert_eq!(approved.market_name.as_deref(), Some("Owino"));
}

#[test]
fn approval_without_a_stall_number_is_denied() {
    let service = common::service();
    let vendor = service
        .register_vendor(common::submission(None))
        .expect("registration succeeds");
    service
        .vendor_transition(Role::Supervisor, vendor.id, VendorStatus::Verified, None)
        .expect("verify");

    for stall in [None, Some(""), Some("  ")] {
        let err = service
            .vendor_transition(Role::Manager, vendor.id, VendorStatus::Approved, stall)
            .expect_err("stall number is mandatory");
        assert!(matches!(
            err,
            RegistryError::Denied(TransitionDenied::StallNumberRequired)
        ));
    }

    let current = service.vendors().expect("listing");
    assert_eq!(current[0].status, VendorStatus::Verified);
    assert!(current[0].stall_no.is_none());
}

#[test]
fn manager_cannot_approve_before_verification() {
    let service = common::service();
    let vendor = service
        .register_vendor(common::submission(None))
        .expect("registration succeeds");

    let err = service
        .vendor_transition(
            Role::Manager,
            vendor.id,
            VendorStatus::Approved,
            Some("A-12"),
        )
        .expect_err("verification comes first");
    assert!(matches!(
        err,
        RegistryError::Denied(TransitionDenied::InvalidTransition { .. })
    ));
}

#[test]
fn only_the_supervisor_verifies() {
    let service = common::service();
    let vendor = service
        .register_vendor(common::submission(None))
        .expect("registration succeeds");

    for role in [Role::Manager, Role::Officer, Role::Admin, Role::Applicant] {
        let err = service
            .vendor_transition(role, vendor.id, VendorStatus::Verified, None)
            .expect_err("verification belongs to the supervisor");
        assert!(matches!(
            err,
            RegistryError::Denied(TransitionDenied::RoleNotPermitted { .. })
        ));
    }
}

#[test]
fn vendor_listings_are_newest_first() {
    let service = common::service();
    service
        .register_vendor(common::submission(None))
        .expect("first");
    let second = service
        .register_vendor(common::submission(None))
        .expect("second");

    let vendors = service.vendors().expect("listing");
    assert_eq!(vendors.len(), 2);
    assert_eq!(vendors[0].id, second.id);
}

#[test]
fn dashboard_counts_follow_the_workflows() {
    let service = common::service();
    let market_id = common::approved_market(&service, "Owino");
    let vendor = service
        .register_vendor(common::submission(Some(market_id)))
        .expect("vendor registers");
    service
        .register_vendor(common::submission(None))
        .expect("second vendor stays pending");

    service
        .vendor_transition(Role::Supervisor, vendor.id, VendorStatus::Verified, None)
        .expect("verify");
    service
        .vendor_transition(
            Role::Manager,
            vendor.id,
            VendorStatus::Approved,
            Some("C-01"),
        )
        .expect("approve");

    let snapshot = service.dashboard().expect("dashboard");
    assert_eq!(snapshot.total_markets, 1);
    assert_eq!(snapshot.approved_markets, 1);
    assert_eq!(snapshot.active_vendors, 1);
    assert_eq!(snapshot.pending_applications, 1);
    assert_eq!(snapshot.public_markets, 1);
    assert_eq!(snapshot.total_stalls, 80);
    assert_eq!(snapshot.allocated_stalls, 1);
    assert_eq!(snapshot.available_stalls, 79);
}
