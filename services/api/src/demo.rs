use std::sync::Arc;

use market_registry::error::AppError;
use market_registry::registry::{
    MarketStatus, MarketSubmission, MarketType, RegistryService, RegistryStore, Role,
    VendorStatus, VendorSubmission,
};

/// Walk a market and a vendor through their full approval workflows against
/// an in-memory registry, printing each step.
pub(crate) fn run_demo() -> Result<(), AppError> {
    let store = Arc::new(
        RegistryStore::open_in_memory().map_err(market_registry::registry::RegistryError::from)?,
    );
    let service = RegistryService::new(store.clone());

    println!("Market registry demo (in-memory store, seeded staff accounts)");

    let manager = service.login("manager@markets.gov", "manager123")?;
    println!("- signed in as {} ({})", manager.name, manager.role.as_str());

    let market = service.register_market(MarketSubmission {
        name: "Nakasero Market".to_string(),
        owner_name: "Grace Nankya".to_string(),
        owner_id_no: "CM900411003".to_string(),
        owner_phone: "+256700100200".to_string(),
        owner_email: Some("grace@example.com".to_string()),
        owner_address: "Plot 4, Market Lane".to_string(),
        address: "Central Division".to_string(),
        market_type: MarketType::Public,
        size: 1200.0,
        stalls_count: 80,
        year_established: Some(1927),
        operating_days: "Mon-Sat".to_string(),
        operating_hours: "06:00-18:00".to_string(),
        manager_name: "Joseph Okello".to_string(),
        manager_contact: "+256700300400".to_string(),
    })?;
    println!(
        "- market application {} registered ({})",
        market.ref_no,
        market.status.as_str()
    );

    let market = service.market_transition(Role::Manager, market.id, MarketStatus::Recommended)?;
    println!("- manager recommended -> {}", market.status.as_str());
    let market = service.market_transition(Role::Director, market.id, MarketStatus::Approved)?;
    println!("- director approved -> {}", market.status.as_str());

    let vendor = service.register_vendor(VendorSubmission {
        user_id: manager.id,
        market_id: Some(market.id),
        full_name: "Sarah Achieng".to_string(),
        national_id: "CF880101002".to_string(),
        phone: "+256700500600".to_string(),
        business_type: "Produce".to_string(),
        products: "Tomatoes, onions".to_string(),
        stall_type: Some("Open".to_string()),
    })?;
    println!(
        "- stall application {} registered ({})",
        vendor.ref_no,
        vendor.status.as_str()
    );

    let vendor =
        service.vendor_transition(Role::Supervisor, vendor.id, VendorStatus::Verified, None)?;
    println!("- supervisor verified -> {}", vendor.status.as_str());
    let vendor = service.vendor_transition(
        Role::Manager,
        vendor.id,
        VendorStatus::Approved,
        Some("A-12"),
    )?;
    println!(
        "- manager approved -> {} (stall {})",
        vendor.status.as_str(),
        vendor.stall_no.as_deref().unwrap_or("-")
    );

    store
        .append_log(Some(manager.id), "demo_completed", Some(&market.ref_no))
        .map_err(market_registry::registry::RegistryError::from)?;

    let snapshot = service.dashboard()?;
    println!("\nDashboard");
    println!("- markets: {} total, {} approved", snapshot.total_markets, snapshot.approved_markets);
    println!("- vendors: {} active", snapshot.active_vendors);
    println!(
        "- stalls: {} total, {} allocated, {} available",
        snapshot.total_stalls, snapshot.allocated_stalls, snapshot.available_stalls
    );
    println!("- pending applications: {}", snapshot.pending_applications);

    for entry in service.logs()? {
        println!(
            "- log: {} by {}",
            entry.action,
            entry.user_name.as_deref().unwrap_or("system")
        );
    }

    Ok(())
}
