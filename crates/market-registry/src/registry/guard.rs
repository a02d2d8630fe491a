//! Pure transition decisions for the approval workflows.
//!
//! Each table row pairs an actor role with the record status it may act on
//! and the status it may request. Anything outside the tables is denied, with
//! the denial distinguishing "wrong role" from "wrong current status" so the
//! HTTP layer can answer 403 versus 422.

use super::domain::{MarketStatus, Role, VendorStatus};

/// Denial reasons shared by both workflows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionDenied {
    #[error("role '{role}' may not set status '{requested}'")]
    RoleNotPermitted { role: String, requested: String },
    #[error("cannot move from '{current}' to '{requested}'")]
    InvalidTransition { current: String, requested: String },
    #[error("approving a vendor requires a non-empty stall number")]
    StallNumberRequired,
}

impl TransitionDenied {
    fn wrong_role(role: Role, requested: &str) -> Self {
        TransitionDenied::RoleNotPermitted {
            role: role.as_str().to_string(),
            requested: requested.to_string(),
        }
    }

    fn wrong_status(current: &str, requested: &str) -> Self {
        TransitionDenied::InvalidTransition {
            current: current.to_string(),
            requested: requested.to_string(),
        }
    }
}

/// Decide whether `actor` may move a market from `current` to `requested`.
///
/// | actor    | current     | requested   |
/// |----------|-------------|-------------|
/// | manager  | pending     | recommended |
/// | director | recommended | approved    |
/// | director | recommended | rejected    |
pub fn market_transition(
    actor: Role,
    current: MarketStatus,
    requested: MarketStatus,
) -> Result<(), TransitionDenied> {
    let required_role = match requested {
        MarketStatus::Recommended => Role::Manager,
        MarketStatus::Approved | MarketStatus::Rejected => Role::Director,
        MarketStatus::Pending => {
            // Nothing moves back to pending.
            return Err(TransitionDenied::wrong_status(
                current.as_str(),
                requested.as_str(),
            ));
        }
    };

    if actor != required_role {
        return Err(TransitionDenied::wrong_role(actor, requested.as_str()));
    }

    let expected_current = match requested {
        MarketStatus::Recommended => MarketStatus::Pending,
        _ => MarketStatus::Recommended,
    };

    if current != expected_current {
        return Err(TransitionDenied::wrong_status(
            current.as_str(),
            requested.as_str(),
        ));
    }

    Ok(())
}

/// Side effect a permitted vendor transition carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StallAssignment {
    None,
    Assign(String),
}

/// Decide whether `actor` may move a vendor from `current` to `requested`.
///
/// | actor      | current  | requested | side effect               |
/// |------------|----------|-----------|---------------------------|
/// | supervisor | pending  | verified  | none                      |
/// | manager    | verified | approved  | assign non-empty stall_no |
pub fn vendor_transition(
    actor: Role,
    current: VendorStatus,
    requested: VendorStatus,
    stall_no: Option<&str>,
) -> Result<StallAssignment, TransitionDenied> {
    match requested {
        VendorStatus::Verified => {
            if actor != Role::Supervisor {
                return Err(TransitionDenied::wrong_role(actor, requested.as_str()));
            }
            if current != VendorStatus::Pending {
                return Err(TransitionDenied::wrong_status(
                    current.as_str(),
                    requested.as_str(),
                ));
            }
            Ok(StallAssignment::None)
        }
        VendorStatus::Approved => {
            if actor != Role::Manager {
                return Err(TransitionDenied::wrong_role(actor, requested.as_str()));
            }
            if current != VendorStatus::Verified {
                return Err(TransitionDenied::wrong_status(
                    current.as_str(),
                    requested.as_str(),
                ));
            }
            let stall = stall_no.map(str::trim).unwrap_or_default();
            if stall.is_empty() {
                return Err(TransitionDenied::StallNumberRequired);
            }
            Ok(StallAssignment::Assign(stall.to_string()))
        }
        VendorStatus::Pending | VendorStatus::Rejected => Err(TransitionDenied::wrong_status(
            current.as_str(),
            requested.as_str(),
        )),
    }
}
