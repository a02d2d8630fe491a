//! Market and vendor registration domain: records, the role/status workflow
//! guard, reference-number generation, the SQLite store, and the service
//! facade composing them.

pub mod domain;
pub mod guard;
pub mod reference;
pub mod service;
pub mod store;

pub use domain::{
    LogEntry, MarketRecord, MarketStatus, MarketSubmission, MarketType, NewUser, RegistrySnapshot,
    Role, User, VendorRecord, VendorStatus, VendorSubmission,
};
pub use guard::{StallAssignment, TransitionDenied};
pub use service::{RegistryError, RegistryService};
pub use store::{RegistryStore, StoreError};
