//! Shared type definitions.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{
    AccountId, AdvertisementId, LocationId, MessageId, ReportId, StoreId, UserId, VeterinarianId,
};
pub use role::{AdminRole, Permission, PermissionSet};
pub use status::{ApprovalStatus, ReportKind, UserStatus};
