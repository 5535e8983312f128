//! Admin roles and their fixed permission sets.
//!
//! Roles are stored on the user document (`customClaims.role`) and carry a
//! permission set that is fixed per role, not editable per admin.

use serde::{Deserialize, Serialize};

/// Permission an admin role can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageUsers,
    ManageVeterinarians,
    ManageStores,
    ManageAdvertisements,
    ManageReports,
    ManageAdmins,
    ManageSettings,
    ViewAnalytics,
}

/// The fixed set of permissions granted by a role.
pub type PermissionSet = &'static [Permission];

/// Admin role/permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full privileges, including admin and settings management.
    SuperAdmin,
    /// Day-to-day management, but cannot manage admins or settings.
    #[default]
    Admin,
    /// Review-only role limited to advertisements.
    Moderator,
}

impl AdminRole {
    /// Human-readable role name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SuperAdmin => "Super Admin",
            Self::Admin => "Admin",
            Self::Moderator => "Moderator",
        }
    }

    /// The fixed permission set for this role.
    #[must_use]
    pub const fn permissions(self) -> PermissionSet {
        match self {
            Self::SuperAdmin => &[
                Permission::ManageUsers,
                Permission::ManageVeterinarians,
                Permission::ManageStores,
                Permission::ManageAdvertisements,
                Permission::ManageReports,
                Permission::ManageAdmins,
                Permission::ManageSettings,
                Permission::ViewAnalytics,
            ],
            Self::Admin => &[
                Permission::ManageUsers,
                Permission::ManageVeterinarians,
                Permission::ManageStores,
                Permission::ManageAdvertisements,
                Permission::ManageReports,
                Permission::ViewAnalytics,
            ],
            Self::Moderator => &[Permission::ManageAdvertisements],
        }
    }

    /// Whether this role holds the given permission.
    ///
    /// `SuperAdmin` holds every permission by definition.
    #[must_use]
    pub fn has_permission(self, permission: Permission) -> bool {
        matches!(self, Self::SuperAdmin) || self.permissions().contains(&permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_holds_everything() {
        assert!(AdminRole::SuperAdmin.has_permission(Permission::ManageAdmins));
        assert!(AdminRole::SuperAdmin.has_permission(Permission::ManageSettings));
    }

    #[test]
    fn test_admin_cannot_manage_admins_or_settings() {
        assert!(AdminRole::Admin.has_permission(Permission::ManageUsers));
        assert!(!AdminRole::Admin.has_permission(Permission::ManageAdmins));
        assert!(!AdminRole::Admin.has_permission(Permission::ManageSettings));
    }

    #[test]
    fn test_moderator_is_ads_only() {
        assert!(AdminRole::Moderator.has_permission(Permission::ManageAdvertisements));
        assert!(!AdminRole::Moderator.has_permission(Permission::ManageReports));
        assert!(!AdminRole::Moderator.has_permission(Permission::ViewAnalytics));
    }

    #[test]
    fn test_role_serializes_snake_case() {
        let json = serde_json::to_string(&AdminRole::SuperAdmin).expect("serialize");
        assert_eq!(json, "\"super_admin\"");
    }
}
