use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    ViewOwnResource,
    /// Lets admins switch the dashboard to any resource.
    ViewAllResources,
    ManageAllocations,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewOwnResource => "view-own-resource",
            Permission::ViewAllResources => "view-all-resources",
            Permission::ManageAllocations => "manage-allocations",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown permission '{0}'")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "view-own-resource" => Ok(Permission::ViewOwnResource),
            "view-all-resources" => Ok(Permission::ViewAllResources),
            "manage-allocations" => Ok(Permission::ManageAllocations),
            _ => Err(UnknownPermission(s.to_string())),
        }
    }
}

/// Capabilities of the caller, established at the session boundary and
/// passed explicitly to whatever needs to check them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    /// The resource record linked to this user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub permissions: BTreeSet<Permission>,
}

impl Session {
    pub fn new<I>(user_id: impl Into<String>, resource_id: Option<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = Permission>,
    {
        Self {
            user_id: user_id.into(),
            resource_id,
            permissions: permissions.into_iter().collect(),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn require(&self, permission: Permission) -> Result<(), AccessError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AccessError::MissingPermission {
                user_id: self.user_id.clone(),
                permission,
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("user {user_id} may not view resource {resource_id}")]
    Forbidden { user_id: String, resource_id: String },
    #[error("user {user_id} has no linked resource")]
    NoLinkedResource { user_id: String },
    #[error("user {user_id} lacks permission {permission}")]
    MissingPermission {
        user_id: String,
        permission: Permission,
    },
}

/// Picks the resource the dashboard should show.
///
/// Without a request the session's own resource is shown. Requesting another
/// resource requires [`Permission::ViewAllResources`].
pub fn resolve_viewed_resource(
    session: &Session,
    requested: Option<&str>,
) -> Result<String, AccessError> {
    let own = session.resource_id.as_deref();
    match requested {
        None => own.map(ToOwned::to_owned).ok_or_else(|| AccessError::NoLinkedResource {
            user_id: session.user_id.clone(),
        }),
        Some(id) if Some(id) == own => Ok(id.to_string()),
        Some(id) if session.has_permission(Permission::ViewAllResources) => {
            tracing::debug!(user_id = %session.user_id, resource_id = id, "switching viewed resource");
            Ok(id.to_string())
        }
        Some(id) => Err(AccessError::Forbidden {
            user_id: session.user_id.clone(),
            resource_id: id.to_string(),
        }),
    }
}
