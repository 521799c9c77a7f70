//! Bearer token claims issued by the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to an employee by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular employee: submits and views own requests.
    Employee,
    /// Has direct reports and decides their requests.
    Supervisor,
    /// Administers quotas and the leave-type catalogue.
    HrAdmin,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Supervisor => "supervisor",
            Self::HrAdmin => "hr_admin",
        }
    }
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (employee ID).
    pub sub: Uuid,
    /// Roles held by the subject.
    #[serde(default)]
    pub roles: Vec<Role>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an employee.
    #[must_use]
    pub fn new(employee_id: Uuid, roles: Vec<Role>, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: employee_id,
            roles,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the employee ID from claims.
    #[must_use]
    pub const fn employee_id(&self) -> Uuid {
        self.sub
    }

    /// Returns true if the claims carry the given role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}
