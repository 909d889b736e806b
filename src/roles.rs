//! Portal role model and landing routes
//! ------------------------------------
//! The portal serves a fixed set of user categories. Roles are a closed
//! enumeration so that role -> route dispatch is exhaustiveness-checked at
//! compile time; adding a role is a compile-time-visible change rather than a
//! new magic string.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Landing path used when a role string falls outside the known set.
pub const DEFAULT_LANDING: &str = "/dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Patient,
    Doctor,
    Nurse,
    ChildCareNurse,
    Pharmacy,
    Lab,
    Ambulance,
    Admin,
    Corporate,
    Insurance,
    ReferralPartner,
}

impl Role {
    /// All roles, in the order the portal lists them.
    pub const ALL: [Role; 11] = [
        Role::Patient,
        Role::Doctor,
        Role::Nurse,
        Role::ChildCareNurse,
        Role::Pharmacy,
        Role::Lab,
        Role::Ambulance,
        Role::Admin,
        Role::Corporate,
        Role::Insurance,
        Role::ReferralPartner,
    ];

    /// Wire/storage name of the role (kebab-case, matches the serde form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Nurse => "nurse",
            Role::ChildCareNurse => "child-care-nurse",
            Role::Pharmacy => "pharmacy",
            Role::Lab => "lab",
            Role::Ambulance => "ambulance",
            Role::Admin => "admin",
            Role::Corporate => "corporate",
            Role::Insurance => "insurance",
            Role::ReferralPartner => "referral-partner",
        }
    }

    /// Fixed landing path a user of this role is redirected to after login.
    /// Exhaustive on purpose: a new role will not compile without a route.
    pub fn landing_route(&self) -> &'static str {
        match self {
            Role::Patient => "/patient/dashboard",
            Role::Doctor => "/doctor/dashboard",
            Role::Nurse => "/nurse/dashboard",
            Role::ChildCareNurse => "/child-care-nurse/dashboard",
            Role::Pharmacy => "/pharmacy/dashboard",
            Role::Lab => "/lab/dashboard",
            Role::Ambulance => "/ambulance/dashboard",
            Role::Admin => "/admin/dashboard",
            Role::Corporate => "/corporate/dashboard",
            Role::Insurance => "/insurance/dashboard",
            Role::ReferralPartner => "/referral-partner/dashboard",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "nurse" => Ok(Role::Nurse),
            "child-care-nurse" => Ok(Role::ChildCareNurse),
            "pharmacy" => Ok(Role::Pharmacy),
            "lab" => Ok(Role::Lab),
            "ambulance" => Ok(Role::Ambulance),
            "admin" => Ok(Role::Admin),
            "corporate" => Ok(Role::Corporate),
            "insurance" => Ok(Role::Insurance),
            "referral-partner" => Ok(Role::ReferralPartner),
            _ => Err(()),
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total mapping from an arbitrary role string to a landing path.
/// Unknown strings fall back to [`DEFAULT_LANDING`]; this never fails.
pub fn landing_route_for(role: &str) -> &'static str {
    match Role::from_str(role) {
        Ok(r) => r.landing_route(),
        Err(()) => DEFAULT_LANDING,
    }
}
