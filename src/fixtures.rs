//! Seed fixtures
//! -------------
//! Role-partitioned demo collections plus one demo account per remaining
//! role, mirroring the portal's fixture layout. Used on first run when no
//! fixture file is supplied; a JSON fixture file (a flat array of seeds) can
//! replace or extend the built-in data.

use std::path::Path;

use anyhow::{Context, Result};

use crate::directory::{Directory, IdentitySeed};
use crate::roles::Role;

fn seed(first: &str, last: &str, email: &str, password: &str, role: Role, image: Option<&str>) -> IdentitySeed {
    IdentitySeed {
        id: None,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        role,
        profile_image: image.map(|s| s.to_string()),
    }
}

/// Practising doctors.
pub fn doctors() -> Vec<IdentitySeed> {
    vec![
        seed("Anika", "Ramgoolam", "anika.ramgoolam@healthwyz.mu", "DoctorPass123!", Role::Doctor, Some("/images/doctors/anika.jpg")),
        seed("Vikram", "Bhujun", "vikram.bhujun@healthwyz.mu", "DoctorPass456!", Role::Doctor, Some("/images/doctors/vikram.jpg")),
    ]
}

/// Ward nurses.
pub fn nurses() -> Vec<IdentitySeed> {
    vec![
        seed("Priya", "Seewoo", "priya.seewoo@healthwyz.mu", "NursePass123!", Role::Nurse, None),
    ]
}

/// Child-care nurses (nannies).
pub fn nannies() -> Vec<IdentitySeed> {
    vec![
        seed("Meera", "Chetty", "meera.chetty@healthwyz.mu", "NannyPass123!", Role::ChildCareNurse, None),
    ]
}

/// Registered patients.
pub fn patients() -> Vec<IdentitySeed> {
    vec![
        seed("Dev", "Luchmun", "dev.luchmun@healthwyz.mu", "PatientPass456!", Role::Patient, None),
    ]
}

/// One demo login per portal role, covering the roles the partitioned
/// collections do not.
pub fn demo_accounts() -> Vec<IdentitySeed> {
    vec![
        seed("Demo", "Patient", "patient@healthwyz.mu", "PatientPass123!", Role::Patient, None),
        seed("Demo", "Doctor", "doctor@healthwyz.mu", "DoctorPass123#", Role::Doctor, None),
        seed("Demo", "Nurse", "nurse@healthwyz.mu", "NursePass123#", Role::Nurse, None),
        seed("Demo", "Nanny", "nanny@healthwyz.mu", "NannyPass123#", Role::ChildCareNurse, None),
        seed("Demo", "Pharmacy", "pharmacy@healthwyz.mu", "PharmacyPass123!", Role::Pharmacy, None),
        seed("Demo", "Lab", "lab@healthwyz.mu", "LabPass123!", Role::Lab, None),
        seed("Demo", "Ambulance", "ambulance@healthwyz.mu", "AmbulancePass123!", Role::Ambulance, None),
        seed("Demo", "Admin", "admin@healthwyz.mu", "AdminPass123!", Role::Admin, None),
        seed("Demo", "Corporate", "corporate@healthwyz.mu", "CorporatePass123!", Role::Corporate, None),
        seed("Demo", "Insurance", "insurance@healthwyz.mu", "InsurancePass123!", Role::Insurance, None),
        seed("Demo", "Referral", "referral@healthwyz.mu", "ReferralPass123!", Role::ReferralPartner, None),
    ]
}

/// Build the demo directory: the role-partitioned collections merged with the
/// demo accounts.
pub fn demo_directory() -> Result<Directory> {
    Directory::build([doctors(), nurses(), nannies(), patients(), demo_accounts()])
}

/// Load seeds from a JSON fixture file (a flat array of identity seeds) and
/// build a directory from them.
pub fn directory_from_file(path: &Path) -> Result<Directory> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("while reading fixture file: {}", path.display()))?;
    let seeds: Vec<IdentitySeed> = serde_json::from_str(&raw)
        .with_context(|| format!("while parsing fixture file: {}", path.display()))?;
    Directory::build([seeds])
}
