//! Skills for vaultxp.
//!
//! Seven skills are computed from vault scans; the eighth, Total Level, is
//! derived from the levels of the other seven.

pub mod calculators;
pub mod registry;
pub mod skill;

pub use calculators::{compute, compute_all, VaultListing};
pub use registry::{SavedSkill, SkillRegistry, SkillSnapshot};
pub use skill::{Skill, SkillKind};
