//! Views for vaultxp.

pub mod icons;
pub mod stats_view;
pub mod workspace;

pub use stats_view::{build_cells, format_xp, render_grid, SkillCell, StatsView, STATS_VIEW_TYPE};
pub use workspace::{View, Workspace};
