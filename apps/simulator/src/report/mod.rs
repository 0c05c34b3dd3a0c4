// Reflection report: pure projection of a scored attempt, plus export to a
// Markdown document on disk.

pub mod export;
pub mod renderer;

pub use export::{export_report, ExportError};
pub use renderer::{render_report, ProfileDisplay, Report, SkillDetail};
