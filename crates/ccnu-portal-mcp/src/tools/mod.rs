//! Portal operations exposed as tools.

pub mod args;
pub mod course_list;
pub mod get_detailed_grades;
pub mod get_grades;
pub mod portal_login;
pub mod registry;

pub use registry::ToolRegistry;
