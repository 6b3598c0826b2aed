//! Resource modules.
//!
//! Each module defines its stored document, request bodies, response view,
//! repository wrapper with module-specific finders, and routes.

pub mod course_level;
pub mod course_type;
pub mod location;
pub mod wall_post;

pub use course_level::{CourseLevel, CourseLevelRepository};
pub use course_type::{CourseType, CourseTypeRepository};
pub use location::{Location, LocationRepository};
pub use wall_post::{Visibility, WallPost, WallPostRepository};

/// Stored keywords as the list a view returns. Duplicates left behind by
/// older writers are dropped.
fn keyword_list(stored: Option<&str>) -> Vec<String> {
    acado_core::parse_keywords(acado_core::normalize_stored(stored).as_deref())
}
