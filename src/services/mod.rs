//! Services layer - Business logic
//!
//! One service per back-office entity. Services validate input, coordinate
//! the repositories with the local cache and tell the public site when its
//! cached pages are stale.

pub mod blog;
pub mod course;
pub mod course_match;
pub mod error;
pub mod lecturer;
pub mod normalize;
pub mod offered_course;
pub mod pricing;
pub mod review;
pub mod site_cache;
pub mod slider;

pub use blog::BlogService;
pub use course::CourseService;
pub use course_match::{match_course, normalize_title, CourseMatch, CourseRef};
pub use error::{ServiceError, ServiceResult};
pub use lecturer::LecturerService;
pub use offered_course::OfferedCourseService;
pub use pricing::discount_percentage;
pub use review::ReviewService;
pub use site_cache::{CacheKind, SharedSiteCache, SiteCacheClient};
pub use slider::{SliderCreateOutcome, SliderService, PARTIAL_IMAGE_MESSAGE};
