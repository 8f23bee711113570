//! Database repositories
//!
//! One repository per table. Each trait is object-safe so services hold an
//! `Arc<dyn ...Repository>` and tests can swap in fakes.

pub mod blog;
pub mod course;
pub mod lecturer;
pub mod offered_course;
pub mod review;
pub mod slider;

pub use blog::{BlogRepository, SqlxBlogRepository};
pub use course::{CourseRepository, SqlxCourseRepository};
pub use lecturer::{LecturerRepository, SqlxLecturerRepository};
pub use offered_course::{OfferedCourseRepository, SqlxOfferedCourseRepository};
pub use review::{ReviewRepository, SqlxReviewRepository};
pub use slider::{SliderRepository, SqlxSliderRepository};
