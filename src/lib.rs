//! Academy admin - back-office API for an education-services website
//!
//! Manages blogs, courses, offered courses, homepage sliders, lecturers and
//! student reviews, and tells the public site when its cached pages are stale.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
