// Dashboard listing and resume detail pages.

pub mod catalog;
pub mod handlers;

pub use catalog::ResumeCatalog;
