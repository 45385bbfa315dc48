//! Reusable UI state pieces.

pub mod carousel;
pub mod faq;
pub mod sidebar;
