//! One controller per client view.

pub mod admin_article_form;
pub mod admin_articles;
pub mod admin_categories;
pub mod admin_dashboard;
pub mod admin_login;
pub mod article_detail;
pub mod home;
