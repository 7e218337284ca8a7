//! Page objects.
//!
//! A page object owns its locators and embeds a [`crate::page::Page`],
//! exposing flow-level methods (`login`, `add_to_cart`) instead of raw
//! element operations. [`login::LoginPage`] shows the pattern a suite's
//! own page objects follow.

pub mod login;

pub use login::LoginPage;
