//! Agroverse storefront services: the persistent cart, shipping negotiation,
//! checkout, saved forms and order lookups.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod context;
pub mod debounce;
pub mod forms;
pub mod logging;
pub mod orders;
pub mod quotes;
pub mod service;
pub mod shipping;
pub mod storage;
