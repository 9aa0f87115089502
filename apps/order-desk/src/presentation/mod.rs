//! Presentation Layer
//!
//! UI-agnostic components: the order form and the order table. Both hold an
//! `Arc` to the shared store; the table re-renders from store notifications.

pub mod form;
pub mod table;
