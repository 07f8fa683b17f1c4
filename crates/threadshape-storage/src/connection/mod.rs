//! Connection setup: pragmas and immediate-mode write transactions.

pub mod pragmas;
pub mod writer;

pub use pragmas::apply_pragmas;
pub use writer::with_immediate_transaction;
