//! Payment initiation.
//!
//! `PaymentGateway` is the port the HTTP adapter implements;
//! `PaymentInitiator` turns a gateway result into what the user sees, and
//! `PaymentForm` validates raw user input before either is involved.

pub mod form;
pub mod gateway;
pub mod initiator;
