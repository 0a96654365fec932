//! Off-process delivery of analytics events.

pub mod webhook;
