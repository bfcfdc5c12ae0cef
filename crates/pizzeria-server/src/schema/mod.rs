//! API schema types for request/response definitions.
//!
//! Types use serde derives for JSON serialization/deserialization; request
//! types also own their validation into storage inputs.

pub mod pizzas;
