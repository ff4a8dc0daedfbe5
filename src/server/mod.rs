//! HTTP surface: router construction, request handlers, and the mapping from
//! dataset failures to response statuses.

mod handlers;
mod response;
#[cfg(test)]
mod tests;

pub use handlers::router;
