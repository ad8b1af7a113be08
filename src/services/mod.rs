pub mod auth;
pub mod booking;
pub mod dashboard;
pub mod guard;
pub mod pricing;
pub mod turfs;

#[cfg(test)]
pub(crate) mod testing;
