pub mod client_session;
pub mod session_store;
pub mod statistics;
