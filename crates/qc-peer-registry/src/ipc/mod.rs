//! IPC: wire handlers for peer-list requests.

pub mod handler;

pub use handler::handle_peer_list_request;
