//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! HTTP handlers, page rendering and static file serving live under [`http`].

pub mod http;
