//! Built-in module factories.
//!
//! Each submodule exposes a `meta()` function and a pure factory taking a
//! [`ModuleContext`](crate::domain::ModuleContext). Docker values use
//! `${VAR}` placeholders that resolve against the generated `.env` files.

pub mod backend;
pub mod mongodb;
pub mod nats;
pub mod prometheus;
pub mod traefik;
