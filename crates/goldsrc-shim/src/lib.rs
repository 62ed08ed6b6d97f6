// goldsrc-shim — runtime behind the GoldSrc game DLL entry symbols
//
// The engine talks to a game DLL through a handful of exported functions
// and the function tables they fill. This crate fills those tables with
// trampolines and binds each role (server, client) to either a companion
// module built against this crate or the legacy native game DLL.

#![allow(non_snake_case, clippy::missing_safety_doc, clippy::too_many_arguments)]

#[macro_use]
mod slots;

pub mod binder;
pub mod client;
pub mod companion;
pub mod entity;
pub mod error;
pub mod exports;
pub mod guard;
pub mod legacy_client;
pub mod legacy_server;
pub mod logging;
pub mod module;
pub mod server;
pub mod settings;

pub use binder::{Selection, ServerHost, ShimContext};
pub use client::{ClientBinding, GameClient};
pub use companion::{ClientBase, ServerBase};
pub use error::{Result, Role, ShimError};
pub use server::{GameServer, NewServerExports, ServerExports};
pub use settings::Settings;

/// The engine ABI, re-exported for companion modules
pub use goldsrc_common as abi;
