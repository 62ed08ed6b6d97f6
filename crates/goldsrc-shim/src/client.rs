// client.rs — client capability trait and the cldll_func_t trampolines

use std::sync::Arc;

use goldsrc_common::client_api::cldll_func_t;

use crate::binder::ShimContext;
use crate::error::Role;
use crate::guard;
use crate::slots::abi::*;

client_function_slots!(export_trait {
    legacy_client;
    /// Client entry points, one per `cldll_func_t` slot.
    ///
    /// Methods not overridden forward to `legacy_client()`, or do nothing
    /// and return the slot's fallback value when that is `None`.
    /// Implementations must be shareable across threads because the
    /// engine's sound and input threads call some of these.
    ///
    /// # Safety
    /// Pointers come straight from the engine and are only valid for the
    /// duration of the call.
});

/// The client role as bound by the shim
pub trait ClientBinding: GameClient + Send + Sync {}

impl<T: GameClient + Send + Sync> ClientBinding for T {}

client_function_slots!(export_symbol_table { CLIENT_EXPORT_SYMBOLS });

pub fn bound_client() -> Option<Arc<dyn ClientBinding>> {
    ShimContext::current().and_then(ShimContext::client)
}

fn dispatch_client<R>(slot: &'static str, default: R, call: impl FnOnce(&dyn ClientBinding) -> R) -> R {
    match bound_client() {
        Some(client) => guard::guarded(Role::Client, slot, default, || call(client.as_ref())),
        None => {
            guard::report_unbound(Role::Client, slot);
            default
        }
    }
}

// ============================================================
// Trampolines
// ============================================================

client_function_slots!(export_trampolines {});
