// server.rs — server capability traits and the DLL_FUNCTIONS trampolines
//
// The engine only ever sees the trampolines below. Each one looks up the
// bound server, forwards the call and turns a panic or a missing binding
// into the slot's fallback value.

use std::ffi::CStr;
use std::sync::Arc;

use goldsrc_common::server_api::{PrivateDataAllocator, DLL_FUNCTIONS, NEW_DLL_FUNCTIONS};

use crate::binder::ShimContext;
use crate::error::Role;
use crate::guard;
use crate::slots::abi::*;

dll_function_slots!(export_trait {
    legacy_exports;
    /// The `DLL_FUNCTIONS` entry points of a game server.
    ///
    /// An implementation overrides only what it needs. Every other method
    /// forwards to `legacy_exports()`, or does nothing and returns the
    /// slot's fallback value when that is `None`.
    ///
    /// # Safety
    /// Pointers come straight from the engine and are only valid for the
    /// duration of the call.
});

new_dll_function_slots!(export_trait {
    legacy_new_exports;
    /// The optional `NEW_DLL_FUNCTIONS` entry points.
});

/// A complete server implementation as bound by the shim
pub trait GameServer: ServerExports + NewServerExports + Send + Sync {
    /// Allocator for entity class `class_name`, if this implementation
    /// provides one. `None` falls back to the legacy module's export.
    fn private_data_allocator(&self, class_name: &CStr) -> Option<PrivateDataAllocator> {
        let _ = class_name;
        None
    }
}

/// Currently bound server, if any
pub fn bound_server() -> Option<Arc<dyn GameServer>> {
    ShimContext::current().and_then(ShimContext::server)
}

fn dispatch_server<R>(slot: &'static str, default: R, call: impl FnOnce(&dyn GameServer) -> R) -> R {
    match bound_server() {
        Some(server) => guard::guarded(Role::Server, slot, default, || call(server.as_ref())),
        None => {
            guard::report_unbound(Role::Server, slot);
            default
        }
    }
}

// ============================================================
// Trampolines
// ============================================================

dll_function_slots!(export_trampolines {});
new_dll_function_slots!(export_trampolines {});

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use goldsrc_common::TableSlot;

    use crate::binder::{self, Selection};

    #[derive(Default)]
    struct Recording {
        spawned: AtomicUsize,
        frames: AtomicUsize,
    }

    impl ServerExports for Recording {
        unsafe fn spawn(&self, _pent: *mut edict_t) -> c_int {
            self.spawned.fetch_add(1, Ordering::SeqCst);
            -1
        }

        unsafe fn start_frame(&self) {
            self.frames.fetch_add(1, Ordering::SeqCst);
        }

        unsafe fn get_game_description(&self) -> *const c_char {
            b"Recording\0".as_ptr().cast()
        }
    }

    impl NewServerExports for Recording {
        unsafe fn should_collide(&self, _touched: *mut edict_t, _other: *mut edict_t) -> c_int {
            0
        }
    }

    impl GameServer for Recording {}

    struct Exploding;

    impl ServerExports for Exploding {
        unsafe fn spawn(&self, _pent: *mut edict_t) -> c_int {
            panic!("spawn exploded")
        }
    }

    impl NewServerExports for Exploding {}
    impl GameServer for Exploding {}

    struct Bare;
    impl ServerExports for Bare {}
    impl NewServerExports for Bare {}
    impl GameServer for Bare {}

    #[test]
    fn test_filled_tables_are_complete() {
        let funcs = dll_functions();
        assert!(funcs.is_complete());
        assert!(funcs.unset_slots().is_empty());

        let mut table = DLL_FUNCTIONS::default();
        assert!(table.pfnSpawn.is_unset());
        fill_dll_functions(&mut table);
        assert!(table.is_complete());

        let mut new_table = NEW_DLL_FUNCTIONS::default();
        fill_new_dll_functions(&mut new_table);
        assert!(new_table.is_complete());
    }

    #[test]
    fn test_trait_defaults_are_fallback_values() {
        let bare = Bare;
        unsafe {
            assert_eq!(bare.spawn(null_mut()), 0);
            assert!(bare.get_game_description().is_null());
            assert_eq!(bare.pm_find_texture_type(null_mut()), 0);
            assert_eq!(bare.should_collide(null_mut(), null_mut()), 1);
        }
        assert!(bare.private_data_allocator(c"monster_zombie").is_none());
    }

    #[test]
    fn test_trampolines_reach_the_bound_server() {
        let _serial = binder::serial_test_guard();
        let context = ShimContext::global();
        context.reset_for_tests();

        let recording = Arc::new(Recording::default());
        let bound = Arc::clone(&recording);
        context
            .bind_server_with(Selection::Companion("recording".into()), move |_| Ok(bound as Arc<dyn GameServer>))
            .unwrap();

        let funcs = dll_functions();
        let new_funcs = new_dll_functions();
        unsafe {
            assert_eq!((funcs.pfnSpawn.unwrap())(null_mut()), -1);
            (funcs.pfnStartFrame.unwrap())();
            (funcs.pfnStartFrame.unwrap())();
            let description = CStr::from_ptr((funcs.pfnGetGameDescription.unwrap())());
            assert_eq!(description.to_str().unwrap(), "Recording");
            assert_eq!((new_funcs.pfnShouldCollide.unwrap())(null_mut(), null_mut()), 0);
        }
        assert_eq!(recording.spawned.load(Ordering::SeqCst), 1);
        assert_eq!(recording.frames.load(Ordering::SeqCst), 2);

        context.reset_for_tests();
    }

    #[test]
    fn test_panic_becomes_fallback_value() {
        let _serial = binder::serial_test_guard();
        let context = ShimContext::global();
        context.reset_for_tests();
        context
            .bind_server_with(Selection::Companion("exploding".into()), |_| Ok(Arc::new(Exploding) as Arc<dyn GameServer>))
            .unwrap();

        let funcs = dll_functions();
        unsafe {
            assert_eq!((funcs.pfnSpawn.unwrap())(null_mut()), 0);
            // the server stays usable after a panic
            (funcs.pfnThink.unwrap())(null_mut());
        }

        context.reset_for_tests();
    }

    #[test]
    fn test_unbound_trampolines_return_fallbacks() {
        let _serial = binder::serial_test_guard();
        let context = ShimContext::global();
        context.reset_for_tests();

        let funcs = dll_functions();
        unsafe {
            assert_eq!((funcs.pfnSpawn.unwrap())(null_mut()), 0);
            assert!((funcs.pfnGetGameDescription.unwrap())().is_null());
            (funcs.pfnStartFrame.unwrap())();
        }
    }
}
