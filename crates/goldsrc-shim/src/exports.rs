// exports.rs — bodies of the native entry symbols
//
// The cdylib's `#[no_mangle]` functions call straight into these. Each one
// creates the process context on first use, binds its role and hands the
// engine a table of trampolines.

use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_void};
use std::ptr;

use goldsrc_common::client_api::cldll_func_t;
use goldsrc_common::engine_api::enginefuncs_t;
use goldsrc_common::entity::globalvars_t;
use goldsrc_common::server_api::{DLL_FUNCTIONS, INTERFACE_VERSION, NEW_DLL_FUNCTIONS, NEW_DLL_FUNCTIONS_VERSION};

use crate::binder::{ServerHost, ShimContext};
use crate::client::fill_client_funcs;
use crate::error::Role;
use crate::guard;
use crate::server::{fill_dll_functions, fill_new_dll_functions};

// ============================================================
// Server
// ============================================================

/// `GiveFnptrsToDll`: remember the engine's tables and bind the server.
pub unsafe fn give_fnptrs_to_dll(engine: *mut enginefuncs_t, globals: *mut globalvars_t) {
    guard::guarded(Role::Server, "GiveFnptrsToDll", (), || {
        let context = ShimContext::global();
        context.set_host(ServerHost::new(engine, globals));
        if context.bind_server().is_ok() {
            let allocators = context.refresh_entity_allocators();
            log::debug!("{} entity classes have allocators", allocators.resolved());
        }
    })
}

/// `GetEntityAPI`: the version is passed by value and a mismatch is
/// simply refused.
pub unsafe fn get_entity_api(table: *mut DLL_FUNCTIONS, interface_version: c_int) -> c_int {
    guard::guarded(Role::Server, "GetEntityAPI", 0, || {
        if table.is_null() || interface_version != INTERFACE_VERSION {
            log::error!(
                "GetEntityAPI refused: table {:p}, interface version {} (supported {})",
                table,
                interface_version,
                INTERFACE_VERSION
            );
            return 0;
        }
        if ShimContext::global().bind_server().is_err() {
            return 0;
        }
        fill_dll_functions(&mut *table);
        1
    })
}

/// `GetEntityAPI2`: on a mismatch the supported version is written back so
/// the engine can report it, and 0 is returned.
pub unsafe fn get_entity_api2(table: *mut DLL_FUNCTIONS, interface_version: *mut c_int) -> c_int {
    guard::guarded(Role::Server, "GetEntityAPI2", 0, || {
        if interface_version.is_null() {
            log::error!("GetEntityAPI2 called without an interface version");
            return 0;
        }
        if table.is_null() || *interface_version != INTERFACE_VERSION {
            log::error!(
                "GetEntityAPI2 refused: table {:p}, interface version {} (supported {})",
                table,
                *interface_version,
                INTERFACE_VERSION
            );
            *interface_version = INTERFACE_VERSION;
            return 0;
        }
        if ShimContext::global().bind_server().is_err() {
            return 0;
        }
        fill_dll_functions(&mut *table);
        1
    })
}

/// `GetNewDLLFunctions`, with the same write-back rule as `GetEntityAPI2`
pub unsafe fn get_new_dll_functions(table: *mut NEW_DLL_FUNCTIONS, interface_version: *mut c_int) -> c_int {
    guard::guarded(Role::Server, "GetNewDLLFunctions", 0, || {
        if interface_version.is_null() {
            log::error!("GetNewDLLFunctions called without an interface version");
            return 0;
        }
        if table.is_null() || *interface_version != NEW_DLL_FUNCTIONS_VERSION {
            log::error!(
                "GetNewDLLFunctions refused: table {:p}, interface version {} (supported {})",
                table,
                *interface_version,
                NEW_DLL_FUNCTIONS_VERSION
            );
            *interface_version = NEW_DLL_FUNCTIONS_VERSION;
            return 0;
        }
        if ShimContext::global().bind_server().is_err() {
            return 0;
        }
        fill_new_dll_functions(&mut *table);
        1
    })
}

/// `GetPrivateDataAllocator`: the allocator for any class name, or the
/// error allocator when nobody provides it. A null name returns null.
pub unsafe fn get_private_data_allocator(class_name: *const c_char) -> *mut c_void {
    guard::guarded(Role::Server, "GetPrivateDataAllocator", ptr::null_mut(), || {
        if class_name.is_null() {
            log::error!("GetPrivateDataAllocator called with a null class name");
            return ptr::null_mut();
        }
        let Ok(name) = CStr::from_ptr(class_name).to_str() else {
            log::error!("GetPrivateDataAllocator: class name is not UTF-8");
            return ptr::null_mut();
        };
        ShimContext::global().entity_allocators().allocator(name) as *mut c_void
    })
}

// ============================================================
// Client
// ============================================================

/// `F`: bind the client and fill the engine's export table.
///
/// `F` has no way to report failure, so the table is filled even when
/// binding fails; the trampolines then answer with fallback values.
pub unsafe fn client_exports(table: *mut cldll_func_t) {
    guard::guarded(Role::Client, "F", (), || {
        if table.is_null() {
            log::error!("F called with a null table");
            return;
        }
        let _ = ShimContext::global().bind_client();
        fill_client_funcs(&mut *table);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr::null_mut;
    use std::sync::Arc;

    use goldsrc_common::TableSlot;

    use crate::binder::{self, Selection};
    use crate::client::{ClientBinding, GameClient};
    use crate::entity::error_allocator;
    use crate::server::{GameServer, NewServerExports, ServerExports};

    struct Plain;
    impl ServerExports for Plain {}
    impl NewServerExports for Plain {}
    impl GameServer for Plain {}

    struct Hud;
    impl GameClient for Hud {}

    fn bind_plain_server() -> &'static ShimContext {
        let context = ShimContext::global();
        context.reset_for_tests();
        context
            .bind_server_with(Selection::Companion("plain".into()), |_| Ok(Arc::new(Plain) as Arc<dyn GameServer>))
            .unwrap();
        context
    }

    #[test]
    fn test_entity_api2_writes_back_supported_version() {
        let _serial = binder::serial_test_guard();
        let context = bind_plain_server();

        let mut table = DLL_FUNCTIONS::default();
        let mut version = 139;
        assert_eq!(unsafe { get_entity_api2(&mut table, &mut version) }, 0);
        assert_eq!(version, INTERFACE_VERSION);
        assert!(table.pfnSpawn.is_unset());

        // the engine retries with the version it was told
        assert_eq!(unsafe { get_entity_api2(&mut table, &mut version) }, 1);
        assert!(table.is_complete());

        context.reset_for_tests();
    }

    #[test]
    fn test_entity_api2_null_table_writes_back() {
        let _serial = binder::serial_test_guard();
        let mut version = INTERFACE_VERSION + 1;
        assert_eq!(unsafe { get_entity_api2(null_mut(), &mut version) }, 0);
        assert_eq!(version, INTERFACE_VERSION);
        assert_eq!(unsafe { get_entity_api2(null_mut(), null_mut()) }, 0);
    }

    #[test]
    fn test_entity_api_refuses_mismatch() {
        let _serial = binder::serial_test_guard();
        let context = bind_plain_server();

        let mut table = DLL_FUNCTIONS::default();
        assert_eq!(unsafe { get_entity_api(&mut table, 139) }, 0);
        assert!(table.pfnGameInit.is_unset());
        assert_eq!(unsafe { get_entity_api(&mut table, INTERFACE_VERSION) }, 1);
        assert!(table.is_complete());

        context.reset_for_tests();
    }

    #[test]
    fn test_new_dll_functions_handshake() {
        let _serial = binder::serial_test_guard();
        let context = bind_plain_server();

        let mut table = NEW_DLL_FUNCTIONS::default();
        let mut version = 2;
        assert_eq!(unsafe { get_new_dll_functions(&mut table, &mut version) }, 0);
        assert_eq!(version, NEW_DLL_FUNCTIONS_VERSION);
        assert_eq!(unsafe { get_new_dll_functions(&mut table, &mut version) }, 1);
        assert!(table.is_complete());

        context.reset_for_tests();
    }

    #[test]
    fn test_failed_server_refuses_tables() {
        let _serial = binder::serial_test_guard();
        let context = ShimContext::global();
        context.reset_for_tests();
        let _ = context.bind_server_with(Selection::Legacy("libserver.so".into()), |_| {
            Err(crate::error::ShimError::load_error("libserver.so", "gone"))
        });

        let mut table = DLL_FUNCTIONS::default();
        let mut version = INTERFACE_VERSION;
        assert_eq!(unsafe { get_entity_api2(&mut table, &mut version) }, 0);
        assert_eq!(version, INTERFACE_VERSION);

        context.reset_for_tests();
    }

    #[test]
    fn test_private_data_allocator_lookup() {
        let _serial = binder::serial_test_guard();
        let context = bind_plain_server();

        assert!(unsafe { get_private_data_allocator(ptr::null()) }.is_null());
        let allocator = unsafe { get_private_data_allocator(c"monster_gargantua".as_ptr()) };
        assert_eq!(allocator as usize, error_allocator as usize);

        context.reset_for_tests();
    }

    #[test]
    fn test_client_exports_fill_the_table() {
        let _serial = binder::serial_test_guard();
        let context = ShimContext::global();
        context.reset_for_tests();
        context
            .bind_client_with(Selection::Companion("hud".into()), |_| Ok(Arc::new(Hud) as Arc<dyn ClientBinding>))
            .unwrap();

        let mut table = cldll_func_t::default();
        unsafe { client_exports(&mut table) };
        assert!(table.is_complete());
        unsafe { client_exports(null_mut()) };

        context.reset_for_tests();
    }
}
