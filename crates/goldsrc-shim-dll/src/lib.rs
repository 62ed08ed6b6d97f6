// goldsrc-shim-dll — the game DLL the engine loads
//
// Exports the server entry points, the client's `F`, and one allocator per
// legacy entity class. Everything behind them lives in goldsrc-shim.

#![allow(non_snake_case)]

use std::os::raw::{c_char, c_int, c_void};

use goldsrc_common::client_api::cldll_func_t;
use goldsrc_common::engine_api::enginefuncs_t;
use goldsrc_common::entity::{entvars_t, globalvars_t};
use goldsrc_common::server_api::{DLL_FUNCTIONS, NEW_DLL_FUNCTIONS};
use goldsrc_shim::exports;

// ============================================================
// Server entry points
// ============================================================

/// First call the engine makes into the server DLL.
///
/// # Safety
/// Both tables must stay valid for the lifetime of the DLL.
#[no_mangle]
pub unsafe extern "system" fn GiveFnptrsToDll(pengfuncsFromEngine: *mut enginefuncs_t, pGlobals: *mut globalvars_t) {
    exports::give_fnptrs_to_dll(pengfuncsFromEngine, pGlobals)
}

#[no_mangle]
pub unsafe extern "C" fn GetEntityAPI(pFunctionTable: *mut DLL_FUNCTIONS, interfaceVersion: c_int) -> c_int {
    exports::get_entity_api(pFunctionTable, interfaceVersion)
}

#[no_mangle]
pub unsafe extern "C" fn GetEntityAPI2(pFunctionTable: *mut DLL_FUNCTIONS, interfaceVersion: *mut c_int) -> c_int {
    exports::get_entity_api2(pFunctionTable, interfaceVersion)
}

#[no_mangle]
pub unsafe extern "C" fn GetNewDLLFunctions(
    pFunctionTable: *mut NEW_DLL_FUNCTIONS,
    interfaceVersion: *mut c_int,
) -> c_int {
    exports::get_new_dll_functions(pFunctionTable, interfaceVersion)
}

#[no_mangle]
pub unsafe extern "C" fn GetPrivateDataAllocator(pszEntityClassName: *const c_char) -> *mut c_void {
    exports::get_private_data_allocator(pszEntityClassName)
}

// ============================================================
// Client entry point
// ============================================================

#[no_mangle]
pub unsafe extern "C" fn F(pv: *mut cldll_func_t) {
    exports::client_exports(pv)
}

// ============================================================
// Entity classes
// ============================================================

macro_rules! entity_exports {
    ($($class:ident,)*) => {
        $(
            #[no_mangle]
            pub unsafe extern "C" fn $class(pev: *mut entvars_t) {
                goldsrc_shim::entity::allocate_private_data(stringify!($class), pev)
            }
        )*
    };
}

goldsrc_shim::legacy_entity_classes!(entity_exports);
