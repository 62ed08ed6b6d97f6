// server_api.rs — game DLL export tables and entry point signatures
// Mirrors the DLL_FUNCTIONS / NEW_DLL_FUNCTIONS part of engine/eiface.h

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_float, c_int, c_uchar, c_uint, c_void};

use crate::engine_api::enginefuncs_t;
use crate::entity::{edict_t, entvars_t, globalvars_t};
use crate::pmove::playermove_t;
use crate::state::{clientdata_t, entity_state_t, usercmd_t, weapon_data_t};
use crate::types::{customization_t, netadr_t, qboolean, KeyValueData, SAVERESTOREDATA, TYPEDESCRIPTION};

// ============================================================
// Constants
// ============================================================

/// Version of `DLL_FUNCTIONS` the engine requests
pub const INTERFACE_VERSION: c_int = 140;

/// Version of `NEW_DLL_FUNCTIONS` the engine requests
pub const NEW_DLL_FUNCTIONS_VERSION: c_int = 1;

/// Size of the reject-reason buffer passed to `pfnClientConnect`
pub const REJECT_REASON_LEN: usize = 128;

// ============================================================
// Entry points
// ============================================================

/// `GiveFnptrsToDll` is declared `WINAPI` in the SDK, i.e. stdcall on Win32
pub type GiveFnptrsToDllFn =
    unsafe extern "system" fn(pengfuncsFromEngine: *mut enginefuncs_t, pGlobals: *mut globalvars_t);

pub type GetEntityAPIFn =
    unsafe extern "C" fn(pFunctionTable: *mut DLL_FUNCTIONS, interfaceVersion: c_int) -> c_int;

pub type GetEntityAPI2Fn =
    unsafe extern "C" fn(pFunctionTable: *mut DLL_FUNCTIONS, interfaceVersion: *mut c_int) -> c_int;

pub type GetNewDLLFunctionsFn = unsafe extern "C" fn(
    pFunctionTable: *mut NEW_DLL_FUNCTIONS,
    interfaceVersion: *mut c_int,
) -> c_int;

/// Per-class export the engine looks up by class name (`LINK_ENTITY_TO_CLASS`)
pub type PrivateDataAllocator = unsafe extern "C" fn(pev: *mut entvars_t);

// ============================================================
// DLL_FUNCTIONS
// ============================================================

function_table! {
    /// Functions the game DLL exports to the engine
    pub struct DLL_FUNCTIONS {
        pub pfnGameInit: Option<unsafe extern "C" fn()>,
        pub pfnSpawn: Option<unsafe extern "C" fn(pent: *mut edict_t) -> c_int>,
        pub pfnThink: Option<unsafe extern "C" fn(pent: *mut edict_t)>,
        pub pfnUse: Option<unsafe extern "C" fn(pentUsed: *mut edict_t, pentOther: *mut edict_t)>,
        pub pfnTouch: Option<unsafe extern "C" fn(pentTouched: *mut edict_t, pentOther: *mut edict_t)>,
        pub pfnBlocked: Option<unsafe extern "C" fn(pentBlocked: *mut edict_t, pentOther: *mut edict_t)>,
        pub pfnKeyValue: Option<unsafe extern "C" fn(pentKeyvalue: *mut edict_t, pkvd: *mut KeyValueData)>,
        pub pfnSave: Option<unsafe extern "C" fn(pent: *mut edict_t, pSaveData: *mut SAVERESTOREDATA)>,
        pub pfnRestore: Option<
            unsafe extern "C" fn(pent: *mut edict_t, pSaveData: *mut SAVERESTOREDATA, globalEntity: c_int) -> c_int,
        >,
        pub pfnSetAbsBox: Option<unsafe extern "C" fn(pent: *mut edict_t)>,

        pub pfnSaveWriteFields: Option<
            unsafe extern "C" fn(
                pSaveData: *mut SAVERESTOREDATA,
                pname: *const c_char,
                pBaseData: *mut c_void,
                pFields: *mut TYPEDESCRIPTION,
                fieldCount: c_int,
            ),
        >,
        pub pfnSaveReadFields: Option<
            unsafe extern "C" fn(
                pSaveData: *mut SAVERESTOREDATA,
                pname: *const c_char,
                pBaseData: *mut c_void,
                pFields: *mut TYPEDESCRIPTION,
                fieldCount: c_int,
            ),
        >,

        pub pfnSaveGlobalState: Option<unsafe extern "C" fn(pSaveData: *mut SAVERESTOREDATA)>,
        pub pfnRestoreGlobalState: Option<unsafe extern "C" fn(pSaveData: *mut SAVERESTOREDATA)>,
        pub pfnResetGlobalState: Option<unsafe extern "C" fn()>,

        /// `szRejectReason` points at a `REJECT_REASON_LEN` byte buffer
        pub pfnClientConnect: Option<
            unsafe extern "C" fn(
                pEntity: *mut edict_t,
                pszName: *const c_char,
                pszAddress: *const c_char,
                szRejectReason: *mut c_char,
            ) -> qboolean,
        >,

        pub pfnClientDisconnect: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,
        pub pfnClientKill: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,
        pub pfnClientPutInServer: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,
        pub pfnClientCommand: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,
        pub pfnClientUserInfoChanged: Option<unsafe extern "C" fn(pEntity: *mut edict_t, infobuffer: *mut c_char)>,

        pub pfnServerActivate: Option<
            unsafe extern "C" fn(pEdictList: *mut edict_t, edictCount: c_int, clientMax: c_int),
        >,
        pub pfnServerDeactivate: Option<unsafe extern "C" fn()>,

        pub pfnPlayerPreThink: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,
        pub pfnPlayerPostThink: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,

        pub pfnStartFrame: Option<unsafe extern "C" fn()>,
        pub pfnParmsNewLevel: Option<unsafe extern "C" fn()>,
        pub pfnParmsChangeLevel: Option<unsafe extern "C" fn()>,

        pub pfnGetGameDescription: Option<unsafe extern "C" fn() -> *const c_char>,

        pub pfnPlayerCustomization: Option<unsafe extern "C" fn(pEntity: *mut edict_t, pCustom: *mut customization_t)>,

        pub pfnSpectatorConnect: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,
        pub pfnSpectatorDisconnect: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,
        pub pfnSpectatorThink: Option<unsafe extern "C" fn(pEntity: *mut edict_t)>,

        pub pfnSys_Error: Option<unsafe extern "C" fn(error_string: *const c_char)>,

        pub pfnPM_Move: Option<unsafe extern "C" fn(ppmove: *mut playermove_t, server: qboolean)>,
        pub pfnPM_Init: Option<unsafe extern "C" fn(ppmove: *mut playermove_t)>,
        pub pfnPM_FindTextureType: Option<unsafe extern "C" fn(name: *mut c_char) -> c_char>,
        pub pfnSetupVisibility: Option<
            unsafe extern "C" fn(
                pViewEntity: *mut edict_t,
                pClient: *mut edict_t,
                pvs: *mut *mut c_uchar,
                pas: *mut *mut c_uchar,
            ),
        >,
        pub pfnUpdateClientData: Option<
            unsafe extern "C" fn(ent: *const edict_t, sendweapons: c_int, cd: *mut clientdata_t),
        >,
        pub pfnAddToFullPack: Option<
            unsafe extern "C" fn(
                state: *mut entity_state_t,
                e: c_int,
                ent: *mut edict_t,
                host: *mut edict_t,
                hostflags: c_int,
                player: c_int,
                pSet: *mut c_uchar,
            ) -> c_int,
        >,
        /// `player_mins` / `player_maxs` are `vec3_t` arrays, which decay to pointers
        pub pfnCreateBaseline: Option<
            unsafe extern "C" fn(
                player: c_int,
                eindex: c_int,
                baseline: *mut entity_state_t,
                entity: *mut edict_t,
                playermodelindex: c_int,
                player_mins: *mut c_float,
                player_maxs: *mut c_float,
            ),
        >,
        pub pfnRegisterEncoders: Option<unsafe extern "C" fn()>,
        pub pfnGetWeaponData: Option<unsafe extern "C" fn(player: *mut edict_t, info: *mut weapon_data_t) -> c_int>,

        pub pfnCmdStart: Option<
            unsafe extern "C" fn(player: *const edict_t, cmd: *const usercmd_t, random_seed: c_uint),
        >,
        pub pfnCmdEnd: Option<unsafe extern "C" fn(player: *const edict_t)>,

        pub pfnConnectionlessPacket: Option<
            unsafe extern "C" fn(
                net_from: *const netadr_t,
                args: *const c_char,
                response_buffer: *mut c_char,
                response_buffer_size: *mut c_int,
            ) -> c_int,
        >,

        pub pfnGetHullBounds: Option<
            unsafe extern "C" fn(hullnumber: c_int, mins: *mut c_float, maxs: *mut c_float) -> c_int,
        >,

        pub pfnCreateInstancedBaselines: Option<unsafe extern "C" fn()>,

        pub pfnInconsistentFile: Option<
            unsafe extern "C" fn(player: *const edict_t, filename: *const c_char, disconnect_message: *mut c_char) -> c_int,
        >,

        pub pfnAllowLagCompensation: Option<unsafe extern "C" fn() -> c_int>,
    }
}

// ============================================================
// NEW_DLL_FUNCTIONS
// ============================================================

function_table! {
    /// Optional functions added after `DLL_FUNCTIONS` was frozen
    pub struct NEW_DLL_FUNCTIONS {
        pub pfnOnFreeEntPrivateData: Option<unsafe extern "C" fn(pEnt: *mut edict_t)>,
        pub pfnGameShutdown: Option<unsafe extern "C" fn()>,
        pub pfnShouldCollide: Option<unsafe extern "C" fn(pentTouched: *mut edict_t, pentOther: *mut edict_t) -> c_int>,
        pub pfnCvarValue: Option<unsafe extern "C" fn(pEnt: *const edict_t, value: *const c_char)>,
        pub pfnCvarValue2: Option<
            unsafe extern "C" fn(pEnt: *const edict_t, requestID: c_int, cvarName: *const c_char, value: *const c_char),
        >,
    }
}

const _: () = {
    use std::mem::size_of;
    assert!(size_of::<DLL_FUNCTIONS>() == 50 * size_of::<usize>());
    assert!(size_of::<NEW_DLL_FUNCTIONS>() == 5 * size_of::<usize>());
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_dll_functions_slot_count() {
        assert_eq!(DLL_FUNCTIONS::SLOT_NAMES.len(), 50);
        assert_eq!(size_of::<DLL_FUNCTIONS>(), DLL_FUNCTIONS::SLOT_NAMES.len() * size_of::<*const c_void>());
        assert_eq!(NEW_DLL_FUNCTIONS::SLOT_NAMES.len(), 5);
        assert_eq!(size_of::<NEW_DLL_FUNCTIONS>(), 5 * size_of::<*const c_void>());
    }

    #[test]
    fn test_dll_functions_slot_order() {
        let ptr = size_of::<*const c_void>();
        assert_eq!(offset_of!(DLL_FUNCTIONS, pfnGameInit), 0);
        assert_eq!(offset_of!(DLL_FUNCTIONS, pfnSpawn), ptr);
        assert_eq!(offset_of!(DLL_FUNCTIONS, pfnClientConnect), 15 * ptr);
        assert_eq!(offset_of!(DLL_FUNCTIONS, pfnGetGameDescription), 28 * ptr);
        assert_eq!(offset_of!(DLL_FUNCTIONS, pfnPM_Move), 34 * ptr);
        assert_eq!(offset_of!(DLL_FUNCTIONS, pfnAllowLagCompensation), 49 * ptr);
        assert_eq!(offset_of!(NEW_DLL_FUNCTIONS, pfnCvarValue2), 4 * ptr);
        assert_eq!(DLL_FUNCTIONS::SLOT_NAMES[1], "pfnSpawn");
        assert_eq!(DLL_FUNCTIONS::SLOT_NAMES[49], "pfnAllowLagCompensation");
    }

    #[test]
    fn test_default_table_is_all_unset() {
        let table = DLL_FUNCTIONS::default();
        assert_eq!(table.unset_slots().len(), 50);
        assert!(!table.is_complete());
    }

    #[test]
    fn test_unset_slots_reports_names() {
        unsafe extern "C" fn shutdown() {}

        let table = NEW_DLL_FUNCTIONS {
            pfnGameShutdown: Some(shutdown),
            ..Default::default()
        };
        assert_eq!(
            table.unset_slots(),
            vec!["pfnOnFreeEntPrivateData", "pfnShouldCollide", "pfnCvarValue", "pfnCvarValue2"]
        );
    }
}
