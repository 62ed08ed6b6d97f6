// legacy_server.rs — forward the server role to a native HLSDK game DLL
// Loads the legacy server module, performs the engine's side of the
// handshake against it and keeps the tables it filled in.

use std::ffi::CStr;
use std::path::Path;

use goldsrc_common::server_api::{
    GetEntityAPI2Fn, GetEntityAPIFn, GetNewDLLFunctionsFn, GiveFnptrsToDllFn, PrivateDataAllocator,
    DLL_FUNCTIONS, INTERFACE_VERSION, NEW_DLL_FUNCTIONS, NEW_DLL_FUNCTIONS_VERSION,
};

use crate::binder::ServerHost;
use crate::entity;
use crate::error::{Result, Role, ShimError};
use crate::module::NativeModule;
use crate::server::{GameServer, NewServerExports, ServerExports};
use crate::slots::abi::*;

// ============================================================
// LegacyServer — wrapper for a loaded server module
// ============================================================

pub struct LegacyServer {
    /// Keeps the tables below valid; `None` for tables built in memory
    module: Option<NativeModule>,
    funcs: DLL_FUNCTIONS,
    new_funcs: NEW_DLL_FUNCTIONS,
}

impl LegacyServer {
    /// Load the module at `path` and initialize it as the engine would:
    /// `GiveFnptrsToDll`, then `GetEntityAPI2` (or `GetEntityAPI`), then the
    /// optional `GetNewDLLFunctions`.
    ///
    /// # Safety
    /// `host` must hold the engine's own function table and globals; the
    /// module keeps both pointers.
    pub unsafe fn load(path: &Path, host: ServerHost) -> Result<Self> {
        let module = NativeModule::load(path)?;

        let give_fnptrs: GiveFnptrsToDllFn = module.require("GiveFnptrsToDll")?;
        give_fnptrs(host.engine, host.globals);

        let funcs = query_entity_api(&module)?;
        for slot in funcs.unset_slots() {
            log::debug!("legacy server leaves DLL_FUNCTIONS::{} unset", slot);
        }
        let new_funcs = query_new_dll_functions(&module);

        log::info!("legacy server initialized from {}", path.display());
        Ok(Self {
            module: Some(module),
            funcs,
            new_funcs,
        })
    }

    /// A legacy server over tables that are already filled in
    pub fn from_tables(funcs: DLL_FUNCTIONS, new_funcs: NEW_DLL_FUNCTIONS) -> Self {
        Self {
            module: None,
            funcs,
            new_funcs,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.module.as_ref().map(NativeModule::path)
    }

    pub fn funcs(&self) -> &DLL_FUNCTIONS {
        &self.funcs
    }

    pub fn new_funcs(&self) -> &NEW_DLL_FUNCTIONS {
        &self.new_funcs
    }
}

unsafe fn query_entity_api(module: &NativeModule) -> Result<DLL_FUNCTIONS> {
    let mut funcs = DLL_FUNCTIONS::default();

    if let Some(get_entity_api2) = module.function::<GetEntityAPI2Fn>("GetEntityAPI2") {
        let mut version = INTERFACE_VERSION;
        if get_entity_api2(&mut funcs, &mut version) == 0 {
            return Err(ShimError::binding_failed(
                Role::Server,
                format!(
                    "{} rejected GetEntityAPI2: it supports interface version {}, expected {}",
                    module.path().display(),
                    version,
                    INTERFACE_VERSION
                ),
            ));
        }
        return Ok(funcs);
    }

    let get_entity_api: GetEntityAPIFn = module.require("GetEntityAPI")?;
    if get_entity_api(&mut funcs, INTERFACE_VERSION) == 0 {
        return Err(ShimError::binding_failed(
            Role::Server,
            format!(
                "{} rejected GetEntityAPI for interface version {}",
                module.path().display(),
                INTERFACE_VERSION
            ),
        ));
    }
    Ok(funcs)
}

/// The new-API table is optional; any problem leaves it empty.
unsafe fn query_new_dll_functions(module: &NativeModule) -> NEW_DLL_FUNCTIONS {
    let mut new_funcs = NEW_DLL_FUNCTIONS::default();

    let Some(get_new_dll_functions) = module.function::<GetNewDLLFunctionsFn>("GetNewDLLFunctions") else {
        log::info!("{} does not export GetNewDLLFunctions", module.path().display());
        return new_funcs;
    };

    let mut version = NEW_DLL_FUNCTIONS_VERSION;
    if get_new_dll_functions(&mut new_funcs, &mut version) == 0 {
        log::warn!(
            "{} rejected GetNewDLLFunctions: it supports version {}, expected {}",
            module.path().display(),
            version,
            NEW_DLL_FUNCTIONS_VERSION
        );
        return NEW_DLL_FUNCTIONS::default();
    }

    for slot in new_funcs.unset_slots() {
        log::warn!("legacy server leaves NEW_DLL_FUNCTIONS::{} unset", slot);
    }
    new_funcs
}

// ============================================================
// Forwarding
// ============================================================

impl ServerExports for LegacyServer {
    dll_function_slots!(forward_to_table { funcs });
}

impl NewServerExports for LegacyServer {
    new_dll_function_slots!(forward_to_table { new_funcs });
}

impl GameServer for LegacyServer {
    fn private_data_allocator(&self, class_name: &CStr) -> Option<PrivateDataAllocator> {
        let module = self.module.as_ref()?;
        entity::lookup_allocator(module, class_name.to_str().ok()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::binder::{self, Selection, ShimContext};
    use crate::server::{dll_functions, new_dll_functions};

    static SPAWNS: AtomicUsize = AtomicUsize::new(0);
    static SHUTDOWNS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn fake_spawn(_pent: *mut edict_t) -> c_int {
        SPAWNS.fetch_add(1, Ordering::SeqCst);
        7
    }

    unsafe extern "C" fn fake_game_shutdown() {
        SHUTDOWNS.fetch_add(1, Ordering::SeqCst);
    }

    fn fabricated() -> LegacyServer {
        let funcs = DLL_FUNCTIONS {
            pfnSpawn: Some(fake_spawn),
            ..Default::default()
        };
        let new_funcs = NEW_DLL_FUNCTIONS {
            pfnGameShutdown: Some(fake_game_shutdown),
            ..Default::default()
        };
        LegacyServer::from_tables(funcs, new_funcs)
    }

    #[test]
    fn test_forwards_to_filled_slots() {
        let _serial = binder::serial_test_guard();
        let server = fabricated();
        let before = SPAWNS.load(Ordering::SeqCst);
        unsafe {
            assert_eq!(server.spawn(null_mut()), 7);
        }
        assert_eq!(SPAWNS.load(Ordering::SeqCst), before + 1);
        assert!(server.path().is_none());
    }

    #[test]
    fn test_null_slots_return_fallbacks() {
        let server = fabricated();
        unsafe {
            assert_eq!(server.restore(null_mut(), null_mut(), 0), 0);
            assert!(server.get_game_description().is_null());
            assert_eq!(server.should_collide(null_mut(), null_mut()), 1);
            server.think(null_mut());
        }
        assert!(server.private_data_allocator(c"weapon_crowbar").is_none());
    }

    #[test]
    fn test_missing_module_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let host = ServerHost::new(null_mut(), null_mut());
        let result = unsafe { LegacyServer::load(&dir.path().join("libserver.so"), host) };
        assert!(matches!(result, Err(ShimError::LoadError { .. })));
    }

    #[test]
    fn test_spawn_round_trips_through_trampoline() {
        let _serial = binder::serial_test_guard();
        let context = ShimContext::global();
        context.reset_for_tests();
        context
            .bind_server_with(Selection::Legacy("libserver.so".into()), |_| {
                Ok(Arc::new(fabricated()) as Arc<dyn GameServer>)
            })
            .unwrap();

        let funcs = dll_functions();
        let new_funcs = new_dll_functions();
        let spawns = SPAWNS.load(Ordering::SeqCst);
        let shutdowns = SHUTDOWNS.load(Ordering::SeqCst);
        unsafe {
            assert_eq!((funcs.pfnSpawn.unwrap())(null_mut()), 7);
            assert_eq!((funcs.pfnClientConnect.unwrap())(null_mut(), null(), null(), null_mut()), 0);
            (new_funcs.pfnGameShutdown.unwrap())();
        }
        assert_eq!(SPAWNS.load(Ordering::SeqCst), spawns + 1);
        assert_eq!(SHUTDOWNS.load(Ordering::SeqCst), shutdowns + 1);

        context.reset_for_tests();
    }

    unsafe extern "C" fn spawn_monster(pent: *mut edict_t) -> c_int {
        (*pent).v.health = 100.0;
        (*pent).v.spawnflags |= 4;
        0
    }

    #[test]
    fn test_null_assembly_spawn_matches_direct_call() {
        let _serial = binder::serial_test_guard();
        let settings = crate::settings::Settings::from_json(r#"{"GameServerAssembly": null}"#).unwrap();
        let selection = ShimContext::new(settings, "/opt/game/dlls").server_selection();
        assert!(matches!(selection, Selection::Legacy(_)));

        let context = ShimContext::global();
        context.reset_for_tests();
        context
            .bind_server_with(selection, |_| {
                let funcs = DLL_FUNCTIONS {
                    pfnSpawn: Some(spawn_monster),
                    ..Default::default()
                };
                Ok(Arc::new(LegacyServer::from_tables(funcs, NEW_DLL_FUNCTIONS::default())) as Arc<dyn GameServer>)
            })
            .unwrap();

        let mut direct: edict_t = unsafe { std::mem::zeroed() };
        let mut shimmed: edict_t = unsafe { std::mem::zeroed() };
        let funcs = dll_functions();
        unsafe {
            assert_eq!(spawn_monster(&mut direct), 0);
            assert_eq!((funcs.pfnSpawn.unwrap())(&mut shimmed), 0);
        }
        assert_eq!(shimmed.v.health, direct.v.health);
        assert_eq!(shimmed.v.spawnflags, direct.v.spawnflags);
        assert_eq!(shimmed.v.health, 100.0);

        context.reset_for_tests();
    }
}
