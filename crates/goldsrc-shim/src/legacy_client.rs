// legacy_client.rs — forward the client role to a native HLSDK client DLL

use std::path::Path;

use goldsrc_common::client_api::{cldll_func_t, ClientExportFn};

use crate::client::GameClient;
use crate::error::{Result, ShimError};
use crate::module::NativeModule;
use crate::slots::abi::*;

pub struct LegacyClient {
    /// Keeps the table valid; `None` for tables built in memory
    module: Option<NativeModule>,
    funcs: cldll_func_t,
}

impl LegacyClient {
    /// Load the client module at `path` and collect its exports.
    ///
    /// Nothing in the module is called except `F`; `Initialize` runs when
    /// the engine calls it through the shim.
    pub fn load(path: &Path) -> Result<Self> {
        let module = NativeModule::load(path)?;
        // SAFETY: the exported symbols carry the HLSDK client signatures
        let funcs = unsafe { resolve_client_funcs(&module) };

        if funcs.pInitFunc.is_none() {
            return Err(ShimError::symbol_not_found(path.display().to_string(), "Initialize"));
        }
        for slot in funcs.unset_slots() {
            log::debug!("legacy client leaves cldll_func_t::{} unset", slot);
        }

        log::info!("legacy client loaded from {}", path.display());
        Ok(Self {
            module: Some(module),
            funcs,
        })
    }

    pub fn from_table(funcs: cldll_func_t) -> Self {
        Self { module: None, funcs }
    }

    pub fn path(&self) -> Option<&Path> {
        self.module.as_ref().map(NativeModule::path)
    }

    pub fn funcs(&self) -> &cldll_func_t {
        &self.funcs
    }
}

/// Prefer the module's own `F` export; older clients only export each
/// function by name.
unsafe fn resolve_client_funcs(module: &NativeModule) -> cldll_func_t {
    let mut table = cldll_func_t::default();

    if let Some(fill) = module.function::<ClientExportFn>("F") {
        fill(&mut table);
        if table.pInitFunc.is_some() {
            return table;
        }
        log::warn!(
            "{}: F left Initialize unset, using named exports",
            module.path().display()
        );
        table = cldll_func_t::default();
    }

    client_function_slots!(resolve_by_symbol { module, table });
    table
}

impl GameClient for LegacyClient {
    client_function_slots!(forward_to_table { funcs });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Arc;

    use goldsrc_common::client_api::CLDLL_INTERFACE_VERSION;

    use crate::binder::{self, Selection, ShimContext};
    use crate::client::{client_funcs, ClientBinding};

    static INIT_VERSION: AtomicI32 = AtomicI32::new(0);

    unsafe extern "C" fn fake_initialize(_funcs: *mut cl_enginefunc_t, version: c_int) -> c_int {
        INIT_VERSION.store(version, Ordering::SeqCst);
        1
    }

    unsafe extern "C" fn fake_is_third_person() -> c_int {
        1
    }

    fn fabricated() -> LegacyClient {
        LegacyClient::from_table(cldll_func_t {
            pInitFunc: Some(fake_initialize),
            pCL_IsThirdPerson: Some(fake_is_third_person),
            ..Default::default()
        })
    }

    #[test]
    fn test_forwards_and_falls_back() {
        let client = fabricated();
        unsafe {
            assert_eq!(client.cl_is_third_person(), 1);
            assert_eq!(client.hud_vid_init(), 0);
            assert_eq!(client.hud_key_event(1, 27, null()), 1);
            assert!(client.hud_get_user_entity(3).is_null());
        }
        assert!(client.path().is_none());
    }

    #[test]
    fn test_missing_module_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = LegacyClient::load(&dir.path().join("libclient.so"));
        assert!(matches!(result, Err(ShimError::LoadError { .. })));
    }

    #[test]
    fn test_initialize_round_trips_through_trampoline() {
        let _serial = binder::serial_test_guard();
        let context = ShimContext::global();
        context.reset_for_tests();
        context
            .bind_client_with(Selection::Legacy("libclient.so".into()), |_| {
                Ok(Arc::new(fabricated()) as Arc<dyn ClientBinding>)
            })
            .unwrap();

        let table = client_funcs();
        unsafe {
            assert_eq!((table.pInitFunc.unwrap())(null_mut(), CLDLL_INTERFACE_VERSION), 1);
            assert_eq!((table.pCL_IsThirdPerson.unwrap())(), 1);
        }
        assert_eq!(INIT_VERSION.load(Ordering::SeqCst), CLDLL_INTERFACE_VERSION);

        context.reset_for_tests();
    }
}
