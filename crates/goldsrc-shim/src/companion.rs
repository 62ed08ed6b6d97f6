// companion.rs — loading game logic from a companion module
//
// A companion is a Rust cdylib built against this crate. It exports a
// single factory per role; the shim calls it once and owns the result.
// Use `declare_server_exports!` / `declare_client_exports!` to emit the
// factory with the right symbol name and signature.
//
// The factory receives the role's legacy implementation when the legacy
// module loads, so a companion can override a few callbacks and forward
// the rest through `legacy_exports()` / `legacy_client()`.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::ptr;
use std::sync::Arc;

use crate::binder::ServerHost;
use crate::client::{ClientBinding, GameClient};
use crate::error::{Result, Role, ShimError};
use crate::guard::panic_message;
use crate::legacy_client::LegacyClient;
use crate::legacy_server::LegacyServer;
use crate::module::NativeModule;
use crate::server::GameServer;

pub const SERVER_FACTORY_SYMBOL: &str = "gsf_create_server_exports";
pub const CLIENT_FACTORY_SYMBOL: &str = "gsf_create_client_exports";

/// What a server companion is built from
pub struct ServerBase {
    pub host: ServerHost,
    /// The legacy server, already through its handshake, if it loaded
    pub legacy: Option<LegacyServer>,
}

/// What a client companion is built from
pub struct ClientBase {
    pub legacy: Option<LegacyClient>,
}

/// Owned server implementation handed across the factory boundary.
/// Opaque to C; both sides must be built with the same compiler and
/// version of this crate.
pub struct ServerExportsHandle(pub Box<dyn GameServer>);

impl ServerExportsHandle {
    pub fn into_raw<T: GameServer + 'static>(server: T) -> *mut Self {
        Box::into_raw(Box::new(Self(Box::new(server))))
    }
}

/// Owned client implementation handed across the factory boundary
pub struct ClientExportsHandle(pub Box<dyn ClientBinding>);

impl ClientExportsHandle {
    pub fn into_raw<T: GameClient + Send + Sync + 'static>(client: T) -> *mut Self {
        Box::into_raw(Box::new(Self(Box::new(client))))
    }
}

/// The factory owns `base` and must free it, even when returning null.
pub type ServerFactoryFn = unsafe extern "C" fn(base: *mut ServerBase) -> *mut ServerExportsHandle;
pub type ClientFactoryFn = unsafe extern "C" fn(base: *mut ClientBase) -> *mut ClientExportsHandle;

/// Body of a `declare_server_exports!` factory: take `base` back and run
/// the constructor. A null `base` or a panicking constructor gives null.
///
/// # Safety
/// `base` is null or came from `Box::into_raw`.
pub unsafe fn create_server_exports<T, F>(base: *mut ServerBase, ctor: F) -> *mut ServerExportsHandle
where
    T: GameServer + 'static,
    F: FnOnce(ServerBase) -> T,
{
    if base.is_null() {
        return ptr::null_mut();
    }
    let base = *Box::from_raw(base);
    panic::catch_unwind(AssertUnwindSafe(move || ServerExportsHandle::into_raw(ctor(base)))).unwrap_or_else(|payload| {
        log::error!("server companion constructor panicked: {}", panic_message(payload.as_ref()));
        ptr::null_mut()
    })
}

/// Body of a `declare_client_exports!` factory
///
/// # Safety
/// `base` is null or came from `Box::into_raw`.
pub unsafe fn create_client_exports<T, F>(base: *mut ClientBase, ctor: F) -> *mut ClientExportsHandle
where
    T: GameClient + Send + Sync + 'static,
    F: FnOnce(ClientBase) -> T,
{
    if base.is_null() {
        return ptr::null_mut();
    }
    let base = *Box::from_raw(base);
    panic::catch_unwind(AssertUnwindSafe(move || ClientExportsHandle::into_raw(ctor(base)))).unwrap_or_else(|payload| {
        log::error!("client companion constructor panicked: {}", panic_message(payload.as_ref()));
        ptr::null_mut()
    })
}

/// A bound companion: the implementation plus the module it lives in.
/// Field order drops the implementation before the module is unmapped.
struct Companion<T: ?Sized> {
    inner: Box<T>,
    _module: NativeModule,
}

fn factory<T: Copy>(module: &NativeModule, symbol: &str) -> Result<T> {
    // SAFETY: the factory symbols are only ever exported by the declare
    // macros below, with exactly these signatures
    unsafe { module.function::<T>(symbol) }.ok_or_else(|| ShimError::missing_factory(module.path(), symbol))
}

fn build_server(create: ServerFactoryFn, base: ServerBase, origin: &Path) -> Result<Box<dyn GameServer>> {
    let raw = unsafe { create(Box::into_raw(Box::new(base))) };
    if raw.is_null() {
        return Err(ShimError::binding_failed(
            Role::Server,
            format!("{} returned null from {}", origin.display(), SERVER_FACTORY_SYMBOL),
        ));
    }
    // SAFETY: non-null results come from `ServerExportsHandle::into_raw`
    let handle = unsafe { Box::from_raw(raw) };
    Ok(handle.0)
}

fn build_client(create: ClientFactoryFn, base: ClientBase, origin: &Path) -> Result<Box<dyn ClientBinding>> {
    let raw = unsafe { create(Box::into_raw(Box::new(base))) };
    if raw.is_null() {
        return Err(ShimError::binding_failed(
            Role::Client,
            format!("{} returned null from {}", origin.display(), CLIENT_FACTORY_SYMBOL),
        ));
    }
    // SAFETY: non-null results come from `ClientExportsHandle::into_raw`
    let handle = unsafe { Box::from_raw(raw) };
    Ok(handle.0)
}

/// Load the companion at `path` and build its server implementation.
/// `legacy` runs only once the factory has been found.
pub fn load_server(
    path: &Path,
    host: ServerHost,
    legacy: impl FnOnce() -> Option<LegacyServer>,
) -> Result<Arc<dyn GameServer>> {
    let module = NativeModule::load(path)?;
    let create: ServerFactoryFn = factory(&module, SERVER_FACTORY_SYMBOL)?;

    let base = ServerBase { host, legacy: legacy() };
    let inner = build_server(create, base, path)?;

    log::info!("server companion loaded from {}", path.display());
    let server: Arc<dyn GameServer> = Arc::new(Companion { inner, _module: module });
    Ok(server)
}

/// Load the companion at `path` and build its client implementation.
pub fn load_client(path: &Path, legacy: impl FnOnce() -> Option<LegacyClient>) -> Result<Arc<dyn ClientBinding>> {
    let module = NativeModule::load(path)?;
    let create: ClientFactoryFn = factory(&module, CLIENT_FACTORY_SYMBOL)?;

    let inner = build_client(create, ClientBase { legacy: legacy() }, path)?;

    log::info!("client companion loaded from {}", path.display());
    let client: Arc<dyn ClientBinding> = Arc::new(Companion { inner, _module: module });
    Ok(client)
}

// ============================================================
// Delegation from the owning wrapper
// ============================================================

mod delegate {
    use super::Companion;
    use crate::client::{ClientBinding, GameClient};
    use crate::server::{GameServer, NewServerExports, ServerExports};
    use crate::slots::abi::*;
    use goldsrc_common::server_api::PrivateDataAllocator;
    use std::ffi::CStr;

    macro_rules! delegate_to_inner {
        (
            {}
            table: $table:ident, exports: $trait:ident, dispatch: $dispatch:ident,
            fill: $fill:ident, build: $build:ident;
            $( $(#[$smeta:meta])* $slot:ident $([$symbol:literal])? => fn $method:ident ( $($arg:ident : $ty:ty),* $(,)? ) -> $ret:ty = $default:expr; )*
        ) => {
            $(
                unsafe fn $method(&self, $($arg: $ty),*) -> $ret {
                    self.inner.$method($($arg),*)
                }
            )*
        };
    }

    impl ServerExports for Companion<dyn GameServer> {
        dll_function_slots!(delegate_to_inner {});
    }

    impl NewServerExports for Companion<dyn GameServer> {
        new_dll_function_slots!(delegate_to_inner {});
    }

    impl GameServer for Companion<dyn GameServer> {
        fn private_data_allocator(&self, class_name: &CStr) -> Option<PrivateDataAllocator> {
            self.inner.private_data_allocator(class_name)
        }
    }

    impl GameClient for Companion<dyn ClientBinding> {
        client_function_slots!(delegate_to_inner {});
    }
}

// ============================================================
// Factory declaration macros
// ============================================================

/// Emit `gsf_create_server_exports` for a companion cdylib.
///
/// ```ignore
/// goldsrc_shim::declare_server_exports!(MyServer::new);
/// ```
///
/// The constructor receives the `ServerBase` and returns a `GameServer`.
/// A panicking constructor yields null, which fails the binding.
#[macro_export]
macro_rules! declare_server_exports {
    ($ctor:expr) => {
        #[no_mangle]
        pub unsafe extern "C" fn gsf_create_server_exports(
            base: *mut $crate::companion::ServerBase,
        ) -> *mut $crate::companion::ServerExportsHandle {
            $crate::companion::create_server_exports(base, $ctor)
        }
    };
}

/// Emit `gsf_create_client_exports` for a companion cdylib.
///
/// ```ignore
/// goldsrc_shim::declare_client_exports!(MyClient::new);
/// ```
#[macro_export]
macro_rules! declare_client_exports {
    ($ctor:expr) => {
        #[no_mangle]
        pub unsafe extern "C" fn gsf_create_client_exports(
            base: *mut $crate::companion::ClientBase,
        ) -> *mut $crate::companion::ClientExportsHandle {
            $crate::companion::create_client_exports(base, $ctor)
        }
    };
}
