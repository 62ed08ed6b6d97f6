// binder.rs — process context and per-role implementation binding
//
// One `ShimContext` exists per process. It owns the settings, the shim's
// directory and one binding slot per role. A slot moves from Uninitialized
// through Resolving to Bound, or to Failed, and never moves back.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::{ReentrantMutex, RwLock};

use goldsrc_common::engine_api::enginefuncs_t;
use goldsrc_common::entity::globalvars_t;

use crate::client::ClientBinding;
use crate::companion;
use crate::entity::EntityAllocators;
use crate::error::{Result, Role, ShimError};
use crate::guard::panic_message;
use crate::legacy_client::LegacyClient;
use crate::legacy_server::LegacyServer;
use crate::logging;
use crate::module::{self, ExportLookup, NativeModule};
use crate::server::GameServer;
use crate::settings::Settings;

// ============================================================
// ServerHost
// ============================================================

/// What the engine hands the server in `GiveFnptrsToDll`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ServerHost {
    pub engine: *mut enginefuncs_t,
    pub globals: *mut globalvars_t,
}

// SAFETY: both tables are owned by the engine and outlive the game DLL
unsafe impl Send for ServerHost {}
unsafe impl Sync for ServerHost {}

impl ServerHost {
    pub fn new(engine: *mut enginefuncs_t, globals: *mut globalvars_t) -> Self {
        Self { engine, globals }
    }

    pub fn is_complete(&self) -> bool {
        !self.engine.is_null() && !self.globals.is_null()
    }
}

// ============================================================
// Binding state
// ============================================================

/// Which implementation a role resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Companion(PathBuf),
    Legacy(PathBuf),
}

impl Selection {
    pub fn path(&self) -> &Path {
        match self {
            Selection::Companion(path) | Selection::Legacy(path) => path,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Companion(path) => write!(f, "companion module '{}'", path.display()),
            Selection::Legacy(path) => write!(f, "legacy module '{}'", path.display()),
        }
    }
}

pub enum BindState<T: ?Sized> {
    Uninitialized,
    Resolving(Selection),
    Bound { imp: Arc<T>, selection: Selection },
    Failed { selection: Selection, message: String },
}

/// Binding slot for one role
pub struct RoleSlot<T: ?Sized> {
    role: Role,
    state: RwLock<BindState<T>>,
    // Serializes binding. Reentrant so a nested bind on the same thread
    // sees Resolving instead of deadlocking.
    binding: ReentrantMutex<()>,
}

impl<T: ?Sized> RoleSlot<T> {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            state: RwLock::new(BindState::Uninitialized),
            binding: ReentrantMutex::new(()),
        }
    }

    pub fn current(&self) -> Option<Arc<T>> {
        match &*self.state.read() {
            BindState::Bound { imp, .. } => Some(Arc::clone(imp)),
            _ => None,
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        match &*self.state.read() {
            BindState::Uninitialized => None,
            BindState::Resolving(selection)
            | BindState::Bound { selection, .. }
            | BindState::Failed { selection, .. } => Some(selection.clone()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(&*self.state.read(), BindState::Failed { .. })
    }

    /// Bind the role with `build` unless it is already resolved.
    ///
    /// A bound role returns its implementation; a failed one returns
    /// `BindingFailed` without calling `build`.
    pub fn bind_with(
        &self,
        selection: Selection,
        build: impl FnOnce(&Selection) -> Result<Arc<T>>,
    ) -> Result<Arc<T>> {
        let _binding = self.binding.lock();

        match &*self.state.read() {
            BindState::Bound { imp, selection: bound } => {
                if *bound != selection {
                    log::warn!(
                        "{} already bound to {}; ignoring {}",
                        self.role,
                        bound,
                        selection
                    );
                }
                return Ok(Arc::clone(imp));
            }
            BindState::Failed { message, .. } => {
                return Err(ShimError::binding_failed(self.role, message.clone()));
            }
            BindState::Resolving(resolving) => {
                return Err(ShimError::binding_failed(
                    self.role,
                    format!("re-entered while resolving {}", resolving),
                ));
            }
            BindState::Uninitialized => {}
        }

        *self.state.write() = BindState::Resolving(selection.clone());
        log::debug!("binding {} to {}", self.role, selection);

        let built = panic::catch_unwind(AssertUnwindSafe(|| build(&selection))).unwrap_or_else(|payload| {
            Err(ShimError::binding_failed(
                self.role,
                format!("panicked: {}", panic_message(payload.as_ref())),
            ))
        });

        match built {
            Ok(imp) => {
                log::info!("{} bound to {}", self.role, selection);
                *self.state.write() = BindState::Bound {
                    imp: Arc::clone(&imp),
                    selection,
                };
                Ok(imp)
            }
            Err(e) => {
                if e.is_configuration_error() {
                    log::error!("{} configuration error for {}: {}", self.role, selection, e);
                } else {
                    log::error!("{} binding to {} failed: {}", self.role, selection, e);
                }
                *self.state.write() = BindState::Failed {
                    selection,
                    message: e.to_string(),
                };
                Err(e)
            }
        }
    }

    #[cfg(any(test, feature = "test-support"))]
    fn reset(&self) {
        let _binding = self.binding.lock();
        *self.state.write() = BindState::Uninitialized;
    }
}

// ============================================================
// ShimContext
// ============================================================

static CONTEXT: OnceLock<ShimContext> = OnceLock::new();

pub struct ShimContext {
    settings: Settings,
    module_dir: PathBuf,
    server: RoleSlot<dyn GameServer>,
    client: RoleSlot<dyn ClientBinding>,
    host: RwLock<Option<ServerHost>>,
    allocators: RwLock<Option<Arc<EntityAllocators>>>,
}

impl ShimContext {
    /// A context over explicit settings. Touches neither the logger nor
    /// the process environment.
    pub fn new(settings: Settings, module_dir: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            module_dir: module_dir.into(),
            server: RoleSlot::new(Role::Server),
            client: RoleSlot::new(Role::Client),
            host: RwLock::new(None),
            allocators: RwLock::new(None),
        }
    }

    /// The process context, created on first use: reads the sidecar,
    /// installs the logger and prepends the shim directory to `PATH`.
    pub fn global() -> &'static ShimContext {
        CONTEXT.get_or_init(Self::from_environment)
    }

    /// The process context if an entry point has created it
    pub fn current() -> Option<&'static ShimContext> {
        CONTEXT.get()
    }

    fn from_environment() -> Self {
        let dir = module::shim_dir();
        let (settings, problem) = Settings::load_or_default(&dir);
        logging::init(&settings, &dir);

        if let Some(problem) = problem {
            log::warn!("{}; using default settings", problem);
        }
        if let Err(e) = module::prepend_search_path(&dir) {
            log::warn!("{}", e);
        }

        log::info!(
            "{} {} starting in {}",
            settings.framework_name,
            settings.version,
            dir.display()
        );
        Self::new(settings, dir)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    pub fn set_host(&self, host: ServerHost) {
        if !host.is_complete() {
            log::warn!("engine passed an incomplete host: {:?}", host);
        }
        *self.host.write() = Some(host);
    }

    pub fn host(&self) -> Option<ServerHost> {
        *self.host.read()
    }

    // ------------------------------------------------------------
    // Server role
    // ------------------------------------------------------------

    pub fn server(&self) -> Option<Arc<dyn GameServer>> {
        self.server.current()
    }

    /// What the settings select for the server role
    pub fn server_selection(&self) -> Selection {
        match self.settings.server_companion(&self.module_dir) {
            Some(path) => Selection::Companion(path),
            None => Selection::Legacy(self.settings.legacy_server_path(&self.module_dir)),
        }
    }

    /// Bind the server role as the settings select. Needs the host from
    /// `GiveFnptrsToDll` unless the role is already bound.
    pub fn bind_server(&self) -> Result<Arc<dyn GameServer>> {
        let host = self.host();
        self.bind_server_with(self.server_selection(), |selection| {
            let host = host.ok_or_else(|| {
                ShimError::binding_failed(Role::Server, "GiveFnptrsToDll has not been called")
            })?;
            match selection {
                Selection::Companion(path) => companion::load_server(path, host, || {
                    let legacy = self.settings.legacy_server_path(&self.module_dir);
                    // SAFETY: the host came from the engine's GiveFnptrsToDll
                    match unsafe { LegacyServer::load(&legacy, host) } {
                        Ok(server) => Some(server),
                        Err(e) => {
                            log::info!("server companion runs without a legacy base: {}", e);
                            None
                        }
                    }
                }),
                Selection::Legacy(path) => {
                    // SAFETY: the host came from the engine's GiveFnptrsToDll
                    let server = unsafe { LegacyServer::load(path, host) }?;
                    Ok(Arc::new(server) as Arc<dyn GameServer>)
                }
            }
        })
    }

    pub fn bind_server_with(
        &self,
        selection: Selection,
        build: impl FnOnce(&Selection) -> Result<Arc<dyn GameServer>>,
    ) -> Result<Arc<dyn GameServer>> {
        self.server.bind_with(selection, build)
    }

    pub fn server_slot(&self) -> &RoleSlot<dyn GameServer> {
        &self.server
    }

    // ------------------------------------------------------------
    // Client role
    // ------------------------------------------------------------

    pub fn client(&self) -> Option<Arc<dyn ClientBinding>> {
        self.client.current()
    }

    pub fn client_selection(&self) -> Selection {
        match self.settings.client_companion(&self.module_dir) {
            Some(path) => Selection::Companion(path),
            None => Selection::Legacy(self.settings.legacy_client_path(&self.module_dir)),
        }
    }

    pub fn bind_client(&self) -> Result<Arc<dyn ClientBinding>> {
        self.bind_client_with(self.client_selection(), |selection| match selection {
            Selection::Companion(path) => companion::load_client(path, || {
                match LegacyClient::load(&self.settings.legacy_client_path(&self.module_dir)) {
                    Ok(client) => Some(client),
                    Err(e) => {
                        log::info!("client companion runs without a legacy base: {}", e);
                        None
                    }
                }
            }),
            Selection::Legacy(path) => Ok(Arc::new(LegacyClient::load(path)?) as Arc<dyn ClientBinding>),
        })
    }

    pub fn bind_client_with(
        &self,
        selection: Selection,
        build: impl FnOnce(&Selection) -> Result<Arc<dyn ClientBinding>>,
    ) -> Result<Arc<dyn ClientBinding>> {
        self.client.bind_with(selection, build)
    }

    pub fn client_slot(&self) -> &RoleSlot<dyn ClientBinding> {
        &self.client
    }

    // ------------------------------------------------------------
    // Entity allocators
    // ------------------------------------------------------------

    /// Allocators for the currently bound server, resolved on first use
    pub fn entity_allocators(&self) -> Arc<EntityAllocators> {
        if let Some(allocators) = self.allocators.read().as_ref() {
            return Arc::clone(allocators);
        }
        let mut slot = self.allocators.write();
        if let Some(allocators) = slot.as_ref() {
            return Arc::clone(allocators);
        }
        let allocators = Arc::new(self.build_entity_allocators());
        *slot = Some(Arc::clone(&allocators));
        allocators
    }

    /// Resolve the allocators again, e.g. once the server is bound
    pub fn refresh_entity_allocators(&self) -> Arc<EntityAllocators> {
        let allocators = Arc::new(self.build_entity_allocators());
        *self.allocators.write() = Some(Arc::clone(&allocators));
        allocators
    }

    fn build_entity_allocators(&self) -> EntityAllocators {
        // A legacy server answers from its own module; anything else falls
        // back to the legacy module's exports.
        let fallback: Option<Box<dyn ExportLookup + Send + Sync>> = match self.server.selection() {
            Some(Selection::Legacy(_)) if self.server().is_some() => None,
            _ => {
                let path = self.settings.legacy_server_path(&self.module_dir);
                match NativeModule::load(&path) {
                    Ok(module) => Some(Box::new(module) as Box<dyn ExportLookup + Send + Sync>),
                    Err(e) => {
                        log::warn!("no legacy entity exports: {}", e);
                        None
                    }
                }
            }
        };
        EntityAllocators::build(self.server(), fallback)
    }

    /// Drop every binding so a test can bind again
    #[cfg(any(test, feature = "test-support"))]
    pub fn reset_for_tests(&self) {
        self.server.reset();
        self.client.reset();
        *self.host.write() = None;
        *self.allocators.write() = None;
    }
}

#[cfg(test)]
static SERIAL_TESTS: parking_lot::Mutex<()> = parking_lot::Mutex::new(());

/// Held by every test that binds through the process context
#[cfg(test)]
pub(crate) fn serial_test_guard() -> parking_lot::MutexGuard<'static, ()> {
    SERIAL_TESTS.lock()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr::null_mut;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    use crate::server::{NewServerExports, ServerExports};
    use crate::settings::{DEFAULT_LEGACY_CLIENT_MODULE, DEFAULT_LEGACY_SERVER_MODULE};

    struct Plain;
    impl ServerExports for Plain {}
    impl NewServerExports for Plain {}
    impl GameServer for Plain {}

    fn context(json: &str) -> ShimContext {
        ShimContext::new(Settings::from_json(json).unwrap(), "/opt/game/dlls")
    }

    fn plain(_: &Selection) -> Result<Arc<dyn GameServer>> {
        Ok(Arc::new(Plain))
    }

    #[test]
    fn test_null_server_assembly_selects_legacy() {
        let context = context(r#"{"GameServerAssembly": null}"#);
        let expected = Selection::Legacy(PathBuf::from("/opt/game/dlls").join(DEFAULT_LEGACY_SERVER_MODULE));
        assert_eq!(context.server_selection(), expected);
        assert_eq!(context.server_selection(), expected);
        assert_eq!(
            context.client_selection(),
            Selection::Legacy(PathBuf::from("/opt/game/dlls").join(DEFAULT_LEGACY_CLIENT_MODULE))
        );
    }

    #[test]
    fn test_configured_assembly_selects_companion() {
        let context = context(r#"{"GameServerAssembly": "mymod_server.so", "GameClientAssembly": "/abs/client.so"}"#);
        assert_eq!(
            context.server_selection(),
            Selection::Companion(PathBuf::from("/opt/game/dlls/mymod_server.so"))
        );
        assert_eq!(context.client_selection(), Selection::Companion(PathBuf::from("/abs/client.so")));
    }

    #[test]
    fn test_bind_runs_once() {
        let context = context("{}");
        let builds = AtomicUsize::new(0);
        let build = |_: &Selection| -> Result<Arc<dyn GameServer>> {
            builds.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Plain))
        };

        let selection = context.server_selection();
        context.bind_server_with(selection.clone(), build).unwrap();
        context.bind_server_with(selection.clone(), build).unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(context.server().is_some());
        assert_eq!(context.server_slot().selection(), Some(selection));
    }

    #[test]
    fn test_rebind_with_other_selection_is_ignored() {
        let context = context("{}");
        let first = Selection::Legacy("libserver.so".into());
        context.bind_server_with(first.clone(), plain).unwrap();

        let other = Selection::Companion("mymod_server.so".into());
        let result = context.bind_server_with(other, |_| panic!("must not rebuild"));
        assert!(result.is_ok());
        assert_eq!(context.server_slot().selection(), Some(first));
    }

    #[test]
    fn test_failure_is_sticky() {
        let context = context("{}");
        let selection = Selection::Companion("mymod_server.so".into());

        let err = context
            .bind_server_with(selection.clone(), |s| {
                Err(ShimError::missing_factory(s.path(), companion::SERVER_FACTORY_SYMBOL))
            })
            .err()
            .unwrap();
        assert!(matches!(err, ShimError::MissingFactory { .. }));
        assert!(context.server_slot().is_failed());

        let err = context.bind_server_with(selection, plain).err().unwrap();
        assert!(matches!(err, ShimError::BindingFailed { role: Role::Server, .. }));
        assert!(context.server().is_none());
    }

    #[test]
    fn test_panicking_build_fails_the_role() {
        let context = context("{}");
        let err = context
            .bind_server_with(Selection::Legacy("libserver.so".into()), |_| panic!("factory blew up"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("factory blew up"));
        assert!(context.server_slot().is_failed());
    }

    #[test]
    fn test_reentrant_bind_is_rejected() {
        let context = context("{}");
        let selection = Selection::Legacy("libserver.so".into());
        let result = context.bind_server_with(selection.clone(), |s| {
            let nested = context.bind_server_with(s.clone(), plain);
            assert!(matches!(nested, Err(ShimError::BindingFailed { .. })));
            Ok(Arc::new(Plain) as Arc<dyn GameServer>)
        });
        assert!(result.is_ok());
        assert!(context.server().is_some());
    }

    #[test]
    fn test_missing_legacy_module_fails_server_binding() {
        let dir = tempfile::tempdir().unwrap();
        let context = ShimContext::new(Settings::default(), dir.path());
        context.set_host(ServerHost::new(null_mut(), null_mut()));

        let err = context.bind_server().err().unwrap();
        assert!(matches!(err, ShimError::LoadError { .. }));
        assert!(context.server_slot().is_failed());
        assert!(context.bind_server().is_err());
    }

    #[test]
    fn test_server_binding_needs_the_host() {
        let context = context("{}");
        let err = context.bind_server().err().unwrap();
        assert!(err.to_string().contains("GiveFnptrsToDll"));
    }

    #[test]
    fn test_missing_legacy_client_fails_client_binding() {
        let dir = tempfile::tempdir().unwrap();
        let context = ShimContext::new(Settings::default(), dir.path());
        assert!(context.bind_client().is_err());
        assert!(context.client_slot().is_failed());
        assert!(context.client().is_none());
    }

    #[test]
    fn test_reset_allows_a_new_binding() {
        let context = context("{}");
        let result = context.bind_server_with(Selection::Legacy("libserver.so".into()), |_| {
            Err(ShimError::load_error("libserver.so", "gone"))
        });
        assert!(result.is_err());
        context.reset_for_tests();
        assert!(context.server_slot().selection().is_none());
        context.bind_server_with(Selection::Legacy("libserver.so".into()), plain).unwrap();
        assert!(context.server().is_some());
    }

    #[test]
    fn test_concurrent_bind_waits_for_the_first() {
        let slot: RoleSlot<dyn GameServer> = RoleSlot::new(Role::Server);
        let selection = Selection::Legacy("libserver.so".into());
        let builds = AtomicUsize::new(0);
        let resolving = Barrier::new(2);

        let (first, second) = thread::scope(|s| {
            let first = s.spawn(|| {
                slot.bind_with(selection.clone(), |_| {
                    resolving.wait();
                    thread::sleep(Duration::from_millis(50));
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new(Plain) as Arc<dyn GameServer>)
                })
            });
            let second = s.spawn(|| {
                resolving.wait();
                slot.bind_with(selection.clone(), |_| {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new(Plain) as Arc<dyn GameServer>)
                })
            });
            (first.join().unwrap(), second.join().unwrap())
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
    }

    #[test]
    fn test_concurrent_bind_sees_the_same_failure() {
        let slot: RoleSlot<dyn GameServer> = RoleSlot::new(Role::Server);
        let selection = Selection::Companion("mymod_server.so".into());
        let builds = AtomicUsize::new(0);
        let resolving = Barrier::new(2);

        let (first, second) = thread::scope(|s| {
            let first = s.spawn(|| {
                slot.bind_with(selection.clone(), |chosen| {
                    resolving.wait();
                    thread::sleep(Duration::from_millis(50));
                    builds.fetch_add(1, Ordering::SeqCst);
                    Err(ShimError::missing_factory(chosen.path(), companion::SERVER_FACTORY_SYMBOL))
                })
            });
            let second = s.spawn(|| {
                resolving.wait();
                slot.bind_with(selection.clone(), |_| {
                    builds.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new(Plain) as Arc<dyn GameServer>)
                })
            });
            (first.join().unwrap(), second.join().unwrap())
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        let first = first.err().unwrap();
        let second = second.err().unwrap();
        assert!(matches!(first, ShimError::MissingFactory { .. }));
        assert!(matches!(&second, ShimError::BindingFailed { role: Role::Server, message } if *message == first.to_string()));
        assert!(slot.is_failed());
    }

    #[test]
    fn test_allocators_without_any_module_resolve_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let context = ShimContext::new(Settings::default(), dir.path());
        let allocators = context.entity_allocators();
        assert_eq!(allocators.resolved(), 0);
        assert!(Arc::ptr_eq(&allocators, &context.entity_allocators()));
    }
}
