// module.rs — native module loading, export lookup and search path setup

use std::ffi::{c_void, OsString};
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};

use crate::error::{Result, ShimError};

// ============================================================
// Export lookup
// ============================================================

/// Anything that can resolve an exported symbol to an address.
///
/// Implemented by `NativeModule`; tests use in-memory tables.
pub trait ExportLookup {
    /// Address of export `name`, or `None` when it is absent
    fn export_address(&self, name: &str) -> Option<*const c_void>;

    /// Human-readable module name for log messages
    fn module_name(&self) -> String;
}

// ============================================================
// NativeModule — wrapper for a loaded shared library
// ============================================================

/// A loaded native module. The library stays mapped for the lifetime of
/// this value, so function pointers taken from it must not outlive it.
pub struct NativeModule {
    library: Library,
    path: PathBuf,
}

impl NativeModule {
    /// Load a module from `path`.
    ///
    /// A missing file is reported as a load error before the OS loader is
    /// asked, so the message names the path rather than a loader code.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ShimError::load_error(path, "file not found"));
        }

        // SAFETY: loading runs the module's initializers. The modules loaded
        // here are game DLLs that expect to be loaded into this process.
        let library = unsafe { Library::new(path) }
            .map_err(|e| ShimError::load_error(path, e.to_string()))?;

        log::debug!("loaded module {}", path.display());
        Ok(Self {
            library,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a function export and copy the pointer out.
    ///
    /// # Safety
    /// `T` must be a function pointer type matching the export's real
    /// signature and calling convention.
    pub unsafe fn function<T: Copy>(&self, name: &str) -> Option<T> {
        let symbol: Symbol<T> = self.library.get(name.as_bytes()).ok()?;
        Some(*symbol)
    }

    /// Like `function`, but a missing export is an error
    pub unsafe fn require<T: Copy>(&self, name: &str) -> Result<T> {
        self.function(name)
            .ok_or_else(|| ShimError::symbol_not_found(self.module_name(), name))
    }
}

impl ExportLookup for NativeModule {
    fn export_address(&self, name: &str) -> Option<*const c_void> {
        // SAFETY: the symbol is only read as an address, never called here
        let symbol: Symbol<*const c_void> = unsafe { self.library.get(name.as_bytes()) }.ok()?;
        let address = *symbol;
        (!address.is_null()).then_some(address)
    }

    fn module_name(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================
// Search path
// ============================================================

/// `current` with `dir` moved to the front. An existing entry for `dir`
/// is not duplicated.
pub fn path_with_prepended(dir: &Path, current: Option<OsString>) -> Result<OsString> {
    let mut entries = vec![dir.to_path_buf()];
    if let Some(current) = current {
        entries.extend(std::env::split_paths(&current).filter(|p| p != dir));
    }
    std::env::join_paths(entries)
        .map_err(|e| ShimError::config(dir, format!("cannot add to PATH: {}", e)))
}

/// Variable the loader searches for a module's dependencies while the
/// process runs. Windows reads `PATH` on every load. The ELF and Mach-O
/// loaders read `LD_LIBRARY_PATH` / `DYLD_LIBRARY_PATH` once at startup,
/// so changing them from here has no effect; modules there find their
/// dependencies through their own rpath.
#[cfg(windows)]
pub const SEARCH_PATH_VAR: Option<&str> = Some("PATH");
#[cfg(not(windows))]
pub const SEARCH_PATH_VAR: Option<&str> = None;

/// Prepend `dir` to the loader's search path so the modules next to the
/// shim resolve their own dependencies. Returns whether anything changed.
pub fn prepend_search_path(dir: &Path) -> Result<bool> {
    let Some(var) = SEARCH_PATH_VAR else {
        log::debug!("no runtime search path on this platform; {} left as is", dir.display());
        return Ok(false);
    };
    let value = path_with_prepended(dir, std::env::var_os(var))?;
    std::env::set_var(var, value);
    log::debug!("prepended {} to {}", dir.display(), var);
    Ok(true)
}

// ============================================================
// Own module location
// ============================================================

/// Environment override for the shim directory
pub const SHIM_DIR_ENV: &str = "GOLDSRC_SHIM_DIR";

/// Path of the module that contains `address`
#[cfg(unix)]
pub fn module_path_of(address: *const c_void) -> Option<PathBuf> {
    use std::ffi::CStr;
    use std::os::unix::ffi::OsStrExt;

    // SAFETY: dladdr only inspects the loader's module list
    let mut info: libc::Dl_info = unsafe { std::mem::zeroed() };
    if unsafe { libc::dladdr(address, &mut info) } == 0 || info.dli_fname.is_null() {
        return None;
    }
    let name = unsafe { CStr::from_ptr(info.dli_fname) };
    Some(PathBuf::from(std::ffi::OsStr::from_bytes(name.to_bytes())))
}

#[cfg(windows)]
#[allow(non_snake_case)]
mod win32 {
    use std::ffi::c_void;

    pub const GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS: u32 = 0x4;
    pub const GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT: u32 = 0x2;

    #[link(name = "kernel32")]
    extern "system" {
        pub fn GetModuleHandleExW(flags: u32, module_name: *const c_void, module: *mut *mut c_void) -> i32;
        pub fn GetModuleFileNameW(module: *mut c_void, filename: *mut u16, size: u32) -> u32;
    }
}

/// Path of the module that contains `address`
#[cfg(windows)]
pub fn module_path_of(address: *const c_void) -> Option<PathBuf> {
    use std::os::windows::ffi::OsStringExt;

    let mut module = std::ptr::null_mut();
    // SAFETY: FROM_ADDRESS treats the pointer as an address inside a module
    let found = unsafe {
        win32::GetModuleHandleExW(
            win32::GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | win32::GET_MODULE_HANDLE_EX_FLAG_UNCHANGED_REFCOUNT,
            address,
            &mut module,
        )
    };
    if found == 0 {
        return None;
    }
    let mut buf = vec![0u16; 1024];
    let len = unsafe { win32::GetModuleFileNameW(module, buf.as_mut_ptr(), buf.len() as u32) } as usize;
    if len == 0 || len >= buf.len() {
        return None;
    }
    Some(PathBuf::from(OsString::from_wide(&buf[..len])))
}

#[cfg(not(any(unix, windows)))]
pub fn module_path_of(_address: *const c_void) -> Option<PathBuf> {
    None
}

/// Directory holding the module that contains `address`
pub fn module_dir_of(address: *const c_void) -> Option<PathBuf> {
    module_path_of(address).and_then(|path| path.parent().map(Path::to_path_buf))
}

/// Where the shim lives: the override variable, then the module that
/// contains this code, then the executable's directory.
pub fn shim_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(SHIM_DIR_ENV).filter(|d| !d.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = module_dir_of(shim_dir as *const c_void) {
        return dir;
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_module_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = NativeModule::load(dir.path().join("libnothing.so")).err().unwrap();
        assert!(matches!(err, ShimError::LoadError { .. }));
        assert!(err.to_string().contains("libnothing.so"));
    }

    #[test]
    fn test_prepend_puts_dir_first_once() {
        let dir = PathBuf::from("/opt/game/dlls");
        let current = std::env::join_paths([PathBuf::from("/usr/bin"), dir.clone(), PathBuf::from("/bin")]).unwrap();
        let updated = path_with_prepended(&dir, Some(current)).unwrap();
        let entries: Vec<PathBuf> = std::env::split_paths(&updated).collect();
        assert_eq!(entries, vec![dir, PathBuf::from("/usr/bin"), PathBuf::from("/bin")]);
    }

    #[test]
    fn test_prepend_without_existing_path() {
        let dir = PathBuf::from("/opt/game/dlls");
        let updated = path_with_prepended(&dir, None).unwrap();
        assert_eq!(updated, dir.into_os_string());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_search_path_left_alone_without_runtime_loader_path() {
        let before = std::env::var_os("PATH");
        assert!(!prepend_search_path(Path::new("/opt/game/dlls")).unwrap());
        assert_eq!(std::env::var_os("PATH"), before);
    }

    #[cfg(unix)]
    #[test]
    fn test_module_path_of_libc_function() {
        let path = module_path_of(libc::strlen as *const c_void).unwrap();
        assert!(path.is_file());
        let module = NativeModule::load(&path).unwrap();
        assert!(module.export_address("strlen").is_some());
        assert!(module.export_address("gsf_no_such_export").is_none());
    }

    #[test]
    fn test_module_dir_of_own_code_exists() {
        let dir = module_dir_of(test_module_dir_of_own_code_exists as *const c_void);
        if let Some(dir) = dir {
            assert!(dir.is_dir());
        }
    }
}
