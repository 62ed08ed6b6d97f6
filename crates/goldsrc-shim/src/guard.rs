// guard.rs — keep panics and missing bindings from crossing into the engine

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Role, ShimError};

static SERVER_UNBOUND_REPORTED: AtomicBool = AtomicBool::new(false);
static CLIENT_UNBOUND_REPORTED: AtomicBool = AtomicBool::new(false);

/// Text carried by a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `call`; a panic is logged and `default` returned instead.
pub fn guarded<R>(role: Role, slot: &'static str, default: R, call: impl FnOnce() -> R) -> R {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(value) => value,
        Err(payload) => {
            log::error!("{} {} panicked: {}", role, slot, panic_message(payload.as_ref()));
            default
        }
    }
}

/// Log an entry point reached with nothing bound. Only the first one per
/// role is an error; the engine calls some slots every frame.
pub fn report_unbound(role: Role, slot: &'static str) {
    let reported = match role {
        Role::Server => &SERVER_UNBOUND_REPORTED,
        Role::Client => &CLIENT_UNBOUND_REPORTED,
    };
    if reported.swap(true, Ordering::Relaxed) {
        log::trace!("{} called: {}", slot, ShimError::NotBound(role));
    } else {
        log::error!("{} called: {}; returning defaults", slot, ShimError::NotBound(role));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_passes_value_through() {
        assert_eq!(guarded(Role::Server, "pfnSpawn", -1, || 7), 7);
    }

    #[test]
    fn test_guarded_swallows_panic() {
        let value = guarded(Role::Client, "pHudFrame", 0, || -> i32 { panic!("bad frame") });
        assert_eq!(value, 0);
    }

    #[test]
    fn test_panic_message_variants() {
        let payload = panic::catch_unwind(|| panic!("static text")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static text");

        let payload = panic::catch_unwind(|| panic!("formatted {}", 3)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 3");

        let payload = panic::catch_unwind(|| std::panic::panic_any(12u8)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }
}
