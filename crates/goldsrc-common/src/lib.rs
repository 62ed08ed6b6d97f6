// goldsrc-common — C-compatible types for the GoldSrc engine/game DLL interface
//
// Every record here mirrors an HLSDK header struct byte for byte. The
// 32-bit layouts are asserted at compile time; the unit tests check the
// pointer-free layouts on every target.

#![allow(clippy::missing_safety_doc, clippy::too_many_arguments, clippy::type_complexity)]

/// Implements `Default` as all-zero bytes for records whose fields are
/// integers, floats, raw pointers, inline arrays or nullable function slots.
macro_rules! zeroed_default {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Default for $ty {
                fn default() -> Self {
                    // SAFETY: every field of these records is valid when zeroed
                    unsafe { std::mem::zeroed() }
                }
            }
        )*
    };
}

/// Declares zero-sized types that only ever appear behind pointers.
macro_rules! opaque_types {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )*
    };
}

/// A slot of a native function table: a nullable function pointer or a
/// raw pointer to a sub-table.
pub trait TableSlot {
    fn is_unset(&self) -> bool;
}

impl<T> TableSlot for Option<T> {
    fn is_unset(&self) -> bool {
        self.is_none()
    }
}

impl<T> TableSlot for *mut T {
    fn is_unset(&self) -> bool {
        self.is_null()
    }
}

/// Declares a `#[repr(C)]` function table. Every field must be pointer
/// sized; the generated `SLOT_NAMES` list follows declaration order.
macro_rules! function_table {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[$fmeta:meta])* pub $field:ident : $ty:ty, )*
        }
    ) => {
        $(#[$meta])*
        #[repr(C)]
        #[derive(Clone, Copy)]
        pub struct $name {
            $( $(#[$fmeta])* pub $field: $ty, )*
        }

        impl $name {
            pub const SLOT_NAMES: &'static [&'static str] = &[$(stringify!($field)),*];

            /// Names of the slots that are still null, in declaration order.
            pub fn unset_slots(&self) -> Vec<&'static str> {
                let mut unset = Vec::new();
                $(
                    if $crate::TableSlot::is_unset(&self.$field) {
                        unset.push(stringify!($field));
                    }
                )*
                unset
            }

            pub fn is_complete(&self) -> bool {
                self.unset_slots().is_empty()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                // SAFETY: null is a valid value for every slot
                unsafe { std::mem::zeroed() }
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("slots", &Self::SLOT_NAMES.len())
                    .field("unset", &self.unset_slots())
                    .finish()
            }
        }
    };
}

pub mod types;
pub mod state;
pub mod entity;
pub mod pmove;
pub mod studio;
pub mod engine_api;
pub mod server_api;
pub mod client_api;
