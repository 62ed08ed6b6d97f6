// types.rs — shared primitives and small records used across the interface
// Mirrors common/const.h, cvardef.h, netadr.h, custom.h and saverestore.h

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_float, c_int, c_short, c_uchar, c_uint, c_ushort, c_void};

use crate::entity::edict_t;

// ============================================================
// Constants
// ============================================================

pub const MAX_PHYSINFO_STRING: usize = 256;
pub const MAX_INFO_STRING: usize = 256;
pub const MAX_ENT_LEAFS: usize = 48;
pub const MAX_WEAPONS: usize = 32;
pub const MAX_LEVEL_CONNECTIONS: usize = 16;
pub const MAX_QPATH: usize = 64;
pub const HISTORY_MAX: usize = 64;

// ============================================================
// Basic C-compatible types
// ============================================================

/// C-style boolean (int)
pub type qboolean = c_int;

/// Offset from `globalvars_t::pStringBase`
pub type string_t = c_int;

/// Sprite handle on the client
pub type HSPRITE = c_int;

pub type byte = c_uchar;
pub type vec3_t = [c_float; 3];
pub type CRC32_t = std::os::raw::c_ulong;

pub type ALERT_TYPE = c_int;
pub type PRINT_TYPE = c_int;
pub type FORCE_TYPE = c_int;
pub type FIELDTYPE = c_int;
pub type resourcetype_t = c_int;
pub type netadrtype_t = c_int;

pub const at_notice: ALERT_TYPE = 0;
pub const at_console: ALERT_TYPE = 1;
pub const at_aiconsole: ALERT_TYPE = 2;
pub const at_warning: ALERT_TYPE = 3;
pub const at_error: ALERT_TYPE = 4;
pub const at_logged: ALERT_TYPE = 5;

pub const print_console: PRINT_TYPE = 0;
pub const print_center: PRINT_TYPE = 1;
pub const print_chat: PRINT_TYPE = 2;

pub const NA_UNUSED: netadrtype_t = 0;
pub const NA_LOOPBACK: netadrtype_t = 1;
pub const NA_BROADCAST: netadrtype_t = 2;
pub const NA_IP: netadrtype_t = 3;
pub const NA_IPX: netadrtype_t = 4;
pub const NA_BROADCAST_IPX: netadrtype_t = 5;

bitflags::bitflags! {
    /// edict->v.flags (FL_*)
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct EntityFlags: i32 {
        const FLY            = 1 << 0;
        const SWIM           = 1 << 1;
        const CONVEYOR       = 1 << 2;
        const CLIENT         = 1 << 3;
        const INWATER        = 1 << 4;
        const MONSTER        = 1 << 5;
        const GODMODE        = 1 << 6;
        const NOTARGET       = 1 << 7;
        const SKIPLOCALHOST  = 1 << 8;
        const ONGROUND       = 1 << 9;
        const PARTIALGROUND  = 1 << 10;
        const WATERJUMP      = 1 << 11;
        const FROZEN         = 1 << 12;
        const FAKECLIENT     = 1 << 13;
        const DUCKING        = 1 << 14;
        const FLOAT          = 1 << 15;
        const GRAPHED        = 1 << 16;
        const IMMUNE_WATER   = 1 << 17;
        const IMMUNE_SLIME   = 1 << 18;
        const IMMUNE_LAVA    = 1 << 19;
        const PROXY          = 1 << 20;
        const ALWAYSTHINK    = 1 << 21;
        const BASEVELOCITY   = 1 << 22;
        const MONSTERCLIP    = 1 << 23;
        const ONTRAIN        = 1 << 24;
        const WORLDBRUSH     = 1 << 25;
        const SPECTATOR      = 1 << 26;
        const CUSTOMENTITY   = 1 << 29;
        const KILLME         = 1 << 30;
        const DORMANT        = 1 << 31;
    }
}

bitflags::bitflags! {
    /// cvar_t::flags (FCVAR_*)
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct CvarFlags: i32 {
        const ARCHIVE      = 1 << 0;
        const USERINFO     = 1 << 1;
        const SERVER       = 1 << 2;
        const EXTDLL       = 1 << 3;
        const CLIENTDLL    = 1 << 4;
        const PROTECTED    = 1 << 5;
        const SPONLY       = 1 << 6;
        const PRINTABLEONLY = 1 << 7;
        const UNLOGGED     = 1 << 8;
        const NOEXTRAWHITEPACE = 1 << 9;
    }
}

// ============================================================
// Small records
// ============================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct color24 {
    pub r: byte,
    pub g: byte,
    pub b: byte,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct colorVec {
    pub r: c_uint,
    pub g: c_uint,
    pub b: c_uint,
    pub a: c_uint,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct wrect_t {
    pub left: c_int,
    pub right: c_int,
    pub top: c_int,
    pub bottom: c_int,
}

/// Entity link for area node lists (doubly-linked list node)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct link_t {
    pub prev: *mut link_t,
    pub next: *mut link_t,
}

impl Default for link_t {
    fn default() -> Self {
        Self {
            prev: std::ptr::null_mut(),
            next: std::ptr::null_mut(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct netadr_t {
    pub r#type: netadrtype_t,
    pub ip: [c_uchar; 4],
    pub ipx: [c_uchar; 10],
    pub port: c_ushort,
}

/// Console variable, owned by whichever side registered it
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cvar_t {
    pub name: *mut c_char,
    pub string: *mut c_char,
    pub flags: c_int,
    pub value: c_float,
    pub next: *mut cvar_t,
}

impl cvar_t {
    pub fn cvar_flags(&self) -> CvarFlags {
        CvarFlags::from_bits_retain(self.flags)
    }
}

/// Result of the engine's hull/line traces (util.h TraceResult)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TraceResult {
    pub fAllSolid: c_int,
    pub fStartSolid: c_int,
    pub fInOpen: c_int,
    pub fInWater: c_int,
    pub flFraction: c_float,
    pub vecEndPos: vec3_t,
    pub flPlaneDist: c_float,
    pub vecPlaneNormal: vec3_t,
    pub pHit: *mut edict_t,
    pub iHitgroup: c_int,
}

/// Key/value pair handed to `pfnKeyValue` while parsing the entity lump
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct KeyValueData {
    pub szClassName: *mut c_char,
    pub szKeyName: *mut c_char,
    pub szValue: *mut c_char,
    pub fHandled: c_int,
}

// ============================================================
// Save/restore
// ============================================================

pub const FIELD_FLOAT: FIELDTYPE = 0;
pub const FIELD_STRING: FIELDTYPE = 1;
pub const FIELD_ENTITY: FIELDTYPE = 2;
pub const FIELD_CLASSPTR: FIELDTYPE = 3;
pub const FIELD_EHANDLE: FIELDTYPE = 4;
pub const FIELD_EVARS: FIELDTYPE = 5;
pub const FIELD_EDICT: FIELDTYPE = 6;
pub const FIELD_VECTOR: FIELDTYPE = 7;
pub const FIELD_POSITION_VECTOR: FIELDTYPE = 8;
pub const FIELD_POINTER: FIELDTYPE = 9;
pub const FIELD_INTEGER: FIELDTYPE = 10;
pub const FIELD_FUNCTION: FIELDTYPE = 11;
pub const FIELD_BOOLEAN: FIELDTYPE = 12;
pub const FIELD_SHORT: FIELDTYPE = 13;
pub const FIELD_CHARACTER: FIELDTYPE = 14;
pub const FIELD_TIME: FIELDTYPE = 15;
pub const FIELD_MODELNAME: FIELDTYPE = 16;
pub const FIELD_SOUNDNAME: FIELDTYPE = 17;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TYPEDESCRIPTION {
    pub fieldType: FIELDTYPE,
    pub fieldName: *mut c_char,
    pub fieldOffset: c_int,
    pub fieldSize: c_short,
    pub flags: c_short,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ENTITYTABLE {
    pub id: c_int,
    pub pent: *mut edict_t,
    pub location: c_int,
    pub size: c_int,
    pub flags: c_int,
    pub classname: string_t,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct LEVELLIST {
    pub mapName: [c_char; 32],
    pub landmarkName: [c_char; 32],
    pub pentLandmark: *mut edict_t,
    pub vecLandmarkOrigin: vec3_t,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SAVERESTOREDATA {
    pub pBaseData: *mut c_char,
    pub pCurrentData: *mut c_char,
    pub size: c_int,
    pub bufferSize: c_int,
    pub tokenSize: c_int,
    pub tokenCount: c_int,
    pub pTokens: *mut *mut c_char,
    pub currentIndex: c_int,
    pub tableCount: c_int,
    pub connectionCount: c_int,
    pub pTable: *mut ENTITYTABLE,
    pub levelList: [LEVELLIST; MAX_LEVEL_CONNECTIONS],
    pub fUseLandmark: c_int,
    pub szLandmarkName: [c_char; 20],
    pub vecLandmarkOffset: vec3_t,
    pub time: c_float,
    pub szCurrentMapName: [c_char; 32],
}

// ============================================================
// Customization (custom.h)
// ============================================================

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct resource_t {
    pub szFileName: [c_char; MAX_QPATH],
    pub r#type: resourcetype_t,
    pub nIndex: c_int,
    pub nDownloadSize: c_int,
    pub ucFlags: c_uchar,
    pub rgucMD5_hash: [c_uchar; 16],
    pub playernum: c_uchar,
    pub rguc_reserved: [c_uchar; 32],
    pub pNext: *mut resource_t,
    pub pPrev: *mut resource_t,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct customization_t {
    pub bInUse: qboolean,
    pub resource: resource_t,
    pub bTranslated: qboolean,
    pub nUserData1: c_int,
    pub nUserData2: c_int,
    pub pInfo: *mut c_void,
    pub pBuffer: *mut c_void,
    pub pNext: *mut customization_t,
}

zeroed_default!(
    cvar_t,
    TraceResult,
    KeyValueData,
    TYPEDESCRIPTION,
    ENTITYTABLE,
    LEVELLIST,
    SAVERESTOREDATA,
    resource_t,
    customization_t,
);

opaque_types!(
    /// `struct delta_s`, only handled through engine calls
    delta_s,
    /// `struct sequenceEntry_s` (sequence.h)
    sequenceEntry_s,
    /// `struct sentenceEntry_s` (sequence.h)
    sentenceEntry_s,
);

// ============================================================
// Layout
// ============================================================

#[cfg(target_pointer_width = "32")]
const _: () = {
    use std::mem::size_of;
    assert!(size_of::<cvar_t>() == 20);
    assert!(size_of::<TraceResult>() == 56);
    assert!(size_of::<KeyValueData>() == 16);
    assert!(size_of::<TYPEDESCRIPTION>() == 16);
    assert!(size_of::<ENTITYTABLE>() == 24);
    assert!(size_of::<LEVELLIST>() == 80);
    assert!(size_of::<SAVERESTOREDATA>() == 1396);
    assert!(size_of::<resource_t>() == 136);
    assert!(size_of::<customization_t>() == 164);
};
