// pmove.rs — shared player movement records
// Mirrors pm_shared/pm_defs.h, pm_info.h, pm_movevars.h and common/pmtrace.h

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_float, c_int, c_ushort, c_void};

use crate::state::usercmd_t;
use crate::types::{byte, qboolean, vec3_t, MAX_PHYSINFO_STRING};

pub const MAX_PHYSENTS: usize = 600;
pub const MAX_MOVEENTS: usize = 64;
pub const MAX_CLIP_PLANES: usize = 5;
pub const PM_MAXHULLS: usize = 4;

opaque_types!(
    /// `struct model_s`, engine-owned
    model_s,
    /// `struct hull_s`
    hull_s,
    /// engine `trace_t` used by `PM_TraceModel`
    trace_t,
);

/// Movement tunables broadcast by the server
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct movevars_t {
    pub gravity: c_float,
    pub stopspeed: c_float,
    pub maxspeed: c_float,
    pub spectatormaxspeed: c_float,
    pub accelerate: c_float,
    pub airaccelerate: c_float,
    pub wateraccelerate: c_float,
    pub friction: c_float,
    pub edgefriction: c_float,
    pub waterfriction: c_float,
    pub entgravity: c_float,
    pub bounce: c_float,
    pub stepsize: c_float,
    pub maxvelocity: c_float,
    pub zmax: c_float,
    pub waveHeight: c_float,
    pub footsteps: qboolean,
    pub skyName: [c_char; 32],
    pub rollangle: c_float,
    pub rollspeed: c_float,
    pub skycolor_r: c_float,
    pub skycolor_g: c_float,
    pub skycolor_b: c_float,
    pub skyvec_x: c_float,
    pub skyvec_y: c_float,
    pub skyvec_z: c_float,
}

/// Entity the movement code can collide with
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct physent_t {
    pub name: [c_char; 32],
    pub player: c_int,
    pub origin: vec3_t,
    pub model: *mut model_s,
    pub studiomodel: *mut model_s,
    pub mins: vec3_t,
    pub maxs: vec3_t,
    pub info: c_int,
    pub angles: vec3_t,

    pub solid: c_int,
    pub skin: c_int,
    pub rendermode: c_int,

    pub frame: c_float,
    pub sequence: c_int,
    pub controller: [byte; 4],
    pub blending: [byte; 2],

    pub movetype: c_int,
    pub takedamage: c_int,
    pub blooddecal: c_int,
    pub team: c_int,
    pub classnumber: c_int,

    pub iuser1: c_int,
    pub iuser2: c_int,
    pub iuser3: c_int,
    pub iuser4: c_int,
    pub fuser1: c_float,
    pub fuser2: c_float,
    pub fuser3: c_float,
    pub fuser4: c_float,
    pub vuser1: vec3_t,
    pub vuser2: vec3_t,
    pub vuser3: vec3_t,
    pub vuser4: vec3_t,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct pmplane_t {
    pub normal: vec3_t,
    pub dist: c_float,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct pmtrace_t {
    pub allsolid: qboolean,
    pub startsolid: qboolean,
    pub inopen: qboolean,
    pub inwater: qboolean,
    pub fraction: c_float,
    pub endpos: vec3_t,
    pub plane: pmplane_t,
    pub ent: c_int,
    pub deltavelocity: vec3_t,
    pub hitgroup: c_int,
}

pub type pfnIgnore = Option<unsafe extern "C" fn(pe: *mut physent_t) -> c_int>;

/// Full player-move context handed to `PM_Move` on both client and server
#[repr(C)]
pub struct playermove_t {
    pub player_index: c_int,
    pub server: qboolean,
    pub multiplayer: qboolean,
    pub time: c_float,
    pub frametime: c_float,

    pub forward: vec3_t,
    pub right: vec3_t,
    pub up: vec3_t,

    pub origin: vec3_t,
    pub angles: vec3_t,
    pub oldangles: vec3_t,
    pub velocity: vec3_t,
    pub movedir: vec3_t,
    pub basevelocity: vec3_t,

    pub view_ofs: vec3_t,
    pub flDuckTime: c_float,
    pub bInDuck: qboolean,

    pub flTimeStepSound: c_int,
    pub iStepLeft: c_int,

    pub flFallVelocity: c_float,
    pub punchangle: vec3_t,

    pub flSwimTime: c_float,
    pub flNextPrimaryAttack: c_float,

    pub effects: c_int,
    pub flags: c_int,
    pub usehull: c_int,
    pub gravity: c_float,
    pub friction: c_float,
    pub oldbuttons: c_int,
    pub waterjumptime: c_float,
    pub dead: qboolean,
    pub deadflag: c_int,
    pub spectator: c_int,
    pub movetype: c_int,

    pub onground: c_int,
    pub waterlevel: c_int,
    pub watertype: c_int,
    pub oldwaterlevel: c_int,

    pub sztexturename: [c_char; 256],
    pub chtexturetype: c_char,

    pub maxspeed: c_float,
    pub clientmaxspeed: c_float,

    pub iuser1: c_int,
    pub iuser2: c_int,
    pub iuser3: c_int,
    pub iuser4: c_int,
    pub fuser1: c_float,
    pub fuser2: c_float,
    pub fuser3: c_float,
    pub fuser4: c_float,
    pub vuser1: vec3_t,
    pub vuser2: vec3_t,
    pub vuser3: vec3_t,
    pub vuser4: vec3_t,

    pub numphysent: c_int,
    pub physents: [physent_t; MAX_PHYSENTS],
    pub nummoveent: c_int,
    pub moveents: [physent_t; MAX_MOVEENTS],
    pub numvisent: c_int,
    pub visents: [physent_t; MAX_PHYSENTS],

    pub cmd: usercmd_t,

    pub numtouch: c_int,
    pub touchindex: [pmtrace_t; MAX_PHYSENTS],

    pub physinfo: [c_char; MAX_PHYSINFO_STRING],

    pub movevars: *mut movevars_t,
    pub player_mins: [vec3_t; PM_MAXHULLS],
    pub player_maxs: [vec3_t; PM_MAXHULLS],

    pub PM_Info_ValueForKey:
        Option<unsafe extern "C" fn(s: *const c_char, key: *const c_char) -> *const c_char>,
    pub PM_Particle: Option<
        unsafe extern "C" fn(origin: *mut c_float, color: c_int, life: c_float, zpos: c_int, zvel: c_int),
    >,
    pub PM_TestPlayerPosition:
        Option<unsafe extern "C" fn(pos: *mut c_float, ptrace: *mut pmtrace_t) -> c_int>,
    pub Con_NPrintf: Option<unsafe extern "C" fn(idx: c_int, fmt: *mut c_char, ...)>,
    pub Con_DPrintf: Option<unsafe extern "C" fn(fmt: *mut c_char, ...)>,
    pub Con_Printf: Option<unsafe extern "C" fn(fmt: *mut c_char, ...)>,
    pub Sys_FloatTime: Option<unsafe extern "C" fn() -> f64>,
    pub PM_StuckTouch: Option<unsafe extern "C" fn(hitent: c_int, ptraceresult: *mut pmtrace_t)>,
    pub PM_PointContents:
        Option<unsafe extern "C" fn(p: *mut c_float, truecontents: *mut c_int) -> c_int>,
    pub PM_TruePointContents: Option<unsafe extern "C" fn(p: *mut c_float) -> c_int>,
    pub PM_HullPointContents:
        Option<unsafe extern "C" fn(hull: *mut hull_s, num: c_int, p: *mut c_float) -> c_int>,
    pub PM_PlayerTrace: Option<
        unsafe extern "C" fn(
            start: *mut c_float,
            end: *mut c_float,
            traceFlags: c_int,
            ignore_pe: c_int,
        ) -> pmtrace_t,
    >,
    pub PM_TraceLine: Option<
        unsafe extern "C" fn(
            start: *mut c_float,
            end: *mut c_float,
            flags: c_int,
            usehull: c_int,
            ignore_pe: c_int,
        ) -> *mut pmtrace_t,
    >,
    pub RandomLong: Option<unsafe extern "C" fn(lLow: i32, lHigh: i32) -> i32>,
    pub RandomFloat: Option<unsafe extern "C" fn(flLow: c_float, flHigh: c_float) -> c_float>,
    pub PM_GetModelType: Option<unsafe extern "C" fn(model: *mut model_s) -> c_int>,
    pub PM_GetModelBounds:
        Option<unsafe extern "C" fn(model: *mut model_s, mins: *mut c_float, maxs: *mut c_float)>,
    pub PM_HullForBsp: Option<unsafe extern "C" fn(pe: *mut physent_t, offset: *mut c_float) -> *mut c_void>,
    pub PM_TraceModel: Option<
        unsafe extern "C" fn(
            pEnt: *mut physent_t,
            start: *mut c_float,
            end: *mut c_float,
            trace: *mut trace_t,
        ) -> c_float,
    >,
    pub COM_FileSize: Option<unsafe extern "C" fn(filename: *mut c_char) -> c_int>,
    pub COM_LoadFile: Option<
        unsafe extern "C" fn(path: *mut c_char, usehunk: c_int, pLength: *mut c_int) -> *mut byte,
    >,
    pub COM_FreeFile: Option<unsafe extern "C" fn(buffer: *mut c_void)>,
    pub memfgets: Option<
        unsafe extern "C" fn(
            pMemFile: *mut byte,
            fileSize: c_int,
            pFilePos: *mut c_int,
            pBuffer: *mut c_char,
            bufferSize: c_int,
        ) -> *mut c_char,
    >,

    pub runfuncs: qboolean,
    pub PM_PlaySound: Option<
        unsafe extern "C" fn(
            channel: c_int,
            sample: *const c_char,
            volume: c_float,
            attenuation: c_float,
            fFlags: c_int,
            pitch: c_int,
        ),
    >,
    pub PM_TraceTexture: Option<
        unsafe extern "C" fn(ground: c_int, vstart: *mut c_float, vend: *mut c_float) -> *const c_char,
    >,
    pub PM_PlaybackEventFull: Option<
        unsafe extern "C" fn(
            flags: c_int,
            clientindex: c_int,
            eventindex: c_ushort,
            delay: c_float,
            origin: *mut c_float,
            angles: *mut c_float,
            fparam1: c_float,
            fparam2: c_float,
            iparam1: c_int,
            iparam2: c_int,
            bparam1: c_int,
            bparam2: c_int,
        ),
    >,

    pub PM_PlayerTraceEx: Option<
        unsafe extern "C" fn(
            start: *mut c_float,
            end: *mut c_float,
            traceFlags: c_int,
            pfnIgnore: pfnIgnore,
        ) -> pmtrace_t,
    >,
    pub PM_TestPlayerPositionEx: Option<
        unsafe extern "C" fn(pos: *mut c_float, ptrace: *mut pmtrace_t, pfnIgnore: pfnIgnore) -> c_int,
    >,
    pub PM_TraceLineEx: Option<
        unsafe extern "C" fn(
            start: *mut c_float,
            end: *mut c_float,
            flags: c_int,
            usehull: c_int,
            pfnIgnore: pfnIgnore,
        ) -> *mut pmtrace_t,
    >,
}

zeroed_default!(physent_t);

#[cfg(target_pointer_width = "32")]
const _: () = {
    use std::mem::size_of;
    assert!(size_of::<physent_t>() == 224);
    assert!(size_of::<playermove_t>() == 325068);
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_movevars_exact_layout() {
        assert_eq!(offset_of!(movevars_t, footsteps), 64);
        assert_eq!(offset_of!(movevars_t, skyName), 68);
        assert_eq!(offset_of!(movevars_t, rollangle), 100);
        assert_eq!(offset_of!(movevars_t, skyvec_z), 128);
        assert_eq!(size_of::<movevars_t>(), 132, "movevars_t must be exactly 132 bytes");
    }

    #[test]
    fn test_pmtrace_exact_layout() {
        assert_eq!(size_of::<pmplane_t>(), 16);
        assert_eq!(offset_of!(pmtrace_t, fraction), 16);
        assert_eq!(offset_of!(pmtrace_t, plane), 32);
        assert_eq!(offset_of!(pmtrace_t, ent), 48);
        assert_eq!(offset_of!(pmtrace_t, deltavelocity), 52);
        assert_eq!(offset_of!(pmtrace_t, hitgroup), 64);
        assert_eq!(size_of::<pmtrace_t>(), 68);
    }

    #[test]
    fn test_physent_layout() {
        assert_eq!(offset_of!(physent_t, player), 32);
        assert_eq!(offset_of!(physent_t, origin), 36);
        assert_eq!(offset_of!(physent_t, model), 48);
        #[cfg(target_pointer_width = "64")]
        {
            assert_eq!(offset_of!(physent_t, info), 88);
            assert_eq!(offset_of!(physent_t, movetype), 132);
            assert_eq!(size_of::<physent_t>(), 232);
        }
        #[cfg(target_pointer_width = "32")]
        {
            assert_eq!(offset_of!(physent_t, info), 80);
            assert_eq!(offset_of!(physent_t, movetype), 124);
            assert_eq!(size_of::<physent_t>(), 224);
        }
    }

    #[test]
    fn test_playermove_prefix_offsets() {
        assert_eq!(offset_of!(playermove_t, forward), 20);
        assert_eq!(offset_of!(playermove_t, origin), 56);
        assert_eq!(offset_of!(playermove_t, view_ofs), 128);
        assert_eq!(offset_of!(playermove_t, punchangle), 160);
        assert_eq!(offset_of!(playermove_t, effects), 180);
        assert_eq!(offset_of!(playermove_t, onground), 224);
        assert_eq!(offset_of!(playermove_t, sztexturename), 240);
        assert_eq!(offset_of!(playermove_t, chtexturetype), 496);
        assert_eq!(offset_of!(playermove_t, maxspeed), 500);
        assert_eq!(offset_of!(playermove_t, iuser1), 508);
        assert_eq!(offset_of!(playermove_t, numphysent), 588);
        assert_eq!(offset_of!(playermove_t, physents), 592);
    }

    #[test]
    fn test_playermove_world_state_follows_physent_size() {
        let pe = size_of::<physent_t>();
        assert_eq!(offset_of!(playermove_t, nummoveent), 592 + MAX_PHYSENTS * pe);
        assert_eq!(
            offset_of!(playermove_t, numvisent),
            offset_of!(playermove_t, moveents) + MAX_MOVEENTS * pe
        );
        let cmd = offset_of!(playermove_t, cmd);
        assert_eq!(cmd, offset_of!(playermove_t, visents) + MAX_PHYSENTS * pe);
        assert_eq!(offset_of!(playermove_t, touchindex), cmd + size_of::<usercmd_t>() + 4);
        assert_eq!(
            offset_of!(playermove_t, physinfo),
            offset_of!(playermove_t, touchindex) + MAX_PHYSENTS * size_of::<pmtrace_t>()
        );
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_playermove_exact_size_32() {
        assert_eq!(offset_of!(playermove_t, movevars), 324848);
        assert_eq!(offset_of!(playermove_t, runfuncs), 325040);
        assert_eq!(size_of::<playermove_t>(), 325068, "playermove_t must be exactly 325068 bytes");
    }
}
