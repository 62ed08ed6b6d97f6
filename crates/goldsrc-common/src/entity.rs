// entity.rs — server-side entity records
// Mirrors engine/progdefs.h and engine/edict.h

#![allow(non_camel_case_types, non_snake_case)]

use std::ffi::CStr;
use std::os::raw::{c_char, c_float, c_int, c_short, c_void};

use crate::types::{byte, link_t, qboolean, string_t, vec3_t, EntityFlags, MAX_ENT_LEAFS};

/// Entity variables shared between engine and game (`entvars_t`)
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct entvars_t {
    pub classname: string_t,
    pub globalname: string_t,

    pub origin: vec3_t,
    pub oldorigin: vec3_t,
    pub velocity: vec3_t,
    pub basevelocity: vec3_t,
    pub clbasevelocity: vec3_t,
    pub movedir: vec3_t,

    pub angles: vec3_t,
    pub avelocity: vec3_t,
    pub punchangle: vec3_t,
    pub v_angle: vec3_t,

    pub endpos: vec3_t,
    pub startpos: vec3_t,
    pub impacttime: c_float,
    pub starttime: c_float,

    pub fixangle: c_int,
    pub idealpitch: c_float,
    pub pitch_speed: c_float,
    pub ideal_yaw: c_float,
    pub yaw_speed: c_float,

    pub modelindex: c_int,
    pub model: string_t,

    pub viewmodel: c_int,
    pub weaponmodel: c_int,

    pub absmin: vec3_t,
    pub absmax: vec3_t,
    pub mins: vec3_t,
    pub maxs: vec3_t,
    pub size: vec3_t,

    pub ltime: c_float,
    pub nextthink: c_float,

    pub movetype: c_int,
    pub solid: c_int,

    pub skin: c_int,
    pub body: c_int,
    pub effects: c_int,

    pub gravity: c_float,
    pub friction: c_float,

    pub light_level: c_int,

    pub sequence: c_int,
    pub gaitsequence: c_int,
    pub frame: c_float,
    pub animtime: c_float,
    pub framerate: c_float,
    pub controller: [byte; 4],
    pub blending: [byte; 2],

    pub scale: c_float,

    pub rendermode: c_int,
    pub renderamt: c_float,
    pub rendercolor: vec3_t,
    pub renderfx: c_int,

    pub health: c_float,
    pub frags: c_float,
    pub weapons: c_int,
    pub takedamage: c_float,

    pub deadflag: c_int,
    pub view_ofs: vec3_t,

    pub button: c_int,
    pub impulse: c_int,

    pub chain: *mut edict_t,
    pub dmg_inflictor: *mut edict_t,
    pub enemy: *mut edict_t,
    pub aiment: *mut edict_t,
    pub owner: *mut edict_t,
    pub groundentity: *mut edict_t,

    pub spawnflags: c_int,
    pub flags: c_int,

    pub colormap: c_int,
    pub team: c_int,

    pub max_health: c_float,
    pub teleport_time: c_float,
    pub armortype: c_float,
    pub armorvalue: c_float,
    pub waterlevel: c_int,
    pub watertype: c_int,

    pub target: string_t,
    pub targetname: string_t,
    pub netname: string_t,
    pub message: string_t,

    pub dmg_take: c_float,
    pub dmg_save: c_float,
    pub dmg: c_float,
    pub dmgtime: c_float,

    pub noise: string_t,
    pub noise1: string_t,
    pub noise2: string_t,
    pub noise3: string_t,

    pub speed: c_float,
    pub air_finished: c_float,
    pub pain_finished: c_float,
    pub radsuit_finished: c_float,

    pub pContainingEntity: *mut edict_t,

    pub playerclass: c_int,
    pub maxspeed: c_float,

    pub fov: c_float,
    pub weaponanim: c_int,

    pub pushmsec: c_int,

    pub bInDuck: c_int,
    pub flTimeStepSound: c_int,
    pub flSwimTime: c_int,
    pub flDuckTime: c_int,
    pub iStepLeft: c_int,
    pub flFallVelocity: c_float,

    pub gamestate: c_int,

    pub oldbuttons: c_int,

    pub groupinfo: c_int,

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
    pub euser1: *mut edict_t,
    pub euser2: *mut edict_t,
    pub euser3: *mut edict_t,
    pub euser4: *mut edict_t,
}

impl entvars_t {
    pub fn entity_flags(&self) -> EntityFlags {
        EntityFlags::from_bits_retain(self.flags)
    }
}

/// Engine-side entity slot; `v` is the game-visible part
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct edict_t {
    pub free: qboolean,
    pub serialnumber: c_int,
    pub area: link_t,

    pub headnode: c_int,
    pub num_leafs: c_int,
    pub leafnums: [c_short; MAX_ENT_LEAFS],

    pub freetime: c_float,

    /// Allocated and freed by the engine, owned by the game
    pub pvPrivateData: *mut c_void,

    pub v: entvars_t,
}

/// Server globals written by the engine every frame
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct globalvars_t {
    pub time: c_float,
    pub frametime: c_float,
    pub force_retouch: c_float,
    pub mapname: string_t,
    pub startspot: string_t,
    pub deathmatch: c_float,
    pub coop: c_float,
    pub teamplay: c_float,
    pub serverflags: c_float,
    pub found_secrets: c_float,
    pub v_forward: vec3_t,
    pub v_up: vec3_t,
    pub v_right: vec3_t,
    pub trace_allsolid: c_float,
    pub trace_startsolid: c_float,
    pub trace_fraction: c_float,
    pub trace_endpos: vec3_t,
    pub trace_plane_normal: vec3_t,
    pub trace_plane_dist: c_float,
    pub trace_ent: *mut edict_t,
    pub trace_inopen: c_float,
    pub trace_inwater: c_float,
    pub trace_hitgroup: c_int,
    pub trace_flags: c_int,
    pub msg_entity: c_int,
    pub cdAudioTrack: c_int,
    pub maxClients: c_int,
    pub maxEntities: c_int,
    pub pStringBase: *const c_char,
    pub pSaveData: *mut c_void,
    pub vecLandmarkOffset: vec3_t,
}

impl globalvars_t {
    /// Resolve a `string_t` against the engine string base (the SDK's STRING macro).
    ///
    /// # Safety
    /// `pStringBase + s` must point at a NUL-terminated string owned by the engine.
    pub unsafe fn string(&self, s: string_t) -> Option<&CStr> {
        if self.pStringBase.is_null() {
            return None;
        }
        Some(CStr::from_ptr(self.pStringBase.offset(s as isize)))
    }
}

zeroed_default!(entvars_t, edict_t, globalvars_t);

#[cfg(target_pointer_width = "32")]
const _: () = {
    use std::mem::size_of;
    assert!(size_of::<entvars_t>() == 676);
    assert!(size_of::<edict_t>() == 804);
    assert!(size_of::<globalvars_t>() == 172);
    assert!(std::mem::offset_of!(edict_t, v) == 128);
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_entvars_prefix_offsets() {
        // Pointer-free up to `chain`, identical on every target
        assert_eq!(offset_of!(entvars_t, origin), 8);
        assert_eq!(offset_of!(entvars_t, movedir), 68);
        assert_eq!(offset_of!(entvars_t, v_angle), 116);
        assert_eq!(offset_of!(entvars_t, impacttime), 152);
        assert_eq!(offset_of!(entvars_t, fixangle), 160);
        assert_eq!(offset_of!(entvars_t, modelindex), 180);
        assert_eq!(offset_of!(entvars_t, model), 184);
        assert_eq!(offset_of!(entvars_t, absmin), 196);
        assert_eq!(offset_of!(entvars_t, size), 244);
        assert_eq!(offset_of!(entvars_t, nextthink), 260);
        assert_eq!(offset_of!(entvars_t, movetype), 264);
        assert_eq!(offset_of!(entvars_t, light_level), 292);
        assert_eq!(offset_of!(entvars_t, controller), 316);
        assert_eq!(offset_of!(entvars_t, blending), 320);
        assert_eq!(offset_of!(entvars_t, scale), 324);
        assert_eq!(offset_of!(entvars_t, rendercolor), 336);
        assert_eq!(offset_of!(entvars_t, health), 352);
        assert_eq!(offset_of!(entvars_t, view_ofs), 372);
        assert_eq!(offset_of!(entvars_t, impulse), 388);
        assert_eq!(offset_of!(entvars_t, chain), 392);
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_entvars_exact_size_32() {
        assert_eq!(offset_of!(entvars_t, spawnflags), 416);
        assert_eq!(offset_of!(entvars_t, target), 456);
        assert_eq!(offset_of!(entvars_t, pContainingEntity), 520);
        assert_eq!(offset_of!(entvars_t, groupinfo), 576);
        assert_eq!(offset_of!(entvars_t, euser1), 660);
        assert_eq!(size_of::<entvars_t>(), 676, "entvars_t must be exactly 676 bytes");
        assert_eq!(size_of::<edict_t>(), 804);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_entvars_layout_64() {
        assert_eq!(offset_of!(entvars_t, spawnflags), 440);
        assert_eq!(offset_of!(entvars_t, pContainingEntity), 544);
        assert_eq!(offset_of!(entvars_t, playerclass), 552);
        assert_eq!(offset_of!(entvars_t, euser1), 688);
        assert_eq!(size_of::<entvars_t>(), 720);
    }

    #[test]
    fn test_edict_prefix_offsets() {
        let ptr = size_of::<*mut c_void>();
        assert_eq!(offset_of!(edict_t, area), 8);
        assert_eq!(offset_of!(edict_t, headnode), 8 + 2 * ptr);
        assert_eq!(offset_of!(edict_t, leafnums), 16 + 2 * ptr);
        assert_eq!(offset_of!(edict_t, freetime), 112 + 2 * ptr);
    }

    #[test]
    fn test_globalvars_prefix_offsets() {
        assert_eq!(offset_of!(globalvars_t, v_forward), 40);
        assert_eq!(offset_of!(globalvars_t, trace_endpos), 88);
        assert_eq!(offset_of!(globalvars_t, trace_plane_dist), 112);
        assert_eq!(offset_of!(globalvars_t, trace_ent), 116 + (size_of::<*mut c_void>() - 4));
    }

    #[test]
    fn test_string_resolves_against_base() {
        let pool = b"\0worldspawn\0info_player_start\0";
        let globals = globalvars_t {
            pStringBase: pool.as_ptr() as *const c_char,
            ..Default::default()
        };
        let name = unsafe { globals.string(12) }.unwrap();
        assert_eq!(name.to_str().unwrap(), "info_player_start");
        assert!(unsafe { globalvars_t::default().string(1) }.is_none());
    }

    #[test]
    fn test_entity_flags_view() {
        let mut ent = edict_t::default();
        ent.v.flags = (EntityFlags::CLIENT | EntityFlags::ONGROUND).bits();
        assert!(ent.v.entity_flags().contains(EntityFlags::ONGROUND));
        assert!(!ent.v.entity_flags().contains(EntityFlags::MONSTER));
    }
}
