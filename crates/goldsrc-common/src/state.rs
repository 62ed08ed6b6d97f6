// state.rs — networked entity/client/weapon state records
// Mirrors common/entity_state.h, common/weaponinfo.h and common/usercmd.h

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_float, c_int, c_short, c_ushort};

use crate::types::{byte, color24, qboolean, vec3_t, MAX_PHYSINFO_STRING};

/// Weapon slots carried in `local_state_t`
pub const LOCAL_STATE_WEAPONS: usize = 64;

pub const ENTITY_NORMAL: c_int = 1 << 0;
pub const ENTITY_BEAM: c_int = 1 << 1;

/// One client movement command
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct usercmd_t {
    pub lerp_msec: c_short,
    pub msec: byte,
    pub viewangles: vec3_t,
    pub forwardmove: c_float,
    pub sidemove: c_float,
    pub upmove: c_float,
    pub lightlevel: byte,
    pub buttons: c_ushort,
    pub impulse: byte,
    pub weaponselect: byte,
    pub impact_index: c_int,
    pub impact_position: vec3_t,
}

/// Delta-compressed entity state
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct entity_state_t {
    pub entityType: c_int,
    pub number: c_int,
    pub msg_time: c_float,
    pub messagenum: c_int,

    pub origin: vec3_t,
    pub angles: vec3_t,

    pub modelindex: c_int,
    pub sequence: c_int,
    pub frame: c_float,
    pub colormap: c_int,
    pub skin: c_short,
    pub solid: c_short,
    pub effects: c_int,
    pub scale: c_float,
    pub eflags: byte,

    pub rendermode: c_int,
    pub renderamt: c_int,
    pub rendercolor: color24,
    pub renderfx: c_int,

    pub movetype: c_int,
    pub animtime: c_float,
    pub framerate: c_float,
    pub body: c_int,
    pub controller: [byte; 4],
    pub blending: [byte; 4],
    pub velocity: vec3_t,

    pub mins: vec3_t,
    pub maxs: vec3_t,

    pub aiment: c_int,
    pub owner: c_int,

    pub friction: c_float,
    pub gravity: c_float,

    pub team: c_int,
    pub playerclass: c_int,
    pub health: c_int,
    pub spectator: qboolean,
    pub weaponmodel: c_int,
    pub gaitsequence: c_int,
    pub basevelocity: vec3_t,
    pub usehull: c_int,
    pub oldbuttons: c_int,
    pub onground: c_int,
    pub iStepLeft: c_int,
    pub flFallVelocity: c_float,

    pub fov: c_float,
    pub weaponanim: c_int,

    pub startpos: vec3_t,
    pub endpos: vec3_t,
    pub impacttime: c_float,
    pub starttime: c_float,

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

/// Per-client state sent only to the owning client
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct clientdata_t {
    pub origin: vec3_t,
    pub velocity: vec3_t,

    pub viewmodel: c_int,
    pub punchangle: vec3_t,
    pub flags: c_int,
    pub waterlevel: c_int,
    pub watertype: c_int,
    pub view_ofs: vec3_t,
    pub health: c_float,

    pub bInDuck: c_int,
    pub weapons: c_int,

    pub flTimeStepSound: c_int,
    pub flDuckTime: c_int,
    pub flSwimTime: c_int,
    pub waterjumptime: c_int,

    pub maxspeed: c_float,
    pub fov: c_float,
    pub weaponanim: c_int,

    pub m_iId: c_int,
    pub ammo_shells: c_int,
    pub ammo_nails: c_int,
    pub ammo_cells: c_int,
    pub ammo_rockets: c_int,
    pub m_flNextAttack: c_float,

    pub tfstate: c_int,
    pub pushmsec: c_int,
    pub deadflag: c_int,

    pub physinfo: [c_char; MAX_PHYSINFO_STRING],

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

/// Client-side prediction data for one weapon
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct weapon_data_t {
    pub m_iId: c_int,
    pub m_iClip: c_int,

    pub m_flNextPrimaryAttack: c_float,
    pub m_flNextSecondaryAttack: c_float,
    pub m_flTimeWeaponIdle: c_float,

    pub m_fInReload: c_int,
    pub m_fInSpecialReload: c_int,
    pub m_flNextReload: c_float,
    pub m_flPumpTime: c_float,
    pub m_fReloadTime: c_float,

    pub m_fAimedDamage: c_float,
    pub m_fNextAimBonus: c_float,
    pub m_fInZoom: c_int,
    pub m_iWeaponState: c_int,

    pub iuser1: c_int,
    pub iuser2: c_int,
    pub iuser3: c_int,
    pub iuser4: c_int,
    pub fuser1: c_float,
    pub fuser2: c_float,
    pub fuser3: c_float,
    pub fuser4: c_float,
}

/// Predicted local player state handed to `HUD_PostRunCmd`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct local_state_t {
    pub playerstate: entity_state_t,
    pub client: clientdata_t,
    pub weapondata: [weapon_data_t; LOCAL_STATE_WEAPONS],
}

zeroed_default!(clientdata_t, local_state_t);

// Nothing in this file holds a pointer, so the layout is target independent.
const _: () = {
    use std::mem::size_of;
    assert!(size_of::<usercmd_t>() == 52);
    assert!(size_of::<entity_state_t>() == 340);
    assert!(size_of::<clientdata_t>() == 476);
    assert!(size_of::<weapon_data_t>() == 88);
    assert!(size_of::<local_state_t>() == 6448);
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_usercmd_exact_layout() {
        assert_eq!(size_of::<usercmd_t>(), 52, "usercmd_t must be exactly 52 bytes");
        assert_eq!(offset_of!(usercmd_t, msec), 2);
        assert_eq!(offset_of!(usercmd_t, viewangles), 4);
        assert_eq!(offset_of!(usercmd_t, lightlevel), 28);
        assert_eq!(offset_of!(usercmd_t, buttons), 30);
        assert_eq!(offset_of!(usercmd_t, impulse), 32);
        assert_eq!(offset_of!(usercmd_t, weaponselect), 33);
        assert_eq!(offset_of!(usercmd_t, impact_index), 36);
        assert_eq!(offset_of!(usercmd_t, impact_position), 40);
    }

    #[test]
    fn test_entity_state_offsets() {
        assert_eq!(offset_of!(entity_state_t, origin), 16);
        assert_eq!(offset_of!(entity_state_t, skin), 56);
        assert_eq!(offset_of!(entity_state_t, solid), 58);
        assert_eq!(offset_of!(entity_state_t, eflags), 68);
        assert_eq!(offset_of!(entity_state_t, rendermode), 72);
        assert_eq!(offset_of!(entity_state_t, rendercolor), 80);
        assert_eq!(offset_of!(entity_state_t, renderfx), 84);
        assert_eq!(offset_of!(entity_state_t, controller), 104);
        assert_eq!(offset_of!(entity_state_t, velocity), 112);
        assert_eq!(offset_of!(entity_state_t, aiment), 148);
        assert_eq!(offset_of!(entity_state_t, spectator), 176);
        assert_eq!(offset_of!(entity_state_t, basevelocity), 188);
        assert_eq!(offset_of!(entity_state_t, weaponanim), 224);
        assert_eq!(offset_of!(entity_state_t, startpos), 228);
        assert_eq!(offset_of!(entity_state_t, iuser1), 260);
        assert_eq!(offset_of!(entity_state_t, vuser4), 328);
        assert_eq!(size_of::<entity_state_t>(), 340);
    }

    #[test]
    fn test_clientdata_offsets() {
        assert_eq!(offset_of!(clientdata_t, viewmodel), 24);
        assert_eq!(offset_of!(clientdata_t, health), 64);
        assert_eq!(offset_of!(clientdata_t, maxspeed), 92);
        assert_eq!(offset_of!(clientdata_t, m_flNextAttack), 124);
        assert_eq!(offset_of!(clientdata_t, physinfo), 140);
        assert_eq!(offset_of!(clientdata_t, iuser1), 396);
        assert_eq!(offset_of!(clientdata_t, vuser1), 428);
        assert_eq!(size_of::<clientdata_t>(), 476);
    }

    #[test]
    fn test_local_state_layout() {
        assert_eq!(size_of::<weapon_data_t>(), 88);
        assert_eq!(offset_of!(local_state_t, client), 340);
        assert_eq!(offset_of!(local_state_t, weapondata), 816);
        assert_eq!(size_of::<local_state_t>(), 6448);
    }
}
