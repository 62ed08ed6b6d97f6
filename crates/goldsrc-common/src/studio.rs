// studio.rs — studio model (.mdl) headers and studio interface tables
// Mirrors engine/studio.h and common/r_studioint.h

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_float, c_int, c_ushort};

use crate::state::entity_state_t;
use crate::types::{byte, vec3_t};

pub const STUDIO_VERSION: c_int = 10;
pub const STUDIO_INTERFACE_VERSION: c_int = 1;
pub const MAXSTUDIOBLENDS: usize = 2;
pub const MAXSTUDIOCONTROLLERS: usize = 8;

/// File header of a studio model; every `*index` field is a byte offset from it
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct studiohdr_t {
    pub id: c_int,
    pub version: c_int,

    pub name: [c_char; 64],
    pub length: c_int,

    pub eyeposition: vec3_t,
    pub min: vec3_t,
    pub max: vec3_t,

    pub bbmin: vec3_t,
    pub bbmax: vec3_t,

    pub flags: c_int,

    pub numbones: c_int,
    pub boneindex: c_int,

    pub numbonecontrollers: c_int,
    pub bonecontrollerindex: c_int,

    pub numhitboxes: c_int,
    pub hitboxindex: c_int,

    pub numseq: c_int,
    pub seqindex: c_int,

    pub numseqgroups: c_int,
    pub seqgroupindex: c_int,

    pub numtextures: c_int,
    pub textureindex: c_int,
    pub texturedataindex: c_int,

    pub numskinref: c_int,
    pub numskinfamilies: c_int,
    pub skinindex: c_int,

    pub numbodyparts: c_int,
    pub bodypartindex: c_int,

    pub numattachments: c_int,
    pub attachmentindex: c_int,

    pub soundtable: c_int,
    pub soundindex: c_int,
    pub soundgroups: c_int,
    pub soundgroupindex: c_int,

    pub numtransitions: c_int,
    pub transitionindex: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct mstudiobone_t {
    pub name: [c_char; 32],
    pub parent: c_int,
    pub flags: c_int,
    pub bonecontroller: [c_int; 6],
    pub value: [c_float; 6],
    pub scale: [c_float; 6],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct mstudiobonecontroller_t {
    pub bone: c_int,
    pub r#type: c_int,
    pub start: c_float,
    pub end: c_float,
    pub rest: c_int,
    pub index: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct mstudiobbox_t {
    pub bone: c_int,
    pub group: c_int,
    pub bbmin: vec3_t,
    pub bbmax: vec3_t,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mstudioseqgroup_t {
    pub label: [c_char; 32],
    pub name: [c_char; 64],
    pub unused1: c_int,
    pub unused2: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct mstudioseqdesc_t {
    pub label: [c_char; 32],

    pub fps: c_float,
    pub flags: c_int,

    pub activity: c_int,
    pub actweight: c_int,

    pub numevents: c_int,
    pub eventindex: c_int,

    pub numframes: c_int,

    pub numpivots: c_int,
    pub pivotindex: c_int,

    pub motiontype: c_int,
    pub motionbone: c_int,
    pub linearmovement: vec3_t,
    pub automoveposindex: c_int,
    pub automoveangleindex: c_int,

    pub bbmin: vec3_t,
    pub bbmax: vec3_t,

    pub numblends: c_int,
    pub animindex: c_int,

    pub blendtype: [c_int; MAXSTUDIOBLENDS],
    pub blendstart: [c_float; MAXSTUDIOBLENDS],
    pub blendend: [c_float; MAXSTUDIOBLENDS],
    pub blendparent: c_int,

    pub seqgroup: c_int,

    pub entrynode: c_int,
    pub exitnode: c_int,
    pub nodeflags: c_int,

    pub nextseq: c_int,
}

/// Animation event attached to a sequence frame
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mstudioevent_t {
    pub frame: c_int,
    pub event: c_int,
    pub r#type: c_int,
    pub options: [c_char; 64],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct mstudiopivot_t {
    pub org: vec3_t,
    pub start: c_int,
    pub end: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct mstudioattachment_t {
    pub name: [c_char; 32],
    pub r#type: c_int,
    pub bone: c_int,
    pub org: vec3_t,
    pub vectors: [vec3_t; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct mstudioanim_t {
    pub offset: [c_ushort; 6],
}

/// `mstudioanimvalue_t` is a C union of `{ byte valid; byte total; }` and
/// `short value`. It is kept as its two raw bytes with typed views.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct mstudioanimvalue_t {
    pub raw: [byte; 2],
}

impl mstudioanimvalue_t {
    pub fn valid(&self) -> byte {
        self.raw[0]
    }

    pub fn total(&self) -> byte {
        self.raw[1]
    }

    pub fn value(&self) -> i16 {
        i16::from_ne_bytes(self.raw)
    }

    pub fn from_value(value: i16) -> Self {
        Self { raw: value.to_ne_bytes() }
    }

    pub fn from_num(valid: byte, total: byte) -> Self {
        Self { raw: [valid, total] }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mstudiobodyparts_t {
    pub name: [c_char; 64],
    pub nummodels: c_int,
    pub base: c_int,
    pub modelindex: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mstudiotexture_t {
    pub name: [c_char; 64],
    pub flags: c_int,
    pub width: c_int,
    pub height: c_int,
    pub index: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct mstudiomodel_t {
    pub name: [c_char; 64],

    pub r#type: c_int,

    pub boundingradius: c_float,

    pub nummesh: c_int,
    pub meshindex: c_int,

    pub numverts: c_int,
    pub vertinfoindex: c_int,
    pub vertindex: c_int,
    pub numnorms: c_int,
    pub norminfoindex: c_int,
    pub normindex: c_int,

    pub numgroups: c_int,
    pub groupindex: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct mstudiomesh_t {
    pub numtris: c_int,
    pub triindex: c_int,
    pub skinref: c_int,
    pub numnorms: c_int,
    pub normindex: c_int,
}

zeroed_default!(
    studiohdr_t,
    mstudioseqgroup_t,
    mstudioevent_t,
    mstudiobodyparts_t,
    mstudiotexture_t,
    mstudiomodel_t,
);

/// Studio renderer table returned by `HUD_GetStudioModelInterface`
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct r_studio_interface_t {
    pub version: c_int,
    pub StudioDrawModel: Option<unsafe extern "C" fn(flags: c_int) -> c_int>,
    pub StudioDrawPlayer:
        Option<unsafe extern "C" fn(flags: c_int, pplayer: *mut entity_state_t) -> c_int>,
}

opaque_types!(
    /// `engine_studio_api_t`, filled by the engine and only passed through here
    engine_studio_api_t,
);

const _: () = {
    use std::mem::size_of;
    assert!(size_of::<studiohdr_t>() == 244);
    assert!(size_of::<mstudiobone_t>() == 112);
    assert!(size_of::<mstudioseqdesc_t>() == 176);
    assert!(size_of::<mstudioevent_t>() == 76);
    assert!(size_of::<mstudioanimvalue_t>() == 2);
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_studiohdr_exact_layout() {
        assert_eq!(offset_of!(studiohdr_t, name), 8);
        assert_eq!(offset_of!(studiohdr_t, length), 72);
        assert_eq!(offset_of!(studiohdr_t, eyeposition), 76);
        assert_eq!(offset_of!(studiohdr_t, flags), 136);
        assert_eq!(offset_of!(studiohdr_t, numbones), 140);
        assert_eq!(offset_of!(studiohdr_t, numseq), 164);
        assert_eq!(offset_of!(studiohdr_t, numtextures), 180);
        assert_eq!(offset_of!(studiohdr_t, numbodyparts), 204);
        assert_eq!(offset_of!(studiohdr_t, transitionindex), 240);
        assert_eq!(size_of::<studiohdr_t>(), 244, "studiohdr_t must be exactly 244 bytes");
    }

    #[test]
    fn test_studio_record_sizes() {
        assert_eq!(size_of::<mstudiobone_t>(), 112);
        assert_eq!(size_of::<mstudiobonecontroller_t>(), 24);
        assert_eq!(size_of::<mstudiobbox_t>(), 32);
        assert_eq!(size_of::<mstudioseqgroup_t>(), 104);
        assert_eq!(size_of::<mstudioseqdesc_t>(), 176);
        assert_eq!(size_of::<mstudioevent_t>(), 76);
        assert_eq!(size_of::<mstudiopivot_t>(), 20);
        assert_eq!(size_of::<mstudioattachment_t>(), 88);
        assert_eq!(size_of::<mstudioanim_t>(), 12);
        assert_eq!(size_of::<mstudiobodyparts_t>(), 76);
        assert_eq!(size_of::<mstudiotexture_t>(), 80);
        assert_eq!(size_of::<mstudiomodel_t>(), 112);
        assert_eq!(size_of::<mstudiomesh_t>(), 20);
    }

    #[test]
    fn test_seqdesc_offsets() {
        assert_eq!(offset_of!(mstudioseqdesc_t, fps), 32);
        assert_eq!(offset_of!(mstudioseqdesc_t, linearmovement), 76);
        assert_eq!(offset_of!(mstudioseqdesc_t, bbmin), 96);
        assert_eq!(offset_of!(mstudioseqdesc_t, numblends), 120);
        assert_eq!(offset_of!(mstudioseqdesc_t, blendtype), 128);
        assert_eq!(offset_of!(mstudioseqdesc_t, blendparent), 152);
        assert_eq!(offset_of!(mstudioseqdesc_t, nextseq), 172);
    }

    #[test]
    fn test_animvalue_union_views_share_bytes() {
        let v = mstudioanimvalue_t::from_num(3, 7);
        assert_eq!(v.valid(), 3);
        assert_eq!(v.total(), 7);
        assert_eq!(v.value(), i16::from_ne_bytes([3, 7]));

        let w = mstudioanimvalue_t::from_value(-2);
        assert_eq!(w.value(), -2);
        assert_eq!([w.valid(), w.total()], (-2i16).to_ne_bytes());
    }
}
