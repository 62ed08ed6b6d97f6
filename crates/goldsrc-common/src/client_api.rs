// client_api.rs — client DLL records and interface tables
// Mirrors common/cl_entity.h, common/r_efx.h, common/ref_params.h,
// cl_dll/cdll_int.h and the client export table

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_double, c_float, c_int, c_long, c_short, c_uchar, c_uint, c_ushort, c_void};

use crate::entity::edict_t;
use crate::pmove::{model_s, movevars_t, playermove_t, pmtrace_t};
use crate::state::{clientdata_t, entity_state_t, local_state_t, usercmd_t, weapon_data_t};
use crate::studio::{engine_studio_api_t, mstudioevent_t, r_studio_interface_t};
use crate::types::{
    byte, colorVec, cvar_t, netadr_t, qboolean, sentenceEntry_s, sequenceEntry_s, vec3_t, wrect_t,
    HISTORY_MAX, HSPRITE,
};

// ============================================================
// Constants
// ============================================================

/// Version of `cldll_func_t` passed to `Initialize`
pub const CLDLL_INTERFACE_VERSION: c_int = 7;

pub const SCRINFO_SCREENFLASH: c_int = 1;
pub const SCRINFO_STRETCHED: c_int = 2;

// ============================================================
// Client entity
// ============================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct position_history_t {
    pub animtime: c_float,
    pub origin: vec3_t,
    pub angles: vec3_t,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct mouth_t {
    pub mouthopen: byte,
    pub sndcount: byte,
    pub sndavg: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct latchedvars_t {
    pub prevanimtime: c_float,
    pub sequencetime: c_float,
    pub prevseqblending: [byte; 2],
    pub prevorigin: vec3_t,
    pub prevangles: vec3_t,

    pub prevsequence: c_int,
    pub prevframe: c_float,

    pub prevcontroller: [byte; 4],
    pub prevblending: [byte; 2],
}

opaque_types!(
    efrag_s,
    mnode_s,
    /// `struct triangleapi_s`
    triangleapi_s,
    /// `struct efx_api_s`
    efx_api_s,
    /// `struct event_api_s`
    event_api_s,
    /// `struct demo_api_s`
    demo_api_s,
    /// `struct net_api_s`
    net_api_s,
    /// `struct IVoiceTweak_s`
    IVoiceTweak_s,
    /// `struct cmdalias_s`
    cmdalias_t,
    /// Win32 `POINT`
    tagPOINT,
);

/// Client-side view of an entity
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct cl_entity_t {
    pub index: c_int,
    pub player: qboolean,

    pub baseline: entity_state_t,
    pub prevstate: entity_state_t,
    pub curstate: entity_state_t,

    pub current_position: c_int,
    pub ph: [position_history_t; HISTORY_MAX],

    pub mouth: mouth_t,

    pub latched: latchedvars_t,

    pub lastmove: c_float,

    pub origin: vec3_t,
    pub angles: vec3_t,

    pub attachment: [vec3_t; 4],

    pub trivial_accept: c_int,

    pub model: *mut model_s,
    pub efrag: *mut efrag_s,
    pub topnode: *mut mnode_s,

    pub syncbase: c_float,
    pub visframe: c_int,
    pub cvFloorColor: colorVec,
}

/// Temporary entity managed by the client effects code
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct tempent_t {
    pub flags: c_int,
    pub die: c_float,
    pub frameMax: c_float,
    pub x: c_float,
    pub y: c_float,
    pub z: c_float,
    pub fadeSpeed: c_float,
    pub bounceFactor: c_float,
    pub hitSound: c_int,
    pub hitcallback: Option<unsafe extern "C" fn(ent: *mut tempent_t, ptr: *mut pmtrace_t)>,
    pub callback: Option<unsafe extern "C" fn(ent: *mut tempent_t, frametime: c_float, currenttime: c_float)>,
    pub next: *mut tempent_t,
    pub priority: c_int,
    pub clientIndex: c_short,

    pub tentOffset: vec3_t,
    pub entity: cl_entity_t,
}

// ============================================================
// View and HUD records
// ============================================================

/// View setup passed to `V_CalcRefdef`
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ref_params_t {
    pub vieworg: vec3_t,
    pub viewangles: vec3_t,

    pub forward: vec3_t,
    pub right: vec3_t,
    pub up: vec3_t,

    pub frametime: c_float,
    pub time: c_float,

    pub intermission: c_int,
    pub paused: c_int,
    pub spectator: c_int,
    pub onground: c_int,
    pub waterlevel: c_int,

    pub simvel: vec3_t,
    pub simorg: vec3_t,

    pub viewheight: vec3_t,
    pub idealpitch: c_float,

    pub cl_viewangles: vec3_t,

    pub health: c_int,
    pub crosshairangle: vec3_t,
    pub viewsize: c_float,

    pub punchangle: vec3_t,
    pub maxclients: c_int,
    pub viewentity: c_int,
    pub playernum: c_int,
    pub max_entities: c_int,
    pub demoplayback: c_int,
    pub hardware: c_int,

    pub smoothing: c_int,

    pub cmd: *mut usercmd_t,
    pub movevars: *mut movevars_t,

    pub viewport: [c_int; 4],

    pub nextView: c_int,
    pub onlyClientDraw: c_int,
}

/// Data the engine offers in `HUD_UpdateClientData`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct client_data_t {
    pub origin: vec3_t,
    pub viewangles: vec3_t,
    pub iWeaponBits: c_int,
    pub fov: c_float,
}

/// Input button state returned by `KB_Find`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct kbutton_t {
    pub down: [c_int; 2],
    pub state: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SCREENINFO {
    pub iSize: c_int,
    pub iWidth: c_int,
    pub iHeight: c_int,
    pub iFlags: c_int,
    pub iCharHeight: c_int,
    pub charWidths: [c_short; 256],
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct client_sprite_t {
    pub szName: [c_char; 64],
    pub szSprite: [c_char; 64],
    pub hspr: c_int,
    pub iRes: c_int,
    pub rc: wrect_t,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct client_textmessage_t {
    pub effect: c_int,
    pub r1: byte,
    pub g1: byte,
    pub b1: byte,
    pub a1: byte,
    pub r2: byte,
    pub g2: byte,
    pub b2: byte,
    pub a2: byte,
    pub x: c_float,
    pub y: c_float,
    pub fadein: c_float,
    pub fadeout: c_float,
    pub holdtime: c_float,
    pub fxtime: c_float,
    pub pName: *const c_char,
    pub pMessage: *const c_char,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct hud_player_info_t {
    pub name: *mut c_char,
    pub ping: c_short,
    pub thisplayer: byte,
    pub spectator: byte,
    pub packetloss: byte,
    pub model: *mut c_char,
    pub topcolor: c_short,
    pub bottomcolor: c_short,
    pub m_nSteamID: u64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct screenfade_t {
    pub fadeSpeed: c_float,
    pub fadeEnd: c_float,
    pub fadeTotalEnd: c_float,
    pub fadeReset: c_float,
    pub fader: byte,
    pub fadeg: byte,
    pub fadeb: byte,
    pub fadealpha: byte,
    pub fadeFlags: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct con_nprint_t {
    pub index: c_int,
    pub time_to_live: c_float,
    pub color: [c_float; 3],
}

/// Arguments delivered to an event hook
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct event_args_t {
    pub flags: c_int,
    pub entindex: c_int,

    pub origin: vec3_t,
    pub angles: vec3_t,
    pub velocity: vec3_t,

    pub ducking: c_int,

    pub fparam1: c_float,
    pub fparam2: c_float,

    pub iparam1: c_int,
    pub iparam2: c_int,

    pub bparam1: c_int,
    pub bparam2: c_int,
}

zeroed_default!(
    cl_entity_t,
    tempent_t,
    ref_params_t,
    SCREENINFO,
    client_sprite_t,
    client_textmessage_t,
    hud_player_info_t,
);

// ============================================================
// Callback types
// ============================================================

pub type pfnUserMsgHook =
    Option<unsafe extern "C" fn(pszName: *const c_char, iSize: c_int, pbuf: *mut c_void) -> c_int>;

pub type pfnEventHook = Option<unsafe extern "C" fn(args: *mut event_args_t)>;

pub type AddVisibleEntityFn = Option<unsafe extern "C" fn(pEntity: *mut cl_entity_t) -> c_int>;

pub type TempEntPlaySoundFn = Option<unsafe extern "C" fn(pTemp: *mut tempent_t, damp: c_float)>;

// ============================================================
// cl_enginefunc_t
// ============================================================

function_table! {
    /// Engine services handed to the client DLL through `Initialize`
    pub struct cl_enginefunc_t {
        pub pfnSPR_Load: Option<unsafe extern "C" fn(szPicName: *const c_char) -> HSPRITE>,
        pub pfnSPR_Frames: Option<unsafe extern "C" fn(hPic: HSPRITE) -> c_int>,
        pub pfnSPR_Height: Option<unsafe extern "C" fn(hPic: HSPRITE, frame: c_int) -> c_int>,
        pub pfnSPR_Width: Option<unsafe extern "C" fn(hPic: HSPRITE, frame: c_int) -> c_int>,
        pub pfnSPR_Set: Option<unsafe extern "C" fn(hPic: HSPRITE, r: c_int, g: c_int, b: c_int)>,
        pub pfnSPR_Draw: Option<unsafe extern "C" fn(frame: c_int, x: c_int, y: c_int, prc: *const wrect_t)>,
        pub pfnSPR_DrawHoles: Option<unsafe extern "C" fn(frame: c_int, x: c_int, y: c_int, prc: *const wrect_t)>,
        pub pfnSPR_DrawAdditive: Option<unsafe extern "C" fn(frame: c_int, x: c_int, y: c_int, prc: *const wrect_t)>,
        pub pfnSPR_EnableScissor: Option<unsafe extern "C" fn(x: c_int, y: c_int, width: c_int, height: c_int)>,
        pub pfnSPR_DisableScissor: Option<unsafe extern "C" fn()>,
        pub pfnSPR_GetList: Option<unsafe extern "C" fn(psz: *mut c_char, piCount: *mut c_int) -> *mut client_sprite_t>,
        pub pfnFillRGBA: Option<
            unsafe extern "C" fn(x: c_int, y: c_int, width: c_int, height: c_int, r: c_int, g: c_int, b: c_int, a: c_int),
        >,
        pub pfnGetScreenInfo: Option<unsafe extern "C" fn(pscrinfo: *mut SCREENINFO) -> c_int>,
        pub pfnSetCrosshair: Option<unsafe extern "C" fn(hspr: HSPRITE, rc: wrect_t, r: c_int, g: c_int, b: c_int)>,
        pub pfnRegisterVariable: Option<
            unsafe extern "C" fn(szName: *mut c_char, szValue: *mut c_char, flags: c_int) -> *mut cvar_t,
        >,
        pub pfnGetCvarFloat: Option<unsafe extern "C" fn(szName: *mut c_char) -> c_float>,
        pub pfnGetCvarString: Option<unsafe extern "C" fn(szName: *mut c_char) -> *mut c_char>,
        pub pfnAddCommand: Option<unsafe extern "C" fn(cmd_name: *mut c_char, function: Option<unsafe extern "C" fn()>) -> c_int>,
        pub pfnHookUserMsg: Option<unsafe extern "C" fn(szMsgName: *mut c_char, pfn: pfnUserMsgHook) -> c_int>,
        pub pfnServerCmd: Option<unsafe extern "C" fn(szCmdString: *mut c_char) -> c_int>,
        pub pfnClientCmd: Option<unsafe extern "C" fn(szCmdString: *mut c_char) -> c_int>,
        pub pfnGetPlayerInfo: Option<unsafe extern "C" fn(ent_num: c_int, pinfo: *mut hud_player_info_t)>,
        pub pfnPlaySoundByName: Option<unsafe extern "C" fn(szSound: *mut c_char, volume: c_float)>,
        pub pfnPlaySoundByIndex: Option<unsafe extern "C" fn(iSound: c_int, volume: c_float)>,
        pub pfnAngleVectors: Option<
            unsafe extern "C" fn(vecAngles: *const c_float, forward: *mut c_float, right: *mut c_float, up: *mut c_float),
        >,
        pub pfnTextMessageGet: Option<unsafe extern "C" fn(pName: *const c_char) -> *mut client_textmessage_t>,
        pub pfnDrawCharacter: Option<
            unsafe extern "C" fn(x: c_int, y: c_int, number: c_int, r: c_int, g: c_int, b: c_int) -> c_int,
        >,
        pub pfnDrawConsoleString: Option<unsafe extern "C" fn(x: c_int, y: c_int, string: *mut c_char) -> c_int>,
        pub pfnDrawSetTextColor: Option<unsafe extern "C" fn(r: c_float, g: c_float, b: c_float)>,
        pub pfnDrawConsoleStringLen: Option<
            unsafe extern "C" fn(string: *const c_char, length: *mut c_int, height: *mut c_int),
        >,
        pub pfnConsolePrint: Option<unsafe extern "C" fn(string: *const c_char)>,
        pub pfnCenterPrint: Option<unsafe extern "C" fn(string: *const c_char)>,
        pub GetWindowCenterX: Option<unsafe extern "C" fn() -> c_int>,
        pub GetWindowCenterY: Option<unsafe extern "C" fn() -> c_int>,
        pub GetViewAngles: Option<unsafe extern "C" fn(angles: *mut c_float)>,
        pub SetViewAngles: Option<unsafe extern "C" fn(angles: *mut c_float)>,
        pub GetMaxClients: Option<unsafe extern "C" fn() -> c_int>,
        pub Cvar_SetValue: Option<unsafe extern "C" fn(cvar: *mut c_char, value: c_float)>,
        pub Cmd_Argc: Option<unsafe extern "C" fn() -> c_int>,
        pub Cmd_Argv: Option<unsafe extern "C" fn(arg: c_int) -> *mut c_char>,
        pub Con_Printf: Option<unsafe extern "C" fn(fmt: *mut c_char, ...)>,
        pub Con_DPrintf: Option<unsafe extern "C" fn(fmt: *mut c_char, ...)>,
        pub Con_NPrintf: Option<unsafe extern "C" fn(pos: c_int, fmt: *mut c_char, ...)>,
        pub Con_NXPrintf: Option<unsafe extern "C" fn(info: *mut con_nprint_t, fmt: *mut c_char, ...)>,
        pub PhysInfo_ValueForKey: Option<unsafe extern "C" fn(key: *const c_char) -> *const c_char>,
        pub ServerInfo_ValueForKey: Option<unsafe extern "C" fn(key: *const c_char) -> *const c_char>,
        pub GetClientMaxspeed: Option<unsafe extern "C" fn() -> c_float>,
        pub CheckParm: Option<unsafe extern "C" fn(parm: *mut c_char, ppnext: *mut *mut c_char) -> c_int>,
        pub Key_Event: Option<unsafe extern "C" fn(key: c_int, down: c_int)>,
        pub GetMousePosition: Option<unsafe extern "C" fn(mx: *mut c_int, my: *mut c_int)>,
        pub IsNoClipping: Option<unsafe extern "C" fn() -> c_int>,
        pub GetLocalPlayer: Option<unsafe extern "C" fn() -> *mut cl_entity_t>,
        pub GetViewModel: Option<unsafe extern "C" fn() -> *mut cl_entity_t>,
        pub GetEntityByIndex: Option<unsafe extern "C" fn(idx: c_int) -> *mut cl_entity_t>,
        pub GetClientTime: Option<unsafe extern "C" fn() -> c_float>,
        pub V_CalcShake: Option<unsafe extern "C" fn()>,
        pub V_ApplyShake: Option<unsafe extern "C" fn(origin: *mut c_float, angles: *mut c_float, factor: c_float)>,
        pub PM_PointContents: Option<unsafe extern "C" fn(point: *mut c_float, truecontents: *mut c_int) -> c_int>,
        pub PM_WaterEntity: Option<unsafe extern "C" fn(p: *mut c_float) -> c_int>,
        pub PM_TraceLine: Option<
            unsafe extern "C" fn(
                start: *mut c_float,
                end: *mut c_float,
                flags: c_int,
                usehull: c_int,
                ignore_pe: c_int,
            ) -> *mut pmtrace_t,
        >,
        pub CL_LoadModel: Option<unsafe extern "C" fn(modelname: *const c_char, index: *mut c_int) -> *mut model_s>,
        pub CL_CreateVisibleEntity: Option<unsafe extern "C" fn(r#type: c_int, ent: *mut cl_entity_t) -> c_int>,
        pub GetSpritePointer: Option<unsafe extern "C" fn(hSprite: HSPRITE) -> *const model_s>,
        pub pfnPlaySoundByNameAtLocation: Option<
            unsafe extern "C" fn(szSound: *mut c_char, volume: c_float, origin: *mut c_float),
        >,
        pub pfnPrecacheEvent: Option<unsafe extern "C" fn(r#type: c_int, psz: *const c_char) -> c_ushort>,
        pub pfnPlaybackEvent: Option<
            unsafe extern "C" fn(
                flags: c_int,
                pInvoker: *const edict_t,
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
        pub pfnWeaponAnim: Option<unsafe extern "C" fn(iAnim: c_int, body: c_int)>,
        pub pfnRandomFloat: Option<unsafe extern "C" fn(flLow: c_float, flHigh: c_float) -> c_float>,
        pub pfnRandomLong: Option<unsafe extern "C" fn(lLow: c_long, lHigh: c_long) -> c_long>,
        pub pfnHookEvent: Option<unsafe extern "C" fn(name: *mut c_char, pfnEvent: pfnEventHook)>,
        pub Con_IsVisible: Option<unsafe extern "C" fn() -> c_int>,
        pub pfnGetGameDirectory: Option<unsafe extern "C" fn() -> *const c_char>,
        pub pfnGetCvarPointer: Option<unsafe extern "C" fn(szName: *const c_char) -> *mut cvar_t>,
        pub Key_LookupBinding: Option<unsafe extern "C" fn(pBinding: *const c_char) -> *const c_char>,
        pub pfnGetLevelName: Option<unsafe extern "C" fn() -> *const c_char>,
        pub pfnGetScreenFade: Option<unsafe extern "C" fn(fade: *mut screenfade_t)>,
        pub pfnSetScreenFade: Option<unsafe extern "C" fn(fade: *mut screenfade_t)>,
        pub VGui_GetPanel: Option<unsafe extern "C" fn() -> *mut c_void>,
        pub VGui_ViewportPaintBackground: Option<unsafe extern "C" fn(extents: *mut c_int)>,
        pub COM_LoadFile: Option<unsafe extern "C" fn(path: *mut c_char, usehunk: c_int, pLength: *mut c_int) -> *mut byte>,
        pub COM_ParseFile: Option<unsafe extern "C" fn(data: *mut c_char, token: *mut c_char) -> *mut c_char>,
        pub COM_FreeFile: Option<unsafe extern "C" fn(buffer: *mut c_void)>,

        pub pTriAPI: *mut triangleapi_s,
        pub pEfxAPI: *mut efx_api_s,
        pub pEventAPI: *mut event_api_s,
        pub pDemoAPI: *mut demo_api_s,
        pub pNetAPI: *mut net_api_s,
        pub pVoiceTweak: *mut IVoiceTweak_s,

        pub IsSpectateOnly: Option<unsafe extern "C" fn() -> c_int>,
        pub LoadMapSprite: Option<unsafe extern "C" fn(filename: *const c_char) -> *mut model_s>,
        pub COM_AddAppDirectoryToSearchPath: Option<unsafe extern "C" fn(pszBaseDir: *const c_char, appName: *const c_char)>,
        pub COM_ExpandFilename: Option<
            unsafe extern "C" fn(fileName: *const c_char, nameOutBuffer: *mut c_char, nameOutBufferSize: c_int) -> c_int,
        >,
        pub PlayerInfo_ValueForKey: Option<unsafe extern "C" fn(playerNum: c_int, key: *const c_char) -> *const c_char>,
        pub PlayerInfo_SetValueForKey: Option<unsafe extern "C" fn(key: *const c_char, value: *const c_char)>,
        /// `playerID` points at a 16 byte buffer
        pub GetPlayerUniqueID: Option<unsafe extern "C" fn(iPlayer: c_int, playerID: *mut c_char) -> qboolean>,
        pub GetTrackerIDForPlayer: Option<unsafe extern "C" fn(playerSlot: c_int) -> c_int>,
        pub GetPlayerForTrackerID: Option<unsafe extern "C" fn(trackerID: c_int) -> c_int>,
        pub pfnServerCmdUnreliable: Option<unsafe extern "C" fn(szCmdString: *mut c_char) -> c_int>,
        pub pfnGetMousePos: Option<unsafe extern "C" fn(ppt: *mut tagPOINT)>,
        pub pfnSetMousePos: Option<unsafe extern "C" fn(x: c_int, y: c_int)>,
        pub pfnSetMouseEnable: Option<unsafe extern "C" fn(fEnable: qboolean)>,
        pub GetFirstCvarPtr: Option<unsafe extern "C" fn() -> *mut cvar_t>,
        pub GetFirstCmdFunctionHandle: Option<unsafe extern "C" fn() -> c_uint>,
        pub GetNextCmdFunctionHandle: Option<unsafe extern "C" fn(cmdhandle: c_uint) -> c_uint>,
        pub GetCmdFunctionName: Option<unsafe extern "C" fn(cmdhandle: c_uint) -> *const c_char>,
        pub hudGetClientOldTime: Option<unsafe extern "C" fn() -> c_float>,
        pub hudGetServerGravityValue: Option<unsafe extern "C" fn() -> c_float>,
        pub hudGetModelByIndex: Option<unsafe extern "C" fn(index: c_int) -> *mut model_s>,
        pub pfnSetFilterMode: Option<unsafe extern "C" fn(mode: c_int)>,
        pub pfnSetFilterColor: Option<unsafe extern "C" fn(r: c_float, g: c_float, b: c_float)>,
        pub pfnSetFilterBrightness: Option<unsafe extern "C" fn(brightness: c_float)>,
        pub pfnSequenceGet: Option<
            unsafe extern "C" fn(fileName: *const c_char, entryName: *const c_char) -> *mut sequenceEntry_s,
        >,
        pub pfnSPR_DrawGeneric: Option<
            unsafe extern "C" fn(
                frame: c_int,
                x: c_int,
                y: c_int,
                prc: *const wrect_t,
                src: c_int,
                dest: c_int,
                w: c_int,
                h: c_int,
            ),
        >,
        pub pfnSequencePickSentence: Option<
            unsafe extern "C" fn(groupName: *const c_char, pickMethod: c_int, entryPicked: *mut c_int) -> *mut sentenceEntry_s,
        >,
        pub pfnDrawString: Option<
            unsafe extern "C" fn(x: c_int, y: c_int, str: *const c_char, r: c_int, g: c_int, b: c_int) -> c_int,
        >,
        pub pfnDrawStringReverse: Option<
            unsafe extern "C" fn(x: c_int, y: c_int, str: *const c_char, r: c_int, g: c_int, b: c_int) -> c_int,
        >,
        pub LocalPlayerInfo_ValueForKey: Option<unsafe extern "C" fn(key: *const c_char) -> *const c_char>,
        pub pfnVGUI2DrawCharacter: Option<unsafe extern "C" fn(x: c_int, y: c_int, ch: c_int, font: c_uint) -> c_int>,
        pub pfnVGUI2DrawCharacterAdd: Option<
            unsafe extern "C" fn(x: c_int, y: c_int, ch: c_int, r: c_int, g: c_int, b: c_int, font: c_uint) -> c_int,
        >,
        pub COM_GetApproxWavePlayLength: Option<unsafe extern "C" fn(filename: *const c_char) -> c_uint>,
        pub pfnGetCareerUI: Option<unsafe extern "C" fn() -> *mut c_void>,
        pub Cvar_Set: Option<unsafe extern "C" fn(cvar: *mut c_char, value: *mut c_char)>,
        pub pfnIsCareerMatch: Option<unsafe extern "C" fn() -> c_int>,
        pub pfnPlaySoundVoiceByName: Option<unsafe extern "C" fn(szSound: *mut c_char, volume: c_float, pitch: c_int)>,
        pub pfnPrimeMusicStream: Option<unsafe extern "C" fn(szFilename: *mut c_char, looping: c_int)>,
        pub GetAbsoluteTime: Option<unsafe extern "C" fn() -> c_double>,
        pub pfnProcessTutorMessageDecayBuffer: Option<unsafe extern "C" fn(buffer: *mut c_int, bufferLength: c_int)>,
        pub pfnConstructTutorMessageDecayBuffer: Option<unsafe extern "C" fn(buffer: *mut c_int, bufferLength: c_int)>,
        pub pfnResetTutorMessageDecayData: Option<unsafe extern "C" fn()>,
        pub pfnPlaySoundByNameAtPitch: Option<unsafe extern "C" fn(szSound: *mut c_char, volume: c_float, pitch: c_int)>,
        pub pfnFillRGBABlend: Option<
            unsafe extern "C" fn(x: c_int, y: c_int, width: c_int, height: c_int, r: c_int, g: c_int, b: c_int, a: c_int),
        >,
        pub pfnGetAppID: Option<unsafe extern "C" fn() -> c_int>,
        pub pfnGetAliasList: Option<unsafe extern "C" fn() -> *mut cmdalias_t>,
        pub pfnVguiWrap2_GetMouseDelta: Option<unsafe extern "C" fn(x: *mut c_int, y: *mut c_int)>,
        pub pfnFilteredClientCmd: Option<unsafe extern "C" fn(pszCmdString: *const c_char) -> c_int>,
    }
}

// ============================================================
// cldll_func_t
// ============================================================

function_table! {
    /// Functions the client DLL exports to the engine (filled by `F`)
    pub struct cldll_func_t {
        pub pInitFunc: Option<unsafe extern "C" fn(pEnginefuncs: *mut cl_enginefunc_t, iVersion: c_int) -> c_int>,
        pub pHudInitFunc: Option<unsafe extern "C" fn()>,
        pub pHudVidInitFunc: Option<unsafe extern "C" fn() -> c_int>,
        pub pHudRedrawFunc: Option<unsafe extern "C" fn(time: c_float, intermission: c_int) -> c_int>,
        pub pHudUpdateClientDataFunc: Option<unsafe extern "C" fn(pcldata: *mut client_data_t, flTime: c_float) -> c_int>,
        pub pHudResetFunc: Option<unsafe extern "C" fn()>,
        pub pClientMove: Option<unsafe extern "C" fn(ppmove: *mut playermove_t, server: qboolean)>,
        pub pClientMoveInit: Option<unsafe extern "C" fn(ppmove: *mut playermove_t)>,
        pub pClientTextureType: Option<unsafe extern "C" fn(name: *mut c_char) -> c_char>,
        pub pIN_ActivateMouse: Option<unsafe extern "C" fn()>,
        pub pIN_DeactivateMouse: Option<unsafe extern "C" fn()>,
        pub pIN_MouseEvent: Option<unsafe extern "C" fn(mstate: c_int)>,
        pub pIN_ClearStates: Option<unsafe extern "C" fn()>,
        pub pIN_Accumulate: Option<unsafe extern "C" fn()>,
        pub pCL_CreateMove: Option<unsafe extern "C" fn(frametime: c_float, cmd: *mut usercmd_t, active: c_int)>,
        pub pCL_IsThirdPerson: Option<unsafe extern "C" fn() -> c_int>,
        pub pCL_GetCameraOffsets: Option<unsafe extern "C" fn(ofs: *mut c_float)>,
        pub pFindKey: Option<unsafe extern "C" fn(name: *const c_char) -> *mut kbutton_t>,
        pub pCamThink: Option<unsafe extern "C" fn()>,
        pub pCalcRefdef: Option<unsafe extern "C" fn(pparams: *mut ref_params_t)>,
        pub pAddEntity: Option<unsafe extern "C" fn(r#type: c_int, ent: *mut cl_entity_t, modelname: *const c_char) -> c_int>,
        pub pCreateEntities: Option<unsafe extern "C" fn()>,
        pub pDrawNormalTriangles: Option<unsafe extern "C" fn()>,
        pub pDrawTransparentTriangles: Option<unsafe extern "C" fn()>,
        pub pStudioEvent: Option<unsafe extern "C" fn(event: *const mstudioevent_t, entity: *const cl_entity_t)>,
        pub pPostRunCmd: Option<
            unsafe extern "C" fn(
                from: *mut local_state_t,
                to: *mut local_state_t,
                cmd: *mut usercmd_t,
                runfuncs: c_int,
                time: c_double,
                random_seed: c_uint,
            ),
        >,
        pub pShutdown: Option<unsafe extern "C" fn()>,
        pub pTxferLocalOverrides: Option<unsafe extern "C" fn(state: *mut entity_state_t, client: *const clientdata_t)>,
        pub pProcessPlayerState: Option<unsafe extern "C" fn(dst: *mut entity_state_t, src: *const entity_state_t)>,
        pub pTxferPredictionData: Option<
            unsafe extern "C" fn(
                ps: *mut entity_state_t,
                pps: *const entity_state_t,
                pcd: *mut clientdata_t,
                ppcd: *const clientdata_t,
                wd: *mut weapon_data_t,
                pwd: *const weapon_data_t,
            ),
        >,
        pub pReadDemoBuffer: Option<unsafe extern "C" fn(size: c_int, buffer: *mut c_uchar)>,
        pub pConnectionlessPacket: Option<
            unsafe extern "C" fn(
                net_from: *const netadr_t,
                args: *const c_char,
                response_buffer: *mut c_char,
                response_buffer_size: *mut c_int,
            ) -> c_int,
        >,
        pub pGetHullBounds: Option<unsafe extern "C" fn(hullnumber: c_int, mins: *mut c_float, maxs: *mut c_float) -> c_int>,
        pub pHudFrame: Option<unsafe extern "C" fn(time: c_double)>,
        pub pKeyEvent: Option<unsafe extern "C" fn(eventcode: c_int, keynum: c_int, pszCurrentBinding: *const c_char) -> c_int>,
        pub pTempEntUpdate: Option<
            unsafe extern "C" fn(
                frametime: c_double,
                client_time: c_double,
                cl_gravity: c_double,
                ppTempEntFree: *mut *mut tempent_t,
                ppTempEntActive: *mut *mut tempent_t,
                Callback_AddVisibleEntity: AddVisibleEntityFn,
                Callback_TempEntPlaySound: TempEntPlaySoundFn,
            ),
        >,
        pub pGetUserEntity: Option<unsafe extern "C" fn(index: c_int) -> *mut cl_entity_t>,
        pub pVoiceStatus: Option<unsafe extern "C" fn(entindex: c_int, bTalking: qboolean)>,
        pub pDirectorMessage: Option<unsafe extern "C" fn(iSize: c_int, pbuf: *mut c_void)>,
        pub pStudioInterface: Option<
            unsafe extern "C" fn(
                version: c_int,
                ppinterface: *mut *mut r_studio_interface_t,
                pstudio: *mut engine_studio_api_t,
            ) -> c_int,
        >,
        pub pChatInputPosition: Option<unsafe extern "C" fn(x: *mut c_int, y: *mut c_int)>,
        pub pGetPlayerTeam: Option<unsafe extern "C" fn(iplayer: c_int) -> c_int>,
        pub pClientFactory: Option<unsafe extern "C" fn() -> *mut c_void>,
    }
}

/// Signature of the client DLL's `F` export
pub type ClientExportFn = unsafe extern "C" fn(pv: *mut cldll_func_t);

#[cfg(target_pointer_width = "32")]
const _: () = {
    use std::mem::size_of;
    assert!(size_of::<cl_entity_t>() == 3000);
    assert!(size_of::<tempent_t>() == 3068);
    assert!(size_of::<ref_params_t>() == 232);
    assert!(size_of::<client_textmessage_t>() == 44);
};

const _: () = {
    use std::mem::size_of;
    assert!(size_of::<cldll_func_t>() == 43 * size_of::<usize>());
    assert!(size_of::<cl_enginefunc_t>() % size_of::<usize>() == 0);
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_small_client_records() {
        assert_eq!(size_of::<position_history_t>(), 28);
        assert_eq!(size_of::<mouth_t>(), 8);
        assert_eq!(size_of::<latchedvars_t>(), 52);
        assert_eq!(offset_of!(latchedvars_t, prevorigin), 12);
        assert_eq!(offset_of!(latchedvars_t, prevblending), 48);
        assert_eq!(size_of::<client_data_t>(), 32);
        assert_eq!(size_of::<kbutton_t>(), 12);
        assert_eq!(size_of::<SCREENINFO>(), 532);
        assert_eq!(size_of::<client_sprite_t>(), 152);
        assert_eq!(size_of::<screenfade_t>(), 24);
        assert_eq!(size_of::<con_nprint_t>(), 20);
        assert_eq!(size_of::<event_args_t>(), 72);
    }

    #[test]
    fn test_cl_entity_prefix_offsets() {
        assert_eq!(offset_of!(cl_entity_t, baseline), 8);
        assert_eq!(offset_of!(cl_entity_t, prevstate), 348);
        assert_eq!(offset_of!(cl_entity_t, curstate), 688);
        assert_eq!(offset_of!(cl_entity_t, current_position), 1028);
        assert_eq!(offset_of!(cl_entity_t, ph), 1032);
        assert_eq!(offset_of!(cl_entity_t, mouth), 2824);
        assert_eq!(offset_of!(cl_entity_t, latched), 2832);
        assert_eq!(offset_of!(cl_entity_t, attachment), 2912);
        assert_eq!(offset_of!(cl_entity_t, trivial_accept), 2960);
    }

    #[test]
    #[cfg(target_pointer_width = "32")]
    fn test_client_records_exact_size_32() {
        assert_eq!(offset_of!(cl_entity_t, model), 2964);
        assert_eq!(size_of::<cl_entity_t>(), 3000, "cl_entity_t must be exactly 3000 bytes");
        assert_eq!(offset_of!(tempent_t, tentOffset), 56);
        assert_eq!(offset_of!(tempent_t, entity), 68);
        assert_eq!(size_of::<tempent_t>(), 3068);
        assert_eq!(offset_of!(ref_params_t, cmd), 200);
        assert_eq!(size_of::<ref_params_t>(), 232);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_client_records_layout_64() {
        assert_eq!(offset_of!(cl_entity_t, model), 2968);
        assert_eq!(size_of::<cl_entity_t>(), 3016);
        assert_eq!(offset_of!(ref_params_t, cmd), 200);
        assert_eq!(offset_of!(ref_params_t, viewport), 216);
        assert_eq!(size_of::<ref_params_t>(), 240);
    }

    #[test]
    fn test_cldll_func_slots() {
        let ptr = size_of::<*const c_void>();
        assert_eq!(cldll_func_t::SLOT_NAMES.len(), 43);
        assert_eq!(size_of::<cldll_func_t>(), 43 * ptr);
        assert_eq!(offset_of!(cldll_func_t, pInitFunc), 0);
        assert_eq!(offset_of!(cldll_func_t, pCalcRefdef), 19 * ptr);
        assert_eq!(offset_of!(cldll_func_t, pStudioInterface), 39 * ptr);
        assert_eq!(offset_of!(cldll_func_t, pClientFactory), 42 * ptr);
    }

    #[test]
    fn test_cl_enginefunc_slots() {
        let ptr = size_of::<*const c_void>();
        assert_eq!(
            size_of::<cl_enginefunc_t>(),
            cl_enginefunc_t::SLOT_NAMES.len() * ptr
        );
        assert_eq!(offset_of!(cl_enginefunc_t, pfnSPR_Load), 0);
        assert_eq!(offset_of!(cl_enginefunc_t, pTriAPI), 82 * ptr);
        assert_eq!(cl_enginefunc_t::SLOT_NAMES.last(), Some(&"pfnFilteredClientCmd"));
    }

    #[test]
    fn test_sub_api_pointers_count_as_slots() {
        let table = cl_enginefunc_t::default();
        assert!(table.unset_slots().contains(&"pTriAPI"));
        assert_eq!(table.unset_slots().len(), cl_enginefunc_t::SLOT_NAMES.len());
    }
}
