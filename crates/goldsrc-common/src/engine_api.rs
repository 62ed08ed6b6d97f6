// engine_api.rs — engine functions handed to the game DLL
// Mirrors enginefuncs_t from engine/eiface.h

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::{c_char, c_float, c_int, c_uchar, c_uint, c_ushort, c_void};

use crate::entity::{edict_t, entvars_t};
use crate::state::entity_state_t;
use crate::types::{
    byte, cvar_t, delta_s, qboolean, sentenceEntry_s, sequenceEntry_s, TraceResult, ALERT_TYPE,
    CRC32_t, FORCE_TYPE, PRINT_TYPE,
};

/// Encoder hook registered through `pfnDeltaAddEncoder`
pub type DeltaEncoderFn =
    Option<unsafe extern "C" fn(pFields: *mut delta_s, from: *const c_uchar, to: *const c_uchar)>;

/// Console command callback
pub type CommandFn = Option<unsafe extern "C" fn()>;

function_table! {
    /// Engine services the server game DLL may call
    pub struct enginefuncs_t {
        pub pfnPrecacheModel: Option<unsafe extern "C" fn(s: *mut c_char) -> c_int>,
        pub pfnPrecacheSound: Option<unsafe extern "C" fn(s: *mut c_char) -> c_int>,
        pub pfnSetModel: Option<unsafe extern "C" fn(e: *mut edict_t, m: *const c_char)>,
        pub pfnModelIndex: Option<unsafe extern "C" fn(m: *const c_char) -> c_int>,
        pub pfnModelFrames: Option<unsafe extern "C" fn(modelIndex: c_int) -> c_int>,
        pub pfnSetSize: Option<unsafe extern "C" fn(e: *mut edict_t, rgflMin: *const c_float, rgflMax: *const c_float)>,
        pub pfnChangeLevel: Option<unsafe extern "C" fn(s1: *mut c_char, s2: *mut c_char)>,
        pub pfnGetSpawnParms: Option<unsafe extern "C" fn(ent: *mut edict_t)>,
        pub pfnSaveSpawnParms: Option<unsafe extern "C" fn(ent: *mut edict_t)>,
        pub pfnVecToYaw: Option<unsafe extern "C" fn(rgflVector: *const c_float) -> c_float>,
        pub pfnVecToAngles: Option<unsafe extern "C" fn(rgflVectorIn: *const c_float, rgflVectorOut: *mut c_float)>,
        pub pfnMoveToOrigin: Option<
            unsafe extern "C" fn(ent: *mut edict_t, pflGoal: *const c_float, dist: c_float, iMoveType: c_int),
        >,
        pub pfnChangeYaw: Option<unsafe extern "C" fn(ent: *mut edict_t)>,
        pub pfnChangePitch: Option<unsafe extern "C" fn(ent: *mut edict_t)>,
        pub pfnFindEntityByString: Option<
            unsafe extern "C" fn(
                pEdictStartSearchAfter: *mut edict_t,
                pszField: *const c_char,
                pszValue: *const c_char,
            ) -> *mut edict_t,
        >,
        pub pfnGetEntityIllum: Option<unsafe extern "C" fn(pEnt: *mut edict_t) -> c_int>,
        pub pfnFindEntityInSphere: Option<
            unsafe extern "C" fn(pEdictStartSearchAfter: *mut edict_t, org: *const c_float, rad: c_float) -> *mut edict_t,
        >,
        pub pfnFindClientInPVS: Option<unsafe extern "C" fn(pEdict: *mut edict_t) -> *mut edict_t>,
        pub pfnEntitiesInPVS: Option<unsafe extern "C" fn(pplayer: *mut edict_t) -> *mut edict_t>,
        pub pfnMakeVectors: Option<unsafe extern "C" fn(rgflVector: *const c_float)>,
        pub pfnAngleVectors: Option<
            unsafe extern "C" fn(rgflVector: *const c_float, forward: *mut c_float, right: *mut c_float, up: *mut c_float),
        >,
        pub pfnCreateEntity: Option<unsafe extern "C" fn() -> *mut edict_t>,
        pub pfnRemoveEntity: Option<unsafe extern "C" fn(e: *mut edict_t)>,
        pub pfnCreateNamedEntity: Option<unsafe extern "C" fn(className: c_int) -> *mut edict_t>,
        pub pfnMakeStatic: Option<unsafe extern "C" fn(ent: *mut edict_t)>,
        pub pfnEntIsOnFloor: Option<unsafe extern "C" fn(e: *mut edict_t) -> c_int>,
        pub pfnDropToFloor: Option<unsafe extern "C" fn(e: *mut edict_t) -> c_int>,
        pub pfnWalkMove: Option<unsafe extern "C" fn(ent: *mut edict_t, yaw: c_float, dist: c_float, iMode: c_int) -> c_int>,
        pub pfnSetOrigin: Option<unsafe extern "C" fn(e: *mut edict_t, rgflOrigin: *const c_float)>,
        pub pfnEmitSound: Option<
            unsafe extern "C" fn(
                entity: *mut edict_t,
                channel: c_int,
                sample: *const c_char,
                volume: c_float,
                attenuation: c_float,
                fFlags: c_int,
                pitch: c_int,
            ),
        >,
        pub pfnEmitAmbientSound: Option<
            unsafe extern "C" fn(
                entity: *mut edict_t,
                pos: *mut c_float,
                samp: *const c_char,
                vol: c_float,
                attenuation: c_float,
                fFlags: c_int,
                pitch: c_int,
            ),
        >,
        pub pfnTraceLine: Option<
            unsafe extern "C" fn(
                v1: *const c_float,
                v2: *const c_float,
                fNoMonsters: c_int,
                pentToSkip: *mut edict_t,
                ptr: *mut TraceResult,
            ),
        >,
        pub pfnTraceToss: Option<unsafe extern "C" fn(pent: *mut edict_t, pentToIgnore: *mut edict_t, ptr: *mut TraceResult)>,
        pub pfnTraceMonsterHull: Option<
            unsafe extern "C" fn(
                pEdict: *mut edict_t,
                v1: *const c_float,
                v2: *const c_float,
                fNoMonsters: c_int,
                pentToSkip: *mut edict_t,
                ptr: *mut TraceResult,
            ) -> c_int,
        >,
        pub pfnTraceHull: Option<
            unsafe extern "C" fn(
                v1: *const c_float,
                v2: *const c_float,
                fNoMonsters: c_int,
                hullNumber: c_int,
                pentToSkip: *mut edict_t,
                ptr: *mut TraceResult,
            ),
        >,
        pub pfnTraceModel: Option<
            unsafe extern "C" fn(
                v1: *const c_float,
                v2: *const c_float,
                hullNumber: c_int,
                pent: *mut edict_t,
                ptr: *mut TraceResult,
            ),
        >,
        pub pfnTraceTexture: Option<
            unsafe extern "C" fn(pTextureEntity: *mut edict_t, v1: *const c_float, v2: *const c_float) -> *const c_char,
        >,
        pub pfnTraceSphere: Option<
            unsafe extern "C" fn(
                v1: *const c_float,
                v2: *const c_float,
                fNoMonsters: c_int,
                radius: c_float,
                pentToSkip: *mut edict_t,
                ptr: *mut TraceResult,
            ),
        >,
        pub pfnGetAimVector: Option<unsafe extern "C" fn(ent: *mut edict_t, speed: c_float, rgflReturn: *mut c_float)>,
        pub pfnServerCommand: Option<unsafe extern "C" fn(str: *mut c_char)>,
        pub pfnServerExecute: Option<unsafe extern "C" fn()>,
        pub pfnClientCommand: Option<unsafe extern "C" fn(pEdict: *mut edict_t, szFmt: *mut c_char, ...)>,
        pub pfnParticleEffect: Option<
            unsafe extern "C" fn(org: *const c_float, dir: *const c_float, color: c_float, count: c_float),
        >,
        pub pfnLightStyle: Option<unsafe extern "C" fn(style: c_int, val: *mut c_char)>,
        pub pfnDecalIndex: Option<unsafe extern "C" fn(name: *const c_char) -> c_int>,
        pub pfnPointContents: Option<unsafe extern "C" fn(rgflVector: *const c_float) -> c_int>,
        pub pfnMessageBegin: Option<
            unsafe extern "C" fn(msg_dest: c_int, msg_type: c_int, pOrigin: *const c_float, ed: *mut edict_t),
        >,
        pub pfnMessageEnd: Option<unsafe extern "C" fn()>,
        pub pfnWriteByte: Option<unsafe extern "C" fn(iValue: c_int)>,
        pub pfnWriteChar: Option<unsafe extern "C" fn(iValue: c_int)>,
        pub pfnWriteShort: Option<unsafe extern "C" fn(iValue: c_int)>,
        pub pfnWriteLong: Option<unsafe extern "C" fn(iValue: c_int)>,
        pub pfnWriteAngle: Option<unsafe extern "C" fn(flValue: c_float)>,
        pub pfnWriteCoord: Option<unsafe extern "C" fn(flValue: c_float)>,
        pub pfnWriteString: Option<unsafe extern "C" fn(sz: *const c_char)>,
        pub pfnWriteEntity: Option<unsafe extern "C" fn(iValue: c_int)>,
        pub pfnCVarRegister: Option<unsafe extern "C" fn(pCvar: *mut cvar_t)>,
        pub pfnCVarGetFloat: Option<unsafe extern "C" fn(szVarName: *const c_char) -> c_float>,
        pub pfnCVarGetString: Option<unsafe extern "C" fn(szVarName: *const c_char) -> *const c_char>,
        pub pfnCVarSetFloat: Option<unsafe extern "C" fn(szVarName: *const c_char, flValue: c_float)>,
        pub pfnCVarSetString: Option<unsafe extern "C" fn(szVarName: *const c_char, szValue: *const c_char)>,
        pub pfnAlertMessage: Option<unsafe extern "C" fn(atype: ALERT_TYPE, szFmt: *mut c_char, ...)>,
        pub pfnEngineFprintf: Option<unsafe extern "C" fn(pfile: *mut c_void, szFmt: *mut c_char, ...)>,
        pub pfnPvAllocEntPrivateData: Option<unsafe extern "C" fn(pEdict: *mut edict_t, cb: i32) -> *mut c_void>,
        pub pfnPvEntPrivateData: Option<unsafe extern "C" fn(pEdict: *mut edict_t) -> *mut c_void>,
        pub pfnFreeEntPrivateData: Option<unsafe extern "C" fn(pEdict: *mut edict_t)>,
        pub pfnSzFromIndex: Option<unsafe extern "C" fn(iString: c_int) -> *const c_char>,
        pub pfnAllocString: Option<unsafe extern "C" fn(szValue: *const c_char) -> c_int>,
        pub pfnGetVarsOfEnt: Option<unsafe extern "C" fn(pEdict: *mut edict_t) -> *mut entvars_t>,
        pub pfnPEntityOfEntOffset: Option<unsafe extern "C" fn(iEntOffset: c_int) -> *mut edict_t>,
        pub pfnEntOffsetOfPEntity: Option<unsafe extern "C" fn(pEdict: *const edict_t) -> c_int>,
        pub pfnIndexOfEdict: Option<unsafe extern "C" fn(pEdict: *const edict_t) -> c_int>,
        pub pfnPEntityOfEntIndex: Option<unsafe extern "C" fn(iEntIndex: c_int) -> *mut edict_t>,
        pub pfnFindEntityByVars: Option<unsafe extern "C" fn(pvars: *mut entvars_t) -> *mut edict_t>,
        pub pfnGetModelPtr: Option<unsafe extern "C" fn(pEdict: *mut edict_t) -> *mut c_void>,
        pub pfnRegUserMsg: Option<unsafe extern "C" fn(pszName: *const c_char, iSize: c_int) -> c_int>,
        pub pfnAnimationAutomove: Option<unsafe extern "C" fn(pEdict: *const edict_t, flTime: c_float)>,
        pub pfnGetBonePosition: Option<
            unsafe extern "C" fn(pEdict: *const edict_t, iBone: c_int, rgflOrigin: *mut c_float, rgflAngles: *mut c_float),
        >,
        pub pfnFunctionFromName: Option<unsafe extern "C" fn(pName: *const c_char) -> u32>,
        pub pfnNameForFunction: Option<unsafe extern "C" fn(function: u32) -> *const c_char>,
        pub pfnClientPrintf: Option<unsafe extern "C" fn(pEdict: *mut edict_t, ptype: PRINT_TYPE, szMsg: *const c_char)>,
        pub pfnServerPrint: Option<unsafe extern "C" fn(szMsg: *const c_char)>,
        pub pfnCmd_Args: Option<unsafe extern "C" fn() -> *const c_char>,
        pub pfnCmd_Argv: Option<unsafe extern "C" fn(argc: c_int) -> *const c_char>,
        pub pfnCmd_Argc: Option<unsafe extern "C" fn() -> c_int>,
        pub pfnGetAttachment: Option<
            unsafe extern "C" fn(pEdict: *const edict_t, iAttachment: c_int, rgflOrigin: *mut c_float, rgflAngles: *mut c_float),
        >,
        pub pfnCRC32_Init: Option<unsafe extern "C" fn(pulCRC: *mut CRC32_t)>,
        pub pfnCRC32_ProcessBuffer: Option<unsafe extern "C" fn(pulCRC: *mut CRC32_t, p: *mut c_void, len: c_int)>,
        pub pfnCRC32_ProcessByte: Option<unsafe extern "C" fn(pulCRC: *mut CRC32_t, ch: c_uchar)>,
        pub pfnCRC32_Final: Option<unsafe extern "C" fn(pulCRC: CRC32_t) -> CRC32_t>,
        pub pfnRandomLong: Option<unsafe extern "C" fn(lLow: i32, lHigh: i32) -> i32>,
        pub pfnRandomFloat: Option<unsafe extern "C" fn(flLow: c_float, flHigh: c_float) -> c_float>,
        pub pfnSetView: Option<unsafe extern "C" fn(pClient: *const edict_t, pViewent: *const edict_t)>,
        pub pfnTime: Option<unsafe extern "C" fn() -> c_float>,
        pub pfnCrosshairAngle: Option<unsafe extern "C" fn(pClient: *const edict_t, pitch: c_float, yaw: c_float)>,
        pub pfnLoadFileForMe: Option<unsafe extern "C" fn(filename: *mut c_char, pLength: *mut c_int) -> *mut byte>,
        pub pfnFreeFile: Option<unsafe extern "C" fn(buffer: *mut c_void)>,
        pub pfnEndSection: Option<unsafe extern "C" fn(pszSectionName: *const c_char)>,
        pub pfnCompareFileTime: Option<
            unsafe extern "C" fn(filename1: *mut c_char, filename2: *mut c_char, iCompare: *mut c_int) -> c_int,
        >,
        pub pfnGetGameDir: Option<unsafe extern "C" fn(szGetGameDir: *mut c_char)>,
        pub pfnCvar_RegisterVariable: Option<unsafe extern "C" fn(variable: *mut cvar_t)>,
        pub pfnFadeClientVolume: Option<
            unsafe extern "C" fn(
                pEdict: *const edict_t,
                fadePercent: c_int,
                fadeOutSeconds: c_int,
                holdTime: c_int,
                fadeInSeconds: c_int,
            ),
        >,
        pub pfnSetClientMaxspeed: Option<unsafe extern "C" fn(pEdict: *const edict_t, fNewMaxspeed: c_float)>,
        pub pfnCreateFakeClient: Option<unsafe extern "C" fn(netname: *const c_char) -> *mut edict_t>,
        pub pfnRunPlayerMove: Option<
            unsafe extern "C" fn(
                fakeclient: *mut edict_t,
                viewangles: *const c_float,
                forwardmove: c_float,
                sidemove: c_float,
                upmove: c_float,
                buttons: c_ushort,
                impulse: byte,
                msec: byte,
            ),
        >,
        pub pfnNumberOfEntities: Option<unsafe extern "C" fn() -> c_int>,
        pub pfnGetInfoKeyBuffer: Option<unsafe extern "C" fn(e: *mut edict_t) -> *mut c_char>,
        pub pfnInfoKeyValue: Option<unsafe extern "C" fn(infobuffer: *mut c_char, key: *mut c_char) -> *mut c_char>,
        pub pfnSetKeyValue: Option<unsafe extern "C" fn(infobuffer: *mut c_char, key: *mut c_char, value: *mut c_char)>,
        pub pfnSetClientKeyValue: Option<
            unsafe extern "C" fn(clientIndex: c_int, infobuffer: *mut c_char, key: *mut c_char, value: *mut c_char),
        >,
        pub pfnIsMapValid: Option<unsafe extern "C" fn(filename: *mut c_char) -> c_int>,
        pub pfnStaticDecal: Option<
            unsafe extern "C" fn(origin: *const c_float, decalIndex: c_int, entityIndex: c_int, modelIndex: c_int),
        >,
        pub pfnPrecacheGeneric: Option<unsafe extern "C" fn(s: *mut c_char) -> c_int>,
        pub pfnGetPlayerUserId: Option<unsafe extern "C" fn(e: *mut edict_t) -> c_int>,
        pub pfnBuildSoundMsg: Option<
            unsafe extern "C" fn(
                entity: *mut edict_t,
                channel: c_int,
                sample: *const c_char,
                volume: c_float,
                attenuation: c_float,
                fFlags: c_int,
                pitch: c_int,
                msg_dest: c_int,
                msg_type: c_int,
                pOrigin: *const c_float,
                ed: *mut edict_t,
            ),
        >,
        pub pfnIsDedicatedServer: Option<unsafe extern "C" fn() -> c_int>,
        pub pfnCVarGetPointer: Option<unsafe extern "C" fn(szVarName: *const c_char) -> *mut cvar_t>,
        pub pfnGetPlayerWONId: Option<unsafe extern "C" fn(e: *mut edict_t) -> c_uint>,
        pub pfnInfo_RemoveKey: Option<unsafe extern "C" fn(s: *mut c_char, key: *const c_char)>,
        pub pfnGetPhysicsKeyValue: Option<unsafe extern "C" fn(pClient: *const edict_t, key: *const c_char) -> *const c_char>,
        pub pfnSetPhysicsKeyValue: Option<
            unsafe extern "C" fn(pClient: *const edict_t, key: *const c_char, value: *const c_char),
        >,
        pub pfnGetPhysicsInfoString: Option<unsafe extern "C" fn(pClient: *const edict_t) -> *const c_char>,
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
        pub pfnSetFatPVS: Option<unsafe extern "C" fn(org: *mut c_float) -> *mut c_uchar>,
        pub pfnSetFatPAS: Option<unsafe extern "C" fn(org: *mut c_float) -> *mut c_uchar>,
        pub pfnCheckVisibility: Option<unsafe extern "C" fn(entity: *const edict_t, pset: *mut c_uchar) -> c_int>,
        pub pfnDeltaSetField: Option<unsafe extern "C" fn(pFields: *mut delta_s, fieldname: *const c_char)>,
        pub pfnDeltaUnsetField: Option<unsafe extern "C" fn(pFields: *mut delta_s, fieldname: *const c_char)>,
        pub pfnDeltaAddEncoder: Option<unsafe extern "C" fn(name: *mut c_char, conditionalencode: DeltaEncoderFn)>,
        pub pfnGetCurrentPlayer: Option<unsafe extern "C" fn() -> c_int>,
        pub pfnCanSkipPlayer: Option<unsafe extern "C" fn(player: *const edict_t) -> c_int>,
        pub pfnDeltaFindField: Option<unsafe extern "C" fn(pFields: *mut delta_s, fieldname: *const c_char) -> c_int>,
        pub pfnDeltaSetFieldByIndex: Option<unsafe extern "C" fn(pFields: *mut delta_s, fieldNumber: c_int)>,
        pub pfnDeltaUnsetFieldByIndex: Option<unsafe extern "C" fn(pFields: *mut delta_s, fieldNumber: c_int)>,
        pub pfnSetGroupMask: Option<unsafe extern "C" fn(mask: c_int, op: c_int)>,
        pub pfnCreateInstancedBaseline: Option<unsafe extern "C" fn(classname: c_int, baseline: *mut entity_state_t) -> c_int>,
        pub pfnCvar_DirectSet: Option<unsafe extern "C" fn(var: *mut cvar_t, value: *mut c_char)>,
        pub pfnForceUnmodified: Option<
            unsafe extern "C" fn(r#type: FORCE_TYPE, mins: *mut c_float, maxs: *mut c_float, filename: *const c_char),
        >,
        pub pfnGetPlayerStats: Option<unsafe extern "C" fn(pClient: *const edict_t, ping: *mut c_int, packet_loss: *mut c_int)>,
        pub pfnAddServerCommand: Option<unsafe extern "C" fn(cmd_name: *mut c_char, function: CommandFn)>,
        pub pfnVoice_GetClientListening: Option<unsafe extern "C" fn(iReceiver: c_int, iSender: c_int) -> qboolean>,
        pub pfnVoice_SetClientListening: Option<
            unsafe extern "C" fn(iReceiver: c_int, iSender: c_int, bListen: qboolean) -> qboolean,
        >,
        pub pfnGetPlayerAuthId: Option<unsafe extern "C" fn(e: *mut edict_t) -> *const c_char>,
        pub pfnSequenceGet: Option<
            unsafe extern "C" fn(fileName: *const c_char, entryName: *const c_char) -> *mut sequenceEntry_s,
        >,
        pub pfnSequencePickSentence: Option<
            unsafe extern "C" fn(groupName: *const c_char, pickMethod: c_int, picked: *mut c_int) -> *mut sentenceEntry_s,
        >,
        pub pfnGetFileSize: Option<unsafe extern "C" fn(filename: *mut c_char) -> c_int>,
        pub pfnGetApproxWavePlayLen: Option<unsafe extern "C" fn(filepath: *const c_char) -> c_uint>,
        pub pfnIsCareerMatch: Option<unsafe extern "C" fn() -> c_int>,
        pub pfnGetLocalizedStringLength: Option<unsafe extern "C" fn(label: *const c_char) -> c_int>,
        pub pfnRegisterTutorMessageShown: Option<unsafe extern "C" fn(mid: c_int)>,
        pub pfnGetTimesTutorMessageShown: Option<unsafe extern "C" fn(mid: c_int) -> c_int>,
        pub ProcessTutorMessageDecayBuffer: Option<unsafe extern "C" fn(buffer: *mut c_int, bufferLength: c_int)>,
        pub ConstructTutorMessageDecayBuffer: Option<unsafe extern "C" fn(buffer: *mut c_int, bufferLength: c_int)>,
        pub ResetTutorMessageDecayData: Option<unsafe extern "C" fn()>,
        pub pfnQueryClientCvarValue: Option<unsafe extern "C" fn(player: *const edict_t, cvarName: *const c_char)>,
        pub pfnQueryClientCvarValue2: Option<
            unsafe extern "C" fn(player: *const edict_t, cvarName: *const c_char, requestID: c_int),
        >,
        pub pfnCheckParm: Option<unsafe extern "C" fn(pchCmdLineToken: *const c_char, ppnext: *mut *mut c_char) -> c_int>,
    }
}

const _: () = {
    use std::mem::size_of;
    assert!(size_of::<enginefuncs_t>() % size_of::<usize>() == 0);
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn test_enginefuncs_slot_count() {
        assert_eq!(enginefuncs_t::SLOT_NAMES.len(), 158);
        assert_eq!(
            size_of::<enginefuncs_t>(),
            enginefuncs_t::SLOT_NAMES.len() * size_of::<*const c_void>()
        );
    }

    #[test]
    fn test_enginefuncs_slot_order() {
        let ptr = size_of::<*const c_void>();
        assert_eq!(offset_of!(enginefuncs_t, pfnPrecacheModel), 0);
        assert_eq!(offset_of!(enginefuncs_t, pfnClientCommand), 41 * ptr);
        assert_eq!(offset_of!(enginefuncs_t, pfnAlertMessage), 61 * ptr);
        assert_eq!(offset_of!(enginefuncs_t, pfnCheckParm), 157 * ptr);
        assert_eq!(enginefuncs_t::SLOT_NAMES[157], "pfnCheckParm");
    }
}
