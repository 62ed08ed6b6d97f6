// slots.rs — the slot lists of every exported function table
//
// Each list names a table slot, the trait method behind it, the native
// parameter list and the value returned when no implementation can answer.
// The generator macros below turn one list into the capability trait, the
// trampolines, the table filler and the legacy forwarding methods, so the
// four can never disagree on a signature.
//
// Client slots also carry the symbol a legacy client exports them under.

/// Types named by the slot lists; every module that expands a list glob
/// imports this.
pub mod abi {
    pub use std::os::raw::{c_char, c_double, c_float, c_int, c_uchar, c_uint, c_void};
    pub use std::ptr::{null, null_mut};

    pub use goldsrc_common::client_api::{
        cl_entity_t, cl_enginefunc_t, client_data_t, kbutton_t, ref_params_t, tempent_t,
        AddVisibleEntityFn, TempEntPlaySoundFn,
    };
    pub use goldsrc_common::entity::edict_t;
    pub use goldsrc_common::pmove::playermove_t;
    pub use goldsrc_common::state::{clientdata_t, entity_state_t, local_state_t, usercmd_t, weapon_data_t};
    pub use goldsrc_common::studio::{engine_studio_api_t, mstudioevent_t, r_studio_interface_t};
    pub use goldsrc_common::types::{
        customization_t, netadr_t, qboolean, KeyValueData, SAVERESTOREDATA, TYPEDESCRIPTION,
    };
}

// ============================================================
// Slot lists
// ============================================================

macro_rules! dll_function_slots {
    ($gen:ident { $($extra:tt)* }) => {
        $gen! {
            { $($extra)* }
            table: DLL_FUNCTIONS, exports: ServerExports, dispatch: dispatch_server,
            fill: fill_dll_functions, build: dll_functions;

            pfnGameInit => fn game_init() -> () = ();
            pfnSpawn => fn spawn(pent: *mut edict_t) -> c_int = 0;
            pfnThink => fn think(pent: *mut edict_t) -> () = ();
            pfnUse => fn use_entity(used: *mut edict_t, other: *mut edict_t) -> () = ();
            pfnTouch => fn touch(touched: *mut edict_t, other: *mut edict_t) -> () = ();
            pfnBlocked => fn blocked(blocked: *mut edict_t, other: *mut edict_t) -> () = ();
            pfnKeyValue => fn key_value(pent: *mut edict_t, pkvd: *mut KeyValueData) -> () = ();
            pfnSave => fn save(pent: *mut edict_t, save_data: *mut SAVERESTOREDATA) -> () = ();
            pfnRestore => fn restore(pent: *mut edict_t, save_data: *mut SAVERESTOREDATA, global_entity: c_int) -> c_int = 0;
            pfnSetAbsBox => fn set_abs_box(pent: *mut edict_t) -> () = ();
            pfnSaveWriteFields => fn save_write_fields(
                save_data: *mut SAVERESTOREDATA,
                name: *const c_char,
                base_data: *mut c_void,
                fields: *mut TYPEDESCRIPTION,
                field_count: c_int
            ) -> () = ();
            pfnSaveReadFields => fn save_read_fields(
                save_data: *mut SAVERESTOREDATA,
                name: *const c_char,
                base_data: *mut c_void,
                fields: *mut TYPEDESCRIPTION,
                field_count: c_int
            ) -> () = ();
            pfnSaveGlobalState => fn save_global_state(save_data: *mut SAVERESTOREDATA) -> () = ();
            pfnRestoreGlobalState => fn restore_global_state(save_data: *mut SAVERESTOREDATA) -> () = ();
            pfnResetGlobalState => fn reset_global_state() -> () = ();
            pfnClientConnect => fn client_connect(
                entity: *mut edict_t,
                name: *const c_char,
                address: *const c_char,
                reject_reason: *mut c_char
            ) -> qboolean = 0;
            pfnClientDisconnect => fn client_disconnect(entity: *mut edict_t) -> () = ();
            pfnClientKill => fn client_kill(entity: *mut edict_t) -> () = ();
            pfnClientPutInServer => fn client_put_in_server(entity: *mut edict_t) -> () = ();
            pfnClientCommand => fn client_command(entity: *mut edict_t) -> () = ();
            pfnClientUserInfoChanged => fn client_user_info_changed(entity: *mut edict_t, infobuffer: *mut c_char) -> () = ();
            pfnServerActivate => fn server_activate(edict_list: *mut edict_t, edict_count: c_int, client_max: c_int) -> () = ();
            pfnServerDeactivate => fn server_deactivate() -> () = ();
            pfnPlayerPreThink => fn player_pre_think(entity: *mut edict_t) -> () = ();
            pfnPlayerPostThink => fn player_post_think(entity: *mut edict_t) -> () = ();
            pfnStartFrame => fn start_frame() -> () = ();
            pfnParmsNewLevel => fn parms_new_level() -> () = ();
            pfnParmsChangeLevel => fn parms_change_level() -> () = ();
            pfnGetGameDescription => fn get_game_description() -> *const c_char = null();
            pfnPlayerCustomization => fn player_customization(entity: *mut edict_t, custom: *mut customization_t) -> () = ();
            pfnSpectatorConnect => fn spectator_connect(entity: *mut edict_t) -> () = ();
            pfnSpectatorDisconnect => fn spectator_disconnect(entity: *mut edict_t) -> () = ();
            pfnSpectatorThink => fn spectator_think(entity: *mut edict_t) -> () = ();
            pfnSys_Error => fn sys_error(error_string: *const c_char) -> () = ();
            pfnPM_Move => fn pm_move(ppmove: *mut playermove_t, server: qboolean) -> () = ();
            pfnPM_Init => fn pm_init(ppmove: *mut playermove_t) -> () = ();
            pfnPM_FindTextureType => fn pm_find_texture_type(name: *mut c_char) -> c_char = 0;
            pfnSetupVisibility => fn setup_visibility(
                view_entity: *mut edict_t,
                client: *mut edict_t,
                pvs: *mut *mut c_uchar,
                pas: *mut *mut c_uchar
            ) -> () = ();
            pfnUpdateClientData => fn update_client_data(ent: *const edict_t, sendweapons: c_int, cd: *mut clientdata_t) -> () = ();
            pfnAddToFullPack => fn add_to_full_pack(
                state: *mut entity_state_t,
                e: c_int,
                ent: *mut edict_t,
                host: *mut edict_t,
                hostflags: c_int,
                player: c_int,
                set: *mut c_uchar
            ) -> c_int = 0;
            pfnCreateBaseline => fn create_baseline(
                player: c_int,
                eindex: c_int,
                baseline: *mut entity_state_t,
                entity: *mut edict_t,
                playermodelindex: c_int,
                player_mins: *mut c_float,
                player_maxs: *mut c_float
            ) -> () = ();
            pfnRegisterEncoders => fn register_encoders() -> () = ();
            pfnGetWeaponData => fn get_weapon_data(player: *mut edict_t, info: *mut weapon_data_t) -> c_int = 0;
            pfnCmdStart => fn cmd_start(player: *const edict_t, cmd: *const usercmd_t, random_seed: c_uint) -> () = ();
            pfnCmdEnd => fn cmd_end(player: *const edict_t) -> () = ();
            pfnConnectionlessPacket => fn connectionless_packet(
                net_from: *const netadr_t,
                args: *const c_char,
                response_buffer: *mut c_char,
                response_buffer_size: *mut c_int
            ) -> c_int = 0;
            pfnGetHullBounds => fn get_hull_bounds(hullnumber: c_int, mins: *mut c_float, maxs: *mut c_float) -> c_int = 0;
            pfnCreateInstancedBaselines => fn create_instanced_baselines() -> () = ();
            pfnInconsistentFile => fn inconsistent_file(
                player: *const edict_t,
                filename: *const c_char,
                disconnect_message: *mut c_char
            ) -> c_int = 0;
            pfnAllowLagCompensation => fn allow_lag_compensation() -> c_int = 0;
        }
    };
}

macro_rules! new_dll_function_slots {
    ($gen:ident { $($extra:tt)* }) => {
        $gen! {
            { $($extra)* }
            table: NEW_DLL_FUNCTIONS, exports: NewServerExports, dispatch: dispatch_server,
            fill: fill_new_dll_functions, build: new_dll_functions;

            pfnOnFreeEntPrivateData => fn on_free_ent_private_data(ent: *mut edict_t) -> () = ();
            pfnGameShutdown => fn game_shutdown() -> () = ();
            // 1 lets the engine collide the pair normally
            pfnShouldCollide => fn should_collide(touched: *mut edict_t, other: *mut edict_t) -> c_int = 1;
            pfnCvarValue => fn cvar_value(ent: *const edict_t, value: *const c_char) -> () = ();
            pfnCvarValue2 => fn cvar_value2(
                ent: *const edict_t,
                request_id: c_int,
                cvar_name: *const c_char,
                value: *const c_char
            ) -> () = ();
        }
    };
}

macro_rules! client_function_slots {
    ($gen:ident { $($extra:tt)* }) => {
        $gen! {
            { $($extra)* }
            table: cldll_func_t, exports: GameClient, dispatch: dispatch_client,
            fill: fill_client_funcs, build: client_funcs;

            pInitFunc ["Initialize"] => fn initialize(engine_funcs: *mut cl_enginefunc_t, version: c_int) -> c_int = 0;
            pHudInitFunc ["HUD_Init"] => fn hud_init() -> () = ();
            pHudVidInitFunc ["HUD_VidInit"] => fn hud_vid_init() -> c_int = 0;
            pHudRedrawFunc ["HUD_Redraw"] => fn hud_redraw(time: c_float, intermission: c_int) -> c_int = 0;
            pHudUpdateClientDataFunc ["HUD_UpdateClientData"] => fn hud_update_client_data(cldata: *mut client_data_t, time: c_float) -> c_int = 0;
            pHudResetFunc ["HUD_Reset"] => fn hud_reset() -> () = ();
            pClientMove ["HUD_PlayerMove"] => fn hud_player_move(ppmove: *mut playermove_t, server: qboolean) -> () = ();
            pClientMoveInit ["HUD_PlayerMoveInit"] => fn hud_player_move_init(ppmove: *mut playermove_t) -> () = ();
            pClientTextureType ["HUD_PlayerMoveTexture"] => fn hud_player_move_texture(name: *mut c_char) -> c_char = 0;
            pIN_ActivateMouse ["IN_ActivateMouse"] => fn in_activate_mouse() -> () = ();
            pIN_DeactivateMouse ["IN_DeactivateMouse"] => fn in_deactivate_mouse() -> () = ();
            pIN_MouseEvent ["IN_MouseEvent"] => fn in_mouse_event(mstate: c_int) -> () = ();
            pIN_ClearStates ["IN_ClearStates"] => fn in_clear_states() -> () = ();
            pIN_Accumulate ["IN_Accumulate"] => fn in_accumulate() -> () = ();
            pCL_CreateMove ["CL_CreateMove"] => fn cl_create_move(frametime: c_float, cmd: *mut usercmd_t, active: c_int) -> () = ();
            pCL_IsThirdPerson ["CL_IsThirdPerson"] => fn cl_is_third_person() -> c_int = 0;
            pCL_GetCameraOffsets ["CL_CameraOffset"] => fn cl_camera_offset(ofs: *mut c_float) -> () = ();
            pFindKey ["KB_Find"] => fn kb_find(name: *const c_char) -> *mut kbutton_t = null_mut();
            pCamThink ["CAM_Think"] => fn cam_think() -> () = ();
            pCalcRefdef ["V_CalcRefdef"] => fn v_calc_refdef(pparams: *mut ref_params_t) -> () = ();
            pAddEntity ["HUD_AddEntity"] => fn hud_add_entity(kind: c_int, ent: *mut cl_entity_t, modelname: *const c_char) -> c_int = 0;
            pCreateEntities ["HUD_CreateEntities"] => fn hud_create_entities() -> () = ();
            pDrawNormalTriangles ["HUD_DrawNormalTriangles"] => fn hud_draw_normal_triangles() -> () = ();
            pDrawTransparentTriangles ["HUD_DrawTransparentTriangles"] => fn hud_draw_transparent_triangles() -> () = ();
            pStudioEvent ["HUD_StudioEvent"] => fn hud_studio_event(event: *const mstudioevent_t, entity: *const cl_entity_t) -> () = ();
            pPostRunCmd ["HUD_PostRunCmd"] => fn hud_post_run_cmd(
                from: *mut local_state_t,
                to: *mut local_state_t,
                cmd: *mut usercmd_t,
                runfuncs: c_int,
                time: c_double,
                random_seed: c_uint
            ) -> () = ();
            pShutdown ["HUD_Shutdown"] => fn hud_shutdown() -> () = ();
            pTxferLocalOverrides ["HUD_TxferLocalOverrides"] => fn hud_txfer_local_overrides(
                state: *mut entity_state_t,
                client: *const clientdata_t
            ) -> () = ();
            pProcessPlayerState ["HUD_ProcessPlayerState"] => fn hud_process_player_state(
                dst: *mut entity_state_t,
                src: *const entity_state_t
            ) -> () = ();
            pTxferPredictionData ["HUD_TxferPredictionData"] => fn hud_txfer_prediction_data(
                ps: *mut entity_state_t,
                pps: *const entity_state_t,
                pcd: *mut clientdata_t,
                ppcd: *const clientdata_t,
                wd: *mut weapon_data_t,
                pwd: *const weapon_data_t
            ) -> () = ();
            pReadDemoBuffer ["Demo_ReadBuffer"] => fn demo_read_buffer(size: c_int, buffer: *mut c_uchar) -> () = ();
            pConnectionlessPacket ["HUD_ConnectionlessPacket"] => fn hud_connectionless_packet(
                net_from: *const netadr_t,
                args: *const c_char,
                response_buffer: *mut c_char,
                response_buffer_size: *mut c_int
            ) -> c_int = 0;
            pGetHullBounds ["HUD_GetHullBounds"] => fn hud_get_hull_bounds(hullnumber: c_int, mins: *mut c_float, maxs: *mut c_float) -> c_int = 0;
            pHudFrame ["HUD_Frame"] => fn hud_frame(time: c_double) -> () = ();
            // 1 hands the key on to the engine
            pKeyEvent ["HUD_Key_Event"] => fn hud_key_event(eventcode: c_int, keynum: c_int, current_binding: *const c_char) -> c_int = 1;
            pTempEntUpdate ["HUD_TempEntUpdate"] => fn hud_temp_ent_update(
                frametime: c_double,
                client_time: c_double,
                cl_gravity: c_double,
                temp_ent_free: *mut *mut tempent_t,
                temp_ent_active: *mut *mut tempent_t,
                add_visible_entity: AddVisibleEntityFn,
                temp_ent_play_sound: TempEntPlaySoundFn
            ) -> () = ();
            pGetUserEntity ["HUD_GetUserEntity"] => fn hud_get_user_entity(index: c_int) -> *mut cl_entity_t = null_mut();
            pVoiceStatus ["HUD_VoiceStatus"] => fn hud_voice_status(entindex: c_int, talking: qboolean) -> () = ();
            pDirectorMessage ["HUD_DirectorMessage"] => fn hud_director_message(size: c_int, buf: *mut c_void) -> () = ();
            pStudioInterface ["HUD_GetStudioModelInterface"] => fn hud_get_studio_model_interface(
                version: c_int,
                ppinterface: *mut *mut r_studio_interface_t,
                pstudio: *mut engine_studio_api_t
            ) -> c_int = 0;
            pChatInputPosition ["HUD_ChatInputPosition"] => fn hud_chat_input_position(x: *mut c_int, y: *mut c_int) -> () = ();
            pGetPlayerTeam ["HUD_GetPlayerTeam"] => fn hud_get_player_team(iplayer: c_int) -> c_int = 0;
            pClientFactory ["ClientFactory"] => fn client_factory() -> *mut c_void = null_mut();
        }
    };
}

// ============================================================
// Generators
// ============================================================

/// Capability trait with one method per slot. A method that is not
/// overridden forwards to `$base()`, or returns the slot's fallback value
/// when there is no base.
macro_rules! export_trait {
    (
        { $base:ident; $(#[$meta:meta])* }
        table: $table:ident, exports: $trait:ident, dispatch: $dispatch:ident,
        fill: $fill:ident, build: $build:ident;
        $( $(#[$smeta:meta])* $slot:ident $([$symbol:literal])? => fn $method:ident ( $($arg:ident : $ty:ty),* $(,)? ) -> $ret:ty = $default:expr; )*
    ) => {
        $(#[$meta])*
        pub trait $trait {
            /// Implementation that every method not overridden here forwards
            /// to, usually the legacy module. Must not return `self`.
            fn $base(&self) -> Option<&dyn $trait> {
                None
            }

            $(
                #[doc = concat!("`", stringify!($table), "::", stringify!($slot), "`")]
                unsafe fn $method(&self, $($arg: $ty),*) -> $ret {
                    match self.$base() {
                        Some(base) => base.$method($($arg),*),
                        None => $default,
                    }
                }
            )*
        }
    };
}

/// One `extern "C"` trampoline per slot plus the filler that installs them.
macro_rules! export_trampolines {
    (
        { }
        table: $table:ident, exports: $trait:ident, dispatch: $dispatch:ident,
        fill: $fill:ident, build: $build:ident;
        $( $(#[$smeta:meta])* $slot:ident $([$symbol:literal])? => fn $method:ident ( $($arg:ident : $ty:ty),* $(,)? ) -> $ret:ty = $default:expr; )*
    ) => {
        $(
            unsafe extern "C" fn $slot($($arg: $ty),*) -> $ret {
                $dispatch(stringify!($slot), $default, move |imp| imp.$method($($arg),*))
            }
        )*

        #[doc = concat!("Write a trampoline into every slot of `", stringify!($table), "`.")]
        pub fn $fill(table: &mut $table) {
            *table = $build();
        }

        #[doc = concat!("A `", stringify!($table), "` with every slot wired to its trampoline.")]
        pub fn $build() -> $table {
            $table {
                $( $slot: Some($slot), )*
            }
        }
    };
}

/// Trait methods that call straight through a native table held in
/// `self.$field`. A null slot answers with the fallback value.
macro_rules! forward_to_table {
    (
        { $field:ident }
        table: $table:ident, exports: $trait:ident, dispatch: $dispatch:ident,
        fill: $fill:ident, build: $build:ident;
        $( $(#[$smeta:meta])* $slot:ident $([$symbol:literal])? => fn $method:ident ( $($arg:ident : $ty:ty),* $(,)? ) -> $ret:ty = $default:expr; )*
    ) => {
        $(
            unsafe fn $method(&self, $($arg: $ty),*) -> $ret {
                match self.$field.$slot {
                    Some(f) => f($($arg),*),
                    None => $default,
                }
            }
        )*
    };
}

/// `(slot, exported symbol)` pairs of a list that carries symbols
macro_rules! export_symbol_table {
    (
        { $name:ident }
        table: $table:ident, exports: $trait:ident, dispatch: $dispatch:ident,
        fill: $fill:ident, build: $build:ident;
        $( $(#[$smeta:meta])* $slot:ident [$symbol:literal] => fn $method:ident ( $($arg:ident : $ty:ty),* $(,)? ) -> $ret:ty = $default:expr; )*
    ) => {
        pub const $name: &[(&str, &str)] = &[ $( (stringify!($slot), $symbol), )* ];
    };
}

/// Fill a table by looking each slot up under its exported symbol
macro_rules! resolve_by_symbol {
    (
        { $module:ident, $table_var:ident }
        table: $table:ident, exports: $trait:ident, dispatch: $dispatch:ident,
        fill: $fill:ident, build: $build:ident;
        $( $(#[$smeta:meta])* $slot:ident [$symbol:literal] => fn $method:ident ( $($arg:ident : $ty:ty),* $(,)? ) -> $ret:ty = $default:expr; )*
    ) => {
        $( $table_var.$slot = $module.function($symbol); )*
    };
}
