// entity.rs — per-class private data allocators
//
// The engine creates an entity by looking up an export named after its
// class and calling it with the new entity's `entvars_t`. The shim exports
// every class the legacy game registers and routes each one to the
// allocator resolved here.

use std::collections::HashMap;
use std::ffi::{c_void, CString};
use std::sync::Arc;

use goldsrc_common::entity::entvars_t;
use goldsrc_common::server_api::PrivateDataAllocator;

use crate::binder::ShimContext;
use crate::module::ExportLookup;
use crate::server::GameServer;

/// Expands `$callback! { class, class, ... }` over every entity class the
/// legacy game module registers with `LINK_ENTITY_TO_CLASS`.
#[macro_export]
macro_rules! legacy_entity_classes {
    ($callback:ident) => {
        $callback! {
            monster_flyer, monster_flyer_flock, monster_alien_grunt, item_airtank,
            monster_apache, hvr_rocket, monster_barnacle, monster_barney,
            monster_barney_dead, info_bigmomma, bmortar, monster_bigmomma,
            monster_bloater, func_wall, func_wall_toggle, func_conveyor,
            func_illusionary, func_monsterclip, func_rotating, func_pendulum,
            squidspit, monster_bullchicken, env_global, multisource,
            func_button, func_rot_button, momentary_rot_button, env_spark,
            env_debris, button_target, monster_alien_controller, controller_head_ball,
            controller_energy_ball, crossbow_bolt, weapon_crossbow, ammo_crossbow,
            weapon_crowbar, func_door, func_water, func_door_rotating,
            momentary_door, info_target, env_bubbles, beam,
            trip_beam, env_lightning, env_beam, env_laser,
            env_glow, env_sprite, gibshooter, env_shooter,
            test_effect, env_blood, env_shake, env_fade,
            env_message, env_funnel, env_beverage, item_sodacan,
            weapon_egon, ammo_egonclip, spark_shower, env_explosion,
            func_breakable, func_pushable, func_tank, func_tanklaser,
            func_tankrocket, func_tankmortar, func_tankcontrols, streak_spiral,
            garg_stomp, monster_gargantua, env_smoker, weapon_gauss,
            ammo_gaussclip, monster_generic, grenade, weapon_glock,
            weapon_9mmhandgun, ammo_glockclip, ammo_9mmclip, monster_gman,
            weapon_handgrenade, monster_human_assassin, monster_headcrab, monster_babycrab,
            item_healthkit, func_healthcharger, monster_human_grunt, monster_grunt_repel,
            monster_hgrunt_dead, hornet, weapon_hornetgun, monster_houndeye,
            func_recharge, monster_cine_scientist, monster_cine_panther, monster_cine_barney,
            monster_cine2_scientist, monster_cine2_hvyweapons, monster_cine2_slave, monster_cine3_scientist,
            monster_cine3_barney, cine_blood, cycler, cycler_prdroid,
            cycler_sprite, cycler_weapon, cycler_wreckage, monster_ichthyosaur,
            monster_alien_slave, monster_vortigaunt, world_items, item_suit,
            item_battery, item_antidote, item_security, item_longjump,
            monster_leech, light, light_spot, light_environment,
            game_score, game_end, game_text, game_team_master,
            game_team_set, game_zone_player, game_player_hurt, game_counter,
            game_counter_set, game_player_equip, game_player_team, monstermaker,
            func_mortar_field, monster_mortar, weapon_mp5, weapon_9mmAR,
            ammo_mp5clip, ammo_9mmAR, ammo_9mmbox, ammo_mp5grenades,
            ammo_ARgrenades, monster_nihilanth, nihilanth_energy_ball, info_node,
            info_node_air, testhull, node_viewer, node_viewer_human,
            node_viewer_fly, node_viewer_large, monster_osprey, path_corner,
            path_track, func_plat, func_platrot, func_train,
            func_tracktrain, func_traincontrols, func_trackchange, func_trackautochange,
            func_guntarget, player, monster_hevsuit_dead, player_weaponstrip,
            player_loadsaved, info_intermission, weapon_python, weapon_357,
            ammo_357, monster_rat, monster_cockroach, weapon_rpg,
            laser_spot, rpg_rocket, ammo_rpgclip, monster_satchel,
            weapon_satchel, monster_scientist, monster_scientist_dead, monster_sitting_scientist,
            scripted_sequence, aiscripted_sequence, scripted_sentence, monster_furniture,
            weapon_shotgun, ammo_buckshot, ambient_generic, env_sound,
            speaker, soundent, monster_snark, weapon_snark,
            info_null, info_player_deathmatch, info_player_start, info_landmark,
            DelayedUse, my_monster, monster_tentacle, monster_tentaclemaw,
            func_friction, trigger_auto, trigger_relay, multi_manager,
            env_render, trigger, trigger_hurt, trigger_monsterjump,
            trigger_cdaudio, target_cdaudio, trigger_multiple, trigger_once,
            trigger_counter, trigger_transition, fireanddie, trigger_changelevel,
            func_ladder, trigger_push, trigger_teleport, info_teleport_destination,
            trigger_autosave, trigger_endsection, trigger_gravity, trigger_changetarget,
            trigger_camera, monster_tripmine, weapon_tripmine, monster_turret,
            monster_miniturret, monster_sentry, func_vehicle, func_vehiclecontrols,
            weaponbox, infodecal, bodyque, worldspawn,
            xen_plantlight, xen_hair, xen_ttrigger, xen_tree,
            xen_spore_small, xen_spore_medium, xen_spore_large, xen_hull,
            monster_zombie,
        }
    };
}

macro_rules! class_name_list {
    ($($class:ident,)*) => {
        /// Entity classes exported by the shim, in registration order
        pub const LEGACY_ENTITY_CLASSES: &[&str] = &[$(stringify!($class)),*];
    };
}

legacy_entity_classes!(class_name_list);

// ============================================================
// Lookup
// ============================================================

/// The allocator `module` exports for `class_name`, if any
pub fn lookup_allocator(module: &dyn ExportLookup, class_name: &str) -> Option<PrivateDataAllocator> {
    let address = module.export_address(class_name)?;
    // SAFETY: class-named exports are LINK_ENTITY_TO_CLASS allocators
    Some(unsafe { std::mem::transmute::<*const c_void, PrivateDataAllocator>(address) })
}

/// The allocator for `class_name`, or `error_allocator` when `module`
/// does not export one.
pub fn allocator_for(module: &dyn ExportLookup, class_name: &str) -> PrivateDataAllocator {
    lookup_allocator(module, class_name).unwrap_or_else(|| {
        log::warn!(
            "{} does not export entity class '{}'",
            module.module_name(),
            class_name
        );
        error_allocator
    })
}

/// Stands in for a class nobody provides. Creating such an entity is
/// fatal: the panic cannot unwind out of `extern "C"` and aborts.
pub unsafe extern "C" fn error_allocator(pev: *mut entvars_t) {
    let class_name = class_name_of(pev).unwrap_or_else(|| "<unknown>".to_string());
    report_missing_entity(&class_name)
}

pub fn report_missing_entity(class_name: &str) -> ! {
    log::error!("no private data allocator for entity class '{}'", class_name);
    panic!("no private data allocator for entity class '{}'", class_name);
}

unsafe fn class_name_of(pev: *mut entvars_t) -> Option<String> {
    let pev = pev.as_ref()?;
    let host = ShimContext::current()?.host()?;
    let globals = host.globals.as_ref()?;
    globals
        .string(pev.classname)
        .map(|name| name.to_string_lossy().into_owned())
}

// ============================================================
// EntityAllocators — resolved once per bound server
// ============================================================

/// Allocators for every legacy class, resolved from the bound server
/// first and the legacy module's exports second.
pub struct EntityAllocators {
    server: Option<Arc<dyn GameServer>>,
    fallback: Option<Box<dyn ExportLookup + Send + Sync>>,
    classes: HashMap<&'static str, PrivateDataAllocator>,
}

impl EntityAllocators {
    pub fn build(
        server: Option<Arc<dyn GameServer>>,
        fallback: Option<Box<dyn ExportLookup + Send + Sync>>,
    ) -> Self {
        let mut allocators = Self {
            server,
            fallback,
            classes: HashMap::with_capacity(LEGACY_ENTITY_CLASSES.len()),
        };

        let mut missing = Vec::new();
        for &class_name in LEGACY_ENTITY_CLASSES {
            match allocators.find(class_name) {
                Some(allocator) => {
                    allocators.classes.insert(class_name, allocator);
                }
                None => missing.push(class_name),
            }
        }

        if missing.is_empty() {
            log::debug!("resolved all {} entity classes", LEGACY_ENTITY_CLASSES.len());
        } else {
            log::warn!(
                "{} of {} entity classes have no allocator: {}",
                missing.len(),
                LEGACY_ENTITY_CLASSES.len(),
                missing.join(", ")
            );
        }
        allocators
    }

    /// Resolve any class name, including ones outside the legacy list
    pub fn find(&self, class_name: &str) -> Option<PrivateDataAllocator> {
        if let Some(&allocator) = self.classes.get(class_name) {
            return Some(allocator);
        }
        if let Some(server) = &self.server {
            if let Ok(name) = CString::new(class_name) {
                if let Some(allocator) = server.private_data_allocator(&name) {
                    return Some(allocator);
                }
            }
        }
        let fallback = self.fallback.as_deref()?;
        lookup_allocator(fallback, class_name)
    }

    pub fn allocator(&self, class_name: &str) -> PrivateDataAllocator {
        self.find(class_name).unwrap_or(error_allocator)
    }

    /// Number of legacy classes that resolved to a real allocator
    pub fn resolved(&self) -> usize {
        self.classes.len()
    }
}

/// Body of every per-class export
///
/// # Safety
/// `pev` is the engine's freshly allocated `entvars_t`.
pub unsafe fn allocate_private_data(class_name: &'static str, pev: *mut entvars_t) {
    let allocator = ShimContext::global().entity_allocators().allocator(class_name);
    allocator(pev)
}
