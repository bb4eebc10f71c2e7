//! Enumerated types and the shared trigger function.

use super::definition::{EnumType, TriggerFunction};

pub static LOBBY_STATUS: EnumType = EnumType {
    name: "lobby_status",
    labels: &["open", "in_game", "closed"],
};

pub static LOBBY_PLAYER_STATUS: EnumType = EnumType {
    name: "lobby_player_status",
    labels: &["joined", "ready", "left", "disconnected"],
};

pub static GAME_STATUS: EnumType = EnumType {
    name: "game_status",
    labels: &["waiting", "active", "finished", "abandoned"],
};

pub static ACTION_TYPE: EnumType = EnumType {
    name: "action_type",
    labels: &["move", "attack", "ability", "end_turn", "surrender"],
};

pub static MATCH_RESULT: EnumType = EnumType {
    name: "match_result",
    labels: &["win", "loss", "draw", "abandoned"],
};

/// All enumerated types, in creation order.
pub static ALL_ENUMS: &[&EnumType] = &[
    &LOBBY_STATUS,
    &LOBBY_PLAYER_STATUS,
    &GAME_STATUS,
    &ACTION_TYPE,
    &MATCH_RESULT,
];

pub const SET_UPDATED_AT_NAME: &str = "set_updated_at";

/// Stamps `updated_at` on every row update.
pub static SET_UPDATED_AT: TriggerFunction = TriggerFunction {
    name: SET_UPDATED_AT_NAME,
    body: "NEW.updated_at = now();\n    RETURN NEW;",
};
