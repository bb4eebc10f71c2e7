//! All table definitions.
//!
//! Tables are declared leaves-first: every foreign key points at a table that
//! appears earlier in [`ALL_TABLES`].

use super::definition::{Column, ColumnType, Index, OnDelete, Table, UpdateTrigger};
use super::types::SET_UPDATED_AT_NAME;

const NOW: &str = "now()";
const EMPTY_JSON: &str = "'{}'::jsonb";

const fn id() -> Column {
    Column::new("id", ColumnType::Uuid)
        .primary_key()
        .default_to("gen_random_uuid()")
}

const fn created_at() -> Column {
    Column::new("created_at", ColumnType::Timestamptz)
        .not_null()
        .default_to(NOW)
}

const fn updated_at() -> Column {
    Column::new("updated_at", ColumnType::Timestamptz)
        .not_null()
        .default_to(NOW)
}

const fn updated_at_trigger(name: &'static str) -> Option<UpdateTrigger> {
    Some(UpdateTrigger {
        name,
        function: SET_UPDATED_AT_NAME,
    })
}

/// Registered player accounts.
pub static USERS: Table = Table {
    name: "users",
    columns: &[
        id(),
        Column::new("email", ColumnType::Text).not_null().unique(),
        Column::new("username", ColumnType::Text).not_null().unique(),
        Column::new("password_hash", ColumnType::Text).not_null(),
        Column::new("display_name", ColumnType::Text),
        Column::new("rating", ColumnType::Integer)
            .not_null()
            .default_to("1000"),
        Column::new("last_login_at", ColumnType::Timestamptz),
        created_at(),
        updated_at(),
    ],
    primary_key: &[],
    unique: &[],
    indexes: &[],
    update_trigger: updated_at_trigger("users_set_updated_at"),
};

/// Pre-game matchmaking rooms.
pub static LOBBIES: Table = Table {
    name: "lobbies",
    columns: &[
        id(),
        Column::new("code", ColumnType::Text).not_null().unique(),
        Column::new("name", ColumnType::Text).not_null(),
        Column::new("host_user_id", ColumnType::Uuid)
            .not_null()
            .references("users", "id", OnDelete::Restrict),
        Column::new("status", ColumnType::Enum("lobby_status"))
            .not_null()
            .default_to("'open'"),
        Column::new("max_players", ColumnType::Integer)
            .not_null()
            .default_to("2")
            .check("max_players BETWEEN 2 AND 8"),
        Column::new("is_private", ColumnType::Boolean)
            .not_null()
            .default_to("false"),
        Column::new("settings", ColumnType::Jsonb)
            .not_null()
            .default_to(EMPTY_JSON),
        created_at(),
        updated_at(),
    ],
    primary_key: &[],
    unique: &[],
    indexes: &[
        Index {
            name: "idx_lobbies_status",
            table: "lobbies",
            columns: &["status"],
            unique: false,
            predicate: None,
        },
        Index {
            name: "idx_lobbies_host_user_id",
            table: "lobbies",
            columns: &["host_user_id"],
            unique: false,
            predicate: None,
        },
    ],
    update_trigger: updated_at_trigger("lobbies_set_updated_at"),
};

/// Membership of a user in a lobby.
pub static LOBBY_PLAYERS: Table = Table {
    name: "lobby_players",
    columns: &[
        Column::new("lobby_id", ColumnType::Uuid)
            .not_null()
            .references("lobbies", "id", OnDelete::Cascade),
        Column::new("user_id", ColumnType::Uuid)
            .not_null()
            .references("users", "id", OnDelete::Cascade),
        Column::new("slot", ColumnType::Integer)
            .not_null()
            .check("slot >= 0"),
        Column::new("status", ColumnType::Enum("lobby_player_status"))
            .not_null()
            .default_to("'joined'"),
        Column::new("joined_at", ColumnType::Timestamptz)
            .not_null()
            .default_to(NOW),
    ],
    primary_key: &["lobby_id", "user_id"],
    unique: &[&["lobby_id", "slot"]],
    indexes: &[Index {
        name: "idx_lobby_players_user_id",
        table: "lobby_players",
        columns: &["user_id"],
        unique: false,
        predicate: None,
    }],
    update_trigger: None,
};

/// Running or finished match instances.
pub static GAMES: Table = Table {
    name: "games",
    columns: &[
        id(),
        Column::new("lobby_id", ColumnType::Uuid).references("lobbies", "id", OnDelete::SetNull),
        Column::new("created_by_user_id", ColumnType::Uuid)
            .not_null()
            .references("users", "id", OnDelete::Restrict),
        Column::new("winner_user_id", ColumnType::Uuid)
            .references("users", "id", OnDelete::SetNull),
        Column::new("status", ColumnType::Enum("game_status"))
            .not_null()
            .default_to("'waiting'"),
        Column::new("map_width", ColumnType::Integer)
            .not_null()
            .check("map_width > 0"),
        Column::new("map_height", ColumnType::Integer)
            .not_null()
            .check("map_height > 0"),
        Column::new("current_turn", ColumnType::Integer)
            .not_null()
            .default_to("1")
            .check("current_turn >= 1"),
        Column::new("current_player_index", ColumnType::Integer)
            .not_null()
            .default_to("0")
            .check("current_player_index >= 0"),
        Column::new("state", ColumnType::Jsonb)
            .not_null()
            .default_to(EMPTY_JSON),
        Column::new("started_at", ColumnType::Timestamptz),
        Column::new("finished_at", ColumnType::Timestamptz),
        created_at(),
        updated_at(),
    ],
    primary_key: &[],
    unique: &[],
    indexes: &[
        Index {
            name: "idx_games_status",
            table: "games",
            columns: &["status"],
            unique: false,
            predicate: None,
        },
        Index {
            name: "idx_games_lobby_id",
            table: "games",
            columns: &["lobby_id"],
            unique: false,
            predicate: None,
        },
    ],
    update_trigger: updated_at_trigger("games_set_updated_at"),
};

/// A user's seat in a game.
pub static GAME_PLAYERS: Table = Table {
    name: "game_players",
    columns: &[
        Column::new("game_id", ColumnType::Uuid)
            .not_null()
            .references("games", "id", OnDelete::Cascade),
        Column::new("user_id", ColumnType::Uuid)
            .not_null()
            .references("users", "id", OnDelete::Restrict),
        Column::new("player_index", ColumnType::Integer)
            .not_null()
            .check("player_index >= 0"),
        Column::new("faction", ColumnType::Text),
        Column::new("is_eliminated", ColumnType::Boolean)
            .not_null()
            .default_to("false"),
        Column::new("joined_at", ColumnType::Timestamptz)
            .not_null()
            .default_to(NOW),
    ],
    primary_key: &["game_id", "user_id"],
    unique: &[&["game_id", "player_index"]],
    indexes: &[Index {
        name: "idx_game_players_user_id",
        table: "game_players",
        columns: &["user_id"],
        unique: false,
        predicate: None,
    }],
    update_trigger: None,
};

/// Game pieces on the map. Dead units are kept for history.
pub static UNITS: Table = Table {
    name: "units",
    columns: &[
        id(),
        Column::new("game_id", ColumnType::Uuid)
            .not_null()
            .references("games", "id", OnDelete::Cascade),
        Column::new("owner_user_id", ColumnType::Uuid)
            .not_null()
            .references("users", "id", OnDelete::Restrict),
        Column::new("unit_type", ColumnType::Text).not_null(),
        Column::new("x", ColumnType::Integer).not_null().check("x >= 0"),
        Column::new("y", ColumnType::Integer).not_null().check("y >= 0"),
        Column::new("hp", ColumnType::Integer).not_null().check("hp >= 0"),
        Column::new("max_hp", ColumnType::Integer)
            .not_null()
            .check("max_hp > 0"),
        Column::new("is_alive", ColumnType::Boolean)
            .not_null()
            .default_to("true"),
        Column::new("attributes", ColumnType::Jsonb)
            .not_null()
            .default_to(EMPTY_JSON),
        created_at(),
        updated_at(),
    ],
    primary_key: &[],
    unique: &[],
    indexes: &[
        Index {
            name: "idx_units_game_id",
            table: "units",
            columns: &["game_id"],
            unique: false,
            predicate: None,
        },
        Index {
            name: "idx_units_owner_user_id",
            table: "units",
            columns: &["owner_user_id"],
            unique: false,
            predicate: None,
        },
        // At most one living unit per tile.
        Index {
            name: "uniq_units_alive_position",
            table: "units",
            columns: &["game_id", "x", "y"],
            unique: true,
            predicate: Some("is_alive"),
        },
    ],
    update_trigger: updated_at_trigger("units_set_updated_at"),
};

/// One player's turn within a game.
pub static TURNS: Table = Table {
    name: "turns",
    columns: &[
        id(),
        Column::new("game_id", ColumnType::Uuid)
            .not_null()
            .references("games", "id", OnDelete::Cascade),
        Column::new("turn_number", ColumnType::Integer)
            .not_null()
            .check("turn_number >= 1"),
        Column::new("player_index", ColumnType::Integer)
            .not_null()
            .check("player_index >= 0"),
        Column::new("started_at", ColumnType::Timestamptz)
            .not_null()
            .default_to(NOW),
        Column::new("ended_at", ColumnType::Timestamptz),
        Column::new("time_limit_seconds", ColumnType::Integer).check("time_limit_seconds > 0"),
    ],
    primary_key: &[],
    unique: &[&["game_id", "turn_number", "player_index"]],
    indexes: &[Index {
        name: "idx_turns_game_id",
        table: "turns",
        columns: &["game_id"],
        unique: false,
        predicate: None,
    }],
    update_trigger: None,
};

/// Individual player actions. Rows outlive the turn, user and unit they name.
pub static ACTIONS: Table = Table {
    name: "actions",
    columns: &[
        id(),
        Column::new("game_id", ColumnType::Uuid)
            .not_null()
            .references("games", "id", OnDelete::Cascade),
        Column::new("turn_id", ColumnType::Uuid).references("turns", "id", OnDelete::SetNull),
        Column::new("user_id", ColumnType::Uuid).references("users", "id", OnDelete::SetNull),
        Column::new("unit_id", ColumnType::Uuid).references("units", "id", OnDelete::SetNull),
        Column::new("action_type", ColumnType::Enum("action_type")).not_null(),
        Column::new("payload", ColumnType::Jsonb)
            .not_null()
            .default_to(EMPTY_JSON),
        created_at(),
    ],
    primary_key: &[],
    unique: &[],
    indexes: &[
        Index {
            name: "idx_actions_game_id_created_at",
            table: "actions",
            columns: &["game_id", "created_at"],
            unique: false,
            predicate: None,
        },
        Index {
            name: "idx_actions_turn_id",
            table: "actions",
            columns: &["turn_id"],
            unique: false,
            predicate: None,
        },
    ],
    update_trigger: None,
};

/// Finished-game summaries.
pub static MATCHES: Table = Table {
    name: "matches",
    columns: &[
        id(),
        Column::new("game_id", ColumnType::Uuid)
            .unique()
            .references("games", "id", OnDelete::SetNull),
        Column::new("winner_user_id", ColumnType::Uuid)
            .references("users", "id", OnDelete::SetNull),
        Column::new("total_turns", ColumnType::Integer).check("total_turns >= 0"),
        Column::new("duration_seconds", ColumnType::Integer).check("duration_seconds >= 0"),
        Column::new("started_at", ColumnType::Timestamptz),
        Column::new("ended_at", ColumnType::Timestamptz)
            .not_null()
            .default_to(NOW),
        created_at(),
    ],
    primary_key: &[],
    unique: &[],
    indexes: &[Index {
        name: "idx_matches_ended_at",
        table: "matches",
        columns: &["ended_at"],
        unique: false,
        predicate: None,
    }],
    update_trigger: None,
};

/// Per-user outcome of a finished match.
pub static MATCH_PLAYERS: Table = Table {
    name: "match_players",
    columns: &[
        Column::new("match_id", ColumnType::Uuid)
            .not_null()
            .references("matches", "id", OnDelete::Cascade),
        Column::new("user_id", ColumnType::Uuid)
            .not_null()
            .references("users", "id", OnDelete::Restrict),
        Column::new("player_index", ColumnType::Integer)
            .not_null()
            .check("player_index >= 0"),
        Column::new("result", ColumnType::Enum("match_result")).not_null(),
        Column::new("score", ColumnType::Integer)
            .not_null()
            .default_to("0"),
        Column::new("rating_change", ColumnType::Integer),
        Column::new("stats", ColumnType::Jsonb)
            .not_null()
            .default_to(EMPTY_JSON),
    ],
    primary_key: &["match_id", "user_id"],
    unique: &[],
    indexes: &[Index {
        name: "idx_match_players_user_id",
        table: "match_players",
        columns: &["user_id"],
        unique: false,
        predicate: None,
    }],
    update_trigger: None,
};

/// Applied-migration ledger. Append-only.
pub static SCHEMA_MIGRATIONS: Table = Table {
    name: "schema_migrations",
    columns: &[
        Column::new("version", ColumnType::Text).primary_key(),
        Column::new("applied_at", ColumnType::Timestamptz)
            .not_null()
            .default_to(NOW),
    ],
    primary_key: &[],
    unique: &[],
    indexes: &[],
    update_trigger: None,
};

/// The ten game tables followed by the ledger, in creation order.
pub static ALL_TABLES: &[&Table] = &[
    &USERS,
    &LOBBIES,
    &LOBBY_PLAYERS,
    &GAMES,
    &GAME_PLAYERS,
    &UNITS,
    &TURNS,
    &ACTIONS,
    &MATCHES,
    &MATCH_PLAYERS,
    &SCHEMA_MIGRATIONS,
];

/// Looks up a table definition by name.
pub fn find_table(name: &str) -> Option<&'static Table> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}
