//! The closed stat-code namespace published by the upstream provider.
//!
//! Codes prefixed `weapon-` and `map-` are grouped into categories by
//! [`ProjectionSchema::build`](crate::schema::ProjectionSchema::build); no
//! other module hard-codes weapon types or map names.

/// Prefix of every per-weapon code: `weapon-<type>-<metric...>`.
pub const WEAPON_PREFIX: &str = "weapon-";

/// Prefix of every per-map code: `map-<name>-<metric...>`.
pub const MAP_PREFIX: &str = "map-";

/// The weapon type whose codes do not follow the generic weapon metric set.
pub const SPECIAL_WEAPON: &str = "kanto";

/// Seconds-counter the derived hours-played field is computed from.
pub const GAME_SECONDS: &str = "game-seconds";

/// Every stat code the upstream provider is known to emit.
pub const KNOWN_CODES: &[&str] = &[
  // ── General ─────────────────────────────────────────────────────────────
  "game-seconds", "kills", "assists", "deaths",
  "killstreaks-double", "killstreaks-triple", "killstreaks-spree",
  "games-won", "games-lost", "games-drawn", "games-abandoned",
  "prestige",

  // ── Artifact ────────────────────────────────────────────────────────────
  "gamemode-art-game-seconds", "gamemode-art-kills", "gamemode-art-aces",
  "gamemode-art-assists", "gamemode-art-deaths",
  "gamemode-art-plants", "gamemode-art-disables",
  "gamemode-art-games-won", "gamemode-art-games-lost",
  "gamemode-art-games-abandoned",
  "gamemode-art-pistol-round-wins", "gamemode-art-pistol-round-losses",
  "gamemode-art-reyab-round-wins", "gamemode-art-reyab-round-losses",

  // ── Capture the orb ─────────────────────────────────────────────────────
  "gamemode-cto-game-seconds", "gamemode-cto-kills",
  "gamemode-cto-carrier-kills", "gamemode-cto-as-carrier-kills",
  "gamemode-cto-assists", "gamemode-cto-deaths",
  "gamemode-cto-steals", "gamemode-cto-recovers", "gamemode-cto-captures",
  "gamemode-cto-games-won", "gamemode-cto-games-lost",
  "gamemode-cto-games-drawn", "gamemode-cto-games-abandoned",

  // ── Team deathmatch ─────────────────────────────────────────────────────
  "gamemode-tdm-game-seconds", "gamemode-tdm-kills",
  "gamemode-tdm-assists", "gamemode-tdm-deaths",
  "gamemode-tdm-games-won", "gamemode-tdm-games-lost",
  "gamemode-tdm-games-drawn", "gamemode-tdm-games-abandoned",

  // ── Scoutz knivez ───────────────────────────────────────────────────────
  "gamemode-skz-game-seconds", "gamemode-skz-kills",
  "gamemode-skz-assists", "gamemode-skz-deaths",
  "gamemode-skz-games-won", "gamemode-skz-games-lost",
  "gamemode-skz-games-drawn", "gamemode-skz-games-abandoned",

  // ── Hardpoint ───────────────────────────────────────────────────────────
  "gamemode-hp-game-seconds", "gamemode-hp-kills",
  "gamemode-hp-offensive-kills", "gamemode-hp-defensive-kills",
  "gamemode-hp-assists", "gamemode-hp-deaths",
  "gamemode-hp-initial-captures",
  "gamemode-hp-games-won", "gamemode-hp-games-lost",
  "gamemode-hp-games-drawn", "gamemode-hp-games-abandoned",

  // ── Free for all ────────────────────────────────────────────────────────
  "gamemode-ffa-game-seconds", "gamemode-ffa-kills",
  "gamemode-ffa-assists", "gamemode-ffa-deaths",
  "gamemode-ffa-games-won", "gamemode-ffa-games-lost",
  "gamemode-ffa-games-abandoned",

  // ── Gun game ────────────────────────────────────────────────────────────
  "gamemode-gg-game-seconds", "gamemode-gg-kills",
  "gamemode-gg-assists", "gamemode-gg-deaths",
  "gamemode-gg-games-won", "gamemode-gg-games-lost",
  "gamemode-gg-games-abandoned",

  // ── One in the chamber ──────────────────────────────────────────────────
  "gamemode-otc-game-seconds", "gamemode-otc-kills", "gamemode-otc-deaths",
  "gamemode-otc-games-won", "gamemode-otc-games-lost",
  "gamemode-otc-games-abandoned",

  // ── Weapons ─────────────────────────────────────────────────────────────
  "weapon-kanto-kills", "weapon-kanto-headshot-kills",

  "weapon-ak-kills", "weapon-ak-headshot-kills", "weapon-ak-shots-fired",
  "weapon-ak-shots-hit-leg", "weapon-ak-shots-hit-arm",
  "weapon-ak-shots-hit-body", "weapon-ak-shots-hit-head",

  "weapon-m4-kills", "weapon-m4-headshot-kills", "weapon-m4-shots-fired",
  "weapon-m4-shots-hit-leg", "weapon-m4-shots-hit-arm",
  "weapon-m4-shots-hit-body", "weapon-m4-shots-hit-head",

  "weapon-mk418-kills", "weapon-mk418-headshot-kills",
  "weapon-mk418-shots-fired",
  "weapon-mk418-shots-hit-leg", "weapon-mk418-shots-hit-arm",
  "weapon-mk418-shots-hit-body", "weapon-mk418-shots-hit-head",

  "weapon-mp5-kills", "weapon-mp5-headshot-kills", "weapon-mp5-shots-fired",
  "weapon-mp5-shots-hit-leg", "weapon-mp5-shots-hit-arm",
  "weapon-mp5-shots-hit-body", "weapon-mp5-shots-hit-head",

  "weapon-vector-kills", "weapon-vector-headshot-kills",
  "weapon-vector-shots-fired",
  "weapon-vector-shots-hit-leg", "weapon-vector-shots-hit-arm",
  "weapon-vector-shots-hit-body", "weapon-vector-shots-hit-head",

  "weapon-g17-kills", "weapon-g17-headshot-kills", "weapon-g17-shots-fired",
  "weapon-g17-shots-hit-leg", "weapon-g17-shots-hit-arm",
  "weapon-g17-shots-hit-body", "weapon-g17-shots-hit-head",

  "weapon-m1911-kills", "weapon-m1911-headshot-kills",
  "weapon-m1911-shots-fired",
  "weapon-m1911-shots-hit-leg", "weapon-m1911-shots-hit-arm",
  "weapon-m1911-shots-hit-body", "weapon-m1911-shots-hit-head",

  "weapon-pm9-kills", "weapon-pm9-headshot-kills", "weapon-pm9-shots-fired",
  "weapon-pm9-shots-hit-leg", "weapon-pm9-shots-hit-arm",
  "weapon-pm9-shots-hit-body", "weapon-pm9-shots-hit-head",

  "weapon-tac21-kills", "weapon-tac21-headshot-kills",
  "weapon-tac21-shots-fired",
  "weapon-tac21-shots-hit-leg", "weapon-tac21-shots-hit-arm",
  "weapon-tac21-shots-hit-body", "weapon-tac21-shots-hit-head",

  // ── Maps ────────────────────────────────────────────────────────────────
  "map-khidi-games-won", "map-khidi-games-lost",
  "map-khidi-games-drawn", "map-khidi-games-abandoned",
  "map-maar-games-won", "map-maar-games-lost",
  "map-maar-games-drawn", "map-maar-games-abandoned",
  "map-nine-games-won", "map-nine-games-lost",
  "map-nine-games-drawn", "map-nine-games-abandoned",
  "map-suna-games-won", "map-suna-games-lost",
  "map-suna-games-drawn", "map-suna-games-abandoned",
  "map-volt-games-won", "map-volt-games-lost",
  "map-volt-games-drawn", "map-volt-games-abandoned",
  "map-miru-games-won", "map-miru-games-lost",
  "map-miru-games-drawn", "map-miru-games-abandoned",
  "map-atrium-games-won", "map-atrium-games-lost",
  "map-atrium-games-drawn", "map-atrium-games-abandoned",
];
