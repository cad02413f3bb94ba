//! The projection schema: a tree mapping structured field paths to flat stat
//! codes.
//!
//! The fixed sections (`general`, `gamemodes`, the special weapon) come from
//! static templates. Weapon types and map names are discovered by scanning the
//! code namespace once, at startup; each discovered category receives its
//! family's full field template. The result is immutable and shared by
//! reference into [`ProjectionSchema::project`].

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{
  Error, Result,
  catalog::{GAME_SECONDS, MAP_PREFIX, SPECIAL_WEAPON, WEAPON_PREFIX},
};

// ─── Tree ────────────────────────────────────────────────────────────────────

/// A leaf of the schema: which code feeds it and how it is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
  /// An integer count, truncated from the stored value.
  Count(String),
  /// A seconds counter rendered as fractional hours.
  Hours(String),
}

impl Field {
  pub fn code(&self) -> &str {
    match self {
      Self::Count(code) | Self::Hours(code) => code,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
  Field(Field),
  Group(Group),
}

pub type Group = BTreeMap<String, Node>;

// ─── Templates ───────────────────────────────────────────────────────────────

/// `(field path, code or code suffix)` pairs.
type Template = &'static [(&'static [&'static str], &'static str)];

const GENERAL_FIELDS: Template = &[
  (&["time_played_seconds"], "game-seconds"),
  (&["kills_and_deaths", "kills"], "kills"),
  (&["kills_and_deaths", "assists"], "assists"),
  (&["kills_and_deaths", "deaths"], "deaths"),
  (&["kills_and_deaths", "bursts", "2"], "killstreaks-double"),
  (&["kills_and_deaths", "bursts", "3"], "killstreaks-triple"),
  (&["kills_and_deaths", "bursts", "5"], "killstreaks-spree"),
  (&["match_results", "wins"], "games-won"),
  (&["match_results", "losses"], "games-lost"),
  (&["match_results", "draws"], "games-drawn"),
  (&["match_results", "abandons"], "games-abandoned"),
  (&["prestige"], "prestige"),
];

const SPECIAL_WEAPON_FIELDS: Template = &[
  (&["kills", "total"], "weapon-kanto-kills"),
  (&["kills", "headshot_kills"], "weapon-kanto-headshot-kills"),
];

/// Suffixes appended to `weapon-<type>-`.
const WEAPON_METRICS: Template = &[
  (&["kills", "total"], "kills"),
  (&["kills", "headshot_kills"], "headshot-kills"),
  (&["shots", "fired"], "shots-fired"),
  (&["shots", "hits", "leg"], "shots-hit-leg"),
  (&["shots", "hits", "arm"], "shots-hit-arm"),
  (&["shots", "hits", "body"], "shots-hit-body"),
  (&["shots", "hits", "head"], "shots-hit-head"),
];

/// Suffixes appended to `map-<name>-`.
const MAP_METRICS: Template = &[
  (&["match_results", "wins"], "games-won"),
  (&["match_results", "losses"], "games-lost"),
  (&["match_results", "draws"], "games-drawn"),
  (&["match_results", "abandons"], "games-abandoned"),
];

struct Gamemode {
  /// Key under `gamemodes` in the projected output.
  key:    &'static str,
  /// Token in `gamemode-<abbr>-<metric>`.
  abbr:   &'static str,
  fields: Template,
}

const GAMEMODES: &[Gamemode] = &[
  Gamemode {
    key:    "artifact",
    abbr:   "art",
    fields: &[
      (&["time_played_seconds"], "game-seconds"),
      (&["kills_and_deaths", "kills"], "kills"),
      (&["kills_and_deaths", "aces"], "aces"),
      (&["kills_and_deaths", "assists"], "assists"),
      (&["kills_and_deaths", "deaths"], "deaths"),
      (&["scanner", "planted"], "plants"),
      (&["scanner", "disabled"], "disables"),
      (&["match_results", "wins"], "games-won"),
      (&["match_results", "losses"], "games-lost"),
      (&["match_results", "abandons"], "games-abandoned"),
      (&["round_results", "pistol_round", "wins"], "pistol-round-wins"),
      (&["round_results", "pistol_round", "losses"], "pistol-round-losses"),
      (&["round_results", "reyab", "wins"], "reyab-round-wins"),
      (&["round_results", "reyab", "losses"], "reyab-round-losses"),
    ],
  },
  Gamemode {
    key:    "capture_the_orb",
    abbr:   "cto",
    fields: &[
      (&["time_played_seconds"], "game-seconds"),
      (&["kills_and_deaths", "kills"], "kills"),
      (&["kills_and_deaths", "kills_on_orb_carrier"], "carrier-kills"),
      (&["kills_and_deaths", "kills_as_orb_carrier"], "as-carrier-kills"),
      (&["kills_and_deaths", "assists"], "assists"),
      (&["kills_and_deaths", "deaths"], "deaths"),
      (&["orb", "steals"], "steals"),
      (&["orb", "recovers"], "recovers"),
      (&["orb", "captures"], "captures"),
      (&["match_results", "wins"], "games-won"),
      (&["match_results", "losses"], "games-lost"),
      (&["match_results", "draws"], "games-drawn"),
      (&["match_results", "abandons"], "games-abandoned"),
    ],
  },
  Gamemode {
    key:    "team_deathmatch",
    abbr:   "tdm",
    fields: &[
      (&["time_played_seconds"], "game-seconds"),
      (&["kills_and_deaths", "kills"], "kills"),
      (&["kills_and_deaths", "assists"], "assists"),
      (&["kills_and_deaths", "deaths"], "deaths"),
      (&["match_results", "wins"], "games-won"),
      (&["match_results", "losses"], "games-lost"),
      (&["match_results", "draws"], "games-drawn"),
      (&["match_results", "abandons"], "games-abandoned"),
    ],
  },
  Gamemode {
    key:    "scoutzknivez",
    abbr:   "skz",
    fields: &[
      (&["time_played_seconds"], "game-seconds"),
      (&["kills_and_deaths", "kills"], "kills"),
      (&["kills_and_deaths", "assists"], "assists"),
      (&["kills_and_deaths", "deaths"], "deaths"),
      (&["match_results", "wins"], "games-won"),
      (&["match_results", "losses"], "games-lost"),
      (&["match_results", "draws"], "games-drawn"),
      (&["match_results", "abandons"], "games-abandoned"),
    ],
  },
  Gamemode {
    key:    "hardpoint",
    abbr:   "hp",
    fields: &[
      (&["time_played_seconds"], "game-seconds"),
      (&["kills_and_deaths", "kills"], "kills"),
      (&["kills_and_deaths", "offensive_kills"], "offensive-kills"),
      (&["kills_and_deaths", "defensive_kills"], "defensive-kills"),
      (&["kills_and_deaths", "assists"], "assists"),
      (&["kills_and_deaths", "deaths"], "deaths"),
      (&["point", "first_captures"], "initial-captures"),
      (&["match_results", "wins"], "games-won"),
      (&["match_results", "losses"], "games-lost"),
      (&["match_results", "draws"], "games-drawn"),
      (&["match_results", "abandons"], "games-abandoned"),
    ],
  },
  Gamemode {
    key:    "free_for_all",
    abbr:   "ffa",
    fields: &[
      (&["time_played_seconds"], "game-seconds"),
      (&["kills_and_deaths", "kills"], "kills"),
      (&["kills_and_deaths", "assists"], "assists"),
      (&["kills_and_deaths", "deaths"], "deaths"),
      (&["match_results", "wins"], "games-won"),
      (&["match_results", "losses"], "games-lost"),
      (&["match_results", "abandons"], "games-abandoned"),
    ],
  },
  Gamemode {
    key:    "gun_game",
    abbr:   "gg",
    fields: &[
      (&["time_played_seconds"], "game-seconds"),
      (&["kills_and_deaths", "kills"], "kills"),
      (&["kills_and_deaths", "assists"], "assists"),
      (&["kills_and_deaths", "deaths"], "deaths"),
      (&["match_results", "wins"], "games-won"),
      (&["match_results", "losses"], "games-lost"),
      (&["match_results", "abandons"], "games-abandoned"),
    ],
  },
  Gamemode {
    key:    "one_in_the_chamber",
    abbr:   "otc",
    fields: &[
      (&["time_played_seconds"], "game-seconds"),
      (&["kills_and_deaths", "kills"], "kills"),
      (&["kills_and_deaths", "deaths"], "deaths"),
      (&["match_results", "wins"], "games-won"),
      (&["match_results", "losses"], "games-lost"),
      (&["match_results", "abandons"], "games-abandoned"),
    ],
  },
];

// ─── Schema ──────────────────────────────────────────────────────────────────

/// Immutable mapping from `(category, subcategory, field)` paths to codes.
///
/// Deterministic for a fixed namespace: the same set of codes yields the same
/// schema regardless of iteration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionSchema {
  pub(crate) root: Group,
  weapon_types:    BTreeSet<String>,
  map_names:       BTreeSet<String>,
}

impl ProjectionSchema {
  /// Scan `codes` for weapon and map categories and assemble the full schema.
  ///
  /// Fails with [`Error::SchemaConfiguration`] when `codes` is empty or a code
  /// carries a recognised prefix with no category token after it.
  pub fn build<'a, I>(codes: I) -> Result<Self>
  where
    I: IntoIterator<Item = &'a str>,
  {
    let mut weapon_types = BTreeSet::new();
    let mut map_names = BTreeSet::new();
    let mut seen = 0usize;

    for code in codes {
      seen += 1;
      if let Some(rest) = code.strip_prefix(WEAPON_PREFIX) {
        weapon_types.insert(category_token(code, rest)?.to_owned());
      } else if let Some(rest) = code.strip_prefix(MAP_PREFIX) {
        map_names.insert(category_token(code, rest)?.to_owned());
      }
    }

    if seen == 0 {
      return Err(Error::SchemaConfiguration(
        "the stat code namespace is empty".into(),
      ));
    }

    // Fixed category; never rendered through the generic template.
    weapon_types.remove(SPECIAL_WEAPON);
    debug!(?weapon_types, ?map_names, "discovered stat taxonomy");

    let mut root = Group::new();

    for (path, code) in GENERAL_FIELDS {
      insert(&mut root, &nested(&["general"], path), Field::Count((*code).into()))?;
    }
    insert(
      &mut root,
      &["general", "hours_played"],
      Field::Hours(GAME_SECONDS.into()),
    )?;

    for mode in GAMEMODES {
      for (path, suffix) in mode.fields {
        let code = format!("gamemode-{}-{suffix}", mode.abbr);
        insert(&mut root, &nested(&["gamemodes", mode.key], path), Field::Count(code))?;
      }
    }

    for (path, code) in SPECIAL_WEAPON_FIELDS {
      insert(
        &mut root,
        &nested(&["weapons", SPECIAL_WEAPON], path),
        Field::Count((*code).into()),
      )?;
    }
    for weapon in &weapon_types {
      for (path, suffix) in WEAPON_METRICS {
        let code = format!("{WEAPON_PREFIX}{weapon}-{suffix}");
        insert(&mut root, &nested(&["weapons", weapon.as_str()], path), Field::Count(code))?;
      }
    }

    root.entry("maps".into()).or_insert_with(|| Node::Group(Group::new()));
    for map in &map_names {
      for (path, suffix) in MAP_METRICS {
        let code = format!("{MAP_PREFIX}{map}-{suffix}");
        insert(&mut root, &nested(&["maps", map.as_str()], path), Field::Count(code))?;
      }
    }

    Ok(Self { root, weapon_types, map_names })
  }

  /// Weapon types discovered from the namespace, excluding the special one.
  pub fn weapon_types(&self) -> impl ExactSizeIterator<Item = &str> {
    self.weapon_types.iter().map(String::as_str)
  }

  pub fn map_names(&self) -> impl ExactSizeIterator<Item = &str> {
    self.map_names.iter().map(String::as_str)
  }

  /// Every leaf as `(dotted path, field)`, in sorted path order.
  pub fn fields(&self) -> Vec<(String, &Field)> {
    let mut out = Vec::new();
    collect_fields(&self.root, String::new(), &mut out);
    out
  }
}

fn category_token<'c>(code: &str, rest: &'c str) -> Result<&'c str> {
  match rest.split('-').next() {
    Some(token) if !token.is_empty() => Ok(token),
    _ => Err(Error::SchemaConfiguration(format!(
      "stat code {code:?} is missing its category token"
    ))),
  }
}

fn nested<'p>(prefix: &[&'p str], path: &[&'p str]) -> Vec<&'p str> {
  prefix.iter().chain(path).copied().collect()
}

fn insert(group: &mut Group, path: &[&str], field: Field) -> Result<()> {
  let Some((head, rest)) = path.split_first() else {
    return Err(Error::SchemaConfiguration("empty schema path".into()));
  };

  if rest.is_empty() {
    if group.insert((*head).to_owned(), Node::Field(field)).is_some() {
      return Err(Error::SchemaConfiguration(format!(
        "schema field {head:?} is defined twice"
      )));
    }
    return Ok(());
  }

  match group
    .entry((*head).to_owned())
    .or_insert_with(|| Node::Group(Group::new()))
  {
    Node::Group(child) => insert(child, rest, field),
    Node::Field(_) => Err(Error::SchemaConfiguration(format!(
      "schema path {head:?} is both a field and a group"
    ))),
  }
}

fn collect_fields<'s>(
  group: &'s Group,
  prefix: String,
  out: &mut Vec<(String, &'s Field)>,
) {
  for (key, node) in group {
    let path = if prefix.is_empty() {
      key.clone()
    } else {
      format!("{prefix}.{key}")
    };
    match node {
      Node::Field(field) => out.push((path, field)),
      Node::Group(child) => collect_fields(child, path, out),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::KNOWN_CODES;

  fn schema() -> ProjectionSchema {
    ProjectionSchema::build(KNOWN_CODES.iter().copied()).unwrap()
  }

  #[test]
  fn discovers_weapon_types_without_the_special_one() {
    let s = schema();
    let weapons: Vec<_> = s.weapon_types().collect();
    assert!(weapons.contains(&"ak"));
    assert!(weapons.contains(&"tac21"));
    assert!(!weapons.contains(&SPECIAL_WEAPON));
  }

  #[test]
  fn special_weapon_appears_once_with_fixed_fields() {
    let s = schema();
    let kanto: Vec<_> = s
      .fields()
      .into_iter()
      .filter(|(path, _)| path.starts_with("weapons.kanto."))
      .map(|(path, _)| path)
      .collect();
    assert_eq!(kanto, ["weapons.kanto.kills.headshot_kills", "weapons.kanto.kills.total"]);
  }

  #[test]
  fn special_weapon_is_present_even_when_not_in_namespace() {
    let s = ProjectionSchema::build(["kills", "map-khidi-games-won"]).unwrap();
    assert!(
      s.fields()
        .iter()
        .any(|(path, f)| path == "weapons.kanto.kills.total"
          && f.code() == "weapon-kanto-kills")
    );
  }

  #[test]
  fn discovered_category_counts() {
    let s = ProjectionSchema::build([
      "weapon-ak-kills",
      "weapon-m4-kills",
      "weapon-kanto-kills",
      "map-suna-games-won",
    ])
    .unwrap();
    assert_eq!(s.weapon_types().len(), 2);
    assert_eq!(s.map_names().len(), 1);
  }

  #[test]
  fn discovered_categories_get_the_full_template() {
    let s = ProjectionSchema::build(["weapon-ak-kills", "map-suna-games-won"]).unwrap();
    let fields = s.fields();
    let ak = fields.iter().filter(|(p, _)| p.starts_with("weapons.ak.")).count();
    let suna = fields.iter().filter(|(p, _)| p.starts_with("maps.suna.")).count();
    assert_eq!(ak, WEAPON_METRICS.len());
    assert_eq!(suna, MAP_METRICS.len());
  }

  #[test]
  fn build_is_independent_of_code_order() {
    let mut reversed: Vec<&str> = KNOWN_CODES.to_vec();
    reversed.reverse();
    assert_eq!(schema(), ProjectionSchema::build(reversed).unwrap());
  }

  #[test]
  fn every_schema_code_is_a_known_code() {
    let s = schema();
    for (path, field) in s.fields() {
      assert!(
        KNOWN_CODES.contains(&field.code()),
        "{path} reads unknown code {:?}",
        field.code()
      );
    }
  }

  #[test]
  fn hours_played_is_the_only_hours_field() {
    let s = schema();
    let hours: Vec<_> = s
      .fields()
      .into_iter()
      .filter(|(_, f)| matches!(f, Field::Hours(_)))
      .map(|(p, _)| p)
      .collect();
    assert_eq!(hours, ["general.hours_played"]);
  }

  #[test]
  fn empty_namespace_is_rejected() {
    let err = ProjectionSchema::build(std::iter::empty()).unwrap_err();
    assert!(matches!(err, Error::SchemaConfiguration(_)));
  }

  #[test]
  fn prefix_without_category_token_is_rejected() {
    for bad in ["weapon-", "map--games-won"] {
      let err = ProjectionSchema::build(["kills", bad]).unwrap_err();
      assert!(matches!(err, Error::SchemaConfiguration(_)), "{bad}");
    }
  }
}
