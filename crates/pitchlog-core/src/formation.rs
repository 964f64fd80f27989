// Formation registry: formations, their position slots, and the
// slot -> role category -> role label lookup chain.
//
// All tables are static and closed. Lookups for unknown names degrade to
// empty results rather than failing.

use std::fmt;

use crate::pitch::{PitchMapper, RelativePoint};

// ---------------------------------------------------------------------------
// Slots and formations
// ---------------------------------------------------------------------------

/// A named position within a formation, placed in full-pitch relative space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationSlot {
    pub name: &'static str,
    pub rel: RelativePoint,
}

const fn slot(name: &'static str, rx: f64, ry: f64) -> FormationSlot {
    FormationSlot {
        name,
        rel: RelativePoint::new(rx, ry),
    }
}

const FOUR_FOUR_TWO: &[FormationSlot] = &[
    slot("GK", 0.5, 0.08),
    slot("RB", 0.85, 0.22),
    slot("RCB", 0.65, 0.2),
    slot("LCB", 0.35, 0.2),
    slot("LB", 0.15, 0.22),
    slot("RM", 0.8, 0.5),
    slot("RCM", 0.6, 0.5),
    slot("LCM", 0.4, 0.5),
    slot("LM", 0.2, 0.5),
    slot("RS", 0.6, 0.8),
    slot("LS", 0.4, 0.8),
];

const FOUR_THREE_THREE: &[FormationSlot] = &[
    slot("GK", 0.5, 0.08),
    slot("RB", 0.85, 0.25),
    slot("RCB", 0.65, 0.2),
    slot("LCB", 0.35, 0.2),
    slot("LB", 0.15, 0.25),
    slot("DM", 0.5, 0.35),
    slot("RCM", 0.7, 0.55),
    slot("LCM", 0.3, 0.55),
    slot("RW", 0.8, 0.78),
    slot("ST", 0.5, 0.82),
    slot("LW", 0.2, 0.78),
];

const THREE_FIVE_TWO: &[FormationSlot] = &[
    slot("GK", 0.5, 0.08),
    slot("RCB", 0.7, 0.2),
    slot("CB", 0.5, 0.2),
    slot("LCB", 0.3, 0.2),
    slot("RWB", 0.85, 0.45),
    slot("RCM", 0.65, 0.5),
    slot("CDM", 0.5, 0.38),
    slot("LCM", 0.35, 0.5),
    slot("LWB", 0.15, 0.45),
    slot("RS", 0.6, 0.8),
    slot("LS", 0.4, 0.8),
];

const FIVE_THREE_TWO: &[FormationSlot] = &[
    slot("GK", 0.5, 0.08),
    slot("RWB", 0.9, 0.35),
    slot("RCB", 0.7, 0.2),
    slot("CB", 0.5, 0.2),
    slot("LCB", 0.3, 0.2),
    slot("LWB", 0.1, 0.35),
    slot("RCM", 0.65, 0.55),
    slot("CM", 0.5, 0.5),
    slot("LCM", 0.35, 0.55),
    slot("RS", 0.6, 0.8),
    slot("LS", 0.4, 0.8),
];

/// Every formation, in menu order.
pub const FORMATIONS: &[(&str, &[FormationSlot])] = &[
    ("4-4-2", FOUR_FOUR_TWO),
    ("4-3-3", FOUR_THREE_THREE),
    ("3-5-2", THREE_FIVE_TWO),
    ("5-3-2", FIVE_THREE_TWO),
];

/// Formation selected when nothing else is configured.
pub const DEFAULT_FORMATION: &str = "4-4-2";

/// Formation names in menu order.
pub fn formation_names() -> impl Iterator<Item = &'static str> {
    FORMATIONS.iter().map(|(name, _)| *name)
}

pub fn is_known_formation(name: &str) -> bool {
    FORMATIONS.iter().any(|(n, _)| *n == name)
}

/// The formation after `name` in menu order, wrapping around. Unknown names
/// restart at the first formation.
pub fn next_formation(name: &str) -> &'static str {
    let idx = FORMATIONS.iter().position(|(n, _)| *n == name);
    let next = idx.map(|i| (i + 1) % FORMATIONS.len()).unwrap_or(0);
    FORMATIONS[next].0
}

/// Slots of a formation. Unknown formations have no slots.
pub fn slots_for(formation: &str) -> &'static [FormationSlot] {
    FORMATIONS
        .iter()
        .find(|(n, _)| *n == formation)
        .map(|(_, slots)| *slots)
        .unwrap_or(&[])
}

/// Whether `formation` contains a slot called `slot_name`.
pub fn has_slot(formation: &str, slot_name: &str) -> bool {
    slots_for(formation).iter().any(|s| s.name == slot_name)
}

/// Find the slot closest to `query` in pixel space, if it is strictly closer
/// than `pixel_threshold`.
///
/// Distances are measured after mapping slot positions through `mapper`, so
/// the threshold means the same on-screen distance regardless of pitch size.
/// Exact ties go to the alphabetically first slot name.
pub fn nearest_slot(
    formation: &str,
    query: RelativePoint,
    pixel_threshold: f64,
    mapper: &PitchMapper,
) -> Option<&'static str> {
    nearest_in(slots_for(formation), query, pixel_threshold, mapper)
}

fn nearest_in(
    slots: &'static [FormationSlot],
    query: RelativePoint,
    pixel_threshold: f64,
    mapper: &PitchMapper,
) -> Option<&'static str> {
    let target = mapper.to_absolute(query);
    let limit = pixel_threshold * pixel_threshold;

    let mut best: Option<(f64, &'static str)> = None;
    for s in slots {
        let d = mapper.to_absolute(s.rel).distance_sq(&target);
        if d >= limit {
            continue;
        }
        best = match best {
            Some((bd, bn)) if bd < d || (bd == d && bn <= s.name) => Some((bd, bn)),
            _ => Some((d, s.name)),
        };
    }
    best.map(|(_, name)| name)
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Generic positional category that owns a list of role labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleCategory {
    Goalkeeper,
    FullBack,
    CentreBack,
    DefensiveMidfield,
    CentralMidfield,
    WideMidfield,
    AttackingMidfield,
    Striker,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 8] = [
        RoleCategory::Goalkeeper,
        RoleCategory::FullBack,
        RoleCategory::CentreBack,
        RoleCategory::DefensiveMidfield,
        RoleCategory::CentralMidfield,
        RoleCategory::WideMidfield,
        RoleCategory::AttackingMidfield,
        RoleCategory::Striker,
    ];

    /// Short code (GK, FB, CB, ...).
    pub fn code(&self) -> &'static str {
        match self {
            RoleCategory::Goalkeeper => "GK",
            RoleCategory::FullBack => "FB",
            RoleCategory::CentreBack => "CB",
            RoleCategory::DefensiveMidfield => "DM",
            RoleCategory::CentralMidfield => "CM",
            RoleCategory::WideMidfield => "WM",
            RoleCategory::AttackingMidfield => "AM",
            RoleCategory::Striker => "ST",
        }
    }

    /// Role labels for this category. The last entry is always "Other".
    pub fn roles(&self) -> &'static [&'static str] {
        match self {
            RoleCategory::Goalkeeper => &["Goalkeeper", "Sweeper Keeper", "Other"],
            RoleCategory::FullBack => &["Full-Back", "Wing-Back", "Inverted Wing-Back", "Other"],
            RoleCategory::CentreBack => &[
                "Central Defender",
                "Ball-Playing Defender",
                "No-Nonsense Centre-Back",
                "Other",
            ],
            RoleCategory::DefensiveMidfield => &[
                "Defensive Midfielder",
                "Deep Lying Playmaker",
                "Anchor Man",
                "Half-Back",
                "Other",
            ],
            RoleCategory::CentralMidfield => &[
                "Central Midfielder",
                "Box-to-Box Midfielder",
                "Advanced Playmaker",
                "Roaming Playmaker",
                "Mezzala",
                "Other",
            ],
            RoleCategory::WideMidfield => &[
                "Winger",
                "Inverted Winger",
                "Wide Playmaker",
                "Inside Forward",
                "Raumdeuter",
                "Other",
            ],
            RoleCategory::AttackingMidfield => &[
                "Attacking Midfielder",
                "Advanced Playmaker",
                "Trequartista",
                "Shadow Striker",
                "Other",
            ],
            RoleCategory::Striker => &[
                "Deep Lying Forward",
                "Advanced Forward",
                "Poacher",
                "Complete Forward",
                "Target Man",
                "False Nine",
                "Pressing Forward",
                "Other",
            ],
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Category of a slot name, independent of formation.
pub fn role_category(slot_name: &str) -> Option<RoleCategory> {
    let category = match slot_name {
        "GK" => RoleCategory::Goalkeeper,
        "RB" | "LB" | "RWB" | "LWB" => RoleCategory::FullBack,
        "CB" | "RCB" | "LCB" => RoleCategory::CentreBack,
        "DM" | "CDM" => RoleCategory::DefensiveMidfield,
        "CM" | "RCM" | "LCM" => RoleCategory::CentralMidfield,
        "RM" | "LM" | "RW" | "LW" => RoleCategory::WideMidfield,
        "AM" => RoleCategory::AttackingMidfield,
        "ST" | "RS" | "LS" => RoleCategory::Striker,
        _ => return None,
    };
    Some(category)
}

/// Role labels available for a slot. Unknown slots have none.
pub fn role_options(slot_name: &str) -> &'static [&'static str] {
    role_category(slot_name)
        .map(|c| c.roles())
        .unwrap_or(&[])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
