//! The card catalogue (C1): static tables mapping a card's numeric identity to its
//! road connection mask or its action effect. Pure and stateless — every function
//! here is a lookup, never a mutation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::{RoadType, ToolKind};

pub const ROAD_MAX: i16 = 43;
pub const ACTION_MIN: i16 = 44;
pub const ACTION_MAX: i16 = 70;
pub const DESTINATION_HIDDEN_OFFSET: i16 = 70;

/// Normalizes a hidden destination identity (`card_no` in `[71, 73]`) back to its
/// revealed range (`[1, 3]`) for table lookups that don't care about hide state.
const fn normalize(card_no: i16) -> i16 {
    if card_no > ROAD_MAX {
        card_no - DESTINATION_HIDDEN_OFFSET
    } else {
        card_no
    }
}

/// `road_connection(card_no, rotate)`: the unrotated mask from the catalogue table,
/// swapped (top, down) and (right, left) when `rotate` is set.
pub fn road_connection(card_no: i16, rotate: bool) -> [bool; 5] {
    let mask = unrotated_mask(normalize(card_no));
    if rotate {
        [mask[0], mask[3], mask[4], mask[1], mask[2]]
    } else {
        mask
    }
}

fn unrotated_mask(id: i16) -> [bool; 5] {
    match id {
        0..=3 | 13..=17 => [true; 5],
        4..=7 => [true, true, false, true, false],
        8..=12 => [true, true, true, true, false],
        18..=21 => [true, false, true, true, false],
        22..=26 => [true, false, false, true, true],
        27 => [false, false, false, true, false],
        28 => [false, true, false, true, true],
        29 => [false, true, true, true, true],
        30 => [false, false, true, true, false],
        31 => [false, false, false, true, true],
        32 => [false, false, false, false, true],
        33..=37 => [true, true, true, false, true],
        38..=40 => [true, false, true, false, true],
        41 => [false, true, false, true, false],
        42 => [false, true, true, false, true],
        43 => [false, false, true, false, true],
        _ => panic!("card_no is not a road card"),
    }
}

/// `road_type(card_no)`: start / normal / end, from the normalized identity.
pub fn road_type(card_no: i16) -> RoadType {
    match normalize(card_no) {
        0 => RoadType::Start,
        1..=3 => RoadType::End,
        4..=43 => RoadType::Normal,
        _ => panic!("card_no is not a road card"),
    }
}

pub const fn is_road(card_no: i16) -> bool {
    (0..=ROAD_MAX).contains(&card_no)
        || (DESTINATION_HIDDEN_OFFSET + 1..=DESTINATION_HIDDEN_OFFSET + 3).contains(&card_no)
}

/// The semantics an action card grants when played (C1's `action_of`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionEffect {
    /// Breaks or repairs one of `tools` (length 1 for single-tool cards, 2 for the
    /// three dual-tool repair cards).
    Tool {
        tools: SmallVec<[ToolKind; 2]>,
        is_break: bool,
    },
    Rocks,
    Map,
}

/// `action_of(card_no)`.
pub fn action_of(card_no: i16) -> ActionEffect {
    use ToolKind::*;
    match card_no {
        44..=46 => tool(Lamp, true),
        47..=48 => tool(Lamp, false),
        49..=51 => tool(Cart, true),
        52..=53 => tool(Cart, false),
        54..=56 => tool(Pick, true),
        57..=58 => tool(Pick, false),
        59 => tools2(Pick, Cart),
        60 => tools2(Lamp, Cart),
        61 => tools2(Pick, Lamp),
        62..=64 => ActionEffect::Rocks,
        65..=70 => ActionEffect::Map,
        _ => panic!("card_no is not an action card"),
    }
}

fn tool(kind: ToolKind, is_break: bool) -> ActionEffect {
    ActionEffect::Tool {
        tools: SmallVec::from_buf_and_len([kind, kind], 1),
        is_break,
    }
}

fn tools2(a: ToolKind, b: ToolKind) -> ActionEffect {
    ActionEffect::Tool {
        tools: SmallVec::from_buf([a, b]),
        is_break: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadCard {
    pub card_no: i16,
    pub rotate: bool,
    pub road_type: RoadType,
    pub connected: [bool; 5],
}

impl RoadCard {
    pub fn new(card_no: i16, rotate: bool) -> Self {
        Self {
            card_no,
            rotate,
            road_type: road_type(card_no),
            connected: road_connection(card_no, rotate),
        }
    }

    pub const fn is_hidden(&self) -> bool {
        self.card_no > ROAD_MAX
    }

    /// The true `card_no` a map peek or a successful reveal would expose.
    pub const fn revealed_card_no(&self) -> i16 {
        normalize(self.card_no)
    }

    pub fn reveal(&mut self) {
        self.card_no = self.revealed_card_no();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCard {
    pub card_no: i16,
    pub effect: ActionEffect,
}

impl ActionCard {
    pub fn new(card_no: i16) -> Self {
        Self {
            card_no,
            effect: action_of(card_no),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Card {
    Road(RoadCard),
    Action(ActionCard),
}

impl Card {
    /// Builds the freshly-dealt (unrotated, unhidden) card for a catalogue identity.
    pub fn from_card_no(card_no: i16) -> Self {
        if is_road(card_no) {
            Card::Road(RoadCard::new(card_no, false))
        } else {
            Card::Action(ActionCard::new(card_no))
        }
    }

    pub fn card_no(&self) -> i16 {
        match self {
            Card::Road(r) => r.card_no,
            Card::Action(a) => a.card_no,
        }
    }

    pub fn as_road(&self) -> Option<&RoadCard> {
        match self {
            Card::Road(r) => Some(r),
            Card::Action(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_and_cross_tiles_are_fully_open() {
        assert_eq!(road_connection(0, false), [true; 5]);
        assert_eq!(road_connection(15, false), [true; 5]);
    }

    #[test]
    fn rotate_swaps_top_down_and_right_left() {
        let straight = road_connection(4, false);
        assert_eq!(straight, [true, true, false, true, false]);
        let rotated = road_connection(4, true);
        assert_eq!(rotated, [true, false, false, true, true]);
    }

    #[test]
    fn dead_end_cards_have_a_single_open_side() {
        assert_eq!(road_connection(27, false), [false, false, false, true, false]);
        assert_eq!(road_connection(32, false), [false, false, false, false, true]);
    }

    #[test]
    fn road_type_ranges_match_the_catalogue() {
        assert_eq!(road_type(0), RoadType::Start);
        assert_eq!(road_type(2), RoadType::End);
        assert_eq!(road_type(40), RoadType::Normal);
        assert_eq!(road_type(72), RoadType::End);
    }

    #[test]
    fn single_tool_break_cards_are_classified_correctly() {
        assert_eq!(
            action_of(45),
            ActionEffect::Tool {
                tools: SmallVec::from_buf_and_len([ToolKind::Lamp, ToolKind::Lamp], 1),
                is_break: true,
            }
        );
        assert_eq!(
            action_of(58),
            ActionEffect::Tool {
                tools: SmallVec::from_buf_and_len([ToolKind::Pick, ToolKind::Pick], 1),
                is_break: false,
            }
        );
    }

    #[test]
    fn dual_tool_repair_cards_offer_two_choices() {
        let ActionEffect::Tool { tools, is_break } = action_of(59) else {
            panic!("expected a tool effect");
        };
        assert!(!is_break);
        assert_eq!(tools.as_slice(), [ToolKind::Pick, ToolKind::Cart]);
    }

    #[test]
    fn rocks_and_map_ranges_are_stateless_tags() {
        assert_eq!(action_of(63), ActionEffect::Rocks);
        assert_eq!(action_of(66), ActionEffect::Map);
    }

    #[test]
    fn hidden_destination_reveals_to_its_true_identity() {
        let mut gold = RoadCard::new(71, false);
        assert!(gold.is_hidden());
        assert_eq!(gold.revealed_card_no(), 1);
        gold.reveal();
        assert_eq!(gold.card_no, 1);
        assert!(!gold.is_hidden());
    }
}
