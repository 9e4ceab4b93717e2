//! The controller state machine (C6): round lifecycle, the `step` entry point,
//! legality + activation dispatch (C5), and the reveal/win checks that close
//! out a round.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::board::{self, Board};
use crate::card::{ActionEffect, Card, RoadCard};
use crate::error::GameError;
use crate::game::action::{Message, Move, MovePayload};
use crate::game::scoring;
use crate::player::Player;
use crate::types::{RoadType, ToolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Reset,
    Play,
    GamePoint,
    EndGame,
}

fn num_bad_dwarves(num_player: usize) -> usize {
    match num_player {
        3 => 1,
        4 => 1,
        5 => 2,
        6 => 2,
        7 => 3,
        8 => 3,
        9 => 3,
        10 => 4,
        _ => panic!("num_player must be within [3, 10]"),
    }
}

fn hand_size(num_player: usize) -> usize {
    match num_player {
        3 => 6,
        4 => 6,
        5 => 6,
        6 => 5,
        7 => 5,
        8 => 4,
        9 => 4,
        10 => 4,
        _ => panic!("num_player must be within [3, 10]"),
    }
}

#[derive(Debug)]
pub struct Controller {
    round: u32,
    num_player: usize,
    player_list: Vec<Player>,
    phase: GamePhase,
    turn: u64,
    card_pool: Vec<Card>,
    fold_deck: Vec<Card>,
    board: Board,
    gold_stack: Vec<u8>,
    winner: Option<usize>,
    winner_list: Vec<usize>,
    gold_pos: usize,
    now_play: String,
    return_msg: Vec<Message>,
    rng: StdRng,
    // Test-only deterministic overrides, consumed (at most) once, on the
    // first `round_reset` (round 1). Always `None` on production paths built
    // from a bare `GameConfig`.
    deck_override: Option<Vec<Card>>,
    destinations_override: Option<[i16; 3]>,
    roles_override: Option<Vec<bool>>,
}

impl Controller {
    pub(crate) fn new(
        player_ids: Vec<String>,
        rng: StdRng,
        deck_override: Option<Vec<Card>>,
        destinations_override: Option<[i16; 3]>,
        roles_override: Option<Vec<bool>>,
    ) -> Self {
        let num_player = player_ids.len();
        let mut controller = Self {
            round: 0,
            num_player,
            player_list: player_ids.into_iter().map(Player::new).collect(),
            phase: GamePhase::Reset,
            turn: 0,
            card_pool: Vec::new(),
            fold_deck: Vec::new(),
            board: Board::new(),
            gold_stack: Vec::new(),
            winner: None,
            winner_list: Vec::new(),
            gold_pos: board::DESTINATION_POSITIONS[0],
            now_play: String::new(),
            return_msg: vec![Message::empty_info(); num_player],
            rng,
            deck_override,
            destinations_override,
            roles_override,
        };
        controller.round_reset();
        controller
    }

    // -- accessors -----------------------------------------------------

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn num_player(&self) -> usize {
        self.num_player
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn players(&self) -> &[Player] {
        &self.player_list
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn gold_stack(&self) -> &[u8] {
        &self.gold_stack
    }

    pub fn gold_pos(&self) -> usize {
        self.gold_pos
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn winner_list(&self) -> &[usize] {
        &self.winner_list
    }

    pub fn now_play(&self) -> &str {
        &self.now_play
    }

    pub fn return_msg(&self) -> &[Message] {
        &self.return_msg
    }

    pub fn card_pool_len(&self) -> usize {
        self.card_pool.len()
    }

    pub fn fold_deck_len(&self) -> usize {
        self.fold_deck.len()
    }

    pub fn current_player_index(&self) -> usize {
        (self.turn as usize) % self.num_player
    }

    // -- round lifecycle -------------------------------------------------

    fn round_reset(&mut self) {
        self.phase = GamePhase::Reset;
        self.round += 1;

        if self.round == 1 {
            self.gold_stack = build_gold_stack(&mut self.rng);
        }

        self.board_reset();
        self.assign_roles();
        for player in &mut self.player_list {
            player.action_state = [false; 3];
        }
        self.card_pool = self.build_round_deck();
        self.player_list.shuffle(&mut self.rng);
        self.deal_hands();

        self.phase = GamePhase::Play;
        self.turn = 0;
        self.now_play = self.player_list[0].id.clone();

        log::info!(
            "round {} started with {} players",
            self.round,
            self.num_player
        );
    }

    fn board_reset(&mut self) {
        self.board = Board::new();
        let order = match self.destinations_override.take() {
            Some(order) => order,
            None => {
                let mut order = [1i16, 2, 3];
                order.shuffle(&mut self.rng);
                order
            }
        };
        let gold_slot = order
            .iter()
            .position(|&value| value == 1)
            .expect("destination order must contain exactly one gold card");
        self.gold_pos = board::DESTINATION_POSITIONS[gold_slot];
        for (&position, &value) in board::DESTINATION_POSITIONS.iter().zip(order.iter()) {
            self.board.place_hidden_destination(position, value + 70);
        }
    }

    fn assign_roles(&mut self) {
        let roles: Vec<bool> = match self.roles_override.take() {
            Some(roles) => roles,
            None => {
                let num_bad = num_bad_dwarves(self.num_player);
                let mut roles = vec![false; num_bad];
                roles.extend(std::iter::repeat(true).take(self.num_player + 1 - num_bad));
                roles.shuffle(&mut self.rng);
                roles.truncate(self.num_player);
                roles
            }
        };
        for (player, role) in self.player_list.iter_mut().zip(roles) {
            player.role = role;
        }
    }

    fn build_round_deck(&mut self) -> Vec<Card> {
        if let Some(deck) = self.deck_override.take() {
            return deck;
        }
        let mut deck: Vec<Card> = (4..=70).map(Card::from_card_no).collect();
        deck.shuffle(&mut self.rng);
        deck
    }

    fn deal_hands(&mut self) {
        let size = hand_size(self.num_player);
        for player in &mut self.player_list {
            let take = size.min(self.card_pool.len());
            player.hand = self.card_pool.drain(0..take).collect();
        }
    }

    // -- the mutating entry point ----------------------------------------

    /// Plays one card on behalf of the current player. Legality failures are
    /// recoverable: the card returns to the mover's hand, only the mover's
    /// message slot is written, and the turn does not advance.
    pub fn step(&mut self, mv: Move) -> Result<(), GameError> {
        if !matches!(self.phase, GamePhase::Play) {
            return Err(GameError::EndGameReached);
        }

        let current_idx = self.current_player_index();
        let mover_id = self.player_list[current_idx].id.clone();
        self.now_play = mover_id.clone();

        let card = match self.player_list[current_idx].play_card(mv.card_index) {
            Ok(card) => card,
            Err(err) => {
                log::debug!("illegal move by {mover_id}: {err}");
                self.return_msg[current_idx] = Message::IllegalPlay(err.to_string());
                return Ok(());
            }
        };

        match self.check_and_activate(current_idx, card, &mv.payload) {
            Ok((message, position)) => {
                self.finish_legal_move(current_idx, &mover_id, message, position);
            }
            Err(err) => {
                log::debug!("illegal move by {mover_id}: {err}");
                self.return_msg[current_idx] = Message::IllegalPlay(err.to_string());
            }
        }

        if matches!(self.phase, GamePhase::GamePoint) {
            self.score_and_advance_round();
        }

        Ok(())
    }

    fn finish_legal_move(
        &mut self,
        current_idx: usize,
        mover_id: &str,
        message: Message,
        position: Option<usize>,
    ) {
        let empty_hand_count = self
            .player_list
            .iter()
            .filter(|player| player.hand.is_empty())
            .count();

        let mut good_win = false;
        if let Some(position) = position {
            if board::is_destination_front(position) {
                self.reveal_adjacent_destinations(position);
                if self.board.connects_to_start(self.gold_pos) {
                    self.declare_good_team_win(current_idx);
                    good_win = true;
                }
            }
        }

        if !self.card_pool.is_empty() {
            let drawn = self.card_pool.remove(0);
            self.player_list[current_idx].hand.push(drawn);
        }

        if !good_win {
            self.broadcast_move_result(current_idx, mover_id, message, position);
        }

        self.turn += 1;
        let next_idx = self.current_player_index();
        self.now_play = self.player_list[next_idx].id.clone();

        if !good_win && empty_hand_count == self.num_player {
            self.declare_bad_team_win();
        }
    }

    fn reveal_adjacent_destinations(&mut self, position: usize) {
        for &destination in board::front_neighbors(position) {
            let hidden = self
                .board
                .get(destination)
                .map(|card| card.is_hidden())
                .unwrap_or(false);
            if hidden && self.board.connects_to_start(destination) {
                self.board.reveal_destination(destination);
            }
        }
    }

    fn declare_good_team_win(&mut self, mover_idx: usize) {
        self.winner_list = self
            .player_list
            .iter()
            .enumerate()
            .filter(|(_, player)| player.role)
            .map(|(idx, _)| idx)
            .collect();
        self.winner = Some(mover_idx);
        self.phase = GamePhase::GamePoint;
        let message = Message::Info(format!("round {} good dwarves win", self.round));
        self.return_msg = vec![message; self.num_player];
        log::info!("round {} ended: good dwarves connected the gold", self.round);
    }

    fn declare_bad_team_win(&mut self) {
        self.winner_list = self
            .player_list
            .iter()
            .enumerate()
            .filter(|(_, player)| !player.role)
            .map(|(idx, _)| idx)
            .collect();
        self.winner = None;
        self.phase = GamePhase::GamePoint;
        let message = Message::Info(format!("round {} bad dwarves win", self.round));
        self.return_msg = vec![message; self.num_player];
        log::info!("round {} ended: deck and hands exhausted", self.round);
    }

    fn broadcast_move_result(
        &mut self,
        current_idx: usize,
        mover_id: &str,
        message: Message,
        position: Option<usize>,
    ) {
        if let Message::Peek(value) = message {
            let position = position.expect("a PEEK message always carries its target position");
            let row = position / board::COLS;
            let col = position % board::COLS;
            for i in 0..self.num_player {
                self.return_msg[i] = if i == current_idx {
                    Message::Peek(value)
                } else {
                    Message::Info(format!(
                        "{mover_id} used map on ({}, {})",
                        row + 1,
                        col + 1
                    ))
                };
            }
        } else {
            self.return_msg = vec![message; self.num_player];
        }
    }

    fn score_and_advance_round(&mut self) {
        match self.winner {
            Some(winner) => scoring::distribute_good_team_win(
                &mut self.player_list,
                &mut self.gold_stack,
                winner,
                &self.winner_list,
                self.num_player,
            ),
            None => scoring::distribute_bad_team_win(
                &mut self.player_list,
                &mut self.gold_stack,
                &self.winner_list,
            ),
        }
        self.winner = None;
        self.winner_list.clear();
        self.round_reset();
        if self.round > 3 {
            self.phase = GamePhase::EndGame;
            log::info!("match ended after round {}", self.round);
        }
    }

    // -- legality & activation (C5) ---------------------------------------

    fn check_and_activate(
        &mut self,
        mover: usize,
        card: Card,
        payload: &MovePayload,
    ) -> Result<(Message, Option<usize>), GameError> {
        let outcome = self.try_activate(mover, &card, payload);
        if outcome.is_err() {
            self.player_list[mover].hand.push(card);
        }
        outcome
    }

    fn try_activate(
        &mut self,
        mover: usize,
        card: &Card,
        payload: &MovePayload,
    ) -> Result<(Message, Option<usize>), GameError> {
        match (card, payload) {
            (Card::Road(road), MovePayload::Road { position, rotate }) => {
                let candidate = RoadCard::new(road.card_no, *rotate);
                self.validate_road(mover, *position, &candidate)?;
                self.board.place(*position, candidate);
                Ok((Message::empty_info(), Some(*position)))
            }
            (Card::Action(action), MovePayload::Tool { target, tool }) => {
                let ActionEffect::Tool { tools, is_break } = &action.effect else {
                    return Err(GameError::PayloadMismatch);
                };
                let chosen = resolve_tool(tools, *tool)?;
                self.validate_tool_target(mover, *target, chosen, *is_break)?;
                self.player_list[*target].set_broken(chosen, *is_break);
                self.fold_deck.push(card.clone());
                Ok((Message::empty_info(), None))
            }
            (Card::Action(action), MovePayload::Rocks { position }) => {
                if !matches!(action.effect, ActionEffect::Rocks) {
                    return Err(GameError::PayloadMismatch);
                }
                self.validate_rocks(*position)?;
                if let Some(destroyed) = self.board.remove(*position) {
                    self.fold_deck.push(Card::Road(destroyed));
                }
                self.fold_deck.push(card.clone());
                Ok((Message::empty_info(), Some(*position)))
            }
            (Card::Action(action), MovePayload::Map { position }) => {
                if !matches!(action.effect, ActionEffect::Map) {
                    return Err(GameError::PayloadMismatch);
                }
                self.validate_map(*position)?;
                let true_card_no = self
                    .board
                    .get(*position)
                    .map(|card| card.revealed_card_no())
                    .unwrap_or(0);
                self.fold_deck.push(card.clone());
                Ok((Message::Peek(true_card_no), Some(*position)))
            }
            _ => Err(GameError::PayloadMismatch),
        }
    }

    fn validate_road(
        &self,
        mover: usize,
        position: usize,
        candidate: &RoadCard,
    ) -> Result<(), GameError> {
        if !self.player_list[mover].is_healthy() {
            return Err(GameError::BrokenTool);
        }
        if position >= board::LEN {
            return Err(GameError::IllegalPlacement("position out of range"));
        }
        if self.board.get(position).is_some() {
            return Err(GameError::IllegalPlacement("tile is already occupied"));
        }

        // A hidden destination's mask is always fully open (see `road_connection`),
        // so the connector-equality check below already rejects any candidate
        // whose side facing a hidden destination doesn't also open that way; no
        // separate "don't touch a hidden destination" guard is needed.
        let mut has_matching_neighbor = false;
        for (side, neighbor_pos) in Board::neighbor_positions(position) {
            let Some(neighbor) = self.board.get(neighbor_pos) else {
                continue;
            };
            let candidate_side = candidate.connected[side.index()];
            let neighbor_side = neighbor.connected[side.opposite().index()];
            if candidate_side != neighbor_side {
                return Err(GameError::IllegalPlacement("connection mismatch"));
            }
            if candidate_side && neighbor_side {
                has_matching_neighbor = true;
            }
        }
        if !has_matching_neighbor {
            return Err(GameError::IllegalPlacement(
                "orphan placement: no connecting neighbor",
            ));
        }
        Ok(())
    }

    fn validate_tool_target(
        &self,
        mover: usize,
        target: usize,
        tool: ToolKind,
        is_break: bool,
    ) -> Result<(), GameError> {
        if target >= self.num_player {
            return Err(GameError::InvalidPlayer(target));
        }
        if is_break {
            if target == mover {
                return Err(GameError::InvalidActionTarget("cannot break your own tool"));
            }
            if self.player_list[target].is_broken(tool) {
                return Err(GameError::InvalidActionTarget(
                    "target tool is already broken",
                ));
            }
        } else if !self.player_list[target].is_broken(tool) {
            return Err(GameError::InvalidActionTarget("target tool is not broken"));
        }
        Ok(())
    }

    fn validate_rocks(&self, position: usize) -> Result<(), GameError> {
        if position >= board::LEN {
            return Err(GameError::IllegalPlacement("position out of range"));
        }
        match self.board.get(position) {
            Some(card) if card.road_type == RoadType::Normal => Ok(()),
            _ => Err(GameError::InvalidActionTarget(
                "rocks target must be a placed normal road",
            )),
        }
    }

    fn validate_map(&self, position: usize) -> Result<(), GameError> {
        if board::is_destination(position) {
            Ok(())
        } else {
            Err(GameError::InvalidActionTarget(
                "map target must be a destination tile",
            ))
        }
    }
}

impl Controller {
    pub(crate) fn to_snapshot(&self) -> crate::codec::Snapshot {
        crate::codec::Snapshot {
            round: self.round,
            num_player: self.num_player,
            player_list: self.player_list.clone(),
            game_state: self.phase,
            turn: self.turn,
            card_pool: self.card_pool.clone(),
            fold_deck: self.fold_deck.clone(),
            board: self.board.clone(),
            gold_stack: self.gold_stack.clone(),
            winner: self.winner,
            winner_list: self.winner_list.clone(),
            gold_pos: self.gold_pos,
            now_play: self.now_play.clone(),
            return_msg: self.return_msg.clone(),
        }
    }

    /// Rebuilds a `Controller` from a snapshot. The RNG stream is not part of
    /// the snapshot format, so a restored controller draws from a freshly
    /// seeded generator; in-flight test overrides are never serialized and
    /// are always empty on restore.
    pub(crate) fn from_snapshot(snapshot: crate::codec::Snapshot) -> Self {
        Self {
            round: snapshot.round,
            num_player: snapshot.num_player,
            player_list: snapshot.player_list,
            phase: snapshot.game_state,
            turn: snapshot.turn,
            card_pool: snapshot.card_pool,
            fold_deck: snapshot.fold_deck,
            board: snapshot.board,
            gold_stack: snapshot.gold_stack,
            winner: snapshot.winner,
            winner_list: snapshot.winner_list,
            gold_pos: snapshot.gold_pos,
            now_play: snapshot.now_play,
            return_msg: snapshot.return_msg,
            rng: StdRng::from_entropy(),
            deck_override: None,
            destinations_override: None,
            roles_override: None,
        }
    }
}

fn resolve_tool(
    tools: &smallvec::SmallVec<[ToolKind; 2]>,
    chosen: Option<ToolKind>,
) -> Result<ToolKind, GameError> {
    if tools.len() == 1 {
        return Ok(tools[0]);
    }
    let chosen = chosen.ok_or(GameError::InvalidActionTarget("tool choice required"))?;
    if tools.contains(&chosen) {
        Ok(chosen)
    } else {
        Err(GameError::InvalidActionTarget(
            "tool not offered by this card",
        ))
    }
}

fn build_gold_stack(rng: &mut StdRng) -> Vec<u8> {
    let mut stack = Vec::with_capacity(28);
    stack.extend(std::iter::repeat(1u8).take(16));
    stack.extend(std::iter::repeat(2u8).take(8));
    stack.extend(std::iter::repeat(3u8).take(4));
    stack.shuffle(rng);
    stack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::ControllerBuilder;

    fn seeded(player_ids: &[&str]) -> Controller {
        ControllerBuilder::new(player_ids.iter().map(|s| s.to_string()).collect())
            .with_seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn round_reset_deals_hands_and_starts_round_one() {
        let controller = seeded(&["a", "b", "c"]);
        assert_eq!(controller.round(), 1);
        assert_eq!(controller.phase(), GamePhase::Play);
        assert_eq!(controller.turn(), 0);
        for player in controller.players() {
            assert_eq!(player.hand.len(), 6);
        }
        assert_eq!(controller.card_pool_len(), 67 - 18);
        let bad_count = controller.players().iter().filter(|p| !p.role).count();
        assert_eq!(bad_count, 1);
        assert!(board::DESTINATION_POSITIONS.contains(&controller.gold_pos()));
    }

    #[test]
    fn orphan_road_placement_is_rejected_without_advancing_turn() {
        let mut controller = ControllerBuilder::new(vec!["a".into(), "b".into(), "c".into()])
            .with_seed(7)
            .with_deck(vec![Card::from_card_no(4)])
            .build()
            .unwrap();
        let before_hand_len = controller.players()[0].hand.len();
        let result = controller.step(Move::road(0, 22, false));
        assert!(result.is_ok());
        assert_eq!(controller.turn(), 0);
        assert_eq!(controller.players()[0].hand.len(), before_hand_len);
        assert!(matches!(
            controller.return_msg()[0],
            Message::IllegalPlay(_)
        ));
    }

    #[test]
    fn an_out_of_range_hand_index_is_illegal_play_not_a_hard_error() {
        let mut controller = ControllerBuilder::new(vec!["a".into(), "b".into(), "c".into()])
            .with_seed(7)
            .with_deck(vec![Card::from_card_no(4)])
            .build()
            .unwrap();
        let before_hand_len = controller.players()[0].hand.len();
        let result = controller.step(Move::road(before_hand_len, 19, false));
        assert!(result.is_ok());
        assert_eq!(controller.turn(), 0);
        assert_eq!(controller.players()[0].hand.len(), before_hand_len);
        assert!(matches!(
            controller.return_msg()[0],
            Message::IllegalPlay(_)
        ));
    }

    #[test]
    fn broken_tool_blocks_road_plays_until_repaired() {
        // Hands are dealt in six-card chunks in post-shuffle seating order, so
        // chunk 0 always lands with whoever acts first and chunk 1 with
        // whoever acts second, regardless of which id the shuffle picked.
        let mut deck = vec![Card::from_card_no(45)];
        deck.extend((0..5).map(|_| Card::from_card_no(4)));
        deck.push(Card::from_card_no(4));
        deck.extend((0..5).map(|_| Card::from_card_no(13)));
        deck.extend((0..6).map(|_| Card::from_card_no(13)));
        let mut controller = ControllerBuilder::new(vec!["a".into(), "b".into(), "c".into()])
            .with_seed(3)
            .with_deck(deck)
            .build()
            .unwrap();

        controller
            .step(Move::tool(0, 1, None))
            .expect("breaking a tool is itself a legal move");
        assert!(controller.players()[1].is_broken(ToolKind::Lamp));

        let target_idx = controller.current_player_index();
        assert_eq!(target_idx, 1);
        controller
            .step(Move::road(0, 9, false))
            .expect("step should not error even though the move is illegal");
        assert!(matches!(
            controller.return_msg()[target_idx],
            Message::IllegalPlay(_)
        ));
        assert_eq!(controller.turn(), 1);
    }
}
