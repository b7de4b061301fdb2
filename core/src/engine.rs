use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossReason {
    TimeExpired,
    MoveBudgetExceeded,
}

impl LossReason {
    /// Text shown to the player; fixed puzzles report a failed puzzle.
    pub const fn message(self, puzzle: bool) -> &'static str {
        match (self, puzzle) {
            (Self::TimeExpired, false) => "Time's up!",
            (Self::TimeExpired, true) => "Puzzle failed: out of time",
            (Self::MoveBudgetExceeded, _) => "Puzzle failed: no moves left",
        }
    }
}

/// Valid transitions:
/// - Playing <-> Paused
/// - Playing -> Won
/// - Playing -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Playing,
    Paused,
    Won,
    Lost(LossReason),
}

impl EngineState {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost(_))
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Playing
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Idle,
    OneSelected(TileIndex),
}

/// State of a single round, from the opening board to a win or a loss.
#[derive(Clone, Debug)]
pub struct PlayEngine {
    config: RoundConfig,
    puzzle: Option<PuzzleRef>,
    board: Board,
    selection: Selection,
    completed_rows: BTreeSet<Coord>,
    move_count: u32,
    countdown: Countdown,
    streak: u32,
    active_power_ups: Vec<PowerUp>,
    pending_override: Option<Override>,
    hint_row: Option<Coord>,
    state: EngineState,
    dispenser: PowerUpDispenser,
    events: Vec<RoundEvent>,
}

impl PlayEngine {
    /// Rows already complete on the opening board are locked straight away,
    /// without awarding anything. A fully solved opening board (the generator
    /// fallback) opens as won.
    pub fn new(mut config: RoundConfig, board: Board, seed: u64) -> Self {
        if board.size() != config.size {
            log::warn!(
                "Round configured for {} but board is {}, following the board",
                config.size,
                board.size()
            );
            config.size = board.size();
        }

        let mut engine = Self {
            countdown: Countdown::new(config.time_limit, config.max_time),
            config,
            puzzle: None,
            board,
            selection: Selection::Idle,
            completed_rows: BTreeSet::new(),
            move_count: 0,
            streak: 0,
            active_power_ups: Vec::new(),
            pending_override: None,
            hint_row: None,
            state: EngineState::Playing,
            dispenser: PowerUpDispenser::new(seed),
            events: Vec::new(),
        };

        let opening: SmallVec<[Coord; 6]> =
            completion::completed_rows(&engine.board, engine.config.mode).collect();
        for row in opening {
            engine.completed_rows.insert(row);
            engine.board.lock_row(row);
        }
        if completion::board_complete(&engine.board, engine.config.mode) {
            log::warn!("Round opened on a solved {} board", engine.config.mode);
            engine.state = EngineState::Won;
        }

        log::info!(
            "Started {} {} round, {}s on the clock",
            engine.config.mode,
            engine.config.size,
            engine.config.time_limit
        );
        engine
    }

    pub fn for_puzzle(
        puzzle: PuzzleRef,
        definition: &PuzzleDefinition,
        board: Board,
        seed: u64,
    ) -> Self {
        let mut engine = Self::new(RoundConfig::for_puzzle(definition), board, seed);
        engine.puzzle = Some(puzzle);
        engine
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    pub fn size(&self) -> BoardSize {
        self.board.size()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn puzzle(&self) -> Option<PuzzleRef> {
        self.puzzle
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn completed_rows(&self) -> &BTreeSet<Coord> {
        &self.completed_rows
    }

    /// Every index in a completed row.
    pub fn locked_indices(&self) -> BTreeSet<TileIndex> {
        let size = self.size();
        self.completed_rows
            .iter()
            .flat_map(|&row| size.row_indices(row))
            .collect()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn max_moves(&self) -> Option<u32> {
        self.config.max_moves
    }

    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn active_power_ups(&self) -> &[PowerUp] {
        &self.active_power_ups
    }

    pub fn pending_override(&self) -> Option<Override> {
        self.pending_override
    }

    pub fn hint_row(&self) -> Option<Coord> {
        self.hint_row
    }

    pub fn loss_message(&self) -> Option<&'static str> {
        match self.state {
            EngineState::Lost(reason) => Some(reason.message(self.puzzle.is_some())),
            _ => None,
        }
    }

    /// Leaderboard partition results of this round belong to.
    pub fn bucket_key(&self) -> BucketKey {
        match self.puzzle {
            Some(PuzzleRef { pack, index }) => BucketKey::Puzzle { pack, index },
            None => BucketKey::FreePlay {
                mode: self.config.mode,
                size: self.size(),
            },
        }
    }

    /// Events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        core::mem::take(&mut self.events)
    }

    /// Hands the player a specific power-up outside the award policy.
    pub fn grant_power_up(&mut self, kind: PowerUpKind) -> PowerUp {
        let power_up = self.dispenser.issue(kind);
        self.active_power_ups.push(power_up);
        self.events.push(RoundEvent::PowerUpAwarded(power_up));
        power_up
    }

    pub fn press(&mut self, index: TileIndex) -> PressOutcome {
        if !self.state.is_playing() {
            log::trace!("press {} ignored, round is {:?}", index, self.state);
            return PressOutcome::NoChange;
        }
        let Ok(index) = self.size().validate_index(index) else {
            log::trace!("press {} ignored, out of range", index);
            return PressOutcome::NoChange;
        };
        if self.board.is_locked(index) {
            log::trace!("press {} ignored, tile is locked", index);
            return PressOutcome::NoChange;
        }

        match self.selection {
            Selection::Idle => self.select(index),
            Selection::OneSelected(selected) if selected == index => {
                self.selection = Selection::Idle;
                self.events.push(RoundEvent::Deselected);
                PressOutcome::Deselected
            }
            Selection::OneSelected(selected) => {
                let ignore_adjacency = self.pending_override == Some(Override::IgnoreAdjacency);
                if ignore_adjacency || self.size().is_adjacent(selected, index) {
                    self.swap(selected, index)
                } else {
                    self.select(index)
                }
            }
        }
    }

    pub fn apply_power_up(&mut self, id: PowerUpId) -> Result<PowerUpOutcome> {
        self.check_playing()?;

        let position = self
            .active_power_ups
            .iter()
            .position(|power_up| power_up.id == id)
            .ok_or(GameError::UnknownPowerUp)?;
        let power_up = self.active_power_ups[position];
        if power_up.kind.arms().is_some() && self.pending_override.is_some() {
            return Err(GameError::OverridePending);
        }

        self.active_power_ups.remove(position);
        self.events.push(RoundEvent::PowerUpApplied(power_up));
        log::debug!("Applying {:?}", power_up);

        let outcome = match power_up.kind {
            PowerUpKind::FreezeTime => {
                PowerUpOutcome::TimeAdded(self.countdown.extend(power_up.magnitude))
            }
            PowerUpKind::TeleportSwap => self.arm(Override::IgnoreAdjacency),
            PowerUpKind::FreeMove => self.arm(Override::FreeMove),
            PowerUpKind::RowHint => {
                let next = (0..self.size().edge()).find(|row| !self.completed_rows.contains(row));
                match next {
                    Some(row) => {
                        self.hint_row = Some(row);
                        PowerUpOutcome::HintShown(row)
                    }
                    None => PowerUpOutcome::NoEffect,
                }
            }
            PowerUpKind::AutoComplete => {
                let placed = self.auto_complete(power_up.magnitude)?;
                if placed == 0 {
                    PowerUpOutcome::NoEffect
                } else {
                    self.selection = Selection::Idle;
                    self.evaluate_rows();
                    if self.check_won() {
                        PowerUpOutcome::Won
                    } else {
                        PowerUpOutcome::TilesPlaced(placed)
                    }
                }
            }
        };
        Ok(outcome)
    }

    /// Advances the clock by one tick. Dropped unless the round is playing.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_playing() {
            return TickOutcome::Suppressed;
        }
        let outcome = self.countdown.tick();
        if outcome == TickOutcome::Expired {
            self.finish(EngineState::Lost(LossReason::TimeExpired));
        }
        outcome
    }

    pub fn pause(&mut self) -> Result<()> {
        self.check_playing()?;
        self.state = EngineState::Paused;
        self.events.push(RoundEvent::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            EngineState::Paused => {
                self.state = EngineState::Playing;
                self.events.push(RoundEvent::Resumed);
                Ok(())
            }
            EngineState::Playing => Ok(()),
            EngineState::Won | EngineState::Lost(_) => Err(GameError::AlreadyEnded),
        }
    }

    fn select(&mut self, index: TileIndex) -> PressOutcome {
        self.selection = Selection::OneSelected(index);
        self.events.push(RoundEvent::Selected(index));
        PressOutcome::Selected
    }

    fn swap(&mut self, a: TileIndex, b: TileIndex) -> PressOutcome {
        let free_move = self.pending_override == Some(Override::FreeMove);
        if !free_move {
            if let Some(max_moves) = self.config.max_moves {
                if self.move_count >= max_moves {
                    self.finish(EngineState::Lost(LossReason::MoveBudgetExceeded));
                    return PressOutcome::Lost;
                }
            }
        }

        self.board = match self.board.swapped(a, b) {
            Ok(board) => board,
            Err(err) => {
                log::error!("Rejected swap {} <-> {}: {}", a, b, err);
                return PressOutcome::NoChange;
            }
        };
        self.selection = Selection::Idle;
        if let Some(consumed) = self.pending_override.take() {
            log::debug!("Swap consumed {:?} override", consumed);
        }
        if !free_move {
            self.move_count += 1;
        }
        self.events.push(RoundEvent::Swapped(a, b));
        log::debug!("Swapped {} <-> {}, {} moves", a, b, self.move_count);

        let completed = self.evaluate_rows();
        self.streak = if completed.is_empty() { 0 } else { self.streak + 1 };

        if self.check_won() {
            return PressOutcome::Won;
        }
        if let Some(chance) = self.config.powerups.move_award_chance {
            if self.dispenser.roll(chance) {
                self.award();
            }
        }
        PressOutcome::Swapped
    }

    fn arm(&mut self, armed: Override) -> PowerUpOutcome {
        self.pending_override = Some(armed);
        PowerUpOutcome::Armed(armed)
    }

    /// Checks rows that were not complete yet; locks and rewards the new ones.
    fn evaluate_rows(&mut self) -> SmallVec<[Coord; 6]> {
        let mode = self.config.mode;
        let completed: SmallVec<[Coord; 6]> = (0..self.size().edge())
            .filter(|row| !self.completed_rows.contains(row))
            .filter(|&row| completion::row_complete(&self.board, row, mode))
            .collect();

        for &row in &completed {
            self.completed_rows.insert(row);
            self.board.lock_row(row);
            if self.hint_row == Some(row) {
                self.hint_row = None;
            }
            self.events.push(RoundEvent::RowCompleted(row));
            log::debug!("Row {} complete", row);
            if self.config.powerups.award_on_row_complete {
                self.award();
            }
        }
        completed
    }

    /// Moves up to `limit` misplaced tiles home, scanning slots in order and
    /// pulling in the first unlocked tile that belongs there.
    fn auto_complete(&mut self, limit: u32) -> Result<u32> {
        let size = self.size();
        let palette = match self.config.mode {
            Mode::Color => colors(size.edge().into()),
            Mode::Classic | Mode::Pattern => Vec::new(),
        };

        let mut placed = 0;
        for slot in 0..size.tile_count() {
            if placed >= limit {
                break;
            }
            let Some(tile) = self.board.tile(slot) else {
                continue;
            };
            if tile.is_locked() || tile.is_home(size, &palette) {
                continue;
            }
            let source = (0..size.tile_count())
                .filter(|&other| other != slot)
                .find(|&other| {
                    self.board.tile(other).is_some_and(|candidate| {
                        !candidate.is_locked()
                            && !candidate.is_home(size, &palette)
                            && candidate.fits_at(slot, size, &palette)
                    })
                });
            if let Some(source) = source {
                self.board = self.board.swapped(slot, source)?;
                placed += 1;
                log::debug!("Auto-complete moved tile {} -> {}", source, slot);
            }
        }
        Ok(placed)
    }

    fn award(&mut self) {
        let power_up = self.dispenser.draw();
        log::debug!("Awarded {:?}", power_up.kind);
        self.active_power_ups.push(power_up);
        self.events.push(RoundEvent::PowerUpAwarded(power_up));
    }

    fn check_won(&mut self) -> bool {
        if completion::board_complete(&self.board, self.config.mode) {
            self.finish(EngineState::Won);
            true
        } else {
            false
        }
    }

    fn finish(&mut self, state: EngineState) {
        if self.state.is_finished() {
            return;
        }

        self.state = state;
        self.selection = Selection::Idle;
        self.pending_override = None;
        let event = match state {
            EngineState::Lost(reason) => RoundEvent::Lost(reason),
            _ => RoundEvent::Won {
                moves: self.move_count,
                time_remaining: self.countdown.remaining(),
            },
        };
        self.events.push(event);
        log::info!(
            "Round ended {:?} after {} moves with {}s left",
            state,
            self.move_count,
            self.countdown.remaining()
        );
    }

    fn check_playing(&self) -> Result<()> {
        match self.state {
            EngineState::Playing => Ok(()),
            EngineState::Paused => Err(GameError::NotPlaying),
            EngineState::Won | EngineState::Lost(_) => Err(GameError::AlreadyEnded),
        }
    }
}
