use crate::*;

/// Entry point for a host: one persisted store, at most one round at a time.
///
/// Every call degrades to a no-op or an error value; nothing here panics on
/// player input. A won round is recorded exactly once, on the press or
/// power-up that won it.
#[derive(Debug)]
pub struct Session<P: Persistence, F: Feedback = SilentFeedback> {
    store: ProgressStore<P>,
    feedback: F,
    round: Option<PlayEngine>,
    seed: u64,
}

impl<P: Persistence> Session<P> {
    pub fn new(persistence: P, seed: u64) -> Self {
        Self::with_feedback(persistence, SilentFeedback, seed)
    }
}

impl<P: Persistence, F: Feedback> Session<P, F> {
    pub fn with_feedback(persistence: P, feedback: F, seed: u64) -> Self {
        Self {
            store: ProgressStore::load(persistence),
            feedback,
            round: None,
            seed,
        }
    }

    pub fn store(&self) -> &ProgressStore<P> {
        &self.store
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn round(&self) -> Option<&PlayEngine> {
        self.round.as_ref()
    }

    /// Shuffled round; remembers the choice in the player profile.
    pub fn start_free_play(&mut self, mode: Mode, size: BoardSize) -> &PlayEngine {
        let seed = self.next_seed();
        let board = generate(mode, size, None, seed);
        self.store.update_profile(|profile| {
            profile.last_mode = mode;
            profile.last_size = size;
        });
        self.round.insert(PlayEngine::new(RoundConfig::new(mode, size), board, seed))
    }

    pub fn start_puzzle(&mut self, pack: Pack, index: usize) -> Result<&PlayEngine> {
        if !self.store.is_pack_unlocked(pack) {
            return Err(GameError::PackLocked);
        }
        let reference = PuzzleRef::new(pack, index);
        let definition = reference.definition()?;
        let seed = self.next_seed();
        let board = generate(Mode::Classic, definition.size, Some(definition), seed);
        log::info!("Starting puzzle {:?} from {} pack", definition.name, pack);
        let round: &PlayEngine = self
            .round
            .insert(PlayEngine::for_puzzle(reference, definition, board, seed));
        Ok(round)
    }

    pub fn press(&mut self, index: TileIndex) -> PressOutcome {
        let Some(round) = self.round.as_mut() else {
            return PressOutcome::NoChange;
        };
        let outcome = round.press(index);
        self.flush_events();
        if outcome == PressOutcome::Won {
            self.record_win();
        }
        outcome
    }

    /// Hands the player a specific power-up outside the award policy.
    pub fn grant_power_up(&mut self, kind: PowerUpKind) -> Result<PowerUp> {
        let power_up = self
            .round
            .as_mut()
            .ok_or(GameError::NoActiveRound)?
            .grant_power_up(kind);
        self.flush_events();
        Ok(power_up)
    }

    pub fn apply_power_up(&mut self, id: PowerUpId) -> Result<PowerUpOutcome> {
        let round = self.round.as_mut().ok_or(GameError::NoActiveRound)?;
        let outcome = round.apply_power_up(id);
        self.flush_events();
        if outcome == Ok(PowerUpOutcome::Won) {
            self.record_win();
        }
        outcome
    }

    pub fn tick(&mut self) -> TickOutcome {
        let Some(round) = self.round.as_mut() else {
            return TickOutcome::Suppressed;
        };
        let outcome = round.tick();
        self.flush_events();
        outcome
    }

    pub fn pause(&mut self) -> Result<()> {
        let result = self.round.as_mut().ok_or(GameError::NoActiveRound)?.pause();
        self.flush_events();
        result
    }

    pub fn resume(&mut self) -> Result<()> {
        let result = self.round.as_mut().ok_or(GameError::NoActiveRound)?.resume();
        self.flush_events();
        result
    }

    /// Drops the current round without recording anything.
    pub fn abandon(&mut self) -> Option<PlayEngine> {
        self.round.take()
    }

    fn next_seed(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        self.seed
    }

    fn flush_events(&mut self) {
        if let Some(round) = self.round.as_mut() {
            for event in round.drain_events() {
                self.feedback.notify(&event);
            }
        }
    }

    fn record_win(&mut self) {
        let Some(round) = self.round.as_ref() else {
            return;
        };
        let record = ResultRecord::from_round(round, self.store.profile().player_label.clone());
        let key = round.bucket_key();
        self.store.record_result(key, record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_pack_cannot_be_started() {
        let mut session = Session::new(MemoryPersistence::new(), 1);
        assert_eq!(
            session.start_puzzle(Pack::Advanced, 0).map(|_| ()),
            Err(GameError::PackLocked)
        );
        assert!(session.round().is_none());
    }

    #[test]
    fn press_without_round_is_ignored() {
        let mut session = Session::new(MemoryPersistence::new(), 1);
        assert_eq!(session.press(0), PressOutcome::NoChange);
        assert_eq!(session.tick(), TickOutcome::Suppressed);
        assert_eq!(session.apply_power_up(0), Err(GameError::NoActiveRound));
        assert_eq!(
            session.grant_power_up(PowerUpKind::RowHint),
            Err(GameError::NoActiveRound)
        );
    }

    #[test]
    fn granted_power_up_reaches_feedback() {
        let feedback = Vec::<RoundEvent>::new();
        let mut session = Session::with_feedback(MemoryPersistence::new(), feedback, 4);
        session.start_free_play(Mode::Classic, BoardSize::FOUR);

        let token = session.grant_power_up(PowerUpKind::FreezeTime).unwrap();

        assert_eq!(session.feedback(), &[RoundEvent::PowerUpAwarded(token)]);
        assert_eq!(session.round().unwrap().active_power_ups(), &[token]);
    }

    #[test]
    fn abandoned_round_is_not_recorded() {
        let mut session = Session::new(MemoryPersistence::new(), 2);
        session.start_puzzle(Pack::Beginner, 0).unwrap();

        let dropped = session.abandon().unwrap();

        assert_eq!(dropped.state(), EngineState::Playing);
        assert!(session.round().is_none());
        assert_eq!(session.press(0), PressOutcome::NoChange);
        assert!(!session.store().is_puzzle_completed(Pack::Beginner, 0));
    }

    #[test]
    fn winning_a_puzzle_records_one_result() {
        let feedback = Vec::<RoundEvent>::new();
        let mut session = Session::with_feedback(MemoryPersistence::new(), feedback, 1);
        session.start_puzzle(Pack::Beginner, 0).unwrap();

        session.press(0);
        assert_eq!(session.press(1), PressOutcome::Won);
        // presses after the win must not record again
        session.press(0);

        let key = BucketKey::Puzzle {
            pack: Pack::Beginner,
            index: 0,
        };
        let records = session.store().leaderboard().records(&key);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].moves, 1);
        assert_eq!(records[0].player_label, "Player");
        assert!(session.store().is_puzzle_completed(Pack::Beginner, 0));
        assert!(session.feedback().contains(&RoundEvent::Won {
            moves: 1,
            time_remaining: 60,
        }));
    }

    #[test]
    fn free_play_remembers_last_choice() {
        let mut session = Session::new(MemoryPersistence::new(), 7);
        session.start_free_play(Mode::Pattern, BoardSize::SIX);

        assert_eq!(session.store().profile().last_mode, Mode::Pattern);
        assert_eq!(session.store().profile().last_size, BoardSize::SIX);
        assert_eq!(session.round().map(PlayEngine::size), Some(BoardSize::SIX));
    }
}
