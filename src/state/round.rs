use super::{PendingSpin, Session};
use crate::effects::celebration_for;
use crate::random::{shuffle, RandomSource};
use crate::types::*;

/// What a spin request turned into
#[derive(Debug, Clone, PartialEq)]
pub enum SpinRequest {
    /// Not playing, nobody left, or a spin is already running
    Ignored,
    /// Wheel must animate to `plan.target_rotation`, then report completion
    Started(SpinPlan),
    /// Only one participant was left; picked without spinning
    PickedWithoutSpin(Celebration),
}

impl Session {
    /// Participants on the wheel, in round order.
    ///
    /// Unpicked participants plus, while the winner is being announced, the
    /// winner itself so its segment stays visible under the pointer.
    pub fn active_participants(&self) -> Vec<Participant> {
        let announced = match self.phase {
            RoundPhase::Winner => self.current_winner.as_ref().map(|w| w.id.as_str()),
            _ => None,
        };

        self.shuffled_order
            .iter()
            .filter_map(|id| self.roster.iter().find(|p| &p.id == id))
            .filter(|p| !p.picked || Some(p.id.as_str()) == announced)
            .cloned()
            .collect()
    }

    pub fn request_spin(&mut self, rng: &mut dyn RandomSource) -> SpinRequest {
        if self.app_phase != AppPhase::Game || self.phase != RoundPhase::Playing {
            tracing::debug!(
                "Ignoring spin request in {:?}/{:?}",
                self.app_phase,
                self.phase
            );
            return SpinRequest::Ignored;
        }

        let active = self.active_participants();
        match active.len() {
            0 => {
                tracing::debug!("Ignoring spin request: nobody left");
                SpinRequest::Ignored
            }
            1 => {
                let last = active[0].clone();
                tracing::info!("Only {} left, picking without a spin", last.name);
                match self.record_pick(&last.id, true) {
                    Some(c) => SpinRequest::PickedWithoutSpin(c),
                    None => SpinRequest::Ignored,
                }
            }
            _ => {
                let Some(res) = self.resolver.resolve(&active, self.rotation, rng) else {
                    return SpinRequest::Ignored;
                };

                self.spin_token += 1;
                let duration_ms = self.draw_spin_duration(rng);
                self.pending_spin = Some(PendingSpin {
                    token: self.spin_token,
                    winner_id: res.winner.id.clone(),
                    target_rotation: res.target_rotation,
                });
                self.phase = RoundPhase::Spinning;

                tracing::info!(
                    "Spin {} started over {} participants",
                    self.spin_token,
                    active.len()
                );

                SpinRequest::Started(SpinPlan {
                    spin_token: self.spin_token,
                    winner: res.winner,
                    winner_index: res.winner_index,
                    segment_angle: res.segment_angle,
                    target_rotation: res.target_rotation,
                    duration_ms,
                })
            }
        }
    }

    fn draw_spin_duration(&self, rng: &mut dyn RandomSource) -> u64 {
        let min = self.config.spin_duration_min_ms;
        let max = self.config.spin_duration_max_ms;
        min + (rng.next_f64() * (max - min) as f64).round() as u64
    }

    /// Presentation finished animating spin `token`.
    ///
    /// Completions for a spin that was aborted by a reset, or that already
    /// landed, are discarded.
    pub fn complete_spin(&mut self, token: SpinToken) -> Option<Celebration> {
        let matches = self
            .pending_spin
            .as_ref()
            .is_some_and(|p| p.token == token);
        if self.phase != RoundPhase::Spinning || !matches {
            tracing::debug!("Discarding stale spin completion {}", token);
            return None;
        }

        let pending = self.pending_spin.take()?;
        self.rotation = pending.target_rotation;
        self.record_pick(&pending.winner_id, false)
    }

    /// Mark a participant picked and enter the winner phase
    fn record_pick(&mut self, id: &str, without_spin: bool) -> Option<Celebration> {
        let Some(winner) = self.roster.iter_mut().find(|p| p.id == id && !p.picked) else {
            tracing::warn!("Winner {} is not an unpicked participant", id);
            self.phase = RoundPhase::Playing;
            return None;
        };
        winner.picked = true;
        let winner = winner.clone();

        self.pick_order.push(winner.clone());
        self.current_winner = Some(winner.clone());
        self.phase = RoundPhase::Winner;

        let pick_number = self.pick_order.len();
        tracing::info!(
            "Winner #{}: {} ({} left)",
            pick_number,
            winner.name,
            self.remaining_count()
        );

        Some(celebration_for(
            &winner,
            pick_number,
            self.sound_enabled,
            without_spin,
            &self.config,
        ))
    }

    /// Leave the winner announcement. Returns the new phase, or `None` if ignored.
    pub fn advance(&mut self) -> Option<RoundPhase> {
        if self.phase != RoundPhase::Winner {
            tracing::debug!("Ignoring advance in {:?}", self.phase);
            return None;
        }

        self.current_winner = None;
        self.phase = if self.remaining_count() == 0 {
            RoundPhase::Finished
        } else {
            RoundPhase::Playing
        };

        tracing::info!("Advanced to {:?}", self.phase);
        Some(self.phase)
    }

    /// Un-pick everyone and reshuffle the wheel. Aborts a running spin.
    pub fn restart_round(&mut self, rng: &mut dyn RandomSource) -> bool {
        if self.app_phase != AppPhase::Game {
            tracing::debug!("Ignoring restart outside a game");
            return false;
        }

        self.abort_pending_spin();
        for p in &mut self.roster {
            p.picked = false;
        }

        let mut order: Vec<ParticipantId> = self.roster.iter().map(|p| p.id.clone()).collect();
        shuffle(&mut order, rng);
        self.shuffled_order = order;
        self.pick_order.clear();
        self.current_winner = None;
        self.phase = RoundPhase::Playing;

        tracing::info!("Round restarted with {} participants", self.roster.len());
        true
    }

    /// Drop everything and go back to name entry. Aborts a running spin.
    pub fn new_game(&mut self) {
        self.abort_pending_spin();
        self.roster.clear();
        self.shuffled_order.clear();
        self.pick_order.clear();
        self.current_winner = None;
        self.rotation = 0.0;
        self.phase = RoundPhase::Playing;
        self.app_phase = AppPhase::Input;

        tracing::info!("New game, back to name entry");
    }

    fn abort_pending_spin(&mut self) {
        if let Some(pending) = self.pending_spin.take() {
            tracing::info!("Aborting spin {}", pending.token);
        }
        // Invalidate any completion still in flight
        self.spin_token += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, SeededRandom};
    use std::collections::HashSet;

    fn game(names: &str, rng: &mut dyn RandomSource) -> Session {
        let mut session = Session::default();
        session.submit_names(names).unwrap();
        session.start_game(rng).unwrap();
        session
    }

    fn assert_counts_consistent(session: &Session) {
        assert_eq!(
            session.pick_order().len() + session.remaining_count(),
            session.roster().len()
        );
    }

    /// Spin and immediately land, returning the celebration
    fn spin_once(session: &mut Session, rng: &mut dyn RandomSource) -> Celebration {
        match session.request_spin(rng) {
            SpinRequest::Started(plan) => session.complete_spin(plan.spin_token).unwrap(),
            SpinRequest::PickedWithoutSpin(c) => c,
            SpinRequest::Ignored => panic!("spin unexpectedly ignored"),
        }
    }

    #[test]
    fn test_full_round_picks_everyone_once() {
        for n in 2..=20 {
            let mut rng = SeededRandom::new(n as u64);
            let names: Vec<String> = (0..n).map(|i| format!("Person {}", i)).collect();
            let mut session = game(&names.join(";"), &mut rng);

            let mut winners = 0;
            while session.phase() != RoundPhase::Finished {
                let c = spin_once(&mut session, &mut rng);
                winners += 1;
                assert_eq!(c.pick_number, winners);
                assert_eq!(session.phase(), RoundPhase::Winner);
                assert_counts_consistent(&session);
                session.advance().unwrap();
            }

            assert_eq!(winners, n);
            let ids: HashSet<_> = session.pick_order().iter().map(|p| p.id.clone()).collect();
            assert_eq!(ids.len(), n);
            assert!(session.roster().iter().all(|p| p.picked));
        }
    }

    #[test]
    fn test_spin_lands_on_planned_winner() {
        let mut rng = SeededRandom::new(11);
        let mut session = game("A; B; C; D", &mut rng);

        let plan = match session.request_spin(&mut rng) {
            SpinRequest::Started(plan) => plan,
            other => panic!("Expected Started, got {:?}", other),
        };
        assert_eq!(session.phase(), RoundPhase::Spinning);
        assert_eq!(session.active_participants()[plan.winner_index].id, plan.winner.id);
        assert!((4000..=6000).contains(&plan.duration_ms));

        let c = session.complete_spin(plan.spin_token).unwrap();
        assert_eq!(c.winner.id, plan.winner.id);
        assert_eq!(session.rotation(), plan.target_rotation);
        assert_eq!(session.current_winner().unwrap().id, plan.winner.id);
        assert_eq!(session.pick_order()[0].id, plan.winner.id);
    }

    #[test]
    fn test_second_spin_while_spinning_ignored() {
        let mut rng = SeededRandom::new(2);
        let mut session = game("A; B; C", &mut rng);

        let SpinRequest::Started(plan) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        let roster_before = session.roster().to_vec();

        assert_eq!(session.request_spin(&mut rng), SpinRequest::Ignored);
        assert_eq!(session.roster(), roster_before.as_slice());
        assert!(session.pick_order().is_empty());
        assert_eq!(session.pending_spin_token(), Some(plan.spin_token));
    }

    #[test]
    fn test_completion_applies_once() {
        let mut rng = SeededRandom::new(3);
        let mut session = game("A; B; C", &mut rng);

        let SpinRequest::Started(plan) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        assert!(session.complete_spin(plan.spin_token).is_some());
        assert!(session.complete_spin(plan.spin_token).is_none());
        assert_eq!(session.pick_order().len(), 1);
    }

    #[test]
    fn test_wrong_token_discarded() {
        let mut rng = SeededRandom::new(4);
        let mut session = game("A; B; C", &mut rng);

        let SpinRequest::Started(plan) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        assert!(session.complete_spin(plan.spin_token + 1).is_none());
        assert_eq!(session.phase(), RoundPhase::Spinning);
    }

    #[test]
    fn test_last_participant_picked_without_spin() {
        let mut rng = SeededRandom::new(6);
        let mut session = game("A; B", &mut rng);

        spin_once(&mut session, &mut rng);
        session.advance().unwrap();
        let rotation = session.rotation();

        match session.request_spin(&mut rng) {
            SpinRequest::PickedWithoutSpin(c) => {
                assert_eq!(c.pick_number, 2);
                assert_eq!(c.duration_ms, 3000);
            }
            other => panic!("Expected PickedWithoutSpin, got {:?}", other),
        }
        assert_eq!(session.phase(), RoundPhase::Winner);
        assert_eq!(session.rotation(), rotation);
        assert_eq!(session.advance(), Some(RoundPhase::Finished));

        // Finished is terminal until a reset
        assert_eq!(session.request_spin(&mut rng), SpinRequest::Ignored);
        assert_eq!(session.advance(), None);
    }

    #[test]
    fn test_advance_only_from_winner() {
        let mut rng = SeededRandom::new(7);
        let mut session = game("A; B; C", &mut rng);
        assert_eq!(session.advance(), None);
        assert_eq!(session.phase(), RoundPhase::Playing);

        let SpinRequest::Started(_) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        assert_eq!(session.advance(), None);
        assert_eq!(session.phase(), RoundPhase::Spinning);
    }

    #[test]
    fn test_winner_stays_on_wheel_until_advance() {
        let mut rng = SeededRandom::new(8);
        let mut session = game("A; B; C", &mut rng);

        let c = spin_once(&mut session, &mut rng);
        let active = session.active_participants();
        assert_eq!(active.len(), 3);
        assert!(active.iter().any(|p| p.id == c.winner.id));

        session.advance().unwrap();
        let active = session.active_participants();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|p| p.id != c.winner.id));
    }

    #[test]
    fn test_active_order_follows_shuffled_order() {
        let mut rng = SeededRandom::new(9);
        let mut session = game("A; B; C; D; E", &mut rng);
        let order = session.shuffled_order().to_vec();

        spin_once(&mut session, &mut rng);
        session.advance().unwrap();

        let expected: Vec<_> = order
            .iter()
            .filter(|id| !session.pick_order().iter().any(|p| &&p.id == id))
            .cloned()
            .collect();
        let active: Vec<_> = session.active_participants().into_iter().map(|p| p.id).collect();
        assert_eq!(active, expected);
    }

    #[test]
    fn test_restart_round_resets_picks() {
        let mut rng = SeededRandom::new(10);
        let mut session = game("A; B; C; D", &mut rng);
        spin_once(&mut session, &mut rng);
        session.advance().unwrap();
        spin_once(&mut session, &mut rng);

        let ids_before: HashSet<_> = session.shuffled_order().iter().cloned().collect();
        let rotation = session.rotation();

        assert!(session.restart_round(&mut rng));
        assert_eq!(session.phase(), RoundPhase::Playing);
        assert!(session.pick_order().is_empty());
        assert!(session.current_winner().is_none());
        assert!(session.roster().iter().all(|p| !p.picked));

        let ids_after: HashSet<_> = session.shuffled_order().iter().cloned().collect();
        assert_eq!(session.shuffled_order().len(), 4);
        assert_eq!(ids_before, ids_after);
        assert_eq!(session.rotation(), rotation);
        assert_counts_consistent(&session);
    }

    #[test]
    fn test_restart_from_finished() {
        let mut rng = SeededRandom::new(12);
        let mut session = game("A; B", &mut rng);
        while session.phase() != RoundPhase::Finished {
            spin_once(&mut session, &mut rng);
            session.advance().unwrap();
        }

        assert!(session.restart_round(&mut rng));
        assert_eq!(session.remaining_count(), 2);
        assert!(matches!(
            session.request_spin(&mut rng),
            SpinRequest::Started(_)
        ));
    }

    #[test]
    fn test_restart_during_spin_discards_completion() {
        let mut rng = SeededRandom::new(13);
        let mut session = game("A; B; C", &mut rng);

        let SpinRequest::Started(plan) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        assert!(session.restart_round(&mut rng));
        assert!(session.pending_spin_token().is_none());

        assert!(session.complete_spin(plan.spin_token).is_none());
        assert_eq!(session.phase(), RoundPhase::Playing);
        assert!(session.pick_order().is_empty());
        assert_eq!(session.remaining_count(), 3);
    }

    #[test]
    fn test_stale_completion_after_restart_and_new_spin() {
        let mut rng = SeededRandom::new(14);
        let mut session = game("A; B; C", &mut rng);

        let SpinRequest::Started(old) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        session.restart_round(&mut rng);
        let SpinRequest::Started(new) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        assert_ne!(old.spin_token, new.spin_token);

        assert!(session.complete_spin(old.spin_token).is_none());
        assert_eq!(session.phase(), RoundPhase::Spinning);
        assert!(session.complete_spin(new.spin_token).is_some());
    }

    #[test]
    fn test_new_game_during_spin() {
        let mut rng = SeededRandom::new(15);
        let mut session = game("A; B; C", &mut rng);

        let SpinRequest::Started(plan) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        session.new_game();

        assert_eq!(session.app_phase(), AppPhase::Input);
        assert!(session.roster().is_empty());
        assert!(session.shuffled_order().is_empty());
        assert!(session.pick_order().is_empty());
        assert_eq!(session.rotation(), 0.0);
        assert!(session.complete_spin(plan.spin_token).is_none());
        assert_eq!(session.request_spin(&mut rng), SpinRequest::Ignored);
    }

    #[test]
    fn test_restart_outside_game_ignored() {
        let mut rng = SeededRandom::new(16);
        let mut session = Session::default();
        assert!(!session.restart_round(&mut rng));
    }

    #[test]
    fn test_rotation_strictly_increases_across_round() {
        let mut rng = SeededRandom::new(17);
        let names: Vec<String> = (0..10).map(|i| format!("P{}", i)).collect();
        let mut session = game(&names.join(";"), &mut rng);

        let mut last = session.rotation();
        while session.remaining_count() > 1 {
            spin_once(&mut session, &mut rng);
            assert!(session.rotation() > last);
            last = session.rotation();
            session.advance().unwrap();
        }
    }

    #[test]
    fn test_scripted_winner() {
        let mut session = game("A; B; C", &mut SeededRandom::new(19));
        let order = session.shuffled_order().to_vec();

        // index, turns, offset, duration
        let mut rng = ScriptedRandom::new([0.99, 0.0, 0.5, 0.0]);

        let SpinRequest::Started(plan) = session.request_spin(&mut rng) else {
            panic!("Expected spin to start");
        };
        assert_eq!(plan.winner_index, 2);
        assert_eq!(plan.winner.id, order[2]);
        assert_eq!(plan.duration_ms, 4000);
    }

    #[test]
    fn test_sound_flag_flows_into_celebration() {
        let mut rng = SeededRandom::new(18);
        let mut session = game("A; B", &mut rng);
        session.set_sound_enabled(true);

        let c = spin_once(&mut session, &mut rng);
        assert!(c.play_sound);
        assert_eq!(c.duration_ms, 2500);
        assert_eq!(
            c.confetti_seed,
            crate::effects::confetti_seed(&c.winner.id, 1)
        );
    }
}
