use super::Session;
use crate::error::WheelError;
use crate::names::{check_name_count, parse_names_capped, sanitize_name, validate_name_count_within};
use crate::random::{shuffle, RandomSource};
use crate::types::*;

impl Session {
    fn require_app_phase(&self, expected: AppPhase) -> Result<(), WheelError> {
        if self.app_phase != expected {
            return Err(WheelError::WrongAppPhase {
                expected,
                actual: self.app_phase,
            });
        }
        Ok(())
    }

    /// Parse pasted text into the roster and move on to the list editor
    pub fn submit_names(&mut self, text: &str) -> Result<&[Participant], WheelError> {
        self.require_app_phase(AppPhase::Input)?;

        let people = parse_names_capped(text, self.config.max_name_length);
        if people.is_empty() {
            return Err(WheelError::NoNamesParsed);
        }

        tracing::info!("Parsed {} names", people.len());
        self.roster = people;
        self.app_phase = AppPhase::List;
        Ok(&self.roster)
    }

    /// Go back to the text input, keeping the roster around
    pub fn back_to_input(&mut self) -> Result<(), WheelError> {
        self.require_app_phase(AppPhase::List)?;
        self.app_phase = AppPhase::Input;
        Ok(())
    }

    /// Add one name from the list editor
    pub fn add_name(&mut self, raw: &str) -> Result<Participant, WheelError> {
        self.require_app_phase(AppPhase::List)?;

        if self.roster.len() >= self.config.max_names {
            return Err(WheelError::RosterFull {
                max: self.config.max_names,
            });
        }

        let name = sanitize_name(raw, self.config.max_name_length);
        if name.is_empty() {
            return Err(WheelError::EmptyName);
        }

        let participant = Participant::new(name);
        tracing::info!("Added {} ({})", participant.name, participant.id);
        self.roster.push(participant.clone());
        Ok(participant)
    }

    pub fn remove_name(&mut self, id: &str) -> Result<Participant, WheelError> {
        self.require_app_phase(AppPhase::List)?;

        let pos = self
            .roster
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| WheelError::UnknownParticipant(id.to_string()))?;

        let removed = self.roster.remove(pos);
        tracing::info!("Removed {} ({})", removed.name, removed.id);
        Ok(removed)
    }

    pub fn roster_validation(&self) -> NameCountValidation {
        validate_name_count_within(
            self.roster.len(),
            self.config.min_names,
            self.config.max_names,
        )
    }

    /// Validate the roster size, shuffle the wheel order and start playing
    pub fn start_game(&mut self, rng: &mut dyn RandomSource) -> Result<(), WheelError> {
        self.require_app_phase(AppPhase::List)?;
        check_name_count(
            self.roster.len(),
            self.config.min_names,
            self.config.max_names,
        )?;

        shuffle(&mut self.roster, rng);
        for p in &mut self.roster {
            p.picked = false;
        }
        self.shuffled_order = self.roster.iter().map(|p| p.id.clone()).collect();
        self.pick_order.clear();
        self.current_winner = None;
        self.pending_spin = None;
        self.rotation = 0.0;
        self.phase = RoundPhase::Playing;
        self.app_phase = AppPhase::Game;

        tracing::info!("Game started with {} participants", self.roster.len());
        Ok(())
    }
}
