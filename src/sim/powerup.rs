//! Timed power-ups
//!
//! Each power-up is an optional expiry time on the session clock. Expiry is
//! checked every step, so a restart (which replaces the set) leaves nothing
//! pending.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Level timer stops counting down
    TimeFreeze,
    /// Tap points are doubled
    ScoreDoubler,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::TimeFreeze, PowerUpKind::ScoreDoubler];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::TimeFreeze => "Time Frozen!",
            PowerUpKind::ScoreDoubler => "Score x2!",
        }
    }

    /// Pick one uniformly
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PowerUps {
    time_freeze_until: Option<f64>,
    score_doubler_until: Option<f64>,
}

impl PowerUps {
    fn slot(&mut self, kind: PowerUpKind) -> &mut Option<f64> {
        match kind {
            PowerUpKind::TimeFreeze => &mut self.time_freeze_until,
            PowerUpKind::ScoreDoubler => &mut self.score_doubler_until,
        }
    }

    /// Activate (or refresh) `kind` until `now_ms + duration_ms`
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: f64, duration_ms: f64) {
        *self.slot(kind) = Some(now_ms + duration_ms);
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::TimeFreeze => self.time_freeze_until.is_some(),
            PowerUpKind::ScoreDoubler => self.score_doubler_until.is_some(),
        }
    }

    /// Clear every power-up whose expiry has passed; returns the ones cleared
    pub fn expire(&mut self, now_ms: f64) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            let slot = self.slot(kind);
            if slot.is_some_and(|until| now_ms >= until) {
                *slot = None;
                expired.push(kind);
            }
        }
        expired
    }

    /// Points multiplier from the score doubler
    pub fn score_multiplier(&self) -> u64 {
        if self.is_active(PowerUpKind::ScoreDoubler) { 2 } else { 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_expire() {
        let mut p = PowerUps::default();
        p.activate(PowerUpKind::TimeFreeze, 1000.0, 5000.0);
        assert!(p.is_active(PowerUpKind::TimeFreeze));
        assert!(!p.is_active(PowerUpKind::ScoreDoubler));

        assert!(p.expire(5999.0).is_empty());
        assert_eq!(p.expire(6000.0), vec![PowerUpKind::TimeFreeze]);
        assert!(!p.is_active(PowerUpKind::TimeFreeze));
    }

    #[test]
    fn test_expire_is_noop_when_inactive() {
        let mut p = PowerUps::default();
        assert!(p.expire(1e9).is_empty());
        p.activate(PowerUpKind::ScoreDoubler, 0.0, 10.0);
        assert_eq!(p.expire(20.0), vec![PowerUpKind::ScoreDoubler]);
        assert!(p.expire(30.0).is_empty());
    }

    #[test]
    fn test_reactivation_extends() {
        let mut p = PowerUps::default();
        p.activate(PowerUpKind::ScoreDoubler, 0.0, 100.0);
        p.activate(PowerUpKind::ScoreDoubler, 90.0, 100.0);
        assert!(p.expire(150.0).is_empty());
        assert_eq!(p.score_multiplier(), 2);
        p.expire(190.0);
        assert_eq!(p.score_multiplier(), 1);
    }
}
