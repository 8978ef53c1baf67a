//! Temporary power-up effects and their countdowns

use serde::{Deserialize, Serialize};

/// Effect kinds granted by power-up items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Coins count twice
    DoubleScore,
    /// Obstacle contact is not lethal
    Phase,
}

impl EffectKind {
    pub const ALL: [EffectKind; 2] = [EffectKind::DoubleScore, EffectKind::Phase];

    /// HUD label prefix
    pub fn label(self) -> &'static str {
        match self {
            EffectKind::DoubleScore => "Double Points",
            EffectKind::Phase => "Ghost Mode",
        }
    }
}

/// Active power-up effects: seconds remaining per kind, 0 = inactive.
///
/// One slot per kind, so re-applying an effect resets its countdown
/// instead of stacking a second instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub double_score: f32,
    pub phase: f32,
}

impl ActiveEffects {
    fn slot_mut(&mut self, kind: EffectKind) -> &mut f32 {
        match kind {
            EffectKind::DoubleScore => &mut self.double_score,
            EffectKind::Phase => &mut self.phase,
        }
    }

    pub fn remaining(&self, kind: EffectKind) -> f32 {
        match kind {
            EffectKind::DoubleScore => self.double_score,
            EffectKind::Phase => self.phase,
        }
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        self.remaining(kind) > 0.0
    }

    /// Start (or restart) an effect. Returns true if it was already running.
    pub fn activate(&mut self, kind: EffectKind, duration: f32) -> bool {
        let slot = self.slot_mut(kind);
        let was_active = *slot > 0.0;
        *slot = duration.max(0.0);
        log::debug!("{:?} active for {:.1}s (refresh: {})", kind, duration, was_active);
        was_active
    }

    /// Count down every running effect; returns the kinds that ran out this call
    pub fn update(&mut self, dt: f32) -> Vec<EffectKind> {
        let mut expired = Vec::new();
        for kind in EffectKind::ALL {
            let slot = self.slot_mut(kind);
            if *slot > 0.0 {
                *slot -= dt;
                if *slot <= 0.0 {
                    *slot = 0.0;
                    expired.push(kind);
                }
            }
        }
        expired
    }

    /// Coin value under the current effects
    pub fn coin_value(&self) -> u32 {
        if self.is_active(EffectKind::DoubleScore) {
            2
        } else {
            1
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reapply_resets_not_stacks() {
        let mut fx = ActiveEffects::default();
        assert!(!fx.activate(EffectKind::DoubleScore, 5.0));
        assert!(fx.activate(EffectKind::DoubleScore, 5.0));
        assert_eq!(fx.remaining(EffectKind::DoubleScore), 5.0);

        fx.update(2.0);
        fx.activate(EffectKind::DoubleScore, 5.0);
        assert_eq!(fx.remaining(EffectKind::DoubleScore), 5.0);
    }

    #[test]
    fn test_expiry_reported_once() {
        let mut fx = ActiveEffects::default();
        fx.activate(EffectKind::Phase, 1.0);
        assert!(fx.update(0.6).is_empty());
        assert_eq!(fx.update(0.6), vec![EffectKind::Phase]);
        assert!(!fx.is_active(EffectKind::Phase));
        assert!(fx.update(0.6).is_empty());
    }

    #[test]
    fn test_kinds_are_independent() {
        let mut fx = ActiveEffects::default();
        fx.activate(EffectKind::Phase, 5.0);
        fx.activate(EffectKind::DoubleScore, 2.0);
        let expired = fx.update(3.0);
        assert_eq!(expired, vec![EffectKind::DoubleScore]);
        assert!(fx.is_active(EffectKind::Phase));
        assert_eq!(fx.remaining(EffectKind::Phase), 2.0);
    }

    #[test]
    fn test_coin_value() {
        let mut fx = ActiveEffects::default();
        assert_eq!(fx.coin_value(), 1);
        fx.activate(EffectKind::DoubleScore, 5.0);
        assert_eq!(fx.coin_value(), 2);
        fx.clear();
        assert_eq!(fx.coin_value(), 1);
    }
}
