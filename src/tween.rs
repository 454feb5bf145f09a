//! Time-driven property interpolation for panel actions.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};


/// Easing curves applied to tween progress
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// Fast start, slow end: `1 - (1 - t)^2`
    #[default]
    QuadraticOut,
}

impl Easing {
    /// Input is clamped to [0, 1]
    #[inline]
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
        }
    }
}


#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn progress(&self, now_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn value_at(&self, now_ms: f64) -> f32 {
        let k = self.easing.evaluate(self.progress(now_ms)) as f32;
        self.from + (self.to - self.from) * k
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}


/// Tweens on the cube's y-rotation. Overlapping tweens all write each frame; the newest wins.
#[derive(Debug, Default)]
pub struct Animator {
    tweens: Vec<Tween>,
    easing: Easing,
}

impl Animator {
    pub fn new(easing: Easing) -> Self {
        Self { tweens: Vec::new(), easing }
    }

    /// Schedules one full turn starting from `current`
    pub fn spin(&mut self, current: f32, now_ms: f64, duration_ms: f64) {
        self.tweens.push(Tween {
            from: current,
            to: current + TAU,
            start_ms: now_ms,
            duration_ms,
            easing: self.easing,
        });
    }

    /// Writes every active tween into `value` in scheduling order and drops the finished ones.
    /// Returns whether anything was written.
    pub fn update(&mut self, now_ms: f64, value: &mut f32) -> bool {
        if self.tweens.is_empty() {
            return false;
        }
        for tween in self.tweens.iter() {
            *value = tween.value_at(now_ms);
        }
        self.tweens.retain(|tween| !tween.is_finished(now_ms));
        true
    }

    pub fn in_flight(&self) -> usize {
        self.tweens.len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        for easing in [Easing::Linear, Easing::QuadraticOut] {
            assert_eq!(easing.evaluate(0.0), 0.0);
            assert_eq!(easing.evaluate(1.0), 1.0);
            assert_eq!(easing.evaluate(-1.0), 0.0);
            assert_eq!(easing.evaluate(2.0), 1.0);
        }
        assert_eq!(Easing::QuadraticOut.evaluate(0.5), 0.75);
    }

    #[test]
    fn spin_adds_full_turn_at_completion() {
        let mut animator = Animator::default();
        let mut rotation = 0.3_f32;
        animator.spin(rotation, 1000.0, 1000.0);

        let mut now = 1000.0;
        while now < 2000.0 {
            now += 16.0;
            animator.update(now, &mut rotation);
        }
        assert!((rotation - (0.3 + TAU)).abs() < 1e-5);
        assert_eq!(animator.in_flight(), 0);
        assert!(!animator.update(now + 16.0, &mut rotation));
    }

    #[test]
    fn animator_uses_its_easing() {
        let mut rotation = 0.0_f32;
        let mut linear = Animator::new(Easing::Linear);
        linear.spin(rotation, 0.0, 1000.0);
        linear.update(500.0, &mut rotation);
        assert!((rotation - TAU / 2.0).abs() < 1e-5);

        let mut rotation = 0.0_f32;
        let mut eased = Animator::default();
        eased.spin(rotation, 0.0, 1000.0);
        eased.update(500.0, &mut rotation);
        assert!((rotation - TAU * 0.75).abs() < 1e-5);
    }

    #[test]
    fn rotation_is_monotonic_during_spin() {
        let mut animator = Animator::default();
        let mut rotation = 0.0_f32;
        animator.spin(rotation, 0.0, 1000.0);
        let mut previous = rotation;
        for frame in 1..=60 {
            animator.update(frame as f64 * 1000.0 / 60.0, &mut rotation);
            assert!(rotation >= previous);
            previous = rotation;
        }
    }

    #[test]
    fn overlapping_spins_last_write_wins() {
        let mut animator = Animator::default();
        let mut rotation = 0.0_f32;
        animator.spin(rotation, 0.0, 1000.0);
        animator.update(500.0, &mut rotation);
        let midway = rotation;
        animator.spin(rotation, 500.0, 1000.0);
        assert_eq!(animator.in_flight(), 2);

        animator.update(1000.0, &mut rotation);
        // the first tween finished but the second one wrote last
        assert_eq!(animator.in_flight(), 1);
        let second = Tween {
            from: midway,
            to: midway + TAU,
            start_ms: 500.0,
            duration_ms: 1000.0,
            easing: Easing::default(),
        };
        assert_eq!(rotation, second.value_at(1000.0));

        animator.update(1500.0, &mut rotation);
        assert!((rotation - (midway + TAU)).abs() < 1e-5);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let tween = Tween { from: 1.0, to: 2.0, start_ms: 10.0, duration_ms: 0.0, easing: Easing::Linear };
        assert_eq!(tween.value_at(10.0), 2.0);
        assert!(tween.is_finished(10.0));
    }
}
