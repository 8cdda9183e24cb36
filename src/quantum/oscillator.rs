/*
Quantum Harmonic Oscillator (heuristic)
=======================================

Each scheduling step asks the oscillator for one "measurement": a position,
a momentum and a spin. None of this solves the Schrödinger equation. It
borrows the shape of the ground-state wavefunction and feeds it a classical
trajectory, which is enough to give the melody a breathing, periodic feel.

Vocabulary
----------

  t           Step time in seconds: step_index * (60 / bpm).

  x           Displacement. A classical swing of amplitude 5 plus a little
              uniform noise:  x = 5 * sin(omega * t) + noise

  psi         Ground-state amplitude at x:  psi = exp(-m*omega*x^2 / (2*hbar))

  position    |psi|^2 over the Gaussian normaliser sqrt(pi*hbar / (m*omega)),
              then amplified by 1.5. Peaks near 0.846 when x = 0 and falls to
              ~0 at the edges of the swing. Never clamped.

  momentum    -m*omega*x*psi (the slope of psi), shifted and scaled by the swing
              amplitude so it lands roughly in [0, 1]. Not clamped either.

  spin        A fair coin, independent of everything else.

With mass = omega = hbar = 1 this reduces to:

    position = exp(-x^2) / sqrt(pi) * 1.5
    momentum = (-x * exp(-x^2 / 2) + 5) / 10

The 1.5 gain and the sqrt(pi) divisor are not a real normalisation. They are
kept exactly as-is because the note mapper's pitch distribution depends on
them.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use rand::Rng;
use std::f64::consts::PI;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spin {
    Up,
    Down,
}

/// One oscillator measurement.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantumState {
    /// Amplified probability density at the sampled displacement
    pub position: f64,
    /// Rescaled wavefunction slope, roughly in [0, 1]
    pub momentum: f64,
    pub spin: Spin,
}

/// Produces one [`QuantumState`] per scheduling step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantumStateGenerator {
    pub mass: f64,
    pub omega: f64,
    pub hbar: f64,
    /// Classical swing amplitude of x
    pub amplitude: f64,
    /// Noise is drawn uniformly from [-noise, noise)
    pub noise: f64,
    /// Gain applied to the normalised density
    pub gain: f64,
}

impl Default for QuantumStateGenerator {
    fn default() -> Self {
        Self {
            mass: 1.0,
            omega: 1.0,
            hbar: 1.0,
            amplitude: 5.0,
            noise: 0.1,
            gain: 1.5,
        }
    }
}

impl QuantumStateGenerator {
    /// Sample the state for `step` at the given tempo, drawing noise and spin
    /// from `rng`.
    pub fn next<R: Rng + ?Sized>(&self, step: usize, bpm: u32, rng: &mut R) -> QuantumState {
        // Empty range panics in gen_range
        let noise = if self.noise > 0.0 {
            rng.gen_range(-self.noise..self.noise)
        } else {
            0.0
        };
        let spin = if rng.gen_bool(0.5) {
            Spin::Up
        } else {
            Spin::Down
        };
        self.state_at(step, bpm, noise, spin)
    }

    /// Deterministic half of [`next`](Self::next): the state for a given
    /// noise draw and spin.
    ///
    /// A zero tempo pins the clock at t = 0 so the result stays finite.
    pub fn state_at(&self, step: usize, bpm: u32, noise: f64, spin: Spin) -> QuantumState {
        let t = if bpm == 0 {
            0.0
        } else {
            step as f64 * (60.0 / bpm as f64)
        };

        let m_omega = self.mass * self.omega;
        let x = (self.omega * t).sin() * self.amplitude + noise;

        let psi = (-(m_omega * x * x) / (2.0 * self.hbar)).exp();
        let density = psi * psi;
        let position = density / (PI * self.hbar / m_omega).sqrt() * self.gain;

        let raw_momentum = -m_omega * x * psi;
        let momentum = (raw_momentum + m_omega * self.amplitude) / (2.0 * self.amplitude);

        QuantumState {
            position,
            momentum,
            spin,
        }
    }
}
