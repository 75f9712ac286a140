//! Personality trait scores derived from interview analysis metrics
//!
//! Every trait is a weighted sum of inputs that each lie in `[0, 1]`, with
//! weights summing to 1, scaled to `0..=100`. The formulas:
//!
//! | trait             | formula                                                        |
//! |-------------------|----------------------------------------------------------------|
//! | openness          | 0.40 surprised + 0.30 happy + 0.30 pace                        |
//! | conscientiousness | 0.40 neutral + 0.30 pace + 0.30 eye_contact                    |
//! | extraversion      | 0.45 happy + 0.15 surprised + 0.40 eye_contact                 |
//! | agreeableness     | 0.50 happy + 0.30 (1 - angry - disgusted) + 0.20 eye_contact   |
//! | neuroticism       | 0.40 fearful + 0.30 sad + 0.20 angry + 0.10 (1 - eye_contact)  |
//!
//! Emotion values are fractions of the total emotion mass; `pace` is
//! `speaking_pace_factor(wpm)`.

use serde::{Deserialize, Serialize};

/// Speaking pace considered ideal, in words per minute
pub const IDEAL_PACE_WPM: f32 = 150.0;

/// Distance from the ideal pace at which the pace factor reaches zero
pub const PACE_TOLERANCE_WPM: f32 = 100.0;

/// Emotion detector output; values are relative weights, not required to
/// sum to 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionBreakdown {
    pub happy: f32,
    pub neutral: f32,
    pub sad: f32,
    pub angry: f32,
    pub surprised: f32,
    pub fearful: f32,
    pub disgusted: f32,
}

impl EmotionBreakdown {
    /// Fractions summing to 1; negative values count as 0 and an empty
    /// breakdown is treated as fully neutral
    pub fn normalized(&self) -> Self {
        let c = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let raw = Self {
            happy: c(self.happy),
            neutral: c(self.neutral),
            sad: c(self.sad),
            angry: c(self.angry),
            surprised: c(self.surprised),
            fearful: c(self.fearful),
            disgusted: c(self.disgusted),
        };

        let total = raw.happy
            + raw.neutral
            + raw.sad
            + raw.angry
            + raw.surprised
            + raw.fearful
            + raw.disgusted;

        if total <= f32::EPSILON {
            return Self {
                neutral: 1.0,
                ..Self::default()
            };
        }

        Self {
            happy: raw.happy / total,
            neutral: raw.neutral / total,
            sad: raw.sad / total,
            angry: raw.angry / total,
            surprised: raw.surprised / total,
            fearful: raw.fearful / total,
            disgusted: raw.disgusted / total,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitInputs {
    pub emotions: EmotionBreakdown,
    /// Share of answer time spent looking at the camera, `[0, 1]`
    pub eye_contact: f32,
    pub speaking_pace_wpm: f32,
}

/// Big Five scores, each in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitScores {
    pub openness: f32,
    pub conscientiousness: f32,
    pub extraversion: f32,
    pub agreeableness: f32,
    pub neuroticism: f32,
}

impl TraitScores {
    /// Mean of the five traits with neuroticism inverted
    pub fn overall_score(&self) -> f32 {
        (self.openness
            + self.conscientiousness
            + self.extraversion
            + self.agreeableness
            + (100.0 - self.neuroticism))
            / 5.0
    }
}

/// 1 at the ideal pace, falling linearly to 0 at `PACE_TOLERANCE_WPM` away
pub fn speaking_pace_factor(wpm: f32) -> f32 {
    if !wpm.is_finite() || wpm <= 0.0 {
        return 0.0;
    }
    let distance = (wpm - IDEAL_PACE_WPM).abs() / PACE_TOLERANCE_WPM;
    (1.0 - distance).clamp(0.0, 1.0)
}

pub fn derive_traits(inputs: &TraitInputs) -> TraitScores {
    let e = inputs.emotions.normalized();
    let eye = if inputs.eye_contact.is_finite() {
        inputs.eye_contact.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let pace = speaking_pace_factor(inputs.speaking_pace_wpm);
    let calm = (1.0 - e.angry - e.disgusted).max(0.0);

    TraitScores {
        openness: scale(0.40 * e.surprised + 0.30 * e.happy + 0.30 * pace),
        conscientiousness: scale(0.40 * e.neutral + 0.30 * pace + 0.30 * eye),
        extraversion: scale(0.45 * e.happy + 0.15 * e.surprised + 0.40 * eye),
        agreeableness: scale(0.50 * e.happy + 0.30 * calm + 0.20 * eye),
        neuroticism: scale(0.40 * e.fearful + 0.30 * e.sad + 0.20 * e.angry + 0.10 * (1.0 - eye)),
    }
}

fn scale(unit: f32) -> f32 {
    (unit * 100.0).clamp(0.0, 100.0)
}
