//! Priority scoring and labelling of openings.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::OpeningMistakeStats;

/// Move count at which the volume boost in the priority score saturates.
const BOOST_MOVES: f64 = 50.0;
/// Move count at which confidence reaches 1.0.
const CONFIDENT_MOVES: f64 = 100.0;

/// Settings for [`RecommendationEngine`]; doubles as the `[recommendation]` config section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    /// Maximum number of recommendations returned.
    pub top_openings: usize,
    /// Openings seen in fewer games are ignored.
    pub min_games_per_opening: usize,
    /// Recommendations below this confidence are flagged `low_confidence`.
    pub confidence_threshold: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            top_openings: 5,
            min_games_per_opening: 1,
            confidence_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    CriticalWeakness,
    MajorWeakness,
    ModerateWeakness,
    MinorImprovement,
}

impl RecommendationType {
    fn from_rates(blunder_rate: f64, mistake_rate: f64, inaccuracy_rate: f64) -> Self {
        if blunder_rate > 0.15 {
            RecommendationType::CriticalWeakness
        } else if mistake_rate > 0.25 {
            RecommendationType::MajorWeakness
        } else if inaccuracy_rate > 0.4 {
            RecommendationType::ModerateWeakness
        } else {
            RecommendationType::MinorImprovement
        }
    }

    /// Suggested study hours for an opening of this type.
    pub fn study_hours(self) -> u32 {
        match self {
            RecommendationType::CriticalWeakness => 8,
            RecommendationType::MajorWeakness => 6,
            RecommendationType::ModerateWeakness => 4,
            RecommendationType::MinorImprovement => 2,
        }
    }

    /// Human-readable title, e.g. "Critical Weakness".
    pub fn title(self) -> &'static str {
        match self {
            RecommendationType::CriticalWeakness => "Critical Weakness",
            RecommendationType::MajorWeakness => "Major Weakness",
            RecommendationType::ModerateWeakness => "Moderate Weakness",
            RecommendationType::MinorImprovement => "Minor Improvement",
        }
    }
}

impl fmt::Display for RecommendationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudyFocus {
    TacticalAwareness,
    Calculation,
    PositionalUnderstanding,
    OpeningPrinciples,
    MoveQuality,
    Planning,
    GeneralImprovement,
}

impl StudyFocus {
    pub fn as_str(self) -> &'static str {
        match self {
            StudyFocus::TacticalAwareness => "tactical_awareness",
            StudyFocus::Calculation => "calculation",
            StudyFocus::PositionalUnderstanding => "positional_understanding",
            StudyFocus::OpeningPrinciples => "opening_principles",
            StudyFocus::MoveQuality => "move_quality",
            StudyFocus::Planning => "planning",
            StudyFocus::GeneralImprovement => "general_improvement",
        }
    }

    fn from_rates(blunder_rate: f64, mistake_rate: f64, inaccuracy_rate: f64) -> Vec<Self> {
        let mut focus = Vec::new();
        if blunder_rate > 0.1 {
            focus.extend([StudyFocus::TacticalAwareness, StudyFocus::Calculation]);
        }
        if mistake_rate > 0.2 {
            focus.extend([StudyFocus::PositionalUnderstanding, StudyFocus::OpeningPrinciples]);
        }
        if inaccuracy_rate > 0.3 {
            focus.extend([StudyFocus::MoveQuality, StudyFocus::Planning]);
        }
        if focus.is_empty() {
            focus.push(StudyFocus::GeneralImprovement);
        }
        focus
    }
}

impl fmt::Display for StudyFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ranked suggestion to study one opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub opening: String,
    pub priority_score: f64,
    pub total_games: usize,
    pub total_moves: usize,
    pub blunder_rate: f64,
    pub mistake_rate: f64,
    pub inaccuracy_rate: f64,
    pub ok_rate: f64,
    pub recommendation_type: RecommendationType,
    pub study_focus: Vec<StudyFocus>,
    pub confidence: f64,
    pub low_confidence: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    settings: RecommendationSettings,
}

impl RecommendationEngine {
    pub fn new(settings: RecommendationSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RecommendationSettings {
        &self.settings
    }

    /// Weighted mistake rate, boosted by up to 2x as the move count grows.
    pub fn priority_score(stats: &OpeningMistakeStats) -> f64 {
        let m = &stats.mistakes;
        let weighted = 3.0 * m.blunder_rate + 2.0 * m.mistake_rate + m.inaccuracy_rate;
        let boost = (m.total_moves as f64 / BOOST_MOVES).min(1.0);
        weighted * (1.0 + boost)
    }

    pub fn confidence(stats: &OpeningMistakeStats) -> f64 {
        (stats.mistakes.total_moves as f64 / CONFIDENT_MOVES).min(1.0)
    }

    /// Scores every eligible opening and returns the top ones, highest priority first.
    ///
    /// Ties are broken by opening name so the ranking is deterministic.
    pub fn generate(&self, stats: &BTreeMap<String, OpeningMistakeStats>) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = stats
            .iter()
            .filter(|(opening, s)| {
                let eligible = s.total_games >= self.settings.min_games_per_opening;
                if !eligible {
                    debug!(%opening, games = s.total_games, "skipping opening with too few games");
                }
                eligible
            })
            .filter_map(|(opening, s)| {
                let priority_score = Self::priority_score(s);
                (priority_score > 0.0).then(|| self.recommend(opening, s, priority_score))
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.priority_score
                .total_cmp(&a.priority_score)
                .then_with(|| a.opening.cmp(&b.opening))
        });
        recommendations.truncate(self.settings.top_openings);
        recommendations
    }

    fn recommend(
        &self,
        opening: &str,
        s: &OpeningMistakeStats,
        priority_score: f64,
    ) -> Recommendation {
        let m = &s.mistakes;
        let confidence = Self::confidence(s);
        Recommendation {
            opening: opening.to_string(),
            priority_score,
            total_games: s.total_games,
            total_moves: m.total_moves,
            blunder_rate: m.blunder_rate,
            mistake_rate: m.mistake_rate,
            inaccuracy_rate: m.inaccuracy_rate,
            ok_rate: m.ok_rate,
            recommendation_type: RecommendationType::from_rates(
                m.blunder_rate,
                m.mistake_rate,
                m.inaccuracy_rate,
            ),
            study_focus: StudyFocus::from_rates(m.blunder_rate, m.mistake_rate, m.inaccuracy_rate),
            confidence,
            low_confidence: confidence < self.settings.confidence_threshold,
        }
    }
}
