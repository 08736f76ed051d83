//! Study plan assembled from ranked recommendations.

use serde::{Deserialize, Serialize};

use crate::recommendation::{Recommendation, RecommendationType, StudyFocus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityOpening {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub opening: String,
    pub priority_score: f64,
    pub recommendation_type: RecommendationType,
    pub study_focus: Vec<StudyFocus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    pub total_recommendations: usize,
    pub priority_openings: Vec<PriorityOpening>,
    /// Every focus area mentioned, in order of first appearance.
    pub focus_areas: Vec<StudyFocus>,
    /// Total suggested study time in hours.
    pub estimated_time: u32,
}

pub fn generate_study_plan(recommendations: &[Recommendation]) -> StudyPlan {
    let mut plan = StudyPlan {
        total_recommendations: recommendations.len(),
        ..StudyPlan::default()
    };

    for (i, rec) in recommendations.iter().enumerate() {
        plan.priority_openings.push(PriorityOpening {
            rank: i + 1,
            opening: rec.opening.clone(),
            priority_score: rec.priority_score,
            recommendation_type: rec.recommendation_type,
            study_focus: rec.study_focus.clone(),
        });
        for focus in &rec.study_focus {
            if !plan.focus_areas.contains(focus) {
                plan.focus_areas.push(*focus);
            }
        }
        plan.estimated_time += rec.recommendation_type.study_hours();
    }

    plan
}
