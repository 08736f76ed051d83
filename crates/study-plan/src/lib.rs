//! Turns per-opening mistake statistics into a ranked study plan.
//!
//! - [`aggregate_opening_mistakes`] joins classified moves with game openings
//! - [`RecommendationEngine`] scores and ranks openings
//! - [`generate_study_plan`] and [`format_recommendations`] present the result

pub mod aggregate;
pub mod plan;
pub mod recommendation;
pub mod report;

pub use aggregate::{aggregate_opening_mistakes, OpeningMistakeStats};
pub use plan::{generate_study_plan, PriorityOpening, StudyPlan};
pub use recommendation::{
    Recommendation, RecommendationEngine, RecommendationSettings, RecommendationType, StudyFocus,
};
pub use report::{format_recommendations, NO_RECOMMENDATIONS};
