//! Plain-text rendering of recommendations.

use crate::recommendation::Recommendation;

pub const NO_RECOMMENDATIONS: &str = "No specific recommendations at this time.";

pub fn format_recommendations(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return NO_RECOMMENDATIONS.to_string();
    }

    let mut out = String::new();
    out.push_str("CHESS OPENING STUDY RECOMMENDATIONS\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    for (i, rec) in recommendations.iter().enumerate() {
        let focus: Vec<&str> = rec.study_focus.iter().map(|f| f.as_str()).collect();
        let low = if rec.low_confidence { " (low)" } else { "" };

        out.push_str(&format!(
            "{}. {}\n   \
             Priority Score: {:.2}\n   \
             Type: {}\n   \
             Focus: {}\n   \
             Confidence: {}{low}\n   \
             Games: {}\n   \
             Moves Analyzed: {}\n   \
             Blunder Rate: {}\n   \
             Mistake Rate: {}\n   \
             Inaccuracy Rate: {}\n\n",
            i + 1,
            rec.opening,
            rec.priority_score,
            rec.recommendation_type,
            focus.join(", "),
            percent(rec.confidence),
            rec.total_games,
            rec.total_moves,
            percent(rec.blunder_rate),
            percent(rec.mistake_rate),
            percent(rec.inaccuracy_rate),
        ));
    }

    out
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::{RecommendationType, StudyFocus};

    #[test]
    fn test_empty_report() {
        assert_eq!(format_recommendations(&[]), NO_RECOMMENDATIONS);
    }

    #[test]
    fn test_report_lines() {
        let rec = Recommendation {
            opening: "B20 Sicilian Defense".to_string(),
            priority_score: 1.2345,
            total_games: 4,
            total_moves: 40,
            blunder_rate: 0.2,
            mistake_rate: 0.125,
            inaccuracy_rate: 0.0,
            ok_rate: 0.675,
            recommendation_type: RecommendationType::CriticalWeakness,
            study_focus: vec![StudyFocus::TacticalAwareness, StudyFocus::Calculation],
            confidence: 0.4,
            low_confidence: true,
        };

        let report = format_recommendations(&[rec]);

        assert!(report.starts_with("CHESS OPENING STUDY RECOMMENDATIONS\n"));
        assert!(report.contains("1. B20 Sicilian Defense\n"));
        assert!(report.contains("   Priority Score: 1.23\n"));
        assert!(report.contains("   Type: Critical Weakness\n"));
        assert!(report.contains("   Focus: tactical_awareness, calculation\n"));
        assert!(report.contains("   Confidence: 40.0% (low)\n"));
        assert!(report.contains("   Blunder Rate: 20.0%\n"));
        assert!(report.contains("   Mistake Rate: 12.5%\n"));
        assert!(report.contains("   Moves Analyzed: 40\n"));
        assert!(report.contains("   Games: 4\n"));
        assert!(report.ends_with("   Inaccuracy Rate: 0.0%\n\n"));
    }
}
