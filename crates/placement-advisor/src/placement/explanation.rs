use super::classifier::PlacementClass;
use super::decision::Probability;
use super::features::ApplicantFeatures;

/// Target shown next to CGPA and communication when improvement is needed.
pub const IMPROVEMENT_TARGET: f64 = 7.0;

pub const ACTION_PLAN: [&str; 2] = [
    "Complete 2 industry projects",
    "Attend communication workshops",
];

/// Human-readable summary of a placement verdict.
pub fn explain(
    features: &ApplicantFeatures,
    probability: Probability,
    outcome: PlacementClass,
) -> String {
    let confidence = probability.percent();
    match outcome {
        PlacementClass::Positive => format!(
            "🎉 {label} ({confidence:.1}% confidence)\n\n\
             Key strengths identified:\n\
             - Cognitive Ability: {iq} IQ\n\
             - Academic Performance: CGPA {cgpa}/10\n\
             - Communication: {communication}/10\n\n\
             Recommendation: Priority candidate for campus recruitment.",
            label = outcome.label(),
            iq = features.iq(),
            cgpa = features.cgpa(),
            communication = features.communication(),
        ),
        PlacementClass::Negative => {
            let plan = ACTION_PLAN
                .iter()
                .map(|step| format!("- {step}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "🔍 {label} ({confidence:.1}% confidence)\n\n\
                 Development areas:\n\
                 - Current CGPA: {cgpa} (Target: {IMPROVEMENT_TARGET:.1}+)\n\
                 - Communication: {communication}/10 (Target: {IMPROVEMENT_TARGET:.1}+)\n\n\
                 Action Plan:\n\
                 {plan}",
                label = outcome.label(),
                cgpa = features.cgpa(),
                communication = features.communication(),
            )
        }
    }
}
