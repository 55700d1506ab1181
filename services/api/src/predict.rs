use crate::views::PredictionView;
use clap::Args;
use placement_advisor::config::{AppConfig, ModelConfig};
use placement_advisor::error::AppError;
use placement_advisor::placement::{
    ArtifactDocument, FeatureField, FeatureVector, ModelLoader, PlacementPipeline, RawSubmission,
    FEATURE_COUNT,
};
use placement_advisor::telemetry;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// Cognitive score (70-160)
    #[arg(long)]
    pub(crate) iq: Option<String>,
    /// Cumulative grade point average (0-10)
    #[arg(long)]
    pub(crate) cgpa: Option<String>,
    /// 10th standard exam percentage (0-100)
    #[arg(long)]
    pub(crate) tenth_marks: Option<String>,
    /// 12th standard exam percentage (0-100)
    #[arg(long)]
    pub(crate) twelfth_marks: Option<String>,
    /// Communication skills rating (0-10)
    #[arg(long)]
    pub(crate) communication: Option<String>,
    /// Classifier artifact to use instead of the configured one
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

impl PredictArgs {
    /// Omitted flags stay missing, exactly like an absent form field.
    fn submission(&self) -> RawSubmission {
        [
            (FeatureField::Iq, &self.iq),
            (FeatureField::Cgpa, &self.cgpa),
            (FeatureField::TenthMarks, &self.tenth_marks),
            (FeatureField::TwelfthMarks, &self.twelfth_marks),
            (FeatureField::Communication, &self.communication),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .as_ref()
                .map(|value| (field.form_key().to_string(), value.clone()))
        })
        .collect()
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct InspectArgs {
    /// Artifact to inspect instead of the configured one
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = command_config(args.model.clone())?;
    let model = ModelLoader::load(&config.model.artifact_path)?;
    let pipeline = PlacementPipeline::from_model(&model);

    print!("{}", predict_report(&pipeline, &args)?);
    Ok(())
}

fn predict_report(pipeline: &PlacementPipeline, args: &PredictArgs) -> Result<String, AppError> {
    let assessment = pipeline.evaluate(&args.submission())?;

    if args.json {
        let view = PredictionView::from_assessment(assessment);
        let json = serde_json::to_string_pretty(&view).map_err(std::io::Error::other)?;
        return Ok(format!("{json}\n"));
    }

    let mut report = String::new();
    let _ = writeln!(report, "{}", assessment.explanation);
    let _ = writeln!(report, "\nInput summary");
    for (field, value) in assessment.features.entries() {
        let _ = writeln!(report, "- {}: {}", field.label(), value);
    }
    let _ = writeln!(
        report,
        "\nDecision: {} (code {}, probability {:.1}%)",
        assessment.outcome.label(),
        assessment.outcome.code(),
        assessment.probability.percent()
    );

    Ok(report)
}

pub(crate) fn run_inspect(args: InspectArgs) -> Result<(), AppError> {
    let config = command_config(args.model)?;
    let path = config.model.artifact_path;
    let document = ArtifactDocument::from_path(&path)?;
    let descriptor = &document.descriptor;

    println!("Classifier artifact {}", path.display());
    println!("- kind: {}", descriptor.kind);
    println!("- format version: {}", descriptor.format_version);
    println!("- feature order: {}", descriptor.feature_names.join(", "));
    println!(
        "- capabilities: class prediction {}, probability prediction {}",
        yes_no(descriptor.capabilities.class_prediction),
        yes_no(descriptor.capabilities.probability_prediction)
    );

    println!("\nDomain probes");
    let classifier = document.model.classifier();
    let probabilistic = document.model.probabilistic();
    for (name, vector) in domain_corners() {
        let label = match classifier.predict(&vector) {
            Ok(class) => class.label().to_string(),
            Err(err) => format!("error: {err}"),
        };
        let confidence = match &probabilistic {
            Some(model) => match model.predict_proba(&vector) {
                Ok(distribution) => format!("{:.1}%", distribution.positive() * 100.0),
                Err(err) => format!("error: {err}"),
            },
            None => "n/a".to_string(),
        };
        println!("- {name} {:?}: {label} (positive {confidence})", vector.as_slice());
    }

    match document.into_loaded() {
        Ok(_) => {
            println!("\nStartup check: ok");
            Ok(())
        }
        Err(err) => {
            println!("\nStartup check: rejected ({err})");
            Err(err.into())
        }
    }
}

/// Configuration and logging for one-shot commands, set up as `serve` does.
fn command_config(model: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(model) = model {
        config.model = ModelConfig::new(model)?;
    }
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

/// Lowest and highest admissible applicant.
fn domain_corners() -> [(&'static str, FeatureVector); 2] {
    let mut lower = [0.0; FEATURE_COUNT];
    let mut upper = [0.0; FEATURE_COUNT];
    for field in FeatureField::ALL {
        let bounds = field.bounds();
        lower[field.position()] = *bounds.start();
        upper[field.position()] = *bounds.end();
    }
    [
        ("lower bound", FeatureVector::from_raw(lower)),
        ("upper bound", FeatureVector::from_raw(upper)),
    ]
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
