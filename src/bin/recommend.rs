//! Size recommendation CLI.
//!
//! Reads the user's height/weight, a product record and optional body
//! measurements, and prints one JSON recommendation to stdout. Failures
//! print a JSON error object to stderr and exit non-zero; this binary
//! never guesses a size when measurement data is missing.

use clap::Parser;
use serde_json::Value;
use sizefit_algo::core::SizeRecommender;

#[derive(Parser, Debug)]
#[command(
    name = "sizefit-recommend",
    version,
    about = "Recommend a garment size from body measurements"
)]
struct Args {
    /// User height in cm
    #[arg(long)]
    height: f64,

    /// User weight in kg
    #[arg(long)]
    weight: f64,

    /// Product record as a JSON object (must carry sizes_with_measurements
    /// or a sizes field)
    #[arg(long = "product-data")]
    product_data: String,

    /// User body measurements as a JSON object, in inches
    #[arg(long)]
    measurements: Option<String>,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(message) => {
            eprintln!("{}", serde_json::json!({ "error": message }));
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String, String> {
    let product: Value = serde_json::from_str(&args.product_data)
        .map_err(|e| format!("invalid product JSON: {}", e))?;

    let measurements = match args.measurements.as_deref() {
        Some(raw) => serde_json::from_str::<Value>(raw)
            .map_err(|e| format!("invalid measurements JSON: {}", e))?
            .as_object()
            .cloned()
            .ok_or_else(|| "measurements must be a JSON object".to_string())?,
        None => serde_json::Map::new(),
    };

    let recommendation = SizeRecommender::new()
        .recommend(args.height, args.weight, &measurements, &product)
        .map_err(|e| error_chain(&e))?;

    serde_json::to_string(&recommendation).map_err(|e| e.to_string())
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_success() {
        let args = Args {
            height: 165.0,
            weight: 58.0,
            product_data: r#"{"sizes_with_measurements": "{'S': {'waist': 68.58}}"}"#.to_string(),
            measurements: Some(r#"{"waist": 27}"#.to_string()),
        };

        let output = run(&args).unwrap();
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["recommended_size"], "S");
        assert_eq!(parsed["method"], "measurements");
    }

    #[test]
    fn test_run_rejects_bad_product_json() {
        let args = Args {
            height: 165.0,
            weight: 58.0,
            product_data: "not json".to_string(),
            measurements: None,
        };

        assert!(run(&args).unwrap_err().contains("invalid product JSON"));
    }

    #[test]
    fn test_run_reports_cause_chain() {
        let args = Args {
            height: 165.0,
            weight: 58.0,
            product_data: r#"{"sizes_with_measurements": "{'S': {'fit': 'slim'}}"}"#.to_string(),
            measurements: Some(r#"{"waist": 27}"#.to_string()),
        };

        let message = run(&args).unwrap_err();
        assert!(message.contains("failed to parse measurement data"));
        assert!(message.contains("no usable numeric measurements"));
    }
}
