use clap::Parser;
use move_binary_data::utils::error::ErrorSeverity;
use move_binary_data::utils::{logger, validation::Validate};
use move_binary_data::{CliConfig, ConvertEngine, LocalStorage};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting move-binary-data");
    tracing::debug!("CLI config: {:?}", cli);

    let run_config = match cli.validate().and_then(|_| cli.to_run_config()) {
        Ok(run_config) => run_config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let storage = LocalStorage::new(".".to_string());
    let engine = ConvertEngine::new(storage, run_config);

    match engine.run(&cli.input, &cli.output).await {
        Ok(outcome) => {
            for failure in &outcome.failures {
                eprintln!("⚠️  {}", failure.user_friendly_message());
            }
            println!(
                "✅ Converted {} records ({} dropped, {} failed)",
                outcome.converted_count(),
                outcome.dropped.len(),
                outcome.failures.len()
            );
            println!("📁 Output saved to: {}", cli.output);
        }
        Err(e) => {
            tracing::error!(
                "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            if e.is_record_level() {
                eprintln!("💡 Pass --continue-on-fail to skip failing records");
            }

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
