//! Detect command implementation.

use crate::cli::DetectArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use draftwright_domain::FlowKind;
use draftwright_extractor::{normalize_user_input, FlowDetector};

/// Classify a message with the configured precedence.
pub fn detect_flow(text: &str, config: &Config) -> FlowKind {
    FlowDetector::new(&config.extractor.flow_precedence).detect(&normalize_user_input(text))
}

/// Execute the detect command.
pub fn execute_detect(args: DetectArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = args.text.join(" ");
    println!("{}", formatter.format_flow(detect_flow(&text, config)));
    Ok(())
}
