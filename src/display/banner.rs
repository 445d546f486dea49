//! Verification result banner.

use colored::Colorize;

use jwt_inspect::core::validator::VerificationOutcome;

/// Render the one-line verification banner.
pub fn render_banner(outcome: &VerificationOutcome) -> String {
    match outcome {
        VerificationOutcome::Verified { algorithm, .. } => format!(
            "Signature verified ({algorithm}, kid: {})",
            outcome.key_id_display().unwrap_or("none")
        ),
        VerificationOutcome::Failed { reason } => {
            format!("Signature verification failed: {reason}")
        }
    }
}

/// Print the verification banner, green on success and red on failure.
pub fn print_banner(outcome: &VerificationOutcome, use_color: bool) {
    let text = render_banner(outcome);
    println!();
    if !use_color {
        println!("{text}");
    } else if outcome.is_verified() {
        println!("{}", text.green().bold());
    } else {
        println!("{}", text.red().bold());
    }
}
