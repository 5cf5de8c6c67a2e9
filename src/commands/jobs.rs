//! Jobs command - One-shot maintenance jobs.
//!
//! ## Usage
//!
//! ```bash
//! # Repair drifted student fee totals
//! cargo run -- jobs reconcile
//!
//! # Create the admin role and first admin user
//! cargo run -- jobs seed-admin --email admin@school.test --password change-me-now
//! ```

use crate::cli::args::{JobsAction, JobsArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};
use crate::jobs;

/// Execute the jobs command
pub async fn execute(args: JobsArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;
    let persistence = Persistence::new(db.get_connection());

    match args.action {
        JobsAction::Reconcile => {
            let report = jobs::reconcile::run(&persistence).await?;
            println!(
                "Reconciled {} student(s), repaired {}.",
                report.students_checked, report.students_fixed
            );
        }
        JobsAction::SeedAdmin { email, password } => {
            jobs::seed::run(&persistence, email, password).await?;
            println!("Seed finished.");
        }
    }

    Ok(())
}
