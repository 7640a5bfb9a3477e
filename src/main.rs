//! Civic Desk command-line client
//!
//! Restores the persisted session and prints a dashboard summary.

use civic_desk::filters::StatisticsFilters;
use civic_desk::guard::{GuardDecision, DASHBOARD_ROUTE};
use civic_desk::models::format_score;
use civic_desk::{Config, Portal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Civic Desk");
    tracing::info!("Backend: {}", config.api_base_url);
    tracing::info!("Storage path: {:?}", config.storage_path);

    let portal = Portal::open(config).await?;

    if portal.initialize().await {
        if let Some(user) = portal.session().current_user() {
            tracing::info!("Restored session for {} ({})", user.email, user.role.as_str());
        }
    } else {
        tracing::info!("No stored session, continuing as a citizen");
    }

    match portal.authorize(DASHBOARD_ROUTE) {
        GuardDecision::Allow => tracing::info!("{} is accessible", DASHBOARD_ROUTE),
        GuardDecision::Redirect(target) => {
            tracing::info!("{} redirects to {}", DASHBOARD_ROUTE, target)
        }
    }

    let stats = portal
        .statistics()
        .dashboard(&StatisticsFilters::default())
        .await?;

    tracing::info!(
        "Complaints: {} total, {} open, {} resolved",
        stats.complaints.total,
        stats.complaints.open(),
        stats.complaints.resolved
    );
    tracing::info!(
        "Employees: {}, feedback: {} ({} pending), ratings: {} (avg {})",
        stats.total_employees,
        stats.total_feedback,
        stats.pending_feedback,
        stats.total_ratings,
        format_score(stats.average_rating)
    );

    Ok(())
}
