pub mod api; // REST boundary: typed client + backend trait seam
pub mod billing; // Fee waiver + treatment billing arithmetic
pub mod booking; // Booking workflow (visit creation, fee decision)
pub mod catalog; // Treatment catalog management (doctor/admin)
pub mod config;
pub mod consultation; // Consultation completion + bill generation
pub mod error;
pub mod inflight; // Per-operation submit-in-flight guards
pub mod lifecycle; // Visit state machine + role permissions
pub mod models;
pub mod notify; // Notification channel (replaces singleton toast store)
pub mod payments; // Payment ledger workflow
pub mod registration; // Patient registration workflow
pub mod session; // Authenticated session + disk persistence
pub mod staff; // Staff account management (admin only)

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the host application.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the config default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("AyurDesk core starting v{}", config::APP_VERSION);
}
