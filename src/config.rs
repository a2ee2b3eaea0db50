//! CLI flags and environment configuration for the terminal client.

use clap::Parser;

/// Settings for the `medbear` terminal client.
///
/// Every flag has an environment fallback; a `.env` file is loaded by the
/// binary before parsing, so either source works. `RUST_LOG` drives the
/// tracing filter separately.
#[derive(Parser, Debug, Clone)]
#[command(name = "medbear", version, about = "Terminal client for the medbear comparison chat")]
pub struct Settings {
    /// Base URL of the medbear backend
    #[arg(
        long,
        env = "MEDBEAR_SERVER_URL",
        default_value = "http://localhost:8080"
    )]
    pub server_url: String,

    /// Username or email to log in with (prompted when absent)
    #[arg(long, env = "MEDBEAR_USERNAME")]
    pub username: Option<String>,

    /// Password to log in with (prompted when absent)
    #[arg(long, env = "MEDBEAR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}
