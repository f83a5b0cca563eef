use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "xplens", version, about = "Sign in and summarize your XP")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Exchange credentials for a session token and load the profile.
    Login {
        #[arg(long, short, env = "XPLENS_USERNAME")]
        username: String,
        #[arg(long, short, env = "XPLENS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value_t = false, help = "Only store the token")]
        no_fetch: bool,
    },
    /// Load the profile with the stored session token.
    Profile,
    /// Check the stored session token without contacting the service.
    CheckToken,
    /// Forget the stored session token.
    Logout,
}
