//! CLI module for the Hackathon Registry
//!
//! Subcommands:
//! - `serve`: run the HTTP server
//! - `create-admin`: provision an administrator account

pub mod admin;
pub mod serve;

use clap::{Parser, Subcommand};

/// Hackathon Registry - team registration and payment verification backend
#[derive(Parser)]
#[command(name = "hackathon-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Create an administrator account
    CreateAdmin(admin::CreateAdminArgs),
}
