use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use enroll::client::RegistrationClient;
use enroll::form::{validate, RegistrationForm};

/// Command-line client for the enroll registration service.
#[derive(Parser)]
#[command(name = "enroll-cli")]
struct Args {
    /// Base URL of the registration service
    #[arg(long, default_value = "http://localhost:5000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the form fields locally, then submit a registration
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// List every registered user
    List,
    /// Upload a profile picture
    Upload {
        /// Path of the image to upload
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = RegistrationClient::new(&args.server);

    match args.command {
        Command::Register {
            name,
            phone,
            email,
            password,
            confirm_password,
        } => {
            let form = RegistrationForm {
                name,
                phone,
                email,
                password,
                confirm_password,
            };
            validate(&form)
                .map_err(|errors| anyhow::anyhow!("registration not submitted:\n{errors}"))?;
            let message = client.register(&form).await?;
            println!("{message}");
        }
        Command::List => {
            let users = client.list_users().await?;
            if users.is_empty() {
                println!("No users available.");
            } else {
                for user in users {
                    println!("{}\t{}\t{}", user.name, user.email, user.phone);
                }
            }
        }
        Command::Upload { path } => {
            let body =
                std::fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let reply = client.upload_profile_picture(&file_name, body).await?;
            println!("{reply}");
        }
    }

    Ok(())
}
