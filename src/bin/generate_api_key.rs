//! CLI tool to issue an API key for an existing user.
//!
//! Usage:
//!   cargo run --bin generate-api-key -- --email admin@test.edu
//!
//! Any previous key for the user stops working.

use std::env;

use preservation_registry::config::Config;
use preservation_registry::db::DbPool;
use preservation_registry::services::api_key;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();

    let mut email: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--email" | "-e" => {
                i += 1;
                if i < args.len() {
                    email = Some(args[i].clone());
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let email = match email {
        Some(e) => e,
        None => {
            eprintln!("Error: --email is required");
            print_usage();
            std::process::exit(1);
        }
    };

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match DbPool::new(&config.database).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error connecting to database: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = pool.run_migrations().await {
        eprintln!("Error running migrations: {}", e);
        std::process::exit(1);
    }

    let user = match pool.get_user_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            eprintln!("Error: no user with email {}", email);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error looking up user: {}", e);
            std::process::exit(1);
        }
    };
    if !user.is_active() {
        eprintln!("Error: user {} is deactivated", email);
        std::process::exit(1);
    }

    let full_key = match api_key::issue_key(&pool, &user).await {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Error generating key: {}", e);
            std::process::exit(1);
        }
    };

    println!();
    println!("════════════════════════════════════════════════════════════════");
    println!("  API Key Generated");
    println!("════════════════════════════════════════════════════════════════");
    println!();
    println!("  User:    {} (id {})", user.email, user.id);
    println!("  Role:    {}", user.role);
    println!();
    println!("  Send with:");
    println!("    X-Pharos-API-User: {}", user.email);
    println!("    X-Pharos-API-Key:  {}", full_key);
    println!();
    println!("  Save this key! It cannot be retrieved later.");
    println!("════════════════════════════════════════════════════════════════");
    println!();
}

fn print_usage() {
    eprintln!();
    eprintln!("Usage: generate-api-key --email <email>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --email, -e  Email of the user receiving the key (required)");
    eprintln!("  --help, -h   Show this help");
    eprintln!();
}
