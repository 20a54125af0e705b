use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Only variables that are safe to print
    const DISPLAY_ENVS: [&str; 10] = [
        "RUST_LOG",
        "CART_HOST",
        "CART_PORT",
        "CART_DATABASE_URL",
        "CART_DB_MAX_CONNECTIONS",
        "CART_RUN_MIGRATIONS",
        "CART_CATALOG_URL",
        "CART_CATALOG_TIMEOUT_MS",
        "CART_SERVICE_URL",
        "CART_SERVICE_TIMEOUT_MS",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
