// This file is part of the product NoPressure.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::rt::System;
use actix_web::{App, HttpServer, middleware::Logger, web};
use flatdocs::app_state::AppState;
use flatdocs::bootstrap::{self, BootstrapResult};
use flatdocs::config::ValidatedConfig;
use flatdocs::runtime_paths::RuntimePaths;
use flatdocs::util::{self, LevelRemap};
use log::{Level, info};
use std::io::Write;

const USAGE: &str = "Usage: flatdocs [-C <root>]\n\n\
  -C <root>     runtime directory holding config.yaml, users.yaml and data/ (default: .)\n\
  -h, --help    show this help\n";

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let parsed_args = match parse_args() {
        Ok(args) => args,
        Err(error) => {
            eprintln!("❌ Invalid command line arguments: {}", error);
            eprintln!("❌ Use -C <root> to set the runtime directory.");
            return 1;
        }
    };

    if matches!(parsed_args.mode, RunMode::Help) {
        print!("{}", USAGE);
        return 0;
    }

    let bootstrap = match bootstrap::bootstrap_runtime(&parsed_args.runtime_root) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("❌ Bootstrap error: {}", error);
            eprintln!("❌ Application cannot start with invalid configuration.");
            return 1;
        }
    };

    match System::new().block_on(run_server(bootstrap)) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("❌ Server failed to start: {}", error);
            1
        }
    }
}

async fn run_server(bootstrap: BootstrapResult) -> std::io::Result<()> {
    let validated_config = bootstrap.validated_config;
    let runtime_paths = bootstrap.runtime_paths;

    // Configure logging with a stable format
    let logger = env_logger::Builder::from_default_env()
        .filter_level(validated_config.log_level_filter())
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .build();

    util::init_logger(
        vec![LevelRemap::new("html5ever", Level::Debug, Level::Trace)],
        logger,
    )
    .map_err(|error| {
        eprintln!("❌ Failed to initialize logger: {}", error);
        std::io::Error::other(error.to_string())
    })?;

    log_startup_info(&validated_config, &runtime_paths);

    let workers = validated_config.server.workers;
    let bind_address = validated_config.bind_address();
    let app_state = match AppState::new(validated_config, runtime_paths) {
        Ok(state) => web::Data::new(state),
        Err(error) => {
            eprintln!("❌ Failed to initialize credential store: {}", error);
            return Err(std::io::Error::other(error.to_string()));
        }
    };
    info!("✅ App state initialized with app name: {}", app_state.app_name());

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .configure(|cfg| flatdocs::configure_app(cfg, &app_state.config))
    })
    .workers(workers)
    .bind(bind_address)?
    .run()
    .await
}

fn log_startup_info(config: &ValidatedConfig, runtime_paths: &RuntimePaths) {
    info!("Starting {}", config.app.name);
    info!("Workers: {}", config.server.workers);
    info!(
        "Listening on http://{}:{}",
        config.server.host, config.server.port
    );
    match config.upload.max_bytes() {
        Some(_) => info!("Upload limit: {} MB", config.upload.max_file_size_mb),
        None => info!("Upload limit: unlimited"),
    }

    // Log canonical paths being used by the server
    info!(
        "Document directory (canonical): {}",
        runtime_paths.data_dir.display()
    );
    info!("Config file: {}", runtime_paths.config_file.display());
    info!("Users file: {}", runtime_paths.users_file.display());
    info!("Runtime root: {}", runtime_paths.root.display());

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {}", current_dir.display());
    }
}

enum RunMode {
    Serve,
    Help,
}

struct ParsedArgs {
    runtime_root: std::path::PathBuf,
    mode: RunMode,
}

fn parse_args() -> Result<ParsedArgs, String> {
    parse_args_from(std::env::args().skip(1))
}

fn parse_args_from<I>(args: I) -> Result<ParsedArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| is_help_flag(arg)) {
        return Ok(ParsedArgs {
            runtime_root: std::path::PathBuf::from("."),
            mode: RunMode::Help,
        });
    }

    let mut args = args.into_iter();
    let mut runtime_root = std::path::PathBuf::from(".");

    while let Some(arg) = args.next() {
        if arg == "--" {
            continue;
        } else if arg == "-C" {
            let value = args
                .next()
                .ok_or_else(|| "Missing value for -C".to_string())?;
            runtime_root = std::path::PathBuf::from(value);
        } else {
            return Err(format!("Unexpected argument '{}'", arg));
        }
    }

    let runtime_root = make_runtime_root_absolute(runtime_root)?;
    Ok(ParsedArgs {
        runtime_root,
        mode: RunMode::Serve,
    })
}

fn is_help_flag(arg: &str) -> bool {
    arg == "-h" || arg == "--help" || arg.eq_ignore_ascii_case("help")
}

fn make_runtime_root_absolute(
    runtime_root: std::path::PathBuf,
) -> Result<std::path::PathBuf, String> {
    if runtime_root.is_absolute() {
        return Ok(runtime_root);
    }

    let current_dir = std::env::current_dir()
        .map_err(|error| format!("Failed to resolve current directory: {}", error))?;
    Ok(current_dir.join(runtime_root))
}
