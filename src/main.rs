// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Scene Bridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Scene Bridge CLI entrypoint.
//!
//! Serves the command bridge against the built-in in-memory demo scene until a vacate
//! message or Ctrl-C arrives.

use std::path::PathBuf;

use scene_bridge::host::MemoryScene;
use scene_bridge::server::{bind, Server};
use scene_bridge::{BridgeConfig, Error};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--config <file.toml>] [--host <addr>] [--port <port>] [--no-passthrough] [--ignore-vacate]\n\nDefaults come from the config file (if any); flags override it.\n--no-passthrough rejects unknown commands instead of running them as host script.\n--ignore-vacate keeps the listener open when the vacate message arrives.\n\nLog filtering follows RUST_LOG (default `info`)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    no_passthrough: bool,
    ignore_vacate: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--host" => {
                if options.host.is_some() {
                    return Err(());
                }
                options.host = Some(args.next().ok_or(())?);
            }
            "--port" => {
                if options.port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.port = Some(port);
            }
            "--no-passthrough" => {
                if options.no_passthrough {
                    return Err(());
                }
                options.no_passthrough = true;
            }
            "--ignore-vacate" => {
                if options.ignore_vacate {
                    return Err(());
                }
                options.ignore_vacate = true;
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

fn load_config(options: &CliOptions) -> Result<BridgeConfig, Error> {
    let mut config = match &options.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };
    if let Some(host) = &options.host {
        config.host = host.clone();
    }
    if let Some(port) = options.port {
        config.port = port;
    }
    if options.no_passthrough {
        config.allow_script_passthrough = false;
    }
    if options.ignore_vacate {
        config.ignore_vacate = true;
    }
    config.validate()?;
    Ok(config)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let result = (|| -> Result<(), Error> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "scene-bridge".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        let config = load_config(&options)?;
        init_tracing();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        runtime.block_on(async move {
            let mut scene = MemoryScene::demo();
            scene.set_undo_limit(config.undo_limit);
            let listener = bind(&config).await?;
            let server = Server::new(listener, config)?;
            let shutdown = server.shutdown_handle();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("interrupt received, shutting down");
                    shutdown.trigger();
                }
            });

            let scene = server.run(scene).await?;
            info!(nodes = scene.node_count(), "scene released");
            Ok::<(), Error>(())
        })
    })();

    if let Err(err) = result {
        eprintln!("scene-bridge: {err}");
        std::process::exit(1);
    }
}
