// SPDX-License-Identifier: MPL-2.0
use lens_browse::app::{command, paths, terminal::TerminalDisplay, App, Flags, Message};
use lens_browse::config;
use lens_browse::directory_scanner::DirectoryManager;
use lens_browse::media::FsDecoder;
use std::io::BufRead;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lens_browse=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        config_dir: args.opt_value_from_str("--config-dir")?,
        infinite_scrolling: args.contains("--infinite"),
        no_preload: args.contains("--no-preload"),
        file_path: args
            .finish()
            .into_iter()
            .next()
            .and_then(|s| s.into_string().ok()),
    };

    paths::init_cli_override(flags.config_dir.clone());
    let mut config = config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read settings, using defaults");
        config::Config::default()
    });
    if flags.infinite_scrolling {
        config.navigation.infinite_scrolling = true;
    }
    if flags.no_preload {
        config.navigation.use_preloader = false;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let (mut app, messages) = App::new(
        Box::new(DirectoryManager::new()),
        Box::new(TerminalDisplay::stdout()),
        Arc::new(FsDecoder),
        runtime.handle().clone(),
        &config,
    );

    if let Some(path) = flags.file_path {
        let _ = app.update(Message::OpenPath {
            path,
            blocking: true,
        });
    } else {
        eprintln!("{}", command::HELP);
    }

    let sender = app.sender();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match command::parse(&line) {
                Ok(Some(message)) => {
                    if sender.send(message).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{e}\n{}", command::HELP),
            }
        }
        let _ = sender.send(Message::Quit);
    });

    runtime.block_on(app.run(messages));
    Ok(())
}
