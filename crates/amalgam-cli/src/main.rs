//! amalgam: standalone driver for the Blade template client-script pipeline.

mod cli;
mod config;
mod emit;

use camino::Utf8PathBuf;
use clap::Parser;
use cli::Args;
use config::AmalgamConfig;
use emit::EmitServer;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let root = if args.root.is_relative() {
        std::env::current_dir()
            .map(|p| Utf8PathBuf::try_from(p).unwrap_or_default())
            .unwrap_or_default()
            .join(&args.root)
    } else {
        args.root.clone()
    };

    let file_config = AmalgamConfig::load(&root);

    let views_path = args
        .views
        .clone()
        .or(file_config.views_path)
        .unwrap_or_else(|| Utf8PathBuf::from("resources/views"));

    let watch_files = if args.no_watch_files {
        false
    } else {
        file_config.watch_files.unwrap_or(true)
    };

    let mut ignore = file_config.ignore;
    ignore.extend(args.ignore.clone());

    let options = amalgam_plugin::PluginOptions {
        views_path,
        watch_files,
        ignore,
        ..Default::default()
    };

    let plugin = amalgam_plugin::AmalgamPlugin::new(root.clone(), options).into_diagnostic()?;

    let out_dir = if args.out_dir.is_relative() {
        root.join(&args.out_dir)
    } else {
        args.out_dir.clone()
    };

    let summary = emit::run_once(&plugin, &out_dir, args.emit).into_diagnostic()?;
    println!("{}", summary.format(&out_dir));

    if args.watch {
        if !plugin.watch_files() {
            eprintln!("Watch mode requested but watchFiles is disabled; exiting.");
            std::process::exit(1);
        }

        let emitted = plugin
            .discover()
            .iter()
            .filter_map(|file| {
                let content = std::fs::read_to_string(file).ok()?;
                let block = amalgam_extract::extract_script(&content)?;
                let relative = file.strip_prefix(plugin.views_root()).unwrap_or(file);
                Some(amalgam_plugin::derived_module_id(relative, block.dialect))
            })
            .collect();

        let server = EmitServer::new(&plugin, out_dir, emitted);

        println!("Watching for changes... (Ctrl+C to stop)\n");
        amalgam_plugin::watch(&plugin, &server)
            .await
            .into_diagnostic()?;
    }

    Ok(())
}
