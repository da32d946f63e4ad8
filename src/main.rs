mod cli;
mod error;
mod files;
mod loader;
mod manifest;
mod media;
mod ui;

use clap::Parser;
use std::sync::{Arc, Condvar, Mutex};
use winit::event_loop::EventLoop;

use crate::cli::{default_memory_budget, default_threads, parse_memory_budget, Cli};
use crate::files::{collect_media, items_from_paths, probe_missing_dimensions};
use crate::loader::{spawn_decode_workers, CacheState, SharedState, UserEvent};
use crate::ui::viewer::{Viewer, ViewerOptions};
use crate::ui::App;

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut options = match &cli.manifest {
        Some(path) => match manifest::load(path) {
            Ok(options) => options,
            Err(e) => {
                log::error!("Cannot use manifest {}: {}", path.display(), e);
                return;
            }
        },
        None => ViewerOptions::default(),
    };

    let paths = collect_media(&cli.paths, cli.recursive, cli.follow_links);
    options.images.extend(items_from_paths(&paths));
    if cli.title.is_some() {
        options.title = cli.title.clone();
    }
    probe_missing_dimensions(&mut options.images);

    let budget = match &cli.memory {
        Some(s) => parse_memory_budget(s),
        None => default_memory_budget(),
    };

    // Validation happens in `show()`; a refused collection simply never
    // opens anything.
    let viewer = Viewer::new(options);
    let items = viewer.items();

    let shared: SharedState = Arc::new((
        Mutex::new(CacheState::new(budget, &items)),
        Condvar::new(),
    ));

    let event_loop = match EventLoop::<UserEvent>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Cannot create event loop: {}", e);
            return;
        }
    };
    let proxy = event_loop.create_proxy();

    let num_threads = cli.threads.unwrap_or_else(default_threads).max(1);
    spawn_decode_workers(Arc::clone(&shared), items, proxy, num_threads);

    let mut app = App::new(viewer, shared);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop failed: {}", e);
    }
}
