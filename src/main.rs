mod app;
mod bulb;
mod components;
mod controller;
mod error;
mod form_field;
mod light_state;
mod overlay;
mod schedule;
mod sound;
mod storage;
mod theme;

use std::time::Instant;

use gpui::{
    Application, Bounds, KeyBinding, WindowBackgroundAppearance, WindowBounds, WindowOptions,
    Focusable, prelude::*, px, size,
};

use crate::{
    app::{LightApp, Quit},
    controller::Controller,
    form_field::{Backspace, Delete, End, Home, Left, Paste, Right, SelectAll},
    overlay::{SubmitEmail, SwitchField},
    storage::{FileStore, Persistence, storage_file_path},
    theme::{WINDOW_HEIGHT, WINDOW_WIDTH},
};

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("light_it_up=info"),
    )
    .init();

    log::info!(
        "light-it-up v{} starting (RUST_LOG={})",
        env!("CARGO_PKG_VERSION"),
        std::env::var("RUST_LOG").unwrap_or_else(|_| "<default: info>".into()),
    );

    let store = FileStore::open(storage_file_path());
    log::info!("[startup] storage path: {}", store.path().display());

    Application::new().run(move |context| {
        let bounds = Bounds::centered(None, size(px(WINDOW_WIDTH), px(WINDOW_HEIGHT)), context);

        bind_keys(context);

        let controller = Controller::start(Persistence::new(store), Instant::now());
        log::info!(
            "[startup] initial state: {} (interacted={})",
            controller.state().label(),
            controller.has_interacted()
        );

        let window = context.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                window_background: WindowBackgroundAppearance::Opaque,
                ..Default::default()
            },
            |window, context| {
                context.new(|context| LightApp::new(controller, window, context))
            },
        );

        match window {
            Ok(window) => {
                if let Err(error) = window.update(context, |view, window, context| {
                    let handle = view.focus_handle(context);
                    window.focus(&handle, context);
                    context.activate(true);
                }) {
                    log::error!("[startup] failed to initialize application window: {error}");
                    context.quit();
                    return;
                }

                context.on_action(|_: &Quit, context| context.quit());
            }
            Err(error) => {
                log::error!("[startup] failed to open application window: {error}");
                context.quit();
            }
        }
    });
}

fn bind_keys(context: &mut gpui::App) {
    context.bind_keys([
        KeyBinding::new("backspace", Backspace, Some("FormField")),
        KeyBinding::new("delete", Delete, Some("FormField")),
        KeyBinding::new("left", Left, Some("FormField")),
        KeyBinding::new("right", Right, Some("FormField")),
        KeyBinding::new("home", Home, Some("FormField")),
        KeyBinding::new("end", End, Some("FormField")),
        KeyBinding::new("cmd-a", SelectAll, Some("FormField")),
        KeyBinding::new("cmd-v", Paste, Some("FormField")),
        KeyBinding::new("ctrl-a", SelectAll, Some("FormField")),
        KeyBinding::new("ctrl-v", Paste, Some("FormField")),
    ]);

    context.bind_keys([
        KeyBinding::new("enter", SubmitEmail, Some("EmailForm")),
        KeyBinding::new("tab", SwitchField, Some("EmailForm")),
        KeyBinding::new("shift-tab", SwitchField, Some("EmailForm")),
    ]);

    context.bind_keys([
        KeyBinding::new("cmd-q", Quit, None),
        KeyBinding::new("ctrl-q", Quit, None),
    ]);
}
