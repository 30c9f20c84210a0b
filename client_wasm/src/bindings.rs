//! JavaScript entry points
//!
//! The page owns one [`Page`]; every export borrows it for the duration of
//! the call.

use game_core::{Catalog, SettingsProvider, SizeTier};
use glam::Vec2;
use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use crate::app::{App, Hosts};
use crate::canvas::CanvasSurface;
use crate::notice::notice_text;
use crate::web::{FetchSink, HashNavigator, LocalSession};

struct Page {
    app: App,
    surface: CanvasSurface,
    catalog: Catalog,
    session: LocalSession,
    sink: FetchSink,
    navigator: HashNavigator,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

fn with_page<R>(f: impl FnOnce(&mut Page) -> R) -> Result<R, JsValue> {
    PAGE.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map(f)
            .ok_or_else(|| JsValue::from_str("Pong not initialized"))
    })
}

fn names(list: &js_sys::Array) -> Vec<String> {
    list.iter().filter_map(|v| v.as_string()).collect()
}

/// Pick the size tier from the viewport and size the canvas to it
fn current_tier() -> SizeTier {
    let width = web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(1024.0);
    SizeTier::from_viewport_width(width as f32)
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
    }
}

/// Attach to a canvas. `api_base` prefixes the result endpoints;
/// `language` is an optional JSON translation document.
#[wasm_bindgen]
pub fn init_pong(
    canvas: HtmlCanvasElement,
    api_base: String,
    language: Option<String>,
) -> Result<(), JsValue> {
    let tier = current_tier();
    let (width, height) = tier.canvas_size();
    let mut surface = CanvasSurface::new(canvas)?;
    surface.set_size(width as u32, height as u32);

    let catalog = match language.as_deref().map(Catalog::from_json) {
        Some(Ok(catalog)) => catalog,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "language document rejected, showing keys");
            Catalog::default()
        }
        None => Catalog::default(),
    };

    let seed = (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    let app = App::new(tier.settings(), (width, height), seed);
    let sink = FetchSink::new(api_base, app.notices());
    let page = Page {
        app,
        surface,
        catalog,
        session: LocalSession,
        sink,
        navigator: HashNavigator,
    };
    PAGE.with(|cell| *cell.borrow_mut() = Some(page));
    tracing::info!(?tier, width, height, "pong ready");
    Ok(())
}

#[wasm_bindgen]
pub fn set_language(json: &str) -> Result<(), JsValue> {
    let catalog = Catalog::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_page(|page| page.catalog = catalog)
}

/// Re-pick the tier after a viewport change; applies from the next match
#[wasm_bindgen]
pub fn resize() -> Result<(), JsValue> {
    let tier = current_tier();
    let (width, height) = tier.canvas_size();
    with_page(|page| {
        page.surface.set_size(width as u32, height as u32);
        page.app.resize(tier.settings(), (width, height));
    })
}

#[wasm_bindgen]
pub fn start_match(players: js_sys::Array) -> Result<bool, JsValue> {
    with_page(|page| page.app.start_match(names(&players)))
}

#[wasm_bindgen]
pub fn start_tournament(players: js_sys::Array) -> Result<bool, JsValue> {
    with_page(|page| {
        page.app
            .start_tournament(names(&players), &mut page.navigator)
            .is_ok()
    })
}

#[wasm_bindgen]
pub fn start_elimination(players: js_sys::Array) -> Result<bool, JsValue> {
    with_page(|page| {
        page.app
            .start_elimination(names(&players), &mut page.navigator)
            .is_ok()
    })
}

/// Advance one animation frame; returns the screen name
#[wasm_bindgen]
pub fn frame(now_ms: f64) -> Result<String, JsValue> {
    with_page(|page| {
        let Page {
            app,
            surface,
            catalog,
            session,
            sink,
            navigator,
        } = page;
        let mut hosts = Hosts {
            session: &*session,
            sink,
            navigator,
        };
        let state = app.frame(now_ms, surface, &*catalog, &mut hosts);
        format!("{:?}", state)
    })
}

/// Next result notice for the page to show, if any. Failed deliveries
/// arrive here after the request settles.
#[wasm_bindgen]
pub fn take_notice() -> Result<Option<String>, JsValue> {
    with_page(|page| page.app.take_notice().map(|status| notice_text(&status)))
}

#[wasm_bindgen]
pub fn key_event(key: &str, down: bool) -> Result<bool, JsValue> {
    with_page(|page| page.app.key(key, down))
}

#[wasm_bindgen]
pub fn touch_event(x: f32, y: f32) -> Result<bool, JsValue> {
    with_page(|page| page.app.touch(Vec2::new(x, y)))
}

#[wasm_bindgen]
pub fn touch_end() -> Result<(), JsValue> {
    with_page(|page| page.app.release_touches())
}

#[wasm_bindgen]
pub fn click() -> Result<bool, JsValue> {
    with_page(|page| page.app.click(&mut page.navigator))
}

/// Called when the page navigates away mid-match
#[wasm_bindgen]
pub fn cancel() -> Result<(), JsValue> {
    with_page(|page| page.app.cancel())
}
