// web.rs - Browser host
//
// Mounts a FogWindow onto two stacked canvases and wires it to the page:
//   - fog image loaded through an HtmlImageElement, read back via an
//     offscreen canvas's getImageData
//   - mouse and touch events on the fog canvas drive the erase stroke
//   - window resize re-establishes both canvases
//   - requestAnimationFrame drives the droplet layer forever
//
// All callbacks run on the page's single event loop, so the shared state
// is an Rc<RefCell<_>> and borrows never overlap.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::WasmClosure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Document, EventTarget, HtmlCanvasElement,
    HtmlImageElement, ImageData, MouseEvent, TouchEvent, Window,
};

use crate::error::Error;
use crate::fog::{Point, PointerEvent};
use crate::render::Surface;
use crate::sim::FrameScheduler;
use crate::{FogWindow, Viewport};

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(&format!("[fog-window] {msg}")));
}

fn browser(e: JsValue) -> Error {
    Error::Browser(format!("{e:?}"))
}

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Mount the effect. `fog_canvas_id` receives pointer input and should be
/// stacked under `droplet_canvas_id`, which should ignore pointer events.
#[wasm_bindgen]
pub fn mount(fog_canvas_id: &str, droplet_canvas_id: &str, image_src: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| Error::Browser("no window".into()))?;
    let document = window.document().ok_or_else(|| Error::Browser("no document".into()))?;

    let (fog_canvas, fog_ctx) = canvas_2d(&document, fog_canvas_id)?;
    let (drop_canvas, drop_ctx) = canvas_2d(&document, droplet_canvas_id)?;

    let viewport = window_viewport(&window)?;
    let seed = (js_sys::Math::random() * u32::MAX as f64) as u32;

    let host = Rc::new(Host {
        app: RefCell::new(FogWindow::new(viewport.width, viewport.height, seed)),
        fog_canvas,
        fog_ctx,
        drop_canvas,
        drop_ctx,
    });
    host.fit(viewport);

    load_image(&host, &document, image_src)?;
    bind_pointer(&host)?;
    bind_resize(&host, &window)?;
    start_animation(&host, &window)?;

    log(&format!(
        "mounted on #{fog_canvas_id} + #{droplet_canvas_id} at {}x{}",
        viewport.width, viewport.height
    ));
    Ok(())
}

struct Host {
    app: RefCell<FogWindow>,
    fog_canvas: HtmlCanvasElement,
    fog_ctx: CanvasRenderingContext2d,
    drop_canvas: HtmlCanvasElement,
    drop_ctx: CanvasRenderingContext2d,
}

impl Host {
    /// Surface-local point from client coordinates
    fn local(&self, client_x: i32, client_y: i32) -> Point {
        Point::local(
            client_x as f64,
            client_y as f64,
            self.fog_canvas.offset_left() as f64,
            self.fog_canvas.offset_top() as f64,
        )
    }

    fn pointer(&self, event: PointerEvent) {
        let mut app = self.app.borrow_mut();
        app.handle_pointer(event);
        if app.take_fog_dirty() {
            present(&self.fog_ctx, app.fog().surface());
        }
    }

    fn fit(&self, viewport: Viewport) {
        self.fog_canvas.set_width(viewport.width);
        self.fog_canvas.set_height(viewport.height);
        self.drop_canvas.set_width(viewport.width);
        self.drop_canvas.set_height(viewport.height);

        let mut app = self.app.borrow_mut();
        app.resize(viewport.width, viewport.height);
        app.take_fog_dirty();
        present(&self.fog_ctx, app.fog().surface());
        present(&self.drop_ctx, app.droplets().surface());
    }
}

/// Reschedules the animation closure it shares with itself.
struct AnimationFrame {
    callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

impl FrameScheduler for AnimationFrame {
    fn request_frame(&mut self) {
        let Some(window) = web_sys::window() else { return };
        if let Some(callback) = self.callback.borrow().as_ref() {
            if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log(&format!("requestAnimationFrame failed: {e:?}"));
            }
        }
    }
}

fn start_animation(host: &Rc<Host>, window: &Window) -> Result<(), Error> {
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    let host = host.clone();
    *g.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
        let mut scheduler = AnimationFrame { callback: f.clone() };
        let mut app = host.app.borrow_mut();
        app.droplets_mut().run(&mut scheduler);
        present(&host.drop_ctx, app.droplets().surface());
    }));

    if let Some(callback) = g.borrow().as_ref() {
        window
            .request_animation_frame(callback.as_ref().unchecked_ref())
            .map_err(browser)?;
    }
    Ok(())
}

fn bind_pointer(host: &Rc<Host>) -> Result<(), Error> {
    let target: &EventTarget = &host.fog_canvas;

    // Mouse
    let h = host.clone();
    listen(target, "mousedown", true, Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
        h.pointer(PointerEvent::Down(Some(h.local(e.client_x(), e.client_y()))));
    }))?;

    let h = host.clone();
    listen(target, "mousemove", true, Closure::<dyn FnMut(MouseEvent)>::new(move |e: MouseEvent| {
        h.pointer(PointerEvent::Move(h.local(e.client_x(), e.client_y())));
    }))?;

    let h = host.clone();
    listen(target, "mouseup", true, Closure::<dyn FnMut(MouseEvent)>::new(move |_: MouseEvent| {
        h.pointer(PointerEvent::Up);
    }))?;

    // Touch. Non-passive so preventDefault suppresses scroll and zoom.
    let h = host.clone();
    listen(target, "touchstart", false, Closure::<dyn FnMut(TouchEvent)>::new(move |e: TouchEvent| {
        e.prevent_default();
        let first = e.touches().get(0).map(|t| h.local(t.client_x(), t.client_y()));
        h.pointer(PointerEvent::touch_start(first));
    }))?;

    let h = host.clone();
    listen(target, "touchmove", false, Closure::<dyn FnMut(TouchEvent)>::new(move |e: TouchEvent| {
        e.prevent_default();
        let first = e.touches().get(0).map(|t| h.local(t.client_x(), t.client_y()));
        if let Some(event) = PointerEvent::touch_move(first) {
            h.pointer(event);
        }
    }))?;

    for kind in ["touchend", "touchcancel"] {
        let h = host.clone();
        listen(target, kind, true, Closure::<dyn FnMut(TouchEvent)>::new(move |_: TouchEvent| {
            h.pointer(PointerEvent::Up);
        }))?;
    }

    Ok(())
}

fn bind_resize(host: &Rc<Host>, window: &Window) -> Result<(), Error> {
    let h = host.clone();
    listen(window, "resize", true, Closure::<dyn FnMut()>::new(move || {
        let Some(window) = web_sys::window() else { return };
        match window_viewport(&window) {
            Ok(viewport) => h.fit(viewport),
            Err(e) => log(&format!("resize ignored: {e}")),
        }
    }))
}

/// Load the fog image. Failure leaves the fog transparent; it is only logged.
fn load_image(host: &Rc<Host>, document: &Document, src: &str) -> Result<(), Error> {
    let img = HtmlImageElement::new().map_err(browser)?;

    let onload = {
        let host = host.clone();
        let img = img.clone();
        let document = document.clone();
        Closure::<dyn FnMut()>::new(move || {
            let loaded = decode(&document, &img).and_then(|(w, h, rgba)| {
                let mut app = host.app.borrow_mut();
                app.load_image(w, h, rgba)?;
                app.take_fog_dirty();
                present(&host.fog_ctx, app.fog().surface());
                Ok((w, h))
            });
            match loaded {
                Ok((w, h)) => log(&format!("fog image loaded ({w}x{h})")),
                Err(e) => log(&format!("fog image unusable: {e}")),
            }
        })
    };

    let onerror = {
        let src = src.to_string();
        Closure::<dyn FnMut()>::new(move || log(&format!("fog image failed to load: {src}")))
    };

    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    img.set_src(src);
    Ok(())
}

/// Draw the image once at natural size offscreen and read the pixels back.
fn decode(document: &Document, img: &HtmlImageElement) -> Result<(u32, u32, Vec<u8>), Error> {
    let (w, h) = (img.natural_width(), img.natural_height());
    if w == 0 || h == 0 {
        return Err(Error::EmptyAsset);
    }

    let canvas = document
        .create_element("canvas")
        .map_err(browser)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::Browser("offscreen canvas".into()))?;
    canvas.set_width(w);
    canvas.set_height(h);

    let ctx = context_2d(&canvas, "offscreen")?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0).map_err(browser)?;
    let data = ctx.get_image_data(0.0, 0.0, w as f64, h as f64).map_err(browser)?;
    Ok((w, h, data.data().0))
}

fn listen<T>(target: &EventTarget, kind: &str, passive: bool, handler: Closure<T>) -> Result<(), Error>
where
    T: ?Sized + WasmClosure,
{
    let opts = AddEventListenerOptions::new();
    opts.set_passive(passive);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            handler.as_ref().unchecked_ref(),
            &opts,
        )
        .map_err(browser)?;
    handler.forget();
    Ok(())
}

fn canvas_2d(document: &Document, id: &str) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), Error> {
    let canvas = document
        .get_element_by_id(id)
        .ok_or_else(|| Error::MissingElement(id.to_string()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::MissingElement(id.to_string()))?;
    let ctx = context_2d(&canvas, id)?;
    Ok((canvas, ctx))
}

fn context_2d(canvas: &HtmlCanvasElement, id: &str) -> Result<CanvasRenderingContext2d, Error> {
    canvas
        .get_context("2d")
        .map_err(browser)?
        .ok_or_else(|| Error::NoContext(id.to_string()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| Error::NoContext(id.to_string()))
}

fn window_viewport(window: &Window) -> Result<Viewport, Error> {
    let w = window.inner_width().map_err(browser)?.as_f64().unwrap_or(0.0);
    let h = window.inner_height().map_err(browser)?.as_f64().unwrap_or(0.0);
    Ok(Viewport::new(w.max(0.0) as u32, h.max(0.0) as u32))
}

/// Blit a surface onto its canvas.
fn present(ctx: &CanvasRenderingContext2d, surface: &Surface) {
    if surface.is_empty() { return; }

    let blit = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(surface.pixels()),
        surface.width(),
        surface.height(),
    )
    .and_then(|data| ctx.put_image_data(&data, 0.0, 0.0));

    if let Err(e) = blit {
        log(&format!("blit failed: {e:?}"));
    }
}
