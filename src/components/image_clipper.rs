use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Touch, TouchEvent};
use yew::prelude::*;

use crate::model::ExportFormat;
use crate::platform::{self, ExportError, ImageInfo};
use crate::state::{ClipperGeometry, CropWindow, Gesture, Point, Rect, Size};
use crate::util::clog;

#[derive(Properties, PartialEq, Clone)]
pub struct ImageClipperProps {
    pub visible: bool,
    /// Source image reference; empty string leaves the clipper blank.
    pub src: String,
    /// Crop window size in design units (750 = full screen width).
    #[prop_or(500.0)]
    pub clip_width: f64,
    #[prop_or(500.0)]
    pub clip_height: f64,
    #[prop_or(5.0)]
    pub max_scale: f64,
    #[prop_or_default]
    pub format: ExportFormat,
    #[prop_or(1.0)]
    pub quality: f64,
    #[prop_or(AttrValue::Static("clipper-cut-canvas"))]
    pub canvas_id: AttrValue,
    /// Fired with the exported file path after a successful cut.
    #[prop_or_default]
    pub on_cut: Callback<String>,
    #[prop_or_default]
    pub on_cancel: Callback<()>,
}

fn touch_point(touch: &Touch) -> Point {
    Point {
        x: touch.client_x() as f64,
        y: touch.client_y() as f64,
    }
}

#[function_component(ImageClipper)]
pub fn image_clipper(props: &ImageClipperProps) -> Html {
    let canvas_ref = use_node_ref();
    let touch_ref = use_node_ref();
    // metrics sampled once at mount; the crop window derives from this one
    // snapshot so clamping, drawing, and layout never disagree mid-session
    let metrics = *use_mut_ref(platform::device_metrics).borrow();
    let geometry = use_mut_ref(ClipperGeometry::default);
    let gesture = use_mut_ref(Gesture::default);
    let source = use_mut_ref(|| None::<(web_sys::HtmlImageElement, ImageInfo)>);
    let crop_ref = use_mut_ref(|| None::<CropWindow>);
    let draw_ref = use_mut_ref(|| None::<Rc<dyn Fn()>>);
    // displayed image rect, mirrored into state so the <img> style follows
    let img_rect = use_state(Rect::default);
    // preview hidden while a gesture is in flight; redrawn once on touch end
    let show_canvas = use_state(|| true);

    // Draw closure: paint the crop-window region of the source image onto
    // the preview canvas. Created once; reads everything through refs.
    {
        let canvas_ref = canvas_ref.clone();
        let geometry = geometry.clone();
        let source = source.clone();
        let crop_ref = crop_ref.clone();
        let draw_ref_setup = draw_ref.clone();
        use_effect_with((), move |_| {
            let draw_closure: Rc<dyn Fn()> = Rc::new(move || {
                let canvas: HtmlCanvasElement = match canvas_ref.cast() {
                    Some(c) => c,
                    None => return,
                };
                let source = source.borrow();
                let Some((element, _)) = source.as_ref() else {
                    return;
                };
                let geo = geometry.borrow();
                if !geo.is_initialized() {
                    return;
                }
                let crop = match *crop_ref.borrow() {
                    Some(c) => c,
                    None => return,
                };
                let ctx = match canvas.get_context("2d").ok().flatten() {
                    Some(c) => c.dyn_into::<CanvasRenderingContext2d>().unwrap(),
                    None => return,
                };
                let dest_w = canvas.width() as f64;
                let dest_h = canvas.height() as f64;
                ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0).ok();
                ctx.clear_rect(0.0, 0.0, dest_w, dest_h);
                let src = geo.source_rect(&crop);
                ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    element, src.left, src.top, src.width, src.height, 0.0, 0.0, dest_w, dest_h,
                )
                .ok();
            });
            *draw_ref_setup.borrow_mut() = Some(draw_closure);
            || ()
        });
    }

    // Source change: discard all prior state and re-initialize the fit.
    {
        let geometry = geometry.clone();
        let gesture = gesture.clone();
        let source = source.clone();
        let crop_ref = crop_ref.clone();
        let draw_ref = draw_ref.clone();
        let img_rect = img_rect.clone();
        let show_canvas = show_canvas.clone();
        use_effect_with(
            (props.src.clone(), props.clip_width, props.clip_height),
            move |(src, clip_w, clip_h)| {
                *gesture.borrow_mut() = Gesture::Idle;
                *source.borrow_mut() = None;
                *geometry.borrow_mut() = ClipperGeometry::default();
                img_rect.set(Rect::default());
                show_canvas.set(true);
                if !src.is_empty() {
                    let crop = metrics.crop_window(*clip_w, *clip_h);
                    *crop_ref.borrow_mut() = Some(crop);
                    let geometry = geometry.clone();
                    let source = source.clone();
                    let draw_ref = draw_ref.clone();
                    let img_rect = img_rect.clone();
                    platform::load_image(
                        src,
                        Callback::from(
                            move |result: Result<
                                (web_sys::HtmlImageElement, ImageInfo),
                                platform::LoadError,
                            >| match result {
                            Ok((element, info)) => {
                                let mut geo = geometry.borrow_mut();
                                *geo = ClipperGeometry::fit(
                                    Size {
                                        width: info.width,
                                        height: info.height,
                                    },
                                    &crop,
                                );
                                img_rect.set(geo.image_rect());
                                drop(geo);
                                *source.borrow_mut() = Some((element, info));
                                if let Some(f) = &*draw_ref.borrow() {
                                    f();
                                }
                            }
                            // no recovery: the clipper stays blank until a
                            // valid source arrives
                            Err(err) => clog(&format!("image load failed: {err}")),
                        }),
                    );
                }
                || ()
            },
        );
    }

    // Touch listeners on the gesture layer, attached while visible.
    {
        let touch_ref = touch_ref.clone();
        let geometry = geometry.clone();
        let gesture = gesture.clone();
        let source = source.clone();
        let crop_ref = crop_ref.clone();
        let draw_ref = draw_ref.clone();
        let img_rect = img_rect.clone();
        let show_canvas = show_canvas.clone();
        use_effect_with((props.visible, props.max_scale), move |(visible, max_scale)| {
            let noop = || Box::new(|| ()) as Box<dyn FnOnce()>;
            if !*visible {
                return noop();
            }
            let target: HtmlElement = match touch_ref.cast() {
                Some(el) => el,
                None => return noop(),
            };
            let max_scale = *max_scale;

            let touch_start_cb = {
                let geometry = geometry.clone();
                let gesture = gesture.clone();
                let source = source.clone();
                let show_canvas = show_canvas.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    if source.borrow().is_none() {
                        return;
                    }
                    show_canvas.set(false);
                    let touches = e.touches();
                    let mut g = gesture.borrow_mut();
                    if touches.length() >= 2 {
                        if let (Some(t0), Some(t1)) = (touches.item(0), touches.item(1)) {
                            *g = Gesture::begin_pinch(
                                touch_point(&t0),
                                touch_point(&t1),
                                geometry.borrow().size(),
                            );
                        }
                    } else if let Some(t0) = touches.item(0) {
                        *g = Gesture::begin_pan(touch_point(&t0));
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_move_cb = {
                let geometry = geometry.clone();
                let gesture = gesture.clone();
                let source = source.clone();
                let crop_ref = crop_ref.clone();
                let img_rect = img_rect.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    e.prevent_default();
                    e.stop_propagation();
                    if source.borrow().is_none() {
                        return;
                    }
                    let crop = match *crop_ref.borrow() {
                        Some(c) => c,
                        None => return,
                    };
                    let active = *gesture.borrow();
                    let touches = e.touches();
                    if touches.length() == 1 {
                        if let Some(t0) = touches.item(0) {
                            if let Some((dx, dy)) = active.pan_delta(touch_point(&t0)) {
                                let mut geo = geometry.borrow_mut();
                                geo.pan(dx, dy, &crop);
                                img_rect.set(geo.image_rect());
                            }
                        }
                    } else if touches.length() >= 2 {
                        if let (Some(t0), Some(t1)) = (touches.item(0), touches.item(1)) {
                            let baseline = geometry.borrow().scale_baseline();
                            if let Some((scale, session_size)) = active.pinch_scale(
                                touch_point(&t0),
                                touch_point(&t1),
                                baseline,
                                max_scale,
                            ) {
                                let mut geo = geometry.borrow_mut();
                                geo.apply_scale(scale, session_size, &crop);
                                img_rect.set(geo.image_rect());
                            }
                        }
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let touch_end_cb = {
                let geometry = geometry.clone();
                let gesture = gesture.clone();
                let show_canvas = show_canvas.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if e.touches().length() == 0 {
                        geometry.borrow_mut().commit();
                        *gesture.borrow_mut() = Gesture::Idle;
                        show_canvas.set(true);
                    }
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            target
                .add_event_listener_with_callback(
                    "touchstart",
                    touch_start_cb.as_ref().unchecked_ref(),
                )
                .ok();
            target
                .add_event_listener_with_callback(
                    "touchmove",
                    touch_move_cb.as_ref().unchecked_ref(),
                )
                .ok();
            target
                .add_event_listener_with_callback("touchend", touch_end_cb.as_ref().unchecked_ref())
                .ok();
            target
                .add_event_listener_with_callback(
                    "touchcancel",
                    touch_end_cb.as_ref().unchecked_ref(),
                )
                .ok();
            // paint whatever is already loaded
            if let Some(f) = &*draw_ref.borrow() {
                f();
            }
            Box::new(move || {
                let _ = target.remove_event_listener_with_callback(
                    "touchstart",
                    touch_start_cb.as_ref().unchecked_ref(),
                );
                let _ = target.remove_event_listener_with_callback(
                    "touchmove",
                    touch_move_cb.as_ref().unchecked_ref(),
                );
                let _ = target.remove_event_listener_with_callback(
                    "touchend",
                    touch_end_cb.as_ref().unchecked_ref(),
                );
                let _ = target.remove_event_listener_with_callback(
                    "touchcancel",
                    touch_end_cb.as_ref().unchecked_ref(),
                );
            }) as Box<dyn FnOnce()>
        });
    }

    // Redraw exactly once when the preview comes back after a gesture.
    {
        let draw_ref = draw_ref.clone();
        let shown = *show_canvas;
        use_effect_with(shown, move |_| {
            if shown {
                if let Some(f) = &*draw_ref.borrow() {
                    f();
                }
            }
            || ()
        });
    }

    if !props.visible {
        return html! {};
    }

    let crop = crop_ref
        .borrow()
        .unwrap_or_else(|| metrics.crop_window(props.clip_width, props.clip_height));
    let crop_w = crop.width;
    let crop_h = crop.height;
    let crop_left = crop.left();
    let crop_top = crop.top();
    let rect = *img_rect;

    let cancel_cb = {
        let cb = props.on_cancel.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let cut_cb = {
        let source = source.clone();
        let canvas_ref = canvas_ref.clone();
        let on_cut = props.on_cut.clone();
        let format = props.format;
        let quality = props.quality;
        Callback::from(move |_| {
            let source = source.borrow();
            let result = if let Err(err) =
                platform::ensure_source(source.as_ref().map(|(_, info)| info))
            {
                Err(err)
            } else if let Some(canvas) = canvas_ref.cast::<HtmlCanvasElement>() {
                let on_cut = on_cut.clone();
                platform::export_canvas(
                    &canvas,
                    format,
                    quality,
                    Callback::from(move |res| match res {
                        Ok(path) => on_cut.emit(path),
                        Err(err) => clog(&format!("cut failed: {err}")),
                    }),
                )
            } else {
                Err(ExportError::Rasterize("preview canvas not mounted".into()))
            };
            if let Err(err) = result {
                clog(&format!("cut failed: {err}"));
            }
        })
    };

    let button_style = "padding:8px 22px; border-radius:6px; border:1px solid #30363d; background:rgba(22,27,34,0.9); color:#fff; font-size:15px;";
    html! {
        <div style="position:fixed; inset:0; background:#000; overflow:hidden; z-index:1000;">
            {
                if rect.width > 0.0 {
                    html! { <img
                        src={props.src.clone()}
                        draggable="false"
                        style={format!("position:absolute; left:{}px; top:{}px; width:{}px; height:{}px; max-width:none;", rect.left, rect.top, rect.width, rect.height)}
                    /> }
                } else {
                    html! {}
                }
            }
            <canvas
                id={props.canvas_id.clone()}
                ref={canvas_ref.clone()}
                width={((crop_w * metrics.pixel_ratio) as u32).to_string()}
                height={((crop_h * metrics.pixel_ratio) as u32).to_string()}
                style={format!(
                    "position:absolute; left:{crop_left}px; top:{crop_top}px; width:{crop_w}px; height:{crop_h}px; z-index:10;{}",
                    if *show_canvas { "" } else { " display:none;" }
                )}
            ></canvas>
            // crop border; the shadow doubles as the dimming mask
            <div style={format!("position:absolute; left:{crop_left}px; top:{crop_top}px; width:{crop_w}px; height:{crop_h}px; border:1px solid #fff; box-sizing:border-box; box-shadow:0 0 0 100vmax rgba(0,0,0,0.55); z-index:20;")}></div>
            <div ref={touch_ref.clone()} style="position:absolute; inset:0; z-index:100;"></div>
            <div style="position:absolute; left:0; right:0; bottom:24px; display:flex; justify-content:space-between; padding:0 24px; z-index:110;">
                <button onclick={cancel_cb} style={button_style}>{"Cancel"}</button>
                <button onclick={cut_cb} style={format!("{} background:#1f6feb; border-color:#1f6feb;", button_style)}>{"Confirm"}</button>
            </div>
        </div>
    }
}
