use web_sys::{HtmlElement, HtmlInputElement, Url};
use yew::prelude::*;

use super::{image_clipper::ImageClipper, settings_modal::SettingsModal};
use crate::model::ClipperSettings;
use crate::util::clog;

const SETTINGS_KEY: &str = "clipper_settings";

// Demo page: pick an image, crop it, show the result.
#[function_component(App)]
pub fn app() -> Html {
    let show_clipper = use_state(|| false);
    let original = use_state(String::new);
    let clipped = use_state(String::new);
    let open_settings = use_state(|| false);
    let settings = use_state(ClipperSettings::default);
    let input_ref = use_node_ref();

    // Load persisted crop options
    {
        let settings = settings.clone();
        use_effect_with((), move |_| {
            if let Some(win) = web_sys::window() {
                if let Ok(Some(store)) = win.local_storage() {
                    if let Ok(Some(raw)) = store.get_item(SETTINGS_KEY) {
                        if let Ok(s) = serde_json::from_str(&raw) {
                            settings.set(s);
                        }
                    }
                }
            }
            || ()
        });
    }
    // Persist crop option changes
    {
        let snapshot = (*settings).clone();
        use_effect_with(snapshot, move |s: &ClipperSettings| {
            if let Some(win) = web_sys::window() {
                if let Ok(Some(store)) = win.local_storage() {
                    if let Ok(raw) = serde_json::to_string(s) {
                        let _ = store.set_item(SETTINGS_KEY, &raw);
                    }
                }
            }
            || ()
        });
    }

    let choose = {
        let input_ref = input_ref.clone();
        Callback::from(move |_| {
            if let Some(input) = input_ref.cast::<HtmlElement>() {
                input.click();
            }
        })
    };
    let on_file_picked = {
        let original = original.clone();
        let show_clipper = show_clipper.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.item(0)) else {
                return;
            };
            match Url::create_object_url_with_blob(&file) {
                Ok(url) => {
                    if !original.is_empty() {
                        let _ = Url::revoke_object_url(&original);
                    }
                    original.set(url);
                    show_clipper.set(true);
                }
                Err(err) => clog(&format!("failed to open picked file: {err:?}")),
            }
            // allow re-picking the same file
            input.set_value("");
        })
    };
    let on_cut = {
        let clipped = clipped.clone();
        let show_clipper = show_clipper.clone();
        Callback::from(move |path: String| {
            if !clipped.is_empty() {
                let _ = Url::revoke_object_url(&clipped);
            }
            clipped.set(path);
            show_clipper.set(false);
        })
    };
    let on_cancel = {
        let show_clipper = show_clipper.clone();
        Callback::from(move |_| show_clipper.set(false))
    };
    let open_settings_cb = {
        let open_settings = open_settings.clone();
        Callback::from(move |_| open_settings.set(true))
    };
    let close_settings_cb = {
        let open_settings = open_settings.clone();
        Callback::from(move |_| open_settings.set(false))
    };
    let change_settings = {
        let settings = settings.clone();
        Callback::from(move |s: ClipperSettings| settings.set(s))
    };

    html! {
        <div style="min-height:100vh; background:#0e1116; color:#e6edf3; font-family:sans-serif;">
            <div style="padding:20px; max-width:520px;">
                <h2 style="margin:0 0 16px 0;">{"Image Clipper"}</h2>
                <div style="display:flex; gap:8px;">
                    <button onclick={choose} style="padding:8px 16px;">{"Choose Image"}</button>
                    <button onclick={open_settings_cb} style="padding:8px 16px;">{"Crop Settings"}</button>
                </div>
                <input ref={input_ref} type="file" accept="image/*" style="display:none;" onchange={on_file_picked} />
                <p style="margin:20px 0 8px 0;">{"Cropped result:"}</p>
                {
                    if clipped.is_empty() {
                        html! { <div style="width:250px; height:250px; border:1px dashed #30363d; border-radius:8px; display:flex; align-items:center; justify-content:center; opacity:0.6;">{"No crop yet"}</div> }
                    } else {
                        html! { <img src={(*clipped).clone()} style="width:250px; height:auto; border-radius:8px;" /> }
                    }
                }
            </div>
            <SettingsModal
                show={*open_settings}
                settings={(*settings).clone()}
                on_change={change_settings}
                on_close={close_settings_cb}
            />
            <ImageClipper
                visible={*show_clipper}
                src={(*original).clone()}
                clip_width={settings.clip_width}
                clip_height={settings.clip_height}
                max_scale={settings.max_scale}
                format={settings.format}
                quality={settings.quality}
                on_cut={on_cut}
                on_cancel={on_cancel}
            />
        </div>
    }
}
