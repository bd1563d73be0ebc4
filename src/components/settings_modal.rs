use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::model::{ClipperSettings, ExportFormat};

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub settings: ClipperSettings,
    pub on_change: Callback<ClipperSettings>,
    pub on_close: Callback<()>,
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    if !props.show {
        return html! {};
    }

    let close_cb = {
        let cb = props.on_close.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let numeric_field = |apply: fn(&ClipperSettings, f64) -> ClipperSettings| {
        let settings = props.settings.clone();
        let cb = props.on_change.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                if let Ok(value) = input.value().parse::<f64>() {
                    cb.emit(apply(&settings, value));
                }
            }
        })
    };
    let set_width = numeric_field(|s, v| ClipperSettings {
        clip_width: v,
        ..s.clone()
    });
    let set_height = numeric_field(|s, v| ClipperSettings {
        clip_height: v,
        ..s.clone()
    });
    let set_max_scale = numeric_field(|s, v| ClipperSettings {
        max_scale: v,
        ..s.clone()
    });
    let set_quality = numeric_field(|s, v| ClipperSettings {
        quality: v,
        ..s.clone()
    });
    let format_radio = |format: ExportFormat| {
        let settings = props.settings.clone();
        let cb = props.on_change.clone();
        let checked = props.settings.format == format;
        let onchange = Callback::from(move |_: Event| {
            cb.emit(ClipperSettings {
                format,
                ..settings.clone()
            })
        });
        html! {
            <label style="display:flex; align-items:center; gap:6px; cursor:pointer;">
                <input type="radio" name="clipper-format" checked={checked} onchange={onchange} />
                <span>{ format.label() }</span>
            </label>
        }
    };

    let row_style = "display:flex; align-items:center; gap:10px;";
    let label_style = "flex:0 0 150px;";
    let s = &props.settings;
    html! {<div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
        <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; min-width:340px; max-width:480px; display:flex; flex-direction:column; gap:14px;">
            <div style="display:flex; justify-content:space-between; align-items:center;">
                <h3 style="margin:0; font-size:18px;">{"Crop Settings"}</h3>
                <button onclick={close_cb.clone()} style="padding:4px 8px;">{"Close"}</button>
            </div>
            <div style="display:flex; flex-direction:column; gap:10px;">
                <label style={row_style}>
                    <span style={label_style}>{format!("Window width: {:.0}", s.clip_width)}</span>
                    <input type="range" min="200" max="750" step="10" value={format!("{:.0}", s.clip_width)} onchange={set_width} style="flex:1;" />
                </label>
                <label style={row_style}>
                    <span style={label_style}>{format!("Window height: {:.0}", s.clip_height)}</span>
                    <input type="range" min="200" max="750" step="10" value={format!("{:.0}", s.clip_height)} onchange={set_height} style="flex:1;" />
                </label>
                <label style={row_style}>
                    <span style={label_style}>{format!("Max zoom: {:.1}x", s.max_scale)}</span>
                    <input type="range" min="1" max="10" step="0.5" value={format!("{:.1}", s.max_scale)} onchange={set_max_scale} style="flex:1;" />
                </label>
                <label style={row_style}>
                    <span style={label_style}>{format!("Quality: {:.2}", s.quality)}</span>
                    <input type="range" min="0.1" max="1" step="0.05" value={format!("{:.2}", s.quality)} onchange={set_quality} style="flex:1;" />
                </label>
                <div style={row_style}>
                    <span style={label_style}>{"Export format"}</span>
                    { format_radio(ExportFormat::Jpeg) }
                    { format_radio(ExportFormat::Png) }
                </div>
            </div>
            <div style="font-size:11px; line-height:1.4; opacity:0.7;">{"Window sizes are in design units (750 spans the full screen width). Quality applies to JPEG export."}</div>
        </div>
    </div>}
}
