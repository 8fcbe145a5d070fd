use axum::{
    body::{BoxBody, Bytes, Full, HttpBody},
    extract::State,
    response::Response,
};
use axum_util::errors::ApiResult;
use typed_html::elements::FlowContent;
use typed_html::{dom::DOMTree, html, text};

use super::AppState;
use crate::{
    model::{IncidentKind, ListFilter},
    timeline::{hour_labels, scrubber_label},
};

#[allow(unused_braces)]
pub async fn dashboard(State(state): State<AppState>) -> ApiResult<Response> {
    let all = state.store.list_incidents(ListFilter::ALL).await;
    let unresolved: Vec<_> = all.iter().filter(|x| !x.resolved).collect();
    let resolved_count = all.len() - unresolved.len();

    let mut out = Vec::<Box<dyn FlowContent<String>>>::new();

    out.push(html! {
        <div>
            <h3>{ text!("{} Unresolved Incidents", unresolved.len()) }</h3>
            <div>{ text!("{} resolved incidents", resolved_count) }</div>
        </div>
    });
    for incident in &unresolved {
        let action = format!("{}incidents/{}/resolve", state.web_base, incident.id);
        out.push(html! {
            <div class="incident">
                <img src={incident.thumbnail_url.clone()} alt="Incident thumbnail" />
                <div>
                    <span style={format!("color: {}", incident.kind.color())}>{ text!("{}", incident.kind) }</span>
                </div>
                <div>{ text!("{}", incident.camera.location) }</div>
                <div>{ text!("{}", state.timeline.time_range(incident)) }</div>
                <form method="post" action={action}>
                    <button>"Resolve"</button>
                </form>
            </div>
        });
    }

    let mut ruler = Vec::<Box<dyn FlowContent<String>>>::new();
    for label in hour_labels() {
        ruler.push(html! {
            <div class="tick">{ text!("{}", label) }</div>
        });
    }
    let mut track = Vec::<Box<dyn FlowContent<String>>>::new();
    for marker in state.timeline.markers(&all) {
        track.push(html! {
            <div
                class="marker"
                title={marker.title.clone()}
                style={format!("left: {:.3}%; background-color: {}", marker.percent, marker.color)}
            ></div>
        });
    }
    let mut legend = Vec::<Box<dyn FlowContent<String>>>::new();
    for (label, color) in IncidentKind::legend() {
        legend.push(html! {
            <div class="legend-entry">
                <span class="swatch" style={format!("background-color: {color}")}></span>
                { text!("{}", label) }
            </div>
        });
    }
    out.push(html! {
        <div>
            <h3>"24-Hour Incident Timeline"</h3>
            <div class="ruler">{ ruler.into_iter() }</div>
            <div class="track">
                { track.into_iter() }
                <div class="scrubber" style="left: 0%">{ text!("{}", scrubber_label(0.0)) }</div>
            </div>
            <div class="legend">{ legend.into_iter() }</div>
        </div>
    });

    let total: DOMTree<String> = html! {
        <html>
        <head>
            <title>"Incidents"</title>
            <style>
                r"
                .ruler {
                    display: flex;
                    justify-content: space-between;
                }
                .track {
                    position: relative;
                    height: 64px;
                }
                .legend {
                    display: flex;
                    gap: 16px;
                }
                .swatch {
                    display: inline-block;
                    width: 12px;
                    height: 12px;
                    border-radius: 50%
                }
                .marker, .scrubber {
                    position: absolute;
                }
                .marker {
                    width: 12px;
                    height: 12px;
                    border-radius: 50%
                }"
            </style>
        </head>
        <body>
            {out.into_iter()}
        </body>
        </html>
    };

    Ok(Response::builder()
        .header("content-type", "text/html")
        .body(BoxBody::new::<_>(
            Full::new(Bytes::from(total.to_string())).map_err(|_| unreachable!()),
        ))?)
}
