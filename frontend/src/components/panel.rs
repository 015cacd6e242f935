use trip_player_lib::trip::TripSummary;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::trip_data::TripData;

#[derive(Clone, Debug, PartialEq)]
pub enum Status {
    Idle(String),
    Loading(String),
    Ok(String),
    Error(String),
}

impl Status {
    fn class(&self) -> &'static str {
        match self {
            Status::Idle(_) => "status-dot idle",
            Status::Loading(_) => "status-dot loading",
            Status::Ok(_) => "status-dot ok",
            Status::Error(_) => "status-dot error",
        }
    }

    fn text(&self) -> &str {
        match self {
            Status::Idle(text) | Status::Loading(text) | Status::Ok(text) | Status::Error(text) => text,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Idle("Idle".into())
    }
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub trip_id: String,
    pub status: Status,
    pub note: Option<String>,
    pub selected_trip: Option<TripData>,
    pub on_trip_id: Callback<String>,
    pub on_random_id: Callback<()>,
    pub on_play: Callback<()>,
    pub on_hotzones: Callback<()>,
    pub on_simulate: Callback<()>,
    pub on_fit: Callback<()>,
    pub on_clear: Callback<()>,
}

fn format_summary(summary: &TripSummary) -> (String, String) {
    let time = match summary.duration.and_then(|d| d.to_std().ok()) {
        Some(duration) => {
            let hrs = duration.as_secs() / 3600;
            let mins = (duration.as_secs() % 3600) / 60;
            format!("{:02}h {:02}m", hrs, mins)
        }
        None => "unknown".into(),
    };

    let distance = summary.distance_km;
    let distance = format!(
        "{:.1}{}",
        if distance > 1. { distance } else { distance * 1000. },
        if distance > 1. { " km" } else { " m" }
    );

    (time, distance)
}

#[function_component]
pub fn Panel(props: &Props) -> Html {
    let oninput = {
        let on_trip_id = props.on_trip_id.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_trip_id.emit(input.value());
        })
    };

    let onkeydown = {
        let on_play = props.on_play.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                on_play.emit(());
            }
        })
    };

    let button = |label: &'static str, cb: &Callback<()>| {
        let cb = cb.clone();
        html! { <button onclick={Callback::from(move |_| cb.emit(()))}>{label}</button> }
    };

    html! {
        <div class="panel component-container">
            <h1>{"Trip playback"}</h1>
            <div class="status">
                <span class={props.status.class()}></span>
                <label>{props.status.text()}</label>
            </div>
            <div class="trip-field">
                <input
                    class="trip-id-input"
                    type="text"
                    placeholder="Trip id..."
                    value={props.trip_id.clone()}
                    {oninput}
                    {onkeydown}
                />
                {button("Random ID", &props.on_random_id)}
                {button("Play trip", &props.on_play)}
            </div>
            <div class="layer-field">
                {button("Hotzones", &props.on_hotzones)}
                {button("Simulate", &props.on_simulate)}
                {button("Fit", &props.on_fit)}
                {button("Clear", &props.on_clear)}
            </div>
            if let Some(note) = &props.note {
                <div class="note-box">{note}</div>
            }
            if let Some(trip_data) = &props.selected_trip {
                <TripInfo trip_data={trip_data.clone()} />
            }
        </div>
    }
}

#[derive(PartialEq, Properties, Clone)]
struct TripInfoProps {
    trip_data: TripData,
}

#[function_component]
fn TripInfo(props: &TripInfoProps) -> Html {
    let summary = props.trip_data.trip.summary();
    let (time, distance) = format_summary(&summary);

    html! {
        <div class="trip-info">
            <h2>{format!("Trip {}", props.trip_data.trip_id)}</h2>
            <label>{format!("{} points", summary.points)}</label>
            <label>{format!("Duration: {}", time)}</label>
            <label>{format!("Distance: {}", distance)}</label>
        </div>
    }
}
