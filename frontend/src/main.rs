use std::rc::Rc;

use crate::components::{map_component::MapComponent, panel::{Panel, Status}};
use api::ApiError;
use config::TOAST_MILLIS;
use gloo_console::{error, info};
use gloo_timers::callback::Timeout;
use trip_data::TripData;
use trip_player_lib::{hotzone::Hotzone, trip_point::TripRecord, PlayerError, Trip};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::{
    history::{BrowserHistory, History},
    BrowserRouter, Routable, Switch,
};

mod api;
mod components;
mod config;
mod log;
mod trip_data;

#[derive(Clone, Debug, PartialEq, Routable)]
enum Route {
    #[at("/")]
    Default,
    #[at("/trip/:id")]
    Trip { id: String },
    #[not_found]
    #[at("/404")]
    Invalid,
}

enum MainMsg {
    SetTripId(String),
    RandomTripId,
    RandomTripIdLoaded(Result<String, ApiError>),
    LoadTrip,
    TripLoaded(String, Result<Trip, ApiError>),
    LoadHotzones,
    HotzonesLoaded(Result<Vec<Hotzone>, ApiError>),
    Simulate,
    SimulatedLoaded(Result<TripRecord, ApiError>),
    Fit,
    PlaybackFailed(PlayerError),
    Clear,
    ToggleCollapsed,
    HideToast,
}

struct Model {
    trip_id: String,
    status: Status,
    note: Option<String>,
    selected_trip: Option<TripData>,
    hotzones: Option<Rc<Vec<Hotzone>>>,
    generation: u32,
    fit_request: u32,
    toast: Option<String>,
    toast_timeout: Option<Timeout>,
    collapsed: bool,
}

impl Model {
    fn show_toast(&mut self, ctx: &Context<Self>, message: &str) {
        let link = ctx.link().clone();
        self.toast = Some(message.to_owned());
        // Replacing the old timeout cancels it
        self.toast_timeout = Some(Timeout::new(TOAST_MILLIS, move || {
            link.send_message(MainMsg::HideToast)
        }));
    }

    fn fail(&mut self, ctx: &Context<Self>, what: &str, err: ApiError, note: Option<&str>) {
        error!(format!("{}: {}", what, err));
        self.status = Status::Error("Error".into());
        self.note = note.map(str::to_owned);
        self.show_toast(ctx, "API error");
    }
}

impl Component for Model {
    type Message = MainMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();

        let history = BrowserHistory::new();
        let location = history.location();
        let route = Route::recognize(location.path()).unwrap_or(Route::Invalid);

        let mut trip_id = String::new();
        match route {
            Route::Default => {
                info!("Default route");
                link.send_message(MainMsg::LoadHotzones);
            }
            Route::Trip { id } => {
                info!(format!("Trip route: {}", id));
                trip_id = id;
                link.send_message(MainMsg::LoadTrip);
            }
            Route::Invalid => {
                error!("Invalid route");
            }
        };

        Self {
            trip_id,
            status: Status::default(),
            note: None,
            selected_trip: None,
            hotzones: None,
            generation: 0,
            fit_request: 0,
            toast: None,
            toast_timeout: None,
            collapsed: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            MainMsg::SetTripId(trip_id) => {
                self.trip_id = trip_id;
            }
            MainMsg::RandomTripId => {
                self.status = Status::Loading("Fetching random ID…".into());
                let cb = ctx.link().callback(MainMsg::RandomTripIdLoaded);
                spawn_local(async move {
                    cb.emit(api::get_random_trip_id().await);
                });
            }
            MainMsg::RandomTripIdLoaded(Ok(trip_id)) => {
                info!(format!("Random trip id: {}", trip_id));
                self.trip_id = trip_id;
                self.status = Status::Ok("Random ID ready".into());
                self.show_toast(ctx, "Random ID");
            }
            MainMsg::RandomTripIdLoaded(Err(err)) => {
                self.fail(ctx, "Failed to fetch a random trip id", err, None);
            }
            MainMsg::LoadTrip => {
                let trip_id = self.trip_id.trim().to_owned();
                if trip_id.is_empty() {
                    self.show_toast(ctx, "Enter trip id");
                    return true;
                }

                self.note = None;
                self.status = Status::Loading(format!("Loading trip {}…", trip_id));
                let cb = ctx
                    .link()
                    .callback(|(trip_id, result): (String, Result<Trip, ApiError>)| {
                        MainMsg::TripLoaded(trip_id, result)
                    });
                spawn_local(async move {
                    let result = api::get_trip(&trip_id).await;
                    cb.emit((trip_id, result));
                });
            }
            MainMsg::TripLoaded(trip_id, Ok(trip)) => {
                self.generation += 1;
                self.status = Status::Ok(format!("Trip points: {}", trip.len()));
                self.hotzones = None;
                self.selected_trip = Some(TripData {
                    trip_id,
                    generation: self.generation,
                    trip: Rc::new(trip),
                });
                self.show_toast(ctx, "Trip loaded");
            }
            MainMsg::TripLoaded(trip_id, Err(err)) => {
                self.fail(
                    ctx,
                    &format!("Failed to load trip {}", trip_id),
                    err,
                    Some("Trip ID not found or API error."),
                );
            }
            MainMsg::LoadHotzones => {
                self.note = None;
                self.status = Status::Loading("Loading hotzones…".into());
                let cb = ctx.link().callback(MainMsg::HotzonesLoaded);
                spawn_local(async move {
                    cb.emit(api::get_hotzones().await);
                });
            }
            MainMsg::HotzonesLoaded(Ok(hotzones)) => {
                self.selected_trip = None;
                self.status = Status::Ok(format!("Hotzones: {}", hotzones.len()));
                if hotzones.is_empty() {
                    self.note = Some("No data for this request.".into());
                    self.hotzones = None;
                } else {
                    self.hotzones = Some(Rc::new(hotzones));
                }
                self.show_toast(ctx, "Hotzones loaded");
            }
            MainMsg::HotzonesLoaded(Err(err)) => {
                self.fail(
                    ctx,
                    "Failed to load hotzones",
                    err,
                    Some("Could not load hotzones. Check that the API is reachable."),
                );
            }
            MainMsg::Simulate => {
                self.note = None;
                self.status = Status::Loading("Simulating…".into());
                let cb = ctx.link().callback(MainMsg::SimulatedLoaded);
                spawn_local(async move {
                    cb.emit(api::get_simulated_trip().await);
                });
            }
            MainMsg::SimulatedLoaded(Ok(record)) => match Hotzone::from_simulated(&record) {
                Some(point) => {
                    self.selected_trip = None;
                    self.hotzones = Some(Rc::new(vec![point]));
                    self.status = Status::Ok("Simulated 1 point".into());
                    self.show_toast(ctx, "Simulated");
                }
                None => {
                    self.note = Some("The simulated trip has no latitude/longitude.".into());
                    self.status = Status::Ok("Simulated".into());
                }
            },
            MainMsg::SimulatedLoaded(Err(err)) => {
                self.fail(ctx, "Failed to simulate a trip", err, None);
            }
            MainMsg::Fit => {
                self.fit_request += 1;
            }
            MainMsg::PlaybackFailed(err) => {
                self.status = Status::Error("Playback failed".into());
                self.note = Some(err.to_string());
            }
            MainMsg::Clear => {
                self.selected_trip = None;
                self.hotzones = None;
                self.note = None;
                self.status = Status::Idle("Cleared".into());
                self.show_toast(ctx, "Cleared");
            }
            MainMsg::ToggleCollapsed => {
                info!(format!("Toggle collapsed"));
                self.collapsed = !self.collapsed;
            }
            MainMsg::HideToast => {
                self.toast = None;
                self.toast_timeout = None;
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let collapsed = self.collapsed;
        let link = ctx.link().clone();

        let panel = html! {
            <Panel
                trip_id={self.trip_id.clone()}
                status={self.status.clone()}
                note={self.note.clone()}
                selected_trip={self.selected_trip.clone()}
                on_trip_id={link.callback(MainMsg::SetTripId)}
                on_random_id={link.callback(|()| MainMsg::RandomTripId)}
                on_play={link.callback(|()| MainMsg::LoadTrip)}
                on_hotzones={link.callback(|()| MainMsg::LoadHotzones)}
                on_simulate={link.callback(|()| MainMsg::Simulate)}
                on_fit={link.callback(|()| MainMsg::Fit)}
                on_clear={link.callback(|()| MainMsg::Clear)}
            />
        };

        let on_click_cb = link.callback(move |()| MainMsg::ToggleCollapsed);
        let on_playback_error = link.callback(MainMsg::PlaybackFailed);

        let selected_trip = self.selected_trip.clone();
        let hotzones = self.hotzones.clone();
        let toast = self.toast.clone();
        let fit_request = self.fit_request;

        html! {
            <BrowserRouter>
                <Switch<Route> render={move |r| match r {
                    Route::Trip { id: _ } | Route::Default => html!{<>
                        if !collapsed {
                            {panel.clone()}
                        }
                        <CollapseBtn collapsed={collapsed} on_click={on_click_cb.clone()} />
                        <MapComponent
                            collapsed={collapsed}
                            trip_data={selected_trip.clone()}
                            hotzones={hotzones.clone()}
                            fit_request={fit_request}
                            on_playback_error={on_playback_error.clone()}
                        />
                        if let Some(message) = &toast {
                            <div class="toast show">{message.clone()}</div>
                        }
                        </>},
                    Route::Invalid => html! { <h1>{"404 - no such page"}</h1> },
                }} />
            </BrowserRouter>
        }
    }
}

#[derive(PartialEq, Properties, Clone)]
struct CollapseBtnProps {
    collapsed: bool,
    on_click: Callback<()>,
}

#[function_component]
fn CollapseBtn(props: &CollapseBtnProps) -> Html {
    let on_click_clone = props.on_click.clone();

    let onclick = Callback::from(move |_| {
        on_click_clone.emit(());
    });

    if props.collapsed {
        html! { <>
            <button onclick={onclick.clone()} class="collapse-btn-vert collapse-btn">
                {"▶"}
            </button>
            <button onclick={onclick.clone()} class="collapse-btn-horiz collapse-btn">
                {"▼"}
            </button>
        </> }
    } else {
        html! { <>
            <button onclick={onclick.clone()} class="collapse-btn-vert collapse-btn">
                {"◀"}
            </button>
            <button onclick={onclick.clone()} class="collapse-btn-horiz collapse-btn">
                {"▲"}
            </button>
        </> }
    }
}

fn main() {
    log::init();
    yew::Renderer::<Model>::new().render();
}
