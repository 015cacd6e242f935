use std::rc::Rc;

use gloo_console::{error, info};
use gloo_utils::document;
use leaflet::{LatLng, Layer, Map, MapOptions, TileLayer, TileLayerOptions};
use trip_player_lib::{
    hotzone::{Hotzone, HotzoneLayer},
    PlaybackConfig, PlayerError, TripPlayer,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, Node};
use yew::prelude::*;

use crate::{
    components::leaflet_surface::{AnimationFrames, LeafletSurface, SkipButton},
    config::{DEFAULT_CENTER, DEFAULT_ZOOM, MAX_ZOOM, TILE_ATTRIBUTION, TILE_URL},
    trip_data::TripData,
};

pub enum Msg {
    SkipVisible(bool),
    Skip,
}

pub struct MapComponent {
    map: Map,
    container: HtmlElement,
    player: TripPlayer<LeafletSurface, AnimationFrames, SkipButton>,
    skip_button: SkipButton,
    skip_visible: bool,
    hotzone_surface: LeafletSurface,
    hotzones: HotzoneLayer<LeafletSurface>,
}

#[derive(PartialEq, Properties, Clone)]
pub struct Props {
    pub trip_data: Option<TripData>,
    pub hotzones: Option<Rc<Vec<Hotzone>>>,
    pub collapsed: bool,
    /// Bumped by the panel's fit button.
    pub fit_request: u32,
    pub on_playback_error: Callback<PlayerError>,
}

impl MapComponent {
    fn render_map(&self) -> Html {
        let node: &Node = &self.container.clone().into();
        Html::VRef(node.clone())
    }

    fn show_trip(&mut self, props: &Props) {
        match &props.trip_data {
            Some(trip_data) => {
                info!(format!(
                    "Playing trip {} with {} points",
                    trip_data.trip_id,
                    trip_data.trip.len()
                ));
                if let Err(err) = self.player.play(trip_data.trip.as_ref().clone()) {
                    error!(format!("Cannot play trip {}: {}", trip_data.trip_id, err));
                    props.on_playback_error.emit(err);
                }
            }
            None => {
                if let Err(err) = self.player.clear() {
                    error!(format!("Cannot clear trip playback: {}", err));
                }
            }
        }
    }

    fn fit(&mut self) {
        match self.player.fit() {
            Ok(true) => {}
            Ok(false) => {
                if !self.hotzones.fit(&mut self.hotzone_surface) {
                    info!("Nothing to fit the view to");
                }
            }
            Err(err) => error!(format!("Cannot fit the view: {}", err)),
        }
    }

    fn show_hotzones(&mut self, props: &Props) {
        match &props.hotzones {
            Some(hotzones) => {
                self.hotzones.show(&mut self.hotzone_surface, hotzones);
            }
            None => self.hotzones.clear(&mut self.hotzone_surface),
        }
    }
}

impl Component for MapComponent {
    type Message = Msg;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let container: Element = document().create_element("div").unwrap();
        let container: HtmlElement = container.dyn_into().unwrap();
        container.set_class_name("map");

        let leaflet_map = Map::new_with_element(&container, &MapOptions::default());

        let config = PlaybackConfig::default();
        let skip_button = SkipButton::new(ctx.link().callback(Msg::SkipVisible));
        let hotzones = HotzoneLayer::new(config.fit_padding);
        let player = TripPlayer::new(
            LeafletSurface::new(leaflet_map.clone()),
            AnimationFrames,
            skip_button.clone(),
            config,
        );

        Self {
            hotzone_surface: LeafletSurface::new(leaflet_map.clone()),
            map: leaflet_map,
            container,
            player,
            skip_button,
            skip_visible: false,
            hotzones,
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render {
            self.map.set_max_zoom(MAX_ZOOM);
            self.map
                .set_view(&LatLng::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1), DEFAULT_ZOOM);
            add_tile_layer(&self.map);

            // Data may already have arrived before the map was attached
            let props = ctx.props();
            if props.hotzones.is_some() {
                self.show_hotzones(props);
            }
            if props.trip_data.is_some() {
                self.show_trip(props);
            }
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::SkipVisible(visible) => {
                let changed = self.skip_visible != visible;
                self.skip_visible = visible;
                changed
            }
            Msg::Skip => {
                info!("Skipping to the end of the trip");
                self.skip_button.press();
                false
            }
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        self.map.invalidate_size(false);
        let props = ctx.props();

        // Hotzones first, a new trip fits the view after them
        if props.hotzones != old_props.hotzones {
            self.show_hotzones(props);
        }

        if props.trip_data != old_props.trip_data {
            self.show_trip(props);
        }

        if props.fit_request != old_props.fit_request {
            self.fit();
        }

        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let on_skip = ctx.link().callback(|_| Msg::Skip);

        html! {
            <div class="map">
                {self.render_map()}
                if self.skip_visible {
                    <button class="skip-btn" onclick={on_skip}>
                        {"Skip ⏭"}
                    </button>
                }
            </div>
        }
    }
}

fn add_tile_layer(map: &Map) {
    let opts = TileLayerOptions::new();
    opts.set_max_zoom(MAX_ZOOM);
    opts.set_attribution(TILE_ATTRIBUTION.into());
    opts.set_update_when_idle(true);
    TileLayer::new_options(TILE_URL, &opts).add_to(map);
}
