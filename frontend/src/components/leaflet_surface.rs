use std::{cell::RefCell, rc::Rc};

use geo_types::{Point, Rect};
use gloo_render::{request_animation_frame, AnimationFrame};
use leaflet::{
    CircleMarker, CircleOptions, LatLng, LatLngBounds, Layer, LayerGroup, Map, Polyline, PolylineOptions,
};
use trip_player_lib::surface::{FrameScheduler, MapSurface, MarkerStyle, PathStyle, SkipControlHost};
use web_sys::js_sys::Array;
use wasm_bindgen::{prelude::*, JsCast};
use yew::Callback;

// `leaflet` 0.4 does not bind `L.LatLngBounds.pad`; bind it here.
#[wasm_bindgen]
extern "C" {
    type PaddableBounds;

    #[wasm_bindgen(method)]
    fn pad(this: &PaddableBounds, buffer_ratio: f64) -> LatLngBounds;
}

trait Pad {
    fn pad(&self, buffer_ratio: f64) -> LatLngBounds;
}

impl Pad for LatLngBounds {
    fn pad(&self, buffer_ratio: f64) -> LatLngBounds {
        self.unchecked_ref::<PaddableBounds>().pad(buffer_ratio)
    }
}

fn lat_lng(point: Point) -> LatLng {
    LatLng::new(point.y(), point.x())
}

/// Draws on a leaflet map. Cheap to clone, every clone draws on the same map.
#[derive(Clone)]
pub struct LeafletSurface {
    map: Map,
}

impl LeafletSurface {
    pub fn new(map: Map) -> Self {
        Self { map }
    }
}

impl MapSurface for LeafletSurface {
    type Group = LayerGroup;
    type Marker = CircleMarker;
    type Path = Polyline;

    fn create_group(&mut self) -> LayerGroup {
        let group = LayerGroup::new();
        group.add_to(&self.map);
        group
    }

    fn remove_group(&mut self, group: LayerGroup) {
        group.clear_layers();
        group.remove();
    }

    fn add_marker(&mut self, group: &LayerGroup, at: Point, style: &MarkerStyle) -> CircleMarker {
        let opts = CircleOptions::new();
        opts.set_radius(style.radius);
        opts.set_color(style.color.clone());
        opts.set_fill_color(style.color.clone());
        opts.set_weight(style.weight);
        opts.set_opacity(style.opacity);
        opts.set_fill_opacity(style.fill_opacity);

        let marker = CircleMarker::new_with_options(&lat_lng(at), &opts);
        marker.add_to_layer_group(group);
        marker
    }

    fn move_marker(&mut self, marker: &CircleMarker, to: Point) {
        marker.set_lat_lng(&lat_lng(to));
    }

    fn add_path(&mut self, group: &LayerGroup, style: &PathStyle) -> Polyline {
        let opts = PolylineOptions::new();
        opts.set_color(style.color.clone());
        opts.set_weight(style.weight);
        opts.set_opacity(style.opacity);
        opts.set_smooth_factor(1.5);

        let path = Polyline::new_with_options(&Array::new(), &opts);
        path.add_to_layer_group(group);
        path
    }

    fn extend_path(&mut self, path: &Polyline, point: Point) {
        path.add_lat_lng(&lat_lng(point));
    }

    fn set_path(&mut self, path: &Polyline, points: &[Point]) {
        let lat_lngs = points.iter().map(|p| lat_lng(*p));
        path.set_lat_lngs(&Array::from_iter(lat_lngs));
    }

    fn fit_bounds(&mut self, bounds: Rect, padding: f64) {
        let min = Point::from(bounds.min());
        let max = Point::from(bounds.max());
        let bounds = LatLngBounds::new(&lat_lng(min), &lat_lng(max));
        self.map.fit_bounds(&bounds.pad(padding));
    }
}

/// One `requestAnimationFrame` callback per frame. Dropping the handle cancels it.
pub struct AnimationFrames;

impl FrameScheduler for AnimationFrames {
    type Handle = AnimationFrame;

    fn request_frame(&mut self, callback: Box<dyn FnOnce()>) -> AnimationFrame {
        request_animation_frame(move |_timestamp| callback())
    }

    fn cancel_frame(&mut self, handle: AnimationFrame) {
        drop(handle);
    }
}

/// The skip button over the map. The map component renders it while an action is set.
#[derive(Clone)]
pub struct SkipButton {
    action: Rc<RefCell<Option<Rc<dyn Fn()>>>>,
    on_visibility: Callback<bool>,
}

impl SkipButton {
    pub fn new(on_visibility: Callback<bool>) -> Self {
        Self {
            action: Rc::new(RefCell::new(None)),
            on_visibility,
        }
    }

    pub fn press(&self) {
        // Clone out first, the action hides the button and so clears the cell.
        let action = self.action.borrow().clone();
        if let Some(action) = action {
            action();
        }
    }
}

impl SkipControlHost for SkipButton {
    fn show_skip_control(&mut self, on_activate: Box<dyn Fn()>) {
        *self.action.borrow_mut() = Some(Rc::from(on_activate));
        self.on_visibility.emit(true);
    }

    fn hide_skip_control(&mut self) {
        self.action.borrow_mut().take();
        self.on_visibility.emit(false);
    }
}
