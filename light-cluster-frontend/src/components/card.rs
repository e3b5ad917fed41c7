//! The light cluster card
use std::rc::Rc;

use light_cluster_common::{
    config::Config,
    controllers::card::{CardView, Controller, EffectListView, HeaderView, Slider, SliderView},
    services::ServiceCall,
};
use tracing::error;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::services::hass::{load_card_helpers, Hass};

/// The yew properties for the card.
#[derive(Clone, Properties, PartialEq)]
pub struct Props {
    /// The host state.
    pub hass: Hass,

    /// The card configuration.
    pub config: Rc<Config>,
}

/// The yew message for the card.
pub enum Message {
    /// The toggle was clicked
    Toggle,

    /// A slider was moved
    Slider(Slider, String),

    /// An effect was selected
    Effect(String),
}

/// A yew light cluster card
pub struct LightClusterCard {
    controller: Controller,
}

const fn slider_class(slider: Slider) -> &'static str {
    match slider {
        Slider::Brightness => "light-cluster-card-brightness",
        Slider::ColorTemp => "light-cluster-card-color_temp",
    }
}

/// Should the card redraw itself after sending these calls?
///
/// With no calls the host sends no new state, and the inputs must be reset
/// to match the lights.
fn redraw_after(calls: &[ServiceCall]) -> bool {
    calls.is_empty()
}

fn format_number(value: f64) -> String {
    format!("{value}")
}

fn header_to_html(ctx: &Context<LightClusterCard>, header: &HeaderView) -> Html {
    let onchange = ctx.link().callback(|_: Event| Message::Toggle);

    html! {
        <div class="light-cluster-card__header">
            <div class="light-cluster-card__title">{ header.title.clone() }</div>
            <div class="light-cluster-card-toggle">
                <input type="checkbox" class="light-cluster-card__switch" checked={header.on} {onchange} />
            </div>
        </div>
    }
}

fn slider_to_html(ctx: &Context<LightClusterCard>, view: &SliderView) -> Html {
    let slider = view.slider;
    let onchange = ctx.link().callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Message::Slider(slider, input.value())
    });

    html! {
        <div class="control light-cluster-card-center">
            <div class="icon-container">
                <ha-icon icon={format!("hass:{}", view.icon)}></ha-icon>
            </div>
            <input
                type="range"
                class={slider_class(slider)}
                min={format_number(view.min)}
                max={format_number(view.max)}
                value={view.value.map(format_number)}
                {onchange}
            />
            if let Some(percent) = view.percent {
                <div class="percent-slider">{ format!("{percent}%") }</div>
            }
        </div>
    }
}

fn effects_to_html(ctx: &Context<LightClusterCard>, view: &EffectListView) -> Html {
    let onchange = ctx.link().callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Message::Effect(select.value())
    });

    html! {
        <div class="control light-cluster-card-center light-cluster-card-effectlist">
            <select {onchange} aria-label={view.caption.clone()}>
                <option value="" disabled={true} selected={view.selected.is_none()}>
                    { view.caption.clone() }
                </option>
                { for view.effects.iter().enumerate().map(|(i, effect)| html! {
                    <option value={effect.clone()} selected={view.selected == Some(i)}>
                        { effect.clone() }
                    </option>
                }) }
            </select>
        </div>
    }
}

fn card_to_html(ctx: &Context<LightClusterCard>, view: &CardView) -> Html {
    let slider_classes = classes!(
        "light-cluster-card-sliders",
        view.full_width_sliders.then_some("ha-slider-full-width")
    );

    html! {
        <ha-card class={classes!(view.classes.clone())}>
            { view.header.as_ref().map(|h| header_to_html(ctx, h)).unwrap_or_default() }
            <div class={slider_classes}>
                { view.brightness.as_ref().map(|s| slider_to_html(ctx, s)).unwrap_or_default() }
                { view.color_temp.as_ref().map(|s| slider_to_html(ctx, s)).unwrap_or_default() }
            </div>
            { view.effects.as_ref().map(|e| effects_to_html(ctx, e)).unwrap_or_default() }
        </ha-card>
    }
}

impl Component for LightClusterCard {
    type Message = Message;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let mut controller = Controller::new();
        controller.configure((*ctx.props().config).clone());
        LightClusterCard { controller }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().config != old_props.config {
            self.controller.configure((*ctx.props().config).clone());
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        let hass = &ctx.props().hass;
        let states = &hass.snapshot().states;

        let calls = match msg {
            Message::Toggle => self.controller.toggle(states),
            Message::Slider(slider, value) => self.controller.set_slider(states, slider, &value),
            Message::Effect(effect) => self.controller.set_effect(states, &effect),
        };

        for call in &calls {
            if let Err(err) = hass.call_service(call) {
                error!("Failed to call {call}: {err}");
            }
        }

        // Otherwise the host publishes new states, which redraws the card.
        redraw_after(&calls)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let snapshot = ctx.props().hass.snapshot();

        match self.controller.render(&snapshot.states, snapshot.strings()) {
            Ok(view) => card_to_html(ctx, &view),
            Err(err) => {
                error!("Cannot draw card: {err}");
                html! {
                    <ha-card class="light-cluster-card">
                        <div class="alert alert-danger" role="alert">
                            { err.to_string() }
                        </div>
                    </ha-card>
                }
            }
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, first_render: bool) {
        self.controller.rendered();
        if first_render {
            spawn_local(load_card_helpers("light"));
        }
    }
}
