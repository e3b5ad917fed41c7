//! The editor for the light cluster card
use std::rc::Rc;

use light_cluster_common::{
    config::Config,
    controllers::editor::{ConfigChange, Controller, EditorView},
};
use tracing::debug;
use yew::prelude::*;

use super::forms::{checkbox::Checkbox, text_input::TextInput};
use crate::services::hass::Hass;

/// The yew properties for the editor.
#[derive(Clone, Properties, PartialEq)]
pub struct Props {
    /// The host state, once the host has provided it.
    pub hass: Option<Hass>,

    /// The configuration being edited.
    pub config: Rc<Config>,

    /// Called with the new configuration after every change.
    pub on_config_changed: Callback<Config>,
}

/// The yew message for the editor.
pub enum Message {
    /// A form field was changed
    Change(ConfigChange),
}

/// A yew card editor
pub struct LightClusterCardEditor {
    controller: Controller,
}

fn editor_to_html(ctx: &Context<LightClusterCardEditor>, view: &EditorView) -> Html {
    let text_inputs = view.text.iter().map(|text| {
        let field = text.field;
        let on_change = ctx
            .link()
            .callback(move |value| Message::Change(ConfigChange::Text(field, value)));
        html! {
            <TextInput
                label={field.label()}
                value={text.value.clone()}
                placeholder={text.placeholder.clone()}
                {on_change}
            />
        }
    });

    let entity_checkboxes = view.entities.iter().map(|entity| {
        let entity_id = entity.entity_id.clone();
        let on_change = ctx.link().callback(move |checked| {
            Message::Change(ConfigChange::Entity {
                entity_id: entity_id.clone(),
                checked,
            })
        });
        html! {
            <Checkbox
                id={entity.entity_id.clone()}
                label={entity.name.clone()}
                value={entity.checked}
                {on_change}
            />
        }
    });

    let flag_checkboxes = view.flags.iter().map(|(flag, checked)| {
        let flag = *flag;
        let on_change = ctx
            .link()
            .callback(move |checked| Message::Change(ConfigChange::Flag(flag, checked)));
        html! {
            <Checkbox id={flag.key()} label={flag.label()} value={*checked} {on_change} />
        }
    });

    html! {
        <div class="card-config">
            <div class="overall-config">
                { for text_inputs }
            </div>

            <h3>{ "Entities" }</h3>
            <div class="entities">
                { for entity_checkboxes }
            </div>

            <h3>{ "Extra options" }</h3>
            <div class="overall-config">
                { for flag_checkboxes }
            </div>
        </div>
    }
}

impl Component for LightClusterCardEditor {
    type Message = Message;
    type Properties = Props;

    fn create(ctx: &Context<Self>) -> Self {
        let mut controller = Controller::new();
        controller.configure((*ctx.props().config).clone());
        LightClusterCardEditor { controller }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().config != old_props.config {
            self.controller.configure((*ctx.props().config).clone());
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Message::Change(change) => {
                let props = ctx.props();
                match self.controller.update(&change, props.hass.is_some()) {
                    Some(config) => {
                        props.on_config_changed.emit(config);
                        true
                    }
                    None => {
                        debug!("Change not emitted");
                        // Redraw so the form matches the unchanged configuration.
                        true
                    }
                }
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(hass) = &ctx.props().hass else {
            return html! {};
        };

        match self.controller.view(&hass.snapshot().states) {
            Some(view) => editor_to_html(ctx, &view),
            None => html! {},
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        self.controller.rendered();
    }
}
