use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub label: String,
    pub value: String,
    #[prop_or_default]
    pub placeholder: Option<String>,
    pub on_change: Callback<String>,
}

#[function_component(TextInput)]
pub fn text_input(props: &Props) -> Html {
    let on_change = props.on_change.reform(|e: Event| {
        e.prevent_default();
        e.target_unchecked_into::<web_sys::HtmlInputElement>()
            .value()
    });
    html! {
        <label class="text-input">
            {props.label.clone()}
            <input
                type="text"
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                onchange={on_change}
            />
        </label>
    }
}
