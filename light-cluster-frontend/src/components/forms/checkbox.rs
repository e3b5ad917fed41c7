use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub id: String,
    pub label: String,
    pub value: bool,
    pub on_change: Callback<bool>,
}

#[function_component(Checkbox)]
pub fn checkbox(props: &Props) -> Html {
    let on_change = props
        .on_change
        .reform(|e: Event| e.target_unchecked_into::<web_sys::HtmlInputElement>().checked());
    let id = props.id.clone();
    html! {
        <div class="checkbox-options">
            <input type="checkbox" id={id.clone()} name={id.clone()} value={id.clone()} onchange={on_change} checked={props.value} />
            <label for={id}>{props.label.clone()}</label>
        </div>
    }
}
