mod app;
mod components;
mod core;

use app::App;
use leptos::*;

fn main() {
    wasm_logger::init(wasm_logger::Config::default());

    mount_to_body(|| view! { <App/> });
}
