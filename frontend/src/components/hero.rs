//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"☁️ Cloud Storage"</h1>
            <p class="subtitle">
                "Drop files below to store them. "
                "Every file is uploaded on its own, so one failure never blocks the others."
            </p>
        </div>
    }
}
