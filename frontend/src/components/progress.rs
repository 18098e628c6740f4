use leptos::*;
use crate::Progress;

#[component]
pub fn ProgressSection(progress: Signal<Progress>) -> impl IntoView {
    view! {
        <Show
            when=move || progress.with(|p| p.visible)
            fallback=|| view! { }
        >
            <div class="progress-section" id="progressSection">
                <div class="progress-bar">
                    <div
                        class="progress-fill"
                        id="progressFill"
                        style=move || format!("width: {}%;", progress.with(|p| p.percent))
                    ></div>
                </div>
                <div class="progress-text" id="progressText">
                    {move || progress.with(Progress::label)}
                </div>
            </div>
        </Show>
    }
}
