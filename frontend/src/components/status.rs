//! Status banner shared by every upload.

use leptos::*;
use crate::StatusMessage;

#[component]
pub fn StatusBanner(status: Signal<Option<StatusMessage>>) -> impl IntoView {
    move || {
        status.get().map(|message| {
            view! {
                <div
                    class=format!("status-message {}", message.kind.css_class())
                    id="statusMessage"
                >
                    {message.text}
                </div>
            }
        })
    }
}
