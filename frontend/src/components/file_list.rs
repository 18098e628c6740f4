//! File list rows, one per selected file.

use leptos::*;
use crate::FileEntry;

#[component]
pub fn UploadList(entries: Signal<Vec<FileEntry>>) -> impl IntoView {
    view! {
        <div class="file-list" id="fileList">
            // Keyed on status too, so a settled row is re-rendered
            <For
                each=move || entries.get()
                key=|entry| (entry.id.clone(), entry.status)
                children=move |entry| view! { <FileRow entry=entry/> }
            />
        </div>
    }
}

#[component]
fn FileRow(entry: FileEntry) -> impl IntoView {
    let status_class = format!("file-status {}", entry.status.css_class());

    view! {
        <div class="file-item" id=entry.id.to_string()>
            <div class="file-info">
                <div class="file-icon">{entry.extension}</div>
                <div class="file-details">
                    <h4>{entry.display_name}</h4>
                    <p>{entry.display_size}</p>
                </div>
            </div>
            <div class=status_class>{entry.status.label()}</div>
        </div>
    }
}
