//! Drop zone with click-to-browse and drag & drop support.
//!
//! Only collects files; uploading is the parent's job.

use leptos::*;
use web_sys::{DragEvent, Event, File, FileList, HtmlInputElement, MouseEvent};

#[component]
pub fn UploadSection(
    /// Called with every selection, including empty ones
    on_select: Callback<Vec<File>>,
) -> impl IntoView {
    let (dragging, set_dragging) = create_signal(false);
    let input_ref = create_node_ref::<html::Input>();

    let open_picker = move || {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    // Clicking anywhere on the zone opens the picker
    let on_zone_click = move |_: MouseEvent| open_picker();

    // The button sits inside the zone: don't let the zone open it twice
    let on_button_click = move |ev: MouseEvent| {
        ev.stop_propagation();
        open_picker();
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        let files = input.files().map(collect_files).unwrap_or_default();
        // Allow picking the same file again
        input.set_value("");
        on_select.call(files);
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_dragging.set(true);
    };

    let on_dragleave = move |_: DragEvent| set_dragging.set(false);

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);
        let files = ev
            .data_transfer()
            .and_then(|transfer| transfer.files())
            .map(collect_files)
            .unwrap_or_default();
        on_select.call(files);
    };

    view! {
        <div
            class="upload-area"
            class:dragover=move || dragging.get()
            id="uploadArea"
            on:click=on_zone_click
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:drop=on_drop
        >
            <div class="upload-icon">"📁"</div>
            <div class="upload-text">"Drag & drop files here"</div>
            <div class="upload-hint">"or click to browse"</div>
            <button class="upload-button" id="uploadBtn" on:click=on_button_click>
                "Choose Files"
            </button>
            <input
                type="file"
                id="fileInput"
                multiple=true
                style="display:none"
                node_ref=input_ref
                on:click=|ev: MouseEvent| ev.stop_propagation()
                on:change=on_file_change
            />
        </div>
    }
}

fn collect_files(list: FileList) -> Vec<File> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}
