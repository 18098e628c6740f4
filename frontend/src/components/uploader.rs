//! The uploader widget: drop zone, progress, status banner and file list.
//!
//! Owns the [`UploaderState`] signal. Upload tasks report back through
//! [`UploadEvent`]s, which are folded into the state here.

use std::rc::Rc;

use gloo_timers::callback::Interval;
use gloo_timers::future::TimeoutFuture;
use leptos::*;
use rand::Rng;
use web_sys::File;

use crate::components::{ProgressSection, StatusBanner, UploadList, UploadSection};
use crate::services::{BrowserTransport, UploadDispatcher};
use crate::state::{Followup, UploaderState};
use crate::{Config, UploadEvent, PROGRESS_TICK_MS};

#[component]
pub fn Uploader(config: Config) -> impl IntoView {
    let state = create_rw_signal(UploaderState::new(&config));
    let dispatcher = Rc::new(UploadDispatcher::new(BrowserTransport, &config));

    {
        let dispatcher = Rc::clone(&dispatcher);
        on_cleanup(move || dispatcher.abort_all());
    }

    // Simulated progress ticker, only alive while something is in flight
    let ticker = store_value(None::<Interval>);

    let on_event = move |event: UploadEvent| {
        let followups = state.try_update(|s| s.apply(event)).unwrap_or_default();
        for followup in followups {
            schedule(state, followup);
        }

        let busy = state.try_with_untracked(UploaderState::is_busy).unwrap_or(false);
        sync_ticker(ticker, state, busy);
    };

    let on_select = Callback::new(move |files: Vec<File>| {
        let Some(ids) = state.try_update(|s| s.begin_batch(&files)).flatten() else {
            log::debug!("Empty selection ignored");
            return;
        };
        log::info!("🗂️ {} file(s) selected", ids.len());

        let batch = ids.into_iter().zip(files).collect();
        dispatcher.dispatch(batch, on_event);
    });

    let entries = Signal::derive(move || state.with(|s| s.entries().to_vec()));
    let progress = Signal::derive(move || state.with(|s| s.progress().clone()));
    let status = Signal::derive(move || state.with(|s| s.status().cloned()));

    view! {
        <div class="upload-container">
            <UploadSection on_select=on_select/>
            <ProgressSection progress=progress/>
            <StatusBanner status=status/>
            <UploadList entries=entries/>
        </div>
    }
}

/// Start the progress ticker when uploads begin, drop it once all settled.
fn sync_ticker(ticker: StoredValue<Option<Interval>>, state: RwSignal<UploaderState>, busy: bool) {
    ticker.try_update_value(|slot| match (busy, slot.is_some()) {
        (true, false) => {
            *slot = Some(Interval::new(PROGRESS_TICK_MS, move || {
                let step = rand::thread_rng().gen_range(0.0..20.0);
                state.try_update(|s| s.tick_progress(step));
            }));
        }
        (false, true) => *slot = None,
        _ => {}
    });
}

/// Run a delayed state change requested by [`UploaderState::apply`].
fn schedule(state: RwSignal<UploaderState>, followup: Followup) {
    spawn_local(async move {
        match followup {
            Followup::ClearStatus { seq, after_ms } => {
                TimeoutFuture::new(after_ms).await;
                state.try_update(|s| s.clear_status(seq));
            }
            Followup::HideProgress { after_ms } => {
                TimeoutFuture::new(after_ms).await;
                state.try_update(|s| s.hide_progress());
            }
        }
    });
}
