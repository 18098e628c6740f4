//! HTTP upload of selected files to the storage backend.
//!
//! Each file is sent by its own task. Tasks report through
//! [`UploadEvent`]s and never touch the view directly.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future::{abortable, AbortHandle, LocalBoxFuture};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde_json::Value;
use web_sys::{File, FormData};

use crate::config::{Config, UPLOAD_FIELD};
use crate::types::{AppError, AppResult, EntryId, FileSource, UploadEvent, UploadOutcome};

/// Sends one file to the backend.
pub trait UploadTransport {
    type File: FileSource;

    /// POST `file` to `url` and return the parsed JSON body.
    fn send(&self, url: &str, file: Self::File) -> impl Future<Output = AppResult<Value>>;
}

/// Browser transport: multipart `FormData` through `fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl UploadTransport for BrowserTransport {
    type File = File;

    async fn send(&self, url: &str, file: File) -> AppResult<Value> {
        let form_data =
            FormData::new().map_err(|e| AppError::Request(format!("FormData: {:?}", e)))?;
        form_data
            .append_with_blob_and_filename(UPLOAD_FIELD, &file, &file.name())
            .map_err(|e| AppError::Request(format!("append file: {:?}", e)))?;

        let request = Request::post(url)
            .body(form_data)
            .map_err(|e| AppError::Request(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(AppError::Server {
                status: response.status(),
                status_text: response.status_text(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AppError::InvalidResponse(e.to_string()))
    }
}

/// Upload one file and report its lifecycle through `notify`.
///
/// Emits `Started` before the request and exactly one `Settled` after it.
/// Failures are folded into the `Settled` outcome.
pub async fn run_upload<T: UploadTransport>(
    transport: &T,
    url: &str,
    id: EntryId,
    file: T::File,
    notify: &dyn Fn(UploadEvent),
) {
    let file_name = file.file_name();
    log::info!("📤 Uploading \"{}\" ({} bytes)", file_name, file.byte_len());
    notify(UploadEvent::Started { id: id.clone() });

    let outcome = match transport.send(url, file).await {
        Ok(_) => {
            log::info!("✅ Uploaded \"{}\"", file_name);
            UploadOutcome::Uploaded
        }
        Err(e) => {
            log::error!("❌ Upload of \"{}\" failed: {}", file_name, e);
            UploadOutcome::Failed(e.to_string())
        }
    };

    notify(UploadEvent::Settled {
        id,
        file_name,
        outcome,
    });
}

/// Runs a task on the current thread's executor.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Spawns one abortable upload task per file.
///
/// Tasks of the same selection start `stagger_ms` apart. Each task drops its
/// abort handle when it settles; the remaining ones are aborted through
/// [`UploadDispatcher::abort_all`], when the widget goes away.
pub struct UploadDispatcher<T: UploadTransport> {
    transport: Rc<T>,
    url: Rc<str>,
    stagger_ms: u32,
    handles: Rc<RefCell<HashMap<EntryId, AbortHandle>>>,
    spawner: Spawner,
}

impl<T: UploadTransport + 'static> UploadDispatcher<T> {
    /// Dispatcher spawning on the browser event loop.
    pub fn new(transport: T, config: &Config) -> Self {
        Self::with_spawner(
            transport,
            config,
            Rc::new(|task: LocalBoxFuture<'static, ()>| {
                wasm_bindgen_futures::spawn_local(task)
            }),
        )
    }

    pub fn with_spawner(transport: T, config: &Config, spawner: Spawner) -> Self {
        Self {
            transport: Rc::new(transport),
            url: Rc::from(config.upload_url()),
            stagger_ms: config.stagger_ms,
            handles: Rc::new(RefCell::new(HashMap::new())),
            spawner,
        }
    }

    /// Schedule the upload of every `(row id, file)` pair.
    pub fn dispatch<F>(&self, batch: Vec<(EntryId, T::File)>, on_event: F)
    where
        F: Fn(UploadEvent) + Clone + 'static,
    {
        log::debug!("Dispatching {} upload(s) to {}", batch.len(), self.url);

        let delays = dispatch_delays(self.stagger_ms, batch.len());
        for ((id, file), delay) in batch.into_iter().zip(delays) {
            let (task, handle) = abortable(upload_task(
                Rc::clone(&self.transport),
                Rc::clone(&self.url),
                delay,
                id.clone(),
                file,
                on_event.clone(),
            ));
            self.handles.borrow_mut().insert(id.clone(), handle);

            let handles = Rc::clone(&self.handles);
            (self.spawner)(Box::pin(async move {
                if task.await.is_err() {
                    log::debug!("Upload task {} aborted", id);
                }
                handles.borrow_mut().remove(&id);
            }));
        }
    }

    /// Number of tasks that have not settled yet.
    pub fn pending(&self) -> usize {
        self.handles.borrow().len()
    }

    /// Abort every task that has not settled yet.
    pub fn abort_all(&self) {
        for (_, handle) in self.handles.borrow_mut().drain() {
            handle.abort();
        }
    }
}

/// Start delay of each file of an `n`-file selection.
pub fn dispatch_delays(stagger_ms: u32, n: usize) -> Vec<u32> {
    (0..n)
        .map(|index| stagger_ms.saturating_mul(index as u32))
        .collect()
}

async fn upload_task<T, F>(
    transport: Rc<T>,
    url: Rc<str>,
    delay_ms: u32,
    id: EntryId,
    file: T::File,
    on_event: F,
) where
    T: UploadTransport,
    F: Fn(UploadEvent),
{
    if delay_ms > 0 {
        TimeoutFuture::new(delay_ms).await;
    }
    run_upload(transport.as_ref(), &url, id, file, &on_event).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use serde_json::json;

    #[derive(Debug)]
    struct FakeFile {
        name: &'static str,
        size: u64,
    }

    impl FileSource for FakeFile {
        fn file_name(&self) -> String {
            self.name.to_string()
        }

        fn byte_len(&self) -> u64 {
            self.size
        }
    }

    /// Answers with a fixed result and records the requests it saw.
    struct StaticTransport {
        result: AppResult<Value>,
        requests: RefCell<Vec<(String, String)>>,
    }

    impl StaticTransport {
        fn new(result: AppResult<Value>) -> Self {
            Self {
                result,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl UploadTransport for StaticTransport {
        type File = FakeFile;

        async fn send(&self, url: &str, file: FakeFile) -> AppResult<Value> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), file.name.to_string()));
            self.result.clone()
        }
    }

    /// Answers each file when the test sends its response.
    struct ManualTransport {
        pending: RefCell<HashMap<&'static str, oneshot::Receiver<AppResult<Value>>>>,
    }

    impl UploadTransport for ManualTransport {
        type File = FakeFile;

        async fn send(&self, _url: &str, file: FakeFile) -> AppResult<Value> {
            let rx = self.pending.borrow_mut().remove(file.name);
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(AppError::Network("connection dropped".into()))),
                None => Err(AppError::Network("unexpected file".into())),
            }
        }
    }

    fn collect(
        transport: &impl UploadTransport<File = FakeFile>,
        file: FakeFile,
    ) -> (EntryId, Vec<UploadEvent>) {
        let id = EntryId::generate();
        let events = RefCell::new(Vec::new());
        block_on(run_upload(
            transport,
            "http://localhost:3000/upload",
            id.clone(),
            file,
            &|event: UploadEvent| events.borrow_mut().push(event),
        ));
        (id, events.into_inner())
    }

    #[test]
    fn test_success_reports_started_then_uploaded() {
        let transport = StaticTransport::new(Ok(json!({})));
        let (id, events) = collect(&transport, FakeFile { name: "a.txt", size: 2048 });

        assert_eq!(
            events,
            vec![
                UploadEvent::Started { id: id.clone() },
                UploadEvent::Settled {
                    id,
                    file_name: "a.txt".into(),
                    outcome: UploadOutcome::Uploaded,
                },
            ]
        );
        assert_eq!(
            transport.requests.into_inner(),
            vec![("http://localhost:3000/upload".to_string(), "a.txt".to_string())]
        );
    }

    #[test]
    fn test_server_error_becomes_failed_outcome() {
        let transport = StaticTransport::new(Err(AppError::Server {
            status: 500,
            status_text: "Internal Server Error".into(),
        }));
        let (_, events) = collect(&transport, FakeFile { name: "a.txt", size: 1 });

        assert_eq!(events.len(), 2);
        match &events[1] {
            UploadEvent::Settled {
                file_name,
                outcome: UploadOutcome::Failed(reason),
                ..
            } => {
                assert_eq!(file_name, "a.txt");
                assert_eq!(reason, "Upload failed: Internal Server Error");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_body_is_a_failure() {
        let transport =
            StaticTransport::new(Err(AppError::InvalidResponse("expected value".into())));
        let (_, events) = collect(&transport, FakeFile { name: "b.bin", size: 1 });

        assert!(matches!(
            events.last(),
            Some(UploadEvent::Settled {
                outcome: UploadOutcome::Failed(_),
                ..
            })
        ));
    }

    #[test]
    fn test_concurrent_uploads_settle_in_response_order() {
        let (tx_first, rx_first) = oneshot::channel();
        let (tx_second, rx_second) = oneshot::channel();
        let transport = Rc::new(ManualTransport {
            pending: RefCell::new(HashMap::from([("first.txt", rx_first), ("second.txt", rx_second)])),
        });
        let events = Rc::new(RefCell::new(Vec::new()));

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        for name in ["first.txt", "second.txt"] {
            let transport = Rc::clone(&transport);
            let events = Rc::clone(&events);
            spawner
                .spawn_local(async move {
                    run_upload(
                        transport.as_ref(),
                        "http://localhost:3000/upload",
                        EntryId::generate(),
                        FakeFile { name, size: 1 },
                        &|event: UploadEvent| events.borrow_mut().push(event),
                    )
                    .await;
                })
                .unwrap();
        }

        pool.run_until_stalled();
        assert_eq!(events.borrow().len(), 2, "both requests in flight");

        // The later file answers first
        tx_second.send(Ok(json!({"ok": true}))).unwrap();
        pool.run_until_stalled();
        tx_first
            .send(Err(AppError::Server {
                status: 503,
                status_text: "Service Unavailable".into(),
            }))
            .unwrap();
        pool.run_until_stalled();

        let settled: Vec<(String, UploadOutcome)> = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                UploadEvent::Settled {
                    file_name, outcome, ..
                } => Some((file_name.clone(), outcome.clone())),
                UploadEvent::Started { .. } => None,
            })
            .collect();

        assert_eq!(
            settled,
            vec![
                ("second.txt".to_string(), UploadOutcome::Uploaded),
                (
                    "first.txt".to_string(),
                    UploadOutcome::Failed("Upload failed: Service Unavailable".into())
                ),
            ]
        );
    }

    #[test]
    fn test_aborted_task_never_settles() {
        let transport = Rc::new(ManualTransport {
            pending: RefCell::new(HashMap::new()),
        });
        let (_tx, rx) = oneshot::channel();
        transport.pending.borrow_mut().insert("slow.bin", rx);
        let events = Rc::new(RefCell::new(Vec::new()));

        let recorder = Rc::clone(&events);
        let (task, handle) = abortable(upload_task(
            transport,
            Rc::from("http://localhost:3000/upload"),
            0,
            EntryId::generate(),
            FakeFile { name: "slow.bin", size: 1 },
            move |event| recorder.borrow_mut().push(event),
        ));

        let mut pool = LocalPool::new();
        let result = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&result);
        pool.spawner()
            .spawn_local(async move {
                *slot.borrow_mut() = Some(task.await.is_err());
            })
            .unwrap();

        pool.run_until_stalled();
        handle.abort();
        pool.run_until_stalled();

        assert_eq!(*result.borrow(), Some(true));
        assert_eq!(events.borrow().len(), 1);
        assert!(matches!(events.borrow()[0], UploadEvent::Started { .. }));
    }

    fn pool_spawner(pool: &LocalPool) -> Spawner {
        let spawner = pool.spawner();
        Rc::new(move |task: LocalBoxFuture<'static, ()>| {
            spawner.spawn_local(task).expect("executor alive")
        })
    }

    #[test]
    fn test_dispatch_delays() {
        let config = Config::for_hostname("localhost");
        assert_eq!(dispatch_delays(config.stagger_ms, 3), vec![0, 100, 200]);
        assert_eq!(dispatch_delays(config.without_stagger().stagger_ms, 3), vec![0, 0, 0]);
        assert!(dispatch_delays(100, 0).is_empty());
    }

    #[test]
    fn test_dispatch_pairs_rows_with_files_and_releases_handles() {
        let mut pool = LocalPool::new();
        let config = Config::for_hostname("localhost").without_stagger();
        let dispatcher = UploadDispatcher::with_spawner(
            StaticTransport::new(Ok(json!({}))),
            &config,
            pool_spawner(&pool),
        );

        let batch: Vec<(EntryId, FakeFile)> = ["a.txt", "b.txt", "c.txt"]
            .into_iter()
            .map(|name| (EntryId::generate(), FakeFile { name, size: 1 }))
            .collect();
        let expected: Vec<(EntryId, String)> = batch
            .iter()
            .map(|(id, file)| (id.clone(), file.name.to_string()))
            .collect();

        let events = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&events);
        dispatcher.dispatch(batch, move |event: UploadEvent| {
            recorder.borrow_mut().push(event)
        });
        assert_eq!(dispatcher.pending(), 3);

        pool.run_until_stalled();
        assert_eq!(dispatcher.pending(), 0);

        let mut settled: Vec<(EntryId, String)> = events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                UploadEvent::Settled { id, file_name, .. } => Some((id.clone(), file_name.clone())),
                UploadEvent::Started { .. } => None,
            })
            .collect();
        settled.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(settled, expected);

        let requests = dispatcher.transport.requests.borrow();
        assert_eq!(requests.len(), 3);
        assert!(requests
            .iter()
            .all(|(url, _)| url == "http://localhost:3000/upload"));
    }

    #[test]
    fn test_abort_all_stops_pending_uploads() {
        let mut pool = LocalPool::new();
        let (tx_fast, rx_fast) = oneshot::channel();
        let (_tx_slow, rx_slow) = oneshot::channel();
        let transport = ManualTransport {
            pending: RefCell::new(HashMap::from([("fast.txt", rx_fast), ("slow.txt", rx_slow)])),
        };
        let config = Config::for_hostname("localhost").without_stagger();
        let dispatcher = UploadDispatcher::with_spawner(transport, &config, pool_spawner(&pool));

        let events = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&events);
        dispatcher.dispatch(
            vec![
                (EntryId::generate(), FakeFile { name: "fast.txt", size: 1 }),
                (EntryId::generate(), FakeFile { name: "slow.txt", size: 1 }),
            ],
            move |event: UploadEvent| recorder.borrow_mut().push(event),
        );

        pool.run_until_stalled();
        assert_eq!(dispatcher.pending(), 2);

        tx_fast.send(Ok(json!({}))).unwrap();
        pool.run_until_stalled();
        assert_eq!(dispatcher.pending(), 1);

        dispatcher.abort_all();
        assert_eq!(dispatcher.pending(), 0);
        pool.run_until_stalled();

        // Two starts and the fast settlement, nothing for the aborted upload
        assert_eq!(events.borrow().len(), 3);
        assert_eq!(dispatcher.pending(), 0);
    }
}
