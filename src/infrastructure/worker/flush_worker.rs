//! Flush Worker - Background Batched Persistence
//!
//! 从队列收集消息，按固定间隔批量写入存储。
//! 写入失败时保留待写批次，下一次 tick 重试同一批（可能已变大）。

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::queue::MessageReceiver;
use crate::application::ports::MessageStorePort;
use crate::domain::messaging::Message;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct FlushWorkerConfig {
    /// 批量写入间隔
    pub flush_interval: Duration,
    /// 待写批次上限，达到后暂停从队列取消息（背压传递给生产者）
    pub max_pending: usize,
}

impl Default for FlushWorkerConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_secs(10),
            max_pending: 65_536,
        }
    }
}

/// 一次 flush 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// 没有待写消息，未访问存储
    Empty,
    /// 成功写入的消息数
    Flushed(usize),
    /// 写入失败，批次原样保留
    Failed { pending: usize },
}

enum Control {
    Flush(oneshot::Sender<FlushOutcome>),
}

/// 批量写入 Worker
///
/// 待写批次（pending）只属于 Worker 任务本身，不与任何请求共享
pub struct FlushWorker {
    config: FlushWorkerConfig,
    receiver: MessageReceiver,
    store: Arc<dyn MessageStorePort>,
    pending: Vec<Message>,
}

/// 运行中 Worker 的句柄
pub struct FlushWorkerHandle {
    control: mpsc::Sender<Control>,
    cancel: CancellationToken,
    task: JoinHandle<FlushOutcome>,
}

impl FlushWorker {
    pub fn new(
        config: FlushWorkerConfig,
        receiver: MessageReceiver,
        store: Arc<dyn MessageStorePort>,
    ) -> Self {
        Self {
            config,
            receiver,
            store,
            pending: Vec::new(),
        }
    }

    /// 启动 Worker
    pub fn spawn(self) -> FlushWorkerHandle {
        let (control_tx, control_rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(control_rx, cancel.clone()));

        FlushWorkerHandle {
            control: control_tx,
            cancel,
            task,
        }
    }

    async fn run(
        mut self,
        mut control: mpsc::Receiver<Control>,
        cancel: CancellationToken,
    ) -> FlushOutcome {
        tracing::info!(
            flush_interval_ms = self.config.flush_interval.as_millis() as u64,
            max_pending = self.config.max_pending,
            "FlushWorker started"
        );

        let mut ticker = tokio::time::interval(self.config.flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // 跳过立即触发的第一次 tick
        ticker.tick().await;

        loop {
            let accepting = self.pending.len() < self.config.max_pending;

            tokio::select! {
                _ = cancel.cancelled() => break,
                received = self.receiver.recv(), if accepting => match received {
                    Some(message) => self.accept(message),
                    None => {
                        tracing::info!("Message queue closed");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    self.flush().await;
                }
                Some(Control::Flush(reply)) = control.recv() => {
                    let outcome = self.flush().await;
                    let _ = reply.send(outcome);
                }
            }
        }

        self.drain_and_stop().await
    }

    fn accept(&mut self, message: Message) {
        self.pending.push(message);
        if self.pending.len() == self.config.max_pending {
            tracing::warn!(
                pending = self.pending.len(),
                "Pending batch reached max_pending, pausing queue consumption"
            );
        }
    }

    /// 取出已在队列中的消息，保证 flush 前入队的消息都包含在本次写入中
    fn drain_ready(&mut self) {
        while self.pending.len() < self.config.max_pending {
            match self.receiver.try_recv() {
                Some(message) => self.accept(message),
                None => break,
            }
        }
    }

    async fn flush(&mut self) -> FlushOutcome {
        self.drain_ready();
        self.write_pending().await
    }

    /// 对整个待写批次做一次批量写入；只有写入成功才清空批次
    async fn write_pending(&mut self) -> FlushOutcome {
        if self.pending.is_empty() {
            return FlushOutcome::Empty;
        }

        let count = self.pending.len();
        match self.store.save_messages(&self.pending).await {
            Ok(()) => {
                self.pending.clear();
                tracing::info!(count = count, "Pending batch flushed");
                FlushOutcome::Flushed(count)
            }
            Err(e) => {
                tracing::error!(
                    pending = count,
                    error = %e,
                    "Cannot save messages, batch kept for next flush"
                );
                FlushOutcome::Failed { pending: count }
            }
        }
    }

    /// 停止接收，把队列中剩余消息并入批次，做最后一次写入
    async fn drain_and_stop(mut self) -> FlushOutcome {
        self.receiver.close();
        while let Some(message) = self.receiver.recv().await {
            self.pending.push(message);
        }

        let outcome = self.write_pending().await;
        if let FlushOutcome::Failed { pending } = outcome {
            tracing::error!(lost = pending, "FlushWorker stopped with unsaved messages");
        }

        tracing::info!("FlushWorker stopped");
        outcome
    }
}

impl FlushWorkerHandle {
    /// 立即执行一次 flush 并返回结果
    ///
    /// Worker 已停止时返回 None
    pub async fn flush(&self) -> Option<FlushOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.control.send(Control::Flush(reply_tx)).await.ok()?;
        reply_rx.await.ok()
    }

    /// 停止 Worker：先排空队列，再做最后一次写入
    pub async fn shutdown(self) -> Result<FlushOutcome, JoinError> {
        self.cancel.cancel();
        self.task.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{OutboxError, OutboxPort, RepositoryError};
    use crate::domain::messaging::{MessageId, UserId};
    use crate::infrastructure::worker::MessageQueue;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 记录每次批量写入的存储，可指定前几次写入失败
    #[derive(Default)]
    struct RecordingStore {
        attempts: Mutex<Vec<Vec<String>>>,
        saved: Mutex<Vec<String>>,
        failures_left: AtomicUsize,
    }

    impl RecordingStore {
        fn failing(times: usize) -> Self {
            let store = Self::default();
            store.failures_left.store(times, Ordering::SeqCst);
            store
        }

        fn attempts(&self) -> Vec<Vec<String>> {
            self.attempts.lock().unwrap().clone()
        }

        fn saved(&self) -> Vec<String> {
            self.saved.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MessageStorePort for RecordingStore {
        async fn find_recipient(&self, username: &str) -> Result<UserId, RepositoryError> {
            Err(RepositoryError::NotFound(username.to_string()))
        }

        async fn list_messages(&self, _user_id: &str) -> Result<Vec<Message>, RepositoryError> {
            Ok(Vec::new())
        }

        async fn get_message(&self, id: MessageId) -> Result<Message, RepositoryError> {
            Err(RepositoryError::NotFound(id.to_string()))
        }

        async fn save_messages(&self, messages: &[Message]) -> Result<(), RepositoryError> {
            let payloads: Vec<String> = messages.iter().map(|m| m.payload.clone()).collect();
            self.attempts.lock().unwrap().push(payloads.clone());

            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(RepositoryError::DatabaseError("store is down".to_string()));
            }

            self.saved.lock().unwrap().extend(payloads);
            Ok(())
        }

        async fn register_user(&self, _user_id: &str, _username: &str) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    fn message(payload: &str) -> Message {
        Message::new("sender", "recipient", Utc::now(), payload)
    }

    fn start(
        store: Arc<RecordingStore>,
        capacity: usize,
        flush_interval: Duration,
        max_pending: usize,
    ) -> (MessageQueue, FlushWorkerHandle) {
        let (queue, receiver) = MessageQueue::bounded(capacity);
        let config = FlushWorkerConfig {
            flush_interval,
            max_pending,
        };
        let handle = FlushWorker::new(config, receiver, store).spawn();
        (queue, handle)
    }

    fn batch(payloads: &[&str]) -> Vec<String> {
        payloads.iter().map(|p| p.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_flushes_all_enqueued_in_order() {
        let store = Arc::new(RecordingStore::default());
        let (queue, _handle) = start(store.clone(), 1024, Duration::from_secs(10), 100);

        for payload in ["a", "b", "c"] {
            queue.enqueue(message(payload)).unwrap();
        }

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(store.attempts(), vec![batch(&["a", "b", "c"])]);
        assert_eq!(store.saved(), batch(&["a", "b", "c"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_flush_is_retried_with_grown_batch() {
        let store = Arc::new(RecordingStore::failing(1));
        let (queue, _handle) = start(store.clone(), 1024, Duration::from_secs(10), 100);

        queue.enqueue(message("a")).unwrap();
        queue.enqueue(message("b")).unwrap();
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(store.attempts(), vec![batch(&["a", "b"])]);
        assert!(store.saved().is_empty());

        queue.enqueue(message("c")).unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(
            store.attempts(),
            vec![batch(&["a", "b"]), batch(&["a", "b", "c"])]
        );
        assert_eq!(store.saved(), batch(&["a", "b", "c"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_skips_store() {
        let store = Arc::new(RecordingStore::default());
        let (_queue, handle) = start(store.clone(), 1024, Duration::from_secs(10), 100);

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(store.attempts().is_empty());
        assert_eq!(handle.flush().await, Some(FlushOutcome::Empty));
        assert!(store.attempts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_flush() {
        let store = Arc::new(RecordingStore::default());
        let (queue, handle) = start(store.clone(), 1024, Duration::from_secs(3600), 100);

        queue.enqueue(message("a")).unwrap();
        queue.enqueue(message("b")).unwrap();

        assert_eq!(handle.flush().await, Some(FlushOutcome::Flushed(2)));
        assert_eq!(handle.flush().await, Some(FlushOutcome::Empty));
        assert_eq!(store.attempts(), vec![batch(&["a", "b"])]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_pending_applies_back_pressure_without_loss() {
        let store = Arc::new(RecordingStore::failing(1));
        let (queue, handle) = start(store.clone(), 4, Duration::from_secs(3600), 2);

        for payload in ["a", "b", "c"] {
            queue.enqueue(message(payload)).unwrap();
        }

        assert_eq!(handle.flush().await, Some(FlushOutcome::Failed { pending: 2 }));
        assert_eq!(handle.flush().await, Some(FlushOutcome::Flushed(2)));
        assert_eq!(handle.flush().await, Some(FlushOutcome::Flushed(1)));

        assert_eq!(
            store.attempts(),
            vec![batch(&["a", "b"]), batch(&["a", "b"]), batch(&["c"])]
        );
        assert_eq!(store.saved(), batch(&["a", "b", "c"]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drains_queue() {
        let store = Arc::new(RecordingStore::default());
        let (queue, handle) = start(store.clone(), 1024, Duration::from_secs(3600), 100);

        for payload in ["a", "b", "c"] {
            queue.enqueue(message(payload)).unwrap();
        }

        assert_eq!(handle.shutdown().await.unwrap(), FlushOutcome::Flushed(3));
        assert_eq!(store.saved(), batch(&["a", "b", "c"]));
        assert_eq!(queue.enqueue(message("late")), Err(OutboxError::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_reports_unsaved_batch() {
        let store = Arc::new(RecordingStore::failing(1));
        let (queue, handle) = start(store.clone(), 1024, Duration::from_secs(3600), 100);

        queue.enqueue(message("a")).unwrap();

        assert_eq!(
            handle.shutdown().await.unwrap(),
            FlushOutcome::Failed { pending: 1 }
        );
        assert!(store.saved().is_empty());
    }
}
