//! Message Queue - Dispatcher 与 Worker 之间的有界队列
//!
//! 多生产者 / 单消费者，FIFO。生产者使用 try_send，队列满时立即失败而不阻塞请求。

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::application::ports::{OutboxError, OutboxPort};
use crate::domain::messaging::Message;

/// 队列发送端，可被任意多个请求共享
#[derive(Debug, Clone)]
pub struct MessageQueue {
    sender: mpsc::Sender<Message>,
}

/// 队列接收端，由 FlushWorker 独占
#[derive(Debug)]
pub struct MessageReceiver {
    receiver: mpsc::Receiver<Message>,
}

impl MessageQueue {
    /// 创建容量为 capacity 的队列
    ///
    /// capacity 必须大于 0
    pub fn bounded(capacity: usize) -> (Self, MessageReceiver) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, MessageReceiver { receiver })
    }
}

impl OutboxPort for MessageQueue {
    fn enqueue(&self, message: Message) -> Result<(), OutboxError> {
        self.sender.try_send(message).map_err(|e| match e {
            TrySendError::Full(_) => OutboxError::Full,
            TrySendError::Closed(_) => OutboxError::Closed,
        })
    }
}

impl MessageReceiver {
    /// 等待下一条消息；所有发送端关闭且队列为空时返回 None
    pub async fn recv(&mut self) -> Option<Message> {
        self.receiver.recv().await
    }

    /// 取出一条已在队列中的消息，不等待
    pub fn try_recv(&mut self) -> Option<Message> {
        self.receiver.try_recv().ok()
    }

    /// 停止接收新消息；已入队的消息仍可取出
    pub fn close(&mut self) {
        self.receiver.close();
    }
}
