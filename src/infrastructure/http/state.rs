//! Application State
//!
//! 所有请求共享的只读状态

use std::sync::Arc;

use crate::application::{Clock, MessageStorePort, OutboxPort, UtteranceHandler};

/// 应用状态
pub struct AppState {
    pub utterance_handler: UtteranceHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        store: Arc<dyn MessageStorePort>,
        outbox: Arc<dyn OutboxPort>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            utterance_handler: UtteranceHandler::new(store, outbox, clock),
        }
    }
}
