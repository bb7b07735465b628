//! 裁剪会话状态模块
//!
//! # 设计思路
//!
//! 会话只记录两样东西：当前结果（`current`）与历史列表（`history`，新的在前）。
//! 所有变更都通过 `SessionEvent` 进入 `apply`，状态转换集中在一处，便于测试。
//!
//! # 实现思路
//!
//! - 一次粘贴/一次多选文件 = 一个批次 = 一个 `BatchCompleted` 事件。
//! - 批次整体插到旧历史前面，批次内部保持原始选择顺序。
//! - `current` 取批次最后一个句柄；空批次不改变任何状态。
//! - 会话不持有图片数据，也不负责释放句柄。

use crate::cropper::ImageHandle;

/// 会话事件。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// 一批图片处理完成（已按原始顺序排列，失败项已剔除）。
    BatchCompleted(Vec<ImageHandle>),
    /// 清空历史与当前结果。
    Cleared,
}

/// 当前结果 + 历史列表。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CropSession {
    current: Option<ImageHandle>,
    history: Vec<ImageHandle>,
}

impl CropSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ImageHandle> {
        self.current
    }

    /// 历史列表，最新批次在前。
    pub fn history(&self) -> &[ImageHandle] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// 应用事件，返回状态是否发生变化。
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::BatchCompleted(batch) => {
                let Some(last) = batch.last().copied() else {
                    log::debug!("📭 空批次，会话保持不变");
                    return false;
                };

                let added = batch.len();
                let mut merged = batch;
                merged.append(&mut self.history);
                self.history = merged;
                self.current = Some(last);

                log::info!(
                    "🗂️ 会话已更新：新增 {} 张，历史共 {} 张",
                    added,
                    self.history.len()
                );
                true
            }
            SessionEvent::Cleared => {
                let changed = self.current.is_some() || !self.history.is_empty();
                self.current = None;
                self.history.clear();
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cropper::HandleStore;
    use bytes::Bytes;

    fn handles(store: &HandleStore, count: usize) -> Vec<ImageHandle> {
        (0..count)
            .map(|i| store.register(Bytes::from(vec![i as u8])))
            .collect()
    }

    #[test]
    fn batch_is_prepended_and_last_becomes_current() {
        let store = HandleStore::new();
        let older = handles(&store, 2);
        let newer = handles(&store, 3);

        let mut session = CropSession::new();
        assert!(session.apply(SessionEvent::BatchCompleted(older.clone())));
        assert!(session.apply(SessionEvent::BatchCompleted(newer.clone())));

        let expected: Vec<ImageHandle> = newer.iter().chain(older.iter()).copied().collect();
        assert_eq!(session.history(), expected.as_slice());
        assert_eq!(session.current(), Some(newer[2]));
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let store = HandleStore::new();
        let mut session = CropSession::new();
        session.apply(SessionEvent::BatchCompleted(handles(&store, 1)));
        let before = session.clone();

        assert!(!session.apply(SessionEvent::BatchCompleted(Vec::new())));
        assert_eq!(session, before);
    }

    #[test]
    fn clear_resets_but_keeps_blobs() {
        let store = HandleStore::new();
        let batch = handles(&store, 2);
        let mut session = CropSession::new();
        session.apply(SessionEvent::BatchCompleted(batch.clone()));

        assert!(session.apply(SessionEvent::Cleared));
        assert!(session.is_empty());
        assert_eq!(session.current(), None);
        assert!(store.get(&batch[0]).is_some());

        assert!(!session.apply(SessionEvent::Cleared));
    }
}
