use candela_core::market::entity::Candle;
use std::sync::Arc;
use tracing::trace;

/// 默认保留的 K 线数量
pub const DEFAULT_CAPACITY: usize = 100;

/// # Summary
/// 固定容量、按时间升序的 K 线序列快照。
///
/// # Invariants
/// - 内部切片创建后不可变，克隆只增加引用计数，渲染方拿到的快照不会被后续合并改写。
/// - 始终按 `time` 升序排列，长度不超过 `capacity`，超出时保留最近的 N 根。
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    // 共享的只读存储
    candles: Arc<[Candle]>,
    // 最大容量
    capacity: usize,
}

impl SeriesBuffer {
    /// # Summary
    /// 创建一个空缓冲区。
    ///
    /// # Arguments
    /// * `capacity`: 固定容量上限。
    ///
    /// # Returns
    /// 空的 SeriesBuffer 实例。
    pub fn new(capacity: usize) -> Self {
        Self {
            candles: Arc::from(Vec::new()),
            capacity,
        }
    }

    /// # Summary
    /// 由任意顺序的 K 线构建缓冲区。
    ///
    /// # Logic
    /// 1. 按 `time` 稳定排序，相同时间的 K 线保持输入顺序。
    /// 2. 若超出容量，丢弃最早的部分。
    ///
    /// # Arguments
    /// * `candles`: 待收纳的 K 线。
    /// * `capacity`: 固定容量上限。
    ///
    /// # Returns
    /// 满足排序与容量约束的缓冲区。
    pub fn from_unsorted(mut candles: Vec<Candle>, capacity: usize) -> Self {
        candles.sort_by_key(|c| c.time);
        if candles.len() > capacity {
            let overflow = candles.len() - capacity;
            trace!(overflow, capacity, "truncating oldest candles");
            candles.drain(..overflow);
        }
        Self {
            candles: Arc::from(candles),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// 只读视图。
    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    /// 获取最新（时间最大）的一根。
    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    /// 复制出可变的 K 线列表。
    pub fn to_vec(&self) -> Vec<Candle> {
        self.candles.to_vec()
    }

    /// 两个缓冲区是否共享同一块存储（即同一快照）。
    pub fn same_snapshot(&self, other: &SeriesBuffer) -> bool {
        Arc::ptr_eq(&self.candles, &other.candles)
    }
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl PartialEq for SeriesBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.capacity == other.capacity && self.candles == other.candles
    }
}

impl<'a> IntoIterator for &'a SeriesBuffer {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
