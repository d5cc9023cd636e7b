use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// # Summary
/// 时间供给器接口，用于隔离物理系统时钟。
/// 合并引擎从不自行读取时钟，调用方必须通过此接口获取 `now` 后传入。
pub trait TimeProvider: Send + Sync {
    /// 获取当前时间（UTC 毫秒）
    fn now_ms(&self) -> i64;
}

/// # Summary
/// 实盘运行的真实时钟，直接返回操作系统当前时间。
pub struct RealTimeProvider;

impl TimeProvider for RealTimeProvider {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// # Summary
/// 测试专用虚拟时钟，允许主动拨快或回退时间。
///
/// # Invariants
/// - 并发安全：内部使用原子整数存储毫秒时间戳。
pub struct FakeClockProvider {
    current_ms: AtomicI64,
}

impl FakeClockProvider {
    /// 使用指定的初始时间创建虚拟时钟
    pub fn new(initial_ms: i64) -> Self {
        Self {
            current_ms: AtomicI64::new(initial_ms),
        }
    }

    /// 强制修改时钟的当前时间
    pub fn set_time(&self, new_ms: i64) {
        self.current_ms.store(new_ms, Ordering::SeqCst);
    }

    /// 将时钟向前拨动指定毫秒数
    pub fn advance(&self, delta_ms: i64) {
        self.current_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl TimeProvider for FakeClockProvider {
    fn now_ms(&self) -> i64 {
        self.current_ms.load(Ordering::SeqCst)
    }
}
