use candela_core::common::{ChartStyle, Viewport};
use candela_core::common::time::{FakeClockProvider, TimeProvider};
use candela_core::config::{MergeConfig, RenderConfig};
use candela_core::market::entity::RawRecord;
use candela_render::chart::ChartEngine;
use candela_render::domain::padding_for;
use candela_series::merge::MergeMode;
use serde_json::json;

const HOUR: i64 = 3_600_000;

fn engine() -> ChartEngine {
    ChartEngine::new(MergeConfig::default(), RenderConfig::default())
}

fn trending(count: u32) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            let base = 1.1 + 0.0001 * f64::from(i);
            RawRecord::ohlc(base, base + 0.0003, base - 0.0002, base + 0.0001)
                .with_time(i64::from(i) * HOUR)
                .with_volume(100.0 + f64::from(i))
        })
        .collect()
}

#[test]
fn test_empty_engine_reports_no_data() {
    let engine = engine();
    assert!(engine.domain().is_none());
    assert!(engine.scene().is_none());
    assert!(engine.volume_scene().is_none());
    assert!(engine.hover(100.0).is_none());
}

/// # Summary
/// 通过虚拟时钟驱动两次交付，第二次在实时窗口内走增量路径。
#[test]
fn test_live_updates_through_clock() {
    let clock = FakeClockProvider::new(1_700_000_000_000);
    let mut engine = engine();
    let records = trending(3);

    assert_eq!(engine.apply(&records[..2], clock.now_ms()), MergeMode::FullReplace);
    clock.advance(1_000);
    assert_eq!(engine.apply(&records, clock.now_ms()), MergeMode::Incremental);
    assert_eq!(engine.snapshot().len(), 3);
    assert_eq!(engine.last_update_at(), Some(clock.now_ms()));

    clock.advance(5_000);
    assert_eq!(engine.apply(&records[..1], clock.now_ms()), MergeMode::FullReplace);
    assert_eq!(engine.snapshot().len(), 1);
}

/// # Summary
/// 轮询源持续增长超过容量时，引擎中的序列保持最近 100 根且时间唯一。
#[test]
fn test_growing_source_past_capacity_keeps_unique_candles() {
    let clock = FakeClockProvider::new(1_700_000_000_000);
    let mut engine = engine();
    let records = trending(130);

    for k in 95..=records.len() {
        engine.apply(&records[..k], clock.now_ms());
        clock.advance(200);
    }

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.len(), 100);
    let times: Vec<i64> = snapshot.iter().map(|c| c.time).collect();
    let expected: Vec<i64> = (30..130).map(|i| i * HOUR).collect();
    assert_eq!(times, expected);
}

#[test]
fn test_style_switch_does_not_touch_series() {
    let mut engine = engine();
    engine.apply(&trending(20), 0);
    let before = engine.snapshot();

    for style in ChartStyle::ALL {
        engine.set_style(style);
        let scene = engine.scene().unwrap();
        assert_eq!(scene.style, style);
        assert_eq!(scene.candles.len(), 20);
        assert!(engine.snapshot().same_snapshot(&before));
    }
}

#[test]
fn test_hover_agrees_with_drawn_geometry() {
    let mut engine = engine();
    engine.apply(&trending(30), 0);
    engine.set_viewport(Viewport::new(640.0, 300.0));

    let scene = engine.scene().unwrap();
    for geo in &scene.candles {
        let (index, candle) = engine.hover(geo.center_x).unwrap();
        assert_eq!(index, geo.index);
        assert_eq!(candle.time, geo.time);
    }
    assert_eq!(engine.hover(-5.0).map(|(i, _)| i), Some(0));
    assert_eq!(engine.hover(5_000.0).map(|(i, _)| i), Some(29));
}

#[test]
fn test_hover_returns_raw_candle_for_heikin_ashi() {
    let mut engine = engine();
    let records = trending(5);
    engine.apply(&records, 0);
    engine.set_style(ChartStyle::HeikinAshi);

    let (_, candle) = engine.hover(799.0).unwrap();
    assert_eq!(candle, *engine.snapshot().last().unwrap());
}

#[test]
fn test_apply_payload_skips_malformed_records() {
    let mut engine = engine();
    let payload = json!([
        { "open": "1.1000", "high": "1.1010", "low": "1.0990", "close": "1.1005", "time": 0 },
        "garbage",
        { "open": 1.1005, "high": 1.1020, "low": 1.1000, "close": "abc", "time": 3600000 }
    ]);

    assert_eq!(engine.apply_payload(&payload, 0), MergeMode::FullReplace);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(!snapshot.as_slice()[1].is_valid());

    let domain = engine.domain().unwrap();
    let padding = padding_for(1.1010 - 1.0990);
    assert_eq!(domain.min, 1.0990 - padding);
    assert_eq!(domain.max, 1.1010 + padding);
    assert_eq!(engine.scene().unwrap().candles.len(), 1);
}

#[test]
fn test_volume_scene_uses_volume_viewport() {
    let mut engine = engine();
    engine.apply(&trending(10), 0);
    engine.set_volume_viewport(Viewport::new(400.0, 100.0));

    let pane = engine.volume_scene().unwrap();
    assert_eq!(pane.viewport, Viewport::new(400.0, 100.0));
    assert_eq!(pane.bars.len(), 10);
    assert_eq!(pane.bars[9].height, 100.0);
}

#[test]
fn test_undrawable_viewport_has_no_scene() {
    let mut engine = engine();
    engine.apply(&trending(3), 0);
    engine.set_viewport(Viewport::new(0.0, 400.0));
    assert!(engine.scene().is_none());
}
