use candela_core::common::time::{FakeClockProvider, TimeProvider};
use candela_core::common::{ChartStyle, Viewport};
use candela_core::market::entity::{Candle, NumericField, RawRecord, TimeField};

#[test]
fn test_raw_record_accepts_mixed_encodings() {
    let json = r#"{
        "open": "1.1000",
        "high": 1.1010,
        "low": " 1.0990 ",
        "close": "oops",
        "timestamp": "2024-01-01T00:00:00Z",
        "time": 1704067200000
    }"#;
    let record: RawRecord = serde_json::from_str(json).unwrap();

    assert_eq!(record.open, Some(NumericField::Text("1.1000".to_string())));
    assert_eq!(record.high, Some(NumericField::Number(1.1010)));
    assert_eq!(record.low.as_ref().map(NumericField::to_f64), Some(1.0990));
    assert!(record.close.as_ref().map(NumericField::to_f64).unwrap().is_nan());
    assert_eq!(record.volume, None);
    assert_eq!(record.time, Some(TimeField::Millis(1_704_067_200_000)));
    assert_eq!(
        record.timestamp,
        Some(TimeField::Text("2024-01-01T00:00:00Z".to_string()))
    );
}

#[test]
fn test_time_field_fractional() {
    let record: RawRecord = serde_json::from_str(r#"{ "time": 1704067200000.5 }"#).unwrap();
    assert_eq!(record.time, Some(TimeField::Fractional(1_704_067_200_000.5)));
}

#[test]
fn test_empty_object_is_all_missing() {
    let record: RawRecord = serde_json::from_str("{}").unwrap();
    assert_eq!(record, RawRecord::default());
}

#[test]
fn test_candle_validity_and_direction() {
    let bull = Candle::new(0, 1.0, 2.0, 0.5, 1.5, None);
    assert!(bull.is_valid());
    assert!(bull.is_bullish());
    assert_eq!(bull.body_top(), 1.5);
    assert_eq!(bull.body_bottom(), 1.0);

    let doji = Candle::new(0, 1.0, 1.0, 1.0, 1.0, Some(0.0));
    assert!(!doji.is_bullish());

    let broken = Candle::new(0, f64::NAN, 2.0, 0.5, 1.5, None);
    assert!(!broken.is_valid());

    let epoch = Candle::new(1_704_067_200_000, 1.0, 1.0, 1.0, 1.0, None);
    assert_eq!(
        epoch.datetime().map(|d| d.to_rfc3339()),
        Some("2024-01-01T00:00:00+00:00".to_string())
    );
}

#[test]
fn test_chart_style_parse_and_display() {
    for style in ChartStyle::ALL {
        assert_eq!(style.to_string().parse::<ChartStyle>(), Ok(style));
    }
    assert_eq!("HA".parse::<ChartStyle>(), Ok(ChartStyle::HeikinAshi));
    assert_eq!(" candle ".parse::<ChartStyle>(), Ok(ChartStyle::Candlestick));
    assert!("renko".parse::<ChartStyle>().is_err());
    assert_eq!(ChartStyle::default(), ChartStyle::Candlestick);
    assert_eq!(
        serde_json::to_string(&ChartStyle::HeikinAshi).unwrap(),
        "\"heikin-ashi\""
    );
}

#[test]
fn test_viewport_defaults() {
    assert_eq!(Viewport::default(), Viewport::PRICE_PANE);
    assert_eq!(Viewport::VOLUME_PANE.height, 200.0);
    assert!(Viewport::new(800.0, 400.0).is_drawable());
    assert!(!Viewport::new(0.0, 400.0).is_drawable());
    assert!(!Viewport::new(800.0, f64::NAN).is_drawable());
}

#[test]
fn test_fake_clock() {
    let clock = FakeClockProvider::new(1_000);
    clock.advance(500);
    assert_eq!(clock.now_ms(), 1_500);
    clock.set_time(10);
    assert_eq!(clock.now_ms(), 10);
}
