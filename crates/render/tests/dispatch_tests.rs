use approx::assert_relative_eq;
use candela_core::common::{ChartStyle, Viewport};
use candela_core::config::RenderConfig;
use candela_core::market::entity::Candle;
use candela_render::dispatch::{dispatch, domain_for, render, volume_bars};
use candela_render::domain::PriceDomain;
use candela_render::heikin_ashi::heikin_ashi;
use candela_render::scene::{Point, Primitive, Scene};

fn sample() -> Vec<Candle> {
    vec![
        Candle::new(0, 10.0, 12.0, 9.0, 11.0, Some(100.0)),
        Candle::new(1, 11.0, 13.0, 10.0, 12.5, Some(250.0)),
        Candle::new(2, 12.5, 12.8, 10.5, 11.0, None),
        Candle::new(3, 11.0, 11.5, 9.5, 10.0, Some(50.0)),
    ]
}

fn scene(style: ChartStyle, candles: &[Candle]) -> Scene {
    render(style, candles, Viewport::PRICE_PANE, &RenderConfig::default()).unwrap()
}

fn points_of(primitive: &Primitive) -> Vec<Point> {
    match primitive {
        Primitive::Line { from, to, .. } => vec![*from, *to],
        Primitive::Rect { x, y, width, height, .. } => {
            vec![Point::new(*x, *y), Point::new(x + width, y + height)]
        }
        Primitive::Polyline { points } | Primitive::Polygon { points } => points.clone(),
    }
}

#[test]
fn test_every_style_produces_finite_geometry() {
    let mut candles = sample();
    candles.insert(2, Candle::new(2, 12.0, f64::NAN, 11.0, 12.0, None));

    for style in ChartStyle::ALL {
        let scene = scene(style, &candles);
        assert_eq!(scene.style, style);
        assert_eq!(scene.candles.len(), 4, "{style}: invalid candle must be skipped");
        assert!(!scene.primitives.is_empty());
        for primitive in &scene.primitives {
            for p in points_of(primitive) {
                assert!(p.x.is_finite() && p.y.is_finite(), "{style}: NaN coordinate");
            }
        }
    }
}

#[test]
fn test_candlestick_primitives() {
    let scene = scene(ChartStyle::Candlestick, &sample());
    assert_eq!(scene.primitives.len(), 8);

    let geo = scene.candles[1];
    match (&scene.primitives[2], &scene.primitives[3]) {
        (Primitive::Line { from, to, bullish }, Primitive::Rect { x, y, width, height, .. }) => {
            assert_relative_eq!(from.x, geo.center_x);
            assert_relative_eq!(from.y, geo.high_y);
            assert_relative_eq!(to.y, geo.low_y);
            assert!(*bullish);
            assert_relative_eq!(*x, geo.x);
            assert_relative_eq!(*y, geo.body_top_y);
            assert_relative_eq!(*width, geo.candle_width);
            assert_relative_eq!(*height, geo.body_bottom_y - geo.body_top_y);
        }
        other => panic!("unexpected primitives: {other:?}"),
    }
}

#[test]
fn test_line_breaks_at_invalid_candle() {
    let mut candles = sample();
    candles[2].close = f64::NAN;

    let scene = scene(ChartStyle::Line, &candles);
    let runs: Vec<usize> = scene
        .primitives
        .iter()
        .map(|p| match p {
            Primitive::Polyline { points } => points.len(),
            other => panic!("line style produced {other:?}"),
        })
        .collect();
    assert_eq!(runs, vec![2, 1]);
}

#[test]
fn test_area_closes_to_baseline() {
    let scene = scene(ChartStyle::Area, &sample());
    assert_eq!(scene.primitives.len(), 2);
    let Primitive::Polygon { points } = &scene.primitives[0] else {
        panic!("area must start with a fill polygon");
    };
    assert_eq!(points.len(), 6);
    assert_relative_eq!(points[4].y, 400.0);
    assert_relative_eq!(points[5].y, 400.0);
    assert_relative_eq!(points[5].x, points[0].x);
}

#[test]
fn test_bar_columns_reach_baseline() {
    let scene = scene(ChartStyle::Bar, &sample());
    assert_eq!(scene.primitives.len(), 4);
    for primitive in &scene.primitives {
        let Primitive::Rect { y, height, .. } = primitive else {
            panic!("bar style must produce rects");
        };
        assert_relative_eq!(y + height, 400.0, epsilon = 1e-9);
    }
}

#[test]
fn test_ohlc_ticks() {
    let candles = sample();
    let scene = scene(ChartStyle::Ohlc, &candles);
    assert_eq!(scene.primitives.len(), 12);

    let geo = scene.candles[0];
    let Primitive::Line { from, to, .. } = &scene.primitives[1] else {
        panic!("open tick must be a line");
    };
    assert_relative_eq!(from.x, geo.x);
    assert_relative_eq!(to.x, geo.center_x);
    assert_relative_eq!(from.y, to.y);
    let Primitive::Line { from, to, .. } = &scene.primitives[2] else {
        panic!("close tick must be a line");
    };
    assert_relative_eq!(from.x, geo.center_x);
    assert_relative_eq!(to.x, geo.x + geo.candle_width);
}

#[test]
fn test_heikin_ashi_transform() {
    let ha = heikin_ashi(&sample());
    assert_eq!(ha.len(), 4);

    assert_relative_eq!(ha[0].open, 10.5);
    assert_relative_eq!(ha[0].close, 10.5);
    assert_relative_eq!(ha[0].high, 12.0);
    assert_relative_eq!(ha[0].low, 9.0);

    assert_relative_eq!(ha[1].open, 10.5);
    assert_relative_eq!(ha[1].close, 11.625);
    assert_relative_eq!(ha[1].high, 13.0);
    assert_relative_eq!(ha[1].low, 10.0);
    assert_eq!(ha[1].time, 1);
    assert_eq!(ha[1].volume, Some(250.0));
}

#[test]
fn test_heikin_ashi_skips_invalid_links() {
    let mut candles = sample();
    candles[1].open = f64::NAN;

    let ha = heikin_ashi(&candles);
    assert!(ha[1].open.is_nan());
    let expected_open = (ha[0].open + ha[0].close) / 2.0;
    assert_relative_eq!(ha[2].open, expected_open);
}

#[test]
fn test_heikin_ashi_uses_transformed_domain() {
    let candles = sample();
    let ha_domain = domain_for(ChartStyle::HeikinAshi, &candles).unwrap();
    let expected = PriceDomain::from_candles(&heikin_ashi(&candles)).unwrap();
    assert_eq!(ha_domain, expected);

    let scene = scene(ChartStyle::HeikinAshi, &candles);
    assert_eq!(scene.domain, expected);
}

#[test]
fn test_dispatch_uses_given_domain() {
    let domain = PriceDomain { min: 0.0, max: 100.0 };
    let scene = dispatch(
        ChartStyle::Candlestick,
        &sample(),
        domain,
        Viewport::PRICE_PANE,
        &RenderConfig::default(),
    );
    assert_eq!(scene.domain, domain);
    assert_relative_eq!(scene.candles[0].high_y, 352.0, epsilon = 1e-9);
}

#[test]
fn test_empty_series_has_no_scene() {
    assert!(render(ChartStyle::Line, &[], Viewport::PRICE_PANE, &RenderConfig::default()).is_none());
}

#[test]
fn test_volume_pane() {
    let candles = sample();
    let pane = volume_bars(&candles, Viewport::VOLUME_PANE, &RenderConfig::default()).unwrap();
    assert_relative_eq!(pane.max_volume, 250.0);
    assert_eq!(pane.bars.len(), 3, "unknown volume produces no bar");

    let tallest = pane.bars[1];
    assert_eq!(tallest.index, 1);
    assert_relative_eq!(tallest.height, 200.0);
    assert_relative_eq!(tallest.y, 0.0);
    assert_relative_eq!(pane.bars[0].height, 80.0);
    assert_eq!(pane.bars[2].index, 3);

    let unknown: Vec<Candle> = candles.iter().map(|c| Candle { volume: None, ..*c }).collect();
    assert!(volume_bars(&unknown, Viewport::VOLUME_PANE, &RenderConfig::default()).is_none());
}

#[test]
fn test_scene_serializes_for_renderer() {
    let scene = scene(ChartStyle::Candlestick, &sample());
    let json = serde_json::to_value(&scene).unwrap();
    assert_eq!(json["style"], "candlestick");
    assert_eq!(json["primitives"][1]["kind"], "rect");
    assert!(json["candles"][0]["body_top_y"].is_number());
    assert!(json["domain"]["min"].is_number());
}
