use crate::domain::PriceDomain;
use crate::heikin_ashi::heikin_ashi;
use crate::mapper::{CoordinateMapper, SlotLayout};
use crate::scene::{CandleGeometry, Point, Primitive, Scene, VolumeBar, VolumeScene};
use candela_core::common::{ChartStyle, Viewport};
use candela_core::config::RenderConfig;
use candela_core::market::entity::Candle;
use std::borrow::Cow;

/// # Summary
/// 样式实际绘制的序列：平均 K 线为变换后的序列，其余样式直接借用原序列。
pub fn displayed_series(style: ChartStyle, candles: &[Candle]) -> Cow<'_, [Candle]> {
    match style {
        ChartStyle::HeikinAshi => Cow::Owned(heikin_ashi(candles)),
        ChartStyle::Line
        | ChartStyle::Area
        | ChartStyle::Bar
        | ChartStyle::Ohlc
        | ChartStyle::Candlestick => Cow::Borrowed(candles),
    }
}

/// # Summary
/// 计算某样式下应使用的值域。
///
/// # Logic
/// 平均 K 线的高低点可能越出原序列，因此基于变换后的序列计算；其余样式基于原序列。
///
/// # Returns
/// 无合法 K 线时返回 None。
pub fn domain_for(style: ChartStyle, candles: &[Candle]) -> Option<PriceDomain> {
    PriceDomain::from_candles(&displayed_series(style, candles))
}

/// # Summary
/// 渲染分发：由样式、序列与值域生成场景。
///
/// # Logic
/// 1. 取得样式对应的显示序列。
/// 2. 为每根合法 K 线计算几何，非法 K 线留空。
/// 3. 按样式穷举生成图元。
///
/// # Arguments
/// * `style`: 绘制样式。
/// * `candles`: 有序 K 线序列（只读，不会被复制保存）。
/// * `domain`: 价格值域，通常来自 `domain_for`。
/// * `viewport`: 绘图区尺寸。
/// * `config`: 几何参数。
///
/// # Returns
/// 完整的场景描述。
pub fn dispatch(
    style: ChartStyle,
    candles: &[Candle],
    domain: PriceDomain,
    viewport: Viewport,
    config: &RenderConfig,
) -> Scene {
    let series = displayed_series(style, candles);
    let mapper = CoordinateMapper::new(domain, viewport, series.len(), config);
    let geometry: Vec<CandleGeometry> = series
        .iter()
        .enumerate()
        .filter_map(|(i, c)| mapper.project(i, c))
        .collect();

    let primitives = match style {
        ChartStyle::Line => close_runs(&series, &mapper)
            .into_iter()
            .map(|points| Primitive::Polyline { points })
            .collect(),
        ChartStyle::Area => area_marks(&series, &mapper),
        ChartStyle::Bar => bar_marks(&series, &mapper),
        ChartStyle::Ohlc => ohlc_marks(&series, &mapper),
        ChartStyle::Candlestick | ChartStyle::HeikinAshi => candle_marks(&geometry),
    };

    Scene {
        style,
        domain,
        viewport,
        candles: geometry,
        primitives,
    }
}

/// # Summary
/// 一步完成值域计算与分发。
///
/// # Returns
/// 序列中没有合法 K 线时返回 None，调用方应渲染“无数据”状态。
pub fn render(
    style: ChartStyle,
    candles: &[Candle],
    viewport: Viewport,
    config: &RenderConfig,
) -> Option<Scene> {
    let domain = domain_for(style, candles)?;
    Some(dispatch(style, candles, domain, viewport, config))
}

// 以非法 K 线为断点，把收盘价切分为若干连续折线
fn close_runs(series: &[Candle], mapper: &CoordinateMapper) -> Vec<Vec<Point>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, candle) in series.iter().enumerate() {
        match mapper.price_to_y(candle.close).filter(|_| candle.is_valid()) {
            Some(y) => current.push(Point::new(mapper.slots().center_x(i), y)),
            None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn area_marks(series: &[Candle], mapper: &CoordinateMapper) -> Vec<Primitive> {
    let baseline = mapper.viewport().height;
    let mut marks = Vec::new();
    for run in close_runs(series, mapper) {
        if let (Some(first), Some(last)) = (run.first().copied(), run.last().copied()) {
            let mut outline = run.clone();
            outline.push(Point::new(last.x, baseline));
            outline.push(Point::new(first.x, baseline));
            marks.push(Primitive::Polygon { points: outline });
        }
        marks.push(Primitive::Polyline { points: run });
    }
    marks
}

fn bar_marks(series: &[Candle], mapper: &CoordinateMapper) -> Vec<Primitive> {
    let baseline = mapper.viewport().height;
    let slots = mapper.slots();
    series
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_valid())
        .filter_map(|(i, c)| {
            let y = mapper.price_to_y(c.close)?;
            Some(Primitive::Rect {
                x: slots.body_x(i),
                y,
                width: slots.body_width(),
                height: (baseline - y).max(0.0),
                bullish: c.is_bullish(),
            })
        })
        .collect()
}

fn ohlc_marks(series: &[Candle], mapper: &CoordinateMapper) -> Vec<Primitive> {
    let slots = mapper.slots();
    let mut marks = Vec::new();
    for (i, c) in series.iter().enumerate() {
        let Some(geo) = mapper.project(i, c) else {
            continue;
        };
        let (Some(open_y), Some(close_y)) = (mapper.price_to_y(c.open), mapper.price_to_y(c.close))
        else {
            continue;
        };
        let bullish = geo.is_bullish;
        let left = slots.body_x(i);
        let right = left + slots.body_width();
        marks.push(Primitive::Line {
            from: Point::new(geo.center_x, geo.high_y),
            to: Point::new(geo.center_x, geo.low_y),
            bullish,
        });
        marks.push(Primitive::Line {
            from: Point::new(left, open_y),
            to: Point::new(geo.center_x, open_y),
            bullish,
        });
        marks.push(Primitive::Line {
            from: Point::new(geo.center_x, close_y),
            to: Point::new(right, close_y),
            bullish,
        });
    }
    marks
}

fn candle_marks(geometry: &[CandleGeometry]) -> Vec<Primitive> {
    let mut marks = Vec::with_capacity(geometry.len() * 2);
    for geo in geometry {
        marks.push(Primitive::Line {
            from: Point::new(geo.center_x, geo.high_y),
            to: Point::new(geo.center_x, geo.low_y),
            bullish: geo.is_bullish,
        });
        marks.push(Primitive::Rect {
            x: geo.x,
            y: geo.body_top_y,
            width: geo.candle_width,
            height: geo.body_bottom_y - geo.body_top_y,
            bullish: geo.is_bullish,
        });
    }
    marks
}

/// # Summary
/// 生成成交量窗格场景。
///
/// # Logic
/// 1. 取已知成交量中的最大值作为满刻度。
/// 2. 与价格窗格共用横向槽位划分，未知成交量不出柱。
///
/// # Arguments
/// * `candles`: 有序 K 线序列。
/// * `viewport`: 成交量窗格尺寸。
/// * `config`: 提供实体宽度比例。
///
/// # Returns
/// 没有任何已知成交量时返回 None。
pub fn volume_bars(candles: &[Candle], viewport: Viewport, config: &RenderConfig) -> Option<VolumeScene> {
    let known = |c: &Candle| c.volume.filter(|v| v.is_finite() && *v >= 0.0);
    let max_volume = candles.iter().filter_map(known).reduce(f64::max)?;
    let slots = SlotLayout::new(viewport.width, candles.len(), config.body_width_ratio);

    let bars = candles
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            let volume = known(c)?;
            let height = if max_volume > 0.0 {
                volume / max_volume * viewport.height
            } else {
                0.0
            };
            Some(VolumeBar {
                index: i,
                x: slots.body_x(i),
                width: slots.body_width(),
                y: viewport.height - height,
                height,
                is_bullish: c.is_bullish(),
            })
        })
        .collect();

    Some(VolumeScene {
        viewport,
        max_volume,
        bars,
    })
}
