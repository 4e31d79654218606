use approx::assert_relative_eq;
use candlestick_chart::core::{Candle, Viewport};
use candlestick_chart::render::{Color, FramePrimitive, NullRenderer, RenderFrame};
use candlestick_chart::{CandlestickChart, ChartConfig, ChartStyle};
use chrono::NaiveDate;

fn chart(width: u32, height: u32) -> CandlestickChart<NullRenderer> {
    let config = ChartConfig::new(Viewport::new(width, height));
    CandlestickChart::new(NullRenderer::default(), config).expect("chart init")
}

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, month, day).expect("valid date")
}

fn scenario_candles() -> Vec<Candle> {
    vec![
        Candle::new(date(6, 23), 100.0, 50.0, 200.0, 30.0).expect("day2"),
        Candle::new(date(6, 10), 100.0, 150.0, 188.0, 100.0).expect("day1"),
    ]
}

fn texts(frame: &RenderFrame) -> Vec<&str> {
    frame.texts.iter().map(|t| t.text.as_str()).collect()
}

#[test]
fn empty_chart_draws_only_axes() {
    let chart = chart(1000, 1000);
    let frame = chart.build_render_frame().expect("frame");

    assert_eq!(frame.lines.len(), 2);
    assert!(frame.rects.is_empty());
    assert!(frame.texts.is_empty());

    let y_axis = frame.lines[0];
    assert_relative_eq!(y_axis.x1, 60.0);
    assert_relative_eq!(y_axis.y1, 2.5);
    assert_relative_eq!(y_axis.x2, 60.0);
    assert_relative_eq!(y_axis.y2, 942.5);

    let x_axis = frame.lines[1];
    assert_relative_eq!(x_axis.y1, 940.0);
    assert_relative_eq!(x_axis.x1, 60.0);
    assert_relative_eq!(x_axis.x2, 1000.0 - 25.0);
}

#[test]
fn two_candle_scenario_colors_bodies_by_direction() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(scenario_candles());
    let frame = chart.build_render_frame().expect("frame");

    let style = ChartStyle::default();
    assert_eq!(frame.rects.len(), 2);
    assert_eq!(frame.rects[0].fill_color, style.up_color);
    assert_eq!(frame.rects[1].fill_color, style.down_color);
    for rect in &frame.rects {
        assert_eq!(rect.border_color, Color::BLACK);
        assert_relative_eq!(rect.border_width, 2.5);
    }

    let day1 = frame.rects[0];
    assert_relative_eq!(day1.x, 442.5 - 25.0 + 60.0);
    assert_relative_eq!(day1.width, 50.0);
    assert_relative_eq!(day1.y, 298.75 - 60.0);
    assert_relative_eq!(day1.height, 532.5 - 298.75);

    let day2 = frame.rects[1];
    assert_relative_eq!(day2.x - day1.x, 470.0);
}

#[test]
fn frame_contains_ticks_labels_and_wicks() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(scenario_candles());
    let frame = chart.build_render_frame().expect("frame");

    // 2 axes, 2 date ticks, 3 price ticks, 2 wicks
    assert_eq!(frame.lines.len(), 9);
    assert_eq!(
        texts(&frame),
        vec!["10.06", "23.06", "100", "200", "300"]
    );

    let wick = frame.lines[7];
    assert_relative_eq!(wick.x1, 442.5 + 60.0);
    assert_relative_eq!(wick.stroke_width, 4.0);
    assert_eq!(wick.color, Color::BLACK);
}

#[test]
fn price_labels_use_highest_stored_high_and_truncate() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(vec![
        Candle::new(date(1, 1), 10.0, 20.0, 100.0, 5.0).expect("c1"),
        Candle::new(date(1, 2), 10.0, 20.0, 50.0, 5.0).expect("c2"),
        Candle::new(date(1, 3), 10.0, 20.0, 40.0, 5.0).expect("c3"),
    ]);
    let frame = chart.build_render_frame().expect("frame");

    let price_labels: Vec<&str> = texts(&frame).into_iter().skip(3).collect();
    assert_eq!(price_labels, vec!["33", "66", "100", "133"]);
}

#[test]
fn zoom_multiplies_price_ticks_and_double_toggle_restores_them() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(scenario_candles());
    let baseline = chart.build_render_frame().expect("baseline");
    assert_eq!(chart.price_segment_count(), Some(2));

    chart.on_double_tap();
    let zoomed = chart.build_render_frame().expect("zoomed");
    assert_eq!(chart.price_segment_count(), Some(8));
    assert_eq!(zoomed.lines.len(), baseline.lines.len() + 6);
    assert_eq!(zoomed.texts.len(), baseline.texts.len() + 6);
    // candle geometry ignores zoom
    assert_eq!(zoomed.rects, baseline.rects);

    chart.on_double_tap();
    let restored = chart.build_render_frame().expect("restored");
    assert_eq!(restored, baseline);
}

#[test]
fn crosshair_is_drawn_only_after_a_drag() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(scenario_candles());
    let without = chart.build_render_frame().expect("frame");

    chart.on_drag_to(300.0, 5.0);
    let with = chart.build_render_frame().expect("frame");
    assert_eq!(with.lines.len(), without.lines.len() + 2);

    let vertical = with.lines[0];
    assert_relative_eq!(vertical.x1, 300.0);
    assert_relative_eq!(vertical.y1, 1000.0 - 60.0 - 2.5);
    assert_relative_eq!(vertical.y2, 5.0);
    let horizontal = with.lines[1];
    assert_relative_eq!(horizontal.x1, 60.0);
    assert_relative_eq!(horizontal.x2, 300.0);

    assert_eq!(with.texts[0].text, "200.00");
}

#[test]
fn zero_max_price_skips_candles_but_keeps_axes() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(vec![
        Candle::new(date(2, 1), 0.0, 0.0, 0.0, 0.0).expect("flat zero candle"),
    ]);
    let frame = chart.build_render_frame().expect("frame");
    assert_eq!(frame.lines.len(), 2);
    assert!(frame.rects.is_empty());
}

#[test]
fn candle_that_overflows_the_price_scale_is_skipped() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(vec![
        Candle::new(date(2, 1), 1e300, 1.0, 1e-10, 0.0).expect("open above high is accepted"),
    ]);
    chart.render().expect("render still succeeds");

    let frame = chart
        .renderer()
        .last_frame
        .as_ref()
        .expect("frame recorded");
    assert_eq!(frame.lines.len(), 2);
    assert!(frame.rects.is_empty());
    assert!(frame.texts.is_empty());
}

#[test]
fn candles_paint_over_ticks_and_labels_in_push_order() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(scenario_candles());
    chart.on_drag_to(500.0, 500.0);
    let frame = chart.build_render_frame().expect("frame");

    let order: Vec<&str> = frame
        .iter_in_draw_order()
        .map(|primitive| match primitive {
            FramePrimitive::Line(_) => "line",
            FramePrimitive::Rect(_) => "rect",
            FramePrimitive::Text(_) => "text",
        })
        .collect();
    assert_eq!(order.len(), frame.primitive_count());
    // crosshair lines and readout come first
    assert_eq!(order[..3], ["line", "line", "text"]);
    // each candle is a wick followed by its bordered body, painted last
    assert_eq!(order[order.len() - 4..], ["line", "rect", "line", "rect"]);
    let last_text = order
        .iter()
        .rposition(|kind| *kind == "text")
        .expect("labels present");
    let first_rect = order
        .iter()
        .position(|kind| *kind == "rect")
        .expect("bodies present");
    assert!(last_text < first_rect);
}

#[test]
fn view_narrower_than_offset_skips_candles() {
    let mut chart = chart(40, 400);
    chart.set_candles(scenario_candles());
    let frame = chart.build_render_frame().expect("frame");
    assert!(frame.rects.is_empty());
}

#[test]
fn flat_candle_renders_zero_height_body() {
    let mut chart = chart(800, 600);
    chart.set_candles(vec![
        Candle::new(date(2, 1), 50.0, 50.0, 60.0, 40.0).expect("flat"),
    ]);
    chart.render().expect("render");

    let renderer = chart.renderer();
    assert_eq!(renderer.last_rect_count, 1);
    let frame = renderer.last_frame.as_ref().expect("frame recorded");
    assert_relative_eq!(frame.rects[0].height, 0.0);
    assert_eq!(frame.rects[0].fill_color, ChartStyle::default().down_color);
}

#[test]
fn render_clears_redraw_request() {
    let mut chart = chart(800, 600);
    chart.set_candles(scenario_candles());
    assert!(chart.needs_redraw());

    chart.render().expect("render");
    assert!(!chart.needs_redraw());
    assert_eq!(chart.renderer().frames_rendered, 1);
}

#[test]
fn resize_changes_slot_geometry() {
    let mut chart = chart(1000, 1000);
    chart.set_candles(scenario_candles());
    chart.resize(Viewport::new(2000, 1000)).expect("resize");
    let frame = chart.build_render_frame().expect("frame");
    assert_relative_eq!(frame.rects[1].x - frame.rects[0].x, 970.0);

    assert!(chart.resize(Viewport::new(0, 10)).is_err());
}
