use std::path::{Path, PathBuf};

use candlestick_chart::core::{Candle, Viewport};
use candlestick_chart::render::CairoRenderer;
use candlestick_chart::{CandlestickChart, ChartConfig, ChartResult};
use chrono::NaiveDate;

const DEFAULT_OUTPUT_PATH: &str = "candlestick_demo.png";
const DEMO_WIDTH: u32 = 1080;
const DEMO_HEIGHT: u32 = 1200;

fn main() {
    let _ = candlestick_chart::telemetry::init_default_tracing();

    let output = match parse_args(std::env::args().skip(1)) {
        Ok(Some(path)) => path,
        Ok(None) => {
            println!("{}", usage_message());
            return;
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_message());
            std::process::exit(2);
        }
    };

    if let Err(err) = render_demo(&output) {
        eprintln!("failed to render demo chart: {err}");
        std::process::exit(1);
    }
    println!("wrote {}", output.display());
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<PathBuf>, String> {
    let mut output = PathBuf::from(DEFAULT_OUTPUT_PATH);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--output requires a path".to_owned())?;
                output = PathBuf::from(value);
            }
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(Some(output))
}

fn usage_message() -> String {
    format!(
        "Usage: cargo run --features cairo-backend --bin render_demo_chart_png -- [options]\n\nOptions:\n  --output <path>   PNG destination (default: {DEFAULT_OUTPUT_PATH})\n  -h, --help        Show this message"
    )
}

fn demo_candles() -> ChartResult<Vec<Candle>> {
    let date = |month, day| {
        NaiveDate::from_ymd_opt(2021, month, day).ok_or_else(|| {
            candlestick_chart::ChartError::InvalidData(format!("invalid demo date {month}/{day}"))
        })
    };
    Ok(vec![
        Candle::new(date(6, 10)?, 100.0, 150.0, 188.0, 100.0)?,
        Candle::new(date(6, 23)?, 100.0, 50.0, 200.0, 30.0)?,
        Candle::new(date(3, 5)?, 200.0, 5.0, 10.0, 0.0)?,
        Candle::new(date(8, 23)?, 133.0, 10.0, 220.0, 5.0)?,
    ])
}

fn render_demo(output: &Path) -> ChartResult<()> {
    let renderer = CairoRenderer::new(DEMO_WIDTH as i32, DEMO_HEIGHT as i32)?;
    let config = ChartConfig::new(Viewport::new(DEMO_WIDTH, DEMO_HEIGHT));
    let mut chart = CandlestickChart::new(renderer, config)?;
    chart.set_candles(demo_candles()?);
    chart.on_drag_to(540.0, 600.0);
    chart.render()?;
    chart.into_renderer().write_png(output)
}
