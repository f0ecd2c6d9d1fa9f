use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::Shift;
use plotters::prelude::*;
use crate::analysis::baseline::BaselineReport;
use crate::analysis::dashboard::DashboardSeries;
use crate::analysis::error::AnalysisError;
use crate::analysis::timefmt;
use crate::analysis::trainer::TrainingHistory;
use crate::types::{AlarmLabel, SensorReading};
type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
const MQ7_RED: RGBColor = RGBColor(214, 39, 40);
const PM_BLUE: RGBColor = RGBColor(31, 119, 180);
const MQ_B_ORANGE: RGBColor = RGBColor(255, 127, 14);
const GAS_GREEN: RGBColor = RGBColor(0, 128, 0);
/// Rendering configuration handed to every chart routine.
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub foreground: RGBColor,
    /// Must cover CJK glyphs when labels are localized.
    pub font_family: String,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1000,
            background: WHITE,
            foreground: BLACK,
            font_family: "sans-serif".to_string(),
        }
    }
}
impl PlotStyle {
    /// Default style with a font family the host OS is known to ship.
    pub fn for_host() -> Self {
        Self {
            font_family: host_font_family().to_string(),
            ..Self::default()
        }
    }
    /// Same style, different canvas.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
    fn text(&self, size: u32) -> TextStyle<'_> {
        (self.font_family.as_str(), size)
            .into_font()
            .color(&self.foreground)
    }
}
pub fn host_font_family() -> &'static str {
    if cfg!(target_os = "windows") {
        "Microsoft YaHei"
    } else if cfg!(target_os = "macos") {
        "Arial Unicode MS"
    } else {
        "sans-serif"
    }
}
/// `(min, max)` of `values`, padded 5%; flat or empty input gets a unit band.
pub fn value_range(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}
/// Equal-width bins over the data range as `(left, right, count)`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (lo + i as f64 * width, lo + (i + 1) as f64 * width, c))
        .collect()
}
/// Legend swatch: a short horizontal stroke.
fn legend_line(line: ShapeStyle, len: i32) -> impl Fn((i32, i32)) -> PathElement<(i32, i32)> {
    move |(x, y)| PathElement::new(vec![(x, y), (x + len, y)], line)
}
fn render_png<F>(style: &PlotStyle, draw: F) -> Result<Vec<u8>, AnalysisError>
where
    F: for<'a, 'b> FnOnce(&'a Area<'b>) -> Result<(), AnalysisError>,
{
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        draw(&root)?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Four panels: waveform with baseline and histogram for MQ-3 and MQ-135.
pub fn render_baseline_png(
    report: &BaselineReport,
    bins: usize,
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    if report.mq3.is_empty() {
        return Err(AnalysisError::Plot("baseline report has no samples".into()));
    }
    render_png(style, |root| {
        let panels = root.split_evenly((2, 2));
        let (mq3, mq135) = (&report.mq3, &report.mq135);
        draw_waveform(&panels[0], "MQ-3 Raw Waveform", mq3, report.mq3_baseline, PM_BLUE, style)?;
        let title = "MQ-3 Distribution (Tallest Bar = Baseline)";
        draw_histogram(&panels[1], title, mq3, bins, PM_BLUE, style)?;
        let title = "MQ-135 Raw Waveform";
        draw_waveform(&panels[2], title, mq135, report.mq135_baseline, GAS_GREEN, style)?;
        draw_histogram(&panels[3], "MQ-135 Distribution", mq135, bins, GAS_GREEN, style)?;
        Ok(())
    })
}
fn draw_waveform(
    area: &Area<'_>,
    title: &str,
    values: &[f64],
    baseline: f64,
    color: RGBColor,
    style: &PlotStyle,
) -> Result<(), AnalysisError> {
    let x_max = values.len().max(2) as f64 - 1.0;
    let (y_lo, y_hi) = value_range(values.iter().copied().chain(std::iter::once(baseline)));
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(title, style.text(18))
        .set_label_area_size(LabelAreaPosition::Left, 55)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .build_cartesian_2d(0f64..x_max, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .light_line_style(&style.foreground.mix(0.05))
        .label_style(style.text(12))
        .draw()?;
    chart.draw_series(LineSeries::new(
        values.iter().enumerate().map(|(i, v)| (i as f64, *v)),
        color.mix(0.6).stroke_width(1),
    ))?;
    let dash = RED.stroke_width(2);
    chart
        .draw_series(DashedLineSeries::new(
            vec![(0.0, baseline), (x_max, baseline)],
            10,
            6,
            dash,
        ))?
        .label(format!("Baseline: {baseline:.0}"))
        .legend(legend_line(dash, 20));
    chart
        .configure_series_labels()
        .label_font(style.text(12))
        .border_style(&style.foreground.mix(0.3))
        .background_style(&style.background.mix(0.8))
        .draw()?;
    Ok(())
}
fn draw_histogram(
    area: &Area<'_>,
    title: &str,
    values: &[f64],
    bins: usize,
    color: RGBColor,
    style: &PlotStyle,
) -> Result<(), AnalysisError> {
    let bars = histogram(values, bins);
    let x_lo = bars.first().map(|b| b.0).unwrap_or(0.0);
    let x_hi = bars.last().map(|b| b.1).unwrap_or(1.0);
    let y_hi = bars.iter().map(|b| b.2).max().unwrap_or(0) as f64 * 1.05 + 1.0;
    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .caption(title, style.text(18))
        .set_label_area_size(LabelAreaPosition::Left, 55)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;
    chart
        .configure_mesh()
        .light_line_style(&style.foreground.mix(0.05))
        .label_style(style.text(12))
        .x_desc("ADC Value")
        .axis_desc_style(style.text(14))
        .draw()?;
    chart.draw_series(bars.iter().map(|&(lo, hi, count)| {
        Rectangle::new([(lo, 0.0), (hi, count as f64)], color.mix(0.7).filled())
    }))?;
    Ok(())
}
/// Two panels sharing the time axis: MQ-7 with alarms and peak, then PM2.5.
pub fn render_verification_png(
    readings: &[SensorReading],
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    let first = readings
        .first()
        .ok_or_else(|| AnalysisError::Plot("no readings to plot".into()))?;
    let origin = first.time.date();
    let xs: Vec<f64> = readings
        .iter()
        .map(|r| timefmt::seconds_since_midnight(origin, r.time))
        .collect();
    let (x_lo, x_hi) = value_range(xs.iter().copied());
    let peak = crate::analysis::relabel::peak_index(readings).unwrap_or(0);
    let peak_x = xs[peak];
    let peak_y = readings[peak].mq7;
    let annotate_y = peak_y + 500.0;
    let axis_time = |x: &f64| timefmt::format_axis_time(*x);
    render_png(style, |root| {
        let panels = root.split_evenly((2, 1));
        let (y_lo, y_hi) = value_range(
            readings
                .iter()
                .map(|r| r.mq7)
                .chain(std::iter::once(annotate_y + 100.0)),
        );
        let mut chart = ChartBuilder::on(&panels[0])
            .margin(10)
            .caption("MQ-7 Sensor (primary alarm source)", style.text(22))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 35)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
        chart
            .configure_mesh()
            .light_line_style(&style.foreground.mix(0.05))
            .label_style(style.text(12))
            .x_label_formatter(&axis_time)
            .y_desc("Reading")
            .axis_desc_style(style.text(14))
            .draw()?;
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(readings.iter().map(|r| r.mq7)),
                MQ7_RED.stroke_width(2),
            ))?
            .label("MQ-7 (CO / smoke)")
            .legend(legend_line(MQ7_RED.stroke_width(2), 20));
        let alarms: Vec<(f64, f64)> = xs
            .iter()
            .zip(readings)
            .filter(|(_, r)| r.label == AlarmLabel::Alarm)
            .map(|(&x, r)| (x, r.mq7))
            .collect();
        if !alarms.is_empty() {
            chart
                .draw_series(alarms.iter().map(|&p| Circle::new(p, 3, RED.filled())))?
                .label("Alarm")
                .legend(|(x, y)| Circle::new((x + 10, y), 3, RED.filled()));
        }
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(peak_x, annotate_y), (peak_x, peak_y)],
            BLACK.stroke_width(2),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("Peak: {peak_y}"),
            (peak_x, annotate_y),
            style.text(14),
        )))?;
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(style.text(12))
            .border_style(&style.foreground.mix(0.3))
            .background_style(&style.background.mix(0.8))
            .draw()?;
        let (p_lo, p_hi) = value_range(readings.iter().map(|r| r.pm25));
        let mut chart = ChartBuilder::on(&panels[1])
            .margin(10)
            .caption("PM2.5 Trend", style.text(22))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x_lo..x_hi, p_lo..p_hi)?;
        chart
            .configure_mesh()
            .light_line_style(&style.foreground.mix(0.05))
            .label_style(style.text(12))
            .x_label_formatter(&axis_time)
            .y_desc("Concentration")
            .axis_desc_style(style.text(14))
            .draw()?;
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(readings.iter().map(|r| r.pm25)),
                PM_BLUE.stroke_width(2),
            ))?
            .label("PM2.5")
            .legend(legend_line(PM_BLUE.stroke_width(2), 20));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(style.text(12))
            .border_style(&style.foreground.mix(0.3))
            .background_style(&style.background.mix(0.8))
            .draw()?;
        Ok(())
    })
}
/// Three stacked panels: PM2.5 with alarms, both gas channels, and
/// temperature/humidity on twin y axes.
pub fn render_dashboard_png(
    series: &DashboardSeries,
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    let first = series
        .time
        .first()
        .ok_or_else(|| AnalysisError::Plot("dashboard has no rows".into()))?;
    let origin = first.date();
    let xs: Vec<f64> = series
        .time
        .iter()
        .map(|t| timefmt::seconds_since_midnight(origin, *t))
        .collect();
    let (x_lo, x_hi) = value_range(xs.iter().copied());
    let axis_time = |x: &f64| timefmt::format_axis_time(*x);
    let temp_color = RGBColor(214, 39, 40);
    let hum_color = RGBColor(31, 119, 180);
    render_png(style, |root| {
        let panels = root.split_evenly((3, 1));
        let (y_lo, y_hi) = value_range(series.pm25.iter().copied());
        let mut chart = ChartBuilder::on(&panels[0])
            .margin(10)
            .caption("PM2.5 Concentration and Alarm Detection", style.text(20))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 30)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
        chart
            .configure_mesh()
            .light_line_style(&style.foreground.mix(0.05))
            .label_style(style.text(12))
            .x_label_formatter(&axis_time)
            .y_desc("PM2.5")
            .axis_desc_style(style.text(14))
            .draw()?;
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(series.pm25.iter().copied()),
                PM_BLUE.stroke_width(2),
            ))?
            .label("PM2.5 concentration")
            .legend(legend_line(PM_BLUE.stroke_width(2), 20));
        let alarms = series.alarm_indices();
        if !alarms.is_empty() {
            chart
                .draw_series(
                    alarms
                        .iter()
                        .map(|&i| Circle::new((xs[i], series.pm25[i]), 4, RED.filled())),
                )?
                .label("Smoke alarm")
                .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));
        }
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(style.text(12))
            .border_style(&style.foreground.mix(0.3))
            .background_style(&style.background.mix(0.8))
            .draw()?;
        let (g_lo, g_hi) = value_range(series.mq_a.iter().chain(series.mq_b.iter()).copied());
        let mut chart = ChartBuilder::on(&panels[1])
            .margin(10)
            .caption("Gas Sensor Trends", style.text(20))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 30)
            .build_cartesian_2d(x_lo..x_hi, g_lo..g_hi)?;
        chart
            .configure_mesh()
            .light_line_style(&style.foreground.mix(0.05))
            .label_style(style.text(12))
            .x_label_formatter(&axis_time)
            .y_desc("Sensor reading")
            .axis_desc_style(style.text(14))
            .draw()?;
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(series.mq_a.iter().copied()),
                GAS_GREEN.mix(0.8).stroke_width(2),
            ))?
            .label("MQ_A (e.g. MQ-7)")
            .legend(legend_line(GAS_GREEN.stroke_width(2), 20));
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(series.mq_b.iter().copied()),
                MQ_B_ORANGE.mix(0.8).stroke_width(2),
            ))?
            .label("MQ_B (e.g. MQ-135)")
            .legend(legend_line(MQ_B_ORANGE.stroke_width(2), 20));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(style.text(12))
            .border_style(&style.foreground.mix(0.3))
            .background_style(&style.background.mix(0.8))
            .draw()?;
        let (t_lo, t_hi) = value_range(series.temp.iter().copied());
        let (h_lo, h_hi) = value_range(series.hum.iter().copied());
        let mut chart = ChartBuilder::on(&panels[2])
            .margin(10)
            .caption("Temperature and Humidity", style.text(20))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Right, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 45)
            .build_cartesian_2d(x_lo..x_hi, t_lo..t_hi)?
            .set_secondary_coord(x_lo..x_hi, h_lo..h_hi);
        chart
            .configure_mesh()
            .light_line_style(&style.foreground.mix(0.05))
            .label_style(style.text(12))
            .x_label_formatter(&axis_time)
            .x_desc("Time")
            .y_desc("Temperature (°C)")
            .axis_desc_style(style.text(14).color(&temp_color))
            .draw()?;
        chart
            .configure_secondary_axes()
            .label_style(style.text(12).color(&hum_color))
            .y_desc("Humidity (%)")
            .axis_desc_style(style.text(14).color(&hum_color))
            .draw()?;
        chart
            .draw_series(LineSeries::new(
                xs.iter().copied().zip(series.temp.iter().copied()),
                temp_color.stroke_width(2),
            ))?
            .label("Temperature")
            .legend(legend_line(temp_color.stroke_width(2), 20));
        chart
            .draw_secondary_series(DashedLineSeries::new(
                xs.iter().copied().zip(series.hum.iter().copied()),
                8,
                5,
                hum_color.stroke_width(2),
            ))?
            .label("Humidity")
            .legend(legend_line(hum_color.stroke_width(2), 8));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(style.text(12))
            .border_style(&style.foreground.mix(0.3))
            .background_style(&style.background.mix(0.8))
            .draw()?;
        Ok(())
    })
}
/// Train and test accuracy against the number of trees.
pub fn render_training_png(
    history: &TrainingHistory,
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    if history.is_empty() {
        return Err(AnalysisError::Plot("training history is empty".into()));
    }
    let x_max = history.trees.last().copied().unwrap_or(1) as f64;
    let (y_lo, _) = value_range(history.train.iter().chain(history.test.iter()).copied());
    let y_lo = y_lo.clamp(0.0, 0.95);
    let train_color = BLUE.mix(0.6);
    render_png(style, |root| {
        let mut chart = ChartBuilder::on(root)
            .margin(15)
            .caption("Model Training Progress", style.text(24))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(0.5f64..x_max + 0.5, y_lo..1.02f64)?;
        chart
            .configure_mesh()
            .light_line_style(&style.foreground.mix(0.03))
            .bold_line_style(&style.foreground.mix(0.3))
            .label_style(style.text(13))
            .x_desc("Model complexity (number of trees)")
            .y_desc("Accuracy")
            .axis_desc_style(style.text(15))
            .draw()?;
        chart
            .draw_series(DashedLineSeries::new(
                history
                    .trees
                    .iter()
                    .map(|&n| n as f64)
                    .zip(history.train.iter().copied()),
                8,
                5,
                train_color.stroke_width(2),
            ))?
            .label("Training accuracy")
            .legend(legend_line(train_color.stroke_width(2), 8));
        chart
            .draw_series(LineSeries::new(
                history
                    .trees
                    .iter()
                    .map(|&n| n as f64)
                    .zip(history.test.iter().copied()),
                RED.stroke_width(3),
            ))?
            .label("Test accuracy")
            .legend(legend_line(RED.stroke_width(3), 20));
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .label_font(style.text(13))
            .border_style(&style.foreground.mix(0.3))
            .background_style(&style.background.mix(0.8))
            .draw()?;
        Ok(())
    })
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, AnalysisError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| AnalysisError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn value_range_pads_and_handles_flat_input() {
        assert_eq!(value_range([0.0, 100.0]), (-5.0, 105.0));
        assert_eq!(value_range([3.0, 3.0]), (2.0, 4.0));
        assert_eq!(value_range(Vec::<f64>::new()), (0.0, 1.0));
        assert_eq!(value_range([f64::NAN, 1.0, 1.0]), (0.0, 2.0));
    }
    #[test]
    fn histogram_counts_every_value_once() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let bars = histogram(&values, 50);
        assert_eq!(bars.len(), 50);
        assert_eq!(bars.iter().map(|b| b.2).sum::<usize>(), 100);
        assert_eq!(bars[0].0, 0.0);
        assert!((bars[49].1 - 99.0).abs() < 1e-9);
        assert!(histogram(&[], 10).is_empty());
    }
    #[test]
    fn histogram_of_constant_values_uses_one_bin() {
        let bars = histogram(&[5.0, 5.0, 5.0], 4);
        assert_eq!(bars.iter().filter(|b| b.2 > 0).count(), 1);
    }
    #[test]
    fn host_style_only_changes_font() {
        let style = PlotStyle::for_host().with_size(640, 480);
        assert_eq!(style.width, 640);
        assert_eq!(style.font_family, host_font_family());
        assert_eq!(style.background, PlotStyle::default().background);
    }
    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    fn small_style() -> PlotStyle {
        PlotStyle::default().with_size(480, 360)
    }
    fn at(seconds: u32) -> chrono::NaiveDateTime {
        timefmt::anchor_date()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + chrono::Duration::seconds(seconds as i64)
    }
    fn assert_png(bytes: &[u8]) {
        assert!(bytes.len() > PNG_SIGNATURE.len());
        assert_eq!(bytes[..8], PNG_SIGNATURE);
    }
    #[test]
    fn baseline_chart_is_png() {
        let report = BaselineReport {
            mq3: (1..=40).map(f64::from).collect(),
            mq135: (1..=40).map(|v| f64::from(v) * 2.0).collect(),
            mq3_baseline: 2.5,
            mq135_baseline: 5.0,
        };
        assert_png(&render_baseline_png(&report, 10, &small_style()).unwrap());
    }
    #[test]
    fn verification_chart_is_png() {
        let readings: Vec<SensorReading> = (0..20)
            .map(|i| SensorReading {
                time: at(i),
                mq4: 300.0,
                mq3: 100.0,
                mq7: 800.0 + f64::from(i) * 20.0,
                mq135: 400.0,
                mq136: 150.0,
                temp: 24.0,
                hum: 60.0,
                pm25: 70.0 + f64::from(i),
                raw_label: None,
                label: if i > 10 { AlarmLabel::Alarm } else { AlarmLabel::Normal },
            })
            .collect();
        assert_png(&render_verification_png(&readings, &small_style()).unwrap());
        assert!(render_verification_png(&[], &small_style()).is_err());
    }
    #[test]
    fn dashboard_chart_is_png() {
        let n = 30;
        let series = DashboardSeries {
            time: (0..n).map(at).collect(),
            mq_a: (0..n).map(|i| f64::from(i) * 3.0).collect(),
            mq_b: (0..n).map(|i| 100.0 - f64::from(i)).collect(),
            temp: (0..n).map(|i| 20.0 + f64::from(i % 4)).collect(),
            hum: (0..n).map(|i| if i == 7 { 90.0 } else { 55.0 }).collect(),
            pm25: (0..n).map(|i| 30.0 + f64::from(i)).collect(),
            label: (0..n).map(|i| Some(f64::from(u8::from(i > 20)))).collect(),
        };
        assert_png(&render_dashboard_png(&series, &small_style()).unwrap());
    }
    #[test]
    fn training_chart_is_png() {
        let history = TrainingHistory {
            trees: (1..=10).collect(),
            train: vec![0.9, 0.95, 0.97, 0.98, 0.99, 1.0, 1.0, 1.0, 1.0, 1.0],
            test: vec![0.8, 0.85, 0.86, 0.88, 0.9, 0.9, 0.91, 0.92, 0.92, 0.93],
        };
        assert_png(&render_training_png(&history, &small_style()).unwrap());
        assert!(render_training_png(&TrainingHistory::default(), &small_style()).is_err());
    }
}
